use crate::utils::error::{RegressionError, Result};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 資料來源是否為遠端 URL (http/https)
pub fn is_remote_source(source: &str) -> bool {
    Url::parse(source)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(RegressionError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(RegressionError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(RegressionError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(RegressionError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(RegressionError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 本地路徑或 http(s) URL 都可以當資料來源
pub fn validate_source(field_name: &str, source: &str) -> Result<()> {
    if source.contains("://") {
        validate_url(field_name, source)
    } else {
        validate_path(field_name, source)
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(RegressionError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RegressionError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 開區間 (min, max)
pub fn validate_open_interval(field_name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !(value > min && value < max) {
        return Err(RegressionError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be strictly between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_positive_float(field_name: &str, value: f64) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(RegressionError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a positive finite number".to_string(),
        });
    }
    Ok(())
}

/// 分隔符號與小數點不能相同，否則數字會被切開
pub fn validate_csv_format(delimiter: u8, decimal: char) -> Result<()> {
    if !delimiter.is_ascii() || delimiter == b'"' || delimiter == b'\n' {
        return Err(RegressionError::InvalidConfigValueError {
            field: "delimiter".to_string(),
            value: (delimiter as char).to_string(),
            reason: "Delimiter must be a single ASCII character other than quote or newline"
                .to_string(),
        });
    }

    if delimiter as char == decimal {
        return Err(RegressionError::InvalidConfigValueError {
            field: "decimal".to_string(),
            value: decimal.to_string(),
            reason: "Decimal separator must differ from the field delimiter".to_string(),
        });
    }

    Ok(())
}

pub fn validate_distinct_columns(field_name: &str, target: &str, columns: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for column in columns {
        if column == target {
            return Err(RegressionError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: column.clone(),
                reason: "The target column cannot be dropped".to_string(),
            });
        }
        if !seen.insert(column.as_str()) {
            return Err(RegressionError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: column.clone(),
                reason: "Column listed more than once".to_string(),
            });
        }
    }
    Ok(())
}

/// 單一字元設定，例如 TOML 裡的 delimiter = ";"
pub fn parse_single_char(field_name: &str, value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(RegressionError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Expected exactly one character".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("source", "https://example.com/cars.csv").is_ok());
        assert!(validate_url("source", "http://example.com").is_ok());
        assert!(validate_url("source", "").is_err());
        assert!(validate_url("source", "invalid-url").is_err());
        assert!(validate_url("source", "ftp://example.com").is_err());
    }

    #[test]
    fn test_remote_source_detection() {
        assert!(is_remote_source("https://example.com/cars.csv"));
        assert!(!is_remote_source("data/cars.csv"));
        assert!(!is_remote_source("C:/data/cars.csv"));
    }

    #[test]
    fn test_validate_open_interval() {
        assert!(validate_open_interval("test_size", 0.1, 0.0, 1.0).is_ok());
        assert!(validate_open_interval("test_size", 0.0, 0.0, 1.0).is_err());
        assert!(validate_open_interval("test_size", 1.0, 0.0, 1.0).is_err());
        assert!(validate_open_interval("test_size", f64::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_validate_csv_format() {
        assert!(validate_csv_format(b';', ',').is_ok());
        assert!(validate_csv_format(b',', '.').is_ok());
        assert!(validate_csv_format(b',', ',').is_err());
    }

    #[test]
    fn test_validate_distinct_columns() {
        let drop = vec!["carname".to_string(), "idCar".to_string()];
        assert!(validate_distinct_columns("drop_columns", "price", &drop).is_ok());

        let drop = vec!["price".to_string()];
        assert!(validate_distinct_columns("drop_columns", "price", &drop).is_err());

        let drop = vec!["idCar".to_string(), "idCar".to_string()];
        assert!(validate_distinct_columns("drop_columns", "price", &drop).is_err());
    }

    #[test]
    fn test_parse_single_char() {
        assert_eq!(parse_single_char("delimiter", ";").unwrap(), ';');
        assert!(parse_single_char("delimiter", "").is_err());
        assert!(parse_single_char("delimiter", ";;").is_err());
    }
}
