pub mod cli;
pub mod toml_config;

use crate::domain::model::{CsvFormat, SplitSettings};
use crate::regression::LassoCvParams;
use crate::utils::error::{RegressionError, Result};
use crate::utils::validation::{
    validate_csv_format, validate_distinct_columns, validate_non_empty_string,
    validate_open_interval, validate_path, validate_positive_float, validate_positive_number,
    validate_source,
};

#[cfg(feature = "cli")]
pub use self::args::CliConfig;

/// 把字元設定轉成 `CsvFormat`，同時檢查分隔符號是否可用
pub fn csv_format_from(delimiter: char, decimal: char) -> Result<CsvFormat> {
    if !delimiter.is_ascii() {
        return Err(RegressionError::InvalidConfigValueError {
            field: "delimiter".to_string(),
            value: delimiter.to_string(),
            reason: "Delimiter must be a single ASCII character".to_string(),
        });
    }

    let delimiter = delimiter as u8;
    validate_csv_format(delimiter, decimal)?;
    Ok(CsvFormat { delimiter, decimal })
}

/// CLI 與 TOML 共用的實驗設定檢查
pub(crate) fn validate_experiment(
    source: &str,
    target: &str,
    drop_columns: &[String],
    output_path: &str,
    split: &SplitSettings,
    params: &LassoCvParams,
) -> Result<()> {
    validate_source("data", source)?;
    validate_non_empty_string("target", target)?;
    validate_distinct_columns("drop_columns", target, drop_columns)?;
    validate_path("output_path", output_path)?;

    validate_open_interval("test_size", split.test_size, 0.0, 1.0)?;

    validate_positive_number("cv_folds", params.cv_folds, 2)?;
    validate_positive_number("n_alphas", params.n_alphas, 1)?;
    validate_positive_number("max_iter", params.max_iter, 1)?;
    validate_open_interval("eps", params.eps, 0.0, 1.0)?;
    validate_positive_float("tol", params.tol)?;

    Ok(())
}

#[cfg(feature = "cli")]
mod args {
    use super::{csv_format_from, validate_experiment};
    use crate::domain::model::{CsvFormat, SplitSettings};
    use crate::domain::ports::ConfigProvider;
    use crate::regression::LassoCvParams;
    use crate::utils::error::Result;
    use crate::utils::validation::Validate;
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "price-regression")]
    #[command(about = "Lasso feature selection and OLS regression over a vehicle price dataset")]
    pub struct CliConfig {
        /// Local path or http(s) URL of the delimited data file
        #[arg(long, default_value = "data/CarPrice.csv")]
        pub data: String,

        #[arg(long, default_value = "price")]
        pub target: String,

        /// Columns removed before fitting
        #[arg(long, value_delimiter = ',', default_value = "carname,idCar")]
        pub drop_columns: Vec<String>,

        #[arg(long, default_value = ";")]
        pub delimiter: char,

        #[arg(long, default_value = ",")]
        pub decimal: char,

        #[arg(long, default_value = "0.1")]
        pub test_size: f64,

        #[arg(long, default_value = "42")]
        pub random_state: u64,

        #[arg(long, default_value = "5")]
        pub cv_folds: usize,

        #[arg(long, default_value = "100")]
        pub n_alphas: usize,

        #[arg(long, default_value = "0.001")]
        pub eps: f64,

        #[arg(long, default_value = "1000")]
        pub max_iter: usize,

        #[arg(long, default_value = "0.0001")]
        pub tol: f64,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log CPU and memory usage per stage")]
        pub monitor: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,
    }

    impl ConfigProvider for CliConfig {
        fn experiment_name(&self) -> &str {
            "price-regression"
        }

        fn data_source(&self) -> &str {
            &self.data
        }

        fn target(&self) -> &str {
            &self.target
        }

        fn drop_columns(&self) -> &[String] {
            &self.drop_columns
        }

        fn csv_format(&self) -> Result<CsvFormat> {
            csv_format_from(self.delimiter, self.decimal)
        }

        fn split_settings(&self) -> SplitSettings {
            SplitSettings {
                test_size: self.test_size,
                random_state: self.random_state,
            }
        }

        fn selection_params(&self) -> LassoCvParams {
            LassoCvParams {
                cv_folds: self.cv_folds,
                n_alphas: self.n_alphas,
                eps: self.eps,
                max_iter: self.max_iter,
                tol: self.tol,
            }
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            csv_format_from(self.delimiter, self.decimal)?;
            validate_experiment(
                &self.data,
                &self.target,
                &self.drop_columns,
                &self.output_path,
                &self.split_settings(),
                &self.selection_params(),
            )
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn parse(args: &[&str]) -> CliConfig {
            let mut argv = vec!["price-regression"];
            argv.extend_from_slice(args);
            CliConfig::parse_from(argv)
        }

        #[test]
        fn test_defaults() {
            let config = parse(&[]);
            assert_eq!(config.target(), "price");
            assert_eq!(config.drop_columns(), ["carname", "idCar"]);
            assert_eq!(config.csv_format().unwrap(), CsvFormat::default());
            assert_eq!(config.split_settings(), SplitSettings::default());
            assert_eq!(config.selection_params(), LassoCvParams::default());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_overrides() {
            let config = parse(&[
                "--data",
                "https://example.com/cars.csv",
                "--delimiter",
                ",",
                "--decimal",
                ".",
                "--drop-columns",
                "id",
                "--test-size",
                "0.25",
                "--cv-folds",
                "3",
            ]);

            assert_eq!(config.data_source(), "https://example.com/cars.csv");
            assert_eq!(config.csv_format().unwrap().delimiter, b',');
            assert_eq!(config.drop_columns(), ["id"]);
            assert_eq!(config.split_settings().test_size, 0.25);
            assert_eq!(config.selection_params().cv_folds, 3);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_invalid_values() {
            assert!(parse(&["--test-size", "1.0"]).validate().is_err());
            assert!(parse(&["--cv-folds", "1"]).validate().is_err());
            assert!(parse(&["--delimiter", ","]).validate().is_err());
            assert!(parse(&["--drop-columns", "price"]).validate().is_err());
            assert!(parse(&["--tol", "0"]).validate().is_err());
        }
    }
}
