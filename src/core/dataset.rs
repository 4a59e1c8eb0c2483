use crate::domain::model::{CsvFormat, Dataset};
use crate::utils::error::{RegressionError, Result};
use ndarray::{Array1, Array2};
use std::collections::HashSet;

/// 將分隔文字檔解析成 `Dataset`
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    format: CsvFormat,
    target: String,
    drop_columns: Vec<String>,
}

/// Parses a numeric cell, honouring a non-dot decimal separator.
///
/// Returns `None` for empty cells, for values that are not finite numbers,
/// and for cells that contain a `.` when another decimal separator is set.
pub fn parse_number(raw: &str, decimal: char) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    // 小數點為 ',' 時 "1.234" 不是合法數字
    if decimal != '.' && trimmed.contains('.') {
        return None;
    }

    let value = if decimal == '.' {
        trimmed.parse::<f64>().ok()?
    } else {
        trimmed.replace(decimal, ".").parse::<f64>().ok()?
    };

    value.is_finite().then_some(value)
}

impl DatasetLoader {
    pub fn new(format: CsvFormat, target: impl Into<String>, drop_columns: Vec<String>) -> Self {
        Self {
            format,
            target: target.into(),
            drop_columns,
        }
    }

    pub fn parse(&self, bytes: &[u8]) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.format.delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut seen = HashSet::new();
        for header in &headers {
            if !seen.insert(header.as_str()) {
                return Err(RegressionError::ProcessingError {
                    message: format!("column '{}' appears more than once in the header", header),
                });
            }
        }

        for column in &self.drop_columns {
            if !headers.contains(column) {
                return Err(RegressionError::ColumnNotFound {
                    column: column.clone(),
                });
            }
        }

        let target_idx = headers
            .iter()
            .position(|h| *h == self.target)
            .ok_or_else(|| RegressionError::ColumnNotFound {
                column: self.target.clone(),
            })?;

        let feature_idx: Vec<usize> = (0..headers.len())
            .filter(|&j| j != target_idx && !self.drop_columns.contains(&headers[j]))
            .collect();

        if feature_idx.is_empty() {
            return Err(RegressionError::EmptyDataset {
                message: format!(
                    "no feature columns left after removing '{}' and the dropped columns",
                    self.target
                ),
            });
        }

        let mut values = Vec::new();
        let mut target = Vec::new();

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let cell = |j: usize| -> Result<f64> {
                let raw = record.get(j).unwrap_or_default();
                parse_number(raw, self.format.decimal).ok_or_else(|| RegressionError::ParseError {
                    row: row + 1,
                    column: headers[j].clone(),
                    value: raw.to_string(),
                })
            };

            for &j in &feature_idx {
                values.push(cell(j)?);
            }
            target.push(cell(target_idx)?);
        }

        if target.is_empty() {
            return Err(RegressionError::EmptyDataset {
                message: "the file has a header but no data rows".to_string(),
            });
        }

        let n_samples = target.len();
        let features = Array2::from_shape_vec((n_samples, feature_idx.len()), values).map_err(
            |e| RegressionError::ShapeMismatch {
                message: e.to_string(),
            },
        )?;

        tracing::debug!(
            "Parsed {} rows, {} feature columns, target '{}'",
            n_samples,
            feature_idx.len(),
            self.target
        );

        Dataset::new(
            feature_idx.iter().map(|&j| headers[j].clone()).collect(),
            features,
            self.target.clone(),
            Array1::from(target),
        )
    }
}
