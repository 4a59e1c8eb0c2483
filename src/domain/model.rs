use crate::regression::RegressionMetrics;
use crate::utils::error::{RegressionError, Result};
use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// 已載入的表格資料：特徵矩陣加上目標欄
#[derive(Debug, Clone)]
pub struct Dataset {
    pub feature_names: Vec<String>,
    pub features: Array2<f64>,
    pub target_name: String,
    pub target: Array1<f64>,
}

impl Dataset {
    pub fn new(
        feature_names: Vec<String>,
        features: Array2<f64>,
        target_name: String,
        target: Array1<f64>,
    ) -> Result<Self> {
        if features.ncols() != feature_names.len() {
            return Err(RegressionError::ShapeMismatch {
                message: format!(
                    "{} feature names for {} feature columns",
                    feature_names.len(),
                    features.ncols()
                ),
            });
        }
        if features.nrows() != target.len() {
            return Err(RegressionError::ShapeMismatch {
                message: format!(
                    "{} feature rows for {} target values",
                    features.nrows(),
                    target.len()
                ),
            });
        }

        Ok(Self {
            feature_names,
            features,
            target_name,
            target,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.feature_names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| RegressionError::ColumnNotFound {
                column: name.to_string(),
            })
    }

    /// 依欄位名稱取出特徵子矩陣，保持傳入順序
    pub fn select_columns(&self, names: &[String]) -> Result<Array2<f64>> {
        let indices = names
            .iter()
            .map(|name| self.column_index(name))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.features.select(Axis(1), &indices))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CsvFormat {
    pub delimiter: u8,
    pub decimal: char,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            delimiter: b';',
            decimal: ',',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitSettings {
    pub test_size: f64,
    pub random_state: u64,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            test_size: 0.1,
            random_state: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    pub feature: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSelection {
    pub alpha: f64,
    pub cv_folds: usize,
    pub alphas: Vec<f64>,
    pub mean_cv_mse: Vec<f64>,
    pub lasso_intercept: f64,
    pub lasso_coefficients: Vec<Coefficient>,
    pub selected: Vec<String>,
    pub discarded: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedModel {
    pub intercept: f64,
    pub coefficients: Vec<Coefficient>,
}

impl FittedModel {
    pub fn coefficient(&self, feature: &str) -> Option<f64> {
        self.coefficients
            .iter()
            .find(|c| c.feature == feature)
            .map(|c| c.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// 資料列索引 (從 0 開始，不含標題列)
    pub row: usize,
    pub actual: f64,
    pub predicted: f64,
}

impl Prediction {
    pub fn residual(&self) -> f64 {
        self.actual - self.predicted
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionReport {
    pub experiment: String,
    pub generated_at: DateTime<Utc>,
    pub target: String,
    pub n_samples: usize,
    pub n_features: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub split: SplitSettings,
    pub selection: FeatureSelection,
    pub model: FittedModel,
    pub metrics: RegressionMetrics,
    pub predictions: Vec<Prediction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample() -> Dataset {
        Dataset::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
            "y".to_string(),
            array![10.0, 20.0],
        )
        .unwrap()
    }

    #[test]
    fn test_select_columns_keeps_requested_order() {
        let data = sample();
        let subset = data
            .select_columns(&["c".to_string(), "a".to_string()])
            .unwrap();
        assert_eq!(subset, array![[3.0, 1.0], [6.0, 4.0]]);
    }

    #[test]
    fn test_select_unknown_column() {
        let data = sample();
        assert!(matches!(
            data.select_columns(&["z".to_string()]),
            Err(RegressionError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_dataset_shape_checks() {
        let result = Dataset::new(
            vec!["a".to_string()],
            array![[1.0, 2.0]],
            "y".to_string(),
            array![1.0],
        );
        assert!(result.is_err());

        let result = Dataset::new(
            vec!["a".to_string()],
            array![[1.0], [2.0]],
            "y".to_string(),
            array![1.0],
        );
        assert!(result.is_err());
    }
}
