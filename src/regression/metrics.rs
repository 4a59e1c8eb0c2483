//! Regression error metrics computed on the held-out split.

use crate::utils::error::{RegressionError, Result};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

fn check_inputs(y_true: ArrayView1<'_, f64>, y_pred: ArrayView1<'_, f64>) -> Result<f64> {
    if y_true.len() != y_pred.len() {
        return Err(RegressionError::ShapeMismatch {
            message: format!(
                "y_true has {} values but y_pred has {}",
                y_true.len(),
                y_pred.len()
            ),
        });
    }
    if y_true.is_empty() {
        return Err(RegressionError::EmptyDataset {
            message: "cannot score an empty prediction set".to_string(),
        });
    }
    Ok(y_true.len() as f64)
}

/// MAE = (1/n) * Σ|y - ŷ|
pub fn mean_absolute_error(y_true: ArrayView1<'_, f64>, y_pred: ArrayView1<'_, f64>) -> Result<f64> {
    let n = check_inputs(y_true, y_pred)?;
    let total: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).abs())
        .sum();
    Ok(total / n)
}

/// MAPE = (1/n) * Σ|y - ŷ| / max(|y|, ε)
///
/// Returned as a fraction: `0.05` means five percent. The `ε` floor keeps a
/// zero target from producing an infinite term.
pub fn mean_absolute_percentage_error(
    y_true: ArrayView1<'_, f64>,
    y_pred: ArrayView1<'_, f64>,
) -> Result<f64> {
    let n = check_inputs(y_true, y_pred)?;
    let total: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).abs() / t.abs().max(f64::EPSILON))
        .sum();
    Ok(total / n)
}

/// MSE = (1/n) * Σ(y - ŷ)²
pub fn mean_squared_error(y_true: ArrayView1<'_, f64>, y_pred: ArrayView1<'_, f64>) -> Result<f64> {
    let n = check_inputs(y_true, y_pred)?;
    let total: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    Ok(total / n)
}

/// R² = 1 - SS_res / SS_tot
///
/// A constant `y_true` scores `1.0` when predicted exactly and `0.0`
/// otherwise. With fewer than two samples the score is undefined and `NaN`
/// is returned.
pub fn r2_score(y_true: ArrayView1<'_, f64>, y_pred: ArrayView1<'_, f64>) -> Result<f64> {
    let n = check_inputs(y_true, y_pred)?;
    if y_true.len() < 2 {
        tracing::warn!("R-squared is not well-defined with less than two samples");
        return Ok(f64::NAN);
    }

    let mean = y_true.sum() / n;
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }

    Ok(1.0 - ss_res / ss_tot)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    #[serde(rename = "Mean Absolute Error")]
    pub mean_absolute_error: f64,
    #[serde(rename = "Mean Absolute Percentage Error")]
    pub mean_absolute_percentage_error: f64,
    #[serde(rename = "Mean Squared Error")]
    pub mean_squared_error: f64,
    #[serde(rename = "R-squared")]
    pub r_squared: f64,
}

impl RegressionMetrics {
    pub fn compute(y_true: ArrayView1<'_, f64>, y_pred: ArrayView1<'_, f64>) -> Result<Self> {
        Ok(Self {
            mean_absolute_error: mean_absolute_error(y_true, y_pred)?,
            mean_absolute_percentage_error: mean_absolute_percentage_error(y_true, y_pred)?,
            mean_squared_error: mean_squared_error(y_true, y_pred)?,
            r_squared: r2_score(y_true, y_pred)?,
        })
    }

    /// (名稱, 數值)，順序固定，用於輸出
    pub fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("Mean Absolute Error", self.mean_absolute_error),
            (
                "Mean Absolute Percentage Error",
                self.mean_absolute_percentage_error,
            ),
            ("Mean Squared Error", self.mean_squared_error),
            ("R-squared", self.r_squared),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_known_values() {
        let y_true = array![3.0, -0.5, 2.0, 7.0];
        let y_pred = array![2.5, 0.0, 2.0, 8.0];

        let mae = mean_absolute_error(y_true.view(), y_pred.view()).unwrap();
        assert!((mae - 0.5).abs() < 1e-12);

        let mse = mean_squared_error(y_true.view(), y_pred.view()).unwrap();
        assert!((mse - 0.375).abs() < 1e-12);

        let r2 = r2_score(y_true.view(), y_pred.view()).unwrap();
        assert!((r2 - 0.948_608_137_044_967_9).abs() < 1e-9);
    }

    #[test]
    fn test_mape_is_a_fraction() {
        let y_true = array![100.0, 200.0];
        let y_pred = array![110.0, 180.0];
        let mape = mean_absolute_percentage_error(y_true.view(), y_pred.view()).unwrap();
        assert!((mape - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_mape_zero_target_is_finite() {
        let y_true = array![0.0, 1.0];
        let y_pred = array![1e-20, 1.0];
        let mape = mean_absolute_percentage_error(y_true.view(), y_pred.view()).unwrap();
        assert!(mape.is_finite());
    }

    #[test]
    fn test_r2_constant_target() {
        let y_true = array![5.0, 5.0, 5.0];
        assert_eq!(r2_score(y_true.view(), y_true.view()).unwrap(), 1.0);

        let y_pred = array![5.0, 6.0, 5.0];
        assert_eq!(r2_score(y_true.view(), y_pred.view()).unwrap(), 0.0);
    }

    #[test]
    fn test_r2_single_sample_is_nan() {
        let y = array![1.0];
        assert!(r2_score(y.view(), y.view()).unwrap().is_nan());
    }

    #[test]
    fn test_mismatched_and_empty_inputs() {
        let a = array![1.0, 2.0];
        let b = array![1.0];
        assert!(matches!(
            mean_absolute_error(a.view(), b.view()),
            Err(RegressionError::ShapeMismatch { .. })
        ));

        let empty = ndarray::Array1::<f64>::zeros(0);
        assert!(matches!(
            mean_squared_error(empty.view(), empty.view()),
            Err(RegressionError::EmptyDataset { .. })
        ));
    }

    #[test]
    fn test_serialized_keys() {
        let metrics = RegressionMetrics {
            mean_absolute_error: 1.0,
            mean_absolute_percentage_error: 0.1,
            mean_squared_error: 2.0,
            r_squared: 0.9,
        };
        let json = serde_json::to_value(metrics).unwrap();
        assert_eq!(json["Mean Absolute Error"], 1.0);
        assert_eq!(json["Mean Absolute Percentage Error"], 0.1);
        assert_eq!(json["Mean Squared Error"], 2.0);
        assert_eq!(json["R-squared"], 0.9);
    }
}
