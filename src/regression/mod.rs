//! Linear models, cross-validation and error metrics.
//!
//! Wraps the `linfa` Lasso and least-squares solvers, and adds LassoCV
//! penalty selection, train/test splitting and the regression metrics
//! reported by the pipeline.

pub mod lasso;
pub mod lasso_cv;
pub mod linear;
pub mod metrics;
pub mod model_selection;

pub use lasso::{Lasso, LassoFit};
pub use lasso_cv::{alpha_grid, LassoCv, LassoCvFit, LassoCvParams};
pub use linear::{LinearModel, LinearRegression};
pub use metrics::RegressionMetrics;
pub use model_selection::{train_test_split, KFold, TrainTestSplit};

use crate::utils::error::{RegressionError, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

pub(crate) fn check_xy(x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(RegressionError::ShapeMismatch {
            message: format!("X has {} rows but y has {} values", x.nrows(), y.len()),
        });
    }
    if x.nrows() == 0 {
        return Err(RegressionError::EmptyDataset {
            message: "cannot fit a model with zero samples".to_string(),
        });
    }
    Ok(())
}

/// 置中後的設計矩陣與目標值
pub(crate) struct Centered {
    pub x: Array2<f64>,
    pub y: Array1<f64>,
    pub x_mean: Array1<f64>,
    pub y_mean: f64,
}

/// Subtracts column means from `x` and the mean from `y`.
///
/// Constant columns become exact zeros so solvers can recognise them.
pub(crate) fn center(x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Centered {
    let n = x.nrows() as f64;
    let x_mean = x.sum_axis(Axis(0)) / n;
    let y_mean = y.sum() / n;

    let mut xc = &x - &x_mean;
    for (j, mut column) in xc.axis_iter_mut(Axis(1)).enumerate() {
        let original = x.column(j);
        let first = original[0];
        if original.iter().all(|v| *v == first) {
            column.fill(0.0);
        }
    }

    Centered {
        x: xc,
        y: &y - y_mean,
        x_mean,
        y_mean,
    }
}

pub(crate) fn predict_linear(
    x: ArrayView2<'_, f64>,
    coefficients: &Array1<f64>,
    intercept: f64,
) -> Result<Array1<f64>> {
    if x.ncols() != coefficients.len() {
        return Err(RegressionError::ShapeMismatch {
            message: format!(
                "model has {} coefficients but X has {} columns",
                coefficients.len(),
                x.ncols()
            ),
        });
    }
    Ok(x.dot(coefficients) + intercept)
}
