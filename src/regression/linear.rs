use super::{center, check_xy, predict_linear};
use crate::utils::error::{RegressionError, Result};
use linfa::traits::Fit;
use linfa::Dataset;
use linfa_linear::LinearRegression as LeastSquares;
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};

/// 對角線相對於最大值小於此比例時視為秩不足
const RANK_RTOL: f64 = 1e-12;

/// Ordinary Least Squares (OLS) linear regression with an intercept.
///
/// Minimises `||y - Xβ - b||²` through `linfa-linear`. Designs with fewer
/// rows than columns, or linearly dependent columns after centring, are
/// rejected with [`RegressionError::RankDeficient`] instead of being given
/// a minimum-norm solution.
#[derive(Debug, Clone, Default)]
pub struct LinearRegression;

#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Array1<f64>,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self
    }

    pub fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<LinearModel> {
        check_xy(x, y)?;
        if x.ncols() == 0 {
            return Err(RegressionError::EmptyDataset {
                message: "cannot fit a linear model without feature columns".to_string(),
            });
        }

        let data = center(x, y);
        let rank = column_rank(data.x)?;
        if rank < x.ncols() {
            return Err(RegressionError::RankDeficient {
                rank,
                features: x.ncols(),
            });
        }

        let dataset = Dataset::new(x.to_owned(), y.to_owned());
        let fitted = LeastSquares::new()
            .with_intercept(true)
            .fit(&dataset)
            .map_err(|e| RegressionError::SolverError {
                message: format!("least squares: {}", e),
            })?;

        Ok(LinearModel {
            intercept: fitted.intercept(),
            coefficients: fitted.params().to_owned(),
        })
    }
}

impl LinearModel {
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        predict_linear(x, &self.coefficients, self.intercept)
    }
}

/// Numerical column rank of `a`, read off the diagonal of a Householder QR.
///
/// Fewer rows than columns is reported as rank deficient up front.
fn column_rank(mut a: Array2<f64>) -> Result<usize> {
    let (n, p) = a.dim();
    if n < p {
        return Err(RegressionError::RankDeficient {
            rank: n,
            features: p,
        });
    }

    for k in 0..p {
        let column = a.slice(s![k.., k]);
        let norm = column.dot(&column).sqrt();
        if norm == 0.0 {
            continue;
        }

        let alpha = if a[[k, k]] > 0.0 { -norm } else { norm };
        let mut v = a.slice(s![k.., k]).to_owned();
        v[0] -= alpha;
        let v_norm2 = v.dot(&v);
        if v_norm2 == 0.0 {
            continue;
        }

        for j in k..p {
            let factor = 2.0 * v.dot(&a.slice(s![k.., j])) / v_norm2;
            a.slice_mut(s![k.., j]).scaled_add(-factor, &v);
        }
    }

    let diag: Vec<f64> = (0..p).map(|k| a[[k, k]].abs()).collect();
    let max_diag = diag.iter().cloned().fold(0.0_f64, f64::max);
    let threshold = max_diag * RANK_RTOL;
    Ok(diag.iter().filter(|d| **d > threshold).count())
}
