use super::{center, check_xy, predict_linear};
use crate::utils::error::{RegressionError, Result};
use linfa::traits::Fit;
use linfa::Dataset;
use linfa_elasticnet::ElasticNet;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

/// Lasso regression with L1 regularization.
///
/// Minimises
///
/// ```text
/// (1 / (2n)) * ||y - Xw - b||² + alpha * ||w||₁
/// ```
///
/// through `linfa-elasticnet` with `l1_ratio = 1`. The intercept `b` is
/// fitted separately and never penalised. Constant columns are left out of
/// the solver and keep a zero coefficient.
#[derive(Debug, Clone)]
pub struct Lasso {
    alpha: f64,
    max_iter: usize,
    tol: f64,
}

#[derive(Debug, Clone)]
pub struct LassoFit {
    pub alpha: f64,
    pub intercept: f64,
    pub coefficients: Array1<f64>,
    pub n_iter: usize,
    pub dual_gap: f64,
    pub converged: bool,
}

impl Lasso {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            max_iter: 1000,
            tol: 1e-4,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<LassoFit> {
        check_xy(x, y)?;
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(RegressionError::InvalidConfigValueError {
                field: "alpha".to_string(),
                value: self.alpha.to_string(),
                reason: "Lasso penalty must be a non-negative finite number".to_string(),
            });
        }

        let data = center(x, y);
        let active: Vec<usize> = data
            .x
            .columns()
            .into_iter()
            .enumerate()
            .filter(|(_, col)| col.iter().any(|v| *v != 0.0))
            .map(|(j, _)| j)
            .collect();

        let mut coefficients = Array1::zeros(x.ncols());
        let mut n_iter = 0;

        if !active.is_empty() {
            let records = x.select(Axis(1), &active);
            let dataset = Dataset::new(records, y.to_owned());
            let model = ElasticNet::<f64>::params()
                .penalty(self.alpha)
                .l1_ratio(1.0)
                .with_intercept(true)
                .max_iterations(self.max_iter as u32)
                .tolerance(self.tol)
                .fit(&dataset)
                .map_err(|e| RegressionError::SolverError {
                    message: format!("Lasso(alpha={:e}): {}", self.alpha, e),
                })?;

            for (&j, &w) in active.iter().zip(model.hyperplane().iter()) {
                coefficients[j] = w;
            }
            n_iter = model.n_steps() as usize;
        }

        // 以置中資料計算對偶間隙，判斷是否收斂
        let residual = &data.y - &data.x.dot(&coefficients);
        let alpha_n = self.alpha * x.nrows() as f64;
        let dual_gap = duality_gap(
            data.x.view(),
            data.y.view(),
            residual.view(),
            coefficients.view(),
            alpha_n,
        );
        let gap_tol = self.tol * data.y.dot(&data.y);
        let converged = dual_gap <= gap_tol;

        if !converged {
            tracing::debug!(
                "Lasso(alpha={:e}) stopped after {} iterations, duality gap {:e} > {:e}",
                self.alpha,
                n_iter,
                dual_gap,
                gap_tol
            );
        }

        let intercept = data.y_mean - data.x_mean.dot(&coefficients);

        Ok(LassoFit {
            alpha: self.alpha,
            intercept,
            coefficients,
            n_iter,
            dual_gap,
            converged,
        })
    }
}

/// Duality gap of the (n-scaled) Lasso problem at `w` with residual `r = y - Xw`.
fn duality_gap(
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
    residual: ArrayView1<'_, f64>,
    w: ArrayView1<'_, f64>,
    alpha_n: f64,
) -> f64 {
    let xt_r = x.t().dot(&residual);
    let dual_norm = xt_r.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let r_norm2 = residual.dot(&residual);

    let (scale, mut gap) = if dual_norm > alpha_n {
        let scale = alpha_n / dual_norm;
        (scale, 0.5 * (r_norm2 + r_norm2 * scale * scale))
    } else {
        (1.0, r_norm2)
    };

    let l1_norm: f64 = w.iter().map(|v| v.abs()).sum();
    gap += alpha_n * l1_norm - scale * residual.dot(&y);
    gap
}

impl LassoFit {
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        predict_linear(x, &self.coefficients, self.intercept)
    }

    /// 係數不為零的欄位索引
    pub fn nonzero_indices(&self) -> Vec<usize> {
        self.coefficients
            .iter()
            .enumerate()
            .filter(|(_, w)| **w != 0.0)
            .map(|(j, _)| j)
            .collect()
    }
}
