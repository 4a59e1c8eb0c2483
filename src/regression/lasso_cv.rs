use super::lasso::{Lasso, LassoFit};
use super::metrics::mean_squared_error;
use super::model_selection::KFold;
use super::{center, check_xy};
use crate::utils::error::{RegressionError, Result};
use ndarray::{ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// 退化資料 (常數目標或常數特徵) 時使用的懲罰值
const ALPHA_RESOLUTION: f64 = 1e-15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LassoCvParams {
    pub cv_folds: usize,
    pub n_alphas: usize,
    pub eps: f64,
    pub max_iter: usize,
    pub tol: f64,
}

impl Default for LassoCvParams {
    fn default() -> Self {
        Self {
            cv_folds: 5,
            n_alphas: 100,
            eps: 1e-3,
            max_iter: 1000,
            tol: 1e-4,
        }
    }
}

/// Log-spaced penalty grid from `alpha_max` down to `alpha_max * eps`.
///
/// `alpha_max` is the smallest penalty for which every coefficient is zero.
pub fn alpha_grid(
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
    eps: f64,
    n_alphas: usize,
) -> Result<Vec<f64>> {
    check_xy(x, y)?;
    if n_alphas == 0 {
        return Err(RegressionError::InvalidConfigValueError {
            field: "n_alphas".to_string(),
            value: n_alphas.to_string(),
            reason: "at least one penalty value is required".to_string(),
        });
    }
    if !(eps > 0.0 && eps.is_finite()) {
        return Err(RegressionError::InvalidConfigValueError {
            field: "eps".to_string(),
            value: eps.to_string(),
            reason: "eps must be a positive finite number".to_string(),
        });
    }

    let data = center(x, y);
    let correlations = data.x.t().dot(&data.y);
    let alpha_max = correlations
        .iter()
        .fold(0.0_f64, |acc, v| acc.max(v.abs()))
        / x.nrows() as f64;

    if alpha_max <= ALPHA_RESOLUTION {
        return Ok(vec![ALPHA_RESOLUTION; n_alphas]);
    }
    if n_alphas == 1 {
        return Ok(vec![alpha_max]);
    }

    let log_max = alpha_max.log10();
    let log_min = (alpha_max * eps).log10();
    let step = (log_max - log_min) / (n_alphas - 1) as f64;

    Ok((0..n_alphas)
        .map(|i| 10f64.powf(log_max - step * i as f64))
        .collect())
}

/// Lasso with the penalty chosen by K-fold cross-validation.
#[derive(Debug, Clone)]
pub struct LassoCv {
    params: LassoCvParams,
}

#[derive(Debug, Clone)]
pub struct LassoCvFit {
    /// 交叉驗證選出的懲罰值
    pub alpha: f64,
    pub alphas: Vec<f64>,
    /// mse_path[a][f]：第 a 個懲罰值在第 f 折的測試誤差
    pub mse_path: Vec<Vec<f64>>,
    pub mean_mse: Vec<f64>,
    /// 以最佳懲罰值在全部資料上重新擬合的模型
    pub model: LassoFit,
}

impl LassoCv {
    pub fn new(params: LassoCvParams) -> Self {
        Self { params }
    }

    fn estimator(&self, alpha: f64) -> Lasso {
        Lasso::new(alpha)
            .with_max_iter(self.params.max_iter)
            .with_tol(self.params.tol)
    }

    pub fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<LassoCvFit> {
        check_xy(x, y)?;

        let alphas = alpha_grid(x, y, self.params.eps, self.params.n_alphas)?;
        let folds = KFold::new(self.params.cv_folds).split(x.nrows())?;

        tracing::debug!(
            "LassoCV: {} penalties from {:e} to {:e}, {} folds",
            alphas.len(),
            alphas[0],
            alphas[alphas.len() - 1],
            folds.len()
        );

        let mut mse_path = vec![vec![0.0; folds.len()]; alphas.len()];

        for (fold, (train, test)) in folds.iter().enumerate() {
            let x_train = x.select(Axis(0), train);
            let y_train = y.select(Axis(0), train);
            let x_test = x.select(Axis(0), test);
            let y_test = y.select(Axis(0), test);

            for (a, &alpha) in alphas.iter().enumerate() {
                let fit = self.estimator(alpha).fit(x_train.view(), y_train.view())?;
                let predictions = fit.predict(x_test.view())?;
                mse_path[a][fold] = mean_squared_error(y_test.view(), predictions.view())?;
            }
        }

        let mean_mse: Vec<f64> = mse_path
            .iter()
            .map(|row| row.iter().sum::<f64>() / row.len() as f64)
            .collect();

        let mut best = 0;
        for (i, mse) in mean_mse.iter().enumerate() {
            if *mse < mean_mse[best] {
                best = i;
            }
        }
        let alpha = alphas[best];

        let model = self.estimator(alpha).fit(x, y)?;
        if !model.converged {
            tracing::warn!(
                "Lasso did not converge for alpha={:e} within {} iterations (duality gap {:e})",
                alpha,
                self.params.max_iter,
                model.dual_gap
            );
        }

        tracing::debug!(
            "LassoCV picked alpha={:e} (mean CV MSE {:.6})",
            alpha,
            mean_mse[best]
        );

        Ok(LassoCvFit {
            alpha,
            alphas,
            mse_path,
            mean_mse,
            model,
        })
    }
}
