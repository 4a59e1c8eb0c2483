use crate::domain::model::{
    Coefficient, Dataset, FeatureSelection, FittedModel, Prediction, RegressionReport,
    SplitSettings,
};
use crate::regression::{
    train_test_split, LassoCv, LassoCvParams, LinearRegression, RegressionMetrics,
};
use crate::utils::error::{RegressionError, Result};

/// Lasso 選特徵 → 切分訓練/測試 → OLS → 評估
#[derive(Debug, Clone)]
pub struct RegressionAnalysis {
    selection: LassoCvParams,
    split: SplitSettings,
}

/// 在測試集上的擬合結果
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub model: FittedModel,
    pub metrics: RegressionMetrics,
    pub predictions: Vec<Prediction>,
    pub n_train: usize,
    pub n_test: usize,
}

impl RegressionAnalysis {
    pub fn new(selection: LassoCvParams, split: SplitSettings) -> Self {
        Self { selection, split }
    }

    /// Picks the columns whose cross-validated Lasso coefficient is non-zero.
    pub fn select_features(&self, data: &Dataset) -> Result<FeatureSelection> {
        let cv = LassoCv::new(self.selection).fit(data.features.view(), data.target.view())?;

        let mut selected = Vec::new();
        let mut discarded = Vec::new();
        let mut lasso_coefficients = Vec::with_capacity(data.n_features());

        for (name, &value) in data.feature_names.iter().zip(cv.model.coefficients.iter()) {
            if value != 0.0 {
                selected.push(name.clone());
            } else {
                discarded.push(name.clone());
            }
            lasso_coefficients.push(Coefficient {
                feature: name.clone(),
                value,
            });
        }

        if selected.is_empty() {
            return Err(RegressionError::NoFeaturesSelected { alpha: cv.alpha });
        }

        tracing::info!(
            "🎯 Lasso kept {}/{} columns (alpha = {:.6e})",
            selected.len(),
            data.n_features(),
            cv.alpha
        );
        tracing::debug!("Selected columns: {:?}", selected);
        if !discarded.is_empty() {
            tracing::debug!("Discarded columns: {:?}", discarded);
        }

        Ok(FeatureSelection {
            alpha: cv.alpha,
            cv_folds: self.selection.cv_folds,
            alphas: cv.alphas,
            mean_cv_mse: cv.mean_mse,
            lasso_intercept: cv.model.intercept,
            lasso_coefficients,
            selected,
            discarded,
        })
    }

    /// Fits OLS on a seeded train split of `selected` and scores the test split.
    pub fn fit_and_evaluate(&self, data: &Dataset, selected: &[String]) -> Result<Evaluation> {
        let x = data.select_columns(selected)?;
        let split = train_test_split(
            x.view(),
            data.target.view(),
            self.split.test_size,
            self.split.random_state,
        )?;

        tracing::debug!(
            "Split {} rows into {} train / {} test (seed {})",
            data.n_samples(),
            split.y_train.len(),
            split.y_test.len(),
            self.split.random_state
        );

        let fitted = LinearRegression::new().fit(split.x_train.view(), split.y_train.view())?;
        let y_pred = fitted.predict(split.x_test.view())?;
        let metrics = RegressionMetrics::compute(split.y_test.view(), y_pred.view())?;

        let predictions = split
            .test_indices
            .iter()
            .zip(split.y_test.iter().zip(y_pred.iter()))
            .map(|(&row, (&actual, &predicted))| Prediction {
                row,
                actual,
                predicted,
            })
            .collect();

        let coefficients = selected
            .iter()
            .zip(fitted.coefficients.iter())
            .map(|(name, &value)| Coefficient {
                feature: name.clone(),
                value,
            })
            .collect();

        Ok(Evaluation {
            model: FittedModel {
                intercept: fitted.intercept,
                coefficients,
            },
            metrics,
            predictions,
            n_train: split.y_train.len(),
            n_test: split.y_test.len(),
        })
    }

    pub fn run(&self, experiment: &str, data: &Dataset) -> Result<RegressionReport> {
        let selection = self.select_features(data)?;
        let evaluation = self.fit_and_evaluate(data, &selection.selected)?;

        Ok(RegressionReport {
            experiment: experiment.to_string(),
            generated_at: chrono::Utc::now(),
            target: data.target_name.clone(),
            n_samples: data.n_samples(),
            n_features: data.n_features(),
            n_train: evaluation.n_train,
            n_test: evaluation.n_test,
            split: self.split,
            selection,
            model: evaluation.model,
            metrics: evaluation.metrics,
            predictions: evaluation.predictions,
        })
    }
}
