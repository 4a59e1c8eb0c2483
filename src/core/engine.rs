use crate::core::{Pipeline, RegressionReport};
use crate::utils::error::Result;
use crate::utils::monitor::{log_summary, ResourceMonitor, StageStats};

/// 一次實驗執行後的結果
#[derive(Debug)]
pub struct ExperimentOutcome {
    pub report: RegressionReport,
    pub output_path: String,
    pub stages: Vec<StageStats>,
}

pub struct ExperimentEngine<P: Pipeline> {
    pipeline: P,
    monitor: ResourceMonitor,
}

impl<P: Pipeline> ExperimentEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: ResourceMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<ExperimentOutcome> {
        tracing::info!("🚀 Starting regression experiment");
        let mut stages = Vec::new();

        // Extract
        tracing::info!("📥 Loading dataset...");
        let data = self.pipeline.extract().await?;
        tracing::info!(
            "Loaded {} rows with {} candidate features",
            data.n_samples(),
            data.n_features()
        );
        stages.extend(self.monitor.snapshot("extract"));

        // Transform
        tracing::info!("🧮 Selecting features and fitting model...");
        let report = self.pipeline.transform(data).await?;
        tracing::info!(
            "Fitted OLS on {} features, test R-squared = {:.4}",
            report.model.coefficients.len(),
            report.metrics.r_squared
        );
        stages.extend(self.monitor.snapshot("transform"));

        // Load
        tracing::info!("💾 Writing report...");
        let output_path = self.pipeline.load(&report).await?;
        tracing::info!("Report saved to: {}", output_path);
        stages.extend(self.monitor.snapshot("load"));

        if self.monitor.is_enabled() {
            log_summary(&stages);
        }

        Ok(ExperimentOutcome {
            report,
            output_path,
            stages,
        })
    }
}
