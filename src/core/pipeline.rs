use crate::core::analysis::RegressionAnalysis;
use crate::core::dataset::DatasetLoader;
use crate::core::report::{build_archive, REPORT_ARCHIVE};
use crate::core::{ConfigProvider, Dataset, Pipeline, RegressionReport, Storage};
use crate::utils::error::{RegressionError, Result};
use crate::utils::validation::is_remote_source;
use reqwest::Client;

pub struct RegressionPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> RegressionPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("Downloading dataset from: {}", url);

        let mut request = self.client.get(url);
        if let Some(timeout) = self.config.download_timeout() {
            request = request.timeout(timeout);
        }

        let response = request.send().await?.error_for_status()?;
        tracing::debug!("Download response status: {}", response.status());

        Ok(response.bytes().await?.to_vec())
    }

    async fn read_source(&self) -> Result<Vec<u8>> {
        let source = self.config.data_source();
        if is_remote_source(source) {
            self.download(source).await
        } else {
            tracing::debug!("Reading dataset from: {}", source);
            Ok(tokio::fs::read(source).await?)
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for RegressionPipeline<S, C> {
    async fn extract(&self) -> Result<Dataset> {
        let bytes = self.read_source().await?;
        tracing::debug!("Read {} bytes of CSV", bytes.len());

        let loader = DatasetLoader::new(
            self.config.csv_format()?,
            self.config.target(),
            self.config.drop_columns().to_vec(),
        );
        loader.parse(&bytes)
    }

    async fn transform(&self, data: Dataset) -> Result<RegressionReport> {
        let analysis = RegressionAnalysis::new(
            self.config.selection_params(),
            self.config.split_settings(),
        );
        let experiment = self.config.experiment_name().to_string();

        // 數值運算交給 blocking 執行緒，避免卡住 runtime
        tokio::task::spawn_blocking(move || analysis.run(&experiment, &data))
            .await
            .map_err(|e| RegressionError::ProcessingError {
                message: format!("regression task failed: {}", e),
            })?
    }

    async fn load(&self, report: &RegressionReport) -> Result<String> {
        let output_path = format!("{}/{}", self.config.output_path(), REPORT_ARCHIVE);

        let archive = build_archive(report)?;
        tracing::debug!("Writing report archive ({} bytes) to storage", archive.len());
        self.storage.write_file(REPORT_ARCHIVE, &archive).await?;

        tracing::debug!("Report archive saved successfully");
        Ok(output_path)
    }
}
