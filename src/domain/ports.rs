use crate::domain::model::{CsvFormat, Dataset, RegressionReport, SplitSettings};
use crate::regression::LassoCvParams;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn experiment_name(&self) -> &str;
    fn data_source(&self) -> &str;
    fn target(&self) -> &str;
    fn drop_columns(&self) -> &[String];
    fn csv_format(&self) -> Result<CsvFormat>;
    fn split_settings(&self) -> SplitSettings;
    fn selection_params(&self) -> LassoCvParams;
    fn output_path(&self) -> &str;

    fn download_timeout(&self) -> Option<Duration> {
        None
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Dataset>;
    async fn transform(&self, data: Dataset) -> Result<RegressionReport>;
    async fn load(&self, report: &RegressionReport) -> Result<String>;
}
