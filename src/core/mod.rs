pub mod analysis;
pub mod dataset;
pub mod engine;
pub mod pipeline;
pub mod report;

pub use crate::domain::model::{Dataset, RegressionReport};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
