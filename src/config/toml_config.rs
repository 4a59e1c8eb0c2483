use crate::config::{csv_format_from, validate_experiment};
use crate::domain::model::{CsvFormat, SplitSettings};
use crate::domain::ports::ConfigProvider;
use crate::regression::LassoCvParams;
use crate::utils::error::{RegressionError, Result};
use crate::utils::validation::{parse_single_char, validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub experiment: ExperimentConfig,
    pub source: SourceConfig,
    pub model: ModelConfig,
    pub split: Option<SplitConfig>,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: String,
    pub delimiter: Option<String>,
    pub decimal: Option<String>,
    #[serde(default)]
    pub drop_columns: Vec<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub target: String,
    pub cv_folds: Option<usize>,
    pub n_alphas: Option<usize>,
    pub eps: Option<f64>,
    pub max_iter: Option<usize>,
    pub tol: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    pub test_size: Option<f64>,
    pub random_state: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RegressionError::MissingConfigError {
                field: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RegressionError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            RegressionError::ConfigValidationError {
                field: "environment".to_string(),
                message: e.to_string(),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("experiment.name", &self.experiment.name)?;
        self.csv_format()?;

        if self.source.timeout_seconds == Some(0) {
            return Err(RegressionError::InvalidConfigValueError {
                field: "source.timeout_seconds".to_string(),
                value: "0".to_string(),
                reason: "Timeout must be at least one second".to_string(),
            });
        }

        validate_experiment(
            &self.source.path,
            &self.model.target,
            &self.source.drop_columns,
            &self.load.output_path,
            &self.split_settings(),
            &self.selection_params(),
        )
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn experiment_name(&self) -> &str {
        &self.experiment.name
    }

    fn data_source(&self) -> &str {
        &self.source.path
    }

    fn target(&self) -> &str {
        &self.model.target
    }

    fn drop_columns(&self) -> &[String] {
        &self.source.drop_columns
    }

    fn csv_format(&self) -> Result<CsvFormat> {
        let defaults = CsvFormat::default();
        let delimiter = match &self.source.delimiter {
            Some(value) => parse_single_char("source.delimiter", value)?,
            None => defaults.delimiter as char,
        };
        let decimal = match &self.source.decimal {
            Some(value) => parse_single_char("source.decimal", value)?,
            None => defaults.decimal,
        };
        csv_format_from(delimiter, decimal)
    }

    fn split_settings(&self) -> SplitSettings {
        let defaults = SplitSettings::default();
        let split = self.split.as_ref();
        SplitSettings {
            test_size: split
                .and_then(|s| s.test_size)
                .unwrap_or(defaults.test_size),
            random_state: split
                .and_then(|s| s.random_state)
                .unwrap_or(defaults.random_state),
        }
    }

    fn selection_params(&self) -> LassoCvParams {
        let defaults = LassoCvParams::default();
        LassoCvParams {
            cv_folds: self.model.cv_folds.unwrap_or(defaults.cv_folds),
            n_alphas: self.model.n_alphas.unwrap_or(defaults.n_alphas),
            eps: self.model.eps.unwrap_or(defaults.eps),
            max_iter: self.model.max_iter.unwrap_or(defaults.max_iter),
            tol: self.model.tol.unwrap_or(defaults.tol),
        }
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn download_timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
