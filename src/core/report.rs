use crate::domain::model::RegressionReport;
use crate::utils::error::{RegressionError, Result};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const REPORT_ARCHIVE: &str = "regression_report.zip";
pub const REPORT_JSON: &str = "report.json";
pub const COEFFICIENTS_CSV: &str = "coefficients.csv";
pub const PREDICTIONS_CSV: &str = "predictions.csv";

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| RegressionError::IoError(e.into_error()))
}

/// 每個特徵一列：Lasso 係數、是否入選、OLS 係數 (未入選則留空)
pub fn coefficients_csv(report: &RegressionReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["feature", "lasso_coefficient", "selected", "ols_coefficient"])?;

    for lasso in &report.selection.lasso_coefficients {
        let ols = report
            .model
            .coefficient(&lasso.feature)
            .map(|v| v.to_string())
            .unwrap_or_default();
        let value = lasso.value.to_string();
        let selected = report.selection.selected.contains(&lasso.feature);

        writer.write_record([
            lasso.feature.as_str(),
            value.as_str(),
            if selected { "true" } else { "false" },
            ols.as_str(),
        ])?;
    }
    let intercept = report.model.intercept.to_string();
    writer.write_record(["(intercept)", "", "", intercept.as_str()])?;

    finish_csv(writer)
}

pub fn predictions_csv(report: &RegressionReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["row", "actual", "predicted", "residual"])?;

    for prediction in &report.predictions {
        writer.write_record([
            prediction.row.to_string(),
            prediction.actual.to_string(),
            prediction.predicted.to_string(),
            prediction.residual().to_string(),
        ])?;
    }

    finish_csv(writer)
}

/// 把報告、係數與預測打包成一個 ZIP
pub fn build_archive(report: &RegressionReport) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    zip.start_file::<_, ()>(REPORT_JSON, FileOptions::default())?;
    let json = serde_json::to_string_pretty(report)?;
    zip.write_all(json.as_bytes())?;

    zip.start_file::<_, ()>(COEFFICIENTS_CSV, FileOptions::default())?;
    zip.write_all(&coefficients_csv(report)?)?;

    zip.start_file::<_, ()>(PREDICTIONS_CSV, FileOptions::default())?;
    zip.write_all(&predictions_csv(report)?)?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
