use anyhow::Result;
use httpmock::prelude::*;
use price_regression::core::report::{COEFFICIENTS_CSV, PREDICTIONS_CSV, REPORT_ARCHIVE, REPORT_JSON};
use price_regression::utils::error::ErrorSeverity;
use price_regression::utils::validation::Validate;
use price_regression::{
    CliConfig, ExperimentEngine, LocalStorage, RegressionError, RegressionPipeline, TomlConfig,
};
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

/// 車價資料：`;` 分隔、`,` 小數點，price 由 enginesize 與 horsepower 決定
fn car_csv(rows: usize) -> String {
    let mut csv = String::from("idCar;carname;enginesize;horsepower;peakrpm;price\n");
    for i in 0..rows {
        let engine = 60.0 + (i * 37 % 200) as f64 + 0.25 * (i % 4) as f64;
        let hp = 50.0 + (i * 53 % 150) as f64;
        let rpm = 4000.0 + (i * 7 % 11) as f64 * 100.0;
        let wobble = (i % 5) as f64 - 2.0;
        let price = 120.0 * engine + 35.0 * hp + 500.0 + wobble;

        csv.push_str(&format!(
            "{};car {};{};{};{};{}\n",
            i + 1,
            i,
            format!("{:.2}", engine).replace('.', ","),
            hp,
            rpm,
            format!("{:.2}", price).replace('.', ",")
        ));
    }
    csv
}

fn cli_config(data: String, output_path: String) -> CliConfig {
    CliConfig {
        data,
        target: "price".to_string(),
        drop_columns: vec!["carname".to_string(), "idCar".to_string()],
        delimiter: ';',
        decimal: ',',
        test_size: 0.1,
        random_state: 42,
        cv_folds: 5,
        n_alphas: 100,
        eps: 1e-3,
        max_iter: 1000,
        tol: 1e-4,
        output_path,
        verbose: false,
        monitor: false,
        json_logs: false,
    }
}

fn read_entry(archive_path: &Path, name: &str) -> Result<String> {
    let file = std::fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut content = String::new();
    archive.by_name(name)?.read_to_string(&mut content)?;
    Ok(content)
}

#[tokio::test]
async fn test_end_to_end_regression_from_local_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data_path = temp_dir.path().join("CarPrice.csv");
    std::fs::write(&data_path, car_csv(120))?;
    let output_path = temp_dir.path().join("output").to_str().unwrap().to_string();

    let config = cli_config(data_path.to_str().unwrap().to_string(), output_path.clone());
    config.validate()?;

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = RegressionPipeline::new(storage, config);
    let engine = ExperimentEngine::new(pipeline);

    let outcome = engine.run().await?;
    let report = &outcome.report;

    assert_eq!(outcome.output_path, format!("{}/{}", output_path, REPORT_ARCHIVE));
    assert_eq!(report.n_samples, 120);
    assert_eq!(report.n_features, 3);
    assert_eq!(report.n_test, 12);
    assert_eq!(report.n_train, 108);
    assert!(report.selection.selected.contains(&"enginesize".to_string()));
    assert!(report.selection.selected.contains(&"horsepower".to_string()));
    assert!(report.metrics.r_squared > 0.99);
    assert!(report.metrics.mean_absolute_percentage_error < 0.01);

    let archive_path = Path::new(&output_path).join(REPORT_ARCHIVE);
    assert!(archive_path.exists());

    let json: serde_json::Value = serde_json::from_str(&read_entry(&archive_path, REPORT_JSON)?)?;
    for key in [
        "Mean Absolute Error",
        "Mean Absolute Percentage Error",
        "Mean Squared Error",
        "R-squared",
    ] {
        assert!(json["metrics"][key].is_number(), "missing metric {}", key);
    }
    assert_eq!(json["target"], "price");

    let coefficients = read_entry(&archive_path, COEFFICIENTS_CSV)?;
    let lines: Vec<&str> = coefficients.lines().collect();
    assert_eq!(lines[0], "feature,lasso_coefficient,selected,ols_coefficient");
    assert!(lines[1].starts_with("enginesize,"));
    assert!(lines[2].starts_with("horsepower,"));
    assert!(lines[3].starts_with("peakrpm,"));
    assert!(lines[4].starts_with("(intercept),"));

    let predictions = read_entry(&archive_path, PREDICTIONS_CSV)?;
    assert_eq!(predictions.lines().count(), 1 + 12);

    Ok(())
}

#[tokio::test]
async fn test_same_seed_reproduces_split() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data_path = temp_dir.path().join("CarPrice.csv");
    std::fs::write(&data_path, car_csv(80))?;
    let source = data_path.to_str().unwrap().to_string();

    let mut rows = Vec::new();
    for run in ["a", "b"] {
        let output_path = temp_dir.path().join(run).to_str().unwrap().to_string();
        let pipeline = RegressionPipeline::new(
            LocalStorage::new(output_path.clone()),
            cli_config(source.clone(), output_path),
        );
        let outcome = ExperimentEngine::new(pipeline).run().await?;
        rows.push(
            outcome
                .report
                .predictions
                .iter()
                .map(|p| p.row)
                .collect::<Vec<_>>(),
        );
    }

    assert_eq!(rows[0], rows[1]);
    Ok(())
}

#[tokio::test]
async fn test_regression_with_remote_dataset() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let csv_mock = server.mock(|when, then| {
        when.method(GET).path("/datasets/CarPrice.csv");
        then.status(200)
            .header("Content-Type", "text/csv")
            .body(car_csv(60));
    });

    let config = cli_config(server.url("/datasets/CarPrice.csv"), output_path.clone());
    let pipeline = RegressionPipeline::new(LocalStorage::new(output_path.clone()), config);
    let outcome = ExperimentEngine::new_with_monitoring(pipeline, true).run().await?;

    csv_mock.assert();
    assert_eq!(outcome.report.n_samples, 60);
    assert_eq!(outcome.report.n_test, 6);
    assert!(Path::new(&output_path).join(REPORT_ARCHIVE).exists());

    Ok(())
}

#[tokio::test]
async fn test_remote_not_found_is_download_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let missing = server.mock(|when, then| {
        when.method(GET).path("/missing.csv");
        then.status(404);
    });

    let config = cli_config(server.url("/missing.csv"), output_path.clone());
    let pipeline = RegressionPipeline::new(LocalStorage::new(output_path.clone()), config);
    let err = ExperimentEngine::new(pipeline)
        .run()
        .await
        .expect_err("a 404 must fail the run");

    missing.assert();
    assert!(matches!(err, RegressionError::DownloadError(_)));
    assert_eq!(err.severity(), ErrorSeverity::Medium);
    assert!(!Path::new(&output_path).join(REPORT_ARCHIVE).exists());

    Ok(())
}

#[tokio::test]
async fn test_missing_target_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data_path = temp_dir.path().join("CarPrice.csv");
    std::fs::write(&data_path, car_csv(30).replace(";price\n", ";cost\n"))?;
    let output_path = temp_dir.path().join("output").to_str().unwrap().to_string();

    let config = cli_config(data_path.to_str().unwrap().to_string(), output_path.clone());
    let pipeline = RegressionPipeline::new(LocalStorage::new(output_path.clone()), config);
    let err = ExperimentEngine::new(pipeline)
        .run()
        .await
        .expect_err("the target column is absent");

    assert!(matches!(err, RegressionError::ColumnNotFound { ref column } if column == "price"));
    assert!(!Path::new(&output_path).exists());

    Ok(())
}

#[tokio::test]
async fn test_toml_configured_regression() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data_path = temp_dir.path().join("cars.csv");
    // 逗號分隔、點小數點
    let csv = car_csv(100).replace(',', ".").replace(';', ",");
    std::fs::write(&data_path, csv)?;

    let output_path = temp_dir.path().join("reports");
    let config_content = format!(
        r#"
[experiment]
name = "toml-cars"
version = "1.0.0"

[source]
path = "{}"
delimiter = ","
decimal = "."
drop_columns = ["idCar", "carname"]

[model]
target = "price"
cv_folds = 4
n_alphas = 30

[split]
test_size = 0.2
random_state = 7

[load]
output_path = "{}"
"#,
        data_path.to_str().unwrap().replace('\\', "/"),
        output_path.to_str().unwrap().replace('\\', "/")
    );
    let config_path = temp_dir.path().join("regression-config.toml");
    std::fs::write(&config_path, config_content)?;

    let config = TomlConfig::from_file(&config_path)?;
    config.validate()?;

    let storage = LocalStorage::new(config.load.output_path.clone());
    let pipeline = RegressionPipeline::new(storage, config);
    let outcome = ExperimentEngine::new(pipeline).run().await?;

    assert_eq!(outcome.report.experiment, "toml-cars");
    assert_eq!(outcome.report.n_test, 20);
    assert_eq!(outcome.report.selection.cv_folds, 4);
    assert_eq!(outcome.report.selection.alphas.len(), 30);
    assert_eq!(outcome.report.split.random_state, 7);
    assert!(outcome.report.metrics.r_squared > 0.99);
    assert!(output_path.join(REPORT_ARCHIVE).exists());

    Ok(())
}
