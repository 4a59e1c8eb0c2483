use clap::Parser;
use price_regression::core::RegressionReport;
use price_regression::utils::{logger, validation::Validate};
use price_regression::{CliConfig, ExperimentEngine, LocalStorage, RegressionPipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.verbose, config.json_logs);

    tracing::info!("Starting price-regression CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.severity().exit_code());
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = RegressionPipeline::new(storage, config);
    let engine = ExperimentEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(outcome) => {
            print_report(&outcome.report);
            tracing::info!("✅ Regression completed successfully!");
            println!("📁 Report saved to: {}", outcome.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Regression failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn print_report(report: &RegressionReport) {
    println!("Selected columns ({}):", report.selection.selected.len());
    for name in &report.selection.selected {
        println!("  {}", name);
    }
    println!();

    println!("Intercept: {:.6}", report.model.intercept);
    println!("Coefficients:");
    for coefficient in &report.model.coefficients {
        println!("  {:<24} {:.6}", coefficient.feature, coefficient.value);
    }
    println!();

    for (name, value) in report.metrics.entries() {
        println!("{}: {}", name, value);
    }
}
