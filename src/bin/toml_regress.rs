use clap::Parser;
use price_regression::config::toml_config::{SplitConfig, TomlConfig};
use price_regression::core::report::{COEFFICIENTS_CSV, PREDICTIONS_CSV, REPORT_ARCHIVE, REPORT_JSON};
use price_regression::core::ConfigProvider;
use price_regression::utils::validation::{is_remote_source, Validate};
use price_regression::utils::logger;
use price_regression::{ExperimentEngine, LocalStorage, RegressionPipeline};

#[derive(Parser)]
#[command(name = "toml-regress")]
#[command(about = "Price regression driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "regression-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the random seed of the train/test split
    #[arg(long)]
    random_state: Option<u64>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置 (日誌格式也由配置決定)
    let loaded = TomlConfig::from_file(&args.config);
    let json_logs = loaded.as_ref().map(|c| c.json_logs()).unwrap_or(false);
    logger::init_logger(args.verbose, json_logs);

    tracing::info!("🚀 Starting TOML-based regression tool");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(seed) = args.random_state {
        let split = config.split.get_or_insert(SplitConfig {
            test_size: None,
            random_state: None,
        });
        split.random_state = Some(seed);
        tracing::info!("🔧 Random state overridden to: {}", seed);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.severity().exit_code());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config)?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = RegressionPipeline::new(storage, config);
    let engine = ExperimentEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(outcome) => {
            let report = &outcome.report;
            println!("🎯 Selected: {}", report.selection.selected.join(", "));
            for (name, value) in report.metrics.entries() {
                println!("{}: {}", name, value);
            }
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

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    match &config.experiment.version {
        Some(version) => println!("  Experiment: {} v{}", config.experiment.name, version),
        None => println!("  Experiment: {}", config.experiment.name),
    }
    if let Some(description) = &config.experiment.description {
        println!("  Description: {}", description);
    }
    println!("  Source: {}", config.data_source());
    println!("  Target: {}", config.target());
    println!("  Output: {}", config.output_path());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) -> price_regression::Result<()> {
    println!("🔍 Dry Run Analysis:");
    println!();

    let format = config.csv_format()?;
    println!("📡 Data Source Analysis:");
    println!("  Path: {}", config.data_source());
    if is_remote_source(config.data_source()) {
        println!("  Kind: remote (HTTP GET)");
        if let Some(timeout) = config.download_timeout() {
            println!("  Timeout: {:?}", timeout);
        }
    } else {
        println!("  Kind: local file");
    }
    println!(
        "  Delimiter: '{}'  Decimal: '{}'",
        format.delimiter as char, format.decimal
    );
    if config.drop_columns().is_empty() {
        println!("  Dropped columns: none");
    } else {
        println!("  Dropped columns: {}", config.drop_columns().join(", "));
    }

    let params = config.selection_params();
    println!();
    println!("⚙️ Feature Selection (LassoCV):");
    println!("  Folds: {}", params.cv_folds);
    println!("  Penalty grid: {} values, eps = {}", params.n_alphas, params.eps);
    println!("  Max iterations: {}, tol = {}", params.max_iter, params.tol);

    let split = config.split_settings();
    println!();
    println!("✂️ Train/Test Split:");
    println!("  Test size: {}", split.test_size);
    println!("  Random state: {}", split.random_state);

    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    println!(
        "  Archive: {} ({}, {}, {})",
        REPORT_ARCHIVE, REPORT_JSON, COEFFICIENTS_CSV, PREDICTIONS_CSV
    );

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
    Ok(())
}
