use anyhow::Context;
use clap::Parser;
use order_history_etl::config::dry_run::first_request_urls;
use order_history_etl::core::ConfigProvider;
use order_history_etl::utils::{logger, validation::Validate};
use order_history_etl::{
    CliConfig, EtlEngine, EtlError, LocalStorage, OrderPipeline, RunReport, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting order-history-etl");

    let outcome = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let mut config = TomlConfig::from_file(path)
                .with_context(|| format!("Failed to load config file '{}'", path))?;

            // 應用命令列覆蓋設定
            config.apply_cli_overrides(&cli);
            execute(config, cli.dry_run).await
        }
        None => execute(cli.clone(), cli.dry_run).await,
    };

    match outcome {
        Ok(None) => {}
        Ok(Some(report)) if report.is_partial() => {
            for failure in &report.failures {
                tracing::warn!("⚠️ Not scraped: {}", failure);
            }
            tracing::warn!(
                "⚠️ DONE with {} failure(s); {} record(s) written",
                report.failures.len(),
                report.records_written
            );
            eprintln!(
                "⚠️ Partial result: {} filter/page(s) failed, see the log above",
                report.failures.len()
            );
            std::process::exit(report.exit_code());
        }
        Ok(Some(report)) => {
            tracing::info!("✅ DONE! {} record(s) written", report.records_written);
            println!("DONE!");
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Scrape failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = e.severity().exit_code();

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

/// 驗證設定並執行；dry run 時回傳 `None`
async fn execute<C>(config: C, dry_run: bool) -> Result<Option<RunReport>, EtlError>
where
    C: ConfigProvider + Validate,
{
    config.validate()?;
    tracing::info!("✅ Configuration validated successfully");

    display_config_summary(&config, dry_run);

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - No request will be sent");
        perform_dry_run(&config)?;
        return Ok(None);
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = OrderPipeline::new(storage, config)?;

    EtlEngine::new(pipeline).run().await.map(Some)
}

fn display_config_summary<C: ConfigProvider>(config: &C, dry_run: bool) {
    println!("📋 Configuration Summary:");
    println!("  Endpoint: {}", config.endpoint());
    println!("  Filters: {}", config.filters().join(", "));
    println!("  Page Size: {}", config.page_size());
    println!("  Concurrent Requests: {}", config.concurrent_requests());
    println!("  On Failure: {:?}", config.failure_policy());
    println!(
        "  Output: {}/{{{}, {}}}",
        config.output_path(),
        config.json_filename(),
        config.csv_filename()
    );

    if dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run<C: ConfigProvider>(config: &C) -> Result<(), EtlError> {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📡 First request per filter:");
    for url in first_request_urls(config)? {
        println!("  {}", url);
    }

    println!();
    println!("🍪 Cookie: {} characters", config.credential().len());
    match config.request_timeout() {
        Some(timeout) => println!("⏱️ Request timeout: {:?}", timeout),
        None => println!("⏱️ Request timeout: none"),
    }

    let headers = config.extra_headers();
    if !headers.is_empty() {
        println!("📨 Extra headers: {}", headers.len());
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
