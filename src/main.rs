use c_destructor::app::dry_run::dry_run_report;
use c_destructor::utils::{logger, validation::Validate};
use c_destructor::{CliConfig, DestructorEngine, LocalStorage, SinglePipeline};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // 初始化日誌
    logger::init(args.log_file.as_deref(), args.verbose)?;

    tracing::info!("Starting c-destructor");
    if args.verbose {
        tracing::debug!("CLI config: {:?}", args);
    }

    // 載入並驗證設定
    let config = match args.to_job_config().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let storage = LocalStorage::new(".");

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        print!("{}", dry_run_report(&storage, &config).await?);
        return Ok(());
    }

    let pipeline = SinglePipeline::new(storage, config).with_var_name(args.var_name.clone());
    let engine = DestructorEngine::new(pipeline);

    match engine.run().await {
        Ok(location) => {
            tracing::info!("✅ Reshape completed, output: {}", location);
        }
        Err(e) => {
            tracing::error!(
                "❌ Reshape failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
