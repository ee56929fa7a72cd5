use c_destructor::app::dry_run::dry_run_report;
use c_destructor::utils::error::DestructorError;
use c_destructor::utils::{logger, validation::Validate};
use c_destructor::{BatchPipeline, CliConfig, DestructorEngine, JobConfig, LocalStorage};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    logger::init(args.log_file.as_deref(), args.verbose)?;

    tracing::info!("🚀 Starting batch reshape");
    if let Some(path) = &args.config {
        tracing::info!("📁 Loading job from: {}", path);
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    let storage = LocalStorage::new(".");

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        print!("{}", dry_run_report(&storage, &config).await?);
        return Ok(());
    }

    let pipeline = BatchPipeline::new(storage, config);
    let engine = DestructorEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Output file updated: {}", output_path);
            println!("Output file updated: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Batch reshape failed: {} (Category: {:?}, Severity: {:?})",
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

fn load_config(args: &CliConfig) -> Result<JobConfig, DestructorError> {
    let config = args.to_batch_job_config()?;
    config.validate()?;
    Ok(config)
}

fn display_config_summary(config: &JobConfig, args: &CliConfig) {
    println!("📋 Configuration Summary:");
    println!("  Job: {}", config.name());
    println!("  Full struct: {} ({})", config.target.struct_name, config.input.header);
    println!("  View struct: {} ({})", config.target.view, config.input.view_file);
    println!("  Init file: {}", config.input.init_file);
    if let Some(mapping_file) = &config.input.mapping_file {
        println!("  Mapping file: {}", mapping_file);
    }
    if let Some(output) = &config.output.path {
        println!("  Output: {}", output);
    }
    if let Some(specifier) = &config.output.specifier {
        println!("  Specifier: {}", specifier);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
