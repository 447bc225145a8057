use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use drug_code_parser::core::{ConfigProvider, Pipeline};
use drug_code_parser::utils::error::ErrorSeverity;
use drug_code_parser::utils::{logger, validation::Validate};
use drug_code_parser::{EtlEngine, LocalStorage, ScanPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-scan")]
#[command(about = "Batch drug code scanning driven by a TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "drug-codes.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Override the expiry reference date from config (YYYY-MM-DD)
    #[arg(long)]
    reference_date: Option<NaiveDate>,

    /// Override compression setting from config
    #[arg(long)]
    zip: Option<bool>,

    /// Dry run - read and count the payloads without parsing or writing output
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_logger(args.verbose, args.json_logs);

    tracing::info!("🚀 Starting TOML-based drug code scan");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(date) = args.reference_date {
        config.set_reference_date(date);
        tracing::info!("🔧 Reference date overridden to: {}", date);
    }
    if let Some(zip) = args.zip {
        config.set_compression(zip);
        tracing::info!("🔧 Compression overridden to: {}", zip);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    let pipeline = ScanPipeline::new(LocalStorage::default(), config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No parsing or output will occur");
        let inputs = pipeline
            .extract()
            .await
            .context("failed to read the configured input file")?;
        println!("🔍 Dry Run Analysis:");
        println!("  Payloads found: {}", inputs.len());
        if let (Some(first), Some(last)) = (inputs.first(), inputs.last()) {
            println!("  Input lines: {}..={}", first.line, last.line);
        }
        println!();
        println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
        return Ok(());
    }

    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ Scan completed successfully!");
            println!(
                "✅ Scanned {} codes ({} valid, {} rejected)",
                report.summary.total, report.summary.valid, report.summary.rejected
            );
            println!("📁 Output saved to: {}", report.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Scan failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Job: {}", config.job.name);
    if let Some(description) = &config.job.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.input_path());
    println!("  Escaped Input: {}", config.escaped_input());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));

    match config.archive_name() {
        Some(archive) if config.compression_enabled() => {
            println!("  Compression: {} (ZIP)", archive)
        }
        _ => println!("  Compression: disabled"),
    }

    if let Some(date) = config.reference_date() {
        println!("  Expiry Reference Date: {}", date);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
