use clap::Parser;
use drug_code_parser::utils::error::ErrorSeverity;
use drug_code_parser::utils::escape::unescape_control_chars;
use drug_code_parser::utils::{logger, validation::Validate};
use drug_code_parser::{parse_ifa_ppn, CliConfig, EtlEngine, LocalStorage, ScanPipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.verbose, config.json_logs);

    tracing::info!("Starting drug-code-parser CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 單筆模式：直接輸出 JSON
    if let Some(payload) = &config.payload {
        let text = if config.escaped {
            unescape_control_chars(payload)
        } else {
            payload.as_str().into()
        };
        match parse_ifa_ppn(&*text) {
            Ok(result) => {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }
            Err(e) => {
                tracing::error!("❌ {}", e);
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        }
    }

    let storage = LocalStorage::default();
    let pipeline = ScanPipeline::new(storage, config);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            let summary = report.summary;
            tracing::info!("✅ Scan completed successfully!");
            println!(
                "✅ Scanned {} codes: {} valid, {} checksum mismatch, {} rejected, {} expired",
                summary.total,
                summary.valid,
                summary.checksum_mismatch,
                summary.rejected,
                summary.expired
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

            // 根據錯誤嚴重程度決定退出碼
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
