pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use crate::core::pipeline::SUPPORTED_FORMATS;
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{
        validate_file_extension, validate_output_formats, validate_path, Validate,
    };
    use chrono::NaiveDate;
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "drug-code-parser")]
    #[command(about = "Decode and validate IFA PPN data matrix codes from drug packaging")]
    pub struct CliConfig {
        /// File with one scanned payload per line
        #[arg(short, long, default_value = "payloads.txt")]
        pub input: String,

        /// Parse a single payload and print it as JSON instead of running a batch
        #[arg(long)]
        pub payload: Option<String>,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long, value_delimiter = ',', default_value = "csv,json")]
        pub output_formats: Vec<String>,

        /// Input uses <RS>, <GS> and <EOT> tokens instead of raw control characters
        #[arg(long)]
        pub escaped: bool,

        /// Flag products that expire before this date (YYYY-MM-DD)
        #[arg(long)]
        pub reference_date: Option<NaiveDate>,

        /// Bundle all outputs into one zip archive
        #[arg(long, num_args = 0..=1, default_missing_value = "drug_codes.zip")]
        pub zip: Option<String>,

        /// Emit logs as JSON lines
        #[arg(long)]
        pub json_logs: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl ConfigProvider for CliConfig {
        fn input_path(&self) -> &str {
            &self.input
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn escaped_input(&self) -> bool {
            self.escaped
        }

        fn reference_date(&self) -> Option<NaiveDate> {
            self.reference_date
        }

        fn archive_name(&self) -> Option<&str> {
            self.zip.as_deref()
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            // 單筆模式不讀寫檔案
            if self.payload.is_some() {
                return Ok(());
            }

            validate_path("input", &self.input)?;
            validate_path("output_path", &self.output_path)?;
            validate_output_formats("output_formats", &self.output_formats, &SUPPORTED_FORMATS)?;
            if let Some(archive) = &self.zip {
                validate_file_extension("zip", archive, &["zip"])?;
            }
            Ok(())
        }
    }

}
