use crate::core::pipeline::SUPPORTED_FORMATS;
use crate::core::ConfigProvider;
use crate::utils::error::{BatchError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_output_formats, validate_path,
    Validate,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: JobConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub evaluation: Option<EvaluationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
    pub escaped: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub reference_date: Option<NaiveDate>,
}

const DEFAULT_ARCHIVE_NAME: &str = "drug_codes.zip";

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BatchError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BatchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SCAN_INPUT})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BatchError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("job.name", &self.job.name)?;
        validate_path("input.path", &self.input.path)?;
        validate_path("output.path", &self.output.path)?;
        validate_output_formats("output.formats", &self.output.formats, &SUPPORTED_FORMATS)?;

        if let Some(archive) = self.archive_name() {
            validate_file_extension("output.compression.filename", archive, &["zip"])?;
        }

        Ok(())
    }

    pub fn compression_enabled(&self) -> bool {
        self.output
            .compression
            .as_ref()
            .map(|c| c.enabled)
            .unwrap_or(false)
    }

    /// 命令列覆蓋壓縮設定
    pub fn set_compression(&mut self, enabled: bool) {
        match &mut self.output.compression {
            Some(compression) => compression.enabled = enabled,
            None => {
                self.output.compression = Some(CompressionConfig {
                    enabled,
                    filename: None,
                })
            }
        }
    }

    /// 命令列覆蓋參考日期
    pub fn set_reference_date(&mut self, date: NaiveDate) {
        self.evaluation
            .get_or_insert(EvaluationConfig {
                reference_date: None,
            })
            .reference_date = Some(date);
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn escaped_input(&self) -> bool {
        self.input.escaped.unwrap_or(false)
    }

    fn reference_date(&self) -> Option<NaiveDate> {
        self.evaluation.as_ref().and_then(|e| e.reference_date)
    }

    fn archive_name(&self) -> Option<&str> {
        let compression = self.output.compression.as_ref().filter(|c| c.enabled)?;
        Some(compression.filename.as_deref().unwrap_or(DEFAULT_ARCHIVE_NAME))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[job]
name = "pharmacy-intake"

[input]
path = "scans.txt"
escaped = true

[output]
path = "./scan-output"
formats = ["csv", "json"]
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.job.name, "pharmacy-intake");
        assert_eq!(config.input_path(), "scans.txt");
        assert!(config.escaped_input());
        assert_eq!(config.reference_date(), None);
        assert_eq!(config.archive_name(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_compression_and_reference_date() {
        let toml_content = r#"
[job]
name = "nightly"

[input]
path = "scans.txt"

[output]
path = "./out"
formats = ["tsv"]

[output.compression]
enabled = true

[evaluation]
reference_date = "2024-03-01"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.archive_name(), Some("drug_codes.zip"));
        assert_eq!(config.reference_date(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(!config.escaped_input());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DRUG_CODE_TEST_INPUT", "from-env.txt");

        let toml_content = r#"
[job]
name = "env"

[input]
path = "${DRUG_CODE_TEST_INPUT}"

[output]
path = "${DRUG_CODE_TEST_UNSET_OUTPUT}"
formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.input.path, "from-env.txt");
        assert_eq!(config.output.path, "${DRUG_CODE_TEST_UNSET_OUTPUT}");

        std::env::remove_var("DRUG_CODE_TEST_INPUT");
    }

    #[test]
    fn test_config_validation() {
        let mut config = TomlConfig::from_toml_str(BASIC).unwrap();
        config.output.formats = vec!["xlsx".to_string()];
        assert!(config.validate().is_err());

        let mut config = TomlConfig::from_toml_str(BASIC).unwrap();
        config.output.compression = Some(CompressionConfig {
            enabled: true,
            filename: Some("bundle.tar".to_string()),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = TomlConfig::from_toml_str(BASIC).unwrap();
        config.set_compression(true);
        config.set_reference_date(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());

        assert!(config.compression_enabled());
        assert_eq!(config.archive_name(), Some("drug_codes.zip"));
        assert_eq!(config.reference_date(), NaiveDate::from_ymd_opt(2030, 1, 1));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[job\nname = ").unwrap_err();
        assert!(matches!(err, BatchError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.job.name, "pharmacy-intake");
    }
}
