use crate::core::parser::parse_ifa_ppn;
use crate::core::{ConfigProvider, Pipeline, ScanInput, Storage, TransformResult};
use crate::domain::model::{ScanRecord, ScanStatus, ScanSummary};
use crate::utils::error::{BatchError, Result};
use crate::utils::escape::{escape_control_chars, unescape_control_chars};
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const OUTPUT_BASENAME: &str = "drug_codes";
pub const SUPPORTED_FORMATS: [&str; 3] = ["csv", "tsv", "json"];

const COLUMNS: [&str; 13] = [
    "line",
    "status",
    "error",
    "ppn",
    "ppn_valid",
    "pzn",
    "pzn_valid",
    "batch",
    "expiration_date",
    "production_date",
    "serial",
    "gtin",
    "expired",
];

/// 批次掃描管道：讀取條碼內容檔 → 逐行解析 → 輸出 CSV/TSV/JSON
pub struct ScanPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ScanPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn output_file(&self, name: &str) -> String {
        format!("{}/{}", self.config.output_path().trim_end_matches('/'), name)
    }
}

/// 解析單筆輸入並分類
pub fn scan(input: &ScanInput, reference_date: Option<NaiveDate>) -> ScanRecord {
    match parse_ifa_ppn(input.payload.as_str()) {
        Ok(code) => {
            let status = if code.checksums_valid() {
                ScanStatus::Valid
            } else {
                tracing::warn!(line = input.line, "Checksum mismatch in drug code");
                ScanStatus::ChecksumMismatch
            };
            let expired = reference_date.and_then(|date| code.is_expired(date));
            ScanRecord {
                line: input.line,
                status,
                error: None,
                code: Some(code),
                expired,
            }
        }
        Err(e) => {
            tracing::warn!(
                line = input.line,
                payload = %escape_control_chars(&input.payload),
                "Rejected drug code: {}",
                e.reason()
            );
            ScanRecord {
                line: input.line,
                status: ScanStatus::Rejected,
                error: Some(e),
                code: None,
                expired: None,
            }
        }
    }
}

#[derive(Serialize)]
struct ScanRow<'a> {
    line: usize,
    status: &'static str,
    error: Option<&'static str>,
    ppn: Option<&'a str>,
    ppn_valid: Option<bool>,
    pzn: Option<&'a str>,
    pzn_valid: Option<bool>,
    batch: Option<&'a str>,
    expiration_date: Option<&'a str>,
    production_date: Option<&'a str>,
    serial: Option<&'a str>,
    gtin: Option<&'a str>,
    expired: Option<bool>,
}

impl<'a> From<&'a ScanRecord> for ScanRow<'a> {
    fn from(record: &'a ScanRecord) -> Self {
        let code = record.code.as_ref();
        ScanRow {
            line: record.line,
            status: record.status.as_str(),
            error: record.error.map(|e| e.reason()),
            ppn: code.and_then(|c| c.ppn.as_ref()).map(|p| p.value.as_str()),
            ppn_valid: code.and_then(|c| c.ppn.as_ref()).map(|p| p.valid),
            pzn: code.and_then(|c| c.pzn.as_ref()).map(|p| p.value.as_str()),
            pzn_valid: code.and_then(|c| c.pzn.as_ref()).map(|p| p.valid),
            batch: code.and_then(|c| c.batch.as_deref()),
            expiration_date: code.and_then(|c| c.expiration_date.as_deref()),
            production_date: code.and_then(|c| c.production_date.as_deref()),
            serial: code.and_then(|c| c.serial.as_deref()),
            gtin: code.and_then(|c| c.gtin.as_deref()),
            expired: record.expired,
        }
    }
}

fn render_table(records: &[ScanRecord], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(Vec::new());

    // 沒有資料時也要輸出表頭
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(ScanRow::from(record))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| BatchError::ProcessingError {
            message: format!("Failed to flush table output: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| BatchError::ProcessingError {
        message: format!("Table output is not valid UTF-8: {}", e),
    })
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a ScanSummary,
    records: &'a [ScanRecord],
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ScanPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<ScanInput>> {
        let path = self.config.input_path();
        tracing::debug!("Reading drug code payloads from: {}", path);

        let bytes = self.storage.read_file(path).await?;
        let content = String::from_utf8(bytes).map_err(|e| BatchError::ProcessingError {
            message: format!("Input file '{}' is not valid UTF-8: {}", path, e),
        })?;

        let escaped = self.config.escaped_input();
        let inputs: Vec<ScanInput> = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| ScanInput {
                line: index + 1,
                payload: if escaped {
                    unescape_control_chars(line).into_owned()
                } else {
                    line.to_string()
                },
            })
            .collect();

        tracing::debug!("Read {} payloads", inputs.len());
        Ok(inputs)
    }

    async fn transform(&self, data: Vec<ScanInput>) -> Result<TransformResult> {
        let reference_date = self.config.reference_date();
        if let Some(date) = reference_date {
            tracing::debug!("Evaluating expiry against {}", date);
        }

        let mut summary = ScanSummary::default();
        let mut processed_records = Vec::with_capacity(data.len());
        for input in &data {
            let record = scan(input, reference_date);
            summary.record(&record);
            processed_records.push(record);
        }

        tracing::info!(
            total = summary.total,
            valid = summary.valid,
            checksum_mismatch = summary.checksum_mismatch,
            rejected = summary.rejected,
            expired = summary.expired,
            "Scanned drug codes"
        );

        Ok(TransformResult {
            csv_output: render_table(&processed_records, b',')?,
            tsv_output: render_table(&processed_records, b'\t')?,
            processed_records,
            summary,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let mut files: Vec<(String, Vec<u8>)> = Vec::new();
        for format in self.config.output_formats() {
            let data = match format.as_str() {
                "csv" => result.csv_output.as_bytes().to_vec(),
                "tsv" => result.tsv_output.as_bytes().to_vec(),
                "json" => serde_json::to_vec_pretty(&JsonReport {
                    summary: &result.summary,
                    records: &result.processed_records,
                })?,
                other => {
                    return Err(BatchError::InvalidConfigValueError {
                        field: "output_formats".to_string(),
                        value: other.to_string(),
                        reason: format!(
                            "Unsupported format. Valid formats: {}",
                            SUPPORTED_FORMATS.join(", ")
                        ),
                    })
                }
            };
            files.push((format!("{}.{}", OUTPUT_BASENAME, format), data));
        }

        let Some(archive_name) = self.config.archive_name() else {
            for (name, data) in &files {
                let path = self.output_file(name);
                tracing::debug!("Writing {} ({} bytes)", path, data.len());
                self.storage.write_file(&path, data).await?;
            }
            return Ok(self.config.output_path().to_string());
        };

        tracing::debug!("Creating ZIP file with {} files", files.len());
        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for (name, data) in &files {
                zip.start_file(name.as_str(), SimpleFileOptions::default())?;
                zip.write_all(data)?;
            }
            zip.finish()?.into_inner()
        };

        let archive_path = self.output_file(archive_name);
        tracing::debug!("Writing ZIP file ({} bytes) to {}", zip_data.len(), archive_path);
        self.storage.write_file(&archive_path, &zip_data).await?;
        Ok(archive_path)
    }
}
