use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::error::FormatError;

/// 帶有校驗結果的代碼 (PPN / PZN)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckedCode {
    pub value: String,
    pub valid: bool,
}

/// 單一 IFA PPN 資料矩陣的解析結果，只填入實際出現的區段
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ppn: Option<CheckedCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pzn: Option<CheckedCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gtin: Option<String>,
}

impl ParseResult {
    /// 所有出現的 PPN/PZN 都通過校驗
    pub fn checksums_valid(&self) -> bool {
        [&self.ppn, &self.pzn]
            .into_iter()
            .flatten()
            .all(|code| code.valid)
    }

    pub fn is_expired(&self, reference: NaiveDate) -> Option<bool> {
        self.expiration_date
            .as_deref()
            .and_then(|date| crate::core::dates::is_expired(date, reference))
    }
}

/// 批次輸入的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanInput {
    pub line: usize,
    pub payload: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Valid,
    ChecksumMismatch,
    Rejected,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Valid => "valid",
            ScanStatus::ChecksumMismatch => "checksum_mismatch",
            ScanStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanRecord {
    pub line: usize,
    pub status: ScanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FormatError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ParseResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub total: usize,
    pub valid: usize,
    pub checksum_mismatch: usize,
    pub rejected: usize,
    pub expired: usize,
}

impl ScanSummary {
    pub fn record(&mut self, record: &ScanRecord) {
        self.total += 1;
        match record.status {
            ScanStatus::Valid => self.valid += 1,
            ScanStatus::ChecksumMismatch => self.checksum_mismatch += 1,
            ScanStatus::Rejected => self.rejected += 1,
        }
        if record.expired == Some(true) {
            self.expired += 1;
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub processed_records: Vec<ScanRecord>,
    pub summary: ScanSummary,
    pub csv_output: String,
    pub tsv_output: String,
}

/// 一次批次執行的結果
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    pub output_path: String,
    pub summary: ScanSummary,
}
