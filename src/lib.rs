//! IFA PPN 藥品資料矩陣解析與校驗
//!
//! 核心為純函式 [`parse_ifa_ppn`]、[`validate_ppn`]、[`validate_pzn`]；
//! 其餘模組提供批次掃描 (讀檔 → 解析 → CSV/TSV/JSON 輸出)。

pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::toml_config::TomlConfig;

pub use crate::core::checksum::{validate_ppn, validate_pzn};
pub use crate::core::parser::parse_ifa_ppn;
pub use crate::core::{etl::EtlEngine, pipeline::ScanPipeline};
pub use crate::domain::model::{CheckedCode, ParseResult, ScanReport, ScanStatus, ScanSummary};
pub use crate::utils::error::{BatchError, FormatError, Result};
