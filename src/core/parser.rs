//! IFA PPN 資料矩陣內容解析
//!
//! 資料格式：`[)>` RS `06` GS `<區段>` GS `<區段>` ... RS EOT

use std::str::FromStr;

use crate::core::checksum::{validate_ppn, validate_pzn};
use crate::core::dates::{format_expiration_date, format_production_date};
use crate::core::identifier::DataIdentifier;
use crate::domain::model::{CheckedCode, ParseResult};
use crate::utils::error::FormatError;

/// Record Separator (0x1E)
pub const RS: char = '\u{1e}';
/// Group Separator (0x1D)
pub const GS: char = '\u{1d}';
/// End of Transmission (0x04)
pub const EOT: char = '\u{04}';

const HEADER: &str = "[)>\u{1e}";
const TERMINATOR: &str = "\u{1e}\u{04}";
const IFA_PPN_SCHEME: &str = "06";
const MIN_LENGTH: usize = 8;

/// 解析 IFA PPN 資料矩陣文字
///
/// 結構錯誤 (過短、前綴不符、缺少結尾、非 `06` 方案) 回傳 [`FormatError`]；
/// 校驗碼不符不是錯誤，只會反映在 `valid: false`。未知的識別碼直接略過。
pub fn parse_ifa_ppn<'a>(text: impl Into<Option<&'a str>>) -> Result<ParseResult, FormatError> {
    let text = text.into().unwrap_or_default();
    let data = payload(text)?;

    let mut segments = data.split(GS);
    if segments.next() != Some(IFA_PPN_SCHEME) {
        return Err(FormatError::NotIfaPpnScheme);
    }

    let mut result = ParseResult::default();
    for segment in segments {
        apply_segment(&mut result, segment);
    }
    Ok(result)
}

fn payload(text: &str) -> Result<&str, FormatError> {
    if text.chars().count() < MIN_LENGTH {
        return Err(FormatError::TooShort);
    }
    let framed = text
        .strip_prefix(HEADER)
        .ok_or(FormatError::PrefixMismatch)?;
    let end = framed
        .find(TERMINATOR)
        .ok_or(FormatError::MissingTerminator)?;
    Ok(&framed[..end])
}

fn apply_segment(result: &mut ParseResult, segment: &str) {
    match DataIdentifier::split(segment) {
        Some((DataIdentifier::ProductNumber, ppn)) => {
            // PZN 嵌在 PPN 中：去掉前兩碼 ("11") 與最後兩碼校驗值
            let len = ppn.chars().count();
            let pzn = char_range(ppn, 2, len.saturating_sub(2));
            result.ppn = Some(CheckedCode {
                value: ppn.to_string(),
                valid: validate_ppn(ppn),
            });
            result.pzn = Some(CheckedCode {
                value: pzn.to_string(),
                valid: validate_pzn(pzn),
            });
        }
        Some((DataIdentifier::Batch, batch)) => result.batch = Some(batch.to_string()),
        Some((DataIdentifier::ProductionDate, _)) => {
            result.production_date = Some(format_production_date(segment));
        }
        Some((DataIdentifier::ExpirationDate, _)) => {
            result.expiration_date = Some(format_expiration_date(segment));
        }
        Some((DataIdentifier::Serial, serial)) => result.serial = Some(serial.to_string()),
        Some((DataIdentifier::Gtin, gtin)) => result.gtin = Some(gtin.to_string()),
        None => tracing::trace!(segment, "ignoring segment with unknown data identifier"),
    }
}

/// 以字元 (非位元組) 為單位切出 `[start, end)`，超出範圍時截斷
pub(crate) fn char_range(s: &str, start: usize, end: usize) -> &str {
    if end <= start {
        return "";
    }
    let byte_at = |n: usize| {
        s.char_indices()
            .nth(n)
            .map(|(i, _)| i)
            .unwrap_or(s.len())
    };
    &s[byte_at(start)..byte_at(end)]
}

impl FromStr for ParseResult {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_ifa_ppn(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(segments: &[&str]) -> String {
        let mut text = format!("[)>{}06", RS);
        for segment in segments {
            text.push(GS);
            text.push_str(segment);
        }
        text.push(RS);
        text.push(EOT);
        text
    }

    #[test]
    fn test_char_range_clamps() {
        assert_eq!(char_range("D150604", 1, 3), "15");
        assert_eq!(char_range("D15", 3, 5), "");
        assert_eq!(char_range("D150", 3, 5), "0");
        assert_eq!(char_range("äöü", 1, 2), "ö");
        assert_eq!(char_range("abc", 2, 1), "");
    }

    #[test]
    fn test_missing_terminator() {
        let text = format!("[)>{}06{}9N110375286414", RS, GS);
        assert_eq!(parse_ifa_ppn(text.as_str()), Err(FormatError::MissingTerminator));
    }

    #[test]
    fn test_scheme_only_gives_empty_result() {
        let result = parse_ifa_ppn(frame(&[]).as_str()).unwrap();
        assert_eq!(result, ParseResult::default());
    }

    #[test]
    fn test_unknown_segments_are_ignored() {
        let result = parse_ifa_ppn(frame(&["10Q42", "1T12345ABCD", ""]).as_str()).unwrap();
        assert_eq!(result.batch.as_deref(), Some("12345ABCD"));
        assert_eq!(
            result,
            ParseResult {
                batch: Some("12345ABCD".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_duplicate_identifier_last_write_wins() {
        let result = parse_ifa_ppn(frame(&["S111", "S222"]).as_str()).unwrap();
        assert_eq!(result.serial.as_deref(), Some("222"));
    }

    #[test]
    fn test_short_ppn_gives_invalid_codes() {
        let result = parse_ifa_ppn(frame(&["9N123"]).as_str()).unwrap();
        let ppn = result.ppn.unwrap();
        let pzn = result.pzn.unwrap();
        assert_eq!(ppn.value, "123");
        assert!(!ppn.valid);
        assert_eq!(pzn.value, "");
        assert!(!pzn.valid);
    }

    #[test]
    fn test_from_str() {
        let result: ParseResult = frame(&["8P04150047759334"]).parse().unwrap();
        assert_eq!(result.gtin.as_deref(), Some("04150047759334"));
    }
}
