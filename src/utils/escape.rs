use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

use crate::core::parser::{EOT, GS, RS};

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(r"(?i)<(RS|GS|EOT)>").expect("control token pattern is a valid regex")
    })
}

/// 將 `<RS>`、`<GS>`、`<EOT>` 標記換成對應的控制字元
///
/// 掃描器匯出的文字檔常無法保留原始控制字元，因此批次輸入允許以標記代替。
pub fn unescape_control_chars(line: &str) -> Cow<'_, str> {
    token_regex().replace_all(line, |caps: &Captures| {
        match caps[1].to_ascii_uppercase().as_str() {
            "RS" => RS.to_string(),
            "GS" => GS.to_string(),
            _ => EOT.to_string(),
        }
    })
}

/// 反向操作，用於日誌與報表中顯示原始內容
pub fn escape_control_chars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            RS => out.push_str("<RS>"),
            GS => out.push_str("<GS>"),
            EOT => out.push_str("<EOT>"),
            other => out.push(other),
        }
    }
    out
}
