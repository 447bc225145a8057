use chrono::{Months, NaiveDate};

use crate::core::parser::char_range;

/// `D` 區段：YYMMDD，年份補上 `20`
pub fn format_expiration_date(segment: &str) -> String {
    let year = format!("20{}", char_range(segment, 1, 3));
    compose_date(
        &year,
        char_range(segment, 3, 5),
        char_range(segment, 5, 7),
    )
}

/// `16D` 區段：YYYYMMDD
pub fn format_production_date(segment: &str) -> String {
    compose_date(
        char_range(segment, 3, 7),
        char_range(segment, 7, 9),
        char_range(segment, 9, 11),
    )
}

// 日為 "00" 表示只標示到月份；年、月照原樣帶出，不補齊截斷的區段
fn compose_date(year: &str, month: &str, day: &str) -> String {
    let mut date = format!("{}-{}", year, month);
    if day.chars().count() == 2 && day != "00" {
        date.push('-');
        date.push_str(day);
    }
    date
}

/// 將 `YYYY-MM` 或 `YYYY-MM-DD` 轉成具體日期
///
/// 只有月份時取該月最後一天，與包裝上「有效至月底」的慣例一致。
pub fn resolve_date(date: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = date.split('-').collect();
    let numbers = parts
        .iter()
        .map(|p| parse_digits(p))
        .collect::<Option<Vec<u32>>>()?;

    match numbers.as_slice() {
        [year, month] => {
            let first = NaiveDate::from_ymd_opt(*year as i32, *month, 1)?;
            first.checked_add_months(Months::new(1))?.pred_opt()
        }
        [year, month, day] => NaiveDate::from_ymd_opt(*year as i32, *month, *day),
        _ => None,
    }
}

/// 有效日期早於參考日期即視為過期；無法解析的日期回傳 `None`
pub fn is_expired(expiration_date: &str, reference: NaiveDate) -> Option<bool> {
    resolve_date(expiration_date).map(|expires| expires < reference)
}

fn parse_digits(part: &str) -> Option<u32> {
    if part.is_empty() || part.len() > 4 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}
