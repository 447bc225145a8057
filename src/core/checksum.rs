//! PPN 與 PZN 的加權校驗碼

const PPN_LENGTH: usize = 12;
const PPN_MODULUS: u32 = 97;
const PZN_MODULUS: u32 = 11;

/// 驗證 12 碼 PPN
///
/// 前 10 個字元以其字元碼 (非數值) 乘上權重 2..=11 累加，
/// 總和 mod 97 必須等於最後兩碼的十進位值。長度不符或未提供時回傳 `false`。
pub fn validate_ppn<'a>(code: impl Into<Option<&'a str>>) -> bool {
    let Some(code) = code.into() else {
        return false;
    };
    let chars: Vec<char> = code.chars().collect();
    if chars.len() != PPN_LENGTH {
        return false;
    }

    let (payload, check) = chars.split_at(PPN_LENGTH - 2);
    let Some(expected) = decimal_value(check) else {
        return false;
    };

    let sum: u32 = payload
        .iter()
        .enumerate()
        .map(|(j, &ch)| (j as u32 + 2) * ch as u32)
        .sum();
    sum % PPN_MODULUS == expected
}

/// 驗證 7 或 8 碼 PZN
///
/// 權重永遠以 9 結尾：8 碼時為 1..=7，7 碼時為 2..=7。
pub fn validate_pzn<'a>(code: impl Into<Option<&'a str>>) -> bool {
    let Some(code) = code.into() else {
        return false;
    };
    let chars: Vec<char> = code.chars().collect();
    let len = chars.len();
    if len != 7 && len != 8 {
        return false;
    }

    let weight_padding = 9 - len as u32;
    let mut sum = 0u32;
    for (j, ch) in chars[..len - 1].iter().enumerate() {
        let Some(digit) = ch.to_digit(10) else {
            return false;
        };
        sum += (j as u32 + weight_padding) * digit;
    }

    match chars[len - 1].to_digit(10) {
        Some(check) => sum % PZN_MODULUS == check,
        None => false,
    }
}

fn decimal_value(chars: &[char]) -> Option<u32> {
    chars
        .iter()
        .try_fold(0u32, |acc, ch| ch.to_digit(10).map(|d| acc * 10 + d))
}
