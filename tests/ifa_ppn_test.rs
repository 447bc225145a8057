use drug_code_parser::core::parser::{EOT, GS, RS};
use drug_code_parser::{parse_ifa_ppn, CheckedCode, FormatError, ParseResult};

fn data_matrix(segments: &[&str]) -> String {
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
fn test_rejects_missing_and_short_input() {
    assert_eq!(parse_ifa_ppn(None), Err(FormatError::TooShort));
    assert_eq!(parse_ifa_ppn(""), Err(FormatError::TooShort));
    assert_eq!(parse_ifa_ppn("ABC"), Err(FormatError::TooShort));
}

#[test]
fn test_rejects_corrupted_prefix() {
    let text = format!("[)){}0000", RS);
    assert_eq!(parse_ifa_ppn(text.as_str()), Err(FormatError::PrefixMismatch));

    let no_separator = "[)>X06\u{1d}S1\u{1e}\u{04}";
    assert_eq!(parse_ifa_ppn(no_separator), Err(FormatError::PrefixMismatch));
}

#[test]
fn test_rejects_wrong_scheme() {
    let text = format!("[)>{}0000", RS);
    assert!(parse_ifa_ppn(text.as_str()).is_err());

    let framed = format!("[)>{}05{}S12345{}{}", RS, GS, RS, EOT);
    assert_eq!(parse_ifa_ppn(framed.as_str()), Err(FormatError::NotIfaPpnScheme));
}

#[test]
fn test_rejects_missing_terminator() {
    let text = format!("[)>{}06{}S12345ABCDEF98765", RS, GS);
    assert_eq!(parse_ifa_ppn(text.as_str()), Err(FormatError::MissingTerminator));
}

#[test]
fn test_serial_number() {
    let result = parse_ifa_ppn(data_matrix(&["S12345ABCDEF98765"]).as_str()).unwrap();
    assert_eq!(result.serial.as_deref(), Some("12345ABCDEF98765"));
}

#[test]
fn test_batch_number() {
    let result = parse_ifa_ppn(data_matrix(&["1T12345ABCD"]).as_str()).unwrap();
    assert_eq!(result.batch.as_deref(), Some("12345ABCD"));
}

#[test]
fn test_ppn_and_embedded_pzn() {
    let result = parse_ifa_ppn(data_matrix(&["9N110375286414"]).as_str()).unwrap();
    assert_eq!(
        result.ppn,
        Some(CheckedCode {
            value: "110375286414".to_string(),
            valid: true,
        })
    );
    assert_eq!(
        result.pzn,
        Some(CheckedCode {
            value: "03752864".to_string(),
            valid: true,
        })
    );
}

#[test]
fn test_ppn_with_bad_checksum_is_data_not_error() {
    let result = parse_ifa_ppn(data_matrix(&["9N110375286415"]).as_str()).unwrap();
    assert!(!result.ppn.unwrap().valid);
    assert!(result.pzn.unwrap().valid);
}

#[test]
fn test_expiration_date() {
    let result = parse_ifa_ppn(data_matrix(&["D150600"]).as_str()).unwrap();
    assert_eq!(result.expiration_date.as_deref(), Some("2015-06"));

    let result = parse_ifa_ppn(data_matrix(&["D150604"]).as_str()).unwrap();
    assert_eq!(result.expiration_date.as_deref(), Some("2015-06-04"));
}

#[test]
fn test_production_date() {
    let result = parse_ifa_ppn(data_matrix(&["16D20151100"]).as_str()).unwrap();
    assert_eq!(result.production_date.as_deref(), Some("2015-11"));

    let result = parse_ifa_ppn(data_matrix(&["16D20151106"]).as_str()).unwrap();
    assert_eq!(result.production_date.as_deref(), Some("2015-11-06"));
    assert_eq!(result.expiration_date, None);
}

#[test]
fn test_gtin() {
    let result = parse_ifa_ppn(data_matrix(&["8P04150047759334"]).as_str()).unwrap();
    assert_eq!(result.gtin.as_deref(), Some("04150047759334"));
}

#[test]
fn test_combined_payload() {
    let text = data_matrix(&[
        "9N110375286414",
        "1T12345ABCD",
        "D150600",
        "S12345ABCDEF98765",
    ]);

    let result = parse_ifa_ppn(text.as_str()).unwrap();

    assert_eq!(
        result,
        ParseResult {
            ppn: Some(CheckedCode {
                value: "110375286414".to_string(),
                valid: true,
            }),
            pzn: Some(CheckedCode {
                value: "03752864".to_string(),
                valid: true,
            }),
            batch: Some("12345ABCD".to_string()),
            expiration_date: Some("2015-06".to_string()),
            production_date: None,
            serial: Some("12345ABCDEF98765".to_string()),
            gtin: None,
        }
    );
}

#[test]
fn test_segment_order_does_not_matter() {
    let forward = data_matrix(&["1T12345ABCD", "16D20151106", "8P04150047759334"]);
    let reversed = data_matrix(&["8P04150047759334", "16D20151106", "1T12345ABCD"]);
    assert_eq!(
        parse_ifa_ppn(forward.as_str()),
        parse_ifa_ppn(reversed.as_str())
    );
}

#[test]
fn test_parsing_twice_gives_equal_results() {
    let text = data_matrix(&["9N110375286414", "D150604", "S1"]);
    let first = parse_ifa_ppn(text.as_str()).unwrap();
    let second = parse_ifa_ppn(text.as_str()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_serializes_with_camel_case_and_omits_absent_fields() {
    let result = parse_ifa_ppn(data_matrix(&["D150604", "9N110375286414"]).as_str()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["expirationDate"], "2015-06-04");
    assert_eq!(json["ppn"]["valid"], true);
    assert_eq!(json["pzn"]["value"], "03752864");
    assert!(json.get("productionDate").is_none());
    assert!(json.get("serial").is_none());
}

#[test]
fn test_parse_from_threads() {
    let text = data_matrix(&["9N110375286414"]);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let text = text.clone();
            std::thread::spawn(move || parse_ifa_ppn(text.as_str()))
        })
        .collect();

    for handle in handles {
        let result = handle.join().unwrap().unwrap();
        assert!(result.checksums_valid());
    }
}
