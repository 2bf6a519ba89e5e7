//! Tests for well, row, channel, and sample-id resolution

use crate::app::models::SampleId;
use crate::app::services::block_parser::Mismatch;
use crate::app::services::block_parser::identifiers::{
    extract_channel, is_sample_id, is_sample_label_string, is_valid_row, row_iter,
    split_alpha_and_number, split_well_name, temperature_channel,
};

#[test]
fn test_row_universe_has_99_labels_in_order() {
    let rows: Vec<String> = row_iter().collect();
    assert_eq!(rows.len(), 99);
    assert_eq!(rows[0], "A");
    assert_eq!(rows[25], "Z");
    assert_eq!(rows[26], "AA");
    assert_eq!(rows[51], "AZ");
    assert_eq!(rows[52], "BA");
    assert_eq!(rows.last().map(String::as_str), Some("CU"));
}

#[test]
fn test_is_valid_row() {
    assert!(is_valid_row("A"));
    assert!(is_valid_row("Z"));
    assert!(is_valid_row("AA"));
    assert!(is_valid_row("CU"));
    // CV is the first label past the universe
    assert!(!is_valid_row("CV"));
    assert!(!is_valid_row("a"));
    assert!(!is_valid_row(""));
    assert!(!is_valid_row("AAA"));
}

#[test]
fn test_split_alpha_and_number() {
    assert_eq!(split_alpha_and_number("A1"), Ok(("A", Some(1))));
    assert_eq!(split_alpha_and_number("SPL8"), Ok(("SPL", Some(8))));
    assert_eq!(split_alpha_and_number("BLK"), Ok(("BLK", None)));
    assert_eq!(split_alpha_and_number("1A"), Err(Mismatch));
    assert_eq!(split_alpha_and_number("A 1"), Err(Mismatch));
    assert_eq!(split_alpha_and_number("A1B"), Err(Mismatch));
    assert_eq!(split_alpha_and_number(""), Err(Mismatch));
}

#[test]
fn test_split_well_name() {
    assert_eq!(split_well_name("A1"), Ok(("A", 1)));
    assert_eq!(split_well_name("AA12"), Ok(("AA", 12)));
    assert_eq!(split_well_name("CU384"), Ok(("CU", 384)));
}

#[test]
fn test_split_well_name_rejects_non_wells() {
    // zero column
    assert_eq!(split_well_name("A0"), Err(Mismatch));
    // no column at all
    assert_eq!(split_well_name("A"), Err(Mismatch));
    // alphabetic part outside the row universe
    assert_eq!(split_well_name("CV1"), Err(Mismatch));
    assert_eq!(split_well_name("SPL8"), Err(Mismatch));
    assert_eq!(split_well_name("1A"), Err(Mismatch));
}

#[test]
fn test_extract_channel() {
    let known = vec!["OD:600".to_string(), "485,528".to_string()];
    assert_eq!(
        extract_channel("Max V [OD:600]", &known),
        Ok(("Max V".to_string(), "OD:600".to_string()))
    );
    assert_eq!(
        extract_channel("Mean [485,528]", &known),
        Ok(("Mean".to_string(), "485,528".to_string()))
    );
}

#[test]
fn test_extract_channel_strips_spectrum_suffix() {
    let known = vec!["OD:600".to_string()];
    assert_eq!(
        extract_channel("Peak [OD:600:Spectrum]", &known),
        Ok(("Peak".to_string(), "OD:600".to_string()))
    );
}

#[test]
fn test_extract_channel_requires_known_channel() {
    let known = vec!["OD:600".to_string()];
    assert_eq!(extract_channel("Max V [YFP]", &known), Err(Mismatch));
    assert_eq!(extract_channel("Max V OD:600", &known), Err(Mismatch));
    assert_eq!(extract_channel("[OD:600]", &known), Err(Mismatch));
}

#[test]
fn test_temperature_channel() {
    assert_eq!(temperature_channel("T\u{b0} OD:600"), Ok("OD:600"));
    assert_eq!(temperature_channel("T OD:600"), Ok("OD:600"));
    assert_eq!(temperature_channel("T\u{b0} "), Err(Mismatch));
    assert_eq!(temperature_channel("Temp OD:600"), Err(Mismatch));
}

#[test]
fn test_sample_label_strings() {
    assert!(is_sample_label_string("SPL8"));
    assert!(is_sample_label_string("BLK"));
    // CV is not a row label, so CV1 reads as a sample
    assert!(is_sample_label_string("CV1"));
    // well coordinates are not sample labels
    assert!(!is_sample_label_string("A1"));
    assert!(!is_sample_label_string("CU1"));
    assert!(!is_sample_label_string("8SPL"));
    assert!(!is_sample_label_string(""));
    // a bare row letter has no column, so it still reads as a label
    assert!(is_sample_label_string("A"));
}

#[test]
fn test_is_sample_id() {
    assert!(is_sample_id(&SampleId::new("SPL8", Some(1.5))));
    assert!(!is_sample_id(&SampleId::new("A1", None)));
}
