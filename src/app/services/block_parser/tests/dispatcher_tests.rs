//! End-to-end tests for the grammar dispatcher
//!
//! These drive `parse_str` over complete export texts and check the
//! resulting document: plate splitting, channel discovery, result tables,
//! diagnostics, and the fatal no-grammar-matches path.

use super::{kinetic_columnwise_block, kinetic_rowwise_block, layout_block, parse};
use crate::app::models::Diagnostic;
use crate::{Error, QueryResult, Value};

#[test]
fn test_metadata_then_kinetic_block() {
    let text = format!(
        "Software Version\t3.02.1\n\n{}",
        kinetic_rowwise_block()
    );
    let document = parse(&text).unwrap();
    assert_eq!(document.len(), 1);

    let plate = &document[0];
    assert_eq!(plate.channels(), &["OD:600".to_string()]);
    assert_eq!(plate.times("OD:600"), &[30.0, 60.0, 90.0]);
    assert_eq!(plate.software_version(), Some(&[3, 2, 1][..]));

    let series = plate.get("A1").unwrap().one().unwrap().as_series().unwrap();
    assert_eq!(series, &[0.101, 0.202, 0.303]);
}

#[test]
fn test_column_and_row_orientations_agree() {
    let rowwise = parse(&format!("Plate Number\tPlate 1\n\n{}", kinetic_rowwise_block()))
        .unwrap();
    let columnwise = parse(&format!(
        "Plate Number\tPlate 1\n\n{}",
        kinetic_columnwise_block()
    ))
    .unwrap();
    assert_eq!(
        rowwise[0].get(("A", 2, "OD:600")).unwrap().one(),
        columnwise[0].get(("A", 2, "OD:600")).unwrap().one()
    );
    assert_eq!(rowwise[0].temperatures("OD:600"), &[23.5, 23.6, 23.7]);
}

#[test]
fn test_duplicate_metadata_key_starts_new_plate() {
    let text = format!(
        "Plate Number\tPlate 1\n\n{}\nPlate Number\tPlate 2\n\n{}",
        kinetic_rowwise_block(),
        kinetic_rowwise_block()
    );
    let document = parse(&text).unwrap();
    assert_eq!(document.len(), 2);

    // each plate holds only its own data, and the triggering block is kept
    for (index, plate) in document.plates().iter().enumerate() {
        let name = format!("Plate {}", index + 1);
        assert_eq!(
            plate.metadata("Plate Number").and_then(|v| v.as_text()),
            Some(name.as_str())
        );
        assert_eq!(plate.times("OD:600").len(), 3);
    }
}

#[test]
fn test_restarted_time_axis_starts_new_plate() {
    let text = format!(
        "{}\n{}",
        kinetic_rowwise_block(),
        kinetic_rowwise_block()
    );
    let document = parse(&text).unwrap();
    assert_eq!(document.len(), 2);
    assert_eq!(document[0].times("OD:600"), document[1].times("OD:600"));
}

#[test]
fn test_repeated_date_splits_after_datetime_fold() {
    let text = [
        "Date\t7/23/2020",
        "Time\t5:40:07 PM",
        "",
        "Date\t7/24/2020",
        "",
    ]
    .join("\n");
    let document = parse(&text).unwrap();
    assert_eq!(document.len(), 2);
    assert!(document[0].datetime().is_some());
    assert_eq!(
        document[1].metadata("Date").unwrap().as_text(),
        Some("7/24/2020")
    );
}

#[test]
fn test_exempt_temperature_keys_do_not_split() {
    let text = [
        "Plate Number\tPlate 1",
        "Actual Temperature\t23.4",
        "",
        "Actual Temperature\t24.1",
        "",
        "OD:600",
        "",
        "\t1",
        "A\t0.5",
        "",
    ]
    .join("\n");
    let document = parse(&text).unwrap();
    assert_eq!(document.len(), 1);
    assert_eq!(document[0].temperature_range(), Some((23.4, 24.1)));
}

#[test]
fn test_results_matrix_populates_result_table() {
    let text = format!(
        "{}\nMax V [OD:600]\n\n\t1\t2\nA\t0.9\t1.1\n",
        kinetic_rowwise_block()
    );
    let document = parse(&text).unwrap();
    assert_eq!(document.len(), 1);

    let plate = &document[0];
    assert_eq!(plate.result_names(), &["Max V".to_string()]);
    let table = plate.results("Max V").unwrap();
    assert_eq!(table.get("A", 1, "OD:600"), Some(&Value::Single(0.9)));
    // the raw kinetic series is untouched
    assert_eq!(
        plate.raw().get("A", 1, "OD:600").unwrap().as_series().unwrap().len(),
        3
    );
}

#[test]
fn test_layout_enables_sample_id_lookup() {
    let text = format!("{}\n{}", layout_block(), kinetic_rowwise_block());
    let document = parse(&text).unwrap();
    let plate = &document[0];

    match plate.get(("SPL1", "OD:600")).unwrap() {
        QueryResult::Many(values) => {
            assert_eq!(values.len(), 2);
            assert_eq!(
                values[0],
                plate.get(("A", 1, "OD:600")).unwrap().one().unwrap()
            );
        }
        other => panic!("unexpected lookup result: {other:?}"),
    }
}

#[test]
fn test_procedure_and_gains_blocks() {
    let text = [
        "Procedure Details",
        "",
        "Read\tOD:600",
        "\tKinetic 03:00:00",
        "",
        "Gain Values",
        "OD:600\t35",
        "",
        "OD:600",
        "",
        "\t1",
        "A\t0.5",
        "",
    ]
    .join("\n");
    let document = parse(&text).unwrap();
    let plate = &document[0];
    assert_eq!(
        plate.metadata("procedure").and_then(|v| v.as_text()),
        Some("Read\tOD:600\n\tKinetic 03:00:00")
    );
    assert_eq!(plate.gain("OD:600"), Some(35.0));
}

#[test]
fn test_indexed_reads_accumulate_series() {
    let text = [
        "Time 1 (0:00:00)\tT\u{b0} OD:600\t23.8",
        "Time 1 (0:00:00)\t1",
        "A\t0",
        "",
        "Time 2 (0:03:00)\tT\u{b0} OD:600\t23.9",
        "Time 2 (0:03:00)\t1",
        "A\t0.101",
        "",
        "Time 3 (0:06:00)\tT\u{b0} OD:600\t24.0",
        "Time 3 (0:06:00)\t1",
        "A\t0.202",
        "",
    ]
    .join("\n");
    let document = parse(&text).unwrap();
    assert_eq!(document.len(), 1);

    let plate = &document[0];
    // the zero-valued time-0 read was discarded with a diagnostic
    assert_eq!(plate.times("OD:600"), &[180.0, 360.0]);
    assert_eq!(
        document.diagnostics(),
        &[Diagnostic::DiscardedPlaceholderRead {
            channel: "OD:600".to_string()
        }]
    );
    let series = plate.get("A1").unwrap().one().unwrap().as_series().unwrap();
    assert_eq!(series, &[0.101, 0.202]);
}

#[test]
fn test_truncation_diagnostic_reaches_document() {
    let text = [
        "OD:600",
        "",
        "Time\tA1",
        "0:00:30\t0.1",
        "0:01:00\t0.2",
        "0:00:00\t0.0",
        "",
    ]
    .join("\n");
    let document = parse(&text).unwrap();
    assert_eq!(document[0].times("OD:600"), &[30.0, 60.0]);
    assert_eq!(
        document.diagnostics(),
        &[Diagnostic::TruncatedTrailingZeroTime {
            channel: "OD:600".to_string()
        }]
    );
}

#[test]
fn test_unrecognized_block_is_fatal() {
    let text = "Plate Number\tPlate 1\n\n~~ not a block ~~\n";
    let err = parse(text).unwrap_err();
    match err {
        Error::UnrecognizedBlock { line, snippet } => {
            assert_eq!(line, 3);
            assert_eq!(snippet, "~~ not a block ~~");
        }
        other => panic!("unexpected error: {other}"),
    }
    // no partial output either way: the parse returned Err
}

#[test]
fn test_empty_input_yields_one_blank_plate() {
    let document = parse("").unwrap();
    assert_eq!(document.len(), 1);
    assert!(document[0].is_blank());
}
