use chain_consistency::comparator::{compare_record, ComparisonPolicy};
use chain_consistency::fixtures::builtin::{block_100001_consolidation, block_299173_payment};
use chain_consistency::types::Diagnostic;

use crate::common::without_optionals;

/// Tests for field-level comparison semantics
///
/// Unknown optional values never fail a pair; a present value always has to
/// be right.

fn fields(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics
        .iter()
        .filter_map(|d| d.field().map(str::to_string))
        .collect()
}

#[test]
fn test_correct_record_passes_for_every_fixture() {
    for fixture in [block_100001_consolidation(), block_299173_payment()] {
        let strict = ComparisonPolicy {
            check_block_height: true,
        };
        let diagnostics = compare_record(&fixture, &fixture.to_record(), &strict);
        assert!(diagnostics.is_empty(), "{}: {:?}", fixture.txid, diagnostics);
    }
}

#[test]
fn test_unknown_optionals_never_fail() {
    let fixture = block_100001_consolidation();
    let record = without_optionals(fixture.to_record());

    let strict = ComparisonPolicy {
        check_block_height: true,
    };
    assert!(compare_record(&fixture, &record, &strict).is_empty());
}

#[test]
fn test_present_but_wrong_optionals_always_fail() {
    let fixture = block_299173_payment();
    let mut record = fixture.to_record();
    record.timestamp = Some(0);
    record.outputs[1].source_tx_index = Some(1);

    let diagnostics = compare_record(&fixture, &record, &ComparisonPolicy::default());
    assert_eq!(
        fields(&diagnostics),
        vec!["timestamp", "outputs[1].source_tx_index"]
    );
}

#[test]
fn test_timestamp_scenarios() {
    let fixture = block_100001_consolidation();

    let mut unknown = fixture.to_record();
    unknown.timestamp = None;
    assert!(compare_record(&fixture, &unknown, &ComparisonPolicy::default()).is_empty());

    let mut wrong = fixture.to_record();
    wrong.timestamp = Some(1293624405);
    let diagnostics = compare_record(&fixture, &wrong, &ComparisonPolicy::default());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].to_string(),
        "timestamp: expected 1293624404, got 1293624405"
    );
}

#[test]
fn test_missing_input_reports_count_only() {
    let fixture = block_100001_consolidation();
    let mut record = fixture.to_record();
    record.inputs.truncate(4);

    let diagnostics = compare_record(&fixture, &record, &ComparisonPolicy::default());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].to_string(),
        "inputs.length: expected 5, got 4"
    );
}

#[test]
fn test_comparison_is_positional() {
    let fixture = block_100001_consolidation();
    let mut record = fixture.to_record();
    // Inputs 3 and 4 carry different values and addresses
    record.inputs.swap(3, 4);

    let diagnostics = compare_record(&fixture, &record, &ComparisonPolicy::default());
    assert_eq!(
        fields(&diagnostics),
        vec![
            "inputs[3].value",
            "inputs[3].address",
            "inputs[3].source_tx_index",
            "inputs[4].value",
            "inputs[4].address",
            "inputs[4].source_tx_index",
        ]
    );
}

#[test]
fn test_comparison_is_idempotent() {
    let fixture = block_299173_payment();
    let mut record = fixture.to_record();
    record.outputs[0].value = 1;
    record.inputs[1].address = "1BoatSLRHtKNngkdXEeobR76b53LETtpyT".to_string();

    let first = compare_record(&fixture, &record, &ComparisonPolicy::default());
    let second = compare_record(&fixture, &record, &ComparisonPolicy::default());
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn test_mismatch_names_field_and_both_values() {
    let fixture = block_299173_payment();
    let mut record = fixture.to_record();
    record.outputs[3].value = 1_260_000;

    let diagnostics = compare_record(&fixture, &record, &ComparisonPolicy::default());
    match &diagnostics[0] {
        Diagnostic::FieldMismatch {
            field,
            expected,
            actual,
        } => {
            assert_eq!(field, "outputs[3].value");
            assert_eq!(expected, "1270000");
            assert_eq!(actual, "1260000");
        }
        other => panic!("unexpected diagnostic: {:?}", other),
    }
}
