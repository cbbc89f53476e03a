use chain_consistency::errors::{ErrorKind, ProviderError};
use chain_consistency::types::{Diagnostic, Outcome, PairResult, Report};

/// Tests for report aggregation and rendering

fn failing_report() -> Report {
    Report {
        results: vec![
            PairResult::from_diagnostics(1, "aa", "bitcoind", vec![]),
            PairResult::from_diagnostics(
                1,
                "aa",
                "blockchain-info",
                vec![Diagnostic::from(&ProviderError::DataUnavailable {
                    txid: "aa".to_string(),
                })],
            ),
            PairResult::from_diagnostics(
                2,
                "bb",
                "bitcoind",
                vec![
                    Diagnostic::mismatch("timestamp", 1293624404u64, 1293624405u64),
                    Diagnostic::mismatch("outputs[0].value", 100_000u64, 99_000u64),
                ],
            ),
            PairResult::from_diagnostics(2, "bb", "blockchain-info", vec![]),
        ],
        aborted: false,
    }
}

#[test]
fn test_summary_counts() {
    let report = failing_report();
    let summary = report.summary();

    assert_eq!(summary.total, 4);
    assert_eq!(summary.passed, 2);
    assert_eq!(summary.failed, 2);
    assert!(!report.is_success());
}

#[test]
fn test_text_report_has_a_line_per_pair() {
    let text = failing_report().render_text();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines,
        vec![
            "Test 1 [bitcoind]: PASS",
            "Test 1 [blockchain-info]: FAIL DataUnavailable: Transaction not found: aa",
            "Test 2 [bitcoind]: FAIL timestamp: expected 1293624404, got 1293624405; outputs[0].value: expected 100000, got 99000",
            "Test 2 [blockchain-info]: PASS",
            "4 pairs: 2 passed, 2 failed",
        ]
    );
}

#[test]
fn test_json_report_tags_diagnostics() {
    let report = failing_report();
    let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    let failed_fetch = &value["results"][1]["diagnostics"][0];
    assert_eq!(failed_fetch["type"], "fetch_failed");
    assert_eq!(failed_fetch["kind"], "DataUnavailable");

    let mismatch = &value["results"][2]["diagnostics"][1];
    assert_eq!(mismatch["type"], "field_mismatch");
    assert_eq!(mismatch["field"], "outputs[0].value");

    let parsed: Report = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn test_transport_kind_display() {
    let diagnostic = Diagnostic::from(&ProviderError::Transport("connection refused".to_string()));
    assert_eq!(
        diagnostic.to_string(),
        "TransportError: Transport error: connection refused"
    );
    match diagnostic {
        Diagnostic::FetchFailed { kind, .. } => assert_eq!(kind, ErrorKind::Transport),
        other => panic!("unexpected diagnostic: {:?}", other),
    }
}

#[test]
fn test_empty_report_is_success() {
    let report = Report::default();
    assert!(report.is_success());
    assert_eq!(report.summary().total, 0);
    assert!(report.failures().all(|r| r.outcome == Outcome::Fail));
}
