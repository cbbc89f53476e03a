//! Field-level comparison of a fetched record against its fixture
//!
//! Hard fields (txid, counts, index, value, address) must match exactly.
//! Optional fields (timestamp, source_tx_index, and block height when
//! enabled) pass when the provider reports them as unknown.

use crate::fixtures::{ExpectedIo, Fixture};
use crate::types::{Diagnostic, TransactionIo, TransactionRecord};
use std::fmt::Display;

/// Which optional fields take part in the comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComparisonPolicy {
    pub check_block_height: bool,
}

/// Compare `actual` against `expected`, returning every disagreement found
///
/// An input or output count mismatch stops the comparison before any
/// positional checks; otherwise all diverging fields are reported.
pub fn compare_record(
    expected: &Fixture,
    actual: &TransactionRecord,
    policy: &ComparisonPolicy,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    check_exact("txid", &expected.txid, &actual.txid, &mut diagnostics);
    check_optional("timestamp", expected.timestamp, actual.timestamp, &mut diagnostics);
    if policy.check_block_height {
        check_optional(
            "block_height",
            expected.block_height,
            actual.block_height,
            &mut diagnostics,
        );
    }

    let inputs_match = check_count(
        "inputs",
        expected.inputs.len(),
        actual.inputs.len(),
        &mut diagnostics,
    );
    let outputs_match = check_count(
        "outputs",
        expected.outputs.len(),
        actual.outputs.len(),
        &mut diagnostics,
    );
    if !(inputs_match && outputs_match) {
        return diagnostics;
    }

    compare_entries("inputs", &expected.inputs, &actual.inputs, &mut diagnostics);
    compare_entries("outputs", &expected.outputs, &actual.outputs, &mut diagnostics);

    diagnostics
}

/// Positional comparison; entries are never matched as a set
fn compare_entries(
    label: &str,
    expected: &[ExpectedIo],
    actual: &[TransactionIo],
    diagnostics: &mut Vec<Diagnostic>,
) {
    for (position, (want, got)) in expected.iter().zip(actual).enumerate() {
        let field = |name: &str| format!("{}[{}].{}", label, position, name);

        check_exact(&field("index"), &want.index, &got.index, diagnostics);
        check_exact(&field("value"), &want.value, &got.value, diagnostics);
        if want.address != got.address {
            diagnostics.push(Diagnostic::mismatch(
                field("address"),
                display_address(&want.address),
                display_address(&got.address),
            ));
        }
        check_optional(
            &field("source_tx_index"),
            want.source_tx_index,
            got.source_tx_index,
            diagnostics,
        );
    }
}

fn check_exact<T: PartialEq + Display + ?Sized>(
    field: &str,
    expected: &T,
    actual: &T,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if expected != actual {
        diagnostics.push(Diagnostic::mismatch(field, expected, actual));
    }
}

/// Unknown passes; a present value must equal the expectation
fn check_optional<T: PartialEq + Display>(
    field: &str,
    expected: T,
    actual: Option<T>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if let Some(actual) = actual {
        if actual != expected {
            diagnostics.push(Diagnostic::mismatch(field, expected, actual));
        }
    }
}

fn check_count(
    label: &str,
    expected: usize,
    actual: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> bool {
    if expected != actual {
        diagnostics.push(Diagnostic::mismatch(
            format!("{}.length", label),
            expected,
            actual,
        ));
        return false;
    }
    true
}

fn display_address(address: &str) -> &str {
    if address.is_empty() {
        "<none>"
    } else {
        address
    }
}
