//! Consistency comparator
//!
//! Drives every (fixture, provider) pair through fetch + field comparison and
//! aggregates the outcomes into a [`Report`]. Pairs are independent: a
//! provider error or mismatch is recorded against its pair and the run
//! carries on.
//!
//! Pairs may be fetched concurrently; results always come back in
//! fixture-major, provider-minor order so reports are reproducible.

pub mod fields;

pub use fields::{compare_record, ComparisonPolicy};

use crate::errors::ProviderError;
use crate::fixtures::{Fixture, FixtureSet};
use crate::provider::TransactionProvider;
use crate::types::{Diagnostic, PairResult, Report};
use futures::future;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Cooperative cancellation flag for a running check
///
/// Once aborted, no further fetches are started; pairs already in flight
/// complete and are included in the (partial) report.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct CheckerOptions {
    pub policy: ComparisonPolicy,
    /// Bound on a single provider fetch; exceeding it is a transport error
    pub fetch_timeout: Option<Duration>,
    /// Pairs in flight at once
    pub concurrency: usize,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            policy: ComparisonPolicy::default(),
            fetch_timeout: None,
            concurrency: 1,
        }
    }
}

pub struct ConsistencyChecker {
    options: CheckerOptions,
    abort: AbortHandle,
}

impl ConsistencyChecker {
    pub fn new(options: CheckerOptions) -> Self {
        Self {
            options,
            abort: AbortHandle::default(),
        }
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// Check every fixture against every provider
    pub async fn run(
        &self,
        fixtures: &FixtureSet,
        providers: &[Arc<dyn TransactionProvider>],
    ) -> Report {
        let expected_pairs = fixtures.len() * providers.len();
        info!(
            "Checking {} fixtures against {} providers ({} pairs, concurrency {})",
            fixtures.len(),
            providers.len(),
            expected_pairs,
            self.options.concurrency
        );

        let pairs = fixtures
            .numbered()
            .flat_map(|(number, fixture)| {
                providers
                    .iter()
                    .map(move |provider| (number, fixture, provider.as_ref()))
            })
            .collect::<Vec<_>>();

        let abort = self.abort.clone();
        let results: Vec<PairResult> = stream::iter(pairs)
            .take_while(|_| future::ready(!abort.is_aborted()))
            .map(|(number, fixture, provider)| self.check_pair(number, fixture, provider))
            .buffered(self.options.concurrency.max(1))
            .collect()
            .await;

        let report = Report {
            aborted: results.len() < expected_pairs,
            results,
        };

        let summary = report.summary();
        if report.aborted {
            warn!(
                "Run aborted after {} of {} pairs",
                summary.total, expected_pairs
            );
        }
        info!(
            "Consistency check finished: {} passed, {} failed",
            summary.passed, summary.failed
        );
        report
    }

    /// Fetch and compare a single pair
    pub async fn check_pair(
        &self,
        fixture_number: usize,
        fixture: &Fixture,
        provider: &dyn TransactionProvider,
    ) -> PairResult {
        info!("Starting test # {} [{}]", fixture_number, provider.name());

        let fetched = match self.options.fetch_timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, provider.fetch_transaction(&fixture.txid)).await
                {
                    Ok(result) => result,
                    Err(_) => Err(ProviderError::Timeout {
                        timeout: limit,
                        operation: format!("fetch_transaction({})", fixture.txid),
                    }),
                }
            }
            None => provider.fetch_transaction(&fixture.txid).await,
        };

        let diagnostics = match fetched {
            Ok(record) => compare_record(fixture, &record, &self.options.policy),
            Err(e) => vec![Diagnostic::from(&e)],
        };

        let result =
            PairResult::from_diagnostics(fixture_number, &fixture.txid, provider.name(), diagnostics);
        if result.is_pass() {
            debug!("Test {} [{}] passed", fixture_number, provider.name());
        } else {
            warn!("{}", result);
        }
        result
    }
}

/// Sequential check with default options
pub async fn run_consistency_check(
    fixtures: &FixtureSet,
    providers: &[Arc<dyn TransactionProvider>],
) -> Report {
    ConsistencyChecker::new(CheckerOptions::default())
        .run(fixtures, providers)
        .await
}
