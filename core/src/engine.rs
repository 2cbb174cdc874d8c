//! The detection engine — wiring for one run.
//!
//! MERGE ORDER (fixed, documented, never reordered):
//!   1. Circular transfers  (loops)
//!   2. Fan-in stars        (stars)
//!   3. Cross-border chains (chains)
//!
//! RULES:
//!   - The graph is built first; malformed input aborts the run before any
//!     detector executes.
//!   - The three detectors run as parallel tasks over the shared immutable
//!     graph. They have no data dependency on each other.
//!   - Aggregation waits for all detectors, then runs single-threaded in
//!     the fixed family order, so first-writer-wins outcomes never depend
//!     on detector finishing order.

use crate::aggregator::FindingLedger;
use crate::config::DetectionConfig;
use crate::error::EngineResult;
use crate::finding::{AccountFinding, PatternGroup, PatternType};
use crate::graph::TransactionGraph;
use crate::record::{
    AccountRecord, LabeledAccountRecord, LabeledTransactionRecord, TransactionRecord,
};
use crate::{chain_detector, loop_detector, star_detector};
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct DetectionEngine {
    config: DetectionConfig,
}

impl DetectionEngine {
    /// Build an engine, rejecting invalid configuration up front.
    pub fn new(config: DetectionConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// One detection run: one graph, one detector set, one aggregation.
    /// Empty input is not an error and yields empty findings.
    pub fn run(
        &self,
        accounts: &[AccountRecord],
        transactions: &[TransactionRecord],
    ) -> EngineResult<DetectionOutcome> {
        let graph = TransactionGraph::build(accounts, transactions)?;
        log::info!(
            "transaction graph built: {} account(s), {} transaction(s)",
            graph.node_count(),
            graph.edge_count()
        );

        let (loops, (stars, chains)) = rayon::join(
            || loop_detector::detect(&graph, &self.config),
            || {
                rayon::join(
                    || star_detector::detect(&graph, &self.config),
                    || chain_detector::detect(&graph, &self.config),
                )
            },
        );
        log::info!(
            "detectors finished: {} loop, {} star, {} chain group(s)",
            loops.len(),
            stars.len(),
            chains.len()
        );

        let mut ledger = FindingLedger::new();
        ledger.absorb(&loops);
        ledger.absorb(&stars);
        ledger.absorb(&chains);

        let mut groups = loops;
        groups.extend(stars);
        groups.extend(chains);

        log::info!(
            "aggregation complete: {} suspicious account(s), {} suspicious transaction(s)",
            ledger.suspicious_account_count(),
            ledger.suspicious_transaction_count()
        );

        Ok(DetectionOutcome { groups, ledger })
    }
}

/// Result of one run: every matched group (family order preserved) and the
/// aggregated label maps.
#[derive(Debug)]
pub struct DetectionOutcome {
    /// All groups, in merge order: loops, then stars, then chains.
    pub groups: Vec<PatternGroup>,
    ledger: FindingLedger,
}

impl DetectionOutcome {
    pub fn ledger(&self) -> &FindingLedger {
        &self.ledger
    }

    pub fn account_finding(&self, account_id: &str) -> Option<&AccountFinding> {
        self.ledger.account_finding(account_id)
    }

    pub fn transaction_pattern(&self, transaction_id: &str) -> Option<PatternType> {
        self.ledger.transaction_pattern(transaction_id)
    }

    pub fn label_accounts(&self, records: &[AccountRecord]) -> Vec<LabeledAccountRecord> {
        self.ledger.label_accounts(records)
    }

    pub fn label_transactions(
        &self,
        records: &[TransactionRecord],
    ) -> Vec<LabeledTransactionRecord> {
        self.ledger.label_transactions(records)
    }

    /// Per-pattern counts for the end-of-run report.
    pub fn summary(&self) -> DetectionSummary {
        let mut accounts_by_pattern: BTreeMap<PatternType, usize> = BTreeMap::new();
        for (_, finding) in self.ledger.account_findings() {
            *accounts_by_pattern.entry(finding.pattern).or_insert(0) += 1;
        }
        let mut transactions_by_pattern: BTreeMap<PatternType, usize> = BTreeMap::new();
        for (_, pattern) in self.ledger.transaction_findings() {
            *transactions_by_pattern.entry(pattern).or_insert(0) += 1;
        }
        DetectionSummary {
            group_count: self.groups.len(),
            suspicious_accounts: self.ledger.suspicious_account_count(),
            suspicious_transactions: self.ledger.suspicious_transaction_count(),
            accounts_by_pattern,
            transactions_by_pattern,
        }
    }
}

/// End-of-run statistics, mirrored into the runner's report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionSummary {
    pub group_count: usize,
    pub suspicious_accounts: usize,
    pub suspicious_transactions: usize,
    pub accounts_by_pattern: BTreeMap<PatternType, usize>,
    pub transactions_by_pattern: BTreeMap<PatternType, usize>,
}
