//! amlgraph-core — motif-based AML pattern detection over a transaction graph.
//!
//! PIPELINE (fixed, documented, never reordered):
//!   1. Graph build  — account/transaction records in, immutable directed
//!                     multigraph out (malformed input aborts here)
//!   2. Detectors    — circular transfers, fan-in stars, cross-border
//!                     layering chains (read-only, run in parallel)
//!   3. Aggregation  — fixed family order, first writer wins per id
//!
//! RULES:
//!   - The graph is immutable once built; detectors never mutate shared state.
//!   - Detectors enumerate groups in a deterministic order, so two runs over
//!     identical input produce identical labeled output.
//!   - An engine failure is a failure, never an empty result set.

pub mod aggregator;
pub mod chain_detector;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod finding;
pub mod graph;
pub mod loop_detector;
pub mod record;
pub mod star_detector;
pub mod types;
