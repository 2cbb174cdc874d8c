//! Fan-in star detector.
//!
//! Finds sinks receiving same-day, sub-threshold transfers from at least
//! `fan_in_size` distinct source accounts. One group is reported per
//! qualifying (sink, date) pair and it is maximal: every qualifying source
//! and every qualifying edge of that day belongs to it, never a
//! combinatorial set of fan_in_size-subsets.
//!
//! Role attribution is fixed, not timestamp-derived: the sink is always
//! the launderer, every source an accomplice.

use crate::config::DetectionConfig;
use crate::finding::{PatternGroup, PatternType};
use crate::graph::TransactionGraph;
use chrono::NaiveDate;
use petgraph::graph::EdgeIndex;
use std::collections::{BTreeMap, BTreeSet};

pub fn detect(graph: &TransactionGraph, config: &DetectionConfig) -> Vec<PatternGroup> {
    let mut groups = Vec::new();

    for &sink in graph.nodes_sorted() {
        // Bucket qualifying inbound edges by calendar date. BTreeMap keeps
        // the date order deterministic.
        let mut by_date: BTreeMap<NaiveDate, Vec<EdgeIndex>> = BTreeMap::new();
        for &e in graph.incoming(sink) {
            // A self-transfer has no distinct source.
            if graph.source(e) == sink {
                continue;
            }
            let edge = graph.edge(e);
            if edge.amount >= config.fan_in_amount_threshold {
                continue;
            }
            by_date.entry(edge.date).or_default().push(e);
        }

        for (_, edges) in by_date {
            let sources: BTreeSet<&str> = edges
                .iter()
                .map(|&e| graph.account_id(graph.source(e)))
                .collect();
            if sources.len() < config.fan_in_size {
                continue;
            }
            groups.push(PatternGroup {
                pattern: PatternType::StarFanIn,
                launderer: graph.account_id(sink).to_string(),
                accomplices: sources.into_iter().map(str::to_string).collect(),
                transactions: edges
                    .iter()
                    .map(|&e| graph.edge(e).transaction_id.clone())
                    .collect(),
            });
        }
    }

    log::debug!("star detector: {} group(s)", groups.len());
    groups
}
