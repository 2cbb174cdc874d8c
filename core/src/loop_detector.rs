//! Circular-transfer detector.
//!
//! Finds directed simple cycles of the configured lengths (default 3 and 4)
//! where every edge shares the first edge's transaction date AND amount
//! (exact equality). A cycle is reported exactly once: the DFS only starts
//! at the node holding the strictly smallest account id on the cycle, so
//! no rotation is ever enumerated twice. Parallel edges produce one group
//! per distinct edge combination.
//!
//! Role attribution: the source account of the earliest-timestamped edge
//! on the cycle is the launderer; everyone else is an accomplice. Ties on
//! the timestamp keep the edge closest to the canonical start.

use crate::config::DetectionConfig;
use crate::finding::{PatternGroup, PatternType};
use crate::graph::TransactionGraph;
use chrono::{NaiveDate, NaiveDateTime};
use petgraph::graph::{EdgeIndex, NodeIndex};
use std::collections::BTreeSet;

pub fn detect(graph: &TransactionGraph, config: &DetectionConfig) -> Vec<PatternGroup> {
    let wanted: BTreeSet<usize> = config.cycle_lengths.iter().copied().collect();
    let Some(&max_len) = wanted.iter().next_back() else {
        return Vec::new();
    };

    let mut groups = Vec::new();
    for &start in graph.nodes_sorted() {
        for &first in graph.outgoing(start) {
            let next = graph.target(first);
            // Self-loops never form a simple cycle of length >= 2.
            if next == start {
                continue;
            }
            // Canonical start: every other cycle member must have a
            // strictly larger account id.
            if graph.account_id(next) <= graph.account_id(start) {
                continue;
            }
            let edge = graph.edge(first);
            let mut path_nodes = vec![start, next];
            let mut path_edges = vec![first];
            extend(
                graph,
                &wanted,
                max_len,
                start,
                edge.date,
                edge.amount,
                next,
                &mut path_nodes,
                &mut path_edges,
                &mut groups,
            );
        }
    }

    log::debug!("loop detector: {} group(s)", groups.len());
    groups
}

#[allow(clippy::too_many_arguments)]
fn extend(
    graph: &TransactionGraph,
    wanted: &BTreeSet<usize>,
    max_len: usize,
    start: NodeIndex,
    date: NaiveDate,
    amount: f64,
    current: NodeIndex,
    path_nodes: &mut Vec<NodeIndex>,
    path_edges: &mut Vec<EdgeIndex>,
    out: &mut Vec<PatternGroup>,
) {
    for &e in graph.outgoing(current) {
        let edge = graph.edge(e);
        // Prune as soon as date or amount diverges from the first edge.
        if edge.date != date || edge.amount != amount {
            continue;
        }
        let next = graph.target(e);
        if next == start {
            if wanted.contains(&(path_edges.len() + 1)) {
                path_edges.push(e);
                out.push(build_group(graph, path_nodes, path_edges));
                path_edges.pop();
            }
            continue;
        }
        // A non-closing edge must leave room for the closing edge.
        if path_edges.len() + 1 >= max_len {
            continue;
        }
        if path_nodes.contains(&next) {
            continue;
        }
        if graph.account_id(next) <= graph.account_id(start) {
            continue;
        }
        path_nodes.push(next);
        path_edges.push(e);
        extend(
            graph, wanted, max_len, start, date, amount, next, path_nodes, path_edges, out,
        );
        path_edges.pop();
        path_nodes.pop();
    }
}

/// `path_nodes[i]` is the source of `path_edges[i]`; the last edge closes
/// back to `path_nodes[0]`.
fn build_group(
    graph: &TransactionGraph,
    path_nodes: &[NodeIndex],
    path_edges: &[EdgeIndex],
) -> PatternGroup {
    let mut launderer_pos = 0;
    let mut earliest: NaiveDateTime = graph.edge(path_edges[0]).timestamp;
    for (i, &e) in path_edges.iter().enumerate().skip(1) {
        let ts = graph.edge(e).timestamp;
        if ts < earliest {
            earliest = ts;
            launderer_pos = i;
        }
    }

    let launderer = graph.account_id(path_nodes[launderer_pos]).to_string();
    let accomplices = path_nodes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != launderer_pos)
        .map(|(_, &n)| graph.account_id(n).to_string())
        .collect();
    let transactions = path_edges
        .iter()
        .map(|&e| graph.edge(e).transaction_id.clone())
        .collect();

    PatternGroup {
        pattern: PatternType::CircularTransfer,
        launderer,
        accomplices,
        transactions,
    }
}
