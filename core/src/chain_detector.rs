//! Cross-border layering detector.
//!
//! Finds simple directed paths of the configured hop counts (default 3
//! and 4) where every edge shares the first edge's transaction date and
//! the terminal account sits in a high-risk country. All accepted paths
//! sharing the same (origin, terminal) pair, across hop counts and dates,
//! merge into one group: several layered routes into the same high-risk
//! destination are one scheme, not several. Groups come out in ascending
//! (origin, terminal) order.
//!
//! Role attribution: the terminal is the launderer; every other account on
//! any merged path is an accomplice, the origin included.

use crate::config::DetectionConfig;
use crate::finding::{PatternGroup, PatternType};
use crate::graph::TransactionGraph;
use crate::types::{AccountId, TransactionId};
use chrono::NaiveDate;
use petgraph::graph::{EdgeIndex, NodeIndex};
use std::collections::{BTreeMap, BTreeSet};

type MergedPaths = BTreeMap<(AccountId, AccountId), (BTreeSet<AccountId>, BTreeSet<TransactionId>)>;

pub fn detect(graph: &TransactionGraph, config: &DetectionConfig) -> Vec<PatternGroup> {
    if config.high_risk_countries.is_empty() {
        return Vec::new();
    }
    let wanted: BTreeSet<usize> = config.chain_hop_lengths.iter().copied().collect();
    let Some(&max_hops) = wanted.iter().next_back() else {
        return Vec::new();
    };

    let mut merged: MergedPaths = BTreeMap::new();
    for &origin in graph.nodes_sorted() {
        for &first in graph.outgoing(origin) {
            let next = graph.target(first);
            if next == origin {
                continue;
            }
            let mut path_nodes = vec![origin, next];
            let mut path_edges = vec![first];
            extend(
                graph,
                config,
                &wanted,
                max_hops,
                graph.edge(first).date,
                next,
                &mut path_nodes,
                &mut path_edges,
                &mut merged,
            );
        }
    }

    let groups: Vec<PatternGroup> = merged
        .into_iter()
        .map(|((_, terminal), (accounts, transactions))| PatternGroup {
            pattern: PatternType::CrossBorderLayering,
            accomplices: accounts.into_iter().filter(|a| *a != terminal).collect(),
            launderer: terminal,
            transactions: transactions.into_iter().collect(),
        })
        .collect();

    log::debug!("chain detector: {} group(s)", groups.len());
    groups
}

#[allow(clippy::too_many_arguments)]
fn extend(
    graph: &TransactionGraph,
    config: &DetectionConfig,
    wanted: &BTreeSet<usize>,
    max_hops: usize,
    date: NaiveDate,
    current: NodeIndex,
    path_nodes: &mut Vec<NodeIndex>,
    path_edges: &mut Vec<EdgeIndex>,
    merged: &mut MergedPaths,
) {
    let hops = path_edges.len();
    if wanted.contains(&hops) && config.high_risk_countries.contains(graph.country(current)) {
        record_path(graph, path_nodes, path_edges, merged);
    }
    if hops == max_hops {
        return;
    }
    for &e in graph.outgoing(current) {
        if graph.edge(e).date != date {
            continue;
        }
        let next = graph.target(e);
        if path_nodes.contains(&next) {
            continue;
        }
        path_nodes.push(next);
        path_edges.push(e);
        extend(
            graph, config, wanted, max_hops, date, next, path_nodes, path_edges, merged,
        );
        path_edges.pop();
        path_nodes.pop();
    }
}

/// Union the accepted path into its (origin, terminal) group.
fn record_path(
    graph: &TransactionGraph,
    path_nodes: &[NodeIndex],
    path_edges: &[EdgeIndex],
    merged: &mut MergedPaths,
) {
    let origin = graph.account_id(path_nodes[0]).to_string();
    let terminal = graph
        .account_id(path_nodes[path_nodes.len() - 1])
        .to_string();
    let (accounts, transactions) = merged.entry((origin, terminal)).or_default();
    for &n in path_nodes {
        accounts.insert(graph.account_id(n).to_string());
    }
    for &e in path_edges {
        transactions.insert(graph.edge(e).transaction_id.clone());
    }
}
