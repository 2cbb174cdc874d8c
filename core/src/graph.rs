//! The transaction graph.
//!
//! RULE: the graph is built once per run and never mutated afterwards.
//! Detectors hold shared references and read concurrently; only the
//! builder writes. All iteration orders exposed here are deterministic:
//! nodes ascend by account id, per-node edge lists ascend by transaction
//! id. Every detector's discovery order, and therefore the
//! first-writer-wins outcome downstream, rests on that.

use crate::error::{EngineError, EngineResult};
use crate::record::{AccountRecord, TransactionRecord};
use crate::types::{AccountId, TransactionId};
use chrono::{NaiveDate, NaiveDateTime};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use std::collections::{HashMap, HashSet};

/// Fixed parse format for the `value_date` column.
pub const VALUE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Node payload: the account attributes the detectors read.
#[derive(Debug, Clone)]
pub struct AccountNode {
    pub account_id: AccountId,
    pub country: String,
}

/// Edge payload: one transaction. `date` is the timestamp truncated to
/// calendar-date precision; all same-day comparisons use it, while role
/// attribution uses the full `timestamp`.
#[derive(Debug, Clone)]
pub struct TxEdge {
    pub transaction_id: TransactionId,
    pub amount: f64,
    pub timestamp: NaiveDateTime,
    pub date: NaiveDate,
}

/// Immutable directed multigraph over accounts and transactions, with
/// indexed adjacency for forward and backward traversal.
pub struct TransactionGraph {
    graph: DiGraph<AccountNode, TxEdge>,
    nodes_by_id: HashMap<AccountId, NodeIndex>,
    /// All nodes, ascending by account id.
    sorted_nodes: Vec<NodeIndex>,
    /// (source, target) per edge, indexed by `EdgeIndex::index()`.
    endpoints: Vec<(NodeIndex, NodeIndex)>,
    /// Outgoing edges per node, ascending by transaction id.
    outgoing: Vec<Vec<EdgeIndex>>,
    /// Incoming edges per node, ascending by transaction id.
    incoming: Vec<Vec<EdgeIndex>>,
}

impl TransactionGraph {
    /// Build the graph from input records.
    ///
    /// Malformed input (an edge endpoint absent from the account set, an
    /// unparseable `value_date`, a duplicate account or transaction id)
    /// aborts construction. Nothing is silently dropped: a dropped edge
    /// would silently change cycle and chain membership.
    pub fn build(
        accounts: &[AccountRecord],
        transactions: &[TransactionRecord],
    ) -> EngineResult<Self> {
        let mut graph = DiGraph::with_capacity(accounts.len(), transactions.len());
        let mut nodes_by_id: HashMap<AccountId, NodeIndex> =
            HashMap::with_capacity(accounts.len());

        for record in accounts {
            if nodes_by_id.contains_key(&record.account_id) {
                return Err(EngineError::DuplicateAccount(record.account_id.clone()));
            }
            let idx = graph.add_node(AccountNode {
                account_id: record.account_id.clone(),
                country: record.country.clone(),
            });
            nodes_by_id.insert(record.account_id.clone(), idx);
        }

        let node_count = graph.node_count();
        let mut endpoints = Vec::with_capacity(transactions.len());
        let mut outgoing = vec![Vec::new(); node_count];
        let mut incoming = vec![Vec::new(); node_count];
        let mut seen_tx: HashSet<&str> = HashSet::with_capacity(transactions.len());

        for record in transactions {
            if !seen_tx.insert(record.transaction_id.as_str()) {
                return Err(EngineError::DuplicateTransaction(
                    record.transaction_id.clone(),
                ));
            }
            let src = Self::resolve(&nodes_by_id, &record.src_account, &record.transaction_id)?;
            let dst = Self::resolve(&nodes_by_id, &record.dst_account, &record.transaction_id)?;
            let timestamp = NaiveDateTime::parse_from_str(&record.value_date, VALUE_DATE_FORMAT)
                .map_err(|_| EngineError::InvalidValueDate {
                    transaction_id: record.transaction_id.clone(),
                    value: record.value_date.clone(),
                })?;
            let edge = graph.add_edge(
                src,
                dst,
                TxEdge {
                    transaction_id: record.transaction_id.clone(),
                    amount: record.amount,
                    date: timestamp.date(),
                    timestamp,
                },
            );
            endpoints.push((src, dst));
            outgoing[src.index()].push(edge);
            incoming[dst.index()].push(edge);
        }

        let mut sorted_nodes: Vec<NodeIndex> = graph.node_indices().collect();
        sorted_nodes.sort_by(|a, b| graph[*a].account_id.cmp(&graph[*b].account_id));
        for list in outgoing.iter_mut().chain(incoming.iter_mut()) {
            list.sort_by(|a, b| graph[*a].transaction_id.cmp(&graph[*b].transaction_id));
        }

        Ok(Self {
            graph,
            nodes_by_id,
            sorted_nodes,
            endpoints,
            outgoing,
            incoming,
        })
    }

    fn resolve(
        nodes_by_id: &HashMap<AccountId, NodeIndex>,
        account_id: &str,
        transaction_id: &str,
    ) -> EngineResult<NodeIndex> {
        nodes_by_id
            .get(account_id)
            .copied()
            .ok_or_else(|| EngineError::UnknownAccount {
                transaction_id: transaction_id.to_string(),
                account_id: account_id.to_string(),
            })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All nodes in ascending account-id order.
    pub fn nodes_sorted(&self) -> &[NodeIndex] {
        &self.sorted_nodes
    }

    pub fn node_index(&self, account_id: &str) -> Option<NodeIndex> {
        self.nodes_by_id.get(account_id).copied()
    }

    pub fn account(&self, node: NodeIndex) -> &AccountNode {
        &self.graph[node]
    }

    pub fn account_id(&self, node: NodeIndex) -> &str {
        &self.graph[node].account_id
    }

    pub fn country(&self, node: NodeIndex) -> &str {
        &self.graph[node].country
    }

    pub fn edge(&self, edge: EdgeIndex) -> &TxEdge {
        &self.graph[edge]
    }

    pub fn source(&self, edge: EdgeIndex) -> NodeIndex {
        self.endpoints[edge.index()].0
    }

    pub fn target(&self, edge: EdgeIndex) -> NodeIndex {
        self.endpoints[edge.index()].1
    }

    /// Outgoing edges of `node`, ascending by transaction id.
    pub fn outgoing(&self, node: NodeIndex) -> &[EdgeIndex] {
        &self.outgoing[node.index()]
    }

    /// Incoming edges of `node`, ascending by transaction id.
    pub fn incoming(&self, node: NodeIndex) -> &[EdgeIndex] {
        &self.incoming[node.index()]
    }
}
