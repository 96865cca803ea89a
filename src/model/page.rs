use serde::{Deserialize, Serialize};

use crate::model::Transaction;

/// One page of a transaction search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub page_info: PageInfo,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether another page follows this one.
    pub has_next_page: bool,
    /// The cursor to pass as `after` to fetch the next page.
    pub next_cursor: Option<String>,
    /// The number of transactions matching the search across all pages.
    #[serde(default)]
    pub total_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub node: Transaction,
}

impl TransactionPage {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn into_transactions(self) -> Vec<Transaction> {
        self.edges.into_iter().map(|x| x.node).collect()
    }
}
