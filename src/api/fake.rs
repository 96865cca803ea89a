use std::{collections::VecDeque, sync::Mutex};

use color_eyre::eyre::{eyre, Result};
use serde_json::json;
use uuid::Uuid;

use crate::{
    api::{SearchQuery, TransactionSource},
    model::{Edge, PageInfo, Transaction, TransactionPage},
};

/// Serves scripted pages in order and records the cursor of every request.
pub struct FakeSource {
    pages: Mutex<VecDeque<Result<TransactionPage>>>,
    requests: Mutex<Vec<Option<String>>>,
}

impl FakeSource {
    pub fn new(pages: impl IntoIterator<Item = Result<TransactionPage>>) -> Self {
        Self {
            pages: Mutex::new(pages.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Option<String>> {
        self.requests.lock().unwrap().clone()
    }
}

impl TransactionSource for FakeSource {
    async fn search_page(
        &self,
        _query: &SearchQuery,
        after: Option<&str>,
    ) -> Result<TransactionPage> {
        self.requests.lock().unwrap().push(after.map(str::to_owned));
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(eyre!("no page scripted for cursor {after:?}")))
    }
}

pub fn query() -> SearchQuery {
    SearchQuery {
        company_profile_id: Uuid::nil(),
        bank_account_id: "b1f7e2a4-40e1-4a4c-8f6b-b5c9e1f0d7aa".to_owned(),
    }
}

pub fn transaction(transaction_at: i64) -> Transaction {
    serde_json::from_value(json!({
        "transactionId": format!("t{transaction_at}"),
        "title": "Virement",
        "transactionAt": transaction_at,
    }))
    .unwrap()
}

/// A page holding one transaction per timestamp, followed by another page when `next` is set.
pub fn page(timestamps: &[i64], next: Option<&str>) -> TransactionPage {
    TransactionPage {
        page_info: PageInfo {
            has_next_page: next.is_some(),
            next_cursor: next.map(str::to_owned),
            total_count: None,
        },
        edges: timestamps
            .iter()
            .map(|x| Edge {
                node: transaction(*x),
            })
            .collect(),
    }
}

pub fn timestamps(transactions: &[Transaction]) -> Result<Vec<i64>> {
    transactions
        .iter()
        .map(|x| {
            x.transaction_at()?
                .ok_or_else(|| eyre!("missing transactionAt"))
        })
        .collect()
}
