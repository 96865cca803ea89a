use std::pin::Pin;

use color_eyre::eyre::{bail, Result};
use futures::{stream, Stream};
use tracing::{debug, info};

use crate::{
    api::{SearchQuery, TransactionSource},
    model::Transaction,
};

/// Transactions requested per page.
pub const PAGE_SIZE: u32 = 50;

struct State<'a, S> {
    source: &'a S,
    query: SearchQuery,
    data: std::vec::IntoIter<Transaction>,
    cursor: Option<String>,
    page: usize,
    exhausted: bool,
    /// A page that announced a next page without a cursor. Reported once its records are consumed.
    missing_cursor: Option<usize>,
}

/// Streams every transaction matching `query`, page by page. The next page is only requested once
/// the previous page has been consumed, so dropping the stream stops pagination.
pub fn paginate<S: TransactionSource>(
    source: &S,
    query: SearchQuery,
) -> Pin<Box<impl Stream<Item = Result<Transaction>> + '_>> {
    let state = State {
        source,
        query,
        data: Vec::new().into_iter(),
        cursor: None,
        page: 0,
        exhausted: false,
        missing_cursor: None,
    };

    Box::pin(stream::try_unfold(state, next_transaction::<S>))
}

async fn next_transaction<'a, S: TransactionSource>(
    mut state: State<'a, S>,
) -> Result<Option<(Transaction, State<'a, S>)>> {
    loop {
        if let Some(x) = state.data.next() {
            return Ok(Some((x, state)));
        } else if let Some(number) = state.missing_cursor {
            bail!("page {number} has a next page but no cursor");
        } else if state.exhausted {
            return Ok(None);
        }

        state.page += 1;
        let number = state.page;
        debug!("fetching page {number}...");
        let page = state
            .source
            .search_page(&state.query, state.cursor.as_deref())
            .await?;

        if number == 1 {
            if let Some(total) = page.page_info.total_count {
                info!("found {total} transactions");
            }
        }
        if page.is_empty() {
            info!("page {number} is empty");
        } else {
            info!("received {} transactions from page {number}", page.len());
        }

        state.exhausted = !page.page_info.has_next_page;
        if state.exhausted {
            info!("no more pages to fetch");
        } else {
            match page.page_info.next_cursor.clone() {
                Some(cursor) => state.cursor = Some(cursor),
                None => state.missing_cursor = Some(number),
            }
        }

        state.data = page.into_transactions().into_iter();
    }
}
