pub mod graphql;
pub mod paginate;
pub mod shine;

#[cfg(test)]
pub(crate) mod fake;

use color_eyre::eyre::Result;
use uuid::Uuid;

pub use self::{
    paginate::{paginate, PAGE_SIZE},
    shine::{ApiToken, Client, ClientBuilder},
};
use crate::model::TransactionPage;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-success status. Authentication failures land here too.
    #[error("request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("`{operation}` query failed: {messages}")]
    GraphQl {
        operation: &'static str,
        messages: String,
    },
    #[error("`{operation}` query returned no data")]
    MissingData { operation: &'static str },
}

/// Scopes a transaction search to one bank account of one company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub company_profile_id: Uuid,
    pub bank_account_id: String,
}

/// Anything that can serve pages of a transaction search.
#[allow(async_fn_in_trait)]
pub trait TransactionSource {
    /// Fetches the page following `after`, or the first page when `after` is `None`.
    async fn search_page(
        &self,
        query: &SearchQuery,
        after: Option<&str>,
    ) -> Result<TransactionPage>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn status_error_reports_body() {
        let error = ApiError::Status {
            status: reqwest::StatusCode::UNAUTHORIZED,
            body: r#"{"message":"jwt expired"}"#.to_owned(),
        };

        assert_eq!(
            error.to_string(),
            r#"request failed with status 401 Unauthorized: {"message":"jwt expired"}"#
        );
    }
}
