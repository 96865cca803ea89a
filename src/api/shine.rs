use std::{pin::Pin, time::Duration};

use color_eyre::eyre::{eyre, Context, ContextCompat, Result};
use futures::Stream;
use nutype::nutype;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::{
    api::{
        graphql::{self, Companies, CompanySearch, Operation, Viewer},
        paginate, ApiError, SearchQuery, TransactionSource,
    },
    frontend::Config,
    model::{Company, Transaction, TransactionPage},
};

/// A bearer token copied from an authenticated Shine web app session.
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(Debug, Clone, AsRef, TryFrom)
)]
pub struct ApiToken(String);

#[derive(Debug, Clone, derive_builder::Builder)]
#[builder(pattern = "owned", setter(into))]
pub struct Client {
    api_token: ApiToken,
    endpoint: Url,
    /// Value of the `platform` header identifying the calling client.
    #[builder(default = "Client::PLATFORM.to_owned()")]
    platform: String,
    #[builder(default = "reqwest::Client::new()")]
    http_client: reqwest::Client,
}

#[derive(Debug, Clone, derive_builder::Builder)]
#[builder(pattern = "owned", setter(into), build_fn(private))]
#[builder_struct_attr(must_use)]
pub struct SearchParams<'a> {
    #[builder(private)]
    client: &'a Client,
    /// The company whose transactions are searched.
    company_profile_id: Uuid,
    /// The bank account to list transactions for.
    bank_account_id: String,
}

impl<'a> SearchParams<'a> {
    fn into_query(self) -> SearchQuery {
        SearchQuery {
            company_profile_id: self.company_profile_id,
            bank_account_id: self.bank_account_id,
        }
    }
}

impl<'a> SearchParamsBuilder<'a> {
    pub fn send(self) -> Result<Pin<Box<impl Stream<Item = Result<Transaction>> + 'a>>> {
        let params = self.build().wrap_err("failed to build parameters")?;
        let client = params.client;
        Ok(paginate(client, params.into_query()))
    }
}

impl Client {
    pub const PLATFORM: &'static str = "WEBAPP";

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn from_config(config: &Config, api_token: &str) -> Result<Self> {
        let api_token = ApiToken::new(api_token).map_err(|e| eyre!("invalid api token: {e:?}"))?;
        let endpoint = Url::parse(&config.api.endpoint)
            .wrap_err_with(|| format!("invalid endpoint `{}`", config.api.endpoint))?;
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()
            .wrap_err("failed to build http client")?;

        Self::builder()
            .api_token(api_token)
            .endpoint(endpoint)
            .platform(config.api.platform.clone())
            .http_client(http_client)
            .build()
            .wrap_err("failed to build client")
    }

    /// Searches the transactions of one bank account, newest first. The returned stream fetches
    /// pages lazily, one request at a time.
    pub fn transactions(&self) -> SearchParamsBuilder<'_> {
        SearchParamsBuilder {
            client: Some(self),
            ..Default::default()
        }
    }

    /// Returns the first company associated with the authenticated user.
    pub async fn company(&self) -> Result<Company> {
        let companies = self
            .query::<_, Viewer<Companies>>(&graphql::root())
            .await
            .wrap_err("failed to get companies")?
            .viewer
            .companies;

        if companies.len() > 1 {
            warn!(
                "{} companies associated with this token, using the first",
                companies.len()
            );
        }

        companies
            .into_iter()
            .next()
            .wrap_err("no company is associated with this token")
    }

    async fn query<V: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        operation: &Operation<V>,
    ) -> Result<T> {
        let name = operation.operation_name;
        debug!("sending `{name}` query");

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_token.as_ref())
            .header("platform", &self.platform)
            .json(operation)
            .send()
            .await
            .wrap_err_with(|| format!("failed to send `{name}` query"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body }.into());
        }

        response
            .json::<graphql::Response>()
            .await
            .wrap_err_with(|| format!("failed to parse `{name}` response"))?
            .into_data::<T>(name)
    }
}

impl TransactionSource for Client {
    async fn search_page(
        &self,
        query: &SearchQuery,
        after: Option<&str>,
    ) -> Result<TransactionPage> {
        let page = self
            .query::<_, Viewer<CompanySearch>>(&graphql::transactions_search(query, after))
            .await
            .wrap_err("failed to get transactions page")?
            .viewer
            .company
            .transactions_search;
        Ok(page)
    }
}
