use color_eyre::eyre::Result;
use itertools::Itertools;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    api::{ApiError, SearchQuery, PAGE_SIZE},
    model::{Company, TransactionPage},
};

const ROOT_QUERY: &str = include_str!("queries/root.graphql");
const TRANSACTIONS_SEARCH_QUERY: &str = include_str!("queries/transactions_search.graphql");

/// The body of a GraphQL request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation<V> {
    pub operation_name: &'static str,
    pub variables: V,
    pub query: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoVariables {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchVariables<'a> {
    pub after: Option<&'a str>,
    pub company_profile_id: Uuid,
    pub filters: Filters<'a>,
    pub first: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters<'a> {
    pub bank_account_id: &'a str,
    pub search_term: &'a str,
}

pub fn root() -> Operation<NoVariables> {
    Operation {
        operation_name: "root",
        variables: NoVariables {},
        query: ROOT_QUERY,
    }
}

pub fn transactions_search<'a>(
    query: &'a SearchQuery,
    after: Option<&'a str>,
) -> Operation<SearchVariables<'a>> {
    Operation {
        operation_name: "transactionsSearch",
        variables: SearchVariables {
            after,
            company_profile_id: query.company_profile_id,
            filters: Filters {
                bank_account_id: &query.bank_account_id,
                search_term: "",
            },
            first: PAGE_SIZE,
        },
        query: TRANSACTIONS_SEARCH_QUERY,
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Response {
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<Error>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Error {
    pub message: String,
}

impl Response {
    /// Extracts the response data. Any reported error fails the whole operation, even when
    /// partial data came back with it.
    pub fn into_data<T: DeserializeOwned>(self, operation: &'static str) -> Result<T> {
        if !self.errors.is_empty() {
            let messages = self.errors.iter().map(|x| x.message.as_str()).join("; ");
            return Err(ApiError::GraphQl {
                operation,
                messages,
            }
            .into());
        }

        match self.data {
            Some(Value::Null) | None => Err(ApiError::MissingData { operation }.into()),
            Some(data) => Ok(serde_json::from_value::<T>(data)?),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Viewer<T> {
    pub viewer: T,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Companies {
    pub companies: Vec<Company>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompanySearch {
    pub company: Search,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Search {
    pub transactions_search: TransactionPage,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use color_eyre::eyre::Result;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn search_variables() -> Result<()> {
        let query = SearchQuery {
            company_profile_id: Uuid::from_str("7d3f0c0e-8d8f-4a55-9b0e-2c4b7a9f1e21")?,
            bank_account_id: "b1f7e2a4-40e1-4a4c-8f6b-b5c9e1f0d7aa".to_owned(),
        };
        let operation = transactions_search(&query, Some("c1"));

        assert_eq!(
            serde_json::to_value(&operation.variables)?,
            json!({
                "after": "c1",
                "companyProfileId": "7d3f0c0e-8d8f-4a55-9b0e-2c4b7a9f1e21",
                "filters": {
                    "bankAccountId": "b1f7e2a4-40e1-4a4c-8f6b-b5c9e1f0d7aa",
                    "searchTerm": "",
                },
                "first": 50,
            })
        );
        assert_eq!(operation.operation_name, "transactionsSearch");
        Ok(())
    }

    #[test]
    fn first_page_has_null_cursor() -> Result<()> {
        let query = SearchQuery {
            company_profile_id: Uuid::nil(),
            bank_account_id: "account".to_owned(),
        };
        let operation = serde_json::to_value(transactions_search(&query, None))?;
        assert_eq!(operation["variables"]["after"], Value::Null);
        assert_eq!(serde_json::to_value(root())?["variables"], json!({}));
        Ok(())
    }

    #[test]
    fn parses_search_page() -> Result<()> {
        let payload = indoc! {r#"
            {
              "data": {
                "viewer": {
                  "uid": "u1",
                  "company": {
                    "companyProfileId": "7d3f0c0e-8d8f-4a55-9b0e-2c4b7a9f1e21",
                    "transactionsSearch": {
                      "pageInfo": {
                        "hasNextPage": true,
                        "nextCursor": "c1",
                        "totalCount": 120,
                        "__typename": "PageInfo"
                      },
                      "edges": [
                        {
                          "node": {
                            "transactionId": "t1",
                            "title": "Boulangerie Martin",
                            "transactionAt": 1710504000000
                          },
                          "__typename": "TransactionEdge"
                        }
                      ]
                    }
                  }
                }
              }
            }
        "#};

        let response = serde_json::from_str::<Response>(payload)?;
        let data = response.into_data::<Viewer<CompanySearch>>("transactionsSearch")?;
        let page = data.viewer.company.transactions_search;

        assert!(page.page_info.has_next_page);
        assert_eq!(page.page_info.next_cursor.as_deref(), Some("c1"));
        assert_eq!(page.page_info.total_count, Some(120));
        assert_eq!(page.len(), 1);
        assert_eq!(
            page.into_transactions()[0].transaction_at()?,
            Some(1710504000000)
        );
        Ok(())
    }

    #[test]
    fn parses_companies() -> Result<()> {
        let payload = indoc! {r#"
            {
              "data": {
                "viewer": {
                  "uid": "u1",
                  "companies": [
                    {
                      "companyProfileId": "7d3f0c0e-8d8f-4a55-9b0e-2c4b7a9f1e21",
                      "profile": {
                        "companyProfileId": "7d3f0c0e-8d8f-4a55-9b0e-2c4b7a9f1e21",
                        "legalName": "Atelier Durand",
                        "legalForm": "SASU",
                        "__typename": "CompanyProfile"
                      },
                      "metadata": {
                        "companyProfileId": "7d3f0c0e-8d8f-4a55-9b0e-2c4b7a9f1e21",
                        "accountStatus": "ACTIVE",
                        "__typename": "CompanyMetadata"
                      },
                      "__typename": "Company"
                    }
                  ]
                }
              }
            }
        "#};

        let response = serde_json::from_str::<Response>(payload)?;
        let companies = response.into_data::<Viewer<Companies>>("root")?.viewer.companies;

        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].name(), "Atelier Durand");
        assert_eq!(companies[0].status(), "ACTIVE");
        assert_eq!(
            companies[0].to_string(),
            "Atelier Durand (id: 7d3f0c0e-8d8f-4a55-9b0e-2c4b7a9f1e21, status: ACTIVE)"
        );
        Ok(())
    }

    #[test]
    fn graphql_errors_fail() -> Result<()> {
        let payload = r#"{"data":null,"errors":[{"message":"Unauthorized"},{"message":"Forbidden"}]}"#;
        let response = serde_json::from_str::<Response>(payload)?;
        let error = response
            .into_data::<Viewer<Companies>>("root")
            .expect_err("errors should fail the query");

        assert_eq!(
            error.to_string(),
            "`root` query failed: Unauthorized; Forbidden"
        );
        Ok(())
    }

    #[test]
    fn missing_data_fails() -> Result<()> {
        let response = serde_json::from_str::<Response>(r#"{"data":null}"#)?;
        assert!(response.into_data::<Viewer<Companies>>("root").is_err());
        Ok(())
    }
}
