use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A company the authenticated user belongs to. Transactions are scoped by its
/// profile id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub company_profile_id: Uuid,
    pub profile: Profile,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub legal_name: String,
    #[serde(default)]
    pub legal_form: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub account_status: String,
}

impl Company {
    pub fn id(&self) -> Uuid {
        self.company_profile_id
    }

    pub fn name(&self) -> &str {
        &self.profile.legal_name
    }

    pub fn status(&self) -> &str {
        &self.metadata.account_status
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (id: {}, status: {})",
            self.name(),
            self.id(),
            self.status()
        )
    }
}
