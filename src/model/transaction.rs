use chrono::{Local, NaiveDate, TimeZone};
use color_eyre::eyre::{eyre, ContextCompat, Result};
use nutype::nutype;
use serde_json::{Map, Value};

pub type Fields = Map<String, Value>;

/// A bank transaction exactly as the API returned it. No schema is enforced so
/// unknown fields survive the trip through the export file untouched.
#[nutype(derive(Debug, Clone, PartialEq, Deref, Serialize, Deserialize))]
pub struct Transaction(Fields);

impl Transaction {
    /// Millisecond epoch timestamp of when the transaction happened.
    pub const TRANSACTION_AT: &'static str = "transactionAt";

    /// Returns the named field, treating `null` the same as a missing field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.get(name).filter(|x| !x.is_null())
    }

    /// Reads the named field as a millisecond epoch timestamp.
    pub fn timestamp(&self, name: &str) -> Result<Option<i64>> {
        let Some(value) = self.field(name) else {
            return Ok(None);
        };

        let millis = match value {
            Value::Number(x) => x
                .as_i64()
                .or_else(|| x.as_f64().map(|x| x.floor() as i64))
                .wrap_err_with(|| format!("`{name}` is out of range: {x}"))?,
            other => return Err(eyre!("`{name}` is not a millisecond timestamp: {other}")),
        };

        Ok(Some(millis))
    }

    pub fn transaction_at(&self) -> Result<Option<i64>> {
        self.timestamp(Self::TRANSACTION_AT)
    }

    /// Reads the named timestamp field as a calendar date in the local time zone.
    pub fn local_date(&self, name: &str) -> Result<Option<NaiveDate>> {
        self.timestamp(name)?.map(local_date).transpose()
    }
}

pub fn local_date(millis: i64) -> Result<NaiveDate> {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|x| x.date_naive())
        .wrap_err_with(|| format!("timestamp `{millis}` is out of range"))
}
