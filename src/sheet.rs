use std::io::{self, BufRead, Write};

use color_eyre::eyre::{Context, Result};
use serde_json::Value;

use crate::model::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    /// Copied from the same-named field.
    Field,
    /// Local calendar date of the named millisecond timestamp field.
    Date(&'static str),
}

/// An output column of the spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    source: Source,
}

impl Column {
    const fn field(name: &'static str) -> Self {
        Self {
            name,
            source: Source::Field,
        }
    }

    const fn date(name: &'static str, from: &'static str) -> Self {
        Self {
            name,
            source: Source::Date(from),
        }
    }

    pub fn is_derived(&self) -> bool {
        matches!(self.source, Source::Date(_))
    }

    pub fn cell(&self, transaction: &Transaction) -> Result<String> {
        let cell = match self.source {
            Source::Field => transaction.field(self.name).map(cell_text),
            Source::Date(from) => transaction
                .local_date(from)?
                .map(|x| x.format("%Y-%m-%d").to_string()),
        };
        Ok(cell.unwrap_or_default())
    }
}

/// Spreadsheet columns in output order, most useful first.
pub const COLUMNS: [Column; 19] = [
    Column::date("transactionDate", Transaction::TRANSACTION_AT),
    Column::field("title"),
    Column::field("description"),
    // `payin` or `payout`
    Column::field("type"),
    Column::field("value"),
    Column::field("currency"),
    Column::field("fee"),
    Column::field("feeType"),
    Column::field("status"),
    Column::field("category"),
    Column::field("initiatorName"),
    Column::field("paymentMethod"),
    Column::field("isPersonal"),
    Column::field("isRefund"),
    Column::field("hasReceipts"),
    Column::field("isOnAgentWallet"),
    Column::date("expectedReleaseDate", "expectedReleaseDate"),
    Column::field("remainingAuthorized"),
    Column::field("transferPayinSenderName"),
];

/// Renders a JSON value as a cell. Strings lose their quotes, other values keep their JSON form.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(x) => x.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row(Vec<String>);

impl Row {
    pub fn from_transaction(transaction: &Transaction) -> Result<Self> {
        COLUMNS
            .iter()
            .map(|x| x.cell(transaction))
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    pub fn cells(&self) -> &[String] {
        &self.0
    }
}

/// Parses newline delimited JSON transactions lazily. Blank lines are skipped.
pub fn read_transactions<R: BufRead>(reader: R) -> impl Iterator<Item = Result<Transaction>> {
    reader
        .lines()
        .enumerate()
        .map(|(index, line)| parse_line(index + 1, line))
        .filter_map(Result::transpose)
}

fn parse_line(number: usize, line: io::Result<String>) -> Result<Option<Transaction>> {
    let line = line.wrap_err_with(|| format!("failed to read line {number}"))?;
    if line.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str::<Transaction>(&line)
        .map(Some)
        .wrap_err_with(|| format!("failed to parse transaction on line {number}"))
}

/// Writes a header row followed by one row per transaction. Returns the number of rows written,
/// not counting the header.
pub fn write_csv<I, W>(transactions: I, writer: W) -> Result<usize>
where
    I: IntoIterator<Item = Result<Transaction>>,
    W: Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(COLUMNS.iter().map(|x| x.name))?;

    let mut count = 0;
    for transaction in transactions {
        let row = Row::from_transaction(&transaction?)
            .wrap_err_with(|| format!("failed to convert transaction {}", count + 1))?;
        wtr.write_record(row.cells())?;
        count += 1;
    }

    wtr.flush()?;
    Ok(count)
}

/// Converts an export file into a spreadsheet.
pub fn convert<R: BufRead, W: Write>(reader: R, writer: W) -> Result<usize> {
    write_csv(read_transactions(reader), writer)
}
