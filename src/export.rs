use std::io::Write;

use chrono::{
    DateTime, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
};
use color_eyre::eyre::{ContextCompat, Result};
use futures::{Stream, TryStreamExt};
use tracing::{info, warn};

use crate::model::Transaction;

/// The oldest `transactionAt` worth keeping, in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cutoff(i64);

impl Cutoff {
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Local midnight at the start of `date`. When a clock change skips midnight, the day starts
    /// at the first local time that exists.
    pub fn from_date(date: NaiveDate) -> Result<Self> {
        let midnight = start_of_day(date.and_time(NaiveTime::MIN), |x| Local.from_local_datetime(x))
            .wrap_err_with(|| format!("`{date}` has no local start of day"))?;
        Ok(Self(midnight.timestamp_millis()))
    }

    pub fn millis(self) -> i64 {
        self.0
    }

    /// Whether a transaction at `millis` is recent enough to keep.
    pub fn includes(self, millis: i64) -> bool {
        millis >= self.0
    }
}

/// The earliest instant at or after `midnight` that `resolve` maps to a real time.
fn start_of_day<Tz: TimeZone>(
    midnight: NaiveDateTime,
    resolve: impl Fn(&NaiveDateTime) -> LocalResult<DateTime<Tz>>,
) -> Option<DateTime<Tz>> {
    // Gaps never exceed a day.
    (0..=24 * 60)
        .map(|x| midnight + Duration::minutes(x))
        .find_map(|x| resolve(&x).earliest())
}

/// Why an export stopped writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    /// Every page was written.
    Exhausted,
    /// A transaction older than the cutoff was reached. It and everything after it were dropped.
    Cutoff { transaction_at: i64 },
}

/// Writes transactions as newline delimited JSON, one object per line.
#[derive(Debug)]
pub struct JsonlSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonlSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn push(&mut self, transaction: &Transaction) -> Result<()> {
        serde_json::to_writer(&mut self.writer, transaction)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes buffered lines and hands back the writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Writes transactions to `sink` as they arrive until the stream ends or, when a cutoff is set,
/// until the first transaction older than it. Transactions are expected newest first.
///
/// An error from the stream is returned as is; everything written before it stays in the sink.
pub async fn drain<S, W>(
    mut transactions: S,
    cutoff: Option<Cutoff>,
    sink: &mut JsonlSink<W>,
) -> Result<Stop>
where
    S: Stream<Item = Result<Transaction>> + Unpin,
    W: Write,
{
    while let Some(transaction) = transactions.try_next().await? {
        if let Some(cutoff) = cutoff {
            match transaction.transaction_at()? {
                Some(transaction_at) if !cutoff.includes(transaction_at) => {
                    info!("reached transactions older than the cutoff");
                    return Ok(Stop::Cutoff { transaction_at });
                }
                Some(_) => {}
                None => warn!(
                    "transaction without `{}`, keeping it",
                    Transaction::TRANSACTION_AT
                ),
            }
        }

        sink.push(&transaction)?;
    }

    Ok(Stop::Exhausted)
}
