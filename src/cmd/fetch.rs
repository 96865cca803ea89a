use std::{fs::File, io::BufWriter, path::Path};

use color_eyre::eyre::{Context, Result};
use futures::Stream;
use tracing::{error, info};

use crate::{
    api::Client,
    cmd,
    export::{self, Cutoff, JsonlSink},
    frontend::{cli, Config},
    model::Transaction,
};

pub type Args = cli::fetch::Args;

pub async fn fetch(config: &Config, args: Args) -> Result<()> {
    let client = Client::from_config(config, &args.token)?;

    let company_id = match args.company_id {
        Some(x) => x,
        None => {
            let company = cmd::company::resolve(&client).await?;
            info!("company: {company}");
            company.id()
        }
    };

    let cutoff = args.until.map(Cutoff::from_date).transpose()?;
    match args.until {
        Some(until) => info!("fetching transactions until {until}..."),
        None => info!("fetching all transactions..."),
    }

    let transactions = client
        .transactions()
        .company_profile_id(company_id)
        .bank_account_id(args.bank_account_id)
        .send()?;
    let written = save(transactions, cutoff, &args.output).await?;

    info!("done! saved {written} transactions");
    Ok(())
}

/// Writes `transactions` to `path` as JSONL and returns how many were written. The file is
/// flushed before any error is returned, so an interrupted export keeps what it fetched.
pub async fn save<S>(transactions: S, cutoff: Option<Cutoff>, path: &Path) -> Result<usize>
where
    S: Stream<Item = Result<Transaction>> + Unpin,
{
    let output = path.to_string_lossy().into_owned();
    info!("saving to `{output}`");
    let file = File::create(path).wrap_err_with(|| format!("failed to create `{output}`"))?;
    let mut sink = JsonlSink::new(BufWriter::new(file));

    let stop = export::drain(transactions, cutoff, &mut sink).await;

    let written = sink.written();
    sink.finish()
        .wrap_err_with(|| format!("failed to flush `{output}`"))?;

    if let Err(e) = stop {
        error!("export interrupted, kept {written} transactions in `{output}`");
        return Err(e);
    }
    Ok(written)
}
