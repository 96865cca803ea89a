use std::{
    fs::File,
    io::{BufReader, BufWriter},
};

use color_eyre::eyre::{Context, Result};
use tracing::{info, warn};

use crate::{frontend::cli, sheet};

pub type Args = cli::convert::Args;

pub fn convert(args: Args) -> Result<usize> {
    let input = args.input.to_string_lossy().into_owned();
    let output = args.output.to_string_lossy().into_owned();
    info!("converting `{input}` to `{output}`...");

    let reader = File::open(&args.input)
        .map(BufReader::new)
        .wrap_err_with(|| format!("failed to open `{input}`"))?;
    let writer = File::create(&args.output)
        .map(BufWriter::new)
        .wrap_err_with(|| format!("failed to create `{output}`"))?;

    let count =
        sheet::convert(reader, writer).wrap_err_with(|| format!("failed to convert `{input}`"))?;

    if count == 0 {
        warn!("no transactions found in `{input}`");
    }
    info!("done! converted {count} transactions to CSV");
    Ok(count)
}
