use color_eyre::eyre::{Context, Result};
use tracing::info;

use crate::{
    api::Client,
    frontend::{cli, Config},
    model::Company,
};

pub type Args = cli::company::Args;

pub async fn company(config: &Config, args: Args) -> Result<()> {
    let client = Client::from_config(config, &args.token)?;
    let company = resolve(&client).await?;
    info!("company: {company}");
    Ok(())
}

/// Looks up the company the client's token belongs to.
pub async fn resolve(client: &Client) -> Result<Company> {
    info!("fetching company info...");
    client.company().await.wrap_err("failed to fetch company info")
}
