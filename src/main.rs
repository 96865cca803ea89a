use clap::Parser;
use color_eyre::eyre::Result;
use shine_export::{
    cmd,
    frontend::{cli::Commands, Cli, Config},
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    install_tracing();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Fetch(args) => cmd::fetch::fetch(&config, args).await?,
        Commands::Convert(args) => {
            cmd::convert::convert(args)?;
        }
        Commands::Company(args) => cmd::company::company(&config, args).await?,
    }

    Ok(())
}

fn install_tracing() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let fmt_layer = fmt::layer();
    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("shine_export=info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();
}
