use std::path::PathBuf;

use chrono::NaiveDate;
use uuid::Uuid;

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Exports bank transactions to a JSONL file.
    Fetch(fetch::Args),
    /// Converts exported transactions to CSV.
    Convert(convert::Args),
    /// Shows the company a token belongs to.
    Company(company::Args),
}

pub mod fetch {
    use super::*;

    pub const DEFAULT_OUTPUT: &str = "shine_transactions.jsonl";

    #[derive(clap::Args)]
    pub struct Args {
        /// Bearer token from the Shine web app.
        pub token: String,
        /// Bank account to export.
        #[arg(long)]
        pub bank_account_id: String,
        /// Company profile. Looked up from the token when omitted.
        #[arg(long)]
        pub company_id: Option<Uuid>,
        /// Only export transactions made on or after this date.
        #[arg(long, value_name = "YYYY-MM-DD")]
        pub until: Option<NaiveDate>,
        /// JSONL output path.
        #[arg(long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
        pub output: PathBuf,
    }
}

pub mod convert {
    use super::*;

    pub const DEFAULT_OUTPUT: &str = "shine_transactions.csv";

    #[derive(clap::Args)]
    pub struct Args {
        /// JSONL input path, as written by `fetch`.
        pub input: PathBuf,
        /// CSV output path.
        #[arg(long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
        pub output: PathBuf,
    }
}

pub mod company {
    #[derive(clap::Args)]
    pub struct Args {
        /// Bearer token from the Shine web app.
        pub token: String,
    }
}
