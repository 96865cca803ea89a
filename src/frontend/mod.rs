pub mod cli;
pub mod config;

pub use self::{cli::Cli, config::Config};
