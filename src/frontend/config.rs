use std::path::Path;

use color_eyre::eyre::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Api {
    /// GraphQL endpoint every query is posted to.
    pub endpoint: String,
    /// Value of the `platform` header identifying the client.
    pub platform: String,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub api: Api,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            endpoint: "https://api.shine.fr/v2/graphql".to_owned(),
            platform: "WEBAPP".to_owned(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    pub const DEFAULT_PATH: &'static str = "config.toml";
    pub const ENV_PREFIX: &'static str = "SHINE_EXPORT_";

    /// Layers the defaults, the TOML file at `path` (if it exists) and `SHINE_EXPORT_*`
    /// environment variables, later layers winning. Nested keys are split on `__`.
    pub fn figment(path: Option<&Path>) -> Figment {
        let path = path.unwrap_or(Path::new(Self::DEFAULT_PATH));
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"))
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::figment(path)
            .extract::<Config>()
            .wrap_err("failed to load config")
    }
}
