//! Configuration: environment fallbacks plus merged, validated run options.
//!
//! Connection and credential settings can come from the environment (or a
//! `.env` file loaded at startup); command-line flags take precedence. A
//! configuration problem is fatal to the whole run and is reported before
//! any fetching or decryption starts.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

use loggenie_core::crypto::CipherFamily;
use loggenie_core::record::FILE_INDEX;

use crate::cli::{Cli, OutputFormat};
use crate::search::Auth;

/// Environment-sourced settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// `ELASTICSEARCH_URL`
    pub elasticsearch_url: Option<String>,
    /// `KIBANA_URL` — fallback when no Elasticsearch URL is set.
    pub kibana_url: Option<String>,
    /// `ENCRYPTION_KEY`
    pub encryption_key: Option<String>,
    /// `ENCRYPTION_ALGORITHM`
    pub encryption_algorithm: Option<String>,
    /// `ELASTICSEARCH_USERNAME`
    pub elasticsearch_username: Option<String>,
    /// `ELASTICSEARCH_PASSWORD`
    pub elasticsearch_password: Option<String>,
    /// `ELASTICSEARCH_API_KEY`
    pub elasticsearch_api_key: Option<String>,
    /// `LOG_LEVEL` (e.g. `"info"`, `"debug"`)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a present variable cannot be deserialised.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        cfg.try_deserialize()
            .context("failed to deserialise configuration")
    }
}

/// Where records come from.
#[derive(Debug, Clone)]
pub enum Source {
    /// A local JSON/NDJSON file.
    File(PathBuf),
    /// An Elasticsearch-compatible search backend.
    Backend { url: String, auth: Auth },
}

/// The fully merged and validated options for one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub source: Source,
    pub index: String,
    pub key: String,
    pub family: CipherFamily,
    pub field: String,
    pub query: Option<Value>,
    pub size: usize,
    pub scroll: bool,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
}

impl RunOptions {
    /// Merge command-line flags over environment settings and validate.
    ///
    /// # Errors
    ///
    /// Returns an error for any misconfiguration that would apply to every
    /// record: missing key, unknown algorithm, missing source or index, or
    /// an unparseable `--query`.
    pub fn merge(cli: Cli, env: Settings) -> Result<Self> {
        let key = cli
            .key
            .or(env.encryption_key)
            .context("--key is required (or set ENCRYPTION_KEY)")?;

        let algorithm = cli
            .algorithm
            .or(env.encryption_algorithm)
            .unwrap_or_else(|| "AES-256-CBC".to_owned());
        let family: CipherFamily = algorithm.parse()?;

        let query = cli
            .query
            .map(|q| serde_json::from_str::<Value>(&q))
            .transpose()
            .context("invalid JSON query")?;

        let (source, index) = if let Some(path) = cli.file {
            // Index is optional in file mode.
            let index = cli.index.unwrap_or_else(|| FILE_INDEX.to_owned());
            (Source::File(path), index)
        } else {
            let url = cli
                .elasticsearch_url
                .or(env.elasticsearch_url)
                .or(cli.kibana_url)
                .or(env.kibana_url)
                .context("either --file, --elasticsearch-url, or --kibana-url must be provided")?;
            let index = cli
                .index
                .context("--index is required when not using --file")?;

            let auth = match (
                cli.api_key.or(env.elasticsearch_api_key),
                cli.username.or(env.elasticsearch_username),
                cli.password.or(env.elasticsearch_password),
            ) {
                (Some(api_key), _, _) => Auth::ApiKey(api_key),
                (None, Some(username), Some(password)) => Auth::Basic { username, password },
                _ => Auth::None,
            };
            (Source::Backend { url, auth }, index)
        };

        Ok(Self {
            source,
            index,
            key,
            family,
            field: cli.field,
            query,
            size: cli.size,
            scroll: cli.scroll,
            output: cli.output,
            format: cli.format,
        })
    }
}
