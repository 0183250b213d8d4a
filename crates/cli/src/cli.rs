//! Command-line surface.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Fetch and decrypt encrypted logs from Elasticsearch/Kibana or flat files.
#[derive(Debug, Parser)]
#[command(name = "loggenie", version, about)]
pub struct Cli {
    /// Elasticsearch URL (env: ELASTICSEARCH_URL)
    #[arg(long)]
    pub elasticsearch_url: Option<String>,

    /// Kibana URL, used when --elasticsearch-url is absent (env: KIBANA_URL)
    #[arg(long)]
    pub kibana_url: Option<String>,

    /// Index name or pattern (not required with --file)
    #[arg(long)]
    pub index: Option<String>,

    /// Encryption key: hex, base64, or passphrase (env: ENCRYPTION_KEY)
    #[arg(long)]
    pub key: Option<String>,

    /// Encryption algorithm (env: ENCRYPTION_ALGORITHM) [default: AES-256-CBC]
    #[arg(long)]
    pub algorithm: Option<String>,

    /// Field name containing encrypted data
    #[arg(long, default_value = "message")]
    pub field: String,

    /// Search query in JSON format
    #[arg(long)]
    pub query: Option<String>,

    /// Number of logs to fetch
    #[arg(long, default_value_t = 100)]
    pub size: usize,

    /// Page through all matching logs with the scroll API instead of a
    /// single bounded search
    #[arg(long)]
    pub scroll: bool,

    /// Basic auth username (env: ELASTICSEARCH_USERNAME)
    #[arg(long)]
    pub username: Option<String>,

    /// Basic auth password (env: ELASTICSEARCH_PASSWORD)
    #[arg(long)]
    pub password: Option<String>,

    /// API key authentication (env: ELASTICSEARCH_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Read logs from a JSON/NDJSON file instead of a backend
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Write output to a file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// How decrypted records are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Text,
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["loggenie"]);
        assert_eq!(cli.field, "message");
        assert_eq!(cli.size, 100);
        assert_eq!(cli.format, OutputFormat::Table);
        assert!(!cli.scroll);
    }

    #[test]
    fn format_values_parse() {
        let cli = Cli::parse_from(["loggenie", "--format", "csv"]);
        assert_eq!(cli.format, OutputFormat::Csv);
    }
}
