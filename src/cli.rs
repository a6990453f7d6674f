//! Command-line argument parsing for the SQL runner.

use clap::Parser;
use std::path::PathBuf;

/// Runs a SQL script on a Databricks SQL warehouse, refusing CREATE
/// statements that target non-dev catalogs.
#[derive(Parser, Debug)]
#[command(name = "dbx-sql-runner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Databricks workspace hostname (bare or as a URL)
    #[arg(short = 'n', long, env = "DATABRICKS_HOST", value_name = "HOST")]
    pub server_hostname: Option<String>,

    /// SQL warehouse id to execute statements on
    #[arg(short = 'w', long, env = "DATABRICKS_WAREHOUSE_ID", value_name = "ID")]
    pub warehouse_id: Option<String>,

    /// Databricks access token for authentication
    #[arg(
        short = 't',
        long,
        env = "DATABRICKS_TOKEN",
        value_name = "TOKEN",
        hide_env_values = true
    )]
    pub access_token: Option<String>,

    /// Path to the SQL script to run
    #[arg(short = 'f', long, value_name = "PATH")]
    pub file: PathBuf,

    /// Named warehouse profile from the config file
    #[arg(short = 'p', long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Validate and classify every statement without sending any of them
    /// to the warehouse
    #[arg(long)]
    pub dry_run: bool,

    /// Rewrite the script so every statement runs as an EXPLAIN
    #[arg(long)]
    pub prepend_explain: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }

    /// Returns the named profile to use, if specified.
    pub fn profile_name(&self) -> Option<&str> {
        self.profile.as_deref()
    }
}
