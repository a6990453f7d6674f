//! dbx-sql-runner - runs SQL scripts on a Databricks SQL warehouse with a
//! dev-catalog safety gate.

use std::fs;

use tracing::{error, info};

use dbx_sql_runner::cli::Cli;
use dbx_sql_runner::config::{self, Config, WarehouseConfig};
use dbx_sql_runner::db;
use dbx_sql_runner::error::{Result, RunnerError};
use dbx_sql_runner::{logging, runner, script};

#[tokio::main]
async fn main() {
    // Load .env before clap reads its env fallbacks.
    let _ = dotenvy::dotenv();
    logging::init();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config_path = cli.config_path();
    let config = Config::load_from_file(&config_path)?;

    let warehouse = resolve_warehouse(&cli, &config)?;
    info!("Warehouse: {}", warehouse.display_string());

    let mut script_text = fs::read_to_string(&cli.file).map_err(|e| {
        RunnerError::config(format!(
            "Could not read script file {}: {e}",
            cli.file.display()
        ))
    })?;

    if cli.prepend_explain {
        script_text = script::prepend_explain(&script_text);
    }

    let client = db::connect(&warehouse)?;
    let summary = runner::run_script(client, &script_text, cli.dry_run).await?;

    info!(
        statements = summary.statement_count(),
        executed = summary.executed_count(),
        "script completed"
    );
    Ok(())
}

/// Resolves the warehouse parameters with precedence:
/// CLI arguments (including their env fallbacks), then the named profile.
/// Tokens never come from the config file.
fn resolve_warehouse(cli: &Cli, config: &Config) -> Result<WarehouseConfig> {
    let profile = match cli.profile_name() {
        Some(name) => Some(config.get_profile(name).ok_or_else(|| {
            RunnerError::config(format!("Profile '{name}' not found in config file"))
        })?),
        None => None,
    };

    let server_hostname = cli
        .server_hostname
        .clone()
        .or_else(|| profile.and_then(|p| p.server_hostname.clone()))
        .ok_or_else(|| {
            RunnerError::config(
                "No workspace hostname: pass --server-hostname, set DATABRICKS_HOST, \
                 or select a profile",
            )
        })?;

    let warehouse_id = cli
        .warehouse_id
        .clone()
        .or_else(|| profile.and_then(|p| p.warehouse_id.clone()))
        .ok_or_else(|| {
            RunnerError::config(
                "No warehouse id: pass --warehouse-id, set DATABRICKS_WAREHOUSE_ID, \
                 or select a profile",
            )
        })?;

    let access_token = cli.access_token.clone().ok_or_else(|| {
        RunnerError::config("No access token: pass --access-token or set DATABRICKS_TOKEN")
    })?;

    Ok(WarehouseConfig {
        server_hostname: config::normalize_hostname(&server_hostname),
        warehouse_id,
        access_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use dbx_sql_runner::config::ProfileConfig;

    #[test]
    fn test_cli_args_take_precedence_over_profile() {
        let cli = Cli::parse_from([
            "dbx-sql-runner",
            "-n",
            "https://adb-cli.azuredatabricks.net/extra",
            "-w",
            "cli-warehouse",
            "-t",
            "cli-token",
            "-p",
            "staging",
            "-f",
            "deploy.sql",
        ]);

        let mut config = Config::default();
        config.profiles.insert(
            "staging".to_string(),
            ProfileConfig {
                server_hostname: Some("profile-host.net".to_string()),
                warehouse_id: Some("profile-warehouse".to_string()),
            },
        );

        let warehouse = resolve_warehouse(&cli, &config).unwrap();
        assert_eq!(warehouse.server_hostname, "adb-cli.azuredatabricks.net");
        assert_eq!(warehouse.warehouse_id, "cli-warehouse");
        assert_eq!(warehouse.access_token, "cli-token");
    }

    #[test]
    fn test_profile_fills_missing_connection_args() {
        let cli = Cli::parse_from([
            "dbx-sql-runner",
            "-t",
            "cli-token",
            "-p",
            "staging",
            "-f",
            "deploy.sql",
        ]);

        let mut config = Config::default();
        config.profiles.insert(
            "staging".to_string(),
            ProfileConfig {
                server_hostname: Some("adb-profile.azuredatabricks.net".to_string()),
                warehouse_id: Some("profile-warehouse".to_string()),
            },
        );

        let warehouse = resolve_warehouse(&cli, &config).unwrap();
        assert_eq!(warehouse.server_hostname, "adb-profile.azuredatabricks.net");
        assert_eq!(warehouse.warehouse_id, "profile-warehouse");
    }

    #[test]
    fn test_unknown_profile_is_a_config_error() {
        let cli = Cli::parse_from(["dbx-sql-runner", "-p", "missing", "-f", "deploy.sql"]);
        let err = resolve_warehouse(&cli, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("'missing' not found"));
    }
}
