//! Live warehouse tests.
//!
//! These require a reachable Databricks SQL warehouse and skip themselves
//! when the DATABRICKS_* environment variables are unset.

use dbx_sql_runner::config::{normalize_hostname, WarehouseConfig};
use dbx_sql_runner::db::{DatabricksClient, WarehouseClient};
use dbx_sql_runner::runner::ScriptRunner;

/// Helper to build a client from the environment.
fn get_test_client() -> Option<DatabricksClient> {
    let host = std::env::var("DATABRICKS_HOST").ok()?;
    let warehouse_id = std::env::var("DATABRICKS_WAREHOUSE_ID").ok()?;
    let access_token = std::env::var("DATABRICKS_TOKEN").ok()?;

    let config = WarehouseConfig {
        server_hostname: normalize_hostname(&host),
        warehouse_id,
        access_token,
    };
    DatabricksClient::new(&config).ok()
}

#[tokio::test]
async fn test_explain_select_one() {
    let Some(client) = get_test_client() else {
        eprintln!("Skipping test: DATABRICKS_HOST/DATABRICKS_WAREHOUSE_ID/DATABRICKS_TOKEN not set");
        return;
    };

    let result = client.execute("EXPLAIN SELECT 1").await.unwrap();
    assert!(!result.is_empty());

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_gate_runs_explain_script_against_warehouse() {
    let Some(client) = get_test_client() else {
        eprintln!("Skipping test: DATABRICKS_HOST/DATABRICKS_WAREHOUSE_ID/DATABRICKS_TOKEN not set");
        return;
    };

    let runner = ScriptRunner::new(&client, false).unwrap();
    let summary = runner.run("EXPLAIN SELECT 1; EXPLAIN SELECT 2;").await.unwrap();
    assert_eq!(summary.statement_count(), 2);

    client.close().await.unwrap();
}
