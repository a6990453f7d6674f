//! End-to-end gate tests over the mock warehouse client.
//!
//! Exercises the full path a CI invocation takes: script file on disk,
//! segmentation, classification, catalog gate, dispatch, scoped close.

use std::io::Write;
use std::sync::atomic::Ordering;

use dbx_sql_runner::db::MockWarehouseClient;
use dbx_sql_runner::error::RunnerError;
use dbx_sql_runner::runner::{run_script, ScriptRunner};
use dbx_sql_runner::safety::StatementClass;
use dbx_sql_runner::script::prepend_explain;

const DEPLOY_SCRIPT: &str = "\
-- create the staging table
CREATE TABLE sales_dev.staging.orders (
    id INT,
    note STRING -- free text; may contain ';'
);

/* seed data;
   spans lines */
INSERT INTO sales_dev.staging.orders VALUES (1, 'first; order');

EXPLAIN INSERT INTO sales_dev.staging.orders VALUES (2, 'second');
";

#[tokio::test]
async fn test_full_script_runs_in_order_with_comments_stripped() {
    let client = MockWarehouseClient::new();
    let runner = ScriptRunner::new(&client, false).unwrap();

    let summary = runner.run(DEPLOY_SCRIPT).await.unwrap();
    assert_eq!(summary.statement_count(), 3);
    assert_eq!(summary.executed_count(), 3);
    assert_eq!(summary.reports[0].class, StatementClass::DdlDml);
    assert_eq!(summary.reports[2].class, StatementClass::Explain);

    let executed = client.executed_statements();
    assert_eq!(executed.len(), 3);
    // Comments are gone but the quoted semicolon survives.
    assert!(executed[0].starts_with("CREATE TABLE sales_dev.staging.orders"));
    assert!(!executed[0].contains("staging table"));
    assert!(executed[1].contains("'first; order'"));
    assert!(!executed[1].contains("spans lines"));
}

#[tokio::test]
async fn test_script_file_from_disk_round_trips() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{DEPLOY_SCRIPT}").unwrap();

    let script = std::fs::read_to_string(file.path()).unwrap();
    let client = MockWarehouseClient::new();
    let closes = client.close_counter();

    let summary = run_script(Box::new(client), &script, false).await.unwrap();
    assert_eq!(summary.statement_count(), 3);
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_prod_create_aborts_the_whole_run() {
    let script = "\
CREATE TABLE sales_dev.staging.orders (id INT);
CREATE TABLE sales_prod.staging.orders (id INT);
INSERT INTO sales_dev.staging.orders VALUES (1);
";
    let client = MockWarehouseClient::new();
    let runner = ScriptRunner::new(&client, false).unwrap();

    let err = runner.run(script).await.unwrap_err();
    match err {
        RunnerError::CatalogPolicy(msg) => {
            assert!(msg.contains("sales_prod.staging.orders"));
        }
        other => panic!("expected CatalogPolicy, got {other:?}"),
    }

    // The dev CREATE ran; the rejected statement and everything after it
    // did not.
    assert_eq!(
        client.executed_statements(),
        vec!["CREATE TABLE sales_dev.staging.orders (id INT)"]
    );
}

#[tokio::test]
async fn test_dry_run_touches_nothing() {
    let client = MockWarehouseClient::new();
    let closes = client.close_counter();
    let calls = client.executed_statements();
    assert!(calls.is_empty());

    let summary = run_script(Box::new(client), DEPLOY_SCRIPT, true).await.unwrap();
    assert_eq!(summary.statement_count(), 3);
    assert_eq!(summary.executed_count(), 0);
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_prepend_explain_script_is_all_explains() {
    let script = prepend_explain(
        "INSERT INTO sales_dev.staging.orders VALUES (1); DELETE FROM sales_dev.staging.orders;",
    );

    let client = MockWarehouseClient::new();
    let runner = ScriptRunner::new(&client, false).unwrap();
    let summary = runner.run(&script).await.unwrap();

    assert_eq!(summary.statement_count(), 2);
    for report in &summary.reports {
        assert_eq!(report.class, StatementClass::Explain);
    }
    for statement in client.executed_statements() {
        assert!(statement.starts_with("EXPLAIN "));
    }
}

#[tokio::test]
async fn test_planning_error_marker_fails_an_explain_script() {
    let client = MockWarehouseClient::with_plan(vec![
        "Error occurred during query planning:".to_string(),
        "[TABLE_OR_VIEW_NOT_FOUND] The table cannot be found".to_string(),
    ]);
    let runner = ScriptRunner::new(&client, false).unwrap();

    let err = runner.run("EXPLAIN SELECT * FROM nowhere;").await.unwrap_err();
    match err {
        RunnerError::Planning(plan) => {
            assert!(plan.contains("TABLE_OR_VIEW_NOT_FOUND"));
        }
        other => panic!("expected Planning, got {other:?}"),
    }
}
