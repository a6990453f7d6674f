//! Per-statement processing: classify, apply the catalog gate, dispatch.
//!
//! The runner holds everything it needs explicitly (client, policy,
//! dry-run flag) and fails fast: the first rejected or failed statement
//! aborts the run, leaving earlier statements applied. There is no
//! transaction wrapping and no rollback.

use tracing::{error, info};

use crate::db::{QueryResult, WarehouseClient};
use crate::error::{Result, RunnerError};
use crate::safety::{classify, first_keyword, CatalogPolicy, StatementClass};
use crate::script::split_statements;

use super::{RunSummary, StatementReport};

/// Case-insensitive marker in EXPLAIN output that flags a planning failure.
const PLANNING_ERROR_MARKER: &str = "error occurred during query planning";

/// Processes a script's statements in source order against one client.
pub struct ScriptRunner<'a> {
    client: &'a dyn WarehouseClient,
    policy: CatalogPolicy,
    dry_run: bool,
}

impl<'a> ScriptRunner<'a> {
    /// Creates a runner over the given client.
    pub fn new(client: &'a dyn WarehouseClient, dry_run: bool) -> Result<Self> {
        Ok(Self {
            client,
            policy: CatalogPolicy::new()?,
            dry_run,
        })
    }

    /// Runs every statement of the script, stopping at the first failure.
    pub async fn run(&self, script: &str) -> Result<RunSummary> {
        let statements = split_statements(script);
        info!(
            count = statements.len(),
            dry_run = self.dry_run,
            "processing script"
        );

        let mut summary = RunSummary::default();
        for statement in statements {
            match self.run_statement(&statement).await {
                Ok(report) => summary.reports.push(report),
                Err(e) => {
                    error!(statement = %statement, "{}: {}", e.category(), e);
                    return Err(e);
                }
            }
        }
        Ok(summary)
    }

    async fn run_statement(&self, statement: &str) -> Result<StatementReport> {
        let class = classify(statement);
        let keyword = first_keyword(statement).unwrap_or_default();
        info!(%class, "running SQL statement:\n{statement}");

        // The catalog gate applies to CREATE before anything is dispatched.
        if keyword == "CREATE" {
            self.policy.check_create(statement)?;
        }

        let executed = match class {
            StatementClass::DdlDml => {
                if self.dry_run {
                    info!("dry run: not sending {keyword} statement to the warehouse");
                    false
                } else {
                    self.client.execute(statement).await?;
                    info!("{keyword} succeeded");
                    true
                }
            }
            StatementClass::Explain => {
                if self.dry_run {
                    info!("dry run: not sending EXPLAIN statement to the warehouse");
                    false
                } else {
                    let result = self.client.execute(statement).await?;
                    let plan = plan_text(&result);
                    if plan.to_lowercase().contains(PLANNING_ERROR_MARKER) {
                        return Err(RunnerError::planning(plan));
                    }
                    info!("EXPLAIN succeeded");
                    true
                }
            }
            StatementClass::Unsupported => {
                return Err(RunnerError::unsupported_statement(format!(
                    "statement starting with '{keyword}' is neither DDL/DML nor EXPLAIN"
                )));
            }
        };

        Ok(StatementReport {
            statement: statement.to_string(),
            class,
            executed,
        })
    }
}

/// Runs a script with scoped client acquisition.
///
/// The client is closed on every exit path; the run's error takes
/// precedence over a close failure.
pub async fn run_script(
    client: Box<dyn WarehouseClient>,
    script: &str,
    dry_run: bool,
) -> Result<RunSummary> {
    let outcome = match ScriptRunner::new(client.as_ref(), dry_run) {
        Ok(runner) => runner.run(script).await,
        Err(e) => Err(e),
    };
    let closed = client.close().await;
    let summary = outcome?;
    closed?;
    Ok(summary)
}

/// Concatenates the first cell of every plan row, as the warehouse returns
/// the plan one text cell per row.
fn plan_text(result: &QueryResult) -> String {
    result
        .rows
        .iter()
        .filter_map(|row| row.first())
        .map(|cell| cell.to_display_string())
        .collect()
}
