//! Mock warehouse clients for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{ColumnInfo, QueryResult, Value, WarehouseClient};
use crate::error::{Result, RunnerError};

/// A mock warehouse client that records executed statements.
///
/// EXPLAIN statements return the configured plan rows (one text cell per
/// row); everything else returns an empty result.
pub struct MockWarehouseClient {
    plan_rows: Vec<String>,
    calls: Mutex<Vec<String>>,
    closes: Arc<AtomicUsize>,
}

impl MockWarehouseClient {
    /// Creates a mock whose EXPLAINs return a benign single-row plan.
    pub fn new() -> Self {
        Self::with_plan(vec!["== Physical Plan ==".to_string()])
    }

    /// Creates a mock whose EXPLAINs return the given plan rows.
    pub fn with_plan(plan_rows: Vec<String>) -> Self {
        Self {
            plan_rows,
            calls: Mutex::new(Vec::new()),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns the statements executed so far, in call order.
    pub fn executed_statements(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Returns a handle counting close() calls, usable after the client
    /// has been consumed.
    pub fn close_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }
}

impl Default for MockWarehouseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WarehouseClient for MockWarehouseClient {
    async fn execute(&self, sql: &str) -> Result<QueryResult> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(sql.to_string());
        }

        if sql.trim_start().to_uppercase().starts_with("EXPLAIN") {
            let columns = vec![ColumnInfo::new("plan", "string")];
            let rows = self
                .plan_rows
                .iter()
                .map(|line| vec![Value::from(line.as_str())])
                .collect();
            Ok(QueryResult::with_data(columns, rows))
        } else {
            Ok(QueryResult::new())
        }
    }

    async fn close(&self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A warehouse client whose every execution fails with a fixed message.
pub struct FailingWarehouseClient {
    message: String,
}

impl FailingWarehouseClient {
    /// Creates a failing client reporting the given error message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl WarehouseClient for FailingWarehouseClient {
    async fn execute(&self, _sql: &str) -> Result<QueryResult> {
        Err(RunnerError::execution(self.message.clone()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
