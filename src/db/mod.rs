//! Warehouse client abstraction.
//!
//! Provides a trait-based interface for statement execution, so the
//! execution gate can run against the real Databricks warehouse or the
//! in-memory mocks used in tests.

mod databricks;
mod mock;
mod types;

pub use databricks::DatabricksClient;
pub use mock::{FailingWarehouseClient, MockWarehouseClient};
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::config::WarehouseConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Creates a warehouse client for the given configuration.
pub fn connect(config: &WarehouseConfig) -> Result<Box<dyn WarehouseClient>> {
    let client = DatabricksClient::new(config)?;
    Ok(Box::new(client))
}

/// Trait defining the interface for warehouse clients.
///
/// Errors carry the warehouse's machine-readable error code and message
/// in their text.
#[async_trait]
pub trait WarehouseClient: Send + Sync {
    /// Executes a single SQL statement and returns its result rows.
    async fn execute(&self, sql: &str) -> Result<QueryResult>;

    /// Releases the underlying connection/session.
    async fn close(&self) -> Result<()>;
}
