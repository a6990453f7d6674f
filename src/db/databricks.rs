//! Databricks warehouse client.
//!
//! Implements the WarehouseClient trait over the Databricks SQL Statement
//! Execution API: statements are submitted to the warehouse, then polled
//! until they leave the PENDING/RUNNING states.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ColumnInfo, QueryResult, Value, WarehouseClient};
use crate::config::WarehouseConfig;
use crate::error::{Result, RunnerError};

/// Default timeout for individual API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Statement Execution API path.
const STATEMENTS_API_PATH: &str = "/api/2.0/sql/statements";

/// Server-side wait before the API hands back a pending statement.
const WAIT_TIMEOUT: &str = "30s";

/// Delay between polls for a still-running statement.
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Client for a Databricks SQL warehouse.
#[derive(Debug, Clone)]
pub struct DatabricksClient {
    http: Client,
    base_url: String,
    warehouse_id: String,
    access_token: String,
}

impl DatabricksClient {
    /// Creates a new client for the given warehouse configuration.
    pub fn new(config: &WarehouseConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| RunnerError::connection(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: format!("https://{}", config.server_hostname),
            warehouse_id: config.warehouse_id.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// Submits a statement to the warehouse.
    async fn submit(&self, sql: &str) -> Result<StatementResponse> {
        let request = SubmitRequest {
            statement: sql,
            warehouse_id: &self.warehouse_id,
            wait_timeout: WAIT_TIMEOUT,
            on_wait_timeout: "CONTINUE",
        };

        let url = format!("{}{}", self.base_url, STATEMENTS_API_PATH);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RunnerError::connection("Request to the warehouse timed out")
                } else if e.is_connect() {
                    RunnerError::connection(format!(
                        "Failed to reach the Databricks workspace: {e}"
                    ))
                } else {
                    RunnerError::connection(format!("Request failed: {e}"))
                }
            })?;

        Self::read_response(response).await
    }

    /// Fetches the current state of a previously submitted statement.
    async fn fetch(&self, statement_id: &str) -> Result<StatementResponse> {
        let url = format!(
            "{}{}/{}",
            self.base_url, STATEMENTS_API_PATH, statement_id
        );
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| RunnerError::connection(format!("Poll request failed: {e}")))?;

        Self::read_response(response).await
    }

    /// Deserializes a response body, mapping HTTP-level failures.
    async fn read_response(response: reqwest::Response) -> Result<StatementResponse> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RunnerError::connection(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Self::parse_error(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| RunnerError::connection(format!("Failed to parse response: {e}")))
    }

    /// Parses an API error response into a runner error.
    fn parse_error(status: reqwest::StatusCode, body: &str) -> RunnerError {
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return RunnerError::connection(
                "Authentication failed. Check your Databricks access token.",
            );
        }

        if let Ok(error) = serde_json::from_str::<ApiError>(body) {
            return RunnerError::execution(error.to_message());
        }

        RunnerError::connection(format!("Databricks API error ({status}): {body}"))
    }

    /// Converts a terminal SUCCEEDED response into a query result.
    fn to_query_result(response: StatementResponse) -> QueryResult {
        let columns = response
            .manifest
            .map(|manifest| {
                manifest
                    .schema
                    .columns
                    .into_iter()
                    .map(|column| ColumnInfo::new(column.name, column.type_name))
                    .collect()
            })
            .unwrap_or_default();

        let rows = response
            .result
            .map(|data| {
                data.data_array
                    .into_iter()
                    .map(|row| row.into_iter().map(Value::from).collect())
                    .collect()
            })
            .unwrap_or_default();

        QueryResult::with_data(columns, rows)
    }
}

#[async_trait]
impl WarehouseClient for DatabricksClient {
    async fn execute(&self, sql: &str) -> Result<QueryResult> {
        let mut response = self.submit(sql).await?;

        loop {
            match response.status.state.as_str() {
                "SUCCEEDED" => return Ok(Self::to_query_result(response)),
                "PENDING" | "RUNNING" => {
                    tokio::time::sleep(POLL_INTERVAL).await;
                    response = self.fetch(&response.statement_id).await?;
                }
                other => {
                    let state = other.to_string();
                    let message = response
                        .status
                        .error
                        .map(|error| error.to_message())
                        .unwrap_or_else(|| format!("statement finished in state {state}"));
                    return Err(RunnerError::execution(message));
                }
            }
        }
    }

    async fn close(&self) -> Result<()> {
        // The Statement Execution API is stateless; nothing to tear down.
        Ok(())
    }
}

// Statement Execution API types

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    statement: &'a str,
    warehouse_id: &'a str,
    wait_timeout: &'a str,
    on_wait_timeout: &'a str,
}

#[derive(Debug, Deserialize)]
struct StatementResponse {
    #[serde(default)]
    statement_id: String,
    status: StatementStatus,
    #[serde(default)]
    manifest: Option<Manifest>,
    #[serde(default)]
    result: Option<ResultData>,
}

#[derive(Debug, Deserialize)]
struct StatementStatus {
    state: String,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    error_code: String,
    #[serde(default)]
    message: String,
}

impl ApiError {
    /// Formats the machine-readable code/message pair.
    fn to_message(&self) -> String {
        if self.error_code.is_empty() {
            self.message.clone()
        } else {
            format!("{}: {}", self.error_code, self.message)
        }
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    schema: SchemaInfo,
}

#[derive(Debug, Default, Deserialize)]
struct SchemaInfo {
    #[serde(default)]
    columns: Vec<ColumnDesc>,
}

#[derive(Debug, Deserialize)]
struct ColumnDesc {
    name: String,
    #[serde(default)]
    type_name: String,
}

#[derive(Debug, Deserialize)]
struct ResultData {
    #[serde(default)]
    data_array: Vec<Vec<Option<String>>>,
}
