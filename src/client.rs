//! HTTP client for the dashboard's assistant endpoints.
//!
//! All routes live under `<base_url>/api/<environment>/ai/`:
//!
//! | Method | Route | Payload |
//! |--------|-------|---------|
//! | POST | `natural-language` | `{ "query": text }` |
//! | POST | `execute-query` | `{ "sql": sql, "safetyCheck": bool }` |
//! | GET | `optimization-recommendations` | - |
//! | GET | `security-audit` | - |
//!
//! SQL sent to `execute-query` passes the same gates locally first, so an
//! unsafe statement never leaves the machine.
//!
//! # Retry Behavior
//!
//! Transient failures (timeouts, connection failures, 429, 5xx) are retried
//! with exponential backoff per [`RetryConfig`].
//!
//! ```
//! use query_assistant::{client::DashboardClient, config::RetryConfig};
//!
//! let client = DashboardClient::with_retry_config(
//!     "http://localhost:5002",
//!     "dev",
//!     RetryConfig::default()
//! );
//! assert_eq!(
//!     client.endpoint("security-audit"),
//!     "http://localhost:5002/api/dev/ai/security-audit"
//! );
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::time::sleep;

use crate::{
    assistant::Translation,
    audit::{SecurityAlert, SecurityFindings},
    config::RetryConfig,
    error::{AppError, AppResult, dashboard_api_error, http_error, missing_input_error},
    recommend::{DatabaseStats, Recommendation},
    safety::{GateOptions, gate}
};

#[derive(Debug, Clone, Serialize)]
struct NaturalLanguageRequest<'a> {
    query: &'a str
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteQueryRequest<'a> {
    sql:          &'a str,
    safety_check: bool
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    error:    Option<String>,
    #[serde(default)]
    details:  Option<String>,
    #[serde(default)]
    warnings: Vec<String>
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaturalLanguageResponse {
    pub success:   bool,
    pub result:    Translation,
    pub timestamp: String
}

/// Column metadata of an executed query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInfo {
    pub name:         String,
    #[serde(rename = "dataTypeID")]
    pub data_type_id: u32
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteQueryResponse {
    pub success:        bool,
    #[serde(default)]
    pub data:           Vec<serde_json::Value>,
    #[serde(default)]
    pub row_count:      Option<u64>,
    pub execution_time: u64,
    #[serde(default)]
    pub fields:         Vec<FieldInfo>,
    pub timestamp:      String
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResponse {
    pub success:         bool,
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub database_stats:  DatabaseStats,
    pub timestamp:       String
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityAuditResponse {
    pub success:   bool,
    pub alerts:    Vec<SecurityAlert>,
    #[serde(default)]
    pub details:   SecurityFindings,
    pub timestamp: String
}

/// Client for one dashboard environment.
pub struct DashboardClient {
    base_url:     String,
    environment:  String,
    client:       reqwest::Client,
    retry_config: RetryConfig
}

impl DashboardClient {
    /// Create new client with default retry configuration
    pub fn new(base_url: &str, environment: &str) -> Self {
        Self::with_retry_config(base_url, environment, RetryConfig::default())
    }

    /// Create new client with custom retry configuration
    pub fn with_retry_config(base_url: &str, environment: &str, retry_config: RetryConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            environment: environment.to_string(),
            client,
            retry_config
        }
    }

    /// Full URL of an assistant route
    pub fn endpoint(&self, route: &str) -> String {
        format!("{}/api/{}/ai/{}", self.base_url, self.environment, route)
    }

    /// Ask the dashboard to translate free text
    pub async fn natural_language(&self, text: &str) -> AppResult<NaturalLanguageResponse> {
        if text.trim().is_empty() {
            return Err(missing_input_error("Query text"));
        }
        let body = NaturalLanguageRequest {
            query: text
        };
        self.with_retry(|| self.post("natural-language", &body)).await
    }

    /// Execute SQL on the dashboard after local gating
    pub async fn execute_query(&self, sql: &str, safety_check: bool) -> AppResult<ExecuteQueryResponse> {
        gate(
            sql,
            GateOptions {
                readonly: false,
                safety_check
            }
        )?;
        let body = ExecuteQueryRequest {
            sql,
            safety_check
        };
        self.with_retry(|| self.post("execute-query", &body)).await
    }

    pub async fn optimization_recommendations(&self) -> AppResult<OptimizationResponse> {
        self.with_retry(|| self.get("optimization-recommendations"))
            .await
    }

    pub async fn security_audit(&self) -> AppResult<SecurityAuditResponse> {
        self.with_retry(|| self.get("security-audit")).await
    }

    async fn with_retry<T, F, Fut>(&self, mut call: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, Failure>>
    {
        let mut last_error = None;
        let mut delay = self.retry_config.initial_delay_ms;
        for attempt in 0..=self.retry_config.max_retries {
            if attempt > 0 {
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts = self.retry_config.max_retries + 1,
                    delay_ms = delay,
                    "retrying dashboard request"
                );
                sleep(Duration::from_millis(delay)).await;
                delay = next_delay(delay, &self.retry_config);
            }
            match call().await {
                Ok(result) => return Ok(result),
                Err(Failure::Transient(e)) => {
                    last_error = Some(e);
                    continue;
                }
                Err(Failure::Fatal(e)) => return Err(e)
            }
        }
        Err(last_error.unwrap_or_else(|| dashboard_api_error("All retry attempts failed")))
    }

    async fn post<B, T>(&self, route: &str, body: &B) -> Result<T, Failure>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned
    {
        let url = self.endpoint(route);
        tracing::info!(%url, "POST dashboard request");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(Failure::from_transport)?;
        parse_response(route, response).await
    }

    async fn get<T>(&self, route: &str) -> Result<T, Failure>
    where
        T: DeserializeOwned
    {
        let url = self.endpoint(route);
        tracing::info!(%url, "GET dashboard request");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Failure::from_transport)?;
        parse_response(route, response).await
    }
}

/// Outcome of a failed attempt
enum Failure {
    Transient(AppError),
    Fatal(AppError)
}

impl Failure {
    fn from_transport(err: reqwest::Error) -> Self {
        let retryable = err.is_timeout() || err.is_connect();
        let error = http_error(err);
        if retryable {
            Self::Transient(error)
        } else {
            Self::Fatal(error)
        }
    }
}

async fn parse_response<T>(route: &str, response: reqwest::Response) -> Result<T, Failure>
where
    T: DeserializeOwned
{
    let status = response.status().as_u16();
    if !(200..300).contains(&status) {
        let text = response.text().await.unwrap_or_default();
        let error = dashboard_api_error(format!(
            "Dashboard API error {} on {}: {}",
            status,
            route,
            error_summary(&text)
        ));
        return Err(if is_retryable_status(status) {
            Failure::Transient(error)
        } else {
            Failure::Fatal(error)
        });
    }
    response
        .json()
        .await
        .map_err(|e| Failure::Fatal(http_error(e)))
}

/// Human-readable summary of a dashboard error body.
///
/// Bodies look like `{"error": "...", "details": "...", "warnings": [...]}`;
/// anything else is returned verbatim.
pub fn error_summary(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return body.to_string();
    };
    let mut summary = parsed.error.unwrap_or_else(|| body.to_string());
    if let Some(details) = parsed.details {
        summary.push_str(&format!(" ({})", details));
    }
    if !parsed.warnings.is_empty() {
        summary.push_str(&format!(": {}", parsed.warnings.join("; ")));
    }
    summary
}

/// Backoff step, capped at `max_delay_ms`
pub fn next_delay(delay: u64, config: &RetryConfig) -> u64 {
    ((delay as f64 * config.backoff_factor) as u64).min(config.max_delay_ms)
}

/// Rate limiting and server errors are worth retrying
pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}
