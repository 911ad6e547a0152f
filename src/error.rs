pub use masterror::{AppError, AppResult};

/// Create file read error
pub fn file_read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to read file '{}': {}", path, source))
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Create error for a pattern rule that cannot be compiled or is out of range
pub fn rule_pattern_error(key: &str, message: impl Into<String>) -> AppError {
    AppError::bad_request(format!("Invalid pattern rule '{}': {}", key, message.into()))
}

/// Create error for JSON/YAML input files (stats, findings)
pub fn input_parse_error(source: &str, message: impl Into<String>) -> AppError {
    AppError::bad_request(format!("Failed to parse '{}': {}", source, message.into()))
}

/// Create error for a request that carries no SQL text
pub fn missing_input_error(what: &str) -> AppError {
    AppError::bad_request(format!("{} is required", what))
}

/// Create error for SQL rejected by the safety checker
pub fn unsafe_query_error(warnings: &[String]) -> AppError {
    AppError::bad_request(format!(
        "Query failed security check: {}",
        warnings.join("; ")
    ))
}

/// Create error for non-SELECT SQL submitted in read-only mode
pub fn readonly_violation_error() -> AppError {
    AppError::bad_request("Only SELECT queries are allowed in readonly mode")
}

/// Create dashboard API error
pub fn dashboard_api_error(message: impl Into<String>) -> AppError {
    AppError::service(message.into())
}

/// Create HTTP error
pub fn http_error(err: reqwest::Error) -> AppError {
    let msg = if err.is_timeout() {
        format!("Request timeout: {}", err)
    } else if err.is_connect() {
        format!("Connection failed: {}", err)
    } else if err.is_status() {
        format!("HTTP error {}: {}", err.status().unwrap_or_default(), err)
    } else {
        err.to_string()
    };
    AppError::service(msg)
}
