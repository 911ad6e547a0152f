use query_assistant::config::{Config, DEFAULT_DASHBOARD_URL, DEFAULT_ENVIRONMENT, MatcherConfig};

#[test]
fn test_default_config() {
    let config = Config::default();

    assert!(config.matcher.disabled.is_empty());
    assert!(config.matcher.rules.is_empty());
    assert_eq!(config.dashboard.url.as_deref(), Some(DEFAULT_DASHBOARD_URL));
    assert_eq!(config.dashboard.environment.as_deref(), Some(DEFAULT_ENVIRONMENT));
}

#[test]
fn test_default_retry_config() {
    let config = Config::default();

    assert_eq!(config.retry.max_retries, 3);
    assert_eq!(config.retry.initial_delay_ms, 1000);
    assert_eq!(config.retry.max_delay_ms, 30000);
    assert_eq!(config.retry.backoff_factor, 2.0);
}

#[test]
fn test_default_known_tables() {
    let config = MatcherConfig::default();
    assert_eq!(
        config.known_tables,
        vec!["users", "orders", "products", "customers"]
    );
}

#[test]
fn test_from_toml_full() {
    let config = Config::from_toml(
        r#"
[matcher]
disabled = ["slow_queries"]
known_tables = ["invoices"]

[[matcher.rules]]
key = "count_orders"
pattern = '(?:how many|count)\s+orders?'
template = "SELECT COUNT(*) as order_count FROM orders"
confidence = 0.95

[dashboard]
url = "http://db-admin:5002"
environment = "prod"

[retry]
max_retries = 1
initial_delay_ms = 10
max_delay_ms = 100
backoff_factor = 1.5
"#
    )
    .unwrap();

    assert_eq!(config.matcher.disabled, vec!["slow_queries"]);
    assert_eq!(config.matcher.known_tables, vec!["invoices"]);
    assert_eq!(config.matcher.rules.len(), 1);
    assert_eq!(config.matcher.rules[0].key, "count_orders");
    assert_eq!(config.dashboard.environment.as_deref(), Some("prod"));
    assert_eq!(config.retry.max_retries, 1);
}

#[test]
fn test_from_toml_partial_keeps_defaults() {
    let config = Config::from_toml("[matcher]\ndisabled = [\"show_users\"]\n").unwrap();

    assert_eq!(config.matcher.known_tables.len(), 4);
    assert_eq!(config.retry.max_retries, 3);
}

#[test]
fn test_from_toml_invalid() {
    assert!(Config::from_toml("[matcher\n").is_err());
}

#[test]
fn test_from_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[dashboard]\nenvironment = \"staging\"").unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.dashboard.environment.as_deref(), Some("staging"));
}

#[test]
fn test_from_missing_file() {
    assert!(Config::from_file(std::path::Path::new("/nonexistent/config.toml")).is_err());
}
