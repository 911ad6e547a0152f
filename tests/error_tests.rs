// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use query_assistant::error::{
    config_error, dashboard_api_error, file_read_error, input_parse_error, missing_input_error,
    readonly_violation_error, rule_pattern_error, unsafe_query_error
};

#[test]
fn test_file_read_error() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error = file_read_error("/path/to/stats.json", io_error);
    let _msg = error.to_string();
}

#[test]
fn test_config_error() {
    let error = config_error("Invalid configuration value");
    let _msg = error.to_string();
}

#[test]
fn test_rule_pattern_error() {
    let error = rule_pattern_error("count_orders", "unclosed group");
    let _msg = error.to_string();
}

#[test]
fn test_input_parse_error() {
    let error = input_parse_error("stats.json", "expected value at line 1 column 1");
    let _msg = error.to_string();
}

#[test]
fn test_missing_input_error() {
    let error = missing_input_error("SQL query");
    let _msg = error.to_string();
}

#[test]
fn test_unsafe_query_error() {
    let warnings = vec![
        String::from("Query contains SQL comments which might indicate injection attempts"),
        String::from("Potential SQL injection pattern detected"),
    ];
    let error = unsafe_query_error(&warnings);
    let _msg = error.to_string();
}

#[test]
fn test_readonly_violation_error() {
    let error = readonly_violation_error();
    let _msg = error.to_string();
}

#[test]
fn test_dashboard_api_error() {
    let error = dashboard_api_error("Dashboard API error 503 on security-audit");
    let _msg = error.to_string();
}
