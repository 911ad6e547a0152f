//! Application logic for the Query Assistant CLI.
//!
//! Command handlers live here, separate from the entry point, so they can be
//! tested without spawning the binary. Each local handler returns the text
//! to print and the process exit code.

use std::{
    fs::read_to_string,
    future::Future,
    io::{self, IsTerminal, Read},
    path::Path,
    time::Duration
};

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;

use crate::{
    assistant::QueryAssistant,
    audit::{AlertSeverity, SecurityAlert, SecurityFindings, generate_alerts},
    catalog,
    cli::{Cli, Commands, Format, RemoteArgs},
    client::DashboardClient,
    config::{Config, DEFAULT_DASHBOARD_URL, DEFAULT_ENVIRONMENT},
    error::{AppResult, file_read_error, input_parse_error, missing_input_error},
    output::{
        CheckReport, OutputFormat, OutputOptions, format_alerts, format_catalog, format_check,
        format_execution, format_recommendations, format_rules, format_suggestions,
        format_translation, format_translations
    },
    recommend::{DatabaseStats, generate_recommendations},
    safety::{check_safety, ensure_present, ensure_readonly}
};

/// Text to print and exit code of a finished command
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub exit_code: i32,
    pub output:    String
}

impl CommandOutcome {
    fn success(output: String) -> Self {
        Self {
            exit_code: 0,
            output
        }
    }
}

/// Named catalog queries in the order the `catalog` command prints them
pub const CATALOG_QUERIES: [(&str, &str); 6] = [
    ("slowQueries", catalog::SLOW_QUERIES),
    ("tableStats", catalog::TABLE_STATS),
    ("unusedIndexes", catalog::UNUSED_INDEXES),
    ("userSecurity", catalog::USER_SECURITY),
    ("tablesWithoutPK", catalog::TABLES_WITHOUT_PK),
    ("sensitiveColumns", catalog::SENSITIVE_COLUMNS)
];

pub fn output_options(format: Format, no_color: bool, verbose: bool) -> OutputOptions {
    OutputOptions {
        format: match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::Yaml => OutputFormat::Yaml
        },
        colored: !no_color,
        verbose
    }
}

/// Read SQL from an argument, `-` meaning stdin
pub fn read_sql_arg(arg: &str) -> AppResult<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| file_read_error("stdin", e))?;
    Ok(buffer)
}

fn read_path(path: &Path) -> AppResult<String> {
    if path.to_str() == Some("-") {
        return read_sql_arg("-");
    }
    read_to_string(path).map_err(|e| file_read_error(&path.display().to_string(), e))
}

/// Non-blank lines of a batch file, trimmed
pub fn read_batch(path: &Path) -> AppResult<Vec<String>> {
    Ok(parse_batch(&read_path(path)?))
}

pub fn parse_batch(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Deserialize a JSON input file
pub fn load_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let content = read_path(path)?;
    serde_json::from_str(&content)
        .map_err(|e| input_parse_error(&path.display().to_string(), e.to_string()))
}

pub fn translate(assistant: &QueryAssistant, text: &str, opts: &OutputOptions) -> AppResult<CommandOutcome> {
    if text.trim().is_empty() {
        return Err(missing_input_error("Query text"));
    }
    let translation = assistant.process_natural_language(text);
    Ok(CommandOutcome::success(format_translation(&translation, opts)))
}

pub fn translate_batch(assistant: &QueryAssistant, lines: &[String], opts: &OutputOptions) -> CommandOutcome {
    let translations = assistant.process_batch(lines);
    tracing::debug!(requests = translations.len(), "translated batch");
    CommandOutcome::success(format_translations(&translations, opts))
}

/// Safety check; exit code 2 when the SQL would be rejected
pub fn check(sql: &str, readonly: bool, opts: &OutputOptions) -> AppResult<CommandOutcome> {
    ensure_present(sql)?;
    let report = CheckReport {
        verdict:     check_safety(sql),
        readonly_ok: readonly.then(|| ensure_readonly(sql).is_ok())
    };
    Ok(CommandOutcome {
        exit_code: if report.passed() { 0 } else { 2 },
        output:    format_check(&report, opts)
    })
}

/// Advisory only; always exits 0
pub fn optimize(sql: &str, opts: &OutputOptions) -> AppResult<CommandOutcome> {
    ensure_present(sql)?;
    let suggestions = crate::advisor::suggest_optimizations(sql);
    Ok(CommandOutcome::success(format_suggestions(&suggestions, opts)))
}

pub fn recommend(stats: &DatabaseStats, opts: &OutputOptions) -> CommandOutcome {
    CommandOutcome::success(format_recommendations(&generate_recommendations(stats), opts))
}

pub fn audit(findings: &SecurityFindings, opts: &OutputOptions) -> CommandOutcome {
    alerts_outcome(&generate_alerts(findings, Utc::now()), opts)
}

fn alerts_outcome(alerts: &[SecurityAlert], opts: &OutputOptions) -> CommandOutcome {
    CommandOutcome {
        exit_code: alerts_exit_code(alerts),
        output:    format_alerts(alerts, opts)
    }
}

/// 2 for critical or high alerts, 1 for medium, otherwise 0
pub fn alerts_exit_code(alerts: &[SecurityAlert]) -> i32 {
    match alerts.iter().map(|a| a.severity).max() {
        Some(AlertSeverity::Critical | AlertSeverity::High) => 2,
        Some(AlertSeverity::Medium) => 1,
        _ => 0
    }
}

pub fn list_rules(assistant: &QueryAssistant, opts: &OutputOptions) -> CommandOutcome {
    CommandOutcome::success(format_rules(assistant.matcher().table(), opts))
}

pub fn list_catalog(opts: &OutputOptions) -> CommandOutcome {
    CommandOutcome::success(format_catalog(&CATALOG_QUERIES, opts))
}

/// Build a client, CLI flags taking precedence over config
pub fn dashboard_client(remote: &RemoteArgs, config: &Config) -> DashboardClient {
    let url = remote
        .url
        .clone()
        .or_else(|| config.dashboard.url.clone())
        .unwrap_or_else(|| DEFAULT_DASHBOARD_URL.to_string());
    let environment = remote
        .environment
        .clone()
        .or_else(|| config.dashboard.environment.clone())
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
    DashboardClient::with_retry_config(&url, &environment, config.retry.clone())
}

async fn with_spinner<T, F>(message: &'static str, future: F) -> T
where
    F: Future<Output = T>
{
    if !io::stderr().is_terminal() {
        return future.await;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    let result = future.await;
    pb.finish_and_clear();
    result
}

/// Dispatch a parsed command line
pub async fn run(cli: Cli, config: Config) -> AppResult<CommandOutcome> {
    let opts = output_options(cli.format, cli.no_color, cli.verbose);
    let assistant = QueryAssistant::with_config(&config.matcher)?;

    match cli.command {
        Commands::Translate {
            text,
            batch
        } => match (text, batch) {
            (_, Some(path)) => Ok(translate_batch(&assistant, &read_batch(&path)?, &opts)),
            (Some(text), None) => translate(&assistant, &text, &opts),
            (None, None) => Err(missing_input_error("Query text"))
        },
        Commands::Check {
            sql,
            readonly
        } => check(&read_sql_arg(&sql)?, readonly, &opts),
        Commands::Optimize {
            sql
        } => optimize(&read_sql_arg(&sql)?, &opts),
        Commands::Recommend {
            stats,
            remote
        } => match stats {
            Some(path) => Ok(recommend(&load_json(&path)?, &opts)),
            None => {
                let client = dashboard_client(&remote, &config);
                let response = with_spinner(
                    "Fetching optimization recommendations...",
                    client.optimization_recommendations()
                )
                .await?;
                Ok(CommandOutcome::success(format_recommendations(
                    &response.recommendations,
                    &opts
                )))
            }
        },
        Commands::Audit {
            findings,
            remote
        } => match findings {
            Some(path) => Ok(audit(&load_json(&path)?, &opts)),
            None => {
                let client = dashboard_client(&remote, &config);
                let response =
                    with_spinner("Running security audit...", client.security_audit()).await?;
                Ok(alerts_outcome(&response.alerts, &opts))
            }
        },
        Commands::Execute {
            sql,
            no_safety_check,
            remote
        } => {
            let sql = read_sql_arg(&sql)?;
            let client = dashboard_client(&remote, &config);
            let response =
                with_spinner("Executing query...", client.execute_query(&sql, !no_safety_check))
                    .await?;
            Ok(CommandOutcome::success(format_execution(&response, &opts)))
        }
        Commands::Rules => Ok(list_rules(&assistant, &opts)),
        Commands::Catalog => Ok(list_catalog(&opts))
    }
}
