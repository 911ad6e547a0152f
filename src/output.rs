//! Result formatting for text, JSON and YAML output.

use colored::Colorize;
use serde::Serialize;

use crate::{
    assistant::Translation,
    audit::{AlertSeverity, SecurityAlert},
    client::ExecuteQueryResponse,
    intent::{FALLBACK_CONFIDENCE, RuleTable},
    recommend::Recommendation,
    safety::SafetyVerdict
};

/// Output format for results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool,
    pub verbose: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true,
            verbose: false
        }
    }
}

/// Result of `check`, with the read-only gate when it was requested
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    #[serde(flatten)]
    pub verdict:     SafetyVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readonly_ok: Option<bool>
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        self.verdict.safe && self.readonly_ok.unwrap_or(true)
    }
}

#[derive(Debug, Clone, Serialize)]
struct RuleSummary<'a> {
    key:        &'a str,
    pattern:    &'a str,
    template:   &'a str,
    confidence: f64
}

#[derive(Debug, Clone, Serialize)]
struct CatalogEntry<'a> {
    name: &'a str,
    sql:  &'a str
}

fn serialized<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(value).unwrap_or_default(),
        _ => serde_json::to_string_pretty(value).unwrap_or_default()
    }
}

fn heading(text: &str, opts: &OutputOptions) -> String {
    if opts.colored {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

fn paint_ok(text: &str, ok: bool, opts: &OutputOptions) -> String {
    match (opts.colored, ok) {
        (false, _) => text.to_string(),
        (true, true) => text.green().to_string(),
        (true, false) => text.red().to_string()
    }
}

/// Format one translation
pub fn format_translation(translation: &Translation, opts: &OutputOptions) -> String {
    if opts.format != OutputFormat::Text {
        return serialized(translation, opts.format);
    }
    let mut output = String::new();
    output.push_str(&heading("=== Generated SQL ===", opts));
    output.push_str("\n\n");
    if opts.colored {
        output.push_str(&translation.sql.cyan().to_string());
    } else {
        output.push_str(&translation.sql);
    }
    output.push_str("\n\n");

    let confidence = format!("{:.0}%", translation.confidence * 100.0);
    let source = match &translation.rule {
        Some(rule) => format!("rule {}", rule),
        None => String::from("keyword fallback")
    };
    output.push_str(&format!(
        "Confidence: {} ({}), category: {}\n",
        paint_ok(&confidence, translation.confidence > FALLBACK_CONFIDENCE, opts),
        source,
        translation.category
    ));
    if translation.is_fallback() {
        let note = "Note: no rule matched with enough confidence; this query is a guess.";
        if opts.colored {
            output.push_str(&note.yellow().to_string());
        } else {
            output.push_str(note);
        }
        output.push('\n');
    }
    if opts.verbose
        && let Some(param) = &translation.extracted_parameter
    {
        output.push_str(&format!("Parameter: {}\n", param));
    }
    output.push_str(&format!("{}\n", translation.explanation));

    output.push_str(&format_verdict_text(&translation.security_check, opts));
    output.push_str(&format_suggestions_text(&translation.optimization_suggestions, opts));
    output
}

/// Format a batch of translations
pub fn format_translations(translations: &[Translation], opts: &OutputOptions) -> String {
    if opts.format != OutputFormat::Text {
        return serialized(translations, opts.format);
    }
    let mut output = String::new();
    for (i, translation) in translations.iter().enumerate() {
        let header = format!("Request #{}:", i + 1);
        if opts.colored {
            output.push_str(&header.cyan().bold().to_string());
        } else {
            output.push_str(&header);
        }
        output.push('\n');
        output.push_str(&format!(
            "{}  [{:.2}]\n\n",
            translation.sql, translation.confidence
        ));
    }
    output
}

/// Format a safety check report
pub fn format_check(report: &CheckReport, opts: &OutputOptions) -> String {
    if opts.format != OutputFormat::Text {
        return serialized(report, opts.format);
    }
    let mut output = format_verdict_text(&report.verdict, opts);
    if report.readonly_ok == Some(false) {
        output.push_str(&format!(
            "  - {}\n",
            paint_ok("Only SELECT queries are allowed in readonly mode", false, opts)
        ));
    }
    output
}

fn format_verdict_text(verdict: &SafetyVerdict, opts: &OutputOptions) -> String {
    let mut output = String::from("Safety: ");
    if verdict.safe {
        output.push_str(&paint_ok("safe", true, opts));
    } else {
        output.push_str(&paint_ok("unsafe", false, opts));
    }
    output.push('\n');
    for warning in &verdict.warnings {
        output.push_str(&format!("  - {}\n", warning));
    }
    output
}

/// Format optimization suggestions
pub fn format_suggestions(suggestions: &[String], opts: &OutputOptions) -> String {
    if opts.format != OutputFormat::Text {
        return serialized(suggestions, opts.format);
    }
    format_suggestions_text(suggestions, opts)
}

fn format_suggestions_text(suggestions: &[String], opts: &OutputOptions) -> String {
    if suggestions.is_empty() {
        return String::from("Suggestions: none\n");
    }
    let mut output = String::from("Suggestions:\n");
    for suggestion in suggestions {
        let line = format!("  * {}", suggestion);
        if opts.colored {
            output.push_str(&line.yellow().to_string());
        } else {
            output.push_str(&line);
        }
        output.push('\n');
    }
    output
}

/// Format optimization recommendations
pub fn format_recommendations(recommendations: &[Recommendation], opts: &OutputOptions) -> String {
    if opts.format != OutputFormat::Text {
        return serialized(recommendations, opts.format);
    }
    if recommendations.is_empty() {
        return String::from("No recommendations\n");
    }
    let mut output = String::new();
    for rec in recommendations {
        let header = format!("[{}] {}", rec.kind, rec.title);
        output.push_str(&heading(&header, opts));
        output.push('\n');
        output.push_str(&format!(
            "  {}\n  impact: {}, effort: {}\n",
            rec.description, rec.impact, rec.effort
        ));
        if let Some(sql) = &rec.sql_suggestion {
            output.push_str(&format!("  {}\n", sql));
        }
        output.push('\n');
    }
    output
}

/// Format security audit alerts
pub fn format_alerts(alerts: &[SecurityAlert], opts: &OutputOptions) -> String {
    if opts.format != OutputFormat::Text {
        return serialized(alerts, opts.format);
    }
    if alerts.is_empty() {
        return String::from("No security alerts\n");
    }
    let mut output = String::new();
    for alert in alerts {
        let label = format!("[{}]", alert.severity);
        let label = if !opts.colored {
            label
        } else {
            match alert.severity {
                AlertSeverity::Critical => label.red().bold().to_string(),
                AlertSeverity::High => label.red().to_string(),
                AlertSeverity::Medium => label.yellow().to_string(),
                AlertSeverity::Low => label.blue().to_string()
            }
        };
        output.push_str(&format!("{} {}\n", label, heading(&alert.title, opts)));
        output.push_str(&format!("  {}\n", alert.description));
        for affected in &alert.affected {
            output.push_str(&format!("    {}\n", affected));
        }
        output.push_str(&format!("  -> {}\n\n", alert.recommendation));
    }
    output
}

/// Format the result of a remote execution
pub fn format_execution(response: &ExecuteQueryResponse, opts: &OutputOptions) -> String {
    if opts.format != OutputFormat::Text {
        return serialized(response, opts.format);
    }
    let mut output = String::new();
    let columns: Vec<&str> = response.fields.iter().map(|f| f.name.as_str()).collect();
    if !columns.is_empty() {
        output.push_str(&heading(&columns.join(" | "), opts));
        output.push('\n');
    }
    for row in &response.data {
        let cells: Vec<String> = match row {
            serde_json::Value::Object(map) if !columns.is_empty() => columns
                .iter()
                .map(|c| map.get(*c).map(cell_text).unwrap_or_default())
                .collect(),
            other => vec![cell_text(other)]
        };
        output.push_str(&cells.join(" | "));
        output.push('\n');
    }
    output.push_str(&format!(
        "\n{} row(s) in {} ms\n",
        response.row_count.unwrap_or(response.data.len() as u64),
        response.execution_time
    ));
    output
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::from("NULL"),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string()
    }
}

/// Format the active rule table
pub fn format_rules(table: &RuleTable, opts: &OutputOptions) -> String {
    let summaries: Vec<RuleSummary<'_>> = table
        .iter()
        .map(|r| RuleSummary {
            key:        r.key(),
            pattern:    r.pattern(),
            template:   r.template(),
            confidence: r.confidence()
        })
        .collect();
    if opts.format != OutputFormat::Text {
        return serialized(&summaries, opts.format);
    }
    let mut output = String::new();
    for rule in &summaries {
        output.push_str(&format!("{:<20} {:.2}  ", rule.key, rule.confidence));
        output.push_str(rule.pattern);
        output.push('\n');
        if opts.verbose {
            output.push_str(&format!("    {}\n", rule.template.replace('\n', "\n    ")));
        }
    }
    output
}

/// Format named catalog queries
pub fn format_catalog(entries: &[(&str, &str)], opts: &OutputOptions) -> String {
    let entries: Vec<CatalogEntry<'_>> = entries
        .iter()
        .map(|&(name, sql)| CatalogEntry {
            name,
            sql
        })
        .collect();
    if opts.format != OutputFormat::Text {
        return serialized(&entries, opts.format);
    }
    let mut output = String::new();
    for entry in &entries {
        output.push_str(&heading(&format!("-- {}", entry.name), opts));
        output.push('\n');
        output.push_str(entry.sql);
        output.push_str(";\n\n");
    }
    output
}
