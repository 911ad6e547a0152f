//! Natural-language to SQL intent matching.
//!
//! The matcher runs free text against an ordered [`RuleTable`] and keeps the
//! matching rule with the strictly highest confidence. A winner at or above
//! [`ACCEPTANCE_THRESHOLD`] produces its SQL template; otherwise the keyword
//! fallback guesses a table and returns `SELECT * FROM <table> LIMIT 10`.
//!
//! Matching never fails. A result with [`FALLBACK_CONFIDENCE`] is a guess and
//! should be presented as one.
//!
//! ```
//! use query_assistant::intent::{QueryCategory, match_intent};
//!
//! let result = match_intent("how many users");
//! assert_eq!(result.sql, "SELECT COUNT(*) as user_count FROM users");
//! assert_eq!(result.category, QueryCategory::Select);
//! ```

pub mod patterns;
mod types;

use std::sync::LazyLock;

use compact_str::CompactString;
pub use patterns::{BUILTIN_RULES, PatternRule, RuleDefinition, RuleTable};
pub use types::{MatchResult, QueryCategory};

use crate::{config::MatcherConfig, error::AppResult};

/// Minimum confidence for a rule to be used directly
pub const ACCEPTANCE_THRESHOLD: f64 = 0.7;

/// Confidence reported for fallback queries
pub const FALLBACK_CONFIDENCE: f64 = 0.5;

static DEFAULT_MATCHER: LazyLock<IntentMatcher> = LazyLock::new(IntentMatcher::new);

/// Match with the built-in rules and known tables
pub fn match_intent(input: &str) -> MatchResult {
    DEFAULT_MATCHER.match_intent(input)
}

/// Intent matcher over an immutable rule table.
///
/// Holds no mutable state; one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct IntentMatcher {
    table:        RuleTable,
    known_tables: Vec<CompactString>
}

impl Default for IntentMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentMatcher {
    /// Create a matcher with the built-in table
    pub fn new() -> Self {
        Self {
            table:        patterns::BUILTIN_TABLE.clone(),
            known_tables: MatcherConfig::default()
                .known_tables
                .iter()
                .map(|t| CompactString::from(t.as_str()))
                .collect()
        }
    }

    /// Create a matcher from configuration
    ///
    /// An empty `known_tables` list falls back to `users` only.
    pub fn with_config(config: &MatcherConfig) -> AppResult<Self> {
        let table = RuleTable::with_config(config)?;
        let mut known_tables: Vec<CompactString> = config
            .known_tables
            .iter()
            .map(|t| CompactString::from(t.trim().to_lowercase()))
            .filter(|t| !t.is_empty())
            .collect();
        if known_tables.is_empty() {
            known_tables.push(CompactString::from("users"));
        }
        Ok(Self {
            table,
            known_tables
        })
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn known_tables(&self) -> &[CompactString] {
        &self.known_tables
    }

    /// Translate free text into SQL.
    pub fn match_intent(&self, input: &str) -> MatchResult {
        let normalized = input.trim().to_lowercase();
        let mut best: Option<(&PatternRule, Option<String>)> = None;

        for rule in self.table.iter() {
            let Some(parameter) = rule.evaluate(&normalized) else {
                continue;
            };
            let beats_best = best
                .as_ref()
                .is_none_or(|(current, _)| rule.confidence() > current.confidence());
            if beats_best {
                best = Some((rule, parameter));
            }
        }

        match best {
            Some((rule, parameter)) if rule.confidence() >= ACCEPTANCE_THRESHOLD => {
                let sql = rule.render(parameter.as_deref());
                tracing::debug!(
                    rule = rule.key(),
                    confidence = rule.confidence(),
                    parameter = parameter.as_deref(),
                    "matched pattern rule"
                );
                MatchResult {
                    matched: true,
                    confidence: rule.confidence(),
                    explanation: explain(input, &sql),
                    category: QueryCategory::of(&sql),
                    rule: Some(CompactString::from(rule.key())),
                    extracted_parameter: parameter,
                    sql
                }
            }
            Some((rule, _)) => {
                tracing::debug!(
                    rule = rule.key(),
                    confidence = rule.confidence(),
                    "best rule below acceptance threshold, using fallback"
                );
                self.fallback(input)
            }
            None => {
                tracing::debug!("no pattern rule matched, using fallback");
                self.fallback(input)
            }
        }
    }

    /// Guess a table from the words of the input.
    fn fallback(&self, input: &str) -> MatchResult {
        let lowered = input.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();
        let table = self
            .known_tables
            .iter()
            .find(|table| {
                let singular = table.strip_suffix('s').unwrap_or(table.as_str());
                words.iter().any(|w| *w == table.as_str() || *w == singular)
            })
            .map(|t| t.as_str())
            .unwrap_or("users");

        let sql = format!("SELECT * FROM {} LIMIT 10", table);
        MatchResult {
            matched: true,
            confidence: FALLBACK_CONFIDENCE,
            explanation: format!(
                "Generated a basic query for table '{}' based on your input. Consider being more specific for better results.",
                table
            ),
            category: QueryCategory::Select,
            rule: None,
            extracted_parameter: None,
            sql
        }
    }
}

/// Sentence describing what the generated SQL does for the request.
pub fn explain(original_input: &str, sql: &str) -> String {
    format!(
        "Generated SQL query based on your request: \"{}\". This query will {}.",
        original_input,
        describe_query(sql)
    )
}

/// Short description of a query's effect from its shape.
pub fn describe_query(sql: &str) -> &'static str {
    let upper = sql.trim().to_uppercase();
    let is_select = upper.starts_with("SELECT");

    if upper.starts_with("SELECT COUNT(*)") {
        "count the number of records"
    } else if is_select && upper.contains("ORDER BY") && upper.contains("DESC") {
        "retrieve records sorted by the most recent first"
    } else if is_select && upper.contains("WHERE") {
        "retrieve records that match specific conditions"
    } else if is_select {
        "retrieve records from the database"
    } else {
        "perform the requested database operation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomRuleConfig;

    fn rule(key: &str, pattern: &str, template: &str, confidence: f64) -> CustomRuleConfig {
        CustomRuleConfig {
            key: key.into(),
            pattern: pattern.into(),
            template: template.into(),
            confidence
        }
    }

    fn matcher_with(rules: Vec<CustomRuleConfig>) -> IntentMatcher {
        let config = MatcherConfig {
            disabled: BUILTIN_RULES.iter().map(|r| r.key.to_string()).collect(),
            rules,
            ..Default::default()
        };
        IntentMatcher::with_config(&config).unwrap()
    }

    #[test]
    fn test_first_rule_wins_on_equal_confidence() {
        let matcher = matcher_with(vec![
            rule("first", "orders", "SELECT 1", 0.8),
            rule("second", "orders", "SELECT 2", 0.8),
        ]);
        let result = matcher.match_intent("orders please");
        assert_eq!(result.rule.as_deref(), Some("first"));
        assert_eq!(result.sql, "SELECT 1");
    }

    #[test]
    fn test_higher_confidence_wins_regardless_of_order() {
        let matcher = matcher_with(vec![
            rule("low", "orders", "SELECT 1", 0.75),
            rule("high", "orders", "SELECT 2", 0.9),
        ]);
        assert_eq!(matcher.match_intent("orders").rule.as_deref(), Some("high"));
    }

    #[test]
    fn test_best_rule_below_threshold_falls_back() {
        let matcher = matcher_with(vec![rule("weak", "orders", "SELECT 1", 0.6)]);
        let result = matcher.match_intent("show orders");
        assert!(result.is_fallback());
        assert_eq!(result.sql, "SELECT * FROM orders LIMIT 10");
        assert_eq!(result.confidence, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let matcher = matcher_with(vec![rule("edge", "orders", "SELECT 1", 0.7)]);
        assert_eq!(matcher.match_intent("orders").rule.as_deref(), Some("edge"));
    }

    #[test]
    fn test_fallback_uses_singular_form() {
        let result = match_intent("the product catalogue");
        assert_eq!(result.sql, "SELECT * FROM products LIMIT 10");
    }

    #[test]
    fn test_fallback_prefers_list_order() {
        let result = match_intent("customers and their orders");
        assert_eq!(result.sql, "SELECT * FROM orders LIMIT 10");
    }

    #[test]
    fn test_custom_known_tables() {
        let config = MatcherConfig {
            known_tables: vec!["Players".into(), "matches".into()],
            ..Default::default()
        };
        let matcher = IntentMatcher::with_config(&config).unwrap();
        let result = matcher.match_intent("top player scores");
        assert_eq!(result.sql, "SELECT * FROM players LIMIT 10");
        let result = matcher.match_intent("something else");
        assert_eq!(result.sql, "SELECT * FROM users LIMIT 10");
    }

    #[test]
    fn test_describe_query_shapes() {
        assert_eq!(
            describe_query("SELECT COUNT(*) FROM users"),
            "count the number of records"
        );
        assert_eq!(
            describe_query("select * from users order by created_at desc"),
            "retrieve records sorted by the most recent first"
        );
        assert_eq!(
            describe_query("SELECT * FROM users WHERE id = 1"),
            "retrieve records that match specific conditions"
        );
        assert_eq!(
            describe_query("SELECT * FROM users"),
            "retrieve records from the database"
        );
        assert_eq!(
            describe_query("VACUUM users"),
            "perform the requested database operation"
        );
    }

    #[test]
    fn test_explanation_keeps_original_casing() {
        let result = match_intent("  How Many USERS ");
        assert_eq!(
            result.explanation,
            "Generated SQL query based on your request: \"  How Many USERS \". This query will count the number of records."
        );
    }
}
