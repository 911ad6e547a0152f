//! Pattern rule table for the intent matcher.
//!
//! Rules are plain data: a key, a case-insensitive regular expression, a SQL
//! template and a static confidence. The first capture group of a pattern,
//! when present, feeds the `{param}` placeholder of the template.
//!
//! Table order matters. The matcher keeps the rule with the strictly highest
//! confidence, so on equal confidence the rule registered first wins.

use std::sync::LazyLock;

use compact_str::CompactString;
use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};

use crate::{
    config::{CustomRuleConfig, MatcherConfig},
    error::{AppResult, rule_pattern_error}
};

/// Placeholder replaced by the extracted parameter
pub const PARAM_PLACEHOLDER: &str = "{param}";

/// Declarative form of a rule, compiled into a [`PatternRule`].
#[derive(Debug, Clone, Copy)]
pub struct RuleDefinition {
    pub key:        &'static str,
    pub pattern:    &'static str,
    pub template:   &'static str,
    pub confidence: f64
}

/// Built-in rules in evaluation order.
pub const BUILTIN_RULES: &[RuleDefinition] = &[
    RuleDefinition {
        key:        "show_users",
        pattern:    r"(?:show|list|get|find|display)\s+(?:me\s+)?(?:all\s+)?(?:the\s+)?users?\s*[.!?]?$",
        template:   "SELECT * FROM users",
        confidence: 0.9
    },
    RuleDefinition {
        key:        "count_users",
        pattern:    r"(?:how many|count)\s+users?",
        template:   "SELECT COUNT(*) as user_count FROM users",
        confidence: 0.95
    },
    RuleDefinition {
        key:        "recent_users",
        pattern:    r"(?:recent|new|latest)\s+users?",
        template:   "SELECT * FROM users ORDER BY created_at DESC LIMIT 10",
        confidence: 0.85
    },
    RuleDefinition {
        key:        "active_users",
        pattern:    r"active\s+users?",
        template:   "SELECT * FROM users WHERE last_login_at > NOW() - INTERVAL '30 days'",
        confidence: 0.8
    },
    RuleDefinition {
        key:        "users_this_month",
        pattern:    r"users?\s+(?:registered|created|joined)\s+(?:this\s+)?month",
        template:   "SELECT * FROM users WHERE created_at >= DATE_TRUNC('month', CURRENT_DATE)",
        confidence: 0.9
    },
    RuleDefinition {
        key:        "users_today",
        pattern:    r"users?\s+(?:registered|created|joined)\s+today",
        template:   "SELECT * FROM users WHERE DATE(created_at) = CURRENT_DATE",
        confidence: 0.95
    },
    RuleDefinition {
        key:        "search_by_email",
        pattern:    r"(?:find|search|get)\s+users?\s+(?:with|by)\s+email\s+(.+)",
        template:   "SELECT * FROM users WHERE email ILIKE '%{param}%'",
        confidence: 0.85
    },
    RuleDefinition {
        key:        "search_by_username",
        pattern:    r"(?:find|search|get)\s+users?\s+(?:with|by)\s+(?:username|name)\s+(.+)",
        template:   "SELECT * FROM users WHERE username ILIKE '%{param}%'",
        confidence: 0.85
    },
    RuleDefinition {
        key:        "user_statistics",
        pattern:    r"users?\s+(?:statistics|stats|analytics)",
        template:   "SELECT \n  COUNT(*) as total_users,\n  COUNT(CASE WHEN created_at >= CURRENT_DATE - INTERVAL '30 days' THEN 1 END) as new_users_30d,\n  COUNT(CASE WHEN last_login_at >= CURRENT_DATE - INTERVAL '7 days' THEN 1 END) as active_users_7d\nFROM users",
        confidence: 0.8
    },
    RuleDefinition {
        key:        "table_info",
        pattern:    r"(?:describe|info|structure|columns)\s+(?:table\s+)?(\w+)",
        template:   "SELECT column_name, data_type, is_nullable FROM information_schema.columns WHERE table_name = '{param}'",
        confidence: 0.9
    },
    RuleDefinition {
        key:        "slow_queries",
        pattern:    r"(?:slow|slowest)\s+(?:queries|query)",
        template:   "SELECT query, mean_time, calls FROM pg_stat_statements ORDER BY mean_time DESC LIMIT 10",
        confidence: 0.85
    }
];

/// Process-wide built-in table, compiled on first use and never mutated.
pub static BUILTIN_TABLE: LazyLock<RuleTable> = LazyLock::new(|| {
    RuleTable::from_definitions(BUILTIN_RULES).expect("built-in rules are valid")
});

/// A compiled pattern rule.
#[derive(Debug, Clone)]
pub struct PatternRule {
    key:        CompactString,
    expression: Regex,
    template:   String,
    confidence: f64
}

impl PatternRule {
    /// Compile a rule, validating its pattern and confidence.
    pub fn new(key: &str, pattern: &str, template: &str, confidence: f64) -> AppResult<Self> {
        if !(confidence > 0.0 && confidence <= 1.0) {
            return Err(rule_pattern_error(
                key,
                format!("confidence {} is outside (0, 1]", confidence)
            ));
        }
        let expression = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| rule_pattern_error(key, e.to_string()))?;
        Ok(Self {
            key: CompactString::from(key),
            expression,
            template: template.to_string(),
            confidence
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn pattern(&self) -> &str {
        self.expression.as_str()
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Test the rule against normalized input.
    ///
    /// Returns `None` when the pattern does not match, otherwise the
    /// first capture group if it participated and is non-empty once cleaned.
    pub fn evaluate(&self, input: &str) -> Option<Option<String>> {
        let captures = self.expression.captures(input)?;
        let parameter = captures
            .get(1)
            .map(|m| clean_parameter(m.as_str()))
            .filter(|s| !s.is_empty());
        Some(parameter)
    }

    /// Instantiate the template with an optional parameter.
    pub fn render(&self, parameter: Option<&str>) -> String {
        match parameter {
            Some(value) if self.template.contains(PARAM_PLACEHOLDER) => {
                self.template.replace(PARAM_PLACEHOLDER, value)
            }
            _ => self.template.clone()
        }
    }
}

/// Trim a captured parameter and drop every quote character.
fn clean_parameter(raw: &str) -> String {
    raw.trim().chars().filter(|c| *c != '\'' && *c != '"').collect()
}

/// Ordered collection of rules keyed by rule key.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: IndexMap<CompactString, PatternRule>
}

impl RuleTable {
    /// Compile a table from declarative definitions
    pub fn from_definitions(definitions: &[RuleDefinition]) -> AppResult<Self> {
        let mut table = Self::default();
        for def in definitions {
            table.push(PatternRule::new(
                def.key,
                def.pattern,
                def.template,
                def.confidence
            )?);
        }
        Ok(table)
    }

    /// Build the built-in table adjusted by configuration
    ///
    /// # Notes
    ///
    /// - Disabled keys are matched case-insensitively
    /// - Custom rules are appended after the built-ins; a custom rule reusing
    ///   a key replaces that rule in place
    pub fn with_config(config: &MatcherConfig) -> AppResult<Self> {
        let mut table = Self::default();
        for rule in BUILTIN_TABLE.iter() {
            if !config
                .disabled
                .iter()
                .any(|d| d.eq_ignore_ascii_case(rule.key()))
            {
                table.push(rule.clone());
            }
        }
        for custom in &config.rules {
            table.push(compile_custom(custom)?);
        }
        Ok(table)
    }

    /// Insert a rule; an existing key keeps its position
    pub fn push(&mut self, rule: PatternRule) {
        self.rules.insert(rule.key.clone(), rule);
    }

    pub fn get(&self, key: &str) -> Option<&PatternRule> {
        self.rules.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternRule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn compile_custom(custom: &CustomRuleConfig) -> AppResult<PatternRule> {
    PatternRule::new(
        &custom.key,
        &custom.pattern,
        &custom.template,
        custom.confidence
    )
}
