//! Type definitions for intent matching results.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Statement family of a generated SQL query, taken from its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryCategory {
    Select,
    Insert,
    Update,
    Delete,
    /// `CREATE`, `ALTER` and `DROP`
    Ddl,
    /// Anything that does not start with a known keyword
    Analysis
}

impl QueryCategory {
    /// Classify SQL by its leading keyword, case-insensitively.
    pub fn of(sql: &str) -> Self {
        let upper = sql.trim().to_uppercase();
        if upper.starts_with("SELECT") {
            Self::Select
        } else if upper.starts_with("INSERT") {
            Self::Insert
        } else if upper.starts_with("UPDATE") {
            Self::Update
        } else if upper.starts_with("DELETE") {
            Self::Delete
        } else if upper.starts_with("CREATE")
            || upper.starts_with("ALTER")
            || upper.starts_with("DROP")
        {
            Self::Ddl
        } else {
            Self::Analysis
        }
    }
}

impl std::fmt::Display for QueryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Select => write!(f, "SELECT"),
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::Ddl => write!(f, "DDL"),
            Self::Analysis => write!(f, "ANALYSIS")
        }
    }
}

/// Outcome of matching one free-text request.
///
/// `matched` is always `true`: an input no rule accepts still produces the
/// fallback query. Use [`is_fallback`](Self::is_fallback) or the
/// `confidence` to tell a rule hit from a guess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched:             bool,
    pub confidence:          f64,
    pub sql:                 String,
    pub explanation:         String,
    pub category:            QueryCategory,
    /// Key of the winning rule, `None` for the fallback query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule:                Option<CompactString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_parameter: Option<String>
}

impl MatchResult {
    /// Whether this result came from the keyword fallback
    pub fn is_fallback(&self) -> bool {
        self.rule.is_none()
    }
}
