//! Static safety checks and execution gates.
//!
//! [`check_safety`] is a case-insensitive substring scan, not a SQL parser.
//! It can miss real injection vectors and flag benign queries (a legitimate
//! `'a' || 'b'` concatenation trips the injection warning). Callers gating
//! execution rely on exactly this behavior.
//!
//! | Condition | Warning |
//! |-----------|---------|
//! | `DROP TABLE`, or `DELETE FROM` without `WHERE` | [`DESTRUCTIVE_WARNING`] |
//! | `--` or `/*` | [`COMMENT_WARNING`] |
//! | `'` together with `\|\|` | [`INJECTION_WARNING`] |

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{AppResult, missing_input_error, readonly_violation_error, unsafe_query_error};

pub const DESTRUCTIVE_WARNING: &str =
    "Query contains potentially destructive operations without WHERE clause";
pub const COMMENT_WARNING: &str =
    "Query contains SQL comments which might indicate injection attempts";
pub const INJECTION_WARNING: &str = "Potential SQL injection pattern detected";

/// Result of the safety scan.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SafetyVerdict {
    pub safe:     bool,
    /// Every triggered warning, in check order
    pub warnings: SmallVec<[String; 3]>
}

impl SafetyVerdict {
    fn from_warnings(warnings: SmallVec<[String; 3]>) -> Self {
        Self {
            safe: warnings.is_empty(),
            warnings
        }
    }
}

/// Scan SQL for destructive statements, comments and concatenated literals.
pub fn check_safety(sql: &str) -> SafetyVerdict {
    let upper = sql.to_uppercase();
    let mut warnings = SmallVec::new();

    if upper.contains("DROP TABLE") || (upper.contains("DELETE FROM") && !upper.contains("WHERE")) {
        warnings.push(DESTRUCTIVE_WARNING.to_string());
    }
    if upper.contains("--") || upper.contains("/*") {
        warnings.push(COMMENT_WARNING.to_string());
    }
    if sql.contains('\'') && sql.contains("||") {
        warnings.push(INJECTION_WARNING.to_string());
    }

    SafetyVerdict::from_warnings(warnings)
}

/// Reject empty or whitespace-only SQL
pub fn ensure_present(sql: &str) -> AppResult<()> {
    if sql.trim().is_empty() {
        return Err(missing_input_error("SQL query"));
    }
    Ok(())
}

/// Allow only statements starting with `select`
pub fn ensure_readonly(sql: &str) -> AppResult<()> {
    if !sql.trim().to_lowercase().starts_with("select") {
        return Err(readonly_violation_error());
    }
    Ok(())
}

/// Reject SQL the safety checker does not pass
pub fn ensure_safe(sql: &str) -> AppResult<SafetyVerdict> {
    let verdict = check_safety(sql);
    if !verdict.safe {
        tracing::warn!(warnings = ?verdict.warnings, "query rejected by safety check");
        return Err(unsafe_query_error(&verdict.warnings));
    }
    Ok(verdict)
}

/// Which gates apply before executing caller-supplied SQL.
#[derive(Debug, Clone, Copy)]
pub struct GateOptions {
    /// Only `SELECT` statements may run
    pub readonly:     bool,
    /// Run [`check_safety`] and reject unsafe SQL
    pub safety_check: bool
}

impl Default for GateOptions {
    fn default() -> Self {
        Self {
            readonly:     false,
            safety_check: true
        }
    }
}

/// Apply the configured gates in order: presence, read-only, safety.
pub fn gate(sql: &str, options: GateOptions) -> AppResult<()> {
    ensure_present(sql)?;
    if options.readonly {
        ensure_readonly(sql)?;
    }
    if options.safety_check {
        ensure_safe(sql)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_table_is_destructive_even_with_where() {
        let verdict = check_safety("drop table users where 1 = 1");
        assert!(!verdict.safe);
        assert_eq!(verdict.warnings.as_slice(), [DESTRUCTIVE_WARNING]);
    }

    #[test]
    fn test_block_comment_flagged() {
        let verdict = check_safety("SELECT 1 /* hi */");
        assert_eq!(verdict.warnings.as_slice(), [COMMENT_WARNING]);
    }

    #[test]
    fn test_concatenation_without_quote_is_fine() {
        assert!(check_safety("SELECT a || b FROM t").safe);
    }

    #[test]
    fn test_gate_order() {
        let opts = GateOptions {
            readonly:     true,
            safety_check: true
        };
        assert!(gate("   ", opts).is_err());
        assert!(gate("DELETE FROM users", opts).is_err());
        assert!(gate("SELECT 1 -- x", opts).is_err());
        assert!(gate("select id from users", opts).is_ok());
    }

    #[test]
    fn test_gate_without_safety_check() {
        let opts = GateOptions {
            readonly:     false,
            safety_check: false
        };
        assert!(gate("DELETE FROM users", opts).is_ok());
    }
}
