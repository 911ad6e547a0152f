//! Static optimization advice.
//!
//! Checks are independent and non-exclusive. A query like
//! `SELECT * FROM t ORDER BY x` collects three suggestions. Advice never gates
//! execution.

use smallvec::SmallVec;

pub const SELECT_STAR_SUGGESTION: &str =
    "Consider selecting specific columns instead of using SELECT *";
pub const LIKE_INDEX_SUGGESTION: &str = "Consider using indexes on columns used in LIKE operations";
pub const LIMIT_SUGGESTION: &str = "Consider adding LIMIT clause for large result sets";
pub const ORDER_BY_SUGGESTION: &str = "ORDER BY without LIMIT can be expensive on large tables";

/// Extra hints attached to fallback translations
pub const FALLBACK_HINTS: [&str; 2] = [
    "Consider adding WHERE clauses to filter results",
    "Add ORDER BY for consistent results"
];

/// Collected suggestions in detection order
pub type Suggestions = SmallVec<[String; 4]>;

/// Scan SQL for common anti-patterns.
pub fn suggest_optimizations(sql: &str) -> Suggestions {
    let upper = sql.to_uppercase();
    let has_limit = upper.contains("LIMIT");
    let mut suggestions = Suggestions::new();

    if upper.contains("SELECT *") {
        suggestions.push(SELECT_STAR_SUGGESTION.to_string());
    }
    if upper.contains("WHERE") && upper.contains("LIKE") {
        suggestions.push(LIKE_INDEX_SUGGESTION.to_string());
    }
    if !has_limit && upper.starts_with("SELECT") {
        suggestions.push(LIMIT_SUGGESTION.to_string());
    }
    if upper.contains("ORDER BY") && !has_limit {
        suggestions.push(ORDER_BY_SUGGESTION.to_string());
    }

    suggestions
}
