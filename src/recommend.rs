//! Optimization recommendations from database statistics.
//!
//! Statistics come from the dashboard's catalog queries (see
//! [`crate::catalog`]) and arrive as JSON with camelCase top-level keys and
//! PostgreSQL column names inside the rows.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Slow queries above this mean time (ms) get an index recommendation
pub const SLOW_QUERY_THRESHOLD_MS: f64 = 100.0;

/// Pool usage percentage considered high
pub const POOL_USAGE_THRESHOLD: f64 = 80.0;

pub const NO_INDEX_SUGGESTION: &str = "-- Unable to suggest specific index";

static WHERE_COLUMN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)WHERE\s+(\w+)\s*[=<>]").expect("valid regex"));

static FROM_TABLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)FROM\s+(\w+)").expect("valid regex"));

/// Row of `pg_stat_statements`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlowQuery {
    pub query:      String,
    #[serde(deserialize_with = "pg_number::float")]
    pub mean_time:  f64,
    #[serde(default, deserialize_with = "pg_number::opt_int")]
    pub calls:      Option<i64>,
    #[serde(default, deserialize_with = "pg_number::opt_float")]
    pub total_time: Option<f64>
}

/// Row of `pg_stat_user_tables`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStat {
    pub schemaname:  String,
    pub tablename:   String,
    #[serde(default, deserialize_with = "pg_number::int")]
    pub inserts:     i64,
    #[serde(default, deserialize_with = "pg_number::int")]
    pub updates:     i64,
    #[serde(default, deserialize_with = "pg_number::int")]
    pub deletes:     i64,
    #[serde(default, deserialize_with = "pg_number::int")]
    pub live_tuples: i64,
    #[serde(default, deserialize_with = "pg_number::int")]
    pub dead_tuples: i64
}

/// Row of `pg_stat_user_indexes` with no scans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnusedIndex {
    pub schemaname:    String,
    pub tablename:     String,
    pub indexname:     String,
    #[serde(default, deserialize_with = "pg_number::int")]
    pub idx_scan:      i64,
    #[serde(default, deserialize_with = "pg_number::int")]
    pub idx_tup_read:  i64,
    #[serde(default, deserialize_with = "pg_number::int")]
    pub idx_tup_fetch: i64
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStats {
    #[serde(default)]
    pub slow_queries:          Vec<SlowQuery>,
    #[serde(default)]
    pub table_stats:           Vec<TableStat>,
    #[serde(default)]
    pub unused_indexes:        Vec<UnusedIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_pool_usage: Option<f64>
}

/// Recommendation kind as the dashboard's API types declare it; only
/// `Index` and `Performance` are produced locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecommendationType {
    Index,
    Query,
    Schema,
    Performance
}

/// Impact or effort level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Low,
    Medium,
    High
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH")
        }
    }
}

impl std::fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index => write!(f, "INDEX"),
            Self::Query => write!(f, "QUERY"),
            Self::Schema => write!(f, "SCHEMA"),
            Self::Performance => write!(f, "PERFORMANCE")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind:           RecommendationType,
    pub title:          String,
    pub description:    String,
    pub impact:         Level,
    pub effort:         Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_suggestion: Option<String>
}

/// Lenient numeric fields.
///
/// The dashboard's PostgreSQL driver sends `bigint` and `numeric` columns as
/// JSON strings, so counters arrive as `42` or `"42"`. `null` reads as absent.
mod pg_number {
    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String)
    }

    pub fn opt_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Int(v)) => Ok(Some(v)),
            Some(Raw::Float(v)) => Ok(Some(v as i64)),
            Some(Raw::Text(text)) => {
                let text = text.trim();
                text.parse::<i64>()
                    .or_else(|_| text.parse::<f64>().map(|v| v as i64))
                    .map(Some)
                    .map_err(|_| D::Error::custom(format!("invalid integer \"{}\"", text)))
            }
        }
    }

    pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>
    {
        Ok(opt_int(deserializer)?.unwrap_or_default())
    }

    pub fn opt_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Int(v)) => Ok(Some(v as f64)),
            Some(Raw::Float(v)) => Ok(Some(v)),
            Some(Raw::Text(text)) => text
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid number \"{}\"", text)))
        }
    }

    pub fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>
    {
        opt_float(deserializer)?.ok_or_else(|| D::Error::custom("expected a number"))
    }
}

/// Build recommendations: slow filtered queries first, then pool pressure.
pub fn generate_recommendations(stats: &DatabaseStats) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = stats
        .slow_queries
        .iter()
        .filter(|q| q.query.contains("WHERE") && q.mean_time > SLOW_QUERY_THRESHOLD_MS)
        .map(|q| Recommendation {
            kind:           RecommendationType::Index,
            title:          String::from("Add index for slow WHERE clause"),
            description:    format!(
                "Query is taking {}ms on average. Consider adding an index.",
                q.mean_time
            ),
            impact:         Level::High,
            effort:         Level::Low,
            sql_suggestion: Some(suggest_index(&q.query))
        })
        .collect();

    if stats
        .connection_pool_usage
        .is_some_and(|usage| usage > POOL_USAGE_THRESHOLD)
    {
        recommendations.push(Recommendation {
            kind:           RecommendationType::Performance,
            title:          String::from("High connection pool usage"),
            description:    String::from(
                "Connection pool is at high capacity. Consider optimizing connection usage."
            ),
            impact:         Level::Medium,
            effort:         Level::Medium,
            sql_suggestion: None
        });
    }

    recommendations
}

/// Suggest an index from the first filtered column and the first table.
pub fn suggest_index(query: &str) -> String {
    let column = WHERE_COLUMN_REGEX
        .captures(query)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());
    let table = FROM_TABLE_REGEX
        .captures(query)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());
    match (table, column) {
        (Some(table), Some(column)) => format!(
            "CREATE INDEX CONCURRENTLY idx_{table}_{column} ON {table}({column});"
        ),
        _ => NO_INDEX_SUGGESTION.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_strings_in_rows() {
        let json = r#"{
            "slowQueries": [
                {"query": "SELECT * FROM t WHERE id = 1", "mean_time": "150.25", "calls": "42", "total_time": 6310.5}
            ],
            "tableStats": [
                {"schemaname": "public", "tablename": "t", "inserts": "7", "updates": 3, "deletes": null, "live_tuples": "9000000000", "dead_tuples": "0"}
            ],
            "unusedIndexes": [
                {"schemaname": "public", "tablename": "t", "indexname": "t_idx", "idx_scan": "0", "idx_tup_read": "0", "idx_tup_fetch": 0}
            ]
        }"#;
        let stats: DatabaseStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.slow_queries[0].mean_time, 150.25);
        assert_eq!(stats.slow_queries[0].calls, Some(42));
        assert_eq!(stats.table_stats[0].inserts, 7);
        assert_eq!(stats.table_stats[0].deletes, 0);
        assert_eq!(stats.table_stats[0].live_tuples, 9_000_000_000);
        assert_eq!(stats.unused_indexes[0].idx_scan, 0);
        assert_eq!(generate_recommendations(&stats).len(), 1);
    }

    #[test]
    fn test_non_numeric_string_is_rejected() {
        let json = r#"{"slowQueries": [{"query": "SELECT 1", "mean_time": 1.0, "calls": "many"}]}"#;
        assert!(serde_json::from_str::<DatabaseStats>(json).is_err());
    }

    #[test]
    fn test_suggest_index_from_where() {
        assert_eq!(
            suggest_index("SELECT * FROM orders WHERE customer_id = $1"),
            "CREATE INDEX CONCURRENTLY idx_orders_customer_id ON orders(customer_id);"
        );
    }

    #[test]
    fn test_suggest_index_needs_comparison() {
        assert_eq!(
            suggest_index("SELECT * FROM orders WHERE customer_id IN (1, 2)"),
            NO_INDEX_SUGGESTION
        );
    }

    #[test]
    fn test_where_check_is_case_sensitive() {
        let stats = DatabaseStats {
            slow_queries: vec![SlowQuery {
                query:      "select * from t where id = 1".into(),
                mean_time:  500.0,
                calls:      None,
                total_time: None
            }],
            ..Default::default()
        };
        assert!(generate_recommendations(&stats).is_empty());
    }

    #[test]
    fn test_mean_time_formatting() {
        let stats = DatabaseStats {
            slow_queries: vec![
                SlowQuery {
                    query:      "SELECT * FROM t WHERE id = 1".into(),
                    mean_time:  250.0,
                    calls:      Some(3),
                    total_time: None
                },
                SlowQuery {
                    query:      "SELECT * FROM t WHERE id > 1".into(),
                    mean_time:  100.0,
                    calls:      None,
                    total_time: None
                },
            ],
            ..Default::default()
        };
        let recs = generate_recommendations(&stats);
        assert_eq!(recs.len(), 1);
        assert_eq!(
            recs[0].description,
            "Query is taking 250ms on average. Consider adding an index."
        );
    }
}
