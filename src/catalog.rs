//! PostgreSQL catalog queries behind the recommendation and audit endpoints.
//!
//! Their result rows deserialize into [`crate::recommend::DatabaseStats`]
//! and [`crate::audit::SecurityFindings`]. The statistics views name their
//! columns `relname` and `indexrelname`, aliased here to the row field names.
//! `SLOW_QUERIES` needs the `pg_stat_statements` extension; callers treat its
//! failure as an empty list.

pub const SLOW_QUERIES: &str = "SELECT query, mean_time, calls, total_time
FROM pg_stat_statements
WHERE mean_time > 100
ORDER BY mean_time DESC
LIMIT 10";

pub const TABLE_STATS: &str = "SELECT
  schemaname,
  relname as tablename,
  n_tup_ins as inserts,
  n_tup_upd as updates,
  n_tup_del as deletes,
  n_live_tup as live_tuples,
  n_dead_tup as dead_tuples
FROM pg_stat_user_tables
ORDER BY n_live_tup DESC
LIMIT 20";

pub const UNUSED_INDEXES: &str = "SELECT
  schemaname,
  relname as tablename,
  indexrelname as indexname,
  idx_scan,
  idx_tup_read,
  idx_tup_fetch
FROM pg_stat_user_indexes
WHERE idx_scan = 0
ORDER BY schemaname, relname";

pub const USER_SECURITY: &str = "SELECT
  usename as username,
  valuntil as password_expiry,
  usesuper as is_superuser
FROM pg_user
WHERE usesuper = true OR valuntil IS NULL OR valuntil < NOW() + INTERVAL '30 days'";

pub const TABLES_WITHOUT_PK: &str = "SELECT
  t.table_schema,
  t.table_name
FROM information_schema.tables t
LEFT JOIN information_schema.table_constraints tc
  ON t.table_schema = tc.table_schema
  AND t.table_name = tc.table_name
  AND tc.constraint_type = 'PRIMARY KEY'
WHERE t.table_type = 'BASE TABLE'
  AND t.table_schema NOT IN ('information_schema', 'pg_catalog')
  AND tc.constraint_name IS NULL";

pub const SENSITIVE_COLUMNS: &str = "SELECT
  table_schema,
  table_name,
  column_name,
  data_type
FROM information_schema.columns
WHERE table_schema NOT IN ('information_schema', 'pg_catalog')
  AND (
    LOWER(column_name) LIKE '%password%' OR
    LOWER(column_name) LIKE '%ssn%' OR
    LOWER(column_name) LIKE '%credit%' OR
    LOWER(column_name) LIKE '%card%' OR
    LOWER(column_name) LIKE '%secret%'
  )";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_views_alias_relation_columns() {
        assert!(TABLE_STATS.contains("relname as tablename"));
        assert!(UNUSED_INDEXES.contains("relname as tablename"));
        assert!(UNUSED_INDEXES.contains("indexrelname as indexname"));
        for sql in [TABLE_STATS, UNUSED_INDEXES] {
            for line in sql.lines().map(str::trim) {
                assert_ne!(line, "tablename,", "bare tablename in {}", sql);
                assert_ne!(line, "indexname,", "bare indexname in {}", sql);
            }
        }
    }
}
