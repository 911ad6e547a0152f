use query_assistant::intent::{
    ACCEPTANCE_THRESHOLD, BUILTIN_RULES, FALLBACK_CONFIDENCE, IntentMatcher, QueryCategory,
    match_intent
};

#[test]
fn test_show_me_all_users() {
    let result = match_intent("show me all users");
    assert!(result.matched);
    assert_eq!(result.rule.as_deref(), Some("show_users"));
    assert_eq!(result.sql, "SELECT * FROM users");
    assert_eq!(result.confidence, 0.9);
    assert_eq!(result.category, QueryCategory::Select);
}

#[test]
fn test_how_many_users() {
    let result = match_intent("how many users");
    assert_eq!(result.rule.as_deref(), Some("count_users"));
    assert_eq!(result.sql, "SELECT COUNT(*) as user_count FROM users");
    assert_eq!(result.confidence, 0.95);
}

#[test]
fn test_search_by_email_extracts_parameter() {
    let result = match_intent("find users with email bob@example.com");
    assert_eq!(result.rule.as_deref(), Some("search_by_email"));
    assert_eq!(result.extracted_parameter.as_deref(), Some("bob@example.com"));
    assert_eq!(
        result.sql,
        "SELECT * FROM users WHERE email ILIKE '%bob@example.com%'"
    );
}

#[test]
fn test_search_by_username_strips_quotes() {
    let result = match_intent("get users by name 'alice'");
    assert_eq!(result.rule.as_deref(), Some("search_by_username"));
    assert_eq!(
        result.sql,
        "SELECT * FROM users WHERE username ILIKE '%alice%'"
    );
}

#[test]
fn test_unmatched_input_falls_back_to_users() {
    let result = match_intent("asdkjasdk random text");
    assert!(result.matched);
    assert!(result.is_fallback());
    assert_eq!(result.sql, "SELECT * FROM users LIMIT 10");
    assert_eq!(result.confidence, FALLBACK_CONFIDENCE);
    assert_eq!(result.category, QueryCategory::Select);
    assert_eq!(
        result.explanation,
        "Generated a basic query for table 'users' based on your input. Consider being more specific for better results."
    );
}

#[test]
fn test_fallback_guesses_table_from_words() {
    assert_eq!(
        match_intent("show me the orders").sql,
        "SELECT * FROM orders LIMIT 10"
    );
    assert_eq!(
        match_intent("customer report").sql,
        "SELECT * FROM customers LIMIT 10"
    );
}

#[test]
fn test_highest_confidence_wins() {
    // recent_users (0.85) and users_this_month (0.9) both match
    let result = match_intent("new users registered this month");
    assert_eq!(result.rule.as_deref(), Some("users_this_month"));
    assert_eq!(
        result.sql,
        "SELECT * FROM users WHERE created_at >= DATE_TRUNC('month', CURRENT_DATE)"
    );
}

#[test]
fn test_users_today() {
    let result = match_intent("Users joined today");
    assert_eq!(result.rule.as_deref(), Some("users_today"));
    assert_eq!(result.confidence, 0.95);
}

#[test]
fn test_table_info_substitutes_table_name() {
    let result = match_intent("describe table orders");
    assert_eq!(result.rule.as_deref(), Some("table_info"));
    assert_eq!(
        result.sql,
        "SELECT column_name, data_type, is_nullable FROM information_schema.columns WHERE table_name = 'orders'"
    );
}

#[test]
fn test_recent_users_explanation() {
    let result = match_intent("latest users");
    assert!(result.explanation.ends_with("sorted by the most recent first."));
}

#[test]
fn test_slow_queries() {
    let result = match_intent("show the slowest queries");
    assert_eq!(result.rule.as_deref(), Some("slow_queries"));
    assert!(result.sql.contains("pg_stat_statements"));
}

#[test]
fn test_matching_is_idempotent() {
    for input in ["how many users", "find users with email a@b.c", "nothing here"] {
        assert_eq!(match_intent(input), match_intent(input));
    }
}

#[test]
fn test_rule_results_satisfy_threshold() {
    let inputs = [
        "list users",
        "count users",
        "active users",
        "user stats",
        "slow query",
        "info products"
    ];
    for input in inputs {
        let result = match_intent(input);
        assert!(!result.is_fallback(), "{} fell back", input);
        assert!(result.confidence >= ACCEPTANCE_THRESHOLD);
        assert!(result.confidence <= 1.0);
    }
}

#[test]
fn test_builtin_table_matches_definitions() {
    let matcher = IntentMatcher::new();
    let keys: Vec<&str> = matcher.table().iter().map(|r| r.key()).collect();
    let expected: Vec<&str> = BUILTIN_RULES.iter().map(|r| r.key).collect();
    assert_eq!(keys, expected);
}

#[test]
fn test_quotes_only_parameter_is_not_substituted() {
    let result = match_intent("find users with email ''");
    assert_eq!(result.rule.as_deref(), Some("search_by_email"));
    assert!(result.extracted_parameter.is_none());
    assert_eq!(result.sql, "SELECT * FROM users WHERE email ILIKE '%{param}%'");
}

#[test]
fn test_show_users_only_matches_bare_listing() {
    // Trailing words stop show_users so longer requests reach specific rules
    let result = match_intent("show all users in the system");
    assert!(result.is_fallback());
    assert_eq!(result.confidence, FALLBACK_CONFIDENCE);
    assert_eq!(result.sql, "SELECT * FROM users LIMIT 10");

    let result = match_intent("Show me the users.");
    assert_eq!(result.rule.as_deref(), Some("show_users"));
}
