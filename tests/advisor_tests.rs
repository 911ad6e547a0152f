use query_assistant::advisor::{
    LIKE_INDEX_SUGGESTION, LIMIT_SUGGESTION, ORDER_BY_SUGGESTION, SELECT_STAR_SUGGESTION,
    suggest_optimizations
};

#[test]
fn test_select_star_without_limit() {
    let suggestions = suggest_optimizations("SELECT * FROM users");
    assert_eq!(
        suggestions.as_slice(),
        [SELECT_STAR_SUGGESTION, LIMIT_SUGGESTION]
    );
}

#[test]
fn test_limit_silences_limit_checks() {
    let suggestions = suggest_optimizations("select * from users order by id desc limit 10");
    assert_eq!(suggestions.as_slice(), [SELECT_STAR_SUGGESTION]);
}

#[test]
fn test_all_checks_in_order() {
    let suggestions =
        suggest_optimizations("SELECT * FROM users WHERE email LIKE '%x%' ORDER BY id");
    assert_eq!(
        suggestions.as_slice(),
        [
            SELECT_STAR_SUGGESTION,
            LIKE_INDEX_SUGGESTION,
            LIMIT_SUGGESTION,
            ORDER_BY_SUGGESTION
        ]
    );
}

#[test]
fn test_non_select_statement() {
    let suggestions = suggest_optimizations("UPDATE users SET a = 1 WHERE id = 1");
    assert!(suggestions.is_empty());
}
