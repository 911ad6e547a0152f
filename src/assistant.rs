//! Assistant facade combining the matcher with the static checks.
//!
//! This is the surface an HTTP layer or the CLI calls: one
//! [`Translation`] per request, serialized as-is to the client.

use compact_str::CompactString;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    advisor::{FALLBACK_HINTS, Suggestions, suggest_optimizations},
    config::MatcherConfig,
    error::AppResult,
    intent::{IntentMatcher, MatchResult, QueryCategory},
    safety::{SafetyVerdict, check_safety}
};

/// Matcher output with the safety verdict and advice for its SQL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub success:                  bool,
    pub confidence:               f64,
    pub sql:                      String,
    pub explanation:              String,
    pub category:                 QueryCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule:                     Option<CompactString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_parameter:      Option<String>,
    pub security_check:           SafetyVerdict,
    pub optimization_suggestions: Suggestions
}

impl Translation {
    pub fn is_fallback(&self) -> bool {
        self.rule.is_none()
    }
}

impl From<MatchResult> for Translation {
    fn from(result: MatchResult) -> Self {
        let security_check = check_safety(&result.sql);
        let mut optimization_suggestions = suggest_optimizations(&result.sql);
        if result.is_fallback() {
            optimization_suggestions.extend(FALLBACK_HINTS.iter().map(|h| h.to_string()));
        }
        Self {
            success: result.matched,
            confidence: result.confidence,
            sql: result.sql,
            explanation: result.explanation,
            category: result.category,
            rule: result.rule,
            extracted_parameter: result.extracted_parameter,
            security_check,
            optimization_suggestions
        }
    }
}

/// Stateless assistant over a configured matcher.
#[derive(Debug, Clone, Default)]
pub struct QueryAssistant {
    matcher: IntentMatcher
}

impl QueryAssistant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &MatcherConfig) -> AppResult<Self> {
        Ok(Self {
            matcher: IntentMatcher::with_config(config)?
        })
    }

    pub fn matcher(&self) -> &IntentMatcher {
        &self.matcher
    }

    /// Translate one request
    pub fn process_natural_language(&self, text: &str) -> Translation {
        Translation::from(self.matcher.match_intent(text))
    }

    /// Translate many requests in parallel, keeping input order
    pub fn process_batch<S>(&self, inputs: &[S]) -> Vec<Translation>
    where
        S: AsRef<str> + Sync
    {
        inputs
            .par_iter()
            .map(|text| self.process_natural_language(text.as_ref()))
            .collect()
    }

    /// Safety verdict for arbitrary caller-supplied SQL
    pub fn perform_security_check(&self, sql: &str) -> SafetyVerdict {
        check_safety(sql)
    }

    pub fn suggest_optimizations(&self, sql: &str) -> Suggestions {
        suggest_optimizations(sql)
    }
}
