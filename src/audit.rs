//! Security audit alerts from catalog findings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row of the risky-users query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSecurityRow {
    pub username:        String,
    #[serde(default)]
    pub password_expiry: Option<String>,
    #[serde(default)]
    pub is_superuser:    bool
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRef {
    pub table_schema: String,
    pub table_name:   String
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table_schema: String,
    pub table_name:   String,
    pub column_name:  String,
    #[serde(default)]
    pub data_type:    Option<String>
}

/// Raw results of the audit catalog queries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityFindings {
    #[serde(default)]
    pub user_security:     Vec<UserSecurityRow>,
    #[serde(default, rename = "tablesWithoutPK")]
    pub tables_without_pk: Vec<TableRef>,
    #[serde(default)]
    pub sensitive_columns: Vec<ColumnRef>
}

/// Alert severity, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityAlert {
    pub id:             String,
    pub severity:       AlertSeverity,
    pub title:          String,
    pub description:    String,
    pub affected:       Vec<String>,
    pub recommendation: String
}

/// Turn findings into alerts; empty finding lists produce no alert.
///
/// Alert ids carry `generated_at` in Unix milliseconds.
pub fn generate_alerts(findings: &SecurityFindings, generated_at: DateTime<Utc>) -> Vec<SecurityAlert> {
    let stamp = generated_at.timestamp_millis();
    let mut alerts = Vec::new();

    if !findings.user_security.is_empty() {
        alerts.push(SecurityAlert {
            id:             format!("user-security-{}", stamp),
            severity:       AlertSeverity::High,
            title:          String::from("User Security Issues"),
            description:    format!(
                "Found {} users with potential security issues",
                findings.user_security.len()
            ),
            affected:       findings
                .user_security
                .iter()
                .map(|u| u.username.clone())
                .collect(),
            recommendation: String::from("Review user privileges and password policies")
        });
    }

    if !findings.tables_without_pk.is_empty() {
        alerts.push(SecurityAlert {
            id:             format!("no-pk-{}", stamp),
            severity:       AlertSeverity::Medium,
            title:          String::from("Tables Without Primary Keys"),
            description:    format!(
                "Found {} tables without primary keys",
                findings.tables_without_pk.len()
            ),
            affected:       findings
                .tables_without_pk
                .iter()
                .map(|t| format!("{}.{}", t.table_schema, t.table_name))
                .collect(),
            recommendation: String::from(
                "Add primary keys to ensure data integrity and replication support"
            )
        });
    }

    if !findings.sensitive_columns.is_empty() {
        alerts.push(SecurityAlert {
            id:             format!("sensitive-data-{}", stamp),
            severity:       AlertSeverity::Critical,
            title:          String::from("Potentially Unencrypted Sensitive Data"),
            description:    format!(
                "Found {} columns that may contain sensitive data",
                findings.sensitive_columns.len()
            ),
            affected:       findings
                .sensitive_columns
                .iter()
                .map(|c| format!("{}.{}.{}", c.table_schema, c.table_name, c.column_name))
                .collect(),
            recommendation: String::from(
                "Ensure sensitive data is properly encrypted and access is restricted"
            )
        });
    }

    alerts
}
