//! Shared model types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The compact user object embedded in most payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleUser {
    pub login: String,
    pub id: u64,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// A full user or organization profile (`GET /users/{login}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub id: u64,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub public_repos: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// An issue label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// An issue or pull request milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub state: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_user_deserializes_type_field() {
        let user: SimpleUser = serde_json::from_value(serde_json::json!({
            "login": "octocat",
            "id": 1,
            "type": "User",
            "site_admin": false
        }))
        .unwrap();

        assert_eq!(user.login, "octocat");
        assert_eq!(user.kind.as_deref(), Some("User"));
    }

    #[test]
    fn test_user_optional_fields_default() {
        let user: User = serde_json::from_value(serde_json::json!({
            "login": "rust-lang",
            "id": 5430905
        }))
        .unwrap();

        assert_eq!(user.name, None);
        assert_eq!(user.public_repos, None);
        assert_eq!(user.created_at, None);
    }
}
