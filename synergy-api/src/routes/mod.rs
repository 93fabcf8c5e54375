/// API route handlers
///
/// This module contains all HTTP route handlers:
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `users`: Current-user and member lookup
/// - `projects`: Project CRUD and membership management
/// - `tasks`: Task CRUD within a project

pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;

use serde::{Deserialize, Deserializer};

/// Deserializer for nullable patch fields.
///
/// Plain `Option<Option<T>>` derives cannot tell an absent key from an
/// explicit `null`: serde maps both to the outer `None`. Wrapping the field
/// with this helper (plus `#[serde(default)]`) restores the distinction:
///
/// - key absent        → `None`          (leave the stored value)
/// - `"field": null`   → `Some(None)`    (clear the stored value)
/// - `"field": value`  → `Some(Some(v))` (overwrite)
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        note: Option<Option<String>>,
    }

    #[test]
    fn test_absent_key_is_outer_none() {
        let patch: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch.note, None);
    }

    #[test]
    fn test_explicit_null_clears() {
        let patch: Patch = serde_json::from_str(r#"{"note": null}"#).unwrap();
        assert_eq!(patch.note, Some(None));
    }

    #[test]
    fn test_value_overwrites() {
        let patch: Patch = serde_json::from_str(r#"{"note": "hi"}"#).unwrap();
        assert_eq!(patch.note, Some(Some("hi".to_string())));
    }
}
