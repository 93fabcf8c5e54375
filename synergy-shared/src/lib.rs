//! # SynergySphere Shared Library
//!
//! This crate contains the models, persistence layer, and authentication
//! utilities shared by the SynergySphere API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and repository operations
//! - `auth`: Password hashing, JWT tokens, the authentication chain,
//!   and authorization predicates
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the SynergySphere shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
