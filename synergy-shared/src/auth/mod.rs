/// Authentication and authorization utilities
///
/// - `password`: Argon2id hashing and verification
/// - `jwt`: signed, fixed-TTL bearer tokens (subject = email)
/// - `middleware`: the per-request authentication chain
/// - `authorization`: membership/ownership/assignee predicates

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
