//! Authentication module

pub mod jwt;
pub mod middleware;
#[cfg(test)]
mod middleware_tests;
pub mod password;

pub use jwt::{Claims, JwtManager};
pub use middleware::{require_auth, AuthState, AuthUser};
pub use password::{hash_password, verify_password};
