// API crate clippy configuration
// Test code patterns:
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Scholarly API Library
//!
//! HTTP server components for the research platform: authentication,
//! subscription billing endpoints, the research-search proxy, and admin
//! statistics.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod search;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
