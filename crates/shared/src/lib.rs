// Shared crate clippy configuration
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Scholarly Shared Library
//!
//! Types and utilities shared between the API server and the billing crate:
//! database pool construction, embedded migrations, the core data model
//! (users, subscriptions, research queries), and the academic-discount rule.

pub mod academic;
pub mod db;
pub mod models;

pub use academic::{academic_discount_percentage, is_academic_email, ACADEMIC_DISCOUNT_PERCENT};
pub use db::{create_pool, run_migrations};
pub use models::{BillingPeriod, ResearchQueryRecord, Subscription, SubscriptionTier, User};
