//! Core data model shared between the API server and billing

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Subscription tier determining price and feature access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Academic,
    Professional,
    Enterprise,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Academic => "academic",
            SubscriptionTier::Professional => "professional",
            SubscriptionTier::Enterprise => "enterprise",
        }
    }

    /// Parse a tier string; unknown values are rejected rather than defaulted
    /// so an invalid tier never reaches Stripe or the database.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "academic" => Some(SubscriptionTier::Academic),
            "professional" => Some(SubscriptionTier::Professional),
            "enterprise" => Some(SubscriptionTier::Enterprise),
            _ => None,
        }
    }

    pub fn all() -> [SubscriptionTier; 3] {
        [
            SubscriptionTier::Academic,
            SubscriptionTier::Professional,
            SubscriptionTier::Enterprise,
        ]
    }
}

impl std::fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Billing recurrence for a subscription charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    Monthly,
    Annual,
}

impl BillingPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingPeriod::Monthly => "monthly",
            BillingPeriod::Annual => "annual",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "monthly" => Some(BillingPeriod::Monthly),
            "annual" => Some(BillingPeriod::Annual),
            _ => None,
        }
    }

    /// Stripe recurrence interval for this period ("month" / "year")
    pub fn stripe_interval(&self) -> &'static str {
        match self {
            BillingPeriod::Monthly => "month",
            BillingPeriod::Annual => "year",
        }
    }
}

impl std::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User identity record. Created on registration, mutated on login
/// (last_active) and subscription changes (tier, status), never deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub institution: Option<String>,
    pub role: String,
    pub tier: String,
    pub subscription_status: String,
    pub is_academic: bool,
    pub discount_percentage: f32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_active: OffsetDateTime,
    pub monthly_usage: serde_json::Value,
}

/// Billing record mirroring Stripe subscription state.
/// Mutated only by subscription creation and webhook reconciliation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stripe_subscription_id: Option<String>,
    pub tier: String,
    pub status: String,
    pub billing_period: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub current_period_start: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub current_period_end: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Append-only research query log entry. Nothing reads it on the hot path;
/// it exists for usage reporting and admin statistics.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ResearchQueryRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub query_text: String,
    pub databases: Vec<String>,
    pub results_count: i32,
    pub processing_time_ms: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_parse_round_trips() {
        for tier in SubscriptionTier::all() {
            assert_eq!(SubscriptionTier::parse(tier.as_str()), Some(tier));
        }
    }

    #[test]
    fn tier_parse_rejects_unknown() {
        assert_eq!(SubscriptionTier::parse("platinum"), None);
        assert_eq!(SubscriptionTier::parse(""), None);
        // Case-sensitive: enum values are lowercase on the wire
        assert_eq!(SubscriptionTier::parse("Academic"), None);
    }

    #[test]
    fn billing_period_parse_and_interval() {
        assert_eq!(BillingPeriod::parse("monthly"), Some(BillingPeriod::Monthly));
        assert_eq!(BillingPeriod::parse("annual"), Some(BillingPeriod::Annual));
        assert_eq!(BillingPeriod::parse("weekly"), None);
        assert_eq!(BillingPeriod::Monthly.stripe_interval(), "month");
        assert_eq!(BillingPeriod::Annual.stripe_interval(), "year");
    }

    #[test]
    fn subscription_row_serializes_rfc3339_periods() {
        let at = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let row = Subscription {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            stripe_subscription_id: Some("sub_123".to_string()),
            tier: "professional".to_string(),
            status: "active".to_string(),
            billing_period: "monthly".to_string(),
            current_period_start: Some(at),
            current_period_end: None,
            created_at: at,
        };

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["stripe_subscription_id"], "sub_123");
        assert_eq!(value["current_period_start"], "2023-11-14T22:13:20Z");
        assert!(value["current_period_end"].is_null());
    }

    #[test]
    fn research_query_record_serializes_for_reporting() {
        let row = ResearchQueryRecord {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            query_text: "CRISPR off-target effects".to_string(),
            databases: vec!["pubmed".to_string(), "arxiv".to_string()],
            results_count: 3,
            processing_time_ms: 120,
            created_at: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
        };

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["query_text"], "CRISPR off-target effects");
        assert_eq!(value["results_count"], 3);
        assert_eq!(value["databases"][1], "arxiv");
        assert_eq!(value["created_at"], "2023-11-14T22:13:20Z");
    }
}
