use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A referral-program participant who refers leads and earns payouts.
///
/// Earnings are integer cents. `pending` accumulates as payouts are created
/// and drains into `paid` when a payout is marked paid.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advocate {
    pub advocate_id: String,
    #[serde(default)]
    pub rep_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: BTreeMap<String, String>,
    pub referral_code: String,
    pub referral_url: String,
    #[serde(default)]
    pub total_earnings_cents: i64,
    #[serde(default)]
    pub pending_earnings_cents: i64,
    #[serde(default)]
    pub paid_earnings_cents: i64,
    #[serde(default)]
    pub total_leads: u32,
    #[serde(default)]
    pub total_conversions: u32,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub source: String,
}

fn default_active() -> bool {
    true
}
