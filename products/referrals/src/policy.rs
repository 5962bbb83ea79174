use std::collections::BTreeMap;

use entity::{Advocate, Lead, LeadStatus, Payout, PayoutKind, PayoutStatus};
use serde::Deserialize;

use crate::codes;

/// Fixed award table: advocate signup, good working lead, closed deal.
pub fn tier_amount_cents(kind: PayoutKind) -> i64 {
    match kind {
        PayoutKind::Signup => 2_500,
        PayoutKind::Qualified => 5_000,
        PayoutKind::Sold => 15_000,
    }
}

/// Which payout (if any) a lead status change triggers.
///
/// Judged against the stored status, never a caller-supplied one, so a
/// replayed update cannot pay twice.
pub fn payout_for_transition(old: LeadStatus, new: LeadStatus) -> Option<PayoutKind> {
    match new {
        LeadStatus::Qualified if old != LeadStatus::Qualified => Some(PayoutKind::Qualified),
        LeadStatus::Sold if old != LeadStatus::Sold => Some(PayoutKind::Sold),
        _ => None,
    }
}

pub fn new_payout(
    advocate_id: &str,
    lead_id: Option<&str>,
    kind: PayoutKind,
    now_ms: i64,
) -> Payout {
    Payout {
        payout_id: codes::generate_id("PAY", now_ms),
        advocate_id: advocate_id.to_string(),
        lead_id: lead_id.map(str::to_string),
        amount_cents: tier_amount_cents(kind),
        kind,
        status: PayoutStatus::Pending,
        created_at: now_ms,
        updated_at: now_ms,
        paid_at: None,
        notes: format!("{kind} payout"),
    }
}

/// Request body for advocate creation.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdvocate {
    #[serde(default)]
    pub rep_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: BTreeMap<String, String>,
    #[serde(default)]
    pub source: Option<String>,
}

pub fn create_advocate(input: NewAdvocate, referral_url_base: &str, now_ms: i64) -> Advocate {
    let referral_code = codes::generate_referral_code();
    let referral_url = format!(
        "{}/{referral_code}",
        referral_url_base.trim_end_matches('/')
    );
    Advocate {
        advocate_id: codes::generate_id("ADV", now_ms),
        rep_id: input.rep_id,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        phone: input.phone,
        address: input.address,
        referral_code,
        referral_url,
        total_earnings_cents: 0,
        pending_earnings_cents: 0,
        paid_earnings_cents: 0,
        total_leads: 0,
        total_conversions: 0,
        created_at: now_ms,
        updated_at: now_ms,
        active: true,
        email_verified: false,
        source: input.source.unwrap_or_else(|| "MANUAL".to_string()),
    }
}

/// Request body for lead creation.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    pub advocate_id: String,
    #[serde(default)]
    pub rep_id: String,
    #[serde(default)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: BTreeMap<String, String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

pub fn create_lead(input: NewLead, now_ms: i64) -> Lead {
    Lead {
        lead_id: codes::generate_id("LEAD", now_ms),
        advocate_id: input.advocate_id,
        rep_id: input.rep_id,
        status: LeadStatus::New,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        phone: input.phone,
        address: input.address,
        product: input.product.unwrap_or_else(|| "Referral".to_string()),
        created_at: now_ms,
        updated_at: now_ms,
        source: input.source.unwrap_or_else(|| "MANUAL".to_string()),
        notes: Vec::new(),
    }
}
