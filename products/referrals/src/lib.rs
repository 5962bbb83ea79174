//! `products-referrals` — the referral vertical slice.
//!
//! Payout tier policy, lead-transition triggers, record constructors and
//! program-level aggregation. Pure functions over the shared entity types;
//! storage and HTTP wiring live in the server.

pub mod codes;
pub mod policy;
pub mod stats;

pub use codes::{generate_id, generate_referral_code};
pub use policy::{
    NewAdvocate, NewLead, create_advocate, create_lead, new_payout, payout_for_transition,
    tier_amount_cents,
};
pub use stats::{DashboardSummary, ReferralStats, compute_stats, summarize_dashboard};
