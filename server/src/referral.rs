use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use chrono::Utc;
use entity::{Advocate, Lead, LeadStatus, Payout, PayoutKind, PayoutStatus};
use platform_api::{ApiError, ApiResult};
use platform_db::DbError;
use products_referrals::{
    DashboardSummary, NewAdvocate, NewLead, ReferralStats, compute_stats, create_advocate,
    create_lead, new_payout, payout_for_transition, summarize_dashboard, tier_amount_cents,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::http::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/referral/advocates",
            get(list_advocates).post(create_advocate_handler),
        )
        .route(
            "/referral/advocates/{id}",
            get(get_advocate).put(update_advocate),
        )
        .route("/referral/leads", get(list_leads).post(create_lead_handler))
        .route("/referral/leads/{id}", get(get_lead).put(update_lead))
        .route("/referral/payouts", get(list_payouts))
        .route("/referral/payouts/{id}", put(update_payout))
        .route("/referral/stats", get(stats_handler))
        .route("/referral/dashboard", get(dashboard_handler))
}

fn db_err(err: DbError) -> ApiError {
    ApiError::internal(err.into())
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

// ---------------------------------------------------------------------------
// Advocates
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdvocateFilter {
    rep_id: Option<String>,
}

#[derive(Serialize)]
struct AdvocateList {
    advocates: Vec<Advocate>,
}

async fn list_advocates(
    State(state): State<AppState>,
    Query(filter): Query<AdvocateFilter>,
) -> ApiResult<Json<AdvocateList>> {
    let mut advocates = state.store.list_advocates().map_err(db_err)?;
    if let Some(rep_id) = filter.rep_id {
        advocates.retain(|a| a.rep_id == rep_id);
    }
    Ok(Json(AdvocateList { advocates }))
}

#[derive(Serialize)]
struct AdvocateEnvelope {
    advocate: Advocate,
}

/// Creating an advocate also opens the signup-tier payout and accrues it
/// as pending earnings.
async fn create_advocate_handler(
    State(state): State<AppState>,
    Json(input): Json<NewAdvocate>,
) -> ApiResult<Json<AdvocateEnvelope>> {
    if input.email.trim().is_empty() {
        return Err(ApiError::InvalidInput("advocate email is required".into()));
    }
    let now = now_ms();
    let mut advocate = create_advocate(input, &state.config.referral_url_base, now);
    let payout = new_payout(&advocate.advocate_id, None, PayoutKind::Signup, now);
    advocate.pending_earnings_cents += payout.amount_cents;

    state.store.put_advocate(&advocate).map_err(db_err)?;
    state.store.put_payout(&payout).map_err(db_err)?;
    info!(advocate_id = %advocate.advocate_id, "advocate created");
    Ok(Json(AdvocateEnvelope { advocate }))
}

#[derive(Serialize)]
struct AdvocateDetail {
    advocate: Advocate,
    leads: Vec<Lead>,
    payouts: Vec<Payout>,
}

async fn get_advocate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AdvocateDetail>> {
    let advocate = state
        .store
        .get_advocate(&id)
        .map_err(db_err)?
        .ok_or(ApiError::NotFound("advocate"))?;
    let mut leads = state.store.list_leads().map_err(db_err)?;
    leads.retain(|lead| lead.advocate_id == id);
    let mut payouts = state.store.list_payouts().map_err(db_err)?;
    payouts.retain(|payout| payout.advocate_id == id);
    Ok(Json(AdvocateDetail {
        advocate,
        leads,
        payouts,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdvocateUpdate {
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
    rep_id: Option<String>,
    active: Option<bool>,
    email_verified: Option<bool>,
}

async fn update_advocate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<AdvocateUpdate>,
) -> ApiResult<Json<AdvocateEnvelope>> {
    let mut advocate = state
        .store
        .get_advocate(&id)
        .map_err(db_err)?
        .ok_or(ApiError::NotFound("advocate"))?;

    if let Some(email) = update.email {
        advocate.email = email;
    }
    if let Some(first_name) = update.first_name {
        advocate.first_name = first_name;
    }
    if let Some(last_name) = update.last_name {
        advocate.last_name = last_name;
    }
    if let Some(phone) = update.phone {
        advocate.phone = phone;
    }
    if let Some(rep_id) = update.rep_id {
        advocate.rep_id = rep_id;
    }
    if let Some(active) = update.active {
        advocate.active = active;
    }
    if let Some(email_verified) = update.email_verified {
        advocate.email_verified = email_verified;
    }
    advocate.updated_at = now_ms();

    state.store.put_advocate(&advocate).map_err(db_err)?;
    Ok(Json(AdvocateEnvelope { advocate }))
}

// ---------------------------------------------------------------------------
// Leads
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeadFilter {
    advocate_id: Option<String>,
    rep_id: Option<String>,
    status: Option<String>,
}

#[derive(Serialize)]
struct LeadList {
    leads: Vec<Lead>,
}

async fn list_leads(
    State(state): State<AppState>,
    Query(filter): Query<LeadFilter>,
) -> ApiResult<Json<LeadList>> {
    let mut leads = state.store.list_leads().map_err(db_err)?;
    if let Some(advocate_id) = filter.advocate_id {
        leads.retain(|lead| lead.advocate_id == advocate_id);
    }
    if let Some(rep_id) = filter.rep_id {
        leads.retain(|lead| lead.rep_id == rep_id);
    }
    if let Some(status) = filter.status {
        let status: LeadStatus = status.parse().map_err(ApiError::InvalidInput)?;
        leads.retain(|lead| lead.status == status);
    }
    Ok(Json(LeadList { leads }))
}

#[derive(Serialize)]
struct LeadEnvelope {
    lead: Lead,
}

async fn create_lead_handler(
    State(state): State<AppState>,
    Json(input): Json<NewLead>,
) -> ApiResult<Json<LeadEnvelope>> {
    if input.advocate_id.trim().is_empty() {
        return Err(ApiError::InvalidInput("advocateId is required".into()));
    }
    let now = now_ms();
    let lead = create_lead(input, now);

    state.store.put_lead(&lead).map_err(db_err)?;
    match state.store.get_advocate(&lead.advocate_id).map_err(db_err)? {
        Some(mut advocate) => {
            advocate.total_leads += 1;
            advocate.updated_at = now;
            state.store.put_advocate(&advocate).map_err(db_err)?;
        }
        None => warn!(advocate_id = %lead.advocate_id, "lead references an unknown advocate"),
    }
    info!(lead_id = %lead.lead_id, "lead created");
    Ok(Json(LeadEnvelope { lead }))
}

async fn get_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<LeadEnvelope>> {
    let lead = state
        .store
        .get_lead(&id)
        .map_err(db_err)?
        .ok_or(ApiError::NotFound("lead"))?;
    Ok(Json(LeadEnvelope { lead }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeadUpdate {
    status: Option<LeadStatus>,
    rep_id: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    note: Option<String>,
}

/// Lead updates are where payouts are born: a transition into `qualified`
/// or `sold` (judged against the stored status) opens the tier payout and
/// accrues the advocate's pending earnings.
async fn update_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<LeadUpdate>,
) -> ApiResult<Json<LeadEnvelope>> {
    let mut lead = state
        .store
        .get_lead(&id)
        .map_err(db_err)?
        .ok_or(ApiError::NotFound("lead"))?;
    let previous_status = lead.status;
    let now = now_ms();

    if let Some(rep_id) = update.rep_id {
        lead.rep_id = rep_id;
    }
    if let Some(email) = update.email {
        lead.email = email;
    }
    if let Some(phone) = update.phone {
        lead.phone = phone;
    }
    if let Some(note) = update.note {
        lead.notes.push(note);
    }
    if let Some(status) = update.status {
        lead.status = status;
    }
    lead.updated_at = now;
    state.store.put_lead(&lead).map_err(db_err)?;

    if let Some(kind) = update
        .status
        .and_then(|status| payout_for_transition(previous_status, status))
    {
        let payout = new_payout(&lead.advocate_id, Some(&lead.lead_id), kind, now);
        state.store.put_payout(&payout).map_err(db_err)?;
        match state.store.get_advocate(&lead.advocate_id).map_err(db_err)? {
            Some(mut advocate) => {
                advocate.pending_earnings_cents += tier_amount_cents(kind);
                if kind == PayoutKind::Sold {
                    advocate.total_conversions += 1;
                }
                advocate.updated_at = now;
                state.store.put_advocate(&advocate).map_err(db_err)?;
            }
            None => {
                warn!(advocate_id = %lead.advocate_id, "payout for an unknown advocate")
            }
        }
        info!(lead_id = %lead.lead_id, tier = %kind, "payout opened");
    }

    Ok(Json(LeadEnvelope { lead }))
}

// ---------------------------------------------------------------------------
// Payouts
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayoutFilter {
    advocate_id: Option<String>,
    status: Option<String>,
}

#[derive(Serialize)]
struct PayoutList {
    payouts: Vec<Payout>,
}

async fn list_payouts(
    State(state): State<AppState>,
    Query(filter): Query<PayoutFilter>,
) -> ApiResult<Json<PayoutList>> {
    let mut payouts = state.store.list_payouts().map_err(db_err)?;
    if let Some(advocate_id) = filter.advocate_id {
        payouts.retain(|payout| payout.advocate_id == advocate_id);
    }
    if let Some(status) = filter.status {
        let status: PayoutStatus = status.parse().map_err(ApiError::InvalidInput)?;
        payouts.retain(|payout| payout.status == status);
    }
    Ok(Json(PayoutList { payouts }))
}

#[derive(Deserialize)]
struct PayoutUpdate {
    status: PayoutStatus,
}

#[derive(Serialize)]
struct PayoutEnvelope {
    payout: Payout,
}

/// Marking a payout paid stamps `paidAt` and moves the amount from the
/// advocate's pending earnings to paid (and total) earnings.
async fn update_payout(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<PayoutUpdate>,
) -> ApiResult<Json<PayoutEnvelope>> {
    let mut payout = state
        .store
        .get_payout(&id)
        .map_err(db_err)?
        .ok_or(ApiError::NotFound("payout"))?;
    let previous_status = payout.status;
    let now = now_ms();

    payout.status = update.status;
    payout.updated_at = now;
    payout.paid_at = (update.status == PayoutStatus::Paid).then_some(now);
    state.store.put_payout(&payout).map_err(db_err)?;

    if update.status == PayoutStatus::Paid && previous_status != PayoutStatus::Paid {
        match state
            .store
            .get_advocate(&payout.advocate_id)
            .map_err(db_err)?
        {
            Some(mut advocate) => {
                advocate.paid_earnings_cents += payout.amount_cents;
                advocate.total_earnings_cents += payout.amount_cents;
                advocate.pending_earnings_cents -= payout.amount_cents;
                advocate.updated_at = now;
                state.store.put_advocate(&advocate).map_err(db_err)?;
            }
            None => warn!(advocate_id = %payout.advocate_id, "paid payout for an unknown advocate"),
        }
        info!(payout_id = %payout.payout_id, "payout paid");
    }

    Ok(Json(PayoutEnvelope { payout }))
}

// ---------------------------------------------------------------------------
// Stats + dashboard
// ---------------------------------------------------------------------------

async fn stats_handler(State(state): State<AppState>) -> ApiResult<Json<ReferralStats>> {
    let advocates = state.store.list_advocates().map_err(db_err)?;
    let leads = state.store.list_leads().map_err(db_err)?;
    let payouts = state.store.list_payouts().map_err(db_err)?;
    Ok(Json(compute_stats(&advocates, &leads, &payouts)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DashboardFilter {
    rep_id: Option<String>,
}

#[derive(Serialize)]
struct DashboardResponse {
    advocates: Vec<Advocate>,
    leads: Vec<Lead>,
    payouts: Vec<Payout>,
    stats: DashboardSummary,
}

/// One call for the dashboard page: the (optionally rep-filtered) advocate
/// and lead lists, all payouts, and the condensed counters.
async fn dashboard_handler(
    State(state): State<AppState>,
    Query(filter): Query<DashboardFilter>,
) -> ApiResult<Json<DashboardResponse>> {
    let mut advocates = state.store.list_advocates().map_err(db_err)?;
    let mut leads = state.store.list_leads().map_err(db_err)?;
    let payouts = state.store.list_payouts().map_err(db_err)?;
    if let Some(rep_id) = filter.rep_id {
        advocates.retain(|a| a.rep_id == rep_id);
        leads.retain(|lead| lead.rep_id == rep_id);
    }
    let stats = summarize_dashboard(&advocates, &leads, &payouts);
    Ok(Json(DashboardResponse {
        advocates,
        leads,
        payouts,
        stats,
    }))
}
