use std::collections::BTreeMap;

use entity::{Advocate, Lead, Payout, PayoutStatus};
use serde::Serialize;

/// Program-wide counters for the stats endpoint.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralStats {
    pub total_advocates: usize,
    pub active_advocates: usize,
    pub total_leads: usize,
    pub leads_by_status: BTreeMap<String, usize>,
    pub total_payouts_cents: i64,
    pub pending_payouts_cents: i64,
    pub paid_payouts_cents: i64,
}

pub fn compute_stats(advocates: &[Advocate], leads: &[Lead], payouts: &[Payout]) -> ReferralStats {
    let mut leads_by_status = BTreeMap::new();
    for lead in leads {
        *leads_by_status.entry(lead.status.to_string()).or_insert(0) += 1;
    }
    let sum_where = |status: Option<PayoutStatus>| {
        payouts
            .iter()
            .filter(|p| status.is_none_or(|s| p.status == s))
            .map(|p| p.amount_cents)
            .sum::<i64>()
    };
    ReferralStats {
        total_advocates: advocates.len(),
        active_advocates: advocates.iter().filter(|a| a.active).count(),
        total_leads: leads.len(),
        leads_by_status,
        total_payouts_cents: sum_where(None),
        pending_payouts_cents: sum_where(Some(PayoutStatus::Pending)),
        paid_payouts_cents: sum_where(Some(PayoutStatus::Paid)),
    }
}

/// Condensed counters for the dashboard endpoint.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_advocates: usize,
    pub total_leads: usize,
    pub total_earnings_cents: i64,
    pub pending_payouts: usize,
    pub paid_payouts: usize,
}

pub fn summarize_dashboard(
    advocates: &[Advocate],
    leads: &[Lead],
    payouts: &[Payout],
) -> DashboardSummary {
    DashboardSummary {
        total_advocates: advocates.len(),
        total_leads: leads.len(),
        total_earnings_cents: advocates.iter().map(|a| a.total_earnings_cents).sum(),
        pending_payouts: payouts
            .iter()
            .filter(|p| p.status == PayoutStatus::Pending)
            .count(),
        paid_payouts: payouts
            .iter()
            .filter(|p| p.status == PayoutStatus::Paid)
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{NewAdvocate, NewLead, create_advocate, create_lead, new_payout};
    use entity::{LeadStatus, PayoutKind};

    type Map = BTreeMap<String, String>;

    fn advocate(active: bool) -> Advocate {
        let mut adv = create_advocate(
            NewAdvocate {
                rep_id: String::new(),
                email: "a@x.com".into(),
                first_name: "Ann".into(),
                last_name: "Lee".into(),
                phone: String::new(),
                address: Map::new(),
                source: None,
            },
            "https://example.com/refer",
            1,
        );
        adv.active = active;
        adv
    }

    fn lead(status: LeadStatus) -> Lead {
        let mut lead = create_lead(
            NewLead {
                advocate_id: "ADV1".into(),
                rep_id: String::new(),
                email: String::new(),
                first_name: "Lu".into(),
                last_name: "Ma".into(),
                phone: String::new(),
                address: Map::new(),
                product: None,
                source: None,
            },
            1,
        );
        lead.status = status;
        lead
    }

    #[test]
    fn stats_bucket_leads_and_sum_payouts() {
        let advocates = vec![advocate(true), advocate(false)];
        let leads = vec![
            lead(LeadStatus::New),
            lead(LeadStatus::Qualified),
            lead(LeadStatus::Qualified),
        ];
        let mut paid = new_payout("ADV1", None, PayoutKind::Signup, 1);
        paid.status = PayoutStatus::Paid;
        let payouts = vec![paid, new_payout("ADV1", None, PayoutKind::Sold, 2)];

        let stats = compute_stats(&advocates, &leads, &payouts);
        assert_eq!(stats.total_advocates, 2);
        assert_eq!(stats.active_advocates, 1);
        assert_eq!(stats.leads_by_status.get("qualified"), Some(&2));
        assert_eq!(stats.total_payouts_cents, 17_500);
        assert_eq!(stats.pending_payouts_cents, 15_000);
        assert_eq!(stats.paid_payouts_cents, 2_500);
    }

    #[test]
    fn dashboard_counts_payout_statuses() {
        let payouts = vec![
            new_payout("ADV1", None, PayoutKind::Signup, 1),
            new_payout("ADV1", None, PayoutKind::Qualified, 2),
        ];
        let summary = summarize_dashboard(&[], &[], &payouts);
        assert_eq!(summary.pending_payouts, 2);
        assert_eq!(summary.paid_payouts, 0);
    }
}
