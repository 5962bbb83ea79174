use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use entity::employee::fields;
use entity::{EmployeeRecord, NO};

use crate::store::RosterStore;

const DATE_FMT: &str = "%Y-%m-%d";

/// Outcome of a smart import run.
///
/// `unchanged` counts active records confirmed present in the import;
/// imported rows matching an existing person bump no counter at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub terminated: usize,
    pub unchanged: usize,
}

/// Reconcile the roster against a freshly imported one, in place.
///
/// Active records absent from the import are terminated as of `today`;
/// imported records unknown to both sides are appended to the active list
/// as new hires. A match never copies fields from the import;
/// reconciliation adjusts membership only, so manually curated data
/// survives every re-import.
pub fn smart_import(
    store: &mut RosterStore,
    mut imported: Vec<EmployeeRecord>,
    today: NaiveDate,
) -> ImportSummary {
    assign_missing_ids(&mut imported, today);
    let index = ImportIndex::build(&imported);

    let mut summary = ImportSummary::default();
    let mut to_terminate = Vec::new();
    for (idx, record) in store.active.iter().enumerate() {
        if index.contains(record) {
            summary.unchanged += 1;
        } else {
            to_terminate.push(idx);
        }
    }

    // Reverse order keeps the earlier indices valid while removing.
    for idx in to_terminate.into_iter().rev() {
        store.terminate(idx, today);
        summary.terminated += 1;
    }

    for mut record in imported {
        if known_to_roster(store, &record) {
            continue;
        }
        if record.is_blank(fields::EMPLOYMENT_DATE) {
            record.set(fields::EMPLOYMENT_DATE, today.format(DATE_FMT).to_string());
        }
        record.set(fields::TERMINATED, NO);
        store.active.push(record);
        summary.added += 1;
    }

    summary
}

/// Lookup indices over the imported roster, one per identity tier. Later
/// rows sharing a key overwrite earlier ones: last write wins, no
/// conflict error.
struct ImportIndex {
    by_id: HashMap<String, usize>,
    by_email: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl ImportIndex {
    fn build(imported: &[EmployeeRecord]) -> Self {
        let mut by_id = HashMap::new();
        let mut by_email = HashMap::new();
        let mut by_name = HashMap::new();
        for (idx, record) in imported.iter().enumerate() {
            let id = record.employee_id();
            if !id.is_empty() {
                by_id.insert(id.to_string(), idx);
            }
            let email = record.email_key();
            if !email.is_empty() {
                by_email.insert(email, idx);
            }
            let name = record.full_name_key();
            if !name.is_empty() {
                by_name.insert(name, idx);
            }
        }
        Self {
            by_id,
            by_email,
            by_name,
        }
    }

    /// Probe the tiers in priority order: id, then email, then name. The
    /// first tier that hits decides; a record matched once is not counted
    /// again under a lower tier.
    fn contains(&self, record: &EmployeeRecord) -> bool {
        let id = record.employee_id();
        if !id.is_empty() && self.by_id.contains_key(id) {
            return true;
        }
        let email = record.email_key();
        if !email.is_empty() && self.by_email.contains_key(&email) {
            return true;
        }
        let name = record.full_name_key();
        !name.is_empty() && self.by_name.contains_key(&name)
    }
}

/// Tier-by-tier probe of an imported record against the current roster,
/// both sides. Falls through the tiers so a freshly generated id never
/// masks an email or name match against a record imported without one.
fn known_to_roster(store: &RosterStore, record: &EmployeeRecord) -> bool {
    let all = || store.active.iter().chain(store.terminated.iter());

    let id = record.employee_id();
    if !id.is_empty() && all().any(|existing| existing.employee_id() == id) {
        return true;
    }
    let email = record.email_key();
    if !email.is_empty() && all().any(|existing| existing.email_key() == email) {
        return true;
    }
    let name = record.full_name_key();
    !name.is_empty() && all().any(|existing| existing.full_name_key() == name)
}

/// Give importable rows without an id a generated one, when both names are
/// present: uppercased initials of first and last name plus a four-digit
/// suffix seeded from the import day and bumped per assignment.
fn assign_missing_ids(imported: &mut [EmployeeRecord], today: NaiveDate) {
    let mut suffix = 1000 + today.num_days_from_ce().unsigned_abs() % 9000;
    for record in imported {
        if !record.employee_id().is_empty() {
            continue;
        }
        let first_initial = record.get(fields::FIRST_NAME).trim().chars().next();
        let last_initial = record.get(fields::LAST_NAME).trim().chars().next();
        let (Some(first), Some(last)) = (first_initial, last_initial) else {
            continue;
        };
        let initials: String = first
            .to_uppercase()
            .chain(last.to_uppercase())
            .collect();
        record.set(fields::EMPLOYEE_ID, format!("{initials}{suffix:04}"));
        suffix = if suffix >= 9999 { 1000 } else { suffix + 1 };
    }
}
