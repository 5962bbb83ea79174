use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use entity::employee::fields;
use entity::{EmployeeRecord, LeadStatus, NO, PayoutKind, YES};
use platform_db::{Store, StoreSettings};
use products_referrals::{NewAdvocate, NewLead, create_advocate, create_lead, new_payout};
use products_roster::{
    RosterError, RosterStore, Snapshot, find_duplicates, merge_employee_data, parse_roster_csv,
    smart_import,
};
use tracing::info;

use crate::client::{RosterApi, download_csv};
use crate::config::AppConfig;

pub enum ImportSource {
    File(PathBuf),
    Sheet,
}

/// The import flow: read, parse, snapshot, reconcile, persist, with the
/// persistence outcome reported separately from the reconciliation outcome.
pub async fn run_import(config: &AppConfig, source: ImportSource) -> Result<()> {
    let text = match source {
        ImportSource::File(path) => {
            ensure_csv(&path)?;
            tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?
        }
        ImportSource::Sheet => {
            let url = config
                .sheet_csv_url
                .as_deref()
                .context("SHEET_CSV_URL is not configured")?;
            download_csv(url)
                .await
                .context("downloading the sheet CSV export")?
        }
    };

    let imported = parse_roster_csv(text.as_bytes())?;
    if imported.is_empty() {
        return Err(RosterError::EmptyImport.into());
    }

    let api = RosterApi::new(&config.api_base);
    let current = api
        .fetch_employees()
        .await
        .context("loading the current roster")?;
    let mut roster = RosterStore::from_snapshot(current);

    write_backup(&config.backup_path, &roster.backup()).await?;

    let today = Utc::now().date_naive();
    let summary = smart_import(&mut roster, imported, today);
    info!(
        added = summary.added,
        terminated = summary.terminated,
        unchanged = summary.unchanged,
        "smart import reconciled"
    );
    println!(
        "Smart import completed: {} added, {} terminated, {} unchanged.",
        summary.added, summary.terminated, summary.unchanged
    );

    if let Err(err) = api.save_employees(&roster.snapshot()).await {
        bail!(
            "reconciliation succeeded but saving did not ({err}); the stored roster is \
             unchanged; re-run the import once the endpoint is reachable"
        );
    }
    println!(
        "Roster saved. Run `staffdesk undo-import` to restore the snapshot in {}.",
        config.backup_path.display()
    );
    Ok(())
}

/// Restore the snapshot taken before the last import. One level only.
pub async fn run_undo(config: &AppConfig) -> Result<()> {
    let path = &config.backup_path;
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(_) => bail!("no undo snapshot available at {}", path.display()),
    };
    let snapshot: Snapshot =
        serde_json::from_str(&text).context("the undo snapshot is corrupt")?;

    let mut roster = RosterStore::default();
    roster.restore(snapshot);
    let records = roster.snapshot();

    let api = RosterApi::new(&config.api_base);
    api.save_employees(&records)
        .await
        .context("restoring the previous roster")?;

    let _ = tokio::fs::remove_file(path).await;
    println!(
        "Import undone: previous roster restored ({} records).",
        records.len()
    );
    Ok(())
}

/// Fetch the roster and print the duplicate report.
pub async fn run_duplicates(config: &AppConfig) -> Result<()> {
    let api = RosterApi::new(&config.api_base);
    let roster = RosterStore::from_snapshot(
        api.fetch_employees()
            .await
            .context("loading the current roster")?,
    );

    let hits = find_duplicates(&roster.active, &roster.terminated);
    if hits.is_empty() {
        println!("No duplicate records found.");
        return Ok(());
    }
    println!("{:<6} {:<10} {:<24} {}", "Group", "Match", "Name", "Email");
    for hit in &hits {
        let name = format!(
            "{} {}",
            hit.record.get(fields::FIRST_NAME),
            hit.record.get(fields::LAST_NAME)
        );
        println!(
            "{:<6} {:<10} {:<24} {}",
            hit.group,
            hit.match_type.to_string(),
            name.trim(),
            hit.record.get(fields::EMAIL)
        );
    }
    println!("{} duplicate entries.", hits.len());
    Ok(())
}

/// Merge every record sharing the given email into one, then persist.
pub async fn run_merge(config: &AppConfig, email: &str) -> Result<()> {
    let key = email.trim().to_lowercase();
    if key.is_empty() {
        bail!("pass a non-empty email to merge on");
    }

    let api = RosterApi::new(&config.api_base);
    let mut roster = RosterStore::from_snapshot(
        api.fetch_employees()
            .await
            .context("loading the current roster")?,
    );

    let group: Vec<EmployeeRecord> = roster
        .active
        .iter()
        .chain(roster.terminated.iter())
        .filter(|rec| rec.email_key() == key)
        .cloned()
        .collect();
    if group.len() < 2 {
        bail!(
            "found {} record(s) with email {key}; nothing to merge",
            group.len()
        );
    }

    write_backup(&config.backup_path, &roster.backup()).await?;

    let merged = merge_employee_data(&group);
    roster.active.retain(|rec| rec.email_key() != key);
    roster.terminated.retain(|rec| rec.email_key() != key);
    if merged.is_terminated() {
        roster.terminated.push(merged);
    } else {
        roster.active.push(merged);
    }

    if let Err(err) = api.save_employees(&roster.snapshot()).await {
        bail!(
            "merge succeeded but saving did not ({err}); the stored roster is unchanged; \
             re-run the merge once the endpoint is reachable"
        );
    }
    println!("Merged {} records for {key} into one.", group.len());
    Ok(())
}

/// Load demo data straight into the local store.
pub async fn run_seed(config: &AppConfig) -> Result<()> {
    let store = Store::open(&StoreSettings::from_env())?;
    let now = Utc::now().timestamp_millis();
    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();

    let employees = vec![
        demo_employee(&[
            (fields::EMPLOYEE_ID, "AL1001"),
            (fields::FIRST_NAME, "Ann"),
            (fields::LAST_NAME, "Lee"),
            (fields::EMAIL, "ann.lee@example.com"),
            (fields::DEPARTMENT, "Operations"),
            (fields::POSITION, "Coordinator"),
            (fields::EMPLOYMENT_DATE, "2022-03-14"),
            (fields::YEARS_OF_SERVICE, "4"),
            (fields::MERCH_SENT, YES),
            (fields::MERCH_SENT_DATE, "2024-06-02"),
            (fields::TERMINATED, NO),
        ]),
        demo_employee(&[
            (fields::EMPLOYEE_ID, "BC1002"),
            (fields::FIRST_NAME, "Bea"),
            (fields::LAST_NAME, "Cho"),
            (fields::EMAIL, "bea.cho@example.com"),
            (fields::DEPARTMENT, "Sales"),
            (fields::EMPLOYMENT_DATE, "2023-09-01"),
            (fields::TERMINATED, NO),
        ]),
        demo_employee(&[
            (fields::EMPLOYEE_ID, "CD1003"),
            (fields::FIRST_NAME, "Cal"),
            (fields::LAST_NAME, "Dee"),
            (fields::EMAIL, "cal.dee@example.com"),
            (fields::TERMINATED, YES),
            (fields::TERMINATION_DATE, today.as_str()),
        ]),
    ];
    store.replace_employees(&employees)?;

    let mut advocate = create_advocate(
        NewAdvocate {
            rep_id: "REP100".into(),
            email: "dana@example.com".into(),
            first_name: "Dana".into(),
            last_name: "Reyes".into(),
            phone: "555-0111".into(),
            address: Default::default(),
            source: Some("SEED".into()),
        },
        &config.referral_url_base,
        now,
    );
    let signup = new_payout(&advocate.advocate_id, None, PayoutKind::Signup, now);
    advocate.pending_earnings_cents += signup.amount_cents;
    store.put_payout(&signup)?;

    let mut lead = create_lead(
        NewLead {
            advocate_id: advocate.advocate_id.clone(),
            rep_id: "REP100".into(),
            email: "prospect@example.com".into(),
            first_name: "Pat".into(),
            last_name: "Moss".into(),
            phone: String::new(),
            address: Default::default(),
            product: None,
            source: Some("SEED".into()),
        },
        now,
    );
    lead.status = LeadStatus::Qualified;
    let qualified = new_payout(
        &advocate.advocate_id,
        Some(&lead.lead_id),
        PayoutKind::Qualified,
        now,
    );
    advocate.pending_earnings_cents += qualified.amount_cents;
    advocate.total_leads += 1;
    store.put_advocate(&advocate)?;
    store.put_lead(&lead)?;
    store.put_payout(&qualified)?;

    println!(
        "Seeded {} employees, 1 advocate, 1 lead, 2 payouts.",
        employees.len()
    );
    Ok(())
}

fn demo_employee(pairs: &[(&str, &str)]) -> EmployeeRecord {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Only plain CSV uploads are accepted; binary spreadsheets must be
/// re-exported first.
fn ensure_csv(path: &Path) -> Result<(), RosterError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_lowercase();
    if extension == "csv" {
        Ok(())
    } else {
        Err(RosterError::UnsupportedFormat(extension))
    }
}

async fn write_backup(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let text = serde_json::to_string_pretty(snapshot)?;
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("writing the undo snapshot {}", path.display()))?;
    Ok(())
}
