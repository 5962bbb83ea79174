//! Key-value table store over SQLite.
//!
//! One table per collection, one JSON document per row. The employee
//! collection is an ordered list replaced wholesale: last writer wins, no
//! version check. The referral collections are keyed by record id.

use std::sync::{Arc, Mutex, MutexGuard};

use entity::{Advocate, EmployeeRecord, Lead, Payout};
use rusqlite::Connection;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

const EMPLOYEES: &str = "employees";
const ADVOCATES: &str = "advocates";
const LEADS: &str = "leads";
const PAYOUTS: &str = "payouts";

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("stored document is not valid JSON: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("store lock poisoned")]
    Poisoned,
}

pub type DbResult<T> = Result<T, DbError>;

/// Environment-driven store settings.
#[derive(Clone, Debug)]
pub struct StoreSettings {
    path: String,
}

impl StoreSettings {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        let path = std::env::var("STAFFDESK_DB").unwrap_or_else(|_| "staffdesk.db".to_string());
        Self { path }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Handle to the store. Cheap to clone; access serializes behind the
/// connection lock, and no caller holds it across an await point.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(settings: &StoreSettings) -> DbResult<Self> {
        Self::from_connection(Connection::open(settings.path())?)
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::Poisoned)
    }

    pub fn ping(&self) -> DbResult<()> {
        let conn = self.lock()?;
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }

    /// The full roster in stored order, active and terminated intermixed.
    pub fn load_employees(&self) -> DbResult<Vec<EmployeeRecord>> {
        self.scan(EMPLOYEES)
    }

    /// Replace the entire stored roster in one transaction.
    pub fn replace_employees(&self, employees: &[EmployeeRecord]) -> DbResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM employees", [])?;
        {
            let mut insert = tx.prepare("INSERT INTO employees (doc) VALUES (?1)")?;
            for record in employees {
                insert.execute([serde_json::to_string(record)?])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn list_advocates(&self) -> DbResult<Vec<Advocate>> {
        self.scan(ADVOCATES)
    }

    pub fn get_advocate(&self, id: &str) -> DbResult<Option<Advocate>> {
        self.fetch(ADVOCATES, id)
    }

    pub fn put_advocate(&self, advocate: &Advocate) -> DbResult<()> {
        self.upsert(ADVOCATES, &advocate.advocate_id, advocate)
    }

    pub fn list_leads(&self) -> DbResult<Vec<Lead>> {
        self.scan(LEADS)
    }

    pub fn get_lead(&self, id: &str) -> DbResult<Option<Lead>> {
        self.fetch(LEADS, id)
    }

    pub fn put_lead(&self, lead: &Lead) -> DbResult<()> {
        self.upsert(LEADS, &lead.lead_id, lead)
    }

    pub fn list_payouts(&self) -> DbResult<Vec<Payout>> {
        self.scan(PAYOUTS)
    }

    pub fn get_payout(&self, id: &str) -> DbResult<Option<Payout>> {
        self.fetch(PAYOUTS, id)
    }

    pub fn put_payout(&self, payout: &Payout) -> DbResult<()> {
        self.upsert(PAYOUTS, &payout.payout_id, payout)
    }

    fn scan<T: DeserializeOwned>(&self, table: &str) -> DbResult<Vec<T>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("SELECT doc FROM {table} ORDER BY rowid"))?;
        let docs = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        docs.iter()
            .map(|doc| serde_json::from_str(doc).map_err(DbError::from))
            .collect()
    }

    fn fetch<T: DeserializeOwned>(&self, table: &str, id: &str) -> DbResult<Option<T>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("SELECT doc FROM {table} WHERE id = ?1"))?;
        let mut rows = stmt.query_map([id], |row| row.get::<_, String>(0))?;
        match rows.next() {
            Some(doc) => Ok(Some(serde_json::from_str(&doc?)?)),
            None => Ok(None),
        }
    }

    fn upsert<T: Serialize>(&self, table: &str, id: &str, value: &T) -> DbResult<()> {
        let doc = serde_json::to_string(value)?;
        let conn = self.lock()?;
        conn.execute(
            &format!("INSERT OR REPLACE INTO {table} (id, doc) VALUES (?1, ?2)"),
            [id, doc.as_str()],
        )?;
        Ok(())
    }
}

fn init_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS employees (
             seq INTEGER PRIMARY KEY AUTOINCREMENT,
             doc TEXT NOT NULL
         );
         CREATE TABLE IF NOT EXISTS advocates (
             id  TEXT PRIMARY KEY,
             doc TEXT NOT NULL
         );
         CREATE TABLE IF NOT EXISTS leads (
             id  TEXT PRIMARY KEY,
             doc TEXT NOT NULL
         );
         CREATE TABLE IF NOT EXISTS payouts (
             id  TEXT PRIMARY KEY,
             doc TEXT NOT NULL
         );",
    )?;
    Ok(())
}
