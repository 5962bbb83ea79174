use entity::{EmployeeCollection, EmployeeRecord};
use thiserror::Error;

/// Failures talking to the persistence endpoint (or a sheet export).
/// Reported distinctly from parse and reconciliation failures so "it
/// reconciled but did not save" is never ambiguous.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),
}

/// REST client for the roster persistence endpoint.
#[derive(Clone)]
pub struct RosterApi {
    http: reqwest::Client,
    base: String,
}

impl RosterApi {
    pub fn new(base: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// `GET /employees`: the full authoritative snapshot.
    pub async fn fetch_employees(&self) -> Result<Vec<EmployeeRecord>, PersistError> {
        let response = self
            .http
            .get(format!("{}/employees", self.base))
            .send()
            .await?;
        let response = ensure_ok(response)?;
        let collection: EmployeeCollection = response.json().await?;
        Ok(collection.employees)
    }

    /// `POST /employees`: replace the entire stored collection.
    pub async fn save_employees(&self, employees: &[EmployeeRecord]) -> Result<(), PersistError> {
        let body = EmployeeCollection {
            employees: employees.to_vec(),
        };
        let response = self
            .http
            .post(format!("{}/employees", self.base))
            .json(&body)
            .send()
            .await?;
        ensure_ok(response)?;
        Ok(())
    }
}

/// Download a spreadsheet's CSV export.
pub async fn download_csv(url: &str) -> Result<String, PersistError> {
    let response = reqwest::get(url).await?;
    let response = ensure_ok(response)?;
    Ok(response.text().await?)
}

fn ensure_ok(response: reqwest::Response) -> Result<reqwest::Response, PersistError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(PersistError::Status(response.status()))
    }
}
