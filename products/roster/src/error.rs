use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    /// Malformed CSV or an unreadable row.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
    /// Binary spreadsheet uploads are not accepted.
    #[error("unsupported import format '.{0}': re-export the sheet as CSV and import that")]
    UnsupportedFormat(String),
    /// A zero-row import would terminate the entire roster; refuse it.
    #[error("imported roster has no rows")]
    EmptyImport,
}
