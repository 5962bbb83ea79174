use std::path::PathBuf;

/// Environment-driven application settings.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub cors_allowed_origins: Vec<String>,
    /// Base URL of the persistence endpoint the CLI flows talk to.
    pub api_base: String,
    /// Public CSV-export URL of the roster sheet, for `import --from-sheet`.
    pub sheet_csv_url: Option<String>,
    /// Base URL advocates' referral links are minted under.
    pub referral_url_base: String,
    /// Where the pre-import roster snapshot is kept for one-level undo.
    pub backup_path: PathBuf,
}

impl AppConfig {
    pub fn load() -> Self {
        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .filter_map(|origin| {
                let trimmed = origin.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect();

        let api_base = std::env::var("STAFFDESK_API_BASE")
            .unwrap_or_else(|_| "http://127.0.0.1:8080".into());
        let sheet_csv_url = std::env::var("SHEET_CSV_URL").ok().filter(|url| !url.is_empty());
        let referral_url_base = std::env::var("REFERRAL_URL_BASE")
            .unwrap_or_else(|_| "https://staffdesk.example.com/refer".into());
        let backup_path = std::env::var("STAFFDESK_UNDO_FILE")
            .unwrap_or_else(|_| "staffdesk-undo.json".into())
            .into();

        Self {
            cors_allowed_origins,
            api_base,
            sheet_csv_url,
            referral_url_base,
            backup_path,
        }
    }
}
