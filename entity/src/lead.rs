use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle of a referral lead. `Qualified` and `Sold` are the payout
/// triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Sold,
    Lost,
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Qualified => "qualified",
            Self::Sold => "sold",
            Self::Lost => "lost",
        };
        write!(f, "{label}")
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "new" => Ok(Self::New),
            "contacted" => Ok(Self::Contacted),
            "qualified" => Ok(Self::Qualified),
            "sold" => Ok(Self::Sold),
            "lost" => Ok(Self::Lost),
            other => Err(format!("unknown lead status '{other}'")),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub lead_id: String,
    pub advocate_id: String,
    #[serde(default)]
    pub rep_id: String,
    pub status: LeadStatus,
    #[serde(default)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: BTreeMap<String, String>,
    pub product: String,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub notes: Vec<String>,
}
