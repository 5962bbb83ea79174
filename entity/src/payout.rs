use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which tier of the payout table a payout was issued under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutKind {
    Signup,
    Qualified,
    Sold,
}

impl fmt::Display for PayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Signup => "signup",
            Self::Qualified => "qualified",
            Self::Sold => "sold",
        };
        write!(f, "{label}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    Pending,
    Paid,
}

impl fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        };
        write!(f, "{label}")
    }
}

impl FromStr for PayoutStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            other => Err(format!("unknown payout status '{other}'")),
        }
    }
}

/// A dollar award (in integer cents) for a referral reaching a tier.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub payout_id: String,
    pub advocate_id: String,
    pub lead_id: Option<String>,
    pub amount_cents: i64,
    pub kind: PayoutKind,
    pub status: PayoutStatus,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    pub paid_at: Option<i64>,
    #[serde(default)]
    pub notes: String,
}
