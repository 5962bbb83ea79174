use std::collections::HashMap;
use std::fmt;

use entity::EmployeeRecord;
use serde::Serialize;

/// Which key a duplicate entry matched on. Every key type is reported
/// independently, so one record can appear once per type it collides on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MatchType {
    Email,
    LastName,
    FullName,
}

impl MatchType {
    fn key_prefix(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::LastName => "lastName",
            Self::FullName => "fullName",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Email => "Email",
            Self::LastName => "Last Name",
            Self::FullName => "Full Name",
        };
        write!(f, "{label}")
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct DuplicateHit {
    pub record: EmployeeRecord,
    pub match_type: MatchType,
    pub group: usize,
}

/// Scan the full roster (active then terminated) for records sharing an
/// email, last name, or full name.
///
/// Single forward pass: the first sighting of a key only registers it,
/// later sightings emit a hit tagged with the group number assigned at
/// registration. Group numbers come from a running counter and group rows
/// for display; they are not stable cluster ids.
pub fn find_duplicates(
    active: &[EmployeeRecord],
    terminated: &[EmployeeRecord],
) -> Vec<DuplicateHit> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut duplicates = Vec::new();

    for record in active.iter().chain(terminated.iter()) {
        let keys = [
            (MatchType::Email, record.email_key()),
            (MatchType::LastName, record.last_name_key()),
            (MatchType::FullName, record.full_name_key()),
        ];
        for (match_type, key) in keys {
            if key.is_empty() {
                continue;
            }
            let tagged = format!("{}:{key}", match_type.key_prefix());
            match seen.get(&tagged) {
                Some(&group) => duplicates.push(DuplicateHit {
                    record: record.clone(),
                    match_type,
                    group,
                }),
                None => {
                    seen.insert(tagged, duplicates.len() + 1);
                }
            }
        }
    }

    duplicates
}
