use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Canonical field names for employee records.
///
/// Records are schemaless maps; these constants name the fields the portal
/// knows about. Anything else round-trips untouched.
pub mod fields {
    pub const EMPLOYEE_ID: &str = "employeeId";
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const DEPARTMENT: &str = "department";
    pub const POSITION: &str = "position";
    pub const EMPLOYMENT_DATE: &str = "employmentDate";
    pub const YEARS_OF_SERVICE: &str = "yearsOfService";
    pub const MERCH_REQUESTED: &str = "merchRequested";
    pub const MERCH_SENT: &str = "merchSent";
    pub const MERCH_SENT_DATE: &str = "merchSentDate";
    pub const TERMINATED: &str = "terminated";
    pub const TERMINATION_DATE: &str = "terminationDate";
}

pub const YES: &str = "Yes";
pub const NO: &str = "No";

/// A single employee record: a mapping from field names to string values.
///
/// Fields are optional; a missing field reads as the empty string. There is
/// no schema enforcement; imports may carry columns the portal has never
/// seen, and they are kept verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeRecord(BTreeMap<String, String>);

impl EmployeeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `field`, or the empty string when absent.
    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    /// True when the field is absent or whitespace-only.
    pub fn is_blank(&self, field: &str) -> bool {
        self.get(field).trim().is_empty()
    }

    /// All present fields in name order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn employee_id(&self) -> &str {
        self.get(fields::EMPLOYEE_ID)
    }

    /// Lowercased, trimmed email, the second-tier identity key.
    pub fn email_key(&self) -> String {
        self.get(fields::EMAIL).to_lowercase().trim().to_string()
    }

    /// Lowercased, trimmed last name, used by the duplicate report.
    pub fn last_name_key(&self) -> String {
        self.get(fields::LAST_NAME).to_lowercase().trim().to_string()
    }

    /// Lowercased `"firstName lastName"` concatenation, trimmed as a whole,
    /// the third-tier identity key. A record with only a first name yields a
    /// single-token key.
    pub fn full_name_key(&self) -> String {
        format!(
            "{} {}",
            self.get(fields::FIRST_NAME),
            self.get(fields::LAST_NAME)
        )
        .to_lowercase()
        .trim()
        .to_string()
    }

    pub fn is_terminated(&self) -> bool {
        self.get(fields::TERMINATED) == YES
    }
}

impl FromIterator<(String, String)> for EmployeeRecord {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Wire envelope for the persistence endpoint: the full roster, active and
/// terminated intermixed, distinguished only by the `terminated` field.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EmployeeCollection {
    pub employees: Vec<EmployeeRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> EmployeeRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_fields_read_as_empty() {
        let rec = EmployeeRecord::new();
        assert_eq!(rec.get(fields::EMAIL), "");
        assert!(rec.is_blank(fields::EMAIL));
    }

    #[test]
    fn identity_keys_normalize_case_and_whitespace() {
        let rec = record(&[
            (fields::FIRST_NAME, "Jo"),
            (fields::LAST_NAME, "Smith"),
            (fields::EMAIL, "  Jo.Smith@Example.COM "),
        ]);
        assert_eq!(rec.email_key(), "jo.smith@example.com");
        assert_eq!(rec.full_name_key(), "jo smith");
        assert_eq!(rec.last_name_key(), "smith");
    }

    #[test]
    fn single_token_name_key() {
        let rec = record(&[(fields::FIRST_NAME, "Ann")]);
        assert_eq!(rec.full_name_key(), "ann");
    }

    #[test]
    fn serializes_as_flat_map() {
        let rec = record(&[(fields::FIRST_NAME, "Ann"), ("badgeColor", "green")]);
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["firstName"], "Ann");
        assert_eq!(json["badgeColor"], "green");
    }
}
