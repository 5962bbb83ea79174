use std::io::Read;

use csv::{ReaderBuilder, Trim};
use entity::EmployeeRecord;
use entity::employee::fields;

use crate::error::RosterError;

/// Column header of a combined-name export; split into first/last on read.
const NAME_COLUMN: &str = "Name";

/// Map a spreadsheet column header to a canonical field name. Unknown
/// headers pass through verbatim.
fn canonical_field(header: &str) -> Option<&'static str> {
    match header {
        "First Name" | "firstName" => Some(fields::FIRST_NAME),
        "Last Name" | "lastName" => Some(fields::LAST_NAME),
        "Email" | "Work Email" | "email" => Some(fields::EMAIL),
        "Phone" | "phone" => Some(fields::PHONE),
        "Department" | "department" => Some(fields::DEPARTMENT),
        "Position" | "Role" | "position" => Some(fields::POSITION),
        "Employment Date" | "Hire Date" | "employmentDate" => Some(fields::EMPLOYMENT_DATE),
        "Years of Service" | "yearsOfService" => Some(fields::YEARS_OF_SERVICE),
        "Merch Requested" | "merchRequested" => Some(fields::MERCH_REQUESTED),
        "Merch Sent" | "merchSent" => Some(fields::MERCH_SENT),
        "Merch Sent Date" | "merchSentDate" => Some(fields::MERCH_SENT_DATE),
        "Employee ID" | "employeeId" => Some(fields::EMPLOYEE_ID),
        "Terminated" | "terminated" => Some(fields::TERMINATED),
        "Termination Date" | "terminationDate" => Some(fields::TERMINATION_DATE),
        _ => None,
    }
}

/// Split a combined name: first token is the first name, the remaining
/// tokens join into the last name. A one-token name has no last name.
pub fn parse_name(full: &str) -> (String, String) {
    let cleaned = full.replace('"', "");
    let mut parts = cleaned.split_whitespace();
    let first = parts.next().unwrap_or("").to_string();
    let last = parts.collect::<Vec<_>>().join(" ");
    (first, last)
}

/// Parse a roster CSV export into employee records.
///
/// The reader handles quoted fields containing commas; cells are trimmed,
/// fully blank rows are skipped, and short rows are tolerated. A `Name`
/// column is split into `firstName`/`lastName`.
pub fn parse_roster_csv<R: Read>(reader: R) -> Result<Vec<EmployeeRecord>, RosterError> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let mut record = EmployeeRecord::new();
        for (header, value) in headers.iter().zip(row.iter()) {
            let header = header.trim();
            if header.is_empty() || value.is_empty() {
                continue;
            }
            if header == NAME_COLUMN {
                let (first, last) = parse_name(value);
                if !first.is_empty() {
                    record.set(fields::FIRST_NAME, first);
                }
                if !last.is_empty() {
                    record.set(fields::LAST_NAME, last);
                }
            } else if let Some(field) = canonical_field(header) {
                record.set(field, value);
            } else {
                record.set(header, value);
            }
        }
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_combined_names() {
        assert_eq!(parse_name("Jo Smith"), ("Jo".into(), "Smith".into()));
        assert_eq!(
            parse_name("Mary Jane van Dyke"),
            ("Mary".into(), "Jane van Dyke".into())
        );
        assert_eq!(parse_name("Cher"), ("Cher".into(), String::new()));
        assert_eq!(parse_name("  "), (String::new(), String::new()));
    }

    #[test]
    fn maps_spreadsheet_headers() {
        let csv = "First Name,Last Name,Hire Date,Role\nJo,Smith,2023-04-01,Installer\n";
        let records = parse_roster_csv(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.get(fields::FIRST_NAME), "Jo");
        assert_eq!(rec.get(fields::EMPLOYMENT_DATE), "2023-04-01");
        assert_eq!(rec.get(fields::POSITION), "Installer");
    }

    #[test]
    fn name_column_is_split() {
        let csv = "Name,Email\nJo Anne Smith,jo@x.com\n";
        let records = parse_roster_csv(csv.as_bytes()).unwrap();
        let rec = &records[0];
        assert_eq!(rec.get(fields::FIRST_NAME), "Jo");
        assert_eq!(rec.get(fields::LAST_NAME), "Anne Smith");
        assert_eq!(rec.get(fields::EMAIL), "jo@x.com");
    }

    #[test]
    fn quoted_commas_stay_in_one_cell() {
        let csv = "First Name,Position\nJo,\"Manager, Northeast\"\n";
        let records = parse_roster_csv(csv.as_bytes()).unwrap();
        assert_eq!(records[0].get(fields::POSITION), "Manager, Northeast");
    }

    #[test]
    fn blank_rows_are_skipped() {
        let csv = "First Name,Last Name\nJo,Smith\n,\n\nBea,Cho\n";
        let records = parse_roster_csv(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn unknown_headers_pass_through() {
        let csv = "First Name,Shirt Size\nJo,XL\n";
        let records = parse_roster_csv(csv.as_bytes()).unwrap();
        assert_eq!(records[0].get("Shirt Size"), "XL");
    }

    #[test]
    fn short_rows_are_tolerated() {
        let csv = "First Name,Last Name,Email\nJo,Smith\n";
        let records = parse_roster_csv(csv.as_bytes()).unwrap();
        assert_eq!(records[0].get(fields::EMAIL), "");
    }
}
