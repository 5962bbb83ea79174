use chrono::NaiveDate;
use entity::employee::fields;
use entity::{EmployeeRecord, YES};

const DATE_FMT: &str = "%Y-%m-%d";

/// Combine several records believed to denote one person into a single
/// record.
///
/// Folds left-to-right from a copy of the first record. Blank incoming
/// values never overwrite anything; a blank held value adopts the incoming
/// one; otherwise a per-field policy decides. Under the default
/// longer-text policy the outcome can depend on input order; that is a
/// documented property of the merge, not something to correct for, since
/// fixtures rely on the observable results.
pub fn merge_employee_data(records: &[EmployeeRecord]) -> EmployeeRecord {
    let Some((first, rest)) = records.split_first() else {
        return EmployeeRecord::new();
    };
    let mut merged = first.clone();
    for record in rest {
        for (field, value) in record.entries() {
            if value.trim().is_empty() {
                continue;
            }
            if let Some(next) = merge_field(&merged, field, value) {
                merged.set(field.to_string(), next);
            }
        }
    }
    merged
}

fn merge_field(current: &EmployeeRecord, field: &str, incoming: &str) -> Option<String> {
    // merchSentDate is governed entirely by its own policy: gated on
    // merchSent, floored far in the past when unset.
    if field == fields::MERCH_SENT_DATE {
        return merge_merch_sent_date(current, incoming);
    }

    let held = current.get(field);
    if held.trim().is_empty() {
        return Some(incoming.to_string());
    }

    match field {
        fields::EMPLOYMENT_DATE => pick_date(held, incoming, |inc, cur| inc < cur),
        fields::TERMINATION_DATE => pick_date(held, incoming, |inc, cur| inc > cur),
        fields::YEARS_OF_SERVICE => {
            (parse_number(incoming) > parse_number(held)).then(|| incoming.to_string())
        }
        // Sticky one-way flags: once any contributor says Yes, Yes it stays.
        fields::TERMINATED | fields::MERCH_SENT => {
            (incoming.trim() == YES && held != YES).then(|| YES.to_string())
        }
        // Crude completeness heuristic: the textually longer value wins.
        _ => (incoming.chars().count() > held.chars().count()).then(|| incoming.to_string()),
    }
}

fn merge_merch_sent_date(current: &EmployeeRecord, incoming: &str) -> Option<String> {
    if current.get(fields::MERCH_SENT) != YES {
        return None;
    }
    let held = parse_date(current.get(fields::MERCH_SENT_DATE)).unwrap_or(NaiveDate::MIN);
    let candidate = parse_date(incoming)?;
    (candidate > held).then(|| incoming.trim().to_string())
}

fn pick_date(held: &str, incoming: &str, wins: fn(NaiveDate, NaiveDate) -> bool) -> Option<String> {
    let held = parse_date(held)?;
    let candidate = parse_date(incoming)?;
    wins(candidate, held).then(|| incoming.trim().to_string())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FMT).ok()
}

fn parse_number(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
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
    fn empty_input_yields_an_empty_record() {
        assert_eq!(merge_employee_data(&[]), EmployeeRecord::new());
    }

    #[test]
    fn single_record_merges_to_itself() {
        let rec = record(&[
            (fields::FIRST_NAME, "Jo"),
            (fields::EMAIL, "jo@x.com"),
            (fields::YEARS_OF_SERVICE, "3"),
        ]);
        assert_eq!(merge_employee_data(std::slice::from_ref(&rec)), rec);
    }

    #[test]
    fn blank_held_values_adopt_incoming() {
        let merged = merge_employee_data(&[
            record(&[(fields::FIRST_NAME, "Jo")]),
            record(&[(fields::PHONE, "555-0100")]),
        ]);
        assert_eq!(merged.get(fields::PHONE), "555-0100");
    }

    #[test]
    fn blank_incoming_values_never_overwrite() {
        let merged = merge_employee_data(&[
            record(&[(fields::PHONE, "555-0100")]),
            record(&[(fields::PHONE, "  ")]),
        ]);
        assert_eq!(merged.get(fields::PHONE), "555-0100");
    }

    #[test]
    fn years_of_service_keeps_the_larger_number() {
        let merged = merge_employee_data(&[
            record(&[(fields::YEARS_OF_SERVICE, "2")]),
            record(&[(fields::YEARS_OF_SERVICE, "5")]),
        ]);
        assert_eq!(merged.get(fields::YEARS_OF_SERVICE), "5");

        let merged = merge_employee_data(&[
            record(&[(fields::YEARS_OF_SERVICE, "5")]),
            record(&[(fields::YEARS_OF_SERVICE, "2")]),
        ]);
        assert_eq!(merged.get(fields::YEARS_OF_SERVICE), "5");
    }

    #[test]
    fn non_numeric_years_count_as_zero() {
        let merged = merge_employee_data(&[
            record(&[(fields::YEARS_OF_SERVICE, "n/a")]),
            record(&[(fields::YEARS_OF_SERVICE, "1")]),
        ]);
        assert_eq!(merged.get(fields::YEARS_OF_SERVICE), "1");
    }

    #[test]
    fn employment_date_keeps_the_earlier() {
        let merged = merge_employee_data(&[
            record(&[(fields::EMPLOYMENT_DATE, "2020-01-01")]),
            record(&[(fields::EMPLOYMENT_DATE, "2019-06-01")]),
        ]);
        assert_eq!(merged.get(fields::EMPLOYMENT_DATE), "2019-06-01");
    }

    #[test]
    fn termination_date_keeps_the_later() {
        let merged = merge_employee_data(&[
            record(&[(fields::TERMINATION_DATE, "2024-01-01")]),
            record(&[(fields::TERMINATION_DATE, "2025-03-03")]),
        ]);
        assert_eq!(merged.get(fields::TERMINATION_DATE), "2025-03-03");
    }

    #[test]
    fn unparseable_dates_keep_the_held_value() {
        let merged = merge_employee_data(&[
            record(&[(fields::EMPLOYMENT_DATE, "2020-01-01")]),
            record(&[(fields::EMPLOYMENT_DATE, "sometime")]),
        ]);
        assert_eq!(merged.get(fields::EMPLOYMENT_DATE), "2020-01-01");
    }

    #[test]
    fn terminated_flag_is_sticky_in_either_order() {
        let yes = record(&[(fields::TERMINATED, YES)]);
        let no = record(&[(fields::TERMINATED, "No")]);
        let merged = merge_employee_data(&[yes.clone(), no.clone()]);
        assert_eq!(merged.get(fields::TERMINATED), YES);
        let merged = merge_employee_data(&[no, yes]);
        assert_eq!(merged.get(fields::TERMINATED), YES);
    }

    #[test]
    fn merch_sent_is_sticky_in_either_order() {
        let yes = record(&[(fields::MERCH_SENT, YES)]);
        let no = record(&[(fields::MERCH_SENT, "No")]);
        let merged = merge_employee_data(&[no.clone(), yes.clone()]);
        assert_eq!(merged.get(fields::MERCH_SENT), YES);
        let merged = merge_employee_data(&[yes, no]);
        assert_eq!(merged.get(fields::MERCH_SENT), YES);
    }

    #[test]
    fn merch_sent_date_requires_the_flag() {
        let merged = merge_employee_data(&[
            record(&[(fields::MERCH_SENT, "No")]),
            record(&[(fields::MERCH_SENT_DATE, "2025-05-05")]),
        ]);
        assert_eq!(merged.get(fields::MERCH_SENT_DATE), "");
    }

    #[test]
    fn merch_sent_date_advances_only_forward() {
        let merged = merge_employee_data(&[
            record(&[
                (fields::MERCH_SENT, YES),
                (fields::MERCH_SENT_DATE, "2025-05-05"),
            ]),
            record(&[(fields::MERCH_SENT_DATE, "2024-01-01")]),
            record(&[(fields::MERCH_SENT_DATE, "2025-06-06")]),
        ]);
        assert_eq!(merged.get(fields::MERCH_SENT_DATE), "2025-06-06");
    }

    #[test]
    fn merch_sent_date_fills_from_the_floor_once_flagged() {
        let merged = merge_employee_data(&[
            record(&[(fields::MERCH_SENT, YES)]),
            record(&[(fields::MERCH_SENT_DATE, "2025-05-05")]),
        ]);
        assert_eq!(merged.get(fields::MERCH_SENT_DATE), "2025-05-05");
    }

    #[test]
    fn flag_and_date_in_one_contributor_land_together() {
        let merged = merge_employee_data(&[
            record(&[(fields::FIRST_NAME, "Jo")]),
            record(&[
                (fields::MERCH_SENT, YES),
                (fields::MERCH_SENT_DATE, "2025-05-05"),
            ]),
        ]);
        assert_eq!(merged.get(fields::MERCH_SENT), YES);
        assert_eq!(merged.get(fields::MERCH_SENT_DATE), "2025-05-05");
    }

    #[test]
    fn longer_text_wins_for_default_fields() {
        let merged = merge_employee_data(&[
            record(&[(fields::DEPARTMENT, "Sales")]),
            record(&[(fields::DEPARTMENT, "Sales & Marketing")]),
        ]);
        assert_eq!(merged.get(fields::DEPARTMENT), "Sales & Marketing");
    }

    #[test]
    fn equal_length_text_keeps_the_first_seen() {
        let merged = merge_employee_data(&[
            record(&[(fields::DEPARTMENT, "Sales")]),
            record(&[(fields::DEPARTMENT, "Sails")]),
        ]);
        assert_eq!(merged.get(fields::DEPARTMENT), "Sales");
    }
}
