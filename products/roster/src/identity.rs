use entity::EmployeeRecord;

/// Decide whether two records denote the same person.
///
/// Priority chain, short-circuiting at the first identifier both sides
/// carry: `employeeId`, then email, then the full-name concatenation. When
/// a tier applies, its verdict is final: a shared id outvotes differing
/// emails, and vice versa. Records with no shared identifier never match.
///
/// Two id-less, email-less records that both consist of a lone first name
/// collide on the single-token name key; that ambiguity is accepted.
pub fn is_same_employee(a: &EmployeeRecord, b: &EmployeeRecord) -> bool {
    let (id_a, id_b) = (a.employee_id(), b.employee_id());
    if !id_a.is_empty() && !id_b.is_empty() {
        return id_a == id_b;
    }

    let (email_a, email_b) = (a.email_key(), b.email_key());
    if !email_a.is_empty() && !email_b.is_empty() {
        return email_a == email_b;
    }

    let (name_a, name_b) = (a.full_name_key(), b.full_name_key());
    if !name_a.is_empty() && !name_b.is_empty() {
        return name_a == name_b;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::employee::fields;

    fn record(pairs: &[(&str, &str)]) -> EmployeeRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn id_tier_is_final() {
        let a = record(&[
            (fields::EMPLOYEE_ID, "JS1001"),
            (fields::EMAIL, "jo@x.com"),
        ]);
        let b = record(&[
            (fields::EMPLOYEE_ID, "JS1002"),
            (fields::EMAIL, "jo@x.com"),
        ]);
        assert!(!is_same_employee(&a, &b));

        let c = record(&[
            (fields::EMPLOYEE_ID, "JS1001"),
            (fields::EMAIL, "other@x.com"),
        ]);
        assert!(is_same_employee(&a, &c));
    }

    #[test]
    fn email_tier_when_an_id_is_missing() {
        let a = record(&[
            (fields::EMPLOYEE_ID, "JS1001"),
            (fields::EMAIL, "Jo@X.com "),
        ]);
        let b = record(&[(fields::EMAIL, "jo@x.com")]);
        assert!(is_same_employee(&a, &b));
    }

    #[test]
    fn name_tier_when_emails_are_missing() {
        let a = record(&[(fields::FIRST_NAME, "Jo"), (fields::LAST_NAME, "Smith")]);
        let b = record(&[(fields::FIRST_NAME, "jo"), (fields::LAST_NAME, "SMITH")]);
        assert!(is_same_employee(&a, &b));
    }

    #[test]
    fn insufficient_data_never_matches() {
        let a = EmployeeRecord::new();
        let b = EmployeeRecord::new();
        assert!(!is_same_employee(&a, &b));

        let named = record(&[(fields::FIRST_NAME, "Jo")]);
        assert!(!is_same_employee(&a, &named));
    }

    #[test]
    fn lone_first_names_collide_on_the_name_tier() {
        let a = record(&[(fields::FIRST_NAME, "Jo")]);
        let b = record(&[(fields::FIRST_NAME, "Jo")]);
        assert!(is_same_employee(&a, &b));
    }
}
