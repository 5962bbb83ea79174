use rand::Rng;

/// Referral-code alphabet without lookalike characters (no 0/O, 1/l/I).
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";
const CODE_LEN: usize = 6;

/// Six characters a person can read back over the phone.
pub fn generate_referral_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Prefixed record id: `ADV`/`LEAD`/`PAY` plus epoch millis plus a short
/// random component, so same-millisecond creations stay distinct.
pub fn generate_id(prefix: &str, now_ms: i64) -> String {
    let salt: u16 = rand::thread_rng().gen_range(0..1000);
    format!("{prefix}{now_ms}{salt:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_use_the_restricted_alphabet() {
        for _ in 0..50 {
            let code = generate_referral_code();
            assert_eq!(code.len(), CODE_LEN);
            assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn ids_carry_prefix_and_timestamp() {
        let id = generate_id("ADV", 1_700_000_000_000);
        assert!(id.starts_with("ADV1700000000000"));
        assert_eq!(id.len(), "ADV1700000000000".len() + 3);
    }
}
