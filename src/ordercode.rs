use rand::Rng;

const CODE_LEN: usize = 8;
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a public order code: `ORD-` plus 8 uppercase alphanumerics.
/// The code doubles as the bearer capability for the public status page, so
/// it draws from the full 36-character alphabet (~2^41 possibilities).
/// Uniqueness is backstopped by the UNIQUE constraint on `orders.order_code`.
pub fn generate() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..CODE_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    format!("ORD-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_the_expected_format() {
        for _ in 0..100 {
            let code = generate();
            assert_eq!(code.len(), 4 + CODE_LEN);
            assert!(code.starts_with("ORD-"));
            assert!(
                code[4..]
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
                "unexpected character in {code}"
            );
        }
    }

    #[test]
    fn consecutive_codes_differ() {
        let codes: std::collections::HashSet<String> = (0..50).map(|_| generate()).collect();
        assert!(codes.len() > 1);
    }
}
