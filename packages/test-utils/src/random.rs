//! Random values for fixtures

use rand::Rng;

const ALPHABETIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const NUMERIC: &[u8] = b"0123456789";

fn random_from(charset: &[u8], len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}

/// `len` random ASCII letters
pub fn random_alphabetic(len: usize) -> String {
    random_from(ALPHABETIC, len)
}

/// `len` random digits, never starting with `0`
pub fn random_numeric(len: usize) -> String {
    if len == 0 {
        return String::new();
    }
    let mut digits = random_from(&NUMERIC[1..], 1);
    digits.push_str(&random_from(NUMERIC, len - 1));
    digits
}

/// A positive id far above anything a fresh server hands out
pub fn random_positive_id() -> i64 {
    rand::thread_rng().gen_range(1_000_000_000..i64::MAX)
}

pub fn random_negative_id() -> i64 {
    rand::thread_rng().gen_range(i64::MIN..0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_alphabetic() {
        let value = random_alphabetic(12);
        assert_eq!(value.len(), 12);
        assert!(value.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn test_random_numeric_has_no_leading_zero() {
        for _ in 0..50 {
            let value = random_numeric(6);
            assert_eq!(value.len(), 6);
            assert!(value.chars().all(|c| c.is_ascii_digit()));
            assert!(!value.starts_with('0'));
        }
        assert_eq!(random_numeric(0), "");
    }

    #[test]
    fn test_random_ids_have_expected_sign() {
        assert!(random_positive_id() > 0);
        assert!(random_negative_id() < 0);
    }
}
