//! Tracking code generation

use rand::Rng;

const TRACKING_CODE_LEN: usize = 12;
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a fresh order tracking reference
pub fn generate_tracking_code() -> String {
    let mut rng = rand::thread_rng();
    (0..TRACKING_CODE_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_and_charset() {
        let code = generate_tracking_code();
        assert_eq!(code.len(), 12);
        assert!(code.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_codes_vary() {
        assert_ne!(generate_tracking_code(), generate_tracking_code());
    }
}
