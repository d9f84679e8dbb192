//! Tracking ID generation
//!
//! Tracking IDs are the citizen-facing handle for a complaint: 8 uppercase
//! alphanumeric characters, short enough to read over a phone call. The
//! submission handler retries on the (rare) collision, so uniqueness is
//! enforced by the store's primary key, not by the generator.

use rand::Rng;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of every tracking ID
pub const TRACKING_ID_LEN: usize = 8;

/// Generate a candidate tracking ID
pub fn generate_tracking_id() -> String {
    let mut rng = rand::thread_rng();
    (0..TRACKING_ID_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Whether a string has the shape of a tracking ID
pub fn is_tracking_id(candidate: &str) -> bool {
    candidate.len() == TRACKING_ID_LEN
        && candidate
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_have_expected_shape() {
        for _ in 0..100 {
            let id = generate_tracking_id();
            assert!(is_tracking_id(&id), "bad id: {}", id);
        }
    }

    #[test]
    fn test_ids_vary() {
        let first = generate_tracking_id();
        // 36^8 possibilities; 20 draws colliding with the first would mean a
        // broken generator
        let repeats = (0..20).filter(|_| generate_tracking_id() == first).count();
        assert_eq!(repeats, 0);
    }

    #[test]
    fn test_is_tracking_id_rejects_bad_shapes() {
        assert!(!is_tracking_id("abcd1234")); // lowercase
        assert!(!is_tracking_id("ABCD123")); // short
        assert!(!is_tracking_id("ABCD12345")); // long
        assert!(!is_tracking_id("ABCD 123")); // whitespace
        assert!(is_tracking_id("ABCD1234"));
    }
}
