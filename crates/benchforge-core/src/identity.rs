//! Identity & anonymization: cookie-token issuance and deterministic
//! display-name hashing (spec.md §4.G). Reuses the `sha1` dependency already
//! pulled in for content-addressed hashing elsewhere in the corpus — an
//! appropriate reuse since this hash is a display-only anonymizer, not a
//! security boundary.

use rand::RngCore;
use sha1::{Digest, Sha1};

const SALT: &str = "__saltyAZErap";

/// Generate a fresh random 32-bit hex user id, issued on first contact.
pub fn generate_user_id() -> String {
    let mut bytes = [0u8; 4];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn hash_bytes(user_id: &str, task: &str) -> [u8; 20] {
    let input = format!("{user_id}__{task}{SALT}");
    let mut hasher = Sha1::new();
    hasher.update(input.as_bytes());
    hasher.finalize().into()
}

/// An 8-hex-digit display name, a pure function of `(user_id, task)`.
pub fn display_name(user_id: &str, task: &str) -> String {
    let digest = hash_bytes(user_id, task);
    hex::encode(&digest[..4])
}

/// A muted RGB background color derived from the same hash, masking each of
/// the low three bytes with `0x7F` to keep the palette dim.
pub fn row_color(user_id: &str, task: &str) -> (u8, u8, u8) {
    let digest = hash_bytes(user_id, task);
    let n = digest.len();
    (
        digest[n - 3] & 0x7F,
        digest[n - 2] & 0x7F,
        digest[n - 1] & 0x7F,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_eight_hex_digits() {
        let name = display_name("deadbeef", "atan");
        assert_eq!(name.len(), 8);
        assert!(name.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn display_name_is_pure_function_of_user_and_task() {
        assert_eq!(display_name("u1", "atan"), display_name("u1", "atan"));
        assert_ne!(display_name("u1", "atan"), display_name("u2", "atan"));
        assert_ne!(display_name("u1", "atan"), display_name("u1", "haversine"));
    }

    #[test]
    fn row_color_bytes_are_masked_to_muted_range() {
        let (r, g, b) = row_color("deadbeef", "atan");
        assert!(r <= 0x7F && g <= 0x7F && b <= 0x7F);
    }

    #[test]
    fn generated_user_ids_are_eight_hex_digits() {
        let id = generate_user_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
