use sha2::{Digest, Sha256};

/// Digest a plaintext password for storage and comparison.
///
/// Passwords are never persisted in the clear; the same digest is computed
/// on create, update and login.
pub fn digest(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    let hash = hasher.finalize();
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_and_hex() {
        let d = digest("wanderer2024");
        assert_eq!(d.len(), 64);
        assert_eq!(d, digest("wanderer2024"));
        assert!(d.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_inputs_differ() {
        assert_ne!(digest("a"), digest("b"));
    }
}
