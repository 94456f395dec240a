use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of a byte slice.
///
/// The digest doubles as the dedup key for uploads and, after transcoding,
/// as the `yoto:#` track reference suffix.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_deterministic_for_identical_content() {
        let data = vec![0u8; 4096];
        assert_eq!(sha256_hex(&data), sha256_hex(&data.clone()));
    }

    #[test]
    fn test_differs_for_different_content() {
        assert_ne!(sha256_hex(b"a"), sha256_hex(b"b"));
    }
}
