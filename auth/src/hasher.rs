use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Digest;
use sha2::Sha256;

/// Deterministic credential hasher.
///
/// Produces the storage/comparison form of a client-supplied pre-hashed
/// secret. Clients hash passwords before transmission, so this second pass is
/// intentionally unsalted: the same input must map to the same digest across
/// requests and process restarts.
pub struct Hasher;

impl Hasher {
    /// Hash a secret into a fixed-length hex digest.
    ///
    /// # Arguments
    /// * `secret` - Pre-hashed secret as received from the client
    ///
    /// # Returns
    /// SHA-256 digest of the UTF-8 bytes, lowercase hex, 64 characters
    pub fn digest(secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Generate an opaque random token.
///
/// Sourced from the operating system CSPRNG. Used for single-use credentials
/// such as forgot-password tokens.
///
/// # Arguments
/// * `byte_length` - Number of random bytes to draw
///
/// # Returns
/// Hex string of `2 * byte_length` characters
pub fn random_token(byte_length: usize) -> String {
    let mut bytes = vec![0u8; byte_length];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(Hasher::digest("secret"), Hasher::digest("secret"));
    }

    #[test]
    fn test_digest_is_fixed_length_hex() {
        let digest = Hasher::digest("anything at all");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_digest_known_vector() {
        // sha256("abc")
        assert_eq!(
            Hasher::digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_different_inputs_differ() {
        assert_ne!(Hasher::digest("a"), Hasher::digest("b"));
    }

    #[test]
    fn test_random_token_length_and_uniqueness() {
        let first = random_token(16);
        let second = random_token(16);
        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }
}
