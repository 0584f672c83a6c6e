//! Credential hashing and token generation

use anyhow::{bail, Context, Result};
use pbkdf2::pbkdf2_hmac;
use rand::Rng;
use sha2::Sha256;
use subtle::ConstantTimeEq;

const PBKDF2_ITERATIONS: u32 = 100_000;
const HASH_LENGTH: usize = 32;
const SALT_LENGTH: usize = 16;
const HASH_SCHEME: &str = "pbkdf2_sha256";

/// hash a password using pbkdf2-sha256 with a fresh random salt
///
/// The result is `pbkdf2_sha256$<iterations>$<salt hex>$<hash hex>`.
pub fn hash_password(password: &str) -> String {
    let salt: [u8; SALT_LENGTH] = rand::thread_rng().gen();
    encode_hash(password, &salt, PBKDF2_ITERATIONS)
}

/// verify a password against a stored hash using constant-time comparison
pub fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        bail!("Unrecognized password hash format");
    };

    if scheme != HASH_SCHEME {
        bail!("Unsupported password hash scheme: {}", scheme);
    }

    let iterations: u32 = iterations.parse().context("Invalid iteration count")?;
    let salt = hex::decode(salt).context("Invalid salt encoding")?;
    let expected = hex::decode(hash).context("Invalid hash encoding")?;
    if expected.len() != HASH_LENGTH {
        bail!("Invalid hash length: {}", expected.len());
    }

    let mut computed = vec![0u8; expected.len()];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut computed);

    Ok(computed.ct_eq(&expected).into())
}

fn encode_hash(password: &str, salt: &[u8], iterations: u32) -> String {
    let mut hash = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut hash);

    format!(
        "{}${}${}${}",
        HASH_SCHEME,
        iterations,
        hex::encode(salt),
        hex::encode(hash)
    )
}

/// generate a random string of the given length
pub fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_string() {
        let s1 = generate_random_string(32);
        let s2 = generate_random_string(32);

        assert_eq!(s1.len(), 32);
        assert_eq!(s2.len(), 32);
        assert_ne!(s1, s2); // Should be different (with very high probability)
        assert!(s1.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("pw123");

        assert!(hash.starts_with("pbkdf2_sha256$100000$"));
        assert!(verify_password("pw123", &hash).unwrap());
        assert!(!verify_password("pw124", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn test_known_vector() {
        // low iteration count keeps the test fast
        let encoded = encode_hash("secret", b"0123456789abcdef", 1_000);
        assert!(verify_password("secret", &encoded).unwrap());
        assert!(!verify_password("Secret", &encoded).unwrap());
    }

    #[test]
    fn test_rejects_garbage_hash() {
        assert!(verify_password("pw", "not-a-hash").is_err());
        assert!(verify_password("pw", "md5$1$00$00").is_err());
        assert!(verify_password("anything", "pbkdf2_sha256$1$00$").is_err());
        assert!(verify_password("anything", "pbkdf2_sha256$1$00$abcd").is_err());
    }
}
