//! PBKDF2-HMAC-SHA256 password hashing shared by the account adapters.
//!
//! Stored form: `pbkdf2-sha256$<iterations>$<salt hex>$<hash hex>`. The
//! iteration count travels with the hash, so raising it only affects new
//! passwords.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tokio::task::JoinError;
use zeroize::Zeroizing;

use crate::domain::Password;

/// Iteration count for newly hashed passwords.
pub const DEFAULT_PASSWORD_ITERATIONS: u32 = 600_000;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LENGTH: usize = 16;
const HASH_LENGTH: usize = 32;

/// Hashes and verifies account passwords.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_PASSWORD_ITERATIONS)
    }
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> Zeroizing<[u8; HASH_LENGTH]> {
    let mut out = Zeroizing::new([0_u8; HASH_LENGTH]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out[..]);
    out
}

impl PasswordHasher {
    /// Create a hasher; an iteration count of zero is raised to one.
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Hash `password` under a fresh random salt.
    pub fn hash(&self, password: &Password) -> String {
        let mut salt = [0_u8; SALT_LENGTH];
        rand::thread_rng().fill_bytes(&mut salt);
        let hash = derive(password.expose(), &salt, self.iterations);
        format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            hex::encode(salt),
            hex::encode(&hash[..])
        )
    }

    /// Check `password` against a stored hash in constant time.
    ///
    /// Malformed stored values never verify.
    pub fn verify(&self, password: &Password, stored: &str) -> bool {
        let mut parts = stored.split('$');
        let (Some(SCHEME), Some(iterations), Some(salt), Some(expected), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return false;
        };
        let (Ok(iterations), Ok(salt), Ok(expected)) = (
            iterations.parse::<u32>(),
            hex::decode(salt),
            hex::decode(expected),
        ) else {
            return false;
        };
        if iterations == 0 || expected.len() != HASH_LENGTH {
            return false;
        }
        let actual = derive(password.expose(), &salt, iterations);
        actual[..].ct_eq(expected.as_slice()).into()
    }

    /// [`PasswordHasher::hash`] on the blocking pool.
    pub async fn hash_blocking(self, password: Password) -> Result<String, JoinError> {
        tokio::task::spawn_blocking(move || self.hash(&password)).await
    }

    /// [`PasswordHasher::verify`] on the blocking pool.
    pub async fn verify_blocking(self, password: Password, stored: String) -> Result<bool, JoinError> {
        tokio::task::spawn_blocking(move || self.verify(&password, &stored)).await
    }
}
