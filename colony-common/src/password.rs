//! Password hashing
//!
//! PBKDF2-HMAC-SHA256 over [`PBKDF2_ROUNDS`] iterations. Salts are 16
//! random bytes; both salt and derived key are stored hex encoded.

use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub const PBKDF2_ROUNDS: u32 = 100_000;

const KEY_LEN: usize = 32;

/// Generate a fresh hex salt
pub fn generate_salt() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Derive the stored hash for `password` with `salt`
pub fn hash_password(password: &str, salt: &str) -> String {
    hex::encode(derive_key(password, salt))
}

/// Check a candidate password against a stored hex hash
///
/// A stored hash that is not valid hex never matches.
pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    let Ok(expected) = hex::decode(expected_hash) else {
        return false;
    };
    bool::from(derive_key(password, salt).as_slice().ct_eq(&expected))
}

fn derive_key(password: &str, salt: &str) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, &mut key);
    key
}
