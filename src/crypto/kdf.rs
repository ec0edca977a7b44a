//! Key derivation: a single SHA-256 pass over the configured passphrase.
//!
//! Deliberately not a hardened KDF (no Argon2id, no iteration count, no
//! salt) — every implementation of this engine, in whatever language,
//! must derive the same bytes from the same passphrase.

use sha2::{Digest, Sha256};

use crate::config::DERIVED_KEY_SIZE;

/// Derives a 32-byte key from `passphrase`.
#[must_use]
pub fn derive(passphrase: &str) -> [u8; DERIVED_KEY_SIZE] {
    Sha256::digest(passphrase.as_bytes()).into()
}
