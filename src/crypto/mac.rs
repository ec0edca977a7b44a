//! HMAC-SHA256 message authentication.

use hmac::{Hmac, Mac as _};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::MAC_SIZE;
use crate::error::CryptoError;

type HmacSha256 = Hmac<Sha256>;

/// Computes the HMAC-SHA256 tag of `data` under `key`.
pub fn compute(key: &[u8], data: &[u8]) -> Result<[u8; MAC_SIZE], CryptoError> {
    if key.is_empty() {
        return Err(CryptoError::EmptyMacKey);
    }
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    Ok(mac.finalize().into_bytes().into())
}

/// Verifies `expected` against the HMAC-SHA256 tag of `data` under `key`
/// in constant time. Returns `false` rather than erroring on a length
/// mismatch or malformed tag — it is not the caller's job to distinguish
/// "tampered" from "truncated".
#[must_use]
pub fn verify(key: &[u8], data: &[u8], expected: &[u8]) -> bool {
    let Ok(actual) = compute(key, data) else {
        return false;
    };
    actual.ct_eq(expected).into()
}
