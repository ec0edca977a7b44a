//! AES-GCM authenticated encryption with an IV-prepended envelope
//! `IV(12) || ciphertext || tag(16)`.
//!
//! The supplied key length is authoritative: 16/24/32 bytes select
//! AES-128/192/256-GCM respectively. No AAD is used.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::aes::Aes192;
use aes_gcm::{AesGcm, Nonce};

use crate::config::{AES_NONCE_SIZE, AES_TAG_SIZE};
use crate::error::CryptoError;

type Aes128Gcm = aes_gcm::Aes128Gcm;
type Aes192Gcm = AesGcm<Aes192, aes_gcm::aead::consts::U12>;
type Aes256Gcm = aes_gcm::Aes256Gcm;

/// An AES-GCM cipher instance bound to a specific key size.
pub enum Cipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl Cipher {
    /// Builds a cipher from a raw key. Key length selects the AES variant;
    /// any other length is rejected.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        match key.len() {
            16 => Ok(Self::Aes128(
                Aes128Gcm::new_from_slice(key).map_err(|_| CryptoError::UnsupportedKeyLength(key.len()))?,
            )),
            24 => Ok(Self::Aes192(
                Aes192Gcm::new_from_slice(key).map_err(|_| CryptoError::UnsupportedKeyLength(key.len()))?,
            )),
            32 => Ok(Self::Aes256(
                Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::UnsupportedKeyLength(key.len()))?,
            )),
            other => Err(CryptoError::UnsupportedKeyLength(other)),
        }
    }

    /// Encrypts a UTF-8 plaintext, returning `IV || ciphertext || tag`.
    pub fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>, CryptoError> {
        match self {
            Self::Aes128(c) => encrypt_with(c, plaintext.as_bytes()),
            Self::Aes192(c) => encrypt_with(c, plaintext.as_bytes()),
            Self::Aes256(c) => encrypt_with(c, plaintext.as_bytes()),
        }
    }

    /// Decrypts an `IV || ciphertext || tag` envelope back to a UTF-8 string.
    pub fn decrypt(&self, envelope: &[u8]) -> Result<String, CryptoError> {
        match self {
            Self::Aes128(c) => decrypt_with(c, envelope),
            Self::Aes192(c) => decrypt_with(c, envelope),
            Self::Aes256(c) => decrypt_with(c, envelope),
        }
    }
}

fn encrypt_with<C>(cipher: &C, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError>
where
    C: Aead + AeadCore<NonceSize = aes_gcm::aead::consts::U12>,
{
    let nonce = C::generate_nonce(&mut OsRng);
    let mut out = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| CryptoError::AuthenticationFailed)?;
    out.splice(0..0, nonce.iter().copied());
    Ok(out)
}

fn decrypt_with<C>(cipher: &C, envelope: &[u8]) -> Result<String, CryptoError>
where
    C: Aead + AeadCore<NonceSize = aes_gcm::aead::consts::U12>,
{
    if envelope.len() < AES_NONCE_SIZE + 1 {
        return Err(CryptoError::EnvelopeTooShort {
            need: AES_NONCE_SIZE + 1,
            got: envelope.len(),
        });
    }
    let (iv, rest) = envelope.split_at(AES_NONCE_SIZE);
    let plaintext = cipher
        .decrypt(Nonce::from_slice(iv), rest)
        .map_err(|_| CryptoError::AuthenticationFailed)?;
    String::from_utf8(plaintext).map_err(|_| CryptoError::InvalidUtf8)
}
