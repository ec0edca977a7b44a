//! Cryptographic primitives.
//!
//! Three independent, pure components: an authenticated symmetric cipher,
//! a message authentication code, and a key derivation function. None of
//! them log — key material and plaintext must never reach the tracing
//! subscriber.

pub mod cipher;
pub mod kdf;
pub mod mac;
