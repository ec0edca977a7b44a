//! Engine-wide constants.
//!
//! Single source of truth for cryptographic sizes and environment/secret
//! naming conventions used across `crypto`, `provider`, `loader`, and
//! `orchestrator`.

/// The application name used in log output.
pub const APP_NAME: &str = "plugin-exec-engine";

/// Size of the AES-GCM nonce (IV) in bytes.
pub const AES_NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes.
pub const AES_TAG_SIZE: usize = 16;

/// Size of the derived shared secret key in bytes (SHA-256 output).
pub const DERIVED_KEY_SIZE: usize = 32;

/// Size of an HMAC-SHA256 tag in bytes.
pub const MAC_SIZE: usize = 32;

/// Default plugin timeout in milliseconds when neither `settings.timeoutMs`
/// nor `PLUGIN_TIMEOUT_MS` resolve to a usable value.
pub const DEFAULT_TIMEOUT_MS: i64 = 5000;

/// Environment variable carrying the passphrase fed to the key derivation
/// function.
pub const SECRET_KEY_ENV: &str = "SECRET_KEY";

/// Prefix for per-plugin signature environment variables. The full name is
/// `PLUGIN_SIG_<UPPER(pluginName with '-' -> '_')>`.
pub const PLUGIN_SIG_PREFIX: &str = "PLUGIN_SIG_";

/// Environment variable carrying the fallback timeout override.
pub const PLUGIN_TIMEOUT_MS_ENV: &str = "PLUGIN_TIMEOUT_MS";

/// Environment variable optionally confining `resolve()` to a root directory.
pub const PLUGIN_ROOT_ENV: &str = "PLUGIN_ROOT";
