//! Internal error taxonomy.
//!
//! `EngineError` exists so stage code inside `orchestrator` stays
//! `Result`-based and composable; `Orchestrator::process` is the single
//! place that collapses it to the plain `String` callers see. No variant
//! here is ever surfaced directly to a caller — see
//! `EngineError::into_pipeline_string`.

use thiserror::Error;

/// Errors produced by the crypto, codec, provider, and loader layers.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("artifact unavailable")]
    ArtifactUnavailable,

    #[error("verification failed")]
    VerificationFailed,

    #[error("plugin timed out")]
    Timeout,

    /// A deterministic plugin-loader failure; `reason` is one of the
    /// loader's fixed classification strings.
    #[error("plugin execution failed: {0}")]
    PluginFailure(String),
}

impl EngineError {
    /// Collapses this error to the exact pipeline failure string a caller
    /// sees. This is the only formatting path for these variants.
    #[must_use]
    pub fn into_pipeline_string(self) -> String {
        match self {
            Self::ArtifactUnavailable => {
                "plugin doesn't exist or no permissions to access file".to_string()
            }
            Self::VerificationFailed => "plugin verification failed".to_string(),
            Self::Timeout => "plugin timed out".to_string(),
            Self::PluginFailure(reason) => format!("plugin execution failed: {reason}"),
        }
    }
}

/// Errors raised while verifying or decoding a cryptographic signature.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("aes-gcm envelope too short: need at least {need} bytes, got {got}")]
    EnvelopeTooShort { need: usize, got: usize },

    #[error("aes-gcm authentication failed")]
    AuthenticationFailed,

    #[error("decrypted plaintext is not valid utf-8")]
    InvalidUtf8,

    #[error("unsupported key length {0}: expected 16, 24, or 32 bytes")]
    UnsupportedKeyLength(usize),

    #[error("mac key cannot be empty")]
    EmptyMacKey,
}

/// Errors raised while resolving or reading an artifact.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("path does not exist: {0}")]
    NotFound(String),

    #[error("path escapes configured plugin root: {0}")]
    PathEscapesRoot(String),

    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
