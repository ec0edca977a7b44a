//! Ambient secret lookup: environment variables with an optional `.env`
//! overlay, read-only after initialization.

/// Looks up named secrets. Missing keys return `None`; callers decide how
/// to interpret absence.
pub trait SecretProvider {
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads from the process environment. Calls `dotenvy::dotenv()` once at
/// construction, which only fills in variables absent from the real
/// environment — anything already set before process start takes
/// precedence.
pub struct EnvSecretProvider;

impl EnvSecretProvider {
    #[must_use]
    pub fn new() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "failed to load .env overlay");
            }
        }
        Self
    }
}

impl Default for EnvSecretProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretProvider for EnvSecretProvider {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}
