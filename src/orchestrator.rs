//! The pipeline stitching every other module together: resolve, verify,
//! maybe decrypt, invoke, maybe encrypt, encode.

use std::path::PathBuf;

use crate::codec;
use crate::config::{DEFAULT_TIMEOUT_MS, PLUGIN_ROOT_ENV, PLUGIN_SIG_PREFIX, PLUGIN_TIMEOUT_MS_ENV, SECRET_KEY_ENV};
use crate::crypto::{cipher::Cipher, kdf, mac};
use crate::error::EngineError;
use crate::loader::{DynamicLibraryBackend, PluginBackend, PluginLoader};
use crate::model::{self, Input, Meta, PluginResult, Settings};
use crate::provider::{ArtifactProvider, EnvSecretProvider, LocalArtifactProvider, SecretProvider};
use crate::secret::SecretBytes;

/// The production configuration: local filesystem artifacts, environment
/// secrets, native shared-library plugins.
pub type DefaultOrchestrator = Orchestrator<LocalArtifactProvider, EnvSecretProvider, DynamicLibraryBackend>;

/// Owns the secret key, the artifact and secret providers, and a fresh
/// [`PluginLoader`] for exactly one [`Orchestrator::process`] call.
pub struct Orchestrator<A: ArtifactProvider, S: SecretProvider, B: PluginBackend> {
    artifact_provider: A,
    secret_provider: S,
    loader: PluginLoader<B>,
    secret_key: SecretBytes,
}

impl DefaultOrchestrator {
    /// Builds an Orchestrator from the ambient environment: `SECRET_KEY`
    /// (required), `PLUGIN_ROOT` (optional, confines artifact resolution).
    pub fn from_env() -> Result<Self, EngineError> {
        let secret_provider = EnvSecretProvider::new();
        let passphrase = secret_provider.get(SECRET_KEY_ENV).ok_or(EngineError::VerificationFailed)?;
        let secret_key = kdf::derive(&passphrase);

        let artifact_provider = match secret_provider.get(PLUGIN_ROOT_ENV) {
            Some(root) => LocalArtifactProvider::with_root(PathBuf::from(root)),
            None => LocalArtifactProvider::new(),
        };

        Ok(Self {
            artifact_provider,
            secret_provider,
            loader: PluginLoader::new(DynamicLibraryBackend::default()),
            secret_key: SecretBytes::from_slice(&secret_key),
        })
    }
}

impl<A: ArtifactProvider, S: SecretProvider, B: PluginBackend> Orchestrator<A, S, B> {
    /// Builds an Orchestrator from already-constructed collaborators.
    /// Used directly by tests that need a `FakeBackend`.
    pub fn new(artifact_provider: A, secret_provider: S, backend: B, secret_key: [u8; 32]) -> Self {
        Self {
            artifact_provider,
            secret_provider,
            loader: PluginLoader::new(backend),
            secret_key: SecretBytes::from_slice(&secret_key),
        }
    }

    /// Runs the full pipeline once and returns the encoded result or a
    /// fixed failure string. Never panics.
    #[must_use]
    pub fn process(&self, meta_json: &str, input_json: &str, settings_json: &str) -> String {
        let meta: Meta = match serde_json::from_str(meta_json) {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!(error = %e, "malformed meta section");
                return EngineError::ArtifactUnavailable.into_pipeline_string();
            }
        };
        let mut input: Input = serde_json::from_str(input_json).unwrap_or_default();
        let settings: Settings = serde_json::from_str(settings_json).unwrap_or_default();

        tracing::info!(plugin = %meta.plugin_name, "invocation started");

        let key_bytes = self.secret_key.expose_secret().clone();

        let path = match self.artifact_provider.resolve(&meta.file_location) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, "artifact resolution failed");
                return EngineError::ArtifactUnavailable.into_pipeline_string();
            }
        };
        let artifact_bytes = match self.artifact_provider.read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "artifact read failed");
                return EngineError::ArtifactUnavailable.into_pipeline_string();
            }
        };
        tracing::debug!(bytes = artifact_bytes.len(), "artifact resolved and read");

        if let Err(reason) = self.verify(&meta, &artifact_bytes, &key_bytes) {
            tracing::warn!(reason = %reason, "verification failed");
            return EngineError::VerificationFailed.into_pipeline_string();
        }

        if meta.encrypted_input {
            match self.decrypt_input(&mut input, &key_bytes) {
                Ok(()) => tracing::debug!("input decrypted"),
                Err(reason) => {
                    tracing::error!(reason = %reason, "input decryption failed");
                    return EngineError::PluginFailure(reason).into_pipeline_string();
                }
            }
        }

        let timeout_ms = self.resolve_timeout(&settings);
        tracing::debug!(timeout_ms, "timeout resolved");

        let meta_bytes = meta_json.as_bytes().to_vec();
        let input_bytes = serde_json::to_vec(&input).unwrap_or_default();
        let settings_bytes = serde_json::to_vec(&settings).unwrap_or_default();

        let result = self.loader.invoke(
            path,
            meta.plugin_main_class.clone(),
            meta_bytes,
            input_bytes,
            settings_bytes,
            timeout_ms,
        );

        let mut payload = match result {
            PluginResult::Timeout => {
                tracing::error!("plugin timed out");
                return EngineError::Timeout.into_pipeline_string();
            }
            PluginResult::Error(reason) => {
                tracing::error!(reason = %reason, "plugin failed");
                return EngineError::PluginFailure(reason).into_pipeline_string();
            }
            PluginResult::Ok(bytes) => bytes,
        };

        if meta.encrypt_output {
            match self.encrypt_output(&payload, &key_bytes) {
                Ok(envelope) => payload = envelope,
                Err(reason) => {
                    tracing::error!(reason = %reason, "output encryption failed");
                    return EngineError::PluginFailure(reason).into_pipeline_string();
                }
            }
        }

        tracing::info!(plugin = %meta.plugin_name, "invocation completed");
        if meta.url_safe_output {
            codec::encode_urlsafe(&payload)
        } else {
            codec::encode_standard(&payload)
        }
    }

    fn verify(&self, meta: &Meta, artifact_bytes: &[u8], key_bytes: &[u8]) -> Result<(), String> {
        let sig_name = format!(
            "{PLUGIN_SIG_PREFIX}{}",
            meta.plugin_name.to_uppercase().replace('-', "_")
        );
        let expected_b64 = self
            .secret_provider
            .get(&sig_name)
            .ok_or_else(|| format!("no signature configured for {sig_name}"))?;
        let expected = codec::decode_standard(&expected_b64).map_err(|e| e.to_string())?;
        if mac::verify(key_bytes, artifact_bytes, &expected) {
            Ok(())
        } else {
            Err("signature mismatch".to_string())
        }
    }

    fn decrypt_input(&self, input: &mut Input, key_bytes: &[u8]) -> Result<(), String> {
        let data = model::data_field(input).ok_or_else(|| "missing input.data".to_string())?.to_string();
        let envelope = codec::decode_standard(&data).map_err(|e| e.to_string())?;
        let cipher = Cipher::new(key_bytes).map_err(|e| e.to_string())?;
        let plaintext = cipher.decrypt(&envelope).map_err(|e| e.to_string())?;
        model::set_data_field(input, plaintext);
        Ok(())
    }

    fn encrypt_output(&self, payload: &[u8], key_bytes: &[u8]) -> Result<Vec<u8>, String> {
        let plaintext =
            String::from_utf8(payload.to_vec()).map_err(|_| "plugin output is not valid utf-8".to_string())?;
        let cipher = Cipher::new(key_bytes).map_err(|e| e.to_string())?;
        cipher.encrypt(&plaintext).map_err(|e| e.to_string())
    }

    fn resolve_timeout(&self, settings: &Settings) -> i64 {
        if let Some(ms) = model::timeout_ms_from_settings(settings) {
            return ms;
        }
        if let Some(ms) = self
            .secret_provider
            .get(PLUGIN_TIMEOUT_MS_ENV)
            .and_then(|v| v.trim().parse::<i64>().ok())
        {
            return ms;
        }
        DEFAULT_TIMEOUT_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::fake::FakeBehavior;
    use crate::loader::FakeBackend;
    use std::collections::HashMap;
    use std::io::Write;
    use std::path::Path;

    struct MapSecretProvider(HashMap<String, String>);
    impl SecretProvider for MapSecretProvider {
        fn get(&self, name: &str) -> Option<String> {
            self.0.get(name).cloned()
        }
    }

    struct SingleFileProvider(PathBuf);
    impl ArtifactProvider for SingleFileProvider {
        fn resolve(&self, _location: &str) -> Result<PathBuf, crate::error::ProviderError> {
            Ok(self.0.clone())
        }
        fn read(&self, path: &Path) -> Result<Vec<u8>, crate::error::ProviderError> {
            std::fs::read(path).map_err(|source| crate::error::ProviderError::Io {
                path: path.display().to_string(),
                source,
            })
        }
    }

    fn artifact_with_signature(key: &[u8]) -> (tempfile::NamedTempFile, String) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"artifact-bytes").unwrap();
        let tag = mac::compute(key, b"artifact-bytes").unwrap();
        (file, codec::encode_standard(&tag))
    }

    fn orchestrator(
        secrets: HashMap<String, String>,
        artifact: PathBuf,
        behavior: FakeBehavior,
        key: [u8; 32],
    ) -> Orchestrator<SingleFileProvider, MapSecretProvider, FakeBackend> {
        Orchestrator::new(
            SingleFileProvider(artifact),
            MapSecretProvider(secrets),
            FakeBackend::new(behavior),
            key,
        )
    }

    #[test]
    fn happy_path_returns_encoded_output() {
        let key = kdf::derive("hunter2");
        let (file, sig) = artifact_with_signature(&key);
        let mut secrets = HashMap::new();
        secrets.insert("PLUGIN_SIG_T".to_string(), sig);

        let orch = orchestrator(secrets, file.path().to_path_buf(), FakeBehavior::Ok(b"ok".to_vec()), key);
        let meta = r#"{"pluginName":"t","pluginMainClass":"T","fileLocation":"ignored"}"#;
        let result = orch.process(meta, "{}", "{}");
        assert_eq!(result, "b2s=");
    }

    #[test]
    fn missing_artifact_is_reported() {
        let key = kdf::derive("hunter2");
        let orch = orchestrator(
            HashMap::new(),
            PathBuf::from("/no/such/artifact"),
            FakeBehavior::Ok(b"ok".to_vec()),
            key,
        );
        let meta = r#"{"pluginName":"t","pluginMainClass":"T","fileLocation":"ignored"}"#;
        let result = orch.process(meta, "{}", "{}");
        assert_eq!(result, "plugin doesn't exist or no permissions to access file");
    }

    #[test]
    fn signature_mismatch_is_reported() {
        let key = kdf::derive("hunter2");
        let (file, _real_sig) = artifact_with_signature(&key);
        let wrong_tag = mac::compute(&key, b"other-bytes").unwrap();
        let mut secrets = HashMap::new();
        secrets.insert("PLUGIN_SIG_T".to_string(), codec::encode_standard(&wrong_tag));

        let orch = orchestrator(secrets, file.path().to_path_buf(), FakeBehavior::Ok(b"ok".to_vec()), key);
        let meta = r#"{"pluginName":"t","pluginMainClass":"T","fileLocation":"ignored"}"#;
        let result = orch.process(meta, "{}", "{}");
        assert_eq!(result, "plugin verification failed");
    }

    #[test]
    fn timeout_is_reported() {
        let key = kdf::derive("hunter2");
        let (file, sig) = artifact_with_signature(&key);
        let mut secrets = HashMap::new();
        secrets.insert("PLUGIN_SIG_T".to_string(), sig);

        let orch = orchestrator(
            secrets,
            file.path().to_path_buf(),
            FakeBehavior::SleepThenOk(std::time::Duration::from_millis(200)),
            key,
        );
        let meta = r#"{"pluginName":"t","pluginMainClass":"T","fileLocation":"ignored"}"#;
        let result = orch.process(meta, "{}", r#"{"timeoutMs":20}"#);
        assert_eq!(result, "plugin timed out");
    }

    #[test]
    fn plugin_error_is_wrapped() {
        let key = kdf::derive("hunter2");
        let (file, sig) = artifact_with_signature(&key);
        let mut secrets = HashMap::new();
        secrets.insert("PLUGIN_SIG_T".to_string(), sig);

        let orch = orchestrator(
            secrets,
            file.path().to_path_buf(),
            FakeBehavior::Exception("boom".to_string()),
            key,
        );
        let meta = r#"{"pluginName":"t","pluginMainClass":"T","fileLocation":"ignored"}"#;
        let result = orch.process(meta, "{}", "{}");
        assert_eq!(result, "plugin execution failed: plugin exception: boom");
    }

    #[test]
    fn encrypted_roundtrip() {
        let key = kdf::derive("hunter2");
        let (file, sig) = artifact_with_signature(&key);
        let mut secrets = HashMap::new();
        secrets.insert("PLUGIN_SIG_T".to_string(), sig);

        let cipher = Cipher::new(&key).unwrap();
        let envelope = cipher.encrypt("hello").unwrap();
        let encoded_input = codec::encode_standard(&envelope);

        // The fake backend is hardcoded to return this plaintext; it matches what
        // `envelope` decrypts to so the round-trip assertion below is meaningful.
        let orch = orchestrator(secrets, file.path().to_path_buf(), FakeBehavior::Ok(b"hello".to_vec()), key);
        let meta = r#"{"pluginName":"t","pluginMainClass":"T","fileLocation":"ignored","encryptedInput":true,"encryptOutput":true}"#;
        let input = format!(r#"{{"data":"{encoded_input}"}}"#);
        let result = orch.process(meta, &input, "{}");

        let output_envelope = codec::decode_standard(&result).unwrap();
        let recovered = cipher.decrypt(&output_envelope).unwrap();
        assert_eq!(recovered, "hello");
    }

    #[test]
    fn missing_input_data_with_encrypted_input_is_reported() {
        let key = kdf::derive("hunter2");
        let (file, sig) = artifact_with_signature(&key);
        let mut secrets = HashMap::new();
        secrets.insert("PLUGIN_SIG_T".to_string(), sig);

        let orch = orchestrator(secrets, file.path().to_path_buf(), FakeBehavior::Ok(b"ok".to_vec()), key);
        let meta = r#"{"pluginName":"t","pluginMainClass":"T","fileLocation":"ignored","encryptedInput":true}"#;
        let result = orch.process(meta, "{}", "{}");
        assert_eq!(result, "plugin execution failed: missing input.data");
    }
}
