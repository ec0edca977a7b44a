//! Plugin isolation and invocation: the component that turns a resolved
//! artifact path and an entry-symbol name into a [`crate::model::PluginResult`]
//! under a hard wall-clock budget.

mod dynamic;
pub mod fake;

pub use dynamic::DynamicLibraryBackend;
pub use fake::FakeBackend;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::model::PluginResult;

/// Outcome of one backend invocation, before it has been folded into a
/// [`PluginResult`]. Keeping this separate from `PluginResult` is what
/// lets `PluginLoader` stay the same regardless of which backend
/// (dynamic library, or a fake for tests) produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendOutcome {
    Ok(Vec<u8>),
    /// The plugin returned an absent/null value.
    NullReturn,
    /// The plugin returned a value that isn't a byte sequence. The
    /// production `DynamicLibraryBackend` can never produce this
    /// variant — its ABI only ever carries byte buffers — but the
    /// classification exists because `meta.pluginMainClass`-style
    /// loaders in other host languages can encounter it.
    NonByteReturn,
    /// Symbol lookup failed, arity mismatch, or the plugin raised.
    Exception(String),
}

/// The loading mechanism, decoupled from the timeout/isolation state
/// machine around it so that state machine can be exercised without a
/// real compiled artifact.
pub trait PluginBackend: Send + Sync + 'static {
    fn invoke(
        &self,
        path: &std::path::Path,
        entry_symbol: &str,
        meta: &[u8],
        input: &[u8],
        settings: &[u8],
    ) -> BackendOutcome;
}

fn classify(outcome: BackendOutcome) -> PluginResult {
    match outcome {
        BackendOutcome::Ok(bytes) => PluginResult::Ok(bytes),
        BackendOutcome::NullReturn => PluginResult::Error("plugin returned null".to_string()),
        BackendOutcome::NonByteReturn => {
            PluginResult::Error("plugin returned non-byte[] type".to_string())
        }
        BackendOutcome::Exception(message) => {
            PluginResult::Error(format!("plugin exception: {message}"))
        }
    }
}

/// Owns a backend and, per call to [`PluginLoader::invoke`], a dedicated
/// worker-pool runtime that is built fresh and torn down when the call
/// returns.
pub struct PluginLoader<B: PluginBackend> {
    backend: Arc<B>,
}

impl<B: PluginBackend> PluginLoader<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend: Arc::new(backend) }
    }

    /// Invokes the plugin at `path` under `entry_symbol`, waiting at most
    /// `timeout_ms` (non-positive means wait indefinitely).
    pub fn invoke(
        &self,
        path: PathBuf,
        entry_symbol: String,
        meta: Vec<u8>,
        input: Vec<u8>,
        settings: Vec<u8>,
        timeout_ms: i64,
    ) -> PluginResult {
        if entry_symbol.trim().is_empty() {
            return PluginResult::Error("missing pluginMainClass in metadata".to_string());
        }

        let runtime = match tokio::runtime::Builder::new_multi_thread().enable_time().build() {
            Ok(runtime) => runtime,
            Err(e) => return PluginResult::Error(format!("plugin exception: {e}")),
        };

        let backend = Arc::clone(&self.backend);
        runtime.block_on(async move {
            let task = tokio::task::spawn_blocking(move || {
                backend.invoke(&path, &entry_symbol, &meta, &input, &settings)
            });

            if timeout_ms > 0 {
                let abort_handle = task.abort_handle();
                match tokio::time::timeout(Duration::from_millis(timeout_ms as u64), task).await {
                    Ok(Ok(outcome)) => classify(outcome),
                    Ok(Err(join_err)) => PluginResult::Error(format!("plugin exception: {join_err}")),
                    Err(_) => {
                        abort_handle.abort();
                        PluginResult::Timeout
                    }
                }
            } else {
                match task.await {
                    Ok(outcome) => classify(outcome),
                    Err(join_err) => PluginResult::Error(format!("plugin exception: {join_err}")),
                }
            }
        })
        // `runtime` drops here, tearing down every thread it spawned.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::fake::FakeBehavior;

    fn loader(behavior: FakeBehavior) -> PluginLoader<FakeBackend> {
        PluginLoader::new(FakeBackend::new(behavior))
    }

    fn invoke(loader: &PluginLoader<FakeBackend>, timeout_ms: i64) -> PluginResult {
        loader.invoke(
            PathBuf::from("./plugin.art"),
            "Plugin".to_string(),
            b"{}".to_vec(),
            b"{}".to_vec(),
            b"{}".to_vec(),
            timeout_ms,
        )
    }

    #[test]
    fn empty_entry_symbol_is_classified_before_backend_runs() {
        let loader = loader(FakeBehavior::Ok(b"unused".to_vec()));
        let result = loader.invoke(
            PathBuf::from("./plugin.art"),
            String::new(),
            b"{}".to_vec(),
            b"{}".to_vec(),
            b"{}".to_vec(),
            1000,
        );
        assert_eq!(result, PluginResult::Error("missing pluginMainClass in metadata".to_string()));
    }

    #[test]
    fn success_returns_ok_bytes() {
        let loader = loader(FakeBehavior::Ok(b"result".to_vec()));
        assert_eq!(invoke(&loader, 1000), PluginResult::Ok(b"result".to_vec()));
    }

    #[test]
    fn null_return_is_classified() {
        let loader = loader(FakeBehavior::NullReturn);
        assert_eq!(invoke(&loader, 1000), PluginResult::Error("plugin returned null".to_string()));
    }

    #[test]
    fn non_byte_return_is_classified() {
        let loader = loader(FakeBehavior::NonByteReturn);
        assert_eq!(
            invoke(&loader, 1000),
            PluginResult::Error("plugin returned non-byte[] type".to_string())
        );
    }

    #[test]
    fn exception_is_classified_with_message() {
        let loader = loader(FakeBehavior::Exception("boom".to_string()));
        assert_eq!(
            invoke(&loader, 1000),
            PluginResult::Error("plugin exception: boom".to_string())
        );
    }

    #[test]
    fn slow_plugin_times_out() {
        let loader = loader(FakeBehavior::SleepThenOk(Duration::from_millis(200)));
        assert_eq!(invoke(&loader, 20), PluginResult::Timeout);
    }

    #[test]
    fn non_positive_timeout_waits_indefinitely() {
        let loader = loader(FakeBehavior::SleepThenOk(Duration::from_millis(20)));
        assert_eq!(invoke(&loader, 0), PluginResult::Ok(b"slept".to_vec()));
    }
}
