//! A scripted backend for exercising the loader's timeout and
//! classification logic without a compiled artifact.

use std::path::Path;
use std::time::Duration;

use super::{BackendOutcome, PluginBackend};

#[derive(Clone)]
pub enum FakeBehavior {
    Ok(Vec<u8>),
    NullReturn,
    NonByteReturn,
    Exception(String),
    /// Sleeps for `Duration`, then returns `ok(b"slept")`. Used to drive
    /// the timeout path.
    SleepThenOk(Duration),
}

pub struct FakeBackend {
    behavior: FakeBehavior,
}

impl FakeBackend {
    #[must_use]
    pub fn new(behavior: FakeBehavior) -> Self {
        Self { behavior }
    }
}

impl PluginBackend for FakeBackend {
    fn invoke(
        &self,
        _path: &Path,
        _entry_symbol: &str,
        _meta: &[u8],
        _input: &[u8],
        _settings: &[u8],
    ) -> BackendOutcome {
        match &self.behavior {
            FakeBehavior::Ok(bytes) => BackendOutcome::Ok(bytes.clone()),
            FakeBehavior::NullReturn => BackendOutcome::NullReturn,
            FakeBehavior::NonByteReturn => BackendOutcome::NonByteReturn,
            FakeBehavior::Exception(message) => BackendOutcome::Exception(message.clone()),
            FakeBehavior::SleepThenOk(duration) => {
                std::thread::sleep(*duration);
                BackendOutcome::Ok(b"slept".to_vec())
            }
        }
    }
}
