//! Learning-state persistence
//!
//! State is stored as a single JSON record. Loading and saving are best
//! effort: failures are logged and the agent keeps running on in-memory state.

pub mod record;

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::AgentResult;
use crate::learning::LearningState;

pub use record::StateRecord;

/// Where learning state is kept between runs
pub trait StateStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> AgentResult<Option<StateRecord>>;

    fn save(&self, record: &StateRecord) -> AgentResult<()>;
}

/// Pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured (or default) state path
    pub fn from_config(config: &crate::config::StoreConfig) -> anyhow::Result<Self> {
        Ok(Self::new(config.state_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> AgentResult<Option<StateRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, record: &StateRecord) -> AgentResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, contents)?;
        debug!("Saved learning state to {}", self.path.display());
        Ok(())
    }
}

/// Store that keeps nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl StateStore for NoopStore {
    fn load(&self) -> AgentResult<Option<StateRecord>> {
        Ok(None)
    }

    fn save(&self, _record: &StateRecord) -> AgentResult<()> {
        Ok(())
    }
}

/// Load saved state, falling back to a fresh state on any failure
pub fn load_state(store: &dyn StateStore) -> LearningState {
    match store.load() {
        Ok(Some(record)) => record.into_state(),
        Ok(None) => LearningState::new(),
        Err(e) => {
            warn!("Could not load learning state, starting fresh: {}", e);
            LearningState::new()
        }
    }
}

/// Save state, logging instead of failing
pub fn save_state(store: &dyn StateStore, state: &LearningState) {
    if let Err(e) = store.save(&StateRecord::from_state(state)) {
        warn!("Could not save learning state: {}", e);
    }
}
