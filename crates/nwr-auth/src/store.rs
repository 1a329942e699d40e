//! Durable session storage.
//!
//! A session store is a single key/value slot. It holds at most one
//! serialized session and knows nothing about its content; verification
//! happens in the [`AuthService`](crate::AuthService).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::AuthError;

/// One durable slot for the serialized session.
pub trait SessionStore {
    /// Read the stored value, if any.
    fn load(&self) -> Option<String>;

    /// Replace the stored value.
    fn save(&mut self, value: &str) -> Result<(), AuthError>;

    /// Remove the stored value. Removing an absent value is not an error.
    fn clear(&mut self) -> Result<(), AuthError>;
}

/// In-memory store. Clones share the same slot, like tabs sharing browser storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with raw content.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(value.into()))),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<String> {
        self.slot().clone()
    }

    fn save(&mut self, value: &str) -> Result<(), AuthError> {
        *self.slot() = Some(value.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), AuthError> {
        *self.slot() = None;
        Ok(())
    }
}

/// Store backed by a single file, used by the CLI.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let content = content.trim();
                (!content.is_empty()).then(|| content.to_string())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "unreadable session file");
                None
            }
        }
    }

    fn save(&mut self, value: &str) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, value)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), AuthError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
