//! Session token store
//!
//! The [`Session`] owns the single piece of durable client state: the opaque
//! access token issued by the server on login. It is opened explicitly at
//! startup and shared (behind an `Arc`) with the request pipeline and the
//! auth repository.
//!
//! ## Lifecycle
//!
//! ```ignore
//! let session = Arc::new(Session::open(config.session_path())?);
//! session.save("token");          // after login
//! session.get();                  // read per request
//! session.clear();                // logout
//! ```
//!
//! `save`, `get` and `clear` never fail. The in-memory value is
//! authoritative; disk writes that fail are logged and otherwise ignored.

use std::fmt;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use tracing::{debug, warn};

use crate::storage::{StorageResult, TokenFile};

/// Token store with an explicit open/close lifecycle
pub struct Session {
    /// Current token (None when logged out)
    token: RwLock<Option<String>>,
    /// Backing file (None for in-memory sessions)
    file: Option<TokenFile>,
}

impl Session {
    /// Open the session stored at `path`
    ///
    /// Loads a previously saved token if the file exists. Fails only when an
    /// existing file cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let file = TokenFile::new(path);
        let token = file.load()?;
        debug!(
            path = %file.path().display(),
            has_token = token.is_some(),
            "session opened"
        );

        Ok(Self {
            token: RwLock::new(token),
            file: Some(file),
        })
    }

    /// Create a session with no backing file
    pub fn in_memory() -> Self {
        Self {
            token: RwLock::new(None),
            file: None,
        }
    }

    /// Whether this session persists to disk
    pub fn is_persistent(&self) -> bool {
        self.file.is_some()
    }

    /// Store a token, replacing any previous one
    ///
    /// The lock is held across the file write, so memory and disk change
    /// together.
    pub fn save(&self, token: impl Into<String>) {
        let token = token.into();
        let mut current = self.token.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(ref file) = self.file {
            if let Err(e) = file.save(&token) {
                warn!(
                    path = %file.path().display(),
                    error = %e,
                    hint = e.recovery_suggestion(),
                    "failed to persist session token"
                );
            }
        }
        *current = Some(token);
        debug!("session token saved");
    }

    /// Current token, if any
    pub fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Check whether a non-empty token is stored
    pub fn is_authenticated(&self) -> bool {
        self.get().is_some_and(|t| !t.is_empty())
    }

    /// Remove the stored token
    pub fn clear(&self) {
        let mut current = self.token.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(ref file) = self.file {
            if let Err(e) = file.remove() {
                warn!(
                    path = %file.path().display(),
                    error = %e,
                    hint = e.recovery_suggestion(),
                    "failed to remove session file"
                );
            }
        }
        *current = None;
        debug!("session token cleared");
    }

    /// Close the session
    ///
    /// Writes the in-memory value through to disk one last time so the file
    /// matches what this process last saw, even if an earlier write failed.
    pub fn close(self) -> StorageResult<()> {
        let Some(file) = self.file else {
            return Ok(());
        };

        let token = self
            .token
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        match token {
            Some(t) => file.save(&t)?,
            None => file.remove()?,
        }
        debug!(path = %file.path().display(), "session closed");
        Ok(())
    }
}

// Never print the token itself
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("file", &self.file)
            .finish()
    }
}
