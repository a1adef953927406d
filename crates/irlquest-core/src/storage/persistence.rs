//! Token file persistence
//!
//! Saves and loads the session token to/from a single file.
//! Uses atomic writes (write to temp file, then rename) to prevent corruption.
//!
//! Storage location: `~/.local/share/irlquest/session` (configurable via `Config`)

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::error::{FileOp, StorageError, StorageResult};

/// File holding the opaque access token
///
/// The file content is the token itself, byte for byte. An empty or missing
/// file means no token is stored.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    /// Create a handle for the token file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the token file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a token file exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the stored token
    ///
    /// Returns `None` if the file doesn't exist or is empty.
    pub fn load(&self) -> StorageResult<Option<String>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::from_io(e, self.path.clone(), FileOp::Read)),
        };

        if bytes.is_empty() {
            return Ok(None);
        }

        let token = String::from_utf8(bytes).map_err(|e| StorageError::InvalidFormat {
            path: self.path.clone(),
            details: e.to_string(),
        })?;

        Ok(Some(token))
    }

    /// Save the token, replacing any previous value
    pub fn save(&self, token: &str) -> StorageResult<()> {
        atomic_write(&self.path, token.as_bytes())
    }

    /// Remove the token file
    ///
    /// Removing a file that doesn't exist is not an error.
    pub fn remove(&self) -> StorageResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from_io(e, self.path.clone(), FileOp::Write)),
        }
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// The target file is never left in a partially-written state.
pub fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Temp file in the same directory so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone(), FileOp::Write))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone(), FileOp::Write))?;

    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone(), FileOp::Write))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = TokenFile::new(temp_dir.path().join("session"));

        assert!(!file.exists());
        assert!(file.load().unwrap().is_none());

        file.save("eyJhbGciOiJIUzI1NiJ9.payload.sig").unwrap();
        assert!(file.exists());
        assert_eq!(
            file.load().unwrap().as_deref(),
            Some("eyJhbGciOiJIUzI1NiJ9.payload.sig")
        );
    }

    #[test]
    fn test_save_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let file = TokenFile::new(temp_dir.path().join("session"));

        file.save("first").unwrap();
        file.save("second").unwrap();
        assert_eq!(file.load().unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_token_is_stored_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let file = TokenFile::new(temp_dir.path().join("session"));

        file.save("  padded token\n").unwrap();
        assert_eq!(file.load().unwrap().as_deref(), Some("  padded token\n"));
    }

    #[test]
    fn test_empty_file_means_no_token() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session");
        fs::write(&path, b"").unwrap();

        let file = TokenFile::new(&path);
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session");
        fs::write(&path, [0xff, 0xfe, 0xfd]).unwrap();

        let file = TokenFile::new(&path);
        assert!(matches!(
            file.load(),
            Err(StorageError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let file = TokenFile::new(temp_dir.path().join("session"));

        file.save("token").unwrap();
        file.remove().unwrap();
        assert!(!file.exists());

        // Second remove is a no-op
        file.remove().unwrap();
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir
            .path()
            .join("a")
            .join("b")
            .join("c")
            .join("file.txt");

        atomic_write(&nested_path, b"test data").unwrap();

        assert!(nested_path.exists());
        let content = fs::read_to_string(&nested_path).unwrap();
        assert_eq!(content, "test data");
        assert!(!nested_path.with_extension("tmp").exists());
    }
}
