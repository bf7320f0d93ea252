//! JSON-file token store for the command-line front end.
//!
//! The file plays the role the cookie plays in the browser: one token, one
//! expiry. Reads that fail for any reason count as "no token"; write failures
//! are logged and otherwise ignored so callers keep the infallible contract.

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::SessionStore;

const DEFAULT_DIR: &str = ".brandsite";
const DEFAULT_FILE: &str = "session.json";

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    token: String,
    /// Unix seconds.
    expires_at: u64,
}

/// Token persisted to a small JSON file.
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.brandsite/session.json`, or a relative `.brandsite/session.json`
    /// when `HOME` is unset.
    #[must_use]
    pub fn default_path() -> PathBuf {
        let base = std::env::var_os("HOME").map_or_else(PathBuf::new, PathBuf::from);
        base.join(DEFAULT_DIR).join(DEFAULT_FILE)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> io::Result<SessionFile> {
        let raw = fs::read_to_string(&self.path)?;
        serde_json::from_str(&raw).map_err(io::Error::other)
    }

    fn write(&self, file: &SessionFile) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string(file).map_err(io::Error::other)?;
        fs::write(&self.path, raw)?;
        restrict_permissions(&self.path)
    }
}

impl SessionStore for FileSession {
    fn get_token(&self) -> Option<String> {
        let file = match self.read() {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "session file unreadable");
                return None;
            }
        };
        if file.token.is_empty() || unix_now() >= file.expires_at {
            return None;
        }
        Some(file.token)
    }

    fn set_token(&self, token: &str, ttl: Duration) {
        let file = SessionFile { token: token.to_owned(), expires_at: unix_now().saturating_add(ttl.as_secs()) };
        if let Err(err) = self.write(&file) {
            tracing::warn!(path = %self.path.display(), error = %err, "session file write failed");
        }
    }

    fn remove_token(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "session file remove failed");
            }
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
