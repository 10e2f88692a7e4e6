//! Bearer token persistence.
//!
//! The token lives under a single key, [`TOKEN_KEY`]. Older sessions stored it
//! under `token`; that key is still read and migrated on the next save.

use std::fmt;
use std::fs;
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "authToken";

/// Key used by older sessions.
const LEGACY_TOKEN_KEY: &str = "token";

/// Errors from reading or writing the token store.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Corrupt session file {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the bearer token is kept between requests.
pub trait TokenStore: Send + Sync + fmt::Debug {
    /// The stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self) -> Result<Option<SecretString>, TokenStoreError>;

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&self, token: &SecretString) -> Result<(), TokenStoreError>;

    /// Forget the stored token. Clearing an empty store is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

// =============================================================================
// MemoryTokenStore
// =============================================================================

/// In-process token store; forgotten when the process exits.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<SecretString>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(SecretString::from(token.into()))),
        }
    }
}

impl fmt::Debug for MemoryTokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let present = self
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some();
        f.debug_struct("MemoryTokenStore")
            .field("token", &if present { "[REDACTED]" } else { "None" })
            .finish()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SecretString>, TokenStoreError> {
        Ok(self
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &SecretString) -> Result<(), TokenStoreError> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

// =============================================================================
// FileTokenStore
// =============================================================================

/// On-disk session file, `{"authToken": "..."}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(rename = "authToken", default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
    #[serde(rename = "token", default, skip_serializing)]
    legacy_token: Option<String>,
}

/// Token store backed by a small JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<Option<SessionFile>, TokenStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(TokenStoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| TokenStoreError::Format {
                path: self.path.clone(),
                source,
            })
    }

    fn write_file(&self, file: &SessionFile) -> Result<(), TokenStoreError> {
        let io_err = |source| TokenStoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(file).map_err(|source| TokenStoreError::Format {
            path: self.path.clone(),
            source,
        })?;

        // Owner read/write only.
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);
        let mut out = options.open(&self.path).map_err(io_err)?;
        // `mode` only applies on create; tighten files left by older versions.
        #[cfg(unix)]
        out.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(io_err)?;
        out.write_all(json.as_bytes()).map_err(io_err)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SecretString>, TokenStoreError> {
        let Some(file) = self.read_file()? else {
            return Ok(None);
        };

        match (file.auth_token, file.legacy_token) {
            (Some(token), _) => Ok(Some(SecretString::from(token))),
            (None, Some(token)) => {
                debug!(
                    path = %self.path.display(),
                    from = LEGACY_TOKEN_KEY,
                    to = TOKEN_KEY,
                    "Migrating legacy token key"
                );
                let token = SecretString::from(token);
                self.save(&token)?;
                Ok(Some(token))
            }
            (None, None) => Ok(None),
        }
    }

    fn save(&self, token: &SecretString) -> Result<(), TokenStoreError> {
        self.write_file(&SessionFile {
            auth_token: Some(token.expose_secret().to_string()),
            legacy_token: None,
        })
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(TokenStoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir()
            .join(format!("serenity-token-{}-{n}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&SecretString::from("abc")).unwrap();
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "abc");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_memory_store_debug_redacts() {
        let store = MemoryTokenStore::with_token("super-secret");
        let debug = format!("{store:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let store = FileTokenStore::new(temp_path("missing.json"));
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_uses_auth_token_key() {
        let path = temp_path("session.json");
        let store = FileTokenStore::new(&path);
        store.save(&SecretString::from("tok-1")).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[TOKEN_KEY], "tok-1");
        assert!(raw.get(LEGACY_TOKEN_KEY).is_none());

        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "tok-1");
        store.clear().unwrap();
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_owner_only() {
        let path = temp_path("private.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        FileTokenStore::new(&path)
            .save(&SecretString::from("tok-1"))
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        let fresh = temp_path("fresh.json");
        FileTokenStore::new(&fresh)
            .save(&SecretString::from("tok-2"))
            .unwrap();
        let mode = fs::metadata(&fresh).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_file_store_migrates_legacy_key() {
        let path = temp_path("legacy.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"token":"old-tok"}"#).unwrap();

        let store = FileTokenStore::new(&path);
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "old-tok");

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[TOKEN_KEY], "old-tok");
        assert!(raw.get(LEGACY_TOKEN_KEY).is_none());
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let path = temp_path("corrupt.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let store = FileTokenStore::new(&path);
        assert!(matches!(
            store.load(),
            Err(TokenStoreError::Format { .. })
        ));
    }
}
