//! Loading the cookie-session signing key.

use std::io;
use std::path::{Path, PathBuf};

use actix_web::cookie::Key;
use tracing::warn;

/// Shortest key material `Key::derive_from` accepts.
pub const SESSION_KEY_MIN_LEN: usize = 32;

/// Failures while reading the session key file.
#[derive(Debug, thiserror::Error)]
pub enum SessionKeyError {
    #[error("failed to read session key at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("session key at {path} is {length} bytes; at least {min_len} required")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Derive the session key from the file at `path`.
///
/// When the file cannot be read and `allow_ephemeral` is set, a random key
/// is generated instead; sessions then end with the process. A readable but
/// short file is always an error.
///
/// # Errors
/// [`SessionKeyError::Read`] when the file is unreadable and ephemeral keys
/// are not allowed; [`SessionKeyError::KeyTooShort`] when it holds fewer
/// than [`SESSION_KEY_MIN_LEN`] bytes.
pub fn load_session_key(path: &Path, allow_ephemeral: bool) -> Result<Key, SessionKeyError> {
    match std::fs::read(path) {
        Ok(bytes) if bytes.len() < SESSION_KEY_MIN_LEN => Err(SessionKeyError::KeyTooShort {
            path: path.to_path_buf(),
            length: bytes.len(),
            min_len: SESSION_KEY_MIN_LEN,
        }),
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(error) if allow_ephemeral => {
            warn!(path = %path.display(), %error, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(source) => Err(SessionKeyError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
