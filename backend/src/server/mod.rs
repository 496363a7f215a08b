//! Server configuration and bootstrap helpers.

mod config;

pub use config::AppConfig;

use std::path::Path;

use actix_web::cookie::Key;
use tracing::warn;

/// Load the session signing key from disk.
///
/// Debug builds and explicitly opted-in deployments fall back to an
/// ephemeral key when the file is missing; release builds fail instead,
/// since an ephemeral key invalidates every session on restart.
///
/// # Errors
///
/// Returns an error when the key file cannot be read and no ephemeral
/// fallback is allowed.
pub fn load_session_key(path: &Path, allow_ephemeral: bool) -> std::io::Result<Key> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(error) => {
            if cfg!(debug_assertions) || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {}: {error}",
                    path.display()
                )))
            }
        }
    }
}
