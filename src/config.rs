//! Compiled-in configuration.
//!
//! Defaults may be overridden when the binary is *built*
//! (`ACTOR_AUTH_HOME`, `ACTOR_AUTH_ADMIN`, `ACTOR_AUTH_DIGEST`), never at run
//! time: the process runs setuid and its environment belongs to the caller.

use std::path::{Component, Path, PathBuf};

use crate::digest::DigestAlgorithm;
use crate::error::AuthError;
use crate::request::Framing;

pub const DEFAULT_HOME: &str = "/opt/gold";
pub const DEFAULT_ADMIN_ACCOUNT: &str = "gold";
pub const DEFAULT_KEY_FILE: &str = "etc/auth_key";

/// Hard ceiling on bytes read from stdin.
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Installation root; must be absolute.
    pub home: PathBuf,
    /// Key file, relative to `home`.
    pub key_file: PathBuf,
    /// Account whose privilege is assumed to read the key.
    pub admin_account: String,
    pub algorithm: DigestAlgorithm,
    pub framing: Framing,
    pub max_request_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            home: PathBuf::from(option_env!("ACTOR_AUTH_HOME").unwrap_or(DEFAULT_HOME)),
            key_file: PathBuf::from(DEFAULT_KEY_FILE),
            admin_account: option_env!("ACTOR_AUTH_ADMIN")
                .unwrap_or(DEFAULT_ADMIN_ACCOUNT)
                .to_string(),
            algorithm: compiled_algorithm(),
            framing: Framing::Document,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
        }
    }
}

fn compiled_algorithm() -> DigestAlgorithm {
    option_env!("ACTOR_AUTH_DIGEST")
        .and_then(|name| name.parse().ok())
        .unwrap_or_default()
}

impl Config {
    /// Full path of the shared key file.
    pub fn key_path(&self) -> PathBuf {
        self.home.join(&self.key_file)
    }

    /// Reject configurations that could point the key read outside `home`.
    pub fn validate(&self) -> Result<(), AuthError> {
        if !self.home.is_absolute() {
            return Err(AuthError::Config(format!(
                "home {} is not absolute",
                self.home.display()
            )));
        }
        if !is_contained(&self.key_file) {
            return Err(AuthError::Config(format!(
                "key file {} must be a relative path below home",
                self.key_file.display()
            )));
        }
        if self.admin_account.is_empty() {
            return Err(AuthError::Config("admin account is empty".into()));
        }
        if self.max_request_bytes == 0 {
            return Err(AuthError::Config("max_request_bytes is zero".into()));
        }
        Ok(())
    }
}

fn is_contained(path: &Path) -> bool {
    let mut components = path.components().peekable();
    components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)))
}
