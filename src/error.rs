//! Error taxonomy for the authentication pipeline.
//!
//! Every variant is terminal. The process exit code is derived from the
//! variant, never from an underlying OS error number.

use std::fmt;
use std::io;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Exit codes
// ---------------------------------------------------------------------------

pub const EXIT_USAGE: u8 = 1;
pub const EXIT_IDENTITY_MISMATCH: u8 = 2;
pub const EXIT_MALFORMED_REQUEST: u8 = 3;
pub const EXIT_PRIVILEGE_TRANSITION: u8 = 4;
pub const EXIT_KEY_UNAVAILABLE: u8 = 5;
pub const EXIT_DIGEST_COMPUTATION: u8 = 6;
pub const EXIT_UNKNOWN_INVOKER: u8 = 7;
pub const EXIT_IO: u8 = 8;
pub const EXIT_CONFIG: u8 = 9;

// ---------------------------------------------------------------------------
// Key file faults
// ---------------------------------------------------------------------------

/// Why the shared key could not be produced.
#[derive(Debug)]
pub enum KeyFault {
    Open(io::Error),
    Read(io::Error),
    /// File is larger than the key read ceiling.
    Oversize,
    /// Nothing left after stripping trailing whitespace.
    Empty,
    /// Key text contains a NUL byte.
    Nul,
}

impl fmt::Display for KeyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(e) => write!(f, "cannot open for reading: {}", e),
            Self::Read(e) => write!(f, "read failed: {}", e),
            Self::Oversize => write!(f, "key file exceeds size limit"),
            Self::Empty => write!(f, "key is empty"),
            Self::Nul => write!(f, "key contains a NUL byte"),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum AuthError {
    MalformedRequest(String),
    IdentityMismatch { claimed: String, actual: String },
    UnknownInvoker(String),
    PrivilegeTransition { account: String, detail: String },
    KeyUnavailable { path: PathBuf, fault: KeyFault },
    DigestComputation(&'static str),
    Io(io::Error),
    Config(String),
}

impl AuthError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRequest(msg.into())
    }

    /// Stable, distinct process exit status for this error kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MalformedRequest(_) => EXIT_MALFORMED_REQUEST,
            Self::IdentityMismatch { .. } => EXIT_IDENTITY_MISMATCH,
            Self::UnknownInvoker(_) => EXIT_UNKNOWN_INVOKER,
            Self::PrivilegeTransition { .. } => EXIT_PRIVILEGE_TRANSITION,
            Self::KeyUnavailable { .. } => EXIT_KEY_UNAVAILABLE,
            Self::DigestComputation(_) => EXIT_DIGEST_COMPUTATION,
            Self::Io(_) => EXIT_IO,
            Self::Config(_) => EXIT_CONFIG,
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRequest(msg) => write!(f, "malformed request: {}", msg),
            Self::IdentityMismatch { claimed, actual } => write!(
                f,
                "actor '{}' is not the same as the invoking user '{}'",
                claimed, actual
            ),
            Self::UnknownInvoker(msg) => write!(f, "cannot resolve invoking user: {}", msg),
            Self::PrivilegeTransition { account, detail } => {
                write!(f, "cannot assume account '{}': {}", account, detail)
            }
            Self::KeyUnavailable { path, fault } => {
                write!(f, "key file {}: {}", path.display(), fault)
            }
            Self::DigestComputation(msg) => write!(f, "digest computation failed: {}", msg),
            Self::Io(e) => write!(f, "i/o error: {}", e),
            Self::Config(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::KeyUnavailable {
                fault: KeyFault::Open(e) | KeyFault::Read(e),
                ..
            } => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for AuthError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
