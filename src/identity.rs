//! Account identities and the verification gate.
//!
//! [`verify`] is the only constructor of [`Verified`]. Everything that touches
//! privilege or key material takes a `Verified` by value, so it cannot run for
//! a caller whose claimed actor was not matched against the real uid.

use std::fmt;

use nix::unistd::{getuid, User};

use crate::error::AuthError;

/// Longest accepted account name, in bytes.
pub const MAX_ACTOR_BYTES: usize = 255;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A validated account name. Compared byte-for-byte.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    /// Validate an account name: non-empty, bounded, no whitespace or control
    /// characters.
    pub fn new(name: &str) -> Result<Self, String> {
        if name.is_empty() {
            return Err("identity is empty".to_string());
        }
        if name.len() > MAX_ACTOR_BYTES {
            return Err(format!("identity exceeds {} bytes", MAX_ACTOR_BYTES));
        }
        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err("identity contains whitespace or control characters".to_string());
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identity sources
// ---------------------------------------------------------------------------

/// Resolves the account that started this process.
pub trait IdentitySource {
    fn invoking_user(&self) -> Result<Identity, AuthError>;
}

impl<T: IdentitySource + ?Sized> IdentitySource for &T {
    fn invoking_user(&self) -> Result<Identity, AuthError> {
        (**self).invoking_user()
    }
}

/// Real uid lookup through the passwd database.
///
/// Uses `getuid`, not `geteuid`: under setuid the effective uid already
/// belongs to the admin account.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemIdentity;

impl IdentitySource for SystemIdentity {
    fn invoking_user(&self) -> Result<Identity, AuthError> {
        let uid = getuid();
        let user = User::from_uid(uid)
            .map_err(|e| AuthError::UnknownInvoker(format!("uid {}: {}", uid, e)))?
            .ok_or_else(|| AuthError::UnknownInvoker(format!("uid {} has no passwd entry", uid)))?;
        tracing::debug!(uid = uid.as_raw(), name = %user.name, "resolved invoking user");
        Identity::new(&user.name)
            .map_err(|reason| AuthError::UnknownInvoker(format!("uid {}: {}", uid, reason)))
    }
}

// ---------------------------------------------------------------------------
// Verification gate
// ---------------------------------------------------------------------------

/// Proof that the claimed actor matched the invoking user.
#[derive(Debug, PartialEq, Eq)]
pub struct Verified {
    identity: Identity,
}

impl Verified {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}

/// Compare the claimed actor to the real invoking user.
pub fn verify<S: IdentitySource + ?Sized>(
    claimed: &Identity,
    source: &S,
) -> Result<Verified, AuthError> {
    let actual = source.invoking_user()?;
    if claimed.as_str().as_bytes() != actual.as_str().as_bytes() {
        tracing::warn!(claimed = %claimed, actual = %actual, "actor does not match invoking user");
        return Err(AuthError::IdentityMismatch {
            claimed: claimed.to_string(),
            actual: actual.to_string(),
        });
    }
    tracing::debug!(actor = %actual, "actor verified");
    Ok(Verified { identity: actual })
}
