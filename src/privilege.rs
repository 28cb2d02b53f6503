//! Privilege transition to the admin account.

use nix::unistd::{geteuid, setuid, User};

use crate::error::AuthError;
use crate::identity::Verified;

/// Switches the effective uid to a named account.
///
/// Implementations must either complete the switch or fail; the caller never
/// continues with an indeterminate privilege level.
pub trait PrivilegeSwitch {
    fn assume(&self, proof: &Verified, account: &str) -> Result<(), AuthError>;
}

impl<T: PrivilegeSwitch + ?Sized> PrivilegeSwitch for &T {
    fn assume(&self, proof: &Verified, account: &str) -> Result<(), AuthError> {
        (**self).assume(proof, account)
    }
}

/// `setuid` to the account's uid, then confirm with `geteuid`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemPrivilege;

impl PrivilegeSwitch for SystemPrivilege {
    fn assume(&self, proof: &Verified, account: &str) -> Result<(), AuthError> {
        let fail = |detail: String| AuthError::PrivilegeTransition {
            account: account.to_string(),
            detail,
        };

        let user = User::from_name(account)
            .map_err(|e| fail(format!("passwd lookup failed: {}", e)))?
            .ok_or_else(|| fail("no such account".to_string()))?;

        setuid(user.uid).map_err(|e| fail(format!("setuid({}) rejected: {}", user.uid, e)))?;

        let effective = geteuid();
        if effective != user.uid {
            return Err(fail(format!(
                "effective uid is {} after setuid({})",
                effective, user.uid
            )));
        }

        tracing::debug!(
            actor = %proof.identity(),
            account,
            uid = user.uid.as_raw(),
            "assumed admin account"
        );
        Ok(())
    }
}
