//! Shared key loading under the admin account.
//!
//! The key file is opened read-only, read in one bounded pass into a
//! zeroizing buffer and closed before normalization. Trailing whitespace is
//! stripped; an empty result is rejected.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{AuthError, KeyFault};
use crate::identity::Verified;
use crate::privilege::PrivilegeSwitch;

/// Largest key file accepted, in bytes.
pub const MAX_KEY_FILE_BYTES: usize = 4096;

// ---------------------------------------------------------------------------
// Shared key
// ---------------------------------------------------------------------------

/// Normalized key material, zeroed on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedKey(Vec<u8>);

impl SharedKey {
    /// Build a key from raw key-file text, applying normalization.
    pub fn from_text(raw: &[u8]) -> Result<Self, KeyFault> {
        normalize(raw)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SharedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedKey([REDACTED; {}])", self.0.len())
    }
}

/// C `isspace`: ASCII whitespace plus vertical tab.
fn is_space(b: u8) -> bool {
    b.is_ascii_whitespace() || b == 0x0B
}

/// Strip one trailing run of whitespace; reject empty or NUL-bearing keys.
pub fn normalize(raw: &[u8]) -> Result<SharedKey, KeyFault> {
    let end = raw
        .iter()
        .rposition(|&b| !is_space(b))
        .map_or(0, |i| i + 1);
    let key = &raw[..end];

    if key.is_empty() {
        return Err(KeyFault::Empty);
    }
    if key.contains(&0) {
        return Err(KeyFault::Nul);
    }
    Ok(SharedKey(key.to_vec()))
}

// ---------------------------------------------------------------------------
// Key sources
// ---------------------------------------------------------------------------

/// Produces the shared key. Callable only with proof of a verified actor.
pub trait KeySource {
    fn load(&self, proof: Verified) -> Result<SharedKey, AuthError>;
}

/// Assumes the admin account, then reads the fixed-path key file.
#[derive(Debug)]
pub struct PrivilegedKeyLoader<P> {
    admin_account: String,
    key_path: PathBuf,
    privilege: P,
}

impl<P: PrivilegeSwitch> PrivilegedKeyLoader<P> {
    pub fn new(admin_account: impl Into<String>, key_path: impl Into<PathBuf>, privilege: P) -> Self {
        Self {
            admin_account: admin_account.into(),
            key_path: key_path.into(),
            privilege,
        }
    }

    pub fn key_path(&self) -> &Path {
        &self.key_path
    }
}

impl<P: PrivilegeSwitch> KeySource for PrivilegedKeyLoader<P> {
    fn load(&self, proof: Verified) -> Result<SharedKey, AuthError> {
        self.privilege.assume(&proof, &self.admin_account)?;

        let key = read_key_file(&self.key_path).map_err(|fault| AuthError::KeyUnavailable {
            path: self.key_path.clone(),
            fault,
        })?;

        tracing::debug!(
            actor = %proof.identity(),
            path = %self.key_path.display(),
            key_len = key.len(),
            "loaded shared key"
        );
        Ok(key)
    }
}

fn read_key_file(path: &Path) -> Result<SharedKey, KeyFault> {
    let file = File::open(path).map_err(KeyFault::Open)?;
    let mut buf = Zeroizing::new([0u8; MAX_KEY_FILE_BYTES + 1]);
    let filled = read_bounded(file, &mut buf[..])?;

    if filled > MAX_KEY_FILE_BYTES {
        return Err(KeyFault::Oversize);
    }
    normalize(&buf[..filled])
}

/// Fill `buf` from `file` until EOF or full. The file is closed on return.
fn read_bounded(mut file: File, buf: &mut [u8]) -> Result<usize, KeyFault> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(KeyFault::Read(e)),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{self, Identity, IdentitySource};
    use std::cell::Cell;
    use std::io::Write;

    struct Same;

    impl IdentitySource for Same {
        fn invoking_user(&self) -> Result<Identity, AuthError> {
            Ok(Identity::new("alice").unwrap())
        }
    }

    fn proof() -> Verified {
        identity::verify(&Identity::new("alice").unwrap(), &Same).unwrap()
    }

    #[derive(Default)]
    struct RecordingPrivilege {
        calls: Cell<usize>,
    }

    impl PrivilegeSwitch for RecordingPrivilege {
        fn assume(&self, _proof: &Verified, account: &str) -> Result<(), AuthError> {
            assert_eq!(account, "gold");
            self.calls.set(self.calls.get() + 1);
            Ok(())
        }
    }

    struct DeniedPrivilege;

    impl PrivilegeSwitch for DeniedPrivilege {
        fn assume(&self, _proof: &Verified, account: &str) -> Result<(), AuthError> {
            Err(AuthError::PrivilegeTransition {
                account: account.to_string(),
                detail: "EPERM".into(),
            })
        }
    }

    fn key_file(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents).unwrap();
        f
    }

    #[test]
    fn normalize_strips_trailing_whitespace() {
        assert_eq!(normalize(b"secret\n").unwrap().as_bytes(), b"secret");
        assert_eq!(normalize(b"secret\r\n \t").unwrap().as_bytes(), b"secret");
        assert_eq!(normalize(b"secret").unwrap().as_bytes(), b"secret");
        assert_eq!(normalize(b" sec ret\n").unwrap().as_bytes(), b" sec ret");
        assert_eq!(normalize(b"secret\x0b").unwrap().as_bytes(), b"secret");
        assert_eq!(normalize(b"secret\x0b\x0c\n").unwrap().as_bytes(), b"secret");
    }

    #[test]
    fn normalize_rejects_empty_and_nul() {
        assert!(matches!(normalize(b""), Err(KeyFault::Empty)));
        assert!(matches!(normalize(b"\n\n"), Err(KeyFault::Empty)));
        assert!(matches!(normalize(b"sec\0ret\n"), Err(KeyFault::Nul)));
    }

    #[test]
    fn debug_redacts_material() {
        let key = normalize(b"topsecret").unwrap();
        let shown = format!("{:?}", key);
        assert!(!shown.contains("topsecret"));
        assert!(shown.contains("REDACTED"));
    }

    #[test]
    fn loads_after_assuming_admin() {
        let file = key_file(b"topsecret\n");
        let loader = PrivilegedKeyLoader::new("gold", file.path(), RecordingPrivilege::default());

        let key = loader.load(proof()).unwrap();
        assert_eq!(key.as_bytes(), b"topsecret");
        assert_eq!(loader.privilege.calls.get(), 1);
    }

    #[test]
    fn missing_file_is_key_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth_key");
        let loader = PrivilegedKeyLoader::new("gold", &path, RecordingPrivilege::default());

        match loader.load(proof()).unwrap_err() {
            AuthError::KeyUnavailable { path: p, fault: KeyFault::Open(e) } => {
                assert_eq!(p, path);
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_file_is_key_unavailable() {
        let file = key_file(b" \n");
        let loader = PrivilegedKeyLoader::new("gold", file.path(), RecordingPrivilege::default());
        assert!(matches!(
            loader.load(proof()),
            Err(AuthError::KeyUnavailable { fault: KeyFault::Empty, .. })
        ));
    }

    #[test]
    fn oversize_file_is_rejected() {
        let file = key_file(&vec![b'k'; MAX_KEY_FILE_BYTES + 1]);
        let loader = PrivilegedKeyLoader::new("gold", file.path(), RecordingPrivilege::default());
        assert!(matches!(
            loader.load(proof()),
            Err(AuthError::KeyUnavailable { fault: KeyFault::Oversize, .. })
        ));

        let file = key_file(&vec![b'k'; MAX_KEY_FILE_BYTES]);
        let loader = PrivilegedKeyLoader::new("gold", file.path(), RecordingPrivilege::default());
        assert_eq!(loader.load(proof()).unwrap().len(), MAX_KEY_FILE_BYTES);
    }

    #[test]
    fn denied_transition_skips_key_read() {
        let dir = tempfile::tempdir().unwrap();
        // Path does not exist: reaching the open would yield KeyUnavailable.
        let loader = PrivilegedKeyLoader::new("gold", dir.path().join("none"), DeniedPrivilege);
        assert!(matches!(
            loader.load(proof()),
            Err(AuthError::PrivilegeTransition { .. })
        ));
    }
}
