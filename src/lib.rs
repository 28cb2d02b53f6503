//! # actor-auth
//!
//! Setuid request signer. Proves that a forwarded request was authorized by
//! the user who invoked the program.
//!
//! ## Pipeline
//!
//! 1. parse the claimed `actor` from the `<Request>` tag
//! 2. compare it with the account of the real uid
//! 3. assume the admin account and read the shared key
//! 4. HMAC the payload with the key and print it as hex
//!
//! ```rust
//! use actor_auth::{Authenticator, AuthError, Config, Identity, IdentitySource, KeySource, SharedKey, Verified};
//!
//! struct Alice;
//! impl IdentitySource for Alice {
//!     fn invoking_user(&self) -> Result<Identity, AuthError> {
//!         Ok(Identity::new("alice").unwrap())
//!     }
//! }
//!
//! struct InlineKey;
//! impl KeySource for InlineKey {
//!     fn load(&self, _proof: Verified) -> Result<SharedKey, AuthError> {
//!         Ok(SharedKey::from_text(b"topsecret\n").unwrap())
//!     }
//! }
//!
//! let auth = Authenticator::new(Alice, InlineKey, &Config::default());
//! let digest = auth.authenticate(b"<Request action=\"Query\" actor=\"alice\"></Request>").unwrap();
//! assert_eq!(digest.len(), digest.algorithm().output_len());
//! ```
//!
//! ## Security Properties
//!
//! - **Gated key access**: the key source takes a `Verified` proof by value
//! - **Real uid**: the invoking user is resolved with `getuid`, not `geteuid`
//! - **Bounded parsing**: actor, tag and input sizes are capped
//! - **Key hygiene**: key material is zeroed on drop and never logged
//! - **All-or-nothing output**: stdout is written only after the digest is complete

#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod digest;
pub mod error;
pub mod identity;
pub mod keyfile;
pub mod privilege;
pub mod request;

pub use auth::{Authenticator, SystemAuthenticator};
pub use config::Config;
pub use digest::{Digest, DigestAlgorithm, MAX_DIGEST_BYTES};
pub use error::{AuthError, KeyFault};
pub use identity::{verify, Identity, IdentitySource, SystemIdentity, Verified, MAX_ACTOR_BYTES};
pub use keyfile::{KeySource, PrivilegedKeyLoader, SharedKey, MAX_KEY_FILE_BYTES};
pub use privilege::{PrivilegeSwitch, SystemPrivilege};
pub use request::{Framing, Request};
