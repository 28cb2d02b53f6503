//! Keyed digest: HMAC over a RustCrypto hash.
//!
//! tag = HMAC-<alg>(shared_key, payload)

use std::fmt;
use std::str::FromStr;

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use crate::error::AuthError;
use crate::keyfile::SharedKey;

/// Largest output of any supported hash (SHA-512).
pub const MAX_DIGEST_BYTES: usize = 64;

// ---------------------------------------------------------------------------
// Algorithm selection
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    /// Legacy interop only.
    Sha1,
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    pub const ALL: [DigestAlgorithm; 4] = [Self::Sha1, Self::Sha256, Self::Sha384, Self::Sha512];

    pub fn name(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Digest size in bytes.
    pub fn output_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.name() == s)
            .ok_or_else(|| AuthError::Config(format!("unknown digest algorithm '{}'", s)))
    }
}

// ---------------------------------------------------------------------------
// Digest value
// ---------------------------------------------------------------------------

/// A computed tag. Only the first `len` bytes of the buffer are meaningful.
#[derive(Clone)]
pub struct Digest {
    algorithm: DigestAlgorithm,
    bytes: [u8; MAX_DIGEST_BYTES],
    len: usize,
}

impl Digest {
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Lowercase hex, two characters per byte.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }
}

impl PartialEq for Digest {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm && bool::from(self.as_bytes().ct_eq(other.as_bytes()))
    }
}

impl Eq for Digest {}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Digest")
            .field("algorithm", &self.algorithm)
            .field("hex", &self.to_hex())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

pub fn compute(
    algorithm: DigestAlgorithm,
    key: &SharedKey,
    payload: &[u8],
) -> Result<Digest, AuthError> {
    let mut bytes = [0u8; MAX_DIGEST_BYTES];
    let key = key.as_bytes();

    let len = match algorithm {
        DigestAlgorithm::Sha1 => mac_into::<Hmac<Sha1>>(key, payload, &mut bytes)?,
        DigestAlgorithm::Sha256 => mac_into::<Hmac<Sha256>>(key, payload, &mut bytes)?,
        DigestAlgorithm::Sha384 => mac_into::<Hmac<Sha384>>(key, payload, &mut bytes)?,
        DigestAlgorithm::Sha512 => mac_into::<Hmac<Sha512>>(key, payload, &mut bytes)?,
    };

    if len != algorithm.output_len() {
        return Err(AuthError::DigestComputation("unexpected output length"));
    }

    tracing::debug!(algorithm = %algorithm, len, payload_len = payload.len(), "computed digest");
    Ok(Digest {
        algorithm,
        bytes,
        len,
    })
}

fn mac_into<M: Mac + KeyInit>(
    key: &[u8],
    payload: &[u8],
    out: &mut [u8; MAX_DIGEST_BYTES],
) -> Result<usize, AuthError> {
    let mut mac = <M as KeyInit>::new_from_slice(key)
        .map_err(|_| AuthError::DigestComputation("key rejected by mac"))?;
    mac.update(payload);
    let tag = mac.finalize().into_bytes();
    let dst = out
        .get_mut(..tag.len())
        .ok_or(AuthError::DigestComputation("digest exceeds output buffer"))?;
    dst.copy_from_slice(&tag);
    Ok(tag.len())
}
