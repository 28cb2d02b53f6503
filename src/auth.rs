//! The four-stage pipeline: parse, verify, load key, digest.

use std::io::{Read, Write};

use crate::config::Config;
use crate::digest::{self, Digest, DigestAlgorithm};
use crate::error::AuthError;
use crate::identity::{self, IdentitySource, SystemIdentity};
use crate::keyfile::{KeySource, PrivilegedKeyLoader};
use crate::privilege::SystemPrivilege;
use crate::request::{self, Framing};

pub struct Authenticator<I, K> {
    identity: I,
    keys: K,
    algorithm: DigestAlgorithm,
    framing: Framing,
    max_request_bytes: usize,
}

/// The production wiring: passwd lookups, `setuid`, the configured key file.
pub type SystemAuthenticator = Authenticator<SystemIdentity, PrivilegedKeyLoader<SystemPrivilege>>;

impl SystemAuthenticator {
    pub fn from_config(config: &Config) -> Result<Self, AuthError> {
        config.validate()?;
        let loader = PrivilegedKeyLoader::new(
            config.admin_account.clone(),
            config.key_path(),
            SystemPrivilege,
        );
        Ok(Authenticator::new(SystemIdentity, loader, config))
    }
}

impl<I: IdentitySource, K: KeySource> Authenticator<I, K> {
    pub fn new(identity: I, keys: K, config: &Config) -> Self {
        Self {
            identity,
            keys,
            algorithm: config.algorithm,
            framing: config.framing,
            max_request_bytes: config.max_request_bytes,
        }
    }

    /// Run the pipeline over one request.
    ///
    /// The key source is reached only through a `Verified` proof, so a parse
    /// failure or identity mismatch never touches privilege or the key file.
    pub fn authenticate(&self, input: &[u8]) -> Result<Digest, AuthError> {
        let request = request::parse(input, self.framing)?;
        tracing::debug!(
            actor = %request.actor,
            action = %request.action,
            payload_len = request.payload.len(),
            "parsed request"
        );

        let proof = identity::verify(&request.actor, &self.identity)?;
        let key = self.keys.load(proof)?;
        digest::compute(self.algorithm, &key, request.payload)
    }

    /// Read a request from `input`, write the hex digest line to `output`.
    ///
    /// Nothing is written unless the digest is complete.
    pub fn respond<R: Read, W: Write>(&self, input: R, mut output: W) -> Result<Digest, AuthError> {
        let raw = request::read_input(input, self.max_request_bytes)?;
        let digest = self.authenticate(&raw)?;

        let mut line = digest.to_hex();
        line.push('\n');
        output.write_all(line.as_bytes())?;
        output.flush()?;
        Ok(digest)
    }
}
