//! Known Answer Tests: HMAC vectors (RFC 2202, RFC 4231 test case 2)

use actor_auth::digest::{compute, DigestAlgorithm, MAX_DIGEST_BYTES};
use actor_auth::SharedKey;

const JEFE_MSG: &[u8] = b"what do ya want for nothing?";

fn jefe() -> SharedKey {
    SharedKey::from_text(b"Jefe").unwrap()
}

#[test]
fn test_digest_sizes() {
    assert_eq!(DigestAlgorithm::Sha1.output_len(), 20);
    assert_eq!(DigestAlgorithm::Sha256.output_len(), 32);
    assert_eq!(DigestAlgorithm::Sha384.output_len(), 48);
    assert_eq!(DigestAlgorithm::Sha512.output_len(), 64);
    assert_eq!(MAX_DIGEST_BYTES, 64);
}

#[test]
fn test_hmac_sha1_rfc2202() {
    let d = compute(DigestAlgorithm::Sha1, &jefe(), JEFE_MSG).unwrap();
    assert_eq!(d.to_hex(), "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79");
}

#[test]
fn test_hmac_sha256_rfc4231() {
    let d = compute(DigestAlgorithm::Sha256, &jefe(), JEFE_MSG).unwrap();
    assert_eq!(
        d.to_hex(),
        "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
    );
}

#[test]
fn test_hmac_sha384_rfc4231() {
    let d = compute(DigestAlgorithm::Sha384, &jefe(), JEFE_MSG).unwrap();
    assert_eq!(
        d.to_hex(),
        "af45d2e376484031617f78d2b58a6b1b9c7ef464f5a01b47e42ec373\
         6322445e8e2240ca5e69e2c78b3239ecfab21649"
    );
}

#[test]
fn test_hmac_sha512_rfc4231() {
    let d = compute(DigestAlgorithm::Sha512, &jefe(), JEFE_MSG).unwrap();
    assert_eq!(
        d.to_hex(),
        "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554\
         9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
    );
}

#[test]
fn test_topsecret_hello() {
    let key = SharedKey::from_text(b"topsecret\n").unwrap();
    let sha256 = compute(DigestAlgorithm::Sha256, &key, b"hello").unwrap();
    assert_eq!(
        sha256.to_hex(),
        "ed76fd36523b8becda5a3b36d0e3737e8ae5111f55e26c7c3a455a3ce29636d2"
    );

    let sha1 = compute(DigestAlgorithm::Sha1, &key, b"hello").unwrap();
    assert_eq!(sha1.to_hex(), "e84d665a069dbba6d48425b8e50186ad29849f78");
}

#[test]
fn test_single_byte_change() {
    let key = SharedKey::from_text(b"topsecret").unwrap();
    let d = compute(DigestAlgorithm::Sha256, &key, b"hellp").unwrap();
    assert_eq!(
        d.to_hex(),
        "e1741b5dbe57eda53786cfbe145f5ec5c3ab6471d7d4b4e92ed80b31e9e4e954"
    );
}
