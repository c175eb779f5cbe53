//! Password-based encryption (PBEWithMD5AndDES)
//!
//! Legacy PKCS#5 v1.5 scheme kept for compatibility with documents encrypted
//! by existing tooling: the key and IV are derived by iterating MD5 over
//! `password || salt`, and the payload is DES-CBC with PKCS padding. The
//! ciphertext token is `base64(salt8 || ciphertext)`.
//!
//! This scheme is cryptographically weak (64-bit block cipher, MD5-derived
//! key). It is retained only because deployed documents use it; new material
//! should not be encrypted with it outside of that compatibility need.

use std::sync::OnceLock;

use openssl::base64::{decode_block, encode_block};
use openssl::hash::{hash, MessageDigest};
use openssl::provider::Provider;
use openssl::rand::rand_bytes;
use openssl::symm::{decrypt as symm_decrypt, encrypt as symm_encrypt, Cipher};

use crate::common::{ConfigError, Result};

const SALT_LEN: usize = 8;
const KEY_ITERATIONS: usize = 1_000;

/// Make DES-CBC available: OpenSSL 3 moved single DES into the legacy
/// provider, which is not loaded by default. Loaded once, kept for the
/// process lifetime.
fn ensure_legacy_provider() -> Result<()> {
    static LEGACY: OnceLock<std::result::Result<Provider, String>> = OnceLock::new();

    match LEGACY.get_or_init(|| Provider::try_load(None, "legacy", true).map_err(|e| e.to_string()))
    {
        Ok(_) => Ok(()),
        Err(e) => Err(ConfigError::Decrypt(format!(
            "legacy crypto provider unavailable: {}",
            e
        ))),
    }
}

/// Derive the DES key and IV from a password and salt
///
/// Iterated MD5 per PKCS#5 v1.5: the first 8 digest bytes are the key,
/// the next 8 the IV.
fn derive_key_iv(password: &str, salt: &[u8]) -> Result<([u8; 8], [u8; 8])> {
    let mut material = password.as_bytes().to_vec();
    material.extend_from_slice(salt);

    for _ in 0..KEY_ITERATIONS {
        material = hash(MessageDigest::md5(), &material)?.to_vec();
    }

    let mut key = [0u8; 8];
    let mut iv = [0u8; 8];
    key.copy_from_slice(&material[..8]);
    iv.copy_from_slice(&material[8..16]);

    Ok((key, iv))
}

/// Decrypt a PBEWithMD5AndDES token
///
/// `token` is the base64 payload without any `ENC(...)` wrapper. Fails on
/// malformed base64, short input, a wrong password (padding check), or
/// non-UTF-8 plaintext.
pub fn decrypt(token: &str, password: &str) -> Result<String> {
    ensure_legacy_provider()?;

    let raw = decode_block(token.trim())
        .map_err(|e| ConfigError::Decrypt(format!("invalid base64 token: {}", e)))?;

    if raw.len() < SALT_LEN {
        return Err(ConfigError::Decrypt(format!(
            "ciphertext too short: {} bytes",
            raw.len()
        )));
    }

    let (salt, ciphertext) = raw.split_at(SALT_LEN);
    let (key, iv) = derive_key_iv(password, salt)?;

    let plain = symm_decrypt(Cipher::des_cbc(), &key, Some(&iv), ciphertext)
        .map_err(|_| ConfigError::Decrypt("wrong password or corrupt ciphertext".to_string()))?;

    String::from_utf8(plain)
        .map_err(|_| ConfigError::Decrypt("decrypted payload is not valid UTF-8".to_string()))
}

/// Encrypt a plaintext into a PBEWithMD5AndDES token
///
/// Produces the base64 payload expected by [`decrypt`], with a fresh random
/// salt. Used by operator tooling and tests to produce `ENC(...)` values.
pub fn encrypt(plaintext: &str, password: &str) -> Result<String> {
    ensure_legacy_provider()?;

    let mut salt = [0u8; SALT_LEN];
    rand_bytes(&mut salt)?;

    let (key, iv) = derive_key_iv(password, &salt)?;

    let ciphertext = symm_encrypt(Cipher::des_cbc(), &key, Some(&iv), plaintext.as_bytes())?;

    let mut raw = salt.to_vec();
    raw.extend_from_slice(&ciphertext);

    Ok(encode_block(&raw))
}
