//! Document preprocessors
//!
//! Preprocessors rewrite the raw document bytes before structural parsing.
//! The loader runs them as an ordered pipeline and aborts on the first
//! failure, so a stage that rejects its input stops a partially rewritten
//! document from ever reaching the parser.

use log::debug;
use regex::bytes::Regex;

use crate::common::{ConfigError, Result};
use crate::config::sections::EncryptorSection;
use crate::crypto::pbe;

/// A single text-level rewrite stage in the load pipeline
pub trait Preprocess {
    /// Stage name used for error context
    fn name(&self) -> &'static str;

    /// Rewrite the document bytes, or fail the whole load
    fn apply(&self, data: Vec<u8>) -> Result<Vec<u8>>;
}

/// Decrypt-and-replace stage for `ENC(...)`-style encrypted tokens
///
/// Scans the document for `prefix + payload + suffix` occurrences and
/// replaces each with the PBE decryption of the payload. A document with no
/// tokens passes through unchanged; the first token that fails to decrypt
/// aborts the whole pass.
pub struct PbeDecryptor {
    password: String,
    prefix: String,
    suffix: String,
}

impl PbeDecryptor {
    pub fn new(
        password: impl Into<String>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            password: password.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Build a decryptor from a completed encryptor section
    pub fn from_section(section: &EncryptorSection) -> Self {
        Self::new(
            section.password.clone(),
            section.property_prefix.clone(),
            section.property_suffix.clone(),
        )
    }

    fn token_pattern(&self) -> Regex {
        // Lazy payload match so several tokens on one line are each
        // substituted; the payload never crosses a line break, so a stray
        // unterminated prefix stays inert instead of swallowing the rest of
        // the document. regex::escape output is always a valid pattern.
        let pattern = format!(
            "{}(.*?){}",
            regex::escape(&self.prefix),
            regex::escape(&self.suffix)
        );
        Regex::new(&pattern).expect("escaped delimiter pattern is valid")
    }
}

impl Preprocess for PbeDecryptor {
    fn name(&self) -> &'static str {
        "pbe_with_md5_and_des"
    }

    fn apply(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        let re = self.token_pattern();

        let mut out = Vec::with_capacity(data.len());
        let mut last_end = 0;
        let mut replaced = 0usize;

        for caps in re.captures_iter(&data) {
            let whole = caps.get(0).expect("match group 0 always present");
            let payload = caps.get(1).expect("payload group always present");

            let token = std::str::from_utf8(payload.as_bytes()).map_err(|_| {
                ConfigError::Decrypt("encrypted token is not valid UTF-8".to_string())
            })?;
            let plain = pbe::decrypt(token, &self.password)?;

            out.extend_from_slice(&data[last_end..whole.start()]);
            out.extend_from_slice(plain.as_bytes());
            last_end = whole.end();
            replaced += 1;
        }

        if replaced == 0 {
            return Ok(data);
        }

        out.extend_from_slice(&data[last_end..]);
        debug!("decrypted {} embedded token(s)", replaced);

        Ok(out)
    }
}
