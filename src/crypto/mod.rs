//! Cryptography module
//!
//! Password-based decryption of embedded configuration values and the
//! preprocessor stage that applies it before parsing.

pub mod pbe;
pub mod preprocess;

pub use preprocess::{PbeDecryptor, Preprocess};
