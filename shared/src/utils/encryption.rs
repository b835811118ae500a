//! Mock text "encryption" for demonstrations
//!
//! The ciphertext is simply the base64 encoding of `text + key`, and
//! decryption strips the key back out. This protects nothing and exists only
//! to drive the demo encrypt/decrypt panel.

use base64::prelude::*;
use thiserror::Error;

use crate::constants::DECRYPTION_FAILED_MESSAGE;

/// Encode `text` with `key` appended
///
/// Returns `None` when either argument is empty.
pub fn mock_encrypt(text: &str, key: &str) -> Option<String> {
    if text.is_empty() || key.is_empty() {
        return None;
    }

    Some(BASE64_STANDARD.encode(format!("{text}{key}")))
}

/// Why [`try_mock_decrypt`] could not produce plaintext
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptError {
    #[error("Both data and key are required")]
    MissingInput,

    #[error("{}", DECRYPTION_FAILED_MESSAGE)]
    Undecodable,
}

/// Decode data produced by [`mock_encrypt`] and remove the first `key`
pub fn try_mock_decrypt(data: &str, key: &str) -> Result<String, DecryptError> {
    if data.is_empty() || key.is_empty() {
        return Err(DecryptError::MissingInput);
    }

    let bytes = BASE64_STANDARD.decode(data.trim()).map_err(|e| {
        tracing::debug!("Mock decryption could not decode {} bytes: {}", data.len(), e);
        DecryptError::Undecodable
    })?;
    let text = String::from_utf8(bytes).map_err(|_| DecryptError::Undecodable)?;
    Ok(text.replacen(key, "", 1))
}

/// Like [`try_mock_decrypt`], but reports failure in-band
///
/// Returns `None` when either argument is empty. Any decoding failure yields
/// the fixed failure message rather than an error.
pub fn mock_decrypt(data: &str, key: &str) -> Option<String> {
    match try_mock_decrypt(data, key) {
        Ok(text) => Some(text),
        Err(DecryptError::MissingInput) => None,
        Err(DecryptError::Undecodable) => Some(DECRYPTION_FAILED_MESSAGE.to_string()),
    }
}
