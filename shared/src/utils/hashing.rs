//! Mock hash generation
//!
//! These helpers produce strings shaped like hex digests for display. They are
//! NOT cryptographic: the value is a 32-bit rolling fold of the input padded
//! with zeros, so collisions between distinct inputs are expected. Never use
//! them for integrity or security decisions.

use serde::{Deserialize, Serialize};

/// Digest names the mock hash knows how to size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[serde(rename = "MD5")]
    Md5,
    #[serde(rename = "SHA-1")]
    Sha1,
    #[serde(rename = "SHA-256")]
    Sha256,
    #[serde(rename = "SHA-512")]
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 4] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha512,
    ];

    /// Canonical display name, also the text folded into the hash
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Sha1 => "SHA-1",
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha512 => "SHA-512",
        }
    }

    /// Number of hex characters in the mock output
    pub fn hex_length(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 32,
            HashAlgorithm::Sha1 => 40,
            HashAlgorithm::Sha256 => 64,
            HashAlgorithm::Sha512 => 128,
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for HashAlgorithm {
    type Err = String;

    /// Accepts the canonical names case-insensitively, with or without the dash
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "").as_str() {
            "MD5" => Ok(HashAlgorithm::Md5),
            "SHA1" => Ok(HashAlgorithm::Sha1),
            "SHA256" => Ok(HashAlgorithm::Sha256),
            "SHA512" => Ok(HashAlgorithm::Sha512),
            _ => Err(format!("Unsupported hash algorithm: {s}")),
        }
    }
}

/// Hex length the mock hash targets for an algorithm name
///
/// Only the exact names `MD5`, `SHA-1` and `SHA-256` get shorter outputs;
/// anything else is sized like SHA-512.
pub fn target_length(algorithm: &str) -> usize {
    match algorithm {
        "MD5" => HashAlgorithm::Md5.hex_length(),
        "SHA-1" => HashAlgorithm::Sha1.hex_length(),
        "SHA-256" => HashAlgorithm::Sha256.hex_length(),
        _ => HashAlgorithm::Sha512.hex_length(),
    }
}

/// Fold a string into a signed 32-bit accumulator
///
/// `h = h * 31 + c` over UTF-16 code units with wrapping arithmetic.
fn fold(text: &str) -> i32 {
    text.encode_utf16().fold(0i32, |h, unit| {
        (h << 5).wrapping_sub(h).wrapping_add(i32::from(unit))
    })
}

/// Produce the mock digest of `input` for `algorithm`
///
/// The algorithm name is appended to the input before folding, so the same
/// input gives different strings per algorithm. The absolute value of the
/// accumulator is written in lowercase hex, right-padded with `0` and cut to
/// the target length.
pub fn mock_hash(input: &str, algorithm: &str) -> String {
    let h = fold(&format!("{input}{algorithm}"));
    let length = target_length(algorithm);

    let mut hex = format!("{:x}", i64::from(h).abs());
    if hex.len() < length {
        hex.push_str(&"0".repeat(length - hex.len()));
    }
    hex.truncate(length);
    hex
}

/// A mock digest labelled with its algorithm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockHash {
    pub algorithm: HashAlgorithm,
    pub value: String,
}

impl MockHash {
    pub fn compute(input: &str, algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            value: mock_hash(input, algorithm.name()),
        }
    }
}

/// Mock digests of `input` for every supported algorithm
///
/// Empty input yields no digests.
pub fn generate_hashes(input: &str) -> Vec<MockHash> {
    if input.is_empty() {
        return Vec::new();
    }

    HashAlgorithm::ALL
        .iter()
        .map(|algorithm| MockHash::compute(input, *algorithm))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        assert_eq!(mock_hash("abc", "MD5"), "54e6c224000000000000000000000000");
        assert_eq!(mock_hash("", "MD5"), "1297e000000000000000000000000000");
        assert_eq!(
            mock_hash("hello", "SHA-1"),
            "5ced126200000000000000000000000000000000"
        );
    }

    #[test]
    fn test_deterministic_and_shaped() {
        let first = mock_hash("abc", "MD5");
        let second = mock_hash("abc", "MD5");
        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
        assert!(first
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_arguments_change_output() {
        assert_ne!(mock_hash("abc", "MD5"), mock_hash("abd", "MD5"));
        assert_ne!(
            mock_hash("abc", "SHA-256")[..8],
            mock_hash("abc", "SHA-512")[..8]
        );
    }

    #[test]
    fn test_target_lengths() {
        assert_eq!(mock_hash("x", "MD5").len(), 32);
        assert_eq!(mock_hash("x", "SHA-1").len(), 40);
        assert_eq!(mock_hash("x", "SHA-256").len(), 64);
        assert_eq!(mock_hash("x", "SHA-512").len(), 128);
        assert_eq!(mock_hash("x", "whirlpool").len(), 128);
        // Names are matched exactly
        assert_eq!(mock_hash("x", "md5").len(), 128);
    }

    #[test]
    fn test_fold_wraps_to_i32() {
        // Long input overflows many times without panicking
        let long = "z".repeat(10_000);
        assert_eq!(mock_hash(&long, "MD5").len(), 32);
        assert_eq!(fold("abcMD5"), -1_424_409_124);
    }

    #[test]
    fn test_fold_uses_utf16_units() {
        // U+1F600 is a surrogate pair: two units folded separately
        let expected = {
            let h = 0xD83Di32;
            (h << 5).wrapping_sub(h).wrapping_add(0xDE00)
        };
        assert_eq!(fold("\u{1F600}"), expected);
    }

    #[test]
    fn test_generate_hashes() {
        assert!(generate_hashes("").is_empty());

        let hashes = generate_hashes("secret");
        assert_eq!(hashes.len(), 4);
        for hash in &hashes {
            assert_eq!(hash.value.len(), hash.algorithm.hex_length());
            assert_eq!(hash.value, mock_hash("secret", hash.algorithm.name()));
        }
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!("sha256".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha256));
        assert_eq!("SHA-1".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha1));
        assert!("crc32".parse::<HashAlgorithm>().is_err());
    }
}
