//! Hashing and hex boundary helpers

use crate::error::Result;
use crate::types::Hash;
use sha2::{Digest, Sha256};

/// Double SHA-256 (SHA-256 applied twice), the hash used for block hashes
/// and transaction ids
pub fn double_sha256(data: &[u8]) -> Hash {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut out = [0u8; 32];
    out.copy_from_slice(&second);
    out
}

/// Render a hash in the conventional display order: byte-reversed,
/// lowercase hex
pub fn to_display_hex(hash: &Hash) -> String {
    let mut reversed = *hash;
    reversed.reverse();
    hex::encode(reversed)
}

/// Parse a display-order hex hash back into wire byte order
pub fn from_display_hex(s: &str) -> Result<Hash> {
    let bytes = hex::decode(s)?;
    if bytes.len() != 32 {
        return Err(hex::FromHexError::InvalidStringLength.into());
    }
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&bytes);
    hash.reverse();
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_sha256() {
        // sha256d of the empty string, a fixed externally checkable value
        let hash = double_sha256(b"");
        assert_eq!(
            hex::encode(hash),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn test_display_hex_round_trip() {
        let mut hash = [0u8; 32];
        hash[0] = 0xab;
        hash[31] = 0x01;
        let displayed = to_display_hex(&hash);
        assert!(displayed.starts_with("01"));
        assert!(displayed.ends_with("ab"));
        assert_eq!(from_display_hex(&displayed).unwrap(), hash);
    }

    #[test]
    fn test_from_display_hex_rejects_bad_length() {
        assert!(from_display_hex("abcd").is_err());
    }
}
