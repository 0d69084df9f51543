//! Error types for wire and address decoding

use thiserror::Error;

/// Everything that can go wrong while decoding chain data.
///
/// Leaf variants identify the exact structural violation; the stage
/// variants at the bottom wrap a leaf (or another stage) so a failure
/// surfaces as "error decoding block" with the root cause preserved in the
/// source chain.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("read of {wanted} bytes at offset {offset} overruns buffer ({available} available)")]
    UnexpectedEnd {
        offset: usize,
        wanted: usize,
        available: usize,
    },

    #[error("length prefix {len} exceeds limit {max}")]
    OversizedLength { len: u64, max: u64 },

    #[error("non-minimal varint encoding for value {0}")]
    NonMinimalVarInt(u64),

    #[error("unknown opcode 0x{byte:02x} at offset {offset}")]
    UnknownOpcode { byte: u8, offset: usize },

    #[error("character '{0}' is not in the base32 alphabet")]
    InvalidBase32Char(char),

    #[error("'{0}' is not a known network prefix")]
    InvalidPrefix(String),

    #[error("address checksum mismatch")]
    ChecksumMismatch,

    #[error("non-zero padding bits in base32 payload")]
    InvalidPadding,

    #[error("bit group {0} out of range for width {1}")]
    InvalidBitGroup(u8, u32),

    #[error("invalid address version byte 0x{0:02x}")]
    InvalidVersionByte(u8),

    #[error("hash length {len} does not match the version byte (expected {expected})")]
    HashLengthMismatch { len: usize, expected: usize },

    #[error("hash length {0} is not an encodable size")]
    UnsupportedHashLength(usize),

    #[error("header chain length {0} is not a multiple of 80")]
    RaggedHeaderChain(usize),

    #[error("cannot build a merkle root from zero leaves")]
    EmptyMerkleLeaves,

    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("error decoding block header")]
    Header(#[source] Box<CodecError>),

    #[error("error decoding block")]
    Block(#[source] Box<CodecError>),

    #[error("error decoding transaction")]
    Transaction(#[source] Box<CodecError>),

    #[error("error decoding script")]
    Script(#[source] Box<CodecError>),

    #[error("error decoding cash address")]
    Address(#[source] Box<CodecError>),
}

impl CodecError {
    /// Innermost error in a chain of stage wrappers
    pub fn root_cause(&self) -> &CodecError {
        match self {
            CodecError::Header(inner)
            | CodecError::Block(inner)
            | CodecError::Transaction(inner)
            | CodecError::Script(inner)
            | CodecError::Address(inner) => inner.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_wrapping_preserves_root_cause() {
        let leaf = CodecError::UnexpectedEnd {
            offset: 3,
            wanted: 4,
            available: 1,
        };
        let wrapped = CodecError::Block(Box::new(CodecError::Transaction(Box::new(leaf))));
        assert_eq!(wrapped.to_string(), "error decoding block");
        assert!(matches!(
            wrapped.root_cause(),
            CodecError::UnexpectedEnd { offset: 3, .. }
        ));
    }
}
