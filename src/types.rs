//! Core wire types shared across the decoders

use serde::{Deserialize, Serialize};

/// Hash type: 256-bit hash in wire (internal) byte order
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Reference to the output being spent: previous transaction hash and
/// output index, exactly as serialized at the front of every input
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub hash: Hash,
    pub index: u32,
}
