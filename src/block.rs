//! Block and block-header wire decoding

use crate::constants::*;
use crate::cursor::ByteCursor;
use crate::error::{CodecError, Result};
use crate::transaction::Transaction;
use crate::types::Hash;
use crate::util::{double_sha256, to_display_hex};
use serde::{Deserialize, Serialize};

/// A decoded 80-byte block header.
///
/// Hashes are stored in wire byte order; the `_hex` accessors apply the
/// byte-reversed display convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: u32,
    pub prev_hash: Hash,
    pub merkle_root: Hash,
    pub timestamp: u32,
    pub bits: u32,
    pub nonce: u32,
    hash: Hash,
    length_match: bool,
}

impl BlockHeader {
    /// Decode a raw block header.
    ///
    /// Exactly 80 bytes are consumed; a longer buffer is tolerated but
    /// clears [`length_match`](Self::length_match). The block hash is the
    /// double SHA-256 of the 80 consumed bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::decode_inner(bytes).map_err(|e| CodecError::Header(Box::new(e)))
    }

    fn decode_inner(bytes: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(bytes);

        let version = cursor.read_u32()?;
        let prev_hash = cursor.read_hash()?;
        let merkle_root = cursor.read_hash()?;
        let timestamp = cursor.read_u32()?;
        let bits = cursor.read_u32()?;
        let nonce = cursor.read_u32()?;

        let length_match = cursor.is_at_end();
        let hash = double_sha256(&bytes[..HEADER_SIZE]);

        Ok(Self {
            version,
            prev_hash,
            merkle_root,
            timestamp,
            bits,
            nonce,
            hash,
            length_match,
        })
    }

    /// Block hash, display convention
    pub fn hash_hex(&self) -> String {
        to_display_hex(&self.hash)
    }

    /// Previous block hash, display convention
    pub fn prev_hash_hex(&self) -> String {
        to_display_hex(&self.prev_hash)
    }

    /// Merkle root, display convention
    pub fn merkle_root_hex(&self) -> String {
        to_display_hex(&self.merkle_root)
    }

    /// Whether the input buffer was exactly 80 bytes
    pub fn length_match(&self) -> bool {
        self.length_match
    }
}

/// Decode a batch of concatenated 80-byte headers, as returned by node
/// header APIs
pub fn decode_header_chain(bytes: &[u8]) -> Result<Vec<BlockHeader>> {
    if bytes.len() % HEADER_SIZE != 0 {
        return Err(CodecError::RaggedHeaderChain(bytes.len()));
    }
    bytes.chunks(HEADER_SIZE).map(BlockHeader::decode).collect()
}

/// A decoded block: header plus transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
    pub size: u32,
    length_match: bool,
}

impl Block {
    /// Decode a raw block: 80-byte header, VarInt transaction count, then
    /// the transactions back to back.
    ///
    /// Each transaction's txid is computed over exactly the span it
    /// occupied, and each carries the containing block hash. Trailing
    /// bytes after the last transaction are tolerated but clear
    /// [`length_match`](Self::length_match); rejecting them is the
    /// caller's decision.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::decode_inner(bytes).map_err(|e| CodecError::Block(Box::new(e)))
    }

    fn decode_inner(bytes: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(bytes);

        let header = BlockHeader::decode(cursor.read_slice(HEADER_SIZE)?)?;
        let block_hash = header.hash_hex();

        let tx_count = cursor.read_var_int()?;
        if tx_count > (cursor.remaining() / MIN_TX_SIZE) as u64 {
            return Err(CodecError::OversizedLength {
                len: tx_count,
                max: (cursor.remaining() / MIN_TX_SIZE) as u64,
            });
        }

        let mut transactions = Vec::with_capacity(tx_count as usize);
        for _ in 0..tx_count {
            transactions.push(Transaction::decode_in_block(&mut cursor, &block_hash)?);
        }

        let length_match = cursor.is_at_end();
        if !length_match {
            log::warn!(
                "block {} decoded with {} trailing bytes",
                block_hash,
                cursor.remaining()
            );
        }
        log::debug!(
            "decoded block {} ({} transactions, {} bytes)",
            block_hash,
            transactions.len(),
            bytes.len()
        );

        Ok(Self {
            header,
            transactions,
            size: bytes.len() as u32,
            length_match,
        })
    }

    /// Block hash, display convention
    pub fn block_hash(&self) -> String {
        self.header.hash_hex()
    }

    /// Whether the decode consumed the input buffer exactly
    pub fn length_match(&self) -> bool {
        self.length_match
    }
}
