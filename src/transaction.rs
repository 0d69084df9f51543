//! Transaction wire decoding

use crate::address::{encode_address, AddressType, Network};
use crate::constants::*;
use crate::cursor::ByteCursor;
use crate::error::{CodecError, Result};
use crate::script::{classify, Script, ScriptClass};
use crate::types::*;
use crate::util::{double_sha256, to_display_hex};
use serde::{Deserialize, Serialize};

/// A transaction input: the outpoint being spent, the raw unlocking
/// script, and the sequence number.
///
/// The unlocking script is kept as raw bytes; coinbase scripts carry
/// arbitrary data and need not tokenize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub prevout: OutPoint,
    pub script_sig: ByteString,
    pub sequence: u32,
}

impl Input {
    /// Unlocking script as lowercase hex
    pub fn script_sig_hex(&self) -> String {
        hex::encode(&self.script_sig)
    }
}

/// A transaction output: value in the smallest currency unit and the
/// decoded locking script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub value: u64,
    pub script: Script,
}

impl Output {
    /// Classify the locking script against the standard output patterns
    pub fn script_class(&self) -> ScriptClass {
        classify(&self.script)
    }

    /// Render the output's address for a network, when the script is a
    /// classifiable key-hash or script-hash pattern
    pub fn address(&self, network: Network) -> Option<String> {
        match self.script_class() {
            ScriptClass::KeyHash { hash } => {
                encode_address(network, AddressType::KeyHash, &hash).ok()
            }
            ScriptClass::ScriptHash { hash } => {
                encode_address(network, AddressType::ScriptHash, &hash).ok()
            }
            ScriptClass::NullData | ScriptClass::Other => None,
        }
    }

    /// The pushed data chunks, if this is a null-data (OP_RETURN) output
    pub fn op_return_data(&self) -> Option<&[ByteString]> {
        match self.script_class() {
            ScriptClass::NullData => Some(self.script.chunks()),
            _ => None,
        }
    }

    /// Locking script as lowercase hex
    pub fn script_hex(&self) -> String {
        self.script.to_hex()
    }
}

/// A decoded transaction.
///
/// The txid is the double SHA-256 of exactly the bytes the transaction
/// occupied on the wire, computed at decode time; `block_hash` is set by
/// the block decoder for transactions found in blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub lock_time: u32,
    txid: Hash,
    length_match: bool,
    pub block_hash: Option<String>,
}

impl Transaction {
    /// Decode a standalone transaction from raw bytes.
    ///
    /// Trailing bytes after the transaction are not an error; they clear
    /// [`length_match`](Self::length_match) and are excluded from the
    /// txid, which always covers exactly the consumed span.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(bytes);
        let mut tx =
            Self::decode_at_cursor(&mut cursor).map_err(|e| CodecError::Transaction(Box::new(e)))?;
        tx.length_match = cursor.is_at_end();
        if !tx.length_match {
            log::warn!(
                "transaction {} decoded with {} trailing bytes",
                tx.txid_hex(),
                cursor.remaining()
            );
        }
        Ok(tx)
    }

    /// Decode the next transaction from a block's cursor, tagging it with
    /// the containing block hash
    pub(crate) fn decode_in_block(cursor: &mut ByteCursor<'_>, block_hash: &str) -> Result<Self> {
        let mut tx =
            Self::decode_at_cursor(cursor).map_err(|e| CodecError::Transaction(Box::new(e)))?;
        tx.block_hash = Some(block_hash.to_string());
        Ok(tx)
    }

    fn decode_at_cursor(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let start = cursor.position();
        let version = cursor.read_u32()?;

        let input_count = cursor.read_var_int()?;
        if input_count > (cursor.remaining() / MIN_INPUT_SIZE) as u64 {
            return Err(CodecError::OversizedLength {
                len: input_count,
                max: (cursor.remaining() / MIN_INPUT_SIZE) as u64,
            });
        }
        let mut inputs = Vec::with_capacity(input_count as usize);
        for _ in 0..input_count {
            inputs.push(Self::decode_input(cursor)?);
        }

        let output_count = cursor.read_var_int()?;
        if output_count > (cursor.remaining() / MIN_OUTPUT_SIZE) as u64 {
            return Err(CodecError::OversizedLength {
                len: output_count,
                max: (cursor.remaining() / MIN_OUTPUT_SIZE) as u64,
            });
        }
        let mut outputs = Vec::with_capacity(output_count as usize);
        for _ in 0..output_count {
            outputs.push(Self::decode_output(cursor)?);
        }

        let lock_time = cursor.read_u32()?;

        // the txid covers exactly the span this transaction occupied,
        // independent of anything decoded out of it
        let txid = double_sha256(cursor.span_from(start));

        Ok(Self {
            version,
            inputs,
            outputs,
            lock_time,
            txid,
            length_match: true,
            block_hash: None,
        })
    }

    fn decode_input(cursor: &mut ByteCursor<'_>) -> Result<Input> {
        let hash = cursor.read_hash()?;
        let index = cursor.read_u32()?;
        let script_len = Self::read_script_len(cursor)?;
        let script_sig = cursor.read_slice(script_len)?.to_vec();
        let sequence = cursor.read_u32()?;
        Ok(Input {
            prevout: OutPoint { hash, index },
            script_sig,
            sequence,
        })
    }

    fn decode_output(cursor: &mut ByteCursor<'_>) -> Result<Output> {
        let value = cursor.read_u64()?;
        let script_len = Self::read_script_len(cursor)?;
        let script = Script::parse(cursor.read_slice(script_len)?)?;
        Ok(Output { value, script })
    }

    /// Script length prefix, capped before it is ever used as an
    /// allocation size
    fn read_script_len(cursor: &mut ByteCursor<'_>) -> Result<usize> {
        let len = cursor.read_var_int()?;
        if len > MAX_SCRIPT_SIZE as u64 {
            return Err(CodecError::OversizedLength {
                len,
                max: MAX_SCRIPT_SIZE as u64,
            });
        }
        Ok(len as usize)
    }

    /// Transaction id: double SHA-256 of the serialized transaction,
    /// byte-reversed, lowercase hex
    pub fn txid_hex(&self) -> String {
        to_display_hex(&self.txid)
    }

    /// Transaction id in wire byte order
    pub fn txid(&self) -> &Hash {
        &self.txid
    }

    /// Whether the decode consumed the input buffer exactly
    pub fn length_match(&self) -> bool {
        self.length_match
    }

    /// Whether this transaction spends the null outpoint (a coinbase)
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1
            && self.inputs[0].prevout.hash == [0u8; 32]
            && self.inputs[0].prevout.index == 0xffffffff
    }
}
