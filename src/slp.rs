//! SLP token-metadata layer over OP_RETURN outputs
//!
//! Validates and builds Simple Ledger Protocol (token type 1) payloads.
//! This layer consumes only a script's token/chunk lists (the pairing
//! invariant of [`Script`] is its whole contract) and never inspects raw
//! script bytes.

use crate::script::{null_data, Opcode, Script, Token, ZeroPush};
use crate::types::Hash;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `SLP\0`, the lokad id opening every SLP payload
const LOKAD_ID: &[u8; 4] = b"SLP\0";

/// Ways an OP_RETURN script can fail SLP validation.
///
/// Returned, not thrown: callers distinguish "not an SLP script" from
/// "valid" without unwinding through the decoder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlpScriptError {
    #[error("script is not an op_return")]
    NotOpReturn,
    #[error("wrong lokad id: expected 4-byte 'SLP\\0', received {0} bytes")]
    WrongLokadId(usize),
    #[error("missing or malformed token type (expected 1 or 2 bytes with value 1)")]
    UnsupportedTokenType,
    #[error("missing SLP command chunk")]
    MissingCommand,
    #[error("SLP command is not 4-7 ascii characters")]
    MalformedCommand,
    #[error("unknown SLP command '{0}'")]
    UnknownCommand(String),
    #[error("wrong chunk count for {command}: expected {expected}, received {received}")]
    WrongChunkCount {
        command: &'static str,
        expected: &'static str,
        received: usize,
    },
    #[error("field {field} has invalid length {len}")]
    BadFieldLength { field: &'static str, len: usize },
    #[error("decimals must be 0-9, received {0}")]
    BadDecimals(u8),
    #[error("mint baton vout must be 0x02-0xff, received {0}")]
    BadMintBatonVout(u8),
    #[error("SEND requires 1-19 output quantities, received {0}")]
    BadSendQuantityCount(usize),
    #[error("assembled payload exceeds the script size limit")]
    PayloadTooLarge,
}

pub type SlpResult<T> = std::result::Result<T, SlpScriptError>;

/// A validated SLP token-type-1 message, one variant per transaction
/// kind, carrying only the fields defined for that kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlpMessage {
    Genesis {
        ticker: Vec<u8>,
        name: Vec<u8>,
        document_url: Vec<u8>,
        /// Empty, or a 32-byte document hash
        document_hash: Vec<u8>,
        decimals: u8,
        /// 0 when no baton output exists
        mint_baton_vout: u8,
        initial_quantity: u64,
    },
    Mint {
        token_id: Hash,
        mint_baton_vout: u8,
        additional_quantity: u64,
    },
    Send {
        token_id: Hash,
        quantities: Vec<u64>,
    },
    Commit {
        token_id: Hash,
        block_hash: Hash,
        block_height: u64,
        set_hash: Hash,
        set_url: Vec<u8>,
    },
}

/// Chunk layout shared by every message: lokad id, token type, command
const HEADER_CHUNKS: usize = 3;

/// Parse and validate an SLP script.
///
/// Field constraints follow the token-type-1 document: token ids and set
/// hashes are 32 bytes, quantities and heights 8-byte integers, decimals
/// 0-9, a mint baton vout of 1 is never valid.
pub fn parse_slp_script(script: &Script) -> SlpResult<SlpMessage> {
    let chunks = validate_header(script)?;

    let command = &chunks[2];
    if command.len() < 4 || command.len() > 7 || command.iter().any(|&b| b > 127) {
        return Err(SlpScriptError::MalformedCommand);
    }

    match command.as_slice() {
        b"GENESIS" => parse_genesis(chunks),
        b"MINT" => parse_mint(chunks),
        b"SEND" => parse_send(chunks),
        b"COMMIT" => parse_commit(chunks),
        other => Err(SlpScriptError::UnknownCommand(
            String::from_utf8_lossy(other).into_owned(),
        )),
    }
}

/// Check the OP_RETURN header: lokad id `SLP\0` and token type 1
fn validate_header(script: &Script) -> SlpResult<&[Vec<u8>]> {
    if !matches!(script.tokens().first(), Some(Token::Code(Opcode::OpReturn))) {
        return Err(SlpScriptError::NotOpReturn);
    }

    let chunks = script.chunks();
    let lokad = chunks.first().ok_or(SlpScriptError::WrongLokadId(0))?;
    if lokad.len() != 4 {
        return Err(SlpScriptError::WrongLokadId(lokad.len()));
    }
    if lokad.as_slice() != LOKAD_ID {
        return Err(SlpScriptError::WrongLokadId(lokad.len()));
    }

    let token_type = chunks.get(1).ok_or(SlpScriptError::UnsupportedTokenType)?;
    let type_value = match token_type.as_slice() {
        [value] => u16::from(*value),
        [hi, lo] => u16::from_be_bytes([*hi, *lo]),
        _ => return Err(SlpScriptError::UnsupportedTokenType),
    };
    if type_value != 1 {
        return Err(SlpScriptError::UnsupportedTokenType);
    }

    if chunks.len() < HEADER_CHUNKS {
        return Err(SlpScriptError::MissingCommand);
    }

    Ok(chunks)
}

fn parse_genesis(chunks: &[Vec<u8>]) -> SlpResult<SlpMessage> {
    if chunks.len() != 10 {
        return Err(SlpScriptError::WrongChunkCount {
            command: "GENESIS",
            expected: "10",
            received: chunks.len(),
        });
    }

    let document_hash = &chunks[6];
    if document_hash.len() != 0 && document_hash.len() != 32 {
        return Err(SlpScriptError::BadFieldLength {
            field: "document_hash",
            len: document_hash.len(),
        });
    }
    let decimals = single_byte(&chunks[7], "decimals")?;
    if decimals > 9 {
        return Err(SlpScriptError::BadDecimals(decimals));
    }
    let mint_baton_vout = baton_vout(&chunks[8])?;
    let initial_quantity = quantity(&chunks[9], "initial_quantity")?;

    Ok(SlpMessage::Genesis {
        ticker: chunks[3].clone(),
        name: chunks[4].clone(),
        document_url: chunks[5].clone(),
        document_hash: document_hash.clone(),
        decimals,
        mint_baton_vout,
        initial_quantity,
    })
}

fn parse_mint(chunks: &[Vec<u8>]) -> SlpResult<SlpMessage> {
    if chunks.len() != 6 {
        return Err(SlpScriptError::WrongChunkCount {
            command: "MINT",
            expected: "6",
            received: chunks.len(),
        });
    }

    Ok(SlpMessage::Mint {
        token_id: hash_field(&chunks[3], "token_id")?,
        mint_baton_vout: baton_vout(&chunks[4])?,
        additional_quantity: quantity(&chunks[5], "additional_quantity")?,
    })
}

fn parse_send(chunks: &[Vec<u8>]) -> SlpResult<SlpMessage> {
    if chunks.len() < 5 || chunks.len() > 23 {
        return Err(SlpScriptError::WrongChunkCount {
            command: "SEND",
            expected: "5-23",
            received: chunks.len(),
        });
    }

    let token_id = hash_field(&chunks[3], "token_id")?;
    let mut quantities = Vec::with_capacity(chunks.len() - 4);
    for chunk in &chunks[4..] {
        quantities.push(quantity(chunk, "output_quantity")?);
    }

    Ok(SlpMessage::Send {
        token_id,
        quantities,
    })
}

fn parse_commit(chunks: &[Vec<u8>]) -> SlpResult<SlpMessage> {
    if chunks.len() != 8 {
        return Err(SlpScriptError::WrongChunkCount {
            command: "COMMIT",
            expected: "8",
            received: chunks.len(),
        });
    }

    Ok(SlpMessage::Commit {
        token_id: hash_field(&chunks[3], "token_id")?,
        block_hash: hash_field(&chunks[4], "block_hash")?,
        block_height: quantity(&chunks[5], "block_height")?,
        set_hash: hash_field(&chunks[6], "set_hash")?,
        set_url: chunks[7].clone(),
    })
}

fn single_byte(chunk: &[u8], field: &'static str) -> SlpResult<u8> {
    match chunk {
        [value] => Ok(*value),
        _ => Err(SlpScriptError::BadFieldLength {
            field,
            len: chunk.len(),
        }),
    }
}

/// Baton vout: absent (empty chunk) means no baton; 0 and 1 are reserved
fn baton_vout(chunk: &[u8]) -> SlpResult<u8> {
    match chunk {
        [] => Ok(0),
        [vout] if *vout >= 2 => Ok(*vout),
        [vout] => Err(SlpScriptError::BadMintBatonVout(*vout)),
        _ => Err(SlpScriptError::BadFieldLength {
            field: "mint_baton_vout",
            len: chunk.len(),
        }),
    }
}

fn quantity(chunk: &[u8], field: &'static str) -> SlpResult<u64> {
    let bytes: [u8; 8] = chunk
        .try_into()
        .map_err(|_| SlpScriptError::BadFieldLength {
            field,
            len: chunk.len(),
        })?;
    Ok(u64::from_le_bytes(bytes))
}

fn hash_field(chunk: &[u8], field: &'static str) -> SlpResult<Hash> {
    chunk.try_into().map_err(|_| SlpScriptError::BadFieldLength {
        field,
        len: chunk.len(),
    })
}

/// The `SLP\0` + token type 1 + command chunks every builder starts with
fn header_chunks(command: &'static [u8]) -> Vec<Vec<u8>> {
    vec![LOKAD_ID.to_vec(), vec![0x01], command.to_vec()]
}

fn build(chunks: Vec<Vec<u8>>) -> SlpResult<Script> {
    let refs: Vec<&[u8]> = chunks.iter().map(|c| c.as_slice()).collect();
    // empty fields must stay countable pushes, so OP_0 is never used here
    null_data(&refs, ZeroPush::PushData1).map_err(|_| SlpScriptError::PayloadTooLarge)
}

/// Build a GENESIS script announcing a new token
pub fn genesis_script(
    ticker: &[u8],
    name: &[u8],
    document_url: &[u8],
    document_hash: &[u8],
    decimals: u8,
    mint_baton_vout: u8,
    initial_quantity: u64,
) -> SlpResult<Script> {
    if document_hash.len() != 0 && document_hash.len() != 32 {
        return Err(SlpScriptError::BadFieldLength {
            field: "document_hash",
            len: document_hash.len(),
        });
    }
    if decimals > 9 {
        return Err(SlpScriptError::BadDecimals(decimals));
    }
    if mint_baton_vout == 1 {
        return Err(SlpScriptError::BadMintBatonVout(1));
    }

    let mut chunks = header_chunks(b"GENESIS");
    chunks.push(ticker.to_vec());
    chunks.push(name.to_vec());
    chunks.push(document_url.to_vec());
    chunks.push(document_hash.to_vec());
    chunks.push(vec![decimals]);
    chunks.push(if mint_baton_vout == 0 {
        Vec::new()
    } else {
        vec![mint_baton_vout]
    });
    chunks.push(initial_quantity.to_le_bytes().to_vec());
    build(chunks)
}

/// Build a MINT script issuing additional supply of a token
pub fn mint_script(
    token_id: &Hash,
    mint_baton_vout: u8,
    additional_quantity: u64,
) -> SlpResult<Script> {
    if mint_baton_vout == 1 {
        return Err(SlpScriptError::BadMintBatonVout(1));
    }

    let mut chunks = header_chunks(b"MINT");
    chunks.push(token_id.to_vec());
    chunks.push(if mint_baton_vout == 0 {
        Vec::new()
    } else {
        vec![mint_baton_vout]
    });
    chunks.push(additional_quantity.to_le_bytes().to_vec());
    build(chunks)
}

/// Build a SEND script moving token quantities onto 1-19 outputs
pub fn send_script(token_id: &Hash, quantities: &[u64]) -> SlpResult<Script> {
    if quantities.is_empty() || quantities.len() > 19 {
        return Err(SlpScriptError::BadSendQuantityCount(quantities.len()));
    }

    let mut chunks = header_chunks(b"SEND");
    chunks.push(token_id.to_vec());
    for quantity in quantities {
        chunks.push(quantity.to_le_bytes().to_vec());
    }
    build(chunks)
}

/// Build a COMMIT script anchoring a token transaction set to a block
pub fn commit_script(
    token_id: &Hash,
    block_hash: &Hash,
    block_height: u64,
    set_hash: &Hash,
    set_url: &[u8],
) -> SlpResult<Script> {
    let mut chunks = header_chunks(b"COMMIT");
    chunks.push(token_id.to_vec());
    chunks.push(block_hash.to_vec());
    chunks.push(block_height.to_le_bytes().to_vec());
    chunks.push(set_hash.to_vec());
    chunks.push(set_url.to_vec());
    build(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_round_trip() {
        let script = genesis_script(b"TKN", b"Test Token", b"https://example.com", &[], 2, 2, 1_000)
            .unwrap();
        let message = parse_slp_script(&script).unwrap();
        assert_eq!(
            message,
            SlpMessage::Genesis {
                ticker: b"TKN".to_vec(),
                name: b"Test Token".to_vec(),
                document_url: b"https://example.com".to_vec(),
                document_hash: Vec::new(),
                decimals: 2,
                mint_baton_vout: 2,
                initial_quantity: 1_000,
            }
        );
    }

    #[test]
    fn test_mint_round_trip() {
        let token_id = [0xaa; 32];
        let script = mint_script(&token_id, 0, 500).unwrap();
        let message = parse_slp_script(&script).unwrap();
        assert_eq!(
            message,
            SlpMessage::Mint {
                token_id,
                mint_baton_vout: 0,
                additional_quantity: 500,
            }
        );
    }

    #[test]
    fn test_send_round_trip() {
        let token_id = [0xbb; 32];
        let script = send_script(&token_id, &[1, 2, 3]).unwrap();
        let message = parse_slp_script(&script).unwrap();
        assert_eq!(
            message,
            SlpMessage::Send {
                token_id,
                quantities: vec![1, 2, 3],
            }
        );
    }

    #[test]
    fn test_commit_round_trip() {
        let script = commit_script(&[0x01; 32], &[0x02; 32], 635_000, &[0x03; 32], b"https://example.com/set")
            .unwrap();
        let message = parse_slp_script(&script).unwrap();
        assert!(matches!(
            message,
            SlpMessage::Commit {
                block_height: 635_000,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_non_op_return() {
        let script = crate::script::pay_to_key_hash(&[0u8; 20]).unwrap();
        assert_eq!(
            parse_slp_script(&script),
            Err(SlpScriptError::NotOpReturn)
        );
    }

    #[test]
    fn test_rejects_wrong_lokad_id() {
        let script = null_data(
            &[b"SLP1".as_slice(), b"\x01".as_slice(), b"SEND".as_slice()],
            ZeroPush::PushData1,
        )
        .unwrap();
        assert_eq!(
            parse_slp_script(&script),
            Err(SlpScriptError::WrongLokadId(4))
        );
    }

    #[test]
    fn test_rejects_unknown_command() {
        let script = null_data(
            &[b"SLP\0".as_slice(), b"\x01".as_slice(), b"BURN".as_slice()],
            ZeroPush::PushData1,
        )
        .unwrap();
        assert_eq!(
            parse_slp_script(&script),
            Err(SlpScriptError::UnknownCommand("BURN".to_string()))
        );
    }

    #[test]
    fn test_rejects_bad_decimals() {
        let script = genesis_script(b"T", b"T", b"", &[], 3, 0, 1);
        assert!(script.is_ok());
        assert_eq!(
            genesis_script(b"T", b"T", b"", &[], 10, 0, 1),
            Err(SlpScriptError::BadDecimals(10))
        );
    }

    #[test]
    fn test_rejects_baton_vout_one() {
        assert_eq!(
            mint_script(&[0u8; 32], 1, 10),
            Err(SlpScriptError::BadMintBatonVout(1))
        );
    }

    #[test]
    fn test_rejects_send_quantity_counts() {
        assert!(send_script(&[0u8; 32], &[]).is_err());
        assert!(send_script(&[0u8; 32], &vec![1u64; 19]).is_ok());
        assert!(send_script(&[0u8; 32], &vec![1u64; 20]).is_err());
    }

    #[test]
    fn test_rejects_short_token_id() {
        let quantity = 1u64.to_le_bytes();
        let script = null_data(
            &[
                b"SLP\0".as_slice(),
                b"\x01".as_slice(),
                b"MINT".as_slice(),
                b"short".as_slice(),
                b"".as_slice(),
                quantity.as_slice(),
            ],
            ZeroPush::PushData1,
        )
        .unwrap();
        assert_eq!(
            parse_slp_script(&script),
            Err(SlpScriptError::BadFieldLength {
                field: "token_id",
                len: 5,
            })
        );
    }

    #[test]
    fn test_rejects_wrong_token_type() {
        let script = null_data(
            &[b"SLP\0".as_slice(), b"\x02".as_slice(), b"SEND".as_slice()],
            ZeroPush::PushData1,
        )
        .unwrap();
        assert_eq!(
            parse_slp_script(&script),
            Err(SlpScriptError::UnsupportedTokenType)
        );
    }

    #[test]
    fn test_accepts_two_byte_token_type() {
        let token_id = [0xcc; 32];
        let chunks: Vec<Vec<u8>> = vec![
            LOKAD_ID.to_vec(),
            vec![0x00, 0x01],
            b"SEND".to_vec(),
            token_id.to_vec(),
            7u64.to_le_bytes().to_vec(),
        ];
        let refs: Vec<&[u8]> = chunks.iter().map(|c| c.as_slice()).collect();
        let script = null_data(&refs, ZeroPush::PushData1).unwrap();
        let message = parse_slp_script(&script).unwrap();
        assert_eq!(
            message,
            SlpMessage::Send {
                token_id,
                quantities: vec![7],
            }
        );
    }
}
