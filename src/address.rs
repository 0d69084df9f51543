//! Cash address codec: base32 alphabet, bit repacking, and the 40-bit
//! BCH checksum
//!
//! <https://www.bitcoincash.org/spec/cashaddr.html>

use crate::error::{CodecError, Result};
use crate::types::ByteString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Character set for the address payload
const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Generator polynomial constants for the checksum
const GENERATOR: [u64; 5] = [
    0x98f2bc8e61,
    0x79b76d99e2,
    0xf33e5fb3c4,
    0xae2eabe2a8,
    0x1e4f43e470,
];

/// Number of trailing 5-bit checksum groups in every address
const CHECKSUM_GROUPS: usize = 8;

/// Network an address belongs to, selecting its human-readable prefix and
/// checksum seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Network {
    Mainnet,
    Testnet,
    Regtest,
}

impl Network {
    /// The prefix written before the colon
    pub fn prefix(&self) -> &'static str {
        match self {
            Network::Mainnet => "bitcoincash",
            Network::Testnet => "bchtest",
            Network::Regtest => "bchreg",
        }
    }

    /// Reverse prefix lookup; `None` for anything not enumerated
    pub fn from_prefix(prefix: &str) -> Option<Network> {
        match prefix {
            "bitcoincash" => Some(Network::Mainnet),
            "bchtest" => Some(Network::Testnet),
            "bchreg" => Some(Network::Regtest),
            _ => None,
        }
    }

    /// Checksum accumulator state after the prefix characters and the zero
    /// separator group, precomputed per network so the checksum loop only
    /// ever runs over payload groups
    fn checksum_seed(&self) -> u64 {
        match self {
            Network::Mainnet => 1058337025301,
            Network::Testnet => 584719417569,
            Network::Regtest => 36616869088,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Script type carried in an address version byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressType {
    /// Pay-to-key-hash; type bits 0
    KeyHash,
    /// Pay-to-script-hash; type bits 8
    ScriptHash,
}

impl AddressType {
    fn type_bits(&self) -> u8 {
        match self {
            AddressType::KeyHash => 0,
            AddressType::ScriptHash => 8,
        }
    }
}

/// A decoded address: network, script type, and the raw hash payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedAddress {
    pub network: Network,
    pub kind: AddressType,
    pub hash: ByteString,
}

/// Size-class bits for a hash payload length; the allowed lengths are
/// fixed by the format
fn size_class(len: usize) -> Option<u8> {
    match len {
        20 => Some(0),
        24 => Some(1),
        28 => Some(2),
        32 => Some(3),
        40 => Some(4),
        48 => Some(5),
        56 => Some(6),
        64 => Some(7),
        _ => None,
    }
}

/// Inverse of [`size_class`]
fn hash_len_for_class(class: u8) -> usize {
    [20, 24, 28, 32, 40, 48, 56, 64][class as usize]
}

/// Repack a stream of `from`-width bit groups into `to`-width groups,
/// most-significant bits first.
///
/// Non-strict mode pads a trailing partial group with zero bits on the
/// right (used when encoding, 8→5). Strict mode refuses to emit a partial
/// group and rejects non-zero leftover bits as corrupt input (used when
/// decoding, 5→8).
pub fn convert_bits(data: &[u8], from: u32, to: u32, strict: bool) -> Result<Vec<u8>> {
    let mask: u32 = (1 << to) - 1;
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);

    for &value in data {
        if u32::from(value) >> from != 0 {
            return Err(CodecError::InvalidBitGroup(value, from));
        }
        acc = (acc << from) | u32::from(value);
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & mask) as u8);
        }
    }

    if strict {
        if bits >= from || ((acc << (to - bits)) & mask) != 0 {
            return Err(CodecError::InvalidPadding);
        }
    } else if bits > 0 {
        out.push(((acc << (to - bits)) & mask) as u8);
    }

    Ok(out)
}

/// Checksum function over 5-bit groups.
///
/// 40-bit accumulator: per group, take the top 5 accumulator bits, shift
/// the low 35 bits up by 5, XOR in the group, then XOR in each generator
/// whose bit was set in the saved top bits. The final accumulator is
/// folded with `^ 1`; a valid address run through this (checksum groups
/// included) yields exactly 0.
pub fn poly_mod(groups: &[u8], seed: u64) -> u64 {
    let mut acc = seed;
    for &group in groups {
        let top = acc >> 35;
        acc = ((acc & 0x07_ffff_ffff) << 5) ^ u64::from(group);
        for (bit, generator) in GENERATOR.iter().enumerate() {
            if (top >> bit) & 1 == 1 {
                acc ^= generator;
            }
        }
    }
    acc ^ 1
}

/// The 8 checksum groups for a payload under a network prefix
fn create_checksum(payload: &[u8], network: Network) -> [u8; CHECKSUM_GROUPS] {
    let mut template = payload.to_vec();
    template.extend_from_slice(&[0u8; CHECKSUM_GROUPS]);
    let checksum = poly_mod(&template, network.checksum_seed());

    let mut groups = [0u8; CHECKSUM_GROUPS];
    for (i, group) in groups.iter_mut().enumerate() {
        *group = ((checksum >> (5 * (7 - i))) & 0x1f) as u8;
    }
    groups
}

/// Encode a hash payload as an address string for the given network and
/// script type.
///
/// The hash length must be one of the eight sizes the version byte can
/// express; anything else is rejected.
pub fn encode_address(network: Network, kind: AddressType, hash: &[u8]) -> Result<String> {
    encode_inner(network, kind, hash).map_err(|e| CodecError::Address(Box::new(e)))
}

fn encode_inner(network: Network, kind: AddressType, hash: &[u8]) -> Result<String> {
    let size_bits =
        size_class(hash.len()).ok_or(CodecError::UnsupportedHashLength(hash.len()))?;
    let version_byte = kind.type_bits() + size_bits;

    let mut data = vec![version_byte];
    data.extend_from_slice(hash);
    let mut payload = convert_bits(&data, 8, 5, false)?;

    let checksum = create_checksum(&payload, network);
    payload.extend_from_slice(&checksum);

    let mut encoded = String::with_capacity(network.prefix().len() + 1 + payload.len());
    encoded.push_str(network.prefix());
    encoded.push(':');
    for group in payload {
        encoded.push(CHARSET[group as usize] as char);
    }
    Ok(encoded)
}

/// Decode an address string into network, script type, and hash.
///
/// The checksum is fully verified; any altered character fails before the
/// payload is looked at.
pub fn decode_address(address: &str) -> Result<DecodedAddress> {
    decode_inner(address).map_err(|e| CodecError::Address(Box::new(e)))
}

fn decode_inner(address: &str) -> Result<DecodedAddress> {
    let address = address.to_lowercase();
    let (prefix, payload) = address
        .split_once(':')
        .ok_or_else(|| CodecError::InvalidPrefix(address.clone()))?;
    let network =
        Network::from_prefix(prefix).ok_or_else(|| CodecError::InvalidPrefix(prefix.to_string()))?;

    let mut groups = Vec::with_capacity(payload.len());
    for c in payload.chars() {
        let index = CHARSET
            .iter()
            .position(|&d| d as char == c)
            .ok_or(CodecError::InvalidBase32Char(c))?;
        groups.push(index as u8);
    }

    if groups.len() <= CHECKSUM_GROUPS {
        return Err(CodecError::UnexpectedEnd {
            offset: 0,
            wanted: CHECKSUM_GROUPS + 1,
            available: groups.len(),
        });
    }
    if poly_mod(&groups, network.checksum_seed()) != 0 {
        return Err(CodecError::ChecksumMismatch);
    }

    let data = &groups[..groups.len() - CHECKSUM_GROUPS];
    let bytes = convert_bits(data, 5, 8, true)?;

    let version_byte = bytes[0];
    if version_byte & 0x80 != 0 {
        return Err(CodecError::InvalidVersionByte(version_byte));
    }
    let kind = match version_byte & 0x78 {
        0 => AddressType::KeyHash,
        8 => AddressType::ScriptHash,
        _ => return Err(CodecError::InvalidVersionByte(version_byte)),
    };
    let expected = hash_len_for_class(version_byte & 0x07);
    let hash = bytes[1..].to_vec();
    if hash.len() != expected {
        return Err(CodecError::HashLengthMismatch {
            len: hash.len(),
            expected,
        });
    }

    Ok(DecodedAddress {
        network,
        kind,
        hash,
    })
}
