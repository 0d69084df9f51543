//! # bch-codec
//!
//! Decoder and encoder for the Bitcoin Cash wire formats: blocks, block
//! headers, transactions, scripts, and the cash address text encoding,
//! plus merkle-root computation over transaction ids.
//!
//! Everything works on in-memory byte buffers supplied by the caller;
//! fetching raw hex from a node is out of scope, and so are script
//! execution and consensus validation. Decoding is synchronous and
//! shares no state between calls, so independent buffers may be decoded
//! from any number of threads.
//!
//! ## Decoding
//!
//! ```rust
//! use bch_codec::{Block, Network};
//!
//! # fn example(raw_block: &[u8]) -> bch_codec::Result<()> {
//! let block = Block::decode(raw_block)?;
//! println!("block {}", block.block_hash());
//! for tx in &block.transactions {
//!     for output in &tx.outputs {
//!         if let Some(address) = output.address(Network::Mainnet) {
//!             println!("{} receives {}", address, output.value);
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Addresses
//!
//! ```rust
//! use bch_codec::{decode_address, AddressType, Network};
//!
//! let decoded =
//!     decode_address("bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a").unwrap();
//! assert_eq!(decoded.network, Network::Mainnet);
//! assert_eq!(decoded.kind, AddressType::KeyHash);
//! assert_eq!(
//!     hex::encode(&decoded.hash),
//!     "76a04053bda0a88bda5177b86a15c3b29f559873"
//! );
//! ```

pub mod address;
pub mod block;
pub mod constants;
pub mod cursor;
pub mod error;
pub mod merkle;
pub mod script;
pub mod slp;
pub mod transaction;
pub mod types;
pub mod util;

// Re-export commonly used types
pub use address::{decode_address, encode_address, AddressType, DecodedAddress, Network};
pub use block::{decode_header_chain, Block, BlockHeader};
pub use cursor::ByteCursor;
pub use error::{CodecError, Result};
pub use merkle::build_merkle_root;
pub use script::{classify, Opcode, Script, ScriptClass, Token};
pub use slp::{parse_slp_script, SlpMessage, SlpScriptError};
pub use transaction::{Input, Output, Transaction};
pub use types::{ByteString, Hash, OutPoint};
