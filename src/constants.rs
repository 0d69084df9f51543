//! Wire-format constants and decode resource guards

/// Serialized block header size in bytes
pub const HEADER_SIZE: usize = 80;

/// Maximum script length the decoder will accept.
///
/// Matches the consensus script-size limit; a length prefix above this is
/// treated as hostile and rejected before any allocation happens.
pub const MAX_SCRIPT_SIZE: usize = 10_000;

/// Hard ceiling for any single length-prefixed read.
///
/// Set to the 32MB block-size ceiling of the chain; nothing inside one
/// message can legitimately be longer.
pub const MAX_ALLOC_SIZE: usize = 32 * 1024 * 1024;

/// Smallest serialized transaction: version, two zero counts, lock time
pub const MIN_TX_SIZE: usize = 10;

/// Smallest serialized input: outpoint, zero script length, sequence
pub const MIN_INPUT_SIZE: usize = 41;

/// Smallest serialized output: value and a zero script length
pub const MIN_OUTPUT_SIZE: usize = 9;

/// Sequence number for a final (non-replaceable) input
pub const SEQUENCE_FINAL: u32 = 0xffffffff;

/// Lock time threshold: values below this are block heights, above are
/// unix timestamps
pub const LOCKTIME_THRESHOLD: u32 = 500_000_000;
