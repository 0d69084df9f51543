//! Merkle root computation over transaction ids

use crate::error::{CodecError, Result};
use bitcoin_hashes::{sha256d, Hash as BitcoinHash, HashEngine};

/// Reduce an ordered list of display-order txid hex strings to the block
/// merkle root.
///
/// Leaves are paired left to right; an odd-length level duplicates its
/// last entry as its own partner. A single leaf is its own root. An empty
/// list has no defined root and is an error.
pub fn build_merkle_root(leaves: &[String]) -> Result<String> {
    if leaves.is_empty() {
        return Err(CodecError::EmptyMerkleLeaves);
    }

    let mut level = leaves.to_vec();
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len() / 2 + 1);
        for pair in level.chunks(2) {
            let a = &pair[0];
            let b = pair.get(1).unwrap_or(a);
            next.push(parent_hash(a, b)?);
        }
        level = next;
    }

    Ok(level.swap_remove(0))
}

/// Double SHA-256 of two sibling hashes.
///
/// Display-order hex is byte-reversed back to wire order before hashing,
/// and the parent is reversed again for display, so the convention is
/// uniform at every tree level.
fn parent_hash(a: &str, b: &str) -> Result<String> {
    let mut data = hex::decode(a)?;
    data.reverse();
    let mut right = hex::decode(b)?;
    right.reverse();
    data.extend_from_slice(&right);

    let mut engine = sha256d::Hash::engine();
    engine.input(&data);
    let mut parent = sha256d::Hash::from_engine(engine).into_inner();
    parent.reverse();
    Ok(hex::encode(parent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_leaf_is_root() {
        let leaf = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b".to_string();
        assert_eq!(build_merkle_root(&[leaf.clone()]).unwrap(), leaf);
    }

    #[test]
    fn test_empty_leaves_error() {
        assert!(matches!(
            build_merkle_root(&[]),
            Err(CodecError::EmptyMerkleLeaves)
        ));
    }

    #[test]
    fn test_odd_count_duplicates_last_leaf() {
        let a = "11".repeat(32);
        let b = "22".repeat(32);
        let c = "33".repeat(32);

        // root([a, b, c]) pairs (a,b) and (c,c)
        let left = parent_hash(&a, &b).unwrap();
        let right = parent_hash(&c, &c).unwrap();
        let expected = parent_hash(&left, &right).unwrap();

        let root = build_merkle_root(&[a, b, c]).unwrap();
        assert_eq!(root, expected);
    }

    #[test]
    fn test_invalid_hex_leaf() {
        assert!(build_merkle_root(&["zz".to_string(), "11".to_string()]).is_err());
    }
}
