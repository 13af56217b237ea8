//! Hash primitives shared by the codec, the Merkle engine, and signing.
//!
//! Two digests are in play: keccak256 for transaction authorization hashes
//! (what the root-chain contract recovers signers against) and sha256 for
//! Merkle leaves, interior nodes, and confirm hashes. The interior-node hash
//! is a plain `sha256(left || right)` over the two child roots; this is the
//! form the deployed on-chain verifier reconstructs, so it must never change.

use alloy::primitives::{keccak256 as alloy_keccak256, B256};
use sha2::{Digest, Sha256};

pub const ETH_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

pub fn keccak256(data: impl AsRef<[u8]>) -> B256 {
    alloy_keccak256(data)
}

pub fn sha256(data: impl AsRef<[u8]>) -> B256 {
    let mut hasher = Sha256::new();
    hasher.update(data.as_ref());
    B256::from_slice(&hasher.finalize())
}

/// Hash of two sibling subtree roots, forming their parent node.
pub fn node_hash(left: &B256, right: &B256) -> B256 {
    let mut hasher = Sha256::new();
    hasher.update(left.as_slice());
    hasher.update(right.as_slice());
    B256::from_slice(&hasher.finalize())
}

/// The hash a confirm signature commits to: the transaction's encoding hash
/// bound to the Merkle root of the block that included it.
pub fn confirm_hash(tx_encoding: &[u8], merkle_root: &B256) -> B256 {
    let mut hasher = Sha256::new();
    hasher.update(sha256(tx_encoding).as_slice());
    hasher.update(merkle_root.as_slice());
    B256::from_slice(&hasher.finalize())
}

/// Applies the Ethereum personal-message prefix to a 32-byte digest before
/// the final keccak, matching `personal_sign` and `ecrecover` on chain.
pub fn eth_message_hash(digest: &B256) -> B256 {
    let mut buf = Vec::with_capacity(ETH_MESSAGE_PREFIX.len() + 32);
    buf.extend_from_slice(ETH_MESSAGE_PREFIX);
    buf.extend_from_slice(digest.as_slice());
    alloy_keccak256(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::b256;

    #[test]
    fn sha256_matches_known_vector() {
        // sha256("abc")
        assert_eq!(
            sha256(b"abc"),
            b256!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
    }

    #[test]
    fn keccak256_matches_known_vector() {
        // keccak256 of the empty string
        assert_eq!(
            keccak256([]),
            b256!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
        );
    }

    #[test]
    fn node_hash_is_concat_then_sha256() {
        let left = sha256(b"left");
        let right = sha256(b"right");
        let mut concat = Vec::new();
        concat.extend_from_slice(left.as_slice());
        concat.extend_from_slice(right.as_slice());
        assert_eq!(node_hash(&left, &right), sha256(&concat));
    }

    #[test]
    fn confirm_hash_binds_tx_to_root() {
        let root = sha256(b"root");
        let other_root = sha256(b"other");
        let tx = b"some transaction encoding";
        assert_ne!(confirm_hash(tx, &root), confirm_hash(tx, &other_root));

        let mut concat = Vec::new();
        concat.extend_from_slice(sha256(tx).as_slice());
        concat.extend_from_slice(root.as_slice());
        assert_eq!(confirm_hash(tx, &root), sha256(&concat));
    }

    #[test]
    fn eth_message_hash_prefixes_digest() {
        let digest = sha256(b"payload");
        let mut buf = Vec::new();
        buf.extend_from_slice(ETH_MESSAGE_PREFIX);
        buf.extend_from_slice(digest.as_slice());
        assert_eq!(eth_message_hash(&digest), keccak256(&buf));
    }
}
