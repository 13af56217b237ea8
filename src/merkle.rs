//! Merkle inclusion proofs over a block's transaction hashes.
//!
//! The tree splits at `pivot = (n + 1) / 2` at every level, the same
//! recursive rule the on-chain verifier walks. The proof is a single
//! concatenated blob of sibling subtree roots, innermost first; the verifier
//! consumes it back-to-front, so the accumulation order here must match
//! exactly. Exits never trust a server-supplied proof: the caller refetches
//! the block and rebuilds from the leaves.

use alloy::primitives::{Bytes, B256};

use crate::crypto::node_hash;
use crate::error::{Error, Result};

/// An ordered list of leaf hashes, one per confirmed transaction's encoded
/// hash, in block order.
#[derive(Debug, Clone, Default)]
pub struct MerkleTree {
    leaves: Vec<B256>,
}

impl MerkleTree {
    pub fn new() -> Self {
        MerkleTree::default()
    }

    pub fn from_leaves(leaves: Vec<B256>) -> Self {
        MerkleTree { leaves }
    }

    pub fn push(&mut self, leaf: B256) {
        self.leaves.push(leaf);
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Returns the root and the inclusion proof for the leaf at `index`.
    /// An empty tree yields `(empty, empty)`; a single leaf is its own root
    /// with an empty proof.
    pub fn prove_and_root(&self, index: usize) -> Result<(Bytes, Bytes)> {
        if self.leaves.is_empty() {
            return Ok((Bytes::new(), Bytes::new()));
        }
        if index >= self.leaves.len() {
            return Err(Error::validation(format!(
                "leaf index {index} out of range for {} leaves",
                self.leaves.len()
            )));
        }
        let (root, proof) = walk(&self.leaves, Some(index));
        Ok((Bytes::from(root.to_vec()), Bytes::from(proof)))
    }

    /// The root alone, without generating a proof.
    pub fn root(&self) -> Bytes {
        if self.leaves.is_empty() {
            return Bytes::new();
        }
        let (root, _) = walk(&self.leaves, None);
        Bytes::from(root.to_vec())
    }
}

fn walk(leaves: &[B256], target: Option<usize>) -> (B256, Vec<u8>) {
    if leaves.len() == 1 {
        return (leaves[0], Vec::new());
    }

    let pivot = (leaves.len() + 1) / 2;
    match target {
        Some(index) if index < pivot => {
            let (left_root, left_proof) = walk(&leaves[..pivot], Some(index));
            let (right_root, _) = walk(&leaves[pivot..], None);
            let mut proof = left_proof;
            proof.extend_from_slice(right_root.as_slice());
            (node_hash(&left_root, &right_root), proof)
        }
        Some(index) => {
            let (left_root, _) = walk(&leaves[..pivot], None);
            let (right_root, right_proof) = walk(&leaves[pivot..], Some(index - pivot));
            let mut proof = right_proof;
            proof.extend_from_slice(left_root.as_slice());
            (node_hash(&left_root, &right_root), proof)
        }
        None => {
            let (left_root, _) = walk(&leaves[..pivot], None);
            let (right_root, _) = walk(&leaves[pivot..], None);
            (node_hash(&left_root, &right_root), Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::sha256;
    use rand::RngCore;

    /// Reconstructs the root from a leaf and its proof blob by walking the
    /// same pivot recursion the on-chain verifier uses.
    fn reconstruct(leaves: &[B256], index: usize, proof: &[u8]) -> B256 {
        if leaves.len() == 1 {
            assert!(proof.is_empty());
            return leaves[0];
        }
        let pivot = (leaves.len() + 1) / 2;
        let (inner, sibling) = proof.split_at(proof.len() - 32);
        let sibling = B256::from_slice(sibling);
        if index < pivot {
            let left = reconstruct(&leaves[..pivot], index, inner);
            node_hash(&left, &sibling)
        } else {
            let right = reconstruct(&leaves[pivot..], index - pivot, inner);
            node_hash(&sibling, &right)
        }
    }

    fn random_leaves(n: usize) -> Vec<B256> {
        let mut rng = rand::rng();
        (0..n)
            .map(|_| {
                let mut buf = [0u8; 32];
                rng.fill_bytes(&mut buf);
                B256::from(buf)
            })
            .collect()
    }

    #[test]
    fn empty_tree_yields_empty_root_and_proof() {
        let tree = MerkleTree::new();
        let (root, proof) = tree.prove_and_root(0).unwrap();
        assert!(root.is_empty());
        assert!(proof.is_empty());
        assert!(tree.root().is_empty());
    }

    #[test]
    fn single_leaf_is_its_own_root() {
        let leaf = sha256(b"only");
        let tree = MerkleTree::from_leaves(vec![leaf]);
        let (root, proof) = tree.prove_and_root(0).unwrap();
        assert_eq!(root.as_ref(), leaf.as_slice());
        assert!(proof.is_empty());
    }

    #[test]
    fn two_leaves_root_is_pair_hash() {
        let a = sha256(b"a");
        let b = sha256(b"b");
        let tree = MerkleTree::from_leaves(vec![a, b]);
        let (root, proof) = tree.prove_and_root(0).unwrap();
        assert_eq!(root.as_ref(), node_hash(&a, &b).as_slice());
        assert_eq!(proof.as_ref(), b.as_slice());

        let (_, proof1) = tree.prove_and_root(1).unwrap();
        assert_eq!(proof1.as_ref(), a.as_slice());
    }

    #[test]
    fn every_index_reconstructs_the_root() {
        for n in [1usize, 2, 3, 7, 16] {
            let leaves = random_leaves(n);
            let tree = MerkleTree::from_leaves(leaves.clone());
            let expected_root = tree.root();
            for index in 0..n {
                let (root, proof) = tree.prove_and_root(index).unwrap();
                assert_eq!(root, expected_root, "root mismatch at n={n} index={index}");
                let rebuilt = reconstruct(&leaves, index, proof.as_ref());
                assert_eq!(
                    rebuilt.as_slice(),
                    root.as_ref(),
                    "reconstruction mismatch at n={n} index={index}"
                );
            }
        }
    }

    #[test]
    fn proof_length_matches_path_depth() {
        // 7 leaves split 4/3; the right arm splits 2/1, so the lone leaf at
        // index 6 sits one level shallower than the rest.
        let tree = MerkleTree::from_leaves(random_leaves(7));
        for index in 0..7 {
            let (_, proof) = tree.prove_and_root(index).unwrap();
            let expected = if index == 6 { 64 } else { 96 };
            assert_eq!(proof.len(), expected, "index {index}");
        }
    }

    #[test]
    fn out_of_range_index_fails_closed() {
        let tree = MerkleTree::from_leaves(random_leaves(3));
        assert!(tree.prove_and_root(3).is_err());
    }
}
