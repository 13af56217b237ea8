use alloy::primitives::B256;

use crate::domain::ConfirmedTransaction;

/// A Plasma block header. The Merkle root is what the operator commits to
/// the root chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub merkle_root: B256,
    pub number: u64,
}

/// A Plasma block: a header plus its confirmed transactions in inclusion
/// order. Proof rebuilds depend on that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<ConfirmedTransaction>,
}
