use alloy::primitives::{Address, U256};

/// The root-chain contract's record of a deposit, fetched by nonce. The
/// nonce doubles as a pseudo-input when spending funds that were never
/// block-included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnChainDeposit {
    pub nonce: U256,
    pub owner: Address,
    pub amount: U256,
    pub created_at: U256,
    pub eth_block_num: U256,
}
