//! Root-node access.
//!
//! Operations talk to the sidechain's root node only through [`RootClient`];
//! the two adapters here speak different wire dialects but decode into the
//! same domain objects. Adapters hold one reusable HTTP client each and are
//! injected by the caller.

mod jsonrpc;
mod rest;

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;

pub use jsonrpc::RpcRootClient;
pub use rest::RestRootClient;

use crate::domain::{Block, ConfirmedTransaction, Outpoint, Transaction};
use crate::error::{Error, Result};

/// Where a submitted transaction landed: the including block's Merkle root
/// and the transaction's position. Confirm signatures bind to `merkle_root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inclusion {
    pub merkle_root: B256,
    pub block_num: u64,
    pub tx_idx: u32,
}

/// The root node's answer to a send: the transaction as recorded (the
/// encoding confirm hashes must be computed over) plus its inclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResponse {
    pub transaction: Transaction,
    pub inclusion: Inclusion,
}

/// Read and submit sidechain state through a root node.
#[async_trait]
pub trait RootClient: Send + Sync {
    async fn get_balance(&self, address: Address) -> Result<U256>;

    async fn get_block(&self, number: u64) -> Result<Block>;

    /// The spendable outpoints owned by `address`.
    async fn get_utxos(&self, address: Address) -> Result<Vec<Outpoint>>;

    /// Submits a signed transaction and returns its inclusion result.
    async fn send(&self, tx: &Transaction) -> Result<SendResponse>;

    /// Submits confirm signatures for an included transaction.
    async fn confirm(&self, confirmed: &ConfirmedTransaction) -> Result<()>;
}

pub(crate) fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub(crate) fn parse_hex(value: &str) -> Result<Vec<u8>> {
    hex::decode(value.trim_start_matches("0x"))
        .map_err(|e| Error::encoding(format!("invalid hex field {value:?}: {e}")))
}

pub(crate) fn parse_b256(value: &str) -> Result<B256> {
    let raw = parse_hex(value)?;
    if raw.len() != 32 {
        return Err(Error::encoding(format!(
            "expected a 32-byte hash, got {} bytes",
            raw.len()
        )));
    }
    Ok(B256::from_slice(&raw))
}

pub(crate) fn parse_address(value: &str) -> Result<Address> {
    let raw = parse_hex(value)?;
    if raw.len() != 20 {
        return Err(Error::encoding(format!(
            "expected a 20-byte address, got {} bytes",
            raw.len()
        )));
    }
    Ok(Address::from_slice(&raw))
}

pub(crate) fn parse_decimal(value: &str) -> Result<U256> {
    U256::from_str_radix(value, 10)
        .map_err(|e| Error::encoding(format!("invalid decimal amount {value:?}: {e}")))
}
