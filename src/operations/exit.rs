//! Unilateral exit to the root chain.
//!
//! The proof is never taken from the node: the block is refetched and the
//! tree rebuilt from its transactions, so a lying server can at worst make
//! the exit revert on chain.

use alloy::primitives::{Bytes, U256};
use tracing::info;

use crate::contract::RootChain;
use crate::crypto::sha256;
use crate::domain::Outpoint;
use crate::error::{Error, Result};
use crate::merkle::MerkleTree;
use crate::rpc::RootClient;

/// Starts a root-chain exit for one confirmed outpoint, bonding
/// `committed_fee` with the call.
pub struct ExitOperation<'a> {
    contract: &'a dyn RootChain,
    client: &'a dyn RootClient,
    outpoint: Option<Outpoint>,
    committed_fee: Option<U256>,
}

impl<'a> ExitOperation<'a> {
    pub fn new(contract: &'a dyn RootChain, client: &'a dyn RootClient) -> Self {
        ExitOperation {
            contract,
            client,
            outpoint: None,
            committed_fee: None,
        }
    }

    pub fn outpoint(mut self, outpoint: Outpoint) -> Self {
        self.outpoint = Some(outpoint);
        self
    }

    pub fn committed_fee(mut self, committed_fee: U256) -> Self {
        self.committed_fee = Some(committed_fee);
        self
    }

    pub async fn exit(self) -> Result<()> {
        let outpoint = self
            .outpoint
            .ok_or_else(|| Error::validation("an outpoint to exit must be set"))?;
        let committed_fee = self
            .committed_fee
            .ok_or_else(|| Error::validation("an exit bond must be set"))?;
        if outpoint.amount < committed_fee {
            return Err(Error::validation(format!(
                "outpoint of {} cannot cover an exit bond of {committed_fee}",
                outpoint.amount
            )));
        }
        let source = outpoint.transaction.as_ref().ok_or_else(|| {
            Error::validation("exiting outpoint must reference its source transaction")
        })?;

        let block = self.client.get_block(outpoint.block_num).await?;
        let mut tree = MerkleTree::new();
        for confirmed in &block.transactions {
            tree.push(sha256(&confirmed.transaction.encoded()));
        }
        let (_root, proof) = tree.prove_and_root(outpoint.tx_idx as usize)?;

        // One confirm signature per input; for single-input spends the
        // verifier expects nothing appended for the second slot.
        let confirm_signatures = outpoint.confirm_sig.clone();

        info!(
            block_num = outpoint.block_num,
            tx_idx = outpoint.tx_idx,
            out_idx = outpoint.out_idx,
            "starting transaction exit"
        );
        self.contract
            .start_transaction_exit(
                outpoint.position(),
                Bytes::from(source.transaction.encoded()),
                proof,
                confirm_signatures,
                committed_fee,
            )
            .await?;
        Ok(())
    }
}
