//! Root-chain contract proxy.
//!
//! Every state-changing call is pre-simulated for a readable revert message,
//! serialized through a shared transaction lock, then awaited to a receipt;
//! a reverted receipt is an error. All calls carry the same fixed gas
//! envelope; exit bonds ride along as the call value.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::DynProvider;
use alloy::sol;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::OnChainDeposit;
use crate::error::{Error, Result};

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    contract PlasmaMVP {
        event Deposit(address depositor, uint256 amount, uint256 depositNonce, uint256 ethBlockNum);
        event ChallengedExit(uint256[4] position, address owner, uint256 amount);

        function deposit(address owner) external payable;
        function depositNonce() external view returns (uint256);
        function deposits(uint256 nonce) external view returns (address owner, uint256 amount, uint256 createdAt, uint256 ethBlockNum);
        function startDepositExit(uint256 nonce, uint256 committedFee) external payable;
        function startTransactionExit(uint256[3] memory txPos, bytes memory txBytes, bytes memory proof, bytes memory confirmSignatures, uint256 committedFee) external payable;
    }
}

use PlasmaMVP::PlasmaMVPInstance;

/// Gas envelope applied to every state-changing call.
const GAS_LIMIT: u64 = 1_000_000;

/// A recorded challenge against an exit, as emitted by the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengedExitEvent {
    /// `[blockNum, txIdx, outIdx, depositNonce]` of the challenged exit.
    pub position: [U256; 4],
    pub owner: Address,
    pub amount: U256,
}

impl ChallengedExitEvent {
    /// Exact match on every emitted field.
    pub fn matches(&self, position: &[U256; 4], owner: Address, amount: U256) -> bool {
        self.position == *position && self.owner == owner && self.amount == amount
    }
}

/// Root-chain entry points the operations need.
#[async_trait]
pub trait RootChain: Send + Sync {
    /// Deposits `amount` for `owner` and returns the on-chain record.
    async fn deposit(&self, owner: Address, amount: U256) -> Result<OnChainDeposit>;

    /// The nonce the next deposit will be assigned.
    async fn deposit_nonce(&self) -> Result<U256>;

    /// Looks up a deposit by nonce.
    async fn deposit_for(&self, nonce: U256) -> Result<OnChainDeposit>;

    /// Starts an exit for an included transaction output, bonding
    /// `committed_fee` as the call value.
    async fn start_transaction_exit(
        &self,
        position: [U256; 3],
        encoded_tx: Bytes,
        proof: Bytes,
        confirm_signatures: Bytes,
        committed_fee: U256,
    ) -> Result<B256>;

    /// Starts an exit for an unincluded deposit.
    async fn start_deposit_exit(&self, nonce: U256, committed_fee: U256) -> Result<B256>;

    /// All exit challenges recorded since genesis.
    async fn challenged_exits(&self) -> Result<Vec<ChallengedExitEvent>>;
}

/// [`RootChain`] over a live provider.
#[derive(Clone)]
pub struct PlasmaContract {
    contract: PlasmaMVPInstance<DynProvider>,
    tx_lock: Arc<Mutex<()>>,
}

impl PlasmaContract {
    pub fn new(provider: DynProvider, address: Address) -> Self {
        PlasmaContract {
            contract: PlasmaMVPInstance::new(address, provider),
            tx_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn address(&self) -> Address {
        *self.contract.address()
    }

    async fn submit<P, D>(
        &self,
        name: &str,
        call: alloy::contract::CallBuilder<P, D>,
    ) -> Result<alloy::rpc::types::TransactionReceipt>
    where
        P: alloy::providers::Provider + Clone,
        D: alloy::contract::CallDecoder + Clone,
    {
        // Pre-simulate to catch reverts with a readable message.
        if let Err(e) = call.call().await {
            return Err(Error::remote(format!("{name} would revert: {e}")));
        }

        let _guard = self.tx_lock.lock().await;
        let pending = call
            .send()
            .await
            .map_err(|e| Error::remote(format!("{name} submission failed: {e}")))?;
        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| Error::remote(format!("{name} receipt wait failed: {e}")))?;

        if !receipt.status() {
            return Err(Error::remote(format!(
                "{name} reverted on-chain, tx hash {:?}",
                receipt.transaction_hash
            )));
        }
        Ok(receipt)
    }
}

#[async_trait]
impl RootChain for PlasmaContract {
    async fn deposit(&self, owner: Address, amount: U256) -> Result<OnChainDeposit> {
        let call = self.contract.deposit(owner).value(amount).gas(GAS_LIMIT);
        let receipt = self.submit("deposit", call).await?;

        let event = receipt
            .inner
            .logs()
            .iter()
            .find_map(|log| log.log_decode::<PlasmaMVP::Deposit>().ok())
            .ok_or_else(|| Error::encoding("deposit receipt carried no Deposit event"))?;
        let data = &event.inner.data;
        info!(nonce = %data.depositNonce, %amount, "deposit recorded");

        // The event omits createdAt; read the full record back.
        self.deposit_for(data.depositNonce).await
    }

    async fn deposit_nonce(&self) -> Result<U256> {
        self.contract
            .depositNonce()
            .call()
            .await
            .map_err(|e| Error::remote(e.to_string()))
    }

    async fn deposit_for(&self, nonce: U256) -> Result<OnChainDeposit> {
        let record = self
            .contract
            .deposits(nonce)
            .call()
            .await
            .map_err(|e| Error::remote(e.to_string()))?;
        Ok(OnChainDeposit {
            nonce,
            owner: record.owner,
            amount: record.amount,
            created_at: record.createdAt,
            eth_block_num: record.ethBlockNum,
        })
    }

    async fn start_transaction_exit(
        &self,
        position: [U256; 3],
        encoded_tx: Bytes,
        proof: Bytes,
        confirm_signatures: Bytes,
        committed_fee: U256,
    ) -> Result<B256> {
        let call = self
            .contract
            .startTransactionExit(position, encoded_tx, proof, confirm_signatures, committed_fee)
            .value(committed_fee)
            .gas(GAS_LIMIT);
        let receipt = self.submit("startTransactionExit", call).await?;
        info!(
            block_num = %position[0],
            tx_idx = %position[1],
            out_idx = %position[2],
            "transaction exit started"
        );
        Ok(receipt.transaction_hash)
    }

    async fn start_deposit_exit(&self, nonce: U256, committed_fee: U256) -> Result<B256> {
        let call = self
            .contract
            .startDepositExit(nonce, committed_fee)
            .value(committed_fee)
            .gas(GAS_LIMIT);
        let receipt = self.submit("startDepositExit", call).await?;
        info!(%nonce, "deposit exit started");
        Ok(receipt.transaction_hash)
    }

    async fn challenged_exits(&self) -> Result<Vec<ChallengedExitEvent>> {
        let events = self
            .contract
            .event_filter::<PlasmaMVP::ChallengedExit>()
            .from_block(0)
            .query()
            .await
            .map_err(|e| Error::remote(e.to_string()))?;
        Ok(events
            .into_iter()
            .map(|(event, _log)| ChallengedExitEvent {
                position: event.position,
                owner: event.owner,
                amount: event.amount,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn challenge_match_requires_every_field() {
        let owner = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
        let position = [
            U256::from(5),
            U256::from(2),
            U256::ZERO,
            U256::ZERO,
        ];
        let event = ChallengedExitEvent {
            position,
            owner,
            amount: U256::from(100),
        };

        assert!(event.matches(&position, owner, U256::from(100)));
        assert!(!event.matches(&position, owner, U256::from(101)));
        assert!(!event.matches(&position, Address::ZERO, U256::from(100)));

        let mut other = position;
        other[3] = U256::from(9);
        assert!(!event.matches(&other, owner, U256::from(100)));
    }
}
