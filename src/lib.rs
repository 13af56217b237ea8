//! Client engine for a Plasma-style UTXO sidechain.
//!
//! Value enters through a root-chain deposit, moves off-chain through signed
//! two-input/two-output transactions confirmed against block Merkle roots,
//! and leaves through a bonded exit carrying an inclusion proof. [`Plasma`]
//! bundles the three injected capabilities (root-node client, contract
//! proxy, signer) behind convenience methods; each piece is also usable on
//! its own.

pub mod builder;
pub mod config;
pub mod contract;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod merkle;
pub mod operations;
pub mod rpc;
pub mod select;
pub mod signer;

use std::sync::Arc;

use alloy::primitives::{Address, U256};

pub use crate::config::{load_config_from_path, ClientConfig};
pub use crate::contract::{ChallengedExitEvent, PlasmaContract, RootChain};
pub use crate::error::{Error, Result};
pub use crate::rpc::{RestRootClient, RootClient, RpcRootClient};
pub use crate::signer::{LocalSigner, NodeSigner, Signer};

use crate::domain::{ConfirmedTransaction, OnChainDeposit, Outpoint};
use crate::operations::{ExitOperation, SendOperation};

/// Entrypoint bundling the injected handles. Constructed without a signer it
/// still serves reads; signing methods then fail with a validation error.
pub struct Plasma {
    client: Arc<dyn RootClient>,
    contract: Arc<dyn RootChain>,
    signer: Option<Arc<dyn Signer>>,
}

impl Plasma {
    pub fn new(
        client: Arc<dyn RootClient>,
        contract: Arc<dyn RootChain>,
        signer: Option<Arc<dyn Signer>>,
    ) -> Self {
        Plasma {
            client,
            contract,
            signer,
        }
    }

    /// Direct access to the root-node client.
    pub fn root_client(&self) -> &Arc<dyn RootClient> {
        &self.client
    }

    /// Direct access to the contract proxy.
    pub fn root_chain(&self) -> &Arc<dyn RootChain> {
        &self.contract
    }

    pub async fn balance(&self, address: Address) -> Result<U256> {
        self.client.get_balance(address).await
    }

    pub async fn utxos(&self, address: Address) -> Result<Vec<Outpoint>> {
        self.client.get_utxos(address).await
    }

    /// Sends `value` to `to`, spending the signer's UTXO set or, when
    /// `deposit_nonce` is set, an unincluded deposit.
    pub async fn send(
        &self,
        to: Address,
        value: U256,
        fee: U256,
        deposit_nonce: Option<U256>,
    ) -> Result<ConfirmedTransaction> {
        let signer = self.require_signer()?;
        let mut operation = SendOperation::new(&*self.client, &*self.contract, signer.address())
            .to(to)
            .value(value)
            .fee(fee);
        if let Some(nonce) = deposit_nonce {
            operation = operation.deposit_nonce(nonce);
        }
        operation.send(&**signer).await
    }

    /// Deposits `value` into the contract for the signer's address.
    pub async fn deposit(&self, value: U256) -> Result<OnChainDeposit> {
        let signer = self.require_signer()?;
        self.contract.deposit(signer.address(), value).await
    }

    /// Exits a confirmed outpoint, bonding `committed_fee`.
    pub async fn exit(&self, outpoint: Outpoint, committed_fee: U256) -> Result<()> {
        ExitOperation::new(&*self.contract, &*self.client)
            .outpoint(outpoint)
            .committed_fee(committed_fee)
            .exit()
            .await
    }

    /// Exits an unincluded deposit, bonding `committed_fee`.
    pub async fn exit_deposit(&self, nonce: U256, committed_fee: U256) -> Result<()> {
        self.contract
            .start_deposit_exit(nonce, committed_fee)
            .await?;
        Ok(())
    }

    /// All exit challenges recorded on the contract since genesis.
    pub async fn challenged_exits(&self) -> Result<Vec<ChallengedExitEvent>> {
        self.contract.challenged_exits().await
    }

    fn require_signer(&self) -> Result<&Arc<dyn Signer>> {
        self.signer
            .as_ref()
            .ok_or_else(|| Error::validation("a signer is required for this operation"))
    }
}
