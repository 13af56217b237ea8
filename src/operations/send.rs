//! The two-phase send flow: build, sign, submit, then confirm against the
//! Merkle root the node reports for the including block. A transfer is not
//! final until the confirm signatures are accepted, so the confirm step
//! strictly follows the send response.

use alloy::primitives::{Address, U256};
use tracing::info;

use crate::builder::TransactionBuilder;
use crate::contract::RootChain;
use crate::domain::{ConfirmedTransaction, Transaction};
use crate::error::{Error, Result};
use crate::rpc::RootClient;
use crate::select::select_utxos;
use crate::signer::Signer;

/// Sends value on the sidechain, funded from the sender's UTXO set or, when
/// a deposit nonce is set, from an unincluded root-chain deposit.
pub struct SendOperation<'a> {
    client: &'a dyn RootClient,
    contract: &'a dyn RootChain,
    from: Address,
    to: Option<Address>,
    value: Option<U256>,
    fee: Option<U256>,
    deposit_nonce: Option<U256>,
}

impl<'a> SendOperation<'a> {
    pub fn new(client: &'a dyn RootClient, contract: &'a dyn RootChain, from: Address) -> Self {
        SendOperation {
            client,
            contract,
            from,
            to: None,
            value: None,
            fee: None,
            deposit_nonce: None,
        }
    }

    pub fn to(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }

    pub fn value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    pub fn fee(mut self, fee: U256) -> Self {
        self.fee = Some(fee);
        self
    }

    /// Spend a root-chain deposit instead of the UTXO set.
    pub fn deposit_nonce(mut self, nonce: U256) -> Self {
        self.deposit_nonce = Some(nonce);
        self
    }

    /// Runs the flow to completion and returns the confirmed transaction.
    pub async fn send(self, signer: &dyn Signer) -> Result<ConfirmedTransaction> {
        let to = self
            .to
            .ok_or_else(|| Error::validation("a recipient must be set"))?;
        let value = self
            .value
            .ok_or_else(|| Error::validation("a value must be set"))?;
        let fee = self
            .fee
            .ok_or_else(|| Error::validation("a fee must be set"))?;

        let mut builder = TransactionBuilder::new()
            .from(self.from)
            .to(to)
            .value(value)
            .fee(fee);

        if let Some(nonce) = self.deposit_nonce {
            let deposit = self.contract.deposit_for(nonce).await?;
            if deposit.owner != self.from {
                return Err(Error::validation(format!(
                    "deposit {nonce} belongs to {}, not {}",
                    deposit.owner, self.from
                )));
            }
            if value > deposit.amount {
                return Err(Error::validation(format!(
                    "cannot spend {value} from a deposit of {}",
                    deposit.amount
                )));
            }
            builder = builder.deposit(deposit);
        } else {
            let utxos = self.client.get_utxos(self.from).await?;
            builder = builder.utxos(select_utxos(&utxos, value + fee)?);
        }

        let body = builder.build()?;
        let signature = signer.sign_digest(&body.sig_hash()).await?;
        let tx = Transaction::new(body, signature.clone(), signature);

        let response = self.client.send(&tx).await?;
        info!(
            block_num = response.inclusion.block_num,
            tx_idx = response.inclusion.tx_idx,
            "transaction included"
        );

        // Confirm signatures bind to the recorded transaction and the
        // including block's root, both taken from the send response.
        let mut confirmed = ConfirmedTransaction::new(response.transaction, None);
        confirmed
            .confirm_sign(signer, &response.inclusion.merkle_root)
            .await?;
        self.client.confirm(&confirmed).await?;
        info!(
            block_num = response.inclusion.block_num,
            tx_idx = response.inclusion.tx_idx,
            "transaction confirmed"
        );
        Ok(confirmed)
    }
}
