use alloy::primitives::{Address, Bytes, U256};

use crate::domain::ConfirmedTransaction;
use crate::error::{Error, Result};

/// A spendable output reference: position, amount, the confirm signature of
/// its source transaction, and (when known) the source transaction itself.
///
/// Outpoints are only ever derived from confirmed transactions; an exit for
/// an outpoint replays its source transaction's encoding on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outpoint {
    pub block_num: u64,
    pub tx_idx: u32,
    pub out_idx: u8,
    pub amount: U256,
    pub confirm_sig: Bytes,
    pub transaction: Option<ConfirmedTransaction>,
}

impl Outpoint {
    /// Derives the outpoint owned by `owner` from a confirmed transaction:
    /// output slot 0 if its recorded owner matches, slot 1 otherwise.
    pub fn from_confirmed(tx: ConfirmedTransaction, owner: Address) -> Result<Self> {
        let sigs = tx.require_confirm_signatures().map_err(|_| {
            Error::validation("cannot create an outpoint from an unconfirmed transaction")
        })?;

        let body = &tx.transaction.body;
        let out_idx: u8 = if body.output0.owner == owner { 0 } else { 1 };
        let amount = if out_idx == 0 {
            body.output0.amount
        } else {
            body.output1.amount
        };
        let confirm_sig = sigs[out_idx as usize].clone();

        Ok(Outpoint {
            block_num: body.block_num,
            tx_idx: body.tx_idx,
            out_idx,
            amount,
            confirm_sig,
            transaction: Some(tx),
        })
    }

    /// The `[blockNum, txIdx, outIdx]` position triple the contract's exit
    /// entry point expects.
    pub fn position(&self) -> [U256; 3] {
        [
            U256::from(self.block_num),
            U256::from(self.tx_idx),
            U256::from(self.out_idx),
        ]
    }
}
