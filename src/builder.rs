//! Assembles transaction bodies from selected inputs.
//!
//! The builder owns the funding arithmetic: inputs must cover amount plus
//! fee, and any surplus flows back to the sender as a change output. Callers
//! provide either a deposit or one or two outpoints, never both.

use alloy::primitives::{Address, U256};

use crate::domain::{
    zero_signature, Input, OnChainDeposit, Outpoint, Output, TransactionBody,
};
use crate::error::{Error, Result};

/// Builds a [`TransactionBody`] paying `value` from `from` to `to`, funded
/// either by a root-chain deposit or by previously confirmed outpoints.
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    from: Option<Address>,
    to: Option<Address>,
    value: Option<U256>,
    fee: Option<U256>,
    deposit: Option<OnChainDeposit>,
    utxos: Vec<Outpoint>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        TransactionBuilder::default()
    }

    /// The sender; surplus input value returns here as change.
    pub fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
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

    /// Funds the transaction from a root-chain deposit. Mutually exclusive
    /// with [`TransactionBuilder::utxos`].
    pub fn deposit(mut self, deposit: OnChainDeposit) -> Self {
        self.deposit = Some(deposit);
        self
    }

    /// Funds the transaction from one or two confirmed outpoints. Mutually
    /// exclusive with [`TransactionBuilder::deposit`].
    pub fn utxos(mut self, utxos: Vec<Outpoint>) -> Self {
        self.utxos = utxos;
        self
    }

    pub fn build(self) -> Result<TransactionBody> {
        let from = self
            .from
            .ok_or_else(|| Error::validation("transaction requires a sender"))?;
        let to = self
            .to
            .ok_or_else(|| Error::validation("transaction requires a recipient"))?;
        let value = self
            .value
            .ok_or_else(|| Error::validation("transaction requires a value"))?;
        let fee = self
            .fee
            .ok_or_else(|| Error::validation("transaction requires a fee"))?;

        let (input0, input1, sig0, sig1, total_in) = match (self.deposit, self.utxos.as_slice()) {
            (Some(_), utxos) if !utxos.is_empty() => {
                return Err(Error::validation(
                    "cannot fund a transaction from both a deposit and outpoints",
                ));
            }
            (Some(deposit), _) => (
                Input::from_deposit(deposit.nonce),
                Input::zero(),
                zero_signature(),
                zero_signature(),
                deposit.amount,
            ),
            (None, [only]) => (
                Input::from_position(only.block_num, only.tx_idx, only.out_idx),
                Input::zero(),
                only.confirm_sig.clone(),
                zero_signature(),
                only.amount,
            ),
            (None, [first, second]) => (
                Input::from_position(first.block_num, first.tx_idx, first.out_idx),
                Input::from_position(second.block_num, second.tx_idx, second.out_idx),
                first.confirm_sig.clone(),
                second.confirm_sig.clone(),
                first.amount + second.amount,
            ),
            (None, []) => {
                return Err(Error::validation(
                    "transaction requires a deposit or at least one outpoint",
                ));
            }
            (None, _) => {
                return Err(Error::validation(
                    "a transaction spends at most two outpoints",
                ));
            }
        };

        let spend = value + fee;
        if total_in < spend {
            return Err(Error::validation(format!(
                "inputs total {total_in} but {spend} is needed (value {value} + fee {fee})"
            )));
        }

        let change = total_in - spend;
        let output1 = if change.is_zero() {
            Output::zero()
        } else {
            Output::new(from, change)
        };

        Ok(TransactionBody {
            input0,
            input1,
            output0: Output::new(to, value),
            output1,
            block_num: 0,
            tx_idx: 0,
            input0_confirm_sig: sig0,
            input1_confirm_sig: sig1,
            fee,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, Bytes};

    const ALICE: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
    const BOB: Address = address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");

    fn deposit(nonce: u64, amount: u64) -> OnChainDeposit {
        OnChainDeposit {
            nonce: U256::from(nonce),
            owner: ALICE,
            amount: U256::from(amount),
            created_at: U256::ZERO,
            eth_block_num: U256::ZERO,
        }
    }

    fn outpoint(block_num: u64, amount: u64, sig_byte: u8) -> Outpoint {
        Outpoint {
            block_num,
            tx_idx: 1,
            out_idx: 0,
            amount: U256::from(amount),
            confirm_sig: Bytes::from(vec![sig_byte; 65]),
            transaction: None,
        }
    }

    #[test]
    fn deposit_spend_with_change() {
        let body = TransactionBuilder::new()
            .from(ALICE)
            .to(BOB)
            .value(U256::from(100))
            .fee(U256::from(1))
            .deposit(deposit(7, 1000))
            .build()
            .unwrap();

        assert_eq!(body.input0, Input::from_deposit(U256::from(7)));
        assert!(body.input1.is_zero());
        assert_eq!(body.input0_confirm_sig, zero_signature());
        assert_eq!(body.output0, Output::new(BOB, U256::from(100)));
        assert_eq!(body.output1, Output::new(ALICE, U256::from(899)));
        assert_eq!(body.fee, U256::from(1));
    }

    #[test]
    fn exact_total_produces_no_change_output() {
        let body = TransactionBuilder::new()
            .from(ALICE)
            .to(BOB)
            .value(U256::from(99))
            .fee(U256::from(1))
            .utxos(vec![outpoint(3, 100, 0xaa)])
            .build()
            .unwrap();

        assert_eq!(body.output0, Output::new(BOB, U256::from(99)));
        assert!(body.output1.is_zero());
        assert_eq!(body.input0, Input::from_position(3, 1, 0));
        assert_eq!(body.input0_confirm_sig, Bytes::from(vec![0xaa; 65]));
    }

    #[test]
    fn two_outpoints_carry_their_confirm_sigs() {
        let body = TransactionBuilder::new()
            .from(ALICE)
            .to(BOB)
            .value(U256::from(120))
            .fee(U256::ZERO)
            .utxos(vec![outpoint(3, 50, 0xaa), outpoint(9, 100, 0xbb)])
            .build()
            .unwrap();

        assert_eq!(body.input0, Input::from_position(3, 1, 0));
        assert_eq!(body.input1, Input::from_position(9, 1, 0));
        assert_eq!(body.input0_confirm_sig, Bytes::from(vec![0xaa; 65]));
        assert_eq!(body.input1_confirm_sig, Bytes::from(vec![0xbb; 65]));
        // 150 in, 120 out, no fee: 30 back to the sender.
        assert_eq!(body.output1, Output::new(ALICE, U256::from(30)));
    }

    #[test]
    fn underfunded_build_fails() {
        let err = TransactionBuilder::new()
            .from(ALICE)
            .to(BOB)
            .value(U256::from(100))
            .fee(U256::from(1))
            .utxos(vec![outpoint(3, 100, 0xaa)])
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn deposit_and_utxos_are_mutually_exclusive() {
        let err = TransactionBuilder::new()
            .from(ALICE)
            .to(BOB)
            .value(U256::from(10))
            .fee(U256::ZERO)
            .deposit(deposit(1, 100))
            .utxos(vec![outpoint(3, 100, 0xaa)])
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn missing_funding_fails() {
        let err = TransactionBuilder::new()
            .from(ALICE)
            .to(BOB)
            .value(U256::from(10))
            .fee(U256::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn missing_fee_fails_closed() {
        let err = TransactionBuilder::new()
            .from(ALICE)
            .to(BOB)
            .value(U256::from(10))
            .utxos(vec![outpoint(3, 100, 0xaa)])
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn more_than_two_outpoints_fails() {
        let err = TransactionBuilder::new()
            .from(ALICE)
            .to(BOB)
            .value(U256::from(10))
            .fee(U256::ZERO)
            .utxos(vec![
                outpoint(1, 10, 1),
                outpoint(2, 10, 2),
                outpoint(3, 10, 3),
            ])
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
