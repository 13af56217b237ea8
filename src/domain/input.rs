use alloy::primitives::{B256, U256};
use alloy_rlp::{BufMut, Encodable};

use crate::error::{Error, Result};

/// A transaction input: either a reference to a prior output by position, or
/// a deposit nonce spending root-chain funds that were never block-included.
/// Never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Input {
    /// Block number of the output being spent.
    pub block_num: u64,
    /// Index of the transaction containing the output being spent.
    pub tx_idx: u32,
    /// Index of the output being spent within that transaction.
    pub out_idx: u8,
    /// Nonce of the deposit being spent. Zero when spending a prior output.
    pub deposit_nonce: U256,
}

impl Input {
    /// Builds an input spending a prior output.
    pub fn from_position(block_num: u64, tx_idx: u32, out_idx: u8) -> Self {
        Input {
            block_num,
            tx_idx,
            out_idx,
            deposit_nonce: U256::ZERO,
        }
    }

    /// Builds an input spending a root-chain deposit.
    pub fn from_deposit(nonce: U256) -> Self {
        Input {
            block_num: 0,
            tx_idx: 0,
            out_idx: 0,
            deposit_nonce: nonce,
        }
    }

    /// Builds an input from raw parts, enforcing the deposit/position
    /// exclusivity invariant.
    pub fn new(block_num: u64, tx_idx: u32, out_idx: u8, deposit_nonce: U256) -> Result<Self> {
        let input = Input {
            block_num,
            tx_idx,
            out_idx,
            deposit_nonce,
        };
        input.validate()?;
        Ok(input)
    }

    /// The all-zero sentinel used to fill an unused input slot.
    pub fn zero() -> Self {
        Input {
            block_num: 0,
            tx_idx: 0,
            out_idx: 0,
            deposit_nonce: U256::ZERO,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Input::zero()
    }

    pub fn is_deposit(&self) -> bool {
        !self.deposit_nonce.is_zero()
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_deposit() && (self.block_num != 0 || self.tx_idx != 0 || self.out_idx != 0) {
            return Err(Error::validation(
                "cannot set a deposit nonce alongside blockNum, txIdx, or outIdx",
            ));
        }
        Ok(())
    }

    /// Appends the input's four fields to an in-progress body list. Indices
    /// are minimal big-endian; the nonce is a fixed 32-byte string.
    pub(crate) fn encode_fields(&self, out: &mut dyn BufMut) {
        self.block_num.encode(out);
        self.tx_idx.encode(out);
        self.out_idx.encode(out);
        B256::from(self.deposit_nonce).encode(out);
    }

    pub(crate) fn fields_length(&self) -> usize {
        self.block_num.length()
            + self.tx_idx.length()
            + self.out_idx.length()
            + B256::from(self.deposit_nonce).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposit_nonce_excludes_position() {
        let err = Input::new(1, 0, 0, U256::from(7)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(Input::new(0, 0, 0, U256::from(7)).is_ok());
        assert!(Input::new(3, 1, 1, U256::ZERO).is_ok());
    }

    #[test]
    fn zero_sentinel_is_zero() {
        assert!(Input::zero().is_zero());
        assert!(!Input::from_deposit(U256::from(1)).is_zero());
        assert!(!Input::from_position(1, 0, 0).is_zero());
    }

    #[test]
    fn nonce_encodes_as_fixed_32_bytes() {
        let input = Input::from_deposit(U256::from(5));
        let mut out = Vec::new();
        input.encode_fields(&mut out);
        // three zero indices (0x80 each) + 0xa0 length prefix + 32 bytes
        assert_eq!(out.len(), 3 + 33);
        assert_eq!(out[3], 0xa0);
        assert_eq!(out[35], 5);
    }
}
