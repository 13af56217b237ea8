use alloy::primitives::{Address, B256, U256};
use alloy_rlp::{BufMut, Encodable};

/// A transaction output: an amount locked to a new owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Output {
    pub owner: Address,
    pub amount: U256,
}

impl Output {
    pub fn new(owner: Address, amount: U256) -> Self {
        Output { owner, amount }
    }

    /// The all-zero sentinel used to fill an unused output slot.
    pub fn zero() -> Self {
        Output {
            owner: Address::ZERO,
            amount: U256::ZERO,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.owner == Address::ZERO && self.amount.is_zero()
    }

    /// Appends the owner (20-byte string) and amount (fixed 32-byte string)
    /// to an in-progress body list.
    pub(crate) fn encode_fields(&self, out: &mut dyn BufMut) {
        self.owner.encode(out);
        B256::from(self.amount).encode(out);
    }

    pub(crate) fn fields_length(&self) -> usize {
        self.owner.length() + B256::from(self.amount).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn zero_sentinel_is_zero() {
        assert!(Output::zero().is_zero());
        let owned = Output::new(
            address!("70997970C51812dc3A010C7d01b50e0d17dc79C8"),
            U256::from(100),
        );
        assert!(!owned.is_zero());
    }

    #[test]
    fn fields_encode_with_fixed_widths() {
        let out = Output::new(
            address!("70997970C51812dc3A010C7d01b50e0d17dc79C8"),
            U256::from(1000),
        );
        let mut buf = Vec::new();
        out.encode_fields(&mut buf);
        // 0x94 + 20 owner bytes, then 0xa0 + 32 amount bytes
        assert_eq!(buf.len(), 21 + 33);
        assert_eq!(buf[0], 0x94);
        assert_eq!(buf[21], 0xa0);
    }
}
