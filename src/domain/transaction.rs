//! The fixed-shape Plasma transaction and its canonical RLP encoding.
//!
//! The root-chain contract re-derives this encoding independently, so the
//! field order and widths are load-bearing:
//!
//! ```text
//! [[blockNum0, txIdx0, outIdx0, depositNonce0, input0ConfirmSig,
//!   blockNum1, txIdx1, outIdx1, depositNonce1, input1ConfirmSig,
//!   newOwner0, amount0, newOwner1, amount1, fee],
//!  [sig0, sig1]]
//! ```
//!
//! The body is the first element. Its encoding is the pre-image for the
//! authorization signature hash, for confirm hashes, and for Merkle leaves.
//! The body's own inclusion position (`block_num`, `tx_idx`) is metadata
//! assigned by the root node and travels outside the RLP.

use alloy::primitives::{Bytes, B256, U256};
use alloy_rlp::{BufMut, Decodable, Encodable, Header};

use crate::crypto::keccak256;
use crate::domain::{Input, Output};

/// Length of an r || s || v secp256k1 signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// An all-zero signature, used as the sentinel for unused confirm-sig slots.
pub fn zero_signature() -> Bytes {
    Bytes::from(vec![0u8; SIGNATURE_LENGTH])
}

/// The body of a Plasma transaction: two inputs, two outputs, a fee, and one
/// confirm signature per input proving the spent outputs' source transactions
/// were themselves confirmed. Unused slots hold zero sentinels; the encoding
/// is fixed-arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionBody {
    pub input0: Input,
    pub input1: Input,
    pub output0: Output,
    pub output1: Output,
    /// Block this transaction was included in; zero until inclusion.
    pub block_num: u64,
    /// Index within the including block; zero until inclusion.
    pub tx_idx: u32,
    /// Confirm signature of the transaction referenced by `input0`.
    pub input0_confirm_sig: Bytes,
    /// Confirm signature of the transaction referenced by `input1`.
    pub input1_confirm_sig: Bytes,
    pub fee: U256,
}

impl TransactionBody {
    /// keccak256 over the canonical body encoding; the digest each input
    /// owner signs to authorize the spend.
    pub fn sig_hash(&self) -> B256 {
        keccak256(alloy_rlp::encode(self))
    }

    fn payload_length(&self) -> usize {
        self.input0.fields_length()
            + self.input0_confirm_sig.length()
            + self.input1.fields_length()
            + self.input1_confirm_sig.length()
            + self.output0.fields_length()
            + self.output1.fields_length()
            + B256::from(self.fee).length()
    }
}

impl Encodable for TransactionBody {
    fn encode(&self, out: &mut dyn BufMut) {
        Header {
            list: true,
            payload_length: self.payload_length(),
        }
        .encode(out);
        self.input0.encode_fields(out);
        self.input0_confirm_sig.encode(out);
        self.input1.encode_fields(out);
        self.input1_confirm_sig.encode(out);
        self.output0.encode_fields(out);
        self.output1.encode_fields(out);
        B256::from(self.fee).encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.payload_length();
        Header {
            list: true,
            payload_length,
        }
        .length()
            + payload_length
    }
}

fn decode_input(buf: &mut &[u8]) -> alloy_rlp::Result<Input> {
    let block_num = u64::decode(buf)?;
    let tx_idx = u32::decode(buf)?;
    let out_idx = u8::decode(buf)?;
    let deposit_nonce = U256::from_be_bytes(B256::decode(buf)?.0);
    Ok(Input {
        block_num,
        tx_idx,
        out_idx,
        deposit_nonce,
    })
}

fn decode_output(buf: &mut &[u8]) -> alloy_rlp::Result<Output> {
    let owner = Decodable::decode(buf)?;
    let amount = U256::from_be_bytes(B256::decode(buf)?.0);
    Ok(Output { owner, amount })
}

impl Decodable for TransactionBody {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let mut payload = Header::decode_bytes(buf, true)?;
        let input0 = decode_input(&mut payload)?;
        let input0_confirm_sig = Bytes::decode(&mut payload)?;
        let input1 = decode_input(&mut payload)?;
        let input1_confirm_sig = Bytes::decode(&mut payload)?;
        let output0 = decode_output(&mut payload)?;
        let output1 = decode_output(&mut payload)?;
        let fee = U256::from_be_bytes(B256::decode(&mut payload)?.0);
        if !payload.is_empty() {
            return Err(alloy_rlp::Error::UnexpectedLength);
        }
        Ok(TransactionBody {
            input0,
            input1,
            output0,
            output1,
            block_num: 0,
            tx_idx: 0,
            input0_confirm_sig,
            input1_confirm_sig,
            fee,
        })
    }
}

/// A transaction body plus its authorization signatures, one per input owner.
/// A single signer owning both inputs reuses one signature across both slots.
/// Signatures are empty until [`Transaction::attach_signatures`] runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub body: TransactionBody,
    pub signature0: Bytes,
    pub signature1: Bytes,
}

impl Transaction {
    /// Wraps an unsigned body.
    pub fn unsigned(body: TransactionBody) -> Self {
        Transaction {
            body,
            signature0: Bytes::new(),
            signature1: Bytes::new(),
        }
    }

    pub fn new(body: TransactionBody, signature0: Bytes, signature1: Bytes) -> Self {
        Transaction {
            body,
            signature0,
            signature1,
        }
    }

    /// Attaches the authorization signatures produced over
    /// [`TransactionBody::sig_hash`].
    pub fn attach_signatures(&mut self, signature0: Bytes, signature1: Bytes) {
        self.signature0 = signature0;
        self.signature1 = signature1;
    }

    /// Canonical encoding of body plus signatures; what the node records,
    /// what Merkle leaves hash, and what exits submit on chain.
    pub fn encoded(&self) -> Vec<u8> {
        alloy_rlp::encode(self)
    }
}

impl Encodable for Transaction {
    fn encode(&self, out: &mut dyn BufMut) {
        let sigs_payload = self.signature0.length() + self.signature1.length();
        let sigs_header = Header {
            list: true,
            payload_length: sigs_payload,
        };
        let payload_length = self.body.length() + sigs_header.length() + sigs_payload;
        Header {
            list: true,
            payload_length,
        }
        .encode(out);
        self.body.encode(out);
        sigs_header.encode(out);
        self.signature0.encode(out);
        self.signature1.encode(out);
    }

    fn length(&self) -> usize {
        let sigs_payload = self.signature0.length() + self.signature1.length();
        let sigs_header = Header {
            list: true,
            payload_length: sigs_payload,
        };
        let payload_length = self.body.length() + sigs_header.length() + sigs_payload;
        Header {
            list: true,
            payload_length,
        }
        .length()
            + payload_length
    }
}

impl Decodable for Transaction {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let mut payload = Header::decode_bytes(buf, true)?;
        let body = TransactionBody::decode(&mut payload)?;
        let mut sigs = Header::decode_bytes(&mut payload, true)?;
        let signature0 = Bytes::decode(&mut sigs)?;
        let signature1 = Bytes::decode(&mut sigs)?;
        if !sigs.is_empty() || !payload.is_empty() {
            return Err(alloy_rlp::Error::UnexpectedLength);
        }
        Ok(Transaction {
            body,
            signature0,
            signature1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, Address};

    fn zero_body() -> TransactionBody {
        TransactionBody {
            input0: Input::zero(),
            input1: Input::zero(),
            output0: Output::zero(),
            output1: Output::zero(),
            block_num: 0,
            tx_idx: 0,
            input0_confirm_sig: zero_signature(),
            input1_confirm_sig: zero_signature(),
            fee: U256::ZERO,
        }
    }

    fn sample_body() -> TransactionBody {
        TransactionBody {
            input0: Input::from_deposit(U256::from(3)),
            input1: Input::zero(),
            output0: Output::new(
                address!("70997970C51812dc3A010C7d01b50e0d17dc79C8"),
                U256::from(100),
            ),
            output1: Output::new(
                address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC"),
                U256::from(899),
            ),
            block_num: 0,
            tx_idx: 0,
            input0_confirm_sig: zero_signature(),
            input1_confirm_sig: zero_signature(),
            fee: U256::from(1),
        }
    }

    #[test]
    fn zero_transaction_encoded_size_is_fixed() {
        // Per input: 3 one-byte zero indices + 33-byte nonce + 67-byte
        // confirm sig = 103. Per output: 21 + 33 = 54. Fee: 33.
        // Body payload 347, 3-byte list header -> 350. Empty sigs list is
        // 3 bytes, outer header 3 bytes -> 356 total.
        let tx = Transaction::unsigned(zero_body());
        let encoded = tx.encoded();
        assert_eq!(encoded.len(), 356);
        assert_eq!(tx.length(), 356);
    }

    #[test]
    fn round_trip_is_byte_identical() {
        let mut tx = Transaction::unsigned(sample_body());
        tx.attach_signatures(Bytes::from(vec![7u8; 65]), Bytes::from(vec![7u8; 65]));

        let encoded = tx.encoded();
        let decoded = Transaction::decode(&mut encoded.as_slice()).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.encoded(), encoded);
    }

    #[test]
    fn body_round_trip_preserves_fields() {
        let body = sample_body();
        let encoded = alloy_rlp::encode(&body);
        let decoded = TransactionBody::decode(&mut encoded.as_slice()).unwrap();
        assert_eq!(decoded, body);
        assert_eq!(decoded.input0.deposit_nonce, U256::from(3));
        assert_eq!(decoded.output1.amount, U256::from(899));
    }

    #[test]
    fn sig_hash_covers_only_the_body() {
        let body = sample_body();
        let mut tx = Transaction::unsigned(body.clone());
        let before = tx.body.sig_hash();
        tx.attach_signatures(Bytes::from(vec![9u8; 65]), Bytes::from(vec![9u8; 65]));
        assert_eq!(tx.body.sig_hash(), before);
        assert_eq!(before, keccak256(alloy_rlp::encode(&body)));
    }

    #[test]
    fn sig_hash_changes_with_any_field() {
        let base = sample_body();
        let mut fee_changed = base.clone();
        fee_changed.fee = U256::from(2);
        assert_ne!(base.sig_hash(), fee_changed.sig_hash());

        let mut owner_changed = base.clone();
        owner_changed.output0.owner = Address::ZERO;
        assert_ne!(base.sig_hash(), owner_changed.sig_hash());
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let tx = Transaction::unsigned(sample_body());
        let mut truncated = tx.encoded();
        truncated.truncate(truncated.len() - 1);
        assert!(Transaction::decode(&mut truncated.as_slice()).is_err());
    }
}
