use alloy::primitives::{Bytes, B256};

use crate::crypto::confirm_hash;
use crate::domain::Transaction;
use crate::error::{Error, Result};
use crate::signer::Signer;

/// A transaction together with the confirm signatures produced after it was
/// included in a block. The confirm signatures bind the transaction hash to
/// the including block's Merkle root; until they exist the transaction is not
/// safely spendable downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedTransaction {
    pub transaction: Transaction,
    pub confirm_signatures: Option<[Bytes; 2]>,
}

impl ConfirmedTransaction {
    pub fn new(transaction: Transaction, confirm_signatures: Option<[Bytes; 2]>) -> Self {
        ConfirmedTransaction {
            transaction,
            confirm_signatures,
        }
    }

    /// The digest a confirm signature signs:
    /// `sha256(sha256(txEncoding) || merkleRoot)`.
    pub fn confirm_hash(&self, merkle_root: &B256) -> B256 {
        confirm_hash(&self.transaction.encoded(), merkle_root)
    }

    /// Produces confirm signatures over the given Merkle root, filling both
    /// slots with the one signer's signature.
    pub async fn confirm_sign(&mut self, signer: &dyn Signer, merkle_root: &B256) -> Result<()> {
        let digest = self.confirm_hash(merkle_root);
        let sig = signer.sign_digest(&digest).await?;
        self.confirm_signatures = Some([sig.clone(), sig]);
        Ok(())
    }

    /// The confirm signatures, or a validation error if the transaction has
    /// not been confirmed yet.
    pub fn require_confirm_signatures(&self) -> Result<&[Bytes; 2]> {
        self.confirm_signatures
            .as_ref()
            .ok_or_else(|| Error::validation("transaction has no confirm signatures"))
    }
}
