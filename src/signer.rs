//! The signing capability.
//!
//! Operations never see a concrete signer; they take `&dyn Signer` and the
//! caller decides between an in-process key and a node-side wallet. Both
//! variants apply the Ethereum personal-message prefix to the 32-byte digest
//! before the final keccak, matching what the contract recovers.

use alloy::primitives::{Address, Bytes, B256};
use alloy::providers::{DynProvider, Provider};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer as AlloySigner;
use async_trait::async_trait;

use crate::error::{Error, Result};

#[async_trait]
pub trait Signer: Send + Sync {
    /// Signs a 32-byte digest, returning the 65-byte `r || s || v` signature
    /// with the personal-message prefix applied.
    async fn sign_digest(&self, digest: &B256) -> Result<Bytes>;

    /// The address signatures from this signer recover to.
    fn address(&self) -> Address;
}

/// Signs with a private key held in process.
pub struct LocalSigner {
    inner: PrivateKeySigner,
}

impl LocalSigner {
    pub fn new(inner: PrivateKeySigner) -> Self {
        LocalSigner { inner }
    }

    /// Parses a hex private key, with or without a `0x` prefix.
    pub fn from_hex(private_key: &str) -> Result<Self> {
        let key = private_key.trim_start_matches("0x");
        let inner: PrivateKeySigner = key
            .parse()
            .map_err(|e| Error::validation(format!("failed to parse private key: {e}")))?;
        Ok(LocalSigner { inner })
    }
}

#[async_trait]
impl Signer for LocalSigner {
    async fn sign_digest(&self, digest: &B256) -> Result<Bytes> {
        // sign_message prefixes with "\x19Ethereum Signed Message:\n32".
        let sig = self
            .inner
            .sign_message(digest.as_slice())
            .await
            .map_err(|e| Error::remote(e.to_string()))?;
        Ok(Bytes::from(sig.as_bytes().to_vec()))
    }

    fn address(&self) -> Address {
        self.inner.address()
    }
}

/// Delegates signing to an external wallet behind a provider, via
/// `personal_sign`. The key never enters this process.
pub struct NodeSigner {
    provider: DynProvider,
    from: Address,
}

impl NodeSigner {
    pub fn new(provider: DynProvider, from: Address) -> Self {
        NodeSigner { provider, from }
    }
}

#[async_trait]
impl Signer for NodeSigner {
    async fn sign_digest(&self, digest: &B256) -> Result<Bytes> {
        let message = format!("0x{}", hex::encode(digest.as_slice()));
        let signature: String = self
            .provider
            .client()
            .request("personal_sign", (message, self.from))
            .await
            .map_err(|e| Error::remote(e.to_string()))?;
        let raw = hex::decode(signature.trim_start_matches("0x"))
            .map_err(|e| Error::encoding(format!("invalid personal_sign response: {e}")))?;
        Ok(Bytes::from(raw))
    }

    fn address(&self) -> Address {
        self.from
    }
}
