//! Error taxonomy for the client.
//!
//! Every operation either returns a fully-formed result or fails with one of
//! these kinds. Remote failures carry the underlying message verbatim; the
//! client never reinterprets or retries them.

/// Errors surfaced by the Plasma client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Local pre-network validation failure: a missing builder field, a bond
    /// exceeding the outpoint amount, spending a non-owned or over-amount
    /// deposit. Never transmitted.
    Validation(String),

    /// No outpoint or outpoint pair covers the requested amount.
    Selection(String),

    /// Malformed or schema-mismatched payload, on the wire or in an RLP
    /// round-trip.
    Encoding(String),

    /// RPC or contract call failure, including nonce-reuse rejections and
    /// exit reverts. Propagated with the underlying message.
    Remote(String),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    pub fn selection(msg: impl Into<String>) -> Self {
        Error::Selection(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Error::Encoding(msg.into())
    }

    pub fn remote(msg: impl Into<String>) -> Self {
        Error::Remote(msg.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Error::Validation(m) | Error::Selection(m) | Error::Encoding(m) | Error::Remote(m) => {
                m
            }
        }
    }

    /// Whether the failure happened before anything was transmitted.
    pub fn is_local(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::Selection(_))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Validation(m) => write!(f, "validation failed: {m}"),
            Error::Selection(m) => write!(f, "UTXO selection failed: {m}"),
            Error::Encoding(m) => write!(f, "encoding error: {m}"),
            Error::Remote(m) => write!(f, "remote error: {m}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Remote(e.to_string())
    }
}

impl From<alloy_rlp::Error> for Error {
    fn from(e: alloy_rlp::Error) -> Self {
        Error::Encoding(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Encoding(e.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_errors_are_local() {
        assert!(Error::validation("missing fee").is_local());
        assert!(Error::selection("no suitable UTXOs").is_local());
        assert!(!Error::remote("nonce already spent").is_local());
        assert!(!Error::encoding("bad payload").is_local());
    }

    #[test]
    fn display_includes_kind_and_message() {
        let e = Error::remote("deposit nonce already spent");
        assert_eq!(e.to_string(), "remote error: deposit nonce already spent");
        assert_eq!(e.message(), "deposit nonce already spent");
    }
}
