//! Canonical value objects of the sidechain and their binary codec.
//!
//! Everything here is an immutable value created by the builder or decoded
//! off the wire and consumed once; only signature fields are attached after
//! construction.

mod block;
mod confirmed;
mod deposit;
mod input;
mod outpoint;
mod output;
mod transaction;

pub use block::{Block, BlockHeader};
pub use confirmed::ConfirmedTransaction;
pub use deposit::OnChainDeposit;
pub use input::Input;
pub use outpoint::Outpoint;
pub use output::Output;
pub use transaction::{zero_signature, Transaction, TransactionBody, SIGNATURE_LENGTH};
