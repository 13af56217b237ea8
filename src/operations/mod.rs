//! Multi-step protocol flows composed from the root client, the contract
//! proxy, and a signer. Each operation validates locally before any network
//! traffic and surfaces the first error unchanged.

mod exit;
mod send;

pub use exit::ExitOperation;
pub use send::SendOperation;
