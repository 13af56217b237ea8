//! Structured JSON-RPC 2.0 dialect of the root node.
//!
//! Big numbers travel as `{ "hex": … }` envelopes, positions under their
//! short `blockNum`/`txIdx`/`outIdx` names, and every call is a POST to the
//! root URL with a method name from the node's service definition.

use std::sync::atomic::{AtomicU64, Ordering};

use alloy::primitives::{Address, Bytes, U256};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    Block, BlockHeader, ConfirmedTransaction, Input, Outpoint, Output, Transaction,
    TransactionBody,
};
use crate::error::{Error, Result};
use crate::rpc::{
    parse_address, parse_b256, parse_hex, to_hex, Inclusion, RootClient, SendResponse,
};
use async_trait::async_trait;

/// A big number as the node frames it: unprefixed big-endian hex.
#[derive(Debug, Serialize, Deserialize)]
struct BnWire {
    hex: String,
}

fn to_bn_wire(value: U256) -> BnWire {
    BnWire {
        hex: format!("{value:x}"),
    }
}

fn from_bn_wire(wire: &BnWire) -> Result<U256> {
    U256::from_str_radix(wire.hex.trim_start_matches("0x"), 16)
        .map_err(|e| Error::encoding(format!("invalid hex number {:?}: {e}", wire.hex)))
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InputWire {
    block_num: String,
    tx_idx: u32,
    out_idx: u8,
    deposit_nonce: BnWire,
}

#[derive(Debug, Serialize, Deserialize)]
struct OutputWire {
    owner: String,
    amount: BnWire,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionBodyWire {
    input0: InputWire,
    input0_confirm_sig: String,
    input1: InputWire,
    input1_confirm_sig: String,
    output0: OutputWire,
    output1: OutputWire,
    fee: BnWire,
    block_num: String,
    tx_idx: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct TransactionWire {
    body: TransactionBodyWire,
    sig0: String,
    sig1: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmedTransactionWire {
    confirm_sig0: String,
    confirm_sig1: String,
    transaction: TransactionWire,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockHeaderWire {
    merkle_root: String,
    number: String,
}

#[derive(Debug, Deserialize)]
struct BlockInnerWire {
    header: BlockHeaderWire,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockWire {
    block: BlockInnerWire,
    confirmed_transactions: Vec<ConfirmedTransactionWire>,
}

#[derive(Debug, Deserialize)]
struct GetBalanceResponse {
    balance: BnWire,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetOutputsResponse {
    confirmed_transactions: Vec<ConfirmedTransactionWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InclusionWire {
    merkle_root: String,
    block_number: u64,
    transaction_index: u32,
}

#[derive(Debug, Deserialize)]
struct SendResponseWire {
    transaction: TransactionWire,
    inclusion: InclusionWire,
}

#[derive(Serialize)]
struct RpcRequest<'a, P: Serialize> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct RpcResponse<R> {
    result: Option<R>,
    error: Option<RpcErrorWire>,
}

#[derive(Deserialize)]
struct RpcErrorWire {
    code: i64,
    message: String,
}

fn parse_block_num(value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|e| Error::encoding(format!("invalid block number {value:?}: {e}")))
}

fn input_from_wire(wire: &InputWire) -> Result<Input> {
    Input::new(
        parse_block_num(&wire.block_num)?,
        wire.tx_idx,
        wire.out_idx,
        from_bn_wire(&wire.deposit_nonce)?,
    )
}

fn input_to_wire(input: &Input) -> InputWire {
    InputWire {
        block_num: input.block_num.to_string(),
        tx_idx: input.tx_idx,
        out_idx: input.out_idx,
        deposit_nonce: to_bn_wire(input.deposit_nonce),
    }
}

fn output_from_wire(wire: &OutputWire) -> Result<Output> {
    Ok(Output {
        owner: parse_address(&wire.owner)?,
        amount: from_bn_wire(&wire.amount)?,
    })
}

fn output_to_wire(output: &Output) -> OutputWire {
    OutputWire {
        owner: to_hex(output.owner.as_slice()),
        amount: to_bn_wire(output.amount),
    }
}

fn transaction_from_wire(wire: &TransactionWire) -> Result<Transaction> {
    let body = TransactionBody {
        input0: input_from_wire(&wire.body.input0)?,
        input1: input_from_wire(&wire.body.input1)?,
        output0: output_from_wire(&wire.body.output0)?,
        output1: output_from_wire(&wire.body.output1)?,
        block_num: parse_block_num(&wire.body.block_num)?,
        tx_idx: wire.body.tx_idx,
        input0_confirm_sig: Bytes::from(parse_hex(&wire.body.input0_confirm_sig)?),
        input1_confirm_sig: Bytes::from(parse_hex(&wire.body.input1_confirm_sig)?),
        fee: from_bn_wire(&wire.body.fee)?,
    };
    Ok(Transaction::new(
        body,
        Bytes::from(parse_hex(&wire.sig0)?),
        Bytes::from(parse_hex(&wire.sig1)?),
    ))
}

fn transaction_to_wire(tx: &Transaction) -> TransactionWire {
    TransactionWire {
        body: TransactionBodyWire {
            input0: input_to_wire(&tx.body.input0),
            input0_confirm_sig: to_hex(&tx.body.input0_confirm_sig),
            input1: input_to_wire(&tx.body.input1),
            input1_confirm_sig: to_hex(&tx.body.input1_confirm_sig),
            output0: output_to_wire(&tx.body.output0),
            output1: output_to_wire(&tx.body.output1),
            fee: to_bn_wire(tx.body.fee),
            block_num: tx.body.block_num.to_string(),
            tx_idx: tx.body.tx_idx,
        },
        sig0: to_hex(&tx.signature0),
        sig1: to_hex(&tx.signature1),
    }
}

fn confirmed_from_wire(wire: &ConfirmedTransactionWire) -> Result<ConfirmedTransaction> {
    Ok(ConfirmedTransaction::new(
        transaction_from_wire(&wire.transaction)?,
        Some([
            Bytes::from(parse_hex(&wire.confirm_sig0)?),
            Bytes::from(parse_hex(&wire.confirm_sig1)?),
        ]),
    ))
}

/// Talks to a root node exposing the JSON-RPC dialect.
pub struct RpcRootClient {
    client: Client,
    root_url: String,
    next_id: AtomicU64,
}

impl RpcRootClient {
    pub fn new(client: Client, root_url: impl Into<String>) -> Self {
        RpcRootClient {
            client,
            root_url: root_url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    async fn call<P: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        debug!(%method, "root node RPC call");
        let response = self
            .client
            .post(&self.root_url)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::remote(format!(
                "root node returned {status}: {detail}"
            )));
        }
        let envelope: RpcResponse<R> = response.json().await?;
        if let Some(error) = envelope.error {
            return Err(Error::remote(format!(
                "root node rejected {method} ({}): {}",
                error.code, error.message
            )));
        }
        envelope
            .result
            .ok_or_else(|| Error::encoding(format!("{method} response had no result")))
    }
}

#[async_trait]
impl RootClient for RpcRootClient {
    async fn get_balance(&self, address: Address) -> Result<U256> {
        let response: GetBalanceResponse = self
            .call(
                "GetBalance",
                serde_json::json!({ "address": to_hex(address.as_slice()) }),
            )
            .await?;
        from_bn_wire(&response.balance)
    }

    async fn get_block(&self, number: u64) -> Result<Block> {
        let wire: BlockWire = self
            .call("GetBlock", serde_json::json!({ "number": number }))
            .await?;
        let transactions = wire
            .confirmed_transactions
            .iter()
            .map(confirmed_from_wire)
            .collect::<Result<Vec<_>>>()?;
        Ok(Block {
            header: BlockHeader {
                merkle_root: parse_b256(&wire.block.header.merkle_root)?,
                number: parse_block_num(&wire.block.header.number)?,
            },
            transactions,
        })
    }

    async fn get_utxos(&self, address: Address) -> Result<Vec<Outpoint>> {
        let response: GetOutputsResponse = self
            .call(
                "GetOutputs",
                serde_json::json!({
                    "address": to_hex(address.as_slice()),
                    "spendable": true,
                }),
            )
            .await?;
        response
            .confirmed_transactions
            .iter()
            .map(|wire| Outpoint::from_confirmed(confirmed_from_wire(wire)?, address))
            .collect()
    }

    async fn send(&self, tx: &Transaction) -> Result<SendResponse> {
        let wire: SendResponseWire = self
            .call(
                "Send",
                serde_json::json!({ "transaction": transaction_to_wire(tx) }),
            )
            .await?;
        Ok(SendResponse {
            transaction: transaction_from_wire(&wire.transaction)?,
            inclusion: Inclusion {
                merkle_root: parse_b256(&wire.inclusion.merkle_root)?,
                block_num: wire.inclusion.block_number,
                tx_idx: wire.inclusion.transaction_index,
            },
        })
    }

    async fn confirm(&self, confirmed: &ConfirmedTransaction) -> Result<()> {
        let sigs = confirmed.require_confirm_signatures()?;
        let _: serde_json::Value = self
            .call(
                "Confirm",
                serde_json::json!({
                    "blockNumber": confirmed.transaction.body.block_num,
                    "transactionIndex": confirmed.transaction.body.tx_idx,
                    "confirmSig0": to_hex(&sigs[0]),
                    "confirmSig1": to_hex(&sigs[1]),
                }),
            )
            .await?;
        Ok(())
    }
}
