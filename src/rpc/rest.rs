//! REST/JSON dialect of the root node.
//!
//! Byte fields travel as 0x-hex strings, amounts and nonces as decimal
//! strings, positions as `blockNumber`/`transactionIndex`/`outputIndex`
//! numbers. The node records signatures exactly as submitted, so the send
//! payload carries both authorization signatures.

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
    parse_address, parse_b256, parse_decimal, parse_hex, to_hex, Inclusion, RootClient,
    SendResponse,
};
use async_trait::async_trait;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InputWire {
    block_number: u64,
    transaction_index: u32,
    output_index: u8,
    deposit_nonce: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct OutputWire {
    owner: String,
    amount: String,
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
    fee: String,
    block_number: u64,
    transaction_index: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct TransactionWire {
    body: TransactionBodyWire,
    sigs: [String; 2],
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmedTransactionWire {
    confirm_sigs: [String; 2],
    transaction: TransactionWire,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockHeaderWire {
    merkle_root: String,
    number: u64,
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
struct BalanceWire {
    balance: String,
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

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmRequestWire {
    block_number: u64,
    transaction_index: u32,
    confirm_sig0: String,
    confirm_sig1: String,
}

fn input_from_wire(wire: &InputWire) -> Result<Input> {
    Input::new(
        wire.block_number,
        wire.transaction_index,
        wire.output_index,
        parse_decimal(&wire.deposit_nonce)?,
    )
}

fn input_to_wire(input: &Input) -> InputWire {
    InputWire {
        block_number: input.block_num,
        transaction_index: input.tx_idx,
        output_index: input.out_idx,
        deposit_nonce: input.deposit_nonce.to_string(),
    }
}

fn output_from_wire(wire: &OutputWire) -> Result<Output> {
    Ok(Output {
        owner: parse_address(&wire.owner)?,
        amount: parse_decimal(&wire.amount)?,
    })
}

fn output_to_wire(output: &Output) -> OutputWire {
    OutputWire {
        owner: to_hex(output.owner.as_slice()),
        amount: output.amount.to_string(),
    }
}

fn transaction_from_wire(wire: &TransactionWire) -> Result<Transaction> {
    let body = TransactionBody {
        input0: input_from_wire(&wire.body.input0)?,
        input1: input_from_wire(&wire.body.input1)?,
        output0: output_from_wire(&wire.body.output0)?,
        output1: output_from_wire(&wire.body.output1)?,
        block_num: wire.body.block_number,
        tx_idx: wire.body.transaction_index,
        input0_confirm_sig: Bytes::from(parse_hex(&wire.body.input0_confirm_sig)?),
        input1_confirm_sig: Bytes::from(parse_hex(&wire.body.input1_confirm_sig)?),
        fee: parse_decimal(&wire.body.fee)?,
    };
    Ok(Transaction::new(
        body,
        Bytes::from(parse_hex(&wire.sigs[0])?),
        Bytes::from(parse_hex(&wire.sigs[1])?),
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
            fee: tx.body.fee.to_string(),
            block_number: tx.body.block_num,
            transaction_index: tx.body.tx_idx,
        },
        sigs: [to_hex(&tx.signature0), to_hex(&tx.signature1)],
    }
}

fn confirmed_from_wire(wire: &ConfirmedTransactionWire) -> Result<ConfirmedTransaction> {
    Ok(ConfirmedTransaction::new(
        transaction_from_wire(&wire.transaction)?,
        Some([
            Bytes::from(parse_hex(&wire.confirm_sigs[0])?),
            Bytes::from(parse_hex(&wire.confirm_sigs[1])?),
        ]),
    ))
}

fn block_from_wire(wire: BlockWire) -> Result<Block> {
    let transactions = wire
        .confirmed_transactions
        .iter()
        .map(confirmed_from_wire)
        .collect::<Result<Vec<_>>>()?;
    Ok(Block {
        header: BlockHeader {
            merkle_root: parse_b256(&wire.block.header.merkle_root)?,
            number: wire.block.header.number,
        },
        transactions,
    })
}

/// Talks to a root node exposing the REST dialect.
pub struct RestRootClient {
    client: Client,
    root_url: String,
}

impl RestRootClient {
    pub fn new(client: Client, root_url: impl Into<String>) -> Self {
        let root_url = root_url.into().trim_end_matches('/').to_string();
        RestRootClient { client, root_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.root_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(%url, "root node GET");
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        debug!(%url, "root node POST");
        let response = self.client.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::remote(format!(
                "root node returned {status}: {detail}"
            )));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl RootClient for RestRootClient {
    async fn get_balance(&self, address: Address) -> Result<U256> {
        let wire: BalanceWire = self
            .get_json(&format!("balances/{}", to_hex(address.as_slice())))
            .await?;
        parse_decimal(&wire.balance)
    }

    async fn get_block(&self, number: u64) -> Result<Block> {
        let wire: BlockWire = self.get_json(&format!("blocks/{number}")).await?;
        block_from_wire(wire)
    }

    async fn get_utxos(&self, address: Address) -> Result<Vec<Outpoint>> {
        let wires: Vec<ConfirmedTransactionWire> = self
            .get_json(&format!("utxos/{}", to_hex(address.as_slice())))
            .await?;
        wires
            .iter()
            .map(|wire| Outpoint::from_confirmed(confirmed_from_wire(wire)?, address))
            .collect()
    }

    async fn send(&self, tx: &Transaction) -> Result<SendResponse> {
        let wire: SendResponseWire = self.post_json("send", &transaction_to_wire(tx)).await?;
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
        let request = ConfirmRequestWire {
            block_number: confirmed.transaction.body.block_num,
            transaction_index: confirmed.transaction.body.tx_idx,
            confirm_sig0: to_hex(&sigs[0]),
            confirm_sig1: to_hex(&sigs[1]),
        };
        let _: serde_json::Value = self.post_json("confirm", &request).await?;
        Ok(())
    }
}
