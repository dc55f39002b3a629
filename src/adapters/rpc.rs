use crate::utils::abi;
use crate::core::{ArtifactSource, ContractRuntime};
use crate::domain::model::{ContractFactory, DeployedContract, Signer, TransactionReceipt};
use crate::utils::error::{DeployError, Result};
use alloy_primitives::{Address, Bytes, B256, U256, U64};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

/// JSON-RPC 2.0 over HTTP.
pub struct JsonRpcClient {
    client: Client,
    url: String,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::debug!("➡️  {} #{} {}", method, id, body["params"]);
        let response = self.client.post(&self.url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DeployError::RpcError {
                method: method.to_string(),
                code: i64::from(status.as_u16()),
                message: format!("HTTP status {}", status),
            });
        }

        let payload: RpcResponse = response.json().await?;
        if let Some(error) = payload.error {
            return Err(DeployError::RpcError {
                method: method.to_string(),
                code: error.code,
                message: error.message,
            });
        }

        tracing::debug!("⬅️  {} #{} {}", method, id, payload.result);
        Ok(serde_json::from_value(payload.result)?)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionRequest {
    from: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<Address>,
    data: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    gas: Option<U64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: B256,
    #[serde(default)]
    block_number: Option<U64>,
    #[serde(default)]
    status: Option<U64>,
    #[serde(default)]
    contract_address: Option<Address>,
    #[serde(default)]
    gas_used: Option<U256>,
}

impl From<RpcReceipt> for TransactionReceipt {
    fn from(raw: RpcReceipt) -> Self {
        Self {
            transaction_hash: raw.transaction_hash,
            block_number: raw.block_number.map(|n| n.to::<u64>()).unwrap_or_default(),
            // pre-Byzantium 收據沒有 status
            success: raw.status.map(|s| s == U64::from(1u64)).unwrap_or(true),
            contract_address: raw.contract_address,
            gas_used: raw.gas_used.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfirmationPolicy {
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(200),
            max_attempts: 150,
        }
    }
}

/// Contract runtime backed by a node's JSON-RPC endpoint and local artifacts.
pub struct JsonRpcRuntime<A: ArtifactSource> {
    rpc: JsonRpcClient,
    artifacts: A,
    confirmation: ConfirmationPolicy,
    gas: Option<u64>,
}

impl<A: ArtifactSource> JsonRpcRuntime<A> {
    pub fn new(rpc: JsonRpcClient, artifacts: A) -> Self {
        Self {
            rpc,
            artifacts,
            confirmation: ConfirmationPolicy::default(),
            gas: None,
        }
    }

    pub fn with_confirmation(mut self, confirmation: ConfirmationPolicy) -> Self {
        self.confirmation = confirmation;
        self
    }

    pub fn with_gas(mut self, gas: Option<u64>) -> Self {
        self.gas = gas;
        self
    }

    async fn send_transaction(
        &self,
        from: Address,
        to: Option<Address>,
        data: Bytes,
    ) -> Result<B256> {
        let request = TransactionRequest {
            from,
            to,
            data,
            gas: self.gas.map(U64::from),
        };
        self.rpc
            .request("eth_sendTransaction", json!([request]))
            .await
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TransactionReceipt> {
        for attempt in 1..=self.confirmation.max_attempts {
            let receipt: Option<RpcReceipt> = self
                .rpc
                .request("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;

            if let Some(receipt) = receipt {
                let receipt = TransactionReceipt::from(receipt);
                if !receipt.success {
                    return Err(DeployError::TransactionReverted {
                        tx_hash,
                        reason: "receipt status 0x0".to_string(),
                    });
                }
                tracing::debug!(
                    "Transaction {} confirmed in block {} after {} poll(s)",
                    tx_hash,
                    receipt.block_number,
                    attempt
                );
                return Ok(receipt);
            }

            if attempt < self.confirmation.max_attempts {
                tokio::time::sleep(self.confirmation.poll_interval).await;
            }
        }

        Err(DeployError::ConfirmationTimeout {
            tx_hash,
            attempts: self.confirmation.max_attempts,
        })
    }
}

#[async_trait]
impl<A: ArtifactSource> ContractRuntime for JsonRpcRuntime<A> {
    async fn signers(&self) -> Result<Vec<Signer>> {
        let accounts: Vec<Address> = self.rpc.request("eth_accounts", json!([])).await?;
        Ok(accounts
            .into_iter()
            .enumerate()
            .map(|(index, address)| Signer { index, address })
            .collect())
    }

    async fn chain_id(&self) -> Result<u64> {
        let chain_id: U64 = self.rpc.request("eth_chainId", json!([])).await?;
        Ok(chain_id.to::<u64>())
    }

    async fn contract_factory(&self, name: &str) -> Result<ContractFactory> {
        let artifact = self.artifacts.load(name)?;
        Ok(ContractFactory::new(artifact))
    }

    async fn deploy(
        &self,
        factory: &ContractFactory,
        from: &Signer,
        args: &[U256],
    ) -> Result<DeployedContract> {
        let data = factory.deploy_data(args)?;
        let tx_hash = self.send_transaction(from.address, None, data).await?;
        tracing::info!("⏳ Deployment of '{}' sent: {}", factory.name(), tx_hash);

        let receipt = self.wait_for_receipt(tx_hash).await?;
        let address = receipt
            .contract_address
            .ok_or(DeployError::MissingContractAddress { tx_hash })?;

        Ok(DeployedContract {
            name: factory.name().to_string(),
            address,
            deployer: from.address,
            transaction_hash: tx_hash,
        })
    }

    async fn transfer(
        &self,
        contract: &DeployedContract,
        from: &Signer,
        to: Address,
        amount: U256,
    ) -> Result<TransactionReceipt> {
        let data = abi::transfer_call(to, amount);

        // 收據只反映 revert，`false` 回傳值要先用 eth_call 檢查
        let call = json!({
            "from": from.address,
            "to": contract.address,
            "data": data,
        });
        let output: Bytes = self.rpc.request("eth_call", json!([call, "latest"])).await?;
        if !abi::decode_bool(&output)? {
            return Err(DeployError::CallRejected {
                method: abi::TRANSFER.to_string(),
                reason: "token returned false".to_string(),
            });
        }

        let tx_hash = self
            .send_transaction(from.address, Some(contract.address), data)
            .await?;
        self.wait_for_receipt(tx_hash).await
    }

    async fn balance_of(&self, contract: &DeployedContract, owner: Address) -> Result<U256> {
        let call = json!({
            "to": contract.address,
            "data": abi::balance_of_call(owner),
        });
        let output: Bytes = self.rpc.request("eth_call", json!([call, "latest"])).await?;
        abi::decode_uint(&output)
    }
}
