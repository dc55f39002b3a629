use crate::utils::abi;
use crate::utils::error::{DeployError, Result};
use alloy_primitives::{Address, Bytes, B256, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 由執行環境提供的簽署身分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    pub index: usize,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
}

impl AbiItem {
    /// `name(type1,type2)` 形式的函式簽名
    pub fn signature(&self) -> Option<String> {
        let name = self.name.as_deref()?;
        let types: Vec<&str> = self.inputs.iter().map(|p| p.kind.as_str()).collect();
        Some(format!("{}({})", name, types.join(",")))
    }
}

/// Hardhat 編譯產物（只保留部署需要的欄位）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    #[serde(default)]
    pub source_name: String,
    #[serde(default)]
    pub abi: Vec<AbiItem>,
    #[serde(default)]
    pub bytecode: Bytes,
}

impl ContractArtifact {
    pub fn constructor_inputs(&self) -> &[AbiParam] {
        self.abi
            .iter()
            .find(|item| item.kind == "constructor")
            .map(|item| item.inputs.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_function(&self, signature: &str) -> bool {
        self.abi
            .iter()
            .filter(|item| item.kind == "function")
            .any(|item| item.signature().as_deref() == Some(signature))
    }
}

/// Constructor handle for a named contract.
#[derive(Debug, Clone)]
pub struct ContractFactory {
    artifact: ContractArtifact,
}

impl ContractFactory {
    pub fn new(artifact: ContractArtifact) -> Self {
        Self { artifact }
    }

    pub fn name(&self) -> &str {
        &self.artifact.contract_name
    }

    pub fn artifact(&self) -> &ContractArtifact {
        &self.artifact
    }

    /// Checks the arguments against the ABI constructor and appends them to the
    /// creation bytecode.
    pub fn deploy_data(&self, args: &[U256]) -> Result<Bytes> {
        let inputs = self.artifact.constructor_inputs();
        if inputs.len() != args.len() {
            return Err(DeployError::ConstructorArgumentError {
                contract: self.name().to_string(),
                expected: inputs.len(),
                actual: args.len(),
            });
        }
        if let Some(param) = inputs.iter().find(|p| !p.kind.starts_with("uint")) {
            return Err(DeployError::ConfigError {
                message: format!(
                    "Constructor parameter '{}' of '{}' has unsupported type {}",
                    param.name,
                    self.name(),
                    param.kind
                ),
            });
        }

        let tokens: Vec<abi::Token> = args.iter().copied().map(abi::Token::Uint).collect();
        let mut data = self.artifact.bytecode.to_vec();
        data.extend_from_slice(&abi::encode_arguments(&tokens));
        Ok(Bytes::from(data))
    }
}

/// A deployed contract instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedContract {
    pub name: String,
    pub address: Address,
    pub deployer: Address,
    pub transaction_hash: B256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub block_number: u64,
    pub success: bool,
    pub contract_address: Option<Address>,
    pub gas_used: U256,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentReport {
    pub network: String,
    pub chain_id: u64,
    pub contract: String,
    pub address: Address,
    pub deployer: Address,
    pub transaction_hash: B256,
    pub initial_supply: U256,
    pub deployed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub contract: DeployedContract,
    pub owner: Address,
    pub recipient: Address,
    pub bystander: Address,
    pub owner_balance: U256,
    pub recipient_balance: U256,
    pub bystander_balance: U256,
}
