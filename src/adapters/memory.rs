use crate::utils::abi;
use crate::core::deployer::DEFAULT_CONTRACT;
use crate::core::ContractRuntime;
use crate::domain::model::{
    AbiItem, AbiParam, ContractArtifact, ContractFactory, DeployedContract, Signer,
    TransactionReceipt,
};
use crate::utils::error::{DeployError, Result};
use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

pub const LOCAL_CHAIN_ID: u64 = 31337;
pub const DEFAULT_SIGNER_COUNT: usize = 20;

fn param(name: &str, kind: &str) -> AbiParam {
    AbiParam {
        name: name.to_string(),
        kind: kind.to_string(),
    }
}

fn function(name: &str, inputs: Vec<AbiParam>, output: &str) -> AbiItem {
    AbiItem {
        kind: "function".to_string(),
        name: Some(name.to_string()),
        inputs,
        outputs: vec![param("", output)],
    }
}

/// ABI of a fixed-supply token with an `initialSupply` constructor.
pub fn fungible_token_artifact(name: &str) -> ContractArtifact {
    ContractArtifact {
        contract_name: name.to_string(),
        source_name: format!("contracts/{}.sol", name),
        abi: vec![
            AbiItem {
                kind: "constructor".to_string(),
                name: None,
                inputs: vec![param("initialSupply", "uint256")],
                outputs: vec![],
            },
            function(
                "transfer",
                vec![param("to", "address"), param("amount", "uint256")],
                "bool",
            ),
            function("balanceOf", vec![param("account", "address")], "uint256"),
            function("totalSupply", vec![], "uint256"),
        ],
        bytecode: Bytes::new(),
    }
}

#[derive(Debug, Default)]
struct TokenLedger {
    total_supply: U256,
    balances: HashMap<Address, U256>,
}

impl TokenLedger {
    fn balance(&self, owner: &Address) -> U256 {
        self.balances.get(owner).copied().unwrap_or(U256::ZERO)
    }
}

#[derive(Debug, Default)]
struct State {
    block_number: u64,
    nonces: HashMap<Address, u64>,
    contracts: HashMap<Address, TokenLedger>,
    artifacts: HashMap<String, ContractArtifact>,
    deploy_rejection: Option<String>,
}

impl State {
    /// 遞增 nonce 並產生一個新的區塊
    fn next_transaction(&mut self, from: Address, payload: &[u8]) -> (u64, B256) {
        let nonce = self.nonces.entry(from).or_insert(0);
        let current = *nonce;
        *nonce += 1;
        self.block_number += 1;

        let mut preimage = from.to_vec();
        preimage.extend_from_slice(&current.to_be_bytes());
        preimage.extend_from_slice(payload);
        (current, keccak256(preimage))
    }
}

/// Deterministic in-process stand-in for a dev node.
pub struct InMemoryRuntime {
    signers: Vec<Signer>,
    state: Mutex<State>,
}

impl InMemoryRuntime {
    pub fn new() -> Self {
        Self::with_signer_count(DEFAULT_SIGNER_COUNT)
    }

    pub fn with_signer_count(count: usize) -> Self {
        let signers = (0..count)
            .map(|index| Signer {
                index,
                address: Address::from_word(keccak256(format!("in-memory-signer-{}", index))),
            })
            .collect();

        let mut state = State::default();
        state.artifacts.insert(
            DEFAULT_CONTRACT.to_string(),
            fungible_token_artifact(DEFAULT_CONTRACT),
        );

        Self {
            signers,
            state: Mutex::new(state),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // 鎖中毒時沿用內部狀態
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn register_artifact(&self, artifact: ContractArtifact) {
        self.state()
            .artifacts
            .insert(artifact.contract_name.clone(), artifact);
    }

    /// Every later deployment fails with `reason`.
    pub fn reject_deployments(&self, reason: impl Into<String>) {
        self.state().deploy_rejection = Some(reason.into());
    }

    pub fn deployment_count(&self) -> usize {
        self.state().contracts.len()
    }

    pub fn total_supply(&self, contract: Address) -> Option<U256> {
        self.state().contracts.get(&contract).map(|l| l.total_supply)
    }
}

impl Default for InMemoryRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContractRuntime for InMemoryRuntime {
    async fn signers(&self) -> Result<Vec<Signer>> {
        Ok(self.signers.clone())
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(LOCAL_CHAIN_ID)
    }

    async fn contract_factory(&self, name: &str) -> Result<ContractFactory> {
        self.state()
            .artifacts
            .get(name)
            .cloned()
            .map(ContractFactory::new)
            .ok_or_else(|| DeployError::ArtifactNotFound {
                name: name.to_string(),
                search_path: "in-memory registry".to_string(),
            })
    }

    async fn deploy(
        &self,
        factory: &ContractFactory,
        from: &Signer,
        args: &[U256],
    ) -> Result<DeployedContract> {
        let data = factory.deploy_data(args)?;
        let artifact = factory.artifact();
        if !artifact.has_function(abi::TRANSFER) || !artifact.has_function(abi::BALANCE_OF) {
            return Err(DeployError::ConfigError {
                message: format!("'{}' does not expose a token interface", factory.name()),
            });
        }

        let mut state = self.state();
        let (nonce, tx_hash) = state.next_transaction(from.address, &data);

        if let Some(reason) = state.deploy_rejection.clone() {
            return Err(DeployError::TransactionReverted { tx_hash, reason });
        }

        let address = from.address.create(nonce);
        let supply = args.first().copied().unwrap_or(U256::ZERO);
        let mut ledger = TokenLedger {
            total_supply: supply,
            ..TokenLedger::default()
        };
        ledger.balances.insert(from.address, supply);
        state.contracts.insert(address, ledger);

        tracing::debug!("In-memory deploy of '{}' at {}", factory.name(), address);

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
        let mut state = self.state();
        if !state.contracts.contains_key(&contract.address) {
            return Err(DeployError::UnknownContract {
                address: contract.address.to_string(),
            });
        }

        let (_, tx_hash) = state.next_transaction(from.address, &data);
        let block_number = state.block_number;
        let ledger = state
            .contracts
            .get_mut(&contract.address)
            .ok_or_else(|| DeployError::UnknownContract {
                address: contract.address.to_string(),
            })?;

        let sender_balance = ledger.balance(&from.address);
        let remaining =
            sender_balance
                .checked_sub(amount)
                .ok_or_else(|| DeployError::TransactionReverted {
                    tx_hash,
                    reason: format!(
                        "transfer amount {} exceeds balance {}",
                        amount, sender_balance
                    ),
                })?;
        ledger.balances.insert(from.address, remaining);
        let credited = ledger.balance(&to) + amount;
        ledger.balances.insert(to, credited);

        Ok(TransactionReceipt {
            transaction_hash: tx_hash,
            block_number,
            success: true,
            contract_address: None,
            gas_used: U256::ZERO,
        })
    }

    async fn balance_of(&self, contract: &DeployedContract, owner: Address) -> Result<U256> {
        self.state()
            .contracts
            .get(&contract.address)
            .map(|ledger| ledger.balance(&owner))
            .ok_or_else(|| DeployError::UnknownContract {
                address: contract.address.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signers_are_distinct() {
        let runtime = InMemoryRuntime::with_signer_count(3);
        let signers = tokio_test::block_on(runtime.signers()).unwrap();

        assert_eq!(signers.len(), 3);
        assert_ne!(signers[0].address, signers[1].address);
        assert_ne!(signers[1].address, signers[2].address);
        assert_eq!(signers[2].index, 2);
    }

    #[test]
    fn test_supply_credited_to_deployer() {
        let runtime = InMemoryRuntime::new();
        let signers = tokio_test::block_on(runtime.signers()).unwrap();
        let factory = tokio_test::block_on(runtime.contract_factory(DEFAULT_CONTRACT)).unwrap();

        let contract =
            tokio_test::block_on(runtime.deploy(&factory, &signers[0], &[U256::from(1000u64)]))
                .unwrap();

        assert_eq!(contract.address, signers[0].address.create(0));
        assert_eq!(runtime.total_supply(contract.address), Some(U256::from(1000u64)));
        let balance =
            tokio_test::block_on(runtime.balance_of(&contract, signers[0].address)).unwrap();
        assert_eq!(balance, U256::from(1000u64));
    }

    #[test]
    fn test_transfer_over_balance_reverts() {
        let runtime = InMemoryRuntime::new();
        let signers = tokio_test::block_on(runtime.signers()).unwrap();
        let factory = tokio_test::block_on(runtime.contract_factory(DEFAULT_CONTRACT)).unwrap();
        let contract =
            tokio_test::block_on(runtime.deploy(&factory, &signers[0], &[U256::from(10u64)]))
                .unwrap();

        let result = tokio_test::block_on(runtime.transfer(
            &contract,
            &signers[0],
            signers[1].address,
            U256::from(11u64),
        ));
        assert!(matches!(result, Err(DeployError::TransactionReverted { .. })));

        let balance =
            tokio_test::block_on(runtime.balance_of(&contract, signers[0].address)).unwrap();
        assert_eq!(balance, U256::from(10u64));
    }

    #[test]
    fn test_unknown_contract_name() {
        let runtime = InMemoryRuntime::new();
        assert!(matches!(
            tokio_test::block_on(runtime.contract_factory("Vault")),
            Err(DeployError::ArtifactNotFound { .. })
        ));

        runtime.register_artifact(fungible_token_artifact("Vault"));
        assert!(tokio_test::block_on(runtime.contract_factory("Vault")).is_ok());
    }
}
