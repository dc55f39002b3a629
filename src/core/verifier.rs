use crate::core::ContractRuntime;
use crate::core::deployer::{DEFAULT_CONTRACT, DEFAULT_INITIAL_SUPPLY};
use crate::domain::model::TransferOutcome;
use crate::utils::error::{DeployError, Result};
use alloy_primitives::U256;

pub const DEFAULT_TRANSFER_AMOUNT: u64 = 100;

#[derive(Debug, Clone)]
pub struct TransferScenario {
    pub contract: String,
    pub initial_supply: U256,
    pub amount: U256,
}

impl Default for TransferScenario {
    fn default() -> Self {
        Self {
            contract: DEFAULT_CONTRACT.to_string(),
            initial_supply: U256::from(DEFAULT_INITIAL_SUPPLY),
            amount: U256::from(DEFAULT_TRANSFER_AMOUNT),
        }
    }
}

fn check(name: &str, expected: U256, actual: U256) -> Result<()> {
    if expected != actual {
        return Err(DeployError::AssertionFailed {
            check: name.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    tracing::debug!("✅ {}: {}", name, actual);
    Ok(())
}

/// Deploys a fresh instance and checks a single owner → recipient transfer.
pub struct TransferVerifier<R: ContractRuntime> {
    runtime: R,
    scenario: TransferScenario,
}

impl<R: ContractRuntime> TransferVerifier<R> {
    pub fn new(runtime: R, scenario: TransferScenario) -> Self {
        Self { runtime, scenario }
    }

    pub async fn run(&self) -> Result<TransferOutcome> {
        let signers = self.runtime.signers().await?;
        let (owner, recipient, bystander) = match signers.as_slice() {
            [owner, recipient, bystander, ..] => (*owner, *recipient, *bystander),
            _ => {
                return Err(DeployError::SignerUnavailable {
                    index: 2,
                    available: signers.len(),
                })
            }
        };

        let factory = self.runtime.contract_factory(&self.scenario.contract).await?;
        let contract = self
            .runtime
            .deploy(&factory, &owner, &[self.scenario.initial_supply])
            .await?;
        tracing::info!("📦 Fresh '{}' at {}", contract.name, contract.address);

        let receipt = self
            .runtime
            .transfer(&contract, &owner, recipient.address, self.scenario.amount)
            .await?;
        tracing::info!(
            "💸 Transferred {} from {} to {} (block {})",
            self.scenario.amount,
            owner.address,
            recipient.address,
            receipt.block_number
        );

        let recipient_balance = self.runtime.balance_of(&contract, recipient.address).await?;
        check("recipient balance", self.scenario.amount, recipient_balance)?;

        let owner_balance = self.runtime.balance_of(&contract, owner.address).await?;
        let expected_owner = self
            .scenario
            .initial_supply
            .checked_sub(self.scenario.amount)
            .ok_or_else(|| DeployError::ConfigError {
                message: "transfer amount exceeds the initial supply".to_string(),
            })?;
        check("owner balance", expected_owner, owner_balance)?;

        let bystander_balance = self.runtime.balance_of(&contract, bystander.address).await?;
        check("untouched account balance", U256::ZERO, bystander_balance)?;

        Ok(TransferOutcome {
            contract,
            owner: owner.address,
            recipient: recipient.address,
            bystander: bystander.address,
            owner_balance,
            recipient_balance,
            bystander_balance,
        })
    }
}
