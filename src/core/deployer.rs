use crate::core::ContractRuntime;
use crate::domain::model::{DeploymentReport, Signer};
use crate::utils::error::{DeployError, Result};
use alloy_primitives::{Address, U256};
use std::io::Write;
use std::sync::Mutex;

pub const DEFAULT_CONTRACT: &str = "TokenizedAsset";
pub const DEFAULT_INITIAL_SUPPLY: u64 = 1000;

#[derive(Debug, Clone)]
pub struct DeploymentPlan {
    pub network: String,
    pub contract: String,
    pub initial_supply: U256,
    pub signer_index: usize,
    pub expected_chain_id: Option<u64>,
}

impl Default for DeploymentPlan {
    fn default() -> Self {
        Self {
            network: "localhost".to_string(),
            contract: DEFAULT_CONTRACT.to_string(),
            initial_supply: U256::from(DEFAULT_INITIAL_SUPPLY),
            signer_index: 0,
            expected_chain_id: None,
        }
    }
}

/// What a deployment would send, without sending it.
#[derive(Debug, Clone)]
pub struct DryRunSummary {
    pub contract: String,
    pub deployer: Address,
    pub chain_id: u64,
    pub deploy_data_len: usize,
}

pub struct Deployer<R: ContractRuntime> {
    runtime: R,
    plan: DeploymentPlan,
    // 使用者看得到的結果行，預設 stdout
    out: Mutex<Box<dyn Write + Send>>,
}

impl<R: ContractRuntime> Deployer<R> {
    pub fn new(runtime: R, plan: DeploymentPlan) -> Self {
        Self {
            runtime,
            plan,
            out: Mutex::new(Box::new(std::io::stdout())),
        }
    }

    /// Sends the result lines to `out` instead of stdout.
    pub fn with_output(mut self, out: impl Write + Send + 'static) -> Self {
        self.out = Mutex::new(Box::new(out));
        self
    }

    pub fn plan(&self) -> &DeploymentPlan {
        &self.plan
    }

    pub(crate) fn emit(&self, line: std::fmt::Arguments<'_>) -> Result<()> {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }

    async fn resolve_signer(&self) -> Result<Signer> {
        let signers = self.runtime.signers().await?;
        signers
            .get(self.plan.signer_index)
            .copied()
            .ok_or(DeployError::SignerUnavailable {
                index: self.plan.signer_index,
                available: signers.len(),
            })
    }

    async fn check_chain(&self) -> Result<u64> {
        let actual = self.runtime.chain_id().await?;
        match self.plan.expected_chain_id {
            Some(expected) if expected != actual => {
                Err(DeployError::ChainIdMismatch { expected, actual })
            }
            _ => Ok(actual),
        }
    }

    pub async fn run(&self) -> Result<DeploymentReport> {
        let signer = self.resolve_signer().await?;
        self.emit(format_args!(
            "Deploying contracts with the account: {}",
            signer.address
        ))?;
        tracing::info!(
            "🔑 Deploying '{}' from signer #{} ({})",
            self.plan.contract,
            signer.index,
            signer.address
        );

        let chain_id = self.check_chain().await?;
        tracing::debug!("Runtime chain id: {}", chain_id);

        let factory = self.runtime.contract_factory(&self.plan.contract).await?;
        let contract = self
            .runtime
            .deploy(&factory, &signer, &[self.plan.initial_supply])
            .await?;

        self.emit(format_args!("Token deployed to: {}", contract.address))?;
        tracing::info!(
            "📦 '{}' deployed at {} (tx {})",
            contract.name,
            contract.address,
            contract.transaction_hash
        );

        Ok(DeploymentReport {
            network: self.plan.network.clone(),
            chain_id,
            contract: contract.name,
            address: contract.address,
            deployer: contract.deployer,
            transaction_hash: contract.transaction_hash,
            initial_supply: self.plan.initial_supply,
            deployed_at: chrono::Utc::now(),
        })
    }

    pub async fn dry_run(&self) -> Result<DryRunSummary> {
        let signer = self.resolve_signer().await?;
        let chain_id = self.check_chain().await?;
        let factory = self.runtime.contract_factory(&self.plan.contract).await?;
        let data = factory.deploy_data(&[self.plan.initial_supply])?;

        tracing::info!(
            "🔍 Would deploy '{}' from {} with {} byte(s) of creation data",
            factory.name(),
            signer.address,
            data.len()
        );

        Ok(DryRunSummary {
            contract: factory.name().to_string(),
            deployer: signer.address,
            chain_id,
            deploy_data_len: data.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryRuntime;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_deploy_returns_address() {
        let deployer = Deployer::new(InMemoryRuntime::new(), DeploymentPlan::default());
        let report = deployer.run().await.unwrap();

        assert_ne!(report.address, Address::ZERO);
        assert_eq!(report.contract, DEFAULT_CONTRACT);
        assert_eq!(report.initial_supply, U256::from(1000u64));
        assert_eq!(report.chain_id, 31337);
    }

    #[tokio::test]
    async fn test_signer_index_out_of_range() {
        let plan = DeploymentPlan {
            signer_index: 5,
            ..DeploymentPlan::default()
        };
        let deployer = Deployer::new(InMemoryRuntime::with_signer_count(2), plan);

        match deployer.run().await {
            Err(DeployError::SignerUnavailable { index, available }) => {
                assert_eq!(index, 5);
                assert_eq!(available, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_chain_id_mismatch() {
        let plan = DeploymentPlan {
            expected_chain_id: Some(1),
            ..DeploymentPlan::default()
        };
        let deployer = Deployer::new(InMemoryRuntime::new(), plan);

        assert!(matches!(
            deployer.run().await,
            Err(DeployError::ChainIdMismatch {
                expected: 1,
                actual: 31337
            })
        ));
    }

    #[tokio::test]
    async fn test_result_lines_go_to_output() {
        let out = SharedBuffer::default();
        let deployer = Deployer::new(InMemoryRuntime::new(), DeploymentPlan::default())
            .with_output(out.clone());
        let report = deployer.run().await.unwrap();

        let text = out.contents();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                format!("Deploying contracts with the account: {}", report.deployer),
                format!("Token deployed to: {}", report.address),
            ]
        );
    }

    #[tokio::test]
    async fn test_dry_run_sends_nothing() {
        let runtime = std::sync::Arc::new(InMemoryRuntime::new());
        let deployer = Deployer::new(runtime.clone(), DeploymentPlan::default());

        let summary = deployer.dry_run().await.unwrap();
        assert_eq!(summary.contract, DEFAULT_CONTRACT);
        // 內建產物沒有 bytecode，只有一個 uint256 參數
        assert_eq!(summary.deploy_data_len, 32);
        assert_eq!(runtime.deployment_count(), 0);
    }
}
