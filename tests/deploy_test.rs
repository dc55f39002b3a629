use alloy_primitives::{Address, U256};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use token_deployer::app::deploy::{run_deploy, run_deploy_with_output, DeployOptions};
use token_deployer::app::ExitStatus;
use token_deployer::core::deployer::{Deployer, DeploymentPlan};
use token_deployer::{ContractRuntime, InMemoryRuntime};

/// 可以同時交給 writer 和測試讀取的緩衝區
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

fn capture_logs(logs: &SharedBuffer) -> tracing::subscriber::DefaultGuard {
    let logs = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || logs.clone())
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_default(subscriber)
}

#[tokio::test]
async fn test_fresh_deployment_has_address() {
    let deployer = Deployer::new(InMemoryRuntime::new(), DeploymentPlan::default());
    let report = deployer.run().await.unwrap();

    assert_ne!(report.address, Address::ZERO);
    assert!(!report.address.to_string().is_empty());
}

#[tokio::test]
async fn test_redeploy_yields_distinct_address() {
    let runtime = Arc::new(InMemoryRuntime::new());
    let deployer = Deployer::new(runtime.clone(), DeploymentPlan::default());

    let first = deployer.run().await.unwrap();
    let second = deployer.run().await.unwrap();

    assert_ne!(first.address, second.address);
    assert_ne!(first.transaction_hash, second.transaction_hash);
    assert_eq!(runtime.deployment_count(), 2);
}

#[tokio::test]
async fn test_initial_supply_goes_to_deployer() {
    let runtime = Arc::new(InMemoryRuntime::new());
    let plan = DeploymentPlan {
        initial_supply: U256::from(2500u64),
        signer_index: 3,
        ..DeploymentPlan::default()
    };
    let report = Deployer::new(runtime.clone(), plan).run().await.unwrap();

    let signers = runtime.signers().await.unwrap();
    assert_eq!(report.deployer, signers[3].address);
    assert_eq!(runtime.total_supply(report.address), Some(U256::from(2500u64)));
}

#[tokio::test]
async fn test_successful_run_exits_zero() {
    let status = run_deploy(
        InMemoryRuntime::new(),
        DeploymentPlan::default(),
        DeployOptions::default(),
    )
    .await;

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(status.code(), 0);
}

#[tokio::test]
async fn test_rejected_deployment_exits_one() {
    let runtime = InMemoryRuntime::new();
    runtime.reject_deployments("constructor reverted");

    let logs = SharedBuffer::default();
    let out = SharedBuffer::default();
    let _guard = capture_logs(&logs);

    let status = run_deploy_with_output(
        runtime,
        DeploymentPlan::default(),
        DeployOptions::default(),
        out.clone(),
    )
    .await;

    assert_eq!(status, ExitStatus::Failure);
    assert_eq!(status.code(), 1);

    let logged = logs.contents();
    assert!(logged.contains("Deployment failed"), "logs: {}", logged);
    assert!(logged.contains("constructor reverted"), "logs: {}", logged);
    // 部署帳號已印出，但沒有合約地址
    let printed = out.contents();
    assert!(printed.contains("Deploying contracts with the account: "));
    assert!(!printed.contains("Token deployed to:"));
}

#[tokio::test]
async fn test_successful_run_prints_account_and_address() {
    let runtime = Arc::new(InMemoryRuntime::new());
    let out = SharedBuffer::default();

    let status = run_deploy_with_output(
        runtime.clone(),
        DeploymentPlan::default(),
        DeployOptions::default(),
        out.clone(),
    )
    .await;
    assert_eq!(status, ExitStatus::Success);

    let signers = runtime.signers().await.unwrap();
    let printed = out.contents();
    let lines: Vec<&str> = printed.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        format!("Deploying contracts with the account: {}", signers[0].address)
    );
    let address = lines[1]
        .strip_prefix("Token deployed to: ")
        .unwrap()
        .parse::<Address>()
        .unwrap();
    assert_eq!(runtime.total_supply(address), Some(U256::from(1000u64)));
}

#[tokio::test]
async fn test_unknown_contract_exits_one() {
    let plan = DeploymentPlan {
        contract: "NotCompiled".to_string(),
        ..DeploymentPlan::default()
    };
    let status = run_deploy(InMemoryRuntime::new(), plan, DeployOptions::default()).await;

    assert_eq!(status.code(), 1);
}

#[tokio::test]
async fn test_report_written_to_disk() {
    let temp_dir = TempDir::new().unwrap();
    let report_path = temp_dir
        .path()
        .join("deployments")
        .join("localhost")
        .join("TokenizedAsset.json");

    let status = run_deploy(
        InMemoryRuntime::new(),
        DeploymentPlan::default(),
        DeployOptions {
            report_path: Some(report_path.clone()),
            dry_run: false,
        },
    )
    .await;
    assert_eq!(status, ExitStatus::Success);

    let content = std::fs::read_to_string(&report_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["contract"], "TokenizedAsset");
    assert_eq!(json["network"], "localhost");
    assert_eq!(json["chain_id"], 31337);
    assert!(json["address"].as_str().unwrap().starts_with("0x"));
}

#[tokio::test]
async fn test_dry_run_does_not_deploy() {
    let runtime = Arc::new(InMemoryRuntime::new());
    let status = run_deploy(
        runtime.clone(),
        DeploymentPlan::default(),
        DeployOptions {
            report_path: None,
            dry_run: true,
        },
    )
    .await;

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(runtime.deployment_count(), 0);
}
