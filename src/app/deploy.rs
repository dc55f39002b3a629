use crate::app::{report_failure, ExitStatus};
use crate::core::deployer::{Deployer, DeploymentPlan};
use crate::core::ContractRuntime;
use crate::domain::model::DeploymentReport;
use crate::utils::error::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    pub report_path: Option<PathBuf>,
    pub dry_run: bool,
}

pub fn write_report(path: &Path, report: &DeploymentReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

async fn deploy<R: ContractRuntime>(
    deployer: &Deployer<R>,
    options: &DeployOptions,
) -> Result<()> {
    if options.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no transaction will be sent");
        let summary = deployer.dry_run().await?;
        deployer.emit(format_args!(
            "Would deploy {} from {} on chain {} ({} bytes)",
            summary.contract, summary.deployer, summary.chain_id, summary.deploy_data_len
        ))?;
        return Ok(());
    }

    let report = deployer.run().await?;
    if let Some(path) = &options.report_path {
        write_report(path, &report)?;
        tracing::info!("📁 Deployment report saved to: {}", path.display());
    }
    Ok(())
}

/// Runs a deployment and maps the outcome to the process exit status.
pub async fn run_deploy<R: ContractRuntime>(
    runtime: R,
    plan: DeploymentPlan,
    options: DeployOptions,
) -> ExitStatus {
    run_deploy_with_output(runtime, plan, options, std::io::stdout()).await
}

/// Same as [`run_deploy`], writing the result lines to `out`.
pub async fn run_deploy_with_output<R, W>(
    runtime: R,
    plan: DeploymentPlan,
    options: DeployOptions,
    out: W,
) -> ExitStatus
where
    R: ContractRuntime,
    W: Write + Send + 'static,
{
    let deployer = Deployer::new(runtime, plan).with_output(out);

    match deploy(&deployer, &options).await {
        Ok(()) => {
            tracing::info!("✅ Deployment finished");
            ExitStatus::Success
        }
        Err(e) => {
            report_failure("Deployment", &e);
            ExitStatus::Failure
        }
    }
}
