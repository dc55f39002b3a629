pub mod deploy;
pub mod verify;

use crate::adapters::artifacts::ArtifactStore;
use crate::adapters::rpc::{ConfirmationPolicy, JsonRpcClient, JsonRpcRuntime};
use crate::config::TomlConfig;
use crate::utils::error::{DeployError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
        }
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status.code())
    }
}

/// 依照配置建立連到節點的 runtime
pub fn rpc_runtime(config: &TomlConfig) -> Result<JsonRpcRuntime<ArtifactStore>> {
    let client = JsonRpcClient::new(config.network.url.clone(), config.request_timeout())?;
    let runtime = JsonRpcRuntime::new(client, ArtifactStore::new(&config.artifacts.path))
        .with_confirmation(ConfirmationPolicy {
            poll_interval: config.poll_interval(),
            max_attempts: config.network.confirmation_attempts,
        })
        .with_gas(config.network.gas);
    Ok(runtime)
}

pub(crate) fn report_failure(context: &str, e: &DeployError) {
    tracing::error!(
        "❌ {} failed: {} (Category: {:?})",
        context,
        e,
        e.category()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}
