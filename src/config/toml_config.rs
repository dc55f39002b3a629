use crate::core::deployer::{DeploymentPlan, DEFAULT_CONTRACT, DEFAULT_INITIAL_SUPPLY};
use crate::utils::error::{DeployError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub network: NetworkConfig,
    pub artifacts: ArtifactsConfig,
    pub deployment: DeploymentConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub name: String,
    pub url: String,
    pub chain_id: Option<u64>,
    pub request_timeout_seconds: u64,
    pub poll_interval_ms: u64,
    pub confirmation_attempts: u32,
    pub gas: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "localhost".to_string(),
            url: "http://127.0.0.1:8545".to_string(),
            chain_id: None,
            request_timeout_seconds: 30,
            poll_interval_ms: 200,
            confirmation_attempts: 150,
            gas: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    pub path: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            path: "artifacts".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    pub contract: String,
    /// 十進位或 0x 開頭的十六進位字串
    pub initial_supply: String,
    pub signer_index: usize,
    pub report_path: Option<String>,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            contract: DEFAULT_CONTRACT.to_string(),
            initial_supply: DEFAULT_INITIAL_SUPPLY.to_string(),
            signer_index: 0,
            report_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DeployError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DeployError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${RPC_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DeployError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.network.request_timeout_seconds)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.network.poll_interval_ms)
    }

    pub fn deployment_plan(&self) -> Result<DeploymentPlan> {
        Ok(DeploymentPlan {
            network: self.network.name.clone(),
            contract: self.deployment.contract.clone(),
            initial_supply: validation::parse_uint256(
                "deployment.initial_supply",
                &self.deployment.initial_supply,
            )?,
            signer_index: self.deployment.signer_index,
            expected_chain_id: self.network.chain_id,
        })
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("network.url", &self.network.url)?;
        validation::validate_non_empty_string("network.name", &self.network.name)?;
        validation::validate_positive_number(
            "network.request_timeout_seconds",
            self.network.request_timeout_seconds,
            1,
        )?;
        validation::validate_positive_number(
            "network.poll_interval_ms",
            self.network.poll_interval_ms,
            1,
        )?;
        validation::validate_positive_number(
            "network.confirmation_attempts",
            u64::from(self.network.confirmation_attempts),
            1,
        )?;
        validation::validate_path("artifacts.path", &self.artifacts.path)?;
        validation::validate_non_empty_string("deployment.contract", &self.deployment.contract)?;
        validation::parse_uint256("deployment.initial_supply", &self.deployment.initial_supply)?;
        if let Some(report_path) = &self.deployment.report_path {
            validation::validate_path("deployment.report_path", report_path)?;
        }
        Ok(())
    }
}
