use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "token-deployer")]
#[command(about = "Deploys the TokenizedAsset contract and reports its address")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub network_url: Option<String>,

    #[arg(long)]
    pub contract: Option<String>,

    #[arg(long)]
    pub initial_supply: Option<String>,

    #[arg(long)]
    pub signer_index: Option<usize>,

    /// Hardhat artifacts directory
    #[arg(long)]
    pub artifacts: Option<String>,

    /// Write a JSON deployment report to this path
    #[arg(long)]
    pub report: Option<String>,

    /// Resolve signer and artifact without sending a transaction
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 預設值 ← TOML 檔案 ← 命令列參數
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(url) = &self.network_url {
            config.network.url = url.clone();
        }
        if let Some(contract) = &self.contract {
            config.deployment.contract = contract.clone();
        }
        if let Some(supply) = &self.initial_supply {
            config.deployment.initial_supply = supply.clone();
        }
        if let Some(index) = self.signer_index {
            config.deployment.signer_index = index;
        }
        if let Some(artifacts) = &self.artifacts {
            config.artifacts.path = artifacts.clone();
        }
        if let Some(report) = &self.report {
            config.deployment.report_path = Some(report.clone());
        }
        if self.json_logs {
            config.logging.json = true;
        }

        config.validate()?;
        Ok(config)
    }
}
