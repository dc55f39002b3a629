use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use token_deployer::app;
use token_deployer::core::verifier::TransferScenario;
use token_deployer::utils::logger;
use token_deployer::utils::validation::Validate;
use token_deployer::TomlConfig;

#[derive(Parser)]
#[command(name = "verify-transfer")]
#[command(about = "Deploys a fresh TokenizedAsset and checks an owner-to-recipient transfer")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    #[arg(long)]
    network_url: Option<String>,

    /// Hardhat artifacts directory
    #[arg(long)]
    artifacts: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> anyhow::Result<TomlConfig> {
    let mut config = match &args.config {
        Some(path) => TomlConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path))?,
        None => TomlConfig::default(),
    };
    if let Some(url) = &args.network_url {
        config.network.url = url.clone();
    }
    if let Some(artifacts) = &args.artifacts {
        config.artifacts.path = artifacts.clone();
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let config = load_config(&args)?;
    let plan = config.deployment_plan()?;
    let runtime = app::rpc_runtime(&config).context("Failed to create RPC client")?;

    tracing::info!("🧪 Verifying transfers against {}", config.network.url);
    let scenario = TransferScenario {
        contract: plan.contract,
        initial_supply: plan.initial_supply,
        ..TransferScenario::default()
    };

    Ok(app::verify::run_verification(runtime, scenario).await.into())
}
