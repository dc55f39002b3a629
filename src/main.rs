use clap::Parser;
use std::process::ExitCode;
use token_deployer::app::{self, deploy::DeployOptions};
use token_deployer::utils::logger;
use token_deployer::CliConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose);
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            return ExitCode::FAILURE;
        }
    };

    logger::init_logger(cli.verbose, config.logging.json);
    tracing::info!("🚀 Starting token-deployer on network '{}'", config.network.name);
    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    let plan = match config.deployment_plan() {
        Ok(plan) => plan,
        Err(e) => {
            tracing::error!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match app::rpc_runtime(&config) {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("❌ Could not create RPC client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let options = DeployOptions {
        report_path: config.deployment.report_path.as_ref().map(Into::into),
        dry_run: cli.dry_run,
    };

    app::deploy::run_deploy(runtime, plan, options).await.into()
}
