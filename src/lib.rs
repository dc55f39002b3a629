pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{artifacts::ArtifactStore, memory::InMemoryRuntime, rpc::JsonRpcRuntime};
pub use config::TomlConfig;
pub use crate::core::{deployer::Deployer, verifier::TransferVerifier, ContractRuntime};
pub use utils::error::{DeployError, Result};
