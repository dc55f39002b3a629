pub mod deployer;
pub mod verifier;

pub use crate::domain::model::{ContractFactory, DeployedContract, Signer};
pub use crate::domain::ports::{ArtifactSource, ContractRuntime};
pub use crate::utils::error::Result;
