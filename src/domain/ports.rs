use crate::domain::model::{
    ContractArtifact, ContractFactory, DeployedContract, Signer, TransactionReceipt,
};
use crate::utils::error::Result;
use alloy_primitives::{Address, U256};
use async_trait::async_trait;

/// Narrow view of the external contract runtime.
#[async_trait]
pub trait ContractRuntime: Send + Sync {
    async fn signers(&self) -> Result<Vec<Signer>>;
    async fn chain_id(&self) -> Result<u64>;
    async fn contract_factory(&self, name: &str) -> Result<ContractFactory>;
    /// Resolves once the deployment is confirmed.
    async fn deploy(
        &self,
        factory: &ContractFactory,
        from: &Signer,
        args: &[U256],
    ) -> Result<DeployedContract>;
    async fn transfer(
        &self,
        contract: &DeployedContract,
        from: &Signer,
        to: Address,
        amount: U256,
    ) -> Result<TransactionReceipt>;
    async fn balance_of(&self, contract: &DeployedContract, owner: Address) -> Result<U256>;
}

pub trait ArtifactSource: Send + Sync {
    fn load(&self, name: &str) -> Result<ContractArtifact>;
}

#[async_trait]
impl<R: ContractRuntime + ?Sized> ContractRuntime for std::sync::Arc<R> {
    async fn signers(&self) -> Result<Vec<Signer>> {
        (**self).signers().await
    }

    async fn chain_id(&self) -> Result<u64> {
        (**self).chain_id().await
    }

    async fn contract_factory(&self, name: &str) -> Result<ContractFactory> {
        (**self).contract_factory(name).await
    }

    async fn deploy(
        &self,
        factory: &ContractFactory,
        from: &Signer,
        args: &[U256],
    ) -> Result<DeployedContract> {
        (**self).deploy(factory, from, args).await
    }

    async fn transfer(
        &self,
        contract: &DeployedContract,
        from: &Signer,
        to: Address,
        amount: U256,
    ) -> Result<TransactionReceipt> {
        (**self).transfer(contract, from, to, amount).await
    }

    async fn balance_of(&self, contract: &DeployedContract, owner: Address) -> Result<U256> {
        (**self).balance_of(contract, owner).await
    }
}
