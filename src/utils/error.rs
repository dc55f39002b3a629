use alloy_primitives::B256;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("RPC transport failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("RPC call '{method}' failed with code {code}: {message}")]
    RpcError {
        method: String,
        code: i64,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Artifact for contract '{name}' not found under {search_path}")]
    ArtifactNotFound { name: String, search_path: String },

    #[error("Signer #{index} unavailable, runtime exposes {available} signer(s)")]
    SignerUnavailable { index: usize, available: usize },

    #[error("Constructor of '{contract}' expects {expected} argument(s), got {actual}")]
    ConstructorArgumentError {
        contract: String,
        expected: usize,
        actual: usize,
    },

    #[error("Chain id mismatch: expected {expected}, runtime reports {actual}")]
    ChainIdMismatch { expected: u64, actual: u64 },

    #[error("Transaction {tx_hash} reverted: {reason}")]
    TransactionReverted { tx_hash: B256, reason: String },

    #[error("Call '{method}' rejected: {reason}")]
    CallRejected { method: String, reason: String },

    #[error("Transaction {tx_hash} not confirmed after {attempts} receipt polls")]
    ConfirmationTimeout { tx_hash: B256, attempts: u32 },

    #[error("Receipt of deployment {tx_hash} carries no contract address")]
    MissingContractAddress { tx_hash: B256 },

    #[error("No contract deployed at {address}")]
    UnknownContract { address: String },

    #[error("ABI decoding error: {message}")]
    DecodeError { message: String },

    #[error("Check '{check}' failed: expected {expected}, got {actual}")]
    AssertionFailed {
        check: String,
        expected: String,
        actual: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Runtime,
    Configuration,
    Artifact,
    Verification,
    System,
}

impl DeployError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DeployError::TransportError(_)
            | DeployError::RpcError { .. }
            | DeployError::ConfirmationTimeout { .. } => ErrorCategory::Network,
            DeployError::TransactionReverted { .. }
            | DeployError::MissingContractAddress { .. }
            | DeployError::CallRejected { .. }
            | DeployError::UnknownContract { .. }
            | DeployError::SignerUnavailable { .. }
            | DeployError::ChainIdMismatch { .. }
            | DeployError::DecodeError { .. } => ErrorCategory::Runtime,
            DeployError::ConfigError { .. } | DeployError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            DeployError::ArtifactNotFound { .. } | DeployError::ConstructorArgumentError { .. } => {
                ErrorCategory::Artifact
            }
            DeployError::AssertionFailed { .. } => ErrorCategory::Verification,
            DeployError::IoError(_) | DeployError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check that the node is running and reachable at the configured network.url"
            }
            ErrorCategory::Runtime => {
                "Inspect the node logs; the runtime rejected the call or returned unexpected data"
            }
            ErrorCategory::Configuration => "Fix the configuration file or command line flags",
            ErrorCategory::Artifact => {
                "Compile the contracts and point artifacts.path at the compiler output"
            }
            ErrorCategory::Verification => {
                "The deployed contract does not behave like a fungible token"
            }
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DeployError::TransportError(_) => {
                "Could not reach the contract runtime".to_string()
            }
            DeployError::ArtifactNotFound { name, .. } => {
                format!("No compiled artifact for contract '{}'", name)
            }
            DeployError::TransactionReverted { reason, .. } => {
                format!("Transaction was rejected: {}", reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let err = DeployError::ArtifactNotFound {
            name: "TokenizedAsset".to_string(),
            search_path: "artifacts".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Artifact);
        assert!(err.user_friendly_message().contains("TokenizedAsset"));

        let err = DeployError::TransactionReverted {
            tx_hash: B256::ZERO,
            reason: "out of gas".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Runtime);
        assert_eq!(err.user_friendly_message(), "Transaction was rejected: out of gas");
    }
}
