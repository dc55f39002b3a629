pub mod abi;
pub mod error;
pub mod logger;
pub mod validation;
