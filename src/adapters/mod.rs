// Adapters layer: concrete implementations of the contract runtime port.

pub mod artifacts;
pub mod memory;
pub mod rpc;
