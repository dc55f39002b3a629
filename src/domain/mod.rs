// Domain layer: models and the runtime port. Adapters live under src/adapters.

pub mod model;
pub mod ports;
