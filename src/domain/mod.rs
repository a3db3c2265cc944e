// Domain layer: the normalized vacancy model and the ports adapters implement.

pub mod model;
pub mod ports;
