// Domain layer: scan result models and ports (interfaces).

pub mod model;
pub mod ports;
