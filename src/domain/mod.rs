// Domain layer: request/report model and the ports the engine drives.

pub mod model;
pub mod ports;
