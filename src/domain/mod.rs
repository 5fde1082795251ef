// Domain layer: quote and analysis models plus the ports the rest of the crate plugs into.

pub mod model;
pub mod ports;
