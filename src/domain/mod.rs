// Domain layer: pipeline state and the ports the installer talks through.

pub mod model;
pub mod ports;
