// Domain layer: core models and ports (interfaces). No network code lives here.

pub mod model;
pub mod ports;
