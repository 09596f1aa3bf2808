// Domain layer: identity number models and ports (storage, configuration).

pub mod model;
pub mod ports;
