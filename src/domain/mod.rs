// Domain layer: models and ports shared by the grid engine and the adapters.

pub mod model;
pub mod ports;
