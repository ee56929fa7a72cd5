// Domain layer: record shapes, the C struct model and ports (interfaces).

pub mod mapping;
pub mod model;
pub mod ports;
pub mod records;
