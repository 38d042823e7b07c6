// Domain layer: records, taxonomies, the record filter and the ports the adapters implement.

pub mod filter;
pub mod model;
pub mod ports;
pub mod reference;
