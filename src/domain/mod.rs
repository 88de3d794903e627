// Domain layer: the lead record, form field identifiers and the ports the pipeline and relay depend on.

pub mod model;
pub mod ports;
