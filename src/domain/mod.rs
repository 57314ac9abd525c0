// Domain layer: wire models and the client interface shared by both gateways.

pub mod model;
pub mod ports;
