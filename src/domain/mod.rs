// Domain layer: value types and ports. Only chrono/serde beyond std.

pub mod model;
pub mod ports;
