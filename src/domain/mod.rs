// Domain layer: shapes, dynamic values and the traits mappable types implement.

pub mod field_value;
pub mod model;
pub mod ports;
pub mod shape;
