pub mod classify;
pub mod collection;
pub mod mapper;
mod traversal;
pub mod visited;

pub use crate::domain::model::{ObjectRef, Scalar, Value};
pub use crate::domain::ports::{AsyncMapping, FieldValue, MapSource, MapTarget, Mappable};
pub use crate::utils::error::Result;
