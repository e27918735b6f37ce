pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

mod macros;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;
pub use crate::config::MapperConfig;

pub use crate::core::mapper::{GraphMapper, MapExt};
pub use crate::domain::model::{ObjectRef, Scalar, Value};
pub use crate::domain::ports::{AsyncMapping, FieldValue, MapSource, MapTarget, Mappable};
pub use crate::domain::shape::{FieldDescriptor, FieldType, ScalarKind, Shape, Visibility};
pub use crate::utils::error::{MapperError, Result};
