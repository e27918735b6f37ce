use crate::domain::model::{ObjectRef, Value};
use crate::domain::shape::{FieldType, Shape};
use crate::utils::error::{MapperError, Result};
use std::any::Any;
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

/// Field-level access to an object, independent of how its Rust fields are declared.
///
/// Implementations expose every field listed in their [`Shape`], private ones included.
pub trait Mappable: Any {
    fn shape(&self) -> &'static Shape;

    /// Returns `None` when the shape has no readable field of that name.
    fn read_field(&self, name: &str) -> Option<Value>;

    fn write_field(&mut self, name: &str, value: Value) -> Result<()>;
}

/// A mappable type the mapper can allocate.
pub trait MapTarget: Mappable + Default {
    fn describe() -> &'static Shape;
}

/// Conversion between a Rust field type and the mapper's [`Value`].
pub trait FieldValue: Sized {
    fn field_type() -> FieldType;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self>;
}

/// Anything that can be handed to the mapper as a root object.
///
/// `Option::None` is the absent source and fails with [`MapperError::NullInput`].
pub trait MapSource {
    fn with_mappable<R>(
        &self,
        context: &str,
        f: impl FnOnce(&dyn Mappable) -> Result<R>,
    ) -> Result<R>;
}

impl<T: MapTarget> MapSource for T {
    fn with_mappable<R>(
        &self,
        _context: &str,
        f: impl FnOnce(&dyn Mappable) -> Result<R>,
    ) -> Result<R> {
        f(self)
    }
}

impl MapSource for dyn Mappable {
    fn with_mappable<R>(
        &self,
        _context: &str,
        f: impl FnOnce(&dyn Mappable) -> Result<R>,
    ) -> Result<R> {
        f(self)
    }
}

impl<T: MapTarget> MapSource for Rc<RefCell<T>> {
    fn with_mappable<R>(
        &self,
        _context: &str,
        f: impl FnOnce(&dyn Mappable) -> Result<R>,
    ) -> Result<R> {
        let borrowed = self
            .try_borrow()
            .map_err(|_| MapperError::SourceBorrowed {
                shape: T::describe().name().to_string(),
            })?;
        f(&*borrowed)
    }
}

impl MapSource for ObjectRef {
    fn with_mappable<R>(
        &self,
        _context: &str,
        f: impl FnOnce(&dyn Mappable) -> Result<R>,
    ) -> Result<R> {
        let borrowed = self.borrow()?;
        f(&*borrowed)
    }
}

impl<S: MapSource> MapSource for Option<S> {
    fn with_mappable<R>(
        &self,
        context: &str,
        f: impl FnOnce(&dyn Mappable) -> Result<R>,
    ) -> Result<R> {
        match self {
            Some(source) => source.with_mappable(context, f),
            None => Err(MapperError::NullInput {
                context: context.to_string(),
            }),
        }
    }
}

/// Asynchronous post-processing applied to each mapped destination.
///
/// Implemented for any `Fn(D) -> impl Future<Output = Result<D>>`, so closures
/// returning `async move { ... }` blocks work directly.
pub trait AsyncMapping<D> {
    fn apply(&self, destination: D) -> impl Future<Output = Result<D>>;
}

impl<D, F, Fut> AsyncMapping<D> for F
where
    F: Fn(D) -> Fut,
    Fut: Future<Output = Result<D>>,
{
    fn apply(&self, destination: D) -> impl Future<Output = Result<D>> {
        self(destination)
    }
}
