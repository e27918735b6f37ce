use crate::domain::ports::{MapTarget, Mappable};
use crate::domain::shape::{ScalarKind, Shape};
use crate::utils::error::{MapperError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// A value with copy semantics.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    Text(String),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::I8(_) => ScalarKind::I8,
            Scalar::I16(_) => ScalarKind::I16,
            Scalar::I32(_) => ScalarKind::I32,
            Scalar::I64(_) => ScalarKind::I64,
            Scalar::U8(_) => ScalarKind::U8,
            Scalar::U16(_) => ScalarKind::U16,
            Scalar::U32(_) => ScalarKind::U32,
            Scalar::U64(_) => ScalarKind::U64,
            Scalar::F32(_) => ScalarKind::F32,
            Scalar::F64(_) => ScalarKind::F64,
            Scalar::Char(_) => ScalarKind::Char,
            Scalar::Text(_) => ScalarKind::Text,
            Scalar::DateTime(_) => ScalarKind::DateTime,
            Scalar::Date(_) => ScalarKind::Date,
            Scalar::Timestamp(_) => ScalarKind::Timestamp,
        }
    }
}

/// Dynamic view of a field's content while it moves between shapes.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Scalar(Scalar),
    Object(ObjectRef),
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn describe(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Scalar(scalar) => scalar.kind().to_string(),
            Value::Object(object) => object.shape().name().to_string(),
            Value::List(items) => format!("list of {}", items.len()),
        }
    }
}

/// Shared handle to a mappable object.
///
/// Identity is the address of the referenced object, so a handle and a plain
/// `&T` borrowed out of the same cell compare equal in the visited set.
#[derive(Clone)]
pub struct ObjectRef {
    cell: Rc<RefCell<dyn Mappable>>,
    any: Rc<dyn Any>,
    shape: &'static Shape,
}

impl ObjectRef {
    pub fn new<T: MapTarget>(value: T) -> Self {
        Self::from_rc(Rc::new(RefCell::new(value)))
    }

    pub fn from_rc<T: MapTarget>(rc: Rc<RefCell<T>>) -> Self {
        let any: Rc<dyn Any> = rc.clone();
        Self {
            cell: rc,
            any,
            shape: T::describe(),
        }
    }

    pub fn shape(&self) -> &'static Shape {
        self.shape
    }

    pub fn identity(&self) -> usize {
        self.cell.as_ptr() as *const () as usize
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        self.identity() == other.identity()
    }

    pub fn borrow(&self) -> Result<Ref<'_, dyn Mappable>> {
        self.cell
            .try_borrow()
            .map_err(|_| MapperError::SourceBorrowed {
                shape: self.shape.name().to_string(),
            })
    }

    pub fn borrow_mut(&self) -> Result<RefMut<'_, dyn Mappable>> {
        self.cell
            .try_borrow_mut()
            .map_err(|_| MapperError::SourceBorrowed {
                shape: self.shape.name().to_string(),
            })
    }

    pub fn downcast<T: MapTarget>(&self) -> Option<Rc<RefCell<T>>> {
        self.any.clone().downcast::<RefCell<T>>().ok()
    }
}

impl fmt::Debug for ObjectRef {
    // Never descends into fields: the graph may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({}@{:#x})", self.shape.name(), self.identity())
    }
}

/// Identity of any mappable reference, matching [`ObjectRef::identity`].
pub fn identity_of(object: &dyn Mappable) -> usize {
    object as *const dyn Mappable as *const () as usize
}
