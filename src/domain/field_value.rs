use crate::domain::model::{ObjectRef, Scalar, Value};
use crate::domain::ports::{FieldValue, MapTarget};
use crate::domain::shape::{FieldType, ScalarKind};
use crate::utils::error::{MapperError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::cell::RefCell;
use std::rc::Rc;

fn conversion_error(expected: impl ToString, found: &Value) -> MapperError {
    MapperError::ValueConversion {
        expected: expected.to_string(),
        found: found.describe(),
    }
}

// Absent values written into a non-nullable scalar leave the type's default behind.
macro_rules! scalar_field_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl FieldValue for $ty {
            fn field_type() -> FieldType {
                FieldType::Scalar(ScalarKind::$variant)
            }

            fn to_value(&self) -> Value {
                Value::Scalar(Scalar::$variant(self.clone()))
            }

            fn from_value(value: Value) -> Result<Self> {
                match value {
                    Value::Null => Ok(<$ty>::default()),
                    Value::Scalar(Scalar::$variant(inner)) => Ok(inner),
                    other => Err(conversion_error(ScalarKind::$variant, &other)),
                }
            }
        }

        impl FieldValue for Option<$ty> {
            fn field_type() -> FieldType {
                FieldType::Nullable(ScalarKind::$variant)
            }

            fn to_value(&self) -> Value {
                match self {
                    Some(inner) => Value::Scalar(Scalar::$variant(inner.clone())),
                    None => Value::Null,
                }
            }

            fn from_value(value: Value) -> Result<Self> {
                match value {
                    Value::Null => Ok(None),
                    Value::Scalar(Scalar::$variant(inner)) => Ok(Some(inner)),
                    other => Err(conversion_error(ScalarKind::$variant, &other)),
                }
            }
        }
    )*};
}

scalar_field_value! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    char => Char,
    String => Text,
    DateTime<Utc> => DateTime,
    NaiveDate => Date,
    NaiveDateTime => Timestamp,
}

impl<T: MapTarget> FieldValue for Option<Rc<RefCell<T>>> {
    fn field_type() -> FieldType {
        FieldType::Composite {
            shape: T::describe,
            nullable: true,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Some(object) => Value::Object(ObjectRef::from_rc(object.clone())),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            Value::Object(object) => match object.downcast::<T>() {
                Some(typed) => Ok(Some(typed)),
                None => Err(conversion_error(
                    T::describe().name(),
                    &Value::Object(object),
                )),
            },
            other => Err(conversion_error(T::describe().name(), &other)),
        }
    }
}

/// Required composite. It cannot hold the absent value, so a field of this type (or
/// a sequence of it) is read by the mapper but never written; destinations that
/// should be filled declare `Option<Rc<RefCell<T>>>`.
impl<T: MapTarget> FieldValue for Rc<RefCell<T>> {
    fn field_type() -> FieldType {
        FieldType::Composite {
            shape: T::describe,
            nullable: false,
        }
    }

    fn to_value(&self) -> Value {
        Value::Object(ObjectRef::from_rc(self.clone()))
    }

    fn from_value(value: Value) -> Result<Self> {
        match <Option<Rc<RefCell<T>>>>::from_value(value)? {
            Some(object) => Ok(object),
            None => Err(conversion_error(T::describe().name(), &Value::Null)),
        }
    }
}

impl<E: FieldValue> FieldValue for Vec<E> {
    fn field_type() -> FieldType {
        FieldType::Sequence(Box::new(E::field_type()))
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(FieldValue::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::List(items) => items.into_iter().map(E::from_value).collect(),
            other => Err(conversion_error(Self::field_type(), &other)),
        }
    }
}

impl<E: FieldValue> FieldValue for Option<Vec<E>> {
    fn field_type() -> FieldType {
        <Vec<E>>::field_type()
    }

    fn to_value(&self) -> Value {
        match self {
            Some(items) => items.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => <Vec<E>>::from_value(other).map(Some),
        }
    }
}
