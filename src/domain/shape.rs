use crate::domain::model::ObjectRef;
use std::fmt;

/// Value-semantics types the mapper copies as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Char,
    Text,
    DateTime,
    Date,
    Timestamp,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::Char => "char",
            ScalarKind::Text => "Text",
            ScalarKind::DateTime => "DateTime",
            ScalarKind::Date => "Date",
            ScalarKind::Timestamp => "Timestamp",
        };
        f.write_str(name)
    }
}

pub type ShapeFn = fn() -> &'static Shape;

/// Declared type of a field.
///
/// Sequence fields always accept the absent value. Composite fields accept it only
/// when `nullable`; scalar fields only when declared [`FieldType::Nullable`], and a
/// required scalar falls back to its type's default instead.
#[derive(Clone)]
pub enum FieldType {
    Scalar(ScalarKind),
    Nullable(ScalarKind),
    Sequence(Box<FieldType>),
    Composite { shape: ShapeFn, nullable: bool },
}

impl FieldType {
    /// True for every type that can be walked element by element, text included.
    pub fn is_iterable(&self) -> bool {
        matches!(
            self,
            FieldType::Sequence(_)
                | FieldType::Scalar(ScalarKind::Text)
                | FieldType::Nullable(ScalarKind::Text)
        )
    }

    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            FieldType::Scalar(kind) | FieldType::Nullable(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn element_type(&self) -> Option<&FieldType> {
        match self {
            FieldType::Sequence(element) => Some(element),
            _ => None,
        }
    }

    pub fn composite_shape(&self) -> Option<&'static Shape> {
        match self {
            FieldType::Composite { shape, .. } => Some(shape()),
            _ => None,
        }
    }

    /// False when the mapper could have to store an absent marker (a back-edge,
    /// a repeated element, a null source) somewhere this type cannot hold one.
    pub fn accepts_absent(&self) -> bool {
        match self {
            FieldType::Scalar(_) | FieldType::Nullable(_) => true,
            FieldType::Sequence(element) => element.accepts_absent(),
            FieldType::Composite { nullable, .. } => *nullable,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(kind) => write!(f, "{}", kind),
            FieldType::Nullable(kind) => write!(f, "Option<{}>", kind),
            FieldType::Sequence(element) => write!(f, "Vec<{}>", element),
            FieldType::Composite {
                shape,
                nullable: true,
            } => write!(f, "Option<{}>", shape().name()),
            FieldType::Composite {
                shape,
                nullable: false,
            } => f.write_str(shape().name()),
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub ty: FieldType,
    pub visibility: Visibility,
    pub readable: bool,
    pub writable: bool,
}

impl FieldDescriptor {
    /// Fields whose type cannot hold an absent marker are source-only.
    pub fn new(name: &'static str, ty: FieldType) -> Self {
        let writable = ty.accepts_absent();
        Self {
            name,
            ty,
            visibility: Visibility::Public,
            readable: true,
            writable,
        }
    }

    /// Used by the `mappable!` macro, which knows visibility and write access as flags.
    pub fn declared(name: &'static str, ty: FieldType, private: bool, read_only: bool) -> Self {
        let mut descriptor = Self::new(name, ty);
        if private {
            descriptor = descriptor.private();
        }
        if read_only {
            descriptor = descriptor.read_only();
        }
        descriptor
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }
}

/// Field-descriptor table of one mappable type, built once and cached by the type.
pub struct Shape {
    name: &'static str,
    fields: Vec<FieldDescriptor>,
    construct: fn() -> ObjectRef,
}

impl Shape {
    pub fn new(name: &'static str, fields: Vec<FieldDescriptor>, construct: fn() -> ObjectRef) -> Self {
        Self {
            name,
            fields,
            construct,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn readable_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| field.readable)
    }

    /// Destination-side lookup: same name, case-sensitive, and writable.
    pub fn writable_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|field| field.name == name && field.writable)
    }

    /// Allocates a zero-initialized instance of this shape.
    pub fn instantiate(&self) -> ObjectRef {
        (self.construct)()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}
