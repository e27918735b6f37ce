use crate::domain::shape::FieldType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    Scalar,
    Sequence,
    Composite,
}

/// Decides how a destination field is filled.
///
/// Text is iterable but still scalar, so the scalar check runs before the
/// iterable one.
pub fn classify(ty: &FieldType) -> TypeClass {
    if ty.scalar_kind().is_some() {
        TypeClass::Scalar
    } else if ty.is_iterable() {
        TypeClass::Sequence
    } else {
        TypeClass::Composite
    }
}

/// Whether every value of `source` can be stored, unchanged, where `destination`
/// is expected. Only meaningful for scalar destinations.
pub fn is_assignable(source: &FieldType, destination: &FieldType) -> bool {
    match (source, destination) {
        (FieldType::Scalar(from), FieldType::Scalar(to))
        | (FieldType::Scalar(from), FieldType::Nullable(to))
        | (FieldType::Nullable(from), FieldType::Nullable(to)) => from == to,
        _ => false,
    }
}
