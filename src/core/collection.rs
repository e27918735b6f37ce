use crate::config::MapperConfig;
use crate::core::classify::is_assignable;
use crate::core::traversal::{DestinationRef, Frame, ObjectFrame, SourceRef, Step};
use crate::core::visited::VisitedSet;
use crate::domain::model::Value;
use crate::domain::shape::FieldType;
use crate::utils::error::{MapperError, Result};

/// Materializes a destination sequence for one sequence-typed field.
///
/// Absent elements are dropped. An object element already in `visited` becomes an
/// absent placeholder at its position. Every other object element is reserved in
/// `visited` for the rest of the call, so a later duplicate, or a later back-edge to
/// it, also comes out absent.
pub(crate) struct SequenceFrame {
    field: &'static str,
    items: std::vec::IntoIter<Value>,
    element: FieldType,
    mapped: Vec<Value>,
    total: usize,
    depth: usize,
}

impl SequenceFrame {
    pub(crate) fn new(field: &'static str, items: Vec<Value>, element: FieldType, depth: usize) -> Self {
        let total = items.len();
        Self {
            field,
            items: items.into_iter(),
            element,
            mapped: Vec::with_capacity(total),
            total,
            depth,
        }
    }

    pub(crate) fn step<'a>(
        &mut self,
        config: &MapperConfig,
        visited: &mut VisitedSet,
    ) -> Result<Step<'a>> {
        for item in self.items.by_ref() {
            match item {
                Value::Null => continue,
                Value::Scalar(scalar) => {
                    let item_type = FieldType::Scalar(scalar.kind());
                    if !is_assignable(&item_type, &self.element) {
                        return Err(MapperError::type_mismatch(
                            self.field,
                            item_type,
                            &self.element,
                        ));
                    }
                    self.mapped.push(Value::Scalar(scalar));
                }
                Value::List(inner) => {
                    let Some(inner_element) = self.element.element_type() else {
                        return Err(MapperError::type_mismatch(
                            self.field,
                            "nested sequence",
                            &self.element,
                        ));
                    };
                    return Ok(Step::Push(Frame::Sequence(SequenceFrame::new(
                        self.field,
                        inner,
                        inner_element.clone(),
                        self.depth + 1,
                    ))));
                }
                Value::Object(object) => {
                    let Some(shape) = self.element.composite_shape() else {
                        return Err(MapperError::type_mismatch(
                            self.field,
                            object.shape().name(),
                            &self.element,
                        ));
                    };

                    let id = object.identity();
                    if visited.contains(id) {
                        tracing::trace!(
                            "Element {} of '{}' already visited, keeping a null placeholder",
                            object.shape().name(),
                            self.field
                        );
                        self.mapped.push(Value::Null);
                        continue;
                    }

                    let instance = shape.instantiate();
                    let child = ObjectFrame::new(
                        config,
                        visited,
                        SourceRef::Shared(object),
                        DestinationRef::Shared(instance.clone()),
                        None,
                        self.depth,
                    )?;
                    visited.insert(id);
                    self.mapped.push(Value::Object(instance));
                    return Ok(Step::Push(Frame::Object(child)));
                }
            }
        }

        Ok(Step::Done)
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.mapped.push(value);
    }

    pub(crate) fn into_value(self) -> Value {
        tracing::trace!(
            "Mapped {} of {} elements of '{}'",
            self.mapped.len(),
            self.total,
            self.field
        );
        Value::List(self.mapped)
    }
}
