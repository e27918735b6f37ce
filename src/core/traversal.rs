use crate::config::MapperConfig;
use crate::core::classify::{classify, is_assignable, TypeClass};
use crate::core::collection::SequenceFrame;
use crate::core::visited::VisitedSet;
use crate::domain::model::{ObjectRef, Value};
use crate::domain::ports::Mappable;
use crate::domain::shape::Shape;
use crate::utils::error::{MapperError, Result};

/// Source side of an object pair: the borrowed root or a shared nested object.
pub(crate) enum SourceRef<'a> {
    Borrowed(&'a dyn Mappable),
    Shared(ObjectRef),
}

impl SourceRef<'_> {
    fn shape(&self) -> &'static Shape {
        match self {
            SourceRef::Borrowed(source) => source.shape(),
            SourceRef::Shared(object) => object.shape(),
        }
    }

    fn read_field(&self, name: &str) -> Result<Option<Value>> {
        match self {
            SourceRef::Borrowed(source) => Ok(source.read_field(name)),
            SourceRef::Shared(object) => Ok(object.borrow()?.read_field(name)),
        }
    }
}

/// Destination side of an object pair: the caller's root or a freshly allocated instance.
pub(crate) enum DestinationRef<'a> {
    Borrowed(&'a mut dyn Mappable),
    Shared(ObjectRef),
}

impl DestinationRef<'_> {
    fn shape(&self) -> &'static Shape {
        match self {
            DestinationRef::Borrowed(destination) => destination.shape(),
            DestinationRef::Shared(object) => object.shape(),
        }
    }

    fn write_field(&mut self, name: &str, value: Value) -> Result<()> {
        match self {
            DestinationRef::Borrowed(destination) => destination.write_field(name, value),
            DestinationRef::Shared(object) => object.borrow_mut()?.write_field(name, value),
        }
    }
}

/// One source object being copied field by field into one destination object.
pub(crate) struct ObjectFrame<'a> {
    source: SourceRef<'a>,
    destination: DestinationRef<'a>,
    next_field: usize,
    // Destination field waiting for a sequence child to finish.
    pending: Option<&'static str>,
    // Identity released when the frame completes; element frames keep theirs.
    release: Option<usize>,
    depth: usize,
}

impl<'a> ObjectFrame<'a> {
    /// Untracked traversals have no cycle detection, so depth is their only bound.
    pub(crate) fn new(
        config: &MapperConfig,
        visited: &VisitedSet,
        source: SourceRef<'a>,
        destination: DestinationRef<'a>,
        release: Option<usize>,
        depth: usize,
    ) -> Result<Self> {
        if !visited.is_tracking() && depth >= config.max_depth {
            return Err(MapperError::DepthExceeded {
                max_depth: config.max_depth,
                shape: source.shape().name().to_string(),
            });
        }

        Ok(Self {
            source,
            destination,
            next_field: 0,
            pending: None,
            release,
            depth,
        })
    }

    fn step(&mut self, config: &MapperConfig, visited: &mut VisitedSet) -> Result<Step<'a>> {
        let source_shape = self.source.shape();
        let destination_shape = self.destination.shape();

        while let Some(field) = source_shape.fields().get(self.next_field) {
            self.next_field += 1;
            if !field.readable {
                continue;
            }

            let Some(target) = destination_shape.writable_field(field.name) else {
                tracing::trace!(
                    "{}.{} has no writable counterpart on {}",
                    source_shape.name(),
                    field.name,
                    destination_shape.name()
                );
                continue;
            };

            let Some(value) = self.source.read_field(field.name)? else {
                continue;
            };

            if value.is_null() {
                self.destination.write_field(target.name, Value::Null)?;
                continue;
            }

            match classify(&target.ty) {
                TypeClass::Scalar => {
                    if !is_assignable(&field.ty, &target.ty) {
                        return Err(MapperError::type_mismatch(
                            field.name,
                            &field.ty,
                            &target.ty,
                        ));
                    }
                    self.destination.write_field(target.name, value)?;
                }
                TypeClass::Sequence => match (value, target.ty.element_type()) {
                    (Value::List(items), Some(element)) => {
                        self.pending = Some(target.name);
                        return Ok(Step::Push(Frame::Sequence(SequenceFrame::new(
                            field.name,
                            items,
                            element.clone(),
                            self.depth + 1,
                        ))));
                    }
                    (other, _) => {
                        tracing::trace!(
                            "Field '{}' holds {}, not a sequence; writing null",
                            field.name,
                            other.describe()
                        );
                        self.destination.write_field(target.name, Value::Null)?;
                    }
                },
                TypeClass::Composite => {
                    let Some(shape) = target.ty.composite_shape() else {
                        return Err(MapperError::type_mismatch(
                            field.name,
                            &field.ty,
                            &target.ty,
                        ));
                    };

                    let Value::Object(object) = value else {
                        // Scalars and lists expose no named fields to copy.
                        self.destination
                            .write_field(target.name, Value::Object(shape.instantiate()))?;
                        continue;
                    };

                    let id = object.identity();
                    if visited.contains(id) {
                        tracing::trace!("Back-edge to {} nulled out", object.shape().name());
                        self.destination.write_field(target.name, Value::Null)?;
                        continue;
                    }

                    // The destination holds a shared handle, so the instance can be
                    // stored now and populated by the child frame.
                    let instance = shape.instantiate();
                    self.destination
                        .write_field(target.name, Value::Object(instance.clone()))?;

                    let child = ObjectFrame::new(
                        config,
                        visited,
                        SourceRef::Shared(object),
                        DestinationRef::Shared(instance),
                        Some(id),
                        self.depth + 1,
                    )?;
                    visited.insert(id);
                    return Ok(Step::Push(Frame::Object(child)));
                }
            }
        }

        Ok(Step::Done)
    }
}

pub(crate) enum Frame<'a> {
    Object(ObjectFrame<'a>),
    Sequence(SequenceFrame),
}

pub(crate) enum Step<'a> {
    Push(Frame<'a>),
    Done,
}

impl<'a> Frame<'a> {
    fn step(&mut self, config: &MapperConfig, visited: &mut VisitedSet) -> Result<Step<'a>> {
        match self {
            Frame::Object(frame) => frame.step(config, visited),
            Frame::Sequence(frame) => frame.step(config, visited),
        }
    }

    /// Completes a popped frame; a sequence yields the list its parent is waiting for.
    fn finish(self, visited: &mut VisitedSet) -> Option<Value> {
        match self {
            Frame::Object(frame) => {
                if let Some(id) = frame.release {
                    visited.remove(id);
                }
                None
            }
            Frame::Sequence(frame) => Some(frame.into_value()),
        }
    }

    fn accept(&mut self, value: Value) -> Result<()> {
        match self {
            Frame::Object(frame) => match frame.pending.take() {
                Some(name) => frame.destination.write_field(name, value),
                None => Ok(()),
            },
            Frame::Sequence(frame) => {
                frame.push(value);
                Ok(())
            }
        }
    }
}

/// Drives a traversal with an explicit frame stack, so graph depth is bounded by
/// memory rather than by the thread's stack.
pub(crate) fn run(config: &MapperConfig, root: ObjectFrame<'_>, visited: &mut VisitedSet) -> Result<()> {
    let mut stack = vec![Frame::Object(root)];

    while let Some(top) = stack.last_mut() {
        match top.step(config, visited)? {
            Step::Push(child) => stack.push(child),
            Step::Done => {
                let Some(finished) = stack.pop() else {
                    break;
                };
                if let Some(value) = finished.finish(visited) {
                    if let Some(parent) = stack.last_mut() {
                        parent.accept(value)?;
                    }
                }
            }
        }
    }

    Ok(())
}
