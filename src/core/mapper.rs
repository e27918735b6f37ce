use crate::config::MapperConfig;
use crate::core::traversal::{self, DestinationRef, ObjectFrame, SourceRef};
use crate::core::visited::VisitedSet;
use crate::domain::model::identity_of;
use crate::domain::ports::{AsyncMapping, MapSource, MapTarget, Mappable};
use crate::utils::error::{MapperError, Result};

/// Copies an object graph into freshly allocated objects of another shape.
///
/// Every top-level call owns its own visited set; nothing carries over between calls.
#[derive(Debug, Clone, Default)]
pub struct GraphMapper {
    config: MapperConfig,
}

impl GraphMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MapperConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn map<D, S>(&self, source: &S) -> Result<D>
    where
        D: MapTarget,
        S: MapSource + ?Sized,
    {
        self.map_structure(source, "map")
    }

    /// Maps `source`, then hands the finished destination to `custom_mapping`.
    pub fn map_with<D, S, F>(&self, source: &S, custom_mapping: F) -> Result<D>
    where
        D: MapTarget,
        S: MapSource + ?Sized,
        F: FnOnce(&mut D),
    {
        let mut destination = self.map_structure(source, "map")?;
        custom_mapping(&mut destination);
        Ok(destination)
    }

    pub async fn map_async<D, S>(&self, source: &S) -> Result<D>
    where
        D: MapTarget,
        S: MapSource + ?Sized,
    {
        self.map_structure(source, "map_async")
    }

    pub async fn map_async_with<D, S, M>(&self, source: &S, custom_mapping: M) -> Result<D>
    where
        D: MapTarget,
        S: MapSource + ?Sized,
        M: AsyncMapping<D>,
    {
        let destination = self.map_structure(source, "map_async")?;
        custom_mapping.apply(destination).await
    }

    /// Maps each element as an independent top-level call, keeping input order.
    pub fn map_collection<D, S>(&self, source: Option<&[S]>) -> Result<Vec<D>>
    where
        D: MapTarget,
        S: MapSource,
    {
        let items = source.ok_or_else(|| MapperError::NullInput {
            context: "map_collection".to_string(),
        })?;

        tracing::debug!(
            "Mapping collection of {} elements into {}",
            items.len(),
            D::describe().name()
        );

        items
            .iter()
            .map(|item| self.map_structure(item, "map_collection element"))
            .collect()
    }

    pub async fn map_collection_async<D, S>(&self, source: Option<&[S]>) -> Result<Vec<D>>
    where
        D: MapTarget,
        S: MapSource,
    {
        self.map_collection(source)
    }

    /// Elements are mapped and post-processed one at a time; the callback for
    /// element `i` completes before element `i + 1` is touched.
    pub async fn map_collection_async_with<D, S, M>(
        &self,
        source: Option<&[S]>,
        custom_mapping: M,
    ) -> Result<Vec<D>>
    where
        D: MapTarget,
        S: MapSource,
        M: AsyncMapping<D>,
    {
        let items = source.ok_or_else(|| MapperError::NullInput {
            context: "map_collection_async".to_string(),
        })?;

        tracing::debug!(
            "Mapping collection of {} elements into {} with async post-processing",
            items.len(),
            D::describe().name()
        );

        let mut results = Vec::with_capacity(items.len());
        for item in items {
            let destination = self.map_structure(item, "map_collection_async element")?;
            results.push(custom_mapping.apply(destination).await?);
        }
        Ok(results)
    }

    fn map_structure<D, S>(&self, source: &S, context: &str) -> Result<D>
    where
        D: MapTarget,
        S: MapSource + ?Sized,
    {
        source.with_mappable(context, |root| {
            let mut destination = D::default();
            let mut visited = self.new_visited_set();

            tracing::debug!(
                "Mapping {} into {}",
                root.shape().name(),
                D::describe().name()
            );

            self.copy_fields(root, &mut destination, &mut visited)?;
            Ok(destination)
        })
    }

    fn new_visited_set(&self) -> VisitedSet {
        if self.config.handle_circular_references {
            VisitedSet::new()
        } else {
            VisitedSet::untracked()
        }
    }

    /// Guarded traversal: a source already in `visited` is left alone, and the
    /// source's mark is released once its subgraph is done.
    pub(crate) fn copy_fields<'a>(
        &self,
        source: &'a dyn Mappable,
        destination: &'a mut dyn Mappable,
        visited: &mut VisitedSet,
    ) -> Result<()> {
        let id = identity_of(source);
        if visited.contains(id) {
            tracing::trace!("{} already on the active path, skipping", source.shape().name());
            return Ok(());
        }

        let root = ObjectFrame::new(
            &self.config,
            visited,
            SourceRef::Borrowed(source),
            DestinationRef::Borrowed(destination),
            Some(id),
            0,
        )?;
        visited.insert(id);
        traversal::run(&self.config, root, visited)
    }
}

/// Extension-method surface: `source.map_to::<Dto>()` with a default mapper.
pub trait MapExt: MapSource {
    fn map_to<D: MapTarget>(&self) -> Result<D> {
        GraphMapper::new().map(self)
    }

    fn map_to_with<D, F>(&self, custom_mapping: F) -> Result<D>
    where
        D: MapTarget,
        F: FnOnce(&mut D),
    {
        GraphMapper::new().map_with(self, custom_mapping)
    }
}

impl<S: MapSource + ?Sized> MapExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mappable;
    use std::cell::RefCell;
    use std::rc::Rc;

    mappable! {
        #[derive(Debug, Default)]
        struct Node {
            name: String,
            next: Option<Rc<RefCell<Node>>>,
        }
    }

    mappable! {
        #[derive(Debug, Default)]
        struct NodeCopy {
            name: String,
            next: Option<Rc<RefCell<NodeCopy>>>,
        }
    }

    #[test]
    fn test_visited_set_is_empty_after_traversal() {
        let mapper = GraphMapper::new();
        let tail = Rc::new(RefCell::new(Node {
            name: "tail".to_string(),
            next: None,
        }));
        let head = Node {
            name: "head".to_string(),
            next: Some(tail),
        };

        let mut destination = NodeCopy::default();
        let mut visited = VisitedSet::new();
        mapper
            .copy_fields(&head, &mut destination, &mut visited)
            .unwrap();

        assert!(visited.is_empty());
        assert_eq!(destination.name, "head");
        let next = destination.next.as_ref().unwrap().borrow();
        assert_eq!(next.name, "tail");
        assert!(next.next.is_none());
    }

    #[test]
    fn test_guard_skips_source_already_on_path() {
        let mapper = GraphMapper::new();
        let node = Node {
            name: "seen".to_string(),
            next: None,
        };

        let mut destination = NodeCopy::default();
        let mut visited = VisitedSet::new();
        visited.insert(identity_of(&node));
        mapper
            .copy_fields(&node, &mut destination, &mut visited)
            .unwrap();

        assert_eq!(destination.name, "");
        assert!(visited.contains(identity_of(&node)));
    }

    fn chain(length: usize) -> Node {
        let mut head = Node {
            name: format!("node-{}", length),
            next: None,
        };
        for index in (1..length).rev() {
            head = Node {
                name: format!("node-{}", index),
                next: Some(Rc::new(RefCell::new(head))),
            };
        }
        head
    }

    // Unlinks iteratively; the default recursive drop of a long chain would not.
    fn dismantle(mut next: Option<Rc<RefCell<Node>>>) {
        while let Some(node) = next {
            next = node.borrow_mut().next.take();
        }
    }

    fn dismantle_copy(mut next: Option<Rc<RefCell<NodeCopy>>>) {
        while let Some(node) = next {
            next = node.borrow_mut().next.take();
        }
    }

    #[test]
    fn test_depth_limit_applies_without_cycle_detection() {
        let mapper = GraphMapper::with_config(MapperConfig {
            handle_circular_references: false,
            max_depth: 2,
        });
        let first = chain(3);

        let err = mapper.map::<NodeCopy, _>(&first).unwrap_err();
        assert!(matches!(err, MapperError::DepthExceeded { max_depth: 2, .. }));

        let shallow: NodeCopy = mapper.map(&chain(2)).unwrap();
        assert!(shallow.next.is_some());
    }

    #[test]
    fn test_deep_chain_maps_past_default_depth() {
        let mut source = chain(20_000);

        let mut copy: NodeCopy = GraphMapper::new().map(&source).unwrap();

        let mut length = 1;
        let mut cursor = copy.next.clone();
        while let Some(node) = cursor {
            length += 1;
            cursor = node.borrow().next.clone();
        }
        assert_eq!(length, 20_000);

        dismantle(source.next.take());
        dismantle_copy(copy.next.take());
    }

    #[test]
    fn test_untracked_chain_at_depth_cap() {
        let config = MapperConfig::from_toml_str(
            "[mapper]\nhandle_circular_references = false\nmax_depth = 2048\n",
        )
        .unwrap();
        let mapper = GraphMapper::with_config(config);

        let copy: NodeCopy = mapper.map(&chain(2_048)).unwrap();
        assert_eq!(copy.name, "node-1");

        let err = mapper.map::<NodeCopy, _>(&chain(2_049)).unwrap_err();
        assert!(matches!(err, MapperError::DepthExceeded { max_depth: 2_048, .. }));
    }

    #[test]
    fn test_untracked_cycle_at_depth_cap_fails_cleanly() {
        let config = MapperConfig::from_toml_str(
            "[mapper]\nhandle_circular_references = false\nmax_depth = 2048\n",
        )
        .unwrap();
        let left = Rc::new(RefCell::new(Node {
            name: "left".to_string(),
            next: None,
        }));
        let right = Rc::new(RefCell::new(Node {
            name: "right".to_string(),
            next: Some(left.clone()),
        }));
        left.borrow_mut().next = Some(right);

        let err = GraphMapper::with_config(config)
            .map::<NodeCopy, _>(&left)
            .unwrap_err();
        assert!(matches!(err, MapperError::DepthExceeded { max_depth: 2_048, .. }));

        left.borrow_mut().next = None;
    }
}
