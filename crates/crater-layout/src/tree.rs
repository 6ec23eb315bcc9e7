//! Arena-backed layout tree.
//!
//! # Design
//!
//! Nodes live in a `Vec` of generational slots and refer to each other only
//! through [`NodeId`]s, giving O(1) access and traversal without borrow
//! checker issues. A slot freed by [`LayoutTree::destroy_node`] is reused by
//! later insertions under a bumped generation, so a stale id never resolves
//! to the new occupant.
//!
//! Every structural or style mutation raises the dirty flag on the touched
//! node and its ancestors and clears their cache slots.

use std::fmt;

use serde::Serialize;

use crate::box_model::LayoutResult;
use crate::cache::{CacheStats, NodeCache};
use crate::config::{FontMetricsKind, LayoutConfig};
use crate::error::LayoutError;
use crate::style::Style;
use crate::text::{ApproximateFontMetrics, FontMetrics, MonospaceFontMetrics};

/// A generational index into the [`LayoutTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// The slot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// The slot generation this id was issued for.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// One node of the layout tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) style: Style,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) layout: LayoutResult,
    pub(crate) cache: NodeCache,
    pub(crate) dirty: bool,
    pub(crate) has_new_layout: bool,
    pub(crate) style_generation: u64,
    pub(crate) text: Option<String>,
    pub(crate) tag: Option<String>,
    pub(crate) label: Option<String>,
}

impl Node {
    fn new(style: Style) -> Self {
        Self {
            style,
            parent: None,
            children: Vec::new(),
            layout: LayoutResult::default(),
            cache: NodeCache::default(),
            dirty: true,
            has_new_layout: true,
            style_generation: 0,
            text: None,
            tag: None,
            label: None,
        }
    }

    /// The node's style.
    #[must_use]
    pub const fn style(&self) -> &Style {
        &self.style
    }

    /// The parent, if attached.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in layout and paint order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The last computed layout.
    #[must_use]
    pub const fn layout(&self) -> &LayoutResult {
        &self.layout
    }

    /// Text content for text leaves.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Element tag name, if the node came from markup.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// External identifier used in serialized output.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Whether the node awaits layout.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Owns every node, the cache statistics and the text measurement backend.
pub struct LayoutTree {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    len: usize,
    pub(crate) config: LayoutConfig,
    pub(crate) metrics: Box<dyn FontMetrics>,
    pub(crate) stats: CacheStats,
    pub(crate) use_cache: bool,
}

impl fmt::Debug for LayoutTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutTree")
            .field("nodes", &self.len)
            .field("slots", &self.slots.len())
            .field("free_list", &self.free_list.len())
            .field("config", &self.config)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutTree {
    /// An empty tree with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    /// An empty tree.
    #[must_use]
    pub fn with_config(config: LayoutConfig) -> Self {
        let metrics: Box<dyn FontMetrics> = match config.font_metrics {
            FontMetricsKind::Approximate => Box::new(ApproximateFontMetrics),
            FontMetricsKind::Monospace => Box::new(MonospaceFontMetrics),
        };
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            config,
            metrics,
            stats: CacheStats::default(),
            use_cache: true,
        }
    }

    /// Replace the text measurement backend. Every node is marked dirty.
    pub fn set_font_metrics(&mut self, metrics: Box<dyn FontMetrics>) {
        self.metrics = metrics;
        for node in self.slots.iter_mut().filter_map(|s| s.node.as_mut()) {
            node.dirty = true;
            node.cache.clear();
        }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Number of live nodes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree has no nodes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `id` refers to a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Ids of every live node in slot order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.node.as_ref().map(|_| NodeId {
                index: i as u32,
                generation: slot.generation,
            })
        })
    }

    /// Borrow a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Borrow a node, failing softly on an unknown id.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if `id` is not live.
    pub fn node(&self, id: NodeId) -> Result<&Node, LayoutError> {
        self.get(id).ok_or(LayoutError::NodeNotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, LayoutError> {
        self.get_mut(id).ok_or(LayoutError::NodeNotFound(id))
    }

    /// Create a detached node.
    pub fn create_node(&mut self, style: Style) -> NodeId {
        let node = Node::new(style);
        self.len += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index: (self.slots.len() - 1) as u32,
                generation: 0,
            }
        }
    }

    /// Create a detached text leaf.
    pub fn create_text_node(&mut self, text: impl Into<String>, style: Style) -> NodeId {
        let id = self.create_node(style);
        if let Some(node) = self.get_mut(id) {
            node.text = Some(text.into());
        }
        id
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] for unknown ids,
    /// [`LayoutError::WouldCycle`] if `child` is `parent` or one of its
    /// ancestors.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), LayoutError> {
        let len = self.node(parent)?.children.len();
        let len = if self.node(child)?.parent == Some(parent) {
            len - 1
        } else {
            len
        };
        self.insert_child(parent, child, len)
    }

    /// Insert `child` at `index` among `parent`'s children, detaching it from
    /// any previous parent first.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] for unknown ids,
    /// [`LayoutError::WouldCycle`] if `child` is `parent` or one of its
    /// ancestors, [`LayoutError::ChildIndexOutOfBounds`] if `index` exceeds
    /// the child count after detaching.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: usize,
    ) -> Result<(), LayoutError> {
        let _ = self.node(child)?;
        let _ = self.node(parent)?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(LayoutError::WouldCycle { parent, child });
        }
        let mut len = self.node(parent)?.children.len();
        if self.node(child)?.parent == Some(parent) {
            len -= 1;
        }
        if index > len {
            return Err(LayoutError::ChildIndexOutOfBounds { parent, index, len });
        }

        self.detach(child)?;
        self.node_mut(parent)?.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        self.mark_dirty(parent)?;
        self.mark_dirty(child)
    }

    /// Detach and return the child at `index`.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] for an unknown parent,
    /// [`LayoutError::ChildIndexOutOfBounds`] past the end.
    pub fn remove_child(&mut self, parent: NodeId, index: usize) -> Result<NodeId, LayoutError> {
        let children = &self.node(parent)?.children;
        let child = *children
            .get(index)
            .ok_or(LayoutError::ChildIndexOutOfBounds {
                parent,
                index,
                len: children.len(),
            })?;
        self.detach(child)?;
        Ok(child)
    }

    /// Detach `child` from `parent`, returning its former index.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] for unknown ids or when `child` is not
    /// a child of `parent`.
    pub fn remove_child_node(
        &mut self,
        parent: NodeId,
        child: NodeId,
    ) -> Result<usize, LayoutError> {
        let index = self
            .node(parent)?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(LayoutError::NodeNotFound(child))?;
        let _ = self.remove_child(parent, index)?;
        Ok(index)
    }

    /// Destroy `id` and its whole subtree, detaching it from its parent.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if `id` is not live.
    pub fn destroy_node(&mut self, id: NodeId) -> Result<(), LayoutError> {
        self.detach(id)?;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(slot) = self
                .slots
                .get_mut(current.index())
                .filter(|slot| slot.generation == current.generation)
            else {
                continue;
            };
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                self.free_list.push(current.index);
                self.len -= 1;
            }
        }
        Ok(())
    }

    /// Drop every node. Ids issued before stay dead.
    pub fn clear(&mut self) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                self.free_list.push(i as u32);
            }
        }
        self.len = 0;
        self.stats.reset();
    }

    /// Children of `id` in order.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if `id` is not live.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId], LayoutError> {
        Ok(&self.node(id)?.children)
    }

    /// Number of children of `id`.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if `id` is not live.
    pub fn child_count(&self, id: NodeId) -> Result<usize, LayoutError> {
        Ok(self.node(id)?.children.len())
    }

    /// Parent of `id`, `None` for detached nodes.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if `id` is not live.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, LayoutError> {
        Ok(self.node(id)?.parent)
    }

    /// Style of `id`.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if `id` is not live.
    pub fn style(&self, id: NodeId) -> Result<&Style, LayoutError> {
        Ok(&self.node(id)?.style)
    }

    /// Replace the style of `id` and mark it dirty.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if `id` is not live.
    pub fn set_style(&mut self, id: NodeId, style: Style) -> Result<(), LayoutError> {
        self.update_style(id, |s| *s = style)
    }

    /// Edit the style of `id` in place and mark it dirty.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if `id` is not live.
    pub fn update_style(
        &mut self,
        id: NodeId,
        edit: impl FnOnce(&mut Style),
    ) -> Result<(), LayoutError> {
        let node = self.node_mut(id)?;
        edit(&mut node.style);
        node.style_generation += 1;
        self.mark_dirty(id)
    }

    /// Text content of `id`.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if `id` is not live.
    pub fn text(&self, id: NodeId) -> Result<Option<&str>, LayoutError> {
        Ok(self.node(id)?.text.as_deref())
    }

    /// Replace the text content of `id` and mark it dirty.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if `id` is not live.
    pub fn set_text(&mut self, id: NodeId, text: Option<String>) -> Result<(), LayoutError> {
        let node = self.node_mut(id)?;
        node.text = text;
        node.style_generation += 1;
        self.mark_dirty(id)
    }

    /// Record the element tag and external label used by serializers.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if `id` is not live.
    pub fn set_label(
        &mut self,
        id: NodeId,
        tag: Option<String>,
        label: Option<String>,
    ) -> Result<(), LayoutError> {
        let node = self.node_mut(id)?;
        node.tag = tag;
        node.label = label;
        Ok(())
    }

    /// The last computed layout of `id`.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if `id` is not live.
    pub fn layout(&self, id: NodeId) -> Result<&LayoutResult, LayoutError> {
        Ok(&self.node(id)?.layout)
    }

    /// Raise the dirty flag on `id` and every ancestor and clear their cache
    /// slots.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if `id` is not live.
    pub fn mark_dirty(&mut self, id: NodeId) -> Result<(), LayoutError> {
        let _ = self.node(id)?;
        let mut current = Some(id);
        while let Some(cur) = current {
            let Some(node) = self.get_mut(cur) else { break };
            node.dirty = true;
            node.cache.clear();
            current = node.parent;
        }
        Ok(())
    }

    /// Whether `id` is dirty.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if `id` is not live.
    pub fn is_dirty(&self, id: NodeId) -> Result<bool, LayoutError> {
        Ok(self.node(id)?.dirty)
    }

    /// Whether any live node is dirty.
    #[must_use]
    pub fn needs_layout(&self) -> bool {
        self.slots
            .iter()
            .filter_map(|slot| slot.node.as_ref())
            .any(|node| node.dirty)
    }

    /// Whether the layout of `id` changed since the last
    /// [`LayoutTree::mark_layout_seen`].
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if `id` is not live.
    pub fn has_new_layout(&self, id: NodeId) -> Result<bool, LayoutError> {
        Ok(self.node(id)?.has_new_layout)
    }

    /// Acknowledge the current layout of `id`.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if `id` is not live.
    pub fn mark_layout_seen(&mut self, id: NodeId) -> Result<(), LayoutError> {
        self.node_mut(id)?.has_new_layout = false;
        Ok(())
    }

    /// Statistics of the most recent layout pass.
    #[must_use]
    pub const fn cache_stats(&self) -> CacheStats {
        self.stats
    }

    /// Zero the statistics.
    pub fn reset_cache_stats(&mut self) {
        self.stats.reset();
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.get(cur).and_then(|n| n.parent);
        }
        false
    }

    /// Unlink `id` from its parent, if any, and dirty the old parent.
    fn detach(&mut self, id: NodeId) -> Result<(), LayoutError> {
        let Some(old_parent) = self.node_mut(id)?.parent.take() else {
            return Ok(());
        };
        if let Some(parent) = self.get_mut(old_parent) {
            parent.children.retain(|&c| c != id);
        }
        if self.contains(old_parent) {
            self.mark_dirty(old_parent)?;
        }
        Ok(())
    }

    pub(crate) fn style_snapshot(&self, id: NodeId) -> Style {
        self.get(id).map(|n| n.style.clone()).unwrap_or_default()
    }

    pub(crate) fn children_snapshot(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id).map(|n| n.children.clone()).unwrap_or_default()
    }
}
