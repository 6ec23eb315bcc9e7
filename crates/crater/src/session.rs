//! One layout tree together with its viewport and external identifiers.
//!
//! The session is the imperative façade over [`LayoutTree`]: nodes are
//! addressed by their selector-like string ids, and every failure collapses
//! to `false`, `0.0` or an empty JSON object instead of an error.

use std::collections::HashMap;

use crater_common::warning::warn_once;
use crater_layout::style::parse::apply_declarations;
use crater_layout::{
    CacheStats, LayoutConfig, LayoutError, LayoutSnapshot, LayoutTree, NodeId, PaintSnapshot,
    Size, Style,
};
use serde::Serialize;

use crate::markup::{self, MarkupTree, ROOT_ID};

/// JSON returned when there is nothing to report.
pub const EMPTY_JSON: &str = "{}";

/// A layout tree, its root, its viewport and the id map.
#[derive(Debug)]
pub struct LayoutSession {
    pub(crate) tree: LayoutTree,
    pub(crate) root: NodeId,
    pub(crate) ids: HashMap<String, NodeId>,
    pub(crate) viewport: Size<f64>,
}

impl LayoutSession {
    /// Build a session from inline-styled markup.
    #[must_use]
    pub fn from_html(html: &str, width: f64, height: f64) -> Self {
        Self::with_config(html, width, height, LayoutConfig::default())
    }

    /// Build a session from inline-styled markup with explicit engine
    /// settings.
    #[must_use]
    pub fn with_config(html: &str, width: f64, height: f64, config: LayoutConfig) -> Self {
        let mut tree = LayoutTree::with_config(config);
        let MarkupTree { root, ids } = markup::build_tree(&mut tree, html);
        Self {
            tree,
            root,
            ids,
            viewport: sanitize_viewport(width, height),
        }
    }

    /// A session holding only the synthetic root, for building a tree
    /// node by node through the Yoga-style surface.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self::from_html("", width, height)
    }

    /// The underlying tree.
    #[must_use]
    pub const fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    /// The synthetic root.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// The current viewport.
    #[must_use]
    pub const fn viewport(&self) -> Size<f64> {
        self.viewport
    }

    /// Resolve an external identifier.
    #[must_use]
    pub fn node_id(&self, id: &str) -> Option<NodeId> {
        self.ids
            .get(id)
            .copied()
            .filter(|&node| self.tree.contains(node))
    }

    /// Every external identifier currently known, sorted.
    #[must_use]
    pub fn external_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .ids
            .iter()
            .filter(|(_, node)| self.tree.contains(**node))
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    // ===== Layout =====

    /// Lay out the tree reusing valid cache slots; returns the layout tree
    /// as JSON.
    pub fn compute_incremental(&mut self) -> String {
        match self.tree.compute_layout(self.root, self.viewport) {
            Ok(()) => self.layout_json(),
            Err(err) => failure(&err),
        }
    }

    /// Lay out the tree from scratch; returns the layout tree as JSON.
    pub fn compute_full(&mut self) -> String {
        match self.tree.compute_layout_full(self.root, self.viewport) {
            Ok(()) => self.layout_json(),
            Err(err) => failure(&err),
        }
    }

    /// The layout tree from the last pass.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if the root has gone.
    pub fn layout_snapshot(&self) -> Result<LayoutSnapshot, LayoutError> {
        self.tree.layout_snapshot(self.root)
    }

    /// The paint tree from the last pass.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if the root has gone.
    pub fn paint_snapshot(&self) -> Result<PaintSnapshot, LayoutError> {
        self.tree.paint_snapshot(self.root)
    }

    /// The layout tree from the last pass as JSON.
    #[must_use]
    pub fn layout_json(&self) -> String {
        self.layout_snapshot()
            .map_or_else(|err| failure(&err), |snapshot| to_json(&snapshot))
    }

    /// The paint tree from the last pass as JSON.
    #[must_use]
    pub fn paint_tree(&self) -> String {
        self.paint_snapshot()
            .map_or_else(|err| failure(&err), |snapshot| to_json(&snapshot))
    }

    /// Statistics of the last pass.
    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.tree.cache_stats()
    }

    /// Statistics of the last pass as JSON.
    #[must_use]
    pub fn cache_stats(&self) -> String {
        to_json(&self.tree.cache_stats())
    }

    /// Whether anything below the root changed since the last pass.
    #[must_use]
    pub fn needs_layout(&self) -> bool {
        self.tree.is_dirty(self.root).unwrap_or(false)
    }

    // ===== Mutation =====

    /// Invalidate `id` and its ancestors.
    pub fn mark_dirty(&mut self, id: &str) -> bool {
        self.node_id(id)
            .is_some_and(|node| self.tree.mark_dirty(node).is_ok())
    }

    /// Apply a declaration block on top of the current style of `id`.
    ///
    /// Declarations not mentioned keep their current values.
    pub fn update_style(&mut self, id: &str, css: &str) -> bool {
        self.edit_style(id, |style| apply_declarations(style, css))
    }

    /// Replace the viewport. The root is invalidated so the next pass runs
    /// against the new size.
    pub fn resize_viewport(&mut self, width: f64, height: f64) {
        let viewport = sanitize_viewport(width, height);
        if viewport != self.viewport {
            self.viewport = viewport;
            if let Err(err) = self.tree.mark_dirty(self.root) {
                warn_once("Session", &err.to_string());
            }
        }
    }

    /// Run `edit` on the style of `id`; `false` when `id` is unknown.
    pub(crate) fn edit_style(&mut self, id: &str, edit: impl FnOnce(&mut Style)) -> bool {
        self.node_id(id)
            .is_some_and(|node| self.tree.update_style(node, edit).is_ok())
    }

    /// Drop ids whose nodes no longer exist.
    pub(crate) fn prune_ids(&mut self) {
        let tree = &self.tree;
        self.ids.retain(|_, node| tree.contains(*node));
    }

    /// Whether `id` names the synthetic root.
    pub(crate) fn is_root(&self, id: &str) -> bool {
        id == ROOT_ID || self.node_id(id) == Some(self.root)
    }
}

/// Negative and non-finite viewport sides become zero.
fn sanitize_viewport(width: f64, height: f64) -> Size<f64> {
    let side = |value: f64, name: &str| {
        if value.is_finite() && value >= 0.0 {
            value
        } else {
            warn_once("Session", &format!("invalid viewport {name} '{value}', using 0"));
            0.0
        }
    };
    Size::new(side(width, "width"), side(height, "height"))
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| EMPTY_JSON.to_owned())
}

fn failure(err: &LayoutError) -> String {
    warn_once("Session", &err.to_string());
    EMPTY_JSON.to_owned()
}
