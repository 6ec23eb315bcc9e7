//! Serializable snapshots of a laid-out tree.
//!
//! Two shapes are produced: the layout tree (geometry only) consumed by
//! layout assertions, and the paint tree (geometry plus the visual
//! properties a renderer needs). `display: none` subtrees are omitted from
//! the paint tree since they paint nothing.

use serde::Serialize;

use crate::error::LayoutError;
use crate::geometry::Edges;
use crate::tree::{LayoutTree, NodeId};

/// `{id, x, y, width, height, margin, padding, border, children}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSnapshot {
    /// External identifier of the node.
    pub id: String,
    /// Border-box left edge, relative to the parent's content box.
    pub x: f64,
    /// Border-box top edge, relative to the parent's content box.
    pub y: f64,
    /// Border-box width.
    pub width: f64,
    /// Border-box height.
    pub height: f64,
    /// Used margins.
    pub margin: Edges<f64>,
    /// Used padding.
    pub padding: Edges<f64>,
    /// Used border widths.
    pub border: Edges<f64>,
    /// Children in document order.
    pub children: Vec<Self>,
}

/// The layout snapshot plus paint properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintSnapshot {
    /// External identifier of the node.
    pub id: String,
    /// Border-box left edge, relative to the parent's content box.
    pub x: f64,
    /// Border-box top edge, relative to the parent's content box.
    pub y: f64,
    /// Border-box width.
    pub width: f64,
    /// Border-box height.
    pub height: f64,
    /// Used margins.
    pub margin: Edges<f64>,
    /// Used padding.
    pub padding: Edges<f64>,
    /// Used border widths.
    pub border: Edges<f64>,
    /// `background-color` as CSS text, if set.
    pub background_color: Option<String>,
    /// `color` as CSS text, if set.
    pub color: Option<String>,
    /// `opacity`
    pub opacity: f64,
    /// Text content of text leaves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Painted children in document order.
    pub children: Vec<Self>,
}

impl LayoutTree {
    /// The external identifier of `id`: its label, or the arena id.
    #[must_use]
    pub fn display_id(&self, id: NodeId) -> String {
        self.get(id)
            .and_then(|n| n.label.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Snapshot the geometry of the subtree rooted at `root`.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if `root` is not live.
    pub fn layout_snapshot(&self, root: NodeId) -> Result<LayoutSnapshot, LayoutError> {
        let node = self.node(root)?;
        let layout = node.layout;
        let children = node
            .children
            .iter()
            .filter_map(|&child| self.layout_snapshot(child).ok())
            .collect();
        Ok(LayoutSnapshot {
            id: self.display_id(root),
            x: layout.x,
            y: layout.y,
            width: layout.width,
            height: layout.height,
            margin: layout.margin,
            padding: layout.padding,
            border: layout.border,
            children,
        })
    }

    /// Snapshot the paint tree rooted at `root`, skipping `display: none`
    /// descendants.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if `root` is not live.
    pub fn paint_snapshot(&self, root: NodeId) -> Result<PaintSnapshot, LayoutError> {
        let node = self.node(root)?;
        let layout = node.layout;
        let style = &node.style;
        let children = node
            .children
            .iter()
            .filter(|&&child| self.get(child).is_some_and(|c| !c.style.is_hidden()))
            .filter_map(|&child| self.paint_snapshot(child).ok())
            .collect();
        Ok(PaintSnapshot {
            id: self.display_id(root),
            x: layout.x,
            y: layout.y,
            width: layout.width,
            height: layout.height,
            margin: layout.margin,
            padding: layout.padding,
            border: layout.border,
            background_color: style.background_color.map(|c| c.to_string()),
            color: style.color.map(|c| c.to_string()),
            opacity: style.opacity,
            text: node.text.clone(),
            children,
        })
    }
}
