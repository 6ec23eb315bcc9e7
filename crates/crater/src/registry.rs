//! Registry of independent layout sessions.
//!
//! [`Crater`] owns any number of [`LayoutSession`]s addressed by
//! [`TreeId`], plus one "current" handle. The string-returning calls
//! operate on the current session and answer `{}` / `false` when there is
//! none.

use std::collections::BTreeMap;
use std::fmt;

use crater_layout::LayoutConfig;
use serde::Serialize;

use crate::session::{EMPTY_JSON, LayoutSession};

/// Handle of one session in a [`Crater`] registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TreeId(u32);

impl TreeId {
    /// The raw handle value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tree-{}", self.0)
    }
}

/// Every live session plus the current one.
#[derive(Debug, Default)]
pub struct Crater {
    sessions: BTreeMap<TreeId, LayoutSession>,
    current: Option<TreeId>,
    next_id: u32,
    config: LayoutConfig,
}

impl Crater {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty registry whose sessions use `config`.
    #[must_use]
    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    // ===== Tree management =====

    /// Build a session from markup and make it current.
    pub fn create_tree(&mut self, html: &str, width: f64, height: f64) -> TreeId {
        let id = TreeId(self.next_id);
        self.next_id += 1;
        let session = LayoutSession::with_config(html, width, height, self.config);
        let _ = self.sessions.insert(id, session);
        self.current = Some(id);
        id
    }

    /// Make `id` current.
    pub fn select_tree(&mut self, id: TreeId) -> bool {
        let known = self.sessions.contains_key(&id);
        if known {
            self.current = Some(id);
        }
        known
    }

    /// The current handle.
    #[must_use]
    pub const fn current_tree(&self) -> Option<TreeId> {
        self.current
    }

    /// Handles of every live session, in creation order.
    pub fn tree_ids(&self) -> impl Iterator<Item = TreeId> + '_ {
        self.sessions.keys().copied()
    }

    /// Destroy the current session. Nothing becomes current afterwards.
    pub fn destroy_tree(&mut self) -> bool {
        let Some(id) = self.current else {
            return false;
        };
        self.destroy_tree_by_id(id)
    }

    /// Destroy the session `id`.
    pub fn destroy_tree_by_id(&mut self, id: TreeId) -> bool {
        let removed = self.sessions.remove(&id).is_some();
        if self.current == Some(id) {
            self.current = None;
        }
        removed
    }

    // ===== Session access =====

    /// The session `id`.
    #[must_use]
    pub fn session(&self, id: TreeId) -> Option<&LayoutSession> {
        self.sessions.get(&id)
    }

    /// The session `id`, mutably.
    pub fn session_mut(&mut self, id: TreeId) -> Option<&mut LayoutSession> {
        self.sessions.get_mut(&id)
    }

    /// The current session.
    #[must_use]
    pub fn current(&self) -> Option<&LayoutSession> {
        self.current.and_then(|id| self.sessions.get(&id))
    }

    /// The current session, mutably.
    pub fn current_mut(&mut self) -> Option<&mut LayoutSession> {
        self.current.and_then(|id| self.sessions.get_mut(&id))
    }

    // ===== Current-session calls =====

    /// See [`LayoutSession::compute_incremental`].
    pub fn compute_incremental(&mut self) -> String {
        self.current_mut()
            .map_or_else(|| EMPTY_JSON.to_owned(), LayoutSession::compute_incremental)
    }

    /// See [`LayoutSession::compute_full`].
    pub fn compute_full(&mut self) -> String {
        self.current_mut()
            .map_or_else(|| EMPTY_JSON.to_owned(), LayoutSession::compute_full)
    }

    /// See [`LayoutSession::paint_tree`].
    #[must_use]
    pub fn paint_tree(&self) -> String {
        self.current()
            .map_or_else(|| EMPTY_JSON.to_owned(), LayoutSession::paint_tree)
    }

    /// See [`LayoutSession::cache_stats`].
    #[must_use]
    pub fn cache_stats(&self) -> String {
        self.current()
            .map_or_else(|| EMPTY_JSON.to_owned(), LayoutSession::cache_stats)
    }

    /// See [`LayoutSession::mark_dirty`].
    pub fn mark_dirty(&mut self, node_id: &str) -> bool {
        self.current_mut()
            .is_some_and(|session| session.mark_dirty(node_id))
    }

    /// See [`LayoutSession::update_style`].
    pub fn update_style(&mut self, node_id: &str, css: &str) -> bool {
        self.current_mut()
            .is_some_and(|session| session.update_style(node_id, css))
    }

    /// See [`LayoutSession::resize_viewport`].
    pub fn resize_viewport(&mut self, width: f64, height: f64) -> bool {
        let Some(session) = self.current_mut() else {
            return false;
        };
        session.resize_viewport(width, height);
        true
    }

    /// See [`LayoutSession::needs_layout`].
    #[must_use]
    pub fn needs_layout(&self) -> bool {
        self.current().is_some_and(LayoutSession::needs_layout)
    }
}
