//! Imperative façade over the Crater layout engine.
//!
//! # Scope
//!
//! This crate provides:
//! - **Markup Reader** - inline-styled HTML subset to layout nodes
//! - **Layout Sessions** - one tree, its viewport and its external ids
//! - **Tree Registry** - many sessions behind one "current" handle
//! - **Yoga Surface** - per-node setters and computed-value getters
//!
//! Nodes are addressed by selector-like ids (`div#main`, `p@2`,
//! `#text@0`, `root`). Nothing here returns an error: unknown ids yield
//! `false`, `0.0` or `{}`, and repaired input is reported once through
//! [`crater_common::warning`].
//!
//! # Not Yet Implemented
//!
//! - Stylesheets and the cascade (only `style` attributes are read)
//! - Right-to-left `Start`/`End` edges

pub mod markup;
pub mod registry;
pub mod session;
pub mod yoga;

pub use crater_layout as layout;

pub use markup::{MarkupTree, ROOT_ID, Token, build_tree, tokenize};
pub use registry::{Crater, TreeId};
pub use session::{EMPTY_JSON, LayoutSession};
pub use yoga::{Edge, Gutter, yoga_default_style};
