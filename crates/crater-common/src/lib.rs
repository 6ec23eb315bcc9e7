//! Common utilities for the Crater layout engine.
//!
//! This crate provides shared infrastructure used by every Crater crate:
//! - **Warning System** - de-duplicated, coloured diagnostics for invalid or
//!   unsupported style input

pub mod warning;
