//! Engine configuration.

use serde::Serialize;

/// Default number of measurement slots kept per node.
pub const DEFAULT_MEASURE_CACHE_SLOTS: usize = 8;

/// Which [`FontMetrics`](crate::text::FontMetrics) a new tree starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, strum_macros::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FontMetricsKind {
    /// [`ApproximateFontMetrics`](crate::text::ApproximateFontMetrics).
    #[default]
    Approximate,
    /// [`MonospaceFontMetrics`](crate::text::MonospaceFontMetrics): one
    /// cell per character, for terminal renderers.
    Monospace,
}

/// Tunables for a [`LayoutTree`](crate::tree::LayoutTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Measurement results remembered per node before the oldest is
    /// evicted. Zero disables measurement caching (the final-layout slot is
    /// always kept).
    pub measure_cache_slots: usize,
    /// Text measurement backend.
    pub font_metrics: FontMetricsKind,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            measure_cache_slots: DEFAULT_MEASURE_CACHE_SLOTS,
            font_metrics: FontMetricsKind::Approximate,
        }
    }
}
