//! Per-node layout memoization and pass statistics.
//!
//! Every node owns a [`NodeCache`]: one slot for its last final layout and a
//! short list of measurement results. A slot matches when the constraints a
//! parent passes in are identical and the node's style generation has not
//! moved. Structural and style mutations clear the slots of the mutated node
//! and all its ancestors, so a hit also vouches for the whole subtree.

use serde::Serialize;

use crate::compute::{LayoutInput, LayoutOutput, RunMode};
use crate::geometry::Size;
use crate::style::AvailableSpace;

/// The constraints a layout result depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheKey {
    /// Border-box sizes imposed by the parent.
    pub known_dimensions: Size<Option<f64>>,
    /// Percentage basis.
    pub parent_size: Size<Option<f64>>,
    /// Available space in each axis.
    pub available_space: Size<AvailableSpace>,
}

impl From<&LayoutInput> for CacheKey {
    fn from(input: &LayoutInput) -> Self {
        Self {
            known_dimensions: input.known_dimensions,
            parent_size: input.parent_size,
            available_space: input.available_space,
        }
    }
}

/// One memoized result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheSlot {
    /// The constraints this result was computed under.
    pub key: CacheKey,
    /// The result.
    pub output: LayoutOutput,
    /// Style generation of the node when the result was stored.
    pub style_generation: u64,
}

/// The cache slots of one node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeCache {
    layout: Option<CacheSlot>,
    measurements: Vec<CacheSlot>,
}

impl NodeCache {
    /// Look up a result for `input`.
    ///
    /// A final-layout request only matches the final-layout slot, since a
    /// hit there means the subtree's positions are still in place. A
    /// measurement may also be answered from the final-layout slot.
    #[must_use]
    pub fn get(&self, input: &LayoutInput, style_generation: u64) -> Option<LayoutOutput> {
        let key = CacheKey::from(input);
        let matches =
            |slot: &&CacheSlot| slot.key == key && slot.style_generation == style_generation;
        match input.run_mode {
            RunMode::PerformLayout => self.layout.as_ref().filter(matches).map(|s| s.output),
            RunMode::ComputeSize => self
                .layout
                .iter()
                .chain(self.measurements.iter())
                .find(matches)
                .map(|s| s.output),
        }
    }

    /// Store a result. Measurement slots beyond `capacity` evict the oldest.
    pub fn store(
        &mut self,
        input: &LayoutInput,
        output: LayoutOutput,
        style_generation: u64,
        capacity: usize,
    ) {
        let slot = CacheSlot {
            key: CacheKey::from(input),
            output,
            style_generation,
        };
        match input.run_mode {
            RunMode::PerformLayout => self.layout = Some(slot),
            RunMode::ComputeSize => {
                if capacity == 0 {
                    return;
                }
                self.measurements.retain(|s| s.key != slot.key);
                if self.measurements.len() >= capacity {
                    let excess = self.measurements.len() + 1 - capacity;
                    let _evicted = self.measurements.drain(..excess);
                }
                self.measurements.push(slot);
            }
        }
    }

    /// Drop every slot.
    pub fn clear(&mut self) {
        self.layout = None;
        self.measurements.clear();
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layout.is_none() && self.measurements.is_empty()
    }

    /// Number of measurement slots in use.
    #[must_use]
    pub fn measurement_count(&self) -> usize {
        self.measurements.len()
    }
}

/// Statistics for the most recent layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Node visits answered from a cache slot.
    pub hits: u64,
    /// Node visits that ran a layout algorithm.
    pub misses: u64,
    /// Every node visit, hit or miss.
    pub nodes_computed: u64,
    /// `hits / (hits + misses)`, or 0 before any visit.
    pub hit_rate: f64,
}

impl CacheStats {
    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
        self.nodes_computed += 1;
        self.update_rate();
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
        self.nodes_computed += 1;
        self.update_rate();
    }

    /// Zero every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn update_rate(&mut self) {
        let total = self.hits + self.misses;
        self.hit_rate = if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        };
    }
}
