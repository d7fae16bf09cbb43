//! Bus Node
//!
//! A single named gain-control node in the mixing tree. Buses are owned by
//! the [`BusGraph`](crate::graph::BusGraph) arena and refer to their parent
//! by index, so the tree has no pointer cycles and serializes trivially.

use serde::{Deserialize, Serialize};

use crate::graph::level::{clamp_db, db_to_linear};

/// Stable index of a bus inside the graph's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusId(pub(crate) usize);

impl BusId {
    /// Arena index of this bus
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A named gain-control node
///
/// Gain is stored in decibels, clamped to [-80, +20], with the linear
/// equivalent cached so effective-gain queries stay multiplication-only.
#[derive(Debug, Clone)]
pub struct Bus {
    name: String,
    gain_db: f32,
    gain_linear: f32,
    muted: bool,
    parent: Option<BusId>,
}

impl Bus {
    pub(crate) fn new(name: impl Into<String>, gain_db: f32, parent: Option<BusId>) -> Self {
        let clamped = clamp_db(gain_db);
        Self {
            name: name.into(),
            gain_db: clamped,
            gain_linear: db_to_linear(clamped),
            muted: false,
            parent,
        }
    }

    /// Bus name (unique within the graph)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct gain of this node in dB (ancestors not included)
    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Cached linear equivalent of the direct gain
    pub fn gain_linear(&self) -> f32 {
        self.gain_linear
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Parent bus, `None` for the root
    pub fn parent(&self) -> Option<BusId> {
        self.parent
    }

    /// Set the direct gain, silently clamping to the valid dB range
    pub(crate) fn set_gain_db(&mut self, db: f32) {
        self.gain_db = clamp_db(db);
        self.gain_linear = db_to_linear(self.gain_db);
    }

    pub(crate) fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}
