//! Mixing Bus Tree
//!
//! An arena-backed tree of named gain buses. The root bus (conventionally
//! "Master") is created by the constructor; every other bus is created with
//! an existing parent, so cycles are unrepresentable and "exactly one parent
//! per non-root bus" holds by construction.
//!
//! Structural errors (duplicate or unknown names) are setup-time failures;
//! once a graph is built, every query and gain write is infallible.

mod bus;
pub mod level;

pub use bus::{Bus, BusId};

use std::collections::HashMap;

use log::debug;

use crate::error::{MixerError, Result};
use crate::graph::level::linear_to_db;

/// Arena-backed tree of gain buses
#[derive(Debug, Clone)]
pub struct BusGraph {
    buses: Vec<Bus>,
    by_name: HashMap<String, BusId>,
}

impl BusGraph {
    /// Create a graph containing only the root bus at 0 dB, unmuted
    pub fn new(root_name: impl Into<String>) -> Self {
        let root_name = root_name.into();
        let root = Bus::new(root_name.clone(), 0.0, None);
        let mut by_name = HashMap::new();
        by_name.insert(root_name, BusId(0));
        Self {
            buses: vec![root],
            by_name,
        }
    }

    /// Build the stock desktop mixer tree: Master -> {Music, Effects, Voice,
    /// Environment}, everything at unity gain.
    pub fn standard() -> Self {
        let mut graph = Self::new("Master");
        for name in ["Music", "Effects", "Voice", "Environment"] {
            // Infallible: fresh graph, unique names, known-good parent
            graph
                .create_bus(name, "Master")
                .expect("standard graph names are unique");
        }
        graph
    }

    /// Add a child bus under an existing parent
    ///
    /// Fails with [`MixerError::DuplicateName`] if `name` is taken and
    /// [`MixerError::UnknownParent`] if `parent_name` does not resolve.
    pub fn create_bus(&mut self, name: impl Into<String>, parent_name: &str) -> Result<BusId> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(MixerError::DuplicateName {
                name,
                kind: "bus",
            });
        }
        let parent = *self
            .by_name
            .get(parent_name)
            .ok_or_else(|| MixerError::UnknownParent {
                name: name.clone(),
                parent: parent_name.to_string(),
            })?;

        let id = BusId(self.buses.len());
        self.buses.push(Bus::new(name.clone(), 0.0, Some(parent)));
        self.by_name.insert(name.clone(), id);
        debug!("created bus '{}' under '{}'", name, parent_name);
        Ok(id)
    }

    /// Root bus id (always index 0)
    pub fn root(&self) -> BusId {
        BusId(0)
    }

    /// Look up a bus by name
    pub fn bus_id(&self, name: &str) -> Option<BusId> {
        self.by_name.get(name).copied()
    }

    pub fn bus(&self, id: BusId) -> &Bus {
        &self.buses[id.0]
    }

    pub fn len(&self) -> usize {
        self.buses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buses.is_empty()
    }

    /// Iterate buses in creation order (root first, parents before children)
    pub fn iter(&self) -> impl Iterator<Item = (BusId, &Bus)> {
        self.buses.iter().enumerate().map(|(i, b)| (BusId(i), b))
    }

    /// Set a bus's direct gain, silently clamped to [-80, +20] dB
    pub fn set_gain_db(&mut self, id: BusId, db: f32) {
        self.buses[id.0].set_gain_db(db);
    }

    pub fn set_muted(&mut self, id: BusId, muted: bool) {
        self.buses[id.0].set_muted(muted);
    }

    pub fn gain_db(&self, id: BusId) -> f32 {
        self.buses[id.0].gain_db()
    }

    pub fn is_muted(&self, id: BusId) -> bool {
        self.buses[id.0].is_muted()
    }

    /// Cumulative mute-aware linear gain of a bus
    ///
    /// The product of every node's linear gain on the path from `id` to the
    /// root, or 0.0 if any node on that path (the bus itself included) is
    /// muted. O(depth), allocation-free.
    pub fn effective_gain_linear(&self, id: BusId) -> f32 {
        let mut gain = 1.0_f32;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let bus = &self.buses[current.0];
            if bus.is_muted() {
                return 0.0;
            }
            gain *= bus.gain_linear();
            cursor = bus.parent();
        }
        gain
    }

    /// Cumulative gain in dB; negative infinity when effectively silent
    pub fn effective_gain_db(&self, id: BusId) -> f32 {
        linear_to_db(self.effective_gain_linear(id))
    }
}
