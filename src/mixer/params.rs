//! Exposed Parameter Table
//!
//! Maps external parameter names to bus gain slots. Names are case-sensitive
//! and matched exactly ("Music" and "music" are distinct) so caller typos
//! surface as a `false` return rather than silently hitting the wrong bus.
//!
//! The name set is fixed after construction and each name is resolved to a
//! stable [`BusId`] once, at build time, keeping per-frame `set`/`get` calls
//! allocation-free and exception-free.

use std::collections::HashMap;

use crate::error::{MixerError, Result};
use crate::graph::{BusGraph, BusId};

/// Immutable name -> bus binding table
#[derive(Debug, Clone, Default)]
pub struct ParameterTable {
    bindings: HashMap<String, BusId>,
    // Registration order, for stable display and serialization
    order: Vec<String>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a parameter name to a bus; setup-time only
    ///
    /// Fails with [`MixerError::DuplicateName`] on a repeated parameter name
    /// and [`MixerError::UnknownBus`] if `bus_name` does not exist in `graph`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        bus_name: &str,
        graph: &BusGraph,
    ) -> Result<()> {
        let name = name.into();
        if self.bindings.contains_key(&name) {
            return Err(MixerError::DuplicateName {
                name,
                kind: "parameter",
            });
        }
        let bus = graph.bus_id(bus_name).ok_or_else(|| MixerError::UnknownBus {
            name: bus_name.to_string(),
        })?;
        self.bindings.insert(name.clone(), bus);
        self.order.push(name);
        Ok(())
    }

    /// Set a parameter's bound bus gain in dB
    ///
    /// Returns false (a no-op) for an unregistered name. The value is
    /// silently clamped to the valid dB range by the graph.
    pub fn set_db(&self, graph: &mut BusGraph, name: &str, db: f32) -> bool {
        match self.bindings.get(name) {
            Some(&bus) => {
                graph.set_gain_db(bus, db);
                true
            }
            None => false,
        }
    }

    /// Read a parameter's current dB value; `None` for an unknown name
    pub fn get_db(&self, graph: &BusGraph, name: &str) -> Option<f32> {
        self.bindings.get(name).map(|&bus| graph.gain_db(bus))
    }

    /// Bus a parameter is bound to
    pub fn bus_of(&self, name: &str) -> Option<BusId> {
        self.bindings.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Parameter names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}
