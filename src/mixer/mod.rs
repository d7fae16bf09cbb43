//! Mixer Façade
//!
//! Owns the bus graph, the exposed parameter table, the snapshot store, and
//! the suspend controller, and drives them under the host's periodic tick.
//!
//! # Tick order
//!
//! Within one `tick` the components advance synchronously in a fixed order:
//! snapshot interpolation writes first, then the suspend controller samples
//! Master's effective level, so a transition's freshly written values are
//! visible to the suspend check in the same tick. Everything is
//! single-threaded and cooperative; a multi-threaded host must serialize
//! all mutation behind its own lock.

pub mod params;
pub mod snapshot;
pub mod suspend;

pub use params::ParameterTable;
pub use snapshot::{Snapshot, SnapshotStore};
pub use suspend::{SuspendController, SuspendState};

use std::collections::BTreeMap;

use crate::error::{MixerError, Result};
use crate::graph::BusGraph;

/// The complete mixer: bus tree, parameters, snapshots, suspend detection
#[derive(Debug, Clone)]
pub struct Mixer {
    graph: BusGraph,
    params: ParameterTable,
    snapshots: SnapshotStore,
    suspend: SuspendController,
}

impl Mixer {
    /// Wrap a prebuilt bus graph with empty parameter and snapshot sets
    pub fn new(graph: BusGraph) -> Self {
        Self {
            graph,
            params: ParameterTable::new(),
            snapshots: SnapshotStore::new(),
            suspend: SuspendController::default(),
        }
    }

    /// Replace the suspend controller (setup-time, for a custom debounce)
    pub fn set_suspend_controller(&mut self, suspend: SuspendController) {
        self.suspend = suspend;
    }

    // ========================================================================
    // Setup surface (fallible, pre-runtime)
    // ========================================================================

    /// Expose a parameter bound to a bus's gain slot
    pub fn register_parameter(&mut self, name: impl Into<String>, bus_name: &str) -> Result<()> {
        self.params.register(name, bus_name, &self.graph)
    }

    /// Store a named snapshot
    ///
    /// Every value must name a registered parameter; unknown names fail with
    /// [`MixerError::UnknownParameter`] so a bad configuration is caught at
    /// setup instead of silently ignored at transition time.
    pub fn add_snapshot(
        &mut self,
        name: impl Into<String>,
        values: BTreeMap<String, f32>,
    ) -> Result<()> {
        for param in values.keys() {
            if !self.params.contains(param) {
                return Err(MixerError::UnknownParameter {
                    name: param.clone(),
                });
            }
        }
        self.snapshots.add_snapshot(name, values)
    }

    // ========================================================================
    // Runtime surface (hot path, never errors except transition requests)
    // ========================================================================

    /// Set an exposed parameter in dB; false for an unknown name
    ///
    /// This is the direct, user-driven write: it releases the parameter from
    /// any in-flight transition so interpolation stops overwriting it.
    pub fn set_float(&mut self, name: &str, db: f32) -> bool {
        if !self.params.contains(name) {
            return false;
        }
        self.snapshots.release_parameter(name);
        self.params.set_db(&mut self.graph, name, db)
    }

    /// Read an exposed parameter's current dB value
    pub fn get_float(&self, name: &str) -> Option<f32> {
        self.params.get_db(&self.graph, name)
    }

    /// Begin a timed transition toward a weighted blend of snapshots
    pub fn transition_to(&mut self, targets: &[(&str, f32)], seconds: f32) -> Result<()> {
        self.snapshots
            .transition_to(targets, seconds, &self.params, &mut self.graph)
    }

    /// Discard the in-flight transition without writing further values
    pub fn cancel_transition(&mut self) {
        self.snapshots.cancel();
    }

    /// Advance one host tick of `dt_secs`
    pub fn tick(&mut self, dt_secs: f32) {
        self.snapshots
            .advance(dt_secs, &self.params, &mut self.graph);
        let master_db = self.graph.effective_gain_db(self.graph.root());
        self.suspend.sample(master_db, dt_secs);
    }

    /// Whether the host may pause mixing work
    pub fn is_suspended(&self) -> bool {
        self.suspend.is_suspended()
    }

    pub fn is_transitioning(&self) -> bool {
        self.snapshots.is_transitioning()
    }

    // ========================================================================
    // Component access
    // ========================================================================

    pub fn graph(&self) -> &BusGraph {
        &self.graph
    }

    /// Mutable graph access for setup (adding buses, mute flags)
    pub fn graph_mut(&mut self) -> &mut BusGraph {
        &mut self.graph
    }

    pub fn params(&self) -> &ParameterTable {
        &self.params
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    pub fn suspend(&self) -> &SuspendController {
        &self.suspend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn standard_mixer() -> Mixer {
        let mut mixer = Mixer::new(BusGraph::standard());
        for (param, bus) in [
            ("MasterVolume", "Master"),
            ("MusicVolume", "Music"),
            ("VoiceVolume", "Voice"),
        ] {
            mixer.register_parameter(param, bus).unwrap();
        }
        mixer
            .add_snapshot(
                "Paused",
                BTreeMap::from([
                    ("MusicVolume".to_string(), -30.0),
                    ("VoiceVolume".to_string(), -80.0),
                ]),
            )
            .unwrap();
        mixer
    }

    #[test]
    fn test_set_get_round_trip() {
        let mut mixer = standard_mixer();
        assert!(mixer.set_float("MusicVolume", -10.0));
        assert_eq!(mixer.get_float("MusicVolume"), Some(-10.0));
        assert!(!mixer.set_float("nonexistent", -10.0));
        assert_eq!(mixer.get_float("nonexistent"), None);
    }

    #[test]
    fn test_snapshot_must_name_known_parameters() {
        let mut mixer = standard_mixer();
        let err = mixer
            .add_snapshot(
                "Broken",
                BTreeMap::from([("UiVolume".to_string(), 0.0)]),
            )
            .unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_PARAMETER");
    }

    #[test]
    fn test_tick_drives_transition() {
        let mut mixer = standard_mixer();
        mixer.transition_to(&[("Paused", 1.0)], 1.0).unwrap();

        mixer.tick(0.5);
        assert_relative_eq!(
            mixer.get_float("MusicVolume").unwrap(),
            -15.0,
            epsilon = 1e-4
        );
        mixer.tick(0.5);
        assert_eq!(mixer.get_float("MusicVolume"), Some(-30.0));
        assert!(!mixer.is_transitioning());
    }

    #[test]
    fn test_direct_write_survives_transition_ticks() {
        let mut mixer = standard_mixer();
        mixer.transition_to(&[("Paused", 1.0)], 2.0).unwrap();
        mixer.tick(0.5);

        assert!(mixer.set_float("MusicVolume", 5.0));
        mixer.tick(0.5);
        // Direct write released the lane; interpolation no longer overwrites it
        assert_eq!(mixer.get_float("MusicVolume"), Some(5.0));
        // The other lane is still being driven toward -80
        assert!(mixer.get_float("VoiceVolume").unwrap() < -20.0);
    }

    #[test]
    fn test_suspend_sees_same_tick_transition_writes() {
        let mut mixer = Mixer::new(BusGraph::standard());
        mixer.set_suspend_controller(SuspendController::new(0.0));
        mixer.register_parameter("MasterVolume", "Master").unwrap();
        mixer
            .add_snapshot(
                "Silent",
                BTreeMap::from([("MasterVolume".to_string(), -80.0)]),
            )
            .unwrap();

        mixer.transition_to(&[("Silent", 1.0)], 0.0).unwrap();
        // Zero-duration transition applied at request; first tick samples -80
        mixer.tick(0.016);
        assert!(mixer.is_suspended());

        assert!(mixer.set_float("MasterVolume", 0.0));
        mixer.tick(0.016);
        assert!(!mixer.is_suspended());
    }

    #[test]
    fn test_master_mute_suspends() {
        let mut mixer = standard_mixer();
        mixer.set_suspend_controller(SuspendController::new(0.0));
        let root = mixer.graph().root();
        mixer.graph_mut().set_muted(root, true);
        mixer.tick(0.016);
        assert!(mixer.is_suspended());
    }

    #[test]
    fn test_cancel_transition() {
        let mut mixer = standard_mixer();
        mixer.transition_to(&[("Paused", 1.0)], 2.0).unwrap();
        mixer.tick(0.5);
        let frozen = mixer.get_float("MusicVolume").unwrap();
        mixer.cancel_transition();
        mixer.tick(5.0);
        assert_eq!(mixer.get_float("MusicVolume"), Some(frozen));
    }
}
