//! Snapshot Store and Transition Engine
//!
//! Named gain-vector snapshots plus the timed linear interpolation that
//! moves the live parameter state toward one snapshot or a weighted blend
//! of several.
//!
//! Transition arbitration:
//! - Latest request wins. A new transition discards any in-flight job and
//!   captures its start vector from the *current* (possibly mid-interpolation)
//!   parameter values, so superseding never snaps back to old state.
//! - A direct user write to a parameter releases that parameter from the
//!   in-flight job (see [`release_parameter`](SnapshotStore::release_parameter));
//!   interpolation keeps driving the rest.

use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::error::{MixerError, Result};
use crate::graph::level::clamp_db;
use crate::graph::BusGraph;
use crate::mixer::params::ParameterTable;

/// A named, immutable vector of parameter targets in dB
///
/// Values may cover any subset of the exposed parameters; parameters a
/// snapshot does not mention keep their current value when it is applied.
#[derive(Debug, Clone)]
pub struct Snapshot {
    name: String,
    values: BTreeMap<String, f32>,
}

impl Snapshot {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stored parameter targets, ordered by parameter name
    pub fn values(&self) -> &BTreeMap<String, f32> {
        &self.values
    }
}

/// One parameter's interpolation lane inside a transition
#[derive(Debug, Clone)]
struct Lane {
    param: String,
    start_db: f32,
    target_db: f32,
}

/// In-flight interpolation toward a (blended) snapshot target
#[derive(Debug, Clone)]
struct TransitionJob {
    lanes: Vec<Lane>,
    elapsed: f32,
    duration: f32,
}

/// Owns the snapshot set and at most one in-flight transition
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    snapshots: BTreeMap<String, Snapshot>,
    job: Option<TransitionJob>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a snapshot; setup-time only, snapshots are never deleted
    ///
    /// Values are clamped into the valid dB range on insertion. Fails with
    /// [`MixerError::DuplicateName`] if the name is taken.
    pub fn add_snapshot(
        &mut self,
        name: impl Into<String>,
        values: BTreeMap<String, f32>,
    ) -> Result<()> {
        let name = name.into();
        if self.snapshots.contains_key(&name) {
            return Err(MixerError::DuplicateName {
                name,
                kind: "snapshot",
            });
        }
        let values = values.into_iter().map(|(k, v)| (k, clamp_db(v))).collect();
        self.snapshots.insert(name.clone(), Snapshot { name, values });
        Ok(())
    }

    pub fn snapshot(&self, name: &str) -> Option<&Snapshot> {
        self.snapshots.get(name)
    }

    /// Snapshot names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.snapshots.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn is_transitioning(&self) -> bool {
        self.job.is_some()
    }

    /// Begin a timed transition toward a weighted blend of snapshots
    ///
    /// Per parameter, the target is the weighted average over the snapshots
    /// that define that parameter, normalized by the sum of their weights,
    /// so every target stays inside the valid dB range. Weights need not sum
    /// to 1. A non-positive duration applies the targets immediately.
    ///
    /// Fails with [`MixerError::UnknownSnapshot`] for an unregistered name
    /// and [`MixerError::InvalidWeight`] for a negative weight, an all-zero
    /// weight set, or an empty target list.
    pub fn transition_to(
        &mut self,
        targets: &[(&str, f32)],
        duration_secs: f32,
        params: &ParameterTable,
        graph: &mut BusGraph,
    ) -> Result<()> {
        if targets.is_empty() {
            return Err(MixerError::InvalidWeight {
                reason: "no target snapshots given".to_string(),
            });
        }
        for &(name, weight) in targets {
            if !self.snapshots.contains_key(name) {
                return Err(MixerError::UnknownSnapshot {
                    name: name.to_string(),
                });
            }
            if weight < 0.0 {
                return Err(MixerError::InvalidWeight {
                    reason: format!("negative weight {} for snapshot '{}'", weight, name),
                });
            }
        }
        let weight_sum: f32 = targets.iter().map(|&(_, w)| w).sum();
        if weight_sum <= 0.0 {
            return Err(MixerError::InvalidWeight {
                reason: "weights sum to zero".to_string(),
            });
        }

        // Per-parameter weighted sums; only snapshots that define a
        // parameter contribute to its average.
        let mut sums: BTreeMap<&str, (f32, f32)> = BTreeMap::new();
        for &(name, weight) in targets {
            let snapshot = &self.snapshots[name];
            for (param, &value) in snapshot.values() {
                let entry = sums.entry(param.as_str()).or_insert((0.0, 0.0));
                entry.0 += weight * value;
                entry.1 += weight;
            }
        }

        if self.job.take().is_some() {
            debug!("superseding in-flight transition from current values");
        }

        let mut lanes = Vec::with_capacity(sums.len());
        for (param, (weighted, w)) in sums {
            // Zero-weight snapshots may leave a parameter with no
            // contribution; it keeps its current value.
            if w <= 0.0 {
                continue;
            }
            let target_db = weighted / w;
            let Some(start_db) = params.get_db(graph, param) else {
                warn!("snapshot names unknown parameter '{}', skipping", param);
                continue;
            };
            lanes.push(Lane {
                param: param.to_string(),
                start_db,
                target_db,
            });
        }

        if duration_secs <= 0.0 {
            for lane in &lanes {
                params.set_db(graph, &lane.param, lane.target_db);
            }
            info!("applied snapshot targets immediately ({} parameters)", lanes.len());
            return Ok(());
        }

        info!(
            "transition started: {} parameters over {:.3}s",
            lanes.len(),
            duration_secs
        );
        self.job = Some(TransitionJob {
            lanes,
            elapsed: 0.0,
            duration: duration_secs,
        });
        Ok(())
    }

    /// Advance the in-flight transition by `dt` seconds
    ///
    /// Writes interpolated values for every claimed parameter; on reaching
    /// the full duration, writes the exact targets and discards the job.
    pub fn advance(&mut self, dt_secs: f32, params: &ParameterTable, graph: &mut BusGraph) {
        let Some(job) = self.job.as_mut() else {
            return;
        };
        job.elapsed += dt_secs;

        if job.elapsed >= job.duration {
            for lane in &job.lanes {
                params.set_db(graph, &lane.param, lane.target_db);
            }
            debug!("transition finished ({} parameters)", job.lanes.len());
            self.job = None;
            return;
        }

        let t = job.elapsed / job.duration;
        for lane in &job.lanes {
            let value = lane.start_db + (lane.target_db - lane.start_db) * t;
            params.set_db(graph, &lane.param, value);
        }
    }

    /// Drop one parameter from the in-flight job's claim
    ///
    /// Called when a direct write touches the parameter; the job stops
    /// overwriting it while the remaining lanes keep interpolating.
    pub fn release_parameter(&mut self, name: &str) {
        let Some(job) = self.job.as_mut() else {
            return;
        };
        let before = job.lanes.len();
        job.lanes.retain(|lane| lane.param != name);
        if job.lanes.len() != before {
            debug!("released parameter '{}' from transition", name);
            if job.lanes.is_empty() {
                self.job = None;
            }
        }
    }

    /// Discard the in-flight job without writing further values
    pub fn cancel(&mut self) {
        if self.job.take().is_some() {
            info!("transition canceled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fixture() -> (SnapshotStore, ParameterTable, BusGraph) {
        let graph = BusGraph::standard();
        let mut params = ParameterTable::new();
        params.register("MusicVolume", "Music", &graph).unwrap();
        params.register("VoiceVolume", "Voice", &graph).unwrap();

        let mut store = SnapshotStore::new();
        store
            .add_snapshot(
                "Quiet",
                BTreeMap::from([
                    ("MusicVolume".to_string(), -40.0),
                    ("VoiceVolume".to_string(), -20.0),
                ]),
            )
            .unwrap();
        store
            .add_snapshot(
                "Loud",
                BTreeMap::from([
                    ("MusicVolume".to_string(), 0.0),
                    ("VoiceVolume".to_string(), 0.0),
                ]),
            )
            .unwrap();
        store
            .add_snapshot(
                "MusicOnly",
                BTreeMap::from([("MusicVolume".to_string(), -10.0)]),
            )
            .unwrap();
        (store, params, graph)
    }

    #[test]
    fn test_duplicate_snapshot_rejected() {
        let (mut store, _, _) = fixture();
        let err = store.add_snapshot("Quiet", BTreeMap::new()).unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_NAME");
    }

    #[test]
    fn test_snapshot_values_clamped_on_insert() {
        let mut store = SnapshotStore::new();
        store
            .add_snapshot(
                "Extreme",
                BTreeMap::from([("MusicVolume".to_string(), 500.0)]),
            )
            .unwrap();
        assert_eq!(store.snapshot("Extreme").unwrap().values()["MusicVolume"], 20.0);
    }

    #[test]
    fn test_unknown_snapshot_rejected() {
        let (mut store, params, mut graph) = fixture();
        let err = store
            .transition_to(&[("Missing", 1.0)], 1.0, &params, &mut graph)
            .unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_SNAPSHOT");
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let (mut store, params, mut graph) = fixture();

        let err = store
            .transition_to(&[("Quiet", -1.0)], 1.0, &params, &mut graph)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_WEIGHT");

        let err = store
            .transition_to(&[("Quiet", 0.0), ("Loud", 0.0)], 1.0, &params, &mut graph)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_WEIGHT");

        let err = store.transition_to(&[], 1.0, &params, &mut graph).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_WEIGHT");
    }

    #[test]
    fn test_zero_duration_applies_immediately() {
        let (mut store, params, mut graph) = fixture();
        store
            .transition_to(&[("Quiet", 1.0)], 0.0, &params, &mut graph)
            .unwrap();
        assert!(!store.is_transitioning());
        assert_eq!(params.get_db(&graph, "MusicVolume"), Some(-40.0));
        assert_eq!(params.get_db(&graph, "VoiceVolume"), Some(-20.0));
    }

    #[test]
    fn test_midpoint_is_linear() {
        let (mut store, params, mut graph) = fixture();
        params.set_db(&mut graph, "MusicVolume", 0.0);
        store
            .transition_to(&[("Quiet", 1.0)], 2.0, &params, &mut graph)
            .unwrap();

        store.advance(1.0, &params, &mut graph);
        // Halfway from 0 to -40
        assert_relative_eq!(
            params.get_db(&graph, "MusicVolume").unwrap(),
            -20.0,
            epsilon = 1e-4
        );
        assert!(store.is_transitioning());

        store.advance(1.0, &params, &mut graph);
        assert_eq!(params.get_db(&graph, "MusicVolume"), Some(-40.0));
        assert!(!store.is_transitioning());
    }

    #[test]
    fn test_weighted_blend_normalizes() {
        let (mut store, params, mut graph) = fixture();
        // Quiet music = -40, Loud music = 0; weights 1:3 -> -10
        store
            .transition_to(&[("Quiet", 1.0), ("Loud", 3.0)], 0.0, &params, &mut graph)
            .unwrap();
        assert_relative_eq!(
            params.get_db(&graph, "MusicVolume").unwrap(),
            -10.0,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_partial_snapshot_leaves_other_params() {
        let (mut store, params, mut graph) = fixture();
        params.set_db(&mut graph, "VoiceVolume", -5.0);
        store
            .transition_to(&[("MusicOnly", 1.0)], 0.0, &params, &mut graph)
            .unwrap();
        assert_eq!(params.get_db(&graph, "MusicVolume"), Some(-10.0));
        // VoiceVolume not in the snapshot, untouched
        assert_eq!(params.get_db(&graph, "VoiceVolume"), Some(-5.0));
    }

    #[test]
    fn test_blend_skips_undefined_parameters_per_weight() {
        let (mut store, params, mut graph) = fixture();
        // MusicOnly defines no VoiceVolume: Voice target averages over
        // Quiet alone (-20), Music over both: (1*-40 + 1*-10)/2 = -25.
        store
            .transition_to(
                &[("Quiet", 1.0), ("MusicOnly", 1.0)],
                0.0,
                &params,
                &mut graph,
            )
            .unwrap();
        assert_relative_eq!(
            params.get_db(&graph, "MusicVolume").unwrap(),
            -25.0,
            epsilon = 1e-4
        );
        assert_relative_eq!(
            params.get_db(&graph, "VoiceVolume").unwrap(),
            -20.0,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_supersession_starts_from_current_values() {
        let (mut store, params, mut graph) = fixture();
        params.set_db(&mut graph, "MusicVolume", 0.0);

        // T1: 0 -> -40 over 10s; after 5s we are at -20
        store
            .transition_to(&[("Quiet", 1.0)], 10.0, &params, &mut graph)
            .unwrap();
        store.advance(5.0, &params, &mut graph);
        let mid = params.get_db(&graph, "MusicVolume").unwrap();
        assert_relative_eq!(mid, -20.0, epsilon = 1e-4);

        // T2 supersedes toward Loud (0 dB); first instants stay near -20
        store
            .transition_to(&[("Loud", 1.0)], 4.0, &params, &mut graph)
            .unwrap();
        store.advance(1e-3, &params, &mut graph);
        let after = params.get_db(&graph, "MusicVolume").unwrap();
        assert!(
            (after - mid).abs() < 0.02,
            "supersession discontinuity: {} -> {}",
            mid,
            after
        );

        store.advance(4.0, &params, &mut graph);
        assert_eq!(params.get_db(&graph, "MusicVolume"), Some(0.0));
    }

    #[test]
    fn test_release_parameter_keeps_other_lanes() {
        let (mut store, params, mut graph) = fixture();
        params.set_db(&mut graph, "MusicVolume", 0.0);
        params.set_db(&mut graph, "VoiceVolume", 0.0);
        store
            .transition_to(&[("Quiet", 1.0)], 2.0, &params, &mut graph)
            .unwrap();

        store.release_parameter("MusicVolume");
        params.set_db(&mut graph, "MusicVolume", 5.0);

        store.advance(1.0, &params, &mut graph);
        // Released lane no longer overwritten, other lane still driven
        assert_eq!(params.get_db(&graph, "MusicVolume"), Some(5.0));
        assert_relative_eq!(
            params.get_db(&graph, "VoiceVolume").unwrap(),
            -10.0,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_releasing_last_lane_drops_job() {
        let (mut store, params, mut graph) = fixture();
        store
            .transition_to(&[("MusicOnly", 1.0)], 2.0, &params, &mut graph)
            .unwrap();
        assert!(store.is_transitioning());
        store.release_parameter("MusicVolume");
        assert!(!store.is_transitioning());
    }

    #[test]
    fn test_cancel_stops_writing() {
        let (mut store, params, mut graph) = fixture();
        params.set_db(&mut graph, "MusicVolume", 0.0);
        store
            .transition_to(&[("Quiet", 1.0)], 2.0, &params, &mut graph)
            .unwrap();
        store.advance(0.5, &params, &mut graph);
        let at_cancel = params.get_db(&graph, "MusicVolume").unwrap();

        store.cancel();
        assert!(!store.is_transitioning());
        store.advance(10.0, &params, &mut graph);
        assert_eq!(params.get_db(&graph, "MusicVolume"), Some(at_cancel));
    }
}
