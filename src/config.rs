//! Persisted Mixer Configuration
//!
//! The serializable description of the whole mixer: buses (name, parent,
//! initial gain, mute), exposed parameter bindings, named snapshots, and the
//! suspend debounce. Loaded once at startup to construct a [`Mixer`]; a
//! built mixer exports back to the same format, and the round trip
//! reproduces identical effective gains.
//!
//! Buses are listed parents-first (the first entry is the root); this is the
//! order [`BusGraph::iter`] produces, so export order is always loadable.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{MixerError, Result};
use crate::graph::BusGraph;
use crate::mixer::{Mixer, SuspendController};

/// One bus in the persisted tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusSpec {
    pub name: String,
    /// Parent bus name; only the root (first entry) omits it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Initial direct gain in dB
    #[serde(default)]
    pub gain_db: f32,
    #[serde(default)]
    pub muted: bool,
}

/// One exposed parameter binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    /// Name of the bus this parameter drives
    pub bus: String,
}

/// One named snapshot: a partial map of parameter -> dB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSpec {
    pub name: String,
    pub values: BTreeMap<String, f32>,
}

/// Suspend controller settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspendSpec {
    /// Seconds the Master level must stay silent before suspending
    pub debounce_secs: f32,
}

impl Default for SuspendSpec {
    fn default() -> Self {
        Self {
            debounce_secs: crate::mixer::suspend::DEFAULT_DEBOUNCE_SECS,
        }
    }
}

/// Complete persisted mixer description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixerConfig {
    pub buses: Vec<BusSpec>,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    #[serde(default)]
    pub snapshots: Vec<SnapshotSpec>,
    #[serde(default)]
    pub suspend: SuspendSpec,
}

impl MixerConfig {
    /// The stock desktop mixer this crate ships as a starting point:
    /// Master -> {Music, Effects, Voice, Environment}, one Volume parameter
    /// per bus, and a few everyday snapshots.
    pub fn standard() -> Self {
        let buses = std::iter::once(BusSpec {
            name: "Master".to_string(),
            parent: None,
            gain_db: 0.0,
            muted: false,
        })
        .chain(
            ["Music", "Effects", "Voice", "Environment"]
                .into_iter()
                .map(|name| BusSpec {
                    name: name.to_string(),
                    parent: Some("Master".to_string()),
                    gain_db: 0.0,
                    muted: false,
                }),
        )
        .collect();

        let parameters = ["Master", "Music", "Effects", "Voice", "Environment"]
            .into_iter()
            .map(|bus| ParameterSpec {
                name: format!("{}Volume", bus),
                bus: bus.to_string(),
            })
            .collect();

        // Alphabetical, matching export order, so a standard config compares
        // equal to its own load/export round trip.
        let snapshots = vec![
            SnapshotSpec {
                name: "Default".to_string(),
                values: ["MusicVolume", "EffectsVolume", "VoiceVolume", "EnvironmentVolume"]
                    .into_iter()
                    .map(|p| (p.to_string(), 0.0))
                    .collect(),
            },
            SnapshotSpec {
                name: "Dialogue".to_string(),
                values: BTreeMap::from([
                    ("MusicVolume".to_string(), -18.0),
                    ("EnvironmentVolume".to_string(), -12.0),
                ]),
            },
            SnapshotSpec {
                name: "Paused".to_string(),
                values: BTreeMap::from([
                    ("MusicVolume".to_string(), -15.0),
                    ("EffectsVolume".to_string(), -80.0),
                    ("VoiceVolume".to_string(), -80.0),
                    ("EnvironmentVolume".to_string(), -80.0),
                ]),
            },
        ];

        Self {
            buses,
            parameters,
            snapshots,
            suspend: SuspendSpec::default(),
        }
    }

    /// Load a config from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| MixerError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: MixerConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Write the config to a JSON file, pretty-printed
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| MixerError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }
}

impl Mixer {
    /// Construct a mixer from a persisted description
    ///
    /// Buses must be listed parents-first with the root as the first entry.
    /// Every structural error in the taxonomy surfaces here; after a
    /// successful load the runtime surface cannot fail structurally.
    pub fn from_config(config: &MixerConfig) -> Result<Self> {
        let mut specs = config.buses.iter();
        let root = specs.next().ok_or(MixerError::NoRootBus)?;

        let mut graph = BusGraph::new(root.name.clone());
        graph.set_gain_db(graph.root(), root.gain_db);
        graph.set_muted(graph.root(), root.muted);

        for spec in specs {
            let parent = spec.parent.as_deref().ok_or_else(|| MixerError::UnknownParent {
                name: spec.name.clone(),
                parent: "(none)".to_string(),
            })?;
            let id = graph.create_bus(spec.name.clone(), parent)?;
            graph.set_gain_db(id, spec.gain_db);
            graph.set_muted(id, spec.muted);
        }

        let mut mixer = Mixer::new(graph);
        for spec in &config.parameters {
            mixer.register_parameter(spec.name.clone(), &spec.bus)?;
        }
        for spec in &config.snapshots {
            mixer.add_snapshot(spec.name.clone(), spec.values.clone())?;
        }
        mixer.set_suspend_controller(SuspendController::new(config.suspend.debounce_secs));

        info!(
            "mixer loaded: {} buses, {} parameters, {} snapshots",
            mixer.graph().len(),
            mixer.params().len(),
            mixer.snapshots().len()
        );
        Ok(mixer)
    }

    /// Export the current state back to the persisted format
    pub fn to_config(&self) -> MixerConfig {
        let graph = self.graph();
        let buses = graph
            .iter()
            .map(|(_, bus)| BusSpec {
                name: bus.name().to_string(),
                parent: bus.parent().map(|p| graph.bus(p).name().to_string()),
                gain_db: bus.gain_db(),
                muted: bus.is_muted(),
            })
            .collect();

        let parameters = self
            .params()
            .names()
            .map(|name| ParameterSpec {
                name: name.to_string(),
                // Bindings are resolved at load, so the bus always exists
                bus: graph
                    .bus(self.params().bus_of(name).expect("registered parameter"))
                    .name()
                    .to_string(),
            })
            .collect();

        let snapshots = self
            .snapshots()
            .names()
            .map(|name| {
                let snapshot = self.snapshots().snapshot(name).expect("listed snapshot");
                SnapshotSpec {
                    name: name.to_string(),
                    values: snapshot.values().clone(),
                }
            })
            .collect();

        MixerConfig {
            buses,
            parameters,
            snapshots,
            suspend: SuspendSpec {
                debounce_secs: self.suspend().debounce_secs(),
            },
        }
    }
}
