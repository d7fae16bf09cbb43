//! Busmix - Embeddable Decibel-Domain Bus Mixer
//!
//! Busmix owns a small tree of named gain buses (Master -> Music, Effects,
//! Voice, Environment in the stock layout) and exposes it to a host through
//! four surfaces:
//!
//! 1. Named parameters - case-sensitive `set_float`/`get_float` bound to bus
//!    gain slots, exception-free for per-frame code paths
//! 2. Snapshots - stored gain vectors with timed, weighted-blend transitions
//! 3. Suspend detection - flags sustained silence on the Master bus so the
//!    host can skip mixing work
//! 4. A serializable configuration describing the whole mixer
//!
//! # Architecture
//!
//! Everything advances synchronously under the host's periodic tick, in the
//! fixed order snapshot-advance then suspend-sample, so interpolated values
//! are visible to the suspend check in the tick that writes them.

pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod mixer;

pub use config::MixerConfig;
pub use error::{MixerError, Result};
pub use graph::{Bus, BusGraph, BusId};
pub use mixer::{Mixer, SuspendState};
