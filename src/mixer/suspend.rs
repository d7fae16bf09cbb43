//! Suspend State Machine
//!
//! Watches the Master bus's effective output level and flags when the host
//! may pause mixing work. Going quiet is debounced so a single-tick dip
//! through silence (e.g. mid-transition) does not flap the state; coming
//! back is committed on the very first audible sample so audio resumes
//! without a glitch.

use std::fmt;

use log::debug;

use crate::graph::level::MIN_GAIN_DB;

/// Effective level at or below this counts as silence
pub const SILENCE_THRESHOLD_DB: f32 = MIN_GAIN_DB;

// Absorbs dB->linear->dB rounding so a bus set to exactly -80 dB reads as
// silent even when the round trip lands a hair above the threshold.
const THRESHOLD_TOLERANCE_DB: f32 = 1e-3;

/// Default time the level must stay silent before suspending
pub const DEFAULT_DEBOUNCE_SECS: f32 = 0.1;

/// Suspend states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuspendState {
    /// Mixing work is required (default state)
    #[default]
    Active,
    /// Output has been silent for the debounce window; host may pause
    Suspended,
}

impl fmt::Display for SuspendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuspendState::Active => write!(f, "Active"),
            SuspendState::Suspended => write!(f, "Suspended"),
        }
    }
}

/// Tracks sustained silence on the Master bus
#[derive(Debug, Clone)]
pub struct SuspendController {
    state: SuspendState,
    debounce_secs: f32,
    quiet_secs: f32,
}

impl Default for SuspendController {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_SECS)
    }
}

impl SuspendController {
    /// Create a controller with the given debounce window in seconds
    ///
    /// A window of 0 suspends on the first silent sample.
    pub fn new(debounce_secs: f32) -> Self {
        Self {
            state: SuspendState::Active,
            debounce_secs: debounce_secs.max(0.0),
            quiet_secs: 0.0,
        }
    }

    pub fn state(&self) -> SuspendState {
        self.state
    }

    pub fn is_suspended(&self) -> bool {
        self.state == SuspendState::Suspended
    }

    pub fn debounce_secs(&self) -> f32 {
        self.debounce_secs
    }

    /// Feed one sample of Master's effective level
    ///
    /// `master_db` may be negative infinity (fully silent). `dt_secs` is the
    /// time since the previous sample and accumulates toward the debounce
    /// window while the level stays at or below the silence threshold.
    pub fn sample(&mut self, master_db: f32, dt_secs: f32) {
        if master_db > SILENCE_THRESHOLD_DB + THRESHOLD_TOLERANCE_DB {
            // Audible: resume immediately, no debounce on the way up
            self.quiet_secs = 0.0;
            if self.state == SuspendState::Suspended {
                self.state = SuspendState::Active;
                debug!("resumed: master at {:.1} dB", master_db);
            }
            return;
        }

        self.quiet_secs += dt_secs;
        if self.state == SuspendState::Active && self.quiet_secs >= self.debounce_secs {
            self.state = SuspendState::Suspended;
            debug!("suspended after {:.3}s of silence", self.quiet_secs);
        }
    }
}
