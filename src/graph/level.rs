//! Decibel/Linear Conversion
//!
//! Shared level math for the whole crate, plus the UI-to-dB helpers a host
//! typically calls before `set_float`.

/// Minimum bus gain in dB (-80 dB = effectively silent)
pub const MIN_GAIN_DB: f32 = -80.0;

/// Maximum bus gain in dB (+20 dB)
pub const MAX_GAIN_DB: f32 = 20.0;

/// Linear amplitudes at or below this are treated as silence
pub const SILENCE_EPSILON: f32 = 1e-5;

/// Convert decibels to linear amplitude
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert linear amplitude to decibels
///
/// Amplitudes at or below [`SILENCE_EPSILON`] map to negative infinity so
/// callers comparing against a silence threshold never see a huge-but-finite
/// artifact of `log10` near zero.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= SILENCE_EPSILON {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

/// Clamp a dB value into the valid bus gain range
#[inline]
pub fn clamp_db(db: f32) -> f32 {
    db.clamp(MIN_GAIN_DB, MAX_GAIN_DB)
}

/// Map a bounded 0.0..=1.0 UI scale (e.g. a slider) to the dB range
///
/// `1.0` maps to unity (0 dB); values at or near zero map to the -80 dB
/// floor. Stateless; the host calls this before `set_float`.
pub fn ui_to_db(x: f32) -> f32 {
    clamp_db(20.0 * x.max(SILENCE_EPSILON).log10())
}

/// Map a 0..=200 integer fader scale to the dB range
///
/// 100 is unity gain, 200 is roughly +6 dB, 0 is the silence floor.
pub fn fader_to_db(x: u32) -> f32 {
    ui_to_db(x as f32 / 100.0)
}
