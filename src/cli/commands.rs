//! CLI Command Handlers

use std::path::Path;

use log::info;

use crate::config::MixerConfig;
use crate::error::Result;
use crate::mixer::Mixer;

/// Write the standard five-bus mixer config to `path`
pub fn init(path: &Path) -> Result<()> {
    let config = MixerConfig::standard();
    config.to_file(path)?;
    println!("Wrote standard mixer config to {}", path.display());
    Ok(())
}

/// Validate a config file by constructing the mixer from it
pub fn check(path: &Path) -> Result<()> {
    let config = MixerConfig::from_file(path)?;
    let mixer = Mixer::from_config(&config)?;
    println!(
        "OK: {} buses, {} parameters, {} snapshots",
        mixer.graph().len(),
        mixer.params().len(),
        mixer.snapshots().len()
    );
    Ok(())
}

/// Print the bus tree with direct and effective gains, then parameters and
/// snapshot names
pub fn show(path: &Path) -> Result<()> {
    let config = MixerConfig::from_file(path)?;
    let mixer = Mixer::from_config(&config)?;
    let graph = mixer.graph();

    println!("Buses:");
    for (id, bus) in graph.iter() {
        let parent = bus
            .parent()
            .map(|p| graph.bus(p).name().to_string())
            .unwrap_or_else(|| "-".to_string());
        let mute = if bus.is_muted() { " [muted]" } else { "" };
        println!(
            "  {:<14} parent={:<10} gain={:>7.2} dB  effective={:>9.2} dB{}",
            bus.name(),
            parent,
            bus.gain_db(),
            graph.effective_gain_db(id),
            mute
        );
    }

    println!("Parameters:");
    for name in mixer.params().names() {
        let value = mixer.get_float(name).unwrap_or(f32::NAN);
        println!("  {:<22} {:>7.2} dB", name, value);
    }

    println!("Snapshots:");
    for name in mixer.snapshots().names() {
        let count = mixer
            .snapshots()
            .snapshot(name)
            .map(|s| s.values().len())
            .unwrap_or(0);
        println!("  {:<14} ({} parameters)", name, count);
    }

    println!("Suspend: {}", mixer.suspend().state());
    Ok(())
}

/// Drive a transition to `snapshot` under a fixed tick rate, printing the
/// parameter values per step and the final suspend state
pub fn simulate(path: &Path, snapshot: &str, seconds: f32, rate: u32) -> Result<()> {
    let config = MixerConfig::from_file(path)?;
    let mut mixer = Mixer::from_config(&config)?;

    info!("simulating '{}' over {}s at {} Hz", snapshot, seconds, rate);
    mixer.transition_to(&[(snapshot, 1.0)], seconds)?;

    let dt = 1.0 / rate.max(1) as f32;
    let mut elapsed = 0.0_f32;
    loop {
        mixer.tick(dt);
        elapsed += dt;

        print!("t={:>6.3}s", elapsed);
        for name in mixer.params().names() {
            if let Some(value) = mixer.get_float(name) {
                print!("  {}={:>7.2}", name, value);
            }
        }
        println!();

        if !mixer.is_transitioning() {
            break;
        }
    }

    println!(
        "Finished after {:.3}s, suspend state: {}",
        elapsed,
        mixer.suspend().state()
    );
    Ok(())
}
