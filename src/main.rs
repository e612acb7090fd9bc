//! Command-line driver of the trigger emulation
//!
//! Usage: `trigger_emu [configuration file]`, the configuration file being
//! `emu.cfg` by default. Log verbosity is controlled by `RUST_LOG`.

use trigger_emu::{input, output, scheduling, Configuration, Result};

use eyre::WrapErr;
use tracing_subscriber::EnvFilter;

use std::time::Instant;

/// Configuration file used when none is specified on the command line
const DEFAULT_CONFIG: &str = "emu.cfg";

/// This will act as our main function, with suitable error handling
fn main() -> Result<()> {
    // Diagnostics go to stderr so that they do not mix with the results
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // ### CONFIGURATION READOUT ###

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_owned());
    let cfg = Configuration::load(&config_path).wrap_err("Failed to load the configuration")?;

    // ### CANDIDATE READOUT ###

    let candidates = input::read_candidates(&cfg.input).wrap_err("Failed to load the candidates")?;
    tracing::info!(
        num_candidates = candidates.len(),
        input = %cfg.input.display(),
        "Candidates loaded"
    );

    // ### EMULATION ###

    // We start the clock after I/O to avoid IO-induced timing fluctuations
    let saved_time = Instant::now();
    let summary = scheduling::run_emulation(&candidates, &cfg.settings(), cfg.batch_size);
    let elapsed_time = saved_time.elapsed();
    tracing::info!(elapsed = ?elapsed_time, "Emulation done");

    // ### RESULTS DISPLAY AND STORAGE ###

    output::dump_results(&cfg, &summary, elapsed_time).wrap_err("Failed to output the results")?;

    // ...and we're done
    Ok(())
}
