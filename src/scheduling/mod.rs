//! This module takes care of scheduling the emulation work, encapsulating use
//! of multiple threads and anything else that will come in the future

#[cfg(not(feature = "multi-threading"))]
mod sequential;
#[cfg(feature = "multi-threading")]
mod multi_threading;

use crate::{
    candidate::{Candidate, EmulationSettings},
    tally::{TriggerSummary, TriggerTally},
};

/// Emulate the trigger on a contiguous batch of candidates
fn process_batch(candidates: &[Candidate], settings: &EmulationSettings) -> TriggerTally {
    let mut tally = TriggerTally::new();
    for candidate in candidates {
        tally.integrate(candidate.decide(settings));
    }
    tally
}

/// Run the emulation in the manner that was configured at build time.
///
/// Candidates are grouped in batches of `batch_size`, each batch producing
/// its own tally. Tallies are merged in candidate order, so sequential and
/// parallel runs produce identical results.
///
/// Returns the finalized emulation results
///
pub fn run_emulation(
    candidates: &[Candidate],
    settings: &EmulationSettings,
    batch_size: usize,
) -> TriggerSummary {
    // Check that the user is being reasonable (should have already been checked
    // at configuration time, but bugs can happen...)
    assert!(batch_size > 0, "Batches must contain at least one candidate");
    tracing::debug!(
        num_candidates = candidates.len(),
        batch_size,
        "Starting trigger emulation"
    );

    let process = |batch: &[Candidate]| process_batch(batch, settings);

    // Integrate emulation results...
    let tally = {
        // ...in sequential mode
        #[cfg(not(feature = "multi-threading"))]
        {
            sequential::run_emulation_impl(candidates, batch_size, process)
        }

        // ...in multi-threaded mode
        #[cfg(feature = "multi-threading")]
        {
            multi_threading::run_emulation_impl(candidates, batch_size, process)
        }
    };
    debug_assert_eq!(tally.num_candidates(), candidates.len());

    // Finalize the results
    tally.finalize()
}
