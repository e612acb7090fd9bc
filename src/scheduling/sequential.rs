//! Sequential back-end of the emulation

use crate::{candidate::Candidate, tally::TriggerTally};

/// Emulate the trigger on candidates in sequential mode
///
/// We use batched logic even in sequential mode, so that the batch size has
/// the same meaning in sequential and multi-threaded runs.
///
pub fn run_emulation_impl(
    candidates: &[Candidate],
    batch_size: usize,
    process_batch: impl Send + Sync + Fn(&[Candidate]) -> TriggerTally,
) -> TriggerTally {
    // Some double-checking cannot hurt...
    assert!(batch_size > 0, "Batches must contain at least one candidate");

    // Integrate batches of candidates in order
    candidates
        .chunks(batch_size)
        .fold(TriggerTally::new(), |mut tally, batch| {
            tally.merge(process_batch(batch));
            tally
        })
}
