//! Multi-threaded back-end of the emulation

use crate::{candidate::Candidate, tally::TriggerTally};

use std::sync::Mutex;

/// Emulate the trigger on candidates in multi-threaded mode
///
/// Each batch of candidates is processed by its own task, and task results
/// are merged in batch order, so that per-candidate decisions come out in the
/// same order as the input.
///
pub fn run_emulation_impl(
    candidates: &[Candidate],
    batch_size: usize,
    process_batch: impl Send + Sync + Fn(&[Candidate]) -> TriggerTally,
) -> TriggerTally {
    // Some double-checking cannot hurt...
    assert!(batch_size > 0, "Batches must contain at least one candidate");

    // We know in advance how many batches of candidates we will process
    let num_batches = candidates.len() / batch_size
        + if candidates.len() % batch_size == 0 {
            0
        } else {
            1
        };
    if num_batches == 0 {
        return TriggerTally::new();
    }

    // The results of parallel tasks will be aggregated in batch order
    let accumulator = OrderedAccumulator::new(num_batches);

    // This function is a synchronization scope: it will only return
    // once all inner tasks have been executed
    rayon::scope(|scope| {
        // For each batch of candidates...
        for (batch_id, batch) in candidates.chunks(batch_size).enumerate() {
            // Spawn a task which is responsible for processing it
            let accumulator_ref = &accumulator;
            let process_batch_ref = &process_batch;
            scope.spawn(move |_| {
                let result = process_batch_ref(batch);
                accumulator_ref.set_task_result(batch_id, result);
            });
        }
    });

    // Extract the results from the accumulator
    accumulator.get_merged_result()
}

/// Order-preserving results accumulation mechanism
struct OrderedAccumulator {
    /// Storage for the intermediary results of parallel tasks
    results: Box<[Mutex<Option<TriggerTally>>]>,
}
//
impl OrderedAccumulator {
    /// Set up results storage for N parallel tasks
    fn new(num_tasks: usize) -> Self {
        assert!(num_tasks > 0, "There should be at least one task");
        Self {
            results: (0..num_tasks)
                .map(|_| Mutex::new(None))
                .collect::<Vec<_>>()
                .into_boxed_slice(),
        }
    }

    /// Integrate the results of the n-th task
    fn set_task_result(&self, task_id: usize, result: TriggerTally) {
        let mut lock = self.results[task_id]
            .lock()
            .expect("Mutex data should be valid");
        assert!(lock.is_none(), "Tasks should not report results twice");
        *lock = Some(result);
    }

    /// Aggregate the results in batch order
    fn get_merged_result(self) -> TriggerTally {
        self.results
            .into_vec()
            .into_iter()
            .map(|entry| {
                entry
                    .into_inner()
                    .expect("Mutex data should be valid")
                    .expect("Result should be ready")
            })
            .fold(TriggerTally::new(), |mut r1, r2| {
                r1.merge(r2);
                r1
            })
    }
}
