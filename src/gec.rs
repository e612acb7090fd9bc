//! Hlt1 global event cut
//!
//! Busy events are rejected before any Hlt1 line runs, based on detector
//! occupancy. The cut does not depend on the data-taking year.

use crate::numeric::Float;

/// Minimal number of TT hits for the online reconstruction to find tracks
const MIN_TT_HITS: Float = 3.;

/// Detector occupancy of an event
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EventCounters {
    /// Number of VELO clusters
    pub n_velo_clusters: Float,

    /// Number of Inner Tracker clusters
    pub n_it_clusters: Float,

    /// Number of Outer Tracker clusters
    pub n_ot_clusters: Float,

    /// Number of TT hits of the candidate's tracks
    pub n_tt_hits: Float,
}

/// Occupancy window of each sub-detector, bounds excluded
const VELO_WINDOW: (Float, Float) = (50., 6000.);
const IT_WINDOW: (Float, Float) = (50., 3000.);
const OT_WINDOW: (Float, Float) = (50., 15000.);

/// Global event cut on detector occupancy
pub fn hlt1_gec(counters: &EventCounters) -> bool {
    let within = |x: Float, (low, high): (Float, Float)| x > low && x < high;
    within(counters.n_velo_clusters, VELO_WINDOW)
        && within(counters.n_it_clusters, IT_WINDOW)
        && within(counters.n_ot_clusters, OT_WINDOW)
}

/// Global Hlt1 requirements: enough TT hits and a quiet enough event
///
/// Online reconstruction was also slightly less efficient than offline. That
/// inefficiency is a random correction and is left to the caller.
///
pub fn hlt1_global_pass(counters: &EventCounters) -> bool {
    counters.n_tt_hits >= MIN_TT_HITS && hlt1_gec(counters)
}
