//! Trigger emulation: Run 2 LHCb Hlt1 decisions from offline candidates
//!
//!
//! # Introduction (for the physicist)
//!
//! Efficiency studies on simulated samples need to know whether the first
//! software trigger level (Hlt1) would have kept each reconstructed decay
//! candidate. This program re-evaluates the Run 2 (2015-2018) Hlt1 lines that
//! matter for multi-body hadronic decays from offline quantities stored in
//! analysis ntuples:
//!
//! * Hlt1TwoTrackMVA, which fires when any pair of final-state tracks passes
//!   the input track cuts and forms a two-track vertex that passes the
//!   combination cuts,
//! * Hlt1TrackMVA, which fires on a single displaced high-PT track,
//! * the global event cuts, which veto events with too busy detectors.
//!
//! Thresholds depend on the data-taking year.
//!
//!
//! # Introduction (for the computer guy)
//!
//! Ntuples store one set of two-track vertex variables per pair of daughters,
//! but do not record which pair each vertex came from. The emulator recovers
//! this association by comparing the scalar sum of the transverse momenta of
//! a track pair with the SUMPT of each combination, within a tolerance. The
//! [`TwoTrackMatcher`] encapsulates that association.
//!
//! The program flow is purely batch:
//!
//! * read in the configuration and the candidates,
//! * evaluate every candidate, possibly in parallel,
//! * tally decisions per line and compute efficiencies,
//! * display and store the results.

#![warn(missing_docs)]

pub mod candidate;
pub mod config;
pub mod gec;
pub mod input;
pub mod kinematics;
pub mod numeric;
pub mod output;
pub mod pairs;
pub mod record;
pub mod scheduling;
pub mod selection;
pub mod tally;
pub mod track_mva;
pub mod two_track;
pub mod year;

pub use crate::{
    candidate::{Candidate, Decision, EmulationSettings},
    config::Configuration,
    record::{ComboRecord, TrackRecord},
    two_track::{hlt1_two_track_mva, two_track_combo_dec, two_track_input_dec, TwoTrackMatcher},
    year::Year,
};

/// We'll use eyre's type-erased result type throughout the application
pub type Result<T> = eyre::Result<T>;
