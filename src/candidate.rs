//! This module defines the analysis candidates which trigger emulation is
//! applied to, and the decisions it produces

use crate::{
    gec::{hlt1_global_pass, EventCounters},
    record::{ComboRecord, TrackRecord},
    track_mva::{hlt1_track_mva_any, hlt1_track_mva_any_masked},
    two_track::TwoTrackMatcher,
    year::Year,
};

use std::fmt::{self, Display};

/// Maximal number of final-state tracks of a candidate
///
/// Ntuples store two-track combination variables for every pair of up to six
/// daughters, hence this limit.
///
pub const MAX_TRACKS: usize = 6;

/// Knobs of the emulation which are not tied to a data-taking year
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmulationSettings {
    /// Track pair to combination association
    pub matcher: TwoTrackMatcher,

    /// Whether per-track flags from the input gate Hlt1TwoTrackMVA
    pub use_track_mask: bool,
}
//
impl Default for EmulationSettings {
    fn default() -> Self {
        Self {
            matcher: TwoTrackMatcher::default(),
            use_track_mask: false,
        }
    }
}

/// One decay candidate, as read from an analysis ntuple
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// Data-taking year, as stored in the ntuple
    pub year: i32,

    /// Final-state charged tracks
    pub tracks: Vec<TrackRecord>,

    /// Externally computed per-track flags, one per track
    pub track_mask: Vec<bool>,

    /// Two-track vertex combinations
    pub combos: Vec<ComboRecord>,

    /// Event occupancy, if known
    pub counters: Option<EventCounters>,
}
//
impl Candidate {
    /// Emulate every Hlt1 decision for this candidate
    pub fn decide(&self, settings: &EmulationSettings) -> Decision {
        // Report a bad year once per candidate rather than once per line
        let Some(year) = Year::recognize(self.year) else {
            return Decision::default();
        };

        tracing::trace!(
            %year,
            num_tracks = self.tracks.len(),
            num_combos = self.combos.len(),
            "Emulating candidate"
        );

        // Per-track flags describe which tracks exist online, so they gate
        // both lines
        let (two_track_mva, track_mva) = if settings.use_track_mask {
            (
                settings
                    .matcher
                    .fires_masked(&self.tracks, &self.track_mask, &self.combos, self.year),
                hlt1_track_mva_any_masked(&self.tracks, &self.track_mask, self.year),
            )
        } else {
            (
                settings.matcher.fires(&self.tracks, &self.combos, self.year),
                hlt1_track_mva_any(&self.tracks, self.year),
            )
        };
        Decision {
            two_track_mva,
            track_mva,
            global_pass: self.counters.as_ref().map(hlt1_global_pass),
        }
    }
}

/// Emulated trigger decisions of a candidate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decision {
    /// Hlt1TwoTrackMVA fired
    pub two_track_mva: bool,

    /// Hlt1TrackMVA fired on at least one track
    pub track_mva: bool,

    /// Global event requirements, unknown without occupancy counters
    pub global_pass: Option<bool>,
}
//
impl Decision {
    /// Overall Hlt1 TOS decision
    ///
    /// Either line must fire, and the global event cut must not have failed.
    /// Candidates without occupancy information are given the benefit of
    /// the doubt.
    ///
    pub fn hlt1_tos(&self) -> bool {
        (self.two_track_mva || self.track_mva) && self.global_pass != Some(false)
    }
}

impl Display for Decision {
    /// One column per decision, 1 for pass, 0 for fail, - for unknown
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |b: bool| if b { '1' } else { '0' };
        write!(
            fmt,
            "{}\t{}\t{}\t{}",
            flag(self.two_track_mva),
            flag(self.track_mva),
            self.global_pass.map_or('-', flag),
            flag(self.hlt1_tos()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        two_track::tests::{good_combo, good_track},
        year::tests::count_warnings,
    };

    fn candidate(year: i32) -> Candidate {
        Candidate {
            year,
            tracks: vec![good_track(700.), good_track(800.), good_track(900.)],
            track_mask: vec![true, true, false],
            combos: vec![good_combo(1500.), good_combo(1600.), good_combo(1700.)],
            counters: None,
        }
    }

    #[test]
    fn two_track_without_track_mva() {
        let decision = candidate(2017).decide(&EmulationSettings::default());
        assert!(decision.two_track_mva);
        // All tracks are below the Hlt1TrackMVA PT threshold
        assert!(!decision.track_mva);
        assert_eq!(decision.global_pass, None);
        assert!(decision.hlt1_tos());
        assert_eq!(decision.to_string(), "1\t0\t-\t1");
    }

    #[test]
    fn track_mask_is_optional() {
        let mut cand = candidate(2017);
        cand.combos = vec![good_combo(1600.)];
        let masked = EmulationSettings {
            use_track_mask: true,
            ..EmulationSettings::default()
        };
        assert!(cand.decide(&EmulationSettings::default()).two_track_mva);
        assert!(!cand.decide(&masked).two_track_mva);
    }

    #[test]
    fn track_mask_gates_track_mva() {
        let cand = Candidate {
            year: 2017,
            tracks: vec![good_track(30000.), good_track(700.)],
            track_mask: vec![false, true],
            combos: Vec::new(),
            counters: None,
        };
        let masked = EmulationSettings {
            use_track_mask: true,
            ..EmulationSettings::default()
        };
        assert!(cand.decide(&EmulationSettings::default()).track_mva);

        let decision = cand.decide(&masked);
        assert!(!decision.two_track_mva);
        assert!(!decision.track_mva);
        assert!(!decision.hlt1_tos());
    }

    #[test]
    fn busy_event_vetoes() {
        let mut cand = candidate(2016);
        cand.counters = Some(EventCounters {
            n_velo_clusters: 7000.,
            n_it_clusters: 400.,
            n_ot_clusters: 5000.,
            n_tt_hits: 12.,
        });
        let decision = cand.decide(&EmulationSettings::default());
        assert!(decision.two_track_mva);
        assert_eq!(decision.global_pass, Some(false));
        assert!(!decision.hlt1_tos());
    }

    #[test]
    fn bad_year_reported_once_per_candidate() {
        let (decision, warnings) =
            count_warnings(|| candidate(2010).decide(&EmulationSettings::default()));
        assert_eq!(decision, Decision::default());
        assert_eq!(warnings, 1);
    }
}
