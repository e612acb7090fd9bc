//! Hlt1TwoTrackMVA emulation
//!
//! The line fires when two tracks of the candidate pass a loose single-track
//! selection and the vertex they form passes a combination selection which
//! includes a cut on a discriminant response.
//!
//! Ntuples only provide combination variables per daughter pair (e.g.
//! `B0_SUMPT_COMB_1_2`), without saying which tracks the pair was built
//! from. We recover the association by comparing the combination's SUMPT to
//! the scalar PT sum of each track pair.

use crate::{
    kinematics::transverse_momentum,
    numeric::Float,
    pairs::{index_pairs, IndexPair},
    record::{ComboRecord, TrackRecord},
    selection::YearCuts,
    year::Year,
    Result,
};

use eyre::ensure;
use prefix_num_ops::real::*;

/// Default SUMPT matching tolerance (MeV)
pub const DEFAULT_SUM_PT_TOLERANCE: Float = 1.;

/// Single-track requirements of Hlt1TwoTrackMVA
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwoTrackInputCuts {
    /// Minimum transverse momentum (MeV)
    pub min_pt: Float,

    /// Minimum momentum (MeV)
    pub min_p: Float,

    /// Maximum track fit χ²/ndof
    pub max_trchi2dof: Float,

    /// Maximum ghost probability, if any
    pub max_trghostprob: Option<Float>,

    /// Minimum impact parameter χ²
    pub min_bpvipchi2: Float,
}
//
impl TwoTrackInputCuts {
    /// Decide whether a track can take part in a two-track combination
    pub fn accepts(&self, track: &TrackRecord) -> bool {
        // Tracks without a valid fit are dummy ntuple entries
        if track.trchi2dof <= 0. {
            return false;
        }

        track.pt > self.min_pt
            && track.p > self.min_p
            && track.trchi2dof < self.max_trchi2dof
            && self
                .max_trghostprob
                .map_or(true, |max| track.trghostprob < max)
            && track.bpvipchi2 > self.min_bpvipchi2
    }
}

/// Combination requirements of Hlt1TwoTrackMVA
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwoTrackComboCuts {
    /// Maximum vertex fit χ²
    pub max_vchi2: Float,

    /// Open pseudorapidity window
    pub bpveta_range: (Float, Float),

    /// Open corrected mass window (MeV)
    pub bpvcorrm_range: (Float, Float),

    /// Minimum direction angle cosine
    pub min_bpvdira: Float,

    /// Minimum discriminant response
    pub min_mva: Float,
}
//
impl TwoTrackComboCuts {
    /// Decide whether a two-track vertex passes the line's selection
    pub fn accepts(&self, combo: &ComboRecord) -> bool {
        // Dummy values are used as placeholders for combinations that could
        // not be built, they must not reach the discriminant cut.
        if combo.vdchi2 <= 0. || combo.sumpt <= 0. {
            return false;
        }

        let within = |x: Float, (low, high): (Float, Float)| x > low && x < high;
        combo.vchi2 < self.max_vchi2
            && within(combo.bpveta, self.bpveta_range)
            && within(combo.bpvcorrm, self.bpvcorrm_range)
            && combo.bpvdira > self.min_bpvdira
            && combo.mva > self.min_mva
    }
}

/// Single-track selection of Hlt1TwoTrackMVA, for a raw year
///
/// Unrecognized years are reported and fail the selection.
///
pub fn two_track_input_dec(track: &TrackRecord, year: i32) -> bool {
    Year::recognize(year)
        .map_or(false, |year| YearCuts::for_year(year).two_track_input.accepts(track))
}

/// Combination selection of Hlt1TwoTrackMVA, for a raw year
///
/// Unrecognized years are reported and fail the selection.
///
pub fn two_track_combo_dec(combo: &ComboRecord, year: i32) -> bool {
    Year::recognize(year)
        .map_or(false, |year| YearCuts::for_year(year).two_track_combo.accepts(combo))
}

/// Emulate Hlt1TwoTrackMVA with the default matching tolerance
pub fn hlt1_two_track_mva(tracks: &[TrackRecord], combos: &[ComboRecord], year: i32) -> bool {
    TwoTrackMatcher::default().fires(tracks, combos, year)
}

/// Associates track pairs with combination records and applies the
/// Hlt1TwoTrackMVA selections
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwoTrackMatcher {
    /// Maximal |SUMPT - (PT₁ + PT₂)| for a combination to be attributed to a
    /// track pair (MeV)
    sum_pt_tolerance: Float,
}
//
impl Default for TwoTrackMatcher {
    fn default() -> Self {
        Self {
            sum_pt_tolerance: DEFAULT_SUM_PT_TOLERANCE,
        }
    }
}
//
impl TwoTrackMatcher {
    /// Set up a matcher with a given SUMPT tolerance (MeV)
    ///
    /// The tolerance must be a finite non-negative number. Too large a
    /// tolerance can attribute a combination to a track pair it was not built
    /// from.
    ///
    pub fn new(sum_pt_tolerance: Float) -> Result<Self> {
        ensure!(
            sum_pt_tolerance.is_finite() && sum_pt_tolerance >= 0.,
            "SUMPT tolerance must be a non-negative number of MeV, got {}",
            sum_pt_tolerance
        );
        Ok(Self { sum_pt_tolerance })
    }

    /// SUMPT tolerance in use (MeV)
    pub fn sum_pt_tolerance(&self) -> Float {
        self.sum_pt_tolerance
    }

    /// Decide whether the line fires for a candidate
    pub fn fires(&self, tracks: &[TrackRecord], combos: &[ComboRecord], year: i32) -> bool {
        self.fires_impl(tracks, combos, year, |_| true)
    }

    /// Decide whether the line fires, only considering tracks flagged in
    /// `track_mask`
    ///
    /// The mask carries externally computed per-track decisions (e.g. an
    /// online reconstruction emulation). Tracks beyond the end of the mask are
    /// treated as unflagged.
    ///
    pub fn fires_masked(
        &self,
        tracks: &[TrackRecord],
        track_mask: &[bool],
        combos: &[ComboRecord],
        year: i32,
    ) -> bool {
        self.fires_impl(tracks, combos, year, |idx| {
            track_mask.get(idx).copied().unwrap_or(false)
        })
    }

    /// Shared implementation of fires() and fires_masked()
    fn fires_impl(
        &self,
        tracks: &[TrackRecord],
        combos: &[ComboRecord],
        year: i32,
        track_flagged: impl Fn(usize) -> bool,
    ) -> bool {
        // Resolve the year once, so that a bad year is reported only once
        let Some(year) = Year::recognize(year) else {
            return false;
        };
        let cuts = YearCuts::for_year(year);

        index_pairs(tracks.len())
            .filter(|pair| {
                pair.indices().into_iter().all(|idx| {
                    track_flagged(idx) && cuts.two_track_input.accepts(&tracks[idx])
                })
            })
            .any(|pair| {
                self.matching_combos(tracks, pair, combos)
                    .any(|combo| cuts.two_track_combo.accepts(combo))
            })
    }

    /// Iterate over the combinations which could have been built from a
    /// given track pair, in input order
    ///
    /// A pair that points past the end of `tracks` matches nothing.
    ///
    pub fn matching_combos<'a>(
        &self,
        tracks: &[TrackRecord],
        pair: IndexPair,
        combos: &'a [ComboRecord],
    ) -> impl Iterator<Item = &'a ComboRecord> + 'a {
        let sum_pt = match (tracks.get(pair.first), tracks.get(pair.second)) {
            (Some(track1), Some(track2)) => {
                let sum_pt = track1.pt + track2.pt;
                tracing::trace!(
                    first = pair.first,
                    second = pair.second,
                    sum_pt,
                    apt = transverse_momentum(track1.px + track2.px, track1.py + track2.py),
                    "Looking for two-track combinations"
                );
                Some(sum_pt)
            }
            _ => None,
        };
        let tolerance = self.sum_pt_tolerance;
        combos.iter().filter(move |combo| {
            sum_pt.map_or(false, |sum_pt| abs(combo.sumpt - sum_pt) <= tolerance)
        })
    }
}
