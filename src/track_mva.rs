//! Hlt1TrackMVA emulation
//!
//! Single-track line: a track fires it when it is either very hard and
//! displaced, or when its impact parameter significance lies above a
//! PT-dependent hyperbolic boundary.

use crate::{numeric::Float, record::TrackRecord, selection::YearCuts, year::Year};

use prefix_num_ops::real::*;

/// PT above which the hyperbolic boundary is replaced by a flat IPχ² cut (MeV)
const MAX_PT: Float = 25000.;

/// IPχ² cut applied to tracks above MAX_PT
const HIGH_PT_MIN_BPVIPCHI2: Float = 7.4;

/// PT below which no track fires the line (MeV)
const MIN_PT: Float = 1000.;

/// Input requirements of Hlt1TrackMVA
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackInputCuts {
    /// Minimum transverse momentum (MeV)
    pub min_pt: Float,

    /// Minimum momentum (MeV)
    pub min_p: Float,

    /// Maximum track fit χ²/ndof
    pub max_trchi2dof: Float,

    /// Maximum ghost probability, if any
    pub max_trghostprob: Option<Float>,
}
//
impl TrackInputCuts {
    /// Decide whether a track is considered by the line at all
    pub fn accepts(&self, track: &TrackRecord) -> bool {
        track.pt > self.min_pt
            && track.p > self.min_p
            && track.trchi2dof < self.max_trchi2dof
            && self
                .max_trghostprob
                .map_or(true, |max| track.trghostprob < max)
    }
}

/// Parameters of the hyperbolic IPχ² boundary
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackMvaParams {
    /// Strength of the hyperbolic term (GeV²)
    pub p1: Float,

    /// Position of the hyperbola's pole (GeV)
    pub p2: Float,

    /// Slope of the linear term
    pub p3: Float,
}
//
impl TrackMvaParams {
    /// Truth that a track lies above the boundary
    ///
    /// The boundary reads ln(IPχ²) > p1/(PT - p2)² + p3·(MAX_PT - PT)/MAX_PT
    /// + ln(7.4), with PT in GeV in the hyperbolic term.
    ///
    pub fn above_boundary(&self, pt: Float, bpvipchi2: Float) -> bool {
        let pt_gev = pt / 1000.;
        let hyperbola = self.p1 / ((pt_gev - self.p2) * (pt_gev - self.p2));
        let linear = (self.p3 / MAX_PT) * (MAX_PT - pt);
        ln(bpvipchi2) > hyperbola + linear + ln(HIGH_PT_MIN_BPVIPCHI2)
    }
}

/// Decision requirements of Hlt1TrackMVA
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackMvaCuts {
    /// Maximum track fit χ²/ndof
    pub max_trchi2dof: Float,

    /// Maximum ghost probability, if any
    pub max_trghostprob: Option<Float>,

    /// IPχ² boundary of intermediate-PT tracks
    pub params: TrackMvaParams,
}
//
impl TrackMvaCuts {
    /// Decide whether a track fires the line
    pub fn accepts(&self, track: &TrackRecord) -> bool {
        // Dummy entries, and a logarithm that would not be defined
        if track.trchi2dof <= 0. || track.bpvipchi2 <= 0. {
            return false;
        }
        if track.trchi2dof >= self.max_trchi2dof
            || self
                .max_trghostprob
                .map_or(false, |max| track.trghostprob >= max)
        {
            return false;
        }

        (track.pt > MAX_PT && track.bpvipchi2 > HIGH_PT_MIN_BPVIPCHI2)
            || (track.pt > MIN_PT
                && track.pt < MAX_PT
                && self.params.above_boundary(track.pt, track.bpvipchi2))
    }
}

/// Input selection of Hlt1TrackMVA, for a raw year
pub fn hlt1_track_input_dec(track: &TrackRecord, year: i32) -> bool {
    Year::recognize(year).map_or(false, |year| YearCuts::for_year(year).track_input.accepts(track))
}

/// Decision of Hlt1TrackMVA on a track that passed the input selection, for a
/// raw year
pub fn hlt1_track_mva_dec(track: &TrackRecord, year: i32) -> bool {
    Year::recognize(year).map_or(false, |year| YearCuts::for_year(year).track_mva.accepts(track))
}

/// Full Hlt1TrackMVA emulation on one track
pub fn hlt1_track_mva(track: &TrackRecord, year: i32) -> bool {
    Year::recognize(year).map_or(false, |year| track_fires(track, YearCuts::for_year(year)))
}

/// Full Hlt1TrackMVA emulation on a set of tracks: fires if any track does
pub fn hlt1_track_mva_any(tracks: &[TrackRecord], year: i32) -> bool {
    any_track_fires(tracks, year, |_| true)
}

/// Full Hlt1TrackMVA emulation on a set of tracks, only considering tracks
/// flagged in `track_mask`
///
/// Tracks beyond the end of the mask are treated as unflagged, as in
/// [`TwoTrackMatcher::fires_masked`](crate::two_track::TwoTrackMatcher::fires_masked).
///
pub fn hlt1_track_mva_any_masked(
    tracks: &[TrackRecord],
    track_mask: &[bool],
    year: i32,
) -> bool {
    any_track_fires(tracks, year, |idx| {
        track_mask.get(idx).copied().unwrap_or(false)
    })
}

/// Shared implementation of the candidate-level decisions
fn any_track_fires(
    tracks: &[TrackRecord],
    year: i32,
    track_flagged: impl Fn(usize) -> bool,
) -> bool {
    let Some(year) = Year::recognize(year) else {
        return false;
    };
    let cuts = YearCuts::for_year(year);
    tracks
        .iter()
        .enumerate()
        .any(|(idx, track)| track_flagged(idx) && track_fires(track, cuts))
}

/// Input selection followed by decision
fn track_fires(track: &TrackRecord, cuts: &YearCuts) -> bool {
    cuts.track_input.accepts(track) && cuts.track_mva.accepts(track)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{two_track::tests::good_track, year::tests::count_warnings};

    fn track(pt: Float, bpvipchi2: Float) -> TrackRecord {
        TrackRecord {
            bpvipchi2,
            ..good_track(pt)
        }
    }

    #[test]
    fn hard_displaced_track() {
        for year in 2015..=2018 {
            assert!(hlt1_track_mva(&track(30000., 8.), year));
            assert!(!hlt1_track_mva(&track(30000., 7.), year));
        }
    }

    #[test]
    fn soft_track_never_fires() {
        for year in 2015..=2018 {
            assert!(!hlt1_track_mva(&track(900., 1e6), year));
        }
    }

    #[test]
    fn boundary_at_intermediate_pt() {
        // At 3 GeV with the 2017 parameters, the boundary is
        // 1/4 + 1.1·22/25 + ln(7.4) ≈ ln(7.4) + 1.218, i.e. IPχ² ≈ 25.0
        assert!(hlt1_track_mva(&track(3000., 26.), 2017));
        assert!(!hlt1_track_mva(&track(3000., 24.), 2017));

        // 2016 uses a steeper linear term
        assert!(!hlt1_track_mva(&track(3000., 26.), 2016));
        assert!(hlt1_track_mva(&track(3000., 200.), 2016));
    }

    #[test]
    fn input_selection_by_year() {
        let soft = TrackRecord {
            p: 4000.,
            ..good_track(550.)
        };
        assert!(hlt1_track_input_dec(&soft, 2015));
        assert!(!hlt1_track_input_dec(&soft, 2016));

        let ghost = TrackRecord {
            trghostprob: 0.9995,
            ..good_track(2000.)
        };
        assert!(hlt1_track_input_dec(&ghost, 2015));
        assert!(!hlt1_track_input_dec(&ghost, 2018));
    }

    #[test]
    fn decision_quality_cuts() {
        let ghost = TrackRecord {
            trghostprob: 0.3,
            ..track(30000., 100.)
        };
        assert!(hlt1_track_mva_dec(&ghost, 2015));
        assert!(!hlt1_track_mva_dec(&ghost, 2017));

        let bad_fit = TrackRecord {
            trchi2dof: 3.,
            ..track(30000., 100.)
        };
        assert!(hlt1_track_input_dec(&bad_fit, 2017));
        assert!(!hlt1_track_mva_dec(&bad_fit, 2017));
        assert!(!hlt1_track_mva_dec(&track(30000., 0.), 2017));
    }

    #[test]
    fn candidate_fires_on_any_track() {
        let tracks = [track(900., 1e6), track(30000., 8.)];
        assert!(hlt1_track_mva_any(&tracks, 2018));
        assert!(!hlt1_track_mva_any(&tracks[..1], 2018));
        assert!(!hlt1_track_mva_any(&[], 2018));
    }

    #[test]
    fn unflagged_tracks_do_not_fire() {
        let tracks = [track(30000., 8.), track(900., 1e6)];
        assert!(hlt1_track_mva_any_masked(&tracks, &[true, false], 2017));
        assert!(!hlt1_track_mva_any_masked(&tracks, &[false, true], 2017));
        assert!(!hlt1_track_mva_any_masked(&tracks, &[], 2017));
    }

    #[test]
    fn unknown_year_is_reported_once() {
        let tracks = [track(30000., 8.), track(30000., 9.)];
        let (fired, warnings) = count_warnings(|| hlt1_track_mva_any(&tracks, 2019));
        assert!(!fired);
        assert_eq!(warnings, 1);
    }
}
