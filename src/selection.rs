//! Year-dependent trigger thresholds
//!
//! Run 2 trigger lines were retuned between data-taking years. Rather than
//! branching on the year inside every decision, all thresholds of a year are
//! gathered into one [`YearCuts`] table, which decisions then read from.

use crate::{
    track_mva::{TrackInputCuts, TrackMvaCuts, TrackMvaParams},
    two_track::{TwoTrackComboCuts, TwoTrackInputCuts},
    year::Year,
};

/// Upper bound of the corrected mass window (MeV), effectively unbounded
const MAX_BPVCORRM: crate::numeric::Float = 1e9;

/// Every threshold used by the Hlt1 lines for a given year
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YearCuts {
    /// Hlt1TwoTrackMVA single-track input selection
    pub two_track_input: TwoTrackInputCuts,

    /// Hlt1TwoTrackMVA combination selection
    pub two_track_combo: TwoTrackComboCuts,

    /// Hlt1TrackMVA input selection
    pub track_input: TrackInputCuts,

    /// Hlt1TrackMVA decision
    pub track_mva: TrackMvaCuts,
}
//
impl YearCuts {
    /// Thresholds in use during a given year
    pub fn for_year(year: Year) -> &'static YearCuts {
        match year {
            Year::Y2015 => &CUTS_2015,
            Year::Y2016 => &CUTS_2016,
            Year::Y2017 | Year::Y2018 => &CUTS_2017_2018,
        }
    }
}

/// 2015 combination cuts, which 2017 and 2018 went back to
const COMBO_NOMINAL: TwoTrackComboCuts = TwoTrackComboCuts {
    max_vchi2: 10.,
    bpveta_range: (2., 5.),
    bpvcorrm_range: (1000., MAX_BPVCORRM),
    min_bpvdira: 0.,
    min_mva: 0.95,
};

/// Track input selection shared by 2016 onwards
const TWO_TRACK_INPUT_GHOST_CUT: TwoTrackInputCuts = TwoTrackInputCuts {
    min_pt: 600.,
    min_p: 5000.,
    max_trchi2dof: 2.5,
    max_trghostprob: Some(0.2),
    min_bpvipchi2: 4.,
};

const TRACK_INPUT_GHOST_CUT: TrackInputCuts = TrackInputCuts {
    min_pt: 600.,
    min_p: 5000.,
    max_trchi2dof: 4.,
    max_trghostprob: Some(0.999),
};

const CUTS_2015: YearCuts = YearCuts {
    two_track_input: TwoTrackInputCuts {
        min_pt: 500.,
        min_p: 5000.,
        max_trchi2dof: 2.5,
        max_trghostprob: None,
        min_bpvipchi2: 4.,
    },
    two_track_combo: COMBO_NOMINAL,
    track_input: TrackInputCuts {
        min_pt: 500.,
        min_p: 3000.,
        max_trchi2dof: 4.,
        max_trghostprob: None,
    },
    track_mva: TrackMvaCuts {
        max_trchi2dof: 2.5,
        max_trghostprob: None,
        params: TrackMvaParams {
            p1: 1.0,
            p2: 1.0,
            p3: 1.1,
        },
    },
};

const CUTS_2016: YearCuts = YearCuts {
    two_track_input: TWO_TRACK_INPUT_GHOST_CUT,
    two_track_combo: TwoTrackComboCuts {
        bpvcorrm_range: (100., MAX_BPVCORRM),
        min_mva: 0.97,
        ..COMBO_NOMINAL
    },
    track_input: TRACK_INPUT_GHOST_CUT,
    track_mva: TrackMvaCuts {
        max_trchi2dof: 2.5,
        max_trghostprob: Some(0.2),
        params: TrackMvaParams {
            p1: 1.0,
            p2: 1.0,
            p3: 2.3,
        },
    },
};

const CUTS_2017_2018: YearCuts = YearCuts {
    two_track_input: TWO_TRACK_INPUT_GHOST_CUT,
    two_track_combo: COMBO_NOMINAL,
    track_input: TRACK_INPUT_GHOST_CUT,
    track_mva: TrackMvaCuts {
        max_trchi2dof: 2.5,
        max_trghostprob: Some(0.2),
        params: TrackMvaParams {
            p1: 1.0,
            p2: 1.0,
            p3: 1.1,
        },
    },
};
