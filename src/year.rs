//! Data-taking years supported by the Run 2 trigger emulation

use std::fmt::{self, Display};

/// Run 2 data-taking year
///
/// Each year selects one set of trigger thresholds. Analysis ntuples carry
/// the year as a plain integer, so conversion goes through
/// [`Year::recognize`], which reports values that do not map to a Run 2 year.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Year {
    /// First Run 2 year, looser track requirements
    Y2015,
    /// Relaxed corrected-mass cut, tighter MVA cut
    Y2016,
    /// Shares 2015's combination thresholds
    Y2017,
    /// Same conditions as 2017
    Y2018,
}
//
impl Year {
    /// Every supported year, in chronological order
    pub const ALL: [Year; 4] = [Year::Y2015, Year::Y2016, Year::Y2017, Year::Y2018];

    /// Map a raw year onto a supported one, without any reporting
    pub fn from_raw(year: i32) -> Option<Self> {
        match year {
            2015 => Some(Year::Y2015),
            2016 => Some(Year::Y2016),
            2017 => Some(Year::Y2017),
            2018 => Some(Year::Y2018),
            _ => None,
        }
    }

    /// Map a raw year onto a supported one, reporting unknown values
    ///
    /// An unrecognized year is a configuration mistake rather than a property
    /// of the data, so it is reported once through the diagnostic channel.
    /// Callers are expected to fail closed when this returns `None`.
    ///
    pub fn recognize(year: i32) -> Option<Self> {
        let result = Self::from_raw(year);
        if result.is_none() {
            tracing::warn!(year, "Year: {} not recognized.", year);
        }
        result
    }

    /// Raw integer form of this year
    pub fn as_raw(self) -> i32 {
        match self {
            Year::Y2015 => 2015,
            Year::Y2016 => 2016,
            Year::Y2017 => 2017,
            Year::Y2018 => 2018,
        }
    }
}

impl Display for Year {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}", self.as_raw())
    }
}
