//! This module accumulates trigger decisions across candidates and computes
//! the final per-line efficiencies

use crate::{candidate::Decision, numeric::Float};

use nalgebra::SVector;
use num_traits::Zero;
use prefix_num_ops::real::*;

/// Number of emulated decisions which are tallied
pub const NUM_LINES: usize = 4;

/// Storage for per-line data
pub type LineVector<T> = SVector<T, NUM_LINES>;

/// Index of Hlt1TwoTrackMVA
pub const TWO_TRACK_MVA: usize = 0;

/// Index of Hlt1TrackMVA
pub const TRACK_MVA: usize = 1;

/// Index of the global event requirements
pub const GLOBAL: usize = 2;

/// Index of the overall Hlt1 TOS decision
pub const HLT1_TOS: usize = 3;

/// Human-readable line names, by index
pub const LINE_NAMES: [&str; NUM_LINES] = [
    "Hlt1TwoTrackMVA",
    "Hlt1TrackMVA",
    "Hlt1Global",
    "Hlt1 TOS",
];

/// Accumulates the decisions of a contiguous range of candidates
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerTally {
    /// Decisions of every candidate, in input order
    decisions: Vec<Decision>,

    /// Number of candidates that fired each line
    passed: LineVector<usize>,

    /// Number of candidates each line could be evaluated on
    evaluated: LineVector<usize>,
}
//
impl Default for TriggerTally {
    fn default() -> Self {
        Self::new()
    }
}
//
impl TriggerTally {
    /// Prepare for decision accumulation
    pub fn new() -> Self {
        Self {
            decisions: Vec::new(),
            passed: LineVector::zeros(),
            evaluated: LineVector::zeros(),
        }
    }

    /// Integrate the decisions of the next candidate
    pub fn integrate(&mut self, decision: Decision) {
        let fired = [
            Some(decision.two_track_mva),
            Some(decision.track_mva),
            decision.global_pass,
            Some(decision.hlt1_tos()),
        ];
        for (line, outcome) in fired.into_iter().enumerate() {
            if let Some(passed) = outcome {
                self.evaluated[line] += 1;
                self.passed[line] += usize::from(passed);
            }
        }
        self.decisions.push(decision);
    }

    /// Integrate decisions of the candidates that follow ours
    ///
    /// Tallies must be merged in candidate order for per-candidate decisions
    /// to line up with the input.
    ///
    pub fn merge(&mut self, other: TriggerTally) {
        self.decisions.extend(other.decisions);
        self.passed += other.passed;
        self.evaluated += other.evaluated;
    }

    /// Number of integrated candidates
    pub fn num_candidates(&self) -> usize {
        self.decisions.len()
    }

    /// Turn the accumulated decisions into final results
    pub fn finalize(self) -> TriggerSummary {
        let efficiencies = LineVector::from_fn(|line, _| {
            Efficiency::new(self.passed[line], self.evaluated[line])
        });
        TriggerSummary {
            decisions: self.decisions,
            efficiencies,
        }
    }
}

/// Fraction of candidates passing a line, with its binomial uncertainty
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Efficiency {
    /// Candidates which fired the line
    pub passed: usize,

    /// Candidates the line was evaluated on
    pub total: usize,
}
//
impl Efficiency {
    /// Record a pass count out of a total
    pub fn new(passed: usize, total: usize) -> Self {
        assert!(passed <= total, "Cannot pass more candidates than evaluated");
        Self { passed, total }
    }

    /// Central value, zero when nothing was evaluated
    pub fn value(&self) -> Float {
        if self.total == 0 {
            return Float::zero();
        }
        self.passed as Float / self.total as Float
    }

    /// Binomial standard deviation of the central value
    pub fn uncertainty(&self) -> Float {
        if self.total == 0 {
            return Float::zero();
        }
        let eff = self.value();
        sqrt(eff * (1. - eff) / self.total as Float)
    }
}

/// Final results of an emulation run
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerSummary {
    /// Decisions of every candidate, in input order
    pub decisions: Vec<Decision>,

    /// Efficiency of each line
    pub efficiencies: LineVector<Efficiency>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision(two_track_mva: bool, track_mva: bool, global_pass: Option<bool>) -> Decision {
        Decision {
            two_track_mva,
            track_mva,
            global_pass,
        }
    }

    #[test]
    fn counts_per_line() {
        let mut tally = TriggerTally::new();
        tally.integrate(decision(true, false, None));
        tally.integrate(decision(true, true, Some(false)));
        tally.integrate(decision(false, false, Some(true)));
        tally.integrate(decision(false, true, Some(true)));
        assert_eq!(tally.num_candidates(), 4);

        let summary = tally.finalize();
        let effs = &summary.efficiencies;
        assert_eq!(effs[TWO_TRACK_MVA], Efficiency::new(2, 4));
        assert_eq!(effs[TRACK_MVA], Efficiency::new(2, 4));
        assert_eq!(effs[GLOBAL], Efficiency::new(2, 3));
        assert_eq!(effs[HLT1_TOS], Efficiency::new(2, 4));
        assert_eq!(summary.decisions[1], decision(true, true, Some(false)));
    }

    #[test]
    fn merge_keeps_candidate_order() {
        let mut first = TriggerTally::new();
        first.integrate(decision(true, false, None));
        let mut second = TriggerTally::new();
        second.integrate(decision(false, true, None));
        second.integrate(decision(false, false, None));
        first.merge(second);

        let summary = first.finalize();
        assert_eq!(summary.decisions.len(), 3);
        assert!(summary.decisions[0].two_track_mva);
        assert!(summary.decisions[1].track_mva);
        assert_eq!(summary.efficiencies[HLT1_TOS], Efficiency::new(2, 3));
        assert_eq!(summary.efficiencies[GLOBAL].total, 0);
    }

    #[test]
    fn efficiency_values() {
        assert_eq!(Efficiency::new(0, 0).value(), 0.);
        assert_eq!(Efficiency::new(0, 0).uncertainty(), 0.);
        assert_eq!(Efficiency::new(1, 4).value(), 0.25);
        let expected: Float = (0.25 * 0.75 / 4.0 as Float).sqrt();
        assert!((Efficiency::new(1, 4).uncertainty() - expected).abs() < 1e-12);
        assert_eq!(Efficiency::new(4, 4).uncertainty(), 0.);
    }
}
