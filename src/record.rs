//! This module defines the per-track and per-combination variables which the
//! trigger emulation consumes
//!
//! Analysis ntuples expose these variables under their LoKi functor names
//! (`PT`, `TRCHI2DOF`, `BPVCORRM`...). Records can be built directly from
//! their fields, or from `(name, value)` pairs through the variable
//! identifier enums, which map each functor name to the field it fills.

use crate::{numeric::Float, Result};

use eyre::{bail, format_err, WrapErr};
use num_traits::Zero;

use std::{fmt, str::FromStr};

/// Variables of a reconstructed charged track
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackVar {
    /// Transverse momentum (MeV)
    Pt,
    /// Total momentum (MeV)
    P,
    /// Track fit χ² per degree of freedom
    TrChi2Dof,
    /// Impact parameter χ² with respect to the best primary vertex
    BpvIpChi2,
    /// Ghost (fake track) probability
    TrGhostProb,
    /// Momentum x component (MeV)
    Px,
    /// Momentum y component (MeV)
    Py,
}
//
impl TrackVar {
    /// All track variables, in declaration order
    pub const ALL: [TrackVar; 7] = [
        TrackVar::Pt,
        TrackVar::P,
        TrackVar::TrChi2Dof,
        TrackVar::BpvIpChi2,
        TrackVar::TrGhostProb,
        TrackVar::Px,
        TrackVar::Py,
    ];

    /// Functor name of this variable
    pub fn name(self) -> &'static str {
        match self {
            TrackVar::Pt => "PT",
            TrackVar::P => "P",
            TrackVar::TrChi2Dof => "TRCHI2DOF",
            TrackVar::BpvIpChi2 => "BPVIPCHI2",
            TrackVar::TrGhostProb => "TRGHOSTPROB",
            TrackVar::Px => "PX",
            TrackVar::Py => "PY",
        }
    }
}

/// Variables of a two-track vertex combination
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComboVar {
    /// Scalar sum of the two tracks' transverse momenta (MeV)
    SumPt,
    /// Vertex distance χ²
    VdChi2,
    /// Distance of closest approach between the tracks (mm)
    Doca,
    /// Vertex fit χ²
    VChi2,
    /// Pseudorapidity relative to the best primary vertex
    BpvEta,
    /// Corrected mass relative to the best primary vertex (MeV)
    BpvCorrM,
    /// Direction angle cosine relative to the best primary vertex
    BpvDira,
    /// Response of the Hlt1TwoTrackMVA discriminant
    Mva,
}
//
impl ComboVar {
    /// All combination variables, in declaration order
    pub const ALL: [ComboVar; 8] = [
        ComboVar::SumPt,
        ComboVar::VdChi2,
        ComboVar::Doca,
        ComboVar::VChi2,
        ComboVar::BpvEta,
        ComboVar::BpvCorrM,
        ComboVar::BpvDira,
        ComboVar::Mva,
    ];

    /// Functor name of this variable
    pub fn name(self) -> &'static str {
        match self {
            ComboVar::SumPt => "SUMPT",
            ComboVar::VdChi2 => "VDCHI2",
            ComboVar::Doca => "DOCA",
            ComboVar::VChi2 => "VCHI2",
            ComboVar::BpvEta => "BPVETA",
            ComboVar::BpvCorrM => "BPVCORRM",
            ComboVar::BpvDira => "BPVDIRA",
            ComboVar::Mva => "MVA",
        }
    }

    /// Truth that a record cannot be built without this variable
    ///
    /// DOCA only feeds the vector-sum PT flavour of the combination cut,
    /// which ntuples produced for the scalar-sum flavour may lack.
    ///
    pub fn is_required(self) -> bool {
        self != ComboVar::Doca
    }
}

/// Shared name lookup for the variable enums
macro_rules! impl_var_parsing {
    ($var:ty, $what:literal) => {
        impl FromStr for $var {
            type Err = eyre::Report;

            fn from_str(s: &str) -> Result<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|var| var.name() == s)
                    .ok_or_else(|| format_err!("Unknown {} variable {:?}", $what, s))
            }
        }

        impl fmt::Display for $var {
            fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt.write_str(self.name())
            }
        }
    };
}
impl_var_parsing!(TrackVar, "track");
impl_var_parsing!(ComboVar, "combination");

/// Collect named values into one slot per variable, rejecting unknown names
/// and duplicates
fn collect_slots<'name, Var, const N: usize>(
    pairs: impl IntoIterator<Item = (&'name str, Float)>,
    slot_of: impl Fn(Var) -> usize,
) -> Result<[Option<Float>; N]>
where
    Var: FromStr<Err = eyre::Report> + Copy + fmt::Display,
{
    let mut slots = [None; N];
    for (name, value) in pairs {
        let var = name.parse::<Var>()?;
        if slots[slot_of(var)].replace(value).is_some() {
            bail!("Variable {} was specified twice", var);
        }
    }
    Ok(slots)
}

/// Kinematic and quality variables of one reconstructed charged track
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackRecord {
    /// Transverse momentum (MeV)
    pub pt: Float,

    /// Total momentum (MeV)
    pub p: Float,

    /// Track fit χ² per degree of freedom
    pub trchi2dof: Float,

    /// Impact parameter χ² with respect to the best primary vertex
    pub bpvipchi2: Float,

    /// Ghost probability
    pub trghostprob: Float,

    /// Momentum x component (MeV)
    pub px: Float,

    /// Momentum y component (MeV)
    pub py: Float,
}
//
impl TrackRecord {
    /// Build a track from `(functor name, value)` pairs
    ///
    /// Every track variable must be specified exactly once.
    ///
    pub fn from_named<'name>(
        pairs: impl IntoIterator<Item = (&'name str, Float)>,
    ) -> Result<Self> {
        let slots: [_; 7] =
            collect_slots(pairs, |var: TrackVar| var as usize).wrap_err("Invalid track record")?;
        let mut values = [Float::zero(); 7];
        for ((var, slot), value) in TrackVar::ALL.iter().zip(slots).zip(&mut values) {
            *value = slot.ok_or_else(|| format_err!("Track record lacks variable {}", var))?;
        }
        let [pt, p, trchi2dof, bpvipchi2, trghostprob, px, py] = values;
        Ok(Self {
            pt,
            p,
            trchi2dof,
            bpvipchi2,
            trghostprob,
            px,
            py,
        })
    }

    /// Access a variable by identifier
    pub fn get(&self, var: TrackVar) -> Float {
        match var {
            TrackVar::Pt => self.pt,
            TrackVar::P => self.p,
            TrackVar::TrChi2Dof => self.trchi2dof,
            TrackVar::BpvIpChi2 => self.bpvipchi2,
            TrackVar::TrGhostProb => self.trghostprob,
            TrackVar::Px => self.px,
            TrackVar::Py => self.py,
        }
    }
}

/// Vertex fit results of one two-track combination
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComboRecord {
    /// Scalar sum of the daughters' PT (MeV), used to find the track pair
    pub sumpt: Float,

    /// Vertex distance χ²
    pub vdchi2: Float,

    /// Distance of closest approach (mm), zero when not provided
    pub doca: Float,

    /// Vertex fit χ²
    pub vchi2: Float,

    /// Pseudorapidity relative to the best primary vertex
    pub bpveta: Float,

    /// Corrected mass relative to the best primary vertex (MeV)
    pub bpvcorrm: Float,

    /// Direction angle cosine relative to the best primary vertex
    pub bpvdira: Float,

    /// Discriminant response
    pub mva: Float,
}
//
impl ComboRecord {
    /// Build a combination from `(functor name, value)` pairs
    ///
    /// DOCA may be omitted, every other variable must be specified exactly
    /// once.
    ///
    pub fn from_named<'name>(
        pairs: impl IntoIterator<Item = (&'name str, Float)>,
    ) -> Result<Self> {
        let slots: [_; 8] = collect_slots(pairs, |var: ComboVar| var as usize)
            .wrap_err("Invalid combination record")?;
        let mut values = [Float::zero(); 8];
        for ((&var, slot), value) in ComboVar::ALL.iter().zip(slots).zip(&mut values) {
            *value = match slot {
                Some(x) => x,
                None if var.is_required() => {
                    bail!("Combination record lacks variable {}", var)
                }
                None => Float::zero(),
            };
        }
        let [sumpt, vdchi2, doca, vchi2, bpveta, bpvcorrm, bpvdira, mva] = values;
        Ok(Self {
            sumpt,
            vdchi2,
            doca,
            vchi2,
            bpveta,
            bpvcorrm,
            bpvdira,
            mva,
        })
    }

    /// Access a variable by identifier
    pub fn get(&self, var: ComboVar) -> Float {
        match var {
            ComboVar::SumPt => self.sumpt,
            ComboVar::VdChi2 => self.vdchi2,
            ComboVar::Doca => self.doca,
            ComboVar::VChi2 => self.vchi2,
            ComboVar::BpvEta => self.bpveta,
            ComboVar::BpvCorrM => self.bpvcorrm,
            ComboVar::BpvDira => self.bpvdira,
            ComboVar::Mva => self.mva,
        }
    }
}
