//! Mechanism for reading analysis candidates from a text dump
//!
//! Candidates are exported from analysis ntuples as plain text, one record
//! per line:
//!
//! ```text
//! candidate 2017
//! track PT=700 P=8000 TRCHI2DOF=1.1 BPVIPCHI2=12 TRGHOSTPROB=0.05 PX=500 PY=490
//! combo SUMPT=1400 VDCHI2=30 VCHI2=2 BPVETA=3 BPVCORRM=3000 BPVDIRA=0.999 MVA=0.99
//! event VELO=1200 IT=400 OT=5000 TT=300
//! end
//! ```
//!
//! Track lines may carry an extra `MASK=0` or `MASK=1` flag. Everything after
//! a `#` is a comment, and blank lines are ignored.

use crate::{
    candidate::{Candidate, MAX_TRACKS},
    gec::EventCounters,
    numeric::Float,
    record::{ComboRecord, TrackRecord},
    Result,
};

use eyre::{bail, ensure, format_err, WrapErr};

use std::{fs, path::Path};

/// Load every candidate from a file
pub fn read_candidates(path: impl AsRef<Path>) -> Result<Vec<Candidate>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read candidates from {}", path.display()))?;
    parse_candidates(&text).wrap_err_with(|| format!("Invalid candidate file {}", path.display()))
}

/// Parse every candidate from a text dump
pub fn parse_candidates(text: &str) -> Result<Vec<Candidate>> {
    let mut candidates = Vec::new();
    let mut current: Option<Candidate> = None;

    for (line_idx, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default();
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };
        parse_line(keyword, tokens, &mut current, &mut candidates)
            .wrap_err_with(|| format!("At line {}", line_idx + 1))?;
    }

    if let Some(candidate) = current {
        bail!(
            "Candidate #{} ({} tracks) is missing its closing \"end\"",
            candidates.len() + 1,
            candidate.tracks.len()
        );
    }
    Ok(candidates)
}

/// Interpret one non-blank line
fn parse_line<'line>(
    keyword: &str,
    mut tokens: impl Iterator<Item = &'line str>,
    current: &mut Option<Candidate>,
    candidates: &mut Vec<Candidate>,
) -> Result<()> {
    // Only "candidate" may appear outside of a candidate block
    if keyword == "candidate" {
        ensure!(current.is_none(), "Previous candidate was not closed");
        let year = tokens
            .next()
            .ok_or_else(|| format_err!("Missing candidate year"))?;
        let year = year
            .parse::<i32>()
            .wrap_err_with(|| format!("Could not parse year {year:?}"))?;
        ensure!(tokens.next().is_none(), "Unexpected data after candidate year");
        *current = Some(Candidate {
            year,
            tracks: Vec::new(),
            track_mask: Vec::new(),
            combos: Vec::new(),
            counters: None,
        });
        return Ok(());
    }
    let candidate = current
        .as_mut()
        .ok_or_else(|| format_err!("\"{keyword}\" outside of a candidate block"))?;

    match keyword {
        "track" => {
            ensure!(
                candidate.tracks.len() < MAX_TRACKS,
                "Candidates may not have more than {} tracks",
                MAX_TRACKS
            );
            let mut mask = None;
            let mut values = Vec::new();
            for (name, value) in tokens.map(parse_assignment).collect::<Result<Vec<_>>>()? {
                if name == "MASK" {
                    ensure!(mask.is_none(), "Variable MASK was specified twice");
                    mask = Some(parse_mask(value)?);
                } else {
                    values.push((name, value));
                }
            }
            candidate.tracks.push(TrackRecord::from_named(values)?);
            candidate.track_mask.push(mask.unwrap_or(true));
        }
        "combo" => {
            let values = tokens.map(parse_assignment).collect::<Result<Vec<_>>>()?;
            candidate.combos.push(ComboRecord::from_named(values)?);
        }
        "event" => {
            ensure!(candidate.counters.is_none(), "Duplicate event line");
            candidate.counters = Some(parse_counters(tokens)?);
        }
        "end" => {
            ensure!(tokens.next().is_none(), "Unexpected data after \"end\"");
            candidates.extend(current.take());
        }
        other => bail!("Unknown record type {:?}", other),
    }
    Ok(())
}

/// Parse a NAME=value token
fn parse_assignment(token: &str) -> Result<(&str, Float)> {
    let (name, value) = token
        .split_once('=')
        .ok_or_else(|| format_err!("Expected NAME=value, got {:?}", token))?;
    let value = value
        .parse::<Float>()
        .wrap_err_with(|| format!("Could not parse value of {}", name))?;
    Ok((name, value))
}

/// Interpret the value of a MASK flag, which must be 0 or 1
fn parse_mask(value: Float) -> Result<bool> {
    if value == 1. {
        Ok(true)
    } else if value == 0. {
        Ok(false)
    } else {
        bail!("MASK must be 0 or 1, got {}", value)
    }
}

/// Parse the occupancy counters of an "event" line
fn parse_counters<'line>(tokens: impl Iterator<Item = &'line str>) -> Result<EventCounters> {
    let mut slots: [Option<Float>; 4] = [None; 4];
    const NAMES: [&str; 4] = ["VELO", "IT", "OT", "TT"];
    for token in tokens {
        let (name, value) = parse_assignment(token)?;
        let idx = NAMES
            .iter()
            .position(|&n| n == name)
            .ok_or_else(|| format_err!("Unknown event counter {:?}", name))?;
        ensure!(slots[idx].replace(value).is_none(), "Counter {} given twice", name);
    }
    let mut values = [0.; 4];
    for ((name, slot), value) in NAMES.iter().zip(slots).zip(&mut values) {
        *value = slot.ok_or_else(|| format_err!("Missing event counter {}", name))?;
    }
    let [n_velo_clusters, n_it_clusters, n_ot_clusters, n_tt_hits] = values;
    Ok(EventCounters {
        n_velo_clusters,
        n_it_clusters,
        n_ot_clusters,
        n_tt_hits,
    })
}
