//! Derived baseball metrics.
//!
//! Every function here is total: a zero or non-finite denominator yields
//! `Metric::Undefined` (printed as `-`) instead of an error or a NaN.
//! Aggregates are always computed from summed counting stats, never by
//! averaging per-game rates.

use crate::models::innings::InningsPitched;
use crate::models::stat_line::{BattingLine, PitchingLine, StatLine};
use serde::{Serialize, Serializer};
use std::fmt;

pub const SENTINEL: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Value(f64),
    Undefined,
}

impl Metric {
    pub fn ratio(numerator: f64, denominator: f64) -> Metric {
        if denominator <= 0.0 || !denominator.is_finite() {
            return Metric::Undefined;
        }
        let v = numerator / denominator;
        if v.is_finite() { Metric::Value(v) } else { Metric::Undefined }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(v),
            Metric::Undefined => None,
        }
    }

    /// Three decimals, leading zero dropped below 1 (`.500`, `1.350`).
    pub fn rate(self) -> String {
        match self {
            Metric::Value(v) => {
                let s = format!("{v:.3}");
                match s.strip_prefix('0') {
                    Some(rest) => rest.to_string(),
                    None => s,
                }
            }
            Metric::Undefined => SENTINEL.to_string(),
        }
    }

    /// Two decimals (`5.06`), for ERA-style numbers.
    pub fn fixed2(self) -> String {
        match self {
            Metric::Value(v) => format!("{v:.2}"),
            Metric::Undefined => SENTINEL.to_string(),
        }
    }
}

impl std::ops::Add for Metric {
    type Output = Metric;

    fn add(self, rhs: Metric) -> Metric {
        match (self, rhs) {
            (Metric::Value(a), Metric::Value(b)) => Metric::Value(a + b),
            _ => Metric::Undefined,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rate())
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Metric::Value(v) => serializer.serialize_f64(*v),
            Metric::Undefined => serializer.serialize_none(),
        }
    }
}

/// Lenient count parsing for display paths: anything unparseable, negative
/// or non-finite becomes 0. Edits go through the tracker, which rejects
/// such input instead.
pub fn parse_count(raw: &str) -> u32 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v.trunc().min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

// ---------------------------------------------------------------------------
// Batting
// ---------------------------------------------------------------------------

pub fn total_bases(hits: u32, doubles: u32, triples: u32, home_runs: u32) -> u32 {
    hits.saturating_add(doubles)
        .saturating_add(triples.saturating_mul(2))
        .saturating_add(home_runs.saturating_mul(3))
}

pub fn plate_appearances(at_bats: u32, walks: u32, hit_by_pitch: u32, sac_flies: u32) -> u32 {
    at_bats
        .saturating_add(walks)
        .saturating_add(hit_by_pitch)
        .saturating_add(sac_flies)
}

pub fn batting_average(hits: u32, at_bats: u32) -> Metric {
    Metric::ratio(f64::from(hits), f64::from(at_bats))
}

pub fn on_base_percentage(
    hits: u32,
    walks: u32,
    hit_by_pitch: u32,
    at_bats: u32,
    sac_flies: u32,
) -> Metric {
    let on_base = u64::from(hits) + u64::from(walks) + u64::from(hit_by_pitch);
    let chances =
        u64::from(at_bats) + u64::from(walks) + u64::from(hit_by_pitch) + u64::from(sac_flies);
    Metric::ratio(on_base as f64, chances as f64)
}

pub fn slugging_percentage(total_bases: u32, at_bats: u32) -> Metric {
    Metric::ratio(f64::from(total_bases), f64::from(at_bats))
}

pub fn on_base_plus_slugging(obp: Metric, slg: Metric) -> Metric {
    obp + slg
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BattingMetrics {
    pub total_bases: u32,
    pub plate_appearances: u32,
    pub avg: Metric,
    pub obp: Metric,
    pub slg: Metric,
    pub ops: Metric,
}

impl BattingMetrics {
    pub fn of(line: &BattingLine) -> Self {
        let tb = total_bases(line.hits, line.doubles, line.triples, line.home_runs);
        let obp = on_base_percentage(
            line.hits,
            line.walks,
            line.hit_by_pitch,
            line.at_bats,
            line.sac_flies,
        );
        let slg = slugging_percentage(tb, line.at_bats);
        Self {
            total_bases: tb,
            plate_appearances: plate_appearances(
                line.at_bats,
                line.walks,
                line.hit_by_pitch,
                line.sac_flies,
            ),
            avg: batting_average(line.hits, line.at_bats),
            obp,
            slg,
            ops: on_base_plus_slugging(obp, slg),
        }
    }
}

// ---------------------------------------------------------------------------
// Pitching
// ---------------------------------------------------------------------------

fn per_nine(count: u32, ip: InningsPitched) -> Metric {
    Metric::ratio(f64::from(count) * 9.0, ip.true_innings())
}

pub fn earned_run_average(earned_runs: u32, ip: InningsPitched) -> Metric {
    per_nine(earned_runs, ip)
}

pub fn whip(walks: u32, hits: u32, ip: InningsPitched) -> Metric {
    Metric::ratio(f64::from(walks) + f64::from(hits), ip.true_innings())
}

pub fn strikeouts_per_nine(strikeouts: u32, ip: InningsPitched) -> Metric {
    per_nine(strikeouts, ip)
}

pub fn walks_per_nine(walks: u32, ip: InningsPitched) -> Metric {
    per_nine(walks, ip)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PitchingMetrics {
    pub era: Metric,
    pub whip: Metric,
    pub k9: Metric,
    pub bb9: Metric,
    pub opp_avg: Metric,
    pub slg_against: Metric,
}

impl PitchingMetrics {
    pub fn of(line: &PitchingLine) -> Self {
        let ip = line.innings_pitched;
        let tb_allowed = total_bases(
            line.hits,
            line.doubles_allowed,
            line.triples_allowed,
            line.home_runs,
        );
        Self {
            era: earned_run_average(line.earned_runs, ip),
            whip: whip(line.walks, line.hits, ip),
            k9: strikeouts_per_nine(line.strikeouts, ip),
            bb9: walks_per_nine(line.walks, ip),
            opp_avg: batting_average(line.hits, line.at_bats_against),
            slg_against: slugging_percentage(tb_allowed, line.at_bats_against),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Sum every counting field (innings as outs) into a totals line.
/// Derived metrics for the result must be recomputed from it.
pub fn aggregate<L: StatLine>(game_id: i64, lines: &[L]) -> L {
    let mut total = L::blank(0, game_id, 0, "Totals");
    for line in lines {
        total.accumulate(line);
    }
    total
}
