//! Per-game stat lines (batting and pitching) and their editable fields.

use super::innings::InningsPitched;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

/// Value of one editable cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Count(u32),
    Innings(InningsPitched),
}

impl FieldValue {
    pub fn as_count(self) -> u32 {
        match self {
            FieldValue::Count(n) => n,
            FieldValue::Innings(ip) => ip.outs(),
        }
    }

    pub fn as_innings(self) -> InningsPitched {
        match self {
            FieldValue::Innings(ip) => ip,
            FieldValue::Count(n) => InningsPitched::from_outs(n.saturating_mul(3)),
        }
    }

    /// Value as stored in SQLite: counts as-is, innings as outs.
    pub fn to_db_int(self) -> i64 {
        match self {
            FieldValue::Count(n) => i64::from(n),
            FieldValue::Innings(ip) => i64::from(ip.outs()),
        }
    }

    pub fn sum(self, other: FieldValue) -> FieldValue {
        match (self, other) {
            (FieldValue::Count(a), FieldValue::Count(b)) => FieldValue::Count(a.saturating_add(b)),
            (FieldValue::Innings(a), FieldValue::Innings(b)) => FieldValue::Innings(a + b),
            (a, _) => a,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Count(n) => write!(f, "{n}"),
            FieldValue::Innings(ip) => write!(f, "{ip}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Count,
    Innings,
}

/// Changed fields of one row, the payload of an update.
pub type StatDiff<F> = BTreeMap<F, FieldValue>;

/// Common surface of batting and pitching lines.
pub trait StatLine: Clone + PartialEq + fmt::Debug + Serialize {
    type Field: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + 'static;

    /// "batting" or "pitching"; used in log targets and labels.
    const KIND: &'static str;

    fn fields() -> &'static [Self::Field];

    fn field_kind(field: Self::Field) -> FieldKind;

    /// Short column label (`AB`, `IP`, ...).
    fn label(field: Self::Field) -> &'static str;

    /// SQLite column backing the field.
    fn column(field: Self::Field) -> &'static str;

    /// Accepts the short label or the column name, case-insensitive.
    fn parse_field(name: &str) -> Option<Self::Field> {
        let wanted = name.trim();
        Self::fields().iter().copied().find(|f| {
            Self::label(*f).eq_ignore_ascii_case(wanted)
                || Self::column(*f).eq_ignore_ascii_case(wanted)
                || f.to_string().eq_ignore_ascii_case(wanted)
        })
    }

    /// A line with every counting field at zero.
    fn blank(stat_id: i64, game_id: i64, roster_season_id: i64, player_name: &str) -> Self;

    fn stat_id(&self) -> i64;
    fn game_id(&self) -> i64;
    fn roster_season_id(&self) -> i64;
    fn player_name(&self) -> &str;

    fn get(&self, field: Self::Field) -> FieldValue;
    fn set(&mut self, field: Self::Field, value: FieldValue);

    /// Sum counting fields of `other` into `self`.
    fn accumulate(&mut self, other: &Self) {
        for f in Self::fields() {
            let v = self.get(*f).sum(other.get(*f));
            self.set(*f, v);
        }
    }

    fn values(&self) -> StatDiff<Self::Field> {
        Self::fields().iter().map(|f| (*f, self.get(*f))).collect()
    }
}

// ---------------------------------------------------------------------------
// Batting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BattingField {
    AtBats,
    Runs,
    Hits,
    Doubles,
    Triples,
    HomeRuns,
    RunsBattedIn,
    Walks,
    Strikeouts,
    HitByPitch,
    SacFlies,
    StolenBases,
}

const BATTING_FIELDS: [BattingField; 12] = [
    BattingField::AtBats,
    BattingField::Runs,
    BattingField::Hits,
    BattingField::Doubles,
    BattingField::Triples,
    BattingField::HomeRuns,
    BattingField::RunsBattedIn,
    BattingField::Walks,
    BattingField::Strikeouts,
    BattingField::HitByPitch,
    BattingField::SacFlies,
    BattingField::StolenBases,
];

impl fmt::Display for BattingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(BattingLine::column(*self))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattingLine {
    pub stat_id: i64,
    pub game_id: i64,
    pub roster_season_id: i64,
    pub player_name: String,
    pub at_bats: u32,
    pub runs: u32,
    pub hits: u32,
    pub doubles: u32,
    pub triples: u32,
    pub home_runs: u32,
    pub runs_batted_in: u32,
    pub walks: u32,
    pub strikeouts: u32,
    pub hit_by_pitch: u32,
    pub sac_flies: u32,
    pub stolen_bases: u32,
}

impl StatLine for BattingLine {
    type Field = BattingField;

    const KIND: &'static str = "batting";

    fn fields() -> &'static [BattingField] {
        &BATTING_FIELDS
    }

    fn field_kind(_field: BattingField) -> FieldKind {
        FieldKind::Count
    }

    fn label(field: BattingField) -> &'static str {
        match field {
            BattingField::AtBats => "AB",
            BattingField::Runs => "R",
            BattingField::Hits => "H",
            BattingField::Doubles => "2B",
            BattingField::Triples => "3B",
            BattingField::HomeRuns => "HR",
            BattingField::RunsBattedIn => "RBI",
            BattingField::Walks => "BB",
            BattingField::Strikeouts => "SO",
            BattingField::HitByPitch => "HBP",
            BattingField::SacFlies => "SF",
            BattingField::StolenBases => "SB",
        }
    }

    fn column(field: BattingField) -> &'static str {
        match field {
            BattingField::AtBats => "at_bats",
            BattingField::Runs => "runs",
            BattingField::Hits => "hits",
            BattingField::Doubles => "doubles",
            BattingField::Triples => "triples",
            BattingField::HomeRuns => "home_runs",
            BattingField::RunsBattedIn => "runs_batted_in",
            BattingField::Walks => "walks",
            BattingField::Strikeouts => "strikeouts",
            BattingField::HitByPitch => "hit_by_pitch",
            BattingField::SacFlies => "sac_flies",
            BattingField::StolenBases => "stolen_bases",
        }
    }

    fn blank(stat_id: i64, game_id: i64, roster_season_id: i64, player_name: &str) -> Self {
        Self {
            stat_id,
            game_id,
            roster_season_id,
            player_name: player_name.to_string(),
            at_bats: 0,
            runs: 0,
            hits: 0,
            doubles: 0,
            triples: 0,
            home_runs: 0,
            runs_batted_in: 0,
            walks: 0,
            strikeouts: 0,
            hit_by_pitch: 0,
            sac_flies: 0,
            stolen_bases: 0,
        }
    }

    fn stat_id(&self) -> i64 {
        self.stat_id
    }

    fn game_id(&self) -> i64 {
        self.game_id
    }

    fn roster_season_id(&self) -> i64 {
        self.roster_season_id
    }

    fn player_name(&self) -> &str {
        &self.player_name
    }

    fn get(&self, field: BattingField) -> FieldValue {
        FieldValue::Count(match field {
            BattingField::AtBats => self.at_bats,
            BattingField::Runs => self.runs,
            BattingField::Hits => self.hits,
            BattingField::Doubles => self.doubles,
            BattingField::Triples => self.triples,
            BattingField::HomeRuns => self.home_runs,
            BattingField::RunsBattedIn => self.runs_batted_in,
            BattingField::Walks => self.walks,
            BattingField::Strikeouts => self.strikeouts,
            BattingField::HitByPitch => self.hit_by_pitch,
            BattingField::SacFlies => self.sac_flies,
            BattingField::StolenBases => self.stolen_bases,
        })
    }

    fn set(&mut self, field: BattingField, value: FieldValue) {
        let n = value.as_count();
        match field {
            BattingField::AtBats => self.at_bats = n,
            BattingField::Runs => self.runs = n,
            BattingField::Hits => self.hits = n,
            BattingField::Doubles => self.doubles = n,
            BattingField::Triples => self.triples = n,
            BattingField::HomeRuns => self.home_runs = n,
            BattingField::RunsBattedIn => self.runs_batted_in = n,
            BattingField::Walks => self.walks = n,
            BattingField::Strikeouts => self.strikeouts = n,
            BattingField::HitByPitch => self.hit_by_pitch = n,
            BattingField::SacFlies => self.sac_flies = n,
            BattingField::StolenBases => self.stolen_bases = n,
        }
    }
}

// ---------------------------------------------------------------------------
// Pitching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PitchingField {
    InningsPitched,
    Hits,
    Runs,
    EarnedRuns,
    Walks,
    Strikeouts,
    HomeRuns,
    HitBatters,
    AtBatsAgainst,
    DoublesAllowed,
    TriplesAllowed,
}

const PITCHING_FIELDS: [PitchingField; 11] = [
    PitchingField::InningsPitched,
    PitchingField::Hits,
    PitchingField::Runs,
    PitchingField::EarnedRuns,
    PitchingField::Walks,
    PitchingField::Strikeouts,
    PitchingField::HomeRuns,
    PitchingField::HitBatters,
    PitchingField::AtBatsAgainst,
    PitchingField::DoublesAllowed,
    PitchingField::TriplesAllowed,
];

impl fmt::Display for PitchingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // the column stores outs; the field keeps its display name
            PitchingField::InningsPitched => f.write_str("innings_pitched"),
            other => f.write_str(PitchingLine::column(*other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PitchingLine {
    pub stat_id: i64,
    pub game_id: i64,
    pub roster_season_id: i64,
    pub player_name: String,
    pub innings_pitched: InningsPitched,
    pub hits: u32,
    pub runs: u32,
    pub earned_runs: u32,
    pub walks: u32,
    pub strikeouts: u32,
    pub home_runs: u32,
    pub hit_batters: u32,
    pub at_bats_against: u32,
    pub doubles_allowed: u32,
    pub triples_allowed: u32,
}

impl StatLine for PitchingLine {
    type Field = PitchingField;

    const KIND: &'static str = "pitching";

    fn fields() -> &'static [PitchingField] {
        &PITCHING_FIELDS
    }

    fn field_kind(field: PitchingField) -> FieldKind {
        match field {
            PitchingField::InningsPitched => FieldKind::Innings,
            _ => FieldKind::Count,
        }
    }

    fn label(field: PitchingField) -> &'static str {
        match field {
            PitchingField::InningsPitched => "IP",
            PitchingField::Hits => "H",
            PitchingField::Runs => "R",
            PitchingField::EarnedRuns => "ER",
            PitchingField::Walks => "BB",
            PitchingField::Strikeouts => "SO",
            PitchingField::HomeRuns => "HR",
            PitchingField::HitBatters => "HBP",
            PitchingField::AtBatsAgainst => "AB",
            PitchingField::DoublesAllowed => "2B",
            PitchingField::TriplesAllowed => "3B",
        }
    }

    fn column(field: PitchingField) -> &'static str {
        match field {
            PitchingField::InningsPitched => "outs_pitched",
            PitchingField::Hits => "hits",
            PitchingField::Runs => "runs",
            PitchingField::EarnedRuns => "earned_runs",
            PitchingField::Walks => "walks",
            PitchingField::Strikeouts => "strikeouts",
            PitchingField::HomeRuns => "home_runs",
            PitchingField::HitBatters => "hit_batters",
            PitchingField::AtBatsAgainst => "at_bats_against",
            PitchingField::DoublesAllowed => "doubles_allowed",
            PitchingField::TriplesAllowed => "triples_allowed",
        }
    }

    fn blank(stat_id: i64, game_id: i64, roster_season_id: i64, player_name: &str) -> Self {
        Self {
            stat_id,
            game_id,
            roster_season_id,
            player_name: player_name.to_string(),
            innings_pitched: InningsPitched::ZERO,
            hits: 0,
            runs: 0,
            earned_runs: 0,
            walks: 0,
            strikeouts: 0,
            home_runs: 0,
            hit_batters: 0,
            at_bats_against: 0,
            doubles_allowed: 0,
            triples_allowed: 0,
        }
    }

    fn stat_id(&self) -> i64 {
        self.stat_id
    }

    fn game_id(&self) -> i64 {
        self.game_id
    }

    fn roster_season_id(&self) -> i64 {
        self.roster_season_id
    }

    fn player_name(&self) -> &str {
        &self.player_name
    }

    fn get(&self, field: PitchingField) -> FieldValue {
        match field {
            PitchingField::InningsPitched => FieldValue::Innings(self.innings_pitched),
            PitchingField::Hits => FieldValue::Count(self.hits),
            PitchingField::Runs => FieldValue::Count(self.runs),
            PitchingField::EarnedRuns => FieldValue::Count(self.earned_runs),
            PitchingField::Walks => FieldValue::Count(self.walks),
            PitchingField::Strikeouts => FieldValue::Count(self.strikeouts),
            PitchingField::HomeRuns => FieldValue::Count(self.home_runs),
            PitchingField::HitBatters => FieldValue::Count(self.hit_batters),
            PitchingField::AtBatsAgainst => FieldValue::Count(self.at_bats_against),
            PitchingField::DoublesAllowed => FieldValue::Count(self.doubles_allowed),
            PitchingField::TriplesAllowed => FieldValue::Count(self.triples_allowed),
        }
    }

    fn set(&mut self, field: PitchingField, value: FieldValue) {
        match field {
            PitchingField::InningsPitched => self.innings_pitched = value.as_innings(),
            PitchingField::Hits => self.hits = value.as_count(),
            PitchingField::Runs => self.runs = value.as_count(),
            PitchingField::EarnedRuns => self.earned_runs = value.as_count(),
            PitchingField::Walks => self.walks = value.as_count(),
            PitchingField::Strikeouts => self.strikeouts = value.as_count(),
            PitchingField::HomeRuns => self.home_runs = value.as_count(),
            PitchingField::HitBatters => self.hit_batters = value.as_count(),
            PitchingField::AtBatsAgainst => self.at_bats_against = value.as_count(),
            PitchingField::DoublesAllowed => self.doubles_allowed = value.as_count(),
            PitchingField::TriplesAllowed => self.triples_allowed = value.as_count(),
        }
    }
}

// ---------------------------------------------------------------------------
// Read model and add-row payload
// ---------------------------------------------------------------------------

/// Roster player who can still receive a line for the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    pub roster_season_id: i64,
    pub player_name: String,
    pub jersey: Option<u32>,
}

/// What the data layer returns for one game and one stat kind.
#[derive(Debug, Clone, Serialize)]
pub struct StatSheet<L: StatLine> {
    pub stats: Vec<L>,
    pub totals: L,
    pub available_players: Vec<PlayerSummary>,
}

impl<L: StatLine> StatSheet<L> {
    pub fn new(game_id: i64, stats: Vec<L>, available_players: Vec<PlayerSummary>) -> Self {
        let totals = crate::core::metrics::aggregate(game_id, &stats);
        Self {
            stats,
            totals,
            available_players,
        }
    }
}

/// The add-row form. Fields not present are zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStatLine<F: Ord> {
    pub roster_season_id: Option<i64>,
    pub values: StatDiff<F>,
}

impl<F: Ord> Default for NewStatLine<F> {
    fn default() -> Self {
        Self {
            roster_season_id: None,
            values: BTreeMap::new(),
        }
    }
}

impl<F: Ord> NewStatLine<F> {
    pub fn for_player(roster_season_id: i64) -> Self {
        Self {
            roster_season_id: Some(roster_season_id),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, field: F, value: FieldValue) -> Self {
        self.values.insert(field, value);
        self
    }
}
