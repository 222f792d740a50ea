#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use rstatbook::core::arbitrator::DecisionResolver;
use rstatbook::core::backend::{RoleResolver, StatsBackend};
use rstatbook::errors::{AppError, AppResult};
use rstatbook::models::game::{Game, Team};
use rstatbook::models::innings::InningsPitched;
use rstatbook::models::prompt::{Decision, UnsavedChangesPrompt};
use rstatbook::models::stat_line::{
    BattingField, BattingLine, FieldValue, NewStatLine, PitchingField, PitchingLine,
    PlayerSummary, StatDiff, StatLine, StatSheet,
};
use std::collections::{BTreeMap, VecDeque};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rstb() -> Command {
    cargo_bin_cmd!("rstatbook")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rstatbook.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Init the DB and create team #1 (managed by `coach`), three players and
/// two games: #1 final 5-3, #2 not played yet.
pub fn init_db_with_team(db_path: &str) {
    rstb()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    rstb()
        .args(["--db", db_path, "--account", "coach", "team", "add", "Tigers", "2025"])
        .assert()
        .success();

    for (name, jersey) in [("Mia Lopez", "12"), ("Sam Park", "7"), ("Jo Reyes", "21")] {
        rstb()
            .args([
                "--db", db_path, "roster", "add", name, "--team", "1", "--jersey", jersey,
            ])
            .assert()
            .success();
    }

    rstb()
        .args([
            "--db",
            db_path,
            "game",
            "add",
            "2025-06-14",
            "Hawks",
            "--team",
            "1",
            "--score",
            "5-3",
        ])
        .assert()
        .success();

    rstb()
        .args(["--db", db_path, "game", "add", "2025-06-21", "Owls", "--team", "1"])
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

pub const TEAM: i64 = 1;
pub const GAME: i64 = 10;
pub const OTHER_GAME: i64 = 11;
pub const UNPLAYED_GAME: i64 = 12;
pub const MIA: i64 = 1;
pub const SAM: i64 = 2;
pub const JO: i64 = 3;
pub const MIA_LINE: i64 = 100;
pub const SAM_LINE: i64 = 101;
pub const JO_PITCHING: i64 = 200;

/// A fake data layer with switches to make calls fail.
pub struct MemoryBackend {
    pub team: Team,
    pub games: Vec<Game>,
    pub roster: Vec<PlayerSummary>,
    pub batting: Vec<BattingLine>,
    pub pitching: Vec<PitchingLine>,
    pub recaps: BTreeMap<i64, String>,
    pub managers: Vec<String>,
    pub fail_updates: bool,
    pub fail_deletes: bool,
    pub fail_pitching_loads: bool,
    pub update_calls: usize,
    next_id: i64,
}

fn game(id: i64, day: u32, opponent: &str, score: Option<(u32, u32)>) -> Game {
    Game {
        id,
        team_id: TEAM,
        season: "2025".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
        opponent: opponent.to_string(),
        team_score: score.map(|s| s.0),
        opponent_score: score.map(|s| s.1),
        completed: score.is_some(),
    }
}

pub fn batting(stat_id: i64, game_id: i64, player: i64, name: &str, ab: u32, h: u32) -> BattingLine {
    let mut line = BattingLine::blank(stat_id, game_id, player, name);
    line.at_bats = ab;
    line.hits = h;
    line
}

impl MemoryBackend {
    pub fn seeded() -> Self {
        let mut jo = PitchingLine::blank(JO_PITCHING, GAME, JO, "Jo Reyes");
        jo.innings_pitched = InningsPitched::from_parts(6, 2).unwrap();
        jo.hits = 5;
        jo.earned_runs = 2;
        jo.walks = 1;
        jo.strikeouts = 7;

        Self {
            team: Team {
                id: TEAM,
                name: "Tigers".to_string(),
                season: "2025".to_string(),
            },
            games: vec![
                game(GAME, 14, "Hawks", Some((5, 3))),
                game(OTHER_GAME, 21, "Owls", Some((2, 4))),
                game(UNPLAYED_GAME, 28, "Bears", None),
            ],
            roster: vec![
                PlayerSummary {
                    roster_season_id: MIA,
                    player_name: "Mia Lopez".to_string(),
                    jersey: Some(12),
                },
                PlayerSummary {
                    roster_season_id: SAM,
                    player_name: "Sam Park".to_string(),
                    jersey: Some(7),
                },
                PlayerSummary {
                    roster_season_id: JO,
                    player_name: "Jo Reyes".to_string(),
                    jersey: Some(21),
                },
            ],
            batting: vec![
                batting(MIA_LINE, GAME, MIA, "Mia Lopez", 4, 2),
                batting(SAM_LINE, GAME, SAM, "Sam Park", 3, 1),
            ],
            pitching: vec![jo],
            recaps: BTreeMap::new(),
            managers: vec!["coach".to_string()],
            fail_updates: false,
            fail_deletes: false,
            fail_pitching_loads: false,
            update_calls: 0,
            next_id: 1000,
        }
    }

    pub fn batting_line(&self, stat_id: i64) -> Option<&BattingLine> {
        self.batting.iter().find(|l| l.stat_id == stat_id)
    }

    pub fn pitching_line(&self, stat_id: i64) -> Option<&PitchingLine> {
        self.pitching.iter().find(|l| l.stat_id == stat_id)
    }

    fn sheet<L: StatLine>(&self, game_id: i64, lines: &[L]) -> AppResult<StatSheet<L>> {
        self.find_game(game_id)?;
        let stats: Vec<L> = lines
            .iter()
            .filter(|l| l.game_id() == game_id)
            .cloned()
            .collect();
        let available = self
            .roster
            .iter()
            .filter(|p| !stats.iter().any(|l| l.roster_season_id() == p.roster_season_id))
            .cloned()
            .collect();
        Ok(StatSheet::new(game_id, stats, available))
    }

    fn find_game(&self, game_id: i64) -> AppResult<Game> {
        self.games
            .iter()
            .find(|g| g.id == game_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("game #{game_id}")))
    }
}

fn create_in<L: StatLine>(
    lines: &mut Vec<L>,
    roster: &[PlayerSummary],
    stat_id: i64,
    game_id: i64,
    payload: &NewStatLine<L::Field>,
) -> AppResult<L> {
    let player = payload.roster_season_id.ok_or(AppError::MissingPlayer)?;
    let summary = roster
        .iter()
        .find(|p| p.roster_season_id == player)
        .ok_or_else(|| AppError::NotFound(format!("player #{player}")))?;
    if lines
        .iter()
        .any(|l| l.game_id() == game_id && l.roster_season_id() == player)
    {
        return Err(AppError::DuplicatePlayer(player));
    }
    let mut line = L::blank(stat_id, game_id, player, &summary.player_name);
    for (f, v) in &payload.values {
        line.set(*f, *v);
    }
    lines.push(line.clone());
    Ok(line)
}

fn update_in<L: StatLine>(
    lines: &mut [L],
    fail: bool,
    stat_id: i64,
    diff: &StatDiff<L::Field>,
) -> AppResult<L> {
    if fail {
        return Err(AppError::Transient("server unavailable".to_string()));
    }
    let line = lines
        .iter_mut()
        .find(|l| l.stat_id() == stat_id)
        .ok_or_else(|| AppError::NotFound(format!("{} stat #{stat_id}", L::KIND)))?;
    for (f, v) in diff {
        line.set(*f, *v);
    }
    Ok(line.clone())
}

fn delete_in<L: StatLine>(lines: &mut Vec<L>, fail: bool, stat_id: i64) -> AppResult<()> {
    if fail {
        return Err(AppError::Transient("server unavailable".to_string()));
    }
    let idx = lines
        .iter()
        .position(|l| l.stat_id() == stat_id)
        .ok_or_else(|| AppError::NotFound(format!("{} stat #{stat_id}", L::KIND)))?;
    lines.remove(idx);
    Ok(())
}

impl StatsBackend for MemoryBackend {
    fn team(&mut self, team_id: i64) -> AppResult<Team> {
        if team_id == self.team.id {
            Ok(self.team.clone())
        } else {
            Err(AppError::NotFound(format!("team #{team_id}")))
        }
    }

    fn game(&mut self, game_id: i64) -> AppResult<Game> {
        self.find_game(game_id)
    }

    fn list_completed_games(&mut self, team_id: i64, season: &str) -> AppResult<Vec<Game>> {
        Ok(self
            .games
            .iter()
            .filter(|g| g.team_id == team_id && g.season == season && g.completed)
            .cloned()
            .collect())
    }

    fn batting_stats(&mut self, game_id: i64) -> AppResult<StatSheet<BattingLine>> {
        self.sheet(game_id, &self.batting)
    }

    fn pitching_stats(&mut self, game_id: i64) -> AppResult<StatSheet<PitchingLine>> {
        if self.fail_pitching_loads {
            return Err(AppError::Transient("server unavailable".to_string()));
        }
        self.sheet(game_id, &self.pitching)
    }

    fn create_batting_stat(
        &mut self,
        game_id: i64,
        payload: &NewStatLine<BattingField>,
    ) -> AppResult<BattingLine> {
        self.next_id += 1;
        create_in(&mut self.batting, &self.roster, self.next_id, game_id, payload)
    }

    fn create_pitching_stat(
        &mut self,
        game_id: i64,
        payload: &NewStatLine<PitchingField>,
    ) -> AppResult<PitchingLine> {
        self.next_id += 1;
        create_in(&mut self.pitching, &self.roster, self.next_id, game_id, payload)
    }

    fn update_batting_stat(
        &mut self,
        stat_id: i64,
        diff: &StatDiff<BattingField>,
    ) -> AppResult<BattingLine> {
        self.update_calls += 1;
        update_in(&mut self.batting, self.fail_updates, stat_id, diff)
    }

    fn update_pitching_stat(
        &mut self,
        stat_id: i64,
        diff: &StatDiff<PitchingField>,
    ) -> AppResult<PitchingLine> {
        self.update_calls += 1;
        update_in(&mut self.pitching, self.fail_updates, stat_id, diff)
    }

    fn delete_batting_stat(&mut self, stat_id: i64) -> AppResult<()> {
        delete_in(&mut self.batting, self.fail_deletes, stat_id)
    }

    fn delete_pitching_stat(&mut self, stat_id: i64) -> AppResult<()> {
        delete_in(&mut self.pitching, self.fail_deletes, stat_id)
    }

    fn season_batting_lines(&mut self, team_id: i64) -> AppResult<Vec<BattingLine>> {
        let games: Vec<i64> = self
            .list_completed_games(team_id, "2025")?
            .iter()
            .map(|g| g.id)
            .collect();
        Ok(self
            .batting
            .iter()
            .filter(|l| games.contains(&l.game_id))
            .cloned()
            .collect())
    }

    fn season_pitching_lines(&mut self, team_id: i64) -> AppResult<Vec<PitchingLine>> {
        let games: Vec<i64> = self
            .list_completed_games(team_id, "2025")?
            .iter()
            .map(|g| g.id)
            .collect();
        Ok(self
            .pitching
            .iter()
            .filter(|l| games.contains(&l.game_id))
            .cloned()
            .collect())
    }

    fn game_recap(&mut self, game_id: i64) -> AppResult<String> {
        self.find_game(game_id)?;
        Ok(self.recaps.get(&game_id).cloned().unwrap_or_default())
    }

    fn save_game_recap(&mut self, game_id: i64, recap: &str) -> AppResult<()> {
        if self.fail_updates {
            return Err(AppError::Transient("server unavailable".to_string()));
        }
        self.recaps.insert(game_id, recap.to_string());
        Ok(())
    }
}

impl RoleResolver for MemoryBackend {
    fn can_manage_stats(&mut self, account: &str, team_id: i64) -> AppResult<bool> {
        Ok(team_id == self.team.id && self.managers.iter().any(|m| m == account))
    }
}

// ---------------------------------------------------------------------------
// Prompt answers
// ---------------------------------------------------------------------------

/// Answers prompts from a fixed list (Cancel once it runs out) and
/// remembers what it was asked.
#[derive(Default)]
pub struct Scripted {
    pub answers: VecDeque<Decision>,
    pub asked: Vec<(UnsavedChangesPrompt, Option<String>)>,
}

impl Scripted {
    pub fn new(answers: &[Decision]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            asked: Vec::new(),
        }
    }
}

impl DecisionResolver for Scripted {
    fn decide(&mut self, prompt: &UnsavedChangesPrompt, error: Option<&str>) -> Decision {
        self.asked
            .push((prompt.clone(), error.map(str::to_string)));
        self.answers.pop_front().unwrap_or(Decision::Cancel)
    }
}

pub fn count(n: u32) -> FieldValue {
    FieldValue::Count(n)
}
