//! Collaborators the stat entry subsystem talks to.
//!
//! `StatsBackend` is the data-access layer (validated CRUD records) and
//! `RoleResolver` answers whether an account may edit a team's stats.
//! `db::backend::SqliteBackend` implements both.

use crate::errors::AppResult;
use crate::models::game::{Game, Team};
use crate::models::stat_line::{
    BattingField, BattingLine, NewStatLine, PitchingField, PitchingLine, StatDiff, StatSheet,
};

pub trait StatsBackend {
    fn team(&mut self, team_id: i64) -> AppResult<Team>;

    fn game(&mut self, game_id: i64) -> AppResult<Game>;

    fn list_completed_games(&mut self, team_id: i64, season: &str) -> AppResult<Vec<Game>>;

    fn batting_stats(&mut self, game_id: i64) -> AppResult<StatSheet<BattingLine>>;
    fn pitching_stats(&mut self, game_id: i64) -> AppResult<StatSheet<PitchingLine>>;

    fn create_batting_stat(
        &mut self,
        game_id: i64,
        payload: &NewStatLine<BattingField>,
    ) -> AppResult<BattingLine>;
    fn create_pitching_stat(
        &mut self,
        game_id: i64,
        payload: &NewStatLine<PitchingField>,
    ) -> AppResult<PitchingLine>;

    fn update_batting_stat(
        &mut self,
        stat_id: i64,
        diff: &StatDiff<BattingField>,
    ) -> AppResult<BattingLine>;
    fn update_pitching_stat(
        &mut self,
        stat_id: i64,
        diff: &StatDiff<PitchingField>,
    ) -> AppResult<PitchingLine>;

    fn delete_batting_stat(&mut self, stat_id: i64) -> AppResult<()>;
    fn delete_pitching_stat(&mut self, stat_id: i64) -> AppResult<()>;

    /// Every per-game batting line of the team's season. Read-only.
    fn season_batting_lines(&mut self, team_id: i64) -> AppResult<Vec<BattingLine>>;
    /// Every per-game pitching line of the team's season. Read-only.
    fn season_pitching_lines(&mut self, team_id: i64) -> AppResult<Vec<PitchingLine>>;

    fn game_recap(&mut self, game_id: i64) -> AppResult<String>;
    fn save_game_recap(&mut self, game_id: i64, recap: &str) -> AppResult<()>;
}

pub trait RoleResolver {
    fn can_manage_stats(&mut self, account: &str, team_id: i64) -> AppResult<bool>;
}
