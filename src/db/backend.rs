//! SQLite implementation of the stats collaborators.

use crate::core::backend::{RoleResolver, StatsBackend};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::{self, StatTable};
use crate::errors::AppResult;
use crate::models::game::{Game, Team};
use crate::models::stat_line::{
    BattingField, BattingLine, NewStatLine, PitchingField, PitchingLine, StatDiff, StatSheet,
};
use crate::ui::messages::warning;

pub struct SqliteBackend {
    pool: DbPool,
}

impl SqliteBackend {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn open(path: &str) -> AppResult<Self> {
        Ok(Self::new(DbPool::new(path)?))
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Audit logging is best effort: a failure is reported, never fatal.
    fn log(&self, operation: &str, target: &str, message: &str) {
        if let Err(e) = audit(&self.pool.conn, operation, target, message) {
            warning(format!("Failed to write internal log: {}", e));
        }
    }

    fn sheet<L: StatTable>(&mut self, game_id: i64) -> AppResult<StatSheet<L>> {
        queries::load_game(&self.pool.conn, game_id)?;
        let stats = queries::load_lines_for_game::<L>(&self.pool.conn, game_id)?;
        let available = queries::load_available_players::<L>(&self.pool.conn, game_id)?;
        Ok(StatSheet::new(game_id, stats, available))
    }

    fn create<L: StatTable>(&mut self, game_id: i64, payload: &NewStatLine<L::Field>) -> AppResult<L> {
        let line = queries::insert_line::<L>(&self.pool.conn, game_id, payload)?;
        self.log(
            "add",
            &format!("{} #{}", L::KIND, line.stat_id()),
            &format!("Added {} line for {} (game #{})", L::KIND, line.player_name(), game_id),
        );
        Ok(line)
    }

    fn update<L: StatTable>(&mut self, stat_id: i64, diff: &StatDiff<L::Field>) -> AppResult<L> {
        let line = queries::update_line::<L>(&self.pool.conn, stat_id, diff)?;
        let changes: Vec<String> = diff
            .iter()
            .map(|(f, v)| format!("{}={}", L::label(*f), v))
            .collect();
        self.log(
            "edit",
            &format!("{} #{}", L::KIND, stat_id),
            &format!("{}: {}", line.player_name(), changes.join(", ")),
        );
        Ok(line)
    }

    fn delete<L: StatTable>(&mut self, stat_id: i64) -> AppResult<()> {
        queries::delete_line::<L>(&self.pool.conn, stat_id)?;
        self.log(
            "del",
            &format!("{} #{}", L::KIND, stat_id),
            &format!("Deleted {} line #{}", L::KIND, stat_id),
        );
        Ok(())
    }
}

impl StatsBackend for SqliteBackend {
    fn team(&mut self, team_id: i64) -> AppResult<Team> {
        queries::load_team(&self.pool.conn, team_id)
    }

    fn game(&mut self, game_id: i64) -> AppResult<Game> {
        queries::load_game(&self.pool.conn, game_id)
    }

    fn list_completed_games(&mut self, team_id: i64, season: &str) -> AppResult<Vec<Game>> {
        let games = queries::load_games(&self.pool.conn, team_id, true)?;
        Ok(games.into_iter().filter(|g| g.season == season).collect())
    }

    fn batting_stats(&mut self, game_id: i64) -> AppResult<StatSheet<BattingLine>> {
        self.sheet(game_id)
    }

    fn pitching_stats(&mut self, game_id: i64) -> AppResult<StatSheet<PitchingLine>> {
        self.sheet(game_id)
    }

    fn create_batting_stat(
        &mut self,
        game_id: i64,
        payload: &NewStatLine<BattingField>,
    ) -> AppResult<BattingLine> {
        self.create(game_id, payload)
    }

    fn create_pitching_stat(
        &mut self,
        game_id: i64,
        payload: &NewStatLine<PitchingField>,
    ) -> AppResult<PitchingLine> {
        self.create(game_id, payload)
    }

    fn update_batting_stat(
        &mut self,
        stat_id: i64,
        diff: &StatDiff<BattingField>,
    ) -> AppResult<BattingLine> {
        self.update(stat_id, diff)
    }

    fn update_pitching_stat(
        &mut self,
        stat_id: i64,
        diff: &StatDiff<PitchingField>,
    ) -> AppResult<PitchingLine> {
        self.update(stat_id, diff)
    }

    fn delete_batting_stat(&mut self, stat_id: i64) -> AppResult<()> {
        self.delete::<BattingLine>(stat_id)
    }

    fn delete_pitching_stat(&mut self, stat_id: i64) -> AppResult<()> {
        self.delete::<PitchingLine>(stat_id)
    }

    fn season_batting_lines(&mut self, team_id: i64) -> AppResult<Vec<BattingLine>> {
        queries::load_season_lines(&self.pool.conn, team_id)
    }

    fn season_pitching_lines(&mut self, team_id: i64) -> AppResult<Vec<PitchingLine>> {
        queries::load_season_lines(&self.pool.conn, team_id)
    }

    fn game_recap(&mut self, game_id: i64) -> AppResult<String> {
        queries::load_recap(&self.pool.conn, game_id)
    }

    fn save_game_recap(&mut self, game_id: i64, recap: &str) -> AppResult<()> {
        queries::update_recap(&self.pool.conn, game_id, recap)?;
        self.log("edit", &format!("recap #{game_id}"), "Game recap updated");
        Ok(())
    }
}

impl RoleResolver for SqliteBackend {
    fn can_manage_stats(&mut self, account: &str, team_id: i64) -> AppResult<bool> {
        queries::is_manager(&self.pool.conn, team_id, account)
    }
}
