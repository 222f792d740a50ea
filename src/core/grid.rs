//! Stat entry grid controller (batting and pitching).
//!
//! A grid owns the rows of one stat kind for the selected game, its
//! `RowTracker`, and the add-row form. Parents coordinate with it only
//! through the `DirtyRowHandle` trait.

use super::backend::StatsBackend;
use super::metrics;
use super::tracker::RowTracker;
use crate::errors::{AppError, AppResult, ErrorClass};
use crate::models::prompt::{DirtyRowInfo, Tab};
use crate::models::stat_line::{
    BattingField, BattingLine, NewStatLine, PitchingField, PitchingLine,
    PlayerSummary, StatDiff, StatLine, StatSheet,
};

/// Imperative surface a parent uses before it tears a grid down or moves
/// focus away from it.
pub trait DirtyRowHandle {
    fn has_dirty_row(&self) -> bool;
    fn dirty_row_info(&self) -> Option<DirtyRowInfo>;
    /// Persist the dirty row. `Ok(false)` when there was nothing to save.
    fn save_dirty_row(&mut self, backend: &mut dyn StatsBackend) -> AppResult<bool>;
    /// Throw the edits away. `false` when there was nothing to discard.
    fn discard_dirty_row(&mut self) -> bool;
}

/// Binds a stat line type to the backend calls for its kind.
pub trait GridLine: StatLine {
    const TAB: Tab;

    fn fetch(backend: &mut dyn StatsBackend, game_id: i64) -> AppResult<StatSheet<Self>>;
    fn create(
        backend: &mut dyn StatsBackend,
        game_id: i64,
        payload: &NewStatLine<Self::Field>,
    ) -> AppResult<Self>;
    fn update(
        backend: &mut dyn StatsBackend,
        stat_id: i64,
        diff: &StatDiff<Self::Field>,
    ) -> AppResult<Self>;
    fn delete(backend: &mut dyn StatsBackend, stat_id: i64) -> AppResult<()>;
}

impl GridLine for BattingLine {
    const TAB: Tab = Tab::Batting;

    fn fetch(backend: &mut dyn StatsBackend, game_id: i64) -> AppResult<StatSheet<Self>> {
        backend.batting_stats(game_id)
    }

    fn create(
        backend: &mut dyn StatsBackend,
        game_id: i64,
        payload: &NewStatLine<BattingField>,
    ) -> AppResult<Self> {
        backend.create_batting_stat(game_id, payload)
    }

    fn update(
        backend: &mut dyn StatsBackend,
        stat_id: i64,
        diff: &StatDiff<BattingField>,
    ) -> AppResult<Self> {
        backend.update_batting_stat(stat_id, diff)
    }

    fn delete(backend: &mut dyn StatsBackend, stat_id: i64) -> AppResult<()> {
        backend.delete_batting_stat(stat_id)
    }
}

impl GridLine for PitchingLine {
    const TAB: Tab = Tab::Pitching;

    fn fetch(backend: &mut dyn StatsBackend, game_id: i64) -> AppResult<StatSheet<Self>> {
        backend.pitching_stats(game_id)
    }

    fn create(
        backend: &mut dyn StatsBackend,
        game_id: i64,
        payload: &NewStatLine<PitchingField>,
    ) -> AppResult<Self> {
        backend.create_pitching_stat(game_id, payload)
    }

    fn update(
        backend: &mut dyn StatsBackend,
        stat_id: i64,
        diff: &StatDiff<PitchingField>,
    ) -> AppResult<Self> {
        backend.update_pitching_stat(stat_id, diff)
    }

    fn delete(backend: &mut dyn StatsBackend, stat_id: i64) -> AppResult<()> {
        backend.delete_pitching_stat(stat_id)
    }
}

pub(crate) type ErrorSink = Box<dyn FnMut(&AppError)>;

pub struct StatGrid<L: GridLine> {
    game_id: Option<i64>,
    tracker: RowTracker<L>,
    available_players: Vec<PlayerSummary>,
    form: NewStatLine<L::Field>,
    last_error: Option<String>,
    on_process_error: Option<ErrorSink>,
}

pub type BattingGrid = StatGrid<BattingLine>;
pub type PitchingGrid = StatGrid<PitchingLine>;

impl<L: GridLine> Default for StatGrid<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: GridLine> StatGrid<L> {
    pub fn new() -> Self {
        Self {
            game_id: None,
            tracker: RowTracker::default(),
            available_players: Vec::new(),
            form: NewStatLine::default(),
            last_error: None,
            on_process_error: None,
        }
    }

    /// Install the single callback every failure is reported through.
    pub fn on_process_error(&mut self, sink: impl FnMut(&AppError) + 'static) {
        self.on_process_error = Some(Box::new(sink));
    }

    fn report(&mut self, err: &AppError) {
        self.last_error = Some(err.to_string());
        if let Some(sink) = self.on_process_error.as_mut() {
            sink(err);
        }
    }

    fn reported<T>(&mut self, result: AppResult<T>) -> AppResult<T> {
        if let Err(e) = &result {
            self.report(e);
        }
        result
    }

    fn require_game(&self) -> AppResult<i64> {
        self.game_id
            .ok_or_else(|| AppError::Other(format!("no game loaded in the {} grid", L::KIND)))
    }

    // -----------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------

    /// Fetch rows for `game_id` and show them.
    pub fn load(&mut self, backend: &mut dyn StatsBackend, game_id: i64) -> AppResult<()> {
        let sheet = self.fetch(backend, game_id)?;
        self.apply(game_id, sheet);
        Ok(())
    }

    /// Fetch a game's sheet without touching what the grid shows.
    pub fn fetch(&mut self, backend: &mut dyn StatsBackend, game_id: i64) -> AppResult<StatSheet<L>> {
        let fetched = L::fetch(backend, game_id);
        self.reported(fetched)
    }

    /// Show a fetched sheet. Reloading the same game keeps a dirty row's
    /// edits on top of the fresh data; switching games starts clean.
    pub fn apply(&mut self, game_id: i64, sheet: StatSheet<L>) {
        if self.game_id != Some(game_id) {
            self.tracker = RowTracker::default();
            self.form = NewStatLine::default();
        }
        self.game_id = Some(game_id);
        self.tracker.refresh(sheet.stats);
        self.available_players = sheet.available_players;
    }

    pub fn game_id(&self) -> Option<i64> {
        self.game_id
    }

    pub fn tracker(&self) -> &RowTracker<L> {
        &self.tracker
    }

    pub fn rows(&self) -> Vec<&L> {
        self.tracker.display_rows()
    }

    pub fn row(&self, stat_id: i64) -> Option<&L> {
        self.tracker.display_row(stat_id)
    }

    /// Totals over the displayed rows, edits included.
    pub fn totals(&self) -> L {
        let rows: Vec<L> = self.rows().into_iter().cloned().collect();
        metrics::aggregate(self.game_id.unwrap_or(0), &rows)
    }

    /// Roster players without a line for this game.
    pub fn available_players(&self) -> Vec<&PlayerSummary> {
        self.available_players
            .iter()
            .filter(|p| !self.tracker.contains_player(p.roster_season_id))
            .collect()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    // -----------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------

    pub fn edit_cell(&mut self, stat_id: i64, field: L::Field, raw: &str) -> AppResult<()> {
        let result = self.tracker.apply_field_edit(stat_id, field, raw).map(|_| ());
        self.reported(result)
    }

    // -----------------------------------------------------------------
    // Add-row form
    // -----------------------------------------------------------------

    pub fn form(&self) -> &NewStatLine<L::Field> {
        &self.form
    }

    pub fn reset_form(&mut self) {
        self.form = NewStatLine::default();
    }

    pub fn select_player(&mut self, roster_season_id: i64) {
        self.form.roster_season_id = Some(roster_season_id);
    }

    pub fn set_form_value(&mut self, field: L::Field, raw: &str) -> AppResult<()> {
        let value = RowTracker::<L>::parse_edit(field, raw);
        let value = self.reported(value)?;
        self.form.values.insert(field, value);
        Ok(())
    }

    /// Submit the add-row form.
    pub fn submit_form(&mut self, backend: &mut dyn StatsBackend) -> AppResult<&L> {
        let payload = self.form.clone();
        self.create_stat(backend, payload)
    }

    /// Add a line for a player who has none yet. Duplicates are refused
    /// locally before any request goes out.
    pub fn create_stat(
        &mut self,
        backend: &mut dyn StatsBackend,
        payload: NewStatLine<L::Field>,
    ) -> AppResult<&L> {
        let checked = self.check_new_line(&payload);
        let game_id = self.reported(checked)?;
        let created = L::create(backend, game_id, &payload);
        let created = self.reported(created)?;
        let stat_id = created.stat_id();
        self.tracker.insert_front(created);
        self.form = NewStatLine::default();
        self.last_error = None;
        self.tracker
            .display_row(stat_id)
            .ok_or_else(|| AppError::NotFound(format!("{} stat #{stat_id}", L::KIND)))
    }

    fn check_new_line(&self, payload: &NewStatLine<L::Field>) -> AppResult<i64> {
        let game_id = self.require_game()?;
        let player = payload
            .roster_season_id
            .filter(|id| *id > 0)
            .ok_or(AppError::MissingPlayer)?;
        if self.tracker.contains_player(player) {
            return Err(AppError::DuplicatePlayer(player));
        }
        Ok(game_id)
    }

    /// Send `diff` for `stat_id`. The tracker baseline moves only when the
    /// request succeeds; a failed save leaves every edit in place.
    pub fn update_stat(
        &mut self,
        backend: &mut dyn StatsBackend,
        stat_id: i64,
        diff: &StatDiff<L::Field>,
    ) -> AppResult<()> {
        if diff.is_empty() {
            return Ok(());
        }
        let saved = L::update(backend, stat_id, diff);
        let saved = self.reported(saved)?;
        self.tracker.commit(stat_id, saved);
        self.last_error = None;
        Ok(())
    }

    /// Delete immediately, no dirty-state protocol involved. A row already
    /// gone server-side is dropped locally as well. Pending edits on the
    /// target row are dropped whether or not the delete succeeds.
    pub fn delete_stat(&mut self, backend: &mut dyn StatsBackend, stat_id: i64) -> AppResult<()> {
        match L::delete(backend, stat_id) {
            Ok(()) => {
                self.tracker.remove(stat_id);
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                if e.class() == ErrorClass::ConflictOrNotFound {
                    self.tracker.remove(stat_id);
                } else {
                    self.tracker.discard(stat_id);
                }
                self.report(&e);
                Err(e)
            }
        }
    }
}

impl<L: GridLine> DirtyRowHandle for StatGrid<L> {
    fn has_dirty_row(&self) -> bool {
        self.tracker.dirty_row_id().is_some()
    }

    fn dirty_row_info(&self) -> Option<DirtyRowInfo> {
        let slot = self.tracker.dirty_slot()?;
        Some(DirtyRowInfo {
            stat_id: slot.row_id,
            subject_label: slot.edited.player_name().to_string(),
            tab: L::TAB,
            fields: slot.fields.iter().map(|f| L::label(*f).to_string()).collect(),
        })
    }

    fn save_dirty_row(&mut self, backend: &mut dyn StatsBackend) -> AppResult<bool> {
        let Some((stat_id, diff)) = self.tracker.pending_diff() else {
            return Ok(false);
        };
        self.update_stat(backend, stat_id, &diff)?;
        Ok(true)
    }

    fn discard_dirty_row(&mut self) -> bool {
        match self.tracker.dirty_row_id() {
            Some(id) => self.tracker.discard(id),
            None => false,
        }
    }
}
