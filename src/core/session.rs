//! Per-game stats view: the parent that owns the batting grid, the pitching
//! grid and the recap tab, and routes every navigation through one
//! arbitrator.

use super::arbitrator::{Arbitrator, DecisionResolver, Transition};
use super::backend::{RoleResolver, StatsBackend};
use super::grid::{BattingGrid, DirtyRowHandle, PitchingGrid};
use super::recap::RecapEditor;
use crate::errors::{AppError, AppResult};
use crate::models::game::{Game, Team};
use crate::models::prompt::{PromptReason, Tab};
use crate::models::stat_line::{
    BattingField, BattingLine, NewStatLine, PitchingField, PitchingLine, StatLine,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFocus {
    Batting { stat_id: i64, field: BattingField },
    Pitching { stat_id: i64, field: PitchingField },
    Recap,
}

pub struct GameStatsSession<B: StatsBackend> {
    backend: B,
    account: String,
    team: Team,
    can_manage: bool,
    game_id: Option<i64>,
    tab: Tab,
    editing: bool,
    focus: Option<CellFocus>,
    batting: BattingGrid,
    pitching: PitchingGrid,
    recap: RecapEditor,
    arbiter: Arbitrator,
}

impl<B: StatsBackend> GameStatsSession<B> {
    /// Open the view for `team_id`. Permissions are resolved once here.
    pub fn open(
        backend: B,
        roles: &mut dyn RoleResolver,
        account: &str,
        team_id: i64,
    ) -> AppResult<Self> {
        let can_manage = roles.can_manage_stats(account, team_id)?;
        Self::with_permission(backend, account, team_id, can_manage)
    }

    fn with_permission(
        mut backend: B,
        account: &str,
        team_id: i64,
        can_manage: bool,
    ) -> AppResult<Self> {
        let team = backend.team(team_id)?;
        Ok(Self {
            backend,
            account: account.to_string(),
            team,
            can_manage,
            game_id: None,
            tab: Tab::Batting,
            editing: false,
            focus: None,
            batting: BattingGrid::new(),
            pitching: PitchingGrid::new(),
            recap: RecapEditor::new(),
            arbiter: Arbitrator::new(),
        })
    }

    /// Route grid and recap failures to one callback.
    pub fn on_process_error<F>(&mut self, sink: F)
    where
        F: FnMut(&AppError) + Clone + 'static,
    {
        self.batting.on_process_error(sink.clone());
        self.pitching.on_process_error(sink.clone());
        self.recap.on_process_error(sink);
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn backend(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn team(&self) -> &Team {
        &self.team
    }

    pub fn team_id(&self) -> i64 {
        self.team.id
    }

    /// Completed games of the team's season, the ones stats can be entered for.
    pub fn completed_games(&mut self) -> AppResult<Vec<Game>> {
        self.backend
            .list_completed_games(self.team.id, &self.team.season)
    }

    pub fn can_manage(&self) -> bool {
        self.can_manage
    }

    pub fn game_id(&self) -> Option<i64> {
        self.game_id
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn focus(&self) -> Option<CellFocus> {
        self.focus
    }

    pub fn batting(&self) -> &BattingGrid {
        &self.batting
    }

    pub fn pitching(&self) -> &PitchingGrid {
        &self.pitching
    }

    pub fn recap(&self) -> &RecapEditor {
        &self.recap
    }

    pub fn arbiter(&self) -> &Arbitrator {
        &self.arbiter
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.batting.has_dirty_row() || self.pitching.has_dirty_row() || self.recap.has_dirty_row()
    }

    // -----------------------------------------------------------------
    // Arbitration
    // -----------------------------------------------------------------

    fn guard(
        &mut self,
        reason: PromptReason,
        resolver: &mut dyn DecisionResolver,
    ) -> AppResult<Transition> {
        let Self {
            backend,
            batting,
            pitching,
            recap,
            arbiter,
            ..
        } = self;
        let handles: [&mut dyn DirtyRowHandle; 3] = [batting, pitching, recap];
        for handle in handles {
            if handle.has_dirty_row()
                && arbiter.guard(reason, handle, &mut *backend, &mut *resolver)? == Transition::Stay
            {
                return Ok(Transition::Stay);
            }
        }
        Ok(Transition::Proceed)
    }

    fn require_editing(&self) -> AppResult<()> {
        if self.editing { Ok(()) } else { Err(AppError::NotEditing) }
    }

    // -----------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------

    /// Select a completed game. Re-selecting the current game refreshes its
    /// data and keeps pending edits.
    pub fn select_game(
        &mut self,
        game_id: i64,
        resolver: &mut dyn DecisionResolver,
    ) -> AppResult<Transition> {
        if self.game_id == Some(game_id) {
            self.refresh()?;
            return Ok(Transition::Proceed);
        }

        let game = self.backend.game(game_id)?;
        if game.team_id != self.team.id {
            return Err(AppError::NotFound(format!(
                "game #{game_id} for team #{}",
                self.team.id
            )));
        }
        if !game.completed {
            return Err(AppError::validation("game", "stats can only be entered for completed games"));
        }

        // Nothing moves until all three are fetched.
        let batting = self.batting.fetch(&mut self.backend, game_id)?;
        let pitching = self.pitching.fetch(&mut self.backend, game_id)?;
        let recap = self.recap.fetch(&mut self.backend, game_id)?;

        if self.guard(PromptReason::GameChange, resolver)? == Transition::Stay {
            return Ok(Transition::Stay);
        }

        self.batting.apply(game_id, batting);
        self.pitching.apply(game_id, pitching);
        self.recap.apply(game_id, recap);
        self.game_id = Some(game_id);
        self.focus = None;
        Ok(Transition::Proceed)
    }

    /// Refetch everything for the current game.
    pub fn refresh(&mut self) -> AppResult<()> {
        let Some(game_id) = self.game_id else {
            return Ok(());
        };
        let batting = self.batting.fetch(&mut self.backend, game_id)?;
        let pitching = self.pitching.fetch(&mut self.backend, game_id)?;
        let recap = self.recap.fetch(&mut self.backend, game_id)?;
        self.batting.apply(game_id, batting);
        self.pitching.apply(game_id, pitching);
        self.recap.apply(game_id, recap);
        self.drop_stale_focus();
        Ok(())
    }

    pub fn switch_tab(
        &mut self,
        tab: Tab,
        resolver: &mut dyn DecisionResolver,
    ) -> AppResult<Transition> {
        if tab == self.tab {
            return Ok(Transition::Proceed);
        }
        if self.guard(PromptReason::TabChange, resolver)? == Transition::Stay {
            return Ok(Transition::Stay);
        }
        self.tab = tab;
        self.focus = None;
        Ok(Transition::Proceed)
    }

    pub fn enter_edit_mode(&mut self) -> AppResult<()> {
        if !self.can_manage {
            return Err(AppError::PermissionDenied {
                account: self.account.clone(),
                team: self.team.id,
            });
        }
        self.editing = true;
        Ok(())
    }

    pub fn exit_edit_mode(&mut self, resolver: &mut dyn DecisionResolver) -> AppResult<Transition> {
        if !self.editing {
            return Ok(Transition::Proceed);
        }
        if self.guard(PromptReason::ExitEdit, resolver)? == Transition::Stay {
            return Ok(Transition::Stay);
        }
        self.editing = false;
        self.focus = None;
        Ok(Transition::Proceed)
    }

    /// Put a cell of the active grid in edit focus. Moving to another row
    /// while one is dirty goes through the arbitrator.
    pub fn focus_cell(
        &mut self,
        stat_id: i64,
        field: &str,
        resolver: &mut dyn DecisionResolver,
    ) -> AppResult<Transition> {
        self.require_editing()?;
        let target = match self.tab {
            Tab::Batting => {
                let field = parse_field::<BattingLine>(field)?;
                self.batting
                    .row(stat_id)
                    .ok_or_else(|| AppError::NotFound(format!("batting stat #{stat_id}")))?;
                CellFocus::Batting { stat_id, field }
            }
            Tab::Pitching => {
                let field = parse_field::<PitchingLine>(field)?;
                self.pitching
                    .row(stat_id)
                    .ok_or_else(|| AppError::NotFound(format!("pitching stat #{stat_id}")))?;
                CellFocus::Pitching { stat_id, field }
            }
            Tab::Recap => CellFocus::Recap,
        };

        let dirty_elsewhere = match self.tab {
            Tab::Batting => self.batting.tracker().dirty_row_id().is_some_and(|d| d != stat_id),
            Tab::Pitching => self.pitching.tracker().dirty_row_id().is_some_and(|d| d != stat_id),
            Tab::Recap => false,
        };
        if dirty_elsewhere && self.guard(PromptReason::SwitchRow, resolver)? == Transition::Stay {
            return Ok(Transition::Stay);
        }

        self.focus = Some(target);
        Ok(Transition::Proceed)
    }

    /// Type a value into the focused cell.
    pub fn edit_focused(&mut self, raw: &str) -> AppResult<()> {
        self.require_editing()?;
        match self.focus.ok_or(AppError::NoFocus)? {
            CellFocus::Batting { stat_id, field } => self.batting.edit_cell(stat_id, field, raw),
            CellFocus::Pitching { stat_id, field } => self.pitching.edit_cell(stat_id, field, raw),
            CellFocus::Recap => {
                self.recap.set_text(raw);
                Ok(())
            }
        }
    }

    /// Replace the recap text. Moves to the recap tab first, so a dirty
    /// stat row is settled before the recap can become dirty.
    pub fn edit_recap(
        &mut self,
        text: &str,
        resolver: &mut dyn DecisionResolver,
    ) -> AppResult<Transition> {
        self.require_editing()?;
        if self.switch_tab(Tab::Recap, resolver)? == Transition::Stay {
            return Ok(Transition::Stay);
        }
        self.recap.set_text(text);
        Ok(Transition::Proceed)
    }

    // -----------------------------------------------------------------
    // Explicit save / discard
    // -----------------------------------------------------------------

    /// Save whatever is dirty. `Ok(false)` when nothing was.
    pub fn save(&mut self) -> AppResult<bool> {
        let Self {
            backend,
            batting,
            pitching,
            recap,
            ..
        } = self;
        let handles: [&mut dyn DirtyRowHandle; 3] = [batting, pitching, recap];
        let mut saved = false;
        for handle in handles {
            saved |= handle.save_dirty_row(&mut *backend)?;
        }
        Ok(saved)
    }

    pub fn discard(&mut self) -> bool {
        let batting = self.batting.discard_dirty_row();
        let pitching = self.pitching.discard_dirty_row();
        let recap = self.recap.discard_dirty_row();
        batting || pitching || recap
    }

    // -----------------------------------------------------------------
    // Add / delete
    // -----------------------------------------------------------------

    pub fn add_batting_line(&mut self, payload: NewStatLine<BattingField>) -> AppResult<i64> {
        self.require_editing()?;
        self.batting
            .create_stat(&mut self.backend, payload)
            .map(|l| l.stat_id())
    }

    pub fn add_pitching_line(&mut self, payload: NewStatLine<PitchingField>) -> AppResult<i64> {
        self.require_editing()?;
        self.pitching
            .create_stat(&mut self.backend, payload)
            .map(|l| l.stat_id())
    }

    /// Fill the add-row form of the active grid from `name=value` pairs
    /// and submit it. Returns the new line's id.
    pub fn submit_new_line(
        &mut self,
        roster_season_id: i64,
        values: &[(&str, &str)],
    ) -> AppResult<i64> {
        self.require_editing()?;
        match self.tab {
            Tab::Batting => {
                self.batting.reset_form();
                self.batting.select_player(roster_season_id);
                for (name, raw) in values {
                    let field = parse_field::<BattingLine>(name)?;
                    self.batting.set_form_value(field, raw)?;
                }
                self.batting
                    .submit_form(&mut self.backend)
                    .map(|l| l.stat_id())
            }
            Tab::Pitching => {
                self.pitching.reset_form();
                self.pitching.select_player(roster_season_id);
                for (name, raw) in values {
                    let field = parse_field::<PitchingLine>(name)?;
                    self.pitching.set_form_value(field, raw)?;
                }
                self.pitching
                    .submit_form(&mut self.backend)
                    .map(|l| l.stat_id())
            }
            Tab::Recap => Err(AppError::validation("tab", "the recap has no stat lines")),
        }
    }

    /// Delete a line in the active tab right away.
    pub fn delete_line(&mut self, stat_id: i64) -> AppResult<()> {
        self.require_editing()?;
        let result = match self.tab {
            Tab::Batting => self.batting.delete_stat(&mut self.backend, stat_id),
            Tab::Pitching => self.pitching.delete_stat(&mut self.backend, stat_id),
            Tab::Recap => return Err(AppError::validation("tab", "the recap has no lines to delete")),
        };
        self.drop_stale_focus();
        result
    }

    fn drop_stale_focus(&mut self) {
        let stale = match self.focus {
            Some(CellFocus::Batting { stat_id, .. }) => self.batting.row(stat_id).is_none(),
            Some(CellFocus::Pitching { stat_id, .. }) => self.pitching.row(stat_id).is_none(),
            _ => false,
        };
        if stale {
            self.focus = None;
        }
    }
}

impl<B: StatsBackend + RoleResolver> GameStatsSession<B> {
    /// Open with the backend itself answering the permission check.
    pub fn open_resolved(mut backend: B, account: &str, team_id: i64) -> AppResult<Self> {
        let can_manage = backend.can_manage_stats(account, team_id)?;
        Self::with_permission(backend, account, team_id, can_manage)
    }
}

fn parse_field<L: StatLine>(name: &str) -> AppResult<L::Field> {
    L::parse_field(name).ok_or_else(|| {
        let known: Vec<&str> = L::fields().iter().map(|f| L::label(*f)).collect();
        AppError::validation(
            "field",
            format!("unknown {} field '{name}' (use one of {})", L::KIND, known.join(", ")),
        )
    })
}
