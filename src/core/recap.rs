//! Game recap tab: one free-text value per game.

use super::backend::StatsBackend;
use super::grid::{DirtyRowHandle, ErrorSink};
use crate::errors::{AppError, AppResult};
use crate::models::prompt::{DirtyRowInfo, Tab};

#[derive(Default)]
pub struct RecapEditor {
    game_id: Option<i64>,
    original: String,
    edited: Option<String>,
    on_process_error: Option<ErrorSink>,
}

impl RecapEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same callback the grids report through.
    pub fn on_process_error(&mut self, sink: impl FnMut(&AppError) + 'static) {
        self.on_process_error = Some(Box::new(sink));
    }

    fn reported<T>(&mut self, result: AppResult<T>) -> AppResult<T> {
        if let Err(e) = &result
            && let Some(sink) = self.on_process_error.as_mut()
        {
            sink(e);
        }
        result
    }

    pub fn load(&mut self, backend: &mut dyn StatsBackend, game_id: i64) -> AppResult<()> {
        let text = self.fetch(backend, game_id)?;
        self.apply(game_id, text);
        Ok(())
    }

    pub fn fetch(&mut self, backend: &mut dyn StatsBackend, game_id: i64) -> AppResult<String> {
        let fetched = backend.game_recap(game_id);
        self.reported(fetched)
    }

    /// Show fetched text. Pending edits survive a reload of the same game.
    pub fn apply(&mut self, game_id: i64, text: String) {
        if self.game_id != Some(game_id) {
            self.edited = None;
        }
        self.game_id = Some(game_id);
        self.original = text;
        if self.edited.as_deref() == Some(self.original.as_str()) {
            self.edited = None;
        }
    }

    pub fn text(&self) -> &str {
        self.edited.as_deref().unwrap_or(&self.original)
    }

    pub fn set_text(&mut self, text: &str) {
        if text == self.original {
            self.edited = None;
        } else {
            self.edited = Some(text.to_string());
        }
    }
}

impl DirtyRowHandle for RecapEditor {
    fn has_dirty_row(&self) -> bool {
        self.edited.is_some()
    }

    fn dirty_row_info(&self) -> Option<DirtyRowInfo> {
        self.edited.as_ref()?;
        Some(DirtyRowInfo {
            stat_id: self.game_id.unwrap_or(0),
            subject_label: "Game recap".to_string(),
            tab: Tab::Recap,
            fields: vec!["recap".to_string()],
        })
    }

    fn save_dirty_row(&mut self, backend: &mut dyn StatsBackend) -> AppResult<bool> {
        let Some(text) = self.edited.clone() else {
            return Ok(false);
        };
        let game_id = self
            .game_id
            .ok_or_else(|| AppError::Other("no game loaded in the recap tab".into()))?;
        let saved = backend.save_game_recap(game_id, &text);
        self.reported(saved)?;
        self.original = text;
        self.edited = None;
        Ok(true)
    }

    fn discard_dirty_row(&mut self) -> bool {
        self.edited.take().is_some()
    }
}
