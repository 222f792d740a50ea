//! Row dirty-state tracking for one stat grid.
//!
//! The tracker keeps the last known saved rows (the baseline) and a single
//! slot holding the edited copy of at most one row. A row is dirty while the
//! slot holds it with a non-empty set of changed fields.

use crate::errors::{AppError, AppResult};
use crate::models::innings::InningsPitched;
use crate::models::stat_line::{FieldKind, FieldValue, StatDiff, StatLine};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct DirtySlot<L: StatLine> {
    pub row_id: i64,
    pub edited: L,
    pub fields: BTreeSet<L::Field>,
}

#[derive(Debug, Clone)]
pub struct RowTracker<L: StatLine> {
    rows: Vec<L>,
    slot: Option<DirtySlot<L>>,
}

impl<L: StatLine> Default for RowTracker<L> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<L: StatLine> RowTracker<L> {
    pub fn new(rows: Vec<L>) -> Self {
        Self { rows, slot: None }
    }

    /// Validate a raw cell value typed by the user.
    pub fn parse_edit(field: L::Field, raw: &str) -> AppResult<FieldValue> {
        let trimmed = raw.trim();
        let value: f64 = trimmed.parse().map_err(|_| {
            AppError::validation(field.to_string(), format!("'{trimmed}' is not a number"))
        })?;
        Self::validate(field, value)
    }

    /// Reject negative and non-finite numbers; truncate counts.
    pub fn validate(field: L::Field, value: f64) -> AppResult<FieldValue> {
        if !value.is_finite() {
            return Err(AppError::validation(field.to_string(), "must be a finite number"));
        }
        if value < 0.0 {
            return Err(AppError::validation(field.to_string(), "must not be negative"));
        }
        match L::field_kind(field) {
            FieldKind::Count => {
                let whole = value.trunc();
                if whole > f64::from(u32::MAX) {
                    return Err(AppError::validation(field.to_string(), "value is too large"));
                }
                Ok(FieldValue::Count(whole as u32))
            }
            FieldKind::Innings => InningsPitched::from_display(value)
                .map(FieldValue::Innings)
                .ok_or_else(|| {
                    AppError::validation(
                        field.to_string(),
                        "innings must end in .0, .1 or .2 (outs in the inning)",
                    )
                }),
        }
    }

    // -----------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------

    /// Baseline row as last fetched or saved.
    pub fn original(&self, row_id: i64) -> Option<&L> {
        self.rows.iter().find(|r| r.stat_id() == row_id)
    }

    /// Row as the user currently sees it (edited copy when dirty).
    pub fn display_row(&self, row_id: i64) -> Option<&L> {
        match &self.slot {
            Some(slot) if slot.row_id == row_id => Some(&slot.edited),
            _ => self.original(row_id),
        }
    }

    pub fn display_rows(&self) -> Vec<&L> {
        self.rows
            .iter()
            .map(|r| self.display_row(r.stat_id()).unwrap_or(r))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains_player(&self, roster_season_id: i64) -> bool {
        self.rows
            .iter()
            .any(|r| r.roster_season_id() == roster_season_id)
    }

    pub fn dirty_row_id(&self) -> Option<i64> {
        self.slot.as_ref().map(|s| s.row_id)
    }

    pub fn dirty_slot(&self) -> Option<&DirtySlot<L>> {
        self.slot.as_ref()
    }

    pub fn is_dirty(&self, row_id: i64) -> bool {
        self.dirty_row_id() == Some(row_id)
    }

    /// Changed fields and their edited values, ready to send as an update.
    pub fn pending_diff(&self) -> Option<(i64, StatDiff<L::Field>)> {
        self.slot.as_ref().map(|slot| {
            let diff = slot
                .fields
                .iter()
                .map(|f| (*f, slot.edited.get(*f)))
                .collect();
            (slot.row_id, diff)
        })
    }

    // -----------------------------------------------------------------
    // Edit protocol
    // -----------------------------------------------------------------

    pub fn apply_field_edit(&mut self, row_id: i64, field: L::Field, raw: &str) -> AppResult<&L> {
        let value = Self::parse_edit(field, raw)?;
        self.apply_value(row_id, field, value)
    }

    pub fn apply_value(&mut self, row_id: i64, field: L::Field, value: FieldValue) -> AppResult<&L> {
        if let Some(dirty) = self.dirty_row_id()
            && dirty != row_id
        {
            return Err(AppError::DirtyRowConflict { dirty });
        }
        let mut candidate = self
            .display_row(row_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("{} stat #{row_id}", L::KIND)))?;
        candidate.set(field, value);
        self.mark_dirty(candidate)?;
        self.display_row(row_id)
            .ok_or_else(|| AppError::NotFound(format!("{} stat #{row_id}", L::KIND)))
    }

    /// Fields of `row` that differ from its original snapshot.
    pub fn compute_dirty_fields(&self, row: &L) -> BTreeSet<L::Field> {
        let Some(original) = self.original(row.stat_id()) else {
            return BTreeSet::new();
        };
        L::fields()
            .iter()
            .copied()
            .filter(|f| original.get(*f) != row.get(*f))
            .collect()
    }

    /// Make `row` the dirty row if it differs from its original, or clear the
    /// slot when the edits were reverted by hand. Another dirty row is never
    /// replaced here; that has to be resolved first.
    pub fn mark_dirty(&mut self, row: L) -> AppResult<()> {
        let row_id = row.stat_id();
        if self.original(row_id).is_none() {
            return Err(AppError::NotFound(format!("{} stat #{row_id}", L::KIND)));
        }
        let fields = self.compute_dirty_fields(&row);

        if fields.is_empty() {
            if self.is_dirty(row_id) {
                self.slot = None;
            }
            return Ok(());
        }

        if let Some(dirty) = self.dirty_row_id()
            && dirty != row_id
        {
            return Err(AppError::DirtyRowConflict { dirty });
        }

        self.slot = Some(DirtySlot {
            row_id,
            edited: row,
            fields,
        });
        Ok(())
    }

    /// Drop the edits of `row_id`. Returns whether anything was discarded.
    pub fn discard(&mut self, row_id: i64) -> bool {
        if self.is_dirty(row_id) {
            self.slot = None;
            true
        } else {
            false
        }
    }

    /// The save went through: `saved` becomes the new baseline.
    pub fn commit(&mut self, row_id: i64, saved: L) {
        if let Some(slot) = self.rows.iter_mut().find(|r| r.stat_id() == row_id) {
            *slot = saved;
        }
        if self.is_dirty(row_id) {
            self.slot = None;
        }
    }

    // -----------------------------------------------------------------
    // Row set changes
    // -----------------------------------------------------------------

    pub fn insert_front(&mut self, row: L) {
        self.rows.insert(0, row);
    }

    /// Remove a row; its dirty state, if any, goes with it.
    pub fn remove(&mut self, row_id: i64) -> Option<L> {
        let idx = self.rows.iter().position(|r| r.stat_id() == row_id)?;
        if self.is_dirty(row_id) {
            self.slot = None;
        }
        Some(self.rows.remove(idx))
    }

    /// Replace the baseline with freshly fetched rows. A dirty row that is
    /// still present keeps its edited fields on top of the fresh values; one
    /// that vanished loses its dirty state.
    pub fn refresh(&mut self, rows: Vec<L>) {
        self.rows = rows;
        let Some(slot) = self.slot.take() else {
            return;
        };
        let Some(fresh) = self.original(slot.row_id).cloned() else {
            return;
        };
        let mut overlaid = fresh;
        for f in &slot.fields {
            overlaid.set(*f, slot.edited.get(*f));
        }
        let fields = self.compute_dirty_fields(&overlaid);
        if !fields.is_empty() {
            self.slot = Some(DirtySlot {
                row_id: slot.row_id,
                edited: overlaid,
                fields,
            });
        }
    }
}
