use rstatbook::core::tracker::RowTracker;
use rstatbook::errors::{AppError, ErrorClass};
use rstatbook::models::stat_line::{
    BattingField, BattingLine, FieldValue, PitchingField, PitchingLine, StatLine,
};

mod common;
use common::batting;

fn tracker() -> RowTracker<BattingLine> {
    RowTracker::new(vec![
        batting(1, 10, 1, "Mia Lopez", 4, 2),
        batting(2, 10, 2, "Sam Park", 3, 1),
    ])
}

#[test]
fn test_invalid_input_leaves_row_unchanged() {
    let mut t = tracker();
    for raw in ["-1", "abc", "NaN", "inf", "-inf", ""] {
        let err = t.apply_field_edit(1, BattingField::Hits, raw).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Validation, "input {raw:?}");
    }
    assert_eq!(t.dirty_row_id(), None);
    assert_eq!(t.display_row(1).unwrap().hits, 2);
}

#[test]
fn test_counts_are_truncated() {
    let mut t = tracker();
    let row = t.apply_field_edit(1, BattingField::Hits, "3.7").unwrap();
    assert_eq!(row.hits, 3);
}

#[test]
fn test_innings_edit_rejects_bad_outs() {
    let mut t: RowTracker<PitchingLine> =
        RowTracker::new(vec![PitchingLine::blank(5, 10, 3, "Jo Reyes")]);
    assert!(t.apply_field_edit(5, PitchingField::InningsPitched, "4.3").is_err());
    let row = t
        .apply_field_edit(5, PitchingField::InningsPitched, "4.2")
        .unwrap();
    assert_eq!(row.innings_pitched.outs(), 14);
    assert_eq!(row.innings_pitched.to_string(), "4.2");
}

#[test]
fn test_dirty_only_while_different() {
    let mut t = tracker();
    t.apply_field_edit(1, BattingField::Hits, "3").unwrap();
    assert!(t.is_dirty(1));
    let (id, diff) = t.pending_diff().unwrap();
    assert_eq!(id, 1);
    assert_eq!(diff.get(&BattingField::Hits), Some(&FieldValue::Count(3)));
    assert_eq!(diff.len(), 1);

    // typing the original value back clears the dirty state
    t.apply_field_edit(1, BattingField::Hits, "2").unwrap();
    assert!(!t.is_dirty(1));
    assert!(t.pending_diff().is_none());
}

#[test]
fn test_compute_dirty_fields_lists_changes() {
    let t = tracker();
    let mut edited = t.original(1).unwrap().clone();
    assert!(t.compute_dirty_fields(&edited).is_empty());
    edited.walks = 2;
    edited.at_bats = 5;
    let fields = t.compute_dirty_fields(&edited);
    assert_eq!(
        fields.into_iter().collect::<Vec<_>>(),
        vec![BattingField::AtBats, BattingField::Walks]
    );
}

#[test]
fn test_discard_restores_original() {
    let mut t = tracker();
    let original = t.original(1).unwrap().clone();
    t.apply_field_edit(1, BattingField::Hits, "4").unwrap();
    t.apply_field_edit(1, BattingField::Runs, "2").unwrap();
    assert!(t.discard(1));
    assert_eq!(t.display_row(1), Some(&original));
    assert!(!t.discard(1));
}

#[test]
fn test_only_one_dirty_row() {
    let mut t = tracker();
    t.apply_field_edit(1, BattingField::Hits, "3").unwrap();
    let err = t.apply_field_edit(2, BattingField::Hits, "2").unwrap_err();
    assert!(matches!(err, AppError::DirtyRowConflict { dirty: 1 }));
    assert_eq!(t.dirty_row_id(), Some(1));
    assert_eq!(t.display_row(2).unwrap().hits, 1);

    let mut other = t.original(2).unwrap().clone();
    other.runs = 1;
    assert!(t.mark_dirty(other).is_err());
    assert_eq!(t.dirty_row_id(), Some(1));
}

#[test]
fn test_commit_moves_baseline() {
    let mut t = tracker();
    t.apply_field_edit(1, BattingField::Hits, "3").unwrap();
    let saved = t.display_row(1).unwrap().clone();
    t.commit(1, saved);
    assert_eq!(t.dirty_row_id(), None);
    assert_eq!(t.original(1).unwrap().hits, 3);
}

#[test]
fn test_refresh_keeps_edits_on_fresh_rows() {
    let mut t = tracker();
    t.apply_field_edit(1, BattingField::Hits, "3").unwrap();

    // someone else changed at-bats meanwhile
    t.refresh(vec![
        batting(1, 10, 1, "Mia Lopez", 5, 2),
        batting(2, 10, 2, "Sam Park", 3, 1),
    ]);
    let row = t.display_row(1).unwrap();
    assert_eq!(row.at_bats, 5);
    assert_eq!(row.hits, 3);
    assert!(t.is_dirty(1));

    // the server caught up with the edit: nothing left to save
    t.refresh(vec![batting(1, 10, 1, "Mia Lopez", 5, 3)]);
    assert!(!t.is_dirty(1));

    // a dirty row that disappeared loses its edits
    t.apply_field_edit(1, BattingField::Runs, "1").unwrap();
    t.refresh(vec![batting(2, 10, 2, "Sam Park", 3, 1)]);
    assert_eq!(t.dirty_row_id(), None);
    assert_eq!(t.len(), 1);
}

#[test]
fn test_remove_clears_dirty_state() {
    let mut t = tracker();
    t.apply_field_edit(2, BattingField::Walks, "1").unwrap();
    let removed = t.remove(2).unwrap();
    assert_eq!(removed.stat_id(), 2);
    assert_eq!(t.dirty_row_id(), None);
    assert!(!t.contains_player(2));
}

#[test]
fn test_edit_unknown_row() {
    let mut t = tracker();
    let err = t.apply_field_edit(99, BattingField::Hits, "1").unwrap_err();
    assert_eq!(err.class(), ErrorClass::ConflictOrNotFound);
}
