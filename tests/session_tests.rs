use rstatbook::core::arbitrator::Transition;
use rstatbook::core::grid::DirtyRowHandle;
use rstatbook::core::session::{CellFocus, GameStatsSession};
use rstatbook::errors::{AppError, ErrorClass};
use rstatbook::models::prompt::{Decision, PromptReason, Tab};
use rstatbook::models::stat_line::{BattingField, NewStatLine, PitchingField};
use std::cell::RefCell;
use std::rc::Rc;

mod common;
use common::{
    GAME, JO, JO_PITCHING, MIA, MIA_LINE, MemoryBackend, OTHER_GAME, SAM_LINE, Scripted,
    UNPLAYED_GAME, count,
};

fn open_as(account: &str) -> GameStatsSession<MemoryBackend> {
    let mut session =
        GameStatsSession::open_resolved(MemoryBackend::seeded(), account, common::TEAM).unwrap();
    session.select_game(GAME, &mut Scripted::default()).unwrap();
    session
}

fn editing() -> GameStatsSession<MemoryBackend> {
    let mut session = open_as("coach");
    session.enter_edit_mode().unwrap();
    session
}

/// Focus `field` of `stat_id` and type `raw` into it.
fn type_into(session: &mut GameStatsSession<MemoryBackend>, stat_id: i64, field: &str, raw: &str) {
    let t = session
        .focus_cell(stat_id, field, &mut Scripted::default())
        .unwrap();
    assert_eq!(t, Transition::Proceed);
    session.edit_focused(raw).unwrap();
}

#[test]
fn test_select_game_loads_both_grids() {
    let session = open_as("coach");
    assert_eq!(session.game_id(), Some(GAME));
    assert_eq!(session.batting().rows().len(), 2);
    assert_eq!(session.pitching().rows().len(), 1);
    assert_eq!(session.batting().totals().at_bats, 7);
    assert_eq!(
        session.pitching().row(JO_PITCHING).unwrap().innings_pitched.to_string(),
        "6.2"
    );
    // Jo has no batting line yet
    let available: Vec<i64> = session
        .batting()
        .available_players()
        .iter()
        .map(|p| p.roster_season_id)
        .collect();
    assert_eq!(available, vec![JO]);
}

#[test]
fn test_only_completed_games_open() {
    let mut session = open_as("coach");
    let err = session
        .select_game(UNPLAYED_GAME, &mut Scripted::default())
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Validation);
    assert_eq!(session.game_id(), Some(GAME));

    let games = session.completed_games().unwrap();
    assert_eq!(games.len(), 2);
}

#[test]
fn test_edit_mode_needs_permission() {
    let mut session = open_as("visitor");
    assert!(!session.can_manage());
    let err = session.enter_edit_mode().unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied { .. }));

    let err = session
        .focus_cell(MIA_LINE, "H", &mut Scripted::default())
        .unwrap_err();
    assert!(matches!(err, AppError::NotEditing));
}

#[test]
fn test_switch_row_discard() {
    let mut session = editing();
    type_into(&mut session, MIA_LINE, "H", "3");
    assert!(session.has_unsaved_changes());

    let mut resolver = Scripted::new(&[Decision::Discard]);
    let t = session.focus_cell(SAM_LINE, "BB", &mut resolver).unwrap();

    assert_eq!(t, Transition::Proceed);
    assert_eq!(resolver.asked[0].0.reason, PromptReason::SwitchRow);
    assert_eq!(session.batting().row(MIA_LINE).unwrap().hits, 2);
    assert!(!session.has_unsaved_changes());
    assert_eq!(
        session.focus(),
        Some(CellFocus::Batting {
            stat_id: SAM_LINE,
            field: BattingField::Walks
        })
    );
}

#[test]
fn test_switch_row_cancel_keeps_focus_and_edits() {
    let mut session = editing();
    type_into(&mut session, MIA_LINE, "H", "3");

    let t = session
        .focus_cell(SAM_LINE, "BB", &mut Scripted::new(&[Decision::Cancel]))
        .unwrap();
    assert_eq!(t, Transition::Stay);
    assert_eq!(
        session.focus(),
        Some(CellFocus::Batting {
            stat_id: MIA_LINE,
            field: BattingField::Hits
        })
    );
    assert_eq!(session.batting().row(MIA_LINE).unwrap().hits, 3);
}

#[test]
fn test_same_row_needs_no_prompt() {
    let mut session = editing();
    type_into(&mut session, MIA_LINE, "H", "3");
    type_into(&mut session, MIA_LINE, "AB", "5");
    let info = session.batting().dirty_row_info().unwrap();
    assert_eq!(info.fields, vec!["AB".to_string(), "H".to_string()]);
}

#[test]
fn test_exit_edit_with_failing_save() {
    let mut session = editing();
    type_into(&mut session, MIA_LINE, "H", "3");
    session.backend().fail_updates = true;

    let mut resolver = Scripted::new(&[Decision::Save, Decision::Cancel]);
    let t = session.exit_edit_mode(&mut resolver).unwrap();

    assert_eq!(t, Transition::Stay);
    assert!(session.is_editing());
    assert_eq!(resolver.asked.len(), 2);
    assert!(resolver.asked[1].1.is_some());
    assert_eq!(session.batting().row(MIA_LINE).unwrap().hits, 3);
    assert!(session.has_unsaved_changes());
}

#[test]
fn test_tab_change_saves_first() {
    let mut session = editing();
    type_into(&mut session, SAM_LINE, "R", "1");

    let t = session
        .switch_tab(Tab::Pitching, &mut Scripted::new(&[Decision::Save]))
        .unwrap();
    assert_eq!(t, Transition::Proceed);
    assert_eq!(session.tab(), Tab::Pitching);
    assert_eq!(session.focus(), None);
    assert_eq!(session.backend().batting_line(SAM_LINE).unwrap().runs, 1);
}

#[test]
fn test_game_change_discards() {
    let mut session = editing();
    type_into(&mut session, MIA_LINE, "SB", "1");

    let mut resolver = Scripted::new(&[Decision::Discard]);
    let t = session.select_game(OTHER_GAME, &mut resolver).unwrap();
    assert_eq!(t, Transition::Proceed);
    assert_eq!(resolver.asked[0].0.reason, PromptReason::GameChange);
    assert_eq!(session.game_id(), Some(OTHER_GAME));
    assert!(session.batting().rows().is_empty());
    assert_eq!(session.backend().batting_line(MIA_LINE).unwrap().stolen_bases, 0);
}

#[test]
fn test_pitching_innings_edit_and_save() {
    let mut session = editing();
    session
        .switch_tab(Tab::Pitching, &mut Scripted::default())
        .unwrap();
    type_into(&mut session, JO_PITCHING, "IP", "7.1");
    assert!(session.save().unwrap());
    let saved = session.backend().pitching_line(JO_PITCHING).unwrap();
    assert_eq!(saved.innings_pitched.outs(), 22);
    assert!(!session.save().unwrap());

    assert!(session.edit_focused("7.5").is_err());
    assert_eq!(
        session.pitching().row(JO_PITCHING).unwrap().innings_pitched.to_string(),
        "7.1"
    );
}

#[test]
fn test_add_line_and_duplicate() {
    let mut session = editing();
    let id = session
        .submit_new_line(JO, &[("AB", "3"), ("H", "1")])
        .unwrap();
    let rows = session.batting().rows();
    assert_eq!(rows[0].stat_id, id);
    assert_eq!(rows[0].hits, 1);
    assert!(session.batting().available_players().is_empty());

    let err = session.submit_new_line(JO, &[]).unwrap_err();
    assert!(matches!(err, AppError::DuplicatePlayer(p) if p == JO));
    assert_eq!(session.backend().batting.len(), 3);

    let err = session
        .add_batting_line(NewStatLine::default().with(BattingField::Hits, count(1)))
        .unwrap_err();
    assert!(matches!(err, AppError::MissingPlayer));
}

#[test]
fn test_add_pitching_line() {
    let mut session = editing();
    let id = session
        .add_pitching_line(NewStatLine::for_player(MIA).with(PitchingField::Strikeouts, count(2)))
        .unwrap();
    assert_eq!(session.pitching().row(id).unwrap().strikeouts, 2);
}

#[test]
fn test_delete_line() {
    let mut session = editing();
    session.delete_line(SAM_LINE).unwrap();
    assert!(session.batting().row(SAM_LINE).is_none());
    assert!(session.backend().batting_line(SAM_LINE).is_none());
}

#[test]
fn test_delete_already_gone_drops_row() {
    let mut session = editing();
    session.backend().batting.retain(|l| l.stat_id != SAM_LINE);
    let err = session.delete_line(SAM_LINE).unwrap_err();
    assert_eq!(err.class(), ErrorClass::ConflictOrNotFound);
    assert!(session.batting().row(SAM_LINE).is_none());
}

#[test]
fn test_delete_failure_keeps_row_drops_edits() {
    let mut session = editing();
    type_into(&mut session, MIA_LINE, "H", "4");
    session.backend().fail_deletes = true;

    let err = session.delete_line(MIA_LINE).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Transient);
    let row = session.batting().row(MIA_LINE).unwrap();
    assert_eq!(row.hits, 2);
    assert!(!session.has_unsaved_changes());
    assert!(session.batting().last_error().is_some());
}

#[test]
fn test_recap_is_guarded_too() {
    let mut session = editing();
    session
        .edit_recap("Walk-off double in the 9th", &mut Scripted::default())
        .unwrap();
    assert_eq!(session.tab(), Tab::Recap);
    assert!(session.has_unsaved_changes());

    let mut resolver = Scripted::new(&[Decision::Save]);
    let t = session.switch_tab(Tab::Batting, &mut resolver).unwrap();
    assert_eq!(t, Transition::Proceed);
    assert_eq!(resolver.asked[0].0.tab_context, Tab::Recap);
    assert_eq!(
        session.backend().recaps.get(&GAME).map(String::as_str),
        Some("Walk-off double in the 9th")
    );
}

#[test]
fn test_recap_edit_settles_dirty_row_first() {
    let mut session = editing();
    type_into(&mut session, MIA_LINE, "H", "3");

    let mut cancel = Scripted::new(&[Decision::Cancel]);
    let t = session.edit_recap("Walk-off", &mut cancel).unwrap();
    assert_eq!(t, Transition::Stay);
    assert_eq!(cancel.asked[0].0.reason, PromptReason::TabChange);
    assert_eq!(session.tab(), Tab::Batting);
    assert_eq!(session.recap().text(), "");
    assert_eq!(session.batting().row(MIA_LINE).unwrap().hits, 3);

    let mut discard = Scripted::new(&[Decision::Discard]);
    let t = session.edit_recap("Walk-off", &mut discard).unwrap();
    assert_eq!(t, Transition::Proceed);
    assert!(!session.batting().has_dirty_row());
    assert_eq!(session.recap().text(), "Walk-off");

    // The recap is now the only unsaved subject, and leaving the game asks about it.
    let mut resolver = Scripted::new(&[Decision::Save]);
    let t = session.select_game(OTHER_GAME, &mut resolver).unwrap();
    assert_eq!(t, Transition::Proceed);
    assert_eq!(resolver.asked.len(), 1);
    assert_eq!(resolver.asked[0].0.tab_context, Tab::Recap);
    assert_eq!(
        session.backend().recaps.get(&GAME).map(String::as_str),
        Some("Walk-off")
    );
}

#[test]
fn test_failed_game_load_keeps_current_game() {
    let mut session = editing();
    type_into(&mut session, MIA_LINE, "H", "3");
    session.backend().fail_pitching_loads = true;

    let mut resolver = Scripted::new(&[Decision::Discard]);
    let err = session.select_game(OTHER_GAME, &mut resolver).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Transient);
    assert!(resolver.asked.is_empty());
    assert_eq!(session.game_id(), Some(GAME));
    assert_eq!(session.batting().game_id(), Some(GAME));
    assert_eq!(session.batting().rows().len(), 2);
    assert_eq!(session.batting().row(MIA_LINE).unwrap().hits, 3);
    assert!(session.has_unsaved_changes());
}

#[test]
fn test_recap_save_failure_reaches_the_error_callback() {
    let seen: Rc<RefCell<Vec<ErrorClass>>> = Rc::new(RefCell::new(Vec::new()));
    let mut session = editing();
    let sink = Rc::clone(&seen);
    session.on_process_error(move |e: &AppError| sink.borrow_mut().push(e.class()));

    session.edit_recap("Rain delay", &mut Scripted::default()).unwrap();
    session.backend().fail_updates = true;
    assert!(session.save().is_err());

    assert_eq!(*seen.borrow(), vec![ErrorClass::Transient]);
    assert_eq!(session.recap().text(), "Rain delay");
    assert!(session.has_unsaved_changes());
}

#[test]
fn test_refresh_keeps_pending_edits() {
    let mut session = editing();
    type_into(&mut session, MIA_LINE, "H", "3");
    session
        .backend()
        .batting
        .iter_mut()
        .filter(|l| l.stat_id == MIA_LINE)
        .for_each(|l| l.at_bats = 5);

    session.refresh().unwrap();
    let row = session.batting().row(MIA_LINE).unwrap();
    assert_eq!(row.at_bats, 5);
    assert_eq!(row.hits, 3);
    assert!(session.has_unsaved_changes());
}

#[test]
fn test_failures_reach_the_error_callback() {
    let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let mut session = editing();
    let sink = Rc::clone(&seen);
    session.on_process_error(move |e: &AppError| sink.borrow_mut().push(e.to_string()));

    assert!(session.edit_focused("1").is_err()); // no focus: not a grid failure
    type_into(&mut session, MIA_LINE, "H", "3");
    assert!(session.edit_focused("-3").is_err());
    session.backend().fail_updates = true;
    assert!(session.save().is_err());

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert!(seen[1].contains("server unavailable"));
}
