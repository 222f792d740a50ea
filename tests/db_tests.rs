use chrono::NaiveDate;
use rstatbook::core::backend::{RoleResolver, StatsBackend};
use rstatbook::db::backend::SqliteBackend;
use rstatbook::db::initialize::init_db;
use rstatbook::db::log::load_log;
use rstatbook::db::pool::DbPool;
use rstatbook::db::queries;
use rstatbook::errors::{AppError, ErrorClass};
use rstatbook::models::innings::InningsPitched;
use rstatbook::models::stat_line::{BattingField, FieldValue, NewStatLine, PitchingField};

struct Fixture {
    backend: SqliteBackend,
    team: i64,
    game: i64,
    mia: i64,
    sam: i64,
}

fn fixture() -> Fixture {
    let pool = DbPool::in_memory().unwrap();
    init_db(&pool.conn).unwrap();
    let conn = &pool.conn;
    let team = queries::insert_team(conn, "Tigers", "2025").unwrap().id;
    queries::add_manager(conn, team, "coach").unwrap();
    let mia = queries::insert_player(conn, team, "Mia Lopez", Some(12))
        .unwrap()
        .roster_season_id;
    let sam = queries::insert_player(conn, team, "Sam Park", None)
        .unwrap()
        .roster_season_id;
    let date = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
    let game = queries::insert_game(conn, team, &date, "Hawks", Some((5, 3)))
        .unwrap()
        .id;
    Fixture {
        backend: SqliteBackend::new(pool),
        team,
        game,
        mia,
        sam,
    }
}

#[test]
fn test_migrations_run_once() {
    let pool = DbPool::in_memory().unwrap();
    init_db(&pool.conn).unwrap();
    init_db(&pool.conn).unwrap();

    let applied = load_log(&pool.conn)
        .unwrap()
        .into_iter()
        .filter(|e| e.operation == "migration_applied")
        .count();
    assert_eq!(applied, 3);
}

#[test]
fn test_batting_line_lifecycle() {
    let mut f = fixture();

    let payload = NewStatLine::for_player(f.mia)
        .with(BattingField::AtBats, FieldValue::Count(4))
        .with(BattingField::Hits, FieldValue::Count(2));
    let line = f.backend.create_batting_stat(f.game, &payload).unwrap();
    assert_eq!(line.player_name, "Mia Lopez");
    assert_eq!(line.at_bats, 4);
    assert_eq!(line.runs, 0);

    let sheet = f.backend.batting_stats(f.game).unwrap();
    assert_eq!(sheet.stats.len(), 1);
    let available: Vec<i64> = sheet
        .available_players
        .iter()
        .map(|p| p.roster_season_id)
        .collect();
    assert_eq!(available, vec![f.sam]);

    let mut diff = std::collections::BTreeMap::new();
    diff.insert(BattingField::Hits, FieldValue::Count(3));
    let updated = f.backend.update_batting_stat(line.stat_id, &diff).unwrap();
    assert_eq!(updated.hits, 3);
    assert_eq!(updated.at_bats, 4);

    f.backend.delete_batting_stat(line.stat_id).unwrap();
    let err = f.backend.delete_batting_stat(line.stat_id).unwrap_err();
    assert_eq!(err.class(), ErrorClass::ConflictOrNotFound);
}

#[test]
fn test_duplicate_and_missing_player_rejected() {
    let mut f = fixture();

    let missing = f
        .backend
        .create_batting_stat(f.game, &NewStatLine::default())
        .unwrap_err();
    assert!(matches!(missing, AppError::MissingPlayer));

    let payload = NewStatLine::for_player(f.sam);
    f.backend.create_batting_stat(f.game, &payload).unwrap();
    let dup = f.backend.create_batting_stat(f.game, &payload).unwrap_err();
    assert!(matches!(dup, AppError::DuplicatePlayer(id) if id == f.sam));
    assert_eq!(dup.class(), ErrorClass::Validation);
}

#[test]
fn test_innings_stored_as_outs() {
    let mut f = fixture();
    let ip = InningsPitched::from_parts(6, 2).unwrap();
    let payload = NewStatLine::for_player(f.mia)
        .with(PitchingField::InningsPitched, FieldValue::Innings(ip))
        .with(PitchingField::EarnedRuns, FieldValue::Count(2));
    f.backend.create_pitching_stat(f.game, &payload).unwrap();

    let sheet = f.backend.pitching_stats(f.game).unwrap();
    assert_eq!(sheet.stats[0].innings_pitched.outs(), 20);
    assert_eq!(sheet.totals.innings_pitched.outs(), 20);
}

#[test]
fn test_recap_and_roles() {
    let mut f = fixture();
    assert_eq!(f.backend.game_recap(f.game).unwrap(), "");
    f.backend.save_game_recap(f.game, "Walk-off in the ninth").unwrap();
    assert_eq!(f.backend.game_recap(f.game).unwrap(), "Walk-off in the ninth");

    assert!(f.backend.can_manage_stats("coach", f.team).unwrap());
    assert!(!f.backend.can_manage_stats("fan", f.team).unwrap());
}

#[test]
fn test_mutations_are_audited() {
    let mut f = fixture();
    let line = f
        .backend
        .create_batting_stat(f.game, &NewStatLine::for_player(f.mia))
        .unwrap();
    f.backend.delete_batting_stat(line.stat_id).unwrap();

    let ops: Vec<String> = load_log(&f.backend.pool().conn)
        .unwrap()
        .into_iter()
        .map(|e| e.operation)
        .filter(|op| op != "migration_applied")
        .collect();
    assert_eq!(ops, vec!["add", "del"]);
}
