use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. Migrations record themselves there.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Teams, roster, games and their managers.
const CORE_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS teams (
        id      INTEGER PRIMARY KEY AUTOINCREMENT,
        name    TEXT NOT NULL,
        season  TEXT NOT NULL,
        UNIQUE(name, season)
    );

    CREATE TABLE IF NOT EXISTS team_managers (
        team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
        account TEXT NOT NULL,
        PRIMARY KEY (team_id, account)
    );

    CREATE TABLE IF NOT EXISTS roster_seasons (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        team_id     INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
        player_name TEXT NOT NULL,
        jersey      INTEGER
    );

    CREATE TABLE IF NOT EXISTS games (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        team_id         INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
        date            TEXT NOT NULL,
        opponent        TEXT NOT NULL,
        team_score      INTEGER,
        opponent_score  INTEGER,
        completed       INTEGER NOT NULL DEFAULT 0
    );

    CREATE INDEX IF NOT EXISTS idx_games_team_date ON games(team_id, date);
"#;

/// Per-game stat lines. Innings are stored as outs.
const STATS_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS batting_stats (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        game_id           INTEGER NOT NULL REFERENCES games(id) ON DELETE CASCADE,
        roster_season_id  INTEGER NOT NULL REFERENCES roster_seasons(id),
        at_bats           INTEGER NOT NULL DEFAULT 0 CHECK(at_bats >= 0),
        runs              INTEGER NOT NULL DEFAULT 0 CHECK(runs >= 0),
        hits              INTEGER NOT NULL DEFAULT 0 CHECK(hits >= 0),
        doubles           INTEGER NOT NULL DEFAULT 0 CHECK(doubles >= 0),
        triples           INTEGER NOT NULL DEFAULT 0 CHECK(triples >= 0),
        home_runs         INTEGER NOT NULL DEFAULT 0 CHECK(home_runs >= 0),
        runs_batted_in    INTEGER NOT NULL DEFAULT 0 CHECK(runs_batted_in >= 0),
        walks             INTEGER NOT NULL DEFAULT 0 CHECK(walks >= 0),
        strikeouts        INTEGER NOT NULL DEFAULT 0 CHECK(strikeouts >= 0),
        hit_by_pitch      INTEGER NOT NULL DEFAULT 0 CHECK(hit_by_pitch >= 0),
        sac_flies         INTEGER NOT NULL DEFAULT 0 CHECK(sac_flies >= 0),
        stolen_bases      INTEGER NOT NULL DEFAULT 0 CHECK(stolen_bases >= 0),
        UNIQUE(game_id, roster_season_id)
    );

    CREATE TABLE IF NOT EXISTS pitching_stats (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        game_id           INTEGER NOT NULL REFERENCES games(id) ON DELETE CASCADE,
        roster_season_id  INTEGER NOT NULL REFERENCES roster_seasons(id),
        outs_pitched      INTEGER NOT NULL DEFAULT 0 CHECK(outs_pitched >= 0),
        hits              INTEGER NOT NULL DEFAULT 0 CHECK(hits >= 0),
        runs              INTEGER NOT NULL DEFAULT 0 CHECK(runs >= 0),
        earned_runs       INTEGER NOT NULL DEFAULT 0 CHECK(earned_runs >= 0),
        walks             INTEGER NOT NULL DEFAULT 0 CHECK(walks >= 0),
        strikeouts        INTEGER NOT NULL DEFAULT 0 CHECK(strikeouts >= 0),
        home_runs         INTEGER NOT NULL DEFAULT 0 CHECK(home_runs >= 0),
        hit_batters       INTEGER NOT NULL DEFAULT 0 CHECK(hit_batters >= 0),
        at_bats_against   INTEGER NOT NULL DEFAULT 0 CHECK(at_bats_against >= 0),
        doubles_allowed   INTEGER NOT NULL DEFAULT 0 CHECK(doubles_allowed >= 0),
        triples_allowed   INTEGER NOT NULL DEFAULT 0 CHECK(triples_allowed >= 0),
        UNIQUE(game_id, roster_season_id)
    );

    CREATE INDEX IF NOT EXISTS idx_batting_game ON batting_stats(game_id);
    CREATE INDEX IF NOT EXISTS idx_pitching_game ON pitching_stats(game_id);
"#;

const RECAP_COLUMN: &str = "ALTER TABLE games ADD COLUMN recap TEXT NOT NULL DEFAULT '';";

/// Ordered list of migrations: (version, description, SQL batch).
const MIGRATIONS: [(&str, &str, &str); 3] = [
    ("20250301_0001_core_schema", "Created teams, roster and games tables", CORE_SCHEMA),
    ("20250301_0002_stat_lines", "Created batting and pitching stat tables", STATS_SCHEMA),
    ("20250412_0003_game_recap", "Added recap column to games", RECAP_COLUMN),
];

/// Public entry point: run all pending migrations.
///
/// Called by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for (version, message, sql) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }
        conn.execute_batch(sql)?;
        mark_applied(conn, version, message)?;
        success(format!("Migration applied: {} → {}", version, message));
    }

    Ok(())
}
