use crate::errors::{AppError, AppResult};
use crate::models::game::{Game, Team};
use crate::models::innings::InningsPitched;
use crate::models::stat_line::{
    BattingLine, FieldKind, FieldValue, NewStatLine, PitchingLine, PlayerSummary, StatDiff,
    StatLine,
};
use chrono::NaiveDate;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Result, Row, params, params_from_iter};

// ---------------------------------------------------------------------------
// Teams, managers, roster
// ---------------------------------------------------------------------------

pub fn insert_team(conn: &Connection, name: &str, season: &str) -> AppResult<Team> {
    conn.execute(
        "INSERT INTO teams (name, season) VALUES (?1, ?2)",
        params![name, season],
    )?;
    Ok(Team {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        season: season.to_string(),
    })
}

pub fn load_teams(conn: &Connection) -> AppResult<Vec<Team>> {
    let mut stmt = conn.prepare("SELECT id, name, season FROM teams ORDER BY season DESC, name ASC")?;
    let rows = stmt.query_map([], map_team)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_team(conn: &Connection, team_id: i64) -> AppResult<Team> {
    conn.query_row(
        "SELECT id, name, season FROM teams WHERE id = ?1",
        [team_id],
        map_team,
    )
    .optional()?
    .ok_or_else(|| AppError::NotFound(format!("team #{team_id}")))
}

fn map_team(row: &Row) -> Result<Team> {
    Ok(Team {
        id: row.get("id")?,
        name: row.get("name")?,
        season: row.get("season")?,
    })
}

pub fn add_manager(conn: &Connection, team_id: i64, account: &str) -> AppResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO team_managers (team_id, account) VALUES (?1, ?2)",
        params![team_id, account],
    )?;
    Ok(())
}

pub fn is_manager(conn: &Connection, team_id: i64, account: &str) -> AppResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM team_managers WHERE team_id = ?1 AND account = ?2",
            params![team_id, account],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn insert_player(
    conn: &Connection,
    team_id: i64,
    player_name: &str,
    jersey: Option<u32>,
) -> AppResult<PlayerSummary> {
    load_team(conn, team_id)?;
    conn.execute(
        "INSERT INTO roster_seasons (team_id, player_name, jersey) VALUES (?1, ?2, ?3)",
        params![team_id, player_name, jersey],
    )?;
    Ok(PlayerSummary {
        roster_season_id: conn.last_insert_rowid(),
        player_name: player_name.to_string(),
        jersey,
    })
}

pub fn load_roster(conn: &Connection, team_id: i64) -> AppResult<Vec<PlayerSummary>> {
    let mut stmt = conn.prepare(
        "SELECT id, player_name, jersey FROM roster_seasons
         WHERE team_id = ?1
         ORDER BY player_name ASC",
    )?;
    let rows = stmt.query_map([team_id], map_player)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

fn map_player(row: &Row) -> Result<PlayerSummary> {
    Ok(PlayerSummary {
        roster_season_id: row.get("id")?,
        player_name: row.get("player_name")?,
        jersey: row.get("jersey")?,
    })
}

// ---------------------------------------------------------------------------
// Games
// ---------------------------------------------------------------------------

const GAME_SELECT: &str = "SELECT g.id, g.team_id, t.season, g.date, g.opponent,
        g.team_score, g.opponent_score, g.completed
     FROM games g JOIN teams t ON t.id = g.team_id";

pub fn insert_game(
    conn: &Connection,
    team_id: i64,
    date: &NaiveDate,
    opponent: &str,
    score: Option<(u32, u32)>,
) -> AppResult<Game> {
    load_team(conn, team_id)?;
    let completed = score.is_some();
    conn.execute(
        "INSERT INTO games (team_id, date, opponent, team_score, opponent_score, completed)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            team_id,
            date.format("%Y-%m-%d").to_string(),
            opponent,
            score.map(|s| s.0),
            score.map(|s| s.1),
            if completed { 1 } else { 0 },
        ],
    )?;
    load_game(conn, conn.last_insert_rowid())
}

pub fn load_game(conn: &Connection, game_id: i64) -> AppResult<Game> {
    conn.query_row(&format!("{GAME_SELECT} WHERE g.id = ?1"), [game_id], map_game)
        .optional()?
        .ok_or_else(|| AppError::NotFound(format!("game #{game_id}")))
}

pub fn load_games(conn: &Connection, team_id: i64, completed_only: bool) -> AppResult<Vec<Game>> {
    let sql = format!(
        "{GAME_SELECT} WHERE g.team_id = ?1 {} ORDER BY g.date ASC, g.id ASC",
        if completed_only { "AND g.completed = 1" } else { "" }
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([team_id], map_game)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

fn map_game(row: &Row) -> Result<Game> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    Ok(Game {
        id: row.get("id")?,
        team_id: row.get("team_id")?,
        season: row.get("season")?,
        date,
        opponent: row.get("opponent")?,
        team_score: row.get("team_score")?,
        opponent_score: row.get("opponent_score")?,
        completed: row.get::<_, i32>("completed")? == 1,
    })
}

pub fn load_recap(conn: &Connection, game_id: i64) -> AppResult<String> {
    conn.query_row("SELECT recap FROM games WHERE id = ?1", [game_id], |row| row.get(0))
        .optional()?
        .ok_or_else(|| AppError::NotFound(format!("game #{game_id}")))
}

pub fn update_recap(conn: &Connection, game_id: i64, recap: &str) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE games SET recap = ?1 WHERE id = ?2",
        params![recap, game_id],
    )?;
    if n == 0 {
        return Err(AppError::NotFound(format!("game #{game_id}")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Stat lines (shared by batting and pitching)
// ---------------------------------------------------------------------------

/// A stat line kind stored in its own table.
pub trait StatTable: StatLine {
    const TABLE: &'static str;
}

impl StatTable for BattingLine {
    const TABLE: &'static str = "batting_stats";
}

impl StatTable for PitchingLine {
    const TABLE: &'static str = "pitching_stats";
}

fn select_lines<L: StatTable>() -> String {
    format!(
        "SELECT s.*, r.player_name FROM {} s
         JOIN roster_seasons r ON r.id = s.roster_season_id",
        L::TABLE
    )
}

fn map_line<L: StatTable>(row: &Row) -> Result<L> {
    let mut line = L::blank(
        row.get("id")?,
        row.get("game_id")?,
        row.get("roster_season_id")?,
        &row.get::<_, String>("player_name")?,
    );
    for f in L::fields() {
        let raw: u32 = row.get(L::column(*f))?;
        let value = match L::field_kind(*f) {
            FieldKind::Count => FieldValue::Count(raw),
            FieldKind::Innings => FieldValue::Innings(InningsPitched::from_outs(raw)),
        };
        line.set(*f, value);
    }
    Ok(line)
}

pub fn load_lines_for_game<L: StatTable>(conn: &Connection, game_id: i64) -> AppResult<Vec<L>> {
    let sql = format!("{} WHERE s.game_id = ?1 ORDER BY r.player_name ASC", select_lines::<L>());
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([game_id], map_line::<L>)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_line<L: StatTable>(conn: &Connection, stat_id: i64) -> AppResult<L> {
    let sql = format!("{} WHERE s.id = ?1", select_lines::<L>());
    conn.query_row(&sql, [stat_id], map_line::<L>)
        .optional()?
        .ok_or_else(|| AppError::NotFound(format!("{} stat #{stat_id}", L::KIND)))
}

/// Lines of every completed game of the team, for season totals.
pub fn load_season_lines<L: StatTable>(conn: &Connection, team_id: i64) -> AppResult<Vec<L>> {
    let sql = format!(
        "{} JOIN games g ON g.id = s.game_id
         WHERE g.team_id = ?1 AND g.completed = 1
         ORDER BY g.date ASC, s.id ASC",
        select_lines::<L>()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([team_id], map_line::<L>)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Roster players of the game's team who have no line of this kind yet.
pub fn load_available_players<L: StatTable>(
    conn: &Connection,
    game_id: i64,
) -> AppResult<Vec<PlayerSummary>> {
    let sql = format!(
        "SELECT r.id, r.player_name, r.jersey FROM roster_seasons r
         JOIN games g ON g.team_id = r.team_id
         WHERE g.id = ?1
           AND r.id NOT IN (SELECT roster_season_id FROM {} WHERE game_id = ?1)
         ORDER BY r.player_name ASC",
        L::TABLE
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([game_id], map_player)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_line<L: StatTable>(
    conn: &Connection,
    game_id: i64,
    payload: &NewStatLine<L::Field>,
) -> AppResult<L> {
    let player = payload
        .roster_season_id
        .filter(|id| *id > 0)
        .ok_or(AppError::MissingPlayer)?;

    let game = load_game(conn, game_id)?;
    let on_roster = conn
        .query_row(
            "SELECT 1 FROM roster_seasons WHERE id = ?1 AND team_id = ?2",
            params![player, game.team_id],
            |_| Ok(()),
        )
        .optional()?;
    if on_roster.is_none() {
        return Err(AppError::NotFound(format!("player #{player} on this team's roster")));
    }

    let mut columns = vec!["game_id", "roster_season_id"];
    let mut values = vec![game_id, player];
    for (field, value) in &payload.values {
        columns.push(L::column(*field));
        values.push(value.to_db_int());
    }
    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        L::TABLE,
        columns.join(", "),
        placeholders.join(", ")
    );

    match conn.execute(&sql, params_from_iter(values.iter())) {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            return Err(AppError::DuplicatePlayer(player));
        }
        Err(e) => return Err(e.into()),
    }

    load_line(conn, conn.last_insert_rowid())
}

pub fn update_line<L: StatTable>(
    conn: &Connection,
    stat_id: i64,
    diff: &StatDiff<L::Field>,
) -> AppResult<L> {
    if diff.is_empty() {
        return load_line(conn, stat_id);
    }

    let mut sets = Vec::with_capacity(diff.len());
    let mut values = Vec::with_capacity(diff.len() + 1);
    for (i, (field, value)) in diff.iter().enumerate() {
        sets.push(format!("{} = ?{}", L::column(*field), i + 1));
        values.push(value.to_db_int());
    }
    values.push(stat_id);
    let sql = format!(
        "UPDATE {} SET {} WHERE id = ?{}",
        L::TABLE,
        sets.join(", "),
        values.len()
    );

    let n = conn.execute(&sql, params_from_iter(values.iter()))?;
    if n == 0 {
        return Err(AppError::NotFound(format!("{} stat #{stat_id}", L::KIND)));
    }
    load_line(conn, stat_id)
}

pub fn delete_line<L: StatTable>(conn: &Connection, stat_id: i64) -> AppResult<()> {
    let n = conn.execute(&format!("DELETE FROM {} WHERE id = ?1", L::TABLE), [stat_id])?;
    if n == 0 {
        return Err(AppError::NotFound(format!("{} stat #{stat_id}", L::KIND)));
    }
    Ok(())
}
