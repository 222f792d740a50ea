pub mod config;
pub mod game;
pub mod init;
pub mod log;
pub mod roster;
pub mod season;
pub mod session;
pub mod stats;
pub mod team;

use crate::config::Config;
use crate::core::arbitrator::DecisionResolver;
use crate::db::backend::SqliteBackend;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::prompt::{Decision, UnsavedChangesPrompt};
use std::path::Path;

fn ensure_database(cfg: &Config) -> AppResult<()> {
    if cfg.database != ":memory:" && !Path::new(&cfg.database).exists() {
        return Err(AppError::Config(format!(
            "database not found at {} (run `rstatbook init` first)",
            cfg.database
        )));
    }
    Ok(())
}

pub(crate) fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    ensure_database(cfg)?;
    Ok(DbPool::new(&cfg.database)?)
}

pub(crate) fn open_backend(cfg: &Config) -> AppResult<SqliteBackend> {
    Ok(SqliteBackend::new(open_pool(cfg)?))
}

/// `--team` or the configured default team.
pub(crate) fn resolve_team(team: Option<i64>, cfg: &Config) -> AppResult<i64> {
    team.or(cfg.default_team).ok_or_else(|| {
        AppError::validation("team", "pass --team or set default_team in the config")
    })
}

/// Split `FIELD=VALUE` arguments.
pub(crate) fn parse_assignments(values: &[String]) -> AppResult<Vec<(&str, &str)>> {
    values
        .iter()
        .map(|v| {
            v.split_once('=')
                .map(|(k, val)| (k.trim(), val.trim()))
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| {
                    AppError::validation(v.clone(), "expected FIELD=VALUE (e.g. AB=4)")
                })
        })
        .collect()
}

/// Answers every unsaved-changes prompt with Cancel. One-shot commands
/// start from a clean session, so a prompt means nothing was meant to move.
pub(crate) struct Unattended;

impl DecisionResolver for Unattended {
    fn decide(&mut self, _prompt: &UnsavedChangesPrompt, _error: Option<&str>) -> Decision {
        Decision::Cancel
    }
}
