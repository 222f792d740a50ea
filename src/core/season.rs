//! Season totals per player, aggregated on the client from per-game lines.

use super::backend::StatsBackend;
use super::metrics::aggregate;
use crate::errors::AppResult;
use crate::models::stat_line::{BattingLine, PitchingLine, StatLine};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct SeasonLine<L: StatLine> {
    pub games: u32,
    pub line: L,
}

#[derive(Debug, Clone)]
pub struct SeasonTable<L: StatLine> {
    pub players: Vec<SeasonLine<L>>,
    pub totals: L,
}

/// Group lines by player, sum counting stats, keep first-seen player names.
/// Players come out sorted by name.
pub fn season_table<L: StatLine>(lines: &[L]) -> SeasonTable<L> {
    let mut by_player: BTreeMap<i64, (u32, L)> = BTreeMap::new();
    for line in lines {
        let entry = by_player.entry(line.roster_season_id()).or_insert_with(|| {
            (
                0,
                L::blank(0, 0, line.roster_season_id(), line.player_name()),
            )
        });
        entry.0 += 1;
        entry.1.accumulate(line);
    }

    let mut players: Vec<SeasonLine<L>> = by_player
        .into_values()
        .map(|(games, line)| SeasonLine { games, line })
        .collect();
    players.sort_by(|a, b| a.line.player_name().cmp(b.line.player_name()));

    SeasonTable {
        players,
        totals: aggregate(0, lines),
    }
}

pub fn season_batting(
    backend: &mut dyn StatsBackend,
    team_id: i64,
) -> AppResult<SeasonTable<BattingLine>> {
    let lines = backend.season_batting_lines(team_id)?;
    Ok(season_table(&lines))
}

pub fn season_pitching(
    backend: &mut dyn StatsBackend,
    team_id: i64,
) -> AppResult<SeasonTable<PitchingLine>> {
    let lines = backend.season_pitching_lines(team_id)?;
    Ok(season_table(&lines))
}
