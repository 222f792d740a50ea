use crate::cli::parser::GameAction;
use crate::config::Config;
use crate::db::log::audit;
use crate::db::queries::{insert_game, load_games, load_team};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::{RESET, color_for_result};
use crate::utils::date::parse_date;
use crate::utils::table::{Column, Table};

/// `5-3` → (5, 3)
fn parse_score(s: &str) -> AppResult<(u32, u32)> {
    let invalid = || AppError::validation("score", format!("'{s}' is not a score like 5-3"));
    let (us, them) = s.split_once('-').ok_or_else(invalid)?;
    let us = us.trim().parse::<u32>().map_err(|_| invalid())?;
    let them = them.trim().parse::<u32>().map_err(|_| invalid())?;
    Ok((us, them))
}

pub fn handle(action: &GameAction, cfg: &Config) -> AppResult<()> {
    let pool = super::open_pool(cfg)?;
    let conn = &pool.conn;

    match action {
        GameAction::Add {
            date,
            opponent,
            team,
            score,
        } => {
            let team_id = super::resolve_team(*team, cfg)?;
            let d = parse_date(date).ok_or_else(|| AppError::InvalidDate(date.clone()))?;
            let score = score.as_deref().map(parse_score).transpose()?;
            let game = insert_game(conn, team_id, &d, opponent.trim(), score)?;
            if let Err(e) = audit(
                conn,
                "game",
                &format!("game #{}", game.id),
                &format!("Added {}", game.label()),
            ) {
                warning(format!("Failed to write internal log: {}", e));
            }
            success(format!("Game #{} {}", game.id, game.label()));
        }
        GameAction::List { team, completed } => {
            let team_id = super::resolve_team(*team, cfg)?;
            let team = load_team(conn, team_id)?;
            let games = load_games(conn, team_id, *completed)?;
            if games.is_empty() {
                info(format!("No games for {} yet.", team.name));
                return Ok(());
            }
            let mut table = Table::new(vec![
                Column::right("ID"),
                Column::left("Date"),
                Column::left("Opponent"),
                Column::right("Score"),
                Column::left("Status"),
            ]);
            for g in games {
                let score = match (g.team_score, g.opponent_score) {
                    (Some(us), Some(them)) => format!(
                        "{}{us}-{them}{RESET}",
                        color_for_result(g.team_score, g.opponent_score)
                    ),
                    _ => String::new(),
                };
                table.add_row(vec![
                    g.id.to_string(),
                    g.date_str(),
                    g.opponent.clone(),
                    score,
                    if g.completed { "final" } else { "scheduled" }.to_string(),
                ]);
            }
            print!("{}", table.render(&cfg.separator_char));
        }
    }

    Ok(())
}
