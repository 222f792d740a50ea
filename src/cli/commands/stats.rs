use super::{Unattended, open_backend, parse_assignments};
use crate::cli::parser::StatsAction;
use crate::config::Config;
use crate::core::backend::StatsBackend;
use crate::core::session::GameStatsSession;
use crate::db::backend::SqliteBackend;
use crate::errors::AppResult;
use crate::models::prompt::Tab;
use crate::ui::grid_view::{grid_json, grid_table};
use crate::ui::messages::{header, success};

/// Open a session on `game_id` for the team that played it.
fn open_game(cfg: &Config, game_id: i64) -> AppResult<GameStatsSession<SqliteBackend>> {
    let mut backend = open_backend(cfg)?;
    let game = backend.game(game_id)?;
    let mut session = GameStatsSession::open_resolved(backend, &cfg.account, game.team_id)?;
    session.select_game(game_id, &mut Unattended)?;
    Ok(session)
}

fn tab_for(pitching: bool) -> Tab {
    if pitching { Tab::Pitching } else { Tab::Batting }
}

/// Open `game_id` in edit mode on the batting or pitching tab.
fn open_for_edit(
    cfg: &Config,
    game_id: i64,
    pitching: bool,
) -> AppResult<GameStatsSession<SqliteBackend>> {
    let mut session = open_game(cfg, game_id)?;
    session.switch_tab(tab_for(pitching), &mut Unattended)?;
    session.enter_edit_mode()?;
    Ok(session)
}

/// Print the batting or pitching grid, pending edits marked.
pub fn print_grid<B: StatsBackend>(session: &GameStatsSession<B>, tab: Tab, separator_char: &str) {
    match tab {
        Tab::Pitching => {
            let grid = session.pitching();
            let slot = grid.tracker().dirty_slot();
            print!("{}", grid_table(&grid.rows(), &grid.totals(), slot, separator_char));
        }
        _ => {
            let grid = session.batting();
            let slot = grid.tracker().dirty_slot();
            print!("{}", grid_table(&grid.rows(), &grid.totals(), slot, separator_char));
        }
    }
}

pub fn handle(action: &StatsAction, cfg: &Config) -> AppResult<()> {
    match action {
        StatsAction::Show {
            game,
            pitching,
            json,
        } => {
            let mut session = open_game(cfg, *game)?;
            if *json {
                let out = if *pitching {
                    let grid = session.pitching();
                    grid_json(*game, &grid.rows(), &grid.totals())?
                } else {
                    let grid = session.batting();
                    grid_json(*game, &grid.rows(), &grid.totals())?
                };
                println!("{out}");
            } else {
                let g = session.backend().game(*game)?;
                header(format!("{} ({})", g.label(), tab_for(*pitching)));
                print_grid(&session, tab_for(*pitching), &cfg.separator_char);
            }
        }
        StatsAction::Add {
            game,
            player,
            pitching,
            values,
        } => {
            let pairs = parse_assignments(values)?;
            let mut session = open_for_edit(cfg, *game, *pitching)?;
            let stat_id = session.submit_new_line(*player, &pairs)?;
            success(format!("Added {} line #{}", tab_for(*pitching), stat_id));
        }
        StatsAction::Set {
            stat_id,
            game,
            pitching,
            values,
        } => {
            let pairs = parse_assignments(values)?;
            let mut session = open_for_edit(cfg, *game, *pitching)?;
            for (field, raw) in pairs {
                session.focus_cell(*stat_id, field, &mut Unattended)?;
                session.edit_focused(raw)?;
            }
            if session.save()? {
                success(format!("Saved {} line #{}", tab_for(*pitching), stat_id));
            } else {
                success("Nothing changed");
            }
        }
        StatsAction::Del {
            stat_id,
            game,
            pitching,
        } => {
            let mut session = open_for_edit(cfg, *game, *pitching)?;
            session.delete_line(*stat_id)?;
            success(format!("Deleted {} line #{}", tab_for(*pitching), stat_id));
        }
    }

    Ok(())
}
