use crate::cli::parser::TeamAction;
use crate::config::Config;
use crate::db::log::audit;
use crate::db::queries::{add_manager, insert_team, load_team, load_teams};
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::table::{Column, Table};

pub fn handle(action: &TeamAction, cfg: &Config) -> AppResult<()> {
    let pool = super::open_pool(cfg)?;
    let conn = &pool.conn;

    match action {
        TeamAction::Add { name, season } => {
            let team = insert_team(conn, name.trim(), season.trim())?;
            add_manager(conn, team.id, &cfg.account)?;
            if let Err(e) = audit(
                conn,
                "team",
                &format!("team #{}", team.id),
                &format!("Created {} ({}), manager {}", team.name, team.season, cfg.account),
            ) {
                warning(format!("Failed to write internal log: {}", e));
            }
            success(format!(
                "Team #{} {} ({}) created; {} can manage its stats",
                team.id, team.name, team.season, cfg.account
            ));
        }
        TeamAction::List => {
            let teams = load_teams(conn)?;
            if teams.is_empty() {
                info("No teams yet. Create one with `rstatbook team add <name> <season>`.");
                return Ok(());
            }
            let mut table = Table::new(vec![
                Column::right("ID"),
                Column::left("Team"),
                Column::left("Season"),
            ]);
            for t in teams {
                table.add_row(vec![t.id.to_string(), t.name, t.season]);
            }
            print!("{}", table.render(&cfg.separator_char));
        }
        TeamAction::Grant { account, team } => {
            let team_id = super::resolve_team(*team, cfg)?;
            let team = load_team(conn, team_id)?;
            add_manager(conn, team.id, account.trim())?;
            if let Err(e) = audit(
                conn,
                "team",
                &format!("team #{}", team.id),
                &format!("Granted stats management to {}", account.trim()),
            ) {
                warning(format!("Failed to write internal log: {}", e));
            }
            success(format!("{} can now manage stats for {}", account.trim(), team.name));
        }
    }

    Ok(())
}
