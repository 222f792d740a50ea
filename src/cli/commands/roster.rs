use crate::cli::parser::RosterAction;
use crate::config::Config;
use crate::db::log::audit;
use crate::db::queries::{insert_player, load_roster, load_team};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use crate::utils::formatting::player_label;
use crate::utils::table::{Column, Table};

pub fn handle(action: &RosterAction, cfg: &Config) -> AppResult<()> {
    let pool = super::open_pool(cfg)?;
    let conn = &pool.conn;

    match action {
        RosterAction::Add { name, team, jersey } => {
            let team_id = super::resolve_team(*team, cfg)?;
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::validation("name", "player name is empty"));
            }
            let player = insert_player(conn, team_id, name, *jersey)?;
            if let Err(e) = audit(
                conn,
                "roster",
                &format!("player #{}", player.roster_season_id),
                &format!("Added {} to team #{}", player.player_name, team_id),
            ) {
                warning(format!("Failed to write internal log: {}", e));
            }
            success(format!(
                "{} added (roster id {})",
                player_label(&player.player_name, player.jersey),
                player.roster_season_id
            ));
        }
        RosterAction::List { team } => {
            let team_id = super::resolve_team(*team, cfg)?;
            let team = load_team(conn, team_id)?;
            let roster = load_roster(conn, team_id)?;
            if roster.is_empty() {
                info(format!("{} has no players yet.", team.name));
                return Ok(());
            }
            println!("🧢 {} ({})\n", team.name, team.season);
            let mut table = Table::new(vec![
                Column::right("ID"),
                Column::right("#"),
                Column::left("Player"),
            ]);
            for p in roster {
                table.add_row(vec![
                    p.roster_season_id.to_string(),
                    p.jersey.map(|j| j.to_string()).unwrap_or_default(),
                    p.player_name,
                ]);
            }
            print!("{}", table.render(&cfg.separator_char));
        }
    }

    Ok(())
}
