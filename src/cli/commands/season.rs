use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::season::{season_batting, season_pitching};
use crate::db::queries::load_team;
use crate::errors::AppResult;
use crate::ui::grid_view::{season_grid, season_json};
use crate::ui::messages::{header, info};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Season {
        team,
        pitching,
        json,
    } = cmd
    {
        let team_id = super::resolve_team(*team, cfg)?;
        let mut backend = super::open_backend(cfg)?;
        let team = load_team(&backend.pool().conn, team_id)?;

        let (out, empty) = if *pitching {
            let table = season_pitching(&mut backend, team_id)?;
            let out = if *json {
                season_json(&table)?
            } else {
                season_grid(&table, &cfg.separator_char)
            };
            (out, table.players.is_empty())
        } else {
            let table = season_batting(&mut backend, team_id)?;
            let out = if *json {
                season_json(&table)?
            } else {
                season_grid(&table, &cfg.separator_char)
            };
            (out, table.players.is_empty())
        };

        if *json {
            println!("{out}");
            return Ok(());
        }
        if empty {
            info(format!("No stats recorded for {} yet.", team.name));
            return Ok(());
        }
        header(format!(
            "{} {} season {}",
            team.name,
            team.season,
            if *pitching { "pitching" } else { "batting" }
        ));
        print!("{out}");
    }

    Ok(())
}
