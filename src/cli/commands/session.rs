//! Interactive stats entry. Reads one command per line from stdin; every
//! unsaved-changes prompt is answered on the same input.

use super::stats::print_grid;
use super::{open_backend, parse_assignments, resolve_team};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::arbitrator::{DecisionResolver, Transition};
use crate::core::backend::StatsBackend;
use crate::core::session::GameStatsSession;
use crate::errors::{AppError, AppResult, ErrorClass};
use crate::models::prompt::{Decision, Tab, UnsavedChangesPrompt};
use crate::ui::messages::{ask, error, header, info, success, warning};
use std::cell::RefCell;
use std::io::{self, BufRead};

const HELP: &str = "\
commands:
  games                    list completed games
  game <id>                open a game
  tab <b|p|r>              switch tab
  show                     print the active tab
  edit | done              enter / leave edit mode
  cell <stat_id> <field>   focus a cell
  set <value>              type into the focused cell
  recap <text>             replace the game recap
  add <player_id> [F=V..]  add a line on the active tab
  del <stat_id>            delete a line on the active tab
  save | discard           save or drop pending edits
  refresh                  reload the game
  quit";

/// Asks on the shared input. End of input means Cancel.
struct PromptResolver<'a, R: BufRead> {
    input: &'a RefCell<R>,
}

impl<R: BufRead> DecisionResolver for PromptResolver<'_, R> {
    fn decide(&mut self, prompt: &UnsavedChangesPrompt, failure: Option<&str>) -> Decision {
        if let Some(msg) = failure {
            error(format!("Save failed: {msg}"));
        }
        warning(prompt);
        loop {
            let answer = ask(&mut *self.input.borrow_mut(), "[s]ave / [d]iscard / [c]ancel?");
            let Some(answer) = answer else {
                return Decision::Cancel;
            };
            match Decision::from_answer(&answer) {
                Some(d) => return d,
                None => warning("Answer s, d or c."),
            }
        }
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Session { team, game } = cmd {
        let team_id = resolve_team(*team, cfg)?;
        let backend = open_backend(cfg)?;
        let mut session = GameStatsSession::open_resolved(backend, &cfg.account, team_id)?;
        session.on_process_error(|e: &AppError| {
            if e.class() == ErrorClass::Transient {
                info("Edits kept. `save` to retry or `discard` to drop them.");
            }
        });

        let stdin = io::stdin();
        let input = RefCell::new(stdin.lock());
        run(&mut session, *game, &input, cfg)?;
    }
    Ok(())
}

/// The read-eval loop, generic over the input so it can be scripted.
pub fn run<B: StatsBackend, R: BufRead>(
    session: &mut GameStatsSession<B>,
    start_game: Option<i64>,
    input: &RefCell<R>,
    cfg: &Config,
) -> AppResult<()> {
    let mut resolver = PromptResolver { input };

    if let Some(game_id) = start_game {
        report(open_game(session, game_id, &mut resolver, cfg));
    } else {
        info("Type `help` for commands.");
    }

    loop {
        let line = ask(&mut *input.borrow_mut(), "stats>");
        let Some(line) = line else {
            break;
        };
        if line.is_empty() {
            continue;
        }
        let (verb, rest) = line.split_once(' ').unwrap_or((line.as_str(), ""));
        let rest = rest.trim();

        let result = match verb {
            "help" | "?" => {
                println!("{HELP}");
                Ok(())
            }
            "quit" | "exit" | "q" => match session.exit_edit_mode(&mut resolver) {
                Ok(Transition::Proceed) => break,
                Ok(Transition::Stay) => {
                    info("Still here.");
                    Ok(())
                }
                Err(e) => Err(e),
            },
            "games" => list_games(session),
            "game" => parse_id(rest).and_then(|id| open_game(session, id, &mut resolver, cfg)),
            "tab" => match Tab::from_code(rest) {
                Some(tab) => session.switch_tab(tab, &mut resolver).map(|t| {
                    if t == Transition::Proceed {
                        show(session, cfg);
                    }
                }),
                None => Err(AppError::validation("tab", "use b, p or r")),
            },
            "show" => {
                show(session, cfg);
                Ok(())
            }
            "edit" => session.enter_edit_mode().map(|_| success("Edit mode on")),
            "done" => session.exit_edit_mode(&mut resolver).map(|t| {
                if t == Transition::Proceed {
                    success("Edit mode off");
                }
            }),
            "cell" => {
                let mut parts = rest.split_whitespace();
                match (parts.next(), parts.next()) {
                    (Some(id), Some(field)) => parse_id(id)
                        .and_then(|id| session.focus_cell(id, field, &mut resolver))
                        .map(|_| ()),
                    _ => Err(AppError::validation("cell", "usage: cell <stat_id> <field>")),
                }
            }
            "set" => session.edit_focused(rest).map(|_| show(session, cfg)),
            "recap" => session.edit_recap(rest, &mut resolver).map(|t| {
                if t == Transition::Proceed {
                    show(session, cfg);
                }
            }),
            "add" => {
                let mut parts = rest.split_whitespace();
                let player = parts.next().unwrap_or("");
                let values: Vec<String> = parts.map(str::to_string).collect();
                parse_id(player).and_then(|player| {
                    let pairs = parse_assignments(&values)?;
                    let stat_id = session.submit_new_line(player, &pairs)?;
                    success(format!("Added line #{stat_id}"));
                    show(session, cfg);
                    Ok(())
                })
            }
            "del" => parse_id(rest).and_then(|id| {
                session.delete_line(id)?;
                success(format!("Deleted line #{id}"));
                Ok(())
            }),
            "save" => session.save().map(|saved| {
                if saved {
                    success("Saved");
                } else {
                    info("Nothing to save");
                }
            }),
            "discard" => {
                if session.discard() {
                    success("Changes discarded");
                } else {
                    info("Nothing to discard");
                }
                Ok(())
            }
            "refresh" => session.refresh().map(|_| show(session, cfg)),
            other => Err(AppError::validation(
                "command",
                format!("unknown command '{other}' (try `help`)"),
            )),
        };
        report(result);
    }

    if session.has_unsaved_changes() {
        warning("Leaving with unsaved changes; they were not saved.");
    }
    Ok(())
}

fn report(result: AppResult<()>) {
    if let Err(e) = result {
        error(e);
    }
}

fn parse_id(s: &str) -> AppResult<i64> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| AppError::validation("id", format!("'{}' is not a number", s.trim())))
}

fn open_game<B: StatsBackend>(
    session: &mut GameStatsSession<B>,
    game_id: i64,
    resolver: &mut dyn DecisionResolver,
    cfg: &Config,
) -> AppResult<()> {
    if session.select_game(game_id, resolver)? == Transition::Stay {
        info("Still on the current game.");
        return Ok(());
    }
    let game = session.backend().game(game_id)?;
    header(game.label());
    show(session, cfg);
    Ok(())
}

fn list_games<B: StatsBackend>(session: &mut GameStatsSession<B>) -> AppResult<()> {
    let games = session.completed_games()?;
    if games.is_empty() {
        info(format!("No completed games for {} yet.", session.team().name));
    }
    for g in games {
        println!("  #{:<4} {}", g.id, g.label());
    }
    Ok(())
}

fn show<B: StatsBackend>(session: &GameStatsSession<B>, cfg: &Config) {
    if session.game_id().is_none() {
        info("No game open. Use `games` and `game <id>`.");
        return;
    }
    match session.tab() {
        Tab::Recap => {
            let text = session.recap().text();
            if text.is_empty() {
                println!("(no recap)");
            } else {
                println!("{text}");
            }
        }
        tab => print_grid(session, tab, &cfg.separator_char),
    }
    if let Some(e) = match session.tab() {
        Tab::Batting => session.batting().last_error(),
        Tab::Pitching => session.pitching().last_error(),
        Tab::Recap => None,
    } {
        warning(format!("Last error: {e}"));
    }
}
