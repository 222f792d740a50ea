use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::table::strip_ansi;
use ansi_term::Colour;

/// Colour per logged operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" => Colour::Green,
        "del" => Colour::Red,
        "edit" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        "team" | "roster" | "game" => Colour::Cyan,
        _ => Colour::White,
    }
}

const MAX_TARGET_WIDTH: usize = 40;

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;
        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for e in entries {
            let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or(e.date.clone());

            let mut op_target = color_for_operation(&e.operation)
                .paint(e.operation.as_str())
                .to_string();
            if !e.target.is_empty() {
                let target: String = if e.target.chars().count() > MAX_TARGET_WIDTH {
                    let mut t: String = e.target.chars().take(MAX_TARGET_WIDTH - 3).collect();
                    t.push_str("...");
                    t
                } else {
                    e.target.clone()
                };
                op_target.push_str(&format!(" ({target})"));
            }

            let visible = strip_ansi(&op_target).chars().count();
            let padding = " ".repeat((MAX_TARGET_WIDTH + 12).saturating_sub(visible));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id,
                date,
                op_target,
                padding,
                e.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
