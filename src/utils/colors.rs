/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Win/loss color for a game result.
pub fn color_for_result(team_score: Option<u32>, opponent_score: Option<u32>) -> &'static str {
    match (team_score, opponent_score) {
        (Some(us), Some(them)) if us > them => GREEN,
        (Some(us), Some(them)) if us < them => RED,
        (Some(_), Some(_)) => CYAN,
        _ => RESET,
    }
}
