//! Formatting utilities used for CLI outputs.

use crate::utils::colors::{GREY, RESET, YELLOW};

/// Mark an edited, not yet saved, value.
pub fn dirty(s: &str) -> String {
    format!("{YELLOW}{s}*{RESET}")
}

/// Grey out the `-` placeholder used for undefined metrics.
pub fn sentinel_aware(s: String) -> String {
    if s == crate::core::metrics::SENTINEL {
        format!("{GREY}{s}{RESET}")
    } else {
        s
    }
}

/// `#12 Mia Lopez` or just the name when the jersey is unknown.
pub fn player_label(name: &str, jersey: Option<u32>) -> String {
    match jersey {
        Some(n) => format!("#{n} {name}"),
        None => name.to_string(),
    }
}
