//! Console messages: one icon and one colour per severity.

use ansi_term::{Colour, Style};
use std::fmt;
use std::io::{self, BufRead, Write};

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{} {}", Colour::Blue.bold().paint(ICON_INFO), msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{} {}", Colour::Green.bold().paint(ICON_OK), msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{} {}", Colour::Yellow.bold().paint(ICON_WARN), msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{} {}", Colour::Red.bold().paint(ICON_ERR), msg);
}

pub fn header<T: fmt::Display>(msg: T) {
    println!(
        "{}",
        Colour::Blue
            .bold()
            .paint(format!("====================== {}\n", msg))
    );
}

/// Print `question` and read one trimmed line from `input`.
/// `None` on end of input.
pub fn ask<R: BufRead>(input: &mut R, question: &str) -> Option<String> {
    print!("{} ", Style::new().bold().paint(question));
    let _ = io::stdout().flush();

    let mut s = String::new();
    match input.read_line(&mut s) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(s.trim().to_string()),
    }
}
