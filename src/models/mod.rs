pub mod game;
pub mod innings;
pub mod prompt;
pub mod stat_line;
