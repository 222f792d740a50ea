use clap::{Parser, Subcommand};

/// Command-line interface definition for rStatbook
/// Per-game baseball stats entry backed by SQLite
#[derive(Parser)]
#[command(
    name = "rstatbook",
    version = env!("CARGO_PKG_VERSION"),
    about = "Enter per-game batting and pitching lines, with derived metrics and season totals, using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Act as this account (overrides the configured one)
    #[arg(global = true, long = "account")]
    pub account: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show the configuration
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage teams
    Team {
        #[command(subcommand)]
        action: TeamAction,
    },

    /// Manage a team's roster
    Roster {
        #[command(subcommand)]
        action: RosterAction,
    },

    /// Manage a team's games
    Game {
        #[command(subcommand)]
        action: GameAction,
    },

    /// Show or edit the stat lines of one game
    Stats {
        #[command(subcommand)]
        action: StatsAction,
    },

    /// Interactive stats entry for a team's completed games
    Session {
        #[arg(long, help = "Team id (defaults to default_team from the config)")]
        team: Option<i64>,

        #[arg(long, help = "Game to open right away")]
        game: Option<i64>,
    },

    /// Season totals per player
    Season {
        #[arg(long, help = "Team id (defaults to default_team from the config)")]
        team: Option<i64>,

        #[arg(long, help = "Show pitching instead of batting")]
        pitching: bool,

        #[arg(long, help = "Print JSON instead of a table")]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum TeamAction {
    /// Create a team; the current account becomes its manager
    Add {
        name: String,
        /// Season label (e.g. 2025)
        season: String,
    },
    /// List teams
    List,
    /// Allow another account to manage the team's stats
    Grant {
        account: String,
        #[arg(long)]
        team: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum RosterAction {
    /// Add a player to the roster
    Add {
        name: String,
        #[arg(long)]
        team: Option<i64>,
        #[arg(long)]
        jersey: Option<u32>,
    },
    /// List roster players
    List {
        #[arg(long)]
        team: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum GameAction {
    /// Add a game. Passing a final score marks it completed.
    Add {
        /// Date (YYYY-MM-DD or "today")
        date: String,
        opponent: String,
        #[arg(long)]
        team: Option<i64>,
        #[arg(long, value_name = "US-THEM", help = "Final score, e.g. 5-3")]
        score: Option<String>,
    },
    /// List games
    List {
        #[arg(long)]
        team: Option<i64>,
        #[arg(long, help = "Only completed games")]
        completed: bool,
    },
}

#[derive(Subcommand)]
pub enum StatsAction {
    /// Show a game's grid with totals and derived metrics
    Show {
        #[arg(long)]
        game: i64,
        #[arg(long)]
        pitching: bool,
        #[arg(long, help = "Print JSON instead of a table")]
        json: bool,
    },
    /// Add a line for a roster player (fields as FIELD=VALUE, e.g. AB=4 H=2)
    Add {
        #[arg(long)]
        game: i64,
        #[arg(long, help = "Roster player id")]
        player: i64,
        #[arg(long)]
        pitching: bool,
        values: Vec<String>,
    },
    /// Change fields of an existing line and save them (FIELD=VALUE ...)
    Set {
        stat_id: i64,
        #[arg(long)]
        game: i64,
        #[arg(long)]
        pitching: bool,
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Delete a line
    Del {
        stat_id: i64,
        #[arg(long)]
        game: i64,
        #[arg(long)]
        pitching: bool,
    },
}
