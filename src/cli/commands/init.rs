use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the SQLite database
///  - all pending DB migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = db_path.to_string_lossy().to_string();

    println!("⚙️  Initializing rStatbook…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", &db_path);

    let pool = DbPool::new(&db_path)?;
    init_db(&pool.conn)?;

    success(format!("Database initialized at {}", &db_path));

    if let Err(e) = audit(
        &pool.conn,
        "init",
        "database",
        &format!("Database initialized at {}", &db_path),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    Ok(())
}
