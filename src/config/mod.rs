use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Account used for the "can manage stats" check.
    #[serde(default = "default_account")]
    pub account: String,
    /// Team used when a command does not pass `--team`.
    #[serde(default)]
    pub default_team: Option<i64>,
    #[serde(default = "default_separator_char")]
    pub separator_char: String,
}

fn default_account() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "scorekeeper".to_string())
}

fn default_separator_char() -> String {
    "-".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            account: default_account(),
            default_team: None,
            separator_char: default_separator_char(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rstatbook")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".rstatbook")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rstatbook.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rstatbook.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let mut cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        Ok(cfg)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Initialize configuration and database files.
    /// Returns the database path that was set up.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        if !is_test {
            fs::create_dir_all(&dir)?;
        }

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = expand_tilde(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path).map_err(|e| {
                io::Error::new(e.kind(), format!("{}: {}", db_path.display(), e))
            })?;
        }

        Ok(db_path)
    }
}
