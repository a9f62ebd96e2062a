use std::fmt;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use vocab_core::model::{DEFAULT_MAX_MISSES, DEFAULT_SUB_SESSION_SIZE, GameSettings, SettingsError};

#[derive(Debug, Parser)]
#[command(name = "valebulary")]
#[command(version)]
#[command(about = "Vocabulary hangman with spaced sub-sessions")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Directory holding the saved game and the default vocabulary file.
    #[arg(long, env = "VALEB_DATA_DIR", default_value = "game_data", global = true)]
    pub data_dir: PathBuf,

    #[arg(long, env = "VALEB_BACKEND", value_enum, default_value_t = Backend::Files, global = true)]
    pub backend: Backend,

    /// SQLite URL; defaults to `valebulary.sqlite3` inside the data directory.
    #[arg(long = "db", env = "VALEB_DB_URL", global = true)]
    pub db_url: Option<String>,

    /// Vocabulary used to build the master session on first start.
    #[arg(long, env = "VALEB_VOCABULARY", global = true)]
    pub vocabulary: Option<PathBuf>,

    #[arg(long, env = "VALEB_SESSION_SIZE", default_value_t = DEFAULT_SUB_SESSION_SIZE, global = true)]
    pub session_size: usize,

    #[arg(long, env = "VALEB_MAX_MISSES", default_value_t = DEFAULT_MAX_MISSES, global = true)]
    pub max_misses: u8,

    /// Fixed RNG seed for reproducible draws.
    #[arg(long, env = "VALEB_SEED", global = true)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Files,
    Sqlite,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Play hangman on the current session (default).
    Play,
    /// Show archived and current sessions.
    Gallery(GalleryArgs),
    /// Build a new master session from a vocabulary file.
    Import(ImportArgs),
}

#[derive(Debug, Clone, Args)]
pub struct GalleryArgs {
    /// List the entries of one tile.
    #[arg(long)]
    pub expand: Option<usize>,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ImportArgs {
    pub file: PathBuf,

    /// Also clear the current session and the history.
    #[arg(long)]
    pub reset: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    Settings(SettingsError),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Settings(e) => write!(f, "{e}"),
            ConfigError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub backend: Backend,
    pub db_url: String,
    pub vocabulary: PathBuf,
    pub settings: GameSettings,
    pub seed: Option<u64>,
}

impl Config {
    /// # Errors
    ///
    /// Returns `ConfigError` for out-of-range game settings or an empty
    /// database URL.
    pub fn from_args(args: &GlobalArgs) -> Result<Self, ConfigError> {
        let settings = GameSettings::new(args.session_size, args.max_misses)
            .map_err(ConfigError::Settings)?;

        let db_url = match &args.db_url {
            Some(raw) if raw.trim().is_empty() => {
                return Err(ConfigError::InvalidDbUrl { raw: raw.clone() });
            }
            Some(raw) => normalize_sqlite_url(raw),
            None => normalize_sqlite_url(&args.data_dir.join("valebulary.sqlite3").display().to_string()),
        };

        let vocabulary = args
            .vocabulary
            .clone()
            .unwrap_or_else(|| args.data_dir.join("vocabulary.json"));

        Ok(Self {
            data_dir: args.data_dir.clone(),
            backend: args.backend,
            db_url,
            vocabulary,
            settings,
            seed: args.seed,
        })
    }
}

/// Turn a bare path or `sqlite:` URL into an absolute `sqlite://` URL.
#[must_use]
pub fn normalize_sqlite_url(raw: &str) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") || raw.starts_with("sqlite:file:") {
        return raw.to_string();
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its directory so `SQLite` can open it.
///
/// # Errors
///
/// Returns an error for URLs without a file path or when the file cannot be
/// created.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" || db_url.starts_with("sqlite:file:") {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ConfigError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ConfigError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}
