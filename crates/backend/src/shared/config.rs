use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

/// Directory of `*.json` KPI payloads imported at startup. No directory, no import.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeedConfig {
    pub dir: Option<String>,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/kpi.db"

[server]
port = 3000

[seed]
dir = "seed"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Some(exe_dir) = exe_dir() {
        let config_path = exe_dir.join("config.toml");
        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            let contents = std::fs::read_to_string(&config_path)?;
            return parse_config(&contents);
        }
        tracing::warn!("config.toml not found at: {}", config_path.display());
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    Ok(toml::from_str(contents)?)
}

/// Database file path; relative paths resolve against the executable directory.
pub fn get_database_path(config: &Config) -> PathBuf {
    resolve_path(&config.database.path)
}

/// Seed directory, resolved like the database path, falling back to the
/// working directory during development. `None` when not configured.
pub fn get_seed_dir(config: &Config) -> Option<PathBuf> {
    let dir = config.seed.dir.as_deref().filter(|d| !d.trim().is_empty())?;
    let resolved = resolve_path(dir);
    if !resolved.exists() && Path::new(dir).exists() {
        return Some(PathBuf::from(dir));
    }
    Some(resolved)
}

fn resolve_path(path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        return p.to_path_buf();
    }
    match exe_dir() {
        Some(dir) => dir.join(p),
        None => PathBuf::from(path),
    }
}

fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}
