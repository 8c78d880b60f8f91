//! Startup import of precomputed KPI payloads from `*.json` files.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use contracts::shared::kpi::TimeRange;
use serde_json::Value;
use thiserror::Error;

use super::kpi_storage;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload is not a JSON object")]
    NotAnObject,
    #[error("payload has no meta.kpi_key")]
    MissingKpiKey,
    #[error("{0}")]
    Range(String),
}

/// One payload ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedEntry {
    pub kpi_key: String,
    pub range: TimeRange,
    pub raw: Value,
}

/// Parse a seed file. A top-level `range` selects the time range (default `30d`)
/// and is stripped from the stored payload.
pub fn parse_seed(contents: &str) -> Result<SeedEntry, SeedError> {
    let mut raw: Value = serde_json::from_str(contents)?;
    let object = raw.as_object_mut().ok_or(SeedError::NotAnObject)?;

    let range = match object.remove("range") {
        None | Some(Value::Null) => TimeRange::default(),
        Some(Value::String(s)) => TimeRange::from_str(&s).map_err(SeedError::Range)?,
        Some(other) => return Err(SeedError::Range(format!("Unknown time range: {}", other))),
    };

    let kpi_key = object
        .get("meta")
        .and_then(|m| m.get("kpi_key"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or(SeedError::MissingKpiKey)?
        .to_string();

    Ok(SeedEntry {
        kpi_key,
        range,
        raw,
    })
}

pub fn read_seed_file(path: &Path) -> Result<SeedEntry, SeedError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_seed(&contents)
}

/// `*.json` files in `dir`, sorted by name.
fn seed_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

/// Import every seed file in `dir`. Bad files are logged and skipped.
/// Returns the number of payloads stored.
pub async fn load_seed_dir(dir: &Path) -> anyhow::Result<usize> {
    if !dir.is_dir() {
        tracing::warn!("Seed directory not found: {}", dir.display());
        return Ok(0);
    }

    let mut loaded = 0;
    for path in seed_files(dir)? {
        match read_seed_file(&path) {
            Ok(entry) => {
                kpi_storage::upsert(&entry.kpi_key, entry.range, &entry.raw).await?;
                tracing::info!(
                    "Seeded KPI {} ({}) from {}",
                    entry.kpi_key,
                    entry.range.as_str(),
                    path.display()
                );
                loaded += 1;
            }
            Err(e) => tracing::warn!("Skipping seed file {}: {}", path.display(), e),
        }
    }
    Ok(loaded)
}
