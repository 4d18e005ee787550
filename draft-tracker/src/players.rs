// Player pool loading from a rankings CSV.
//
// Expected headers: Rank,Name,Pos,Team,Bye. Extra columns (ADP, tiers,
// projections) are ignored.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::draft::pick::{Player, Position};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PlayerPoolError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPlayerRow {
    Rank: u32,
    Name: String,
    Pos: String,
    #[serde(default)]
    Team: String,
    #[serde(default)]
    Bye: String,
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

const REQUIRED_HEADERS: [&str; 3] = ["Rank", "Name", "Pos"];

/// Parse rows from any reader. Malformed rows and unknown positions are
/// skipped with a warning; duplicate names fail the whole load. `source`
/// labels errors.
fn load_players_from_reader<R: Read>(rdr: R, source: &str) -> Result<Vec<Player>, PlayerPoolError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);

    let headers = reader.headers().map_err(|e| PlayerPoolError::Csv {
        path: source.to_string(),
        source: e,
    })?;
    for required in REQUIRED_HEADERS {
        if !headers.iter().any(|h| h == required) {
            return Err(PlayerPoolError::Validation(format!(
                "{} is missing the `{}` column",
                source, required
            )));
        }
    }

    let mut players = Vec::new();
    let mut seen = HashSet::new();

    for result in reader.deserialize::<RawPlayerRow>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
                continue;
            }
        };

        let name = raw.Name.trim().to_string();
        if name.is_empty() {
            warn!("skipping player row with empty name (rank {})", raw.Rank);
            continue;
        }

        // Players never carry a meta-slot position
        let position = match Position::from_str_pos(&raw.Pos) {
            Some(pos) if !pos.is_meta_slot() => pos,
            _ => {
                warn!("skipping player '{}': unknown position '{}'", name, raw.Pos);
                continue;
            }
        };

        if !seen.insert(name.clone()) {
            return Err(PlayerPoolError::Validation(format!(
                "duplicate player name '{}'",
                name
            )));
        }

        players.push(Player {
            name,
            position,
            team: raw.Team.trim().to_string(),
            rank: raw.Rank,
            bye_week: raw.Bye.trim().parse().ok(),
        });
    }

    players.sort_by_key(|p| p.rank);
    Ok(players)
}

/// Load the player pool from a CSV file.
pub fn load_players(path: &Path) -> Result<Vec<Player>, PlayerPoolError> {
    let file = std::fs::File::open(path).map_err(|e| PlayerPoolError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let players = load_players_from_reader(file, &path.display().to_string())?;

    if players.is_empty() {
        return Err(PlayerPoolError::Validation(format!(
            "{} produced zero valid rows",
            path.display()
        )));
    }

    info!("Loaded {} players from {}", players.len(), path.display());
    Ok(players)
}

/// Load the player pool from the path in the config.
pub fn load_from_config(config: &Config) -> Result<Vec<Player>, PlayerPoolError> {
    load_players(Path::new(&config.data_paths.players))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
