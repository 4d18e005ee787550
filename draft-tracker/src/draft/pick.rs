// Players, positions, and individual pick records.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Football positions used for players and roster slot designations.
///
/// `Flex` and `Bench` are meta-slots: no player carries them as a position,
/// but rosters use them to designate overflow slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    Flex,
    TightEnd,
    Defense,
    Kicker,
    Bench,
}

impl Position {
    /// Parse a position string into a Position enum.
    ///
    /// Accepts the common abbreviations used by rankings sites:
    /// - "D/ST", "DST", "DEF" -> Defense
    /// - "K", "PK" -> Kicker
    /// - "BE", "BN", "BENCH" -> Bench
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "FLEX" | "W/R/T" => Some(Position::Flex),
            "TE" => Some(Position::TightEnd),
            "DST" | "D/ST" | "DEF" => Some(Position::Defense),
            "K" | "PK" => Some(Position::Kicker),
            "BE" | "BN" | "BENCH" => Some(Position::Bench),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::Flex => "FLEX",
            Position::TightEnd => "TE",
            Position::Defense => "DST",
            Position::Kicker => "K",
            Position::Bench => "BE",
        }
    }

    /// Whether a player at this position may occupy a FLEX slot.
    pub fn is_flex_eligible(&self) -> bool {
        matches!(
            self,
            Position::RunningBack | Position::WideReceiver | Position::TightEnd
        )
    }

    /// Whether this is a meta-slot (not a concrete playing position).
    pub fn is_meta_slot(&self) -> bool {
        matches!(self, Position::Flex | Position::Bench)
    }

    /// Deterministic ordering index for roster slot display.
    pub fn sort_order(&self) -> u8 {
        match self {
            Position::Quarterback => 0,
            Position::RunningBack => 1,
            Position::WideReceiver => 2,
            Position::Flex => 3,
            Position::TightEnd => 4,
            Position::Defense => 5,
            Position::Kicker => 6,
            Position::Bench => 7,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Player identifier. Names are unique within a draft, so the name is the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(name: impl Into<String>) -> Self {
        PlayerId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for PlayerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(name: &str) -> Self {
        PlayerId(name.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(name: String) -> Self {
        PlayerId(name)
    }
}

/// A draftable player from the rankings pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub position: Position,
    /// NFL team abbreviation (e.g. "KC"). Empty for free agents.
    #[serde(default)]
    pub team: String,
    /// Overall rank in the loaded pool (1-indexed).
    pub rank: u32,
    #[serde(default)]
    pub bye_week: Option<u8>,
}

impl Player {
    pub fn new(name: &str, position: Position, rank: u32) -> Self {
        Player {
            name: name.to_string(),
            position,
            team: String::new(),
            rank,
            bye_week: None,
        }
    }

    pub fn id(&self) -> PlayerId {
        PlayerId::new(self.name.clone())
    }
}

/// Where the draft stood before a pick was made.
///
/// Undo restores these fields verbatim, which is what makes pick/undo an
/// exact inverse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnMarker {
    pub active_team: usize,
    pub round: u32,
    pub pick_in_round: usize,
    pub status: super::state::DraftStatus,
    pub selected_player: Option<PlayerId>,
}

/// A single draft pick record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickRecord {
    /// Sequential pick number (1-indexed).
    pub pick_number: u32,
    /// Index of the team that made the pick.
    pub team: usize,
    /// Index into the team's roster slots that received the player.
    pub slot: usize,
    pub player: PlayerId,
    /// Turn state immediately before the pick.
    pub before: TurnMarker,
}
