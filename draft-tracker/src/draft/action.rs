// Draft actions: every way the draft state can change.

use serde::{Deserialize, Serialize};

use super::pick::{Player, PlayerId};

/// A request to change the draft state.
///
/// Serialized with a `type` tag so the action log in the database stays
/// readable (`{"type":"PICK_PLAYER","player":"Josh Allen"}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Load the full player pool. Resets rosters and the turn pointer.
    SetPlayers { players: Vec<Player> },
    /// Draft a player onto the active team.
    PickPlayer { player: PlayerId },
    /// Reverse the most recent pick.
    UndoPickPlayer,
    /// Change which team's roster the view displays.
    SetTrackedTeam { tracked_team: usize },
    /// Drop a player from the pool entirely (data correction).
    RemovePlayer { player: PlayerId },
    /// Jump to the start of the next round.
    IncrementDraft,
    /// Highlight a player for a prospective pick, or clear the highlight.
    SelectPlayer { player: Option<PlayerId> },
    /// Resize the league. Only allowed before the first pick.
    SetNumberOfTeams { number_of_teams: usize },
    /// Override whose turn it is.
    SetActiveTeam { active_team: usize },
    /// Mark the draft as started without making a pick.
    StartDraft,
}

impl Action {
    /// Short name for logs and status messages.
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetPlayers { .. } => "SET_PLAYERS",
            Action::PickPlayer { .. } => "PICK_PLAYER",
            Action::UndoPickPlayer => "UNDO_PICK_PLAYER",
            Action::SetTrackedTeam { .. } => "SET_TRACKED_TEAM",
            Action::RemovePlayer { .. } => "REMOVE_PLAYER",
            Action::IncrementDraft => "INCREMENT_DRAFT",
            Action::SelectPlayer { .. } => "SELECT_PLAYER",
            Action::SetNumberOfTeams { .. } => "SET_NUMBER_OF_TEAMS",
            Action::SetActiveTeam { .. } => "SET_ACTIVE_TEAM",
            Action::StartDraft => "START_DRAFT",
        }
    }

    /// Whether the action belongs in the persisted action log. Selection is
    /// cursor state and is not replayed.
    pub fn is_logged(&self) -> bool {
        !matches!(self, Action::SelectPlayer { .. })
    }

    pub fn pick(name: &str) -> Self {
        Action::PickPlayer {
            player: PlayerId::from(name),
        }
    }

    pub fn remove(name: &str) -> Self {
        Action::RemovePlayer {
            player: PlayerId::from(name),
        }
    }

    pub fn select(name: Option<&str>) -> Self {
        Action::SelectPlayer {
            player: name.map(PlayerId::from),
        }
    }
}
