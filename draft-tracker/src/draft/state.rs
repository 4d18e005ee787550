// Draft state: player pool, rosters, turn pointer, and the transition function.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::action::Action;
use super::pick::{PickRecord, Player, PlayerId, Position, TurnMarker};
use super::roster::{default_roster_config, Roster};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why an action was rejected. A rejected action never changes the state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("team index {index} out of range (league has {teams} teams)")]
    TeamIndexOutOfRange { index: usize, teams: usize },

    #[error("player `{0}` is not available")]
    PlayerNotAvailable(PlayerId),

    #[error("player `{0}` is not in the player pool")]
    PlayerNotFound(PlayerId),

    #[error("no open slot for `{player}` ({position}) on Team {}", .team + 1)]
    NoEligibleSlot {
        player: PlayerId,
        position: Position,
        team: usize,
    },

    #[error("player `{0}` is rostered and cannot be removed")]
    PlayerRostered(PlayerId),

    #[error("player `{0}` appears more than once in the pool")]
    DuplicatePlayer(String),

    #[error("no pick to undo")]
    NothingToUndo,

    #[error("cannot reconfigure the draft after {picks} picks")]
    PicksAlreadyMade { picks: usize },

    #[error("number of teams must be greater than 0")]
    InvalidTeamCount,

    #[error("the draft is complete")]
    DraftComplete,

    #[error("already in the final round ({max_rounds})")]
    RoundLimitReached { max_rounds: u32 },
}

/// Coarse classification of `DraftError` for callers that only need to
/// know what kind of input was bad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidIndex,
    InvalidPick,
    InvalidUndo,
    InvalidReconfiguration,
    InvalidPlayer,
}

impl DraftError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DraftError::TeamIndexOutOfRange { .. } => ErrorKind::InvalidIndex,
            DraftError::PlayerNotAvailable(_)
            | DraftError::NoEligibleSlot { .. }
            | DraftError::DraftComplete
            | DraftError::RoundLimitReached { .. } => ErrorKind::InvalidPick,
            DraftError::NothingToUndo => ErrorKind::InvalidUndo,
            DraftError::PicksAlreadyMade { .. } | DraftError::InvalidTeamCount => {
                ErrorKind::InvalidReconfiguration
            }
            DraftError::PlayerNotFound(_)
            | DraftError::PlayerRostered(_)
            | DraftError::DuplicatePlayer(_) => ErrorKind::InvalidPlayer,
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// How the turn rotates through the teams within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftOrder {
    /// Odd rounds pick 1..N, even rounds N..1.
    #[default]
    Snake,
    /// Every round picks 1..N.
    Linear,
}

impl DraftOrder {
    /// The team picking at position `pick_in_round` of `round` (1-based).
    pub fn team_at(&self, round: u32, pick_in_round: usize, num_teams: usize) -> usize {
        let forward = pick_in_round.min(num_teams.saturating_sub(1));
        match self {
            DraftOrder::Linear => forward,
            DraftOrder::Snake if round % 2 == 0 => num_teams.saturating_sub(1) - forward,
            DraftOrder::Snake => forward,
        }
    }

    /// Where `team` picks within `round`; the inverse of `team_at`.
    pub fn position_of(&self, round: u32, team: usize, num_teams: usize) -> usize {
        let team = team.min(num_teams.saturating_sub(1));
        match self {
            DraftOrder::Snake if round % 2 == 0 => num_teams.saturating_sub(1) - team,
            _ => team,
        }
    }
}

/// League rules that stay fixed for the whole draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSettings {
    pub order: DraftOrder,
    pub max_rounds: u32,
    pub roster_config: HashMap<String, usize>,
}

impl Default for DraftSettings {
    fn default() -> Self {
        let roster_config = default_roster_config();
        let max_rounds = roster_config.values().sum::<usize>() as u32;
        DraftSettings {
            order: DraftOrder::Snake,
            max_rounds,
            roster_config,
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Draft progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DraftStatus {
    #[default]
    NotStarted,
    InProgress,
    Complete,
}

impl DraftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftStatus::NotStarted => "not started",
            DraftStatus::InProgress => "in progress",
            DraftStatus::Complete => "complete",
        }
    }
}

/// A team and its roster. Teams are identified by their 0-based index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub index: usize,
    pub roster: Roster,
}

impl Team {
    pub fn new(index: usize, roster_config: &HashMap<String, usize>) -> Self {
        Team {
            index,
            roster: Roster::new(roster_config),
        }
    }

    /// Display name ("Team 1" for index 0).
    pub fn name(&self) -> String {
        format!("Team {}", self.index + 1)
    }
}

/// The complete state of the draft.
///
/// Snapshots are immutable once published: `transition` works on a clone and
/// returns it, leaving the input untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftState {
    /// Every loaded player, in pool (rank) order.
    pub players: Vec<Player>,
    /// Players not on any roster.
    pub undrafted: BTreeSet<PlayerId>,
    pub teams: Vec<Team>,
    /// Index of the team whose roster the view displays.
    pub tracked_team: usize,
    /// Index of the team currently on the clock.
    pub active_team: usize,
    pub selected_player: Option<PlayerId>,
    /// Current round (1-based).
    pub round: u32,
    /// Position within the current round's draft order (0-based).
    pub pick_in_round: usize,
    pub status: DraftStatus,
    /// All picks in order; the last entry is what undo reverses.
    pub history: Vec<PickRecord>,
    settings: DraftSettings,
}

impl DraftState {
    /// Create an empty draft for `num_teams` teams (at least one).
    pub fn new(num_teams: usize, settings: DraftSettings) -> Self {
        let num_teams = num_teams.max(1);
        let teams = (0..num_teams)
            .map(|i| Team::new(i, &settings.roster_config))
            .collect();
        let active_team = settings.order.team_at(1, 0, num_teams);

        DraftState {
            players: Vec::new(),
            undrafted: BTreeSet::new(),
            teams,
            tracked_team: 0,
            active_team,
            selected_player: None,
            round: 1,
            pick_in_round: 0,
            status: DraftStatus::NotStarted,
            history: Vec::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &DraftSettings {
        &self.settings
    }

    pub fn number_of_teams(&self) -> usize {
        self.teams.len()
    }

    /// The team the view is tracking.
    pub fn tracked(&self) -> &Team {
        &self.teams[self.tracked_team]
    }

    /// The team on the clock.
    pub fn active(&self) -> &Team {
        &self.teams[self.active_team]
    }

    /// Look up a player in the pool.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.name == id.as_str())
    }

    /// Undrafted players in pool order.
    pub fn undrafted_players(&self) -> impl Iterator<Item = &Player> {
        self.players
            .iter()
            .filter(|p| self.undrafted.contains(p.name.as_str()))
    }

    /// Index of the team that rostered `id`, if any.
    pub fn owner_of(&self, id: &PlayerId) -> Option<usize> {
        self.teams
            .iter()
            .position(|t| t.roster.has_player(id))
    }

    /// Every rostered player id across all teams.
    pub fn rostered_ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.teams.iter().flat_map(|t| t.roster.player_ids())
    }

    pub fn pick_count(&self) -> usize {
        self.history.len()
    }

    /// Total picks in a full draft.
    pub fn total_picks(&self) -> usize {
        self.settings.max_rounds as usize * self.teams.len()
    }

    /// List every broken invariant. Empty for any state reachable through
    /// `transition`.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        let mut seen: HashSet<&PlayerId> = HashSet::new();
        for id in self.rostered_ids() {
            if !seen.insert(id) {
                violations.push(format!("`{}` is rostered more than once", id));
            }
            if self.undrafted.contains(id) {
                violations.push(format!("`{}` is both rostered and undrafted", id));
            }
        }

        let pool: BTreeSet<&str> = self.players.iter().map(|p| p.name.as_str()).collect();
        let accounted: BTreeSet<&str> = self
            .undrafted
            .iter()
            .chain(self.rostered_ids())
            .map(|id| id.as_str())
            .collect();
        if pool != accounted {
            violations.push("undrafted + rostered does not equal the player pool".to_string());
        }

        let n = self.teams.len();
        if self.tracked_team >= n {
            violations.push(format!("tracked team {} out of range", self.tracked_team));
        }
        if self.active_team >= n {
            violations.push(format!("active team {} out of range", self.active_team));
        }
        if self.pick_in_round >= n {
            violations.push(format!("pick {} past the end of the round", self.pick_in_round));
        } else if self.active_team != self.settings.order.team_at(self.round, self.pick_in_round, n) {
            violations.push(format!(
                "active team {} is not on the clock at round {} pick {}",
                self.active_team, self.round, self.pick_in_round
            ));
        }

        violations
    }

    // -- individual transitions (operate on a scratch clone) ----------------

    fn ensure_team(&self, index: usize) -> Result<(), DraftError> {
        if index < self.teams.len() {
            Ok(())
        } else {
            Err(DraftError::TeamIndexOutOfRange {
                index,
                teams: self.teams.len(),
            })
        }
    }

    fn fresh_teams(&self, num_teams: usize) -> Vec<Team> {
        (0..num_teams)
            .map(|i| Team::new(i, &self.settings.roster_config))
            .collect()
    }

    fn turn_marker(&self) -> TurnMarker {
        TurnMarker {
            active_team: self.active_team,
            round: self.round,
            pick_in_round: self.pick_in_round,
            status: self.status,
            selected_player: self.selected_player.clone(),
        }
    }

    fn set_players(&mut self, players: Vec<Player>) -> Result<(), DraftError> {
        if !self.history.is_empty() {
            return Err(DraftError::PicksAlreadyMade {
                picks: self.history.len(),
            });
        }

        let mut names = HashSet::new();
        for p in &players {
            if !names.insert(p.name.as_str()) {
                return Err(DraftError::DuplicatePlayer(p.name.clone()));
            }
        }

        self.undrafted = players.iter().map(Player::id).collect();
        self.players = players;
        self.teams = self.fresh_teams(self.teams.len());
        self.selected_player = None;
        self.round = 1;
        self.pick_in_round = 0;
        self.active_team = self.settings.order.team_at(1, 0, self.teams.len());
        self.status = DraftStatus::NotStarted;
        Ok(())
    }

    fn pick_player(&mut self, id: PlayerId) -> Result<(), DraftError> {
        if self.status == DraftStatus::Complete {
            return Err(DraftError::DraftComplete);
        }
        if !self.undrafted.contains(&id) {
            return Err(DraftError::PlayerNotAvailable(id));
        }
        let position = self
            .player(&id)
            .map(|p| p.position)
            .ok_or_else(|| DraftError::PlayerNotFound(id.clone()))?;

        let team = self.active_team;
        let slot = self.teams[team]
            .roster
            .open_slot_for(position)
            .ok_or_else(|| DraftError::NoEligibleSlot {
                player: id.clone(),
                position,
                team,
            })?;

        let before = self.turn_marker();
        self.teams[team].roster.assign(slot, id.clone());
        self.undrafted.remove(&id);
        self.selected_player = None;
        self.history.push(PickRecord {
            pick_number: self.history.len() as u32 + 1,
            team,
            slot,
            player: id,
            before,
        });
        self.status = DraftStatus::InProgress;
        self.advance_turn();
        Ok(())
    }

    /// Move the turn pointer one pick forward, or finish the draft.
    fn advance_turn(&mut self) {
        let n = self.teams.len();
        let final_pick = self.round >= self.settings.max_rounds && self.pick_in_round + 1 >= n;
        let all_starters_filled = self.teams.iter().all(|t| t.roster.starters_complete());
        if final_pick || all_starters_filled {
            self.status = DraftStatus::Complete;
            return;
        }

        self.pick_in_round += 1;
        if self.pick_in_round >= n {
            self.pick_in_round = 0;
            self.round += 1;
        }
        self.active_team = self.settings.order.team_at(self.round, self.pick_in_round, n);
    }

    fn undo_pick(&mut self) -> Result<(), DraftError> {
        let record = self.history.pop().ok_or(DraftError::NothingToUndo)?;

        self.teams[record.team].roster.clear_slot(record.slot);
        self.undrafted.insert(record.player);

        let before = record.before;
        self.active_team = before.active_team;
        self.round = before.round;
        self.pick_in_round = before.pick_in_round;
        self.status = before.status;
        self.selected_player = before.selected_player;
        Ok(())
    }

    fn remove_player(&mut self, id: PlayerId) -> Result<(), DraftError> {
        if self.owner_of(&id).is_some() {
            return Err(DraftError::PlayerRostered(id));
        }
        let Some(idx) = self.players.iter().position(|p| p.name == id.as_str()) else {
            return Ok(());
        };

        self.players.remove(idx);
        self.undrafted.remove(&id);
        if self.selected_player.as_ref() == Some(&id) {
            self.selected_player = None;
        }
        Ok(())
    }

    fn increment_draft(&mut self) -> Result<(), DraftError> {
        if self.status == DraftStatus::Complete {
            return Err(DraftError::DraftComplete);
        }
        if self.round >= self.settings.max_rounds {
            return Err(DraftError::RoundLimitReached {
                max_rounds: self.settings.max_rounds,
            });
        }

        self.round += 1;
        self.pick_in_round = 0;
        self.active_team = self.settings.order.team_at(self.round, 0, self.teams.len());
        self.status = DraftStatus::InProgress;
        Ok(())
    }

    fn select_player(&mut self, id: Option<PlayerId>) -> Result<(), DraftError> {
        if let Some(ref id) = id {
            if self.player(id).is_none() {
                return Err(DraftError::PlayerNotFound(id.clone()));
            }
        }
        self.selected_player = id;
        Ok(())
    }

    fn set_number_of_teams(&mut self, num_teams: usize) -> Result<(), DraftError> {
        if num_teams == 0 {
            return Err(DraftError::InvalidTeamCount);
        }
        if !self.history.is_empty() {
            return Err(DraftError::PicksAlreadyMade {
                picks: self.history.len(),
            });
        }

        self.teams = self.fresh_teams(num_teams);
        if self.tracked_team >= num_teams {
            self.tracked_team = 0;
        }
        self.pick_in_round = 0;
        self.active_team = self.settings.order.team_at(self.round, 0, num_teams);
        Ok(())
    }

    /// Put `team` on the clock and move the turn pointer to its spot in the
    /// current round, so rotation continues from there.
    fn set_active_team(&mut self, team: usize) -> Result<(), DraftError> {
        self.ensure_team(team)?;
        self.active_team = team;
        self.pick_in_round = self
            .settings
            .order
            .position_of(self.round, team, self.teams.len());
        Ok(())
    }

    fn start_draft(&mut self) -> Result<(), DraftError> {
        match self.status {
            DraftStatus::Complete => Err(DraftError::DraftComplete),
            _ => {
                self.status = DraftStatus::InProgress;
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// Apply `action` to `state`, producing the next snapshot.
///
/// On error the input snapshot is the current state; nothing is partially
/// applied because all work happens on a clone.
pub fn transition(state: &DraftState, action: Action) -> Result<DraftState, DraftError> {
    let mut next = state.clone();

    match action {
        Action::SetPlayers { players } => next.set_players(players)?,
        Action::PickPlayer { player } => next.pick_player(player)?,
        Action::UndoPickPlayer => next.undo_pick()?,
        Action::SetTrackedTeam { tracked_team } => {
            next.ensure_team(tracked_team)?;
            next.tracked_team = tracked_team;
        }
        Action::RemovePlayer { player } => next.remove_player(player)?,
        Action::IncrementDraft => next.increment_draft()?,
        Action::SelectPlayer { player } => next.select_player(player)?,
        Action::SetNumberOfTeams { number_of_teams } => next.set_number_of_teams(number_of_teams)?,
        Action::SetActiveTeam { active_team } => next.set_active_team(active_team)?,
        Action::StartDraft => next.start_draft()?,
    }

    Ok(next)
}
