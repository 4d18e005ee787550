// Roster construction and slot assignment.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::pick::{PlayerId, Position};

/// A single slot on a team's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSlot {
    /// The position designation of this slot.
    pub position: Position,
    /// The player occupying this slot, if any.
    pub player: Option<PlayerId>,
}

/// A team's complete roster of slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub slots: Vec<RosterSlot>,
}

/// The standard league shape: QB, 2 RB, 2 WR, FLEX, TE, DST, K and six bench spots.
pub fn default_roster_config() -> HashMap<String, usize> {
    [
        ("QB", 1),
        ("RB", 2),
        ("WR", 2),
        ("FLEX", 1),
        ("TE", 1),
        ("DST", 1),
        ("K", 1),
        ("BENCH", 6),
    ]
    .into_iter()
    .map(|(pos, count)| (pos.to_string(), count))
    .collect()
}

impl Roster {
    /// Create a new roster from a config mapping position strings to slot counts.
    ///
    /// The roster config comes from league.toml `[league.roster]`, e.g.:
    /// `{"QB": 1, "RB": 2, "WR": 2, "FLEX": 1, "BENCH": 6, ...}`
    ///
    /// Slots are created in deterministic order based on `Position::sort_order()`.
    /// Unknown position keys are ignored; config validation rejects them earlier.
    pub fn new(roster_config: &HashMap<String, usize>) -> Self {
        let mut slots: Vec<RosterSlot> = Vec::new();

        for (pos_str, &count) in roster_config {
            if let Some(pos) = Position::from_str_pos(pos_str) {
                for _ in 0..count {
                    slots.push(RosterSlot {
                        position: pos,
                        player: None,
                    });
                }
            }
        }

        slots.sort_by_key(|s| s.position.sort_order());

        Roster { slots }
    }

    fn first_empty(&self, pos: Position) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.position == pos && s.player.is_none())
    }

    /// Find the slot a player at `pos` would be placed into.
    ///
    /// Slot assignment priority:
    /// 1. Dedicated position slot (exact match)
    /// 2. FLEX slot (RB/WR/TE only)
    /// 3. Bench slot
    ///
    /// Returns `None` when every eligible slot is occupied.
    pub fn open_slot_for(&self, pos: Position) -> Option<usize> {
        if !pos.is_meta_slot() {
            if let Some(idx) = self.first_empty(pos) {
                return Some(idx);
            }
        }

        if pos.is_flex_eligible() {
            if let Some(idx) = self.first_empty(Position::Flex) {
                return Some(idx);
            }
        }

        self.first_empty(Position::Bench)
    }

    /// Put a player into a specific slot. The caller has already checked the
    /// slot is open via `open_slot_for`.
    pub fn assign(&mut self, slot: usize, player: PlayerId) {
        if let Some(s) = self.slots.get_mut(slot) {
            s.player = Some(player);
        }
    }

    /// Empty a slot, returning whoever was in it.
    pub fn clear_slot(&mut self, slot: usize) -> Option<PlayerId> {
        self.slots.get_mut(slot).and_then(|s| s.player.take())
    }

    /// Whether a player is already on this roster.
    pub fn has_player(&self, player: &PlayerId) -> bool {
        self.slot_of(player).is_some()
    }

    /// Index of the slot holding `player`, if any.
    pub fn slot_of(&self, player: &PlayerId) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.player.as_ref() == Some(player))
    }

    /// All rostered player ids, in slot order.
    pub fn player_ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.slots.iter().filter_map(|s| s.player.as_ref())
    }

    /// Starter slots (everything except bench), in display order.
    pub fn starters(&self) -> impl Iterator<Item = &RosterSlot> {
        self.slots.iter().filter(|s| s.position != Position::Bench)
    }

    /// Bench slots, in display order.
    pub fn bench(&self) -> impl Iterator<Item = &RosterSlot> {
        self.slots.iter().filter(|s| s.position == Position::Bench)
    }

    /// Whether every starter slot is filled. A bench-only roster never is.
    pub fn starters_complete(&self) -> bool {
        let mut starters = self.starters().peekable();
        starters.peek().is_some() && starters.all(|s| s.player.is_some())
    }

    /// Number of filled (non-empty) slots.
    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.player.is_some()).count()
    }

    /// Total number of slots (including bench).
    pub fn total_count(&self) -> usize {
        self.slots.len()
    }
}
