// Draft state machine: players, rosters, actions, and the snapshot store.

pub mod action;
pub mod pick;
pub mod roster;
pub mod state;
pub mod store;
