// Message types passed between the TUI and the application task.

use std::sync::Arc;

use crate::draft::action::Action;
use crate::draft::state::DraftState;

/// Commands sent from the TUI to the application task.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Ask the store to apply an action.
    Dispatch(Action),
    Quit,
}

/// Updates pushed from the application task to the TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    /// A new draft snapshot was published.
    Snapshot(Arc<DraftState>),
    /// An action was rejected; the message is shown in the status bar.
    Rejected(String),
    /// Informational status-bar message (recovery, persistence problems).
    Notice(String),
}
