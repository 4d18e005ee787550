// Snapshot store: holds the current draft state and applies actions to it.

use std::sync::Arc;

use tracing::{debug, warn};

use super::action::Action;
use super::state::{transition, DraftError, DraftState};

/// Owner of the current draft snapshot.
///
/// Readers get an `Arc` to an immutable snapshot; `dispatch` replaces it
/// with a new one only when the action is accepted.
#[derive(Debug, Clone)]
pub struct DraftStore {
    current: Arc<DraftState>,
}

impl DraftStore {
    pub fn new(initial: DraftState) -> Self {
        DraftStore {
            current: Arc::new(initial),
        }
    }

    /// The current snapshot. Cheap to clone and safe to hold across dispatches.
    pub fn snapshot(&self) -> Arc<DraftState> {
        Arc::clone(&self.current)
    }

    /// Apply an action. On rejection the current snapshot is unchanged and
    /// the error is returned to the caller.
    pub fn dispatch(&mut self, action: Action) -> Result<Arc<DraftState>, DraftError> {
        let name = action.name();
        match transition(&self.current, action) {
            Ok(next) => {
                debug!(
                    "{} accepted (round {}, pick {}, active Team {})",
                    name,
                    next.round,
                    next.pick_count(),
                    next.active_team + 1
                );
                self.current = Arc::new(next);
                Ok(self.snapshot())
            }
            Err(e) => {
                warn!("{} rejected: {}", name, e);
                Err(e)
            }
        }
    }

    /// Apply a sequence of previously accepted actions, e.g. from the
    /// persisted action log. Actions that no longer apply are skipped and
    /// counted.
    pub fn replay<I>(&mut self, actions: I) -> usize
    where
        I: IntoIterator<Item = Action>,
    {
        let mut skipped = 0;
        for action in actions {
            if self.dispatch(action).is_err() {
                skipped += 1;
            }
        }
        skipped
    }
}
