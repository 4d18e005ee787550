// Application state and orchestration logic.
//
// The central event loop that receives user commands from the TUI, applies
// them to the draft store, persists accepted actions, and pushes snapshots
// back to the TUI render loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::Database;
use crate::draft::action::Action;
use crate::draft::pick::Player;
use crate::draft::state::{DraftError, DraftState};
use crate::draft::store::DraftStore;
use crate::protocol::{UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub store: DraftStore,
    pub db: Database,
    /// Identifier for the current draft session. The action log is scoped to
    /// this ID so a restart only replays this draft.
    pub draft_id: String,
    /// Status-bar message waiting to be pushed to the TUI.
    pub notice: Option<String>,
}

impl AppState {
    /// Create a new AppState with an empty draft shaped by the league config.
    ///
    /// The `draft_id` identifies the current draft session. On startup, callers
    /// should load the stored draft_id from the database (or generate a new one).
    pub fn new(config: Config, db: Database, draft_id: String) -> Self {
        let initial = DraftState::new(config.league.num_teams, config.draft_settings());
        AppState {
            config,
            store: DraftStore::new(initial),
            db,
            draft_id,
            notice: None,
        }
    }

    pub fn snapshot(&self) -> Arc<DraftState> {
        self.store.snapshot()
    }

    /// Apply an action and, if accepted, append it to the action log.
    ///
    /// A failed write does not undo the transition: the in-memory draft
    /// stays authoritative and the failure is logged.
    pub fn apply(&mut self, action: Action) -> Result<Arc<DraftState>, DraftError> {
        let logged = action.is_logged().then(|| action.clone());
        let snapshot = self.store.dispatch(action)?;

        if let Some(action) = logged {
            if let Err(e) = self.db.append_action(&self.draft_id, &action) {
                warn!("Failed to persist {}: {:#}", action.name(), e);
                self.notice = Some(format!("{} not saved: {}", action.name(), e));
            }
        }
        Ok(snapshot)
    }

    /// Load a fresh player pool into the draft.
    pub fn load_players(&mut self, players: Vec<Player>) -> Result<Arc<DraftState>, DraftError> {
        let count = players.len();
        let snapshot = self.apply(Action::SetPlayers { players })?;
        info!("Player pool loaded: {} players", count);
        Ok(snapshot)
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Sends the current snapshot once, then handles user commands until `Quit`
/// or until the command channel closes. Pushes UI updates through `ui_tx`.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let _ = ui_tx.send(UiUpdate::Snapshot(state.snapshot())).await;
    send_notice(&mut state, &ui_tx).await;

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            UserCommand::Quit => {
                info!("Quit command received, shutting down");
                break;
            }
            cmd => handle_user_command(&mut state, cmd, &ui_tx).await,
        }
    }

    info!("Application event loop exiting");
    Ok(())
}

/// Handle a user command from the TUI.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::Dispatch(action) => {
            let name = action.name();
            let update = match state.apply(action) {
                Ok(snapshot) => UiUpdate::Snapshot(snapshot),
                Err(e) => UiUpdate::Rejected(format!("{}: {}", name, e)),
            };
            let _ = ui_tx.send(update).await;
            send_notice(state, ui_tx).await;
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

/// Push any pending status-bar notice.
async fn send_notice(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    if let Some(notice) = state.notice.take() {
        let _ = ui_tx.send(UiUpdate::Notice(notice)).await;
    }
}

// ---------------------------------------------------------------------------
// Crash recovery
// ---------------------------------------------------------------------------

/// Restore the draft from the database after a crash/restart.
///
/// If the action log has entries for the current draft_id, they are replayed
/// in order through the store. Returns `false` when there was nothing to
/// replay, in which case the caller loads a fresh player pool.
pub fn recover_from_db(state: &mut AppState) -> anyhow::Result<bool> {
    if !state.db.has_draft_in_progress(&state.draft_id)? {
        info!("No draft in progress for draft_id={}, starting fresh", state.draft_id);
        return Ok(false);
    }

    let actions = state.db.load_actions(&state.draft_id)?;
    let action_count = actions.len();
    info!(
        "Crash recovery: replaying {} actions from DB for draft_id={}",
        action_count, state.draft_id
    );

    let skipped = state.store.replay(actions);
    if skipped > 0 {
        warn!("Crash recovery: {} logged actions no longer apply", skipped);
    }

    let snapshot = state.snapshot();
    info!(
        "Crash recovery complete: {} picks restored, {} players remaining",
        snapshot.pick_count(),
        snapshot.undrafted.len()
    );
    state.notice = Some(format!(
        "Restored draft: {} picks, round {}",
        snapshot.pick_count(),
        snapshot.round
    ));

    Ok(true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
