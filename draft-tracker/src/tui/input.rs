// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (cursor, toggle,
// filtering).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::ViewState;
use crate::draft::action::Action;
use crate::protocol::UserCommand;

/// Rows moved by PageUp/PageDown.
const PAGE_SIZE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator (draft actions, Quit). Returns `None` when the key press
/// was handled locally by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress; ignoring
    // non-Press events prevents double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode (escape hatch)
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    // Quit confirmation mode: only y/q confirm, n/Esc cancel, everything else blocked
    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    // Filter mode: capture printable characters and special keys
    if view_state.filter_mode {
        return handle_filter_mode(key_event, view_state);
    }

    match key_event.code {
        // Cursor movement selects the player under it
        KeyCode::Up | KeyCode::Char('k') => move_cursor(view_state, -1),
        KeyCode::Down | KeyCode::Char('j') => move_cursor(view_state, 1),
        KeyCode::PageUp => move_cursor(view_state, -(PAGE_SIZE as isize)),
        KeyCode::PageDown => move_cursor(view_state, PAGE_SIZE as isize),

        KeyCode::Enter => pick_target(view_state).map(|player| {
            dispatch(Action::PickPlayer {
                player: player.into(),
            })
        }),
        KeyCode::Char('x') => pick_target(view_state).map(|player| {
            dispatch(Action::RemovePlayer {
                player: player.into(),
            })
        }),
        KeyCode::Char('u') => Some(dispatch(Action::UndoPickPlayer)),
        KeyCode::Char('n') => Some(dispatch(Action::IncrementDraft)),
        KeyCode::Char('g') => Some(dispatch(Action::StartDraft)),

        // Team navigation
        KeyCode::Char('t') => cycle_tracked_team(view_state, true),
        KeyCode::Char('T') => cycle_tracked_team(view_state, false),
        KeyCode::Char('a') => {
            let tracked = view_state.snapshot.as_ref()?.tracked_team;
            Some(dispatch(Action::SetActiveTeam {
                active_team: tracked,
            }))
        }

        // League size; the store rejects zero and any change after the first pick
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let teams = view_state.snapshot.as_ref()?.number_of_teams();
            Some(dispatch(Action::SetNumberOfTeams {
                number_of_teams: teams + 1,
            }))
        }
        KeyCode::Char('-') => {
            let teams = view_state.snapshot.as_ref()?.number_of_teams();
            Some(dispatch(Action::SetNumberOfTeams {
                number_of_teams: teams.saturating_sub(1),
            }))
        }

        KeyCode::Char('s') => {
            view_state.show_starters = !view_state.show_starters;
            None
        }

        KeyCode::Char('/') => {
            view_state.filter_mode = true;
            None
        }

        // Escape: clear filter text if any, otherwise no-op
        KeyCode::Esc => {
            view_state.filter_text.clear();
            view_state.clamp_cursor();
            None
        }

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

fn dispatch(action: Action) -> UserCommand {
    UserCommand::Dispatch(action)
}

/// Handle key events while in quit confirmation mode.
///
/// In quit confirmation mode:
/// - `y` or `q` confirms quit (sends UserCommand::Quit)
/// - `n` or `Esc` cancels (returns to normal mode)
/// - All other keys are blocked (no-op)
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Handle key events while in filter mode.
///
/// In filter mode:
/// - Printable characters are appended to filter_text
/// - Backspace removes the last character
/// - Enter exits and keeps the text, Esc exits and clears it
///
/// Editing the filter moves the cursor back to the top of the list.
fn handle_filter_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.filter_mode = false;
            view_state.filter_text.clear();
        }
        KeyCode::Enter => {
            view_state.filter_mode = false;
        }
        KeyCode::Backspace => {
            view_state.filter_text.pop();
        }
        KeyCode::Char(c) => {
            view_state.filter_text.push(c);
        }
        _ => return None,
    }
    view_state.cursor = 0;
    None
}

/// Move the cursor by `delta` rows and select the player it lands on.
///
/// Returns `None` when the cursor did not move, so holding an arrow at the
/// end of the list does not flood the store with identical selections.
fn move_cursor(view_state: &mut ViewState, delta: isize) -> Option<UserCommand> {
    let len = view_state.visible_players().len();
    if len == 0 {
        return None;
    }
    let target = view_state
        .cursor
        .saturating_add_signed(delta)
        .min(len - 1);
    if target == view_state.cursor {
        return None;
    }
    view_state.cursor = target;
    let name = view_state.cursor_player()?.name.clone();
    Some(dispatch(Action::SelectPlayer {
        player: Some(name.into()),
    }))
}

/// The player Enter and `x` act on: the store's selection when it is still
/// visible, otherwise the row under the cursor.
fn pick_target(view_state: &ViewState) -> Option<String> {
    let snapshot = view_state.snapshot.as_deref()?;
    let visible = view_state.visible_players();
    if let Some(selected) = &snapshot.selected_player {
        if visible.iter().any(|p| p.name == selected.as_str()) {
            return Some(selected.as_str().to_string());
        }
    }
    visible.get(view_state.cursor).map(|p| p.name.clone())
}

/// Step the tracked team forward or back, wrapping around the league.
fn cycle_tracked_team(view_state: &ViewState, forward: bool) -> Option<UserCommand> {
    let snapshot = view_state.snapshot.as_deref()?;
    let teams = snapshot.number_of_teams();
    let tracked_team = if forward {
        (snapshot.tracked_team + 1) % teams
    } else {
        (snapshot.tracked_team + teams - 1) % teams
    };
    Some(dispatch(Action::SetTrackedTeam { tracked_team }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
