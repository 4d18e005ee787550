// TUI roster view: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the latest draft snapshot plus the
// purely local bits (starters/bench toggle, cursor, filter, card size). The
// app orchestrator pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::draft::pick::Player;
use crate::draft::state::{DraftState, Team};
use crate::protocol::{UiUpdate, UserCommand};

use layout::{build_layout, AppLayout, LayoutMode};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// A message shown in the status bar until the next one replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// TUI-local state for rendering.
///
/// The draft itself lives in `snapshot`, which is replaced wholesale on
/// every accepted action. Everything else never leaves the TUI.
pub struct ViewState {
    /// Latest published draft snapshot. `None` until the app sends one.
    pub snapshot: Option<Arc<DraftState>>,
    /// Compact mode shows starters when true, bench otherwise.
    pub show_starters: bool,
    /// Arrangement for the current terminal width.
    pub layout_mode: LayoutMode,
    /// Cached card width in columns, recomputed on resize.
    pub card_columns: u16,
    /// Row index into `visible_players()`.
    pub cursor: usize,
    /// Current filter/search text.
    pub filter_text: String,
    /// Whether the filter input is active.
    pub filter_mode: bool,
    /// Whether the quit confirmation dialog is showing.
    pub confirm_quit: bool,
    pub status_message: Option<StatusMessage>,
}

impl Default for ViewState {
    fn default() -> Self {
        let mut state = ViewState {
            snapshot: None,
            show_starters: true,
            layout_mode: LayoutMode::Compact,
            card_columns: layout::MIN_CARD_COLUMNS,
            cursor: 0,
            filter_text: String::new(),
            filter_mode: false,
            confirm_quit: false,
            status_message: None,
        };
        state.resize(80);
        state
    }
}

impl ViewState {
    /// Recompute the layout mode and card size for a new terminal width.
    pub fn resize(&mut self, columns: u16) {
        self.layout_mode = LayoutMode::from_width(columns);
        self.card_columns = layout::card_columns(columns, self.layout_mode);
    }

    /// Replace the draft snapshot, keeping the cursor in range.
    pub fn apply_snapshot(&mut self, snapshot: Arc<DraftState>) {
        self.snapshot = Some(snapshot);
        self.clamp_cursor();
    }

    /// The team whose roster is on screen.
    pub fn tracked_team(&self) -> Option<&Team> {
        self.snapshot.as_deref().map(|s| s.tracked())
    }

    /// Undrafted players matching the filter text, in pool order.
    ///
    /// The filter matches case-insensitively against name, NFL team, and
    /// position.
    pub fn visible_players(&self) -> Vec<&Player> {
        let Some(snapshot) = self.snapshot.as_deref() else {
            return Vec::new();
        };
        let needle = self.filter_text.to_lowercase();
        snapshot
            .undrafted_players()
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.team.to_lowercase() == needle
                    || p.position.display_str().to_lowercase() == needle
            })
            .collect()
    }

    /// The player under the cursor, if the list is non-empty.
    pub fn cursor_player(&self) -> Option<&Player> {
        self.visible_players().get(self.cursor).copied()
    }

    /// Keep the cursor on a real row after the list shrinks.
    pub fn clamp_cursor(&mut self) {
        let len = self.visible_players().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    fn set_message(&mut self, text: String, is_error: bool) {
        self.status_message = Some(StatusMessage { text, is_error });
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => {
            // An accepted action supersedes the last rejection
            if state.status_message.as_ref().is_some_and(|m| m.is_error) {
                state.status_message = None;
            }
            state.apply_snapshot(snapshot);
        }
        UiUpdate::Rejected(msg) => state.set_message(msg, true),
        UiUpdate::Notice(msg) => state.set_message(msg, false),
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete roster view.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area(), state.layout_mode);

    match &layout {
        AppLayout::Compact(l) => {
            widgets::roster::render_header(frame, l.header, state);
            widgets::roster::render_toggle(frame, l.toggle, state);
            if state.show_starters {
                widgets::roster::render_starter_cards(frame, l.cards, state);
            } else {
                widgets::roster::render_bench_cards(frame, l.cards, state);
            }
        }
        AppLayout::Wide(l) => {
            widgets::roster::render_wide(frame, l, state);
        }
    }

    widgets::available::render(frame, layout.available(), state);
    widgets::status_bar::render(frame, layout.status_bar(), state);
    render_help_bar(frame, layout.help_bar(), state.layout_mode);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

/// Key hints for the bottom row. Compact terminals get the short list.
fn help_text(mode: LayoutMode) -> &'static str {
    match mode {
        LayoutMode::Compact => " ↑↓ Enter:Pick u:Undo t/T:Team s:Bench /:Find q:Quit",
        LayoutMode::Wide => {
            " ↑↓:Move Enter:Pick u:Undo t/T:Team a:Set active n:Next round x:Remove +/-:Teams g:Start /:Filter q:Quit"
        }
    }
}

fn render_help_bar(frame: &mut Frame, area: Rect, mode: LayoutMode) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(mode),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, terminal events, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    // 1. Initialize terminal
    let mut terminal = ratatui::init();

    // 2. Set panic hook to restore terminal on crash.
    //    We capture the original hook and chain ours before it.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    // 3. Create ViewState sized to the terminal
    let mut view_state = ViewState::default();
    if let Ok(size) = terminal.size() {
        view_state.resize(size.width);
    }

    // 4. Create crossterm EventStream for async terminal input
    let mut event_stream = EventStream::new();

    // 5. Create render interval (~30fps)
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // 6. Main loop
    loop {
        tokio::select! {
            // UI updates from the app orchestrator
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Channel closed: app is shutting down
                    None => break,
                }
            }

            // Terminal input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(Event::Resize(columns, _))) => view_state.resize(columns),
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    // 7. Restore terminal
    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::draft::action::Action;
    use crate::draft::pick::Position;
    use crate::draft::state::{transition, DraftSettings};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    /// A four-team draft with a small pool loaded.
    pub(crate) fn sample_snapshot() -> Arc<DraftState> {
        let state = DraftState::new(4, DraftSettings::default());
        let mut players = vec![
            Player::new("Josh Allen", Position::Quarterback, 1),
            Player::new("Bijan Robinson", Position::RunningBack, 2),
            Player::new("CeeDee Lamb", Position::WideReceiver, 3),
            Player::new("Travis Kelce", Position::TightEnd, 4),
            Player::new("Justin Tucker", Position::Kicker, 5),
            Player::new("Breece Hall", Position::RunningBack, 6),
        ];
        players[0].team = "BUF".into();
        players[0].bye_week = Some(12);
        players[3].team = "KC".into();
        let state = transition(&state, Action::SetPlayers { players }).unwrap();
        Arc::new(state)
    }

    pub(crate) fn view_with(snapshot: Arc<DraftState>) -> ViewState {
        let mut view = ViewState::default();
        view.apply_snapshot(snapshot);
        view
    }

    pub(crate) fn render_to_string(state: &ViewState, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render_frame(frame, state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn view_state_default_is_sensible() {
        let state = ViewState::default();
        assert!(state.snapshot.is_none());
        assert!(state.show_starters);
        assert_eq!(state.layout_mode, LayoutMode::Compact);
        assert_eq!(state.card_columns, 16);
        assert_eq!(state.cursor, 0);
        assert!(!state.filter_mode);
        assert!(!state.confirm_quit);
        assert!(state.filter_text.is_empty());
        assert!(state.status_message.is_none());
        assert!(state.visible_players().is_empty());
        assert!(state.cursor_player().is_none());
    }

    #[test]
    fn resize_switches_mode_and_card_size() {
        let mut state = ViewState::default();
        state.resize(160);
        assert_eq!(state.layout_mode, LayoutMode::Wide);
        assert_eq!(state.card_columns, layout::MIN_CARD_COLUMNS);
        state.resize(80);
        assert_eq!(state.layout_mode, LayoutMode::Compact);
        assert_eq!(state.card_columns, 16);
    }

    #[test]
    fn visible_players_follow_filter() {
        let mut state = view_with(sample_snapshot());
        assert_eq!(state.visible_players().len(), 6);

        state.filter_text = "rb".into();
        let names: Vec<&str> = state.visible_players().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bijan Robinson", "Breece Hall"]);

        state.filter_text = "KELCE".into();
        assert_eq!(state.visible_players().len(), 1);

        state.filter_text = "buf".into();
        assert_eq!(state.visible_players()[0].name, "Josh Allen");
    }

    #[test]
    fn snapshot_clamps_cursor_when_list_shrinks() {
        let snapshot = sample_snapshot();
        let mut state = view_with(snapshot.clone());
        state.cursor = 5;

        let next = transition(&snapshot, Action::pick("Breece Hall")).unwrap();
        apply_ui_update(&mut state, UiUpdate::Snapshot(Arc::new(next)));
        assert_eq!(state.cursor, 4);
        assert_eq!(state.cursor_player().map(|p| p.name.as_str()), Some("Justin Tucker"));
    }

    #[test]
    fn rejection_sets_error_message() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Rejected("UNDO_PICK_PLAYER: nothing to undo".into()));
        let msg = state.status_message.clone().unwrap();
        assert!(msg.is_error);
        assert!(msg.text.contains("nothing to undo"));
    }

    #[test]
    fn snapshot_clears_error_but_keeps_notice() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Rejected("bad".into()));
        apply_ui_update(&mut state, UiUpdate::Snapshot(sample_snapshot()));
        assert!(state.status_message.is_none());

        apply_ui_update(&mut state, UiUpdate::Notice("Restored draft".into()));
        apply_ui_update(&mut state, UiUpdate::Snapshot(sample_snapshot()));
        assert_eq!(
            state.status_message,
            Some(StatusMessage {
                text: "Restored draft".into(),
                is_error: false
            })
        );
    }

    #[test]
    fn tracked_team_follows_snapshot() {
        let snapshot = sample_snapshot();
        let next = transition(&snapshot, Action::SetTrackedTeam { tracked_team: 2 }).unwrap();
        let state = view_with(Arc::new(next));
        assert_eq!(state.tracked_team().map(|t| t.name()), Some("Team 3".to_string()));
    }

    #[test]
    fn compact_frame_renders_header_and_starters() {
        let state = view_with(sample_snapshot());
        let screen = render_to_string(&state, 80, 30);
        assert!(screen.contains("FF DRAFT"));
        assert!(screen.contains("Team 1"));
        assert!(screen.contains("STARTERS"));
        assert!(screen.contains("QB"));
        assert!(screen.contains("Josh Allen"));
    }

    #[test]
    fn compact_frame_renders_bench_when_toggled() {
        let mut state = view_with(sample_snapshot());
        state.show_starters = false;
        let screen = render_to_string(&state, 80, 30);
        assert!(screen.contains("BENCH"));
        assert!(screen.contains("?"));
    }

    #[test]
    fn wide_frame_renders_all_sections() {
        let mut state = view_with(sample_snapshot());
        state.resize(160);
        let screen = render_to_string(&state, 160, 50);
        assert!(screen.contains("Starters"));
        assert!(screen.contains("Bench"));
        assert!(screen.contains("FLEX"));
        assert!(screen.contains("DST"));
        assert!(screen.contains("Available"));
        assert!(screen.contains("Round 1"));
    }

    #[test]
    fn frame_without_snapshot_does_not_panic() {
        let state = ViewState::default();
        let screen = render_to_string(&state, 80, 24);
        assert!(screen.contains("Waiting for draft"));
    }

    #[test]
    fn quit_dialog_overlays_frame() {
        let mut state = view_with(sample_snapshot());
        state.confirm_quit = true;
        let screen = render_to_string(&state, 80, 30);
        assert!(screen.contains("Leave the draft?"));
    }

    #[test]
    fn help_text_depends_on_mode() {
        assert!(help_text(LayoutMode::Wide).contains("x:Remove"));
        assert!(!help_text(LayoutMode::Compact).contains("x:Remove"));
    }
}
