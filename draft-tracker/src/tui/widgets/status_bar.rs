// Status bar widget: draft status, progress, whose turn, last message.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::draft::state::{DraftState, DraftStatus};
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [status dot + label] [round/pick counter] [teams] [message]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    match state.snapshot.as_deref() {
        Some(draft) => {
            let (dot, dot_color) = status_indicator(draft.status);
            spans.push(Span::styled(
                format!(" {} ", dot),
                Style::default().fg(dot_color),
            ));
            spans.push(Span::styled(
                draft.status.as_str(),
                Style::default().fg(Color::White),
            ));
            spans.push(separator());
            spans.push(Span::styled(
                progress_text(draft),
                Style::default().fg(Color::White),
            ));
            spans.push(separator());
            spans.push(Span::styled(
                turn_text(draft),
                Style::default().fg(Color::White),
            ));
        }
        None => {
            spans.push(Span::styled(" connecting...", Style::default().fg(Color::Gray)));
        }
    }

    if let Some(msg) = &state.status_message {
        let style = if msg.is_error {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        };
        spans.push(separator());
        spans.push(Span::styled(msg.text.clone(), style));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

fn separator() -> Span<'static> {
    Span::styled(" | ", Style::default().fg(Color::Gray))
}

/// Return the status dot character and its color.
pub fn status_indicator(status: DraftStatus) -> (&'static str, Color) {
    match status {
        DraftStatus::NotStarted => ("●", Color::Gray),
        DraftStatus::InProgress => ("●", Color::Green),
        DraftStatus::Complete => ("●", Color::Blue),
    }
}

/// "Round 2 · Pick 3/10 (13 of 150)"
pub fn progress_text(draft: &DraftState) -> String {
    format!(
        "Round {} · Pick {}/{} ({} of {})",
        draft.round,
        draft.pick_in_round + 1,
        draft.number_of_teams(),
        draft.pick_count(),
        draft.total_picks()
    )
}

/// "On the clock: Team 4 · Tracking: Team 1"
pub fn turn_text(draft: &DraftState) -> String {
    format!(
        "On the clock: {} · Tracking: {}",
        draft.active().name(),
        draft.tracked().name()
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
