// Roster widget: the tracked team's starters and bench as cards.
//
// Each card is a bordered box titled with a position label. Starter cards
// are labelled by slot (QB, RB, RB, WR, WR, FLEX, TE, DST, K); bench cards
// by the occupant's own position, or "?" while empty.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::draft::pick::Position;
use crate::draft::roster::RosterSlot;
use crate::draft::state::{DraftState, Team};
use crate::tui::layout::{WideLayout, CARD_HEIGHT};
use crate::tui::ViewState;

/// Label for a bench card with nobody in it.
pub const EMPTY_BENCH_LABEL: &str = "?";

/// Wide view, left starters column.
const LEFT_GROUPS: [Position; 4] = [
    Position::Quarterback,
    Position::RunningBack,
    Position::WideReceiver,
    Position::Flex,
];

/// Wide view, right starters column. Drawn one card row lower.
const RIGHT_GROUPS: [Position; 3] = [Position::TightEnd, Position::Defense, Position::Kicker];

const WAITING: &str = "Waiting for draft state...";

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

/// Display data for one roster card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub label: String,
    /// Occupant's name; `None` for an open slot.
    pub name: Option<String>,
    /// NFL team and bye week, when known.
    pub detail: String,
}

fn slot_card(draft: &DraftState, slot: &RosterSlot, label: String) -> Card {
    let Some(id) = &slot.player else {
        return Card {
            label,
            name: None,
            detail: String::new(),
        };
    };
    let detail = draft
        .player(id)
        .map(|p| match (p.team.is_empty(), p.bye_week) {
            (false, Some(bye)) => format!("{} · bye {}", p.team, bye),
            (false, None) => p.team.clone(),
            (true, Some(bye)) => format!("bye {}", bye),
            (true, None) => String::new(),
        })
        .unwrap_or_default();
    Card {
        label,
        name: Some(id.to_string()),
        detail,
    }
}

/// Starter cards in roster slot order.
pub fn starter_cards(draft: &DraftState, team: &Team) -> Vec<Card> {
    team.roster
        .starters()
        .map(|slot| slot_card(draft, slot, slot.position.display_str().to_string()))
        .collect()
}

/// Starter cards for the slots designated `position`.
pub fn group_cards(draft: &DraftState, team: &Team, position: Position) -> Vec<Card> {
    team.roster
        .starters()
        .filter(|slot| slot.position == position)
        .map(|slot| slot_card(draft, slot, position.display_str().to_string()))
        .collect()
}

/// Bench cards, labelled by the occupant's position or "?".
pub fn bench_cards(draft: &DraftState, team: &Team) -> Vec<Card> {
    team.roster
        .bench()
        .map(|slot| {
            let label = slot
                .player
                .as_ref()
                .and_then(|id| draft.player(id))
                .map(|p| p.position.display_str().to_string())
                .unwrap_or_else(|| EMPTY_BENCH_LABEL.to_string());
            slot_card(draft, slot, label)
        })
        .collect()
}

/// Cut `text` to `width` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// The two body lines of a card whose interior is `width` columns wide.
pub fn format_card_lines(card: &Card, width: usize) -> [String; 2] {
    match &card.name {
        Some(name) => [truncate(name, width), truncate(&card.detail, width)],
        None => ["--".to_string(), String::new()],
    }
}

fn render_card(frame: &mut Frame, area: Rect, card: &Card) {
    let filled = card.name.is_some();
    let border_color = if filled { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            card.label.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ));

    let [name, detail] = format_card_lines(card, area.width.saturating_sub(2) as usize);
    let name_style = if filled {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let lines = vec![
        Line::from(Span::styled(name, name_style)),
        Line::from(Span::styled(detail, Style::default().fg(Color::Gray))),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Lay cards out left to right, wrapping onto further rows while they fit.
fn render_card_grid(frame: &mut Frame, area: Rect, cards: &[Card], card_columns: u16) {
    if area.width == 0 {
        return;
    }
    let width = card_columns.clamp(1, area.width);
    let per_row = usize::from(area.width / width);
    let rows = usize::from(area.height / CARD_HEIGHT);

    for (i, card) in cards.iter().enumerate() {
        let (row, col) = (i / per_row, i % per_row);
        if row >= rows {
            break;
        }
        let rect = Rect::new(
            area.x + col as u16 * width,
            area.y + row as u16 * CARD_HEIGHT,
            width,
            CARD_HEIGHT,
        );
        render_card(frame, rect, card);
    }
}

fn render_waiting(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(WAITING).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Compact view
// ---------------------------------------------------------------------------

/// Title line with the tracked-team selector.
pub fn render_header(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![Span::styled(
        " FF DRAFT ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )];

    match state.snapshot.as_deref() {
        Some(draft) => {
            spans.push(Span::raw("  ◀ "));
            spans.push(Span::styled(
                draft.tracked().name(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" ▶"));
            if draft.tracked_team == draft.active_team {
                spans.push(Span::styled(
                    "  on the clock",
                    Style::default().fg(Color::Yellow),
                ));
            }
        }
        None => {
            spans.push(Span::styled(
                format!("  {}", WAITING),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// STARTERS / BENCH toggle; the shown section is highlighted.
pub fn render_toggle(frame: &mut Frame, area: Rect, state: &ViewState) {
    let on = Style::default()
        .fg(Color::Black)
        .bg(Color::White)
        .add_modifier(Modifier::BOLD);
    let off = Style::default().fg(Color::Gray);
    let (starters, bench) = if state.show_starters { (on, off) } else { (off, on) };

    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(" STARTERS ", starters),
        Span::raw(" "),
        Span::styled(" BENCH ", bench),
        Span::styled("  (s)", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// The tracked team's starters as a wrapping card row.
pub fn render_starter_cards(frame: &mut Frame, area: Rect, state: &ViewState) {
    match state.snapshot.as_deref() {
        Some(draft) => {
            let cards = starter_cards(draft, draft.tracked());
            render_card_grid(frame, area, &cards, state.card_columns);
        }
        None => render_waiting(frame, area),
    }
}

/// The tracked team's bench as a wrapping card row.
pub fn render_bench_cards(frame: &mut Frame, area: Rect, state: &ViewState) {
    match state.snapshot.as_deref() {
        Some(draft) => {
            let cards = bench_cards(draft, draft.tracked());
            render_card_grid(frame, area, &cards, state.card_columns);
        }
        None => render_waiting(frame, area),
    }
}

// ---------------------------------------------------------------------------
// Wide view
// ---------------------------------------------------------------------------

/// One card row per position group, optionally leaving the first row blank.
fn render_groups(
    frame: &mut Frame,
    area: Rect,
    draft: &DraftState,
    groups: &[Position],
    skip_rows: u16,
    card_columns: u16,
) {
    let team = draft.tracked();
    for (i, &position) in groups.iter().enumerate() {
        let offset = (skip_rows + i as u16) * CARD_HEIGHT;
        if offset + CARD_HEIGHT > area.height {
            break;
        }
        let row = Rect::new(area.x, area.y + offset, area.width, CARD_HEIGHT);
        let cards = group_cards(draft, team, position);
        render_card_grid(frame, row, &cards, card_columns);
    }
}

/// Starters in two columns with the bench underneath.
pub fn render_wide(frame: &mut Frame, layout: &WideLayout, state: &ViewState) {
    let Some(draft) = state.snapshot.as_deref() else {
        let block = Block::default().borders(Borders::ALL).title("Starters");
        let inner = block.inner(layout.starters_left);
        frame.render_widget(block, layout.starters_left);
        render_waiting(frame, inner);
        return;
    };
    let team = draft.tracked();

    let mut title = format!(
        "{} Starters ({}/{})",
        team.name(),
        team.roster.filled_count(),
        team.roster.total_count()
    );
    if draft.tracked_team == draft.active_team {
        title.push_str(" (on the clock)");
    }
    let left = Block::default().borders(Borders::ALL).title(title);
    let left_inner = left.inner(layout.starters_left);
    frame.render_widget(left, layout.starters_left);
    render_groups(frame, left_inner, draft, &LEFT_GROUPS, 0, state.card_columns);

    let right = Block::default().borders(Borders::TOP | Borders::RIGHT | Borders::BOTTOM);
    let right_inner = right.inner(layout.starters_right);
    frame.render_widget(right, layout.starters_right);
    render_groups(frame, right_inner, draft, &RIGHT_GROUPS, 1, state.card_columns);

    let bench = bench_cards(draft, team);
    let filled = bench.iter().filter(|c| c.name.is_some()).count();
    let bench_block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Bench ({}/{})", filled, bench.len()));
    let bench_inner = bench_block.inner(layout.bench);
    frame.render_widget(bench_block, layout.bench);
    render_card_grid(frame, bench_inner, &bench, state.card_columns);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
