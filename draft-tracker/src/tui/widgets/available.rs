// Available players widget: filterable table of undrafted players.
//
// Columns: Rank, Name, Pos, Team, Bye. The cursor row is highlighted and
// the store's selected player is starred.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use ratatui::Frame;

use crate::draft::pick::Player;
use crate::tui::ViewState;

/// Render the available players table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let visible = state.visible_players();
    let selected = state
        .snapshot
        .as_deref()
        .and_then(|s| s.selected_player.as_ref())
        .map(|id| id.as_str());

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Name"),
        Cell::from("Pos"),
        Cell::from("Team"),
        Cell::from("Bye"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = visible
        .iter()
        .map(|p| {
            let is_selected = selected == Some(p.name.as_str());
            let style = if is_selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(format_row(p, is_selected).map(Cell::from)).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(16),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(3),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(build_title(state, visible.len())),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");

    let mut table_state = TableState::default();
    if !visible.is_empty() {
        table_state.select(Some(state.cursor));
    }
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Cell text for one player row.
pub fn format_row(player: &Player, is_selected: bool) -> [String; 5] {
    let name = if is_selected {
        format!("* {}", player.name)
    } else {
        player.name.clone()
    };
    [
        player.rank.to_string(),
        name,
        player.position.display_str().to_string(),
        player.team.clone(),
        player
            .bye_week
            .map(|b| b.to_string())
            .unwrap_or_else(|| "-".to_string()),
    ]
}

/// Build the title with filter info and the visible count.
fn build_title(state: &ViewState, visible_count: usize) -> Line<'static> {
    let mut title = String::from("Available");
    if state.filter_mode {
        title.push_str(&format!(" /{}_", state.filter_text));
    } else if !state.filter_text.is_empty() {
        title.push_str(&format!(" \"{}\"", state.filter_text));
    }
    title.push_str(&format!(" ({})", visible_count));
    Line::from(title)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
