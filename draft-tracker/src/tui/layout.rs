// Screen layout: panel arrangement and card sizing.
//
// Two arrangements, picked by terminal width.
//
// Compact (< 100 columns):
//
// +--------------------------------------+
// | Header: FF DRAFT + team selector     |
// | Toggle: [STARTERS] BENCH             |
// +--------------------------------------+
// | Card row (wraps)                     |
// +--------------------------------------+
// | Available players (fill)             |
// +--------------------------------------+
// | Status bar                           |
// | Help bar                             |
// +--------------------------------------+
//
// Wide:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +------------------------------+-------------------+
// | Starters: QB/RB/WR/FLEX | TE  | Available players |
// |           column        | DST | (fill)            |
// |                         | K   |                   |
// +------------------------------+                   |
// | Bench                         |                   |
// +------------------------------+-------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Below this many columns the compact arrangement is used.
pub const COMPACT_MAX_WIDTH: u16 = 100;

/// Approximate pixel width of one terminal cell. Card lengths are computed
/// on a pixel viewport and converted back to columns.
pub const CELL_PX: u32 = 8;

/// Narrowest card that still fits a position label and a short name.
pub const MIN_CARD_COLUMNS: u16 = 14;

/// Rows used by one card: border, name, team line, border.
pub const CARD_HEIGHT: u16 = 4;

/// Which arrangement the roster view uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Compact,
    Wide,
}

impl LayoutMode {
    pub fn from_width(columns: u16) -> Self {
        if columns < COMPACT_MAX_WIDTH {
            LayoutMode::Compact
        } else {
            LayoutMode::Wide
        }
    }
}

/// Card length for a viewport `width` pixels wide.
///
/// Compact: `floor(width * 0.85 / 4) - 4`.
/// Wide: `min(85, floor(width * 0.22 / 3) - 8)`.
/// Both saturate at zero for tiny viewports.
pub fn card_length(width: u32, mode: LayoutMode) -> u32 {
    match mode {
        LayoutMode::Compact => (width * 85 / 400).saturating_sub(4),
        LayoutMode::Wide => (width * 22 / 300).saturating_sub(8).min(85),
    }
}

/// Card width in terminal columns for a terminal `columns` wide.
pub fn card_columns(columns: u16, mode: LayoutMode) -> u16 {
    let px = card_length(u32::from(columns) * CELL_PX, mode);
    let cols = u16::try_from(px / CELL_PX).unwrap_or(u16::MAX);
    cols.max(MIN_CARD_COLUMNS)
}

// ---------------------------------------------------------------------------
// Resolved areas
// ---------------------------------------------------------------------------

/// Resolved screen areas for the compact arrangement.
#[derive(Debug, Clone)]
pub struct CompactLayout {
    /// Title and team selector.
    pub header: Rect,
    /// STARTERS / BENCH toggle.
    pub toggle: Rect,
    /// The single card section (starters or bench, per the toggle).
    pub cards: Rect,
    pub available: Rect,
    pub status_bar: Rect,
    pub help_bar: Rect,
}

/// Resolved screen areas for the wide arrangement.
#[derive(Debug, Clone)]
pub struct WideLayout {
    pub status_bar: Rect,
    /// QB, RB, WR and FLEX rows.
    pub starters_left: Rect,
    /// TE, DST and K rows, offset one row down.
    pub starters_right: Rect,
    pub bench: Rect,
    pub available: Rect,
    pub help_bar: Rect,
}

#[derive(Debug, Clone)]
pub enum AppLayout {
    Compact(CompactLayout),
    Wide(WideLayout),
}

impl AppLayout {
    pub fn status_bar(&self) -> Rect {
        match self {
            AppLayout::Compact(l) => l.status_bar,
            AppLayout::Wide(l) => l.status_bar,
        }
    }

    pub fn help_bar(&self) -> Rect {
        match self {
            AppLayout::Compact(l) => l.help_bar,
            AppLayout::Wide(l) => l.help_bar,
        }
    }

    pub fn available(&self) -> Rect {
        match self {
            AppLayout::Compact(l) => l.available,
            AppLayout::Wide(l) => l.available,
        }
    }
}

/// Build the layout for the given area and mode.
pub fn build_layout(area: Rect, mode: LayoutMode) -> AppLayout {
    match mode {
        LayoutMode::Compact => AppLayout::Compact(build_compact(area)),
        LayoutMode::Wide => AppLayout::Wide(build_wide(area)),
    }
}

fn build_compact(area: Rect) -> CompactLayout {
    // Vertical: header(1) | toggle(1) | cards(2 card rows) | available(fill) | status(1) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(CARD_HEIGHT * 2),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    CompactLayout {
        header: vertical[0],
        toggle: vertical[1],
        cards: vertical[2],
        available: vertical[3],
        status_bar: vertical[4],
        help_bar: vertical[5],
    }
}

fn build_wide(area: Rect) -> WideLayout {
    // Vertical: status(1) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(area);

    let status_bar = vertical[0];
    let middle = vertical[1];
    let help_bar = vertical[2];

    // Horizontal: roster (60%) | available (40%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(middle);

    let roster = horizontal[0];
    let available = horizontal[1];

    // Roster vertical: starters (fill, at least six card rows) | bench (two card rows)
    let roster_sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(CARD_HEIGHT * 4 + 2),
            Constraint::Length(CARD_HEIGHT * 2 + 2),
        ])
        .split(roster);

    let starters = roster_sections[0];
    let bench = roster_sections[1];

    // Starters horizontal: QB/RB/WR/FLEX (60%) | TE/DST/K (40%)
    let starter_columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(starters);

    WideLayout {
        status_bar,
        starters_left: starter_columns[0],
        starters_right: starter_columns[1],
        bench,
        available,
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
