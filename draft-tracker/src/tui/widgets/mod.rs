// Widgets for the roster view panels.

pub mod available;
pub mod quit_confirm;
pub mod roster;
pub mod status_bar;
