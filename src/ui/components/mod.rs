//! Composable UI component renderers.
//!
//! # Components
//!
//! - `header`: title and counters
//! - `search`: always-visible search box
//! - `list`: windowed contact rows and scrollbar
//! - `empty`: empty state and loader
//! - `footer`: keybinding hints
//!
//! # Layout
//!
//! ```text
//! row 1            [blank]
//! row 2            [Header]
//! row 3            [Border]
//! rows 4-6         [Search Bar]
//! rows 7..         [List viewport]
//! row rows-1       [Border]
//! row rows         [Footer]
//! ```

mod empty;
mod footer;
mod header;
mod list;
mod search;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{Body, UIViewModel};

use empty::{render_empty_state, render_loader};
use footer::render_footer;
use header::render_header;
use list::render_list;
use search::render_search_bar;

/// Lines used by everything except the list viewport.
pub const CHROME_LINES: usize = 8;

/// Screen row (1-indexed) of the first list line.
pub const LIST_TOP_ROW: usize = 7;

/// Lines available to the list in a pane of `rows` lines.
#[must_use]
pub const fn list_viewport(rows: usize) -> usize {
    rows.saturating_sub(CHROME_LINES)
}

/// Maps a 0-indexed pane line (as reported by mouse events) to a line of the
/// list viewport, or `None` if it falls on the chrome.
#[must_use]
pub fn list_line_at(pane_line: isize, rows: usize) -> Option<usize> {
    let line = usize::try_from(pane_line).ok()?.checked_sub(LIST_TOP_ROW - 1)?;
    (line < list_viewport(rows)).then_some(line)
}

fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Draws a full frame.
pub fn render_frame(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) {
    let mut current_row = 2;

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    current_row = render_search_bar(current_row, &vm.search_bar, theme, cols);
    debug_assert_eq!(current_row, LIST_TOP_ROW);

    let viewport = list_viewport(rows);
    let middle = LIST_TOP_ROW + viewport.saturating_sub(1) / 2;

    match &vm.body {
        Body::Loading(loader) => render_loader(middle, loader, theme, cols),
        Body::Empty(empty) => render_empty_state(middle, empty, theme, cols),
        Body::List(list) => render_list(LIST_TOP_ROW, list, theme, cols),
    }

    let footer_row = rows;
    render_border(footer_row.saturating_sub(1), &theme.colors.border, cols);
    render_footer(footer_row, &vm.footer, theme, cols);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_excludes_chrome() {
        assert_eq!(list_viewport(30), 22);
        assert_eq!(list_viewport(5), 0);
    }

    #[test]
    fn pane_lines_map_onto_list_lines() {
        assert_eq!(list_line_at(6, 30), Some(0));
        assert_eq!(list_line_at(27, 30), Some(21));
        assert_eq!(list_line_at(28, 30), None);
        assert_eq!(list_line_at(3, 30), None);
        assert_eq!(list_line_at(-1, 30), None);
    }
}
