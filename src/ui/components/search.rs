//! Search bar component renderer.
//!
//! The search bar is always shown. While it has focus the border uses the
//! accent color and a block cursor follows the query.

use crate::ui::helpers::{char_len, position_cursor, truncate_chars};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

/// Spaces left and right of the box.
const SEARCH_BOX_MARGIN: usize = 2;

/// Renders the 3-line search box starting at `row` and returns the next row.
///
/// ```text
/// ┌──────────────────────────┐
/// │ / Egor Emelyanov         │
/// └──────────────────────────┘
/// ```
pub fn render_search_bar(row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let box_width = cols.saturating_sub(SEARCH_BOX_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);

    let border = if search.focused {
        Theme::fg(&theme.colors.search_bar_border)
    } else {
        Theme::fg(&theme.colors.border)
    };

    position_cursor(row, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{border}┌{}┐{}", "─".repeat(inner_width), Theme::reset());

    // " / " prefix, optional cursor cell and the "…" pending marker.
    let text_room = inner_width.saturating_sub(6);

    position_cursor(row + 1, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{border}│");
    print!("{} / ", Theme::fg(&theme.colors.text_dim));

    let mut used = 3;
    if search.query.is_empty() {
        let placeholder = truncate_chars(&search.placeholder, text_room);
        used += char_len(&placeholder);
        print!("{}{}{placeholder}{}", Theme::dim(), Theme::italic(), Theme::reset());
    } else {
        let query = tail_chars(&search.query, text_room);
        used += char_len(&query);
        print!("{}{query}", Theme::fg(&theme.colors.text_normal));
    }

    if search.focused {
        print!("{}█", Theme::fg(&theme.colors.search_bar_border));
        used += 1;
    }
    if search.pending {
        print!("{} …", Theme::fg(&theme.colors.text_dim));
        used += 2;
    }

    print!("{}", " ".repeat(inner_width.saturating_sub(used)));
    print!("{border}│{}", Theme::reset());

    position_cursor(row + 2, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{border}└{}┘{}", "─".repeat(inner_width), Theme::reset());

    row + 3
}

/// Last `max` characters of `text`, so the end of a long query stays visible.
fn tail_chars(text: &str, max: usize) -> String {
    let len = char_len(text);
    text.chars().skip(len.saturating_sub(max)).collect()
}
