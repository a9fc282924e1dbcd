//! Header component renderer.

use crate::ui::helpers::{char_len, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the title bar at `row`, centered, and returns the next row.
///
/// ```text
/// [padding] Contacts  3 of 10 · 1 selected [padding]
/// ```
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let content_len = char_len(&header.title) + 2 + char_len(&header.counts);
    let padding = cols.saturating_sub(content_len) / 2;

    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }

    print!("{}", " ".repeat(padding));
    print!("{}{}{}", Theme::bold(), header.title, Theme::reset());

    print!("{}", Theme::fg(&theme.colors.text_dim));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }
    print!("  {}", header.counts);
    print!("{}", " ".repeat(cols.saturating_sub(padding + content_len)));

    print!("{}", Theme::reset());
    row + 1
}
