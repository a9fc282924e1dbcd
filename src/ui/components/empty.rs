//! Empty state and loader renderers.

use crate::ui::helpers::{char_len, position_cursor, truncate_chars};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{EmptyState, LoaderInfo};

fn render_centered(row: usize, text: &str, style: &str, cols: usize) {
    let text = truncate_chars(text, cols);
    let len = char_len(&text);
    let padding = cols.saturating_sub(len) / 2;

    position_cursor(row, 1);
    print!("{style}");
    print!("{}", " ".repeat(padding));
    print!("{text}");
    print!("{}", " ".repeat(cols.saturating_sub(padding + len)));
    print!("{}", Theme::reset());
}

/// Renders the two-line empty state centered at `row`.
pub fn render_empty_state(row: usize, empty: &EmptyState, theme: &Theme, cols: usize) {
    let message_style = format!("{}{}", Theme::bold(), Theme::fg(&theme.colors.empty_state_fg));
    render_centered(row, &empty.message, &message_style, cols);

    if !empty.subtitle.is_empty() {
        let subtitle_style = format!("{}{}", Theme::dim(), Theme::fg(&theme.colors.text_dim));
        render_centered(row + 1, &empty.subtitle, &subtitle_style, cols);
    }
}

/// Renders the loading indicator centered at `row`.
pub fn render_loader(row: usize, loader: &LoaderInfo, theme: &Theme, cols: usize) {
    render_centered(row, &loader.message, &Theme::fg(&theme.colors.loader_fg), cols);
}
