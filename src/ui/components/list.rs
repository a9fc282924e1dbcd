//! Contact list renderer.
//!
//! Draws the rendered rows of the window into the list viewport. Overscanned
//! rows arrive with a `top` outside the viewport and are laid out but not
//! drawn; rows straddling an edge are clipped line by line.

use crate::ui::helpers::{self, char_len, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{DisplayRow, LineKind, ListInfo, ScrollbarInfo, ROW_PREFIX_WIDTH};

/// Renders the list viewport whose first line is screen row `top_row`.
///
/// `cols` includes the scrollbar column at the right edge.
pub fn render_list(top_row: usize, list: &ListInfo, theme: &Theme, cols: usize) {
    let width = cols.saturating_sub(1);
    let viewport = i64::try_from(list.viewport).unwrap_or(i64::MAX);

    for row in &list.rows {
        for (i, line) in row.lines.iter().enumerate() {
            let offset = row.top + i as i64;
            if !(0..viewport).contains(&offset) {
                continue;
            }
            let screen_row = top_row + usize::try_from(offset).unwrap_or(0);
            render_row_line(screen_row, row, i, line.kind, &line.text, &line.highlight_ranges, theme, width);
        }
    }

    if let Some(scrollbar) = list.scrollbar {
        render_scrollbar(top_row, list.viewport, scrollbar, theme, cols);
    }
}

#[allow(clippy::too_many_arguments)]
fn render_row_line(
    screen_row: usize,
    row: &DisplayRow,
    line_index: usize,
    kind: LineKind,
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    width: usize,
) {
    position_cursor(screen_row, 1);

    let base = if row.is_cursor {
        format!("{}{}", Theme::fg(&theme.colors.cursor_fg), Theme::bg(&theme.colors.cursor_bg))
    } else {
        Theme::fg(&theme.colors.text_normal)
    };
    print!("{base}");

    if line_index == 0 {
        render_prefix(row, theme, &base);
    } else {
        print!("{}", " ".repeat(ROW_PREFIX_WIDTH));
    }

    match kind {
        LineKind::Name => helpers::render_highlighted_text(text, ranges, theme, &base),
        LineKind::Avatar => {
            if row.is_cursor {
                print!("{text}");
            } else {
                print!("{}{}{text}{}{base}", Theme::dim(), Theme::fg(&theme.colors.text_dim), Theme::reset());
            }
        }
    }

    let used = ROW_PREFIX_WIDTH + char_len(text);
    print!("{}", " ".repeat(width.saturating_sub(used)));
    print!("{}", Theme::reset());
}

/// Prints ` [x] AB  ` and re-applies `base` afterwards.
fn render_prefix(row: &DisplayRow, theme: &Theme, base: &str) {
    print!(" [");
    if row.selected {
        print!("{}{}x{}{base}", Theme::bold(), Theme::fg(&theme.colors.checkbox_fg), Theme::reset());
    } else {
        print!(" ");
    }
    print!("] ");

    print!("{}{}", Theme::fg(&theme.colors.badge_fg), Theme::bg(&theme.colors.badge_bg));
    print!("{:<2}", helpers::truncate_chars(&row.initials, 2));
    print!("{}{base}  ", Theme::reset());
}

fn render_scrollbar(top_row: usize, viewport: usize, scrollbar: ScrollbarInfo, theme: &Theme, cols: usize) {
    let thumb = scrollbar.thumb_start..scrollbar.thumb_start + scrollbar.thumb_len;

    for line in 0..viewport {
        position_cursor(top_row + line, cols);
        if thumb.contains(&line) {
            print!("{}┃", Theme::fg(&theme.colors.scrollbar_thumb));
        } else {
            print!("{}│", Theme::fg(&theme.colors.scrollbar_track));
        }
        print!("{}", Theme::reset());
    }
}
