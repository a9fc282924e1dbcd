//! Shared rendering utilities.
//!
//! Text helpers operate on character indices rather than byte indices so that
//! non-ASCII names wrap and highlight correctly.

use crate::ui::theme::Theme;

/// Moves the cursor to a 1-indexed `row` and `col`.
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Number of characters in `text`.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Cuts `text` to at most `max` characters, marking the cut with `…`.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> String {
    if char_len(text) <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut truncated: String = text.chars().take(max - 1).collect();
    truncated.push('…');
    truncated
}

/// Hard-wraps `text` into chunks of at most `width` characters.
///
/// Returns each chunk with the character offset it starts at. Empty text yields
/// a single empty chunk so that every row has at least one line.
///
/// ```
/// use zontacts::ui::helpers::wrap_chars;
///
/// let chunks = wrap_chars("Emelyanov", 4);
/// assert_eq!(chunks, vec![(0, "Emel".to_string()), (4, "yano".to_string()), (8, "v".to_string())]);
/// ```
#[must_use]
pub fn wrap_chars(text: &str, width: usize) -> Vec<(usize, String)> {
    let width = width.max(1);
    let chars: Vec<char> = text.chars().collect();

    if chars.is_empty() {
        return vec![(0, String::new())];
    }

    chars
        .chunks(width)
        .enumerate()
        .map(|(i, chunk)| (i * width, chunk.iter().collect()))
        .collect()
}

/// Prints `text` with the character `ranges` highlighted.
///
/// After each highlighted section the base style is re-applied: `restore` is the
/// escape sequence that was active before (for instance the cursor row colors).
pub fn render_highlighted_text(text: &str, ranges: &[(usize, usize)], theme: &Theme, restore: &str) {
    if ranges.is_empty() {
        print!("{text}");
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < current_pos || start >= end {
            continue;
        }

        let normal: String = chars[current_pos..start].iter().collect();
        print!("{normal}");

        print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
        print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
        let highlighted: String = chars[start..end].iter().collect();
        print!("{highlighted}");
        print!("{}{restore}", Theme::reset());

        current_pos = end;
    }

    if current_pos < chars.len() {
        let remaining: String = chars[current_pos..].iter().collect();
        print!("{remaining}");
    }
}
