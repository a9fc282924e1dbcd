//! View model types representing renderable UI state.
//!
//! View models are computed from application state by
//! `AppState::compute_viewmodel` and consumed by the renderer. They carry
//! display-ready data only: text is already wrapped to the pane width and
//! highlight ranges are already split per line.

use crate::ui::helpers::wrap_chars;

/// Width of the row prefix: space, checkbox, space, two-cell badge, two spaces.
pub const ROW_PREFIX_WIDTH: usize = 9;

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    pub header: HeaderInfo,
    pub search_bar: SearchBarInfo,
    pub body: Body,
    pub footer: FooterInfo,
}

/// Main area of the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// The initial fetch has not completed.
    Loading(LoaderInfo),
    /// Loaded, but nothing to show.
    Empty(EmptyState),
    /// The windowed slice of the filtered contacts.
    List(ListInfo),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    /// Right-hand counters, e.g. `"2 of 10 · 1 selected"`.
    pub counts: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub keybindings: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    /// Text typed so far (may not be applied yet).
    pub query: String,
    /// Shown dimmed while `query` is empty.
    pub placeholder: String,
    /// Whether keystrokes currently go to the search bar.
    pub focused: bool,
    /// Whether a typed term is waiting for the debounce to elapse.
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderInfo {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

/// Rows to draw inside the list viewport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListInfo {
    /// Rendered rows (visible plus overscan), in order.
    pub rows: Vec<DisplayRow>,
    /// Lines available to the list.
    pub viewport: usize,
    pub scrollbar: Option<ScrollbarInfo>,
}

/// One contact laid out for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// Position in the filtered view.
    pub index: usize,
    /// Line of the row's first line relative to the top of the viewport.
    /// Negative or past the viewport for overscanned rows.
    pub top: i64,
    pub is_cursor: bool,
    pub selected: bool,
    pub initials: String,
    pub lines: Vec<RowLine>,
}

impl DisplayRow {
    /// Lays out a contact for a list of `width` columns.
    ///
    /// The name wraps after the checkbox and badge prefix; the avatar URL, if
    /// any, follows on its own dimmed line(s). `name_ranges` are highlight
    /// ranges over the full name in characters.
    #[must_use]
    pub fn layout(
        index: usize,
        full_name: &str,
        initials: &str,
        avatar: &str,
        selected: bool,
        name_ranges: &[(usize, usize)],
        width: usize,
    ) -> Self {
        let text_width = width.saturating_sub(ROW_PREFIX_WIDTH).max(1);

        let mut lines: Vec<RowLine> = wrap_chars(full_name, text_width)
            .into_iter()
            .map(|(offset, text)| {
                let len = text.chars().count();
                RowLine {
                    kind: LineKind::Name,
                    highlight_ranges: clip_ranges(name_ranges, offset, offset + len),
                    text,
                }
            })
            .collect();

        if !avatar.is_empty() {
            lines.extend(wrap_chars(avatar, text_width).into_iter().map(|(_, text)| RowLine {
                kind: LineKind::Avatar,
                text,
                highlight_ranges: vec![],
            }));
        }

        Self {
            index,
            top: 0,
            is_cursor: false,
            selected,
            initials: initials.to_string(),
            lines,
        }
    }

    /// Number of lines the row occupies; this is its measured size.
    #[must_use]
    pub fn height(&self) -> usize {
        self.lines.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Name,
    Avatar,
}

/// One physical line of a row, without the prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLine {
    pub kind: LineKind,
    pub text: String,
    /// Highlight ranges relative to `text`, in characters.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// Scrollbar geometry in viewport lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollbarInfo {
    pub thumb_start: usize,
    pub thumb_len: usize,
}

impl ScrollbarInfo {
    /// Computes the thumb for a list of `total` lines scrolled to `offset` in a
    /// `viewport` of lines. Returns `None` when everything fits.
    #[must_use]
    pub fn compute(total: u64, offset: u64, viewport: usize) -> Option<Self> {
        let view = viewport as u64;
        if viewport == 0 || total <= view {
            return None;
        }

        let thumb_len = (view * view / total).clamp(1, view);
        let max_offset = total - view;
        let travel = view - thumb_len;
        let thumb_start = (offset.min(max_offset) * travel + max_offset / 2) / max_offset;

        Some(Self {
            thumb_start: usize::try_from(thumb_start).unwrap_or(0),
            thumb_len: usize::try_from(thumb_len).unwrap_or(1),
        })
    }
}

/// Restricts `ranges` to `[start, end)` and shifts them to start at zero.
fn clip_ranges(ranges: &[(usize, usize)], start: usize, end: usize) -> Vec<(usize, usize)> {
    ranges
        .iter()
        .filter_map(|&(s, e)| {
            let s = s.max(start);
            let e = e.min(end);
            (s < e).then(|| (s - start, e - start))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_row_without_avatar_is_one_line() {
        let row = DisplayRow::layout(0, "Egor Emelyanov", "EE", "", false, &[], 80);
        assert_eq!(row.height(), 1);
        assert_eq!(row.lines[0].text, "Egor Emelyanov");
    }

    #[test]
    fn avatar_goes_on_its_own_line() {
        let row = DisplayRow::layout(0, "Anna Ivanova", "AI", "https://example.com/2.jpg", true, &[], 80);
        assert_eq!(row.height(), 2);
        assert_eq!(row.lines[1].kind, LineKind::Avatar);
        assert!(row.selected);
    }

    #[test]
    fn narrow_width_wraps_and_splits_highlights() {
        // Text width is 14 - 9 = 5 characters.
        let row = DisplayRow::layout(3, "Anna Ivanova", "AI", "", false, &[(2, 7)], 14);

        let texts: Vec<&str> = row.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Anna ", "Ivano", "va"]);
        assert_eq!(row.lines[0].highlight_ranges, vec![(2, 5)]);
        assert_eq!(row.lines[1].highlight_ranges, vec![(0, 2)]);
        assert!(row.lines[2].highlight_ranges.is_empty());
    }

    #[test]
    fn scrollbar_hidden_when_everything_fits() {
        assert_eq!(ScrollbarInfo::compute(10, 0, 10), None);
        assert_eq!(ScrollbarInfo::compute(0, 0, 10), None);
    }

    #[test]
    fn scrollbar_thumb_tracks_offset() {
        let top = ScrollbarInfo::compute(100, 0, 10).unwrap();
        assert_eq!(top, ScrollbarInfo { thumb_start: 0, thumb_len: 1 });

        let bottom = ScrollbarInfo::compute(100, 90, 10).unwrap();
        assert_eq!(bottom.thumb_start + bottom.thumb_len, 10);

        let half = ScrollbarInfo::compute(20, 5, 10).unwrap();
        assert_eq!(half.thumb_len, 5);
        assert!(half.thumb_start > 0 && half.thumb_start < 5);
    }
}
