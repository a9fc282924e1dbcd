//! Virtualized list windowing.
//!
//! A [`Windower`] tracks the size of every row of a list (estimated until the
//! row has been rendered and measured), the scroll offset and the viewport
//! size, and answers which contiguous range of rows has to be rendered. Sizes
//! and offsets are in terminal lines.
//!
//! Measured sizes are cached by item key so they survive the list being
//! re-filtered: a contact that was measured once keeps its size when it
//! reappears at a different index.

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Range;

use super::fenwick::Fenwick;

/// Tuning knobs for a [`Windower`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowerOptions {
    /// Size assumed for rows that have not been measured yet.
    pub estimated_item_size: u32,
    /// Extra rows rendered on each side of the visible range.
    pub overscan: usize,
}

impl Default for WindowerOptions {
    fn default() -> Self {
        Self {
            estimated_item_size: 1,
            overscan: 2,
        }
    }
}

/// Placement of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowItem {
    pub index: usize,
    /// Offset of the first line of the row.
    pub start: u64,
    pub size: u32,
}

impl WindowItem {
    /// Offset just past the last line of the row.
    #[must_use]
    pub fn end(&self) -> u64 {
        self.start.saturating_add(u64::from(self.size))
    }
}

/// How [`Windower::scroll_to_index`] positions the target row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
    End,
    /// Scroll as little as possible to make the row fully visible. A row
    /// taller than the viewport is aligned to its first line.
    #[default]
    Auto,
}

/// Snapshot of what has to be rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Window {
    /// Rows overlapping the viewport.
    pub visible: Range<usize>,
    /// `visible` widened by the overscan; the rows to instantiate.
    pub rendered: Range<usize>,
    /// Sum of all row sizes, measured where known and estimated otherwise.
    pub total_extent: u64,
    /// Scroll offset after clamping.
    pub scroll_offset: u64,
    /// Placement of every row in `rendered`, in order.
    pub items: Vec<WindowItem>,
}

impl Window {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Windower<K> {
    options: WindowerOptions,
    keys: Vec<K>,
    sizes: Vec<u32>,
    sums: Fenwick,
    measured: HashMap<K, u32>,
    scroll_offset: u64,
    viewport: u32,
}

impl<K> Windower<K>
where
    K: Eq + Hash + Clone,
{
    #[must_use]
    pub fn new(options: WindowerOptions) -> Self {
        Self {
            options: WindowerOptions {
                estimated_item_size: options.estimated_item_size.max(1),
                overscan: options.overscan,
            },
            keys: Vec::new(),
            sizes: Vec::new(),
            sums: Fenwick::default(),
            measured: HashMap::new(),
            scroll_offset: 0,
            viewport: 0,
        }
    }

    #[must_use]
    pub fn options(&self) -> WindowerOptions {
        self.options
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn viewport(&self) -> u32 {
        self.viewport
    }

    #[must_use]
    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    /// Replaces the list of row keys, e.g. after the filter changed.
    ///
    /// Sizes are taken from the measurement cache where available. The scroll
    /// offset is clamped to the new extent, so a shrinking list never leaves the
    /// window pointing past its end.
    pub fn set_keys(&mut self, keys: Vec<K>) {
        self.keys = keys;
        self.rebuild_sizes();
        self.clamp();
    }

    /// Sets the number of lines available for rows.
    pub fn set_viewport(&mut self, lines: u32) {
        if self.viewport != lines {
            self.viewport = lines;
            self.clamp();
        }
    }

    /// Drops every cached measurement, e.g. when the pane width changed and
    /// rows will wrap differently.
    pub fn reset_measurements(&mut self) {
        if self.measured.is_empty() {
            return;
        }
        tracing::debug!(cached = self.measured.len(), "resetting row measurements");
        self.measured.clear();
        self.rebuild_sizes();
        self.clamp();
    }

    /// Records the measured size of the row at `index`.
    ///
    /// Applying the same measurement again changes nothing. When a row that
    /// starts above the scroll offset changes size, the offset moves by the same
    /// amount so the rows on screen stay put. Returns that scroll adjustment.
    /// Stale indices are ignored.
    pub fn measure(&mut self, index: usize, size: u32) -> i64 {
        let Some(item) = self.item(index) else {
            return 0;
        };

        let size = size.max(1);
        self.measured.insert(self.keys[index].clone(), size);

        let delta = i64::from(size) - i64::from(item.size);
        if delta == 0 {
            return 0;
        }

        self.sizes[index] = size;
        self.sums.add(index, delta);

        let adjustment = if item.start < self.scroll_offset {
            self.scroll_offset = if delta > 0 {
                self.scroll_offset.saturating_add(delta.unsigned_abs())
            } else {
                self.scroll_offset.saturating_sub(delta.unsigned_abs())
            };
            delta
        } else {
            0
        };

        self.clamp();
        adjustment
    }

    /// Records several measurements; returns the summed scroll adjustment.
    pub fn measure_many(&mut self, measurements: impl IntoIterator<Item = (usize, u32)>) -> i64 {
        measurements
            .into_iter()
            .map(|(index, size)| self.measure(index, size))
            .sum()
    }

    #[must_use]
    pub fn is_measured(&self, index: usize) -> bool {
        self.keys
            .get(index)
            .is_some_and(|key| self.measured.contains_key(key))
    }

    #[must_use]
    pub fn total_extent(&self) -> u64 {
        self.sums.total()
    }

    #[must_use]
    pub fn max_scroll_offset(&self) -> u64 {
        self.total_extent()
            .saturating_sub(u64::from(self.viewport))
    }

    /// Pulls the scroll offset back inside `[0, max_scroll_offset]`.
    pub fn clamp(&mut self) {
        let max = self.max_scroll_offset();
        if self.scroll_offset > max {
            tracing::trace!(from = self.scroll_offset, to = max, "clamping scroll offset");
            self.scroll_offset = max;
        }
    }

    pub fn set_scroll_offset(&mut self, offset: u64) {
        self.scroll_offset = offset.min(self.max_scroll_offset());
    }

    /// Moves back to the top of the list.
    pub fn reset_scroll(&mut self) {
        self.scroll_offset = 0;
    }

    /// Scrolls by `delta` lines (negative is up), clamped to the list.
    pub fn scroll_by(&mut self, delta: i64) {
        let offset = if delta >= 0 {
            self.scroll_offset.saturating_add(delta.unsigned_abs())
        } else {
            self.scroll_offset.saturating_sub(delta.unsigned_abs())
        };
        self.set_scroll_offset(offset);
    }

    /// Scrolls so that the row at `index` is placed according to `align`.
    ///
    /// Indices past the end target the last row. Returns the new offset.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> u64 {
        if self.is_empty() {
            self.scroll_offset = 0;
            return 0;
        }

        let index = index.min(self.len() - 1);
        let Some(item) = self.item(index) else {
            return self.scroll_offset;
        };

        let view = u64::from(self.viewport);
        let target = match align {
            Align::Start => item.start,
            Align::End => item.end().saturating_sub(view),
            Align::Center => (item.start + u64::from(item.size) / 2).saturating_sub(view / 2),
            Align::Auto => {
                let current = self.scroll_offset;
                if item.start >= current && item.end() <= current.saturating_add(view) {
                    current
                } else if item.start < current || u64::from(item.size) > view {
                    item.start
                } else {
                    item.end().saturating_sub(view)
                }
            }
        };

        self.set_scroll_offset(target);
        self.scroll_offset
    }

    /// Index of the row covering `offset`, or `None` past the end.
    #[must_use]
    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        let index = self.sums.lower_bound(offset);
        (index < self.len()).then_some(index)
    }

    /// Placement of the row at `index`, or `None` for a stale index.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<WindowItem> {
        let size = *self.sizes.get(index)?;
        Some(WindowItem {
            index,
            start: self.sums.prefix_sum(index),
            size,
        })
    }

    /// Key of the row at `index`, or `None` for a stale index.
    #[must_use]
    pub fn key(&self, index: usize) -> Option<&K> {
        self.keys.get(index)
    }

    /// Rows overlapping `[scroll_offset, scroll_offset + viewport)`.
    #[must_use]
    pub fn visible_range(&self) -> Range<usize> {
        let count = self.len();
        let total = self.total_extent();
        if count == 0 || self.viewport == 0 || total == 0 {
            return 0..0;
        }

        let offset = self.scroll_offset.min(self.max_scroll_offset());
        let last_line = offset
            .saturating_add(u64::from(self.viewport) - 1)
            .min(total - 1);

        let start = self.sums.lower_bound(offset).min(count - 1);
        let end = (self.sums.lower_bound(last_line) + 1).min(count).max(start + 1);

        start..end
    }

    /// Visible rows widened by the overscan.
    #[must_use]
    pub fn rendered_range(&self) -> Range<usize> {
        let visible = self.visible_range();
        if visible.is_empty() {
            return visible;
        }
        let start = visible.start.saturating_sub(self.options.overscan);
        let end = visible
            .end
            .saturating_add(self.options.overscan)
            .min(self.len());
        start..end
    }

    /// Snapshot of the current window.
    #[must_use]
    pub fn window(&self) -> Window {
        let visible = self.visible_range();
        let rendered = self.rendered_range();
        let items = rendered.clone().filter_map(|index| self.item(index)).collect();

        Window {
            visible,
            rendered,
            total_extent: self.total_extent(),
            scroll_offset: self.scroll_offset.min(self.max_scroll_offset()),
            items,
        }
    }

    fn rebuild_sizes(&mut self) {
        let estimate = self.options.estimated_item_size;
        self.sizes = self
            .keys
            .iter()
            .map(|key| self.measured.get(key).copied().unwrap_or(estimate))
            .collect();
        self.sums = Fenwick::from_sizes(&self.sizes);
    }
}

impl<K> Default for Windower<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new(WindowerOptions::default())
    }
}

/// Computes the window for a list without keeping any state.
///
/// `measured_sizes` maps row indices to sizes known from layout; every other
/// row counts as `estimated_item_size`. An out-of-range `scroll_offset` is
/// clamped. No overscan is applied, so `rendered == visible`.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use zontacts::window::compute_window;
///
/// let measured = HashMap::from([(0, 3)]);
/// let window = compute_window(100, 2, 5, 1, &measured);
///
/// assert_eq!(window.visible, 0..5);
/// assert_eq!(window.total_extent, 102);
/// ```
#[must_use]
pub fn compute_window(
    item_count: usize,
    scroll_offset: u64,
    viewport_size: u32,
    estimated_item_size: u32,
    measured_sizes: &HashMap<usize, u32>,
) -> Window {
    let mut windower = Windower::new(WindowerOptions {
        estimated_item_size,
        overscan: 0,
    });
    windower.keys = (0..item_count).collect();
    windower.measured = measured_sizes
        .iter()
        .filter(|(&index, _)| index < item_count)
        .map(|(&index, &size)| (index, size.max(1)))
        .collect();
    windower.rebuild_sizes();
    windower.viewport = viewport_size;
    windower.set_scroll_offset(scroll_offset);
    windower.window()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn windower(count: usize, viewport: u32, overscan: usize) -> Windower<usize> {
        let mut windower = Windower::new(WindowerOptions {
            estimated_item_size: 1,
            overscan,
        });
        windower.set_keys((0..count).collect());
        windower.set_viewport(viewport);
        windower
    }

    #[test]
    fn empty_list_has_empty_window() {
        let windower = windower(0, 10, 2);
        let window = windower.window();

        assert!(window.is_empty());
        assert_eq!(window.visible, 0..0);
        assert_eq!(window.total_extent, 0);
        assert!(window.items.is_empty());
    }

    #[test]
    fn visible_range_covers_viewport() {
        let mut windower = windower(100, 10, 0);
        windower.set_scroll_offset(25);

        let window = windower.window();
        assert_eq!(window.visible, 25..35);
        assert_eq!(window.rendered, 25..35);
        assert_eq!(window.items.first().map(|i| i.start), Some(25));
    }

    #[test]
    fn every_reachable_offset_yields_nonempty_contiguous_range() {
        let sizes = [1u32, 3, 2, 1, 4, 1, 1, 2, 5, 1, 1, 2];
        let mut windower = windower(sizes.len(), 4, 1);
        for (index, &size) in sizes.iter().enumerate() {
            windower.measure(index, size);
        }

        let total = windower.total_extent();
        for offset in 0..=total - 4 {
            windower.set_scroll_offset(offset);
            let window = windower.window();

            assert!(!window.visible.is_empty(), "offset {offset}");
            assert!(window.visible.end <= sizes.len());

            let first = window.items.iter().find(|i| i.index == window.visible.start);
            let last = window.items.iter().find(|i| i.index == window.visible.end - 1);
            assert!(first.is_some_and(|i| i.start <= offset && i.end() > offset));
            assert!(last.is_some_and(|i| i.start < offset + 4));

            let indices: Vec<usize> = window.items.iter().map(|i| i.index).collect();
            let expected: Vec<usize> = window.rendered.clone().collect();
            assert_eq!(indices, expected);
        }
    }

    #[test]
    fn overscan_widens_rendered_range_within_bounds() {
        let mut windower = windower(50, 5, 3);

        let top = windower.window();
        assert_eq!(top.visible, 0..5);
        assert_eq!(top.rendered, 0..8);

        windower.set_scroll_offset(20);
        assert_eq!(windower.window().rendered, 17..28);

        windower.set_scroll_offset(1_000);
        let bottom = windower.window();
        assert_eq!(bottom.visible, 45..50);
        assert_eq!(bottom.rendered, 42..50);
    }

    #[test]
    fn total_extent_never_decreases_when_rows_grow() {
        let mut windower = windower(30, 8, 2);
        let mut previous = windower.total_extent();

        for index in 0..30 {
            windower.measure(index, 1 + (index % 3) as u32);
            let extent = windower.total_extent();
            assert!(extent >= previous);
            previous = extent;
        }
        assert_eq!(previous, (0..30).map(|i| 1 + (i % 3) as u64).sum::<u64>());
    }

    #[test]
    fn measurement_is_idempotent() {
        let mut windower = windower(20, 5, 2);
        windower.set_scroll_offset(10);

        windower.measure(3, 4);
        let once = windower.window();
        let adjustment = windower.measure(3, 4);
        let twice = windower.window();

        assert_eq!(adjustment, 0);
        assert_eq!(once, twice);
        assert!(windower.is_measured(3));
    }

    #[test]
    fn growth_above_viewport_keeps_content_in_place() {
        let mut windower = windower(20, 5, 0);
        windower.set_scroll_offset(10);
        let before = windower.window().visible;

        let adjustment = windower.measure(2, 3);

        assert_eq!(adjustment, 2);
        assert_eq!(windower.scroll_offset(), 12);
        assert_eq!(windower.window().visible, before);

        // Rows at or below the offset do not move it.
        assert_eq!(windower.measure(15, 2), 0);
        assert_eq!(windower.scroll_offset(), 12);
    }

    #[test]
    fn shrinking_list_clamps_to_valid_indices() {
        let mut windower = windower(100, 10, 2);
        windower.set_scroll_offset(80);

        windower.set_keys(vec![7, 42, 99]);
        let window = windower.window();

        assert_eq!(window.scroll_offset, 0);
        assert_eq!(window.visible, 0..3);
        assert_eq!(window.rendered, 0..3);
        assert!(window.items.iter().all(|item| item.index < 3));
        assert_eq!(windower.item(3), None);
        assert_eq!(windower.key(5), None);
    }

    #[test]
    fn measurements_follow_keys_across_refilter() {
        let mut windower = windower(5, 10, 0);
        windower.measure(3, 4);

        windower.set_keys(vec![3, 4]);
        assert_eq!(windower.item(0).map(|i| i.size), Some(4));
        assert_eq!(windower.total_extent(), 5);

        windower.reset_measurements();
        assert_eq!(windower.total_extent(), 2);
        assert!(!windower.is_measured(0));
    }

    #[test]
    fn scroll_to_index_auto_moves_minimally() {
        let mut windower = windower(50, 10, 0);

        assert_eq!(windower.scroll_to_index(5, Align::Auto), 0);
        assert_eq!(windower.scroll_to_index(14, Align::Auto), 5);
        assert_eq!(windower.scroll_to_index(8, Align::Auto), 5);
        assert_eq!(windower.scroll_to_index(2, Align::Auto), 2);
        assert_eq!(windower.scroll_to_index(20, Align::Start), 20);
        assert_eq!(windower.scroll_to_index(20, Align::Center), 15);
        assert_eq!(windower.scroll_to_index(500, Align::End), 40);
    }

    #[test]
    fn scroll_to_index_auto_shows_top_of_tall_row() {
        let mut windower = windower(10, 3, 0);
        windower.measure(4, 6);

        assert_eq!(windower.scroll_to_index(4, Align::Auto), 4);
        assert_eq!(windower.window().visible.start, 4);
    }

    #[test]
    fn scroll_by_is_clamped() {
        let mut windower = windower(30, 10, 0);

        windower.scroll_by(-5);
        assert_eq!(windower.scroll_offset(), 0);
        windower.scroll_by(7);
        assert_eq!(windower.scroll_offset(), 7);
        windower.scroll_by(100);
        assert_eq!(windower.scroll_offset(), 20);
    }

    #[test]
    fn index_at_offset_handles_past_end() {
        let windower = windower(3, 10, 0);
        assert_eq!(windower.index_at_offset(0), Some(0));
        assert_eq!(windower.index_at_offset(2), Some(2));
        assert_eq!(windower.index_at_offset(3), None);
    }

    #[test]
    fn compute_window_uses_measured_and_estimated_sizes() {
        let measured = HashMap::from([(1, 4), (500, 9)]);
        let window = compute_window(10, 3, 4, 2, &measured);

        // Rows: [0,2) [2,6) [6,8) ...; total 2*9 + 4.
        assert_eq!(window.total_extent, 22);
        assert_eq!(window.scroll_offset, 3);
        assert_eq!(window.visible, 1..3);
        assert_eq!(window.items[0], WindowItem { index: 1, start: 2, size: 4 });
    }

    #[test]
    fn compute_window_clamps_offset_and_handles_empty() {
        let window = compute_window(5, 1_000, 3, 1, &HashMap::new());
        assert_eq!(window.scroll_offset, 2);
        assert_eq!(window.visible, 2..5);

        let empty = compute_window(0, 10, 3, 1, &HashMap::new());
        assert!(empty.is_empty());
        assert_eq!(empty.total_extent, 0);
    }
}
