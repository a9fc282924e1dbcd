//! Application state management and view model computation.
//!
//! [`AppState`] is the single source of truth for the plugin: the contact
//! collection, the applied and the typed search term, the filtered view, the
//! windower, the keyboard cursor and the load phase.
//!
//! # Derived State
//!
//! The filtered view and the windower's keys are never edited directly. They are
//! recomputed by `refilter` whenever the collection or the applied term changes,
//! which also clamps the cursor and the scroll offset to the new length.
//!
//! # Layout and Measurement
//!
//! Rows wrap to the pane width, so their height is only known once they are laid
//! out. [`AppState::layout`] lays out the rows the windower wants rendered,
//! reports their heights back as measurements and repeats until the window
//! stops changing. The view model is then computed from the settled window.
//!
//! # Example
//!
//! ```
//! use zontacts::app::AppState;
//! use zontacts::domain::ContactRecord;
//! use zontacts::ui::Theme;
//!
//! let mut state = AppState::new(Theme::default());
//! state.load_succeeded(vec![ContactRecord {
//!     id: 1u64.into(),
//!     first_name: "Egor".into(),
//!     last_name: "Emelyanov".into(),
//!     avatar: String::new(),
//! }]);
//!
//! state.layout(24, 80);
//! let viewmodel = state.compute_viewmodel(24, 80);
//! assert!(matches!(viewmodel.body, zontacts::ui::viewmodel::Body::List(_)));
//! ```

use super::actions::Action;
use super::modes::{InputMode, LoadPhase};
use crate::domain::{collection_from_records, Contact, ContactId, ContactRecord, Result, ZontactsError};
use crate::list::{self, Debouncer, FilteredView, MatchPolicy, Poll};
use crate::source::SourceSpec;
use crate::ui::components::list_viewport;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    Body, DisplayRow, EmptyState, FooterInfo, HeaderInfo, ListInfo, LoaderInfo, ScrollbarInfo, SearchBarInfo,
    UIViewModel,
};
use crate::window::{Align, Windower, WindowerOptions};
use crate::worker::WorkerMessage;
use std::time::Duration;

/// Height assumed for a row before it is laid out: a name line and an avatar line.
pub const ESTIMATED_ROW_LINES: u32 = 2;

const MAX_LAYOUT_PASSES: usize = 4;

const SEARCH_PLACEHOLDER: &str = "Egor Emelyanov";

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The collection, in fetch order. Replaced wholesale on every toggle.
    pub contacts: Vec<Contact>,

    /// Contacts matching `search_term`.
    pub filtered: FilteredView,

    /// Text in the search bar, possibly not applied yet.
    pub search_input: String,

    /// Term the filtered view was computed with.
    pub search_term: String,

    pub policy: MatchPolicy,

    /// Holds the typed term until input has been quiet for the debounce delay.
    pub debouncer: Debouncer<String>,

    /// Windowing over the filtered view, keyed by contact id.
    pub windower: Windower<ContactId>,

    /// Position of the keyboard cursor in the filtered view.
    pub cursor: usize,

    pub input_mode: InputMode,

    pub phase: LoadPhase,

    /// Identifies this mount; fetch outcomes for any other mount are dropped.
    pub mount_id: u64,

    /// Set once the plugin is closing; no outcome is applied afterwards.
    pub torn_down: bool,

    pub fetch_started: bool,

    pub source: Option<SourceSpec>,

    /// Why the fetch failed, for diagnostics only.
    pub last_error: Option<String>,

    /// Selection reported by the most recent toggle.
    pub last_selected_ids: Vec<ContactId>,

    pub theme: Theme,

    /// List width the current measurements were taken at.
    width: usize,

    /// Keep the cursor row in view while measurements settle.
    follow_cursor: bool,
}

impl AppState {
    /// Creates an empty state in the `Loading` phase with default settings.
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self {
            contacts: vec![],
            filtered: FilteredView::default(),
            search_input: String::new(),
            search_term: String::new(),
            policy: MatchPolicy::default(),
            debouncer: Debouncer::default(),
            windower: Windower::new(WindowerOptions {
                estimated_item_size: ESTIMATED_ROW_LINES,
                ..WindowerOptions::default()
            }),
            cursor: 0,
            input_mode: InputMode::Normal,
            phase: LoadPhase::Loading,
            mount_id: 0,
            torn_down: false,
            fetch_started: false,
            source: None,
            last_error: None,
            last_selected_ids: vec![],
            theme,
            width: 0,
            follow_cursor: false,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: Option<SourceSpec>) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_mount_id(mut self, mount_id: u64) -> Self {
        self.mount_id = mount_id;
        self
    }

    /// Sets the debounce delay and the match policy.
    #[must_use]
    pub fn with_search(mut self, debounce: Duration, policy: MatchPolicy) -> Self {
        self.debouncer = Debouncer::new(debounce);
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.windower = Windower::new(WindowerOptions {
            estimated_item_size: ESTIMATED_ROW_LINES,
            overscan,
        });
        self
    }

    // Loading

    /// Starts the fetch for this mount.
    ///
    /// Returns the action that performs it. Calling it again, after teardown or
    /// once loaded, does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ZontactsError::Config`] when no contacts source is configured.
    pub fn start_fetch(&mut self) -> Result<Vec<Action>> {
        if self.fetch_started || self.torn_down || self.phase == LoadPhase::Loaded {
            tracing::debug!(mount_id = self.mount_id, "fetch already started, ignoring");
            return Ok(vec![]);
        }
        self.fetch_started = true;

        match &self.source {
            Some(SourceSpec::Url(url)) => {
                tracing::info!(url = %url, mount_id = self.mount_id, "fetching contacts over http");
                Ok(vec![Action::FetchUrl {
                    url: url.clone(),
                    mount_id: self.mount_id,
                }])
            }
            Some(SourceSpec::File(path)) => {
                tracing::info!(path = %path.display(), mount_id = self.mount_id, "fetching contacts from file");
                Ok(vec![Action::PostToWorker(WorkerMessage::fetch_contacts(
                    path.clone(),
                    self.mount_id,
                ))])
            }
            None => Err(ZontactsError::Config(
                "no contacts source configured, set contacts_url or contacts_file".to_string(),
            )),
        }
    }

    /// Whether a fetch outcome tagged with `mount_id` may still be applied.
    #[must_use]
    pub fn accepts_outcome(&self, mount_id: u64) -> bool {
        if self.torn_down {
            tracing::debug!(mount_id, "discarding fetch outcome after teardown");
            return false;
        }
        if mount_id != self.mount_id {
            tracing::debug!(expected = self.mount_id, got = mount_id, "discarding fetch outcome for another mount");
            return false;
        }
        if self.phase == LoadPhase::Loaded {
            tracing::debug!(mount_id, "discarding fetch outcome, already loaded");
            return false;
        }
        true
    }

    /// Enters `Loaded` with the fetched contacts, all unselected.
    pub fn load_succeeded(&mut self, records: Vec<ContactRecord>) {
        self.contacts = collection_from_records(records);
        self.phase = LoadPhase::Loaded;
        self.last_selected_ids.clear();
        self.refilter();

        tracing::info!(count = self.contacts.len(), "contacts loaded");
    }

    /// Enters `Loaded` with an empty collection and records the error.
    pub fn load_failed(&mut self, error: &ZontactsError) {
        tracing::error!(error = %error, "failed to load contacts");

        self.last_error = Some(error.to_string());
        self.contacts.clear();
        self.phase = LoadPhase::Loaded;
        self.refilter();
    }

    /// Marks the state as torn down and drops any pending search.
    pub fn teardown(&mut self) {
        tracing::debug!(mount_id = self.mount_id, "tearing down");
        self.torn_down = true;
        if let Some(term) = self.debouncer.cancel() {
            tracing::debug!(term = %term, "dropping pending search term");
        }
    }

    // Search

    pub fn focus_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    /// Appends to the typed term and schedules it.
    pub fn push_search_char(&mut self, c: char, now_ms: u64) -> Vec<Action> {
        self.search_input.push(c);
        tracing::trace!(input = %self.search_input, "search input updated");
        self.schedule_search(now_ms)
    }

    /// Removes the last typed character and schedules the result.
    pub fn pop_search_char(&mut self, now_ms: u64) -> Vec<Action> {
        if self.search_input.pop().is_none() {
            return vec![];
        }
        self.schedule_search(now_ms)
    }

    fn schedule_search(&mut self, now_ms: u64) -> Vec<Action> {
        if self.debouncer.is_immediate() {
            self.apply_term(self.search_input.clone());
            return vec![];
        }

        self.debouncer.schedule(self.search_input.clone(), now_ms);
        vec![Action::ScheduleTimer {
            after_ms: self.debouncer.delay_ms(),
        }]
    }

    /// Applies the typed term if the debounce delay has elapsed.
    ///
    /// Returns whether to re-render and a timer to re-arm when the term is still
    /// pending.
    pub fn poll_search(&mut self, now_ms: u64) -> (bool, Vec<Action>) {
        match self.debouncer.poll(now_ms) {
            Poll::Ready(term) => {
                self.apply_term(term);
                (true, vec![])
            }
            Poll::Pending { remaining_ms } => (false, vec![Action::ScheduleTimer { after_ms: remaining_ms }]),
            Poll::Idle => (false, vec![]),
        }
    }

    /// Leaves search input, applying a pending term right away.
    pub fn confirm_search(&mut self) {
        self.input_mode = InputMode::Normal;
        if let Some(term) = self.debouncer.cancel() {
            self.apply_term(term);
        }
    }

    /// Leaves search input and clears the term.
    pub fn cancel_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.debouncer.cancel();
        self.search_input.clear();
        self.apply_term(String::new());
    }

    /// Applies `term` to the filter.
    ///
    /// A term different from the applied one is a fresh search: the view is
    /// recomputed and the list goes back to the top. Returns whether it was fresh.
    pub fn apply_term(&mut self, term: String) -> bool {
        if term == self.search_term {
            return false;
        }

        tracing::debug!(term = %term, "applying search term");
        self.search_term = term;
        self.refilter();
        self.windower.reset_scroll();
        self.cursor = 0;
        self.follow_cursor = false;
        true
    }

    fn refilter(&mut self) {
        self.filtered = list::filter(&self.contacts, &self.search_term, self.policy);

        let keys = self
            .filtered
            .iter(&self.contacts)
            .map(|contact| contact.id.clone())
            .collect();
        self.windower.set_keys(keys);

        self.cursor = self.cursor.min(self.filtered.len().saturating_sub(1));
    }

    // Selection

    /// Flips the selection of `id`. Returns `false` for an unknown id.
    pub fn toggle_contact(&mut self, id: &ContactId) -> bool {
        let toggled = list::toggle(&self.contacts, id);
        if !toggled.changed {
            return false;
        }

        let ids: Vec<&str> = toggled.selected_ids.iter().map(ContactId::as_str).collect();
        tracing::info!(contact_id = %id, selected_ids = ?ids, "selection toggled");

        self.contacts = toggled.contacts;
        self.last_selected_ids = toggled.selected_ids;
        true
    }

    /// Toggles the contact under the cursor.
    pub fn toggle_cursor(&mut self) -> bool {
        let Some(id) = self.cursor_contact().map(|contact| contact.id.clone()) else {
            return false;
        };
        self.toggle_contact(&id)
    }

    /// Toggles the row drawn on `line` of the list viewport and moves the
    /// cursor there.
    pub fn toggle_at_line(&mut self, line: usize) -> bool {
        let Some(index) = self.row_at_line(line) else {
            tracing::debug!(line, "click outside any row");
            return false;
        };
        let Some(id) = self.windower.key(index).cloned() else {
            return false;
        };

        self.cursor = index;
        self.toggle_contact(&id)
    }

    /// Index of the row drawn on `line` of the list viewport.
    #[must_use]
    pub fn row_at_line(&self, line: usize) -> Option<usize> {
        if line >= self.windower.viewport() as usize {
            return None;
        }
        self.windower
            .index_at_offset(self.windower.scroll_offset() + line as u64)
    }

    #[must_use]
    pub fn selected_ids(&self) -> Vec<ContactId> {
        list::selected_ids(&self.contacts)
    }

    #[must_use]
    pub fn cursor_contact(&self) -> Option<&Contact> {
        self.filtered.get(&self.contacts, self.cursor)
    }

    // Cursor and scrolling

    /// Moves the cursor by `delta` rows, stopping at either end.
    pub fn move_cursor(&mut self, delta: isize) {
        if self.filtered.is_empty() {
            return;
        }

        let last = self.filtered.len() - 1;
        self.cursor = if delta >= 0 {
            self.cursor.saturating_add(delta.unsigned_abs()).min(last)
        } else {
            self.cursor.saturating_sub(delta.unsigned_abs())
        };
        self.ensure_cursor_visible();
    }

    pub fn page_down(&mut self) {
        let step = self.page_size();
        self.move_cursor(step);
    }

    pub fn page_up(&mut self) {
        let step = self.page_size();
        self.move_cursor(-step);
    }

    pub fn cursor_first(&mut self) {
        self.move_cursor(isize::MIN);
    }

    pub fn cursor_last(&mut self) {
        self.move_cursor(isize::MAX);
    }

    fn page_size(&self) -> isize {
        let rows = self.windower.visible_range().len().max(1);
        isize::try_from(rows).unwrap_or(1)
    }

    /// Scrolls just enough for the cursor row to be fully visible.
    pub fn ensure_cursor_visible(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        self.windower.scroll_to_index(self.cursor, Align::Auto);
        self.follow_cursor = true;
    }

    /// Scrolls by `delta` lines and keeps the cursor on a visible row.
    pub fn scroll_by(&mut self, delta: i64) {
        self.windower.scroll_by(delta);
        self.follow_cursor = false;

        let visible = self.windower.visible_range();
        if !visible.is_empty() {
            self.cursor = self.cursor.clamp(visible.start, visible.end - 1);
        }
    }

    // Layout

    /// Fits the windower to a pane of `rows` x `cols` and measures the rows it
    /// wants rendered.
    pub fn layout(&mut self, rows: usize, cols: usize) {
        let width = cols.saturating_sub(1);
        if width != self.width {
            tracing::debug!(from = self.width, to = width, "list width changed");
            self.width = width;
            self.windower.reset_measurements();
        }
        self.windower.set_viewport(to_u32(list_viewport(rows)));

        for _ in 0..MAX_LAYOUT_PASSES {
            let before = self.windower.window();

            let measurements: Vec<(usize, u32)> = before
                .rendered
                .clone()
                .filter_map(|index| {
                    self.row_layout(index, width)
                        .map(|row| (index, to_u32(row.height())))
                })
                .collect();
            self.windower.measure_many(measurements);

            if self.follow_cursor {
                self.windower.scroll_to_index(self.cursor, Align::Auto);
            }

            if self.windower.window() == before {
                break;
            }
        }

        self.follow_cursor = false;
    }

    /// Computes a renderable view model for a pane of `rows` x `cols`.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        UIViewModel {
            header: self.compute_header(),
            search_bar: self.compute_search_bar(),
            body: self.compute_body(rows, cols),
            footer: self.compute_footer(),
        }
    }

    fn compute_body(&self, rows: usize, cols: usize) -> Body {
        if self.phase == LoadPhase::Loading {
            return Body::Loading(LoaderInfo {
                message: "Loading contacts…".to_string(),
            });
        }

        if self.filtered.is_empty() {
            let subtitle = if self.contacts.is_empty() {
                "No contacts to show".to_string()
            } else {
                format!("Nothing matches \"{}\"", self.search_term)
            };
            return Body::Empty(EmptyState {
                message: "No Data".to_string(),
                subtitle,
            });
        }

        let width = cols.saturating_sub(1);
        let window = self.windower.window();
        let offset = window.scroll_offset;

        let display_rows = window
            .items
            .iter()
            .filter_map(|item| {
                let mut row = self.row_layout(item.index, width)?;
                row.top = to_i64(item.start) - to_i64(offset);
                row.is_cursor = item.index == self.cursor;
                Some(row)
            })
            .collect();

        let viewport = list_viewport(rows);
        Body::List(ListInfo {
            rows: display_rows,
            viewport,
            scrollbar: ScrollbarInfo::compute(window.total_extent, offset, viewport),
        })
    }

    /// Lays out the row at `index` of the filtered view, or `None` if stale.
    fn row_layout(&self, index: usize, width: usize) -> Option<DisplayRow> {
        let contact = self.filtered.get(&self.contacts, index)?;
        let ranges = if self.search_term.is_empty() {
            vec![]
        } else {
            list::match_ranges(contact, &self.search_term, self.policy)
        };

        Some(DisplayRow::layout(
            index,
            &contact.full_name(),
            &contact.initials(),
            &contact.avatar,
            contact.selected,
            &ranges,
            width,
        ))
    }

    fn compute_header(&self) -> HeaderInfo {
        let total = self.contacts.len();
        let shown = match self.phase {
            LoadPhase::Loading => String::new(),
            LoadPhase::Loaded if self.search_term.is_empty() => format!("{total} contacts"),
            LoadPhase::Loaded => format!("{} of {total}", self.filtered.len()),
        };

        let selected = self.contacts.iter().filter(|contact| contact.selected).count();
        let counts = if selected == 0 {
            shown
        } else {
            format!("{shown} · {selected} selected")
        };

        HeaderInfo {
            title: " Contacts ".to_string(),
            counts,
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match self.input_mode {
            InputMode::Normal => "j/k: move  space: toggle  /: search  g/G: top/bottom  q: hide",
            InputMode::Search => "Type to filter  Enter: done  Esc: clear  Ctrl+n/p: move",
        };

        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }

    fn compute_search_bar(&self) -> SearchBarInfo {
        SearchBarInfo {
            query: self.search_input.clone(),
            placeholder: SEARCH_PLACEHOLDER.to_string(),
            focused: self.input_mode == InputMode::Search,
            pending: self.debouncer.is_pending(),
        }
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, first: &str, last: &str, avatar: &str) -> ContactRecord {
        ContactRecord {
            id: id.into(),
            first_name: first.into(),
            last_name: last.into(),
            avatar: avatar.into(),
        }
    }

    fn many(count: u64) -> Vec<ContactRecord> {
        (0..count)
            .map(|i| record(i, "Alex", &format!("Smith{i}"), ""))
            .collect()
    }

    fn loaded(records: Vec<ContactRecord>) -> AppState {
        let mut state = AppState::new(Theme::default());
        state.load_succeeded(records);
        state
    }

    #[test]
    fn layout_measures_rendered_rows() {
        let mut state = loaded(vec![
            record(1, "Egor", "Emelyanov", ""),
            record(2, "Anna", "Ivanova", "https://example.com/2.jpg"),
        ]);

        state.layout(20, 80);

        assert!(state.windower.is_measured(0));
        assert_eq!(state.windower.item(0).unwrap().size, 1);
        assert_eq!(state.windower.item(1).unwrap().size, 2);
        assert_eq!(state.windower.total_extent(), 3);
    }

    #[test]
    fn viewmodel_places_rows_relative_to_scroll() {
        let mut state = loaded(many(100));
        state.layout(20, 80);
        state.scroll_by(5);
        state.layout(20, 80);

        let Body::List(list) = state.compute_viewmodel(20, 80).body else {
            panic!("expected list body");
        };

        let top_row = list.rows.iter().find(|row| row.top == 0).unwrap();
        assert_eq!(top_row.index, state.windower.index_at_offset(state.windower.scroll_offset()).unwrap());
        assert!(list.rows.len() < 100);
        assert!(list.scrollbar.is_some());
        assert_eq!(list.viewport, 12);
    }

    #[test]
    fn cursor_stays_visible_after_jumping_to_the_end() {
        let mut state = loaded(many(50));
        state.layout(20, 80);

        state.cursor_last();
        state.layout(20, 80);

        let visible = state.windower.visible_range();
        assert_eq!(state.cursor, 49);
        assert!(visible.contains(&49));
        assert_eq!(state.windower.scroll_offset(), state.windower.max_scroll_offset());
    }

    #[test]
    fn width_change_resets_measurements() {
        let mut state = loaded(vec![record(1, "Konstantin", "Konstantinopolsky", "")]);
        state.layout(20, 80);
        assert_eq!(state.windower.total_extent(), 1);

        // 20 columns leave 10 characters for the name.
        state.layout(20, 20);
        assert_eq!(state.windower.total_extent(), 3);
    }

    #[test]
    fn scrolling_keeps_cursor_on_screen() {
        let mut state = loaded(many(100));
        state.layout(20, 80);

        state.scroll_by(40);

        let visible = state.windower.visible_range();
        assert!(visible.contains(&state.cursor));
    }

    #[test]
    fn click_maps_line_to_row() {
        let mut state = loaded(vec![
            record(1, "Egor", "Emelyanov", "https://example.com/1.jpg"),
            record(2, "Anna", "Ivanova", ""),
        ]);
        state.layout(20, 80);

        // Row 0 covers lines 0-1, row 1 covers line 2.
        assert_eq!(state.row_at_line(1), Some(0));
        assert_eq!(state.row_at_line(2), Some(1));
        assert_eq!(state.row_at_line(3), None);

        assert!(state.toggle_at_line(2));
        assert_eq!(state.cursor, 1);
        assert_eq!(state.selected_ids(), vec![ContactId::from(2u64)]);
        assert!(!state.toggle_at_line(5));
    }

    #[test]
    fn header_counts_reflect_filter_and_selection() {
        let mut state = loaded(vec![
            record(1, "Egor", "Emelyanov", ""),
            record(2, "Anna", "Ivanova", ""),
        ]);
        assert_eq!(state.compute_viewmodel(20, 80).header.counts, "2 contacts");

        state.apply_term("anna".to_string());
        state.toggle_cursor();
        assert_eq!(state.compute_viewmodel(20, 80).header.counts, "1 of 2 · 1 selected");
    }

    #[test]
    fn match_highlights_reach_the_viewmodel() {
        let mut state = loaded(vec![record(2, "Anna", "Ivanova", "")]);
        state.apply_term("ivan".to_string());
        state.layout(20, 80);

        let Body::List(list) = state.compute_viewmodel(20, 80).body else {
            panic!("expected list body");
        };
        assert_eq!(list.rows[0].lines[0].highlight_ranges, vec![(5, 9)]);
    }
}
