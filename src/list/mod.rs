//! Contact list logic: search filtering, selection and input debouncing.
//!
//! Everything here is pure or clock-driven and independent of Zellij, so it can
//! be exercised directly from unit tests.

pub mod debounce;
pub mod filter;
pub mod store;

pub use debounce::{Debouncer, Poll, DEFAULT_DEBOUNCE, DEFAULT_DEBOUNCE_MS};
pub use filter::{filter, match_ranges, FilteredView, MatchPolicy};
pub use store::{selected_ids, toggle, Toggled};
