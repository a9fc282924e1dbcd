//! List windowing: deciding which rows of a long list to render.
//!
//! Rendering cost stays proportional to the number of rows on screen rather
//! than the length of the filtered list. See [`Windower`] for the stateful
//! engine used by the plugin and [`compute_window`] for the stateless form.

mod fenwick;
pub mod windower;

pub use windower::{compute_window, Align, Window, WindowItem, Windower, WindowerOptions};
