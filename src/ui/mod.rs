//! User interface rendering layer with component-based architecture.
//!
//! Turns view models into ANSI-styled output through composable components,
//! with theme support and search match highlighting.
//!
//! ```text
//! AppState → layout → compute_viewmodel → UIViewModel → render_frame → ANSI Output
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable UI state
//! - [`renderer`]: Top-level rendering coordinator
//! - [`components`]: Composable UI component renderers
//! - [`helpers`]: Shared rendering utilities (wrapping, highlighting)
//! - [`theme`]: Color schemes and ANSI escape sequence generation

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::render;
pub use theme::Theme;
pub use viewmodel::{Body, DisplayRow, EmptyState, FooterInfo, HeaderInfo, ListInfo, SearchBarInfo, UIViewModel};
