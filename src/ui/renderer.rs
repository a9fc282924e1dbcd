//! Top-level rendering coordinator.
//!
//! Rendering is a two-step process:
//!
//! 1. **Layout**: fit the windower to the pane and measure the rows it wants
//!    rendered (`AppState::layout`)
//! 2. **Draw**: compute the `UIViewModel` and hand it to the components

use crate::app::AppState;
use crate::ui::components;

/// Renders the plugin UI to stdout.
///
/// Takes the state mutably because laying out rows feeds their measured heights
/// back into the windower.
pub fn render(state: &mut AppState, rows: usize, cols: usize) {
    let _span = tracing::trace_span!("render", rows, cols).entered();

    state.layout(rows, cols);
    let viewmodel = state.compute_viewmodel(rows, cols);

    components::render_frame(&viewmodel, &state.theme, rows, cols);
}
