//! Input and load phase state types.
//!
//! # State Machine
//!
//! Keystrokes are interpreted according to [`InputMode`]:
//! - **Normal**: navigate the list, toggle rows
//! - **Search**: edit the search term
//!
//! Loading is a one-way, two-state machine ([`LoadPhase`]): a mount starts in
//! `Loading` and enters `Loaded` exactly once, whether the fetch succeeded or
//! failed.

/// Current input handling mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Keys navigate the list.
    ///
    /// Available keybindings: j/k (move), space/enter (toggle), / (search),
    /// g/G (first/last), PgUp/PgDn (page), q (hide).
    #[default]
    Normal,

    /// Printable keys edit the search term.
    ///
    /// Enter returns to the list keeping the term, Esc clears it.
    Search,
}

/// Progress of the initial fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPhase {
    /// Waiting for the fetch; the loader is shown.
    #[default]
    Loading,
    /// The fetch resolved or failed. Never left again.
    Loaded,
}
