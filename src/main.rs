//! Zellij plugin entry point.
//!
//! The plugin and its background worker are only built for `wasm32-wasip1`.
//! On any other target this binary is a stub so that the library and its tests
//! build with a plain `cargo test`.
//!
//! ```text
//! ┌─────────────────────────┐
//! │   Zellij Main Thread    │
//! │  ┌──────────────────┐   │
//! │  │  State (plugin)  │   │  ← AppState, events, rendering
//! │  └──────────────────┘   │
//! │          │              │
//! │          │ IPC (JSON)   │
//! │          ▼              │
//! │  ┌──────────────────┐   │
//! │  │ ContactsWorker   │   │  ← Reads contacts files
//! │  │ (worker thread)  │   │
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! URL sources never touch the worker: the plugin issues the HTTP request
//! itself and receives the body as a `WebRequestResult` event.

#![allow(clippy::multiple_crate_versions)]

#[cfg(target_family = "wasm")]
mod plugin;

#[cfg(target_family = "wasm")]
use plugin::{ContactsWorkerShim, State};
#[cfg(target_family = "wasm")]
use zellij_tile::prelude::*;

#[cfg(target_family = "wasm")]
register_plugin!(State);
#[cfg(target_family = "wasm")]
register_worker!(ContactsWorkerShim, contacts_worker, CONTACTS_WORKER);

#[cfg(not(target_family = "wasm"))]
fn main() {
    eprintln!(
        "zontacts is a Zellij plugin: build it with `cargo build --target wasm32-wasip1` \
         and load target/wasm32-wasip1/debug/zontacts.wasm from a layout"
    );
}
