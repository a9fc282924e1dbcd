//! Zontacts: a Zellij plugin for browsing, searching and selecting contacts.
//!
//! The plugin fetches a contact list once per mount, shows it in a virtualized
//! list that only lays out the rows on screen, filters it with a debounced,
//! case-insensitive search over `"first last"` and `"last first"`, and lets the
//! user tick contacts with checkboxes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs, plugin.rs)            │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, load sequencing                  │
//! │  - Layout and view model computation                │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ List (list/)  │   │ Window        │   │ Worker        │
//! │ - Filter      │   │ (window/)     │   │ (worker/)     │
//! │ - Toggle      │   │ - Windower    │   │ - File fetch  │
//! │ - Debounce    │   │ - Fenwick     │   │ - IPC types   │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, Sources, UI                                │
//! │  - Contact model and errors (domain/)               │
//! │  - JSON and HTTP payloads (source/)                 │
//! │  - Components and themes (ui/)                      │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - OpenTelemetry tracing to an OTLP JSON file       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/zontacts.wasm" {
//!         contacts_url "https://reqres.in/api/users?per_page=12"
//!         // or: contacts_file "~/contacts.json"
//!         search_debounce_ms "500"
//!         search_policy "reversed"
//!         overscan "2"
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use zontacts::app::LoadPhase;
//! use zontacts::worker::WorkerResponse;
//! use zontacts::{handle_event, initialize, Config, Event};
//!
//! let mut config = Config::default();
//! config.contacts_file = Some("~/contacts.json".to_string());
//!
//! let mut state = initialize(&config);
//! let (_, actions) = handle_event(&mut state, &Event::PermissionsGranted, 0)?;
//! assert_eq!(actions.len(), 1);
//!
//! let response = WorkerResponse::ContactsFetched { mount_id: state.mount_id, contacts: vec![] };
//! handle_event(&mut state, &Event::WorkerResponse(response), 0)?;
//! assert_eq!(state.phase, LoadPhase::Loaded);
//! # Ok::<(), zontacts::ZontactsError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod list;
pub mod observability;
pub mod source;
pub mod ui;
pub mod window;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event, InputMode, LoadPhase};
pub use domain::{Contact, ContactId, Result, ZontactsError};
pub use ui::Theme;

use crate::infrastructure::resolve_host_path;
use crate::list::{MatchPolicy, DEFAULT_DEBOUNCE_MS};
use crate::source::SourceSpec;
use std::collections::BTreeMap;
use std::time::Duration;

const DEFAULT_OVERSCAN: usize = 2;

/// Plugin configuration parsed from Zellij's configuration map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// URL fetched with an HTTP GET. Takes precedence over `contacts_file`.
    pub contacts_url: Option<String>,

    /// JSON file read by the background worker. `~` and relative paths
    /// resolve under the sandbox's `/host` mount.
    pub contacts_file: Option<String>,

    /// Quiet period before a typed search term is applied. `0` applies every
    /// keystroke at once. Default: 500
    pub search_debounce_ms: u64,

    /// `forward` or `reversed` (default).
    pub search_policy: MatchPolicy,

    /// Rows laid out beyond each edge of the viewport. Default: 2
    pub overscan: usize,

    /// Built-in theme name: `catppuccin-mocha`, `catppuccin-latte` or
    /// `gruvbox-dark`. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file. See [`ui::theme`] for the format.
    pub theme_file: Option<String>,

    /// `EnvFilter` directive for tracing. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contacts_url: None,
            contacts_file: None,
            search_debounce_ms: DEFAULT_DEBOUNCE_MS,
            search_policy: MatchPolicy::default(),
            overscan: DEFAULT_OVERSCAN,
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from the map Zellij passes to `load`.
    ///
    /// Blank values count as unset; unparsable numbers and policies fall back
    /// to their defaults with a warning.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use zontacts::Config;
    ///
    /// let map = BTreeMap::from([
    ///     ("contacts_url".to_string(), "https://reqres.in/api/users".to_string()),
    ///     ("search_debounce_ms".to_string(), "250".to_string()),
    /// ]);
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.search_debounce_ms, 250);
    /// assert_eq!(config.overscan, 2);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let text = |key: &str| {
            config
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(String::from)
        };

        let search_debounce_ms = parse_or(config, "search_debounce_ms", DEFAULT_DEBOUNCE_MS);
        let overscan = parse_or(config, "overscan", DEFAULT_OVERSCAN);

        let search_policy = text("search_policy").map_or_else(MatchPolicy::default, |name| {
            MatchPolicy::from_name(&name).unwrap_or_else(|| {
                tracing::warn!(value = %name, "unknown search_policy, using default");
                MatchPolicy::default()
            })
        });

        Self {
            contacts_url: text("contacts_url"),
            contacts_file: text("contacts_file"),
            search_debounce_ms,
            search_policy,
            overscan,
            theme_name: text("theme"),
            theme_file: text("theme_file"),
            trace_level: text("trace_level"),
        }
    }

    /// Where contacts are loaded from, or `None` if nothing is configured.
    #[must_use]
    pub fn source(&self) -> Option<SourceSpec> {
        if let Some(url) = &self.contacts_url {
            return Some(SourceSpec::Url(url.clone()));
        }
        self.contacts_file
            .as_deref()
            .map(|path| SourceSpec::File(resolve_host_path(path)))
    }

    /// Loads the configured theme, falling back to the default one.
    #[must_use]
    pub fn theme(&self) -> Theme {
        if let Some(theme_file) = &self.theme_file {
            return Theme::from_file(resolve_host_path(theme_file)).unwrap_or_else(|e| {
                tracing::warn!(theme_file = %theme_file, error = %e, "failed to load theme file, using default");
                Theme::default()
            });
        }

        self.theme_name.as_deref().map_or_else(Theme::default, |name| {
            Theme::from_name(name).unwrap_or_else(|| {
                tracing::warn!(theme_name = %name, "unknown theme, using default");
                Theme::default()
            })
        })
    }
}

fn parse_or<T>(config: &BTreeMap<String, String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    let Some(raw) = config.get(key) else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(key, value = %raw, "invalid number in configuration, using default");
        default
    })
}

/// Creates the application state for a new mount.
///
/// The state starts in `Loading`; the fetch starts once permissions are granted.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(source = ?config.source(), "initializing zontacts");

    AppState::new(config.theme())
        .with_source(config.source())
        .with_search(Duration::from_millis(config.search_debounce_ms), config.search_policy)
        .with_overscan(config.overscan)
}

/// Current wall-clock time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}
