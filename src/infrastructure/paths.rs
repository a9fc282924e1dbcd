//! Path handling for the Zellij plugin sandbox.
//!
//! Inside the sandbox the host filesystem is mounted under `/host`, which points
//! at the directory Zellij was started from (usually the user's home).

use std::path::PathBuf;

const HOST_ROOT: &str = "/host";

/// Directory holding the plugin's trace files.
///
/// Resolves to `~/.local/share/zellij/zontacts` on the host when Zellij was
/// started from the home directory.
#[must_use]
pub fn data_dir() -> PathBuf {
    PathBuf::from(HOST_ROOT).join(".local/share/zellij/zontacts")
}

/// Maps `~` and `~/...` onto `/host`. Other paths are returned unchanged.
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    match path.strip_prefix('~') {
        Some("") => HOST_ROOT.to_string(),
        Some(rest) if rest.starts_with('/') => format!("{HOST_ROOT}{rest}"),
        _ => path.to_string(),
    }
}

/// Resolves a configured file path to a path readable from the sandbox.
///
/// Tilde paths and relative paths land under `/host`; absolute paths are used
/// as given.
#[must_use]
pub fn resolve_host_path(path: &str) -> PathBuf {
    let expanded = expand_tilde(path.trim());
    let resolved = PathBuf::from(&expanded);

    if resolved.is_absolute() {
        resolved
    } else {
        PathBuf::from(HOST_ROOT).join(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_maps_to_host() {
        assert_eq!(expand_tilde("~/contacts.json"), "/host/contacts.json");
        assert_eq!(expand_tilde("~"), "/host");
        assert_eq!(expand_tilde("~bob/contacts.json"), "~bob/contacts.json");
        assert_eq!(expand_tilde("/data/contacts.json"), "/data/contacts.json");
    }

    #[test]
    fn relative_paths_resolve_under_host() {
        assert_eq!(resolve_host_path("contacts.json"), PathBuf::from("/host/contacts.json"));
        assert_eq!(resolve_host_path(" ~/x/contacts.json "), PathBuf::from("/host/x/contacts.json"));
        assert_eq!(resolve_host_path("/tmp/contacts.json"), PathBuf::from("/tmp/contacts.json"));
    }

    #[test]
    fn data_dir_lives_under_zellij_share() {
        assert_eq!(data_dir(), PathBuf::from("/host/.local/share/zellij/zontacts"));
    }
}
