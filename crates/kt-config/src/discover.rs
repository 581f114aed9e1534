//! Configuration file discovery across conventional locations.

use std::path::PathBuf;

use tracing::debug;

/// Find a configuration file named `name`, returning the first hit.
///
/// Searched in order: `extra_paths` as given, the current working
/// directory, `./config`, the home directory, and the user configuration
/// directory.
pub fn find_config_file(name: &str, extra_paths: &[PathBuf]) -> Option<PathBuf> {
    let mut search: Vec<PathBuf> = extra_paths.to_vec();
    if let Ok(cwd) = std::env::current_dir() {
        search.push(cwd.clone());
        search.push(cwd.join("config"));
    }
    if let Some(home) = dirs::home_dir() {
        search.push(home);
    }
    if let Some(config_dir) = dirs::config_dir() {
        search.push(config_dir);
    }

    for dir in search {
        let candidate = dir.join(name);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "configuration file found");
            return Some(candidate);
        }
    }
    None
}
