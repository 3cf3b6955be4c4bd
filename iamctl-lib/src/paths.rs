//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

use crate::config::CONFIG_FILE;
use crate::error::ConfigError;
use crate::store::SERVER_DETAILS_FILE;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "wso2";
const APPLICATION: &str = "iamctl";

/// Get project directories, or None if home directory cannot be determined.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the config directory for the client config and stored tokens.
///
/// - Linux: `$XDG_CONFIG_HOME/iamctl` or `~/.config/iamctl`
/// - macOS: `~/Library/Application Support/org.wso2.iamctl`
/// - Windows: `C:\Users\<User>\AppData\Roaming\wso2\iamctl\config`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the cache directory for logs.
///
/// - Linux: `$XDG_CACHE_HOME/iamctl` or `~/.cache/iamctl`
/// - macOS: `~/Library/Caches/org.wso2.iamctl`
/// - Windows: `C:\Users\<User>\AppData\Local\wso2\iamctl\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Resolved locations of the files one invocation touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub config_file: PathBuf,
    pub server_details_file: PathBuf,
}

impl Paths {
    /// Files inside an explicit directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            config_file: dir.join(CONFIG_FILE),
            server_details_file: dir.join(SERVER_DETAILS_FILE),
        }
    }

    /// Files inside `override_dir` if given, else the platform config dir.
    pub fn resolve(override_dir: Option<&Path>) -> Result<Self, ConfigError> {
        match override_dir {
            Some(dir) => Ok(Self::in_dir(dir)),
            None => config_dir().map(Self::in_dir).ok_or(ConfigError::NoConfigDir),
        }
    }
}

/// Get the path to the latest log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("latest.log"))
}

/// Maximum number of old log files to keep.
const MAX_OLD_LOGS: usize = 10;

/// Rotate logs: rename latest.log to timestamped name, clean up old logs.
///
/// Call this at startup before creating the new log file. Every stale log is
/// attempted; the first failure is returned.
pub fn rotate_logs(cache: &Path) -> io::Result<()> {
    let latest = cache.join("latest.log");

    let archived = if latest.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        fs::rename(&latest, cache.join(format!("{}.log", timestamp)))
    } else {
        Ok(())
    };

    archived.and(cleanup_old_logs(cache))
}

/// Remove old log files, keeping only the most recent MAX_OLD_LOGS.
fn cleanup_old_logs(cache_dir: &Path) -> io::Result<()> {
    let mut logs: Vec<_> = fs::read_dir(cache_dir)?
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != "latest.log"
        })
        .collect();

    // Oldest first
    logs.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());

    let excess = logs.len().saturating_sub(MAX_OLD_LOGS);
    logs.iter()
        .take(excess)
        .map(|entry| fs::remove_file(entry.path()))
        .fold(Ok(()), |first, result| first.and(result))
}
