//! Per-user directories for Launchpad data.

use std::path::PathBuf;

use directories::ProjectDirs;

fn project_dirs(app: &str) -> Option<ProjectDirs> {
    ProjectDirs::from("", "", app)
}

/// Config directory for `app` (settings.json lives here).
pub fn config_dir(app: &str) -> PathBuf {
    project_dirs(app)
        .map(|p| p.config_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join(app).join("config"))
}

/// Cache directory for `app`. Contents may be wiped at any launch.
pub fn cache_dir(app: &str) -> PathBuf {
    project_dirs(app)
        .map(|p| p.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join(app).join("cache"))
}

/// Data directory for `app` (the recycle bin lives here).
pub fn data_dir(app: &str) -> PathBuf {
    project_dirs(app)
        .map(|p| p.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join(app).join("data"))
}

/// True when a rename failed only because source and target sit on
/// different filesystems, so copy + remove is the way to move.
pub fn is_cross_device(err: &std::io::Error) -> bool {
    #[cfg(unix)]
    const EXDEV: i32 = 18;
    #[cfg(windows)]
    const EXDEV: i32 = 17; // ERROR_NOT_SAME_DEVICE
    #[cfg(not(any(unix, windows)))]
    const EXDEV: i32 = -1;
    err.raw_os_error() == Some(EXDEV)
}
