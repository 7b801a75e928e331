//! Browser discovery and the Chromium-backed page controller.

pub mod chromium;

use std::path::PathBuf;

pub use chromium::{ChromiumPage, ChromiumSession};

/// Find a Chromium binary.
///
/// Checks `JOBSIFT_CHROMIUM_PATH`, then `~/.jobsift/chromium/`, then the
/// system `PATH`, then the usual macOS install location. The
/// `~/.jobsift/chromium/` layout is an unpacked Chrome for Testing archive,
/// which pins a browser version independent of the system install.
pub fn find_chromium() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("JOBSIFT_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let root = home.join(".jobsift").join("chromium");
        let candidates = if cfg!(target_os = "macos") {
            vec![
                root.join("chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                root.join("chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                root.join("chrome"),
            ]
        } else {
            vec![root.join("chrome-linux64/chrome"), root.join("chrome")]
        };
        if let Some(found) = candidates.into_iter().find(|c| c.exists()) {
            return Some(found);
        }
    }

    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        let common = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}
