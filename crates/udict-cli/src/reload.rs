use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::debug;

use crate::config::expand_tilde;

pub const TOOL_APP_NAMES: [&str; 2] = ["DictionaryTool.app", "GoogleJapaneseInputTool.app"];
const IME_APP_NAME: &str = "GoogleJapaneseInput.app";
const RELOAD_WAIT_SECONDS: f64 = 0.4;

/// Result of asking the IME to pick up the new dictionary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The tool ran. `note` carries a non-fatal complaint, if any.
    Reloaded { note: Option<String> },
    Skipped { reason: String },
}

fn default_tool_paths() -> Vec<PathBuf> {
    let mut roots = vec![PathBuf::from("/Library/Input Methods").join(IME_APP_NAME)];
    if let Some(home) = dirs::home_dir() {
        roots.push(home.join("Library/Input Methods").join(IME_APP_NAME));
    }
    roots.push(PathBuf::from("/Applications").join(IME_APP_NAME));

    roots
        .iter()
        .flat_map(|root| {
            TOOL_APP_NAMES
                .iter()
                .map(move |name| root.join("Contents/Resources").join(name))
        })
        .collect()
}

fn find_in_resources(resources: &Path) -> Option<PathBuf> {
    TOOL_APP_NAMES
        .iter()
        .map(|name| resources.join(name))
        .find(|candidate| candidate.exists())
}

/// Locate the dictionary tool application.
///
/// An explicit path may name the tool bundle itself, the IME bundle that
/// contains it, or a directory holding it. Without one, the standard install
/// locations are searched.
pub fn find_tool_app(explicit: Option<&Path>) -> Option<PathBuf> {
    let Some(explicit) = explicit else {
        return default_tool_paths().into_iter().find(|p| p.exists());
    };

    let path = match expand_tilde(explicit) {
        Ok(path) => path,
        Err(e) => {
            debug!(error = %e, "cannot resolve tool path");
            return None;
        }
    };
    if !path.exists() {
        return None;
    }
    let is_app = path.extension().is_some_and(|ext| ext == "app");
    if path.is_dir() && is_app {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if TOOL_APP_NAMES.contains(&name) {
            return Some(path);
        }
        if name == IME_APP_NAME {
            return find_in_resources(&path.join("Contents/Resources")).or(Some(path));
        }
        return Some(path);
    }
    if path.is_dir() {
        return find_in_resources(&path);
    }
    None
}

fn stderr_or(output: &Output, fallback: &str) -> String {
    let text = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if text.is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

/// Launch the dictionary tool in the background and quit it again, which
/// makes the IME reload its user dictionary. macOS only.
pub fn reload_ime(tool_path: Option<&Path>) -> ReloadOutcome {
    if !cfg!(target_os = "macos") {
        return ReloadOutcome::Skipped {
            reason: "reload is only supported on macOS".into(),
        };
    }

    let Some(app) = find_tool_app(tool_path) else {
        return ReloadOutcome::Skipped {
            reason: format!(
                "dictionary tool not found ({}); use --tool-path to set it",
                TOOL_APP_NAMES.join(" or ")
            ),
        };
    };
    debug!(app = %app.display(), "reloading IME via dictionary tool");

    match Command::new("open").arg("-g").arg(&app).output() {
        Ok(out) if out.status.success() => {}
        Ok(out) => {
            return ReloadOutcome::Skipped {
                reason: stderr_or(&out, "failed to launch the dictionary tool"),
            }
        }
        Err(e) => {
            return ReloadOutcome::Skipped {
                reason: format!("failed to launch the dictionary tool: {e}"),
            }
        }
    }

    let stem = app
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let script = [
        format!("tell application \"{stem}\" to launch"),
        format!("delay {RELOAD_WAIT_SECONDS}"),
        format!("tell application \"{stem}\" to quit"),
    ];
    let mut cmd = Command::new("osascript");
    for line in &script {
        cmd.arg("-e").arg(line);
    }

    let note = match cmd.output() {
        Ok(out) if out.status.success() => None,
        Ok(out) => Some(stderr_or(&out, "dictionary tool did not quit cleanly")),
        Err(e) => Some(format!("osascript failed: {e}")),
    };
    ReloadOutcome::Reloaded { note }
}
