use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use complexsets_core::{ColorGradient, EscapeParams};

// ---------------------------------------------------------------------------
// Last-view snapshot
// ---------------------------------------------------------------------------

/// The view at shutdown, restored on the next start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastView {
    pub zoom: f64,
    pub translation_re: f64,
    pub translation_im: f64,
    pub iteration_budget: u32,
}

// ---------------------------------------------------------------------------
// Application preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    #[serde(default = "default_iteration_budget")]
    pub iteration_budget: u32,
    #[serde(default = "default_escape_radius")]
    pub escape_radius: f64,
    /// Zoom change per mouse-wheel notch (0.1 → ×1.1 per notch).
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,
    /// Render threads; 0 uses one per hardware thread.
    #[serde(default)]
    pub worker_threads: usize,
    #[serde(default)]
    pub gradient: ColorGradient,
    #[serde(default = "default_true")]
    pub restore_last_view: bool,
    #[serde(default)]
    pub last_view: Option<LastView>,
}

fn default_window_width() -> f32 {
    1024.0
}
fn default_window_height() -> f32 {
    768.0
}
fn default_iteration_budget() -> u32 {
    EscapeParams::DEFAULT_ITERATION_BUDGET
}
fn default_escape_radius() -> f64 {
    EscapeParams::DEFAULT_ESCAPE_RADIUS
}
fn default_zoom_step() -> f64 {
    0.1
}
fn default_true() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            iteration_budget: default_iteration_budget(),
            escape_radius: default_escape_radius(),
            zoom_step: default_zoom_step(),
            worker_threads: 0,
            gradient: ColorGradient::default(),
            restore_last_view: true,
            last_view: None,
        }
    }
}

impl Preferences {
    /// Load preferences from next to the executable, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(json) => match Self::from_json(&json) {
                    Ok(prefs) => {
                        info!("Loaded preferences from {}", path.display());
                        return prefs;
                    }
                    Err(e) => error!("Failed to parse preferences: {e}"),
                },
                Err(e) => error!("Failed to read preferences file: {e}"),
            }
        } else {
            debug!("No preferences file at {}", path.display());
        }
        Self::default()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Persist preferences to disk.
    pub fn save(&self) {
        let path = config_path();
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(&path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences to {}", path.display());
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    /// Escape parameters from the stored budget and radius.
    ///
    /// An unusable radius falls back to the default rather than refusing
    /// to start.
    pub fn escape_params(&self) -> EscapeParams {
        match EscapeParams::new(self.iteration_budget.max(1), self.escape_radius) {
            Ok(params) => params,
            Err(e) => {
                warn!("{e}; using default escape radius");
                EscapeParams::default().with_iteration_budget(self.iteration_budget.max(1))
            }
        }
    }

    pub fn worker_count(&self) -> Option<NonZeroUsize> {
        NonZeroUsize::new(self.worker_threads)
    }
}

/// `preferences.json` beside the executable, so a standalone build keeps its
/// settings with it. Falls back to the current directory.
fn config_path() -> PathBuf {
    let dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    dir.join("preferences.json")
}
