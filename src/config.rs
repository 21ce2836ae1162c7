use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Dialog stack settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Z-index given to the lowest visible dialog
    pub base_z_index: i32,

    /// Outer width for dialogs that do not set one
    pub default_width: u16,

    /// Body height of a frame dialog until its content reports a size
    pub frame_default_height: u16,

    /// Upper bound for auto-measured frame dialogs
    pub frame_max_height: u16,

    /// Whether the backdrop dims the screen behind dialogs
    pub backdrop_dim: bool,

    /// Theme preset name
    pub theme: String,

    pub confirm_label: String,
    pub cancel_label: String,
    pub ok_label: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_z_index: 1000,
            default_width: 50,
            frame_default_height: 8,
            frame_max_height: 30,
            backdrop_dim: true,
            theme: "dark".to_string(),
            confirm_label: "Confirm".to_string(),
            cancel_label: "Cancel".to_string(),
            ok_label: "OK".to_string(),
        }
    }
}

impl Settings {
    /// Initialize settings from defaults, the environment and the first
    /// settings file found.
    pub async fn init(explicit: Option<&Path>) -> Result<Self> {
        debug!("Initializing settings");

        let mut settings = match explicit {
            Some(path) => Self::load_from_file(path).await?,
            None => match Self::discover().await {
                Some(settings) => settings,
                None => Self::default(),
            },
        };

        settings.load_from_env();
        settings.validate()?;

        Ok(settings)
    }

    /// Candidate settings files, in priority order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("./.dialog-stack.json"),
            PathBuf::from("./dialog-stack.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("dialog-stack").join("config.json"));
        }

        paths
    }

    async fn discover() -> Option<Self> {
        for path in Self::search_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(&path).await {
                Ok(settings) => return Some(settings),
                Err(e) => tracing::warn!("Ignoring settings file {}: {}", path.display(), e),
            }
        }
        None
    }

    /// Load settings from a JSON file; missing keys keep their defaults.
    pub async fn load_from_file(path: &Path) -> Result<Self> {
        debug!("Loading settings from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let settings: Self = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Apply `DIALOG_STACK_*` environment overrides
    pub fn load_from_env(&mut self) {
        if let Ok(base) = std::env::var("DIALOG_STACK_BASE_Z") {
            if let Ok(base) = base.parse() {
                self.base_z_index = base;
            }
        }

        if let Ok(width) = std::env::var("DIALOG_STACK_DEFAULT_WIDTH") {
            if let Ok(width) = width.parse() {
                self.default_width = width;
            }
        }

        if let Ok(height) = std::env::var("DIALOG_STACK_FRAME_MAX_HEIGHT") {
            if let Ok(height) = height.parse() {
                self.frame_max_height = height;
            }
        }

        if let Ok(dim) = std::env::var("DIALOG_STACK_BACKDROP_DIM") {
            self.backdrop_dim = dim.to_lowercase() == "true";
        }

        if let Ok(theme) = std::env::var("DIALOG_STACK_THEME") {
            self.theme = theme;
        }
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.default_width == 0 {
            return Err(anyhow::anyhow!("default_width must be greater than zero"));
        }
        if self.frame_default_height == 0 || self.frame_max_height == 0 {
            return Err(anyhow::anyhow!("frame heights must be greater than zero"));
        }
        if self.frame_default_height > self.frame_max_height {
            return Err(anyhow::anyhow!(
                "frame_default_height ({}) exceeds frame_max_height ({})",
                self.frame_default_height,
                self.frame_max_height
            ));
        }
        Ok(())
    }
}
