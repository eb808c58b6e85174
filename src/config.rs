use crate::error::AppError;
use content_picker::{
    AndroidPickerConfig, DocsUiIntent, Multiplicity, SelectionConfig, Surface, TypeFilter,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV_VAR: &str = "STORAGE_PLAYGROUND_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "storage-playground.toml";

/// Selection surface as written in the config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    #[default]
    DocsUiGetContent,
    DocsUiOpenDocument,
    PhotoPicker,
    LocalMedia,
}

impl From<SurfaceKind> for Surface {
    fn from(kind: SurfaceKind) -> Self {
        match kind {
            SurfaceKind::DocsUiGetContent => Surface::DocsUi(DocsUiIntent::GetContent),
            SurfaceKind::DocsUiOpenDocument => Surface::DocsUi(DocsUiIntent::OpenDocument),
            SurfaceKind::PhotoPicker => Surface::PhotoPicker,
            SurfaceKind::LocalMedia => Surface::LocalMedia,
        }
    }
}

/// Playground settings, read from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    pub surface: SurfaceKind,
    pub type_filter: TypeFilter,
    pub multiplicity: Multiplicity,
    pub chosen_max: Option<u32>,
    /// Seconds to wait for the picker activity
    pub picker_timeout_secs: u64,
    /// Overrides the host activity class (slash format)
    pub main_activity_class: Option<String>,
    /// SQLite media index used off-device
    pub media_index_path: Option<PathBuf>,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            surface: SurfaceKind::default(),
            type_filter: TypeFilter::default(),
            multiplicity: Multiplicity::default(),
            chosen_max: None,
            picker_timeout_secs: 60,
            main_activity_class: None,
            media_index_path: None,
        }
    }
}

impl PlaygroundConfig {
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn selection_config(&self) -> SelectionConfig {
        SelectionConfig {
            type_filter: self.type_filter,
            multiplicity: self.multiplicity,
            chosen_max: self.chosen_max,
        }
    }

    pub fn picker_config(&self) -> AndroidPickerConfig {
        let mut config = AndroidPickerConfig {
            timeout: Duration::from_secs(self.picker_timeout_secs),
            ..AndroidPickerConfig::default()
        };
        if let Some(class) = &self.main_activity_class {
            config.main_activity_class = class.clone();
        }
        config
    }
}

/// Path of the config file: `$STORAGE_PLAYGROUND_CONFIG` or the default name
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Loads the config; a missing file means defaults
pub fn load_config(path: &Path) -> Result<PlaygroundConfig, AppError> {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(PlaygroundConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config = PlaygroundConfig::from_toml(&content)?;
    log::debug!("Loaded config from {}: {:?}", path.display(), config);
    Ok(config)
}
