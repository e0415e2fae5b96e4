//! Editor configuration.

use serde::Deserialize;
use thiserror::Error;

pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 600;
const GROUP_LAYER_NAME: &str = "Group";
const CLONE_OFFSET: f32 = 10.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid editor config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Named canvas size offered in the toolbar
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Preset {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl Preset {
    fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub width: u32,
    pub height: u32,
    /// Name given to the layer created for each new group
    pub group_layer_name: String,
    /// Distance between an object and its clone, on both axes
    pub clone_offset: f32,
    pub presets: Vec<Preset>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            group_layer_name: GROUP_LAYER_NAME.to_string(),
            clone_offset: CLONE_OFFSET,
            presets: vec![
                Preset::new("facebook", 476, 124),
                Preset::new("instagram", 400, 460),
                Preset::new("code", 340, 84),
                Preset::new("bulletList", 400, 150),
            ],
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Config from an optional JSON source. A missing or broken source falls
    /// back to the defaults; a broken one is logged.
    pub fn load(source: Option<&str>) -> Self {
        let Some(json) = source.map(str::trim).filter(|json| !json.is_empty()) else {
            return Self::default();
        };
        Self::from_json(json).unwrap_or_else(|err| {
            log::warn!("{}; using defaults", err);
            Self::default()
        })
    }

    pub fn preset(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }
}
