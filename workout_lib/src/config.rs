use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, geolocation::LocateOptions, store::DEFAULT_STORAGE_KEY};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub storage_key: String,
    pub map_container_id: String,
    pub map_zoom: f64,
    pub tile_url: String,
    pub tile_attribution: String,
    pub locate: LocateOptions,
    pub pan_duration_secs: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            map_container_id: "map".to_string(),
            map_zoom: 13.0,
            tile_url: "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png".to_string(),
            tile_attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".to_string(),
            locate: LocateOptions::default(),
            pan_duration_secs: 1.0,
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}
