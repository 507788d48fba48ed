//! Runtime settings
//!
//! Read from the page query string (`?paths=off&quality=low`) on startup.
//! Nothing is stored between sessions.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum path dots uploaded to the GPU per frame
    pub fn max_path_dots(&self) -> usize {
        match self {
            QualityPreset::Low => 256,
            QualityPreset::Medium => 1024,
            QualityPreset::High => 2048,
        }
    }

    /// Edge softness in pixels for shapes
    pub fn edge_softness(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.5,
            QualityPreset::Medium => 1.0,
            QualityPreset::High => 1.5,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Draw each boat's remaining path as dots
    pub show_paths: bool,
    /// Show FPS counter
    pub show_fps: bool,
    /// Ring around the boat being steered
    pub selection_ring: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            show_paths: true,
            show_fps: false,
            selection_ring: true,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "on" | "true" | "yes" => Some(true),
        "0" | "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse `key=value` pairs from a URL query string. Unknown keys and bad
    /// values are logged and skipped.
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        let query = query.trim_start_matches('?');

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, "on"));
            let applied = match key {
                "quality" => QualityPreset::parse(value).map(|q| settings.quality = q),
                "paths" => parse_flag(value).map(|v| settings.show_paths = v),
                "fps" => parse_flag(value).map(|v| settings.show_fps = v),
                "ring" => parse_flag(value).map(|v| settings.selection_ring = v),
                _ => {
                    log::warn!("Ignoring unknown setting '{}'", key);
                    continue;
                }
            };
            if applied.is_none() {
                log::warn!("Ignoring bad value '{}' for setting '{}'", value, key);
            }
        }

        settings
    }

    /// Effective path dot cap
    pub fn max_path_dots(&self) -> usize {
        if self.show_paths {
            self.quality.max_path_dots()
        } else {
            0
        }
    }

    /// Read settings from the current page URL (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let query = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let settings = Self::from_query(&query);
        if let Ok(json) = serde_json::to_string(&settings) {
            log::info!("Settings: {}", json);
        }
        settings
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
