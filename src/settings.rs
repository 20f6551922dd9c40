//! Visualization settings and preferences
//!
//! Persisted in LocalStorage on web, defaults elsewhere.

use serde::{Deserialize, Serialize};

use crate::consts::{NEBULA_CAP_PER_CLUSTER, STAR_CAP};

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

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Ambient star population cap
    pub fn star_cap(&self) -> usize {
        match self {
            QualityPreset::Low => STAR_CAP / 3,
            QualityPreset::Medium => STAR_CAP,
            QualityPreset::High => STAR_CAP,
        }
    }

    /// Per-cluster nebula particle cap
    pub fn nebula_cap(&self) -> usize {
        match self {
            QualityPreset::Low => NEBULA_CAP_PER_CLUSTER / 4,
            QualityPreset::Medium => NEBULA_CAP_PER_CLUSTER / 2,
            QualityPreset::High => NEBULA_CAP_PER_CLUSTER,
        }
    }

    /// Concentric layer count used to fake the radial glow gradient
    pub fn glow_layers(&self) -> u32 {
        match self {
            QualityPreset::Low => 6,
            QualityPreset::Medium => 10,
            QualityPreset::High => 16,
        }
    }

    /// Whether domain label dust is rendered
    pub fn label_dust_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }

    /// Whether background noise blobs are rendered
    pub fn noise_blobs_enabled(&self) -> bool {
        matches!(self, QualityPreset::High)
    }
}

/// Visualization settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Connector beams
    pub beams: bool,
    /// Procedural sigils over entities
    pub sigils: bool,
    /// Show FPS counter
    pub show_fps: bool,
    /// Reduced motion (freeze sphere spin, soften pulses)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            beams: true,
            sigils: true,
            show_fps: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Sphere-mode rotation rate multiplier (respects reduced_motion)
    pub fn rotation_multiplier(&self) -> f32 {
        if self.reduced_motion { 0.0 } else { 1.0 }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "denizen_atlas_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_round_trip() {
        for p in [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High] {
            assert_eq!(QualityPreset::from_str(p.as_str()), Some(p));
        }
        assert_eq!(QualityPreset::from_str("ultra"), None);
    }

    #[test]
    fn test_low_preset_trims_population() {
        assert!(QualityPreset::Low.star_cap() < QualityPreset::High.star_cap());
        assert!(QualityPreset::Low.nebula_cap() < QualityPreset::High.nebula_cap());
        assert!(!QualityPreset::Low.label_dust_enabled());
    }
}
