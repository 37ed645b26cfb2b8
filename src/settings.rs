//! Player preferences
//!
//! Persisted in LocalStorage so the mute button and chosen variant survive
//! a page reload. Nothing about the game in progress is stored.

use serde::{Deserialize, Serialize};

use crate::tuning::{Tuning, Variant};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Content preset to play
    pub variant: Variant,

    // === Audio ===
    /// Mute toggle (🔊/🔇 button)
    pub muted: bool,
    /// Spoken cues (countdown, streaks, power-ups)
    pub speech: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Accessibility ===
    /// Fewer confetti emojis
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::Classic,
            muted: false,
            speech: true,
            master_volume: 1.0,
            sfx_volume: 1.0,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Flip mute, returning the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Combined gain applied to every sound effect
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Speech is silenced by mute as well as by its own toggle
    pub fn speech_enabled(&self) -> bool {
        self.speech && !self.muted
    }

    /// Content tuning for the stored variant
    pub fn tuning(&self) -> Tuning {
        self.tuning_for(self.variant)
    }

    /// Content tuning for `variant`, adjusted for reduced motion
    pub fn tuning_for(&self, variant: Variant) -> Tuning {
        let tuning = Tuning::for_variant(variant);
        if self.reduced_motion {
            tuning.with_reduced_motion()
        } else {
            tuning
        }
    }

    /// Variant to play this session: a `?variant=` query string wins over the
    /// stored choice. The stored settings are left untouched.
    pub fn session_variant(&self, query: &str) -> Variant {
        query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| match pair.split_once('=') {
                Some(("variant", value)) => Variant::parse(value),
                _ => None,
            })
            .last()
            .unwrap_or(self.variant)
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "balloon_party_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
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
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.variant, Variant::Classic);
        assert!(!settings.muted);
        assert!(settings.speech_enabled());
        assert_eq!(settings.effective_volume(), 1.0);
    }

    #[test]
    fn test_toggle_mute() {
        let mut settings = Settings::default();
        assert!(settings.toggle_mute());
        assert_eq!(settings.effective_volume(), 0.0);
        assert!(!settings.speech_enabled());
        assert!(!settings.toggle_mute());
        assert!(settings.effective_volume() > 0.0);
    }

    #[test]
    fn test_tuning_follows_variant_and_motion() {
        let mut settings = Settings {
            variant: Variant::Birthday,
            ..Default::default()
        };
        assert_eq!(settings.tuning().win_pops, Some(25));
        settings.reduced_motion = true;
        assert_eq!(settings.tuning().confetti_count, 10);
    }

    #[test]
    fn test_query_override() {
        let settings = Settings::default();
        assert_eq!(settings.session_variant("?foo=1&variant=party"), Variant::Birthday);
        assert_eq!(settings.session_variant("?variant=nope"), Variant::Classic);
        assert_eq!(settings.session_variant(""), Variant::Classic);

        let stored = Settings {
            variant: Variant::Birthday,
            ..Default::default()
        };
        assert_eq!(stored.session_variant("variant=classic"), Variant::Classic);
        assert_eq!(stored.session_variant("?foo=1"), Variant::Birthday);
    }

    #[test]
    fn test_query_override_is_not_saved() {
        let mut settings = Settings::default();
        let variant = settings.session_variant("?variant=birthday");
        assert_eq!(settings.tuning_for(variant).win_pops, Some(25));

        settings.toggle_mute();
        let json = serde_json::to_string(&settings).expect("settings serialize");
        let stored: Settings = serde_json::from_str(&json).expect("settings deserialize");
        assert_eq!(stored.variant, Variant::Classic);
        assert!(stored.muted);
    }

    #[test]
    fn test_json_round_trip_with_missing_fields() {
        let settings: Settings = serde_json::from_str(r#"{"muted": true, "variant": "birthday"}"#)
            .expect("valid settings json");
        assert!(settings.muted);
        assert_eq!(settings.variant, Variant::Birthday);
        assert_eq!(settings.master_volume, 1.0);
    }
}
