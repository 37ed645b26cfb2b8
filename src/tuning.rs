//! Data-driven content tuning
//!
//! Both game variants share the simulation; they only differ in the values
//! stored here. A `Tuning` can also be loaded from JSON for experimentation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::TICK_MS;
use crate::sim::PowerUpKind;

/// Content presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Endless balloon popping
    #[default]
    Classic,
    /// Power-ups, a mascot and a birthday celebration after enough pops
    Birthday,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Birthday => "birthday",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Some(Variant::Classic),
            "birthday" | "party" => Some(Variant::Birthday),
            _ => None,
        }
    }

    /// Title shown in the page header and logs
    pub fn title(&self) -> &'static str {
        match self {
            Variant::Classic => "Balloon Pop Party",
            Variant::Birthday => "Birthday Balloon Party",
        }
    }
}

/// Periodic power-up grants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpTuning {
    /// A power-up is granted after every N shots
    pub every_shots: u32,
    /// Pool the granted kind is drawn from
    pub kinds: Vec<PowerUpKind>,
}

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(String),
    #[error("balloon color list is empty")]
    NoColors,
    #[error("emoji list is empty")]
    NoEmojis,
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },
    #[error("power-up kind list is empty")]
    NoPowerUpKinds,
}

/// All content tuning for one variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub variant: Variant,
    /// Balloon colors (0xRRGGBB)
    pub balloon_colors: Vec<u32>,
    /// Emoji used for pop and escape confetti
    pub emojis: Vec<String>,
    /// Time between balloon spawns
    pub spawn_interval_ms: u32,
    /// Upward float per tick (world units)
    pub rise_speed: f32,
    /// Max balloons on screen at once
    pub max_balloons: usize,
    /// Balloon radius (also the arrow hit distance)
    pub balloon_size: f32,
    /// Side-to-side drift amplitude
    pub sway_amount: f32,
    /// Sway frequency (per millisecond alive)
    pub sway_speed: f32,
    /// Arrow travel per tick
    pub arrow_speed: f32,
    /// Emojis per escape confetti burst
    pub confetti_count: usize,
    /// Countdown start ("3, 2, 1, Go!"); 0 skips it
    pub countdown_from: u32,
    /// A streak milestone is announced every N consecutive pops
    pub streak_milestone: u32,
    /// Pops needed to win (None = endless)
    pub win_pops: Option<u32>,
    pub powerups: Option<PowerUpTuning>,
    /// Mascot emoji that cheers on pops
    pub mascot: Option<String>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::classic()
    }
}

fn emoji_list(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Tuning {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Self::classic(),
            Variant::Birthday => Self::birthday(),
        }
    }

    /// Bright and cheerful, never ends
    pub fn classic() -> Self {
        Self {
            variant: Variant::Classic,
            balloon_colors: vec![
                0xff0000, // Red
                0xffff00, // Yellow
                0x0000ff, // Blue
                0x00ff00, // Green
                0xff69b4, // Pink
                0x9b59b6, // Purple
                0xffa500, // Orange
            ],
            emojis: emoji_list(&[
                "😃", "😡", "😝", "😮", "🐶", "🐱", "💩", "🚙", "🦁", "🐸", "🐙", "🎉", "🎂",
                "⭐", "❤️",
            ]),
            spawn_interval_ms: 1200,
            rise_speed: 0.03,
            max_balloons: 16,
            balloon_size: 1.2,
            sway_amount: 0.15,
            sway_speed: 0.002,
            arrow_speed: 0.3,
            confetti_count: 20,
            countdown_from: 3,
            streak_milestone: 5,
            win_pops: None,
            powerups: None,
            mascot: None,
        }
    }

    /// Party palette, power-ups, a teddy mascot and a win at 25 pops
    pub fn birthday() -> Self {
        Self {
            variant: Variant::Birthday,
            balloon_colors: vec![
                0xff69b4, // Hot pink
                0x87cefa, // Sky
                0xffd700, // Gold
                0x98fb98, // Mint
                0xdda0dd, // Lilac
                0xffa07a, // Peach
                0xff6347, // Tomato
            ],
            emojis: emoji_list(&[
                "🎉", "🎂", "🎁", "🎈", "🥳", "🍰", "🧁", "⭐", "❤️", "🐶", "🐱", "🦄",
            ]),
            win_pops: Some(25),
            powerups: Some(PowerUpTuning {
                every_shots: 8,
                kinds: vec![PowerUpKind::Big, PowerUpKind::Fast, PowerUpKind::Rainbow],
            }),
            mascot: Some("🧸".to_string()),
            ..Self::classic()
        }
    }

    /// Parse and validate a JSON tuning; missing fields use classic values
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.balloon_colors.is_empty() {
            return Err(TuningError::NoColors);
        }
        if self.emojis.is_empty() {
            return Err(TuningError::NoEmojis);
        }
        if self.spawn_interval_ms == 0 {
            return Err(TuningError::NotPositive { field: "spawn_interval_ms" });
        }
        if self.max_balloons == 0 {
            return Err(TuningError::NotPositive { field: "max_balloons" });
        }
        if self.balloon_size <= 0.0 {
            return Err(TuningError::NotPositive { field: "balloon_size" });
        }
        if self.arrow_speed <= 0.0 {
            return Err(TuningError::NotPositive { field: "arrow_speed" });
        }
        if self.streak_milestone == 0 {
            return Err(TuningError::NotPositive { field: "streak_milestone" });
        }
        if self.win_pops == Some(0) {
            return Err(TuningError::NotPositive { field: "win_pops" });
        }
        if let Some(powerups) = &self.powerups {
            if powerups.every_shots == 0 {
                return Err(TuningError::NotPositive { field: "powerups.every_shots" });
            }
            if powerups.kinds.is_empty() {
                return Err(TuningError::NoPowerUpKinds);
            }
        }
        Ok(())
    }

    /// Spawn interval in simulation ticks (never zero)
    pub fn spawn_interval_ticks(&self) -> u32 {
        ((self.spawn_interval_ms as f32 / TICK_MS).round() as u32).max(1)
    }

    /// Lighter effects for players who prefer reduced motion
    pub fn with_reduced_motion(mut self) -> Self {
        self.confetti_count = (self.confetti_count / 2).max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parse() {
        assert_eq!(Variant::parse("classic"), Some(Variant::Classic));
        assert_eq!(Variant::parse(" Birthday "), Some(Variant::Birthday));
        assert_eq!(Variant::parse("PARTY"), Some(Variant::Birthday));
        assert_eq!(Variant::parse("halloween"), None);
        assert_eq!(Variant::parse(Variant::Birthday.as_str()), Some(Variant::Birthday));
    }

    #[test]
    fn test_presets_are_valid() {
        assert_eq!(Tuning::classic().validate(), Ok(()));
        assert_eq!(Tuning::birthday().validate(), Ok(()));
        assert_eq!(Tuning::for_variant(Variant::Birthday).variant, Variant::Birthday);
    }

    #[test]
    fn test_variants_differ_only_in_content() {
        let classic = Tuning::classic();
        let birthday = Tuning::birthday();
        assert_eq!(classic.rise_speed, birthday.rise_speed);
        assert_eq!(classic.spawn_interval_ms, birthday.spawn_interval_ms);
        assert_ne!(classic.balloon_colors, birthday.balloon_colors);
        assert!(classic.win_pops.is_none() && birthday.win_pops.is_some());
        assert!(classic.powerups.is_none() && birthday.powerups.is_some());
        assert!(classic.mascot.is_none() && birthday.mascot.is_some());
    }

    #[test]
    fn test_spawn_interval_ticks() {
        let mut tuning = Tuning::classic();
        assert_eq!(tuning.spawn_interval_ticks(), 72);
        tuning.spawn_interval_ms = 1;
        assert_eq!(tuning.spawn_interval_ticks(), 1);
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let tuning = Tuning::from_json(r#"{"max_balloons": 4, "win_pops": 10}"#).unwrap();
        assert_eq!(tuning.max_balloons, 4);
        assert_eq!(tuning.win_pops, Some(10));
        assert_eq!(tuning.balloon_colors, Tuning::classic().balloon_colors);
    }

    #[test]
    fn test_from_json_powerups() {
        let json = r#"{
            "variant": "birthday",
            "powerups": { "every_shots": 3, "kinds": ["Rainbow"] }
        }"#;
        let tuning = Tuning::from_json(json).unwrap();
        assert_eq!(tuning.variant, Variant::Birthday);
        let powerups = tuning.powerups.unwrap();
        assert_eq!(powerups.every_shots, 3);
        assert_eq!(powerups.kinds, vec![PowerUpKind::Rainbow]);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
        assert_eq!(
            Tuning::from_json(r#"{"balloon_colors": []}"#),
            Err(TuningError::NoColors)
        );
        assert_eq!(
            Tuning::from_json(r#"{"spawn_interval_ms": 0}"#),
            Err(TuningError::NotPositive { field: "spawn_interval_ms" })
        );
        assert_eq!(
            Tuning::from_json(r#"{"powerups": {"every_shots": 5, "kinds": []}}"#),
            Err(TuningError::NoPowerUpKinds)
        );
    }

    #[test]
    fn test_reduced_motion_halves_confetti() {
        let tuning = Tuning::classic().with_reduced_motion();
        assert_eq!(tuning.confetti_count, 10);
        let mut tiny = Tuning::classic();
        tiny.confetti_count = 1;
        assert_eq!(tiny.with_reduced_motion().confetti_count, 1);
    }

    #[test]
    fn test_error_messages() {
        let err = TuningError::NotPositive { field: "max_balloons" };
        assert_eq!(err.to_string(), "max_balloons must be positive");
    }
}
