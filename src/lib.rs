//! Balloon Pop Party - a toddler-friendly archery arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (balloons, arrows, collisions, particles)
//! - `renderer`: WebGPU rendering pipeline
//! - `tuning`: Data-driven content variants (classic, birthday)
//! - `settings`: Player preferences persisted in LocalStorage
//! - `input`: Keyboard mapping
//! - `audio`: Sound effects (playback WASM only)
//! - `speech`, `overlay`: Browser glue (WASM only)

pub mod audio;
pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod overlay;
pub mod renderer;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod speech;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError, Variant};

use glam::Vec2;

/// World constants shared by every variant
pub mod consts {
    /// Fixed simulation timestep (60 Hz - all per-tick speeds assume this)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Milliseconds per tick (balloon sway runs on a millisecond clock)
    pub const TICK_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Half the visible world height at z = 0 (60° camera placed 15 units back)
    pub const VIEW_HALF_HEIGHT: f32 = 8.660_254;

    /// Archer stands at a fixed x on the left edge
    pub const ARCHER_X: f32 = -11.0;
    pub const ARCHER_MIN_Y: f32 = -6.0;
    pub const ARCHER_MAX_Y: f32 = 6.0;
    /// Vertical move per aim input
    pub const ARCHER_AIM_STEP: f32 = 1.0;
    /// Recoil animation (200ms)
    pub const RECOIL_TICKS: u32 = 12;
    pub const RECOIL_AMOUNT: f32 = -0.3;

    /// Arrows past this x have left the screen
    pub const ARROW_OFFSCREEN_X: f32 = 15.0;

    /// Balloons rise from here...
    pub const BALLOON_SPAWN_Y: f32 = -8.0;
    /// ...spread over this width around x = 0...
    pub const BALLOON_SPAWN_SPREAD: f32 = 10.0;
    /// ...and escape once above this height
    pub const BALLOON_ESCAPE_Y: f32 = 10.0;
    /// String hanging below each balloon
    pub const STRING_LENGTH: f32 = 1.5;

    /// First balloon appears 500ms after "Go!"
    pub const FIRST_SPAWN_DELAY_TICKS: u32 = 30;
    /// One countdown number per second
    pub const COUNTDOWN_STEP_TICKS: u32 = 60;
    /// How long "Go!" stays up once play starts
    pub const GO_BANNER_TICKS: u32 = 50;

    /// Big pop emoji: 2 seconds, fading over the last 20 frames
    pub const BIG_EMOJI_TICKS: u32 = 120;
    pub const BIG_EMOJI_FADE_TICKS: u32 = 20;
    pub const BIG_EMOJI_SCALE: f32 = 3.0;

    /// Escape confetti: 3 seconds with gentle gravity
    pub const CONFETTI_LIFE_TICKS: u32 = 180;
    pub const CONFETTI_GRAVITY: f32 = 0.001;

    /// Pop sparkles
    pub const SPARKLE_COUNT: usize = 12;
    pub const SPARKLE_LIFE_TICKS: u32 = 40;
    pub const SPARKLE_DRAG: f32 = 0.96;

    /// Mascot hop after each pop
    pub const MASCOT_CHEER_TICKS: u32 = 30;

    /// Win celebration pacing
    pub const CELEBRATION_BURST_EVERY: u32 = 40;
    pub const CELEBRATION_BURSTS: u32 = 6;
    pub const CELEBRATION_MIN_TICKS: u32 = 180;
}

/// Convert a 0xRRGGBB color to linear-ish RGBA floats
#[inline]
pub fn hex_to_rgba(hex: u32, alpha: f32) -> [f32; 4] {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    [r, g, b, alpha]
}

/// Unit vector at the given angle
#[inline]
pub fn direction(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
