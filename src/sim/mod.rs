//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod state;
pub mod tick;

pub use collision::{arrow_hits, point_in_balloon, segment_circle_hit};
pub use effects::{BigEmoji, Confetti, Effects, Sparkle};
pub use state::{
    Archer, Arrow, Balloon, GameEvent, GamePhase, GameState, Mascot, PowerUpKind, Stats,
};
pub use tick::{TickInput, tick};
