//! Game state and core simulation types
//!
//! Everything the tick function touches lives here. Rendering and browser
//! glue only read this state and drain its events.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::Effects;
use crate::consts::*;
use crate::tuning::Tuning;

/// Modifier applied to the next fired arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Double hit radius
    Big,
    /// Double speed
    Fast,
    /// Pops every balloon in its path, cycles colors
    Rainbow,
}

impl PowerUpKind {
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            PowerUpKind::Fast => 2.0,
            _ => 1.0,
        }
    }

    pub fn hit_radius_scale(&self) -> f32 {
        match self {
            PowerUpKind::Big => 2.0,
            _ => 1.0,
        }
    }

    pub fn pierces(&self) -> bool {
        matches!(self, PowerUpKind::Rainbow)
    }

    /// Spoken/HUD name
    pub fn name(&self) -> &'static str {
        match self {
            PowerUpKind::Big => "Giant arrow",
            PowerUpKind::Fast => "Super fast arrow",
            PowerUpKind::Rainbow => "Rainbow arrow",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PowerUpKind::Big => "💪",
            PowerUpKind::Fast => "⚡",
            PowerUpKind::Rainbow => "🌈",
        }
    }
}

/// A rising balloon
#[derive(Debug, Clone, PartialEq)]
pub struct Balloon {
    pub id: u32,
    pub pos: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    /// Unique sway pattern
    pub sway_offset: f32,
    pub time_alive_ms: f32,
    pub size: f32,
}

impl Balloon {
    pub fn new(id: u32, pos: Vec2, color: u32, sway_offset: f32, size: f32) -> Self {
        Self {
            id,
            pos,
            color,
            sway_offset,
            time_alive_ms: 0.0,
            size,
        }
    }

    /// Where the string is tied (its top end)
    pub fn string_anchor(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y - self.size - STRING_LENGTH / 2.0)
    }

    /// Float up one tick with a gentle sway. Returns true once it escapes
    /// off the top of the screen.
    pub fn rise(&mut self, tuning: &Tuning) -> bool {
        self.time_alive_ms += TICK_MS;
        self.pos.y += tuning.rise_speed;

        let sway = (self.time_alive_ms * tuning.sway_speed + self.sway_offset).sin()
            * tuning.sway_amount;
        self.pos.x += sway * 0.01;

        self.pos.y > BALLOON_ESCAPE_Y
    }
}

/// An arrow in flight (moves along +x only)
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub id: u32,
    pub pos: Vec2,
    pub speed: f32,
    pub hit_radius_scale: f32,
    pub power: Option<PowerUpKind>,
    /// Balloons popped so far
    pub hits: u32,
}

impl Arrow {
    pub fn new(id: u32, origin: Vec2, base_speed: f32, power: Option<PowerUpKind>) -> Self {
        Self {
            id,
            pos: origin,
            speed: base_speed * power.map_or(1.0, |p| p.speed_multiplier()),
            hit_radius_scale: power.map_or(1.0, |p| p.hit_radius_scale()),
            power,
            hits: 0,
        }
    }

    pub fn pierces(&self) -> bool {
        self.power.is_some_and(|p| p.pierces())
    }

    /// Move one tick, returning the previous position for swept collision
    pub fn advance(&mut self) -> Vec2 {
        let prev = self.pos;
        self.pos.x += self.speed;
        prev
    }

    pub fn is_offscreen(&self) -> bool {
        self.pos.x > ARROW_OFFSCREEN_X
    }
}

/// The archer on the left edge
#[derive(Debug, Clone, PartialEq)]
pub struct Archer {
    pub y: f32,
    /// Remaining recoil animation ticks
    pub recoil_ticks: u32,
}

impl Default for Archer {
    fn default() -> Self {
        Self {
            y: 0.0,
            recoil_ticks: 0,
        }
    }
}

impl Archer {
    /// Current x including the recoil kick (back, then forward)
    pub fn x(&self) -> f32 {
        if self.recoil_ticks == 0 {
            return ARCHER_X;
        }
        let progress = 1.0 - self.recoil_ticks as f32 / RECOIL_TICKS as f32;
        ARCHER_X + (progress * std::f32::consts::PI).sin() * RECOIL_AMOUNT
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x(), self.y)
    }

    /// Step up (+1) or down (-1)
    pub fn aim(&mut self, dir: i8) {
        let step = dir.signum() as f32 * ARCHER_AIM_STEP;
        self.y = (self.y + step).clamp(ARCHER_MIN_Y, ARCHER_MAX_Y);
    }

    pub fn start_recoil(&mut self) {
        self.recoil_ticks = RECOIL_TICKS;
    }

    pub fn update(&mut self) {
        self.recoil_ticks = self.recoil_ticks.saturating_sub(1);
    }
}

/// Cheering sidekick (birthday variant)
#[derive(Debug, Clone, PartialEq)]
pub struct Mascot {
    pub emoji: String,
    pub cheer_ticks: u32,
}

impl Mascot {
    pub fn new(emoji: impl Into<String>) -> Self {
        Self {
            emoji: emoji.into(),
            cheer_ticks: 0,
        }
    }

    pub fn cheer(&mut self) {
        self.cheer_ticks = MASCOT_CHEER_TICKS;
    }

    pub fn update(&mut self) {
        self.cheer_ticks = self.cheer_ticks.saturating_sub(1);
    }

    /// Vertical hop offset while cheering
    pub fn hop_height(&self) -> f32 {
        if self.cheer_ticks == 0 {
            return 0.0;
        }
        let progress = 1.0 - self.cheer_ticks as f32 / MASCOT_CHEER_TICKS as f32;
        (progress * std::f32::consts::PI).sin() * 0.8
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// "3, 2, 1, Go!"
    Countdown { value: u32, ticks_left: u32 },
    /// Balloons rising, arrows flying
    Playing,
    /// Frozen (tab hidden / window blur)
    Paused,
    /// Enough balloons popped - birthday celebration
    Won { ticks: u32 },
}

/// Side effects the front end should perform (sounds, speech, DOM)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    CountdownTick(u32),
    CountdownGo,
    BalloonSpawned,
    ArrowFired { power: Option<PowerUpKind> },
    BalloonPopped { pos: Vec2, color: u32, streak: u32 },
    BalloonEscaped { pos: Vec2 },
    ArrowMissed,
    StreakMilestone(u32),
    PowerUpGranted(PowerUpKind),
    Won,
    CelebrationBurst { pos: Vec2 },
    Paused,
    Resumed,
}

/// Per-game counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub pops: u32,
    pub escapes: u32,
    pub shots: u32,
    pub misses: u32,
    /// Consecutive pops without a missed arrow
    pub streak: u32,
    pub best_streak: u32,
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Phase to return to when unpausing
    pub paused_from: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub archer: Archer,
    pub mascot: Option<Mascot>,
    /// Active balloons (sorted by id)
    pub balloons: Vec<Balloon>,
    /// Arrows in flight (sorted by id)
    pub arrows: Vec<Arrow>,
    /// Decorative particles (never affect gameplay)
    pub effects: Effects,
    pub stats: Stats,
    /// Applied to the next fired arrow
    pub pending_powerup: Option<PowerUpKind>,
    /// Ticks until the next balloon spawn
    pub spawn_ticks: u32,
    /// Ticks left showing "Go!" after the countdown
    pub go_ticks: u32,
    /// Events recorded since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game with the given seed and content tuning
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mascot = tuning.mascot.as_deref().map(Mascot::new);
        let countdown_from = tuning.countdown_from;

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Playing,
            paused_from: GamePhase::Playing,
            time_ticks: 0,
            archer: Archer::default(),
            mascot,
            balloons: Vec::new(),
            arrows: Vec::new(),
            effects: Effects::default(),
            stats: Stats::default(),
            pending_powerup: None,
            spawn_ticks: FIRST_SPAWN_DELAY_TICKS,
            go_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        };

        if countdown_from > 0 {
            state.phase = GamePhase::Countdown {
                value: countdown_from,
                ticks_left: COUNTDOWN_STEP_TICKS,
            };
            state.events.push(GameEvent::CountdownTick(countdown_from));
        }

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a balloon at the bottom of the screen (None when at capacity)
    pub fn spawn_balloon(&mut self) -> Option<u32> {
        if self.balloons.len() >= self.tuning.max_balloons {
            return None;
        }

        let color_idx = self.rng.random_range(0..self.tuning.balloon_colors.len());
        let color = self.tuning.balloon_colors[color_idx];
        let x = (self.rng.random::<f32>() - 0.5) * BALLOON_SPAWN_SPREAD;
        let sway_offset = self.rng.random::<f32>() * std::f32::consts::TAU;

        let id = self.next_entity_id();
        self.balloons.push(Balloon::new(
            id,
            Vec2::new(x, BALLOON_SPAWN_Y),
            color,
            sway_offset,
            self.tuning.balloon_size,
        ));
        self.events.push(GameEvent::BalloonSpawned);
        log::debug!("Spawned balloon {} ({:06x}) at x={:.2}", id, color, x);

        Some(id)
    }

    /// Fire an arrow horizontally from the archer, consuming any pending
    /// power-up. Every `every_shots` shots a new power-up is granted.
    pub fn fire_arrow(&mut self) -> u32 {
        let power = self.pending_powerup.take();
        let id = self.next_entity_id();
        let origin = self.archer.pos();
        self.arrows
            .push(Arrow::new(id, origin, self.tuning.arrow_speed, power));

        self.stats.shots += 1;
        self.archer.start_recoil();
        self.events.push(GameEvent::ArrowFired { power });

        if let Some(powerups) = &self.tuning.powerups {
            if self.stats.shots % powerups.every_shots == 0 {
                let kind = powerups.kinds[self.rng.random_range(0..powerups.kinds.len())];
                self.pending_powerup = Some(kind);
                self.events.push(GameEvent::PowerUpGranted(kind));
                log::info!("Power-up granted after {} shots: {:?}", self.stats.shots, kind);
            }
        }

        id
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_won(&self) -> bool {
        matches!(self.phase, GamePhase::Won { .. })
    }

    /// The celebration has played long enough for a key press to start over
    pub fn can_restart(&self) -> bool {
        matches!(self.phase, GamePhase::Won { ticks } if ticks >= CELEBRATION_MIN_TICKS)
    }

    /// The "Go!" banner is still up
    pub fn showing_go(&self) -> bool {
        self.go_ticks > 0 && self.phase == GamePhase::Playing
    }

    /// Pops still needed to win (None in endless variants)
    pub fn pops_remaining(&self) -> Option<u32> {
        self.tuning
            .win_pops
            .map(|goal| goal.saturating_sub(self.stats.pops))
    }

    /// Emoji glyph for an effect's emoji index
    pub fn emoji(&self, idx: usize) -> &str {
        self.tuning
            .emojis
            .get(idx)
            .map(String::as_str)
            .unwrap_or("🎈")
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.balloons.sort_by_key(|b| b.id);
        self.arrows.sort_by_key(|a| a.id);
    }
}
