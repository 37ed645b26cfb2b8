//! Decorative particles: the big pop emoji, emoji confetti and sparkles
//!
//! Every particle has a fixed frame budget and is retired when it runs out.
//! None of this feeds back into gameplay.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::direction;

/// One big emoji shown where a balloon popped
#[derive(Debug, Clone, PartialEq)]
pub struct BigEmoji {
    pub pos: Vec2,
    /// Index into the tuning's emoji list
    pub emoji: usize,
    pub frame: u32,
}

impl BigEmoji {
    /// Pulsing scale
    pub fn scale(&self) -> f32 {
        BIG_EMOJI_SCALE * (1.0 + (self.frame as f32 * 0.1).sin() * 0.1)
    }

    /// Solid until the last 20 frames, then fades out
    pub fn opacity(&self) -> f32 {
        let fade_start = BIG_EMOJI_TICKS - BIG_EMOJI_FADE_TICKS;
        if self.frame > fade_start {
            BIG_EMOJI_TICKS.saturating_sub(self.frame) as f32 / BIG_EMOJI_FADE_TICKS as f32
        } else {
            1.0
        }
    }
}

/// A small tumbling emoji from a confetti burst
#[derive(Debug, Clone, PartialEq)]
pub struct Confetti {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Radians
    pub rotation: f32,
    pub angular_vel: f32,
    pub emoji: usize,
    pub life: u32,
    pub max_life: u32,
}

impl Confetti {
    pub fn opacity(&self) -> f32 {
        self.life as f32 / self.max_life as f32
    }
}

/// A colored spark from a popped balloon
#[derive(Debug, Clone, PartialEq)]
pub struct Sparkle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0xRRGGBB (the balloon's color)
    pub color: u32,
    pub size: f32,
    pub life: u32,
    pub max_life: u32,
}

impl Sparkle {
    pub fn opacity(&self) -> f32 {
        self.life as f32 / self.max_life as f32
    }
}

/// All live particles
#[derive(Debug, Clone, Default)]
pub struct Effects {
    pub big_emojis: Vec<BigEmoji>,
    pub confetti: Vec<Confetti>,
    pub sparkles: Vec<Sparkle>,
}

impl Effects {
    pub fn spawn_big_emoji(&mut self, pos: Vec2, emoji: usize) {
        self.big_emojis.push(BigEmoji { pos, emoji, frame: 0 });
    }

    /// Radial burst of small emojis (slow, so little eyes can follow them)
    pub fn spawn_confetti(
        &mut self,
        pos: Vec2,
        count: usize,
        emoji_count: usize,
        rng: &mut impl Rng,
    ) {
        let emoji_count = emoji_count.max(1);
        for _ in 0..count {
            let emoji = rng.random_range(0..emoji_count);
            let size = 0.4 + rng.random::<f32>() * 0.3;
            let angle = rng.random::<f32>() * std::f32::consts::TAU;
            let speed = 0.05 + rng.random::<f32>() * 0.08;
            let angular_vel = (rng.random::<f32>() - 0.5) * 0.15;

            self.confetti.push(Confetti {
                pos,
                vel: direction(angle) * speed,
                size,
                rotation: 0.0,
                angular_vel,
                emoji,
                life: CONFETTI_LIFE_TICKS,
                max_life: CONFETTI_LIFE_TICKS,
            });
        }
    }

    /// Ring of sparks in the popped balloon's color
    pub fn spawn_sparkles(&mut self, pos: Vec2, color: u32, rng: &mut impl Rng) {
        for i in 0..SPARKLE_COUNT {
            let jitter = (rng.random::<f32>() - 0.5) * 0.4;
            let angle = i as f32 / SPARKLE_COUNT as f32 * std::f32::consts::TAU + jitter;
            let speed = 0.08 + rng.random::<f32>() * 0.1;

            self.sparkles.push(Sparkle {
                pos,
                vel: direction(angle) * speed,
                color,
                size: 0.12 + rng.random::<f32>() * 0.1,
                life: SPARKLE_LIFE_TICKS,
                max_life: SPARKLE_LIFE_TICKS,
            });
        }
    }

    /// Advance every particle one frame and retire the expired ones
    pub fn update(&mut self) {
        for big in self.big_emojis.iter_mut() {
            big.frame += 1;
        }
        self.big_emojis.retain(|b| b.frame < BIG_EMOJI_TICKS);

        for c in self.confetti.iter_mut() {
            c.pos += c.vel;
            c.vel.y -= CONFETTI_GRAVITY;
            c.rotation += c.angular_vel * 0.05;
            c.life = c.life.saturating_sub(1);
        }
        self.confetti.retain(|c| c.life > 0);

        for s in self.sparkles.iter_mut() {
            s.pos += s.vel;
            s.vel *= SPARKLE_DRAG;
            s.life = s.life.saturating_sub(1);
        }
        self.sparkles.retain(|s| s.life > 0);
    }

    pub fn len(&self) -> usize {
        self.big_emojis.len() + self.confetti.len() + self.sparkles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
