//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! The event to sound mapping is platform independent; playback is WASM only.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

#[cfg(target_arch = "wasm32")]
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Balloon popped
    Pop,
    /// Arrow released
    Shoot,
    /// Arrow flew off screen
    Miss,
    /// Balloon floated away
    Escape,
    /// Streak blip, pitch rises with the streak
    Combo(u32),
    /// New balloon
    Launch,
    /// Power-up ready
    PowerUp,
    /// Every few pops in a row
    Milestone,
    /// "3, 2, 1"
    CountdownBeep,
    /// "Go!"
    Go,
    /// Happy Birthday tune (win)
    Birthday,
}

impl SoundEffect {
    /// Sounds to play for a simulation event
    pub fn for_event(event: &GameEvent) -> Vec<SoundEffect> {
        match event {
            GameEvent::CountdownTick(_) => vec![SoundEffect::CountdownBeep],
            GameEvent::CountdownGo => vec![SoundEffect::Go],
            GameEvent::BalloonSpawned => vec![SoundEffect::Launch],
            GameEvent::ArrowFired { .. } => vec![SoundEffect::Shoot],
            GameEvent::BalloonPopped { streak, .. } => {
                vec![SoundEffect::Pop, SoundEffect::Combo(*streak)]
            }
            GameEvent::BalloonEscaped { .. } => vec![SoundEffect::Escape],
            GameEvent::ArrowMissed => vec![SoundEffect::Miss],
            GameEvent::StreakMilestone(_) => vec![SoundEffect::Milestone],
            GameEvent::PowerUpGranted(_) => vec![SoundEffect::PowerUp],
            GameEvent::Won => vec![SoundEffect::Birthday],
            GameEvent::CelebrationBurst { .. } => vec![SoundEffect::Pop],
            GameEvent::Paused | GameEvent::Resumed => Vec::new(),
        }
    }
}

/// Happy Birthday as (frequency Hz, beats)
#[cfg(target_arch = "wasm32")]
#[rustfmt::skip]
const BIRTHDAY_MELODY: [(f32, f64); 25] = [
    (392.00, 0.75), (392.00, 0.25), (440.00, 1.0), (392.00, 1.0), (523.25, 1.0), (493.88, 2.0),
    (392.00, 0.75), (392.00, 0.25), (440.00, 1.0), (392.00, 1.0), (587.33, 1.0), (523.25, 2.0),
    (392.00, 0.75), (392.00, 0.25), (783.99, 1.0), (659.25, 1.0), (523.25, 1.0), (493.88, 1.0),
    (440.00, 2.0),
    (698.46, 0.75), (698.46, 0.25), (659.25, 1.0), (523.25, 1.0), (587.33, 1.0), (523.25, 2.0),
];
#[cfg(target_arch = "wasm32")]
const BEAT_SECS: f64 = 0.32;

/// Audio manager for the game
#[cfg(target_arch = "wasm32")]
pub struct AudioManager {
    /// Created on the first user gesture (autoplay policy)
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

#[cfg(target_arch = "wasm32")]
impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl AudioManager {
    pub fn new() -> Self {
        Self {
            ctx: None,
            master_volume: 1.0,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Create or resume the audio context. Call from a user gesture handler.
    pub fn resume(&mut self) {
        if self.ctx.is_none() {
            // May fail outside a secure context
            self.ctx = AudioContext::new().ok();
            match &self.ctx {
                Some(_) => log::info!("AudioContext created"),
                None => log::warn!("Failed to create AudioContext - audio disabled"),
            }
        }
        if let Some(ctx) = &self.ctx {
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    /// Pick up volume and mute from the player's settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.muted = settings.muted;
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        match effect {
            SoundEffect::Pop => self.play_pop(ctx, vol),
            SoundEffect::Shoot => self.play_shoot(ctx, vol),
            SoundEffect::Miss => self.play_miss(ctx, vol),
            SoundEffect::Escape => self.play_escape(ctx, vol),
            SoundEffect::Combo(streak) => self.play_combo(ctx, vol, streak),
            SoundEffect::Launch => self.play_launch(ctx, vol),
            SoundEffect::PowerUp => self.play_powerup(ctx, vol),
            SoundEffect::Milestone => self.play_milestone(ctx, vol),
            SoundEffect::CountdownBeep => self.play_beep(ctx, vol, 440.0),
            SoundEffect::Go => self.play_beep(ctx, vol, 880.0),
            SoundEffect::Birthday => self.play_birthday(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Single enveloped note starting `delay` seconds from now
    fn note(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
        gain: f32,
        delay: f64,
        len: f64,
    ) {
        if let Some((osc, env)) = self.create_osc(ctx, freq, osc_type) {
            let t = ctx.current_time() + delay;
            env.gain().set_value_at_time(gain, t).ok();
            env.gain()
                .exponential_ramp_to_value_at_time(0.01, t + len)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + len + 0.05).ok();
        }
    }

    /// Pop - bright sine at a random pitch
    fn play_pop(&self, ctx: &AudioContext, vol: f32) {
        let freq = rand::random_range(400.0..900.0);
        let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Shoot - sawtooth twang sweeping down
    fn play_shoot(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(800.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(200.0, t + 0.15)
            .ok();
        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Miss - gentle whoosh, nothing scary
    fn play_miss(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 500.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(0.01, t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(vol * 0.12, t + 0.08)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
            .ok();
        osc.frequency().set_value_at_time(500.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(250.0, t + 0.3)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + 0.35).ok();
    }

    /// Escape - happy two-note chime
    fn play_escape(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [659.25, 880.0].iter().enumerate() {
            self.note(ctx, *freq, OscillatorType::Sine, vol * 0.2, i as f64 * 0.12, 0.25);
        }
    }

    /// Combo - blip climbing a semitone per pop (capped at an octave)
    fn play_combo(&self, ctx: &AudioContext, vol: f32, streak: u32) {
        let steps = streak.saturating_sub(1).min(12) as f32;
        let freq = 500.0 * 2f32.powf(steps / 12.0);
        self.note(ctx, freq, OscillatorType::Triangle, vol * 0.15, 0.05, 0.1);
    }

    /// Launch - soft rising blip
    fn play_launch(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.08, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(500.0, t + 0.12)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + 0.18).ok();
    }

    /// Power-up - sparkly arpeggio
    fn play_powerup(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.25, 659.25, 783.99, 1046.5].iter().enumerate() {
            self.note(ctx, *freq, OscillatorType::Sine, vol * 0.22, i as f64 * 0.07, 0.18);
        }
    }

    /// Milestone - short triumphant fanfare
    fn play_milestone(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.25, 659.25, 783.99].iter().enumerate() {
            self.note(ctx, *freq, OscillatorType::Triangle, vol * 0.25, i as f64 * 0.1, 0.3);
        }
        self.note(ctx, 1046.5, OscillatorType::Triangle, vol * 0.3, 0.3, 0.5);
    }

    /// Countdown beep
    fn play_beep(&self, ctx: &AudioContext, vol: f32, freq: f32) {
        self.note(ctx, freq, OscillatorType::Square, vol * 0.12, 0.0, 0.2);
    }

    /// The whole song, scheduled ahead on the audio clock
    fn play_birthday(&self, ctx: &AudioContext, vol: f32) {
        let mut at = 0.1;
        for (freq, beats) in BIRTHDAY_MELODY {
            let len = beats * BEAT_SECS;
            self.note(ctx, freq, OscillatorType::Triangle, vol * 0.25, at, len * 0.9);
            at += len;
        }
        log::debug!("Birthday song scheduled ({:.1}s)", at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_every_pop_plays_combo() {
        let first = GameEvent::BalloonPopped {
            pos: Vec2::ZERO,
            color: 0xff0000,
            streak: 1,
        };
        assert_eq!(
            SoundEffect::for_event(&first),
            vec![SoundEffect::Pop, SoundEffect::Combo(1)]
        );
    }

    #[test]
    fn test_pause_is_silent() {
        assert!(SoundEffect::for_event(&GameEvent::Paused).is_empty());
        assert!(SoundEffect::for_event(&GameEvent::Resumed).is_empty());
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Won),
            vec![SoundEffect::Birthday]
        );
    }
}
