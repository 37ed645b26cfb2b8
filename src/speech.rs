//! Spoken cues using the Web Speech API

use web_sys::{SpeechSynthesis, SpeechSynthesisUtterance};

use crate::sim::{GameEvent, PowerUpKind};

/// Friendly high voice for little listeners
const RATE: f32 = 1.0;
const PITCH: f32 = 1.3;
const VOLUME: f32 = 0.7;

pub struct Speech {
    /// None when the browser has no `speechSynthesis`
    synth: Option<SpeechSynthesis>,
    enabled: bool,
}

impl Speech {
    pub fn new(enabled: bool) -> Self {
        let synth = web_sys::window().and_then(|w| w.speech_synthesis().ok());
        if synth.is_none() {
            log::warn!("speechSynthesis unavailable - spoken cues disabled");
        }
        Self { synth, enabled }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.cancel();
        }
    }

    /// Say something now, cutting off anything still queued
    pub fn speak(&self, text: &str) {
        if !self.enabled {
            return;
        }
        let Some(synth) = &self.synth else { return };
        let Ok(utterance) = SpeechSynthesisUtterance::new_with_text(text) else {
            return;
        };
        utterance.set_rate(RATE);
        utterance.set_pitch(PITCH);
        utterance.set_volume(VOLUME);

        synth.cancel();
        synth.speak(&utterance);
    }

    pub fn cancel(&self) {
        if let Some(synth) = &self.synth {
            synth.cancel();
        }
    }

    /// Speak the cue for a game event, if it has one
    pub fn announce(&self, event: &GameEvent) {
        if let Some(text) = cue(event) {
            self.speak(&text);
        }
    }
}

/// Words for the events worth saying out loud
fn cue(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::CountdownTick(n) => Some(n.to_string()),
        GameEvent::CountdownGo => Some("Go!".to_string()),
        GameEvent::StreakMilestone(n) => Some(format!("{} in a row! Amazing!", n)),
        GameEvent::PowerUpGranted(kind) => Some(powerup_cue(*kind)),
        GameEvent::Won => Some("Happy birthday!".to_string()),
        _ => None,
    }
}

fn powerup_cue(kind: PowerUpKind) -> String {
    format!("{}!", kind.name())
}
