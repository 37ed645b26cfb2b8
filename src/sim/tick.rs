//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically, one
//! 60 Hz frame per call.

use glam::Vec2;
use rand::Rng;

use super::collision::arrow_hits;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Shoot an arrow (any key)
    pub fire: bool,
    /// Pause toggle (tab hidden / window blur)
    pub pause: bool,
    /// Move the archer up (+1) or down (-1)
    pub aim: i8,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Countdown { .. } | GamePhase::Playing => {
                state.paused_from = state.phase;
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                log::info!("Paused");
                return;
            }
            GamePhase::Paused => {
                resume(state);
                return;
            }
            GamePhase::Won { .. } => {}
        }
    }

    if state.phase == GamePhase::Paused {
        // Any key wakes the game back up
        if input.fire {
            resume(state);
        }
        return;
    }

    state.time_ticks += 1;

    // Decorations keep animating in every live phase
    state.effects.update();
    state.archer.update();
    state.go_ticks = state.go_ticks.saturating_sub(1);
    if let Some(mascot) = state.mascot.as_mut() {
        mascot.update();
    }

    match state.phase {
        GamePhase::Countdown { value, ticks_left } => {
            let ticks_left = ticks_left.saturating_sub(1);
            if ticks_left > 0 {
                state.phase = GamePhase::Countdown { value, ticks_left };
            } else if value > 1 {
                state.phase = GamePhase::Countdown {
                    value: value - 1,
                    ticks_left: COUNTDOWN_STEP_TICKS,
                };
                state.events.push(GameEvent::CountdownTick(value - 1));
            } else {
                state.phase = GamePhase::Playing;
                state.spawn_ticks = FIRST_SPAWN_DELAY_TICKS;
                state.go_ticks = GO_BANNER_TICKS;
                state.events.push(GameEvent::CountdownGo);
                log::info!("Go!");
            }
        }

        GamePhase::Playing => play(state, input),

        GamePhase::Won { ticks } => {
            let ticks = ticks + 1;
            state.phase = GamePhase::Won { ticks };

            // Fireworks of confetti across the sky
            if ticks % CELEBRATION_BURST_EVERY == 0 && ticks / CELEBRATION_BURST_EVERY <= CELEBRATION_BURSTS {
                let pos = Vec2::new(
                    (state.rng.random::<f32>() - 0.5) * 16.0,
                    2.0 + state.rng.random::<f32>() * 5.0,
                );
                let count = state.tuning.confetti_count;
                let emoji_count = state.tuning.emojis.len();
                state
                    .effects
                    .spawn_confetti(pos, count, emoji_count, &mut state.rng);
                state.events.push(GameEvent::CelebrationBurst { pos });
            }
        }

        GamePhase::Paused => {}
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

fn resume(state: &mut GameState) {
    state.phase = state.paused_from;
    state.events.push(GameEvent::Resumed);
    log::info!("Resumed");
}

/// One tick of active play
fn play(state: &mut GameState, input: &TickInput) {
    if input.aim != 0 {
        state.archer.aim(input.aim);
    }

    if input.fire {
        state.fire_arrow();
    }

    // Spawn timer
    state.spawn_ticks = state.spawn_ticks.saturating_sub(1);
    if state.spawn_ticks == 0 {
        state.spawn_balloon();
        state.spawn_ticks = state.tuning.spawn_interval_ticks();
    }

    // Float balloons up; the ones reaching the top burst into confetti
    let mut escaped = Vec::new();
    state.balloons.retain_mut(|balloon| {
        if balloon.rise(&state.tuning) {
            escaped.push(balloon.pos);
            false
        } else {
            true
        }
    });
    for pos in escaped {
        let count = state.tuning.confetti_count;
        let emoji_count = state.tuning.emojis.len();
        state
            .effects
            .spawn_confetti(pos, count, emoji_count, &mut state.rng);
        state.stats.escapes += 1;
        state.events.push(GameEvent::BalloonEscaped { pos });
        log::debug!("Balloon escaped at ({:.2}, {:.2})", pos.x, pos.y);
    }

    // Move arrows and check them against every live balloon
    let mut i = 0;
    while i < state.arrows.len() {
        let from = state.arrows[i].advance();
        let arrow = &state.arrows[i];
        let pierces = arrow.pierces();
        let hits = arrow_hits(from, arrow.pos, &state.balloons, arrow.hit_radius_scale);

        let targets: Vec<u32> = if pierces {
            hits.iter().map(|&(_, id)| id).collect()
        } else {
            hits.first().map(|&(_, id)| id).into_iter().collect()
        };

        for id in &targets {
            if pop_balloon(state, *id) {
                if let Some(arrow) = state.arrows.get_mut(i) {
                    arrow.hits += 1;
                }
            }
        }

        // Winning clears the sky, arrows included
        if state.is_won() {
            return;
        }

        let arrow = &state.arrows[i];
        if !targets.is_empty() && !pierces {
            state.arrows.remove(i);
        } else if arrow.is_offscreen() {
            if arrow.hits == 0 {
                state.stats.misses += 1;
                state.stats.streak = 0;
                state.events.push(GameEvent::ArrowMissed);
                log::debug!("Arrow {} missed", arrow.id);
            }
            state.arrows.remove(i);
        } else {
            i += 1;
        }
    }
}

/// Pop a balloon by id: big emoji, sparkles, streak. Returns false if it was
/// already gone.
fn pop_balloon(state: &mut GameState, id: u32) -> bool {
    let Some(idx) = state.balloons.iter().position(|b| b.id == id) else {
        return false;
    };
    let balloon = state.balloons.remove(idx);

    let emoji = state.rng.random_range(0..state.tuning.emojis.len().max(1));
    state.effects.spawn_big_emoji(balloon.pos, emoji);
    state
        .effects
        .spawn_sparkles(balloon.pos, balloon.color, &mut state.rng);

    let stats = &mut state.stats;
    stats.pops += 1;
    stats.streak += 1;
    stats.best_streak = stats.best_streak.max(stats.streak);
    let streak = stats.streak;

    state.events.push(GameEvent::BalloonPopped {
        pos: balloon.pos,
        color: balloon.color,
        streak,
    });
    if state.tuning.streak_milestone > 0 && streak % state.tuning.streak_milestone == 0 {
        state.events.push(GameEvent::StreakMilestone(streak));
        log::info!("Streak of {}!", streak);
    }
    if let Some(mascot) = state.mascot.as_mut() {
        mascot.cheer();
    }

    if let Some(goal) = state.tuning.win_pops {
        if state.stats.pops >= goal && !state.is_won() {
            celebrate(state);
        }
    }

    true
}

/// Enter the win celebration: every remaining balloon bursts into confetti
fn celebrate(state: &mut GameState) {
    let count = state.tuning.confetti_count;
    let emoji_count = state.tuning.emojis.len();
    for balloon in std::mem::take(&mut state.balloons) {
        state
            .effects
            .spawn_confetti(balloon.pos, count, emoji_count, &mut state.rng);
    }
    state.arrows.clear();
    state.pending_powerup = None;
    state.phase = GamePhase::Won { ticks: 0 };
    state.events.push(GameEvent::Won);
    log::info!(
        "🎂 Won after {} pops ({} shots, best streak {})",
        state.stats.pops,
        state.stats.shots,
        state.stats.best_streak
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Balloon, PowerUpKind};
    use crate::tuning::Tuning;

    const FIRE: TickInput = TickInput {
        fire: true,
        pause: false,
        aim: 0,
    };

    /// Fresh game already past the countdown
    fn playing(tuning: Tuning) -> GameState {
        let mut tuning = tuning;
        tuning.countdown_from = 0;
        GameState::new(12345, tuning)
    }

    fn place_balloon(state: &mut GameState, x: f32, y: f32) -> u32 {
        let id = state.next_entity_id();
        state
            .balloons
            .push(Balloon::new(id, Vec2::new(x, y), 0x00ff00, 0.0, state.tuning.balloon_size));
        id
    }

    fn run(state: &mut GameState, ticks: u32) {
        let idle = TickInput::default();
        for _ in 0..ticks {
            tick(state, &idle);
        }
    }

    #[test]
    fn test_countdown_to_playing() {
        let mut state = GameState::new(1, Tuning::classic());
        assert_eq!(state.drain_events(), vec![GameEvent::CountdownTick(3)]);

        run(&mut state, COUNTDOWN_STEP_TICKS);
        assert_eq!(state.drain_events(), vec![GameEvent::CountdownTick(2)]);
        run(&mut state, COUNTDOWN_STEP_TICKS);
        assert_eq!(state.drain_events(), vec![GameEvent::CountdownTick(1)]);
        run(&mut state, COUNTDOWN_STEP_TICKS);
        assert_eq!(state.drain_events(), vec![GameEvent::CountdownGo]);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.showing_go());
    }

    #[test]
    fn test_go_banner_lasts_fixed_ticks() {
        let mut state = GameState::new(1, Tuning::classic());
        run(&mut state, COUNTDOWN_STEP_TICKS * 3);
        run(&mut state, GO_BANNER_TICKS - 1);
        assert!(state.showing_go());
        run(&mut state, 1);
        assert!(!state.showing_go());
    }

    #[test]
    fn test_fire_ignored_during_countdown() {
        let mut state = GameState::new(1, Tuning::classic());
        tick(&mut state, &FIRE);
        assert!(state.arrows.is_empty());
        assert_eq!(state.stats.shots, 0);
    }

    #[test]
    fn test_first_balloon_then_interval() {
        let mut state = playing(Tuning::classic());
        run(&mut state, FIRST_SPAWN_DELAY_TICKS - 1);
        assert!(state.balloons.is_empty());
        run(&mut state, 1);
        assert_eq!(state.balloons.len(), 1);

        let interval = state.tuning.spawn_interval_ticks();
        run(&mut state, interval - 1);
        assert_eq!(state.balloons.len(), 1);
        run(&mut state, 1);
        assert_eq!(state.balloons.len(), 2);
    }

    #[test]
    fn test_never_more_than_max_balloons() {
        let mut tuning = Tuning::classic();
        tuning.max_balloons = 3;
        tuning.spawn_interval_ms = 16;
        let mut state = playing(tuning);
        for _ in 0..200 {
            tick(&mut state, &TickInput::default());
            assert!(state.balloons.len() <= 3);
        }
    }

    #[test]
    fn test_balloon_escapes_with_confetti() {
        let mut state = playing(Tuning::classic());
        state.spawn_ticks = u32::MAX;
        place_balloon(&mut state, 0.0, BALLOON_ESCAPE_Y - 0.01);
        tick(&mut state, &TickInput::default());

        assert!(state.balloons.is_empty());
        assert_eq!(state.stats.escapes, 1);
        assert_eq!(state.effects.confetti.len(), state.tuning.confetti_count);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::BalloonEscaped { .. }))
        );
    }

    #[test]
    fn test_escape_keeps_streak() {
        let mut state = playing(Tuning::classic());
        state.spawn_ticks = u32::MAX;
        state.stats.streak = 3;
        place_balloon(&mut state, 0.0, BALLOON_ESCAPE_Y - 0.01);
        tick(&mut state, &TickInput::default());

        assert_eq!(state.stats.escapes, 1);
        assert_eq!(state.stats.streak, 3);
    }

    #[test]
    fn test_arrow_pops_balloon_in_line() {
        let mut state = playing(Tuning::classic());
        state.spawn_ticks = u32::MAX;
        let id = place_balloon(&mut state, -8.0, 0.0);
        tick(&mut state, &FIRE);

        // Fired from x = -11 at 0.3 per tick; the balloon edge is 1.8 away
        run(&mut state, 10);
        assert!(state.balloons.iter().all(|b| b.id != id));
        assert!(state.arrows.is_empty());
        assert_eq!(state.stats.pops, 1);
        assert_eq!(state.stats.streak, 1);
        assert_eq!(state.effects.big_emojis.len(), 1);
        assert_eq!(state.effects.sparkles.len(), SPARKLE_COUNT);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::BalloonPopped { streak: 1, color: 0x00ff00, .. }))
        );
    }

    #[test]
    fn test_one_arrow_pops_one_balloon() {
        let mut state = playing(Tuning::classic());
        state.spawn_ticks = u32::MAX;
        place_balloon(&mut state, -8.0, 0.0);
        place_balloon(&mut state, -7.5, 0.2);
        tick(&mut state, &FIRE);
        run(&mut state, 40);
        assert_eq!(state.stats.pops, 1);
        assert_eq!(state.balloons.len(), 1);
    }

    #[test]
    fn test_miss_resets_streak() {
        let mut state = playing(Tuning::classic());
        state.spawn_ticks = u32::MAX;
        state.stats.streak = 4;
        tick(&mut state, &FIRE);
        // (15 - -11) / 0.3 ≈ 87 ticks to leave the screen
        run(&mut state, 90);
        assert!(state.arrows.is_empty());
        assert_eq!(state.stats.misses, 1);
        assert_eq!(state.stats.streak, 0);
        assert!(state.drain_events().contains(&GameEvent::ArrowMissed));
    }

    #[test]
    fn test_streak_milestone() {
        let mut state = playing(Tuning::classic());
        state.spawn_ticks = u32::MAX;
        state.stats.streak = 4;
        place_balloon(&mut state, -9.0, 0.0);
        tick(&mut state, &FIRE);
        run(&mut state, 10);
        assert_eq!(state.stats.best_streak, 5);
        assert!(state.drain_events().contains(&GameEvent::StreakMilestone(5)));
    }

    #[test]
    fn test_rainbow_arrow_pierces() {
        let mut state = playing(Tuning::birthday());
        state.spawn_ticks = u32::MAX;
        // Low enough that each is still in line when the arrow arrives
        for x in [-8.0, -4.0, 0.0, 4.0] {
            place_balloon(&mut state, x, -1.0);
        }
        state.pending_powerup = Some(PowerUpKind::Rainbow);
        tick(&mut state, &FIRE);
        run(&mut state, 100);

        assert!(state.balloons.is_empty());
        assert_eq!(state.stats.pops, 4);
        assert_eq!(state.stats.misses, 0);
        assert!(state.arrows.is_empty());
    }

    #[test]
    fn test_big_arrow_hits_wider() {
        let mut state = playing(Tuning::birthday());
        state.spawn_ticks = u32::MAX;
        // Above the arrow line and rising: out of reach for a normal arrow (1.2)
        place_balloon(&mut state, -8.0, 1.8);
        state.pending_powerup = Some(PowerUpKind::Big);
        tick(&mut state, &FIRE);
        // The balloon keeps rising while the arrow travels, so check early
        run(&mut state, 12);
        assert_eq!(state.stats.pops, 1);
    }

    #[test]
    fn test_aim_moves_archer() {
        let mut state = playing(Tuning::classic());
        tick(&mut state, &TickInput { aim: 1, ..Default::default() });
        assert_eq!(state.archer.y, ARCHER_AIM_STEP);
        tick(&mut state, &TickInput { fire: true, aim: 0, pause: false });
        assert_eq!(state.arrows[0].pos.y, ARCHER_AIM_STEP);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut state = playing(Tuning::classic());
        run(&mut state, 40);
        let pause = TickInput { pause: true, ..Default::default() };

        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);
        let frozen = state.balloons.clone();
        let ticks = state.time_ticks;
        run(&mut state, 30);
        assert_eq!(state.balloons, frozen);
        assert_eq!(state.time_ticks, ticks);

        // Any key resumes without firing
        tick(&mut state, &FIRE);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.arrows.is_empty());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Paused));
        assert!(events.contains(&GameEvent::Resumed));
    }

    #[test]
    fn test_pause_during_countdown_resumes_countdown() {
        let mut state = GameState::new(1, Tuning::classic());
        run(&mut state, 10);
        let before = state.phase;
        let pause = TickInput { pause: true, ..Default::default() };
        tick(&mut state, &pause);
        tick(&mut state, &pause);
        assert_eq!(state.phase, before);
    }

    #[test]
    fn test_win_celebration() {
        let mut tuning = Tuning::birthday();
        tuning.win_pops = Some(1);
        let mut state = playing(tuning);
        state.spawn_ticks = u32::MAX;
        place_balloon(&mut state, -9.0, 0.0);
        place_balloon(&mut state, 5.0, 5.0);
        tick(&mut state, &FIRE);
        run(&mut state, 10);

        assert!(state.is_won());
        assert!(state.balloons.is_empty());
        assert!(state.arrows.is_empty());
        assert!(state.drain_events().contains(&GameEvent::Won));
        assert!(!state.can_restart());

        // No new balloons during the party
        run(&mut state, CELEBRATION_MIN_TICKS);
        assert!(state.balloons.is_empty());
        assert!(state.can_restart());
        let bursts = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::CelebrationBurst { .. }))
            .count();
        assert_eq!(bursts as u32, CELEBRATION_MIN_TICKS / CELEBRATION_BURST_EVERY);
    }

    #[test]
    fn test_pause_ignored_during_celebration() {
        let mut tuning = Tuning::birthday();
        tuning.win_pops = Some(1);
        let mut state = playing(tuning);
        state.spawn_ticks = u32::MAX;
        place_balloon(&mut state, -9.0, 0.0);
        tick(&mut state, &FIRE);
        run(&mut state, 10);
        assert!(state.is_won());
        state.drain_events();

        let GamePhase::Won { ticks } = state.phase else {
            panic!("expected the celebration");
        };
        tick(&mut state, &TickInput { pause: true, ..Default::default() });
        assert_eq!(state.phase, GamePhase::Won { ticks: ticks + 1 });
        assert!(!state.drain_events().contains(&GameEvent::Paused));
    }

    #[test]
    fn test_classic_never_wins() {
        let mut state = playing(Tuning::classic());
        state.stats.pops = 1000;
        state.spawn_ticks = u32::MAX;
        place_balloon(&mut state, -9.0, 0.0);
        tick(&mut state, &FIRE);
        run(&mut state, 10);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_mascot_cheers_on_pop() {
        let mut state = playing(Tuning::birthday());
        state.spawn_ticks = u32::MAX;
        place_balloon(&mut state, -9.0, 0.0);
        tick(&mut state, &FIRE);
        run(&mut state, 5);
        let mascot = state.mascot.as_ref().unwrap();
        assert!(mascot.cheer_ticks > 0);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, Tuning::birthday());
        let mut state2 = GameState::new(99999, Tuning::birthday());

        for i in 0..900u32 {
            let input = TickInput {
                fire: i % 23 == 0,
                pause: false,
                aim: if i % 97 == 0 { 1 } else { 0 },
            };
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.balloons, state2.balloons);
        assert_eq!(state1.arrows, state2.arrows);
        assert_eq!(state1.stats, state2.stats);
        assert_eq!(state1.events, state2.events);
    }
}
