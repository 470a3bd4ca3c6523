//! Boss defeat sequence
//!
//! Zero hp removes the boss immediately, then a fixed string of explosions
//! plays out around where it stood before the level is forced to clear.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::clock::Deferred;
use super::flow;
use super::state::{Cue, GameEvent, GameState, Sound};

/// Tracks the one-shot defeat sequence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BossSequencer {
    pub triggered: bool,
    /// Where the boss was when it went down
    pub origin: Option<Vec2>,
    pub bursts_fired: u32,
}

/// Start the sequence; later calls are ignored
pub fn trigger(state: &mut GameState) {
    if state.boss_sequence.triggered {
        return;
    }
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    boss.active = false;
    boss.body.vel = Vec2::ZERO;
    let origin = boss.body.pos;

    state.boss_sequence.triggered = true;
    state.boss_sequence.origin = Some(origin);
    state.emit(GameEvent::BossDefeated);
    log::info!("Boss defeated on level {}", state.level);

    let interval = state.tuning.boss_explosion_interval_ms;
    for burst in 0..state.tuning.boss_explosions {
        state
            .scheduler
            .schedule_in(burst as u64 * interval, Deferred::BossExplosion { origin, burst });
    }
    let delay = state.tuning.boss_clear_delay_ms;
    state.scheduler.schedule_in(delay, Deferred::BossClear);
}

/// One jittered explosion near the origin
pub fn explode(state: &mut GameState, origin: Vec2, burst: u32) {
    let jitter = state.tuning.boss_explosion_jitter;
    let dx = state.rng().random_range(-jitter..=jitter);
    let dy = state.rng().random_range(-jitter..=jitter);
    let at = origin + Vec2::new(dx, dy);

    state.cue(Cue::Explosion { x: at.x, y: at.y });
    state.cue(Cue::Particles {
        x: at.x,
        y: at.y,
        count: 20,
    });
    state.cue(Cue::Sound { sound: Sound::Death });
    state.boss_sequence.bursts_fired = state.boss_sequence.bursts_fired.max(burst + 1);
}

/// Sequence over: the level is cleared as if the goal was touched
pub fn finish(state: &mut GameState) {
    flow::reach_goal(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::builtin_levels;
    use crate::sim::state::GamePhase;
    use crate::tuning::Tuning;

    fn boss_level() -> GameState {
        let mut state = GameState::new(3, 3, &builtin_levels()[2], Tuning::default(), 5);
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_trigger_schedules_explosions_and_clear() {
        let mut state = boss_level();
        let before = state.scheduler.pending();
        trigger(&mut state);
        assert!(!state.boss_alive());
        assert_eq!(state.scheduler.pending(), before + 11);
        assert!(state.scheduler.has_pending(|a| *a == Deferred::BossClear));
        assert_eq!(
            state.events().iter().filter(|e| **e == GameEvent::BossDefeated).count(),
            1
        );
    }

    #[test]
    fn test_trigger_is_one_shot() {
        let mut state = boss_level();
        trigger(&mut state);
        let pending = state.scheduler.pending();
        trigger(&mut state);
        assert_eq!(state.scheduler.pending(), pending);
    }

    #[test]
    fn test_explosion_jitter_bounded() {
        let mut state = boss_level();
        let origin = Vec2::new(1200.0, 400.0);
        for burst in 0..10 {
            explode(&mut state, origin, burst);
        }
        for event in state.events() {
            if let GameEvent::Cue {
                cue: Cue::Explosion { x, y },
            } = event
            {
                assert!((x - origin.x).abs() <= 50.0);
                assert!((y - origin.y).abs() <= 50.0);
            }
        }
        assert_eq!(state.boss_sequence.bursts_fired, 10);
    }
}
