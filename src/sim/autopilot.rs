//! Demo / soak-test driver
//!
//! Produces plausible inputs from the current state so the headless runner
//! can exercise whole levels without a human.

use super::state::GameState;
use super::tick::TickInput;

/// How far ahead an enemy must be before the autopilot shoots
const SHOOT_RANGE: f32 = 500.0;

/// Pick this tick's inputs
pub fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput::default();

    if state.awaiting_confirm {
        // Alternate so every other tick is a fresh press
        input.confirm = state.ticks % 2 == 0;
        return input;
    }
    if !state.is_running() {
        return input;
    }

    let player = &state.player;
    let px = player.body.pos.x;

    // Head for the boss when there is one, otherwise the goal
    let target_x = match state.boss.as_ref().filter(|b| b.active) {
        Some(boss) => boss.body.pos.x,
        None => state.goal.aabb.center().x,
    };
    if target_x > px + 8.0 {
        input.right = true;
    } else if target_x < px - 8.0 {
        input.left = true;
    }

    // Dash only with a healthy reserve
    input.dash = player
        .pilot()
        .is_some_and(|p| p.stamina.value() > p.stamina.max() * 0.3);

    // Jump on a rhythm, double-jump a few ticks later, and hop walls
    let phase = state.ticks % 40;
    input.up = phase == 0 || phase == 12 || (player.body.blocked_x && state.ticks % 2 == 0);

    // Cut long falls short
    input.down = player.body.vel.y > 300.0 && player.body.pos.y < 400.0;

    // Shoot at anything in front
    let facing = player.facing.sign();
    let threat_ahead = state
        .enemies
        .iter()
        .chain(state.boss.iter())
        .filter(|a| a.active)
        .any(|a| {
            let dx = a.body.pos.x - px;
            dx * facing > 0.0
                && dx.abs() < SHOOT_RANGE
                && (a.body.pos.y - player.body.pos.y).abs() < 60.0
        });
    input.shoot = threat_ahead && state.ticks % 2 == 0;

    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::builtin_levels;
    use crate::sim::physics::ArcadePhysics;
    use crate::sim::state::GamePhase;
    use crate::sim::tick::tick;
    use crate::tuning::Tuning;

    #[test]
    fn test_autopilot_heads_for_goal() {
        let mut state = GameState::new(1, 3, &builtin_levels()[0], Tuning::default(), 1);
        state.phase = GamePhase::Playing;
        let input = autopilot(&state);
        assert!(input.right);
        assert!(!input.left);
    }

    #[test]
    fn test_autopilot_confirms_when_waiting() {
        let mut state = GameState::new(1, 3, &builtin_levels()[0], Tuning::default(), 1);
        state.phase = GamePhase::GameOver;
        state.awaiting_confirm = true;
        state.ticks = 10;
        assert!(autopilot(&state).confirm);
        state.ticks = 11;
        assert!(!autopilot(&state).confirm);
    }

    #[test]
    fn test_autopilot_soak_keeps_invariants() {
        let mut state = GameState::new(3, 3, &builtin_levels()[2], Tuning::default(), 77);
        let physics = ArcadePhysics::from_tuning(&state.tuning);
        let mut last_score = 0;
        for _ in 0..3000 {
            let input = autopilot(&state);
            tick(&mut state, &input, &physics);
            assert!(state.score >= last_score);
            last_score = state.score;
            assert!(state.player.hp <= 3);
            assert!(state.player.jump_charges() <= 2);
            let stamina = state.player.pilot().map(|p| p.stamina.value()).unwrap_or(0.0);
            assert!((0.0..=100.0).contains(&stamina));
            if state.take_transition().is_some() {
                break;
            }
        }
    }
}
