//! Level flow: goal, terminal transitions and deferred-action dispatch

use glam::Vec2;

use super::actor::ActorKind;
use super::boss;
use super::clock::Deferred;
use super::motion;
use super::physics::Physics;
use super::state::{Banner, Cue, GameEvent, GamePhase, GameState, Outcome, Transition};

/// Clear the level when the player touches an enabled goal
pub fn check_goal(state: &mut GameState, physics: &impl Physics) {
    if state.is_running()
        && state.goal.enabled
        && physics.overlaps(&state.player.aabb(), &state.goal.aabb)
    {
        reach_goal(state);
    }
}

/// Freeze the level and line up the next screen
pub fn reach_goal(state: &mut GameState) {
    if !state.is_running() {
        return;
    }
    state.phase = GamePhase::LevelClear;
    state.player.body.vel = Vec2::ZERO;
    let pos = state.player.body.pos;
    state.cue(Cue::WinBurst { x: pos.x, y: pos.y });
    state.outcome = Some(Outcome::Cleared {
        level: state.level,
        score: state.score,
    });

    if state.is_final_level() {
        state.emit(GameEvent::LevelCleared { next_level: None });
        state.emit(GameEvent::AllLevelsCleared);
        state.banner = Some(Banner::AllClear);
        state.cue(Cue::Banner {
            banner: Banner::AllClear,
        });
        let delay = state.tuning.all_clear_delay_ms;
        state.scheduler.schedule_in(delay, Deferred::AwaitConfirm);
        log::info!("All {} levels cleared, score {}", state.level_count, state.score);
    } else {
        let next = state.level + 1;
        state.emit(GameEvent::LevelCleared {
            next_level: Some(next),
        });
        state.banner = Some(Banner::StageClear);
        state.cue(Cue::Banner {
            banner: Banner::StageClear,
        });
        let delay = state.tuning.level_clear_delay_ms;
        state.scheduler.schedule_in(delay, Deferred::AdvanceLevel);
        log::info!("Level {} cleared, score {}", state.level, state.score);
    }
}

/// A confirmation input arrived while a terminal banner was waiting
pub fn confirm(state: &mut GameState) {
    if !state.awaiting_confirm {
        return;
    }
    state.awaiting_confirm = false;
    state.transition = Some(Transition::Title);
}

/// Run every deferred action that has come due, in order
pub fn drain_deferred(state: &mut GameState) {
    while let Some(action) = state.scheduler.pop_due() {
        dispatch(state, action);
    }
}

fn dispatch(state: &mut GameState, action: Deferred) {
    match action {
        Deferred::EndInvincibility { actor } => motion::end_invincibility(state, actor),
        Deferred::EndBossFlash { actor } => {
            let Some(boss) = state.boss.as_mut().filter(|b| b.active && b.id == actor) else {
                return;
            };
            if let ActorKind::Boss(brain) = &mut boss.kind {
                brain.flashing = false;
            }
            state.cue(Cue::BossFlash { on: false });
        }
        Deferred::ExpireProjectile { id } => state.projectiles.retain(|p| p.id != id),
        Deferred::FadeGhost { id } => {
            let before = state.ghosts.len();
            state.ghosts.retain(|g| g.id != id);
            if state.ghosts.len() != before {
                state.cue(Cue::GhostFaded { id });
            }
        }
        Deferred::BossExplosion { origin, burst } => boss::explode(state, origin, burst),
        Deferred::BossClear => boss::finish(state),
        Deferred::AdvanceLevel => {
            if state.phase == GamePhase::LevelClear {
                state.transition = Some(Transition::NextLevel(state.level + 1));
            }
        }
        Deferred::AwaitConfirm => {
            state.awaiting_confirm = true;
            state.cue(Cue::ConfirmPrompt);
        }
    }
}
