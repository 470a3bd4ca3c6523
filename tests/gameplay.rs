mod common;

use common::*;
use glam::Vec2;
use star_collector::persistence::{KeyValueStore, MemoryStore};
use star_collector::progression::{HIGH_SCORE_KEY, LEVEL_REACHED_KEY};
use star_collector::sim::{GameEvent, GamePhase, TickInput};

#[test]
fn fall_costs_one_heart_and_respawns() {
    let mut session = session(MemoryStore::new());
    playing(&mut session, 1);

    let s = state(&mut session);
    let spawn = s.config.player_start;
    s.player.body.pos = Vec2::new(700.0, 700.0);
    let events = session.update(&TickInput::default(), &FROZEN);

    let s = state(&mut session);
    assert_eq!(s.player.hp, 2);
    assert_eq!(s.player.body.pos, spawn);
    assert!(s.player.is_invincible());
    assert_eq!(s.phase, GamePhase::Playing);
    assert_eq!(count(&events, &GameEvent::PlayerDamaged { hp: 2 }), 1);
}

#[test]
fn invincibility_lasts_1200ms() {
    let mut session = session(MemoryStore::new());
    playing(&mut session, 1);
    state(&mut session).player.body.pos.y = 800.0;
    session.update(&TickInput::default(), &FROZEN);
    assert!(state(&mut session).player.is_invincible());

    idle(&mut session, 74, &FROZEN);
    let state_now = state(&mut session);
    assert!(state_now.player.is_invincible());

    // Hits inside the window are ignored
    state_now.player.body.pos.y = 800.0;
    session.update(&TickInput::default(), &FROZEN);
    let state_now = state(&mut session);
    assert_eq!(state_now.player.hp, 2);
    assert!(!state_now.player.is_invincible());
}

#[test]
fn death_freezes_and_keeps_better_high_score() {
    let store = MemoryStore::new().with(HIGH_SCORE_KEY, "100");
    let mut session = session(store);
    playing(&mut session, 1);

    let state_now = state(&mut session);
    state_now.score = 80;
    state_now.player.hp = 1;
    state_now.player.body.pos.y = 700.0;
    let mut events = session.update(&TickInput::default(), &FROZEN);

    let state_now = state(&mut session);
    assert_eq!(state_now.phase, GamePhase::GameOver);
    let frozen_at = state_now.player.body.pos;
    let run_right = TickInput {
        right: true,
        ..Default::default()
    };
    for _ in 0..10 {
        events.extend(session.update(&run_right, &FROZEN));
    }
    assert_eq!(state(&mut session).player.body.pos, frozen_at);
    assert_eq!(count(&events, &GameEvent::PlayerDied), 1);

    let stored = session.progression_store().store().get(HIGH_SCORE_KEY).unwrap();
    assert_eq!(stored.as_deref(), Some("100"));
    assert_eq!(session.high_score(), 100);
}

#[test]
fn death_with_better_score_is_recorded() {
    let store = MemoryStore::new().with(HIGH_SCORE_KEY, "100");
    let mut session = session(store);
    playing(&mut session, 1);

    let state_now = state(&mut session);
    state_now.score = 150;
    state_now.player.hp = 1;
    state_now.player.body.pos.y = 700.0;
    session.update(&TickInput::default(), &FROZEN);

    let stored = session.progression_store().store().get(HIGH_SCORE_KEY).unwrap();
    assert_eq!(stored.as_deref(), Some("150"));
}

#[test]
fn game_over_waits_then_confirms_to_title() {
    let mut session = session(MemoryStore::new());
    playing(&mut session, 1);
    let state_now = state(&mut session);
    state_now.player.hp = 1;
    state_now.player.body.pos.y = 700.0;
    session.update(&TickInput::default(), &FROZEN);

    // Confirm before the prompt does nothing
    session.update(&confirm(), &FROZEN);
    session.update(&TickInput::default(), &FROZEN);
    assert!(!session.is_title());

    let events = idle(&mut session, 70, &FROZEN);
    assert!(state(&mut session).awaiting_confirm);
    assert!(events.iter().any(|e| matches!(e, GameEvent::Cue { .. })));

    session.update(&confirm(), &FROZEN);
    assert!(session.is_title());
}

#[test]
fn stomping_enemy_scores_and_bounces() {
    let mut session = session(MemoryStore::new());
    playing(&mut session, 1);
    let state_now = state(&mut session);
    let enemy_box = state_now.enemies[0].aabb();
    stand_on(state_now, enemy_box, 6.0);
    // Cancel the patrol so the frozen integrator keeps them stacked
    state_now.enemies[0].body.vel = Vec2::ZERO;
    if let star_collector::sim::ActorKind::Enemy { patrol_speed } = &mut state_now.enemies[0].kind {
        *patrol_speed = 0.0;
    }

    let events = session.update(&TickInput::default(), &FROZEN);
    let state_now = state(&mut session);
    assert!(!state_now.enemies[0].active);
    assert_eq!(state_now.score, 50);
    assert_eq!(state_now.player.hp, 3);
    assert_eq!(count(&events, &GameEvent::EnemyDefeated { score_delta: 50 }), 1);
}

#[test]
fn collecting_every_star_cycles_the_set() {
    let mut session = session(MemoryStore::new());
    playing(&mut session, 1);
    let state_now = state(&mut session);
    state_now.enemies.clear();
    let stars: Vec<Vec2> = state_now.collectibles.iter().map(|c| c.pos).collect();

    let mut events = Vec::new();
    for star in &stars {
        let state_now = state(&mut session);
        state_now.player.body.pos = *star;
        state_now.player.body.vel = Vec2::ZERO;
        events.extend(session.update(&TickInput::default(), &FROZEN));
        assert!(state(&mut session).collectibles.active_count() > 0);
    }

    let state_now = state(&mut session);
    let collected = events
        .iter()
        .filter(|e| matches!(e, GameEvent::CollectibleCollected { .. }))
        .count();
    assert_eq!(collected, stars.len());
    assert_eq!(count(&events, &GameEvent::CollectiblesFullyCycled), 1);
    assert_eq!(state_now.collectibles.active_count(), stars.len());
    assert_eq!(state_now.hazards.len(), 1);
    assert_eq!(state_now.score, 10 * stars.len() as u64);
}

#[test]
fn non_final_clear_unlocks_and_advances() {
    let mut session = session(MemoryStore::new());
    playing(&mut session, 1);
    let state_now = state(&mut session);
    state_now.enemies.clear();
    let star = state_now.collectibles.get(0).unwrap().pos;
    state_now.player.body.pos = star;
    session.update(&TickInput::default(), &FROZEN);

    let goal = state(&mut session).goal.aabb.center();
    state(&mut session).player.body.pos = goal;
    let mut events = session.update(&TickInput::default(), &FROZEN);
    assert_eq!(state(&mut session).phase, GamePhase::LevelClear);
    assert_eq!(session.progression().level_reached, 2);
    assert_eq!(session.high_score(), 10);
    let stored = session.progression_store().store().get(LEVEL_REACHED_KEY).unwrap();
    assert_eq!(stored.as_deref(), Some("2"));

    events.extend(idle(&mut session, 125, &FROZEN));
    assert_eq!(
        count(&events, &GameEvent::LevelCleared { next_level: Some(2) }),
        1
    );
    let next = session.state().unwrap();
    assert_eq!(next.level, 2);
    assert_eq!(next.score, 0);
    assert_eq!(next.player.hp, 3);
}

#[test]
fn boss_takes_ten_stomps_then_level_clears() {
    let store = MemoryStore::new().with(LEVEL_REACHED_KEY, "3");
    let mut session = session(store);
    playing(&mut session, 3);
    state(&mut session).enemies.clear();

    let mut events = Vec::new();
    for _ in 0..10 {
        let state_now = state(&mut session);
        let boss_box = state_now.boss.as_ref().unwrap().aabb();
        stand_on(state_now, boss_box, 4.0);
        events.extend(session.update(&TickInput::default(), &FROZEN));
    }
    assert_eq!(count(&events, &GameEvent::BossDefeated), 1);
    assert_eq!(count(&events, &GameEvent::BossDamaged { hp_remaining: 0 }), 1);
    let state_now = state(&mut session);
    assert!(!state_now.boss_alive());
    assert_eq!(state_now.player.hp, 3);
    assert!(!state_now.goal.enabled);
    assert_eq!(state_now.phase, GamePhase::Playing);

    // Explosions play out, then the final level clears
    state_now.player.body.vel = Vec2::ZERO;
    events.extend(idle(&mut session, 125, &FROZEN));
    assert_eq!(state(&mut session).phase, GamePhase::LevelClear);
    assert_eq!(count(&events, &GameEvent::AllLevelsCleared), 1);
    assert_eq!(count(&events, &GameEvent::LevelCleared { next_level: None }), 1);
    let explosions = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                GameEvent::Cue {
                    cue: star_collector::sim::Cue::Explosion { .. }
                }
            )
        })
        .count();
    assert_eq!(explosions, 10);
    assert_eq!(session.progression().level_reached, 4);

    // Back to title after the long banner and one confirmation
    idle(&mut session, 190, &FROZEN);
    session.update(&confirm(), &FROZEN);
    assert!(session.is_title());
}

#[test]
fn locked_level_cannot_start() {
    let mut session = session(MemoryStore::new());
    assert!(!session.start_level(3));
    assert!(session.is_title());
    assert!(session.level_select().is_unlocked(1));
}

fn shoot() -> TickInput {
    TickInput {
        shoot: true,
        ..Default::default()
    }
}

#[test]
fn ten_shots_defeat_boss_then_level_clears() {
    let store = MemoryStore::new().with(LEVEL_REACHED_KEY, "3");
    let mut session = session(store);
    playing(&mut session, 3);
    let s = state(&mut session);
    s.enemies.clear();
    // Hold the boss still so only shots connect
    s.tuning.boss_chase_range = 0.0;

    let mut events = Vec::new();
    for _ in 0..10 {
        let s = state(&mut session);
        let boss_box = s.boss.as_ref().unwrap().aabb();
        s.player.body.pos = Vec2::new(boss_box.min.x - 20.0, boss_box.center().y);
        s.player.body.vel = Vec2::ZERO;
        events.extend(session.update(&shoot(), &FROZEN));
        // Wait out the fire cooldown
        events.extend(idle(&mut session, 13, &FROZEN));
    }

    assert_eq!(count(&events, &GameEvent::BossDefeated), 1);
    assert_eq!(count(&events, &GameEvent::BossDamaged { hp_remaining: 0 }), 1);
    let s = state(&mut session);
    assert!(!s.boss_alive());
    assert_eq!(s.player.hp, 3);
    assert_eq!(s.phase, GamePhase::Playing);
    assert_eq!(count(&events, &GameEvent::AllLevelsCleared), 0);

    events.extend(idle(&mut session, 125, &FROZEN));
    assert_eq!(state(&mut session).phase, GamePhase::LevelClear);
    assert_eq!(count(&events, &GameEvent::AllLevelsCleared), 1);
    assert_eq!(session.progression().level_reached, 4);
}

#[test]
fn touching_bomb_knocks_player_away() {
    let mut session = session(MemoryStore::new());
    playing(&mut session, 1);
    let s = state(&mut session);
    s.enemies.clear();
    let player = s.player.body.pos;
    star_collector::sim::combat::spawn_bomb(s, 0.0);
    let bomb = s.hazards.last_mut().unwrap();
    bomb.body.pos = player + Vec2::new(20.0, 0.0);
    bomb.body.vel = Vec2::ZERO;

    let events = session.update(&TickInput::default(), &FROZEN);
    let s = state(&mut session);
    assert_eq!(s.player.hp, 2);
    assert_eq!(s.player.body.vel, Vec2::new(-200.0, -200.0));
    assert!(s.player.is_invincible());
    assert_eq!(s.hazards.len(), 1);
    assert_eq!(count(&events, &GameEvent::PlayerDamaged { hp: 2 }), 1);
}

#[test]
fn walking_into_boss_costs_a_heart() {
    let store = MemoryStore::new().with(LEVEL_REACHED_KEY, "3");
    let mut session = session(store);
    playing(&mut session, 3);
    let s = state(&mut session);
    s.enemies.clear();
    s.tuning.boss_chase_range = 0.0;
    let boss_box = s.boss.as_ref().unwrap().aabb();
    s.player.body.pos = Vec2::new(boss_box.min.x - 10.0, boss_box.center().y);
    s.player.body.vel = Vec2::ZERO;

    let events = session.update(&TickInput::default(), &FROZEN);
    let s = state(&mut session);
    assert_eq!(s.player.hp, 2);
    assert_eq!(s.player.body.vel.x, -200.0);
    assert_eq!(s.boss.as_ref().unwrap().hp, 10);
    assert_eq!(count(&events, &GameEvent::PlayerDamaged { hp: 2 }), 1);
    assert_eq!(count(&events, &GameEvent::BossDamaged { hp_remaining: 9 }), 0);
}
