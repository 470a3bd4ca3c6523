use proptest::prelude::*;
use star_collector::sim::{ArcadePhysics, GameEvent, GameState, Physics, TickInput, builtin_levels, tick};
use star_collector::Tuning;

fn input_strategy() -> impl Strategy<Value = TickInput> {
    (0u32..128).prop_map(TickInput::from_bits)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_random_play_keeps_invariants(
        level in 0usize..3,
        seed in any::<u64>(),
        inputs in prop::collection::vec(input_strategy(), 1..400),
    ) {
        let levels = builtin_levels();
        let mut state = GameState::new(level as u32 + 1, 3, &levels[level], Tuning::default(), seed);
        let physics = ArcadePhysics::from_tuning(&state.tuning);
        let mut score = 0;
        let mut hp = state.player.hp;
        let mut cleared = 0;
        let mut died = 0;

        for input in &inputs {
            tick(&mut state, input, &physics);

            let charges = state.player.jump_charges();
            prop_assert!(charges <= 2);
            if state.is_running() && physics.is_resting(&state.player.body) {
                prop_assert_eq!(charges, 2);
            }

            let stamina = state.player.pilot().unwrap().stamina.value();
            prop_assert!((0.0..=100.0).contains(&stamina));

            prop_assert!(state.score >= score);
            score = state.score;
            prop_assert!(state.player.hp <= hp);
            hp = state.player.hp;

            for event in state.take_events() {
                match event {
                    GameEvent::LevelCleared { .. } => cleared += 1,
                    GameEvent::PlayerDied => died += 1,
                    _ => {}
                }
            }
            prop_assert!(cleared <= 1);
            prop_assert!(died <= 1);
            prop_assert!(cleared + died <= 1);
        }
    }

    #[test]
    fn prop_same_seed_same_outcome(
        seed in any::<u64>(),
        inputs in prop::collection::vec(input_strategy(), 1..200),
    ) {
        let levels = builtin_levels();
        let physics = ArcadePhysics::from_tuning(&Tuning::default());
        let run = || {
            let mut state = GameState::new(2, 3, &levels[1], Tuning::default(), seed);
            for input in &inputs {
                tick(&mut state, input, &physics);
            }
            (state.player.body.pos, state.score, state.player.hp, state.hazards.len())
        };
        prop_assert_eq!(run(), run());
    }
}
