//! Property-based tests for the tables, the state model and the engine.

use proptest::prelude::*;

use safari::constants::*;
use safari::engine::Node;
use safari::tables::{flee_roll_count, shake_odds, tables, ShakeOdds};
use safari::{
    ActionScript, EncounterConfig, FleeTiming, InteractionState, PlayerAction, Prob128, Prob64,
    Probability, Reaction, Solver,
};

/// Strategy: a species rate (1-255).
fn rate_strategy() -> impl Strategy<Value = u8> {
    1..=255u8
}

fn action_strategy() -> impl Strategy<Value = PlayerAction> {
    prop_oneof![
        Just(PlayerAction::Ball),
        Just(PlayerAction::Bait),
        Just(PlayerAction::Rock),
    ]
}

/// Short scripts keep the exhaustive tree small (at most 10^6 nodes).
fn script_strategy() -> impl Strategy<Value = ActionScript> {
    prop::collection::vec(action_strategy(), 0..=6)
        .prop_map(|actions| ActionScript::new(actions).unwrap())
}

fn timing_strategy() -> impl Strategy<Value = FleeTiming> {
    prop_oneof![Just(FleeTiming::AfterThrow), Just(FleeTiming::BeforeThrow)]
}

/// Every node reachable from `node`, depth first.
fn visit_all<P: Probability>(
    solver: &Solver<'_, P>,
    node: Node<P>,
    visit: &mut impl FnMut(&Node<P>),
) {
    visit(&node);
    for child in solver.children(&node) {
        visit_all(solver, child, visit);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // 1. Stay/Flee rows sum to one and are monotone in the flee rate
    #[test]
    fn stay_flee_rows_well_formed(rate in 0..TABLE_SIZE) {
        let t = tables::<Prob64>();
        let row = t.stay_flee[rate];
        prop_assert!((row.stay.to_f64() + row.flee.to_f64() - 1.0).abs() < 1e-15);
        if rate > 0 {
            prop_assert!(t.stay_flee[rate - 1].flee <= row.flee);
        }
        prop_assert!(flee_roll_count(rate as u32) <= RNG_RANGE);
    }

    // 2. Catch/Miss rows sum to one (exactly in fixed point)
    #[test]
    fn catch_miss_rows_well_formed(factor in 0..TABLE_SIZE) {
        let row = tables::<Prob128>().catch_miss[factor];
        prop_assert_eq!(row.catch + row.miss, Prob128::ONE);
        let row = tables::<Prob64>().catch_miss[factor];
        prop_assert!((row.catch.to_f64() + row.miss.to_f64() - 1.0).abs() < 1e-15);
    }

    // 3. A better catch factor never lowers the per-ball catch probability
    #[test]
    fn catch_monotone_in_factor(factor in 0..(TABLE_SIZE - 1)) {
        let t = tables::<Prob64>();
        prop_assert!(t.catch_miss[factor].catch <= t.catch_miss[factor + 1].catch);
        if let ShakeOdds::PerCheck(threshold) = shake_odds(factor as u32) {
            prop_assert!(threshold > 0 && threshold <= RNG_RANGE);
        }
    }

    // 4. Raising the flee rate never lowers the per-turn flee probability
    #[test]
    fn flee_monotone_in_rate(
        a in rate_strategy(),
        b in rate_strategy(),
        counter in 0..=MAX_THROW_COUNTER,
        action in action_strategy(),
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let t = tables::<Prob64>();
        let low = InteractionState::new(30, lo).after_player_action(action, counter);
        let high = InteractionState::new(30, hi).after_player_action(action, counter);
        prop_assert!(low.stay_flee(t).flee <= high.stay_flee(t).flee);
    }

    // 5. Throw-counter distributions sum to one and stay in 2..=6
    #[test]
    fn throw_outcomes_well_formed(counter in 0..=MAX_THROW_COUNTER) {
        let outcomes = tables::<Prob128>().throw_outcomes(counter);
        let total: Prob128 = outcomes.iter().map(|(_, p)| p).sum();
        prop_assert_eq!(total, Prob128::ONE);
        for (value, _) in outcomes.iter() {
            prop_assert!(value >= (counter + THROW_MIN_INCREMENT).min(MAX_THROW_COUNTER));
            prop_assert!((THROW_MIN_INCREMENT..=MAX_THROW_COUNTER).contains(&value));
        }
    }

    // 6. Any sequence of actions and reactions keeps the counters exclusive and in range
    #[test]
    fn state_counters_exclusive(
        catch_rate in rate_strategy(),
        flee_rate in rate_strategy(),
        steps in prop::collection::vec((action_strategy(), 0..=MAX_THROW_COUNTER, any::<bool>()), 0..20),
    ) {
        let mut state = InteractionState::new(catch_rate, flee_rate);
        for (action, value, watch) in steps {
            state = state.after_player_action(action, value);
            if watch {
                state = state.after_reaction(Reaction::WatchCarefully);
            }
            prop_assert!(state.counters_exclusive());
            prop_assert!(state.bait_counter <= MAX_THROW_COUNTER);
            prop_assert!(state.rock_counter <= MAX_THROW_COUNTER);
            prop_assert!(state.catch_factor <= MAX_ROCKED_CATCH_FACTOR);
            prop_assert!(state.escape_factor >= MIN_ESCAPE_FACTOR);
            prop_assert!((state.flee_percent() as usize) < TABLE_SIZE);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    // 7. Caught + fled + unresolved is the whole probability mass
    #[test]
    fn outcome_is_exhaustive(
        catch_rate in rate_strategy(),
        flee_rate in rate_strategy(),
        script in script_strategy(),
        timing in timing_strategy(),
    ) {
        let cfg = EncounterConfig::new(catch_rate, flee_rate).with_flee_timing(timing);
        let solution = Solver::<Prob64>::new(&cfg, &script).unwrap().solve();
        let total = solution.outcome.total().to_f64();
        prop_assert!((total - 1.0).abs() < 1e-9, "total={total} script={script}");
        let p = solution.capture_probability().to_f64();
        prop_assert!((0.0..=1.0 + 1e-12).contains(&p));
    }

    // 8. Parallel and sequential folds agree bit for bit
    #[test]
    fn parallel_fold_is_deterministic(
        script in script_strategy(),
        depth in 0usize..4,
    ) {
        let cfg = EncounterConfig::default();
        let seq = Solver::<Prob64>::new(&cfg, &script).unwrap().sequential().solve();
        let par = Solver::<Prob64>::new(&cfg, &script).unwrap().with_parallel_depth(depth).solve();
        prop_assert_eq!(seq.outcome, par.outcome);
        prop_assert_eq!(seq.explored, par.explored);
    }

    // 9. Every reachable state keeps at most one throw counter running
    #[test]
    fn reachable_states_exclusive(script in script_strategy()) {
        let cfg = EncounterConfig::default();
        let solver = Solver::<Prob64>::new(&cfg, &script).unwrap();
        let mut ok = true;
        visit_all(&solver, Node::root(InteractionState::from_config(&cfg)), &mut |node| {
            ok &= node.state.counters_exclusive();
        });
        prop_assert!(ok);
    }

    // 10. Both backends report the same capture probability
    #[test]
    fn backends_agree(script in script_strategy(), timing in timing_strategy()) {
        let cfg = EncounterConfig::default().with_flee_timing(timing);
        let a = Solver::<Prob64>::new(&cfg, &script).unwrap().solve();
        let b = Solver::<Prob128>::new(&cfg, &script).unwrap().solve();
        let diff = (a.capture_probability().to_f64() - b.capture_probability().to_f64()).abs();
        prop_assert!(diff < 1e-12, "diff={diff}");
    }
}
