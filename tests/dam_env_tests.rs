// tests/dam_env_tests.rs

use damsim::{Config, DamEnv, EPISODE_STEPS};

/// Config with a degenerate (deterministic) inflow, so transitions are
/// exact and the expected rewards can be written down by hand.
fn still_water_config(initial_level: i64, penalize: bool) -> Config {
    Config {
        capacity: 10,
        water_demand: 4.0,
        power_demand: 3.0,
        inflow_mean: 0.0,
        inflow_std: 0.0,
        penalize,
        initial_level: Some(initial_level),
        seed: Some(7),
    }
}

fn make_env(cfg: Config) -> DamEnv {
    DamEnv::new(cfg).expect("config should be valid")
}

#[test]
fn feasible_release_scores_the_supply_deficit() {
    // capacity 10, demands (4, 3), start 5, no penalty, inflow 0.
    let mut env = make_env(still_water_config(5, false));
    env.reset(None);

    // Release 3 is inside [0, 10]: storage 5 - 3 + 0 = 2, two units
    // short of the water demand, power demand exactly met.
    let result = env.step(3);

    assert_eq!(result.state, 2);
    assert_eq!(result.reward.to_array(), [-2.0, 0.0]);
    assert!(!result.done);
    assert!(!result.truncated);
}

#[test]
fn overfull_reservoir_forces_a_minimum_release() {
    // Start above capacity: the lower bound max(0, 12 - 10) = 2 kicks
    // in and overrides the requested zero release.
    let mut env = make_env(still_water_config(12, false));
    env.reset(None);

    let result = env.step(0);

    assert_eq!(result.state, 10); // 12 - 2 + 0
    assert_eq!(result.reward.to_array(), [0.0, -1.0]);
}

#[test]
fn infeasible_negative_request_is_penalised_in_both_components() {
    // Request -2, bounded to 0: violation of 2 units, so a -2 penalty
    // lands in both components on top of the plain deficits.
    let mut env = make_env(still_water_config(5, true));
    env.reset(None);

    let result = env.step(-2);

    // Storage stays at 5: water deficit 0, power deficit -3.
    assert_eq!(result.state, 5);
    assert_eq!(result.reward.to_array(), [-2.0, -5.0]);
}

#[test]
fn penalty_toggle_removes_the_violation_term() {
    let mut env = make_env(still_water_config(5, false));
    env.reset(None);

    let result = env.step(-2);

    assert_eq!(result.state, 5);
    assert_eq!(result.reward.to_array(), [0.0, -3.0]);
}

#[test]
fn upper_bound_wins_when_storage_far_exceeds_capacity() {
    // Storage 25 gives a lower bound of 15, above the upper bound of
    // 10. NumPy clip semantics: the upper bound wins, so every request
    // is forced to exactly 10.
    let mut env = make_env(still_water_config(25, true));
    env.reset(None);

    let result = env.step(0);

    assert_eq!(result.state, 15); // 25 - 10 + 0
    // Violation |10 - 0| = 10 penalises both components; the plain
    // deficits are 0 (storage 15 >= 4, release 10 >= 3).
    assert_eq!(result.reward.to_array(), [-10.0, -10.0]);
}

#[test]
fn episode_terminates_after_exactly_thirty_steps() {
    let mut env = make_env(still_water_config(5, true));
    env.reset(None);
    assert_eq!(env.step_count(), 0);

    for expected_t in 1..EPISODE_STEPS {
        let result = env.step(0);
        assert!(!result.done, "done at step {expected_t} already");
        assert_eq!(env.step_count(), expected_t);
    }

    let last = env.step(0);
    assert!(last.done);
    assert_eq!(env.step_count(), EPISODE_STEPS);
}

#[test]
fn done_flag_is_only_raised_at_the_horizon() {
    // The engine does not reject steps past the horizon; the caller is
    // expected to reset on done. A 31st step must not report done.
    let mut env = make_env(still_water_config(5, true));
    env.reset(None);

    for _ in 0..EPISODE_STEPS {
        env.step(0);
    }
    let past = env.step(0);
    assert!(!past.done);

    // A reset rewinds the counter and re-arms the horizon.
    env.reset(None);
    assert_eq!(env.step_count(), 0);
}

#[test]
fn storage_never_goes_negative() {
    // Dry climate (inflow -3 every step) plus maximum release: the
    // zero clamp must hold the level at 0, never below.
    let cfg = Config {
        inflow_mean: -3.0,
        inflow_std: 0.0,
        initial_level: Some(4),
        seed: Some(3),
        ..Config::default()
    };
    let mut env = make_env(cfg);
    env.reset(None);

    for _ in 0..EPISODE_STEPS {
        let result = env.step(10);
        assert!(result.state >= 0);
    }
    assert_eq!(env.storage(), Some(0));
}

#[test]
fn reward_components_are_never_positive() {
    // Random rollouts with deliberately out-of-range requests: both
    // components must stay <= 0 everywhere.
    let cfg = Config {
        seed: Some(99),
        ..Config::default()
    };
    let mut env = make_env(cfg);

    let mut request = -6_i64;
    for episode in 0..20 {
        env.reset(Some(1000 + episode));
        for _ in 0..EPISODE_STEPS {
            let result = env.step(request);
            assert!(
                result.reward.water_deficit <= 0.0,
                "positive water component for request {request}"
            );
            assert!(
                result.reward.power_deficit <= 0.0,
                "positive power component for request {request}"
            );
            // Sweep requests well past both ends of the action range.
            request = if request > 25 { -6 } else { request + 1 };
        }
    }
}

#[test]
fn same_seed_and_actions_reproduce_the_trajectory() {
    let cfg = Config {
        seed: Some(42),
        ..Config::default()
    };
    let mut env1 = make_env(cfg.clone());
    let mut env2 = make_env(cfg);

    let (s1, _) = env1.reset(None);
    let (s2, _) = env2.reset(None);
    assert_eq!(s1, s2);

    let actions: Vec<i64> = (0..EPISODE_STEPS as i64).map(|i| i % 11).collect();
    for &action in &actions {
        let r1 = env1.step(action);
        let r2 = env2.step(action);
        assert_eq!(r1.state, r2.state);
        assert_eq!(r1.reward, r2.reward);
        assert_eq!(r1.done, r2.done);
    }
}

#[test]
fn different_seeds_diverge() {
    let mut env1 = make_env(Config {
        seed: Some(1),
        ..Config::default()
    });
    let mut env2 = make_env(Config {
        seed: Some(2),
        ..Config::default()
    });

    env1.reset(None);
    env2.reset(None);

    let mut any_difference = false;
    for _ in 0..EPISODE_STEPS {
        let r1 = env1.step(3);
        let r2 = env2.step(3);
        if r1.state != r2.state {
            any_difference = true;
        }
    }
    assert!(any_difference, "independent seeds produced identical rollouts");
}

#[test]
fn reseeding_reset_reproduces_the_episode() {
    let mut env = make_env(Config::default());

    let (start_a, _) = env.reset(Some(5));
    let first: Vec<i64> = (0..EPISODE_STEPS).map(|_| env.step(2).state).collect();

    let (start_b, _) = env.reset(Some(5));
    let second: Vec<i64> = (0..EPISODE_STEPS).map(|_| env.step(2).state).collect();

    assert_eq!(start_a, start_b);
    assert_eq!(first, second);
}

#[test]
fn uniform_initial_draw_stays_within_capacity() {
    let cfg = Config {
        seed: Some(11),
        ..Config::default()
    };
    let capacity = cfg.capacity;
    let mut env = make_env(cfg);

    for _ in 0..200 {
        let (level, _) = env.reset(None);
        assert!((0..=capacity).contains(&level));
    }
}

#[test]
fn fixed_initial_level_is_used_on_every_reset() {
    let mut env = make_env(still_water_config(7, true));

    for _ in 0..10 {
        let (level, _) = env.reset(None);
        assert_eq!(level, 7);
        env.step(1);
    }
}

#[test]
fn inflow_rounds_half_away_from_zero() {
    // Degenerate distributions sitting exactly on the halves.
    let cfg = Config {
        inflow_mean: 2.5,
        inflow_std: 0.0,
        initial_level: Some(5),
        penalize: false,
        seed: Some(1),
        ..Config::default()
    };
    let mut env = make_env(cfg);
    env.reset(None);
    // round(2.5) = 3, not 2: 5 - 0 + 3 = 8.
    assert_eq!(env.step(0).state, 8);

    let cfg = Config {
        inflow_mean: -0.5,
        inflow_std: 0.0,
        initial_level: Some(5),
        penalize: false,
        seed: Some(1),
        ..Config::default()
    };
    let mut env = make_env(cfg);
    env.reset(None);
    // round(-0.5) = -1: 5 - 0 - 1 = 4.
    assert_eq!(env.step(0).state, 4);
}

#[test]
#[should_panic(expected = "before reset")]
fn step_before_reset_panics() {
    let mut env = make_env(Config::default());
    env.step(3);
}

#[test]
fn invalid_configuration_is_rejected_at_construction() {
    let cfg = Config {
        capacity: 0,
        ..Config::default()
    };
    assert!(DamEnv::new(cfg).is_err());
}
