use cbandits::{
    Algorithm, AlgorithmParams, ArmConfig, CostRewardEnv, Environment, Runner, SimulationResult,
    StopReason, Variant,
};

/// Reward rates 3, 2, 1 at mean cost 1, low noise.
fn three_arms() -> Vec<ArmConfig> {
    [3.0, 2.0, 1.0]
        .iter()
        .map(|&r| ArmConfig::bounded_uniform((0.95, 1.05), (r - 0.05, r + 0.05), 0.3).unwrap())
        .collect()
}

fn episode(variant: Variant, seed: u64) -> SimulationResult {
    let arms = three_arms();
    let mut env = CostRewardEnv::with_seed(arms.clone(), seed).unwrap();
    let mut algo =
        Algorithm::construct(variant, arms.len(), &arms, &AlgorithmParams::default()).unwrap();
    Runner::new(5000.0)
        .unwrap()
        .record_every(250)
        .run(&mut env, &mut algo)
        .unwrap()
}

#[test]
fn every_variant_spends_most_pulls_on_the_best_arm() {
    for variant in Variant::ALL {
        let res = episode(variant, 2024);
        assert_eq!(res.stop_reason, StopReason::BudgetExhausted, "{variant}");
        assert_eq!(res.variant, variant);
        assert!(res.total_cost > 5000.0);
        assert!(res.pull_fraction(0) > 0.5, "{variant}: pulls {:?}", res.pulls);
        assert_eq!(res.most_pulled_arm(), Some(0));
        assert_eq!(res.optimal_reward_rate, 3.0);
    }
}

#[test]
fn regret_growth_flattens_out() {
    for variant in Variant::ALL {
        let res = episode(variant, 99);
        let tr = &res.trajectory;
        assert!(tr.len() >= 8, "{variant}: {} points", tr.len());

        let at = |i: usize| &tr[i];
        let mid = tr.len() / 2;
        let late = tr.len() * 3 / 4;
        let last = tr.len() - 1;
        // Regret is zero at epoch 0.
        let early_rate = at(mid).regret / at(mid).epoch as f64;
        let late_rate =
            (at(last).regret - at(late).regret) / (at(last).epoch - at(late).epoch) as f64;

        assert!(at(last).regret > 0.0, "{variant}");
        assert!(early_rate > 0.0, "{variant}: early {early_rate}");
        assert!(
            late_rate < 0.25 * early_rate,
            "{variant}: early {early_rate} late {late_rate}"
        );
    }
}

#[test]
fn warmup_covers_every_arm_first() {
    let arms = three_arms();
    for variant in Variant::ALL {
        let mut env = CostRewardEnv::with_seed(arms.clone(), 1).unwrap();
        let mut algo =
            Algorithm::construct(variant, 3, &arms, &AlgorithmParams::default()).unwrap();
        let res = Runner::new(2.5).unwrap().run(&mut env, &mut algo).unwrap();
        // Three pulls of cost ~1 cross a budget of 2.5.
        assert_eq!(res.pulls, vec![1, 1, 1], "{variant}");
        assert_eq!(env.optimal_arm(), 0);
    }
}
