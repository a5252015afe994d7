//! UCB-B2: bounded, uncorrelated costs and rewards with unknown moments.
//!
//! Variances are estimated online from running moments (no raw-sample
//! retention). The radius is Bernstein-style: an empirical-variance term
//! plus a worst-case `3 M log(n^α) / T` term from the arm's magnitude bounds.
//! Cost and reward are assumed uncorrelated; no covariance enters the bound.

use tracing::debug;

use crate::config::{AlgorithmParams, ArmConfig, Variant};
use crate::error::Result;
use crate::estimators::reward_rate;
use crate::policy::{check_arms, BudgetedPolicy};
use crate::state::{fresh_states, is_stable, log_epoch, record_outcome, ArmState, IndexTerms};

/// Confidence multiplier on the B2 / B2C radius.
pub(crate) const B2_SCALE: f64 = 1.4;

/// Empirical-Bernstein deviation `sqrt(2 V a / T) + 3 M a / T`.
pub(crate) fn bernstein(variance: f64, bound: f64, a_log: f64, t: f64) -> f64 {
    (2.0 * variance.max(0.0) * a_log / t).sqrt() + 3.0 * bound * a_log / t
}

#[derive(Debug, Clone)]
pub struct UcbB2 {
    params: AlgorithmParams,
    bounds: Vec<(f64, f64)>,
    states: Vec<ArmState>,
}

impl UcbB2 {
    /// Every arm must carry `(cost_bound, reward_bound)`.
    pub fn new(
        num_arms: usize,
        arm_configs: &[ArmConfig],
        params: &AlgorithmParams,
    ) -> Result<Self> {
        params.validate()?;
        check_arms(num_arms, arm_configs)?;
        let bounds = arm_configs
            .iter()
            .map(ArmConfig::require_bounds)
            .collect::<Result<Vec<_>>>()?;
        debug!(num_arms, ?bounds, "ucb-b2 bounds");
        Ok(Self {
            params: *params,
            bounds,
            states: fresh_states(num_arms, false),
        })
    }

    fn terms(&self, arm: usize, st: &ArmState, log_n: f64) -> IndexTerms {
        if st.pulls() == 0 {
            return IndexTerms::unexplored(arm);
        }
        let p = &self.params;
        let t = st.pulls() as f64;
        let m = st.moments();
        let estimate = reward_rate(m.mean_reward(), m.mean_cost(), p.b_min_cost);
        let theta = m.mean_cost().max(p.b_min_cost);

        let (mx, mr) = self.bounds[arm];
        let a_log = p.alpha * log_n;
        let eps = bernstein(m.reward_variance(), mr, a_log, t);
        let eta = bernstein(m.cost_variance(), mx, a_log, t);

        let radius = if is_stable(eta, theta) {
            B2_SCALE * (eps + estimate * eta) / theta
        } else {
            f64::INFINITY
        };
        IndexTerms {
            arm,
            pulls: st.pulls(),
            estimate,
            radius,
        }
    }
}

impl BudgetedPolicy for UcbB2 {
    fn variant(&self) -> Variant {
        Variant::B2
    }

    fn arm_states(&self) -> &[ArmState] {
        &self.states
    }

    fn index_terms(&self, epoch: u64) -> Vec<IndexTerms> {
        let log_n = log_epoch(epoch);
        self.states
            .iter()
            .enumerate()
            .map(|(k, st)| self.terms(k, st, log_n))
            .collect()
    }

    fn update_state(&mut self, arm: usize, cost: f64, reward: f64) -> Result<()> {
        record_outcome(&mut self.states, arm, cost, reward)
    }

    fn reset(&mut self) {
        self.states.iter_mut().for_each(ArmState::clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::testing::assert_radius_shrinks;
    use crate::Error;

    fn arms() -> Vec<ArmConfig> {
        vec![
            ArmConfig::bounded_uniform((0.5, 1.5), (1.0, 3.0), 0.0).unwrap(),
            ArmConfig::bounded_uniform((0.8, 1.8), (1.2, 2.5), 0.0).unwrap(),
        ]
    }

    #[test]
    fn requires_bounds() {
        let gauss = vec![ArmConfig::independent_gaussian(1.0, 2.0, 0.1, 0.1).unwrap()];
        assert_eq!(
            UcbB2::new(1, &gauss, &AlgorithmParams::default()).unwrap_err(),
            Error::MissingParameter("cost_bound".to_string())
        );
        let bounded = vec![gauss[0].clone().with_bounds(5.0, 5.0).unwrap()];
        assert!(UcbB2::new(1, &bounded, &AlgorithmParams::default()).is_ok());
    }

    #[test]
    fn update_state_tracks_squares() {
        let mut a = UcbB2::new(2, &arms(), &AlgorithmParams::default()).unwrap();
        a.update_state(0, 2.0, 4.0).unwrap();
        a.update_state(0, 4.0, 8.0).unwrap();
        let m = a.arm_states()[0].moments();
        assert_eq!(m.sum_cost(), 6.0);
        assert_eq!(m.sum_reward(), 12.0);
        assert_eq!(m.cost_variance(), 2.0);
        assert_eq!(m.reward_variance(), 8.0);
    }

    #[test]
    fn zero_variance_arm_keeps_finite_radius() {
        let mut a = UcbB2::new(2, &arms(), &AlgorithmParams::default()).unwrap();
        for _ in 0..2_000 {
            a.update_state(0, 1.0, 2.0).unwrap();
        }
        a.update_state(1, 1.0, 2.0).unwrap();
        let t = a.index_terms(2_001)[0];
        assert!(t.radius.is_finite() && t.radius > 0.0);
        assert!((t.estimate - 2.0).abs() < 1e-12);
    }

    #[test]
    fn radius_shrinks_with_more_pulls() {
        let mut a = UcbB2::new(2, &arms(), &AlgorithmParams::default()).unwrap();
        a.update_state(1, 1.0, 1.0).unwrap();
        let mut prev = f64::INFINITY;
        for _ in 0..1_000 {
            a.update_state(0, 1.0, 2.0).unwrap();
            let r = a.index_terms(2_000)[0].radius;
            assert!(r <= prev + 1e-12, "radius grew: {prev} -> {r}");
            prev = r;
        }
        assert!(prev.is_finite());
    }

    #[test]
    fn radius_shrinks_on_sampled_outcomes() {
        let arms = arms();
        let a = UcbB2::new(2, &arms, &AlgorithmParams::default()).unwrap();
        assert_radius_shrinks(a, &arms, 13);
    }
}
