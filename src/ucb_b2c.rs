//! UCB-B2C: bounded, correlated costs and rewards with unknown moments.
//!
//! Extends UCB-B2 with an online LMMSE fit of reward on cost. The
//! coefficient `ω̂` is re-fitted from the arm's retained samples on every
//! call and clipped to `[-omega_bar, omega_bar]`; the reward deviation then
//! uses the residual variance `Var̂(R - ω̂X)` and the residual bound
//! `M_Z = M_R + |ω̂| M_X`. With no correlation `ω̂ ≈ 0` and the radius falls
//! back to the UCB-B2 radius.

use tracing::debug;

use crate::config::{AlgorithmParams, ArmConfig, Variant};
use crate::error::Result;
use crate::estimators::{reward_rate, Lmmse};
use crate::policy::{check_arms, BudgetedPolicy};
use crate::state::{fresh_states, is_stable, log_epoch, record_outcome, ArmState, IndexTerms};
use crate::ucb_b2::{bernstein, B2_SCALE};

#[derive(Debug, Clone)]
pub struct UcbB2c {
    params: AlgorithmParams,
    bounds: Vec<(f64, f64)>,
    states: Vec<ArmState>,
}

impl UcbB2c {
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
        debug!(num_arms, omega_bar = params.omega_bar, ?bounds, "ucb-b2c bounds");
        Ok(Self {
            params: *params,
            bounds,
            states: fresh_states(num_arms, true),
        })
    }

    /// Current clipped LMMSE fit for `arm`, if it exists.
    pub fn lmmse(&self, arm: usize) -> Option<Lmmse> {
        let st = self.states.get(arm)?;
        Some(Lmmse::from_samples(
            st.samples().unwrap_or_default(),
            self.params.omega_bar,
        ))
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

        let fit = Lmmse::from_samples(st.samples().unwrap_or_default(), p.omega_bar);
        let (mx, mr) = self.bounds[arm];
        let mz = mr + fit.omega.abs() * mx;
        let a_log = p.alpha * log_n;
        let eps = bernstein(fit.residual_variance, mz, a_log, t);
        let eta = bernstein(m.cost_variance(), mx, a_log, t);

        let radius = if is_stable(eta, theta) {
            B2_SCALE * (eps + (estimate - fit.omega).max(0.0) * eta) / theta
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

impl BudgetedPolicy for UcbB2c {
    fn variant(&self) -> Variant {
        Variant::B2c
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
