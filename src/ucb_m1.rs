//! UCB-M1: heavy-tailed costs and rewards, median-of-means estimation.
//!
//! Only finite second moments (plus a little more) are assumed, so empirical
//! means are replaced by the [`grouped_median`] estimator over the arm's raw
//! samples. The confidence radius still uses the configured second moments,
//! with the larger constants of a median-of-means concentration bound.
//!
//! Each index computation regroups all samples of an arm: O(n) memory and
//! O(n) work per arm and call.

use std::f64::consts::SQRT_2;

use tracing::debug;

use crate::config::{AlgorithmParams, ArmConfig, Variant};
use crate::error::Result;
use crate::estimators::{group_count, grouped_median, Lmmse};
use crate::policy::{check_arms, BudgetedPolicy};
use crate::state::{fresh_states, is_stable, log_epoch, record_outcome, ArmState, IndexTerms};

/// Constant of the median-of-means deviation bound.
const MOM_DEVIATION: f64 = 11.0;

#[derive(Debug, Clone)]
pub struct UcbM1 {
    params: AlgorithmParams,
    known: Vec<Lmmse>,
    cost_variance: Vec<f64>,
    states: Vec<ArmState>,
}

impl UcbM1 {
    pub fn new(
        num_arms: usize,
        arm_configs: &[ArmConfig],
        params: &AlgorithmParams,
    ) -> Result<Self> {
        params.validate()?;
        check_arms(num_arms, arm_configs)?;
        let known: Vec<Lmmse> = arm_configs
            .iter()
            .map(|c| Lmmse::known(c.cost_variance(), c.reward_variance(), c.covariance()))
            .collect();
        debug!(num_arms, ?known, "ucb-m1 known moments");
        Ok(Self {
            params: *params,
            known,
            cost_variance: arm_configs.iter().map(ArmConfig::cost_variance).collect(),
            states: fresh_states(num_arms, true),
        })
    }

    fn terms(&self, arm: usize, st: &ArmState, log_n: f64) -> IndexTerms {
        let p = &self.params;
        let samples = st.samples().unwrap_or_default();
        let groups = group_count(p.alpha, st.pulls());
        let Some(gm) = grouped_median(samples, groups, p.b_min_cost) else {
            return IndexTerms::unexplored(arm);
        };

        let t = st.pulls() as f64;
        let k = self.known[arm];
        let a_log = p.alpha * log_n;
        let eps = MOM_DEVIATION * (a_log * k.residual_variance / t).sqrt();
        let eta = MOM_DEVIATION * (a_log * self.cost_variance[arm] / t).sqrt();
        let theta = gm.mean_cost.max(p.b_min_cost);

        let radius = if is_stable(eta, theta) {
            2.0 * SQRT_2 * (eps + (gm.rate - k.omega).abs() * eta) / theta
        } else {
            f64::INFINITY
        };
        IndexTerms {
            arm,
            pulls: st.pulls(),
            estimate: gm.rate,
            radius,
        }
    }
}

impl BudgetedPolicy for UcbM1 {
    fn variant(&self) -> Variant {
        Variant::M1
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
