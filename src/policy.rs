//! The `BudgetedPolicy` interface and tagged dispatch over the four variants.
//!
//! Every variant shares the same two-phase skeleton (warm-up, then argmax)
//! and differs only in how it computes [`IndexTerms`]; so `select_arm` is a
//! provided method and implementors supply `index_terms`.

use serde_json::Value;
use tracing::debug;

use crate::config::{AlgorithmParams, ArmConfig, Variant};
use crate::error::{Error, Result};
use crate::state::{select_ucb, ArmState, IndexTerms};
use crate::{UcbB1, UcbB2, UcbB2c, UcbM1};

/// Common interface for budget-constrained arm-selection algorithms.
///
/// # Example
///
/// ```rust
/// use cbandits::{Algorithm, AlgorithmParams, ArmConfig, BudgetedPolicy, Variant};
///
/// let arms = vec![
///     ArmConfig::bounded_uniform((0.5, 1.5), (1.0, 3.0), 0.0).unwrap(),
///     ArmConfig::bounded_uniform((0.5, 1.5), (0.0, 1.0), 0.0).unwrap(),
/// ];
/// let mut algo =
///     Algorithm::construct(Variant::B2, 2, &arms, &AlgorithmParams::default()).unwrap();
/// assert_eq!(algo.select_arm(0.0, 1), 0);
/// algo.update_state(0, 1.0, 2.0).unwrap();
/// assert_eq!(algo.select_arm(1.0, 2), 1);
/// ```
pub trait BudgetedPolicy {
    fn variant(&self) -> Variant;

    fn num_arms(&self) -> usize {
        self.arm_states().len()
    }

    /// Read-only view of the per-arm state.
    fn arm_states(&self) -> &[ArmState];

    /// Per-arm index decomposition at `epoch` (1-based).
    fn index_terms(&self, epoch: u64) -> Vec<IndexTerms>;

    /// Choose the arm to pull at `epoch` (1-based).
    ///
    /// Pure in the current state: unpulled arms first (lowest index), then
    /// the maximal index with ties to the lowest arm.
    fn select_arm(&self, _current_total_cost: f64, epoch: u64) -> usize {
        select_ucb(self.arm_states(), || self.index_terms(epoch))
    }

    /// Feed back the realized outcome of pulling `arm`.
    fn update_state(&mut self, arm: usize, cost: f64, reward: f64) -> Result<()>;

    /// Forget everything learned; equivalent to a fresh construction.
    fn reset(&mut self);
}

/// Check the `(num_arms, arm_configs)` pair handed to a constructor.
pub(crate) fn check_arms(num_arms: usize, arm_configs: &[ArmConfig]) -> Result<()> {
    if num_arms == 0 {
        return Err(Error::NoArms);
    }
    if arm_configs.len() != num_arms {
        return Err(Error::ArmCountMismatch {
            expected: num_arms,
            got: arm_configs.len(),
        });
    }
    for cfg in arm_configs {
        cfg.validate()?;
    }
    Ok(())
}

/// One of the four variants, selected at runtime.
#[derive(Debug, Clone)]
pub enum Algorithm {
    B1(UcbB1),
    M1(UcbM1),
    B2(UcbB2),
    B2c(UcbB2c),
}

impl Algorithm {
    /// `construct(num_arms, arm_configs, params)` for the chosen variant.
    pub fn construct(
        variant: Variant,
        num_arms: usize,
        arm_configs: &[ArmConfig],
        params: &AlgorithmParams,
    ) -> Result<Self> {
        let algo = match variant {
            Variant::B1 => Algorithm::B1(UcbB1::new(num_arms, arm_configs, params)?),
            Variant::M1 => Algorithm::M1(UcbM1::new(num_arms, arm_configs, params)?),
            Variant::B2 => Algorithm::B2(UcbB2::new(num_arms, arm_configs, params)?),
            Variant::B2c => Algorithm::B2c(UcbB2c::new(num_arms, arm_configs, params)?),
        };
        debug!(variant = %variant, num_arms, ?params, "constructed algorithm");
        Ok(algo)
    }

    /// Like [`Self::construct`], with parameters given as a dictionary.
    pub fn from_json(
        variant: Variant,
        num_arms: usize,
        arm_configs: &[ArmConfig],
        params: &Value,
    ) -> Result<Self> {
        let params = AlgorithmParams::from_json(variant, params)?;
        Self::construct(variant, num_arms, arm_configs, &params)
    }

    fn inner(&self) -> &dyn BudgetedPolicy {
        match self {
            Algorithm::B1(a) => a,
            Algorithm::M1(a) => a,
            Algorithm::B2(a) => a,
            Algorithm::B2c(a) => a,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn BudgetedPolicy {
        match self {
            Algorithm::B1(a) => a,
            Algorithm::M1(a) => a,
            Algorithm::B2(a) => a,
            Algorithm::B2c(a) => a,
        }
    }
}

impl BudgetedPolicy for Algorithm {
    fn variant(&self) -> Variant {
        self.inner().variant()
    }

    fn arm_states(&self) -> &[ArmState] {
        self.inner().arm_states()
    }

    fn index_terms(&self, epoch: u64) -> Vec<IndexTerms> {
        self.inner().index_terms(epoch)
    }

    fn select_arm(&self, current_total_cost: f64, epoch: u64) -> usize {
        self.inner().select_arm(current_total_cost, epoch)
    }

    fn update_state(&mut self, arm: usize, cost: f64, reward: f64) -> Result<()> {
        self.inner_mut().update_state(arm, cost, reward)
    }

    fn reset(&mut self) {
        self.inner_mut().reset()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::BudgetedPolicy;
    use crate::{ArmConfig, CostRewardEnv, Environment};

    /// Feed arm 0 sampled outcomes and check that, at a fixed epoch, its
    /// radius drops by at least a quarter each time its pull count quadruples.
    pub(crate) fn assert_radius_shrinks<P: BudgetedPolicy>(
        mut algo: P,
        arms: &[ArmConfig],
        seed: u64,
    ) {
        let mut env = CostRewardEnv::with_seed(arms.to_vec(), seed).unwrap();
        let (x, r) = env.pull_arm(1).unwrap();
        algo.update_state(1, x, r).unwrap();
        let variant = algo.variant();
        let mut prev = f64::INFINITY;
        for n in [800, 3_200, 12_800] {
            while algo.arm_states()[0].pulls() < n {
                let (x, r) = env.pull_arm(0).unwrap();
                algo.update_state(0, x, r).unwrap();
            }
            let radius = algo.index_terms(20_000)[0].radius;
            assert!(radius.is_finite(), "{variant}: n={n} radius {radius}");
            assert!(radius < 0.75 * prev, "{variant}: n={n} {prev} -> {radius}");
            prev = radius;
        }
    }
}
