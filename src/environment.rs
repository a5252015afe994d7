//! Stochastic `(cost, reward)` environment.
//!
//! Each arm's [`ArmConfig`] is compiled once into an [`ArmSampler`], a
//! `rand_distr::Distribution<(f64, f64)>`. The environment owns one explicit
//! `StdRng`; there is no global RNG, so independently seeded environments
//! can run on separate threads.
//!
//! The true reward rates are known here (this is the regret oracle) but are
//! never handed to an algorithm.

use rand::distr::StandardUniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{ChiSquared, Distribution, StandardNormal};
use serde_json::Value;
use tracing::debug;

use crate::config::{arm_configs_from_json, ArmConfig, Family};
use crate::error::{Error, Result};
use crate::state::argmax_lowest_index;

/// A source of `(cost, reward)` samples, one per pull.
pub trait Environment {
    fn num_arms(&self) -> usize;

    /// Draw one fresh sample from `arm`. Fails with `InvalidArm` if out of range.
    fn pull_arm(&mut self, arm: usize) -> Result<(f64, f64)>;

    /// `mean_reward / mean_cost` per arm.
    fn true_reward_rates(&self) -> Vec<f64>;

    /// Best true reward rate over all arms.
    fn optimal_reward_rate(&self) -> f64 {
        self.true_reward_rates()
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Arm with the best true reward rate (lowest index on ties).
    fn optimal_arm(&self) -> usize {
        argmax_lowest_index(self.true_reward_rates()).unwrap_or(0)
    }
}

/// Lower-triangular factor of a 2x2 covariance matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cholesky2 {
    l11: f64,
    l21: f64,
    l22: f64,
}

impl Cholesky2 {
    fn new(var_x: f64, var_r: f64, cov: f64) -> Self {
        let l11 = var_x.max(0.0).sqrt();
        let l21 = if l11 > 0.0 { cov / l11 } else { 0.0 };
        let l22 = (var_r - l21 * l21).max(0.0).sqrt();
        Self { l11, l21, l22 }
    }

    /// Correlated zero-mean normal pair.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, f64) {
        let z1: f64 = StandardNormal.sample(rng);
        let z2: f64 = StandardNormal.sample(rng);
        (self.l11 * z1, self.l21 * z1 + self.l22 * z2)
    }
}

/// Joint `(cost, reward)` distribution of one arm.
#[derive(Debug, Clone)]
pub enum ArmSampler {
    /// Bivariate normal; no truncation.
    Gaussian { mean: (f64, f64), chol: Cholesky2 },
    /// Uniform marginals, correlation by mixing shared and independent draws.
    BoundedUniform {
        cost: (f64, f64),
        reward: (f64, f64),
        correlation: f64,
    },
    /// Bivariate Student-t rescaled to the configured covariance.
    StudentT {
        mean: (f64, f64),
        chol: Cholesky2,
        degrees_of_freedom: f64,
        chi: ChiSquared<f64>,
    },
}

impl ArmSampler {
    pub fn from_config(cfg: &ArmConfig) -> Result<Self> {
        let chol = || Cholesky2::new(cfg.cost_variance(), cfg.reward_variance(), cfg.covariance());
        let mean = (cfg.mean_cost(), cfg.mean_reward());
        Ok(match cfg.family() {
            Family::IndependentGaussian | Family::CorrelatedGaussian => {
                ArmSampler::Gaussian { mean, chol: chol() }
            }
            Family::BoundedUniform {
                cost_min,
                cost_max,
                reward_min,
                reward_max,
                correlation,
            } => ArmSampler::BoundedUniform {
                cost: (cost_min, cost_max),
                reward: (reward_min, reward_max),
                correlation,
            },
            Family::HeavyTailed { degrees_of_freedom } => ArmSampler::StudentT {
                mean,
                chol: chol(),
                degrees_of_freedom,
                chi: ChiSquared::new(degrees_of_freedom)
                    .map_err(|e| Error::dist(format!("chi-squared({degrees_of_freedom}): {e}")))?,
            },
        })
    }
}

fn uniform_in((lo, hi): (f64, f64), u: f64) -> f64 {
    (lo + u * (hi - lo)).clamp(lo, hi)
}

impl Distribution<(f64, f64)> for ArmSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, f64) {
        match self {
            ArmSampler::Gaussian { mean, chol } => {
                let (zx, zr) = chol.sample(rng);
                (mean.0 + zx, mean.1 + zr)
            }
            ArmSampler::BoundedUniform {
                cost,
                reward,
                correlation,
            } => {
                let coin: f64 = StandardUniform.sample(rng);
                let u: f64 = StandardUniform.sample(rng);
                let v = if coin < correlation.abs() {
                    if *correlation < 0.0 {
                        1.0 - u
                    } else {
                        u
                    }
                } else {
                    StandardUniform.sample(rng)
                };
                (uniform_in(*cost, u), uniform_in(*reward, v))
            }
            ArmSampler::StudentT {
                mean,
                chol,
                degrees_of_freedom,
                chi,
            } => {
                // t = z * sqrt(nu / w) has covariance nu / (nu - 2) * Sigma.
                let w = chi.sample(rng).max(f64::MIN_POSITIVE);
                let scale = ((degrees_of_freedom - 2.0) / w).sqrt();
                let (zx, zr) = chol.sample(rng);
                (mean.0 + scale * zx, mean.1 + scale * zr)
            }
        }
    }
}

/// Environment over a fixed set of configured arms.
#[derive(Debug, Clone)]
pub struct CostRewardEnv {
    configs: Vec<ArmConfig>,
    samplers: Vec<ArmSampler>,
    initial_rng: StdRng,
    rng: StdRng,
}

impl CostRewardEnv {
    /// Seed 0.
    pub fn new(arm_configs: Vec<ArmConfig>) -> Result<Self> {
        Self::with_seed(arm_configs, 0)
    }

    pub fn with_seed(arm_configs: Vec<ArmConfig>, seed: u64) -> Result<Self> {
        Self::with_rng(arm_configs, StdRng::seed_from_u64(seed))
    }

    /// Take ownership of an already-initialized RNG stream.
    pub fn with_rng(arm_configs: Vec<ArmConfig>, rng: StdRng) -> Result<Self> {
        if arm_configs.is_empty() {
            return Err(Error::NoArms);
        }
        let samplers = arm_configs
            .iter()
            .map(|c| {
                c.validate()?;
                ArmSampler::from_config(c)
            })
            .collect::<Result<Vec<_>>>()?;
        let env = Self {
            configs: arm_configs,
            samplers,
            initial_rng: rng.clone(),
            rng,
        };
        debug!(
            num_arms = env.configs.len(),
            optimal_arm = env.optimal_arm(),
            optimal_rate = env.optimal_reward_rate(),
            "environment ready"
        );
        Ok(env)
    }

    /// Parse an array of arm dictionaries and seed the RNG.
    pub fn from_json(arm_configs: &Value, seed: u64) -> Result<Self> {
        Self::with_seed(arm_configs_from_json(arm_configs)?, seed)
    }

    pub fn arm_configs(&self) -> &[ArmConfig] {
        &self.configs
    }

    /// Expected per-pull cost of the optimal arm.
    pub fn optimal_arm_expected_cost(&self) -> f64 {
        self.configs[self.optimal_arm()].mean_cost()
    }

    /// Rewind the RNG to its construction state; later pulls repeat exactly.
    pub fn reset(&mut self) {
        self.rng = self.initial_rng.clone();
    }
}

impl Environment for CostRewardEnv {
    fn num_arms(&self) -> usize {
        self.samplers.len()
    }

    fn pull_arm(&mut self, arm: usize) -> Result<(f64, f64)> {
        let num_arms = self.samplers.len();
        let sampler = self
            .samplers
            .get(arm)
            .ok_or(Error::InvalidArm { arm, num_arms })?;
        Ok(sampler.sample(&mut self.rng))
    }

    fn true_reward_rates(&self) -> Vec<f64> {
        self.configs.iter().map(ArmConfig::reward_rate).collect()
    }
}
