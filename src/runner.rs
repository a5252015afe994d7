//! Episode driver: select, pull, update, until the budget is spent.
//!
//! One episode is strictly sequential. Independent episodes share nothing,
//! so [`Runner::monte_carlo`] fans them out across rayon workers when the
//! `parallel` feature is on (results are identical either way).

use tracing::{debug, trace, warn};

use crate::config::Variant;
use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::policy::BudgetedPolicy;

/// Safety cap on epochs, independent of the budget.
pub const DEFAULT_MAX_EPOCHS: u64 = 10_000_000;

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StopReason {
    /// Cumulative cost exceeded the budget.
    BudgetExhausted,
    /// The epoch cap was hit first.
    EpochCap,
}

/// Cumulative totals after some epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TrajectoryPoint {
    pub epoch: u64,
    pub total_cost: f64,
    pub total_reward: f64,
    /// `total_cost * r* - total_reward`: regret against the best arm at equal spend.
    pub regret: f64,
}

/// Outcome of one episode.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimulationResult {
    pub variant: Variant,
    pub budget: f64,
    pub total_cost: f64,
    pub total_reward: f64,
    pub epochs: u64,
    /// Pulls per arm, including absorbed ones.
    pub pulls: Vec<u64>,
    pub optimal_reward_rate: f64,
    /// `budget * r* - total_reward`.
    pub regret: f64,
    pub stop_reason: StopReason,
    /// Pulls whose sample was non-finite and was dropped.
    pub absorbed_samples: u64,
    /// Sampled every `record_every` epochs; the last point is always the final epoch.
    pub trajectory: Vec<TrajectoryPoint>,
}

impl SimulationResult {
    /// Share of all pulls that went to `arm` (0 for an unknown arm).
    pub fn pull_fraction(&self, arm: usize) -> f64 {
        let total: u64 = self.pulls.iter().sum();
        match self.pulls.get(arm) {
            Some(&n) if total > 0 => n as f64 / total as f64,
            _ => 0.0,
        }
    }

    /// Arm with the most pulls (lowest index on ties).
    pub fn most_pulled_arm(&self) -> Option<usize> {
        let max = self.pulls.iter().copied().max()?;
        self.pulls.iter().position(|&n| n == max)
    }
}

/// Aggregate over independently seeded episodes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MonteCarloSummary {
    pub budget: f64,
    pub runs: usize,
    pub mean_reward: f64,
    pub std_reward: f64,
    pub mean_regret: f64,
    pub std_regret: f64,
    pub results: Vec<SimulationResult>,
}

fn mean_std(xs: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let n = xs.clone().count();
    if n == 0 {
        return (0.0, 0.0);
    }
    let nf = n as f64;
    let mean = xs.clone().sum::<f64>() / nf;
    let var = xs.map(|x| (x - mean) * (x - mean)).sum::<f64>() / nf;
    (mean, var.sqrt())
}

/// Budgeted episode configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Runner {
    budget: f64,
    max_epochs: u64,
    record_every: Option<u64>,
}

impl Runner {
    /// Fails with `DegenerateBudget` unless `budget` is finite and `> 0`.
    pub fn new(budget: f64) -> Result<Self> {
        if !(budget.is_finite() && budget > 0.0) {
            return Err(Error::DegenerateBudget(budget));
        }
        Ok(Self {
            budget,
            max_epochs: DEFAULT_MAX_EPOCHS,
            record_every: None,
        })
    }

    pub fn max_epochs(mut self, max_epochs: u64) -> Self {
        self.max_epochs = max_epochs.max(1);
        self
    }

    /// Record a trajectory point every `every` epochs.
    pub fn record_every(mut self, every: u64) -> Self {
        self.record_every = Some(every.max(1));
        self
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    /// Run one episode from the algorithm's current state.
    ///
    /// The pull that crosses the budget is kept. Non-finite samples are
    /// counted as pulls with zero cost and reward and are not fed to the
    /// algorithm.
    pub fn run<E, P>(&self, env: &mut E, algo: &mut P) -> Result<SimulationResult>
    where
        E: Environment + ?Sized,
        P: BudgetedPolicy + ?Sized,
    {
        let num_arms = env.num_arms();
        if num_arms == 0 {
            return Err(Error::NoArms);
        }
        if algo.num_arms() != num_arms {
            return Err(Error::ArmCountMismatch {
                expected: num_arms,
                got: algo.num_arms(),
            });
        }
        let r_star = env.optimal_reward_rate();
        let point = |epoch: u64, total_cost: f64, total_reward: f64| TrajectoryPoint {
            epoch,
            total_cost,
            total_reward,
            regret: total_cost * r_star - total_reward,
        };

        let mut total_cost = 0.0;
        let mut total_reward = 0.0;
        let mut epoch = 0u64;
        let mut pulls = vec![0u64; num_arms];
        let mut absorbed = 0u64;
        let mut trajectory = Vec::new();
        let mut stop_reason = StopReason::BudgetExhausted;

        while total_cost <= self.budget {
            if epoch >= self.max_epochs {
                warn!(epoch, total_cost, budget = self.budget, "epoch cap reached");
                stop_reason = StopReason::EpochCap;
                break;
            }
            epoch += 1;
            let arm = algo.select_arm(total_cost, epoch);
            let (cost, reward) = env.pull_arm(arm)?;
            pulls[arm] += 1;
            if cost.is_finite() && reward.is_finite() {
                algo.update_state(arm, cost, reward)?;
                total_cost += cost;
                total_reward += reward;
            } else {
                warn!(epoch, arm, cost, reward, "non-finite sample absorbed");
                absorbed += 1;
            }
            trace!(epoch, arm, cost, reward, total_cost, "pull");
            if self.record_every.is_some_and(|k| epoch % k == 0) {
                trajectory.push(point(epoch, total_cost, total_reward));
            }
        }
        if trajectory.last().map(|p| p.epoch) != Some(epoch) {
            trajectory.push(point(epoch, total_cost, total_reward));
        }

        let regret = self.budget * r_star - total_reward;
        debug!(
            variant = %algo.variant(),
            epochs = epoch,
            total_cost,
            total_reward,
            regret,
            ?stop_reason,
            "episode done"
        );
        Ok(SimulationResult {
            variant: algo.variant(),
            budget: self.budget,
            total_cost,
            total_reward,
            epochs: epoch,
            pulls,
            optimal_reward_rate: r_star,
            regret,
            stop_reason,
            absorbed_samples: absorbed,
            trajectory,
        })
    }

    /// Run `runs` fresh episodes; episode `i` gets seed `base_seed + i`.
    ///
    /// `make_env` builds the environment for a seed and `make_policy` a fresh
    /// algorithm. Std deviations are population (ddof 0).
    pub fn monte_carlo<E, P, FE, FP>(
        &self,
        runs: usize,
        base_seed: u64,
        make_env: FE,
        make_policy: FP,
    ) -> Result<MonteCarloSummary>
    where
        E: Environment,
        P: BudgetedPolicy,
        FE: Fn(u64) -> Result<E> + Sync,
        FP: Fn() -> Result<P> + Sync,
    {
        if runs == 0 {
            return Err(Error::invalid_param("runs", 0));
        }
        let episode = |i: usize| -> Result<SimulationResult> {
            let mut env = make_env(base_seed.wrapping_add(i as u64))?;
            let mut algo = make_policy()?;
            self.run(&mut env, &mut algo)
        };

        #[cfg(feature = "parallel")]
        let results: Vec<SimulationResult> = {
            use rayon::prelude::*;
            (0..runs)
                .into_par_iter()
                .map(episode)
                .collect::<Result<_>>()?
        };
        #[cfg(not(feature = "parallel"))]
        let results: Vec<SimulationResult> = (0..runs).map(episode).collect::<Result<_>>()?;

        let (mean_reward, std_reward) = mean_std(results.iter().map(|r| r.total_reward));
        let (mean_regret, std_regret) = mean_std(results.iter().map(|r| r.regret));
        debug!(runs, mean_reward, mean_regret, "monte carlo done");
        Ok(MonteCarloSummary {
            budget: self.budget,
            runs,
            mean_reward,
            std_reward,
            mean_regret,
            std_regret,
            results,
        })
    }

    /// [`Self::monte_carlo`] at each budget in turn: the regret-versus-budget
    /// curve of one policy.
    ///
    /// Settings other than the budget come from `self`. Every budget reuses
    /// `base_seed`, so curves of different policies see the same seeds.
    pub fn sweep_budgets<E, P, FE, FP>(
        &self,
        budgets: &[f64],
        runs: usize,
        base_seed: u64,
        make_env: FE,
        make_policy: FP,
    ) -> Result<Vec<MonteCarloSummary>>
    where
        E: Environment,
        P: BudgetedPolicy,
        FE: Fn(u64) -> Result<E> + Sync,
        FP: Fn() -> Result<P> + Sync,
    {
        if budgets.is_empty() {
            return Err(Error::invalid_param("budgets", "[]"));
        }
        budgets
            .iter()
            .map(|&budget| {
                let runner = Runner {
                    budget: Runner::new(budget)?.budget,
                    ..*self
                };
                runner.monte_carlo(runs, base_seed, &make_env, &make_policy)
            })
            .collect()
    }
}

/// One episode with default settings.
pub fn run<E, P>(env: &mut E, algo: &mut P, budget: f64) -> Result<SimulationResult>
where
    E: Environment + ?Sized,
    P: BudgetedPolicy + ?Sized,
{
    Runner::new(budget)?.run(env, algo)
}
