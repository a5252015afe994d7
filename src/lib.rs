//! `cbandits`: budget-constrained multi-armed bandits with random costs.
//!
//! Designed for "spend a budget" problems: every pull of an arm yields a
//! random **cost** and a random **reward**, drawn jointly from that arm's
//! distribution, and an episode runs until cumulative cost exceeds a fixed
//! budget `B`.  The goal is to maximize total reward, which asymptotically
//! means finding the arm with the best **reward rate** `E[R] / E[X]` and
//! spending the budget there.
//!
//! Performance is measured by regret against the best fixed arm:
//!
//! ```text
//!   regret = B * max_k (E[R_k] / E[X_k]) - total_reward
//! ```
//!
//! **Goals:**
//! - **Deterministic by default**: same seed + config → same episode, bit for bit.
//! - **Correlation aware**: cost and reward are often correlated; the
//!   LMMSE-based variants turn that correlation into tighter confidence bounds.
//! - **Explicit randomness**: the only RNG lives in the environment and is
//!   owned by it, so Monte Carlo repetitions parallelize without coordination.
//!
//! **Selection policies** (all implement [`BudgetedPolicy`]):
//! - [`UcbB1`]: known second moments, correlated sub-Gaussian arms.
//! - [`UcbM1`]: heavy-tailed arms, median-of-means estimation.
//! - [`UcbB2`]: bounded arms, empirical Bernstein bounds.
//! - [`UcbB2c`]: bounded, correlated arms, online LMMSE fit.
//! - [`Algorithm`]: tagged dispatch over the four, chosen by [`Variant`].
//!
//! **Simulation:**
//! - [`CostRewardEnv`] / [`ArmSampler`]: seeded joint `(cost, reward)` sampling
//!   for Gaussian, bounded-uniform and Student-t arms.
//! - [`Runner`] / [`run`]: one budgeted episode → [`SimulationResult`].
//! - [`Runner::monte_carlo`]: independently seeded repetitions → [`MonteCarloSummary`].
//! - [`Runner::sweep_budgets`]: the same over a list of budgets (regret versus budget).
//!
//! **Non-goals:**
//! - No plotting, CLI, or result persistence; with the `serde` feature (on by
//!   default) [`SimulationResult`] is `Serialize` and the rest is the caller's
//!   business.
//! - Non-stationary arms and contextual features are out of scope.
//!
//! # Example
//!
//! ```rust
//! use cbandits::{Algorithm, AlgorithmParams, ArmConfig, CostRewardEnv, Runner, Variant};
//!
//! let arms = vec![
//!     ArmConfig::bounded_uniform((0.9, 1.1), (2.8, 3.2), 0.5).unwrap(),
//!     ArmConfig::bounded_uniform((0.9, 1.1), (0.8, 1.2), 0.5).unwrap(),
//! ];
//! let mut env = CostRewardEnv::with_seed(arms.clone(), 7).unwrap();
//! let mut algo =
//!     Algorithm::construct(Variant::B2c, 2, &arms, &AlgorithmParams::default()).unwrap();
//!
//! let result = Runner::new(2000.0).unwrap().run(&mut env, &mut algo).unwrap();
//! assert!(result.total_cost > 2000.0);
//! assert!(result.pulls[0] > result.pulls[1]);
//! ```
//!
//! # The index
//!
//! Every variant shares one control skeleton: a warm-up that pulls each arm
//! once in index order, then the arm maximizing
//!
//! ```text
//!   index_k = r̂_k + radius_k
//! ```
//!
//! where `r̂_k = max(0, R̄_k) / max(b_min_cost, X̄_k)` is the reward-rate point
//! estimate and `radius_k` is a confidence radius on the ratio.  Ties go to the
//! lowest arm index.  The radius is built from two deviations, `ε` on the
//! reward side and `η` on the cost side, combined as
//!
//! ```text
//!   radius ≈ c * (ε + |r̂ - ω| * η) / θ
//! ```
//!
//! with `θ` the cost estimate and `ω` the LMMSE slope of reward on cost.  When
//! `η` is too large relative to `θ` the ratio is unstable (the cost estimate
//! could be near zero), and the radius is `+∞`: the arm is forced.
//!
//! ## Why correlation helps
//!
//! The ratio error `r̂ - r` is driven by `(R̄ - μ_R) - r (X̄ - μ_X)`.  Writing
//! `R = ωX + Z` with `ω = cov(X, R) / var(X)` splits the reward noise into a
//! part that moves with cost and an uncorrelated residual `Z`.  Only
//! `Var(Z) = Var(R) - ω² Var(X)` has to be paid for on the reward side, and the
//! cost side is weighted by `|r - ω|` instead of `r`.  With strongly correlated
//! arms this is a large saving; with `ω = 0` it is exactly the uncorrelated
//! bound.
//!
//! ## Related work
//!
//! - **Budgeted bandits with random costs.** Budget-UCB (Xia et al., IJCAI
//!   2015) introduced the random-cost setting; the Bernstein structure of
//!   [`UcbB2`] follows that line.
//! - **Correlated and heavy-tailed costs.** Cayci, Eryilmaz & Srikant
//!   (AISTATS 2020) analyze budget-constrained bandits with general cost and
//!   reward distributions; [`UcbB1`] and [`UcbM1`] follow their known-moment
//!   and median-of-means constructions.
//! - **Median of means.** Bubeck, Cesa-Bianchi & Lugosi, "Bandits with heavy
//!   tail" (2013), for UCB on top of robust mean estimators.

#![forbid(unsafe_code)]

mod error;
pub use error::*;

mod config;
pub use config::*;

mod estimators;
pub use estimators::*;

mod state;
pub use state::*;

mod policy;
pub use policy::*;

mod ucb_b1;
pub use ucb_b1::*;

mod ucb_m1;
pub use ucb_m1::*;

mod ucb_b2;
pub use ucb_b2::*;

mod ucb_b2c;
pub use ucb_b2c::*;

mod environment;
pub use environment::*;

mod runner;
pub use runner::*;
