//! Per-arm runtime state and the warm-up / steady-state selection skeleton
//! shared by every UCB variant.

use crate::error::{Error, Result};
use crate::estimators::RunningMoments;

/// Stability factor λ: an arm's cost deviation `η` must stay below
/// `θ (λ - 1) / λ` for its confidence radius to be finite.
pub const STABILITY_LAMBDA: f64 = 1.28;

/// Bookkeeping for one arm, owned by exactly one algorithm instance.
///
/// Holds the pull count and running moments; optionally retains every raw
/// `(cost, reward)` sample in arrival order for estimators that need to
/// regroup or re-fit on each call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ArmState {
    moments: RunningMoments,
    samples: Option<Vec<(f64, f64)>>,
}

impl ArmState {
    pub fn new(retain_samples: bool) -> Self {
        Self {
            moments: RunningMoments::new(),
            samples: retain_samples.then(Vec::new),
        }
    }

    /// `n_k`: number of times this arm has been pulled.
    pub fn pulls(&self) -> u64 {
        self.moments.count()
    }

    pub fn moments(&self) -> &RunningMoments {
        &self.moments
    }

    /// Raw samples in arrival order, if this state retains them.
    pub fn samples(&self) -> Option<&[(f64, f64)]> {
        self.samples.as_deref()
    }

    pub fn record(&mut self, cost: f64, reward: f64) {
        self.moments.push(cost, reward);
        if let Some(s) = self.samples.as_mut() {
            s.push((cost, reward));
        }
    }

    pub fn clear(&mut self) {
        self.moments = RunningMoments::new();
        if let Some(s) = self.samples.as_mut() {
            s.clear();
        }
    }
}

/// Allocate `num_arms` fresh states.
pub(crate) fn fresh_states(num_arms: usize, retain_samples: bool) -> Vec<ArmState> {
    (0..num_arms)
        .map(|_| ArmState::new(retain_samples))
        .collect()
}

/// Record an outcome, rejecting out-of-range arms.
pub(crate) fn record_outcome(
    states: &mut [ArmState],
    arm: usize,
    cost: f64,
    reward: f64,
) -> Result<()> {
    let num_arms = states.len();
    let st = states
        .get_mut(arm)
        .ok_or(Error::InvalidArm { arm, num_arms })?;
    st.record(cost, reward);
    Ok(())
}

/// One arm's UCB index, split into its parts.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IndexTerms {
    pub arm: usize,
    pub pulls: u64,
    /// Reward-rate point estimate.
    pub estimate: f64,
    /// Confidence radius; `+inf` when the arm is unpulled or unstable.
    pub radius: f64,
}

impl IndexTerms {
    pub fn index(&self) -> f64 {
        self.estimate + self.radius
    }

    /// Terms for an arm with no data yet.
    pub(crate) fn unexplored(arm: usize) -> Self {
        Self {
            arm,
            pulls: 0,
            estimate: 0.0,
            radius: f64::INFINITY,
        }
    }
}

/// `ln(epoch)`, with `epoch` clamped to at least 1.
pub(crate) fn log_epoch(epoch: u64) -> f64 {
    (epoch.max(1) as f64).ln()
}

/// Whether deviation `eta` leaves the cost estimate `theta` safely positive.
pub(crate) fn is_stable(eta: f64, theta: f64) -> bool {
    eta.is_finite() && eta < theta * (STABILITY_LAMBDA - 1.0) / STABILITY_LAMBDA
}

/// Warm-up phase: the lowest-index arm that has never been pulled.
pub fn warmup_arm(states: &[ArmState]) -> Option<usize> {
    states.iter().position(|s| s.pulls() == 0)
}

/// Index of the maximum value; ties go to the lowest index.
///
/// NaN never wins (it compares below everything, including `-inf`).
pub fn argmax_lowest_index<I>(values: I) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.into_iter().enumerate() {
        if v.is_nan() {
            if best.is_none() {
                best = Some((i, f64::NEG_INFINITY));
            }
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Shared two-phase control skeleton.
///
/// Warm-up pulls each unpulled arm in index order; afterwards the arm with
/// the largest index wins.
pub(crate) fn select_ucb<F>(states: &[ArmState], terms: F) -> usize
where
    F: FnOnce() -> Vec<IndexTerms>,
{
    if let Some(arm) = warmup_arm(states) {
        return arm;
    }
    let terms = terms();
    argmax_lowest_index(terms.iter().map(IndexTerms::index))
        .map(|i| terms[i].arm)
        .unwrap_or(0)
}
