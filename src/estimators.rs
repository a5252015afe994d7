//! Estimator library: running moments, LMMSE, grouped-median rates.
//!
//! Everything here is deterministic: the same sample sequence produces
//! bit-identical outputs, with no hidden global state.

/// Cost variance below this is treated as zero when forming `cov / var`.
pub const VARIANCE_EPS: f64 = 1e-9;

/// Empirical first and second moments of a `(cost, reward)` stream.
///
/// Updated in O(1) per sample (Welford's update with a co-moment term).
/// Variances and covariance use Bessel's correction once `count >= 2`
/// and report `0.0` before that.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RunningMoments {
    count: u64,
    mean_cost: f64,
    mean_reward: f64,
    m2_cost: f64,
    m2_reward: f64,
    co_moment: f64,
}

impl RunningMoments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a whole sample slice, in order.
    pub fn from_samples(samples: &[(f64, f64)]) -> Self {
        let mut m = Self::new();
        for &(x, r) in samples {
            m.push(x, r);
        }
        m
    }

    pub fn push(&mut self, cost: f64, reward: f64) {
        self.count += 1;
        let n = self.count as f64;
        let dx = cost - self.mean_cost;
        let dr = reward - self.mean_reward;
        self.mean_cost += dx / n;
        self.mean_reward += dr / n;
        self.m2_cost += dx * (cost - self.mean_cost);
        self.m2_reward += dr * (reward - self.mean_reward);
        self.co_moment += dx * (reward - self.mean_reward);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Empirical mean cost (`0.0` when empty).
    pub fn mean_cost(&self) -> f64 {
        self.mean_cost
    }

    /// Empirical mean reward (`0.0` when empty).
    pub fn mean_reward(&self) -> f64 {
        self.mean_reward
    }

    pub fn sum_cost(&self) -> f64 {
        self.mean_cost * self.count as f64
    }

    pub fn sum_reward(&self) -> f64 {
        self.mean_reward * self.count as f64
    }

    pub fn cost_variance(&self) -> f64 {
        self.bessel(self.m2_cost).max(0.0)
    }

    pub fn reward_variance(&self) -> f64 {
        self.bessel(self.m2_reward).max(0.0)
    }

    pub fn covariance(&self) -> f64 {
        self.bessel(self.co_moment)
    }

    fn bessel(&self, sum: f64) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            sum / (self.count - 1) as f64
        }
    }
}

/// Reward-rate point estimate `max(0, mean_reward) / max(b_min_cost, mean_cost)`.
pub fn reward_rate(mean_reward: f64, mean_cost: f64, b_min_cost: f64) -> f64 {
    mean_reward.max(0.0) / mean_cost.max(b_min_cost)
}

/// Linear MMSE predictor of reward from cost: `R ≈ omega * X`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Lmmse {
    /// `cov(X, R) / var(X)`, optionally clipped.
    pub omega: f64,
    /// `Var(R - omega * X)`, never negative.
    pub residual_variance: f64,
}

impl Lmmse {
    /// From second moments. `clip` bounds `|omega|` when present.
    ///
    /// A (near-)constant cost gives `omega = 0`, so the residual variance
    /// is simply the reward variance.
    pub fn from_second_moments(
        cost_variance: f64,
        reward_variance: f64,
        covariance: f64,
        clip: Option<f64>,
    ) -> Self {
        let mut omega = if cost_variance > VARIANCE_EPS {
            covariance / cost_variance
        } else {
            0.0
        };
        if !omega.is_finite() {
            omega = 0.0;
        }
        if let Some(bar) = clip {
            let bar = bar.abs();
            omega = omega.clamp(-bar, bar);
        }
        let residual = reward_variance + omega * omega * cost_variance - 2.0 * omega * covariance;
        Self {
            omega,
            residual_variance: residual.max(0.0),
        }
    }

    /// From configured (known) moments, unclipped.
    pub fn known(cost_variance: f64, reward_variance: f64, covariance: f64) -> Self {
        Self::from_second_moments(cost_variance, reward_variance, covariance, None)
    }

    /// Two-pass estimate over raw samples, clipped to `[-omega_bar, omega_bar]`.
    pub fn from_samples(samples: &[(f64, f64)], omega_bar: f64) -> Self {
        let n = samples.len();
        if n < 2 {
            return Self::degenerate();
        }
        let nf = n as f64;
        let (sx, sr) = samples
            .iter()
            .fold((0.0, 0.0), |(sx, sr), &(x, r)| (sx + x, sr + r));
        let (mx, mr) = (sx / nf, sr / nf);
        let (mut sxx, mut srr, mut sxr) = (0.0, 0.0, 0.0);
        for &(x, r) in samples {
            let dx = x - mx;
            let dr = r - mr;
            sxx += dx * dx;
            srr += dr * dr;
            sxr += dx * dr;
        }
        let d = nf - 1.0;
        Self::from_second_moments(sxx / d, srr / d, sxr / d, Some(omega_bar))
    }

    fn degenerate() -> Self {
        Self {
            omega: 0.0,
            residual_variance: 0.0,
        }
    }
}

/// Number of median-of-means groups for `n` samples: `floor(3.5 * alpha * ln n) + 1`.
pub fn group_count(alpha: f64, n: u64) -> usize {
    if n <= 1 {
        return 1;
    }
    let m = (3.5 * alpha * (n as f64).ln()).floor();
    if m.is_finite() && m > 0.0 {
        m as usize + 1
    } else {
        1
    }
}

/// Median (mean of the two middle values for even length). `None` if empty.
///
/// Sorts `values` in place using IEEE total order.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some(0.5 * (values[mid - 1] + values[mid]))
    }
}

/// Output of [`grouped_median`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GroupedMedian {
    /// Number of groups actually used (`<= samples.len()`).
    pub groups: usize,
    /// Median of per-group reward rates.
    pub rate: f64,
    /// Median of per-group mean costs.
    pub mean_cost: f64,
}

/// Median-of-group-means reward-rate estimate.
///
/// Splits `samples` (in arrival order) into `groups` contiguous groups whose
/// sizes differ by at most one, computes
/// `max(0, mean_reward) / max(b_min_cost, mean_cost)` in each, and returns the
/// median rate together with the median group mean cost. `groups` is capped
/// at `samples.len()` so no group is empty.
pub fn grouped_median(
    samples: &[(f64, f64)],
    groups: usize,
    b_min_cost: f64,
) -> Option<GroupedMedian> {
    let n = samples.len();
    if n == 0 {
        return None;
    }
    let m = groups.clamp(1, n);
    let base = n / m;
    let extra = n % m;

    let mut rates = Vec::with_capacity(m);
    let mut costs = Vec::with_capacity(m);
    let mut start = 0;
    for j in 0..m {
        let len = base + usize::from(j < extra);
        let group = &samples[start..start + len];
        start += len;
        let g = RunningMoments::from_samples(group);
        rates.push(reward_rate(g.mean_reward(), g.mean_cost(), b_min_cost));
        costs.push(g.mean_cost());
    }

    Some(GroupedMedian {
        groups: m,
        rate: median(&mut rates)?,
        mean_cost: median(&mut costs)?,
    })
}
