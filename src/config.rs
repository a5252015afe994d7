//! Arm descriptions and algorithm parameters.
//!
//! Both can be built programmatically (validated constructors) or from a
//! JSON-like dictionary (`serde_json::Value`), which is the shape external
//! collaborators (CLIs, config files) hand over. Dictionary parsing ignores
//! keys it does not recognize and fails fast with
//! [`Error::MissingParameter`] when a required key is absent.

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Relative slack allowed when checking `|cov| <= sqrt(var_x * var_r)`.
const COV_SLACK: f64 = 1e-9;

/// Distribution family of one arm's joint `(cost, reward)` draw.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Family {
    /// Bivariate normal with zero covariance.
    IndependentGaussian,
    /// Bivariate normal with the configured covariance.
    CorrelatedGaussian,
    /// Uniform marginals on `[min, max]`, mixed to reach Pearson correlation `correlation`.
    BoundedUniform {
        cost_min: f64,
        cost_max: f64,
        reward_min: f64,
        reward_max: f64,
        correlation: f64,
    },
    /// Bivariate Student-t with `degrees_of_freedom > 2`, scaled to the configured moments.
    HeavyTailed { degrees_of_freedom: f64 },
}

/// Immutable description of one arm.
///
/// Every constructor validates: mean cost must be `> 0`, variances `>= 0`,
/// and the covariance must describe a valid correlation. The first two
/// moments are always populated, even for families parameterized by ranges,
/// so that known-moment algorithms and the regret oracle can read them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ArmConfig {
    #[cfg_attr(feature = "serde", serde(flatten))]
    family: Family,
    mean_cost: f64,
    mean_reward: f64,
    cost_variance: f64,
    reward_variance: f64,
    covariance: f64,
    cost_bound: Option<f64>,
    reward_bound: Option<f64>,
}

impl ArmConfig {
    /// Bivariate normal arm with uncorrelated cost and reward.
    pub fn independent_gaussian(
        mean_cost: f64,
        mean_reward: f64,
        cost_variance: f64,
        reward_variance: f64,
    ) -> Result<Self> {
        Self::from_parts(
            Family::IndependentGaussian,
            [
                mean_cost,
                mean_reward,
                cost_variance,
                reward_variance,
                0.0,
            ],
            None,
            None,
        )
    }

    /// Bivariate normal arm with covariance `covariance`.
    pub fn correlated_gaussian(
        mean_cost: f64,
        mean_reward: f64,
        cost_variance: f64,
        reward_variance: f64,
        covariance: f64,
    ) -> Result<Self> {
        Self::from_parts(
            Family::CorrelatedGaussian,
            [
                mean_cost,
                mean_reward,
                cost_variance,
                reward_variance,
                covariance,
            ],
            None,
            None,
        )
    }

    /// Bounded arm: cost uniform on `cost_range`, reward uniform on
    /// `reward_range`, Pearson correlation `correlation` in `[-1, 1]`.
    ///
    /// Moments are derived from the ranges. Magnitude bounds default to the
    /// largest absolute endpoint of each range; override with [`Self::with_bounds`].
    pub fn bounded_uniform(
        cost_range: (f64, f64),
        reward_range: (f64, f64),
        correlation: f64,
    ) -> Result<Self> {
        let (cost_min, cost_max) = cost_range;
        let (reward_min, reward_max) = reward_range;
        for (name, v) in [
            ("cost_min", cost_min),
            ("cost_max", cost_max),
            ("reward_min", reward_min),
            ("reward_max", reward_max),
            ("correlation", correlation),
        ] {
            if !v.is_finite() {
                return Err(Error::dist(format!("{name} must be finite, got {v}")));
            }
        }
        if cost_min < 0.0 || cost_max < cost_min {
            return Err(Error::dist(format!(
                "cost range must satisfy 0 <= min <= max, got [{cost_min}, {cost_max}]"
            )));
        }
        if reward_max < reward_min {
            return Err(Error::dist(format!(
                "reward range must satisfy min <= max, got [{reward_min}, {reward_max}]"
            )));
        }
        if correlation.abs() > 1.0 {
            return Err(Error::dist(format!(
                "correlation must lie in [-1, 1], got {correlation}"
            )));
        }
        let cost_width = cost_max - cost_min;
        let reward_width = reward_max - reward_min;
        let cost_variance = cost_width * cost_width / 12.0;
        let reward_variance = reward_width * reward_width / 12.0;
        let moments = [
            0.5 * (cost_min + cost_max),
            0.5 * (reward_min + reward_max),
            cost_variance,
            reward_variance,
            correlation * (cost_variance * reward_variance).sqrt(),
        ];
        Self::from_parts(
            Family::BoundedUniform {
                cost_min,
                cost_max,
                reward_min,
                reward_max,
                correlation,
            },
            moments,
            Some(cost_max.abs().max(cost_min.abs())),
            Some(reward_max.abs().max(reward_min.abs())),
        )
    }

    /// Heavy-tailed arm: bivariate Student-t with `degrees_of_freedom > 2`
    /// and the given mean vector and covariance matrix.
    pub fn heavy_tailed(
        mean_cost: f64,
        mean_reward: f64,
        cost_variance: f64,
        reward_variance: f64,
        covariance: f64,
        degrees_of_freedom: f64,
    ) -> Result<Self> {
        if !(degrees_of_freedom.is_finite() && degrees_of_freedom > 2.0) {
            return Err(Error::dist(format!(
                "degrees_of_freedom must be finite and > 2, got {degrees_of_freedom}"
            )));
        }
        Self::from_parts(
            Family::HeavyTailed { degrees_of_freedom },
            [
                mean_cost,
                mean_reward,
                cost_variance,
                reward_variance,
                covariance,
            ],
            None,
            None,
        )
    }

    /// Attach magnitude bounds `|cost| <= cost_bound`, `|reward| <= reward_bound`.
    ///
    /// Bounded-aware algorithms (UCB-B2, UCB-B2C, and UCB-B1 on bounded arms)
    /// read these. For a bounded-uniform arm the ranges must fit inside them.
    pub fn with_bounds(mut self, cost_bound: f64, reward_bound: f64) -> Result<Self> {
        self.cost_bound = Some(cost_bound);
        self.reward_bound = Some(reward_bound);
        self.validate()?;
        Ok(self)
    }

    fn from_parts(
        family: Family,
        [mean_cost, mean_reward, cost_variance, reward_variance, covariance]: [f64; 5],
        cost_bound: Option<f64>,
        reward_bound: Option<f64>,
    ) -> Result<Self> {
        let cfg = Self {
            family,
            mean_cost,
            mean_reward,
            cost_variance,
            reward_variance,
            covariance,
            cost_bound,
            reward_bound,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the statistical consistency of this description.
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [
            ("mean_cost", self.mean_cost),
            ("mean_reward", self.mean_reward),
            ("cost_variance", self.cost_variance),
            ("reward_variance", self.reward_variance),
            ("covariance", self.covariance),
        ] {
            if !v.is_finite() {
                return Err(Error::dist(format!("{name} must be finite, got {v}")));
            }
        }
        if self.mean_cost <= 0.0 {
            return Err(Error::dist(format!(
                "mean_cost must be > 0, got {}",
                self.mean_cost
            )));
        }
        if self.cost_variance < 0.0 || self.reward_variance < 0.0 {
            return Err(Error::dist(format!(
                "variances must be >= 0, got cost {} reward {}",
                self.cost_variance, self.reward_variance
            )));
        }
        let max_cov = (self.cost_variance * self.reward_variance).sqrt();
        if self.covariance.abs() > max_cov * (1.0 + COV_SLACK) + f64::EPSILON {
            return Err(Error::dist(format!(
                "|covariance| {} exceeds sqrt(var_cost * var_reward) = {max_cov}",
                self.covariance.abs()
            )));
        }
        if matches!(self.family, Family::IndependentGaussian) && self.covariance != 0.0 {
            return Err(Error::dist("independent_gaussian arm must have zero covariance"));
        }
        for (name, b) in [
            ("cost_bound", self.cost_bound),
            ("reward_bound", self.reward_bound),
        ] {
            if let Some(b) = b {
                if !(b.is_finite() && b >= 0.0) {
                    return Err(Error::dist(format!("{name} must be finite and >= 0, got {b}")));
                }
            }
        }
        if let Family::BoundedUniform {
            cost_min,
            cost_max,
            reward_min,
            reward_max,
            ..
        } = self.family
        {
            let mx = self.cost_bound.unwrap_or(f64::INFINITY);
            let mr = self.reward_bound.unwrap_or(f64::INFINITY);
            if cost_min < -mx || cost_max > mx || reward_min < -mr || reward_max > mr {
                return Err(Error::dist(format!(
                    "ranges [{cost_min}, {cost_max}] x [{reward_min}, {reward_max}] \
                     exceed bounds ({mx}, {mr})"
                )));
            }
        }
        Ok(())
    }

    /// Parse one arm dictionary.
    ///
    /// ```
    /// let arm = cbandits::ArmConfig::from_json(&serde_json::json!({
    ///     "type": "correlated_gaussian",
    ///     "mean_cost": 1.0, "mean_reward": 2.5,
    ///     "cost_variance": 0.1, "reward_variance": 0.3, "covariance": 0.05,
    ///     "cost_bound": 10.0, "reward_bound": 10.0,
    ///     "note": "ignored"
    /// })).unwrap();
    /// assert_eq!(arm.reward_rate(), 2.5);
    /// ```
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = as_object(value, "arm config")?;
        let tag = match obj.get("type") {
            None | Some(Value::Null) => return Err(Error::MissingParameter("type".to_string())),
            Some(Value::String(s)) => s.as_str(),
            Some(other) => return Err(Error::invalid_param("type", other)),
        };

        let cfg = match tag {
            "independent_gaussian" => Self::independent_gaussian(
                require_f64(obj, "mean_cost")?,
                require_f64(obj, "mean_reward")?,
                require_f64(obj, "cost_variance")?,
                require_f64(obj, "reward_variance")?,
            )?,
            "correlated_gaussian" | "gaussian" => Self::correlated_gaussian(
                require_f64(obj, "mean_cost")?,
                require_f64(obj, "mean_reward")?,
                require_f64(obj, "cost_variance")?,
                require_f64(obj, "reward_variance")?,
                require_f64(obj, "covariance")?,
            )?,
            "bounded_uniform" => Self::bounded_uniform(
                (require_f64(obj, "cost_min")?, require_f64(obj, "cost_max")?),
                (
                    require_f64(obj, "reward_min")?,
                    require_f64(obj, "reward_max")?,
                ),
                get_f64(obj, "correlation")?.unwrap_or(0.0),
            )?,
            "heavy_tailed" => Self::heavy_tailed(
                require_f64(obj, "mean_cost")?,
                require_f64(obj, "mean_reward")?,
                require_f64(obj, "cost_variance")?,
                require_f64(obj, "reward_variance")?,
                get_f64(obj, "covariance")?.unwrap_or(0.0),
                require_f64(obj, "degrees_of_freedom")?,
            )?,
            other => return Err(Error::invalid_param("type", other)),
        };

        match (get_f64(obj, "cost_bound")?, get_f64(obj, "reward_bound")?) {
            (None, None) => Ok(cfg),
            (cb, rb) => {
                let cb = cb.or(cfg.cost_bound).ok_or_else(|| missing("cost_bound"))?;
                let rb = rb
                    .or(cfg.reward_bound)
                    .ok_or_else(|| missing("reward_bound"))?;
                cfg.with_bounds(cb, rb)
            }
        }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn mean_cost(&self) -> f64 {
        self.mean_cost
    }

    pub fn mean_reward(&self) -> f64 {
        self.mean_reward
    }

    pub fn cost_variance(&self) -> f64 {
        self.cost_variance
    }

    pub fn reward_variance(&self) -> f64 {
        self.reward_variance
    }

    pub fn covariance(&self) -> f64 {
        self.covariance
    }

    pub fn cost_bound(&self) -> Option<f64> {
        self.cost_bound
    }

    pub fn reward_bound(&self) -> Option<f64> {
        self.reward_bound
    }

    /// `(M_X, M_R)`, or `MissingParameter` if either is unset.
    pub fn require_bounds(&self) -> Result<(f64, f64)> {
        let mx = self.cost_bound.ok_or_else(|| missing("cost_bound"))?;
        let mr = self.reward_bound.ok_or_else(|| missing("reward_bound"))?;
        Ok((mx, mr))
    }

    /// True reward rate `mean_reward / mean_cost`.
    pub fn reward_rate(&self) -> f64 {
        self.mean_reward / self.mean_cost
    }
}

/// Parse a sequence of arm dictionaries.
pub fn arm_configs_from_json(value: &Value) -> Result<Vec<ArmConfig>> {
    let arr = value
        .as_array()
        .ok_or_else(|| Error::invalid_param("arm_configs", "expected an array"))?;
    if arr.is_empty() {
        return Err(Error::NoArms);
    }
    arr.iter().map(ArmConfig::from_json).collect()
}

/// The four UCB variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Variant {
    /// Known second moments, correlated, sub-Gaussian.
    #[cfg_attr(feature = "serde", serde(rename = "UCB-B1"))]
    B1,
    /// Heavy-tailed, grouped-median estimation.
    #[cfg_attr(feature = "serde", serde(rename = "UCB-M1"))]
    M1,
    /// Bounded, uncorrelated, empirical moments.
    #[cfg_attr(feature = "serde", serde(rename = "UCB-B2"))]
    B2,
    /// Bounded, correlated, empirical moments plus online LMMSE.
    #[cfg_attr(feature = "serde", serde(rename = "UCB-B2C"))]
    B2c,
}

impl Variant {
    pub const ALL: [Variant; 4] = [Variant::B1, Variant::M1, Variant::B2, Variant::B2c];

    pub fn name(&self) -> &'static str {
        match self {
            Variant::B1 => "UCB-B1",
            Variant::M1 => "UCB-M1",
            Variant::B2 => "UCB-B2",
            Variant::B2c => "UCB-B2C",
        }
    }

    /// Dictionary keys that must be present for this variant.
    pub fn required_keys(&self) -> &'static [&'static str] {
        match self {
            Variant::B1 => &["alpha", "b_min_cost", "L"],
            Variant::M1 | Variant::B2 => &["alpha", "b_min_cost"],
            Variant::B2c => &["alpha", "b_min_cost", "omega_bar"],
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Variant::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::invalid_param("variant", s))
    }
}

/// Tuning knobs shared by the UCB variants.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AlgorithmParams {
    /// Exploration-confidence exponent, `> 1`. Larger explores more.
    pub alpha: f64,
    /// Floor applied to the estimated mean cost in every denominator.
    pub b_min_cost: f64,
    /// Sub-Gaussian scaling constant (UCB-B1 only).
    #[cfg_attr(feature = "serde", serde(rename = "L"))]
    pub l: f64,
    /// Upper bound on the magnitude of the learned LMMSE coefficient (UCB-B2C only).
    pub omega_bar: f64,
}

impl Default for AlgorithmParams {
    fn default() -> Self {
        Self {
            alpha: 2.1,
            b_min_cost: 0.1,
            l: 2.0,
            omega_bar: 2.0,
        }
    }
}

impl AlgorithmParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha.is_finite() && self.alpha > 1.0) {
            return Err(Error::invalid_param("alpha", self.alpha));
        }
        if !(self.b_min_cost.is_finite() && self.b_min_cost > 0.0) {
            return Err(Error::invalid_param("b_min_cost", self.b_min_cost));
        }
        if !(self.l.is_finite() && self.l > 0.0) {
            return Err(Error::invalid_param("L", self.l));
        }
        if !(self.omega_bar.is_finite() && self.omega_bar >= 0.0) {
            return Err(Error::invalid_param("omega_bar", self.omega_bar));
        }
        Ok(())
    }

    /// Parse the parameter dictionary for `variant`.
    ///
    /// Keys the variant does not require fall back to [`Default`]; unknown
    /// keys are ignored.
    pub fn from_json(variant: Variant, value: &Value) -> Result<Self> {
        let obj = as_object(value, "algorithm params")?;
        for key in variant.required_keys() {
            if get_f64(obj, key)?.is_none() {
                return Err(missing(key));
            }
        }
        let d = Self::default();
        let params = Self {
            alpha: get_f64(obj, "alpha")?.unwrap_or(d.alpha),
            b_min_cost: get_f64(obj, "b_min_cost")?.unwrap_or(d.b_min_cost),
            l: get_f64(obj, "L")?.unwrap_or(d.l),
            omega_bar: get_f64(obj, "omega_bar")?.unwrap_or(d.omega_bar),
        };
        params.validate()?;
        Ok(params)
    }
}

fn missing(key: &str) -> Error {
    Error::MissingParameter(key.to_string())
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| Error::invalid_param(what, "expected an object"))
}

fn get_f64(obj: &Map<String, Value>, key: &str) -> Result<Option<f64>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| Error::invalid_param(key, v)),
    }
}

fn require_f64(obj: &Map<String, Value>, key: &str) -> Result<f64> {
    get_f64(obj, key)?.ok_or_else(|| missing(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_non_positive_mean_cost() {
        let e = ArmConfig::independent_gaussian(0.0, 1.0, 0.1, 0.1).unwrap_err();
        assert!(matches!(e, Error::InvalidDistributionParams(_)));
        let e = ArmConfig::independent_gaussian(-1.0, 1.0, 0.1, 0.1).unwrap_err();
        assert!(matches!(e, Error::InvalidDistributionParams(_)));
    }

    #[test]
    fn rejects_negative_variance_and_impossible_covariance() {
        assert!(ArmConfig::independent_gaussian(1.0, 1.0, -0.1, 0.1).is_err());
        // sqrt(0.1 * 0.1) = 0.1 < 0.2
        assert!(ArmConfig::correlated_gaussian(1.0, 1.0, 0.1, 0.1, 0.2).is_err());
        assert!(ArmConfig::correlated_gaussian(1.0, 1.0, 0.1, 0.1, -0.1).is_ok());
    }

    #[test]
    fn bounded_uniform_derives_moments() {
        let a = ArmConfig::bounded_uniform((0.5, 1.5), (1.0, 3.0), 0.0).unwrap();
        assert!((a.mean_cost() - 1.0).abs() < 1e-12);
        assert!((a.mean_reward() - 2.0).abs() < 1e-12);
        assert!((a.cost_variance() - 1.0 / 12.0).abs() < 1e-12);
        assert!((a.reward_variance() - 4.0 / 12.0).abs() < 1e-12);
        assert_eq!(a.require_bounds().unwrap(), (1.5, 3.0));

        let c = ArmConfig::bounded_uniform((0.0, 1.0), (0.0, 1.0), 0.5).unwrap();
        assert!((c.covariance() - 0.5 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn bounded_uniform_ranges_must_fit_bounds() {
        let a = ArmConfig::bounded_uniform((0.5, 1.5), (1.0, 3.0), 0.0).unwrap();
        assert!(a.clone().with_bounds(2.0, 5.0).is_ok());
        assert!(a.with_bounds(1.0, 5.0).is_err());
        assert!(ArmConfig::bounded_uniform((-0.5, 1.0), (0.0, 1.0), 0.0).is_err());
        assert!(ArmConfig::bounded_uniform((0.0, 1.0), (0.0, 1.0), 1.5).is_err());
    }

    #[test]
    fn heavy_tailed_needs_finite_variance() {
        assert!(ArmConfig::heavy_tailed(1.0, 1.0, 1.0, 1.0, 0.0, 2.0).is_err());
        assert!(ArmConfig::heavy_tailed(1.0, 1.0, 1.0, 1.0, 0.0, 2.5).is_ok());
    }

    #[test]
    fn from_json_ignores_unknown_keys_and_reports_missing_ones() {
        let ok = ArmConfig::from_json(&json!({
            "type": "independent_gaussian",
            "mean_cost": 1.0, "mean_reward": 2.0,
            "cost_variance": 0.1, "reward_variance": 0.2,
            "name": "Arm A",
        }))
        .unwrap();
        assert_eq!(ok.family(), Family::IndependentGaussian);
        assert_eq!(ok.cost_bound(), None);

        let e = ArmConfig::from_json(&json!({
            "type": "correlated_gaussian",
            "mean_cost": 1.0, "mean_reward": 2.0,
            "cost_variance": 0.1, "reward_variance": 0.2,
        }))
        .unwrap_err();
        assert_eq!(e, Error::MissingParameter("covariance".to_string()));

        let e = ArmConfig::from_json(&json!({ "mean_cost": 1.0 })).unwrap_err();
        assert_eq!(e, Error::MissingParameter("type".to_string()));

        let e = ArmConfig::from_json(&json!({ "type": "poisson" })).unwrap_err();
        assert!(matches!(e, Error::InvalidParameter { .. }));
    }

    #[test]
    fn from_json_bounded_keeps_default_bound_for_missing_side() {
        let a = ArmConfig::from_json(&json!({
            "type": "bounded_uniform",
            "cost_min": 0.5, "cost_max": 1.5,
            "reward_min": 1.0, "reward_max": 3.0,
            "reward_bound": 4.0,
        }))
        .unwrap();
        assert_eq!(a.require_bounds().unwrap(), (1.5, 4.0));
    }

    #[test]
    fn gaussian_bounds_must_come_in_pairs() {
        let e = ArmConfig::from_json(&json!({
            "type": "gaussian",
            "mean_cost": 1.0, "mean_reward": 2.0,
            "cost_variance": 0.1, "reward_variance": 0.2, "covariance": 0.0,
            "cost_bound": 5.0,
        }))
        .unwrap_err();
        assert_eq!(e, Error::MissingParameter("reward_bound".to_string()));
    }

    #[test]
    fn params_required_keys_depend_on_variant() {
        let base = json!({ "alpha": 2.5, "b_min_cost": 0.05, "unused": true });
        let p = AlgorithmParams::from_json(Variant::B2, &base).unwrap();
        assert_eq!(p.alpha, 2.5);
        assert_eq!(p.b_min_cost, 0.05);
        assert_eq!(p.omega_bar, AlgorithmParams::default().omega_bar);

        assert_eq!(
            AlgorithmParams::from_json(Variant::B1, &base).unwrap_err(),
            Error::MissingParameter("L".to_string())
        );
        assert_eq!(
            AlgorithmParams::from_json(Variant::B2c, &base).unwrap_err(),
            Error::MissingParameter("omega_bar".to_string())
        );
        assert_eq!(
            AlgorithmParams::from_json(Variant::M1, &json!({ "alpha": 2.0 })).unwrap_err(),
            Error::MissingParameter("b_min_cost".to_string())
        );
    }

    #[test]
    fn params_validate_domain() {
        let mut p = AlgorithmParams::default();
        assert!(p.validate().is_ok());
        p.alpha = 1.0;
        assert!(p.validate().is_err());
        p = AlgorithmParams {
            b_min_cost: 0.0,
            ..AlgorithmParams::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn variant_names_round_trip() {
        for v in Variant::ALL {
            assert_eq!(v.name().parse::<Variant>().unwrap(), v);
        }
        assert_eq!("ucb-b2c".parse::<Variant>().unwrap(), Variant::B2c);
        assert!("UCB-X".parse::<Variant>().is_err());
    }
}
