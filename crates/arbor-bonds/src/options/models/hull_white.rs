//! Hull-White one-factor short rate model.
//!
//! The Hull-White model is defined by:
//!
//! ```text
//! dr = (θ(t) - a*r)dt + σ*dW
//! ```
//!
//! Where:
//! - `a` = mean reversion speed
//! - `σ` = volatility
//! - `θ(t)` = time-dependent drift calibrated to fit the discount curve
//!
//! # Properties
//!
//! - Analytically tractable: zero-coupon bond forward prices and European
//!   options on zeros have closed forms
//! - Fits the initial discount curve exactly (no-arbitrage calibration)
//! - Can produce negative rates

use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;

use arbor_core::types::Date;
use arbor_curves::DiscountCurve;

use crate::error::{BondError, BondResult};
use crate::options::bond_option::OptionPrices;
use crate::options::trinomial_tree::HullWhiteLattice;

/// Standard normal cumulative distribution function.
fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Hull-White one-factor short rate model.
///
/// Supplies the closed-form pricers and builds the calibrated trinomial
/// lattice. Parameters are validated at construction; a model value is
/// immutable thereafter.
///
/// # Parameters
///
/// - **Mean Reversion (a)**: Speed at which rates revert toward the drift
///   level. Typical values: 0.01 - 0.10. Smaller values widen the lattice:
///   the spatial half-width grows as `1/(a*dt)`.
///
/// - **Volatility (σ)**: Instantaneous volatility of the short rate.
///   Typical values: 0.005 - 0.02 annualized.
///
/// # Example
///
/// ```rust
/// use arbor_bonds::options::HullWhite;
///
/// let model = HullWhite::new(0.10, 0.01).unwrap();
/// assert!(HullWhite::new(0.10, -0.01).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct HullWhite {
    /// Mean reversion speed (a).
    mean_reversion: f64,

    /// Short rate volatility (σ).
    volatility: f64,
}

impl HullWhite {
    /// Creates a new Hull-White model with the given parameters.
    ///
    /// # Errors
    ///
    /// Returns [`BondError::InvalidModelParameter`] when the volatility or
    /// the mean reversion speed is negative. Validation happens here, not
    /// at lattice build time.
    pub fn new(mean_reversion: f64, volatility: f64) -> BondResult<Self> {
        if volatility < 0.0 || !volatility.is_finite() {
            return Err(BondError::InvalidModelParameter {
                name: "volatility",
                value: volatility,
            });
        }
        if mean_reversion < 0.0 || !mean_reversion.is_finite() {
            return Err(BondError::InvalidModelParameter {
                name: "mean_reversion",
                value: mean_reversion,
            });
        }

        Ok(Self {
            mean_reversion,
            volatility,
        })
    }

    /// Returns the mean reversion speed.
    #[must_use]
    pub fn mean_reversion(&self) -> f64 {
        self.mean_reversion
    }

    /// Returns the short rate volatility.
    #[must_use]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Returns the B(t,T) function used in Hull-White pricing.
    ///
    /// B(t,T) = (1 - exp(-a*(T-t))) / a
    #[must_use]
    pub fn b_factor(&self, t: f64, big_t: f64) -> f64 {
        let a = self.mean_reversion;
        let tau = big_t - t;
        if tau <= 0.0 {
            return 0.0;
        }
        (1.0 - (-a * tau).exp()) / a
    }

    /// Forward zero-coupon bond price as seen at a future time `t`.
    ///
    /// Prices $1 paid at `T`, conditional on the `delta`-period short rate
    /// `rate_t` realized at `t`. `pt` is the market discount factor to `t`,
    /// `ptd` the discount factor to `t + delta`, and `p_big_t` the discount
    /// factor to `T`. The formula carries the standard volatility-convexity
    /// correction.
    ///
    /// Pure function; no lattice dependency.
    #[must_use]
    pub fn forward_zero_price(
        &self,
        t: f64,
        big_t: f64,
        rate_t: f64,
        delta: f64,
        pt: f64,
        ptd: f64,
        p_big_t: f64,
    ) -> f64 {
        let a = self.mean_reversion;
        let sigma = self.volatility;

        let b_t_big_t = self.b_factor(t, big_t);
        let b_t_delta = self.b_factor(t, t + delta);

        let term1 = (p_big_t / pt).ln() - (b_t_big_t / b_t_delta) * (ptd / pt).ln();
        let term2 = sigma * sigma * (1.0 - (-2.0 * a * t).exp()) * b_t_big_t
            * (b_t_big_t - b_t_delta)
            / (4.0 * a);

        let log_a_hat = term1 - term2;
        let b_hat = (b_t_big_t / b_t_delta) * delta;
        (log_a_hat - b_hat * rate_t).exp()
    }

    /// Closed-form European option on a zero-coupon bond.
    ///
    /// `expiry` and `maturity` are year fractions from the curve's
    /// reference date. Uses the Black-like formula with the integrated
    /// forward bond price volatility `sigma_p` and the standard normal CDF.
    ///
    /// # Errors
    ///
    /// Fails when `expiry > maturity` or `expiry < 0`.
    pub fn european_zero_option_analytic(
        &self,
        expiry: f64,
        maturity: f64,
        strike: f64,
        face: f64,
        curve: &DiscountCurve,
    ) -> BondResult<OptionPrices> {
        if expiry > maturity {
            return Err(BondError::ExpiryAfterMaturity {
                expiry,
                maturity,
            });
        }
        if expiry < 0.0 {
            return Err(BondError::NegativeExpiry { expiry });
        }

        let pt_exp = curve.discount_factor_at(expiry)?;
        let pt_mat = curve.discount_factor_at(maturity)?;

        let a = self.mean_reversion;
        let sigma = self.volatility;

        let sigma_p = (sigma / a)
            * (1.0 - (-a * (maturity - expiry)).exp())
            * ((1.0 - (-2.0 * a * expiry).exp()) / (2.0 * a)).sqrt();
        let h = ((face * pt_mat) / (strike * pt_exp)).ln() / sigma_p + sigma_p / 2.0;

        let call = face * pt_mat * norm_cdf(h) - strike * pt_exp * norm_cdf(h - sigma_p);
        let put = strike * pt_exp * norm_cdf(-h + sigma_p) - face * pt_mat * norm_cdf(-h);

        Ok(OptionPrices { call, put })
    }

    /// Builds the calibrated trinomial lattice.
    ///
    /// The time grid has `num_time_steps + 2` equally spaced points from 0
    /// to a horizon slightly beyond the requested maturity
    /// (`maturity * (num_time_steps + 1) / num_time_steps`), so the final
    /// short rate step is available to the pricers. Per-step drift is
    /// calibrated so the lattice reproduces the curve's discount factors
    /// exactly.
    ///
    /// # Errors
    ///
    /// Fails when `num_time_steps < 1`, `end <= start`, the spatial
    /// half-width would exceed the configured ceiling, or the curve cannot
    /// be evaluated on the grid.
    pub fn build_lattice(
        &self,
        curve: &DiscountCurve,
        start: Date,
        end: Date,
        num_time_steps: usize,
    ) -> BondResult<HullWhiteLattice> {
        if num_time_steps < 1 {
            return Err(BondError::invalid_spec("num_time_steps must be >= 1"));
        }
        if end <= start {
            return Err(BondError::invalid_spec(
                "lattice end date must be after start date",
            ));
        }

        let maturity = curve.day_count().year_fraction(start, end);
        let tree_maturity = maturity * (num_time_steps as f64 + 1.0) / num_time_steps as f64;

        let num_points = num_time_steps + 2;
        let spacing = tree_maturity / (num_points as f64 - 1.0);
        let tree_times: Vec<f64> = (0..num_points).map(|i| i as f64 * spacing).collect();

        let mut discount_factors = Vec::with_capacity(num_points);
        discount_factors.push(1.0);
        for &t in &tree_times[1..] {
            discount_factors.push(curve.discount_factor_at(t)?);
        }

        HullWhiteLattice::construct(self.clone(), tree_times, num_time_steps, &discount_factors)
    }
}
