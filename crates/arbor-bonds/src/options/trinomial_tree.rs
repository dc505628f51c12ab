//! Calibrated Hull-White trinomial lattice.
//!
//! The lattice discretizes the short rate into a truncated spatial grid of
//! `2*jmax + 1` states per time step. Interior nodes branch up/middle/down;
//! the top and bottom boundary nodes branch asymmetrically back into the
//! interior, which keeps the short rate mean-reverting inside the truncated
//! grid without unbounded truncation error.
//!
//! ```text
//!  j = jmax    o──┐           top: children (j, j-1, j-2)
//!              o  o  o
//!  j = 0       o  o  o        interior: children (j+1, j, j-1)
//!              o  o  o
//!  j = -jmax   o──┘           bottom: children (j, j+1, j+2)
//! ```
//!
//! Per-step drift `alpha[m]` is solved node-by-node so the lattice's implied
//! discount factor to each grid time equals the market discount factor
//! exactly; this is the no-arbitrage calibration condition and cannot be
//! hoisted out of the time loop because it depends on the accumulated
//! Arrow-Debreu prices.

use ndarray::Array2;

use crate::error::{BondError, BondResult};
use crate::options::models::HullWhite;

/// Ceiling on the spatial half-width `jmax`.
///
/// `jmax = ceil(0.1835 / (a * dt))` diverges as the mean reversion speed
/// approaches zero; exceeding this ceiling is a configuration error rather
/// than an unbounded allocation.
pub const MAX_HALF_WIDTH: usize = 100_000;

/// A calibrated Hull-White trinomial lattice.
///
/// Holds the transition probabilities (per spatial index, time-invariant),
/// the short rate grid, the Arrow-Debreu price surface, and the per-step
/// calibrated drift. Built once per `(model, curve, horizon, steps)` tuple
/// and immutable thereafter; every pricer consumes it read-only.
///
/// Spatial index `j ∈ [-jmax, jmax]` maps to array offset `j + jmax`
/// (see [`HullWhiteLattice::node_offset`]).
#[derive(Debug, Clone)]
pub struct HullWhiteLattice {
    model: HullWhite,
    /// Tree grid times, `num_time_steps + 2` equally spaced points.
    times: Vec<f64>,
    /// Step size in years.
    dt: f64,
    /// Spatial half-width.
    jmax: usize,
    /// Up/middle/down transition probabilities per spatial offset.
    pu: Vec<f64>,
    pm: Vec<f64>,
    pd: Vec<f64>,
    /// Arrow-Debreu prices, shape `(num_time_steps + 2, 2*jmax + 1)`.
    q: Array2<f64>,
    /// Short rates, same shape as `q`.
    rates: Array2<f64>,
    /// Calibrated per-step drift, length `num_time_steps + 1`.
    alpha: Vec<f64>,
    num_time_steps: usize,
}

impl HullWhiteLattice {
    /// Constructs the lattice from grid times and market discount factors.
    ///
    /// `discount_factors[i]` must be the market discount factor at
    /// `times[i]`. Called by [`HullWhite::build_lattice`].
    pub(crate) fn construct(
        model: HullWhite,
        times: Vec<f64>,
        num_time_steps: usize,
        discount_factors: &[f64],
    ) -> BondResult<Self> {
        let a = model.mean_reversion();
        let sigma = model.volatility();

        let tree_maturity = *times.last().unwrap_or(&0.0);
        let dt = tree_maturity / (num_time_steps as f64 + 1.0);
        let dr = sigma * (3.0 * dt).sqrt();

        let jmax_f = (0.1835 / (a * dt)).ceil();
        if !jmax_f.is_finite() || jmax_f > MAX_HALF_WIDTH as f64 {
            return Err(BondError::GridTooWide {
                jmax: if jmax_f.is_finite() {
                    jmax_f as usize
                } else {
                    usize::MAX
                },
                max: MAX_HALF_WIDTH,
            });
        }
        let jmax = (jmax_f as usize).max(1);
        let width = 2 * jmax + 1;

        let (pu, pm, pd) = transition_probabilities(a, dt, jmax);

        // Dense grids allocated once, fully sized; the kernel fills them in
        // place with no further allocation.
        let mut q = Array2::<f64>::zeros((num_time_steps + 2, width));
        let mut rates = Array2::<f64>::zeros((num_time_steps + 2, width));
        let mut alpha = vec![0.0; num_time_steps + 1];

        build_tree_grids(
            dr,
            dt,
            jmax,
            num_time_steps,
            discount_factors,
            &pu,
            &pm,
            &pd,
            &mut q,
            &mut rates,
            &mut alpha,
        );

        log::debug!(
            "built Hull-White lattice: {} steps, jmax {}, dt {:.6}",
            num_time_steps,
            jmax,
            dt
        );

        Ok(Self {
            model,
            times,
            dt,
            jmax,
            pu,
            pm,
            pd,
            q,
            rates,
            alpha,
            num_time_steps,
        })
    }

    /// Returns the model the lattice was built from.
    #[must_use]
    pub fn model(&self) -> &HullWhite {
        &self.model
    }

    /// Returns the time step size in years.
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the spatial half-width.
    #[must_use]
    pub fn jmax(&self) -> usize {
        self.jmax
    }

    /// Returns the spatial grid width `2*jmax + 1`.
    #[must_use]
    pub fn width(&self) -> usize {
        2 * self.jmax + 1
    }

    /// Returns the number of time steps requested at build time.
    #[must_use]
    pub fn num_time_steps(&self) -> usize {
        self.num_time_steps
    }

    /// Returns the tree grid times.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Returns the tree horizon (the last grid time).
    #[must_use]
    pub fn horizon(&self) -> f64 {
        *self.times.last().unwrap_or(&0.0)
    }

    /// Returns the Arrow-Debreu price surface.
    #[must_use]
    pub fn q(&self) -> &Array2<f64> {
        &self.q
    }

    /// Returns the short rate grid.
    #[must_use]
    pub fn rates(&self) -> &Array2<f64> {
        &self.rates
    }

    /// Returns the calibrated per-step drift.
    #[must_use]
    pub fn alpha(&self) -> &[f64] {
        &self.alpha
    }

    /// Returns the up transition probabilities per spatial offset.
    #[must_use]
    pub fn pu(&self) -> &[f64] {
        &self.pu
    }

    /// Returns the middle transition probabilities per spatial offset.
    #[must_use]
    pub fn pm(&self) -> &[f64] {
        &self.pm
    }

    /// Returns the down transition probabilities per spatial offset.
    #[must_use]
    pub fn pd(&self) -> &[f64] {
        &self.pd
    }

    /// Returns the array offset of the central node (`j = 0`).
    #[must_use]
    pub fn center(&self) -> usize {
        self.jmax
    }

    /// Maps a signed spatial index to its array offset.
    #[must_use]
    pub fn node_offset(&self, j: i64) -> usize {
        (j + self.jmax as i64) as usize
    }

    /// Discount factor and zero rate implied by the lattice at time `t`.
    ///
    /// Valid only for `t` on the lattice time grid (within `1e-6` of a
    /// multiple of `dt`). Sums the Arrow-Debreu prices at the corresponding
    /// step; their total is the implied discount factor by construction.
    ///
    /// # Errors
    ///
    /// Returns [`BondError::TimeOffGrid`] for misaligned times and
    /// [`BondError::LatticeHorizonExceeded`] past the tree horizon.
    pub fn discount_factor(&self, t: f64) -> BondResult<(f64, f64)> {
        if t == 0.0 {
            return Ok((1.0, 0.0));
        }

        let steps = t / self.dt;
        let nearest = steps.round();
        if (steps - nearest).abs() > 1e-6 {
            return Err(BondError::TimeOffGrid { time: t, dt: self.dt });
        }

        let step = nearest as usize;
        if step >= self.q.nrows() {
            return Err(BondError::LatticeHorizonExceeded {
                expiry: t,
                horizon: self.horizon(),
            });
        }

        let price: f64 = self.q.row(step).sum();
        let zero_rate = -price.ln() / t;
        Ok((price, zero_rate))
    }
}

/// Computes the three-case transition probabilities per spatial index.
///
/// Closed-form functions of `a*j*dt` only; time-invariant. The top node
/// (`j = jmax`) and bottom node (`j = -jmax`) use the asymmetric boundary
/// formulas that branch back into the interior.
fn transition_probabilities(a: f64, dt: f64, jmax: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let width = 2 * jmax + 1;
    let mut pu = vec![0.0; width];
    let mut pm = vec![0.0; width];
    let mut pd = vec![0.0; width];

    let jmax_i = jmax as i64;
    for j in -jmax_i..=jmax_i {
        let ajdt = a * j as f64 * dt;
        let jn = (j + jmax_i) as usize;
        if j == jmax_i {
            pu[jn] = 7.0 / 6.0 + 0.5 * (ajdt * ajdt - 3.0 * ajdt);
            pm[jn] = -1.0 / 3.0 - ajdt * ajdt + 2.0 * ajdt;
            pd[jn] = 1.0 / 6.0 + 0.5 * (ajdt * ajdt - ajdt);
        } else if j == -jmax_i {
            pu[jn] = 1.0 / 6.0 + 0.5 * (ajdt * ajdt + ajdt);
            pm[jn] = -1.0 / 3.0 - ajdt * ajdt - 2.0 * ajdt;
            pd[jn] = 7.0 / 6.0 + 0.5 * (ajdt * ajdt + 3.0 * ajdt);
        } else {
            pu[jn] = 1.0 / 6.0 + 0.5 * (ajdt * ajdt - ajdt);
            pm[jn] = 2.0 / 3.0 - ajdt * ajdt;
            pd[jn] = 1.0 / 6.0 + 0.5 * (ajdt * ajdt + ajdt);
        }
    }

    (pu, pm, pd)
}

/// Forward-propagation kernel: fills the Arrow-Debreu and short rate grids
/// and the calibrated drift, in place, over pre-sized arrays.
///
/// For each step `m` the drift `alpha[m]` is the unique value forcing the
/// lattice's implied discount factor to match `discount_factors[m + 1]`;
/// the occupied region grows linearly (`min(m, jmax)` nodes either side of
/// center) until the grid saturates.
#[allow(clippy::too_many_arguments)]
fn build_tree_grids(
    dr: f64,
    dt: f64,
    jmax: usize,
    num_time_steps: usize,
    discount_factors: &[f64],
    pu: &[f64],
    pm: &[f64],
    pd: &[f64],
    q: &mut Array2<f64>,
    rates: &mut Array2<f64>,
    alpha: &mut [f64],
) {
    let jmax_i = jmax as i64;
    let center = jmax;

    q[[0, center]] = 1.0;

    for m in 0..=num_time_steps {
        let nm = (m as i64).min(jmax_i);

        // Calibration: solve for the drift matching the next market
        // discount factor given the accumulated state prices.
        let mut sum_qz = 0.0;
        for j in -nm..=nm {
            let rdt = j as f64 * dr * dt;
            sum_qz += q[[m, (j + jmax_i) as usize]] * (-rdt).exp();
        }
        alpha[m] = (sum_qz / discount_factors[m + 1]).ln() / dt;

        for j in -nm..=nm {
            let jn = (j + jmax_i) as usize;
            rates[[m, jn]] = alpha[m] + j as f64 * dr;
        }

        // Propagate state prices to step m+1 along the three branches.
        for j in -nm..=nm {
            let jn = (j + jmax_i) as usize;
            let z = (-rates[[m, jn]] * dt).exp();
            let qz = q[[m, jn]] * z;

            if j == jmax_i {
                q[[m + 1, jn]] += qz * pu[jn];
                q[[m + 1, jn - 1]] += qz * pm[jn];
                q[[m + 1, jn - 2]] += qz * pd[jn];
            } else if j == -jmax_i {
                q[[m + 1, jn]] += qz * pd[jn];
                q[[m + 1, jn + 1]] += qz * pm[jn];
                q[[m + 1, jn + 2]] += qz * pu[jn];
            } else {
                q[[m + 1, jn + 1]] += qz * pu[jn];
                q[[m + 1, jn]] += qz * pm[jn];
                q[[m + 1, jn - 1]] += qz * pd[jn];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use arbor_core::types::Date;
    use arbor_curves::DiscountCurve;

    fn build(a: f64, sigma: f64, steps: usize) -> (HullWhiteLattice, DiscountCurve) {
        let today = Date::from_ymd(2025, 1, 1).unwrap();
        let curve = DiscountCurve::flat(today, 0.03);
        let end = today.add_months(60).unwrap();
        let model = HullWhite::new(a, sigma).unwrap();
        let lattice = model.build_lattice(&curve, today, end, steps).unwrap();
        (lattice, curve)
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (lattice, _) = build(0.10, 0.01, 60);

        for jn in 0..lattice.width() {
            let sum = lattice.pu()[jn] + lattice.pm()[jn] + lattice.pd()[jn];
            assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_arrow_debreu_prices_reproduce_curve() {
        let (lattice, curve) = build(0.10, 0.01, 60);

        // Calibration correctness: the state prices at every step sum to
        // the market discount factor at that step's time.
        for m in 0..lattice.q().nrows() {
            let implied: f64 = lattice.q().row(m).sum();
            let market = curve.discount_factor_at(lattice.times()[m]).unwrap();
            assert_relative_eq!(implied, market, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_discount_factor_readback() {
        let (lattice, curve) = build(0.10, 0.01, 60);

        let (df0, zero0) = lattice.discount_factor(0.0).unwrap();
        assert_eq!(df0, 1.0);
        assert_eq!(zero0, 0.0);

        let t = 10.0 * lattice.dt();
        let (df, zero) = lattice.discount_factor(t).unwrap();
        assert_relative_eq!(df, curve.discount_factor_at(t).unwrap(), epsilon = 1e-9);
        assert_relative_eq!(zero, 0.03, epsilon = 1e-6);
    }

    #[test]
    fn test_discount_factor_off_grid_fails() {
        let (lattice, _) = build(0.10, 0.01, 60);

        let err = lattice.discount_factor(1.37 * lattice.dt()).unwrap_err();
        assert!(matches!(err, BondError::TimeOffGrid { .. }));
    }

    #[test]
    fn test_grid_width_capped() {
        let today = Date::from_ymd(2025, 1, 1).unwrap();
        let curve = DiscountCurve::flat(today, 0.03);
        let end = today.add_months(60).unwrap();

        // Near-zero mean reversion pushes jmax past the ceiling
        let model = HullWhite::new(1e-9, 0.01).unwrap();
        let err = model.build_lattice(&curve, today, end, 10).unwrap_err();
        assert!(matches!(err, BondError::GridTooWide { .. }));
    }

    #[test]
    fn test_occupied_region_grows_to_saturation() {
        let (lattice, _) = build(0.10, 0.01, 60);
        let center = lattice.center();

        // Step 1 occupies three nodes around center, none beyond
        assert!(lattice.q()[[1, center]] > 0.0);
        assert!(lattice.q()[[1, center + 1]] > 0.0);
        assert!(lattice.q()[[1, center - 1]] > 0.0);
        if lattice.jmax() > 2 {
            assert_eq!(lattice.q()[[1, center + 2]], 0.0);
        }
    }

    #[test]
    fn test_short_rates_center_on_alpha() {
        let (lattice, _) = build(0.10, 0.01, 60);
        let center = lattice.center();

        for m in 0..=lattice.num_time_steps() {
            assert_relative_eq!(
                lattice.rates()[[m, center]],
                lattice.alpha()[m],
                epsilon = 1e-12
            );
        }
    }
}
