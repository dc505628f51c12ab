//! Lattice-based bond option pricing.
//!
//! Two pricing routes over the calibrated lattice:
//!
//! - **European** ([`european_zero_option`], [`european_bond_option`]):
//!   one-step forward aggregation at the expiry slice. Each occupied node's
//!   bond price comes from the closed-form forward zero price fed with the
//!   node's short rate; payoffs are weighted by Arrow-Debreu prices, which
//!   already embed discounting, so no further discount multiplication
//!   appears.
//! - **American or European with coupons** ([`bond_option`]): full backward
//!   induction from the expiry slice to the root, with cash flows snapped
//!   onto the time grid and an early-exercise comparison at every node when
//!   the style is American.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use arbor_core::types::Date;
use arbor_curves::DiscountCurve;

use crate::error::{BondError, BondResult};
use crate::instruments::FixedRateBond;
use crate::options::trinomial_tree::HullWhiteLattice;

/// Call and put prices from a single valuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionPrices {
    /// Call option price.
    pub call: f64,
    /// Put option price.
    pub put: f64,
}

/// Root-node results of a backward-induction valuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BondOptionValue {
    /// Option value at the root node.
    pub option: f64,
    /// Underlying dirty bond value at the root node, for diagnostics and
    /// consistency checks.
    pub bond: f64,
}

/// Exercise style of a bond option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ExerciseStyle {
    /// Exercisable only at expiry.
    #[default]
    European,
    /// Exercisable at any lattice node up to and including expiry.
    American,
}

/// Validates the option's temporal ordering against the lattice horizon.
fn check_expiry(lattice: &HullWhiteLattice, t_exp: f64, t_mat: f64) -> BondResult<()> {
    if t_exp > t_mat {
        return Err(BondError::ExpiryAfterMaturity {
            expiry: t_exp,
            maturity: t_mat,
        });
    }
    if t_exp < 0.0 {
        return Err(BondError::NegativeExpiry { expiry: t_exp });
    }
    if lattice.horizon() < t_exp {
        return Err(BondError::LatticeHorizonExceeded {
            expiry: t_exp,
            horizon: lattice.horizon(),
        });
    }
    Ok(())
}

/// Prices a European option on a zero-coupon bond using the lattice.
///
/// Locates the expiry slice, computes each occupied node's forward zero
/// price from its short rate, and accumulates the Arrow-Debreu-weighted
/// payoffs.
///
/// # Errors
///
/// Fails on temporal ordering violations or when the lattice horizon does
/// not cover the expiry.
pub fn european_zero_option(
    lattice: &HullWhiteLattice,
    curve: &DiscountCurve,
    expiry: Date,
    maturity: Date,
    strike: f64,
    face: f64,
) -> BondResult<OptionPrices> {
    let t_exp = curve.time_of(expiry);
    let t_mat = curve.time_of(maturity);
    check_expiry(lattice, t_exp, t_mat)?;

    let dt = lattice.dt();
    let pt_exp = curve.discount_factor_at(t_exp)?;
    let pt_delta = curve.discount_factor_at(t_exp + dt)?;
    let pt_mat = curve.discount_factor_at(t_mat)?;

    let expiry_step = (t_exp / dt + 0.5) as usize;

    let mut call = 0.0;
    let mut put = 0.0;
    for k in 0..lattice.width() {
        let q = lattice.q()[[expiry_step, k]];
        if q == 0.0 {
            continue;
        }
        let rt = lattice.rates()[[expiry_step, k]];
        let zcb = lattice
            .model()
            .forward_zero_price(t_exp, t_mat, rt, dt, pt_exp, pt_delta, pt_mat);

        call += q * (zcb * face - strike).max(0.0);
        put += q * (strike - zcb * face).max(0.0);
    }

    Ok(OptionPrices { call, put })
}

/// Prices a European option on a coupon bond using the lattice.
///
/// At each occupied expiry node the bond's post-expiry flows are priced
/// with the closed-form forward zero price at the node's short rate; the
/// payoff is weighted by the node's Arrow-Debreu price.
///
/// # Errors
///
/// Fails on temporal ordering violations or when the lattice horizon does
/// not cover the expiry.
pub fn european_bond_option(
    lattice: &HullWhiteLattice,
    curve: &DiscountCurve,
    expiry: Date,
    strike: f64,
    face: f64,
    bond: &FixedRateBond,
) -> BondResult<OptionPrices> {
    let t_exp = curve.time_of(expiry);
    let t_mat = curve.time_of(bond.maturity_date());
    check_expiry(lattice, t_exp, t_mat)?;

    // Coupon dates strictly after expiry, through maturity
    let flow_dates = bond.flow_dates(expiry)?;
    let flow_times: Vec<f64> = flow_dates[1..].iter().map(|d| curve.time_of(*d)).collect();
    let cpn = bond.coupon_per_period_f64();

    let dt = lattice.dt();
    let pt_exp = curve.discount_factor_at(t_exp)?;
    let pt_delta = curve.discount_factor_at(t_exp + dt)?;
    let pt_mat = curve.discount_factor_at(t_mat)?;

    let expiry_step = (t_exp / dt + 0.5) as usize;

    let mut call = 0.0;
    let mut put = 0.0;
    for k in 0..lattice.width() {
        let q = lattice.q()[[expiry_step, k]];
        if q == 0.0 {
            continue;
        }
        let rt = lattice.rates()[[expiry_step, k]];

        let mut pv = 0.0;
        for &t_flow in &flow_times {
            let pt_flow = curve.discount_factor_at(t_flow)?;
            let zcb = lattice
                .model()
                .forward_zero_price(t_exp, t_flow, rt, dt, pt_exp, pt_delta, pt_flow);
            pv += cpn * zcb;
        }
        let zcb_mat = lattice
            .model()
            .forward_zero_price(t_exp, t_mat, rt, dt, pt_exp, pt_delta, pt_mat);
        pv += zcb_mat;

        call += q * (pv * face - strike).max(0.0);
        put += q * (strike - pv * face).max(0.0);
    }

    Ok(OptionPrices { call, put })
}

/// Values an option on a coupon bond with European or American exercise by
/// backward induction over the lattice.
///
/// Bond coupon flows are projected onto the nearest lattice step no later
/// than expiry, scaled by the ratio of the discount factor at the exact
/// flow time to the discount factor at the snapped tree time. Accrued
/// interest at each step is linearly prorated between the surrounding
/// coupon dates, so the exercise comparison works on clean prices.
///
/// Returns the option value and, for diagnostics, the dirty bond value at
/// the root node.
///
/// # Errors
///
/// Fails on temporal ordering violations, cash-flow placement violations
/// (coupon before the valuation date or after maturity), or when the
/// lattice horizon does not cover the expiry.
pub fn bond_option(
    lattice: &HullWhiteLattice,
    curve: &DiscountCurve,
    expiry: Date,
    strike: f64,
    face: f64,
    bond: &FixedRateBond,
    style: ExerciseStyle,
) -> BondResult<BondOptionValue> {
    let valuation = curve.reference_date();
    let t_exp = curve.time_of(expiry);
    let t_mat = curve.time_of(bond.maturity_date());
    check_expiry(lattice, t_exp, t_mat)?;

    let dt = lattice.dt();
    let times = lattice.times();
    let num_rows = lattice.q().nrows();
    let width = lattice.width();
    let jmax = lattice.jmax() as i64;
    let expiry_step = (t_exp / dt + 0.5) as usize;

    // Coupon schedule as grid times; the leading zero entry anchors the
    // accrual proration for steps before the first coupon.
    let cpn = bond.coupon_per_period_f64();
    let mut coupon_times = vec![0.0];
    let mut coupon_flows = vec![0.0];
    for date in &bond.flow_dates(valuation)?[1..] {
        let t = curve.time_of(*date);
        if t < 0.0 {
            return Err(BondError::CouponBeforeValuation { time: t });
        }
        if t > t_mat + 1e-10 {
            return Err(BondError::CouponAfterMaturity {
                time: t,
                maturity: t_mat,
            });
        }
        coupon_times.push(t);
        coupon_flows.push(cpn);
    }

    // Project pre-expiry flows onto the nearest grid step, scaled for the
    // off-grid displacement.
    let mut tree_flows = vec![0.0; num_rows];
    for (&t_flow, &flow) in coupon_times.iter().zip(&coupon_flows) {
        if t_flow > 0.0 && t_flow <= t_exp {
            let n = (t_flow / dt).round() as usize;
            let df_flow = curve.discount_factor_at(t_flow)?;
            let df_tree = curve.discount_factor_at(times[n])?;
            tree_flows[n] += flow * df_flow / df_tree;
        }
    }

    // Accrued interest per step by linear proration between the
    // surrounding coupon dates.
    let mut accrued = vec![0.0; num_rows];
    for m in 0..=expiry_step {
        let tree_time = times[m];
        for pair in coupon_times.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if tree_time > prev && tree_time < next {
                accrued[m] = (tree_time - prev) / (next - prev) * cpn * face;
                break;
            }
        }
    }

    let mut bond_values = Array2::<f64>::zeros((num_rows, width));
    let mut option_values = Array2::<f64>::zeros((num_rows, width));

    let pt_exp = curve.discount_factor_at(t_exp)?;
    let pt_delta = curve.discount_factor_at(t_exp + dt)?;
    let pt_mat = curve.discount_factor_at(t_mat)?;

    // Seed the expiry slice: dirty price from the analytically priced
    // post-expiry flows plus the flow snapped onto this step, clean price
    // from subtracting accrued, option from intrinsic payoff. The cutoff
    // matches the projection cutoff so a coupon on the expiry date is
    // counted exactly once.
    let flow_at_expiry = tree_flows[expiry_step] * face;
    let nm = (expiry_step as i64).min(jmax);
    for k in -nm..=nm {
        let kn = (k + jmax) as usize;
        let rt = lattice.rates()[[expiry_step, kn]];

        let mut dirty = 0.0;
        for &t_flow in &coupon_times[1..] {
            if t_flow > t_exp {
                let pt_flow = curve.discount_factor_at(t_flow)?;
                let zcb = lattice
                    .model()
                    .forward_zero_price(t_exp, t_flow, rt, dt, pt_exp, pt_delta, pt_flow);
                dirty += cpn * face * zcb;
            }
        }
        let zcb_mat = lattice
            .model()
            .forward_zero_price(t_exp, t_mat, rt, dt, pt_exp, pt_delta, pt_mat);
        dirty += face * zcb_mat;

        bond_values[[expiry_step, kn]] = dirty + flow_at_expiry;
        let clean = bond_values[[expiry_step, kn]] - accrued[expiry_step];
        option_values[[expiry_step, kn]] = (clean - strike).max(0.0);
    }

    // Backward induction to the root. Child offsets follow the same
    // three-case branching used during construction: the top boundary
    // reaches down into the interior, the bottom boundary reaches up.
    for m in (0..expiry_step).rev() {
        let nm = (m as i64).min(jmax);
        let flow = tree_flows[m] * face;

        for k in -nm..=nm {
            let kn = (k + jmax) as usize;
            let rt = lattice.rates()[[m, kn]];
            let df = (-rt * dt).exp();
            let (pu, pm, pd) = (lattice.pu()[kn], lattice.pm()[kn], lattice.pd()[kn]);

            let (up, mid, down) = if k == jmax {
                (kn, kn - 1, kn - 2)
            } else if k == -jmax {
                (kn + 2, kn + 1, kn)
            } else {
                (kn + 1, kn, kn - 1)
            };

            let hold_bond = (pu * bond_values[[m + 1, up]]
                + pm * bond_values[[m + 1, mid]]
                + pd * bond_values[[m + 1, down]])
                * df;
            bond_values[[m, kn]] = hold_bond + flow;

            let hold_option = (pu * option_values[[m + 1, up]]
                + pm * option_values[[m + 1, mid]]
                + pd * option_values[[m + 1, down]])
                * df;

            option_values[[m, kn]] = match style {
                ExerciseStyle::European => hold_option,
                ExerciseStyle::American => {
                    let clean = bond_values[[m, kn]] - accrued[m];
                    let exercise = (clean - strike).max(0.0);
                    exercise.max(hold_option)
                }
            };
        }
    }

    let center = lattice.center();
    Ok(BondOptionValue {
        option: option_values[[0, center]],
        bond: bond_values[[0, center]],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use arbor_core::types::Frequency;
    use arbor_curves::DiscountCurve;
    use rust_decimal_macros::dec;

    use crate::options::HullWhite;

    fn setup(steps: usize) -> (HullWhiteLattice, DiscountCurve, Date, Date) {
        let today = Date::from_ymd(2025, 1, 1).unwrap();
        let curve = DiscountCurve::flat(today, 0.03);
        let expiry = Date::from_ymd(2026, 1, 1).unwrap();
        let maturity = Date::from_ymd(2030, 1, 1).unwrap();

        let model = HullWhite::new(0.10, 0.01).unwrap();
        let lattice = model
            .build_lattice(&curve, today, maturity, steps)
            .unwrap();
        (lattice, curve, expiry, maturity)
    }

    #[test]
    fn test_european_zero_option_close_to_analytic() {
        let (lattice, curve, expiry, maturity) = setup(100);

        // Near the forward price so both call and put carry real value
        let strike = 88.0;
        let face = 100.0;
        let tree = european_zero_option(&lattice, &curve, expiry, maturity, strike, face).unwrap();
        let anal = lattice
            .model()
            .european_zero_option_analytic(
                curve.time_of(expiry),
                curve.time_of(maturity),
                strike,
                face,
                &curve,
            )
            .unwrap();

        assert_relative_eq!(tree.call, anal.call, max_relative = 0.01);
        assert_relative_eq!(tree.put, anal.put, max_relative = 0.01);
    }

    #[test]
    fn test_european_bond_option_on_zero_matches_zero_variant() {
        let (lattice, curve, expiry, maturity) = setup(100);
        let bond = FixedRateBond::zero_coupon(maturity).unwrap();

        let via_bond =
            european_bond_option(&lattice, &curve, expiry, 80.0, 100.0, &bond).unwrap();
        let via_zero =
            european_zero_option(&lattice, &curve, expiry, maturity, 80.0, 100.0).unwrap();

        assert_relative_eq!(via_bond.call, via_zero.call, epsilon = 1e-10);
        assert_relative_eq!(via_bond.put, via_zero.put, epsilon = 1e-10);
    }

    #[test]
    fn test_american_at_least_european() {
        let (lattice, curve, expiry, maturity) = setup(100);
        let bond = FixedRateBond::new(dec!(0.05), Frequency::SemiAnnual, maturity).unwrap();

        let european = bond_option(
            &lattice,
            &curve,
            expiry,
            100.0,
            100.0,
            &bond,
            ExerciseStyle::European,
        )
        .unwrap();
        let american = bond_option(
            &lattice,
            &curve,
            expiry,
            100.0,
            100.0,
            &bond,
            ExerciseStyle::American,
        )
        .unwrap();

        assert!(american.option >= european.option - 1e-12);
        assert_relative_eq!(american.bond, european.bond, epsilon = 1e-12);
    }

    #[test]
    fn test_bond_option_rejects_expiry_after_maturity() {
        let (lattice, curve, _, maturity) = setup(50);
        let bond = FixedRateBond::new(dec!(0.05), Frequency::SemiAnnual, maturity).unwrap();
        let late = Date::from_ymd(2031, 1, 1).unwrap();

        let err = bond_option(
            &lattice,
            &curve,
            late,
            100.0,
            100.0,
            &bond,
            ExerciseStyle::European,
        )
        .unwrap_err();
        assert!(matches!(err, BondError::ExpiryAfterMaturity { .. }));
    }

    #[test]
    fn test_option_rejects_expiry_beyond_horizon() {
        let today = Date::from_ymd(2025, 1, 1).unwrap();
        let curve = DiscountCurve::flat(today, 0.03);
        let short_end = Date::from_ymd(2026, 1, 1).unwrap();
        let model = HullWhite::new(0.10, 0.01).unwrap();
        let lattice = model.build_lattice(&curve, today, short_end, 20).unwrap();

        let expiry = Date::from_ymd(2028, 1, 1).unwrap();
        let maturity = Date::from_ymd(2030, 1, 1).unwrap();
        let err =
            european_zero_option(&lattice, &curve, expiry, maturity, 80.0, 100.0).unwrap_err();
        assert!(matches!(err, BondError::LatticeHorizonExceeded { .. }));
    }

    #[test]
    fn test_root_bond_value_matches_discounted_flows() {
        // The rolled-back dirty bond value at the root should agree with
        // the curve-discounted value of the same projected flows.
        let (lattice, curve, expiry, maturity) = setup(200);
        let bond = FixedRateBond::new(dec!(0.03), Frequency::Annual, maturity).unwrap();

        let value = bond_option(
            &lattice,
            &curve,
            expiry,
            100.0,
            100.0,
            &bond,
            ExerciseStyle::European,
        )
        .unwrap();

        let mut expected = 0.0;
        for date in &bond.flow_dates(curve.reference_date()).unwrap()[1..] {
            let t = curve.time_of(*date);
            expected += 0.03 * 100.0 * curve.discount_factor_at(t).unwrap();
        }
        expected += 100.0
            * curve
                .discount_factor_at(curve.time_of(maturity))
                .unwrap();

        assert_relative_eq!(value.bond, expected, max_relative = 2e-3);
    }
}
