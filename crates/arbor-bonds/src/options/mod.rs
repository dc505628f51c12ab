//! Interest-rate option pricing on the Hull-White trinomial lattice.
//!
//! This module provides:
//!
//! - **Model**: [`HullWhite`], the one-factor mean-reverting short rate
//!   model with time-dependent drift fitted to a discount curve
//! - **Lattice**: [`HullWhiteLattice`], the calibrated trinomial tree with
//!   its Arrow-Debreu price surface
//! - **Pricers**: closed-form zero-coupon bond options, lattice-based
//!   European options, and backward-induction coupon-bond options with
//!   optional early exercise
//!
//! # Overview
//!
//! The lattice discretizes the short rate into `2*jmax + 1` spatial states
//! per time step, with per-step drift calibrated node-by-node so the tree's
//! implied discount factors reproduce the market curve exactly. European
//! payoffs are priced by weighting node payoffs with Arrow-Debreu prices;
//! American payoffs by backward induction with an early-exercise comparison
//! at every node.
//!
//! # Example
//!
//! ```rust,ignore
//! use arbor_bonds::options::{bond_option, ExerciseStyle, HullWhite};
//!
//! let model = HullWhite::new(0.10, 0.015)?;
//! let lattice = model.build_lattice(&curve, today, horizon, 100)?;
//!
//! let value = bond_option(
//!     &lattice, &curve, expiry, 100.0, 100.0, &bond, ExerciseStyle::American,
//! )?;
//! ```

pub mod bond_option;
pub mod models;
pub mod trinomial_tree;

pub use bond_option::{
    bond_option, european_bond_option, european_zero_option, BondOptionValue, ExerciseStyle,
    OptionPrices,
};
pub use models::HullWhite;
pub use trinomial_tree::HullWhiteLattice;
