//! Bond instruments.

mod fixed_rate;

pub use fixed_rate::FixedRateBond;
