//! Weighted tier draws, reward selection, and ten-draw pity correction.
//!
//! A draw samples a roll uniformly from `[0, 100)` and walks the rate table:
//! the fixed tiers claim cumulative slices in `SSR, SR, R` order, `N` takes
//! whatever is left, and custom tiers claim further slices starting where the
//! fixed tiers end. Weights are never normalized; see [`audit_rates`].

pub mod pity;
pub mod select;

pub use pity::{BATCH_SIZE, apply_guarantees};
pub use select::{select, select_for_tier};

use std::fmt;

use gacha_core::{FixedTier, RateTable, Tier};
use rand::Rng;
use rand::rngs::StdRng;

/// Upper bound (exclusive) of a roll.
pub const ROLL_RANGE: f64 = 100.0;

const WEIGHT_EPSILON: f64 = 1e-9;

/// Sample a roll uniformly from `[0, 100)`.
pub fn roll_unit(rng: &mut StdRng) -> f64 {
    rng.random_range(0.0..ROLL_RANGE)
}

/// Resolve a roll against a rate table.
///
/// Fixed tiers first: `SSR` if `roll < SSR`, `SR` if `roll < SSR+SR`, `R` if
/// `roll < SSR+SR+R`, then `N` when it has weight, else `R`. Custom tiers are
/// then laid out from `SSR+SR+R+N` onward in declaration order, each owning
/// `[start, start + weight)`; the first one containing the roll replaces the
/// fixed result.
pub fn draw_tier(rates: &RateTable, roll: f64) -> Tier {
    let ssr = rates.fixed_weight(FixedTier::Ssr);
    let sr = rates.fixed_weight(FixedTier::Sr);
    let r = rates.fixed_weight(FixedTier::R);
    let n = rates.fixed_weight(FixedTier::N);

    let mut tier = if roll < ssr {
        Tier::SSR
    } else if roll < ssr + sr {
        Tier::SR
    } else if roll < ssr + sr + r {
        Tier::R
    } else if n > 0.0 {
        Tier::N
    } else {
        Tier::R
    };

    let mut cumulative = ssr + sr + r + n;
    for (custom, weight) in rates.custom() {
        let threshold = cumulative + weight;
        if roll >= cumulative && roll < threshold {
            tier = custom.clone();
            break;
        }
        cumulative = threshold;
    }

    tier
}

/// Roll and resolve in one step.
pub fn draw(rates: &RateTable, rng: &mut StdRng) -> Tier {
    draw_tier(rates, roll_unit(rng))
}

/// A rate table that draws fine but probably not as its author intended.
#[derive(Debug, Clone, PartialEq)]
pub enum RateWarning {
    /// Weights do not add up to 100. Unclaimed mass falls through to the
    /// fixed-tier result; excess mass is never rolled.
    WeightSum {
        /// Sum of all weights.
        total: f64,
    },
    /// A custom tier whose slice starts at or beyond 100 and can never win.
    UnreachableTier {
        /// The dead tier.
        tier: Tier,
        /// Where its slice starts.
        start: f64,
    },
}

impl fmt::Display for RateWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WeightSum { total } => write!(f, "weights sum to {total}, not 100"),
            Self::UnreachableTier { tier, start } => {
                write!(f, "tier {tier} starts at {start} and can never be drawn")
            }
        }
    }
}

/// Inspect a rate table for configuration mistakes. Never fails a draw.
pub fn audit_rates(rates: &RateTable) -> Vec<RateWarning> {
    let mut warnings = Vec::new();

    let total = rates.total();
    if (total - ROLL_RANGE).abs() > WEIGHT_EPSILON {
        warnings.push(RateWarning::WeightSum { total });
    }

    let mut cumulative = rates.fixed_total();
    for (tier, weight) in rates.custom() {
        if weight > 0.0 && cumulative >= ROLL_RANGE - WEIGHT_EPSILON {
            warnings.push(RateWarning::UnreachableTier {
                tier: tier.clone(),
                start: cumulative,
            });
        }
        cumulative += weight;
    }

    warnings
}
