//! Ten-draw guarantees.
//!
//! After a ten-draw completes, three rules run in a fixed order and may
//! overwrite slots in place:
//!
//! 1. `minRarity`: if nothing meets the floor, slot 9 becomes a floor pick.
//! 2. `minSSR`: if `SSR` is short, slot 9 becomes an `SSR` pick. This can
//!    overwrite rule 1, and it writes at most one slot however large the
//!    shortfall.
//! 3. `minSR`: scanning slots 8 down to 0, `N`/`R` results become `SR` picks
//!    until the count is met. Slot 9 is never touched.
//!
//! A rule whose target pool is empty does nothing. Results are only ever
//! replaced; the batch never grows or shrinks.

use std::fmt;

use gacha_core::{BannerConfig, DrawResult, Guarantees, Tier};
use rand::rngs::StdRng;

use super::select::select;

/// Number of draws in a batch.
pub const BATCH_SIZE: usize = 10;

const LAST_SLOT: usize = BATCH_SIZE - 1;

/// Which guarantee rewrote a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuaranteeRule {
    /// Minimum-rarity floor.
    MinRarity,
    /// Minimum `SSR` count.
    MinSsr,
    /// Minimum `SR` count.
    MinSr,
}

impl fmt::Display for GuaranteeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MinRarity => write!(f, "minRarity"),
            Self::MinSsr => write!(f, "minSSR"),
            Self::MinSr => write!(f, "minSR"),
        }
    }
}

/// A slot rewritten by a guarantee.
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    /// Batch index that was overwritten.
    pub slot: usize,
    /// Rule responsible.
    pub rule: GuaranteeRule,
    /// Tier written.
    pub tier: Tier,
}

/// Apply the banner's guarantees to a completed ten-draw.
///
/// Batches of any other size are left alone. Returns the rewrites in the
/// order they happened.
pub fn apply_guarantees(
    batch: &mut [DrawResult],
    banner: &BannerConfig,
    rng: &mut StdRng,
) -> Vec<Correction> {
    let mut corrections = Vec::new();
    let Some(guarantees) = &banner.guarantees else {
        return corrections;
    };
    if batch.len() != BATCH_SIZE {
        return corrections;
    }

    enforce_min_rarity(batch, banner, guarantees, rng, &mut corrections);
    enforce_min_ssr(batch, banner, guarantees, rng, &mut corrections);
    enforce_min_sr(batch, banner, guarantees, rng, &mut corrections);

    corrections
}

fn count_tier(batch: &[DrawResult], tier: &Tier) -> u32 {
    batch.iter().filter(|r| r.tier == *tier).count() as u32
}

/// Overwrite `slot` with a fresh pick from `tier`'s pool. No-op on an empty pool.
fn overwrite(
    batch: &mut [DrawResult],
    slot: usize,
    tier: &Tier,
    banner: &BannerConfig,
    rng: &mut StdRng,
) -> bool {
    match select(banner.pool(tier), rng) {
        Some(reward) => {
            batch[slot] = DrawResult::new(tier.clone(), reward.clone(), banner.name.clone());
            true
        }
        None => false,
    }
}

fn enforce_min_rarity(
    batch: &mut [DrawResult],
    banner: &BannerConfig,
    guarantees: &Guarantees,
    rng: &mut StdRng,
    corrections: &mut Vec<Correction>,
) {
    let Some(floor) = &guarantees.min_rarity else {
        return;
    };
    if batch.iter().any(|r| r.tier.meets_floor(floor)) {
        return;
    }
    if overwrite(batch, LAST_SLOT, floor, banner, rng) {
        corrections.push(Correction {
            slot: LAST_SLOT,
            rule: GuaranteeRule::MinRarity,
            tier: floor.clone(),
        });
    }
}

fn enforce_min_ssr(
    batch: &mut [DrawResult],
    banner: &BannerConfig,
    guarantees: &Guarantees,
    rng: &mut StdRng,
    corrections: &mut Vec<Correction>,
) {
    let Some(min) = guarantees.min_ssr else {
        return;
    };
    if count_tier(batch, &Tier::SSR) >= min {
        return;
    }
    // One slot only, even when the shortfall is larger.
    if overwrite(batch, LAST_SLOT, &Tier::SSR, banner, rng) {
        corrections.push(Correction {
            slot: LAST_SLOT,
            rule: GuaranteeRule::MinSsr,
            tier: Tier::SSR,
        });
    }
}

fn enforce_min_sr(
    batch: &mut [DrawResult],
    banner: &BannerConfig,
    guarantees: &Guarantees,
    rng: &mut StdRng,
    corrections: &mut Vec<Correction>,
) {
    let Some(min) = guarantees.min_sr else {
        return;
    };
    let mut have = count_tier(batch, &Tier::SR);
    if have >= min || banner.pool(&Tier::SR).is_empty() {
        return;
    }
    for slot in (0..LAST_SLOT).rev() {
        if have >= min {
            break;
        }
        let tier = &batch[slot].tier;
        if (*tier == Tier::N || *tier == Tier::R)
            && overwrite(batch, slot, &Tier::SR, banner, rng)
        {
            have += 1;
            corrections.push(Correction {
                slot,
                rule: GuaranteeRule::MinSr,
                tier: Tier::SR,
            });
        }
    }
}
