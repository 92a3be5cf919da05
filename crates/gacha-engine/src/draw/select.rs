//! Picking a concrete reward from a tier's pool.

use std::collections::HashMap;

use gacha_core::{RewardEntry, Tier};
use rand::Rng;
use rand::rngs::StdRng;

/// Pick a reward uniformly. `None` for an empty pool.
pub fn select<'a>(pool: &'a [RewardEntry], rng: &mut StdRng) -> Option<&'a RewardEntry> {
    if pool.is_empty() {
        None
    } else {
        Some(&pool[rng.random_range(0..pool.len())])
    }
}

/// Pick a reward for a drawn tier, falling back to `R`, then `N`, when the
/// tier's pool is empty or missing.
///
/// Returns the reward and the tier it actually came from. `None` means all
/// three pools are empty; the caller must abort the draw rather than invent
/// a reward.
pub fn select_for_tier(
    pools: &HashMap<Tier, Vec<RewardEntry>>,
    tier: &Tier,
    rng: &mut StdRng,
) -> Option<(RewardEntry, Tier)> {
    [tier, &Tier::R, &Tier::N].into_iter().find_map(|candidate| {
        let pool = pools.get(candidate).map(Vec::as_slice).unwrap_or(&[]);
        select(pool, rng).map(|reward| (reward.clone(), candidate.clone()))
    })
}
