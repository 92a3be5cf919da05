use serde::{Deserialize, Serialize};

use crate::banner::RewardEntry;
use crate::tier::Tier;

/// The outcome of one draw. Ephemeral; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawResult {
    /// Tier the reward was taken from (after any pool fallback).
    pub tier: Tier,
    /// The reward handed out.
    pub reward: RewardEntry,
    /// Registry name of the banner drawn from.
    pub banner: String,
}

impl DrawResult {
    /// Create a draw result.
    pub fn new(tier: Tier, reward: RewardEntry, banner: impl Into<String>) -> Self {
        Self {
            tier,
            reward,
            banner: banner.into(),
        }
    }
}
