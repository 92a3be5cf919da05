use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::draw::DrawResult;
use crate::tier::{FixedTier, Tier};

/// Banners loaded when the settings document does not declare any.
pub const DEFAULT_ACTIVE_BANNERS: [&str; 4] = ["normal", "advanced", "legendary", "standard"];

/// Server-wide announcement settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastSettings {
    /// Master switch.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Tier labels worth announcing.
    #[serde(default)]
    pub rarities: Vec<Tier>,
}

fn default_true() -> bool {
    true
}

impl Default for BroadcastSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            rarities: vec![Tier::SSR, Tier::parse("UP"), Tier::parse("新春限定")],
        }
    }
}

/// Sound/particle/message treatment for a tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierEffect {
    /// Sound event id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    /// Particle id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub particle: Option<String>,
    /// Particle count.
    #[serde(default = "default_particle_count")]
    pub particle_count: u32,
    /// Extra message shown to the player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Message color.
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_particle_count() -> u32 {
    30
}

fn default_color() -> String {
    "gold".to_string()
}

/// The global settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GachaSettings {
    /// Declared active banners, loaded at startup and on reload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banners: Option<Vec<String>>,
    /// Broadcast settings. Required: a document without it is rejected.
    pub broadcast: BroadcastSettings,
    /// Per-tier effects.
    #[serde(default)]
    pub rarity_effects: HashMap<Tier, TierEffect>,
}

impl GachaSettings {
    /// Parse a settings document.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// The banners to load, falling back to [`DEFAULT_ACTIVE_BANNERS`].
    pub fn active_banners(&self) -> Vec<String> {
        match &self.banners {
            Some(list) => list.clone(),
            None => DEFAULT_ACTIVE_BANNERS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Whether a result of this tier is announced server-wide.
    pub fn should_broadcast(&self, tier: &Tier) -> bool {
        self.broadcast.enabled && self.broadcast.rarities.contains(tier)
    }

    /// Effect for a tier. Tiers without their own entry borrow from `SSR`
    /// (premium tiers) or `SR`.
    pub fn effect_for(&self, tier: &Tier) -> Option<&TierEffect> {
        if let Some(effect) = self.rarity_effects.get(tier) {
            return Some(effect);
        }
        if tier.is_premium() {
            self.rarity_effects.get(&Tier::SSR)
        } else if *tier == Tier::SR {
            self.rarity_effects.get(&Tier::SR)
        } else {
            None
        }
    }
}

/// The result that headlines a ten-draw: the last premium result, else the
/// first `SR`, else none.
pub fn headline(results: &[DrawResult]) -> Option<&DrawResult> {
    results
        .iter()
        .rev()
        .find(|r| r.tier.is_premium())
        .or_else(|| results.iter().find(|r| r.tier == Tier::SR))
}

/// Tier whose effect plays after a ten-draw.
pub fn batch_effect_tier(results: &[DrawResult]) -> Tier {
    headline(results)
        .map(|r| r.tier.clone())
        .unwrap_or(Tier::Fixed(FixedTier::R))
}
