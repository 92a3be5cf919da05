//! Banner definitions as they are read from configuration.

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::tier::{FixedTier, Tier};

/// Percentage weights per tier, kept in declaration order.
///
/// Order matters: custom tiers claim consecutive slices of the roll range in
/// the order they were written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    entries: Vec<(Tier, f64)>,
}

impl RateTable {
    /// Create an empty rate table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a tier's weight. Re-setting a tier keeps its original position.
    pub fn set(&mut self, tier: impl Into<Tier>, weight: f64) {
        let tier = tier.into();
        match self.entries.iter_mut().find(|(t, _)| *t == tier) {
            Some(entry) => entry.1 = weight,
            None => self.entries.push((tier, weight)),
        }
    }

    /// Builder form of [`RateTable::set`].
    pub fn with(mut self, tier: impl Into<Tier>, weight: f64) -> Self {
        self.set(tier, weight);
        self
    }

    /// Weight of a tier, or `0.0` when the tier is absent.
    pub fn weight(&self, tier: &Tier) -> f64 {
        self.entries
            .iter()
            .find(|(t, _)| t == tier)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }

    /// Weight of a fixed tier, or `0.0` when absent.
    pub fn fixed_weight(&self, tier: FixedTier) -> f64 {
        self.weight(&Tier::Fixed(tier))
    }

    /// Custom tiers and their weights, in declaration order.
    pub fn custom(&self) -> impl Iterator<Item = (&Tier, f64)> {
        self.entries
            .iter()
            .filter(|(t, _)| t.is_custom())
            .map(|(t, w)| (t, *w))
    }

    /// All tiers and weights, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Tier, f64)> {
        self.entries.iter().map(|(t, w)| (t, *w))
    }

    /// Sum of the four fixed-tier weights.
    pub fn fixed_total(&self) -> f64 {
        FixedTier::DRAW_ORDER
            .iter()
            .map(|t| self.fixed_weight(*t))
            .sum()
    }

    /// Sum of every weight, fixed and custom.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, w)| *w).sum()
    }

    /// Number of tiers declared.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no tiers are declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for RateTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (tier, weight) in &self.entries {
            map.serialize_entry(tier.label(), weight)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RateTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RateVisitor;

        impl<'de> Visitor<'de> for RateVisitor {
            type Value = RateTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of tier label to percentage weight")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RateTable, A::Error> {
                let mut table = RateTable::new();
                while let Some((label, weight)) = access.next_entry::<String, f64>()? {
                    table.set(Tier::from(label), weight);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(RateVisitor)
    }
}

/// A line of ticket lore: plain text, or text with a color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoreLine {
    /// Plain text, shown gray.
    Plain(String),
    /// Text with an explicit color.
    Styled {
        /// The text to show.
        text: String,
        /// Color name; gray when absent.
        #[serde(default)]
        color: Option<String>,
    },
}

impl LoreLine {
    /// The line's text.
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(s) => s,
            Self::Styled { text, .. } => text,
        }
    }

    /// The line's color, defaulting to gray.
    pub fn color(&self) -> &str {
        match self {
            Self::Plain(_) => "gray",
            Self::Styled { color, .. } => color.as_deref().unwrap_or("gray"),
        }
    }
}

/// A concrete reward that a draw can hand out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardEntry {
    /// Item identifier (e.g. `minecraft:diamond`).
    pub item: String,
    /// Stack size. Numeric strings are accepted; anything unparsable is 1.
    #[serde(default = "default_count", deserialize_with = "deserialize_count")]
    pub count: u32,
    /// Label used in chat and announcements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Custom display name stamped on the item itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    /// Lore lines stamped on the item.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item_lore: Vec<String>,
    /// Raw extra-data payload passed through to delivery untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbt: Option<String>,
}

fn default_count() -> u32 {
    1
}

/// Deployed configs write counts as numbers or as strings like `"8"`. Leading
/// digits are taken; a value with none becomes 1 rather than failing the
/// whole banner.
fn deserialize_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let count = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n
            .as_f64()
            .filter(|n| *n >= 1.0)
            .map(|n| n.min(f64::from(u32::MAX)) as u32),
        serde_json::Value::String(s) => leading_count(&s),
        _ => None,
    };
    Ok(count.unwrap_or_else(default_count))
}

fn leading_count(s: &str) -> Option<u32> {
    let s = s.trim_start();
    let digits = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..digits].parse().ok().filter(|n| *n > 0)
}

impl RewardEntry {
    /// A bare reward with no display data.
    pub fn new(item: impl Into<String>, count: u32) -> Self {
        Self {
            item: item.into(),
            count,
            name: None,
            item_name: None,
            item_lore: Vec::new(),
            nbt: None,
        }
    }

    /// Set the chat label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Label for chat output, falling back to the item id.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.item)
    }

    /// Stack size to grant. A configured count of zero grants one.
    pub fn grant_count(&self) -> u32 {
        self.count.max(1)
    }
}

/// Minimum-count and floor rules applied to ten-draw batches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guarantees {
    /// At least one result must meet this tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rarity: Option<Tier>,
    /// Required number of `SSR` results.
    #[serde(default, rename = "minSSR", skip_serializing_if = "Option::is_none")]
    pub min_ssr: Option<u32>,
    /// Required number of `SR` results.
    #[serde(default, rename = "minSR", skip_serializing_if = "Option::is_none")]
    pub min_sr: Option<u32>,
}

/// Price of a ticket at the vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketPrice {
    /// Currency item id.
    pub item: String,
    /// Amount of the currency item.
    #[serde(default = "default_count")]
    pub count: u32,
}

/// A ticket descriptor. Consumed by the vendor and the ticket trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketSpec {
    /// Ticket kind identifier; `*_10` kinds trigger a ten-draw.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Display color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Bold display name.
    #[serde(default)]
    pub bold: bool,
    /// Lore lines.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lore: Vec<LoreLine>,
    /// Vendor price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<TicketPrice>,
}

impl TicketSpec {
    /// A ticket with only a kind set.
    pub fn of_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            name: None,
            color: None,
            bold: false,
            lore: Vec::new(),
            price: None,
        }
    }
}

/// Single and ten-draw ticket descriptors of a banner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tickets {
    /// Single-draw ticket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single: Option<TicketSpec>,
    /// Ten-draw ticket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi: Option<TicketSpec>,
}

impl Tickets {
    /// Declared ticket kinds, single first.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        [self.single.as_ref(), self.multi.as_ref()]
            .into_iter()
            .flatten()
            .filter_map(|t| t.kind.as_deref())
    }
}

/// A named draw pool. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerConfig {
    /// Registry key. Filled from the file name, not the document.
    #[serde(skip)]
    pub name: String,
    /// Human label.
    #[serde(
        default,
        alias = "_bannerName",
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,
    /// Tier weights.
    pub rates: RateTable,
    /// Reward pools per tier. A `null` pool reads as empty.
    #[serde(deserialize_with = "deserialize_pools")]
    pub pools: HashMap<Tier, Vec<RewardEntry>>,
    /// Ten-draw guarantee rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guarantees: Option<Guarantees>,
    /// Ticket descriptors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tickets: Option<Tickets>,
}

fn deserialize_pools<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<HashMap<Tier, Vec<RewardEntry>>, D::Error> {
    let raw = HashMap::<Tier, Option<Vec<RewardEntry>>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(tier, pool)| (tier, pool.unwrap_or_default()))
        .collect())
}

impl BannerConfig {
    /// Create an empty banner.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            rates: RateTable::new(),
            pools: HashMap::new(),
            guarantees: None,
            tickets: None,
        }
    }

    /// Parse a banner document, naming it `name`.
    pub fn from_json(name: &str, json: &str) -> serde_json::Result<Self> {
        let mut banner: Self = serde_json::from_str(json)?;
        banner.name = name.to_string();
        Ok(banner)
    }

    /// Display label, falling back to the registry name.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// The reward pool for a tier; empty when absent.
    pub fn pool(&self, tier: &Tier) -> &[RewardEntry] {
        self.pools.get(tier).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Declared ticket kinds.
    pub fn ticket_kinds(&self) -> impl Iterator<Item = &str> {
        self.tickets.iter().flat_map(|t| t.kinds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "displayName": "Spring Festival",
        "rates": { "SSR": 1, "SR": 9, "R": 30, "N": 55, "新春限定": 3, "UP": 2 },
        "pools": {
            "SSR": [{ "item": "minecraft:nether_star", "name": "Nether Star" }],
            "R": [{ "item": "minecraft:iron_ingot", "count": 8 }],
            "UP": []
        },
        "guarantees": { "minRarity": "R", "minSSR": 1, "minSR": 2 },
        "tickets": {
            "single": { "type": "spring", "name": "Spring Ticket", "lore": ["One draw"] },
            "multi": { "type": "spring_10", "lore": [{ "text": "Ten draws", "color": "gold" }] }
        }
    }"#;

    #[test]
    fn parse_full_banner() {
        let banner = BannerConfig::from_json("spring", SAMPLE).unwrap();
        assert_eq!(banner.name, "spring");
        assert_eq!(banner.display_name(), "Spring Festival");
        assert_eq!(banner.rates.fixed_weight(FixedTier::Ssr), 1.0);
        assert_eq!(banner.pool(&Tier::R)[0].count, 8);
        assert_eq!(banner.pool(&Tier::SSR)[0].count, 1);
        assert!(banner.pool(&Tier::parse("UP")).is_empty());
        assert!(banner.pool(&Tier::SR).is_empty());

        let g = banner.guarantees.as_ref().unwrap();
        assert_eq!(g.min_rarity, Some(Tier::R));
        assert_eq!(g.min_ssr, Some(1));
        assert_eq!(g.min_sr, Some(2));

        let kinds: Vec<&str> = banner.ticket_kinds().collect();
        assert_eq!(kinds, vec!["spring", "spring_10"]);
    }

    #[test]
    fn custom_tiers_keep_declaration_order() {
        let banner = BannerConfig::from_json("spring", SAMPLE).unwrap();
        let custom: Vec<&str> = banner.rates.custom().map(|(t, _)| t.label()).collect();
        assert_eq!(custom, vec!["新春限定", "UP"]);
    }

    #[test]
    fn legacy_display_name_key() {
        let json = r#"{ "_bannerName": "Old", "rates": {}, "pools": {} }"#;
        let banner = BannerConfig::from_json("old", json).unwrap();
        assert_eq!(banner.display_name(), "Old");
    }

    #[test]
    fn display_name_falls_back_to_name() {
        let json = r#"{ "rates": { "R": 100 }, "pools": {} }"#;
        let banner = BannerConfig::from_json("plain", json).unwrap();
        assert_eq!(banner.display_name(), "plain");
    }

    #[test]
    fn null_pool_reads_as_empty() {
        let json = r#"{
            "rates": { "SSR": 1, "R": 99 },
            "pools": { "SSR": null, "R": [{ "item": "minecraft:iron_ingot" }] }
        }"#;
        let banner = BannerConfig::from_json("nulls", json).unwrap();
        assert!(banner.pool(&Tier::SSR).is_empty());
        assert_eq!(banner.pool(&Tier::R).len(), 1);
    }

    #[test]
    fn string_counts_are_parsed() {
        let json = r#"{
            "rates": { "R": 100 },
            "pools": {
                "R": [
                    { "item": "a", "count": "8" },
                    { "item": "b", "count": "abc" },
                    { "item": "c", "count": "12 pieces" },
                    { "item": "d", "count": 4.7 },
                    { "item": "e", "count": -3 },
                    { "item": "f", "count": null }
                ]
            }
        }"#;
        let banner = BannerConfig::from_json("counts", json).unwrap();
        let counts: Vec<u32> = banner.pool(&Tier::R).iter().map(|r| r.count).collect();
        assert_eq!(counts, vec![8, 1, 12, 4, 1, 1]);
    }

    #[test]
    fn missing_pools_is_an_error() {
        assert!(BannerConfig::from_json("x", r#"{ "rates": { "R": 100 } }"#).is_err());
        assert!(BannerConfig::from_json("x", r#"{ "pools": {} }"#).is_err());
    }

    #[test]
    fn lore_line_forms() {
        let banner = BannerConfig::from_json("spring", SAMPLE).unwrap();
        let tickets = banner.tickets.unwrap();
        let single = tickets.single.unwrap();
        assert_eq!(single.lore[0].text(), "One draw");
        assert_eq!(single.lore[0].color(), "gray");
        let multi = tickets.multi.unwrap();
        assert_eq!(multi.lore[0].color(), "gold");
    }

    #[test]
    fn rate_table_set_keeps_position() {
        let mut rates = RateTable::new().with("SSR", 1.0).with("UP", 2.0).with("R", 3.0);
        rates.set("UP", 5.0);
        let order: Vec<&str> = rates.iter().map(|(t, _)| t.label()).collect();
        assert_eq!(order, vec!["SSR", "UP", "R"]);
        assert_eq!(rates.weight(&Tier::parse("UP")), 5.0);
        assert_eq!(rates.total(), 9.0);
        assert_eq!(rates.fixed_total(), 4.0);
    }

    #[test]
    fn reward_label_and_count() {
        let bare = RewardEntry::new("minecraft:dirt", 0);
        assert_eq!(bare.label(), "minecraft:dirt");
        assert_eq!(bare.grant_count(), 1);
        let named = RewardEntry::new("minecraft:dirt", 3).with_name("Dirt");
        assert_eq!(named.label(), "Dirt");
        assert_eq!(named.grant_count(), 3);
    }
}
