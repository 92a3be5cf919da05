//! The draw façade: registry + settings + RNG.
//!
//! [`GachaEngine`] resolves a banner, draws one or ten results, applies the
//! ten-draw guarantees, and packages what the presentation layer needs in a
//! [`DrawReport`]. It never renders or grants anything itself; rewards go
//! through a [`RewardSink`].

use std::sync::Arc;

use gacha_core::settings::batch_effect_tier;
use gacha_core::{
    BannerConfig, DrawResult, FixedTier, GachaError, GachaResult, GachaSettings, Tier, TierEffect,
};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::delivery::{DeliveryOutcome, Player, RewardSink, deliver};
use crate::draw::{BATCH_SIZE, apply_guarantees, draw, select_for_tier};
use crate::registry::{BannerRegistry, ReloadReport};
use crate::shop::{ShopOffer, is_multi_kind, shop_offers};
use crate::source::ConfigSource;

/// Engine configuration.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// RNG seed for reproducible draws. Seeded from the OS when unset.
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// A server-wide announcement of a rare result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Announcement {
    /// Who drew it.
    pub player: String,
    /// Banner display name.
    pub banner_display: String,
    /// Tier drawn.
    pub tier: Tier,
    /// Reward label.
    pub reward_label: String,
}

/// Everything the presentation layer needs about a draw.
#[derive(Debug, Clone, Serialize)]
pub struct DrawReport {
    /// Who drew.
    pub player: String,
    /// Banner registry name.
    pub banner: String,
    /// Banner display name.
    pub display_name: String,
    /// Results in draw order.
    pub results: Vec<DrawResult>,
    /// One per broadcast-worthy result.
    pub announcements: Vec<Announcement>,
    /// Tier whose effect plays.
    pub effect_tier: Tier,
    /// Effect for `effect_tier`, if configured.
    pub effect: Option<TierEffect>,
    /// Tier counts, in first-seen order.
    pub tally: Vec<(Tier, usize)>,
}

impl DrawReport {
    /// Returns true for a ten-draw.
    pub fn is_batch(&self) -> bool {
        self.results.len() > 1
    }
}

/// The outcome of using a ticket. Receiving one means the ticket should be
/// consumed; an error means it should not.
#[derive(Debug, Clone)]
pub struct Redemption {
    /// What was drawn.
    pub report: DrawReport,
    /// Delivery outcome per result, same order.
    pub deliveries: Vec<DeliveryOutcome>,
}

impl Redemption {
    /// Warnings to show the player (only ever set for privileged players).
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.deliveries.iter().filter_map(|d| match d {
            DeliveryOutcome::Degraded { warning } => warning.as_deref(),
            _ => None,
        })
    }
}

/// One row of the banner listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BannerSummary {
    /// Registry name.
    pub name: String,
    /// Display name.
    pub display_name: String,
    /// `SSR` weight in percent.
    pub ssr_rate: f64,
    /// Ticket kinds the banner answers to.
    pub tickets: Vec<String>,
}

/// The draw engine.
pub struct GachaEngine<S> {
    registry: BannerRegistry<S>,
    settings: GachaSettings,
    rng: StdRng,
}

impl<S: ConfigSource> GachaEngine<S> {
    /// An engine with nothing loaded and default settings.
    pub fn new(source: S, config: EngineConfig) -> Self {
        Self {
            registry: BannerRegistry::new(source),
            settings: GachaSettings::default(),
            rng: config.rng(),
        }
    }

    /// An engine with settings and the declared active banners loaded.
    pub fn start(source: S, config: EngineConfig) -> (Self, ReloadReport) {
        let mut engine = Self::new(source, config);
        let report = engine.reload();
        (engine, report)
    }

    /// The banner registry.
    pub fn registry(&self) -> &BannerRegistry<S> {
        &self.registry
    }

    /// Mutable access to the banner registry.
    pub fn registry_mut(&mut self) -> &mut BannerRegistry<S> {
        &mut self.registry
    }

    /// The active settings.
    pub fn settings(&self) -> &GachaSettings {
        &self.settings
    }

    /// Re-read settings, then reload the declared active banners. A missing
    /// or malformed settings document falls back to the defaults.
    pub fn reload(&mut self) -> ReloadReport {
        self.settings = match self.registry.source().read_settings() {
            Ok(settings) => {
                info!("settings loaded");
                settings
            }
            Err(e) => {
                warn!("using default settings: {e}");
                GachaSettings::default()
            }
        };
        let active = self.settings.active_banners();
        let report = self.registry.reload(&active);
        info!(banners = %report.loaded.join(", "), "gacha config loaded");
        report
    }

    /// Operator-only [`GachaEngine::reload`].
    pub fn reload_as(&mut self, player: &Player) -> GachaResult<ReloadReport> {
        if !player.privileged {
            return Err(GachaError::PermissionDenied("reload".to_string()));
        }
        Ok(self.reload())
    }

    /// Loaded banners with their `SSR` weight.
    pub fn list(&self) -> Vec<BannerSummary> {
        self.registry
            .banners()
            .map(|b| BannerSummary {
                name: b.name.clone(),
                display_name: b.display_name().to_string(),
                ssr_rate: b.rates.fixed_weight(FixedTier::Ssr),
                tickets: b.ticket_kinds().map(str::to_string).collect(),
            })
            .collect()
    }

    /// Ticket offers for every loaded banner.
    pub fn shop(&self) -> Vec<ShopOffer> {
        shop_offers(self.registry.banners())
    }

    /// One draw.
    pub fn draw_single(&mut self, banner: &str) -> GachaResult<DrawResult> {
        let banner = self.registry.resolve(banner)?;
        draw_once(banner, &mut self.rng)
    }

    /// Ten draws with guarantees applied. Any exhausted pool aborts the
    /// whole batch; nothing partial is returned.
    pub fn draw_batch(&mut self, banner: &str) -> GachaResult<Vec<DrawResult>> {
        let banner = self.registry.resolve(banner)?;
        let mut results = (0..BATCH_SIZE)
            .map(|_| draw_once(banner, &mut self.rng))
            .collect::<GachaResult<Vec<_>>>()?;
        for fix in apply_guarantees(&mut results, banner, &mut self.rng) {
            debug!(
                banner = %banner.name,
                slot = fix.slot,
                rule = %fix.rule,
                tier = %fix.tier,
                "guarantee applied"
            );
        }
        Ok(results)
    }

    /// One or ten draws.
    pub fn draw(&mut self, banner: &str, count: usize) -> GachaResult<Vec<DrawResult>> {
        match count {
            1 => self.draw_single(banner).map(|r| vec![r]),
            BATCH_SIZE => self.draw_batch(banner),
            other => Err(GachaError::InvalidDrawCount(other)),
        }
    }

    /// Package results for presentation: announcements, effect, tally.
    pub fn report(&self, player: &Player, banner: &str, results: Vec<DrawResult>) -> DrawReport {
        let display_name = self
            .registry
            .get(banner)
            .map(|b| b.display_name().to_string())
            .unwrap_or_else(|| banner.to_string());

        let announcements: Vec<Announcement> = results
            .iter()
            .filter(|r| self.settings.should_broadcast(&r.tier))
            .map(|r| Announcement {
                player: player.name.clone(),
                banner_display: display_name.clone(),
                tier: r.tier.clone(),
                reward_label: r.reward.label().to_string(),
            })
            .collect();
        for a in &announcements {
            info!(player = %a.player, tier = %a.tier, reward = %a.reward_label, "broadcast");
        }

        let effect_tier = match results.as_slice() {
            [single] => single.tier.clone(),
            batch => batch_effect_tier(batch),
        };
        let effect = self.settings.effect_for(&effect_tier).cloned();

        DrawReport {
            player: player.name.clone(),
            banner: banner.to_string(),
            display_name,
            tally: tally(&results),
            results,
            announcements,
            effect_tier,
            effect,
        }
    }

    /// Use a ticket: find its banner, draw one or ten depending on the kind's
    /// `_10` suffix, and deliver every reward.
    pub fn redeem(
        &mut self,
        player: &Player,
        ticket_kind: &str,
        sink: &mut dyn RewardSink,
    ) -> GachaResult<Redemption> {
        let banner = self
            .registry
            .ticket_owner(ticket_kind)
            .ok_or_else(|| GachaError::UnknownTicket(ticket_kind.to_string()))?
            .to_string();

        let results = if is_multi_kind(ticket_kind) {
            self.draw_batch(&banner)?
        } else {
            vec![self.draw_single(&banner)?]
        };

        let deliveries = results
            .iter()
            .map(|r| deliver(sink, player, &r.reward))
            .collect();
        let report = self.report(player, &banner, results);

        Ok(Redemption { report, deliveries })
    }
}

fn draw_once(banner: &BannerConfig, rng: &mut StdRng) -> GachaResult<DrawResult> {
    let tier = draw(&banner.rates, rng);
    match select_for_tier(&banner.pools, &tier, rng) {
        Some((reward, effective)) => Ok(DrawResult::new(effective, reward, banner.name.clone())),
        None => {
            warn!(banner = %banner.name, tier = %tier, "reward pool exhausted");
            Err(GachaError::PoolExhausted {
                banner: banner.name.clone(),
                tier,
            })
        }
    }
}

fn tally(results: &[DrawResult]) -> Vec<(Tier, usize)> {
    let mut counts: Vec<(Tier, usize)> = Vec::new();
    for r in results {
        match counts.iter_mut().find(|(t, _)| *t == r.tier) {
            Some(entry) => entry.1 += 1,
            None => counts.push((r.tier.clone(), 1)),
        }
    }
    counts
}

/// An engine shared across threads. Draws and reloads take the write lock,
/// so a reader never sees a registry mid-reload.
pub struct SharedEngine<S> {
    inner: Arc<RwLock<GachaEngine<S>>>,
}

impl<S> Clone for SharedEngine<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ConfigSource> SharedEngine<S> {
    /// Wrap an engine.
    pub fn new(engine: GachaEngine<S>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    /// Shared access, for listings.
    pub fn read(&self) -> RwLockReadGuard<'_, GachaEngine<S>> {
        self.inner.read()
    }

    /// Exclusive access, for draws and reloads.
    pub fn write(&self) -> RwLockWriteGuard<'_, GachaEngine<S>> {
        self.inner.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::Ledger;
    use crate::source::MemorySource;

    const SETTINGS: &str = r#"{
        "banners": ["standard", "empty"],
        "broadcast": { "enabled": true, "rarities": ["SSR", "UP"] },
        "rarityEffects": { "SSR": { "sound": "ui.toast.challenge_complete" } }
    }"#;

    const STANDARD: &str = r#"{
        "displayName": "Standard Banner",
        "rates": { "SSR": 1, "SR": 9, "R": 30, "N": 60 },
        "pools": {
            "SSR": [{ "item": "minecraft:nether_star", "name": "Nether Star" }],
            "SR": [{ "item": "minecraft:diamond", "count": 2 }],
            "R": [{ "item": "minecraft:iron_ingot", "count": 8 }],
            "N": [{ "item": "minecraft:bread", "count": 4 }]
        },
        "guarantees": { "minRarity": "R", "minSSR": 1 },
        "tickets": {
            "single": { "type": "standard", "price": { "item": "minecraft:emerald", "count": 5 } },
            "multi": { "type": "standard_10", "price": { "item": "minecraft:emerald", "count": 45 } }
        }
    }"#;

    const ALL_UP: &str = r#"{
        "rates": { "UP": 100 },
        "pools": { "UP": [{ "item": "minecraft:elytra", "name": "Elytra" }] },
        "tickets": { "single": { "type": "up" } }
    }"#;

    fn source() -> MemorySource {
        MemorySource::new()
            .with_settings(SETTINGS)
            .with_banner("standard", STANDARD)
            .with_banner("up", ALL_UP)
            .with_banner("empty", r#"{ "rates": { "SSR": 100 }, "pools": {} }"#)
    }

    fn engine() -> GachaEngine<MemorySource> {
        GachaEngine::start(source(), EngineConfig::default().with_seed(42)).0
    }

    #[test]
    fn start_loads_declared_banners() {
        let (engine, report) = GachaEngine::start(source(), EngineConfig::default().with_seed(1));
        assert_eq!(report.loaded, vec!["standard", "empty"]);
        assert!(engine.registry().get("up").is_none());
    }

    #[test]
    fn missing_settings_use_defaults() {
        let src = MemorySource::new().with_banner("normal", STANDARD);
        let (engine, report) = GachaEngine::start(src, EngineConfig::default());
        assert_eq!(report.loaded, vec!["normal"]);
        assert_eq!(report.failed.len(), 3);
        assert!(engine.settings().should_broadcast(&Tier::parse("新春限定")));
    }

    #[test]
    fn single_draw() {
        let mut engine = engine();
        let result = engine.draw_single("standard").unwrap();
        assert_eq!(result.banner, "standard");
        assert!(result.tier.as_fixed().is_some());
    }

    #[test]
    fn lazy_load_on_draw() {
        let mut engine = engine();
        let result = engine.draw_single("up").unwrap();
        assert_eq!(result.tier, Tier::parse("UP"));
        assert!(engine.registry().get("up").is_some());
    }

    #[test]
    fn batch_honors_guarantees() {
        let mut engine = engine();
        for _ in 0..20 {
            let batch = engine.draw_batch("standard").unwrap();
            assert_eq!(batch.len(), BATCH_SIZE);
            assert!(batch.iter().any(|r| r.tier == Tier::SSR));
            assert!(batch.iter().any(|r| r.tier.meets_floor(&Tier::R)));
        }
    }

    #[test]
    fn same_seed_same_draws() {
        let mut a = engine();
        let mut b = engine();
        assert_eq!(a.draw_batch("standard").unwrap(), b.draw_batch("standard").unwrap());
    }

    #[test]
    fn unavailable_banner() {
        let mut engine = engine();
        assert!(matches!(
            engine.draw_single("nope"),
            Err(GachaError::BannerUnavailable(_))
        ));
    }

    #[test]
    fn exhausted_pool_aborts() {
        let mut engine = engine();
        assert!(matches!(
            engine.draw_single("empty"),
            Err(GachaError::PoolExhausted { .. })
        ));
        assert!(matches!(
            engine.draw_batch("empty"),
            Err(GachaError::PoolExhausted { .. })
        ));
    }

    #[test]
    fn draw_count_validated() {
        let mut engine = engine();
        assert_eq!(engine.draw("standard", 1).unwrap().len(), 1);
        assert_eq!(engine.draw("standard", 10).unwrap().len(), 10);
        assert!(matches!(
            engine.draw("standard", 3),
            Err(GachaError::InvalidDrawCount(3))
        ));
    }

    #[test]
    fn redeem_single_ticket() {
        let mut engine = engine();
        engine.registry_mut().resolve("up").unwrap();
        let mut ledger = Ledger::new();
        let player = Player::new("Steve");
        let redemption = engine.redeem(&player, "up", &mut ledger).unwrap();

        assert_eq!(redemption.report.results.len(), 1);
        assert_eq!(ledger.grants.len(), 1);
        assert_eq!(ledger.grants[0].item, "minecraft:elytra");
        assert_eq!(redemption.report.announcements.len(), 1);
        assert_eq!(redemption.report.announcements[0].reward_label, "Elytra");
        // custom tier borrows the SSR effect
        assert!(redemption.report.effect.is_some());
    }

    #[test]
    fn redeem_multi_ticket() {
        let mut engine = engine();
        let mut ledger = Ledger::new();
        let redemption = engine
            .redeem(&Player::new("Alex"), "standard_10", &mut ledger)
            .unwrap();
        let report = &redemption.report;
        assert!(report.is_batch());
        assert_eq!(report.display_name, "Standard Banner");
        assert_eq!(ledger.grants.len(), BATCH_SIZE);
        assert_eq!(report.effect_tier, Tier::SSR);
        let total: usize = report.tally.iter().map(|(_, n)| n).sum();
        assert_eq!(total, BATCH_SIZE);
        let ssr = report.results.iter().filter(|r| r.tier == Tier::SSR).count();
        assert_eq!(report.announcements.len(), ssr);
        assert_eq!(redemption.warnings().count(), 0);
    }

    #[test]
    fn redeem_unknown_ticket() {
        let mut engine = engine();
        let mut ledger = Ledger::new();
        assert!(matches!(
            engine.redeem(&Player::new("Alex"), "bogus_10", &mut ledger),
            Err(GachaError::UnknownTicket(_))
        ));
        assert!(ledger.grants.is_empty());
    }

    #[test]
    fn reload_requires_privilege() {
        let mut engine = engine();
        assert!(matches!(
            engine.reload_as(&Player::new("Alex")),
            Err(GachaError::PermissionDenied(_))
        ));
        let report = engine.reload_as(&Player::operator("Admin")).unwrap();
        assert_eq!(report.loaded.len(), 2);
    }

    #[test]
    fn list_and_shop() {
        let engine = engine();
        let list = engine.list();
        assert_eq!(list[0].display_name, "Standard Banner");
        assert_eq!(list[0].ssr_rate, 1.0);
        assert_eq!(list[0].tickets, vec!["standard", "standard_10"]);
        let shop = engine.shop();
        assert_eq!(shop.len(), 2);
        assert!(shop[1].multi);
    }

    #[test]
    fn report_serializes_for_hosts() {
        let mut engine = engine();
        let results = engine.draw("up", 1).unwrap();
        let report = engine.report(&Player::new("Steve"), "up", results);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["effect_tier"], "UP");
        assert_eq!(json["announcements"][0]["player"], "Steve");
        assert_eq!(json["tally"][0][1], 1);
    }

    #[test]
    fn tally_first_seen_order() {
        let mk = |t: &str| {
            DrawResult::new(Tier::parse(t), gacha_core::RewardEntry::new("x", 1), "b")
        };
        let counts = tally(&[mk("N"), mk("SR"), mk("N"), mk("UP")]);
        assert_eq!(
            counts,
            vec![(Tier::N, 2), (Tier::SR, 1), (Tier::parse("UP"), 1)]
        );
    }

    #[test]
    fn shared_engine_across_threads() {
        let shared = SharedEngine::new(engine());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        if i == 0 {
                            shared.write().reload();
                        } else {
                            let batch = shared.write().draw_batch("standard").unwrap();
                            assert_eq!(batch.len(), BATCH_SIZE);
                        }
                        assert!(shared.read().registry().get("standard").is_some());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
