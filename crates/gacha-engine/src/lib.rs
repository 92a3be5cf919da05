//! Draw engine for gacha banners.
//!
//! Loads banner documents through a [`ConfigSource`], caches them in a
//! [`BannerRegistry`], and draws weighted tiers and rewards with ten-draw
//! guarantees. [`GachaEngine`] ties it together; rewards leave through a
//! [`RewardSink`].

pub mod delivery;
pub mod draw;
pub mod engine;
pub mod registry;
pub mod shop;
pub mod source;

pub use delivery::{DeliveryError, DeliveryOutcome, Grant, Ledger, Player, RewardSink, deliver};
pub use draw::{BATCH_SIZE, RateWarning, apply_guarantees, audit_rates, draw_tier};
pub use engine::{
    Announcement, BannerSummary, DrawReport, EngineConfig, GachaEngine, Redemption, SharedEngine,
};
pub use registry::{BannerRegistry, ReloadReport};
pub use shop::{ShopOffer, is_multi_kind, shop_offers};
pub use source::{ConfigSource, DirSource, MemorySource};
