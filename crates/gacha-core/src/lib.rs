//! Core types for the gacha engine: tiers, banners, rewards, and settings.
//!
//! This crate is the data model only. It performs no I/O and draws no random
//! numbers; banners and settings are deserialized from JSON or built in code.

/// Banner definitions: rates, pools, guarantees, and tickets.
pub mod banner;
/// Per-draw results.
pub mod draw;
/// Error types used throughout the workspace.
pub mod error;
/// Global settings: broadcast list, tier effects, active banners.
pub mod settings;
/// Tier labels and their ordering.
pub mod tier;

/// Re-export banner types.
pub use banner::{
    BannerConfig, Guarantees, LoreLine, RateTable, RewardEntry, TicketPrice, TicketSpec, Tickets,
};
/// Re-export draw results.
pub use draw::DrawResult;
/// Re-export error types.
pub use error::{ConfigError, GachaError, GachaResult};
/// Re-export settings types.
pub use settings::{BroadcastSettings, GachaSettings, TierEffect};
/// Re-export tier types.
pub use tier::{FixedTier, Tier};
