//! Handing rewards to players.
//!
//! The engine never materializes items itself. A [`RewardSink`] does, and
//! [`deliver`] wraps it with the fallback policy: try the full grant (display
//! name, lore, extra data), and if that fails grant the bare item instead. A
//! failed delivery is never a failed draw.

use gacha_core::RewardEntry;
use tracing::{error, warn};

/// The player a draw is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Display name.
    pub name: String,
    /// Operator privilege: sees delivery warnings, may run admin commands.
    pub privileged: bool,
}

impl Player {
    /// A regular player.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            privileged: false,
        }
    }

    /// An operator.
    pub fn operator(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            privileged: true,
        }
    }
}

/// Why a grant failed.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The item id is not known to the host.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// The extra-data payload could not be applied.
    #[error("invalid item data: {0}")]
    InvalidData(String),

    /// Any other host failure.
    #[error("{0}")]
    Host(String),
}

/// Materializes rewards in the host.
pub trait RewardSink {
    /// Grant the reward with all of its display data.
    fn give(&mut self, player: &Player, reward: &RewardEntry) -> Result<(), DeliveryError>;

    /// Grant only the item and count.
    fn give_bare(&mut self, player: &Player, item: &str, count: u32) -> Result<(), DeliveryError>;
}

/// How a delivery went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Full grant succeeded.
    Delivered,
    /// Full grant failed; the bare item was granted instead.
    Degraded {
        /// Message for the player. Only set for privileged players.
        warning: Option<String>,
    },
    /// Neither grant succeeded.
    Failed,
}

/// Grant a reward, falling back to a bare grant.
pub fn deliver(
    sink: &mut dyn RewardSink,
    player: &Player,
    reward: &RewardEntry,
) -> DeliveryOutcome {
    let err = match sink.give(player, reward) {
        Ok(()) => return DeliveryOutcome::Delivered,
        Err(e) => e,
    };
    warn!(
        player = %player.name,
        item = %reward.item,
        "reward grant failed, granting bare item: {err}"
    );

    match sink.give_bare(player, &reward.item, reward.grant_count()) {
        Ok(()) => DeliveryOutcome::Degraded {
            warning: player
                .privileged
                .then(|| format!("item properties not applied, granted plain item: {err}")),
        },
        Err(e) => {
            error!(player = %player.name, item = %reward.item, "bare grant failed: {e}");
            DeliveryOutcome::Failed
        }
    }
}

/// A grant recorded by [`Ledger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    /// Recipient name.
    pub player: String,
    /// Item id.
    pub item: String,
    /// Stack size.
    pub count: u32,
    /// Whether display data was applied.
    pub full: bool,
}

/// A sink that records grants in memory.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    /// Grants in the order they happened.
    pub grants: Vec<Grant>,
}

impl Ledger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RewardSink for Ledger {
    fn give(&mut self, player: &Player, reward: &RewardEntry) -> Result<(), DeliveryError> {
        self.grants.push(Grant {
            player: player.name.clone(),
            item: reward.item.clone(),
            count: reward.grant_count(),
            full: true,
        });
        Ok(())
    }

    fn give_bare(&mut self, player: &Player, item: &str, count: u32) -> Result<(), DeliveryError> {
        self.grants.push(Grant {
            player: player.name.clone(),
            item: item.to_string(),
            count,
            full: false,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rejects every full grant that carries extra data.
    struct StrictSink {
        ledger: Ledger,
        bare_fails: bool,
    }

    impl RewardSink for StrictSink {
        fn give(&mut self, player: &Player, reward: &RewardEntry) -> Result<(), DeliveryError> {
            if let Some(nbt) = &reward.nbt {
                return Err(DeliveryError::InvalidData(nbt.clone()));
            }
            self.ledger.give(player, reward)
        }

        fn give_bare(
            &mut self,
            player: &Player,
            item: &str,
            count: u32,
        ) -> Result<(), DeliveryError> {
            if self.bare_fails {
                return Err(DeliveryError::UnknownItem(item.to_string()));
            }
            self.ledger.give_bare(player, item, count)
        }
    }

    fn tagged_reward() -> RewardEntry {
        let mut reward = RewardEntry::new("minecraft:diamond_sword", 0);
        reward.nbt = Some("{Unbreakable:1b".to_string());
        reward
    }

    #[test]
    fn full_grant() {
        let mut sink = Ledger::new();
        let outcome = deliver(
            &mut sink,
            &Player::new("Steve"),
            &RewardEntry::new("minecraft:apple", 3),
        );
        assert_eq!(outcome, DeliveryOutcome::Delivered);
        assert_eq!(sink.grants[0].count, 3);
        assert!(sink.grants[0].full);
    }

    #[test]
    fn degraded_grant_silent_for_players() {
        let mut sink = StrictSink {
            ledger: Ledger::new(),
            bare_fails: false,
        };
        let outcome = deliver(&mut sink, &Player::new("Alex"), &tagged_reward());
        assert_eq!(outcome, DeliveryOutcome::Degraded { warning: None });
        assert_eq!(sink.ledger.grants.len(), 1);
        assert!(!sink.ledger.grants[0].full);
        assert_eq!(sink.ledger.grants[0].count, 1);
    }

    #[test]
    fn degraded_grant_warns_operators() {
        let mut sink = StrictSink {
            ledger: Ledger::new(),
            bare_fails: false,
        };
        let outcome = deliver(&mut sink, &Player::operator("Admin"), &tagged_reward());
        match outcome {
            DeliveryOutcome::Degraded { warning: Some(msg) } => {
                assert!(msg.contains("Unbreakable"))
            }
            other => panic!("expected warning, got {other:?}"),
        }
    }

    #[test]
    fn both_grants_fail() {
        let mut sink = StrictSink {
            ledger: Ledger::new(),
            bare_fails: true,
        };
        let outcome = deliver(&mut sink, &Player::new("Alex"), &tagged_reward());
        assert_eq!(outcome, DeliveryOutcome::Failed);
        assert!(sink.ledger.grants.is_empty());
    }
}
