use colored::Colorize;
use gacha_core::RewardEntry;
use gacha_engine::{DeliveryError, DeliveryOutcome, Player, RewardSink};

use super::Context;

/// Prints every grant instead of handing out items. Extra data that is not
/// a compound tag is rejected, as the game would.
struct ConsoleSink;

impl RewardSink for ConsoleSink {
    fn give(&mut self, player: &Player, reward: &RewardEntry) -> Result<(), DeliveryError> {
        if let Some(nbt) = reward.nbt.as_deref().filter(|n| !n.starts_with('{')) {
            return Err(DeliveryError::InvalidData(nbt.to_string()));
        }
        println!(
            "  {} {} x{} ({})",
            player.name.dimmed(),
            reward.label(),
            reward.grant_count(),
            reward.item.dimmed()
        );
        Ok(())
    }

    fn give_bare(&mut self, player: &Player, item: &str, count: u32) -> Result<(), DeliveryError> {
        println!("  {} {item} x{count}", player.name.dimmed());
        Ok(())
    }
}

pub fn run(ctx: &Context, kind: &str, player: &str, op: bool) -> Result<(), String> {
    let mut engine = ctx.engine()?;
    let player = if op {
        Player::operator(player)
    } else {
        Player::new(player)
    };

    println!("  {}", "Granting:".dimmed());
    let redemption = engine
        .redeem(&player, kind, &mut ConsoleSink)
        .map_err(|e| format!("{e}; ticket not consumed"))?;
    println!();

    super::print_report(&redemption.report);

    for warning in redemption.warnings() {
        eprintln!("  {} {warning}", "warning:".yellow());
    }
    let failed = redemption
        .deliveries
        .iter()
        .filter(|d| **d == DeliveryOutcome::Failed)
        .count();
    if failed > 0 {
        eprintln!("  {} {failed} rewards could not be delivered", "warning:".yellow());
    }

    println!();
    println!("  ticket {} consumed", kind.bold());
    Ok(())
}
