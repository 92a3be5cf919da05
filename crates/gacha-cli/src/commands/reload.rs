use colored::Colorize;
use gacha_engine::{GachaEngine, Player};

use super::Context;

/// Reload as the console operator and report the result.
pub fn run(ctx: &Context) -> Result<(), String> {
    let mut engine = GachaEngine::new(ctx.source()?, ctx.engine_config());
    let report = engine
        .reload_as(&Player::operator("console"))
        .map_err(|e| e.to_string())?;

    super::print_failures(&report);
    if report.loaded.is_empty() {
        println!("  {} no banners loaded", "!".yellow());
    } else {
        println!(
            "  {} loaded: {}",
            "✓".green(),
            report.loaded.join(", ")
        );
    }
    println!("  {} failed", report.failed.len());

    Ok(())
}
