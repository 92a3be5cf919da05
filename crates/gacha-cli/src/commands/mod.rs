pub mod draw;
pub mod list;
pub mod redeem;
pub mod reload;
pub mod shop;

use std::path::PathBuf;

use colored::{ColoredString, Colorize};
use gacha_core::{FixedTier, Tier};
use gacha_engine::{DirSource, DrawReport, EngineConfig, GachaEngine, ReloadReport};
use tracing::debug;

/// Options shared by every command.
pub struct Context {
    pub config: PathBuf,
    pub seed: Option<u64>,
}

impl Context {
    fn source(&self) -> Result<DirSource, String> {
        if !self.config.is_dir() {
            return Err(format!(
                "config directory not found: {}",
                self.config.display()
            ));
        }
        Ok(DirSource::new(&self.config))
    }

    fn engine_config(&self) -> EngineConfig {
        match self.seed {
            Some(seed) => EngineConfig::default().with_seed(seed),
            None => EngineConfig::default(),
        }
    }

    /// Start an engine over the config directory, printing banners that
    /// failed to load.
    fn engine(&self) -> Result<GachaEngine<DirSource>, String> {
        debug!(config = %self.config.display(), seed = ?self.seed, "starting engine");
        let (engine, report) = GachaEngine::start(self.source()?, self.engine_config());
        print_failures(&report);
        Ok(engine)
    }
}

fn print_failures(report: &ReloadReport) {
    for (name, err) in &report.failed {
        eprintln!("  {} {name}: {err}", "skipped".yellow());
    }
}

/// Tier label in its display color.
fn paint(tier: &Tier) -> ColoredString {
    let label = tier.label();
    match tier.as_fixed() {
        Some(FixedTier::Ssr) => label.yellow().bold(),
        Some(FixedTier::Sr) => label.magenta().bold(),
        Some(FixedTier::R) => label.blue(),
        Some(FixedTier::N) => label.white(),
        None => label.red().bold(),
    }
}

/// Print a draw report: one line per result, tally, effect, broadcasts.
fn print_report(report: &DrawReport) {
    let draws = if report.is_batch() { "draws" } else { "draw" };
    println!(
        "  {} ({} {draws})",
        report.display_name.bold(),
        report.results.len()
    );
    println!();

    for (i, result) in report.results.iter().enumerate() {
        println!(
            "  {:>2}  {:<6} {} x{}",
            i + 1,
            paint(&result.tier),
            result.reward.label(),
            result.reward.grant_count()
        );
    }
    println!();

    let tally: Vec<String> = report
        .tally
        .iter()
        .map(|(tier, n)| format!("{} {n}", paint(tier)))
        .collect();
    println!("  tally: {}", tally.join(", "));

    match &report.effect {
        Some(effect) => {
            let sound = effect.sound.as_deref().unwrap_or("-");
            println!("  effect: {} (sound {sound})", paint(&report.effect_tier));
            if let Some(message) = &effect.message {
                println!("  {}", message.italic());
            }
        }
        None => println!("  effect: {}", paint(&report.effect_tier)),
    }

    for a in &report.announcements {
        println!(
            "  {} {} drew {} {} from {}",
            "[broadcast]".green(),
            a.player,
            paint(&a.tier),
            a.reward_label.bold(),
            a.banner_display
        );
    }
}
