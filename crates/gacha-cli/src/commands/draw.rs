use gacha_engine::Player;

use super::Context;

pub fn run(ctx: &Context, banner: &str, count: usize, player: &str) -> Result<(), String> {
    let mut engine = ctx.engine()?;
    let results = engine.draw(banner, count).map_err(|e| e.to_string())?;
    let report = engine.report(&Player::new(player), banner, results);
    super::print_report(&report);
    Ok(())
}
