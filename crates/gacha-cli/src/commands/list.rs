use comfy_table::{ContentArrangement, Table};

use super::Context;

pub fn run(ctx: &Context) -> Result<(), String> {
    let engine = ctx.engine()?;
    let banners = engine.list();

    if banners.is_empty() {
        println!("  No banners loaded.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Display Name", "SSR %", "Tickets"]);

    for banner in &banners {
        let tickets = if banner.tickets.is_empty() {
            "-".to_string()
        } else {
            banner.tickets.join(", ")
        };
        table.add_row(vec![
            banner.name.clone(),
            banner.display_name.clone(),
            banner.ssr_rate.to_string(),
            tickets,
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} banners", banners.len());

    Ok(())
}
