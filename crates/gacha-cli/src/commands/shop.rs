use comfy_table::{ContentArrangement, Table};

use super::Context;

pub fn run(ctx: &Context) -> Result<(), String> {
    let engine = ctx.engine()?;
    let offers = engine.shop();

    if offers.is_empty() {
        println!("  No tickets for sale.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Banner", "Ticket", "Kind", "Draws", "Price"]);

    for offer in &offers {
        table.add_row(vec![
            offer.banner.clone(),
            offer.name.clone(),
            offer.kind.clone(),
            if offer.multi { "10" } else { "1" }.to_string(),
            format!("{} x{}", offer.price_item, offer.price_count),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} offers", offers.len());

    Ok(())
}
