//! Ticket vendor offers derived from loaded banners.

use gacha_core::{BannerConfig, LoreLine, TicketSpec};
use serde::Serialize;

/// Suffix marking a ten-draw ticket kind.
pub const MULTI_SUFFIX: &str = "_10";

/// Whether a ticket kind triggers a ten-draw.
pub fn is_multi_kind(kind: &str) -> bool {
    kind.ends_with(MULTI_SUFFIX)
}

/// One ticket for sale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShopOffer {
    /// Banner selling the ticket.
    pub banner: String,
    /// Ticket kind stamped on the sold item.
    pub kind: String,
    /// Ticket display name.
    pub name: String,
    /// Display color.
    pub color: String,
    /// Bold display name.
    pub bold: bool,
    /// Lore lines.
    pub lore: Vec<LoreLine>,
    /// Currency item.
    pub price_item: String,
    /// Currency amount.
    pub price_count: u32,
    /// Declared as the banner's ten-draw ticket.
    pub multi: bool,
}

impl ShopOffer {
    fn from_spec(banner: &BannerConfig, spec: &TicketSpec, multi: bool) -> Option<Self> {
        let kind = spec.kind.clone()?;
        let price = spec.price.as_ref()?;
        Some(Self {
            banner: banner.name.clone(),
            name: spec.name.clone().unwrap_or_else(|| kind.clone()),
            kind,
            color: spec.color.clone().unwrap_or_else(|| "white".to_string()),
            bold: spec.bold,
            lore: spec.lore.clone(),
            price_item: price.item.clone(),
            price_count: price.count,
            multi,
        })
    }
}

/// Offers for every banner, single ticket before ten-draw ticket. Tickets
/// without a kind or a price are not for sale.
pub fn shop_offers<'a>(banners: impl IntoIterator<Item = &'a BannerConfig>) -> Vec<ShopOffer> {
    let mut offers = Vec::new();
    for banner in banners {
        let Some(tickets) = &banner.tickets else {
            continue;
        };
        if let Some(offer) = tickets
            .single
            .as_ref()
            .and_then(|t| ShopOffer::from_spec(banner, t, false))
        {
            offers.push(offer);
        }
        if let Some(offer) = tickets
            .multi
            .as_ref()
            .and_then(|t| ShopOffer::from_spec(banner, t, true))
        {
            offers.push(offer);
        }
    }
    offers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_suffix() {
        assert!(is_multi_kind("spring_10"));
        assert!(!is_multi_kind("spring"));
        assert!(!is_multi_kind("spring_100x"));
    }

    #[test]
    fn offers_from_banners() {
        let json = r#"{
            "rates": { "R": 100 },
            "pools": {},
            "tickets": {
                "single": {
                    "type": "spring", "name": "Spring Ticket", "color": "red", "bold": true,
                    "lore": ["One draw"], "price": { "item": "minecraft:emerald", "count": 5 }
                },
                "multi": { "type": "spring_10", "price": { "item": "minecraft:emerald", "count": 45 } }
            }
        }"#;
        let spring = BannerConfig::from_json("spring", json).unwrap();
        let unpriced = BannerConfig::from_json(
            "free",
            r#"{ "rates": {}, "pools": {}, "tickets": { "single": { "type": "free" } } }"#,
        )
        .unwrap();

        let offers = shop_offers([&spring, &unpriced]);
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].name, "Spring Ticket");
        assert!(offers[0].bold);
        assert_eq!(offers[0].price_count, 5);
        assert!(!offers[0].multi);
        assert_eq!(offers[1].name, "spring_10");
        assert_eq!(offers[1].color, "white");
        assert!(offers[1].multi);
    }
}
