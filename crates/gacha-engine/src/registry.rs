//! The banner registry: an owned cache of loaded banners plus the derived
//! ticket-kind index.
//!
//! Banners load lazily on first [`BannerRegistry::resolve`] or eagerly via
//! [`BannerRegistry::reload`]. A failed load is never cached, so a later
//! resolve retries. The ticket index is rebuilt from the loaded banners and
//! is never a source of truth.

use std::collections::HashMap;

use gacha_core::{BannerConfig, ConfigError, GachaError, GachaResult};
use tracing::{debug, info, warn};

use crate::draw::audit_rates;
use crate::source::ConfigSource;

/// Loaded banners, their load order, and the ticket index.
#[derive(Debug, Clone, Default)]
struct Catalog {
    banners: HashMap<String, BannerConfig>,
    order: Vec<String>,
    tickets: HashMap<String, String>,
}

impl Catalog {
    fn insert(&mut self, banner: BannerConfig) {
        for warning in audit_rates(&banner.rates) {
            warn!(banner = %banner.name, "rate table: {warning}");
        }
        for kind in banner.ticket_kinds() {
            // Last loaded wins on a duplicate kind.
            let previous = self.tickets.insert(kind.to_string(), banner.name.clone());
            if let Some(previous) = previous.filter(|p| *p != banner.name) {
                warn!(
                    ticket = kind,
                    previous = %previous,
                    banner = %banner.name,
                    "ticket kind claimed by two banners"
                );
            }
        }
        if !self.banners.contains_key(&banner.name) {
            self.order.push(banner.name.clone());
        }
        info!(banner = %banner.name, "banner loaded");
        self.banners.insert(banner.name.clone(), banner);
    }
}

/// Outcome of a [`BannerRegistry::reload`].
#[derive(Debug, Default)]
pub struct ReloadReport {
    /// Banners now loaded, in load order.
    pub loaded: Vec<String>,
    /// Banners that failed, with the reason. These did not stop the rest.
    pub failed: Vec<(String, ConfigError)>,
}

impl ReloadReport {
    /// Returns true if every declared banner loaded.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Banner cache backed by a [`ConfigSource`].
#[derive(Debug)]
pub struct BannerRegistry<S> {
    source: S,
    catalog: Catalog,
}

impl<S: ConfigSource> BannerRegistry<S> {
    /// An empty registry reading from `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            catalog: Catalog::default(),
        }
    }

    /// The backing source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the backing source. Cached banners are unaffected
    /// until the next reload.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Return a cached banner, loading it first if necessary.
    ///
    /// Missing or malformed documents are reported as
    /// [`GachaError::BannerUnavailable`] and not cached.
    pub fn resolve(&mut self, name: &str) -> GachaResult<&BannerConfig> {
        if !self.catalog.banners.contains_key(name) {
            match self.source.read_banner(name) {
                Ok(banner) => self.catalog.insert(banner),
                Err(e) => {
                    warn!(banner = name, "failed to load banner: {e}");
                    return Err(GachaError::BannerUnavailable(name.to_string()));
                }
            }
        }
        self.catalog
            .banners
            .get(name)
            .ok_or_else(|| GachaError::BannerUnavailable(name.to_string()))
    }

    /// A cached banner, without loading.
    pub fn get(&self, name: &str) -> Option<&BannerConfig> {
        self.catalog.banners.get(name)
    }

    /// Drop every cached banner and ticket mapping, then load `active` in
    /// order. One bad banner never stops the rest.
    ///
    /// The replacement is built aside and swapped in whole, so the registry
    /// is never observed half-cleared.
    pub fn reload(&mut self, active: &[String]) -> ReloadReport {
        let mut next = Catalog::default();
        let mut report = ReloadReport::default();

        for name in active {
            if next.banners.contains_key(name) {
                continue;
            }
            match self.source.read_banner(name) {
                Ok(banner) => next.insert(banner),
                Err(e) => {
                    warn!(banner = %name, "failed to load banner: {e}");
                    report.failed.push((name.clone(), e));
                }
            }
        }

        report.loaded = next.order.clone();
        debug!(loaded = report.loaded.len(), failed = report.failed.len(), "reload complete");
        self.catalog = next;
        report
    }

    /// The banner owning a ticket kind.
    pub fn ticket_owner(&self, kind: &str) -> Option<&str> {
        self.catalog.tickets.get(kind).map(String::as_str)
    }

    /// Loaded banners in load order.
    pub fn banners(&self) -> impl Iterator<Item = &BannerConfig> {
        self.catalog
            .order
            .iter()
            .filter_map(|name| self.catalog.banners.get(name))
    }

    /// Number of loaded banners.
    pub fn len(&self) -> usize {
        self.catalog.banners.len()
    }

    /// Returns true if nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.catalog.banners.is_empty()
    }

    /// Rebuild the ticket index from scratch by rescanning loaded banners in
    /// load order. Always equal to the live index.
    pub fn derive_ticket_index(&self) -> HashMap<String, String> {
        let mut index = HashMap::new();
        for banner in self.banners() {
            for kind in banner.ticket_kinds() {
                index.insert(kind.to_string(), banner.name.clone());
            }
        }
        index
    }

    /// The live ticket index.
    pub fn ticket_index(&self) -> &HashMap<String, String> {
        &self.catalog.tickets
    }
}
