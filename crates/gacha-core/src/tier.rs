use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four built-in rarity tiers, ordered `N < R < SR < SSR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FixedTier {
    /// Normal.
    N,
    /// Rare.
    R,
    /// Super rare.
    Sr,
    /// Super super rare.
    Ssr,
}

impl FixedTier {
    /// The fixed tiers in draw-evaluation order (highest first).
    pub const DRAW_ORDER: [Self; 4] = [Self::Ssr, Self::Sr, Self::R, Self::N];

    /// The configuration label for this tier.
    pub fn label(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::R => "R",
            Self::Sr => "SR",
            Self::Ssr => "SSR",
        }
    }

    /// Parse one of the reserved labels. Case-sensitive.
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "N" => Some(Self::N),
            "R" => Some(Self::R),
            "SR" => Some(Self::Sr),
            "SSR" => Some(Self::Ssr),
            _ => None,
        }
    }
}

impl fmt::Display for FixedTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A reward tier. Fixed tiers keep exhaustive ordering logic; anything else a
/// banner declares (`UP`, seasonal labels, ...) is carried as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tier {
    /// A reserved tier (`SSR`, `SR`, `R`, `N`).
    Fixed(FixedTier),
    /// A banner-defined label.
    Custom(String),
}

impl Tier {
    /// `SSR` tier.
    pub const SSR: Self = Self::Fixed(FixedTier::Ssr);
    /// `SR` tier.
    pub const SR: Self = Self::Fixed(FixedTier::Sr);
    /// `R` tier.
    pub const R: Self = Self::Fixed(FixedTier::R);
    /// `N` tier.
    pub const N: Self = Self::Fixed(FixedTier::N);

    /// Parse a label; unknown labels become custom tiers.
    pub fn parse(s: &str) -> Self {
        match FixedTier::from_label(s) {
            Some(fixed) => Self::Fixed(fixed),
            None => Self::Custom(s.to_string()),
        }
    }

    /// The configuration label for this tier.
    pub fn label(&self) -> &str {
        match self {
            Self::Fixed(fixed) => fixed.label(),
            Self::Custom(s) => s,
        }
    }

    /// Returns the fixed tier, if this is one.
    pub fn as_fixed(&self) -> Option<FixedTier> {
        match self {
            Self::Fixed(fixed) => Some(*fixed),
            Self::Custom(_) => None,
        }
    }

    /// Returns true for banner-defined labels.
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// `SSR` or any custom tier. Custom tiers are limited or rate-up labels
    /// and are presented like `SSR`.
    pub fn is_premium(&self) -> bool {
        matches!(self, Self::Fixed(FixedTier::Ssr) | Self::Custom(_))
    }

    /// Whether this tier satisfies a minimum-rarity floor.
    ///
    /// Fixed tiers compare by `N < R < SR < SSR`. Custom tiers count as at
    /// least `R` but never as `SR`/`SSR`. A custom floor is only met by that
    /// same label.
    pub fn meets_floor(&self, floor: &Tier) -> bool {
        match (floor, self) {
            (Self::Fixed(FixedTier::N), _) => true,
            (Self::Fixed(FixedTier::R), tier) => *tier != Self::N,
            (Self::Fixed(min), Self::Fixed(have)) => have >= min,
            (Self::Fixed(_), Self::Custom(_)) => false,
            (Self::Custom(_), tier) => tier == floor,
        }
    }
}

impl From<String> for Tier {
    fn from(s: String) -> Self {
        match FixedTier::from_label(&s) {
            Some(fixed) => Self::Fixed(fixed),
            None => Self::Custom(s),
        }
    }
}

impl From<&str> for Tier {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<FixedTier> for Tier {
    fn from(fixed: FixedTier) -> Self {
        Self::Fixed(fixed)
    }
}

impl From<Tier> for String {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Fixed(fixed) => fixed.label().to_string(),
            Tier::Custom(s) => s,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reserved_and_custom() {
        assert_eq!(Tier::parse("SSR"), Tier::SSR);
        assert_eq!(Tier::parse("N"), Tier::N);
        assert_eq!(Tier::parse("UP"), Tier::Custom("UP".to_string()));
        // labels are case-sensitive
        assert_eq!(Tier::parse("ssr"), Tier::Custom("ssr".to_string()));
    }

    #[test]
    fn fixed_ordering() {
        assert!(FixedTier::N < FixedTier::R);
        assert!(FixedTier::R < FixedTier::Sr);
        assert!(FixedTier::Sr < FixedTier::Ssr);
    }

    #[test]
    fn floor_r_accepts_custom() {
        let up = Tier::parse("UP");
        assert!(up.meets_floor(&Tier::R));
        assert!(!up.meets_floor(&Tier::SR));
        assert!(!Tier::N.meets_floor(&Tier::R));
        assert!(Tier::SSR.meets_floor(&Tier::SR));
        assert!(!Tier::SR.meets_floor(&Tier::SSR));
    }

    #[test]
    fn floor_n_always_met() {
        assert!(Tier::N.meets_floor(&Tier::N));
        assert!(Tier::parse("UP").meets_floor(&Tier::N));
    }

    #[test]
    fn custom_floor_exact_match() {
        let floor = Tier::parse("UP");
        assert!(Tier::parse("UP").meets_floor(&floor));
        assert!(!Tier::SSR.meets_floor(&floor));
    }

    #[test]
    fn serde_as_plain_label() {
        let json = serde_json::to_string(&Tier::SR).unwrap();
        assert_eq!(json, "\"SR\"");
        let tier: Tier = serde_json::from_str("\"新春限定\"").unwrap();
        assert_eq!(tier.label(), "新春限定");
        assert!(tier.is_premium());
    }
}
