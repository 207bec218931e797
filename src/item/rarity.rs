use crate::color::Color;
use serde::{Deserialize, Serialize};

/// Rarity tier of an item.
///
/// Ordered from most to least common so `rarity >= Rarity::Epic` reads naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl Rarity {
    pub const ALL: [Rarity; 6] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythic,
    ];

    /// Display color used for item names and pickup glows
    pub fn color(&self) -> Color {
        match self {
            Rarity::Common => Color::WHITE,
            Rarity::Uncommon => Color::GREEN,
            Rarity::Rare => Color::BLUE,
            Rarity::Epic => Color::PURPLE,
            Rarity::Legendary => Color::ORANGE,
            Rarity::Mythic => Color::RED,
        }
    }

    /// Base weight when rolling a random rarity (sums to 100)
    pub fn drop_weight(&self) -> f64 {
        match self {
            Rarity::Common => 60.0,
            Rarity::Uncommon => 25.0,
            Rarity::Rare => 10.0,
            Rarity::Epic => 4.0,
            Rarity::Legendary => 0.9,
            Rarity::Mythic => 0.1,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Mythic => "Mythic",
        }
    }
}

impl Default for Rarity {
    fn default() -> Self {
        Rarity::Common
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one_hundred() {
        let total: f64 = Rarity::ALL.iter().map(|r| r.drop_weight()).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::Mythic > Rarity::Legendary);
        assert!(Rarity::Common < Rarity::Uncommon);
    }

    #[test]
    fn test_each_tier_has_distinct_color() {
        let colors: std::collections::HashSet<_> = Rarity::ALL.iter().map(|r| r.color()).collect();
        assert_eq!(colors.len(), Rarity::ALL.len());
    }
}
