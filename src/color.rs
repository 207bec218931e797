use serde::{Deserialize, Serialize};

/// An RGB display color.
///
/// Nothing in the crate draws, but rarity tiers and light sources carry a color so a
/// renderer can pick it up directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GREEN: Color = Color::rgb(30, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 112, 221);
    pub const PURPLE: Color = Color::rgb(163, 53, 238);
    pub const ORANGE: Color = Color::rgb(255, 128, 0);
    pub const RED: Color = Color::rgb(230, 32, 32);
    pub const AMBER: Color = Color::rgb(255, 191, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Returns the color as `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_formatting() {
        assert_eq!(Color::ORANGE.to_hex(), "#FF8000");
        assert_eq!(Color::rgb(1, 2, 3).to_hex(), "#010203");
    }
}
