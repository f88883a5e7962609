// Fixed particle palette and a simple RGBA color, created from an unsigned 32
// representing RRGGBBAA

use rand::Rng;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn from_u32(num: u32) -> Color {
        let r = (num >> 24) as u8;
        let g = (num >> 16) as u8;
        let b = (num >> 8) as u8;
        let a = num as u8;

        Color { r, g, b, a }
    }

    /// CSS `rgba()` string usable as a canvas fill or stroke style.
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            round_alpha(self.a)
        )
    }
}

// 0.7 is stored as 0xb3 (179), print it back with two decimals
fn round_alpha(a: u8) -> f64 {
    (a as f64 / 255.0 * 100.0).round() / 100.0
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Palette {
    Cyan,
    Purple,
    Pink,
    Blue,
}

impl Palette {
    pub const ALL: [Palette; 4] = [Palette::Cyan, Palette::Purple, Palette::Pink, Palette::Blue];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Palette {
        Palette::ALL[rng.gen_range(0, Palette::ALL.len())]
    }

    pub fn color(self) -> Color {
        match self {
            Palette::Cyan => Color::from_u32(0x06b6d4b3),
            Palette::Purple => Color::from_u32(0xa855f7b3),
            Palette::Pink => Color::from_u32(0xec4899b3),
            Palette::Blue => Color::from_u32(0x3b82f6b3),
        }
    }
}

/// Stroke color for proximity edges; per-edge opacity goes on top as global alpha.
pub const EDGE_COLOR: Color = Color::from_u32(0xffffff80);
