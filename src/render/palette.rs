use image::Rgba;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 0xFF])
    }

    /// `#RRGGBB`
    pub fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        ((color.r as u32) << 16) | ((color.g as u32) << 8) | (color.b as u32)
    }
}

pub const PLASTIC: Color = Color::rgb(0xFF, 0x57, 0x33);
pub const PAPER: Color = Color::rgb(0x33, 0xA1, 0xFD);
pub const METAL: Color = Color::rgb(0xB5, 0x33, 0xFF);
pub const GLASS: Color = Color::rgb(0x33, 0xFF, 0x57);
pub const ORGANIC: Color = Color::rgb(0xFF, 0xD1, 0x33);
pub const OTHER: Color = Color::rgb(0xFF, 0x33, 0xA8);

/// Color for classes missing from the table.
pub const FALLBACK: Color = PLASTIC;

/// Color used for a waste class, ignoring case.
pub fn color_for_class(class_name: &str) -> Color {
    match class_name.to_lowercase().as_str() {
        "plastic" => PLASTIC,
        "paper" => PAPER,
        "metal" => METAL,
        "glass" => GLASS,
        "organic" => ORGANIC,
        "other" => OTHER,
        _ => FALLBACK,
    }
}
