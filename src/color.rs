//! Colors for the SVG backend.

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Light grey used for panel frames.
    pub const GREY: Self = Self::rgb(160, 160, 160);

    /// Categorical palette cycled through by successive series in a panel.
    pub const PALETTE: [Self; 6] = [
        Self::rgb(31, 119, 180),
        Self::rgb(255, 127, 14),
        Self::rgb(44, 160, 44),
        Self::rgb(214, 39, 40),
        Self::rgb(148, 103, 189),
        Self::rgb(140, 86, 75),
    ];

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Palette entry `i`, wrapping around.
    #[must_use]
    pub fn palette(i: usize) -> Self {
        Self::PALETTE[i % Self::PALETTE.len()]
    }

    /// CSS color string.
    #[must_use]
    pub fn to_css(self) -> String {
        if self.a == 255 {
            format!("rgb({},{},{})", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({},{},{},{:.3})",
                self.r,
                self.g,
                self.b,
                f32::from(self.a) / 255.0
            )
        }
    }
}
