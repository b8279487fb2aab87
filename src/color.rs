/// Packed opacity-RGB color, `0xOORRGGBB`.
///
/// The opacity byte comes first so that `0x00RRGGBB` literals are fully transparent
/// and `Color::rgb` produces opaque colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    pub const fn orgb(o: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((o as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::orgb(0xFF, r, g, b)
    }

    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self(0xFF00_0000 | (hex & 0x00FF_FFFF))
    }

    pub const fn opacity(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    pub const fn is_transparent(self) -> bool {
        self.opacity() == 0
    }

    /// Straight-alpha RGBA bytes, the layout `image::Rgba<u8>` expects.
    pub const fn to_rgba8(self) -> [u8; 4] {
        [self.r(), self.g(), self.b(), self.opacity()]
    }

    pub const fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self::orgb(rgba[3], rgba[0], rgba[1], rgba[2])
    }

    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color(0);
}

impl From<u32> for Color {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
