/// The conventional memory offset at which the low-resolution font table is loaded.
const CHIP8_FONT_LOAD_ADDRESS: usize = 0x0;
/// The conventional memory offset at which the high-resolution font table is loaded.
const SUPERCHIP11_FONT_LOAD_ADDRESS: usize = 0x50;

/// The size of each character of the default CHIP-8 font in bytes.
const CHIP8_CHAR_SIZE: usize = 5;
/// The sprites of the default CHIP-8 font, where each character is one byte wide
/// and `CHIP8_CHAR_SIZE` bytes tall.  Each bit represents one pixel in the sprite.
const CHIP8_FONT_DATA: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
/// The size of each character of the default SUPER-CHIP 1.1 font in bytes.
const SUPERCHIP11_CHAR_SIZE: usize = 10;
/// The sprites of the default SUPER-CHIP 1.1 font, where each character is one byte wide
/// and `SUPERCHIP11_CHAR_SIZE` bytes tall.  Each bit represents one pixel in the sprite.
const SUPERCHIP11_FONT_DATA: [u8; 100] = [
    0x3C, 0x7E, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0x7E, 0x3C, // 0
    0x18, 0x38, 0x58, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x3C, // 1
    0x3E, 0x7F, 0xC3, 0x06, 0x0C, 0x18, 0x30, 0x60, 0xFF, 0xFF, // 2
    0x3C, 0x7E, 0xC3, 0x03, 0x0E, 0x0E, 0x03, 0xC3, 0x7E, 0x3C, // 3
    0x06, 0x0E, 0x1E, 0x36, 0x66, 0xC6, 0xFF, 0xFF, 0x06, 0x06, // 4
    0xFF, 0xFF, 0xC0, 0xC0, 0xFC, 0xFE, 0x03, 0xC3, 0x7E, 0x3C, // 5
    0x3E, 0x7C, 0xC0, 0xC0, 0xFC, 0xFE, 0xC3, 0xC3, 0x7E, 0x3C, // 6
    0xFF, 0xFF, 0x03, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x60, 0x60, // 7
    0x3C, 0x7E, 0xC3, 0xC3, 0x7E, 0x7E, 0xC3, 0xC3, 0x7E, 0x3C, // 8
    0x3C, 0x7E, 0xC3, 0xC3, 0x7F, 0x3F, 0x03, 0x03, 0x3E, 0x7C, // 9
];

/// An abstraction of a CHIP-8 family font (prior to loading to memory).
pub(crate) struct Font {
    /// The size of each character in the font in bytes.
    char_size: usize,
    /// A vector containing the font sprite data.
    font_data: Vec<u8>,
    /// The conventional memory offset at which this font table is loaded.
    load_address: usize,
}

impl Font {
    /// Constructor that returns the default CHIP-8 font data
    pub fn default_low_resolution() -> Self {
        Font {
            char_size: CHIP8_CHAR_SIZE,
            font_data: Vec::from(CHIP8_FONT_DATA),
            load_address: CHIP8_FONT_LOAD_ADDRESS,
        }
    }

    /// Constructor that returns the default SUPER_CHIP 1.1 high-resolution font data
    pub fn default_high_resolution() -> Self {
        Font {
            char_size: SUPERCHIP11_CHAR_SIZE,
            font_data: Vec::from(SUPERCHIP11_FONT_DATA),
            load_address: SUPERCHIP11_FONT_LOAD_ADDRESS,
        }
    }

    /// Returns a reference to the font data vector.
    pub(crate) fn font_data(&self) -> &Vec<u8> {
        &self.font_data
    }

    /// Returns the length of the font data vector.
    pub(crate) fn font_data_size(&self) -> usize {
        self.font_data.len()
    }

    /// Returns the size of each character in the font in bytes.
    pub(crate) fn char_size(&self) -> usize {
        self.char_size
    }

    /// Returns the memory offset at which this font table is conventionally loaded, and from
    /// which a character's sprite address can be computed (`load_address + digit * char_size`).
    pub(crate) fn load_address(&self) -> usize {
        self.load_address
    }
}
