//! Vendor glyph and segment-layout tables
//!
//! These constants come from the panel vendor's documentation and are not
//! derivable: the digit shapes are 13-segment bit patterns and the byte
//! offsets follow the physical segment wiring. Reproduce them exactly or
//! the panel renders garbage.

/// A digit position's bit pattern: two consecutive frame bytes
pub type Glyph = [u8; 2];

/// Glyph patterns, indexed 0-9 by digit value, then the specials below
pub const GLYPHS: [Glyph; 15] = [
    [0xBF, 0x1F], // 0
    [0x00, 0x1F], // 1
    [0xFD, 0x17], // 2
    [0xF5, 0x1F], // 3
    [0x47, 0x1F], // 4
    [0xF7, 0x1D], // 5
    [0xFF, 0x1D], // 6
    [0x21, 0x1F], // 7
    [0xFF, 0x1F], // 8
    [0xF7, 0x1F], // 9
    [0x44, 0x00], // minus
    [0x00, 0x00], // blank
    [0xFF, 0x00], // E
    [0x5C, 0x00], // r, full height
    [0x3F, 0x01], // r, small digit position
];

/// Index of the minus glyph in [`GLYPHS`]
pub const GLYPH_MINUS: usize = 10;
/// Index of the blank glyph in [`GLYPHS`]
pub const GLYPH_BLANK: usize = 11;
/// Index of the `E` glyph in [`GLYPHS`]
pub const GLYPH_E: usize = 12;
/// Index of the full-height `r` glyph in [`GLYPHS`]
pub const GLYPH_R: usize = 13;
/// Index of the small `r` glyph in [`GLYPHS`]
pub const GLYPH_R_SMALL: usize = 14;

/// Temperature byte offsets: tens, ones, tenths digits, then the byte
/// carrying the radix point
pub const TEMP_OFFSETS: [usize; 4] = [1, 3, 11, 4];
/// Humidity byte offsets, same order as [`TEMP_OFFSETS`]
pub const HUM_OFFSETS: [usize; 4] = [5, 7, 9, 8];

/// Radix-point bit within a region's radix byte
pub const RADIX_POINT: u8 = 0x20;

/// Byte holding the leading "1"/minus position
pub const LEADING_BYTE: usize = 0;
/// Leading-position bits for the "1" of 100..=199 readings
pub const LEADING_ONE: u8 = 0x1F;
/// Leading-position bits for the minus of two-digit negative readings
pub const LEADING_MINUS: u8 = 0x04;

/// Byte carrying the percent sign (second byte of the small humidity digit)
pub const PERCENT_BYTE: usize = 10;
/// Percent-sign bit within [`PERCENT_BYTE`]
pub const PERCENT: u8 = 0x20;

/// Byte carrying the unit and icon glyphs
pub const ICON_BYTE: usize = 13;
/// Degree-Celsius bits within [`ICON_BYTE`]
pub const UNIT_CELSIUS: u8 = 0x05;
/// Degree-Fahrenheit bits within [`ICON_BYTE`]
pub const UNIT_FAHRENHEIT: u8 = 0x06;
/// Bluetooth bit within [`ICON_BYTE`]
pub const ICON_BLUETOOTH: u8 = 0x08;
/// Power bit within [`ICON_BYTE`]
pub const ICON_POWER: u8 = 0x10;
