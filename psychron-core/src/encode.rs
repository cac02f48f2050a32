//! Pure value-to-segment encoding
//!
//! Transforms a [`DisplayState`] snapshot into the 15-byte frame the
//! panel consumes. No hardware access and no side effects: encoding the
//! same state twice yields byte-identical frames.
//!
//! Values are fixed-point tenths (`x10`), matching the panel's single
//! decimal digit. Floating-point sensor readings are converted with
//! [`temperature_x10`] / [`humidity_x10`], which also enforce the
//! glyph-representable ranges. Range checks happen after rounding, so
//! the accepted boundary is exactly the displayable one: 199.94 °C is
//! accepted (renders 199.9), 199.96 °C is not.

use crate::frame::SegmentFrame;
use crate::glyph;

/// Lowest representable temperature, tenths of a degree (-99.9)
pub const TEMP_MIN_X10: i16 = -999;
/// Highest representable temperature, tenths of a degree (199.9)
pub const TEMP_MAX_X10: i16 = 1999;
/// Highest representable humidity, tenths of a percent (99.9)
pub const HUMIDITY_MAX_X10: i16 = 999;

/// Errors from encoding a display state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Value outside the glyph-representable range
    OutOfRange,
}

/// Temperature unit glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Unit {
    /// Degree-Celsius glyph
    #[default]
    Celsius,
    /// Degree-Fahrenheit glyph
    Fahrenheit,
}

impl Unit {
    /// Specials-byte bits for this unit
    pub fn bits(self) -> u8 {
        match self {
            Unit::Celsius => glyph::UNIT_CELSIUS,
            Unit::Fahrenheit => glyph::UNIT_FAHRENHEIT,
        }
    }
}

/// Static icon flags in the specials byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Icons {
    /// Bluetooth glyph visible
    pub bluetooth: bool,
    /// Power glyph visible
    pub power: bool,
}

/// The two digit regions of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Region {
    /// Upper region: signed value with unit glyph
    Temperature,
    /// Lower region: unsigned value with percent glyph
    Humidity,
}

/// Snapshot of everything the panel can show
///
/// `None` values leave their digit region blank; the fault flags replace
/// a region's digits with `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayState {
    /// Temperature in tenths of a degree
    pub temperature_x10: Option<i16>,
    /// Relative humidity in tenths of a percent
    pub humidity_x10: Option<i16>,
    /// Render `Err` in the temperature region
    pub temperature_fault: bool,
    /// Render `Err` in the humidity region
    pub humidity_fault: bool,
    /// Temperature unit glyph
    pub unit: Unit,
    /// Icon flags
    pub icons: Icons,
}

/// Convert a floating-point reading to fixed-point tenths
///
/// Rounds half away from zero: 23.45 becomes 235, -0.05 becomes -1.
fn to_x10(value: f32) -> i16 {
    if value < 0.0 {
        -(((-value) * 10.0 + 0.5) as i16)
    } else {
        (value * 10.0 + 0.5) as i16
    }
}

/// Validate and convert a temperature reading in °C (or °F; the panel
/// only ever shows one decimal either way)
pub fn temperature_x10(value: f32) -> Result<i16, EncodeError> {
    if value.is_nan() {
        return Err(EncodeError::OutOfRange);
    }
    let x10 = to_x10(value);
    if (TEMP_MIN_X10..=TEMP_MAX_X10).contains(&x10) {
        Ok(x10)
    } else {
        Err(EncodeError::OutOfRange)
    }
}

/// Validate and convert a relative-humidity reading in percent
pub fn humidity_x10(value: f32) -> Result<i16, EncodeError> {
    if value.is_nan() {
        return Err(EncodeError::OutOfRange);
    }
    let x10 = to_x10(value);
    if (0..=HUMIDITY_MAX_X10).contains(&x10) {
        Ok(x10)
    } else {
        Err(EncodeError::OutOfRange)
    }
}

/// Encode a display state into a segment frame
///
/// Fails with [`EncodeError::OutOfRange`] if a stored value is outside
/// the representable range; no partial frame is produced in that case.
pub fn encode(state: &DisplayState) -> Result<SegmentFrame, EncodeError> {
    let mut frame = SegmentFrame::new();

    if state.temperature_fault {
        set_fault(&mut frame, glyph::TEMP_OFFSETS);
        frame.or_byte(glyph::ICON_BYTE, state.unit.bits());
    } else if let Some(t) = state.temperature_x10 {
        if !(TEMP_MIN_X10..=TEMP_MAX_X10).contains(&t) {
            return Err(EncodeError::OutOfRange);
        }
        set_temperature(&mut frame, t);
        frame.or_byte(glyph::ICON_BYTE, state.unit.bits());
    }

    if state.humidity_fault {
        set_fault(&mut frame, glyph::HUM_OFFSETS);
        frame.or_byte(glyph::PERCENT_BYTE, glyph::PERCENT);
    } else if let Some(h) = state.humidity_x10 {
        if !(0..=HUMIDITY_MAX_X10).contains(&h) {
            return Err(EncodeError::OutOfRange);
        }
        set_digits(&mut frame, h as u16, glyph::HUM_OFFSETS, false);
        frame.or_byte(glyph::PERCENT_BYTE, glyph::PERCENT);
    }

    if state.icons.bluetooth {
        frame.or_byte(glyph::ICON_BYTE, glyph::ICON_BLUETOOTH);
    }
    if state.icons.power {
        frame.or_byte(glyph::ICON_BYTE, glyph::ICON_POWER);
    }

    Ok(frame)
}

/// Write a signed temperature into its digit region
///
/// `value_x10` must already be range-checked.
fn set_temperature(frame: &mut SegmentFrame, value_x10: i16) {
    let negative = value_x10 < 0;
    let mut tenths = value_x10.unsigned_abs();
    if tenths >= 1000 {
        // 100.0..=199.9: the leading position renders the "1"; the tens
        // digit stays blank below 110.0, same as the vendor firmware
        frame.set_byte(glyph::LEADING_BYTE, glyph::LEADING_ONE);
        tenths -= 1000;
    }
    set_digits(frame, tenths, glyph::TEMP_OFFSETS, negative);
}

/// Write an unsigned tenths value (0..=999) into a digit region
///
/// The tens position follows the hardware convention for single-digit
/// values: blank, or the minus glyph for a negative reading. Two-digit
/// negative readings instead light the wide minus in the leading byte.
fn set_digits(frame: &mut SegmentFrame, tenths: u16, offsets: [usize; 4], negative: bool) {
    let tenth = (tenths % 10) as usize;
    let whole = tenths / 10;

    let (tens, ones) = if whole < 10 {
        let tens = if negative {
            glyph::GLYPH_MINUS
        } else {
            glyph::GLYPH_BLANK
        };
        (tens, whole as usize)
    } else {
        if negative {
            frame.set_byte(glyph::LEADING_BYTE, glyph::LEADING_MINUS);
        }
        ((whole / 10) as usize, (whole % 10) as usize)
    };

    frame.set_glyph(offsets[0], glyph::GLYPHS[tens]);
    frame.set_glyph(offsets[1], glyph::GLYPHS[ones]);
    frame.set_glyph(offsets[2], glyph::GLYPHS[tenth]);
    frame.or_byte(offsets[3], glyph::RADIX_POINT);
}

/// Write the `Err` glyphs into a digit region
fn set_fault(frame: &mut SegmentFrame, offsets: [usize; 4]) {
    frame.set_glyph(offsets[0], glyph::GLYPHS[glyph::GLYPH_E]);
    frame.set_glyph(offsets[1], glyph::GLYPHS[glyph::GLYPH_R]);
    frame.set_glyph(offsets[2], glyph::GLYPHS[glyph::GLYPH_R_SMALL]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FRAME_LEN;
    use proptest::prelude::*;

    /// Inverse glyph lookup: recover the table index rendered at `offset`
    ///
    /// Masks the second byte to the glyph bits so radix/percent overlays
    /// don't interfere.
    fn decode_glyph(frame: &SegmentFrame, offset: usize) -> Option<usize> {
        let pair = [frame.byte(offset), frame.byte(offset + 1) & 0x1F];
        glyph::GLYPHS.iter().position(|g| *g == pair)
    }

    fn state_with(temp: f32, hum: f32) -> DisplayState {
        DisplayState {
            temperature_x10: Some(temperature_x10(temp).unwrap()),
            humidity_x10: Some(humidity_x10(hum).unwrap()),
            ..DisplayState::default()
        }
    }

    #[test]
    fn test_blank_state_is_all_zero() {
        let frame = encode(&DisplayState::default()).unwrap();
        assert_eq!(frame.as_bytes(), &[0u8; FRAME_LEN]);
    }

    #[test]
    fn test_digit_round_trip() {
        // 23.4 °C / 55.2 %RH decode back through the inverse lookup
        let frame = encode(&state_with(23.4, 55.2)).unwrap();

        assert_eq!(decode_glyph(&frame, glyph::TEMP_OFFSETS[0]), Some(2));
        assert_eq!(decode_glyph(&frame, glyph::TEMP_OFFSETS[1]), Some(3));
        assert_eq!(decode_glyph(&frame, glyph::TEMP_OFFSETS[2]), Some(4));
        assert_ne!(frame.byte(glyph::TEMP_OFFSETS[3]) & glyph::RADIX_POINT, 0);

        assert_eq!(decode_glyph(&frame, glyph::HUM_OFFSETS[0]), Some(5));
        assert_eq!(decode_glyph(&frame, glyph::HUM_OFFSETS[1]), Some(5));
        assert_eq!(decode_glyph(&frame, glyph::HUM_OFFSETS[2]), Some(2));
        assert_ne!(frame.byte(glyph::HUM_OFFSETS[3]) & glyph::RADIX_POINT, 0);
        assert_ne!(frame.byte(glyph::PERCENT_BYTE) & glyph::PERCENT, 0);

        // °C glyph, no icons
        assert_eq!(frame.byte(glyph::ICON_BYTE), glyph::UNIT_CELSIUS);
    }

    #[test]
    fn test_single_digit_blanks_tens() {
        // 5.0 renders " 5.0", not "05.0"
        let frame = encode(&state_with(5.0, 50.0)).unwrap();
        assert_eq!(
            decode_glyph(&frame, glyph::TEMP_OFFSETS[0]),
            Some(glyph::GLYPH_BLANK)
        );
        assert_eq!(decode_glyph(&frame, glyph::TEMP_OFFSETS[1]), Some(5));
    }

    #[test]
    fn test_single_digit_negative_uses_minus_glyph() {
        let frame = encode(&state_with(-5.0, 50.0)).unwrap();
        assert_eq!(
            decode_glyph(&frame, glyph::TEMP_OFFSETS[0]),
            Some(glyph::GLYPH_MINUS)
        );
        assert_eq!(decode_glyph(&frame, glyph::TEMP_OFFSETS[1]), Some(5));
        assert_eq!(frame.byte(glyph::LEADING_BYTE), 0);
    }

    #[test]
    fn test_two_digit_negative_uses_leading_minus() {
        let frame = encode(&state_with(-12.3, 50.0)).unwrap();
        assert_eq!(frame.byte(glyph::LEADING_BYTE), glyph::LEADING_MINUS);
        assert_eq!(decode_glyph(&frame, glyph::TEMP_OFFSETS[0]), Some(1));
        assert_eq!(decode_glyph(&frame, glyph::TEMP_OFFSETS[1]), Some(2));
        assert_eq!(decode_glyph(&frame, glyph::TEMP_OFFSETS[2]), Some(3));
    }

    #[test]
    fn test_hundreds_use_leading_one() {
        let frame = encode(&state_with(123.4, 50.0)).unwrap();
        assert_eq!(frame.byte(glyph::LEADING_BYTE), glyph::LEADING_ONE);
        assert_eq!(decode_glyph(&frame, glyph::TEMP_OFFSETS[0]), Some(2));
        assert_eq!(decode_glyph(&frame, glyph::TEMP_OFFSETS[1]), Some(3));
        assert_eq!(decode_glyph(&frame, glyph::TEMP_OFFSETS[2]), Some(4));
    }

    #[test]
    fn test_temperature_boundaries() {
        assert_eq!(temperature_x10(199.9), Ok(1999));
        assert_eq!(temperature_x10(-99.9), Ok(-999));
        assert_eq!(temperature_x10(200.0), Err(EncodeError::OutOfRange));
        assert_eq!(temperature_x10(-100.0), Err(EncodeError::OutOfRange));
        assert_eq!(temperature_x10(f32::NAN), Err(EncodeError::OutOfRange));
    }

    #[test]
    fn test_humidity_boundaries() {
        assert_eq!(humidity_x10(0.0), Ok(0));
        assert_eq!(humidity_x10(99.9), Ok(999));
        assert_eq!(humidity_x10(100.0), Err(EncodeError::OutOfRange));
        assert_eq!(humidity_x10(-0.1), Err(EncodeError::OutOfRange));
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(temperature_x10(23.45), Ok(235));
        assert_eq!(temperature_x10(-0.05), Ok(-1));
        assert_eq!(temperature_x10(0.04), Ok(0));
    }

    #[test]
    fn test_out_of_range_state_refuses_to_encode() {
        let state = DisplayState {
            temperature_x10: Some(2000),
            ..DisplayState::default()
        };
        assert_eq!(encode(&state), Err(EncodeError::OutOfRange));

        let state = DisplayState {
            humidity_x10: Some(-1),
            ..DisplayState::default()
        };
        assert_eq!(encode(&state), Err(EncodeError::OutOfRange));
    }

    #[test]
    fn test_fault_glyphs() {
        let state = DisplayState {
            temperature_fault: true,
            humidity_fault: true,
            ..DisplayState::default()
        };
        let frame = encode(&state).unwrap();

        for offsets in [glyph::TEMP_OFFSETS, glyph::HUM_OFFSETS] {
            assert_eq!(decode_glyph(&frame, offsets[0]), Some(glyph::GLYPH_E));
            assert_eq!(decode_glyph(&frame, offsets[1]), Some(glyph::GLYPH_R));
            assert_eq!(decode_glyph(&frame, offsets[2]), Some(glyph::GLYPH_R_SMALL));
            // No radix point on a fault display
            assert_eq!(frame.byte(offsets[3]) & glyph::RADIX_POINT, 0);
        }
        // Unit and percent glyphs stay up alongside the fault
        assert_eq!(frame.byte(glyph::ICON_BYTE), glyph::UNIT_CELSIUS);
        assert_ne!(frame.byte(glyph::PERCENT_BYTE) & glyph::PERCENT, 0);
    }

    #[test]
    fn test_icons_independent_of_values() {
        let state = DisplayState {
            icons: Icons {
                bluetooth: true,
                power: true,
            },
            ..DisplayState::default()
        };
        let frame = encode(&state).unwrap();
        assert_eq!(
            frame.byte(glyph::ICON_BYTE),
            glyph::ICON_BLUETOOTH | glyph::ICON_POWER
        );
    }

    proptest! {
        #[test]
        fn encode_is_idempotent(t in TEMP_MIN_X10..=TEMP_MAX_X10, h in 0i16..=HUMIDITY_MAX_X10) {
            let state = DisplayState {
                temperature_x10: Some(t),
                humidity_x10: Some(h),
                ..DisplayState::default()
            };
            let a = encode(&state).unwrap();
            let b = encode(&state).unwrap();
            assert_eq!(a, b);
        }

        #[test]
        fn reserved_bits_stay_zero(t in TEMP_MIN_X10..=TEMP_MAX_X10, h in 0i16..=HUMIDITY_MAX_X10) {
            let state = DisplayState {
                temperature_x10: Some(t),
                humidity_x10: Some(h),
                ..DisplayState::default()
            };
            let frame = encode(&state).unwrap();
            assert_eq!(frame.as_bytes().len(), FRAME_LEN);
            // Trailing byte is unwired
            assert_eq!(frame.byte(14), 0);
            // Digit second bytes only ever use their glyph and overlay bits
            for offsets in [glyph::TEMP_OFFSETS, glyph::HUM_OFFSETS] {
                assert_eq!(frame.byte(offsets[0] + 1) & !0x1F, 0);
                assert_eq!(frame.byte(offsets[1] + 1) & !0x3F, 0);
            }
        }
    }
}
