//! RGBA colors and the caller-side normalization of 8-bit channel input.
//!
//! The renderer itself takes colors as four `f32` channels and never
//! validates them. Turning user input (text fields holding 0-255 values)
//! into channels in [0, 1] is the caller's job; the helpers here implement
//! that normalization for the CLI and the browser glue.

use crate::error::ConfigError;

/// Four color channels: red, green, blue, alpha.
pub type Rgba = [f32; 4];

/// Opaque red, the color drawn when the caller gives none.
pub const RED: Rgba = [1.0, 0.0, 0.0, 1.0];

/// Opaque green.
pub const GREEN: Rgba = [0.0, 1.0, 0.0, 1.0];

/// Opaque blue.
pub const BLUE: Rgba = [0.0, 0.0, 1.0, 1.0];

/// Fully transparent black, the default clear color.
pub const TRANSPARENT: Rgba = [0.0, 0.0, 0.0, 0.0];

/// Parses the longest leading decimal number in `text`, ignoring leading
/// whitespace and any trailing garbage (`"12px"` parses as `12`).
fn parse_number_prefix(text: &str) -> Option<f32> {
    let text = text.trim_start();
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .unwrap_or(text.len());
    (1..=end)
        .rev()
        .find_map(|len| text[..len].parse::<f32>().ok())
}

/// Normalizes an 8-bit channel value given as text to a channel in [0, 1].
///
/// The value is divided by 255 and rounded to two decimal places. Input
/// that does not start with a number maps to `0.0`. Values outside 0-255
/// are clamped, so `"300"` gives `1.0` and `"-20"` gives `0.0` rather than
/// `1.18` and `-0.08`.
pub fn normalize_channel(text: &str) -> f32 {
    match parse_number_prefix(text) {
        Some(value) if !value.is_nan() => {
            let unit = (value / 255.0).clamp(0.0, 1.0);
            (unit * 100.0).round() / 100.0
        }
        _ => 0.0,
    }
}

/// Builds an opaque color from red, green and blue channel text.
pub fn rgba_from_channels(red: &str, green: &str, blue: &str) -> Rgba {
    [
        normalize_channel(red),
        normalize_channel(green),
        normalize_channel(blue),
        1.0,
    ]
}

/// Parses a comma-separated list of three or four 8-bit channels,
/// e.g. `"255,128,0"` or `"255, 128, 0, 128"`.
///
/// Each channel goes through [`normalize_channel`]. Alpha defaults to
/// `1.0` when only three channels are given.
///
/// Returns `ConfigError::InvalidColor` for any other channel count.
pub fn parse_channel_list(text: &str) -> Result<Rgba, ConfigError> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [r, g, b] => Ok(rgba_from_channels(r, g, b)),
        [r, g, b, a] => {
            let [r, g, b, _] = rgba_from_channels(r, g, b);
            Ok([r, g, b, normalize_channel(a)])
        }
        _ => Err(ConfigError::InvalidColor(format!(
            "expected 3 or 4 comma-separated channels, got {}",
            parts.len()
        ))),
    }
}

/// Converts a color slice of any length into exactly four channels.
///
/// Returns `ConfigError::InvalidColor` unless `channels` has length 4.
pub fn rgba_from_slice(channels: &[f32]) -> Result<Rgba, ConfigError> {
    <Rgba>::try_from(channels).map_err(|_| {
        ConfigError::InvalidColor(format!(
            "expected 4 color channels, got {}",
            channels.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_maps_to_zero() {
        assert_eq!(normalize_channel("0"), 0.0);
    }

    #[test]
    fn full_scale_maps_to_one() {
        assert_eq!(normalize_channel("255"), 1.0);
    }

    #[test]
    fn non_numeric_maps_to_zero() {
        assert_eq!(normalize_channel("red"), 0.0);
        assert_eq!(normalize_channel(""), 0.0);
        assert_eq!(normalize_channel("   "), 0.0);
        assert_eq!(normalize_channel("NaN"), 0.0);
    }

    #[test]
    fn midpoint_rounds_to_two_decimals() {
        // 128 / 255 = 0.50196...
        assert_eq!(normalize_channel("128"), 0.5);
        // 64 / 255 = 0.25098...
        assert_eq!(normalize_channel("64"), 0.25);
    }

    #[test]
    fn leading_number_is_used() {
        assert_eq!(normalize_channel("  255px"), 1.0);
        assert_eq!(normalize_channel("1e"), 0.0);
        assert_eq!(normalize_channel("2.55e2"), 1.0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        assert_eq!(normalize_channel("300"), 1.0);
        assert_eq!(normalize_channel("-20"), 0.0);
    }

    #[test]
    fn rgba_from_channels_is_opaque() {
        assert_eq!(rgba_from_channels("0", "255", "0"), GREEN);
    }

    #[test]
    fn parse_channel_list_accepts_three_or_four() {
        assert_eq!(parse_channel_list("255,0,0").unwrap(), RED);
        assert_eq!(parse_channel_list("0, 0, 255, 0").unwrap(), [0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn parse_channel_list_rejects_wrong_count() {
        let err = parse_channel_list("255,0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidColor(ref msg) if msg.contains('2')));
        assert!(parse_channel_list("1,2,3,4,5").is_err());
    }

    #[test]
    fn rgba_from_slice_requires_four_channels() {
        assert_eq!(rgba_from_slice(&[0.0, 1.0, 0.0, 1.0]).unwrap(), GREEN);
        assert!(rgba_from_slice(&[1.0, 0.0, 0.0]).is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn normalized_channel_stays_in_unit_interval(text in ".*") {
                let c = normalize_channel(&text);
                prop_assert!((0.0..=1.0).contains(&c), "out of range: {c}");
            }

            #[test]
            fn integer_channels_round_to_hundredths(value in 0u32..=255) {
                let c = normalize_channel(&value.to_string());
                let expected = ((value as f32 / 255.0) * 100.0).round() / 100.0;
                prop_assert_eq!(c, expected);
            }
        }
    }
}
