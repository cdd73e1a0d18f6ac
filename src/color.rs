//! Color representations and conversions shared by the pipeline stages.
//!
//! Perceptual work (dispersion, k-means swatches) happens in CIE Lab through
//! `palette`; skin thresholding uses HSV and BT.601 YCbCr; the reported tone
//! lives in HSL so the dominant color can always be rebuilt from it.

use palette::{FromColor, Hsl, Hsv, Lab, Srgb};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// 8-bit sRGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `RRGGBB`
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(AnalysisError::config(format!(
                "invalid hex color: expected 6 hex digits, got {:?}",
                hex
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| AnalysisError::config_source(format!("invalid hex color {:?}", hex), e))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Uppercase `#RRGGBB`
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_srgb(self) -> Srgb {
        Srgb::new(self.r, self.g, self.b).into_format::<f32>()
    }

    /// Convert from a float sRGB color, clamping to gamut
    pub fn from_srgb(srgb: Srgb) -> Self {
        let clamped = Srgb::new(
            srgb.red.clamp(0.0, 1.0),
            srgb.green.clamp(0.0, 1.0),
            srgb.blue.clamp(0.0, 1.0),
        );
        let c: Srgb<u8> = clamped.into_format::<u8>();
        Self::new(c.red, c.green, c.blue)
    }

    pub fn to_lab(self) -> Lab {
        Lab::from_color(self.to_srgb())
    }

    pub fn from_lab(lab: Lab) -> Self {
        let srgb: Srgb = Srgb::from_color(lab);
        Self::from_srgb(srgb)
    }

    /// HSL coordinates: hue in [0, 360), saturation and lightness in [0, 1]
    pub fn to_hsl(self) -> (f32, f32, f32) {
        let hsl: Hsl = Hsl::from_color(self.to_srgb());
        (
            wrap_hue(hsl.hue.into_positive_degrees()),
            hsl.saturation.clamp(0.0, 1.0),
            hsl.lightness.clamp(0.0, 1.0),
        )
    }

    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let hsl: Hsl = Hsl::new(wrap_hue(hue), saturation.clamp(0.0, 1.0), lightness.clamp(0.0, 1.0));
        Self::from_srgb(Srgb::from_color(hsl))
    }

    /// HSV coordinates: hue in [0, 360), saturation and value in [0, 1]
    pub fn to_hsv(self) -> (f32, f32, f32) {
        let hsv: Hsv = Hsv::from_color(self.to_srgb());
        (wrap_hue(hsv.hue.into_positive_degrees()), hsv.saturation, hsv.value)
    }

    /// Full-range BT.601 YCbCr, each channel in [0, 255]
    pub fn to_ycbcr(self) -> (f32, f32, f32) {
        let (r, g, b) = (self.r as f32, self.g as f32, self.b as f32);
        let y = 0.299 * r + 0.587 * g + 0.114 * b;
        let cr = (r - y) * 0.713 + 128.0;
        let cb = (b - y) * 0.564 + 128.0;
        (y, cb, cr)
    }
}

/// Fold any finite angle into [0, 360)
pub fn wrap_hue(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Euclidean color difference (ΔE76)
pub fn delta_e(a: Lab, b: Lab) -> f32 {
    let dl = a.l - b.l;
    let da = a.a - b.a;
    let db = a.b - b.b;
    (dl * dl + da * da + db * db).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let c = Rgb::from_hex("#ff7f50").unwrap();
        assert_eq!(c, Rgb::new(255, 127, 80));
        assert_eq!(c.to_hex(), "#FF7F50");
        assert_eq!(Rgb::from_hex("FF7F50").unwrap(), c);
    }

    #[test]
    fn test_hex_invalid() {
        assert!(Rgb::from_hex("#FF").is_err());
        assert!(Rgb::from_hex("#GGGGGG").is_err());
    }

    #[test]
    fn test_hsl_of_skin_color() {
        let (h, s, l) = Rgb::new(230, 180, 130).to_hsl();
        assert!((h - 30.0).abs() < 0.5);
        assert!((l - 0.706).abs() < 0.01);
        assert!(s > 0.5);
    }

    #[test]
    fn test_hsl_roundtrip() {
        let c = Rgb::new(198, 134, 66);
        let (h, s, l) = c.to_hsl();
        let back = Rgb::from_hsl(h, s, l);
        assert!((back.r as i32 - c.r as i32).abs() <= 1);
        assert!((back.g as i32 - c.g as i32).abs() <= 1);
        assert!((back.b as i32 - c.b as i32).abs() <= 1);
    }

    #[test]
    fn test_ycbcr_of_skin_color() {
        let (y, cb, cr) = Rgb::new(230, 180, 130).to_ycbcr();
        assert!((y - 189.25).abs() < 0.1);
        assert!(cr > 135.0 && cr < 180.0);
        assert!(cb > 85.0 && cb < 135.0);
    }

    #[test]
    fn test_wrap_hue() {
        assert_eq!(wrap_hue(370.0), 10.0);
        assert_eq!(wrap_hue(-30.0), 330.0);
        assert_eq!(wrap_hue(f32::NAN), 0.0);
        assert!(wrap_hue(-1e-9) < 360.0);
    }

    #[test]
    fn test_delta_e() {
        let white = Rgb::new(255, 255, 255).to_lab();
        assert!(delta_e(white, white) < 1e-3);
        let black = Rgb::new(0, 0, 0).to_lab();
        assert!(delta_e(white, black) > 99.0);
    }

    #[test]
    fn test_lab_roundtrip() {
        let c = Rgb::new(120, 80, 60);
        let back = Rgb::from_lab(c.to_lab());
        assert!((back.r as i32 - c.r as i32).abs() <= 1);
        assert!((back.b as i32 - c.b as i32).abs() <= 1);
    }
}
