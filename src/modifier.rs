//! Tone adjustment without touching the source image.

use std::fmt;
use std::str::FromStr;

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::color::{Rgb, wrap_hue};
use crate::config::AdjustmentBounds;
use crate::error::{AnalysisError, Result};
use crate::region::SkinMask;
use crate::tone::ToneEstimate;

/// Deltas applied to a tone estimate. Warmth moves the hue: positive
/// toward a golden target, negative toward a pink one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentRequest {
    pub delta_lightness: f32,
    pub delta_warmth: f32,
    pub delta_saturation: f32,
}

/// One-click adjustments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TonePreset {
    Lighter,
    Darker,
    Warmer,
    Cooler,
}

impl TonePreset {
    pub const ALL: [TonePreset; 4] = [Self::Lighter, Self::Darker, Self::Warmer, Self::Cooler];
}

impl fmt::Display for TonePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lighter => "lighter",
            Self::Darker => "darker",
            Self::Warmer => "warmer",
            Self::Cooler => "cooler",
        })
    }
}

impl FromStr for TonePreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lighter" => Ok(Self::Lighter),
            "darker" => Ok(Self::Darker),
            "warmer" => Ok(Self::Warmer),
            "cooler" => Ok(Self::Cooler),
            other => Err(format!(
                "unknown preset '{}', expected one of lighter, darker, warmer, cooler",
                other
            )),
        }
    }
}

impl AdjustmentRequest {
    pub fn new(delta_lightness: f32, delta_warmth: f32, delta_saturation: f32) -> Self {
        Self {
            delta_lightness,
            delta_warmth,
            delta_saturation,
        }
    }

    pub fn preset(preset: TonePreset) -> Self {
        match preset {
            TonePreset::Lighter => Self::new(0.15, 0.0, -0.05),
            TonePreset::Darker => Self::new(-0.15, 0.05, 0.05),
            TonePreset::Warmer => Self::new(0.0, 0.20, 0.10),
            TonePreset::Cooler => Self::new(0.0, -0.20, -0.05),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.delta_lightness == 0.0 && self.delta_warmth == 0.0 && self.delta_saturation == 0.0
    }
}

impl From<TonePreset> for AdjustmentRequest {
    fn from(preset: TonePreset) -> Self {
        Self::preset(preset)
    }
}

/// Bounded deltas of one request, ready to apply to HSL coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Shift {
    lightness: f32,
    warmth: f32,
    saturation: f32,
}

impl Shift {
    /// `None` when every bounded delta is zero
    fn from_request(request: &AdjustmentRequest, bounds: &AdjustmentBounds) -> Result<Option<Self>> {
        let shift = Self {
            lightness: bounded("lightness", request.delta_lightness, bounds.max_abs_delta)?,
            warmth: bounded("warmth", request.delta_warmth, bounds.max_abs_delta)?,
            saturation: bounded("saturation", request.delta_saturation, bounds.max_abs_delta)?,
        };
        let identity = shift.lightness == 0.0 && shift.warmth == 0.0 && shift.saturation == 0.0;
        Ok((!identity).then_some(shift))
    }

    /// Shifted `(hue, saturation, lightness)`, clamped and wrapped
    fn apply(&self, hue: f32, saturation: f32, lightness: f32, bounds: &AdjustmentBounds) -> (f32, f32, f32) {
        let step = self.warmth.abs() * bounds.warmth_hue_span_deg;
        let hue = if self.warmth > 0.0 {
            toward(hue, bounds.warm_target_deg, step)
        } else if self.warmth < 0.0 {
            toward(hue, bounds.cool_target_deg, step)
        } else {
            hue
        };
        (
            wrap_hue(hue),
            (saturation + self.saturation).clamp(0.0, 1.0),
            (lightness + self.lightness).clamp(0.0, 1.0),
        )
    }
}

/// Move `hue` up to `step` degrees along the shorter arc to `target`,
/// stopping on the target.
fn toward(hue: f32, target: f32, step: f32) -> f32 {
    let diff = (target - hue + 540.0).rem_euclid(360.0) - 180.0;
    if diff.abs() <= step {
        target
    } else {
        wrap_hue(hue + step.copysign(diff))
    }
}

/// Apply `request` to `estimate`, returning a new estimate.
///
/// Deltas beyond `±max_abs_delta` are clamped to the bound; lightness and
/// saturation are then clamped to [0, 1]. Warmth does not rotate the hue
/// freely: positive warmth walks it toward `warm_target_deg` and negative
/// warmth toward `cool_target_deg`, `warmth_hue_span_deg` per unit, never
/// overshooting the target. The dominant color is rebuilt from the adjusted
/// coordinates. Sample count and dispersion carry over unchanged, and a
/// request that bounds to all zeros returns the estimate as is.
///
/// # Errors
///
/// `AdjustmentOutOfRange` for non-finite deltas.
pub fn adjust(estimate: &ToneEstimate, request: &AdjustmentRequest, bounds: &AdjustmentBounds) -> Result<ToneEstimate> {
    let Some(shift) = Shift::from_request(request, bounds)? else {
        return Ok(estimate.clone());
    };

    let (hue, saturation, lightness) = shift.apply(estimate.hue, estimate.saturation, estimate.lightness, bounds);
    let mut adjusted = ToneEstimate::from_hsl(lightness, hue, saturation, estimate.sample_count);
    adjusted.dispersion = estimate.dispersion;
    Ok(adjusted)
}

/// Apply `request` to the pixels of `image` marked in `mask`, in place.
///
/// Each marked pixel is shifted in its own HSL coordinates the same way
/// [`adjust`] shifts an estimate, so shading survives. Alpha and unmarked
/// pixels are left alone. Returns the number of pixels rewritten.
///
/// # Errors
///
/// - `AdjustmentOutOfRange` for non-finite deltas
/// - `InvalidImage` if mask and image dimensions differ
pub fn recolor(
    image: &mut RgbaImage,
    mask: &SkinMask,
    request: &AdjustmentRequest,
    bounds: &AdjustmentBounds,
) -> Result<usize> {
    if mask.dimensions() != image.dimensions() {
        return Err(AnalysisError::invalid_image(format!(
            "mask is {:?} but image is {:?}",
            mask.dimensions(),
            image.dimensions()
        )));
    }
    let Some(shift) = Shift::from_request(request, bounds)? else {
        return Ok(0);
    };

    let mut rewritten = 0;
    for (x, y) in mask.marked() {
        let pixel = image.get_pixel_mut(x, y);
        let [r, g, b, a] = pixel.0;
        let (h, s, l) = Rgb::new(r, g, b).to_hsl();
        let (h, s, l) = shift.apply(h, s, l, bounds);
        let shifted = Rgb::from_hsl(h, s, l);
        *pixel = Rgba([shifted.r, shifted.g, shifted.b, a]);
        rewritten += 1;
    }
    debug!(rewritten, "skin pixels recolored");
    Ok(rewritten)
}
