//! Tone estimation over the masked skin pixels.
//!
//! The representative color is a per-channel trimmed mean, computed from
//! 256-bin histograms so it costs one pass over the mask regardless of size
//! and ignores the darkest and brightest tails (shadows, specular highlights).

use std::collections::HashMap;

use image::RgbaImage;
use kmeans_colors::{Sort, get_kmeans};
use palette::Lab;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{Rgb, delta_e, wrap_hue};
use crate::config::EstimatorConfig;
use crate::error::{AnalysisError, Result};
use crate::region::SkinMask;

const KMEANS_MAX_ITER: usize = 20;
const KMEANS_CONVERGE: f32 = 1e-4;
const KMEANS_SEED: u64 = 42;

/// Representative skin color and its HSL coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneEstimate {
    pub dominant_color: Rgb,
    /// HSL lightness, 0-1
    pub lightness: f32,
    /// HSL hue, degrees in [0, 360)
    pub hue: f32,
    /// HSL saturation, 0-1
    pub saturation: f32,
    /// Number of skin pixels the estimate was drawn from
    pub sample_count: usize,
    /// RMS ΔE76 of the samples around the dominant color, when measured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispersion: Option<f32>,
}

/// One k-means cluster of the skin pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swatch {
    pub color: Rgb,
    pub hex: String,
    /// Fraction of sampled pixels in this cluster
    pub share: f32,
}

/// Hue relationships of the skin tone on the color wheel, degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorHarmony {
    pub base_hue: f32,
    pub complementary: f32,
    pub triadic: [f32; 2],
    pub analogous: [f32; 2],
}

impl Swatch {
    fn new(color: Rgb, share: f32) -> Self {
        Self {
            color,
            hex: color.to_hex(),
            share,
        }
    }
}

impl ToneEstimate {
    /// Build an estimate from HSL coordinates; the dominant color is derived
    /// from them. Out-of-range inputs are clamped/wrapped.
    pub fn from_hsl(lightness: f32, hue: f32, saturation: f32, sample_count: usize) -> Self {
        let lightness = lightness.clamp(0.0, 1.0);
        let saturation = saturation.clamp(0.0, 1.0);
        let hue = wrap_hue(hue);
        Self {
            dominant_color: Rgb::from_hsl(hue, saturation, lightness),
            lightness,
            hue,
            saturation,
            sample_count,
            dispersion: None,
        }
    }

    /// Build an estimate from a measured color
    pub fn from_rgb(color: Rgb, sample_count: usize, dispersion: Option<f32>) -> Self {
        let (hue, saturation, lightness) = color.to_hsl();
        Self {
            dominant_color: color,
            lightness,
            hue,
            saturation,
            sample_count,
            dispersion,
        }
    }

    pub fn with_dispersion(mut self, dispersion: f32) -> Self {
        self.dispersion = Some(dispersion);
        self
    }

    /// Check the invariants of an estimate that came from outside the
    /// pipeline (for example a client session)
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(AnalysisError::InvalidEstimate { reason });
        if self.sample_count == 0 {
            return invalid("sample_count must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.lightness) {
            return invalid(format!("lightness {} outside [0, 1]", self.lightness));
        }
        if !(0.0..=1.0).contains(&self.saturation) {
            return invalid(format!("saturation {} outside [0, 1]", self.saturation));
        }
        if !(0.0..360.0).contains(&self.hue) {
            return invalid(format!("hue {} outside [0, 360)", self.hue));
        }
        if let Some(d) = self.dispersion {
            if !(d.is_finite() && d >= 0.0) {
                return invalid(format!("dispersion {} must be finite and non-negative", d));
            }
        }
        Ok(())
    }

    /// Complementary, triadic and analogous hues around the skin hue
    pub fn harmony(&self) -> ColorHarmony {
        let h = self.hue;
        ColorHarmony {
            base_hue: h,
            complementary: wrap_hue(h + 180.0),
            triadic: [wrap_hue(h + 120.0), wrap_hue(h + 240.0)],
            analogous: [wrap_hue(h + 30.0), wrap_hue(h - 30.0)],
        }
    }
}

/// Aggregate the masked pixels into a tone estimate.
///
/// # Errors
///
/// - `InvalidImage` if mask and image dimensions differ
/// - `InsufficientSample` if fewer than `min_samples` pixels are marked, or
///   none at all
pub fn estimate(image: &RgbaImage, mask: &SkinMask, config: &EstimatorConfig) -> Result<ToneEstimate> {
    let samples = collect_samples(image, mask)?;
    let required = config.min_samples.max(1);
    if samples.len() < required {
        return Err(AnalysisError::InsufficientSample {
            found: samples.len(),
            required,
        });
    }

    let center = trimmed_mean(&samples, config.trim_fraction);
    let dispersion = dispersion(&samples, center, config.sample_cap);
    let estimate = ToneEstimate::from_rgb(center, samples.len(), Some(dispersion));

    debug!(
        samples = samples.len(),
        color = %center.to_hex(),
        lightness = estimate.lightness,
        hue = estimate.hue,
        saturation = estimate.saturation,
        dispersion,
        "tone estimated"
    );
    Ok(estimate)
}

/// Dominant color clusters of the masked pixels, largest share first.
///
/// Deterministic: k-means runs with a fixed seed over an evenly strided
/// subsample.
pub fn dominant_swatches(image: &RgbaImage, mask: &SkinMask, config: &EstimatorConfig) -> Result<Vec<Swatch>> {
    let samples = collect_samples(image, mask)?;
    if samples.is_empty() || config.swatch_count == 0 {
        return Ok(Vec::new());
    }

    let subsample: Vec<Rgb> = strided(&samples, config.sample_cap).collect();
    let k = config.swatch_count.min(u8::MAX as usize);

    // k-means++ seeding needs more distinct colors than clusters
    if let Some(exact) = exact_swatches(&subsample, k) {
        return Ok(exact);
    }

    let lab_pixels: Vec<Lab> = subsample.iter().map(|c| c.to_lab()).collect();
    let kmeans = get_kmeans(k, KMEANS_MAX_ITER, KMEANS_CONVERGE, false, &lab_pixels, KMEANS_SEED);

    let mut clusters = Lab::sort_indexed_colors(&kmeans.centroids, &kmeans.indices);
    clusters.sort_by(|a, b| b.percentage.total_cmp(&a.percentage).then(a.index.cmp(&b.index)));

    Ok(clusters
        .into_iter()
        .filter(|c| c.percentage > 0.0)
        .map(|c| Swatch::new(Rgb::from_lab(c.centroid), c.percentage))
        .collect())
}

/// One swatch per distinct color when there are at most `k` of them
fn exact_swatches(samples: &[Rgb], k: usize) -> Option<Vec<Swatch>> {
    let mut counts: HashMap<Rgb, usize> = HashMap::new();
    for &c in samples {
        *counts.entry(c).or_default() += 1;
        if counts.len() > k {
            return None;
        }
    }

    let mut counts: Vec<(Rgb, usize)> = counts.into_iter().collect();
    counts.sort_by(|(a, na), (b, nb)| nb.cmp(na).then((a.r, a.g, a.b).cmp(&(b.r, b.g, b.b))));
    let total = samples.len() as f32;
    Some(counts.into_iter().map(|(c, n)| Swatch::new(c, n as f32 / total)).collect())
}

fn collect_samples(image: &RgbaImage, mask: &SkinMask) -> Result<Vec<Rgb>> {
    if image.dimensions() != mask.dimensions() {
        let (iw, ih) = image.dimensions();
        let (mw, mh) = mask.dimensions();
        return Err(AnalysisError::invalid_image(format!(
            "mask is {}x{} but image is {}x{}",
            mw, mh, iw, ih
        )));
    }
    Ok(mask
        .marked()
        .map(|(x, y)| {
            let [r, g, b, _] = image.get_pixel(x, y).0;
            Rgb::new(r, g, b)
        })
        .collect())
}

/// Every n-th sample so at most `cap` remain
fn strided(samples: &[Rgb], cap: usize) -> impl Iterator<Item = Rgb> + '_ {
    let step = samples.len().div_ceil(cap.max(1)).max(1);
    samples.iter().copied().step_by(step)
}

/// Per-channel mean after dropping `trim` of the samples from each tail.
/// `samples` must not be empty.
fn trimmed_mean(samples: &[Rgb], trim: f32) -> Rgb {
    let mut hist = [[0u32; 256]; 3];
    for c in samples {
        hist[0][c.r as usize] += 1;
        hist[1][c.g as usize] += 1;
        hist[2][c.b as usize] += 1;
    }

    let n = samples.len();
    let cut = ((n as f32 * trim).floor() as usize).min((n - 1) / 2);
    let channel = |h: &[u32; 256]| -> u8 {
        // keep ranks [cut, n - cut)
        let (lo, hi) = (cut, n - cut);
        let mut rank = 0usize;
        let mut sum = 0u64;
        for (value, &count) in h.iter().enumerate() {
            let start = rank;
            let end = rank + count as usize;
            rank = end;
            let kept = end.min(hi).saturating_sub(start.max(lo));
            sum += kept as u64 * value as u64;
        }
        (sum as f64 / (hi - lo) as f64).round() as u8
    };

    Rgb::new(channel(&hist[0]), channel(&hist[1]), channel(&hist[2]))
}

/// RMS color difference of the samples around `center`
fn dispersion(samples: &[Rgb], center: Rgb, cap: usize) -> f32 {
    let center = center.to_lab();
    let (sum, count) = strided(samples, cap).fold((0.0f64, 0usize), |(sum, count), c| {
        let d = delta_e(c.to_lab(), center) as f64;
        (sum + d * d, count + 1)
    });
    if count == 0 {
        return 0.0;
    }
    (sum / count as f64).sqrt() as f32
}
