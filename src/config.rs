//! Tunable parameters for the skin tone pipeline.
//!
//! Every threshold the pipeline uses lives here, grouped by stage, so bands
//! can be tested and tuned without touching algorithm code. A config is built
//! once at startup and passed by reference into each call; nothing in the
//! pipeline mutates it.
//!
//! ```no_run
//! use skin_tone_palette_wasm::AnalyzerConfig;
//! use std::path::Path;
//!
//! let config = AnalyzerConfig::from_json_file(Path::new("analyzer.json"))?;
//! // or
//! let config = AnalyzerConfig::default();
//! # Ok::<(), skin_tone_palette_wasm::AnalysisError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AnalysisError, Result};

/// Complete analyzer configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub image: ImageConfig,
    pub region: RegionConfig,
    pub estimator: EstimatorConfig,
    pub tone_bands: ToneBands,
    pub undertone: UndertoneBands,
    pub confidence: ConfidenceConfig,
    pub adjustment: AdjustmentBounds,
}

/// Input size limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// The longer side must reach at least this many pixels
    pub min_dimension_px: u32,
    /// Larger images are thumbnailed to this longest side before extraction
    pub max_analysis_side: u32,
}

/// Skin color thresholds and face-region parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// HSV hue upper bound for skin, degrees
    pub hue_max_deg: f32,
    /// HSV hues at or above this wrap-around bound also count (pinkish skin)
    pub hue_wrap_min_deg: f32,
    /// HSV saturation lower bound (0-1)
    pub saturation_min: f32,
    /// HSV value lower bound (0-1)
    pub value_min: f32,
    /// YCbCr Cr range (0-255)
    pub cr_min: f32,
    pub cr_max: f32,
    /// YCbCr Cb range (0-255)
    pub cb_min: f32,
    pub cb_max: f32,
    /// Square structuring element radius for opening/closing; 0 disables
    pub morphology_radius: u32,
    /// Largest connected skin blob must cover this fraction of the image to
    /// be treated as the face region
    pub min_face_fraction: f32,
    /// Face bounding box grows by this fraction of its shorter side on each edge
    pub face_padding: f32,
}

/// Tone estimator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Minimum marked pixels for a valid estimate
    pub min_samples: usize,
    /// Fraction trimmed from each tail of every channel (0.0-0.5)
    pub trim_fraction: f32,
    /// Number of k-means swatches reported with an analysis
    pub swatch_count: usize,
    /// Upper bound on pixels fed to dispersion and k-means
    pub sample_cap: usize,
}

/// Lightness bands, lower bounds inclusive. Anything below `medium_min` is Dark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneBands {
    pub very_light_min: f32,
    pub light_min: f32,
    pub medium_min: f32,
}

/// Hue bands for undertone classification, degrees.
///
/// `[cool_below_deg, warm_from_deg]` is the neutral zone; its width is
/// `warm_from_deg - cool_below_deg`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UndertoneBands {
    pub cool_below_deg: f32,
    pub warm_from_deg: f32,
    pub warm_until_deg: f32,
    /// Hues from here up to 360 are cool (pink/violet side)
    pub cool_from_deg: f32,
    /// Below this saturation the hue carries no signal
    pub achromatic_saturation: f32,
    /// Normalized red-minus-blue gap that separates Warm/Cool from the
    /// leaning Neutral temperature labels
    pub temperature_margin: f32,
}

/// Confidence model parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// Upper bound no estimate can exceed
    pub ceiling: f32,
    /// Sample count at which the sample factor reaches 1 - 1/e
    pub sample_scale: f32,
    /// Dispersion (ΔE) at which the dispersion factor halves
    pub dispersion_scale: f32,
}

/// Limits for user-driven tone adjustments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentBounds {
    /// Deltas are clamped to ±this value
    pub max_abs_delta: f32,
    /// Hue travel, in degrees, for a warmth delta of 1.0
    pub warmth_hue_span_deg: f32,
    /// Positive warmth moves the hue toward this golden hue
    pub warm_target_deg: f32,
    /// Negative warmth moves the hue toward this pink hue
    pub cool_target_deg: f32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            min_dimension_px: 20,
            max_analysis_side: 800,
        }
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            hue_max_deg: 40.0,
            hue_wrap_min_deg: 345.0,
            saturation_min: 0.08,
            value_min: 0.27,
            cr_min: 135.0,
            cr_max: 180.0,
            cb_min: 85.0,
            cb_max: 135.0,
            morphology_radius: 1,
            min_face_fraction: 0.005,
            face_padding: 0.2,
        }
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            min_samples: 50,
            trim_fraction: 0.1,
            swatch_count: 5,
            sample_cap: 40_000,
        }
    }
}

impl Default for ToneBands {
    fn default() -> Self {
        Self {
            very_light_min: 0.78,
            light_min: 0.62,
            medium_min: 0.40,
        }
    }
}

impl Default for UndertoneBands {
    fn default() -> Self {
        Self {
            cool_below_deg: 14.0,
            warm_from_deg: 22.0,
            warm_until_deg: 70.0,
            cool_from_deg: 200.0,
            achromatic_saturation: 0.06,
            temperature_margin: 0.1,
        }
    }
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            ceiling: 0.95,
            sample_scale: 150.0,
            dispersion_scale: 20.0,
        }
    }
}

impl Default for AdjustmentBounds {
    fn default() -> Self {
        Self {
            max_abs_delta: 1.0,
            warmth_hue_span_deg: 30.0,
            warm_target_deg: 35.0,
            cool_target_deg: 355.0,
        }
    }
}

impl AnalyzerConfig {
    /// Parse and validate configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AnalysisError::config_source("malformed configuration JSON", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::config_source(format!("cannot read {}", path.display()), e)
        })?;
        Self::from_json_str(&content)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::config_source("cannot serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            AnalysisError::config_source(format!("cannot write {}", path.display()), e)
        })
    }

    /// Check internal consistency of every section
    pub fn validate(&self) -> Result<()> {
        if self.image.min_dimension_px == 0 {
            return Err(AnalysisError::config("image.min_dimension_px must be positive"));
        }
        if self.image.max_analysis_side < self.image.min_dimension_px {
            return Err(AnalysisError::config(
                "image.max_analysis_side must not be below image.min_dimension_px",
            ));
        }

        let r = &self.region;
        if !(0.0..=360.0).contains(&r.hue_max_deg) || !(0.0..=360.0).contains(&r.hue_wrap_min_deg) {
            return Err(AnalysisError::config("region hue bounds must lie in [0, 360]"));
        }
        if r.cr_min > r.cr_max || r.cb_min > r.cb_max {
            return Err(AnalysisError::config("region Cr/Cb ranges are inverted"));
        }
        if !(0.0..1.0).contains(&r.min_face_fraction) || r.face_padding < 0.0 {
            return Err(AnalysisError::config("region face parameters out of range"));
        }

        let e = &self.estimator;
        if e.min_samples == 0 {
            return Err(AnalysisError::config("estimator.min_samples must be positive"));
        }
        if !(0.0..0.5).contains(&e.trim_fraction) {
            return Err(AnalysisError::config("estimator.trim_fraction must lie in [0, 0.5)"));
        }
        if e.sample_cap == 0 {
            return Err(AnalysisError::config("estimator.sample_cap must be positive"));
        }

        let b = &self.tone_bands;
        if !(0.0 < b.medium_min
            && b.medium_min < b.light_min
            && b.light_min < b.very_light_min
            && b.very_light_min < 1.0)
        {
            return Err(AnalysisError::config(
                "tone bands must satisfy 0 < medium_min < light_min < very_light_min < 1",
            ));
        }

        let u = &self.undertone;
        if !(0.0 <= u.cool_below_deg
            && u.cool_below_deg <= u.warm_from_deg
            && u.warm_from_deg < u.warm_until_deg
            && u.warm_until_deg < u.cool_from_deg
            && u.cool_from_deg <= 360.0)
        {
            return Err(AnalysisError::config(
                "undertone bands must satisfy 0 <= cool_below <= warm_from < warm_until < cool_from <= 360",
            ));
        }
        if !(0.0..1.0).contains(&u.achromatic_saturation) {
            return Err(AnalysisError::config("undertone.achromatic_saturation must lie in [0, 1)"));
        }
        if !(0.0..1.0).contains(&u.temperature_margin) {
            return Err(AnalysisError::config("undertone.temperature_margin must lie in [0, 1)"));
        }

        let c = &self.confidence;
        if !(0.0 < c.ceiling && c.ceiling <= 1.0) {
            return Err(AnalysisError::config("confidence.ceiling must lie in (0, 1]"));
        }
        if c.sample_scale <= 0.0 || c.dispersion_scale <= 0.0 {
            return Err(AnalysisError::config("confidence scales must be positive"));
        }

        let a = &self.adjustment;
        if !(a.max_abs_delta > 0.0 && a.max_abs_delta.is_finite()) {
            return Err(AnalysisError::config("adjustment.max_abs_delta must be positive"));
        }
        if !(0.0..=180.0).contains(&a.warmth_hue_span_deg) {
            return Err(AnalysisError::config("adjustment.warmth_hue_span_deg must lie in [0, 180]"));
        }
        // each target must sit inside the band it stands for
        if !(u.warm_from_deg < a.warm_target_deg && a.warm_target_deg <= u.warm_until_deg) {
            return Err(AnalysisError::config(
                "adjustment.warm_target_deg must lie in (warm_from_deg, warm_until_deg]",
            ));
        }
        let cool = a.cool_target_deg;
        if !((0.0..u.cool_below_deg).contains(&cool) || (u.cool_from_deg..360.0).contains(&cool)) {
            return Err(AnalysisError::config(
                "adjustment.cool_target_deg must lie in the cool undertone band",
            ));
        }

        Ok(())
    }
}
