//! End-to-end entry points: photo in, tone + recommendations out.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classify::{Classification, classify};
use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};
use crate::modifier::{AdjustmentRequest, adjust, recolor};
use crate::recommend::{Recommendation, recommend};
use crate::region;
use crate::season::{self, Season};
use crate::tone::{self, ColorHarmony, Swatch, ToneEstimate};

/// Everything one analysis produces. Only returned whole; a failed call
/// yields no partial result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub estimate: ToneEstimate,
    pub classification: Classification,
    pub season: Season,
    pub recommendation: Recommendation,
    pub harmony: ColorHarmony,
    /// Dominant skin clusters; empty when the estimate came from an adjustment
    #[serde(default)]
    pub swatches: Vec<Swatch>,
}

/// Decode `image_bytes` and run the full pipeline.
///
/// `format_hint` skips format sniffing when the upload layer already knows
/// the container.
pub fn analyze(image_bytes: &[u8], format_hint: Option<ImageFormat>, config: &AnalyzerConfig) -> Result<Analysis> {
    run(image_bytes, format_hint, config, None)
}

/// Like [`analyze`], checking `cancel` between stages.
pub fn analyze_with_cancel(
    image_bytes: &[u8],
    format_hint: Option<ImageFormat>,
    config: &AnalyzerConfig,
    cancel: &AtomicBool,
) -> Result<Analysis> {
    run(image_bytes, format_hint, config, Some(cancel))
}

/// Run the pipeline on an already decoded image.
pub fn analyze_image(image: &DynamicImage, config: &AnalyzerConfig) -> Result<Analysis> {
    analyze_decoded(image, config, None)
}

/// Apply an adjustment to a previously returned estimate and rebuild the
/// classification and recommendations from it. No image is involved.
pub fn adjust_and_reclassify(
    current: &ToneEstimate,
    request: &AdjustmentRequest,
    config: &AnalyzerConfig,
) -> Result<Analysis> {
    config.validate()?;
    current.validate()?;
    let estimate = adjust(current, request, &config.adjustment)?;
    debug!(
        lightness = estimate.lightness,
        hue = estimate.hue,
        saturation = estimate.saturation,
        "tone adjusted"
    );
    Ok(finish(estimate, Vec::new(), config))
}

/// Re-render the photo with `request` applied to its skin pixels, as PNG.
///
/// The image goes through the same size check, downscale and skin
/// extraction as [`analyze`]; only the marked pixels change and alpha is
/// kept. An identity request re-encodes the prepared image untouched.
pub fn render_adjusted(
    image_bytes: &[u8],
    format_hint: Option<ImageFormat>,
    request: &AdjustmentRequest,
    config: &AnalyzerConfig,
) -> Result<Vec<u8>> {
    config.validate()?;
    let image = decode(image_bytes, format_hint)?;
    let mut rgba = prepare(&image, config)?;
    let mask = region::extract(&rgba, &config.image, &config.region)?;
    let rewritten = recolor(&mut rgba, &mask, request, &config.adjustment)?;

    let mut png = Vec::new();
    rgba.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|source| AnalysisError::PreviewEncode { source })?;
    info!(rewritten, bytes = png.len(), "adjusted preview rendered");
    Ok(png)
}

/// Message for the UI layer
pub fn describe_error(error: &AnalysisError) -> String {
    error.user_message()
}

fn run(
    image_bytes: &[u8],
    format_hint: Option<ImageFormat>,
    config: &AnalyzerConfig,
    cancel: Option<&AtomicBool>,
) -> Result<Analysis> {
    checkpoint(cancel, "decode")?;
    let image = decode(image_bytes, format_hint)?;
    analyze_decoded(&image, config, cancel)
}

fn analyze_decoded(image: &DynamicImage, config: &AnalyzerConfig, cancel: Option<&AtomicBool>) -> Result<Analysis> {
    // configs built in code bypass the checks done at load time
    config.validate()?;
    let rgba = prepare(image, config)?;

    checkpoint(cancel, "region")?;
    let mask = region::extract(&rgba, &config.image, &config.region)?;
    debug!(marked = mask.count(), "skin mask ready");

    checkpoint(cancel, "tone")?;
    let estimate = tone::estimate(&rgba, &mask, &config.estimator)?;

    checkpoint(cancel, "swatches")?;
    let swatches = tone::dominant_swatches(&rgba, &mask, &config.estimator)?;

    checkpoint(cancel, "classify")?;
    let analysis = finish(estimate, swatches, config);
    info!(
        color = %analysis.estimate.dominant_color.to_hex(),
        tone = %analysis.classification.tone_category,
        undertone = %analysis.classification.undertone,
        temperature = %analysis.classification.temperature,
        season = %analysis.season,
        confidence = analysis.classification.confidence,
        "analysis complete"
    );
    Ok(analysis)
}

/// Classifier onward; total once an estimate exists
fn finish(estimate: ToneEstimate, swatches: Vec<Swatch>, config: &AnalyzerConfig) -> Analysis {
    let classification = classify(&estimate, config);
    let season = season::map(&classification);
    Analysis {
        harmony: estimate.harmony(),
        recommendation: recommend(season),
        estimate,
        classification,
        season,
        swatches,
    }
}

fn decode(bytes: &[u8], format_hint: Option<ImageFormat>) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(AnalysisError::invalid_image("empty upload"));
    }
    let image = match format_hint {
        Some(format) => image::load_from_memory_with_format(bytes, format),
        None => image::load_from_memory(bytes),
    }
    .map_err(|e| AnalysisError::decode("failed to decode image", e))?;
    debug!(width = image.width(), height = image.height(), "image decoded");
    Ok(image)
}

/// Size check, then downscale to `max_analysis_side` and normalise to RGBA8
fn prepare(image: &DynamicImage, config: &AnalyzerConfig) -> Result<RgbaImage> {
    let rgba = image.to_rgba8();
    region::check_dimensions(&rgba, &config.image)?;

    let max_side = config.image.max_analysis_side;
    if rgba.width().max(rgba.height()) <= max_side {
        return Ok(rgba);
    }
    // aspect-preserving; the long side lands on max_side
    let resized = DynamicImage::ImageRgba8(rgba).resize(max_side, max_side, FilterType::Triangle);
    debug!(width = resized.width(), height = resized.height(), "image downscaled");
    Ok(resized.to_rgba8())
}

fn checkpoint(cancel: Option<&AtomicBool>, stage: &'static str) -> Result<()> {
    match cancel {
        Some(flag) if flag.load(Ordering::Relaxed) => Err(AnalysisError::Cancelled { stage }),
        _ => Ok(()),
    }
}
