//! Browser bindings.
//!
//! Results cross the boundary as plain JS objects (serialized with
//! `serde_json`, revived with `JSON.parse`). Failures reject with an object
//! `{ message, detail, needsNewPhoto }` where `message` is the text to show
//! the user.

use js_sys::{Array, JSON, Object, Reflect, Uint8Array};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::modifier::{AdjustmentRequest, TonePreset};
use crate::pipeline::{adjust_and_reclassify, analyze, describe_error, render_adjusted};
use crate::tone::ToneEstimate;

/// Analyze an uploaded photo.
///
/// `config_json` may hold a partial configuration; missing fields take their
/// defaults.
#[wasm_bindgen(js_name = analyzePhoto)]
pub fn analyze_photo(input: Vec<u8>, config_json: Option<String>) -> Result<JsValue, JsValue> {
    let config = load_config(config_json.as_deref())?;
    let analysis = analyze(&input, None, &config).map_err(error_object)?;
    to_js(&analysis)
}

/// Re-run classification and recommendations on an adjusted estimate.
///
/// `estimate_json` is the `estimate` field of a previous analysis.
#[wasm_bindgen(js_name = adjustTone)]
pub fn adjust_tone(
    estimate_json: &str,
    delta_lightness: f32,
    delta_warmth: f32,
    delta_saturation: f32,
    config_json: Option<String>,
) -> Result<JsValue, JsValue> {
    let request = AdjustmentRequest::new(delta_lightness, delta_warmth, delta_saturation);
    adjust_with(estimate_json, &request, config_json.as_deref())
}

/// One of `lighter`, `darker`, `warmer`, `cooler`
#[wasm_bindgen(js_name = applyPreset)]
pub fn apply_preset(estimate_json: &str, preset: &str, config_json: Option<String>) -> Result<JsValue, JsValue> {
    let preset: TonePreset = preset.parse().map_err(|e: String| JsValue::from_str(&e))?;
    adjust_with(estimate_json, &AdjustmentRequest::preset(preset), config_json.as_deref())
}

/// Preview of the photo with the adjustment applied to its skin, as PNG
/// bytes ready for a `Blob`.
#[wasm_bindgen(js_name = renderAdjusted)]
pub fn render_adjusted_photo(
    input: Vec<u8>,
    delta_lightness: f32,
    delta_warmth: f32,
    delta_saturation: f32,
    config_json: Option<String>,
) -> Result<Uint8Array, JsValue> {
    let config = load_config(config_json.as_deref())?;
    let request = AdjustmentRequest::new(delta_lightness, delta_warmth, delta_saturation);
    let png = render_adjusted(&input, None, &request, &config).map_err(error_object)?;
    Ok(Uint8Array::from(png.as_slice()))
}

/// Hex codes of the dominant skin swatches, largest first
#[wasm_bindgen(js_name = skinPalette)]
pub fn skin_palette(input: Vec<u8>) -> Result<Array, JsValue> {
    let analysis = analyze(&input, None, &AnalyzerConfig::default()).map_err(error_object)?;
    let palette = Array::new();
    for swatch in &analysis.swatches {
        palette.push(&JsValue::from_str(&swatch.hex));
    }
    Ok(palette)
}

/// Pretty-printed default configuration, as a starting point for overrides
#[wasm_bindgen(js_name = defaultConfigJson)]
pub fn default_config_json() -> Result<String, JsValue> {
    serde_json::to_string_pretty(&AnalyzerConfig::default())
        .map_err(|e| JsValue::from_str(&format!("Config encode error: {e}")))
}

fn adjust_with(estimate_json: &str, request: &AdjustmentRequest, config_json: Option<&str>) -> Result<JsValue, JsValue> {
    let config = load_config(config_json)?;
    let estimate: ToneEstimate = serde_json::from_str(estimate_json).map_err(|e| {
        error_object(AnalysisError::InvalidEstimate {
            reason: e.to_string(),
        })
    })?;
    let analysis = adjust_and_reclassify(&estimate, request, &config).map_err(error_object)?;
    to_js(&analysis)
}

fn load_config(json: Option<&str>) -> Result<AnalyzerConfig, JsValue> {
    match json {
        Some(json) if !json.trim().is_empty() => AnalyzerConfig::from_json_str(json).map_err(error_object),
        _ => Ok(AnalyzerConfig::default()),
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Result encode error: {e}")))?;
    JSON::parse(&json)
}

fn error_object(err: AnalysisError) -> JsValue {
    let obj = Object::new();
    let set = |key: &str, value: JsValue| Reflect::set(&obj, &JsValue::from_str(key), &value);
    let written = set("message", JsValue::from_str(&describe_error(&err)))
        .and_then(|_| set("detail", JsValue::from_str(&err.to_string())))
        .and_then(|_| set("needsNewPhoto", JsValue::from_bool(err.needs_new_photo())));
    match written {
        Ok(_) => obj.into(),
        Err(_) => JsValue::from_str(&describe_error(&err)),
    }
}
