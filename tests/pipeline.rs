use std::io::Cursor;
use std::sync::atomic::AtomicBool;

use image::{ImageFormat, Rgba, RgbaImage};
use skin_tone_palette_wasm::{
    AdjustmentRequest, AnalysisError, AnalyzerConfig, ColorTemperature, Season, TonePreset, ToneCategory, Undertone,
    adjust_and_reclassify, analyze, analyze_image, analyze_with_cancel, describe_error, render_adjusted,
};

const BACKDROP: Rgba<u8> = Rgba([40, 90, 200, 255]);

/// Face-sized block of `skin` on a blue backdrop, PNG encoded
fn portrait_png(w: u32, h: u32, skin: [u8; 3]) -> Vec<u8> {
    let image = RgbaImage::from_fn(w, h, |x, y| {
        if x.abs_diff(w / 2) < w / 4 && y.abs_diff(h / 2) < h / 3 {
            Rgba([skin[0], skin[1], skin[2], 255])
        } else {
            BACKDROP
        }
    });
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn warm_light_portrait_is_spring() {
    let png = portrait_png(200, 240, [230, 180, 130]);
    let analysis = analyze(&png, Some(ImageFormat::Png), &AnalyzerConfig::default()).unwrap();

    assert_eq!(analysis.classification.tone_category, ToneCategory::Light);
    assert_eq!(analysis.classification.undertone, Undertone::Warm);
    assert_eq!(analysis.season, Season::Spring);
    assert!(
        analysis
            .recommendation
            .best_colors
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case("coral"))
    );
    assert!(analysis.classification.confidence > 0.5);
    assert_eq!(analysis.swatches[0].hex, "#E6B482");
}

#[test]
fn pink_very_light_portrait_is_summer() {
    let png = portrait_png(160, 160, [230, 180, 190]);
    let analysis = analyze(&png, None, &AnalyzerConfig::default()).unwrap();

    assert_eq!(analysis.classification.tone_category, ToneCategory::VeryLight);
    assert_eq!(analysis.classification.undertone, Undertone::Cool);
    assert_eq!(analysis.season, Season::Summer);
}

#[test]
fn analysis_is_reproducible() {
    let png = portrait_png(180, 200, [200, 150, 110]);
    let config = AnalyzerConfig::default();
    let a = serde_json::to_string(&analyze(&png, None, &config).unwrap()).unwrap();
    let b = serde_json::to_string(&analyze(&png, None, &config).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn wrong_format_hint_is_invalid_image() {
    let png = portrait_png(64, 64, [230, 180, 130]);
    let err = analyze(&png, Some(ImageFormat::Jpeg), &AnalyzerConfig::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidImage { .. }));
    assert!(err.needs_new_photo());
    assert!(describe_error(&err).contains("valid photo"));
}

#[test]
fn tiny_upload_is_rejected() {
    let png = portrait_png(12, 12, [230, 180, 130]);
    let err = analyze(&png, None, &AnalyzerConfig::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidImage { .. }));
}

#[test]
fn sparse_skin_needs_better_lighting() {
    // 6x6 block of skin is well under the 50 pixel minimum
    let mut image = RgbaImage::from_pixel(100, 100, BACKDROP);
    for y in 40..46 {
        for x in 40..46 {
            image.put_pixel(x, y, Rgba([230, 180, 130, 255]));
        }
    }
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png).unwrap();

    let err = analyze(&png, None, &AnalyzerConfig::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::InsufficientSample { found: 36, required: 50 }));
    assert!(describe_error(&err).contains("better lighting"));
}

#[test]
fn preset_adjustments_reclassify_without_the_image() {
    let png = portrait_png(200, 240, [230, 180, 130]);
    let config = AnalyzerConfig::default();
    let analysis = analyze(&png, None, &config).unwrap();

    let lighter = adjust_and_reclassify(&analysis.estimate, &AdjustmentRequest::preset(TonePreset::Lighter), &config)
        .unwrap();
    assert_eq!(lighter.classification.tone_category, ToneCategory::VeryLight);
    assert_eq!(lighter.season, Season::Spring);

    // an estimate round-tripped through JSON, as a client session would hold it
    let stored: skin_tone_palette_wasm::ToneEstimate =
        serde_json::from_str(&serde_json::to_string(&analysis.estimate).unwrap()).unwrap();
    let deeper = adjust_and_reclassify(&stored, &AdjustmentRequest::new(-0.5, 0.0, 0.0), &config).unwrap();
    assert_eq!(deeper.season, Season::Autumn);
}

#[test]
fn oversized_delta_is_clamped_not_fatal() {
    let png = portrait_png(120, 120, [230, 180, 130]);
    let config = AnalyzerConfig::default();
    let analysis = analyze(&png, None, &config).unwrap();

    let adjusted = adjust_and_reclassify(&analysis.estimate, &AdjustmentRequest::new(2.0, 0.0, 0.0), &config).unwrap();
    assert_eq!(adjusted.estimate.lightness, 1.0);
}

#[test]
fn partial_config_json_overrides_bands() {
    let config = AnalyzerConfig::from_json_str(r#"{ "tone_bands": { "very_light_min": 0.7 } }"#).unwrap();
    let png = portrait_png(160, 160, [230, 180, 130]);
    let analysis = analyze(&png, None, &config).unwrap();
    assert_eq!(analysis.classification.tone_category, ToneCategory::VeryLight);
}

#[test]
fn cancellation_is_honoured() {
    let png = portrait_png(100, 100, [230, 180, 130]);
    let cancel = AtomicBool::new(true);
    let err = analyze_with_cancel(&png, None, &AnalyzerConfig::default(), &cancel).unwrap_err();
    assert!(matches!(err, AnalysisError::Cancelled { .. }));
    assert!(!err.needs_new_photo());
}

#[test]
fn warmer_preset_keeps_golden_skin_warm() {
    let png = portrait_png(200, 240, [220, 175, 120]);
    let config = AnalyzerConfig::default();
    let analysis = analyze(&png, None, &config).unwrap();
    assert_eq!(analysis.classification.undertone, Undertone::Warm);
    assert_eq!(analysis.classification.temperature, ColorTemperature::Warm);

    for request in [AdjustmentRequest::preset(TonePreset::Warmer), AdjustmentRequest::new(0.0, 1.0, 0.0)] {
        let warmer = adjust_and_reclassify(&analysis.estimate, &request, &config).unwrap();
        assert_eq!(warmer.classification.undertone, Undertone::Warm);
        assert_eq!(warmer.season, analysis.season);
    }
}

#[test]
fn zero_minimum_sample_config_is_refused() {
    let mut config = AnalyzerConfig::default();
    config.estimator.min_samples = 0;
    let image = image::DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 64, BACKDROP));
    let err = analyze_image(&image, &config).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidConfig { .. }));
    assert!(!err.needs_new_photo());
}

#[test]
fn lighter_preview_brightens_the_face_and_keeps_the_backdrop() {
    let png = portrait_png(160, 200, [200, 150, 110]);
    let preview = render_adjusted(&png, None, &AdjustmentRequest::preset(TonePreset::Lighter), &AnalyzerConfig::default())
        .unwrap();
    let rendered = image::load_from_memory_with_format(&preview, ImageFormat::Png)
        .unwrap()
        .to_rgba8();

    assert_eq!(rendered.dimensions(), (160, 200));
    assert_eq!(*rendered.get_pixel(2, 2), BACKDROP);
    let face = rendered.get_pixel(80, 100);
    assert!(u16::from(face[0]) + u16::from(face[1]) + u16::from(face[2]) > 200 + 150 + 110);

    // the preview is itself a photo the analyzer accepts
    let reanalyzed = analyze(&preview, Some(ImageFormat::Png), &AnalyzerConfig::default()).unwrap();
    assert!(reanalyzed.estimate.lightness > 0.55);
}
