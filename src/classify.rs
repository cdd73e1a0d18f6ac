//! Classification of a tone estimate into categorical labels.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::config::{AnalyzerConfig, ConfidenceConfig, ToneBands, UndertoneBands};
use crate::tone::ToneEstimate;

/// Coarse lightness bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ToneCategory {
    VeryLight,
    Light,
    Medium,
    Dark,
}

impl ToneCategory {
    pub const ALL: [ToneCategory; 4] = [Self::VeryLight, Self::Light, Self::Medium, Self::Dark];

    pub fn label(self) -> &'static str {
        match self {
            Self::VeryLight => "Very Light",
            Self::Light => "Light",
            Self::Medium => "Medium",
            Self::Dark => "Dark",
        }
    }
}

impl fmt::Display for ToneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Undertone {
    Cool,
    Warm,
    Neutral,
}

impl Undertone {
    pub const ALL: [Undertone; 3] = [Self::Cool, Self::Warm, Self::Neutral];

    pub fn label(self) -> &'static str {
        match self {
            Self::Cool => "Cool",
            Self::Warm => "Warm",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Undertone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Red-versus-blue balance of the dominant color, a finer-grained
/// companion to [`Undertone`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColorTemperature {
    Warm,
    #[serde(rename = "Neutral-Warm")]
    NeutralWarm,
    #[default]
    Neutral,
    #[serde(rename = "Neutral-Cool")]
    NeutralCool,
    Cool,
}

impl ColorTemperature {
    pub fn label(self) -> &'static str {
        match self {
            Self::Warm => "Warm",
            Self::NeutralWarm => "Neutral-Warm",
            Self::Neutral => "Neutral",
            Self::NeutralCool => "Neutral-Cool",
            Self::Cool => "Cool",
        }
    }
}

impl fmt::Display for ColorTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub tone_category: ToneCategory,
    pub undertone: Undertone,
    #[serde(default)]
    pub temperature: ColorTemperature,
    /// 0-1, never above the configured ceiling
    pub confidence: f32,
}

/// Classify an estimate. Total over every `ToneEstimate`.
pub fn classify(estimate: &ToneEstimate, config: &AnalyzerConfig) -> Classification {
    Classification {
        tone_category: tone_category(estimate.lightness, &config.tone_bands),
        undertone: undertone(estimate.hue, estimate.saturation, &config.undertone),
        temperature: temperature(estimate.dominant_color, config.undertone.temperature_margin),
        confidence: confidence(estimate.sample_count, estimate.dispersion, &config.confidence),
    }
}

/// Compare normalized red and blue; a gap above `margin` is decisive,
/// a smaller one only leans.
pub fn temperature(color: Rgb, margin: f32) -> ColorTemperature {
    let gap = (color.r as f32 - color.b as f32) / 255.0;
    if gap > 0.0 {
        if gap > margin { ColorTemperature::Warm } else { ColorTemperature::NeutralWarm }
    } else if gap < 0.0 {
        if -gap > margin { ColorTemperature::Cool } else { ColorTemperature::NeutralCool }
    } else {
        ColorTemperature::Neutral
    }
}

pub fn tone_category(lightness: f32, bands: &ToneBands) -> ToneCategory {
    if lightness >= bands.very_light_min {
        ToneCategory::VeryLight
    } else if lightness >= bands.light_min {
        ToneCategory::Light
    } else if lightness >= bands.medium_min {
        ToneCategory::Medium
    } else {
        // also catches NaN
        ToneCategory::Dark
    }
}

/// Reddish hues read cool, golden hues warm; the neutral zone between
/// them is inclusive at both ends.
pub fn undertone(hue: f32, saturation: f32, bands: &UndertoneBands) -> Undertone {
    if saturation.is_nan() || saturation < bands.achromatic_saturation {
        return Undertone::Neutral;
    }
    if hue < bands.cool_below_deg || hue >= bands.cool_from_deg {
        Undertone::Cool
    } else if hue <= bands.warm_from_deg {
        Undertone::Neutral
    } else if hue <= bands.warm_until_deg {
        Undertone::Warm
    } else {
        Undertone::Neutral
    }
}

/// Saturating in sample count, decreasing in dispersion, capped at the
/// ceiling. Unknown dispersion costs nothing.
pub fn confidence(sample_count: usize, dispersion: Option<f32>, config: &ConfidenceConfig) -> f32 {
    let coverage = 1.0 - (-(sample_count as f32) / config.sample_scale).exp();
    let spread = match dispersion {
        Some(d) if d.is_finite() && d > 0.0 => 1.0 / (1.0 + d / config.dispersion_scale),
        Some(d) if d.is_nan() || d == f32::INFINITY => 0.0,
        _ => 1.0,
    };
    (config.ceiling * coverage * spread).clamp(0.0, config.ceiling.min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn est(lightness: f32, hue: f32, saturation: f32, samples: usize) -> ToneEstimate {
        ToneEstimate::from_hsl(lightness, hue, saturation, samples)
    }

    #[test]
    fn test_very_light_warm_scenario() {
        let c = classify(&est(0.85, 40.0, 0.3, 500), &AnalyzerConfig::default());
        assert_eq!(c.tone_category, ToneCategory::VeryLight);
        assert_eq!(c.undertone, Undertone::Warm);
        assert!(c.confidence > 0.8 && c.confidence <= 0.95);
    }

    #[test]
    fn test_tone_bands() {
        let bands = ToneBands::default();
        assert_eq!(tone_category(1.0, &bands), ToneCategory::VeryLight);
        assert_eq!(tone_category(0.78, &bands), ToneCategory::VeryLight);
        assert_eq!(tone_category(0.7, &bands), ToneCategory::Light);
        assert_eq!(tone_category(0.5, &bands), ToneCategory::Medium);
        assert_eq!(tone_category(0.39, &bands), ToneCategory::Dark);
        assert_eq!(tone_category(0.0, &bands), ToneCategory::Dark);
    }

    #[test]
    fn test_neutral_zone_is_inclusive() {
        let bands = UndertoneBands::default();
        assert_eq!(undertone(13.9, 0.4, &bands), Undertone::Cool);
        assert_eq!(undertone(14.0, 0.4, &bands), Undertone::Neutral);
        assert_eq!(undertone(18.0, 0.4, &bands), Undertone::Neutral);
        assert_eq!(undertone(22.0, 0.4, &bands), Undertone::Neutral);
        assert_eq!(undertone(22.5, 0.4, &bands), Undertone::Warm);
        assert_eq!(undertone(70.0, 0.4, &bands), Undertone::Warm);
        assert_eq!(undertone(120.0, 0.4, &bands), Undertone::Neutral);
        assert_eq!(undertone(200.0, 0.4, &bands), Undertone::Cool);
        assert_eq!(undertone(350.0, 0.4, &bands), Undertone::Cool);
    }

    #[test]
    fn test_grey_is_neutral() {
        let bands = UndertoneBands::default();
        assert_eq!(undertone(40.0, 0.01, &bands), Undertone::Neutral);
        assert_eq!(undertone(350.0, 0.0, &bands), Undertone::Neutral);
        assert_eq!(undertone(40.0, f32::NAN, &bands), Undertone::Neutral);
    }

    #[test]
    fn test_confidence_monotonic_in_samples() {
        let config = AnalyzerConfig::default();
        let high = classify(&est(0.6, 30.0, 0.4, 100), &config).confidence;
        let low = classify(&est(0.6, 30.0, 0.4, 10), &config).confidence;
        assert!(high >= low);

        let mut previous = 0.0;
        for n in [1, 10, 50, 100, 500, 5_000, 1_000_000] {
            let c = confidence(n, Some(5.0), &config.confidence);
            assert!(c >= previous);
            assert!(c <= config.confidence.ceiling);
            previous = c;
        }
    }

    #[test]
    fn test_confidence_decreases_with_dispersion() {
        let config = ConfidenceConfig::default();
        let tight = confidence(1000, Some(2.0), &config);
        let loose = confidence(1000, Some(30.0), &config);
        let unknown = confidence(1000, None, &config);
        assert!(tight > loose);
        assert!(unknown >= tight);
        assert_eq!(confidence(1000, Some(f32::NAN), &config), 0.0);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let config = AnalyzerConfig::default();
        let e = est(0.55, 200.0, 0.2, 321).with_dispersion(7.5);
        assert_eq!(classify(&e, &config), classify(&e, &config));
    }

    #[test]
    fn test_custom_bands_are_honoured() {
        let mut config = AnalyzerConfig::default();
        config.tone_bands.very_light_min = 0.9;
        let c = classify(&est(0.85, 40.0, 0.3, 500), &config);
        assert_eq!(c.tone_category, ToneCategory::Light);
    }

    #[test]
    fn test_temperature_labels() {
        let margin = UndertoneBands::default().temperature_margin;
        assert_eq!(temperature(Rgb::new(230, 180, 130), margin), ColorTemperature::Warm);
        assert_eq!(temperature(Rgb::new(200, 180, 190), margin), ColorTemperature::NeutralWarm);
        assert_eq!(temperature(Rgb::new(180, 180, 180), margin), ColorTemperature::Neutral);
        assert_eq!(temperature(Rgb::new(170, 160, 190), margin), ColorTemperature::NeutralCool);
        assert_eq!(temperature(Rgb::new(120, 130, 200), margin), ColorTemperature::Cool);
    }

    #[test]
    fn test_temperature_follows_dominant_color() {
        let config = AnalyzerConfig::default();
        let warm = ToneEstimate::from_rgb(Rgb::new(210, 160, 120), 400, None);
        assert_eq!(classify(&warm, &config).temperature, ColorTemperature::Warm);
        assert_eq!(
            serde_json::to_value(ColorTemperature::NeutralCool).unwrap(),
            serde_json::json!("Neutral-Cool")
        );
        assert_eq!(ColorTemperature::NeutralWarm.to_string(), "Neutral-Warm");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_confidence_grows_with_samples(a in 0usize..100_000, b in 0usize..100_000, d in 0.0f32..200.0) {
            let config = ConfidenceConfig::default();
            let (lo, hi) = (a.min(b), a.max(b));
            let c_lo = confidence(lo, Some(d), &config);
            let c_hi = confidence(hi, Some(d), &config);
            prop_assert!(c_hi + 1e-6 >= c_lo);
            prop_assert!((0.0..=config.ceiling).contains(&c_hi));
        }

        #[test]
        fn prop_confidence_shrinks_with_dispersion(n in 1usize..100_000, a in 0.0f32..500.0, b in 0.0f32..500.0) {
            let config = ConfidenceConfig::default();
            let (tight, loose) = (a.min(b), a.max(b));
            prop_assert!(confidence(n, Some(tight), &config) + 1e-6 >= confidence(n, Some(loose), &config));
            prop_assert!(confidence(n, None, &config) + 1e-6 >= confidence(n, Some(tight), &config));
        }
    }
}
