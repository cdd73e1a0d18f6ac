//! Skin tone estimation and seasonal color recommendations.
//!
//! A photo flows through a fixed sequence of stages:
//!
//! 1. [`region::extract`] marks probable skin pixels (HSV + YCbCr thresholds,
//!    morphological cleanup, dominant face blob with a global fallback).
//! 2. [`tone::estimate`] reduces them to a robust representative color.
//! 3. [`classify::classify`] buckets it into a tone category and undertone.
//! 4. [`season::map`] picks the seasonal palette.
//! 5. [`recommend::recommend`] expands the season into colors, outfits,
//!    makeup and hair suggestions.
//!
//! [`modifier::adjust`] lets a client nudge a stored estimate and re-enter at
//! stage 3 through [`adjust_and_reclassify`], and [`render_adjusted`] applies
//! the same nudge to the skin pixels of the photo for a preview. The entry
//! points are exported to JavaScript from [`wasm`].
//!
//! ```no_run
//! use skin_tone_palette_wasm::{AnalyzerConfig, analyze, describe_error};
//!
//! let bytes = std::fs::read("portrait.jpg").unwrap();
//! match analyze(&bytes, None, &AnalyzerConfig::default()) {
//!     Ok(analysis) => println!("{} {}", analysis.season, analysis.estimate.dominant_color.to_hex()),
//!     Err(e) => eprintln!("{}", describe_error(&e)),
//! }
//! ```

pub mod classify;
pub mod color;
pub mod config;
pub mod error;
pub mod modifier;
pub mod pipeline;
pub mod recommend;
pub mod region;
pub mod season;
pub mod tone;
pub mod wasm;

pub use classify::{Classification, ColorTemperature, ToneCategory, Undertone};
pub use color::Rgb;
pub use config::AnalyzerConfig;
pub use error::{AnalysisError, Result};
pub use modifier::{AdjustmentRequest, TonePreset};
pub use pipeline::{
    Analysis, adjust_and_reclassify, analyze, analyze_image, analyze_with_cancel, describe_error, render_adjusted,
};
pub use recommend::{NamedColor, Recommendation};
pub use season::Season;
pub use tone::ToneEstimate;
