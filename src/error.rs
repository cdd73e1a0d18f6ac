//! Error types for skin tone analysis

use thiserror::Error;

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Every way an analysis or adjustment request can fail.
///
/// All variants are terminal for the current request. Re-running the same
/// photo yields the same error, so retries only make sense with a new photo.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Input could not be decoded or is too small to analyze
    #[error("Invalid image: {reason}")]
    InvalidImage {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Neither the face region nor global thresholding marked any pixel
    #[error("No skin detected in {width}x{height} image")]
    NoSkinDetected { width: u32, height: u32 },

    /// Skin mask holds too few pixels for a stable estimate
    #[error("Insufficient skin sample: {found} pixels (minimum {required})")]
    InsufficientSample { found: usize, required: usize },

    /// Adjustment delta outside the configured bounds
    #[error("Adjustment out of range: {field} = {value} (limit ±{limit})")]
    AdjustmentOutOfRange {
        field: &'static str,
        value: f32,
        limit: f32,
    },

    /// A tone estimate handed back by a client violates its invariants
    #[error("Invalid tone estimate: {reason}")]
    InvalidEstimate { reason: String },

    /// Configuration could not be read or is inconsistent
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Caller raised the cancellation flag
    #[error("Analysis cancelled during {stage}")]
    Cancelled { stage: &'static str },

    /// The recolored preview could not be encoded
    #[error("Preview encoding failed: {source}")]
    PreviewEncode {
        #[source]
        source: image::ImageError,
    },
}

impl AnalysisError {
    /// Create an invalid image error with context
    pub fn invalid_image(reason: impl Into<String>) -> Self {
        Self::InvalidImage {
            reason: reason.into(),
            source: None,
        }
    }

    /// Create an invalid image error wrapping a decoder failure
    pub fn decode<E>(reason: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::InvalidImage {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
            source: None,
        }
    }

    /// Create a configuration error wrapping an I/O or parse failure
    pub fn config_source<E>(reason: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::InvalidConfig {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether the user has to supply a different photo to get a result
    pub fn needs_new_photo(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidImage { .. }
                | AnalysisError::NoSkinDetected { .. }
                | AnalysisError::InsufficientSample { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::InvalidImage { .. } => {
                "Please upload a valid photo (JPG, PNG or WebP, at least a few dozen pixels wide).".to_string()
            }
            AnalysisError::NoSkinDetected { .. } => {
                "We could not find any skin in this photo. Please use a clearer photo of your face.".to_string()
            }
            AnalysisError::InsufficientSample { found, required } => format!(
                "Only {} skin pixels were found (need at least {}). Try better lighting or a photo showing a larger skin area.",
                found, required
            ),
            AnalysisError::AdjustmentOutOfRange { field, limit, .. } => {
                format!("The {} adjustment must stay between -{} and +{}.", field, limit, limit)
            }
            AnalysisError::InvalidEstimate { .. } => {
                "The saved skin tone could not be read. Please analyze your photo again.".to_string()
            }
            AnalysisError::Cancelled { .. } => "The analysis was cancelled.".to_string(),
            AnalysisError::PreviewEncode { .. } => {
                "The adjusted preview could not be created. Please try again.".to_string()
            }
            AnalysisError::InvalidConfig { .. } => {
                "The analyzer is misconfigured. Please try again later.".to_string()
            }
        }
    }
}
