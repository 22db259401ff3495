//! Error types shared across SuitMe crates.

/// Top-level error type for measurement operations.
///
/// Every variant except `InvalidInput` is recoverable on the next frame;
/// none of them invalidate a running session.
#[derive(Debug, thiserror::Error)]
pub enum MeasureError {
    #[error("Measurement session is not calibrated")]
    NotCalibrated,

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Required landmarks missing or below confidence floor: {}", .missing.join(", "))]
    IncompleteLandmarks { missing: Vec<String> },

    #[error("Degenerate geometry: {message}")]
    DegenerateGeometry { message: String },

    #[error("Landmark detection failed: {message}")]
    Detection { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using MeasureError.
pub type MeasureResult<T> = Result<T, MeasureError>;

impl MeasureError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    pub fn incomplete_landmarks<I, S>(missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::IncompleteLandmarks {
            missing: missing.into_iter().map(Into::into).collect(),
        }
    }

    pub fn degenerate_geometry(msg: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            message: msg.into(),
        }
    }

    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether the caller can simply retry with the next frame.
    pub fn is_per_frame(&self) -> bool {
        matches!(
            self,
            Self::IncompleteLandmarks { .. } | Self::DegenerateGeometry { .. } | Self::Detection { .. }
        )
    }
}
