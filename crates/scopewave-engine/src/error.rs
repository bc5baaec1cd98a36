//! Error types for the scopewave engine.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while sampling, rendering or synthesizing.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The vector path is empty or malformed.
    #[error("invalid path: {message}")]
    InvalidPath {
        /// Error message.
        message: String,
    },

    /// The bounding box of the point cloud has zero width or height.
    #[error("degenerate geometry: bounding box is {width} x {height}")]
    DegenerateGeometry {
        /// Bounding box width.
        width: f64,
        /// Bounding box height.
        height: f64,
    },

    /// Too few points to interpolate a closed loop.
    #[error("empty geometry: need at least {required} points, got {found}")]
    EmptyGeometry {
        /// Minimum number of points.
        required: usize,
        /// Number of points supplied.
        found: usize,
    },

    /// A tone request is out of range.
    #[error("invalid tone spec: {message}")]
    InvalidToneSpec {
        /// Error message.
        message: String,
    },

    /// Invalid sample rate.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate.
        rate: u32,
    },

    /// Invalid duration.
    #[error("invalid duration: {duration} seconds")]
    InvalidDuration {
        /// The invalid duration.
        duration: f64,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// SVG document or path data could not be parsed.
    #[error("svg error: {message}")]
    Svg {
        /// Error message.
        message: String,
    },

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Creates an invalid path error.
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath {
            message: message.into(),
        }
    }

    /// Creates an invalid tone spec error.
    pub fn invalid_tone(message: impl Into<String>) -> Self {
        Self::InvalidToneSpec {
            message: message.into(),
        }
    }

    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an SVG error.
    pub fn svg(message: impl Into<String>) -> Self {
        Self::Svg {
            message: message.into(),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidPath { .. } => "SCOPE_001",
            EngineError::DegenerateGeometry { .. } => "SCOPE_002",
            EngineError::EmptyGeometry { .. } => "SCOPE_003",
            EngineError::InvalidToneSpec { .. } => "SCOPE_004",
            EngineError::InvalidSampleRate { .. } => "SCOPE_005",
            EngineError::InvalidDuration { .. } => "SCOPE_006",
            EngineError::InvalidParameter { .. } => "SCOPE_007",
            EngineError::Svg { .. } => "SCOPE_008",
            EngineError::Config(_) => "SCOPE_009",
            EngineError::Io(_) => "SCOPE_010",
        }
    }

    /// Broad error category, used by the CLI to group diagnostics.
    pub fn category(&self) -> &'static str {
        match self {
            EngineError::InvalidPath { .. }
            | EngineError::DegenerateGeometry { .. }
            | EngineError::EmptyGeometry { .. }
            | EngineError::Svg { .. } => "geometry",
            EngineError::InvalidToneSpec { .. } => "tone",
            EngineError::InvalidSampleRate { .. }
            | EngineError::InvalidDuration { .. }
            | EngineError::InvalidParameter { .. }
            | EngineError::Config(_) => "config",
            EngineError::Io(_) => "io",
        }
    }
}
