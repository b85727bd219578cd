//! Error types for the render path

/// Failures reported by a draw backend
///
/// None of these are recoverable: a host receiving one is expected to shut
/// the renderer down.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The backend reported an error code after the labelled operation
    #[error("{label}: backend error {code}")]
    Backend { label: String, code: u32 },

    /// Setup of a draw program or its resources failed
    #[error("setup failed: {0}")]
    Setup(String),

    /// A draw was requested before the surface was created
    #[error("surface not created")]
    SurfaceNotCreated,
}

impl RenderError {
    /// Build a backend error for a labelled check
    pub fn backend(label: impl Into<String>, code: u32) -> Self {
        Self::Backend {
            label: label.into(),
            code,
        }
    }
}

/// Result type for render operations
pub type Result<T> = std::result::Result<T, RenderError>;
