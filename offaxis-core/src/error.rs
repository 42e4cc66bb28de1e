/// Error types for the non-hot-path parts of the library
use std::io;

use thiserror::Error;

/// Geometry that cannot produce a meaningful answer.
///
/// The per-point primitives never return this; they either propagate
/// non-finite values or use a documented fallback. These variants come from
/// the checked helpers callers use to validate rig geometry up front.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("ray is parallel to the screen plane")]
    ParallelRay,

    #[error("eye is not in front of the screen (signed distance {distance})")]
    EyeBehindScreen { distance: f32 },

    #[error("{name} = {value} is out of range")]
    OutOfRange { name: &'static str, value: f32 },
}

/// Failure to load or validate a [`DisplayConfig`](crate::DisplayConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read display config")]
    Io(#[from] io::Error),

    #[error("failed to parse display config")]
    Json(#[from] serde_json::Error),

    #[error("invalid display config: {0}")]
    Invalid(String),
}
