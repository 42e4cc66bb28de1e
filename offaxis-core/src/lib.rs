/// Offaxis Core Library - Stereo viewing geometry for physical screens
///
/// Off-axis frusta for tracked or assumed eye positions, ray–screen
/// intersection, binocular fusion of monocular rays, and the remapping of a
/// rigid point set from the viewpoint it was rendered for to the viewpoint it
/// is actually seen from. Everything here is pure and stateless.

pub mod display;
pub mod distortion;
pub mod error;
pub mod geometry;
pub mod lines;
pub mod projection;
pub mod screen;
pub mod transform;
pub mod viewing;

// Re-export commonly used types
pub use display::{DisplayConfig, EyeView};
pub use distortion::{distortion_magnitudes, transform_monoscopic, transform_stereoscopic};
pub use error::{ConfigError, GeometryError};
pub use geometry::{EyePair, Hinge};
pub use lines::{closest_points_between_lines, ClosestPoints, Degenerate};
pub use projection::{build_frustum, eye_view_matrix, FrustumParams};
pub use screen::{intersect_screen, ScreenBasis, ScreenPlane};
pub use transform::Transform;
pub use viewing::{ViewingConditions, ViewingMode, ViewingSummary};
