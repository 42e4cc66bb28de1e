/// Physical display configuration and per-eye views
use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use nalgebra::{Matrix4, Point3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GeometryError};
use crate::geometry::EyePair;
use crate::projection::{build_frustum, eye_view_matrix, FrustumParams, DEFAULT_DEPTH_BUDGET};
use crate::screen::{ScreenBasis, ScreenPlane};
use crate::transform::Transform;

pub const CM_PER_INCH: f32 = 2.54;

/// Largest |cos| accepted between `screen_up` and `screen_normal`.
const PERPENDICULAR_TOLERANCE: f32 = 1e-4;

/// The physical screen and how content is presented on it.
///
/// Lengths are in centimeters. The normal points toward the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Physical diagonal of the visible area.
    pub diagonal_cm: f32,
    /// Pixel resolution; only the aspect ratio is used.
    pub resolution: [u32; 2],
    pub screen_center: Point3<f32>,
    pub screen_normal: Vector3<f32>,
    pub screen_up: Vector3<f32>,
    /// Render a view per eye instead of a single view.
    pub stereo: bool,
    /// Scene depth allowed behind the screen before the far plane.
    pub depth_budget: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            diagonal_cm: 27.0 * CM_PER_INCH,
            resolution: [1920, 1080],
            screen_center: Point3::origin(),
            screen_normal: Vector3::z(),
            screen_up: Vector3::y(),
            stereo: true,
            depth_budget: DEFAULT_DEPTH_BUDGET,
        }
    }
}

/// View and projection for one eye.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeView {
    pub position: Point3<f32>,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
}

impl DisplayConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if let Err(err) = config.validate() {
            warn!("rejecting display config: {err}");
            return Err(err);
        }
        debug!("parsed display config: {config:?}");
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_json_str(&fs::read_to_string(path)?)?;
        info!(
            "loaded display config from {}: {:.1} x {:.1} cm",
            path.display(),
            config.screen_size().x,
            config.screen_size().y
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.diagonal_cm > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "diagonal must be positive, got {}",
                self.diagonal_cm
            )));
        }
        if self.resolution.contains(&0) {
            return Err(ConfigError::Invalid(format!(
                "resolution must be non-zero, got {:?}",
                self.resolution
            )));
        }
        if self.screen_up.cross(&self.screen_normal).norm() < f32::EPSILON {
            return Err(ConfigError::Invalid(
                "screen up and normal must be non-zero and not parallel".into(),
            ));
        }
        let cos = self.screen_up.normalize().dot(&self.screen_normal.normalize());
        if cos.abs() > PERPENDICULAR_TOLERANCE {
            return Err(ConfigError::Invalid(format!(
                "screen up must be perpendicular to the normal, got cos = {cos}"
            )));
        }
        if !(self.depth_budget >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "depth budget must not be negative, got {}",
                self.depth_budget
            )));
        }
        Ok(())
    }

    /// Physical width and height of the screen.
    pub fn screen_size(&self) -> Vector2<f32> {
        let pixels = Vector2::new(self.resolution[0] as f32, self.resolution[1] as f32);
        pixels * (self.diagonal_cm / pixels.norm())
    }

    pub fn screen_transform(&self) -> Matrix4<f32> {
        Transform::screen_transform(
            &self.screen_center,
            &self.screen_normal,
            &self.screen_up,
            self.screen_size(),
        )
    }

    pub fn screen_basis(&self) -> ScreenBasis {
        ScreenBasis::from_transform(&self.screen_transform())
    }

    pub fn screen_plane(&self) -> ScreenPlane {
        ScreenPlane::new(self.screen_center, self.screen_normal)
    }

    /// Frustum for `eye`, which must be in front of the screen.
    pub fn frustum_for(&self, eye: &Point3<f32>) -> FrustumParams {
        build_frustum(
            eye,
            &self.screen_center,
            &self.screen_normal,
            &self.screen_up,
            self.screen_size(),
            self.depth_budget,
        )
    }

    /// Like [`frustum_for`](Self::frustum_for), rejecting eyes on or behind
    /// the screen plane.
    pub fn checked_frustum_for(&self, eye: &Point3<f32>) -> Result<FrustumParams, GeometryError> {
        let distance = self.screen_plane().signed_distance(eye);
        if distance <= 0.0 {
            return Err(GeometryError::EyeBehindScreen { distance });
        }
        Ok(self.frustum_for(eye))
    }

    pub fn eye_view(&self, eye: &Point3<f32>) -> EyeView {
        EyeView {
            position: *eye,
            view: eye_view_matrix(eye, &self.screen_normal, &self.screen_up),
            projection: self.frustum_for(eye).projection_matrix(),
        }
    }

    /// One view at `head` in mono mode; in stereo mode, one per eye with the
    /// eyes `eye_separation` apart across the head's right axis while it
    /// looks at `target`.
    pub fn eye_views(
        &self,
        head: &Point3<f32>,
        target: &Point3<f32>,
        eye_separation: f32,
    ) -> Vec<EyeView> {
        if self.stereo {
            let eyes = EyePair::from_head(head, target, &self.screen_up, eye_separation);
            vec![self.eye_view(&eyes.left), self.eye_view(&eyes.right)]
        } else {
            vec![self.eye_view(head)]
        }
    }
}
