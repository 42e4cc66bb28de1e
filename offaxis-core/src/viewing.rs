/// Viewing conditions: where content was authored for, where the viewer
/// actually is, and what the hinge stimulus looks like from there.
///
/// Angles are in degrees, measured about the screen's up axis from the
/// screen normal; positive angles swing toward the screen's right.
use nalgebra::Point3;

use crate::distortion::{distortion_magnitudes, transform_monoscopic, transform_stereoscopic};
use crate::error::GeometryError;
use crate::geometry::{hinge_angle_of, EyePair, Hinge};
use crate::screen::ScreenBasis;
use crate::transform::Transform;

/// Whether the viewer sees one channel or a stereo pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewingMode {
    Monoscopic,
    Stereoscopic,
}

impl ViewingMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Monoscopic => Self::Stereoscopic,
            Self::Stereoscopic => Self::Monoscopic,
        }
    }
}

/// True and perceived hinge angles for one configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewingSummary {
    pub mode: ViewingMode,
    pub true_angle: f32,
    pub perceived_angle: f32,
    /// Largest displacement of any hinge point.
    pub max_displacement: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewingConditions {
    basis: ScreenBasis,
    projection_angle: f32,
    projection_distance: f32,
    viewing_angle: f32,
    viewing_distance: f32,
    eye_separation: f32,
    object_distance: f32,
    hinge: Hinge,
}

impl ViewingConditions {
    pub fn new(basis: ScreenBasis) -> Self {
        let default_distance = basis.half_extents().y * (2.0 / 3.0);

        Self {
            basis,
            projection_angle: 0.0,
            projection_distance: default_distance,
            viewing_angle: 0.0,
            viewing_distance: default_distance,
            eye_separation: 2.0,
            object_distance: 5.0,
            hinge: Hinge::new(2.5, 90.0),
        }
    }

    pub fn basis(&self) -> &ScreenBasis {
        &self.basis
    }

    pub fn projection_angle(&self) -> f32 {
        self.projection_angle
    }

    pub fn set_projection_angle(&mut self, angle: f32) -> Result<(), GeometryError> {
        self.projection_angle = check_open_range("projection_angle", angle, -90.0, 90.0)?;
        Ok(())
    }

    pub fn projection_distance(&self) -> f32 {
        self.projection_distance
    }

    pub fn set_projection_distance(&mut self, distance: f32) -> Result<(), GeometryError> {
        self.projection_distance = check_positive("projection_distance", distance)?;
        Ok(())
    }

    pub fn viewing_angle(&self) -> f32 {
        self.viewing_angle
    }

    pub fn set_viewing_angle(&mut self, angle: f32) -> Result<(), GeometryError> {
        self.viewing_angle = check_open_range("viewing_angle", angle, -90.0, 90.0)?;
        Ok(())
    }

    pub fn viewing_distance(&self) -> f32 {
        self.viewing_distance
    }

    pub fn set_viewing_distance(&mut self, distance: f32) -> Result<(), GeometryError> {
        self.viewing_distance = check_positive("viewing_distance", distance)?;
        Ok(())
    }

    pub fn eye_separation(&self) -> f32 {
        self.eye_separation
    }

    pub fn set_eye_separation(&mut self, separation: f32) -> Result<(), GeometryError> {
        if !(separation >= 0.0) {
            return Err(GeometryError::OutOfRange {
                name: "eye_separation",
                value: separation,
            });
        }
        self.eye_separation = separation;
        Ok(())
    }

    pub fn object_distance(&self) -> f32 {
        self.object_distance
    }

    /// Depth of the hinge apex behind the screen.
    pub fn set_object_distance(&mut self, distance: f32) -> Result<(), GeometryError> {
        self.object_distance = check_positive("object_distance", distance)?;
        Ok(())
    }

    pub fn hinge(&self) -> Hinge {
        self.hinge
    }

    pub fn set_hinge_angle(&mut self, angle: f32) -> Result<(), GeometryError> {
        self.hinge.angle = check_open_range("hinge_angle", angle, 0.0, 180.0)?;
        Ok(())
    }

    pub fn set_hinge_depth(&mut self, depth: f32) -> Result<(), GeometryError> {
        self.hinge.arm_depth = check_positive("hinge_depth", depth)?;
        Ok(())
    }

    fn orbit(&self, angle: f32, distance: f32) -> Point3<f32> {
        Transform::orbit_position(
            &self.basis.origin,
            &self.basis.normal,
            &self.basis.up,
            angle,
            distance,
        )
    }

    /// Eyes on the arc of radius `distance`, placed so the chord between
    /// them equals the eye separation.
    fn orbit_pair(&self, angle: f32, distance: f32) -> EyePair {
        let half = (self.eye_separation / (2.0 * distance)).min(1.0).asin().to_degrees();
        EyePair::new(
            self.orbit(angle - half, distance),
            self.orbit(angle + half, distance),
        )
    }

    /// Single center of projection the content was authored for.
    pub fn cop(&self) -> Point3<f32> {
        self.orbit(self.projection_angle, self.projection_distance)
    }

    pub fn cop_pair(&self) -> EyePair {
        self.orbit_pair(self.projection_angle, self.projection_distance)
    }

    /// The actual (cyclopean) viewing position.
    pub fn viewpoint(&self) -> Point3<f32> {
        self.orbit(self.viewing_angle, self.viewing_distance)
    }

    pub fn eye_pair(&self) -> EyePair {
        self.orbit_pair(self.viewing_angle, self.viewing_distance)
    }

    pub fn object_origin(&self) -> Point3<f32> {
        self.basis.origin - self.basis.normal * self.object_distance
    }

    pub fn hinge_points(&self) -> Vec<Point3<f32>> {
        self.hinge
            .points(&self.object_origin(), &self.basis.right, &self.basis.normal)
    }

    pub fn perceived_monoscopic(&self) -> Vec<Point3<f32>> {
        transform_monoscopic(
            &self.cop(),
            &self.viewpoint(),
            &self.basis.plane(),
            &self.hinge_points(),
        )
    }

    pub fn perceived_stereoscopic(&self) -> Vec<Point3<f32>> {
        let cops = self.cop_pair();
        let eyes = self.eye_pair();
        transform_stereoscopic(
            &cops.left,
            &cops.right,
            &eyes.left,
            &eyes.right,
            &self.basis.plane(),
            &self.hinge_points(),
        )
    }

    pub fn perceived(&self, mode: ViewingMode) -> Vec<Point3<f32>> {
        match mode {
            ViewingMode::Monoscopic => self.perceived_monoscopic(),
            ViewingMode::Stereoscopic => self.perceived_stereoscopic(),
        }
    }

    pub fn summary(&self, mode: ViewingMode) -> ViewingSummary {
        let original = self.hinge_points();
        let perceived = self.perceived(mode);
        let max_displacement = distortion_magnitudes(&original, &perceived)
            .into_iter()
            .fold(0.0, f32::max);

        ViewingSummary {
            mode,
            true_angle: hinge_angle_of(&original).unwrap_or(f32::NAN),
            perceived_angle: hinge_angle_of(&perceived).unwrap_or(f32::NAN),
            max_displacement,
        }
    }
}

fn check_open_range(name: &'static str, value: f32, min: f32, max: f32) -> Result<f32, GeometryError> {
    if value > min && value < max {
        Ok(value)
    } else {
        Err(GeometryError::OutOfRange { name, value })
    }
}

fn check_positive(name: &'static str, value: f32) -> Result<f32, GeometryError> {
    check_open_range(name, value, 0.0, f32::INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayConfig;
    use approx::assert_relative_eq;

    fn conditions() -> ViewingConditions {
        ViewingConditions::new(DisplayConfig::default().screen_basis())
    }

    #[test]
    fn test_defaults_place_viewer_at_cop() {
        let c = conditions();
        assert_relative_eq!(c.cop(), c.viewpoint());
        assert!(c.basis().plane().signed_distance(&c.cop()) > 0.0);
        assert!(c.basis().plane().signed_distance(&c.object_origin()) < 0.0);
    }

    #[test]
    fn test_eye_pair_chord_equals_separation() {
        let mut c = conditions();
        c.set_viewing_angle(30.0).unwrap();
        let eyes = c.eye_pair();
        assert_relative_eq!(eyes.separation(), 2.0, epsilon = 1e-4);

        let plane = c.basis().plane();
        assert_relative_eq!(
            (eyes.left - c.basis().origin).norm(),
            c.viewing_distance(),
            epsilon = 1e-4
        );
        assert!(plane.signed_distance(&eyes.right) > 0.0);
        // left eye sits further toward -right
        let right = c.basis().right;
        assert!((eyes.left - eyes.right).dot(&right) < 0.0);
    }

    #[test]
    fn test_matched_conditions_preserve_hinge() {
        let c = conditions();
        for mode in [ViewingMode::Monoscopic, ViewingMode::Stereoscopic] {
            let summary = c.summary(mode);
            assert_relative_eq!(summary.true_angle, 90.0, epsilon = 1e-3);
            assert_relative_eq!(summary.perceived_angle, 90.0, epsilon = 0.05);
            assert!(summary.max_displacement < 1e-2, "{summary:?}");
        }
    }

    #[test]
    fn test_closer_viewer_sees_flatter_hinge() {
        let mut c = conditions();
        c.set_viewing_distance(c.projection_distance() / 2.0).unwrap();
        for mode in [ViewingMode::Monoscopic, ViewingMode::Stereoscopic] {
            let summary = c.summary(mode);
            assert!(summary.perceived_angle > 100.0, "{summary:?}");
        }
    }

    #[test]
    fn test_setters_reject_out_of_range() {
        let mut c = conditions();
        assert_eq!(
            c.set_viewing_angle(90.0),
            Err(GeometryError::OutOfRange {
                name: "viewing_angle",
                value: 90.0
            })
        );
        assert!(c.set_projection_angle(-95.0).is_err());
        assert!(c.set_viewing_distance(0.0).is_err());
        assert!(c.set_projection_distance(-1.0).is_err());
        assert!(c.set_eye_separation(-0.5).is_err());
        assert!(c.set_hinge_angle(180.0).is_err());
        assert!(c.set_hinge_depth(0.0).is_err());
        assert!(c.set_object_distance(f32::NAN).is_err());
        assert_eq!(c.viewing_angle(), 0.0);

        assert!(c.set_eye_separation(0.0).is_ok());
        assert_relative_eq!(c.eye_pair().separation(), 0.0);
    }

    #[test]
    fn test_mode_toggles() {
        assert_eq!(ViewingMode::Monoscopic.toggled(), ViewingMode::Stereoscopic);
        assert_eq!(ViewingMode::Stereoscopic.toggled(), ViewingMode::Monoscopic);
    }
}
