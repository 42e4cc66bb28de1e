/// Geometry primitives shared by the rig and the stimulus
use nalgebra::{Isometry3, Point3, Vector3};

/// A pair of viewpoints, one per eye.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyePair {
    pub left: Point3<f32>,
    pub right: Point3<f32>,
}

impl EyePair {
    pub fn new(left: Point3<f32>, right: Point3<f32>) -> Self {
        Self { left, right }
    }

    /// Eyes either side of `head`, offset along the head's right axis when it
    /// looks at `target` with `up` as the world up direction.
    pub fn from_head(
        head: &Point3<f32>,
        target: &Point3<f32>,
        up: &Vector3<f32>,
        separation: f32,
    ) -> Self {
        let view = Isometry3::look_at_rh(head, target, up);
        let right = view.inverse_transform_vector(&Vector3::x());
        let offset = right.normalize() * (separation * 0.5);

        Self {
            left: head - offset,
            right: head + offset,
        }
    }

    pub fn separation(&self) -> f32 {
        (self.right - self.left).norm()
    }
}

/// Two arms of equal depth meeting at an apex; the rigid stimulus whose
/// opening angle is judged by the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hinge {
    /// Depth of the arm ends in front of the apex.
    pub arm_depth: f32,
    /// Opening angle in degrees, in (0, 180).
    pub angle: f32,
}

impl Hinge {
    pub fn new(arm_depth: f32, angle: f32) -> Self {
        Self { arm_depth, angle }
    }

    /// `[left arm end, apex, right arm end]`, opening along `toward_viewer`.
    ///
    /// Consecutive points are the hinge's edges, so the order matters.
    pub fn points(
        &self,
        apex: &Point3<f32>,
        right: &Vector3<f32>,
        toward_viewer: &Vector3<f32>,
    ) -> Vec<Point3<f32>> {
        let span = 2.0 * self.arm_depth * (self.angle.to_radians() / 2.0).tan();
        let left_end = apex + toward_viewer * self.arm_depth - right * (span / 2.0);
        let right_end = left_end + right * span;

        vec![left_end, *apex, right_end]
    }
}

/// Angle in degrees at `vertex` between the directions to `a` and `b`.
pub fn angle_at_vertex(a: &Point3<f32>, vertex: &Point3<f32>, b: &Point3<f32>) -> f32 {
    let u = (a - vertex).normalize();
    let v = (b - vertex).normalize();
    u.dot(&v).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Opening angle of a hinge point set (angle at the middle point).
pub fn hinge_angle_of(points: &[Point3<f32>]) -> Option<f32> {
    match points {
        [a, vertex, b] => Some(angle_at_vertex(a, vertex, b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_eyes_from_head_facing_screen() {
        let eyes = EyePair::from_head(
            &Point3::new(0.0, 0.0, 60.0),
            &Point3::origin(),
            &Vector3::y(),
            6.5,
        );

        assert_relative_eq!(eyes.left, Point3::new(-3.25, 0.0, 60.0), epsilon = 1e-5);
        assert_relative_eq!(eyes.right, Point3::new(3.25, 0.0, 60.0), epsilon = 1e-5);
        assert_relative_eq!(eyes.separation(), 6.5, epsilon = 1e-5);
    }

    #[test]
    fn test_eyes_from_head_off_axis() {
        // Looking down -x from +x: the head's right is -z.
        let eyes = EyePair::from_head(
            &Point3::new(10.0, 0.0, 0.0),
            &Point3::origin(),
            &Vector3::y(),
            2.0,
        );
        assert_relative_eq!(eyes.right, Point3::new(10.0, 0.0, -1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_hinge_points_have_requested_angle() {
        let hinge = Hinge::new(2.5, 90.0);
        let points = hinge.points(&Point3::new(0.0, 0.0, -5.0), &Vector3::x(), &Vector3::z());

        assert_eq!(points.len(), 3);
        assert_relative_eq!(points[1], Point3::new(0.0, 0.0, -5.0));
        assert_relative_eq!(points[0], Point3::new(-2.5, 0.0, -2.5), epsilon = 1e-5);
        assert_relative_eq!(points[2], Point3::new(2.5, 0.0, -2.5), epsilon = 1e-5);
        assert_relative_eq!(hinge_angle_of(&points).unwrap(), 90.0, epsilon = 1e-3);
    }

    #[test]
    fn test_hinge_angle_needs_three_points() {
        assert_eq!(hinge_angle_of(&[Point3::origin(), Point3::origin()]), None);
    }

    #[test]
    fn test_straight_angle() {
        let angle = angle_at_vertex(
            &Point3::new(-1.0, 0.0, 0.0),
            &Point3::origin(),
            &Point3::new(1.0, 0.0, 0.0),
        );
        assert_relative_eq!(angle, 180.0, epsilon = 1e-4);
    }
}
