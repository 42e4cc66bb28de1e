/// Screen-relative transformation helpers
use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector2, Vector3, Vector4};

/// Transform builder for screen-relative placement
pub struct Transform;

impl Transform {
    /// Rotation of `degrees` about `axis` (right-handed).
    pub fn rotation_about(axis: &Vector3<f32>, degrees: f32) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Unit::new_normalize(*axis), degrees.to_radians())
    }

    /// Point `distance` in front of `origin`, swung by `angle` degrees about
    /// `up` away from `normal`. Positive angles move toward `up × normal`.
    pub fn orbit_position(
        origin: &Point3<f32>,
        normal: &Vector3<f32>,
        up: &Vector3<f32>,
        angle: f32,
        distance: f32,
    ) -> Point3<f32> {
        origin + Self::rotation_about(up, angle) * normal.normalize() * distance
    }

    /// Screen transform with the physical half extents folded into the axis
    /// columns: right × half width, up × half height, normal, center.
    pub fn screen_transform(
        center: &Point3<f32>,
        normal: &Vector3<f32>,
        up: &Vector3<f32>,
        size: Vector2<f32>,
    ) -> Matrix4<f32> {
        let normal = normal.normalize();
        let right = up.cross(&normal).normalize();
        let up = normal.cross(&right);

        Matrix4::from_columns(&[
            (right * size.x * 0.5).to_homogeneous(),
            (up * size.y * 0.5).to_homogeneous(),
            normal.to_homogeneous(),
            Vector4::new(center.x, center.y, center.z, 1.0),
        ])
    }
}
