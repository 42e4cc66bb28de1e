/// Off-axis perspective frusta for an eye in front of a physical screen
use nalgebra::{Matrix4, Point3, Vector2, Vector3};

/// Distance from the eye to the near clipping plane, in scene units.
pub const NEAR_PLANE: f32 = 1.0;

/// Default scene depth allowed behind the screen plane.
pub const DEFAULT_DEPTH_BUDGET: f32 = 100.0;

/// Extents of an asymmetric perspective frustum, as taken by `glFrustum`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrustumParams {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl FrustumParams {
    /// OpenGL-style projection matrix (right-handed, clip z in [-1, 1]).
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let Self {
            left: l,
            right: r,
            bottom: b,
            top: t,
            near: n,
            far: f,
        } = *self;

        #[rustfmt::skip]
        let projection = Matrix4::new(
            2.0 * n / (r - l), 0.0, (r + l) / (r - l), 0.0,
            0.0, 2.0 * n / (t - b), (t + b) / (t - b), 0.0,
            0.0, 0.0, -(f + n) / (f - n), -2.0 * f * n / (f - n),
            0.0, 0.0, -1.0, 0.0,
        );
        projection
    }

    /// Whether the frustum reduces to the on-axis case.
    pub fn is_symmetric(&self, tolerance: f32) -> bool {
        (self.left + self.right).abs() <= tolerance && (self.bottom + self.top).abs() <= tolerance
    }
}

/// Frustum for an eye looking at a `screen_size` (width, height) screen.
///
/// `screen_normal` points toward the viewer and must not be parallel to
/// `screen_up`. The eye must be strictly in front of the screen; the result
/// is meaningless otherwise. `depth_budget` is how far past the screen the
/// far plane sits.
pub fn build_frustum(
    eye_pos: &Point3<f32>,
    screen_center: &Point3<f32>,
    screen_normal: &Vector3<f32>,
    screen_up: &Vector3<f32>,
    screen_size: Vector2<f32>,
    depth_budget: f32,
) -> FrustumParams {
    let normal = screen_normal.normalize();
    let right = screen_up.cross(&normal).normalize();
    // up re-derived so the frame stays orthonormal
    let up = normal.cross(&right);

    let dist = -(screen_center - eye_pos).dot(&normal);

    let near = NEAR_PLANE;
    let far = dist + depth_budget;

    // similar triangles: screen edges scaled onto the near plane
    let near_scale = near / dist;

    let half_width = right * screen_size.x * 0.5;
    let half_height = up * screen_size.y * 0.5;

    let left = ((screen_center - half_width) - eye_pos).dot(&right) * near_scale;
    let right_edge = ((screen_center + half_width) - eye_pos).dot(&right) * near_scale;
    let bottom = ((screen_center - half_height) - eye_pos).dot(&up) * near_scale;
    let top = ((screen_center + half_height) - eye_pos).dot(&up) * near_scale;

    FrustumParams {
        left,
        right: right_edge,
        bottom,
        top,
        near,
        far,
    }
}

/// World-to-eye matrix whose axes line up with the screen, so that the
/// extents from [`build_frustum`] apply directly. The eye looks along
/// `-screen_normal`.
pub fn eye_view_matrix(
    eye_pos: &Point3<f32>,
    screen_normal: &Vector3<f32>,
    screen_up: &Vector3<f32>,
) -> Matrix4<f32> {
    let normal = screen_normal.normalize();
    let right = screen_up.cross(&normal).normalize();
    let up = normal.cross(&right);

    #[rustfmt::skip]
    let rotation = Matrix4::new(
        right.x, right.y, right.z, 0.0,
        up.x, up.y, up.z, 0.0,
        normal.x, normal.y, normal.z, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );

    rotation * Matrix4::new_translation(&-eye_pos.coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Matrix3, Vector4};

    fn screen() -> (Point3<f32>, Vector3<f32>, Vector3<f32>, Vector2<f32>) {
        (
            Point3::origin(),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector2::new(60.0, 34.0),
        )
    }

    #[test]
    fn test_on_axis_eye_gives_symmetric_frustum() {
        let (center, normal, up, size) = screen();
        let eye = Point3::new(0.0, 0.0, 50.0);
        let frustum = build_frustum(&eye, &center, &normal, &up, size, DEFAULT_DEPTH_BUDGET);

        assert_relative_eq!(frustum.left, -frustum.right);
        assert_relative_eq!(frustum.bottom, -frustum.top);
        assert_relative_eq!(frustum.right, 30.0 / 50.0, epsilon = 1e-6);
        assert_relative_eq!(frustum.top, 17.0 / 50.0, epsilon = 1e-6);
        assert_eq!(frustum.near, NEAR_PLANE);
        assert_relative_eq!(frustum.far, 150.0);
        assert!(frustum.is_symmetric(1e-6));
    }

    #[test]
    fn test_symmetry_holds_for_tilted_screen() {
        let center = Point3::new(3.0, -2.0, 1.0);
        let normal = Vector3::new(1.0, 0.0, 1.0).normalize();
        let up = Vector3::new(0.0, 1.0, 0.0);
        let eye = center + normal * 40.0;
        let frustum = build_frustum(&eye, &center, &normal, &up, Vector2::new(50.0, 30.0), 10.0);

        assert!(frustum.is_symmetric(1e-5));
        assert_relative_eq!(frustum.far, 50.0, epsilon = 1e-4);
    }

    #[test]
    fn test_eye_to_the_right_shifts_frustum_left() {
        let (center, normal, up, size) = screen();
        let eye = Point3::new(10.0, 0.0, 50.0);
        let frustum = build_frustum(&eye, &center, &normal, &up, size, DEFAULT_DEPTH_BUDGET);

        assert!(!frustum.is_symmetric(1e-6));
        assert_relative_eq!(frustum.left, -40.0 / 50.0, epsilon = 1e-6);
        assert_relative_eq!(frustum.right, 20.0 / 50.0, epsilon = 1e-6);
        assert_relative_eq!(frustum.bottom, -frustum.top, epsilon = 1e-6);
    }

    #[test]
    fn test_screen_corners_land_on_clip_edges() {
        let (center, normal, up, size) = screen();
        let eye = Point3::new(-7.0, 4.0, 45.0);
        let frustum = build_frustum(&eye, &center, &normal, &up, size, DEFAULT_DEPTH_BUDGET);
        let mvp = frustum.projection_matrix() * eye_view_matrix(&eye, &normal, &up);

        let corner = Vector4::new(30.0, 17.0, 0.0, 1.0);
        let clip = mvp * corner;
        assert_relative_eq!(clip.x / clip.w, 1.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 1.0, epsilon = 1e-5);

        let corner = Vector4::new(-30.0, -17.0, 0.0, 1.0);
        let clip = mvp * corner;
        assert_relative_eq!(clip.x / clip.w, -1.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_up_leaning_into_normal_is_straightened() {
        let (center, normal, _, size) = screen();
        let leaning_up = Vector3::new(0.0, 1.0, 1.0);
        let eye = Point3::new(5.0, -3.0, 40.0);

        let view = eye_view_matrix(&eye, &normal, &leaning_up);
        let rotation = view.fixed_view::<3, 3>(0, 0).into_owned();
        assert_relative_eq!(rotation * rotation.transpose(), Matrix3::identity(), epsilon = 1e-6);

        let frustum = build_frustum(&eye, &center, &normal, &leaning_up, size, DEFAULT_DEPTH_BUDGET);
        let clip = frustum.projection_matrix() * view * Vector4::new(30.0, 17.0, 0.0, 1.0);
        assert_relative_eq!(clip.x / clip.w, 1.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_view_matrix_is_translation_for_axis_aligned_screen() {
        let (_, normal, up, _) = screen();
        let eye = Point3::new(1.0, 2.0, 3.0);
        let view = eye_view_matrix(&eye, &normal, &up);
        assert_relative_eq!(view, Matrix4::new_translation(&Vector3::new(-1.0, -2.0, -3.0)));
    }
}
