/// Screen plane, screen basis and ray–screen intersection
use nalgebra::{Matrix4, Point3, Vector2, Vector3};

use crate::error::GeometryError;

/// An infinite plane through `center`. The normal points from the screen
/// toward the viewer and is stored normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPlane {
    center: Point3<f32>,
    normal: Vector3<f32>,
}

impl ScreenPlane {
    /// `normal` must be non-zero; it is normalized here.
    pub fn new(center: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self {
            center,
            normal: normal.normalize(),
        }
    }

    pub fn center(&self) -> Point3<f32> {
        self.center
    }

    pub fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    /// Signed distance of `point`, positive on the viewer side.
    pub fn signed_distance(&self, point: &Point3<f32>) -> f32 {
        (point - self.center).dot(&self.normal)
    }

    /// Parameter `t` at which `origin + t * (through - origin)` meets the plane.
    ///
    /// Not clamped. A ray parallel to the plane yields whatever the division
    /// gives (infinite or NaN).
    pub fn ray_parameter(&self, origin: &Point3<f32>, through: &Point3<f32>) -> f32 {
        (self.center - origin).dot(&self.normal) / (through - origin).dot(&self.normal)
    }

    /// Like [`ray_parameter`](Self::ray_parameter), but reports a ray parallel
    /// to the plane instead of dividing by (nearly) zero.
    pub fn try_ray_parameter(
        &self,
        origin: &Point3<f32>,
        through: &Point3<f32>,
    ) -> Result<f32, GeometryError> {
        let denom = (through - origin).dot(&self.normal);
        if denom.abs() < f32::EPSILON {
            return Err(GeometryError::ParallelRay);
        }
        Ok((self.center - origin).dot(&self.normal) / denom)
    }

    /// Where the ray from `origin` through `through` crosses the plane.
    pub fn intersect(&self, origin: &Point3<f32>, through: &Point3<f32>) -> Point3<f32> {
        let t = self.ray_parameter(origin, through);
        origin + (through - origin) * t
    }
}

/// Cast a ray from `center` through each point and return where each ray
/// crosses the screen plane. Output index `i` corresponds to input index `i`.
pub fn intersect_screen(
    center: &Point3<f32>,
    plane: &ScreenPlane,
    points: &[Point3<f32>],
) -> Vec<Point3<f32>> {
    points.iter().map(|p| plane.intersect(center, p)).collect()
}

/// Orthonormal frame of a physical screen.
///
/// Built from a screen transform whose axis columns may carry scale (half
/// extents of the physical screen); the columns are normalized independently
/// and the raw lengths are kept as `half_extents`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenBasis {
    pub right: Vector3<f32>,
    pub up: Vector3<f32>,
    pub normal: Vector3<f32>,
    pub origin: Point3<f32>,
    half_extents: Vector2<f32>,
}

impl ScreenBasis {
    pub fn from_transform(transform: &Matrix4<f32>) -> Self {
        let right = transform.fixed_view::<3, 1>(0, 0).into_owned();
        let up = transform.fixed_view::<3, 1>(0, 1).into_owned();
        let normal = transform.fixed_view::<3, 1>(0, 2).into_owned();
        let origin = transform.fixed_view::<3, 1>(0, 3).into_owned();

        Self {
            right: right.normalize(),
            up: up.normalize(),
            normal: normal.normalize(),
            origin: Point3::from(origin),
            half_extents: Vector2::new(right.norm(), up.norm()),
        }
    }

    /// Half width and half height taken from the raw column lengths.
    pub fn half_extents(&self) -> Vector2<f32> {
        self.half_extents
    }

    pub fn plane(&self) -> ScreenPlane {
        ScreenPlane::new(self.origin, self.normal)
    }

    /// x along `right`, y along `up`, z along `normal` (toward the viewer).
    pub fn local_to_world(&self, x: f32, y: f32, z: f32) -> Point3<f32> {
        self.origin + self.right * x + self.up * y + self.normal * z
    }

    /// Coordinates of `point` in this frame; inverse of `local_to_world`.
    pub fn world_to_local(&self, point: &Point3<f32>) -> Vector3<f32> {
        let d = point - self.origin;
        Vector3::new(d.dot(&self.right), d.dot(&self.up), d.dot(&self.normal))
    }
}
