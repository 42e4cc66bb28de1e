/// Closest points between two lines, used to fuse a pair of monocular rays
use nalgebra::{Point3, Vector3};

/// Result of [`closest_points_between_lines`] for non-degenerate input.
///
/// `pa = p1 + mua * (p2 - p1)` lies on the first line and
/// `pb = p3 + mub * (p4 - p3)` on the second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoints {
    pub pa: Point3<f32>,
    pub pb: Point3<f32>,
    pub mua: f64,
    pub mub: f64,
}

impl ClosestPoints {
    /// Binocular fusion estimate: halfway along the shortest segment.
    pub fn midpoint(&self) -> Point3<f32> {
        nalgebra::center(&self.pa, &self.pb)
    }
}

/// The lines have no unique closest pair: one of them collapses to a point,
/// or they are parallel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Degenerate;

impl std::fmt::Display for Degenerate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("lines are degenerate or parallel")
    }
}

impl std::error::Error for Degenerate {}

/// Shortest segment between the infinite lines `p1p2` and `p3p4`.
///
/// Thresholds are single-precision machine epsilon, compared per component for
/// the direction vectors and against the raw denominator for parallelism.
pub fn closest_points_between_lines(
    p1: &Point3<f32>,
    p2: &Point3<f32>,
    p3: &Point3<f32>,
    p4: &Point3<f32>,
) -> Result<ClosestPoints, Degenerate> {
    let eps = f64::from(f32::EPSILON);

    let p13: Vector3<f64> = (p1 - p3).cast();
    let p43: Vector3<f64> = (p4 - p3).cast();
    if is_negligible(&p43, eps) {
        return Err(Degenerate);
    }
    let p21: Vector3<f64> = (p2 - p1).cast();
    if is_negligible(&p21, eps) {
        return Err(Degenerate);
    }

    let d1343 = p13.dot(&p43);
    let d4321 = p43.dot(&p21);
    let d1321 = p13.dot(&p21);
    let d4343 = p43.dot(&p43);
    let d2121 = p21.dot(&p21);

    let denom = d2121 * d4343 - d4321 * d4321;
    if denom.abs() < eps {
        return Err(Degenerate);
    }
    let numer = d1343 * d4321 - d1321 * d4343;

    let mua = numer / denom;
    let mub = (d1343 + d4321 * mua) / d4343;

    let pa = p1.cast::<f64>() + p21 * mua;
    let pb = p3.cast::<f64>() + p43 * mub;

    Ok(ClosestPoints {
        pa: pa.cast(),
        pb: pb.cast(),
        mua,
        mub,
    })
}

fn is_negligible(v: &Vector3<f64>, eps: f64) -> bool {
    v.iter().all(|c| c.abs() < eps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parallel_lines_are_degenerate() {
        let result = closest_points_between_lines(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 1.0),
            &Point3::new(1.0, 1.0, 1.0),
        );
        assert_eq!(result, Err(Degenerate));
    }

    #[test]
    fn test_perpendicular_crossing() {
        let closest = closest_points_between_lines(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.5, -1.0, 0.0),
            &Point3::new(0.5, 1.0, 0.0),
        )
        .unwrap();

        assert_relative_eq!(closest.pa, Point3::new(0.5, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(closest.pb, Point3::new(0.5, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(closest.mua, 0.5, epsilon = 1e-12);
        assert_relative_eq!(closest.mub, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_collapsed_lines_are_degenerate() {
        let p = Point3::new(2.0, 3.0, 4.0);
        let q = Point3::new(0.0, 0.0, 0.0);
        let r = Point3::new(1.0, 1.0, 0.0);
        assert_eq!(closest_points_between_lines(&p, &p, &q, &r), Err(Degenerate));
        assert_eq!(closest_points_between_lines(&q, &r, &p, &p), Err(Degenerate));
    }

    #[test]
    fn test_skew_lines_midpoint() {
        // x axis, and a line parallel to y at height z = 2
        let closest = closest_points_between_lines(
            &Point3::new(-1.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, -1.0, 2.0),
            &Point3::new(0.0, 1.0, 2.0),
        )
        .unwrap();

        assert_relative_eq!(closest.pa, Point3::new(0.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(closest.pb, Point3::new(0.0, 0.0, 2.0), epsilon = 1e-6);
        assert_relative_eq!(closest.midpoint(), Point3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_parameters_extrapolate_past_segments() {
        let closest = closest_points_between_lines(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(3.0, -1.0, 0.0),
            &Point3::new(3.0, 1.0, 0.0),
        )
        .unwrap();

        assert_relative_eq!(closest.mua, 3.0, epsilon = 1e-9);
        assert_relative_eq!(closest.pa, Point3::new(3.0, 0.0, 0.0), epsilon = 1e-6);
    }
}
