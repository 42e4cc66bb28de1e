/// Perceived positions of a rigid point set viewed from the wrong place
///
/// Content rendered for one viewpoint (the center of projection) and viewed
/// from another is reconstructed through the screen plane: each point keeps
/// its screen crossing, and its depth relative to the screen is rescaled
/// along the viewer's own ray.
use log::debug;
use nalgebra::Point3;

use crate::lines::closest_points_between_lines;
use crate::screen::ScreenPlane;

/// Single-eye reconstruction.
///
/// For each point, the ratio of (screen to point) over (center of projection
/// to screen) along the authoring ray is preserved along the ray from
/// `eye_pos` through the same screen crossing. The ratio is negative for
/// points between the center of projection and the screen, so the mapping is
/// the identity when `eye_pos == center_of_projection`.
pub fn transform_monoscopic(
    center_of_projection: &Point3<f32>,
    eye_pos: &Point3<f32>,
    plane: &ScreenPlane,
    points: &[Point3<f32>],
) -> Vec<Point3<f32>> {
    points
        .iter()
        .map(|p| {
            let screen_pt = plane.intersect(center_of_projection, p);
            let authored = screen_pt - center_of_projection;
            let depth_ratio = (p - screen_pt).dot(&authored) / authored.norm_squared();

            let eye_to_screen = screen_pt - eye_pos;
            screen_pt + eye_to_screen * depth_ratio
        })
        .collect()
}

/// Two-eye reconstruction by binocular fusion.
///
/// Each channel has its own screen crossing, authored from `cop_left` or
/// `cop_right`. The perceived point is the midpoint of the shortest segment
/// between the rays from each real eye through its channel's crossing. When
/// those rays are parallel the midpoint of the two crossings is used instead.
pub fn transform_stereoscopic(
    cop_left: &Point3<f32>,
    cop_right: &Point3<f32>,
    eye_left: &Point3<f32>,
    eye_right: &Point3<f32>,
    plane: &ScreenPlane,
    points: &[Point3<f32>],
) -> Vec<Point3<f32>> {
    let mut fallbacks = 0usize;

    let fused: Vec<Point3<f32>> = points
        .iter()
        .map(|p| {
            let screen_left = plane.intersect(cop_left, p);
            let screen_right = plane.intersect(cop_right, p);

            match closest_points_between_lines(eye_left, &screen_left, eye_right, &screen_right) {
                Ok(closest) => closest.midpoint(),
                Err(_) => {
                    fallbacks += 1;
                    nalgebra::center(&screen_left, &screen_right)
                }
            }
        })
        .collect();

    if fallbacks > 0 {
        debug!(
            "stereo fusion fell back to screen midpoint for {fallbacks} of {} points",
            points.len()
        );
    }

    fused
}

/// Per-point displacement between an original and a transformed point set.
pub fn distortion_magnitudes(original: &[Point3<f32>], transformed: &[Point3<f32>]) -> Vec<f32> {
    original
        .iter()
        .zip(transformed)
        .map(|(a, b)| (b - a).norm())
        .collect()
}
