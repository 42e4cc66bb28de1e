/// ASCII plotter for a top-down view of the screen, viewers and stimulus
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Point3, Vector2};
use offaxis_core::ScreenBasis;
use std::io::Write;

/// Character cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;

/// Fraction of the canvas left empty around the fitted scene.
const MARGIN: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: Color,
}

const BLANK: Cell = Cell {
    character: ' ',
    color: Color::Reset,
};

/// Plots world points seen from above the screen: columns run along the
/// screen's right axis, rows along its normal with the viewer at the bottom.
pub struct DiagramRenderer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    basis: ScreenBasis,
    /// Cells per scene unit, horizontally.
    scale: f32,
    /// Scene-plane coordinate (right, normal) shown at the canvas center.
    center: Vector2<f32>,
}

impl DiagramRenderer {
    pub fn new(width: usize, height: usize, basis: ScreenBasis) -> Self {
        Self {
            width,
            height,
            cells: vec![BLANK; width * height],
            basis,
            scale: 1.0,
            center: Vector2::zeros(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![BLANK; width * height];
    }

    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    /// Screen-plane coordinates of a world point, dropping the up axis.
    fn plan(&self, point: &Point3<f32>) -> Vector2<f32> {
        let local = self.basis.world_to_local(point);
        Vector2::new(local.x, local.z)
    }

    /// Choose scale and center so every point fits inside the canvas.
    pub fn fit(&mut self, points: &[Point3<f32>]) {
        let mut min = Vector2::repeat(f32::INFINITY);
        let mut max = Vector2::repeat(f32::NEG_INFINITY);
        for p in points.iter().map(|p| self.plan(p)).filter(|p| p.iter().all(|c| c.is_finite())) {
            min = min.inf(&p);
            max = max.sup(&p);
        }
        if !(min.x <= max.x && min.y <= max.y) {
            return;
        }

        let usable_w = self.width as f32 * (1.0 - 2.0 * MARGIN);
        let usable_h = self.height as f32 * (1.0 - 2.0 * MARGIN) * CELL_ASPECT;
        let extent = (max - min).map(|e| e.max(f32::EPSILON));

        self.scale = (usable_w / extent.x).min(usable_h / extent.y);
        self.center = (min + max) * 0.5;
    }

    /// Canvas cell for a world point, if it lands on the canvas.
    pub fn cell_of(&self, point: &Point3<f32>) -> Option<(usize, usize)> {
        let p = self.plan(point);
        let col = self.width as f32 / 2.0 + (p.x - self.center.x) * self.scale;
        let row = self.height as f32 / 2.0 + (p.y - self.center.y) * self.scale / CELL_ASPECT;
        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        (col < self.width && row < self.height).then_some((col, row))
    }

    fn put(&mut self, col: usize, row: usize, character: char, color: Color) {
        if col < self.width && row < self.height {
            self.cells[row * self.width + col] = Cell { character, color };
        }
    }

    pub fn plot(&mut self, point: &Point3<f32>, character: char, color: Color) {
        if let Some((col, row)) = self.cell_of(point) {
            self.put(col, row, character, color);
        }
    }

    /// Segment between two world points, sampled once per cell.
    pub fn line(&mut self, a: &Point3<f32>, b: &Point3<f32>, character: char, color: Color) {
        let span = (self.plan(b) - self.plan(a)) * self.scale;
        let steps = span.x.abs().max(span.y.abs() / CELL_ASPECT).ceil();
        if !steps.is_finite() {
            return;
        }
        let steps = steps.max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.plot(&a.coords.lerp(&b.coords, t).into(), character, color);
        }
    }

    /// Consecutive points joined by edges, vertices marked with their index.
    pub fn polyline(&mut self, points: &[Point3<f32>], character: char, color: Color) {
        for pair in points.windows(2) {
            self.line(&pair[0], &pair[1], character, color);
        }
        for (i, p) in points.iter().enumerate() {
            let label = char::from_digit(i as u32 % 10, 10).unwrap_or('?');
            self.plot(p, label, color);
        }
    }

    /// Arc around `center` in the plan view, from `start` to `end` degrees
    /// measured from the screen normal toward its right axis.
    pub fn arc(
        &mut self,
        center: &Point3<f32>,
        radius: f32,
        start: f32,
        end: f32,
        character: char,
        color: Color,
    ) {
        let circumference = radius * self.scale * (end - start).abs().to_radians();
        let steps = circumference.ceil().clamp(1.0, 4096.0) as usize;
        for i in 0..=steps {
            let angle = (start + (end - start) * i as f32 / steps as f32).to_radians();
            let offset = self.basis.right * (radius * angle.sin()) + self.basis.normal * (radius * angle.cos());
            self.plot(&(center + offset), character, color);
        }
    }

    /// Text written left to right starting at a canvas cell.
    pub fn text(&mut self, col: usize, row: usize, text: &str, color: Color) {
        for (i, c) in text.chars().enumerate() {
            self.put(col + i, row, c, color);
        }
    }

    /// Canvas contents as plain text, one string per row.
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|c| c.character).collect())
            .collect()
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (y, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for cell in row {
                writer.queue(SetForegroundColor(cell.color))?;
                writer.queue(Print(cell.character))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offaxis_core::DisplayConfig;
    use pretty_assertions::assert_eq;

    fn renderer() -> DiagramRenderer {
        let mut r = DiagramRenderer::new(40, 20, DisplayConfig::default().screen_basis());
        r.fit(&[Point3::new(-10.0, 0.0, -10.0), Point3::new(10.0, 0.0, 10.0)]);
        r
    }

    #[test]
    fn test_viewer_side_is_at_the_bottom() {
        let r = renderer();
        let (_, viewer_row) = r.cell_of(&Point3::new(0.0, 0.0, 9.0)).unwrap();
        let (_, object_row) = r.cell_of(&Point3::new(0.0, 0.0, -9.0)).unwrap();
        assert!(viewer_row > object_row);

        let (left_col, _) = r.cell_of(&Point3::new(-9.0, 0.0, 0.0)).unwrap();
        let (right_col, _) = r.cell_of(&Point3::new(9.0, 0.0, 0.0)).unwrap();
        assert!(left_col < right_col);
    }

    #[test]
    fn test_up_axis_is_flattened() {
        let r = renderer();
        assert_eq!(
            r.cell_of(&Point3::new(3.0, -50.0, 2.0)),
            r.cell_of(&Point3::new(3.0, 50.0, 2.0))
        );
    }

    #[test]
    fn test_points_outside_canvas_are_dropped() {
        let mut r = renderer();
        assert_eq!(r.cell_of(&Point3::new(1000.0, 0.0, 0.0)), None);
        r.plot(&Point3::new(f32::NAN, 0.0, 0.0), 'x', Color::White);
        assert!(r.rows().iter().all(|row| row.trim().is_empty()));
    }

    #[test]
    fn test_polyline_marks_vertices_and_edges() {
        let mut r = renderer();
        r.polyline(
            &[Point3::new(-5.0, 0.0, 0.0), Point3::new(5.0, 0.0, 0.0)],
            '-',
            Color::White,
        );
        let text = r.rows().concat();
        assert!(text.contains('0'));
        assert!(text.contains('1'));
        assert!(text.contains('-'));
    }

    #[test]
    fn test_text_is_clipped_at_edge() {
        let mut r = renderer();
        r.text(35, 0, "overflowing", Color::White);
        assert_eq!(r.rows()[0].trim_start(), "overf");
    }
}
