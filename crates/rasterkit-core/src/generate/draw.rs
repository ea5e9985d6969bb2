//! Rasterization of vector primitives onto a buffer.
//!
//! # Geometry
//!
//! - Bounds are inclusive pixel boxes `[x0, y0, x1, y1]`; a box with
//!   `x1 < x0` or `y1 < y0` draws nothing
//! - Outlines of width `w` are drawn inward from the box edge
//! - Polygons are filled with the even-odd rule, sampled on pixel rows
//! - Lines are one pixel wide Bresenham strokes, widened into quads when
//!   `stroke_width > 1`
//!
//! Anything outside the canvas is clipped silently.

use log::debug;
use serde::{Deserialize, Serialize};

use super::text::draw_text;
use crate::buffer::{Color, PixelBuffer};

/// Integer pixel coordinate; may lie off canvas.
pub type Point = (i64, i64);

/// A primitive to rasterize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    /// Ellipse inscribed in an inclusive box.
    Ellipse { bounds: [i64; 4] },
    /// Axis-aligned inclusive box.
    Rectangle { bounds: [i64; 4] },
    /// Closed polygon; the last point connects back to the first.
    Polygon { points: Vec<Point> },
    /// Open polyline.
    Line { points: Vec<Point> },
    /// 8x8 bitmap text with its top-left corner at `origin`.
    Text { origin: Point, text: String },
}

/// Colors and stroke width for a primitive.
///
/// Lines and text are drawn in `fill`, falling back to `outline` when no fill
/// is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawStyle {
    pub fill: Option<Color>,
    pub outline: Option<Color>,
    pub stroke_width: u32,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            fill: None,
            outline: None,
            stroke_width: 1,
        }
    }
}

impl DrawStyle {
    pub fn filled(color: Color) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    pub fn outlined(color: Color, width: u32) -> Self {
        Self::default().with_outline(color, width)
    }

    pub fn with_outline(mut self, color: Color, width: u32) -> Self {
        self.outline = Some(color);
        self.stroke_width = width;
        self
    }
}

/// Rasterize `shape` onto a copy of `image`.
pub fn draw(image: &PixelBuffer, shape: &Shape, style: &DrawStyle) -> PixelBuffer {
    let mut canvas = image.clone();
    draw_in_place(&mut canvas, shape, style);
    canvas
}

/// Rasterize several primitives in order onto a copy of `image`.
pub fn draw_all(image: &PixelBuffer, items: &[(Shape, DrawStyle)]) -> PixelBuffer {
    let mut canvas = image.clone();
    for (shape, style) in items {
        draw_in_place(&mut canvas, shape, style);
    }
    canvas
}

fn draw_in_place(canvas: &mut PixelBuffer, shape: &Shape, style: &DrawStyle) {
    let mode = canvas.mode();
    let fill = style.fill.map(|c| c.samples(mode));
    let outline = style.outline.map(|c| c.samples(mode));
    let width = style.stroke_width as i64;

    match shape {
        Shape::Rectangle { bounds } => rectangle(canvas, *bounds, fill, outline, width),
        Shape::Ellipse { bounds } => ellipse(canvas, *bounds, fill, outline, width),
        Shape::Polygon { points } => {
            if let Some(color) = fill {
                let vertices: Vec<(f64, f64)> =
                    points.iter().map(|&(x, y)| (x as f64, y as f64)).collect();
                fill_polygon(canvas, &vertices, &color);
            }
            if let Some(color) = outline {
                polyline(canvas, points, true, width, &color);
            }
        }
        Shape::Line { points } => {
            if let Some(color) = fill.or(outline) {
                polyline(canvas, points, false, width.max(1), &color);
            }
        }
        Shape::Text { origin, text } => match fill.or(outline) {
            Some(color) => draw_text(canvas, *origin, text, &color),
            None => debug!("text {:?} has no color, nothing drawn", text),
        },
    }
}

/// Intersection of an inclusive box with the canvas.
fn clip_box(canvas: &PixelBuffer, [x0, y0, x1, y1]: [i64; 4]) -> Option<[i64; 4]> {
    let clipped = [
        x0.max(0),
        y0.max(0),
        x1.min(canvas.width() as i64 - 1),
        y1.min(canvas.height() as i64 - 1),
    ];
    (clipped[0] <= clipped[2] && clipped[1] <= clipped[3]).then_some(clipped)
}

fn rectangle(
    canvas: &mut PixelBuffer,
    bounds: [i64; 4],
    fill: Option<[u8; 3]>,
    outline: Option<[u8; 3]>,
    width: i64,
) {
    let [x0, y0, x1, y1] = bounds;
    let Some([cx0, cy0, cx1, cy1]) = clip_box(canvas, bounds) else {
        return;
    };

    for y in cy0..=cy1 {
        for x in cx0..=cx1 {
            let on_edge = x < x0.saturating_add(width)
                || x > x1.saturating_sub(width)
                || y < y0.saturating_add(width)
                || y > y1.saturating_sub(width);
            let color = if on_edge { outline.or(fill) } else { fill };
            if let Some(c) = color {
                canvas.put(x as u32, y as u32, &c);
            }
        }
    }
}

fn ellipse(
    canvas: &mut PixelBuffer,
    bounds: [i64; 4],
    fill: Option<[u8; 3]>,
    outline: Option<[u8; 3]>,
    width: i64,
) {
    let [x0, y0, x1, y1] = bounds;
    let Some([cx0, cy0, cx1, cy1]) = clip_box(canvas, bounds) else {
        return;
    };

    // The ellipse spans the full pixel extent of the box
    let rx = (x1 as f64 - x0 as f64 + 1.0) / 2.0;
    let ry = (y1 as f64 - y0 as f64 + 1.0) / 2.0;
    let (center_x, center_y) = (x0 as f64 + rx, y0 as f64 + ry);
    let (inner_rx, inner_ry) = (rx - width as f64, ry - width as f64);
    let solid_ring = inner_rx <= 0.0 || inner_ry <= 0.0;

    for y in cy0..=cy1 {
        for x in cx0..=cx1 {
            let dx = x as f64 + 0.5 - center_x;
            let dy = y as f64 + 0.5 - center_y;
            if !inside_ellipse(dx, dy, rx, ry) {
                continue;
            }
            let on_edge = width > 0 && (solid_ring || !inside_ellipse(dx, dy, inner_rx, inner_ry));
            let color = if on_edge { outline.or(fill) } else { fill };
            if let Some(c) = color {
                canvas.put(x as u32, y as u32, &c);
            }
        }
    }
}

#[inline]
fn inside_ellipse(dx: f64, dy: f64, rx: f64, ry: f64) -> bool {
    (dx / rx).powi(2) + (dy / ry).powi(2) <= 1.0
}

/// Even-odd scanline fill. Crossings are half-open in y so shared vertices
/// are counted once.
fn fill_polygon(canvas: &mut PixelBuffer, vertices: &[(f64, f64)], color: &[u8]) {
    if vertices.len() < 3 {
        return;
    }

    let (min_y, max_y) = vertices
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
            (lo.min(y), hi.max(y))
        });
    let last_col = canvas.width() as i64 - 1;
    let first_row = (min_y.ceil() as i64).max(0);
    let last_row = (max_y.floor() as i64).min(canvas.height() as i64 - 1);

    let mut crossings = Vec::new();
    for y in first_row..=last_row {
        let scan = y as f64;
        crossings.clear();
        for (i, &(xa, ya)) in vertices.iter().enumerate() {
            let (xb, yb) = vertices[(i + 1) % vertices.len()];
            if (ya <= scan) != (yb <= scan) {
                crossings.push(xa + (scan - ya) * (xb - xa) / (yb - ya));
            }
        }
        crossings.sort_by(f64::total_cmp);

        for span in crossings.chunks_exact(2) {
            let start = (span[0].ceil() as i64).max(0);
            let end = (span[1].floor() as i64).min(last_col);
            for x in start..=end {
                canvas.put(x as u32, y as u32, color);
            }
        }
    }
}

fn polyline(canvas: &mut PixelBuffer, points: &[Point], closed: bool, width: i64, color: &[u8]) {
    if width <= 0 {
        return;
    }
    match points {
        [] => {}
        [p] => segment(canvas, *p, *p, width, color),
        [first, .., last] => {
            for pair in points.windows(2) {
                segment(canvas, pair[0], pair[1], width, color);
            }
            if closed {
                segment(canvas, *last, *first, width, color);
            }
        }
    }
}

fn segment(canvas: &mut PixelBuffer, a: Point, b: Point, width: i64, color: &[u8]) {
    if width > 1 {
        thick_segment(canvas, a, b, width, color);
    }
    // The centerline keeps thick strokes connected at their end rows
    bresenham(canvas, a, b, color);
}

/// Fill the quad swept by a segment of the given width.
fn thick_segment(canvas: &mut PixelBuffer, a: Point, b: Point, width: i64, color: &[u8]) {
    let (ax, ay) = (a.0 as f64, a.1 as f64);
    let (bx, by) = (b.0 as f64, b.1 as f64);
    let (dx, dy) = (bx - ax, by - ay);
    let length = (dx * dx + dy * dy).sqrt();
    let half = width as f64 / 2.0;

    if length == 0.0 {
        let square = [
            (ax - half, ay - half),
            (ax + half, ay - half),
            (ax + half, ay + half),
            (ax - half, ay + half),
        ];
        fill_polygon(canvas, &square, color);
        return;
    }

    let (nx, ny) = (-dy / length * half, dx / length * half);
    let quad = [
        (ax + nx, ay + ny),
        (bx + nx, by + ny),
        (bx - nx, by - ny),
        (ax - nx, ay - ny),
    ];
    fill_polygon(canvas, &quad, color);
}

/// Rasterize the segment from `a` to `b`.
///
/// The major axis advances one pixel per step; at step `i` the minor axis has
/// moved `i * minor / major` pixels, rounded half up. Only steps whose major
/// coordinate lies on the canvas are visited, so far off-canvas endpoints
/// cost nothing.
fn bresenham(canvas: &mut PixelBuffer, (x0, y0): Point, (x1, y1): Point, color: &[u8]) {
    let (width, height) = (canvas.width() as i128, canvas.height() as i128);
    let (x0, y0, x1, y1) = (x0 as i128, y0 as i128, x1 as i128, y1 as i128);
    let (dx, dy) = (x1 - x0, y1 - y0);
    let x_major = dx.abs() >= dy.abs();
    let (major_start, major_delta, minor_start, minor_delta) = if x_major {
        (x0, dx, y0, dy)
    } else {
        (y0, dy, x0, dx)
    };
    let (major_extent, minor_extent) = if x_major {
        (width, height)
    } else {
        (height, width)
    };

    let major_len = major_delta.unsigned_abs();
    let minor_len = minor_delta.unsigned_abs();
    let minor_sign = minor_delta.signum();

    // Step range whose major coordinate falls inside [0, major_extent)
    let (lo, hi) = if major_delta >= 0 {
        (-major_start, major_extent - 1 - major_start)
    } else {
        (major_start - (major_extent - 1), major_start)
    };
    let first = lo.max(0);
    let last = hi.min(major_len as i128);

    let major_sign = if major_delta >= 0 { 1 } else { -1 };
    for i in first..=last {
        let step = if major_len == 0 {
            0
        } else {
            let moved = i as u128 * minor_len;
            let (q, r) = (moved / major_len, moved % major_len);
            q + u128::from(2 * r >= major_len)
        };
        let major = major_start + major_sign * i;
        let minor = minor_start + minor_sign * step as i128;
        if minor < 0 || minor >= minor_extent {
            continue;
        }
        let (x, y) = if x_major { (major, minor) } else { (minor, major) };
        canvas.put(x as u32, y as u32, color);
    }
}
