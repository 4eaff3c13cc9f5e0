//! Output surfaces
//!
//! A [`Surface`] is whatever the display list draws into. Two are provided:
//! - [`RecordingSurface`] keeps the draw calls, for hosts that forward them to
//!   their own toolkit and for tests
//! - [`Framebuffer`] rasterizes into an RGB pixel buffer that can be exported
//!   through the `image` crate

use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

use super::error::RenderError;
use crate::foundation::color::Color;
use crate::foundation::math::Point2;
use crate::scene::Font;

/// Drawing target for display-list primitives
pub trait Surface {
    /// Fill the whole surface
    fn clear(&mut self, color: Color);

    /// Fill a closed polygon
    fn fill_polygon(&mut self, points: &[Point2], color: Color);

    /// Outline a closed polygon
    fn draw_polygon(&mut self, points: &[Point2], color: Color);

    /// Draw a line segment
    fn draw_line(&mut self, from: Point2, to: Point2, color: Color);

    /// Draw text with its baseline starting at `at`
    fn draw_text(&mut self, text: &str, at: Point2, font: &Font, color: Color);
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    /// Surface cleared
    Clear(Color),
    /// Polygon filled
    FillPolygon {
        /// Vertices
        points: Vec<Point2>,
        /// Fill color
        color: Color,
    },
    /// Polygon outlined
    DrawPolygon {
        /// Vertices
        points: Vec<Point2>,
        /// Edge color
        color: Color,
    },
    /// Line drawn
    DrawLine {
        /// Start
        from: Point2,
        /// End
        to: Point2,
        /// Line color
        color: Color,
    },
    /// Text drawn
    DrawText {
        /// Text
        text: String,
        /// Baseline start
        at: Point2,
        /// Font size after perspective scaling
        size: u32,
        /// Text color
        color: Color,
    },
}

/// Surface that records every call
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    /// Calls in the order they were made
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Empty recording
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill colors of every filled polygon, in draw order
    pub fn fill_colors(&self) -> Vec<Color> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillPolygon { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    /// Number of filled polygons
    pub fn polygon_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::FillPolygon { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_polygon(&mut self, points: &[Point2], color: Color) {
        self.commands.push(DrawCommand::FillPolygon { points: points.to_vec(), color });
    }

    fn draw_polygon(&mut self, points: &[Point2], color: Color) {
        self.commands.push(DrawCommand::DrawPolygon { points: points.to_vec(), color });
    }

    fn draw_line(&mut self, from: Point2, to: Point2, color: Color) {
        self.commands.push(DrawCommand::DrawLine { from, to, color });
    }

    fn draw_text(&mut self, text: &str, at: Point2, font: &Font, color: Color) {
        self.commands.push(DrawCommand::DrawText {
            text: text.to_string(),
            at,
            size: font.size,
            color,
        });
    }
}

/// Software RGB raster
///
/// Polygons are filled with an even-odd scanline rule sampled at pixel
/// centers; outlines and lines use Bresenham. There is no glyph rasterizer,
/// so text is drawn as one outlined cell per visible character.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Framebuffer {
    /// Create a framebuffer filled with `background`
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![background; width as usize * height as usize],
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color at a pixel, `None` outside the buffer
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|index| self.pixels[index])
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        Some(y as usize * self.width as usize + x as usize)
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(index) = self.index(x, y) {
            self.pixels[index] = color;
        }
    }

    /// Clip a segment to the buffer (Liang-Barsky); `None` if nothing is left
    fn clip_line(&self, from: Point2, to: Point2) -> Option<(Point2, Point2)> {
        let (x0, y0) = (f64::from(from.x), f64::from(from.y));
        let (dx, dy) = (f64::from(to.x) - x0, f64::from(to.y) - y0);
        let xmax = f64::from(self.width) - 1.0;
        let ymax = f64::from(self.height) - 1.0;

        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for (p, q) in [(-dx, x0), (dx, xmax - x0), (-dy, y0), (dy, ymax - y0)] {
            if p.abs() < f64::EPSILON {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
            if t0 > t1 {
                return None;
            }
        }
        let at = |t: f64| Point2::new((x0 + t * dx).round() as i32, (y0 + t * dy).round() as i32);
        Some((at(t0), at(t1)))
    }

    /// Copy into an `image` buffer
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            Rgb(self.pixels[y as usize * self.width as usize + x as usize].to_array())
        })
    }

    /// Write the frame as a PNG file
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        self.to_image()
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| RenderError::Export(e.to_string()))
    }
}

impl Surface for Framebuffer {
    fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    fn fill_polygon(&mut self, points: &[Point2], color: Color) {
        if points.len() < 3 {
            return;
        }
        let min_y = points.iter().map(|p| p.y).min().unwrap_or(0).max(0);
        let max_y = points
            .iter()
            .map(|p| p.y)
            .max()
            .unwrap_or(-1)
            .min(self.height as i32 - 1);

        let mut crossings = Vec::with_capacity(points.len());
        for y in min_y..=max_y {
            let sample = f64::from(y) + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                let (ay, by) = (f64::from(a.y), f64::from(b.y));
                if (ay <= sample) != (by <= sample) {
                    let t = (sample - ay) / (by - ay);
                    crossings.push(f64::from(a.x) + t * (f64::from(b.x) - f64::from(a.x)));
                }
            }
            crossings.sort_unstable_by(f64::total_cmp);
            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil() as i32;
                let end = (span[1] - 0.5).ceil() as i32;
                for x in start.max(0)..end.min(self.width as i32) {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    fn draw_polygon(&mut self, points: &[Point2], color: Color) {
        for (i, &from) in points.iter().enumerate() {
            self.draw_line(from, points[(i + 1) % points.len()], color);
        }
    }

    fn draw_line(&mut self, from: Point2, to: Point2, color: Color) {
        let Some((from, to)) = self.clip_line(from, to) else {
            return;
        };
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let (mut x, mut y) = (from.x, from.y);
        let mut err = dx + dy;
        loop {
            self.set_pixel(x, y, color);
            if x == to.x && y == to.y {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn draw_text(&mut self, text: &str, at: Point2, font: &Font, color: Color) {
        let size = i64::from(font.size.clamp(1, self.height.max(1)));
        let advance = (size * 3 / 5).max(1);
        let height = (size * 7 / 10).max(1);
        let to_i32 = |v: i64| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;

        let (right_edge, baseline) = (i64::from(self.width), i64::from(at.y));
        let mut left = i64::from(at.x);
        for ch in text.chars() {
            if left >= right_edge {
                break;
            }
            if !ch.is_whitespace() {
                let right = left + advance - 1;
                let cell = [
                    Point2::new(to_i32(left), to_i32(baseline - height)),
                    Point2::new(to_i32(right), to_i32(baseline - height)),
                    Point2::new(to_i32(right), to_i32(baseline)),
                    Point2::new(to_i32(left), to_i32(baseline)),
                ];
                self.draw_polygon(&cell, color);
            }
            left += advance;
        }
    }
}
