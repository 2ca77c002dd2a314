//! Pixel surfaces and the two atlas rasterizers.
//!
//! Paths are flattened to 8-bit coverage masks by `zeno` (re-exported by
//! `swash`) and composited onto an RGBA surface. Every atlas pixel is white;
//! only alpha carries the glyph.

mod fill;
mod outline;

pub use fill::GlyphRasterizer;
pub use outline::{OutlineRasterizer, stroke_opacity};

use image::{Rgba, RgbaImage};
use swash::zeno::{Command, Placement, Vector};

use crate::grid::{AtlasGeometry, Point};

/// A fillable/strokable outline in atlas pixel space (y down).
#[derive(Debug, Clone, Default)]
pub struct GlyphPath {
    commands: Vec<Command>,
}

impl GlyphPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn move_to(&mut self, p: Point) {
        self.commands.push(Command::MoveTo(vector(p)));
    }

    pub fn line_to(&mut self, p: Point) {
        self.commands.push(Command::LineTo(vector(p)));
    }

    pub fn quad_to(&mut self, control: Point, to: Point) {
        self.commands.push(Command::QuadTo(vector(control), vector(to)));
    }

    pub fn curve_to(&mut self, c1: Point, c2: Point, to: Point) {
        self.commands.push(Command::CurveTo(vector(c1), vector(c2), vector(to)));
    }

    pub fn close(&mut self) {
        self.commands.push(Command::Close);
    }

    /// Append font-space commands (y up) placed with their origin at `origin`.
    pub fn extend_flipped(&mut self, commands: impl IntoIterator<Item = Command>, origin: Point) {
        let place = |v: Vector| Vector::new(origin.x + v.x, origin.y - v.y);
        self.commands.extend(commands.into_iter().map(|cmd| match cmd {
            Command::MoveTo(p) => Command::MoveTo(place(p)),
            Command::LineTo(p) => Command::LineTo(place(p)),
            Command::QuadTo(c, p) => Command::QuadTo(place(c), place(p)),
            Command::CurveTo(c1, c2, p) => Command::CurveTo(place(c1), place(c2), place(p)),
            Command::Close => Command::Close,
        }));
    }

    /// Closed axis-aligned rectangle from `(left, top)` to `(right, bottom)`.
    pub fn rect(&mut self, left: f32, top: f32, right: f32, bottom: f32) {
        self.move_to(Point::new(left, top));
        self.line_to(Point::new(right, top));
        self.line_to(Point::new(right, bottom));
        self.line_to(Point::new(left, bottom));
        self.close();
    }
}

fn vector(p: Point) -> Vector {
    Vector::new(p.x, p.y)
}

/// An atlas-sized RGBA pixel surface, transparent until drawn on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    pub fn new(geometry: &AtlasGeometry) -> Self {
        Self::with_size(geometry.texture_width(), geometry.texture_height())
    }

    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0])),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Alpha at `(x, y)`, zero outside the surface.
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.image.get_pixel_checked(x, y).map_or(0, |p| p.0[3])
    }

    /// Whether every pixel in `[left, right) × [top, bottom)` is transparent.
    pub fn is_clear(&self, (left, top, right, bottom): (u32, u32, u32, u32)) -> bool {
        (top..bottom.min(self.height()))
            .all(|y| (left..right.min(self.width())).all(|x| self.alpha(x, y) == 0))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Source-over composite of a white coverage mask scaled by `opacity`.
    ///
    /// Mask pixels landing outside the surface are dropped.
    pub fn composite(&mut self, mask: &[u8], placement: Placement, opacity: u8) {
        let (width, height) = (placement.width as usize, placement.height as usize);
        if width == 0 || height == 0 {
            return;
        }
        for (row, line) in mask.chunks_exact(width).take(height).enumerate() {
            let y = i64::from(placement.top) + row as i64;
            let Ok(y) = u32::try_from(y) else {
                continue;
            };
            if y >= self.height() {
                break;
            }
            for (col, &coverage) in line.iter().enumerate() {
                if coverage == 0 {
                    continue;
                }
                let x = i64::from(placement.left) + col as i64;
                let Ok(x) = u32::try_from(x) else {
                    continue;
                };
                if x >= self.width() {
                    break;
                }
                let src = mul_div255(u32::from(coverage), u32::from(opacity));
                let pixel = self.image.get_pixel_mut(x, y);
                let dst = u32::from(pixel.0[3]);
                let out = src + mul_div255(dst, 255 - src);
                pixel.0 = [255, 255, 255, out.min(255) as u8];
            }
        }
    }
}

/// `a * b / 255`, rounded, for `a, b <= 255`.
fn mul_div255(a: u32, b: u32) -> u32 {
    let t = a * b + 128;
    (t + (t >> 8)) >> 8
}
