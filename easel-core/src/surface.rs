//! Scratch render surface
//!
//! The hit-tester answers pixel-accurate queries against an off-screen
//! rendering where every shape is painted with a color encoding its serial
//! identity. The surface is a shared, mutable scratch resource: a
//! transparency check renders a single shape, reads pixels back, and clears
//! again before anyone else may rely on the surface's contents.

use crate::object::CanvasItem;
use crate::scene::Scene;
use crate::shape::Shape;
use kurbo::Point;

/// Encode a shape serial into an RGBA identifying color
pub fn encode_serial(serial: u32) -> [u8; 4] {
    [
        ((serial >> 16) & 0xff) as u8,
        ((serial >> 8) & 0xff) as u8,
        (serial & 0xff) as u8,
        0xff,
    ]
}

/// Decode an RGBA pixel back to a shape serial
///
/// Transparent pixels carry no shape.
pub fn decode_serial(r: u8, g: u8, b: u8, a: u8) -> Option<u32> {
    if a == 0 {
        return None;
    }
    Some(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
}

/// A rectangular RGBA pixel readback
#[derive(Clone, Debug)]
pub struct PixelWindow {
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Row-major RGBA bytes, `width * height * 4` long
    pub data: Vec<u8>,
}

impl PixelWindow {
    /// Whether any sampled pixel has a non-zero alpha channel
    pub fn any_opaque(&self) -> bool {
        self.data.iter().skip(3).step_by(4).any(|a| *a > 0)
    }
}

/// Off-screen pixel surface the core renders into and reads back from
///
/// Readbacks outside the surface bounds yield transparent pixels, so
/// windows near an edge keep their full size.
pub trait CacheSurface {
    /// Surface width in pixels
    fn width(&self) -> u32;

    /// Surface height in pixels
    fn height(&self) -> u32;

    /// Paint every visible shape, bottom to top, in its serial color
    fn render_scene(&mut self, scene: &Scene);

    /// Paint one shape alone, without any selection decorations
    fn render_alone(&mut self, shape: &Shape);

    /// Read a `w` x `h` window of RGBA pixels starting at (`x`, `y`)
    fn read_window(&self, x: i64, y: i64, w: u32, h: u32) -> PixelWindow;

    /// Reset every pixel to transparent
    fn clear(&mut self);
}

/// In-memory RGBA implementation of [`CacheSurface`]
#[derive(Clone, Debug)]
pub struct PixmapCache {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixmapCache {
    /// Create a transparent surface of the given pixel dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height * 4) as usize],
        }
    }

    /// Paint one shape's footprint in the given color
    fn paint(&mut self, shape: &Shape, color: [u8; 4]) {
        let bounds = shape.bounding_rect();
        let x0 = bounds.x0.floor().max(0.0) as u32;
        let y0 = bounds.y0.floor().max(0.0) as u32;
        let x1 = (bounds.x1.ceil().max(0.0) as u32).min(self.width);
        let y1 = (bounds.y1.ceil().max(0.0) as u32).min(self.height);
        for py in y0..y1 {
            for px in x0..x1 {
                let center = Point::new(px as f64 + 0.5, py as f64 + 0.5);
                if shape.contains_point(center) {
                    let i = ((py * self.width + px) * 4) as usize;
                    self.data[i..i + 4].copy_from_slice(&color);
                }
            }
        }
    }
}

impl CacheSurface for PixmapCache {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn render_scene(&mut self, scene: &Scene) {
        self.clear();
        for shape in scene.shapes() {
            if !shape.visible {
                continue;
            }
            self.paint(shape, encode_serial(shape.serial));
        }
    }

    fn render_alone(&mut self, shape: &Shape) {
        self.clear();
        self.paint(shape, encode_serial(shape.serial));
    }

    fn read_window(&self, x: i64, y: i64, w: u32, h: u32) -> PixelWindow {
        let mut data = vec![0u8; (w * h * 4) as usize];
        for row in 0..h as i64 {
            for col in 0..w as i64 {
                let sx = x + col;
                let sy = y + row;
                if sx < 0 || sy < 0 || sx >= self.width as i64 || sy >= self.height as i64 {
                    continue;
                }
                let src = ((sy as u32 * self.width + sx as u32) * 4) as usize;
                let dst = ((row as u32 * w + col as u32) * 4) as usize;
                data[dst..dst + 4].copy_from_slice(&self.data[src..src + 4]);
            }
        }
        PixelWindow {
            width: w,
            height: h,
            data,
        }
    }

    fn clear(&mut self) {
        self.data.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;

    #[test]
    fn test_serial_encoding_round_trip() {
        for serial in [1u32, 7, 255, 256, 65_537] {
            let [r, g, b, a] = encode_serial(serial);
            assert_eq!(decode_serial(r, g, b, a), Some(serial));
        }
        assert_eq!(decode_serial(0, 0, 1, 0), None);
    }

    #[test]
    fn test_render_and_read_back() {
        let mut scene = Scene::new();
        let id = scene.add_shape(Shape::new(10.0, 10.0).with_position(5.0, 5.0));
        let serial = scene.shape(id).unwrap().serial;

        let mut cache = PixmapCache::new(32, 32);
        cache.render_scene(&scene);

        let window = cache.read_window(10, 10, 1, 1);
        assert_eq!(&window.data, &encode_serial(serial));

        let window = cache.read_window(0, 0, 1, 1);
        assert!(!window.any_opaque());
    }

    #[test]
    fn test_read_window_clamps_at_edges() {
        let mut scene = Scene::new();
        scene.add_shape(Shape::new(10.0, 10.0));
        let mut cache = PixmapCache::new(16, 16);
        cache.render_scene(&scene);

        let window = cache.read_window(-3, -3, 7, 7);
        assert_eq!(window.data.len(), 7 * 7 * 4);
        // Pixels off the surface stay transparent; the in-bounds corner is painted
        assert_eq!(window.data[3], 0);
        assert!(window.any_opaque());
    }

    #[test]
    fn test_topmost_wins_on_overlap() {
        let mut scene = Scene::new();
        scene.add_shape(Shape::new(10.0, 10.0));
        let top = scene.add_shape(Shape::new(10.0, 10.0));
        let top_serial = scene.shape(top).unwrap().serial;

        let mut cache = PixmapCache::new(16, 16);
        cache.render_scene(&scene);
        let window = cache.read_window(5, 5, 1, 1);
        assert_eq!(&window.data, &encode_serial(top_serial));
    }
}
