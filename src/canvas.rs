use std::f64::consts::PI;

/// Samples per axis used to estimate how much of a pixel a shape covers.
const SUPERSAMPLE: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);

    pub const fn hex(v: u32) -> Rgb {
        Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    fn mix(self, over: Rgb, alpha: f64) -> Rgb {
        let ch = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * alpha).round() as u8;
        Rgb(ch(self.0, over.0), ch(self.1, over.1), ch(self.2, over.2))
    }
}

/// RGB framebuffer drawn in logical pixels. Each raster pixel covers a
/// `scale` × `scale` square of logical space.
pub struct Raster {
    width: usize,
    height: usize,
    scale: f64,
    pixels: Vec<Rgb>,
}

impl Raster {
    pub fn new(logical_w: f64, logical_h: f64, scale: f64) -> Raster {
        let width = (logical_w / scale).ceil().max(1.0) as usize;
        let height = (logical_h / scale).ceil().max(1.0) as usize;
        Raster {
            width,
            height,
            scale,
            pixels: vec![Rgb::BLACK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    /// Raster pixel holding the logical point `(x, y)`.
    pub fn pixel_at(&self, x: f64, y: f64) -> Rgb {
        let px = ((x / self.scale) as usize).min(self.width - 1);
        let py = ((y / self.scale) as usize).min(self.height - 1);
        self.pixel(px, py)
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Paints every pixel in the logical box `[x0, x1) × [y0, y1)` where
    /// `inside` holds, blended by the fraction of samples that hit.
    pub fn fill_where(
        &mut self,
        (x0, y0, x1, y1): (f64, f64, f64, f64),
        color: Rgb,
        inside: impl Fn(f64, f64) -> bool,
    ) {
        let px0 = (x0 / self.scale).floor().max(0.0) as usize;
        let py0 = (y0 / self.scale).floor().max(0.0) as usize;
        let px1 = ((x1 / self.scale).ceil().max(0.0) as usize).min(self.width);
        let py1 = ((y1 / self.scale).ceil().max(0.0) as usize).min(self.height);
        let step = self.scale / SUPERSAMPLE as f64;
        let total = (SUPERSAMPLE * SUPERSAMPLE) as f64;

        for py in py0..py1 {
            for px in px0..px1 {
                let mut hits = 0;
                for sy in 0..SUPERSAMPLE {
                    for sx in 0..SUPERSAMPLE {
                        let x = px as f64 * self.scale + (sx as f64 + 0.5) * step;
                        let y = py as f64 * self.scale + (sy as f64 + 0.5) * step;
                        if inside(x, y) {
                            hits += 1;
                        }
                    }
                }
                if hits > 0 {
                    let idx = py * self.width + px;
                    self.pixels[idx] = self.pixels[idx].mix(color, hits as f64 / total);
                }
            }
        }
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb) {
        self.fill_where((x, y, x + w, y + h), color, |px, py| {
            px >= x && px < x + w && py >= y && py < y + h
        });
    }

    pub fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: Rgb) {
        self.fill_where((cx - r, cy - r, cx + r, cy + r), color, |x, y| {
            in_circle(x - cx, y - cy, r)
        });
    }

    /// Disc with a wedge of half-angle `mouth` removed around `facing`
    /// (radians, y pointing down).
    pub fn fill_pie(&mut self, cx: f64, cy: f64, r: f64, facing: f64, mouth: f64, color: Rgb) {
        self.fill_where((cx - r, cy - r, cx + r, cy + r), color, |x, y| {
            let (dx, dy) = (x - cx, y - cy);
            in_circle(dx, dy, r) && angle_between(dy.atan2(dx), facing) > mouth
        });
    }
}

pub fn in_circle(dx: f64, dy: f64, r: f64) -> bool {
    dx * dx + dy * dy <= r * r
}

/// Smallest absolute angle between two headings.
fn angle_between(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(2.0 * PI);
    d.min(2.0 * PI - d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_splits_channels() {
        assert_eq!(Rgb::hex(0x1932a6), Rgb(0x19, 0x32, 0xa6));
    }

    #[test]
    fn raster_rounds_size_up() {
        let r = Raster::new(608.0, 480.0, 8.0);
        assert_eq!((r.width(), r.height()), (76, 60));
        let r = Raster::new(20.0, 10.0, 8.0);
        assert_eq!((r.width(), r.height()), (3, 2));
    }

    #[test]
    fn rect_covering_whole_pixels_is_opaque() {
        let mut r = Raster::new(32.0, 32.0, 8.0);
        r.fill_rect(8.0, 8.0, 16.0, 8.0, Rgb::WHITE);
        assert_eq!(r.pixel(1, 1), Rgb::WHITE);
        assert_eq!(r.pixel(2, 1), Rgb::WHITE);
        assert_eq!(r.pixel(1, 2), Rgb::BLACK);
        assert_eq!(r.pixel(0, 0), Rgb::BLACK);
    }

    #[test]
    fn partial_coverage_blends() {
        let mut r = Raster::new(16.0, 16.0, 8.0);
        r.fill_rect(0.0, 0.0, 4.0, 8.0, Rgb::WHITE);
        let p = r.pixel(0, 0);
        assert!(p.0 > 100 && p.0 < 160, "{p:?}");
    }

    #[test]
    fn small_circle_still_shows_at_coarse_scale() {
        let mut r = Raster::new(32.0, 32.0, 8.0);
        r.fill_circle(16.0, 16.0, 4.0, Rgb::WHITE);
        for (x, y) in [(1, 1), (2, 1), (1, 2), (2, 2)] {
            assert_ne!(r.pixel(x, y), Rgb::BLACK);
        }
        assert_eq!(r.pixel(0, 0), Rgb::BLACK);
    }

    #[test]
    fn pie_leaves_the_mouth_open() {
        let mut r = Raster::new(64.0, 64.0, 1.0);
        r.fill_pie(32.0, 32.0, 20.0, 0.0, 0.6, Rgb::WHITE);
        assert_eq!(r.pixel_at(45.0, 32.0), Rgb::BLACK);
        assert_eq!(r.pixel_at(19.0, 32.0), Rgb::WHITE);
        assert_eq!(r.pixel_at(32.0, 45.0), Rgb::WHITE);

        let mut r = Raster::new(64.0, 64.0, 1.0);
        r.fill_pie(32.0, 32.0, 20.0, -PI / 2.0, 0.6, Rgb::WHITE);
        assert_eq!(r.pixel_at(32.0, 19.0), Rgb::BLACK);
        assert_eq!(r.pixel_at(45.0, 32.0), Rgb::WHITE);
    }

    #[test]
    fn angle_between_wraps() {
        assert!((angle_between(PI - 0.1, -PI + 0.1) - 0.2).abs() < 1e-9);
        assert!((angle_between(0.3, -0.3) - 0.6).abs() < 1e-9);
    }
}
