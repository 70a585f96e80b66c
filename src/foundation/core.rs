use crate::foundation::error::{SkyhourError, SkyhourResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hour(u8);

impl Hour {
    pub fn new(value: u8) -> SkyhourResult<Self> {
        if value > 23 {
            return Err(SkyhourError::config(format!(
                "hour must be in 0..=23, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }

    /// Zero-padded two-digit stem, "00" through "23".
    pub fn file_stem(self) -> String {
        format!("{:02}", self.0)
    }

    pub fn all() -> impl Iterator<Item = Hour> {
        (0u8..24).map(Hour)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn splat(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }

    pub fn channel_mean(self) -> f64 {
        (f64::from(self.r) + f64::from(self.g) + f64::from(self.b)) / 3.0
    }

    pub fn to_rgba(self, a: u8) -> [u8; 4] {
        [self.r, self.g, self.b, a]
    }

    /// Per-channel linear blend, rounding once at the end.
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> SkyhourResult<Self> {
        if width == 0 || height == 0 {
            return Err(SkyhourError::config("Canvas dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// One frame of straight (non-premultiplied) RGBA8, row-major, opaque unless
/// a compositing step says otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>, // len == width * height * 4
}

impl FrameRGBA {
    pub fn filled(canvas: Canvas, rgba: [u8; 4]) -> Self {
        let mut data = vec![0u8; canvas.pixel_count() * 4];
        for px in data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
        }
    }

    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * 4;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_validates_range_and_pads_stem() {
        assert!(Hour::new(24).is_err());
        assert_eq!(Hour::new(0).unwrap().file_stem(), "00");
        assert_eq!(Hour::new(23).unwrap().file_stem(), "23");
        assert_eq!(Hour::all().count(), 24);
    }

    #[test]
    fn rgb_lerp_endpoints_and_midpoint() {
        let a = Rgb8::new(10, 10, 40);
        let b = Rgb8::new(255, 220, 130);
        assert_eq!(Rgb8::lerp(a, b, 0.0), a);
        assert_eq!(Rgb8::lerp(a, b, 1.0), b);
        assert_eq!(Rgb8::lerp(a, b, 0.5), Rgb8::new(133, 115, 85));
    }

    #[test]
    fn canvas_rejects_zero_dimensions() {
        assert!(Canvas::new(0, 400).is_err());
        assert!(Canvas::new(400, 0).is_err());
        assert_eq!(Canvas::new(4, 3).unwrap().pixel_count(), 12);
    }

    #[test]
    fn frame_filled_exposes_rows_and_pixels() {
        let canvas = Canvas::new(3, 2).unwrap();
        let frame = FrameRGBA::filled(canvas, [1, 2, 3, 255]);
        assert_eq!(frame.data.len(), 24);
        assert_eq!(frame.row(1).len(), 12);
        assert_eq!(frame.pixel(2, 1), [1, 2, 3, 255]);
    }
}
