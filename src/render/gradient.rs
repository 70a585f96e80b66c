use crate::config::model::FadePolicy;
use crate::foundation::core::{Canvas, FrameRGBA, Rgb8};

/// Fraction of the frame height given to the monochrome fade.
pub fn fade_ratio(colour: Rgb8, policy: FadePolicy) -> f64 {
    match policy {
        FadePolicy::Fixed => 0.3,
        FadePolicy::BrightnessScaled => {
            0.1 + (0.5 - 0.1) * (1.0 - colour.channel_mean() / 255.0)
        }
    }
}

/// Paint the hour's backdrop: solid `colour` on top, then a per-row linear
/// fade to the colour's monochrome average over the bottom of the frame.
///
/// The fade is endpoint-inclusive, so its first row is still the base colour
/// and its last row is exactly the monochrome average. All pixels are opaque.
pub fn make_gradient(colour: Rgb8, canvas: Canvas, policy: FadePolicy) -> FrameRGBA {
    let width = canvas.width as usize;
    let height = canvas.height as usize;
    let fade_rows = ((height as f64) * fade_ratio(colour, policy)).floor() as usize;
    let top_rows = height - fade_rows;
    let mono = Rgb8::splat(colour.channel_mean() as u8);

    let mut data = Vec::with_capacity(width * height * 4);
    let top = colour.to_rgba(255);
    for _ in 0..top_rows * width {
        data.extend_from_slice(&top);
    }
    for row in 0..fade_rows {
        let t = if fade_rows <= 1 {
            0.0
        } else {
            row as f64 / (fade_rows - 1) as f64
        };
        let px = Rgb8::lerp(colour, mono, t).to_rgba(255);
        for _ in 0..width {
            data.extend_from_slice(&px);
        }
    }

    FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data,
    }
}
