use crate::assets::font::{TextBrushRgba8, TextLayoutEngine};
use crate::foundation::core::Canvas;
use crate::foundation::error::{SkyhourError, SkyhourResult};

/// Fraction of each canvas dimension reserved as padding on every side.
pub const PADDING_RATIO: f64 = 0.1;

/// Minimum gap kept between the label's bottom edge and the frame's bottom edge.
pub const MIN_BOTTOM_MARGIN: f64 = 20.0;

/// Measured label extents in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelSize {
    pub width: f64,
    pub height: f64,
}

/// Label origin (top-left) within the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelPlacement {
    pub x: f64,
    pub y: f64,
}

/// Widest line advance by summed line heights of a built layout.
pub(crate) fn layout_extents(layout: &parley::Layout<TextBrushRgba8>) -> LabelSize {
    let mut width = 0.0f64;
    let mut height = 0.0f64;
    for line in layout.lines() {
        let m = line.metrics();
        width = width.max(f64::from(m.advance));
        height += f64::from(m.ascent + m.descent + m.leading);
    }
    LabelSize { width, height }
}

/// Measure the label's laid-out extents at `size_px`.
pub fn measure_label(
    engine: &mut TextLayoutEngine,
    label: &str,
    size_px: f32,
) -> SkyhourResult<LabelSize> {
    let layout = engine.layout_label(label, size_px, TextBrushRgba8::default())?;
    Ok(layout_extents(&layout))
}

/// Largest integer font size whose measured label fits `max_width` x `max_height`.
///
/// Measured extents grow monotonically with font size, so a bisection over
/// integer sizes finds the same answer as a linear scan. Errors if the label
/// does not fit the box even at size 1.
pub fn max_font_size(
    engine: &mut TextLayoutEngine,
    label: &str,
    max_width: f64,
    max_height: f64,
) -> SkyhourResult<u32> {
    if label.trim().is_empty() {
        return Err(SkyhourError::render("label must be non-empty"));
    }
    if max_width < 1.0 || max_height < 1.0 {
        return Err(SkyhourError::render(format!(
            "label box {max_width:.1}x{max_height:.1} is too small to fit text"
        )));
    }

    let mut fits = |size: u32| -> SkyhourResult<bool> {
        let measured = measure_label(engine, label, size as f32)?;
        Ok(measured.width <= max_width && measured.height <= max_height)
    };

    if !fits(1)? {
        return Err(SkyhourError::render(format!(
            "label '{label}' does not fit a {max_width:.0}x{max_height:.0} box at any size"
        )));
    }
    // A glyph line is never shorter than its font size, so no fitting size can
    // exceed the larger box dimension.
    let upper = max_width.max(max_height).ceil() as u32;
    if fits(upper)? {
        return Ok(upper);
    }

    let mut low = 1u32; // fits
    let mut high = upper; // does not fit
    while high - low > 1 {
        let mid = low + (high - low) / 2;
        if fits(mid)? {
            low = mid;
        } else {
            high = mid;
        }
    }
    Ok(low)
}

/// Box available to the label once the padding zones are reserved.
pub fn usable_box(canvas: Canvas) -> (f64, f64) {
    let width = f64::from(canvas.width);
    let height = f64::from(canvas.height);
    (
        width - 2.0 * width * PADDING_RATIO,
        height - 2.0 * height * PADDING_RATIO,
    )
}

/// Centre the label, then push it out of the padding zones and clear of the
/// bottom margin. The bottom margin wins when the constraints collide.
pub fn place_label(canvas: Canvas, size: LabelSize) -> LabelPlacement {
    let width = f64::from(canvas.width);
    let height = f64::from(canvas.height);

    let mut x = (width - size.width) / 2.0;
    let mut y = (height - size.height) / 2.0;
    x = x.max(width * PADDING_RATIO);
    y = y.max(height * PADDING_RATIO);
    y = y.min(height - size.height - MIN_BOTTOM_MARGIN);
    LabelPlacement { x, y }
}
