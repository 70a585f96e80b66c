use crate::assets::font::{TextBrushRgba8, TextLayoutEngine};
use crate::config::model::TextOpacity;
use crate::foundation::core::{Canvas, FrameRGBA, Rgb8};
use crate::foundation::error::{SkyhourError, SkyhourResult};
use crate::layout::fit::{self, LabelPlacement};
use crate::render::composite;

/// Label colour derived from the backdrop for contrast: dark skies get a
/// bright label and vice versa.
pub fn label_colour(base: Rgb8) -> Rgb8 {
    fn contrast(c: u8) -> u8 {
        (255.0 - f64::from(c) * 1.2).clamp(0.0, 255.0) as u8
    }

    Rgb8::new(contrast(base.r), contrast(base.g), contrast(base.b))
}

/// Fit, place, and composite the label onto the frame.
///
/// The label is laid out at the largest size that fits the padded box, centred
/// (with the padding and bottom-margin clamps applied), rasterized onto a
/// transparent layer the size of the frame, and composited source-over.
pub fn apply_label(
    frame: &mut FrameRGBA,
    engine: &mut TextLayoutEngine,
    label: &str,
    base_colour: Rgb8,
    opacity: TextOpacity,
) -> SkyhourResult<()> {
    let canvas = Canvas::new(frame.width, frame.height)?;
    let (usable_w, usable_h) = fit::usable_box(canvas);
    let size = fit::max_font_size(engine, label, usable_w, usable_h)?;

    let colour = label_colour(base_colour);
    let brush = TextBrushRgba8 {
        r: colour.r,
        g: colour.g,
        b: colour.b,
        a: opacity.alpha(),
    };
    let layout = engine.layout_label(label, size as f32, brush)?;
    let extents = fit::layout_extents(&layout);
    let placement = fit::place_label(canvas, extents);

    let layer = raster_label_layer(canvas, engine, &layout, placement)?;
    composite::over_in_place(&mut frame.data, &layer)
}

/// Rasterize the laid-out label into a premultiplied RGBA8 layer.
fn raster_label_layer(
    canvas: Canvas,
    engine: &TextLayoutEngine,
    layout: &parley::Layout<TextBrushRgba8>,
    placement: LabelPlacement,
) -> SkyhourResult<Vec<u8>> {
    let width_u16: u16 = canvas
        .width
        .try_into()
        .map_err(|_| SkyhourError::render("frame width exceeds u16"))?;
    let height_u16: u16 = canvas
        .height
        .try_into()
        .map_err(|_| SkyhourError::render("frame height exceeds u16"))?;

    let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
    clear_pixmap(&mut pixmap, [0, 0, 0, 0]);

    let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((
        placement.x,
        placement.y,
    )));

    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));

            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(engine.font_data())
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }

    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}
