use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{SkyhourError, SkyhourResult};

/// RGBA8 brush colour used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Read a font file into memory.
pub fn read_font_bytes(path: &Path) -> SkyhourResult<Vec<u8>> {
    std::fs::read(path)
        .with_context(|| format!("read font bytes from '{}'", path.display()))
        .map_err(SkyhourError::from)
}

/// Stateful helper for shaping the frame label through Parley.
///
/// The font is registered once at construction and every layout call resolves
/// the same family, so the repeated probes of size fitting stay cheap. Holds
/// the font in both Parley and rasterizer form.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font_data: vello_cpu::peniko::FontData,
}

impl TextLayoutEngine {
    pub fn from_font_bytes(font_bytes: &[u8]) -> SkyhourResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| SkyhourError::font("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SkyhourError::font("registered font family has no name"))?
            .to_string();
        let font_data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes.to_vec()), 0);

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font_data,
        })
    }

    /// Primary family name resolved from the registered font.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Glyph source for the CPU rasterizer.
    pub fn font_data(&self) -> &vello_cpu::peniko::FontData {
        &self.font_data
    }

    /// Shape and lay out the label as a single unwrapped block.
    pub fn layout_label(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> SkyhourResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(SkyhourError::font("label size_px must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_test_font() -> Option<Vec<u8>> {
        let candidates = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
        ];
        candidates.iter().find_map(|path| std::fs::read(path).ok())
    }

    #[test]
    fn garbage_font_bytes_are_rejected() {
        assert!(TextLayoutEngine::from_font_bytes(&[0u8; 16]).is_err());
    }

    #[test]
    fn layout_rejects_bad_sizes() {
        let Some(font_bytes) = load_test_font() else {
            return;
        };
        let mut engine = TextLayoutEngine::from_font_bytes(&font_bytes).unwrap();
        assert!(
            engine
                .layout_label("Rosa", 0.0, TextBrushRgba8::default())
                .is_err()
        );
        assert!(
            engine
                .layout_label("Rosa", f32::NAN, TextBrushRgba8::default())
                .is_err()
        );
    }

    #[test]
    fn layout_produces_lines_with_real_font() {
        let Some(font_bytes) = load_test_font() else {
            return;
        };
        let mut engine = TextLayoutEngine::from_font_bytes(&font_bytes).unwrap();
        assert!(!engine.family_name().is_empty());

        let layout = engine
            .layout_label("Rosa", 24.0, TextBrushRgba8::default())
            .unwrap();
        assert!(layout.lines().count() >= 1);
    }
}
