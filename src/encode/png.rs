use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{SkyhourError, SkyhourResult};

/// Encode a frame as PNG bytes in memory.
pub fn encode_png(frame: &FrameRGBA) -> SkyhourResult<Vec<u8>> {
    let image = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| SkyhourError::render("frame byte length does not match width*height*4"))?;

    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .with_context(|| "encode png")?;
    Ok(bytes)
}

pub fn ensure_parent_dir(path: &Path) -> SkyhourResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Write `bytes` to `path` without ever exposing a partial file: the bytes go
/// to a hidden sibling first and a rename moves them into place. The sibling
/// is removed if anything fails in between.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> SkyhourResult<()> {
    ensure_parent_dir(path)?;

    let tmp_path = temp_sibling(path);
    let mut guard = TempFileGuard(Some(tmp_path.clone()));
    std::fs::write(&tmp_path, bytes)
        .with_context(|| format!("write temp file '{}'", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path).with_context(|| {
        format!(
            "move temp file '{}' into '{}'",
            tmp_path.display(),
            path.display()
        )
    })?;
    guard.0 = None;
    Ok(())
}

/// Encode and atomically save a frame as a PNG file.
pub fn save_png(frame: &FrameRGBA, path: &Path) -> SkyhourResult<()> {
    let bytes = encode_png(frame)?;
    write_atomic(path, &bytes)
}

/// First of `dir`, `dir_1`, `dir_2`, ... that does not exist yet.
pub fn fresh_dir(base: &Path) -> PathBuf {
    if !base.exists() {
        return base.to_path_buf();
    }
    let mut counter = 1u32;
    loop {
        let candidate = PathBuf::from(format!("{}_{counter}", base.display()));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("frame.png");
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    path.with_file_name(format!(
        ".{file_name}.{}_{nanos}.tmp",
        std::process::id()
    ))
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}
