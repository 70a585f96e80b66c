//! Hour-of-day sky image generation.
//!
//! skyhour renders one PNG per hour of the day: a sky-coloured gradient that
//! fades into its monochrome average near the bottom, a name label fitted and
//! composited over it, and a film-grain pass on top. Colours come from a
//! small JSON config mapping hours to RGB control points; everything between
//! control points is interpolated.
//!
//! The typical entry points are [`GenerationConfig`] for loading a config,
//! [`generate`] for filling an output directory with the 24 hourly frames,
//! and [`render_hour`] for producing a single frame in memory.
#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod encode;
pub mod foundation;
pub mod layout;
pub mod palette;
pub mod pipeline;
pub mod render;

pub use assets::font::{TextBrushRgba8, TextLayoutEngine, read_font_bytes};
pub use config::model::{FadePolicy, GenerationConfig, GrainOptions, TextOpacity};
pub use encode::png::{encode_png, ensure_parent_dir, fresh_dir, save_png, write_atomic};
pub use foundation::core::{Canvas, FrameRGBA, Hour, Rgb8};
pub use foundation::error::{SkyhourError, SkyhourResult};
pub use layout::fit::{
    LabelPlacement, LabelSize, MIN_BOTTOM_MARGIN, PADDING_RATIO, max_font_size, measure_label,
    place_label, usable_box,
};
pub use palette::table::SkyPalette;
pub use pipeline::generate::{
    FrameStage, GenerateJob, GenerateStats, GenerateThreading, HourOutcome, HourStatus,
    frame_path, generate, plan_hours, render_hour,
};
pub use render::composite::{PremulRgba8, blend_weighted, over, over_in_place};
pub use render::gradient::{fade_ratio, make_gradient};
pub use render::grain::{Rng64, add_grain, entropy_seed, hour_seed};
pub use render::text::{apply_label, label_colour};
