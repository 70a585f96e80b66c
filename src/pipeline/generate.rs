use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use rayon::prelude::*;

use crate::{
    assets::font::TextLayoutEngine,
    config::model::{FadePolicy, GrainOptions, TextOpacity},
    encode::png::save_png,
    foundation::core::{Canvas, FrameRGBA, Hour},
    foundation::error::{SkyhourError, SkyhourResult},
    palette::table::SkyPalette,
    render::{gradient, grain, text},
};

/// Stages an hour's frame moves through, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStage {
    Pending,
    GradientBuilt,
    TextApplied,
    GrainApplied,
    Saved,
}

impl FrameStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::GradientBuilt => "gradient",
            Self::TextApplied => "text",
            Self::GrainApplied => "grain",
            Self::Saved => "saved",
        }
    }
}

/// Everything a run shares across hours.
#[derive(Clone)]
pub struct GenerateJob {
    pub palette: SkyPalette,
    pub label: String,
    pub canvas: Canvas,
    pub fade_policy: FadePolicy,
    pub text_opacity: TextOpacity,
    pub grain: GrainOptions,
    pub font_bytes: Arc<Vec<u8>>,
}

#[derive(Clone, Debug)]
pub struct GenerateThreading {
    pub parallel: bool,
    pub threads: Option<usize>,
}

impl Default for GenerateThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerateStats {
    pub hours_total: u64,
    pub hours_generated: u64,
    pub hours_skipped: u64,
    pub hours_failed: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HourStatus {
    Generated,
    SkippedExisting,
    Failed { stage: FrameStage, message: String },
}

/// Outcome of one hour within a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HourOutcome {
    pub hour: Hour,
    pub status: HourStatus,
}

/// Destination file for an hour's frame ("07.png" under `out_dir`).
pub fn frame_path(out_dir: &Path, hour: Hour) -> PathBuf {
    out_dir.join(format!("{}.png", hour.file_stem()))
}

/// Hours whose frame file does not exist yet.
pub fn plan_hours(out_dir: &Path) -> Vec<Hour> {
    Hour::all()
        .filter(|hour| !frame_path(out_dir, *hour).exists())
        .collect()
}

/// Run the compositing stages for one hour and return the frame.
///
/// Pipeline:
/// 1. [`SkyPalette::colour_at`] for the hour's base colour
/// 2. [`make_gradient`](crate::make_gradient)
/// 3. [`apply_label`](crate::apply_label)
/// 4. [`add_grain`](crate::add_grain) seeded with `grain_seed`
///
/// Saving is the caller's business; [`generate`] adds the skip logic and the
/// atomic PNG write on top.
#[tracing::instrument(skip(job, engine))]
pub fn render_hour(
    job: &GenerateJob,
    engine: &mut TextLayoutEngine,
    hour: Hour,
    grain_seed: u64,
) -> SkyhourResult<FrameRGBA> {
    let colour = job.palette.colour_at(hour.as_f64())?;
    let mut frame = gradient::make_gradient(colour, job.canvas, job.fade_policy);
    text::apply_label(&mut frame, engine, &job.label, colour, job.text_opacity)?;
    grain::add_grain(&mut frame, &job.grain, grain_seed);
    Ok(frame)
}

fn generate_one(
    job: &GenerateJob,
    engine: &mut TextLayoutEngine,
    hour: Hour,
    out_dir: &Path,
    base_seed: u64,
) -> HourOutcome {
    let mut stage = FrameStage::Pending;
    let result = (|| -> SkyhourResult<()> {
        let colour = job.palette.colour_at(hour.as_f64())?;
        let mut frame = gradient::make_gradient(colour, job.canvas, job.fade_policy);
        stage = FrameStage::GradientBuilt;
        text::apply_label(&mut frame, engine, &job.label, colour, job.text_opacity)?;
        stage = FrameStage::TextApplied;
        grain::add_grain(&mut frame, &job.grain, grain::hour_seed(base_seed, hour.get()));
        stage = FrameStage::GrainApplied;
        save_png(&frame, &frame_path(out_dir, hour))?;
        stage = FrameStage::Saved;
        Ok(())
    })();

    match result {
        Ok(()) => HourOutcome {
            hour,
            status: HourStatus::Generated,
        },
        Err(e) => {
            tracing::warn!(
                hour = hour.get(),
                stage = stage.as_str(),
                error = %e,
                "hour generation failed"
            );
            HourOutcome {
                hour,
                status: HourStatus::Failed {
                    stage,
                    message: e.to_string(),
                },
            }
        }
    }
}

/// Generate every missing hour frame into `out_dir`.
///
/// Hours whose file already exists are reported as skipped without touching
/// them. Each remaining hour runs [`render_hour`]'s stages in isolation and
/// saves atomically, so one bad hour fails its own entry instead of the run.
/// Font problems abort before any hour starts; every frame needs the face.
#[tracing::instrument(skip(job, threading))]
pub fn generate(
    job: &GenerateJob,
    out_dir: &Path,
    threading: &GenerateThreading,
) -> SkyhourResult<(Vec<HourOutcome>, GenerateStats)> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create output directory '{}'", out_dir.display()))?;

    let todo = plan_hours(out_dir);
    let base_seed = job.grain.seed.unwrap_or_else(grain::entropy_seed);

    let mut outcomes: Vec<HourOutcome> = Hour::all()
        .filter(|hour| !todo.contains(hour))
        .map(|hour| HourOutcome {
            hour,
            status: HourStatus::SkippedExisting,
        })
        .collect();

    if !threading.parallel {
        let mut engine = TextLayoutEngine::from_font_bytes(&job.font_bytes)?;
        for hour in &todo {
            outcomes.push(generate_one(job, &mut engine, *hour, out_dir, base_seed));
        }
    } else {
        TextLayoutEngine::from_font_bytes(&job.font_bytes)?;
        let pool = build_thread_pool(threading.threads)?;
        let rendered = pool.install(|| {
            todo.par_iter()
                .map_init(
                    || TextLayoutEngine::from_font_bytes(&job.font_bytes),
                    |engine, hour| match engine {
                        Ok(engine) => generate_one(job, engine, *hour, out_dir, base_seed),
                        Err(e) => HourOutcome {
                            hour: *hour,
                            status: HourStatus::Failed {
                                stage: FrameStage::Pending,
                                message: e.to_string(),
                            },
                        },
                    },
                )
                .collect::<Vec<_>>()
        });
        outcomes.extend(rendered);
    }

    outcomes.sort_by_key(|outcome| outcome.hour);

    let mut stats = GenerateStats {
        hours_total: outcomes.len() as u64,
        ..GenerateStats::default()
    };
    for outcome in &outcomes {
        match &outcome.status {
            HourStatus::Generated => stats.hours_generated += 1,
            HourStatus::SkippedExisting => stats.hours_skipped += 1,
            HourStatus::Failed { .. } => stats.hours_failed += 1,
        }
    }

    Ok((outcomes, stats))
}

fn build_thread_pool(threads: Option<usize>) -> SkyhourResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SkyhourError::config(
            "threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SkyhourError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("skyhour_{tag}_{}_{nanos}", std::process::id()))
    }

    #[test]
    fn frame_paths_are_zero_padded() {
        let dir = Path::new("banners");
        assert_eq!(
            frame_path(dir, Hour::new(7).unwrap()),
            PathBuf::from("banners/07.png")
        );
        assert_eq!(
            frame_path(dir, Hour::new(23).unwrap()),
            PathBuf::from("banners/23.png")
        );
    }

    #[test]
    fn plan_skips_hours_already_on_disk() {
        let dir = scratch_dir("plan");
        std::fs::create_dir_all(&dir).unwrap();

        assert_eq!(plan_hours(&dir).len(), 24);

        std::fs::write(dir.join("00.png"), b"x").unwrap();
        std::fs::write(dir.join("13.png"), b"x").unwrap();
        let todo = plan_hours(&dir);
        assert_eq!(todo.len(), 22);
        assert!(!todo.contains(&Hour::new(0).unwrap()));
        assert!(!todo.contains(&Hour::new(13).unwrap()));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn thread_pool_rejects_zero_threads() {
        assert!(build_thread_pool(Some(0)).is_err());
        assert!(build_thread_pool(Some(2)).is_ok());
        assert!(build_thread_pool(None).is_ok());
    }

    #[test]
    fn stage_names_are_stable() {
        assert_eq!(FrameStage::Pending.as_str(), "pending");
        assert_eq!(FrameStage::Saved.as_str(), "saved");
    }
}
