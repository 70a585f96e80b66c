use crate::config::model::GrainOptions;
use crate::foundation::core::FrameRGBA;
use crate::render::composite::blend_weighted;

/// SplitMix64 stream. Deterministic for a given seed, cheap enough to run
/// three draws per pixel.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    pub fn next_f64_01(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }
}

/// One standard Gaussian draw via Box-Muller.
fn next_gaussian(rng: &mut Rng64) -> f64 {
    // Flip u1 into (0, 1] so the log stays finite.
    let u1 = 1.0 - rng.next_f64_01();
    let u2 = rng.next_f64_01();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// Truncate toward zero, then wrap into byte range. Out-of-range samples wrap
/// instead of clamping, which is what gives the grain its salt-and-pepper
/// speckle on dark and bright frames alike.
fn wrap_u8(v: f64) -> u8 {
    (v as i64) as u8
}

/// Seed for unseeded runs, mixed from wall-clock nanos and the process id.
pub fn entropy_seed() -> u64 {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    nanos ^ (u64::from(std::process::id()) << 32)
}

/// Decorrelate per-hour streams drawn from one base seed.
pub fn hour_seed(base: u64, hour: u8) -> u64 {
    base ^ u64::from(hour).wrapping_mul(0xD6E8_FEB8_6659_FD93)
}

/// Blend Gaussian grain into the frame in place. Alpha stays opaque.
pub fn add_grain(frame: &mut FrameRGBA, options: &GrainOptions, seed: u64) {
    let mut rng = Rng64::new(seed);
    for px in frame.data.chunks_exact_mut(4) {
        let noise = [
            wrap_u8(options.sigma * next_gaussian(&mut rng)),
            wrap_u8(options.sigma * next_gaussian(&mut rng)),
            wrap_u8(options.sigma * next_gaussian(&mut rng)),
            255,
        ];
        let out = blend_weighted([px[0], px[1], px[2], px[3]], noise, options.weight);
        px.copy_from_slice(&out);
    }
}
