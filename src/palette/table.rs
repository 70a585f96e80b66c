use std::collections::BTreeMap;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{SkyhourError, SkyhourResult};

/// Sky colour control points keyed by hour of day.
///
/// Sampling is piecewise-linear between neighbouring keys and clamps to the
/// first/last key outside the covered range, so a table does not need an
/// entry for every hour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkyPalette {
    keys: Vec<(u8, Rgb8)>, // sorted by hour, unique
}

impl SkyPalette {
    pub fn new(mut entries: Vec<(u8, Rgb8)>) -> SkyhourResult<Self> {
        if entries.len() < 2 {
            return Err(SkyhourError::config(
                "sky colour table needs at least 2 entries",
            ));
        }
        for (hour, _) in &entries {
            if *hour > 23 {
                return Err(SkyhourError::config(format!(
                    "sky colour hour must be in 0..=23, got {hour}"
                )));
            }
        }
        entries.sort_by_key(|(hour, _)| *hour);
        for pair in entries.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(SkyhourError::config(format!(
                    "duplicate sky colour hour {}",
                    pair[0].0
                )));
            }
        }
        Ok(Self { keys: entries })
    }

    /// Build from the config's string-keyed table ("0".."23" -> [r, g, b]).
    pub fn from_config(table: &BTreeMap<String, [u8; 3]>) -> SkyhourResult<Self> {
        let mut entries = Vec::with_capacity(table.len());
        for (key, rgb) in table {
            let hour: u8 = key.trim().parse().map_err(|_| {
                SkyhourError::config(format!("sky colour key '{key}' is not an hour"))
            })?;
            entries.push((hour, Rgb8::new(rgb[0], rgb[1], rgb[2])));
        }
        Self::new(entries)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sample the sky colour for `hour` (fractional hours interpolate).
    pub fn colour_at(&self, hour: f64) -> SkyhourResult<Rgb8> {
        if !hour.is_finite() {
            return Err(SkyhourError::render("sample hour must be finite"));
        }

        let idx = self.keys.partition_point(|(h, _)| f64::from(*h) <= hour);
        if idx == 0 {
            return Ok(self.keys[0].1);
        }
        if idx >= self.keys.len() {
            return Ok(self.keys[self.keys.len() - 1].1);
        }

        let (hour_a, colour_a) = self.keys[idx - 1];
        let (hour_b, colour_b) = self.keys[idx];
        let t = (hour - f64::from(hour_a)) / (f64::from(hour_b) - f64::from(hour_a));
        Ok(Rgb8::lerp(colour_a, colour_b, t))
    }
}
