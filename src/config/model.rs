use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::error::{SkyhourError, SkyhourResult};
use crate::palette::table::SkyPalette;

/// How far down the frame the gradient fades toward its monochrome average.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadePolicy {
    /// Darker base colours fade over more of the frame (10% up to 50%).
    BrightnessScaled,
    /// Constant 30% of the frame height.
    Fixed,
}

impl Default for FadePolicy {
    fn default() -> Self {
        Self::BrightnessScaled
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextOpacity {
    Full,
    Partial,
}

impl Default for TextOpacity {
    fn default() -> Self {
        Self::Full
    }
}

impl TextOpacity {
    pub fn alpha(self) -> u8 {
        match self {
            Self::Full => 255,
            Self::Partial => 192,
        }
    }
}

/// Film grain controls. `seed: None` draws fresh entropy per run.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GrainOptions {
    pub weight: f32,
    pub sigma: f64,
    pub seed: Option<u64>,
}

impl Default for GrainOptions {
    fn default() -> Self {
        Self {
            weight: 0.1,
            sigma: 25.0,
            seed: None,
        }
    }
}

impl GrainOptions {
    pub fn validate(&self) -> SkyhourResult<()> {
        if !self.weight.is_finite() || !(0.0..=1.0).contains(&self.weight) {
            return Err(SkyhourError::config(
                "grain weight must be finite and within 0..=1",
            ));
        }
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(SkyhourError::config("grain sigma must be finite and >= 0"));
        }
        Ok(())
    }
}

/// On-disk generation config.
///
/// `sky_colours` maps hour strings ("0".."23") to `[r, g, b]` control points;
/// `name` is the label drawn on every frame. The remaining fields are
/// optional and default to the standard look.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GenerationConfig {
    pub sky_colours: BTreeMap<String, [u8; 3]>,
    pub name: String,
    #[serde(default)]
    pub font: Option<PathBuf>,
    #[serde(default)]
    pub fade_policy: FadePolicy,
    #[serde(default)]
    pub text_opacity: TextOpacity,
    #[serde(default)]
    pub grain: GrainOptions,
}

impl GenerationConfig {
    pub fn from_reader<R: std::io::Read>(reader: R) -> SkyhourResult<Self> {
        let cfg: Self = serde_json::from_reader(reader)
            .map_err(|e| SkyhourError::config(format!("parse generation config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> SkyhourResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            SkyhourError::config(format!("open generation config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn validate(&self) -> SkyhourResult<()> {
        if self.name.trim().is_empty() {
            return Err(SkyhourError::config("name must be non-empty"));
        }
        SkyPalette::from_config(&self.sky_colours)?;
        self.grain.validate()?;
        Ok(())
    }

    /// Control points as a sampleable palette.
    pub fn palette(&self) -> SkyhourResult<SkyPalette> {
        SkyPalette::from_config(&self.sky_colours)
    }

    /// Resolve the `font` entry against the config file's directory, so
    /// configs can ship next to their fonts.
    pub fn font_path_relative_to(&self, config_dir: &Path) -> Option<PathBuf> {
        self.font.as_ref().map(|font| {
            if font.is_absolute() {
                font.clone()
            } else {
                config_dir.join(font)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_json() -> &'static str {
        r#"{
            "sky_colours": { "0": [10, 10, 40], "12": [255, 220, 130] },
            "name": "Rosa"
        }"#
    }

    #[test]
    fn minimal_config_fills_defaults() {
        let cfg = GenerationConfig::from_reader(minimal_json().as_bytes()).unwrap();
        assert_eq!(cfg.name, "Rosa");
        assert_eq!(cfg.font, None);
        assert_eq!(cfg.fade_policy, FadePolicy::BrightnessScaled);
        assert_eq!(cfg.text_opacity, TextOpacity::Full);
        assert_eq!(cfg.grain, GrainOptions::default());
    }

    #[test]
    fn full_config_json_roundtrip() {
        let cfg = GenerationConfig {
            sky_colours: BTreeMap::from([
                ("0".to_string(), [10, 10, 40]),
                ("21".to_string(), [25, 20, 60]),
            ]),
            name: "Rosa".to_string(),
            font: Some(PathBuf::from("fonts/carving.ttf")),
            fade_policy: FadePolicy::Fixed,
            text_opacity: TextOpacity::Partial,
            grain: GrainOptions {
                weight: 0.2,
                sigma: 10.0,
                seed: Some(7),
            },
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back = GenerationConfig::from_reader(json.as_bytes()).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn validate_rejects_bad_configs() {
        let empty_name = r#"{
            "sky_colours": { "0": [0, 0, 0], "12": [1, 1, 1] },
            "name": "  "
        }"#;
        assert!(GenerationConfig::from_reader(empty_name.as_bytes()).is_err());

        let one_colour = r#"{
            "sky_colours": { "0": [0, 0, 0] },
            "name": "Rosa"
        }"#;
        assert!(GenerationConfig::from_reader(one_colour.as_bytes()).is_err());

        let bad_grain = r#"{
            "sky_colours": { "0": [0, 0, 0], "12": [1, 1, 1] },
            "name": "Rosa",
            "grain": { "weight": 1.5 }
        }"#;
        assert!(GenerationConfig::from_reader(bad_grain.as_bytes()).is_err());
    }

    #[test]
    fn font_path_resolves_against_config_dir() {
        let mut cfg = GenerationConfig::from_reader(minimal_json().as_bytes()).unwrap();
        assert_eq!(cfg.font_path_relative_to(Path::new("conf")), None);

        cfg.font = Some(PathBuf::from("fonts/carving.ttf"));
        assert_eq!(
            cfg.font_path_relative_to(Path::new("conf")),
            Some(PathBuf::from("conf/fonts/carving.ttf"))
        );

        cfg.font = Some(PathBuf::from("/abs/carving.ttf"));
        assert_eq!(
            cfg.font_path_relative_to(Path::new("conf")),
            Some(PathBuf::from("/abs/carving.ttf"))
        );
    }
}
