//! Configuration: defaults, validation, loading from the environment.

pub mod defaults;
pub mod validation;

use anyhow::{Context, bail};
use bitmap_engine::{EdgeProcessing, KernelOrigin};

use self::defaults::{DEFAULT_SETTINGS, get_default};
use self::validation::validate_setting;

/// Resolved CLI settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub edge: EdgeProcessing,
    pub origin: KernelOrigin,
    pub jpeg_quality: u8,
    pub smooth_resize: bool,
    pub log_filter: String,
}

impl Config {
    /// Read every setting from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup`, falling back to defaults.
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| -> anyhow::Result<String> {
            let value = match lookup(key).filter(|v| !v.is_empty()) {
                Some(v) => v,
                None => get_default(key)
                    .with_context(|| format!("no default for setting {key}"))?
                    .to_string(),
            };
            if let Err(e) = validate_setting(key, &value) {
                bail!("invalid value {value:?} for {key}: {e}");
            }
            Ok(value)
        };

        let edge = get("BMPKIT_EDGE")?.parse::<EdgeProcessing>()?;
        let origin = get("BMPKIT_ORIGIN")?.parse::<KernelOrigin>()?;
        let jpeg_quality = get("BMPKIT_JPEG_QUALITY")?.parse::<u8>()?;
        let smooth_resize = get("BMPKIT_SMOOTH_RESIZE")? == "true";
        let log_filter = get("BMPKIT_LOG")?;

        Ok(Self {
            edge,
            origin,
            jpeg_quality,
            smooth_resize,
            log_filter,
        })
    }

    /// Settings as `(key, value, description)` rows for display.
    pub fn describe(&self) -> Vec<(&'static str, String, &'static str)> {
        defaults::keys()
            .map(|key| {
                let value = match key {
                    "BMPKIT_EDGE" => self.edge.to_string(),
                    "BMPKIT_ORIGIN" => match self.origin {
                        KernelOrigin::Center => "center".to_string(),
                        KernelOrigin::TopLeft => "top_left".to_string(),
                    },
                    "BMPKIT_JPEG_QUALITY" => self.jpeg_quality.to_string(),
                    "BMPKIT_SMOOTH_RESIZE" => self.smooth_resize.to_string(),
                    "BMPKIT_LOG" => self.log_filter.clone(),
                    _ => String::new(),
                };
                let description = DEFAULT_SETTINGS
                    .get(key)
                    .map(|d| d.description)
                    .unwrap_or_default();
                (key, value, description)
            })
            .collect()
    }
}
