//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    (
        "BMPKIT_EDGE",
        "kernel_crop",
        "Edge policy for convolution: extend, wrap, mirror, crop or kernel_crop",
    ),
    (
        "BMPKIT_ORIGIN",
        "center",
        "Kernel origin for convolution: center or top_left",
    ),
    ("BMPKIT_JPEG_QUALITY", "90", "JPEG export quality (1-100)"),
    (
        "BMPKIT_SMOOTH_RESIZE",
        "false",
        "Box-blur before downscaling",
    ),
    (
        "BMPKIT_LOG",
        "info",
        "tracing filter used when RUST_LOG is not set",
    ),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

/// Setting keys in declaration order.
pub fn keys() -> impl Iterator<Item = &'static str> {
    DEFS.iter().map(|&(key, _, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::validate_setting;

    #[test]
    fn test_defaults_are_valid() {
        for def in DEFAULT_SETTINGS.values() {
            assert!(
                validate_setting(def.key, def.default).is_ok(),
                "default for {} is invalid",
                def.key
            );
            assert!(!def.description.is_empty());
        }
    }

    #[test]
    fn test_get_default() {
        assert_eq!(get_default("BMPKIT_JPEG_QUALITY"), Some("90"));
        assert_eq!(get_default("UNKNOWN"), None);
        assert_eq!(keys().count(), DEFAULT_SETTINGS.len());
    }
}
