//! Setting value validation.

use bitmap_engine::{EdgeProcessing, KernelOrigin};

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "BMPKIT_EDGE" => {
            value
                .parse::<EdgeProcessing>()
                .map_err(|_| "must be extend, wrap, mirror, crop or kernel_crop")?;
        }
        "BMPKIT_ORIGIN" => {
            value
                .parse::<KernelOrigin>()
                .map_err(|_| "must be 'center' or 'top_left'")?;
        }
        "BMPKIT_JPEG_QUALITY" => validate_int_range(value, 1, 100)?,
        "BMPKIT_SMOOTH_RESIZE" => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        "BMPKIT_LOG" => {
            if value.trim().is_empty() {
                return Err("must not be empty".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i32, max: i32) -> Result<(), String> {
    let v: i32 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_edge() {
        assert!(validate_setting("BMPKIT_EDGE", "mirror").is_ok());
        assert!(validate_setting("BMPKIT_EDGE", "kernel-crop").is_ok());
        assert!(validate_setting("BMPKIT_EDGE", "reflect").is_err());
    }

    #[test]
    fn test_valid_origin() {
        assert!(validate_setting("BMPKIT_ORIGIN", "center").is_ok());
        assert!(validate_setting("BMPKIT_ORIGIN", "top_left").is_ok());
        assert!(validate_setting("BMPKIT_ORIGIN", "middle").is_err());
    }

    #[test]
    fn test_valid_jpeg_quality() {
        assert!(validate_setting("BMPKIT_JPEG_QUALITY", "1").is_ok());
        assert!(validate_setting("BMPKIT_JPEG_QUALITY", "100").is_ok());
        assert!(validate_setting("BMPKIT_JPEG_QUALITY", "0").is_err());
        assert!(validate_setting("BMPKIT_JPEG_QUALITY", "high").is_err());
    }

    #[test]
    fn test_valid_boolean() {
        assert!(validate_setting("BMPKIT_SMOOTH_RESIZE", "true").is_ok());
        assert!(validate_setting("BMPKIT_SMOOTH_RESIZE", "yes").is_err());
    }

    #[test]
    fn test_unknown_key_is_accepted() {
        assert!(validate_setting("OTHER", "anything").is_ok());
    }
}
