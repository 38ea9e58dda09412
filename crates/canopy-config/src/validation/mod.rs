//! Full configuration validation.
//!
//! Each section has its own check; this orchestrator runs them all and
//! collects every violation into a single `ConfigError`.

mod helpers;

use crate::schema::CanopyConfig;
use canopy_common::ConfigError;

use helpers::validate_range;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &CanopyConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_frames(&mut errors, config);
    validate_hibernation(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_frames(errors: &mut Vec<String>, config: &CanopyConfig) {
    let frames = &config.frames;
    validate_range(
        errors,
        "frames.hello_timeout_ms",
        frames.hello_timeout_ms,
        1_000,
        120_000,
    );
    validate_range(
        errors,
        "frames.window_load_timeout_ms",
        frames.window_load_timeout_ms,
        500,
        60_000,
    );
    validate_range(
        errors,
        "frames.request_timeout_ms",
        frames.request_timeout_ms,
        1_000,
        120_000,
    );
    validate_range(
        errors,
        "frames.default_width",
        u64::from(frames.default_width),
        200,
        16_384,
    );
    validate_range(
        errors,
        "frames.default_height",
        u64::from(frames.default_height),
        200,
        16_384,
    );
}

fn validate_hibernation(errors: &mut Vec<String>, config: &CanopyConfig) {
    if let Some(idle) = &config.hibernation.idle_workspaces {
        if idle.idle_ms_threshold == 0 {
            errors.push("hibernation.idle_workspaces.idle_ms_threshold must be > 0".into());
        }
    }
    if let Some(max) = &config.hibernation.maximum_active_workspaces {
        if max.threshold == 0 {
            errors.push("hibernation.maximum_active_workspaces.threshold must be >= 1".into());
        }
    }
}
