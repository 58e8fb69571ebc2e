//! Scale Matching
//!
//! A requested scale rarely matches a mode's supported scales exactly
//! (fractional scales are reported with limited precision), so requests are
//! snapped to the closest supported scale within a fixed tolerance.

use crate::error::ConfigError;
use crate::model::MonitorMode;

/// Maximum distance between a requested and a supported scale.
pub const SCALE_TOLERANCE: f64 = 0.1;

// Distances meant to be exactly 0.1 come out slightly above it in binary
// (1.5 - 1.4 is 0.10000000000000009); a boundary candidate must still count
// as inside the tolerance.
const TOLERANCE_SLACK: f64 = 1e-9;

/// Find the supported scale of `mode` closest to `requested`.
///
/// Candidates further than [`SCALE_TOLERANCE`] away are ignored. Ties keep
/// the scale encountered first in the mode's supported-scale order, which
/// is arbitrary but deterministic.
pub fn closest_scale(mode: &MonitorMode, requested: f64) -> Result<f64, ConfigError> {
    let mut best: Option<(f64, f64)> = None;

    for &supported in &mode.supported_scales {
        let distance = (requested - supported).abs();
        if distance > SCALE_TOLERANCE + TOLERANCE_SLACK {
            continue;
        }
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((supported, distance)),
        }
    }

    match best {
        Some((scale, _)) => Ok(scale),
        None => Err(ConfigError::UnsupportedScale {
            scale: requested,
            mode: mode.name.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dimension, Properties};

    fn mode_with_scales(scales: &[f64]) -> MonitorMode {
        MonitorMode {
            name: "3840x2160@60".to_string(),
            resolution: Dimension {
                width: 3840,
                height: 2160,
            },
            refresh_rate: 60.0,
            preferred_scale: 1.0,
            supported_scales: scales.to_vec(),
            properties: Properties::new(),
        }
    }

    #[test]
    fn test_exact_match() {
        let mode = mode_with_scales(&[1.0, 1.5, 2.0]);
        assert_eq!(closest_scale(&mode, 1.5).unwrap(), 1.5);
    }

    #[test]
    fn test_snaps_to_nearest_within_tolerance() {
        let mode = mode_with_scales(&[1.0, 1.25, 1.5]);
        assert_eq!(closest_scale(&mode, 1.3).unwrap(), 1.25);
        assert_eq!(closest_scale(&mode, 1.45).unwrap(), 1.5);
    }

    #[test]
    fn test_boundary_distance_is_inside_tolerance() {
        // 1.5 - 1.4 rounds up to 0.10000000000000009 in f64; the decimal
        // distance is exactly the tolerance and must still match
        let mode = mode_with_scales(&[1.0, 1.25, 1.5]);
        assert_eq!(closest_scale(&mode, 1.4).unwrap(), 1.5);
    }

    #[test]
    fn test_out_of_tolerance_is_rejected() {
        let mode = mode_with_scales(&[1.0, 2.0]);
        let result = closest_scale(&mode, 1.5);
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedScale { scale, .. }) if scale == 1.5
        ));
    }

    #[test]
    fn test_tie_keeps_first_encountered() {
        // 2.0625 is equidistant (exactly 1/16) from both candidates
        let mode = mode_with_scales(&[2.0, 2.125]);
        assert_eq!(closest_scale(&mode, 2.0625).unwrap(), 2.0);
    }

    #[test]
    fn test_empty_scale_list_is_rejected() {
        let mode = mode_with_scales(&[]);
        assert!(closest_scale(&mode, 1.0).is_err());
    }
}
