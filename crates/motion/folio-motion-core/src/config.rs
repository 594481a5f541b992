//! Core configuration for folio-motion-core.

use serde::{Deserialize, Serialize};

use crate::error::MotionError;

/// Sizing and tolerance knobs for the motion context.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MotionConfig {
    /// Maximum events to retain per tick; the rest are dropped with a warning.
    pub max_events_per_tick: usize,

    /// Float changes smaller than this are not re-emitted.
    pub change_epsilon: f32,

    /// Scrubbed timelines snap to their target once closer than this (ms).
    pub scrub_snap_ms: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            max_events_per_tick: 1024,
            change_epsilon: 1e-4,
            scrub_snap_ms: 0.5,
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), MotionError> {
        if self.max_events_per_tick == 0 {
            return Err(MotionError::InvalidConfig {
                reason: "max_events_per_tick must be > 0".into(),
            });
        }
        if !(self.change_epsilon >= 0.0) {
            return Err(MotionError::InvalidConfig {
                reason: "change_epsilon must be >= 0".into(),
            });
        }
        Ok(())
    }
}
