// engine/src/engine/config.rs
#![forbid(unsafe_code)]

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be > 0 (got {value})")]
    Zero { field: &'static str, value: u32 },
    #[error("max_speed_falling_time_ms ({max_speed}) must not exceed falling_time_ms ({normal})")]
    MaxSpeedSlowerThanNormal { max_speed: u32, normal: u32 },
    #[error("blink_time_ms ({blink}) must not exceed dying_time_ms ({dying})")]
    BlinkLongerThanDying { blink: u32, dying: u32 },
}

/// Timing knobs of one grid, all in milliseconds.
///
/// Fall times are per half cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    pub falling_time_ms: u32,
    pub max_speed_falling_time_ms: u32,
    pub floating_falling_time_ms: u32,
    pub rotation_time_ms: u32,
    pub dying_time_ms: u32,
    pub blink_time_ms: u32,
    pub queue_shift_time_ms: u32,
    pub chain_label_time_ms: u32,
    pub silhouette_frame_time_ms: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            falling_time_ms: 200,
            max_speed_falling_time_ms: 25,
            floating_falling_time_ms: 25,
            rotation_time_ms: 100,
            dying_time_ms: 600,
            blink_time_ms: 100,
            queue_shift_time_ms: 150,
            chain_label_time_ms: 1000,
            silhouette_frame_time_ms: 100,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_zero = [
            ("falling_time_ms", self.falling_time_ms),
            ("max_speed_falling_time_ms", self.max_speed_falling_time_ms),
            ("floating_falling_time_ms", self.floating_falling_time_ms),
            ("dying_time_ms", self.dying_time_ms),
            ("blink_time_ms", self.blink_time_ms),
            ("silhouette_frame_time_ms", self.silhouette_frame_time_ms),
        ];
        for (field, value) in non_zero {
            if value == 0 {
                return Err(ConfigError::Zero { field, value });
            }
        }
        if self.max_speed_falling_time_ms > self.falling_time_ms {
            return Err(ConfigError::MaxSpeedSlowerThanNormal {
                max_speed: self.max_speed_falling_time_ms,
                normal: self.falling_time_ms,
            });
        }
        if self.blink_time_ms > self.dying_time_ms {
            return Err(ConfigError::BlinkLongerThanDying {
                blink: self.blink_time_ms,
                dying: self.dying_time_ms,
            });
        }
        Ok(())
    }

    /// Zero-length animations; handy for headless simulation where only outcomes matter.
    ///
    /// Rotation, queue shift and chain-label windows may be 0; the rest are clamped to 1ms.
    pub fn instant() -> Self {
        Self {
            falling_time_ms: 1,
            max_speed_falling_time_ms: 1,
            floating_falling_time_ms: 1,
            rotation_time_ms: 0,
            dying_time_ms: 1,
            blink_time_ms: 1,
            queue_shift_time_ms: 0,
            chain_label_time_ms: 0,
            silhouette_frame_time_ms: 1,
        }
    }
}
