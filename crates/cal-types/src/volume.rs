//! Playback volume.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const MIN_TENTHS: u8 = 1;
const MAX_TENTHS: u8 = 10;

/// Playback gain in tenths, always within `0.1..=1.0`.
///
/// Stored as an integer number of tenths so that repeated up/down steps
/// never drift away from the one-decimal grid users see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Volume(u8);

/// Why a volume change was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VolumeError {
    #[error("volume is already at the maximum")]
    AtMaximum,

    #[error("volume is already at the minimum")]
    AtMinimum,

    #[error("no volume given")]
    Missing,

    #[error("unsupported volume: {0}")]
    Invalid(String),
}

impl Volume {
    /// Volume a fresh guild starts with.
    pub const DEFAULT: Volume = Volume(3);
    /// Volume `/cal.reset` restores.
    pub const RESET: Volume = Volume(2);

    /// Builds a volume from tenths, `None` when outside `1..=10`.
    pub fn from_tenths(tenths: u8) -> Option<Self> {
        (MIN_TENTHS..=MAX_TENTHS)
            .contains(&tenths)
            .then_some(Self(tenths))
    }

    pub fn tenths(self) -> u8 {
        self.0
    }

    /// Gain handed to the audio player.
    pub fn as_gain(self) -> f32 {
        f32::from(self.0) / 10.0
    }

    /// One step louder.
    pub fn up(self) -> Result<Self, VolumeError> {
        if self.0 >= MAX_TENTHS {
            return Err(VolumeError::AtMaximum);
        }
        Ok(Self(self.0 + 1))
    }

    /// One step quieter.
    pub fn down(self) -> Result<Self, VolumeError> {
        if self.0 <= MIN_TENTHS {
            return Err(VolumeError::AtMinimum);
        }
        Ok(Self(self.0 - 1))
    }

    /// Parses a user-supplied volume.
    ///
    /// Only the literal values `0.1` through `0.9`, `1` and `1.0` are
    /// accepted; anything else (including `.5` or `0.50`) is rejected.
    pub fn parse_setting(input: Option<&str>) -> Result<Self, VolumeError> {
        let input = match input {
            Some(s) if !s.is_empty() => s,
            _ => return Err(VolumeError::Missing),
        };
        let tenths = match input {
            "1" | "1.0" => MAX_TENTHS,
            _ => input
                .strip_prefix("0.")
                .filter(|d| d.len() == 1)
                .and_then(|d| d.parse::<u8>().ok())
                .filter(|d| *d >= MIN_TENTHS)
                .ok_or_else(|| VolumeError::Invalid(input.to_string()))?,
        };
        Ok(Self(tenths))
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == MAX_TENTHS {
            f.write_str("1")
        } else {
            write!(f, "0.{}", self.0)
        }
    }
}

impl TryFrom<f32> for Volume {
    type Error = VolumeError;

    fn try_from(gain: f32) -> Result<Self, Self::Error> {
        let tenths = (gain * 10.0).round();
        if !(f32::from(MIN_TENTHS)..=f32::from(MAX_TENTHS)).contains(&tenths) {
            return Err(VolumeError::Invalid(gain.to_string()));
        }
        Ok(Self(tenths as u8))
    }
}

impl From<Volume> for f32 {
    fn from(volume: Volume) -> Self {
        volume.as_gain()
    }
}
