//! Background removal threshold.

use serde::{Deserialize, Serialize};

/// Brightness cutoff deciding which samples become transparent.
///
/// The policy is bimodal around the midpoint:
/// - exactly 128 disables thresholding
/// - above 128, samples with brightness `>= threshold` are background
/// - below 128, samples with brightness `<= 127 - threshold` are background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackgroundThreshold(pub u8);

impl BackgroundThreshold {
    /// Midpoint value that keeps every sample.
    pub const NONE: BackgroundThreshold = BackgroundThreshold(128);

    /// Editor default: drop near-white backgrounds.
    pub const DEFAULT: BackgroundThreshold = BackgroundThreshold(220);

    /// Snap step for [`darker`](Self::darker) and [`lighter`](Self::lighter).
    pub const STEP: u8 = 10;

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn darker(self) -> Self {
        BackgroundThreshold(self.0.saturating_sub(Self::STEP))
    }

    pub fn lighter(self) -> Self {
        BackgroundThreshold(self.0.saturating_add(Self::STEP))
    }

    pub fn is_disabled(self) -> bool {
        self == Self::NONE
    }

    /// Whether a sample of this brightness counts as background.
    pub fn is_background(self, brightness: f32) -> bool {
        match self.0 {
            128 => false,
            t if t > 128 => brightness >= t as f32,
            t => brightness <= (127 - t) as f32,
        }
    }
}

impl Default for BackgroundThreshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u8> for BackgroundThreshold {
    fn from(value: u8) -> Self {
        BackgroundThreshold(value)
    }
}
