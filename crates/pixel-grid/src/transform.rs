//! Interactive pan/zoom/rotate state for an imported bitmap.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::sampler::{rasterize, BackgroundThreshold, SourceBitmap, SURFACE_SIZE};

/// Smallest scale reachable by zoom gestures and the slider.
pub const MIN_SCALE: f32 = 0.1;

/// Largest scale reachable by zoom gestures and the slider.
pub const MAX_SCALE: f32 = 2.0;

/// Scale change per wheel notch.
pub const ZOOM_STEP: f32 = 0.1;

/// Pan, scale and rotation applied to a source bitmap before sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformState {
    pub offset_x: f32,
    pub offset_y: f32,
    pub scale: f32,
    /// Clockwise, `0..360`.
    #[serde(rename = "rotation")]
    pub rotation_degrees: u16,
}

impl TransformState {
    /// `(0, 0, 1, 0)`
    pub const fn identity() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
            rotation_degrees: 0,
        }
    }

    /// Identity with the scale that fits the longer side to the surface.
    pub fn fitted(width: u32, height: u32) -> Self {
        let longer = width.max(height).max(1);
        Self {
            scale: SURFACE_SIZE as f32 / longer as f32,
            ..Self::identity()
        }
    }

    /// Copy with rotation reduced mod 360 and unusable numbers replaced.
    ///
    /// A non-finite or non-positive scale becomes [`MIN_SCALE`]; non-finite
    /// offsets become zero.
    pub fn normalized(&self) -> Self {
        let finite_or_zero = |v: f32| if v.is_finite() { v } else { 0.0 };
        Self {
            offset_x: finite_or_zero(self.offset_x),
            offset_y: finite_or_zero(self.offset_y),
            scale: if self.scale.is_finite() && self.scale > 0.0 {
                self.scale
            } else {
                MIN_SCALE
            },
            rotation_degrees: self.rotation_degrees % 360,
        }
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::identity()
    }
}

/// Whether a bitmap is being positioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// The grid is the drawable surface
    #[default]
    Idle,
    /// A source bitmap is live; the grid is an uncommitted preview
    Transform,
}

/// Owns the source bitmap while it is being positioned and keeps the
/// preview grid in sync with every parameter change.
#[derive(Debug, Clone, Default)]
pub struct TransformController {
    source: Option<SourceBitmap>,
    state: TransformState,
    threshold: BackgroundThreshold,
    preview: Option<Grid>,
}

impl TransformController {
    pub fn new(threshold: BackgroundThreshold) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> Mode {
        if self.source.is_some() {
            Mode::Transform
        } else {
            Mode::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.mode() == Mode::Transform
    }

    pub fn state(&self) -> &TransformState {
        &self.state
    }

    pub fn threshold(&self) -> BackgroundThreshold {
        self.threshold
    }

    pub fn source(&self) -> Option<&SourceBitmap> {
        self.source.as_ref()
    }

    /// The live preview, present only in transform mode.
    pub fn preview(&self) -> Option<&Grid> {
        self.preview.as_ref()
    }

    /// Enter transform mode with a fresh bitmap and a fitted identity state.
    ///
    /// Replaces any bitmap already being positioned.
    pub fn begin(&mut self, source: SourceBitmap) -> &Grid {
        self.state = TransformState::fitted(source.width(), source.height());
        self.source = Some(source);
        self.refresh_preview()
    }

    /// Pan by a pointer delta in surface units.
    pub fn drag(&mut self, dx: f32, dy: f32) -> Option<&Grid> {
        self.source.as_ref()?;
        self.state.offset_x += dx;
        self.state.offset_y += dy;
        Some(self.refresh_preview())
    }

    /// Advance rotation by a quarter turn clockwise.
    pub fn rotate(&mut self) -> Option<&Grid> {
        self.source.as_ref()?;
        self.state.rotation_degrees = (self.state.rotation_degrees % 360 + 90) % 360;
        Some(self.refresh_preview())
    }

    /// Relative zoom, clamped to `[MIN_SCALE, MAX_SCALE]`.
    pub fn zoom_by(&mut self, delta: f32) -> Option<&Grid> {
        self.source.as_ref()?;
        self.state.scale = clamp_scale(self.state.scale + delta);
        Some(self.refresh_preview())
    }

    /// One wheel notch: scrolling down zooms out, up zooms in.
    pub fn wheel(&mut self, delta_y: f32) -> Option<&Grid> {
        if delta_y > 0.0 {
            self.zoom_by(-ZOOM_STEP)
        } else {
            self.zoom_by(ZOOM_STEP)
        }
    }

    /// Absolute zoom from the slider, clamped to `[MIN_SCALE, MAX_SCALE]`.
    pub fn set_zoom(&mut self, scale: f32) -> Option<&Grid> {
        self.source.as_ref()?;
        self.state.scale = clamp_scale(scale);
        Some(self.refresh_preview())
    }

    /// Update the threshold; re-samples when a bitmap is live.
    pub fn set_threshold(&mut self, threshold: BackgroundThreshold) -> Option<&Grid> {
        self.threshold = threshold;
        self.source.as_ref()?;
        Some(self.refresh_preview())
    }

    /// Leave transform mode, handing back the grid to commit.
    pub fn apply(&mut self) -> Option<Grid> {
        self.source.take()?;
        self.state = TransformState::identity();
        self.preview.take()
    }

    /// Leave transform mode and drop the preview. Returns whether anything
    /// was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.state = TransformState::identity();
        self.preview = None;
        self.source.take().is_some()
    }

    fn refresh_preview(&mut self) -> &Grid {
        let grid = match &self.source {
            Some(source) => rasterize(source, &self.state, self.threshold),
            None => Grid::empty(),
        };
        self.preview.insert(grid)
    }
}

fn clamp_scale(scale: f32) -> f32 {
    if scale.is_nan() {
        return MIN_SCALE;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}
