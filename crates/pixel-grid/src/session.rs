//! The editing session: one grid, its history, and the tool state around it.

use crate::color::{pick, Color, Rgba};
use crate::fill::flood_fill;
use crate::grid::Grid;
use crate::history::History;
use crate::instructions::{self, ParseError};
use crate::sampler::{BackgroundThreshold, DecodeError, SourceBitmap, SURFACE_SIZE};
use crate::transform::{Mode, TransformController, TransformState};

/// Title given to a fresh session.
pub const DEFAULT_TITLE: &str = "Untitled Pixel Art";

/// Description given to a fresh session.
pub const DEFAULT_DESCRIPTION: &str = "A 16x16 pixel art creation.";

/// Drawing color of a fresh session.
pub const DEFAULT_COLOR: Rgba = Rgba::opaque(255, 255, 255);

/// Active pointer tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tool {
    #[default]
    Draw,
    Erase,
    Fill,
    /// Picks the cell color, then switches back to [`Tool::Draw`]
    Eyedropper,
}

impl std::str::FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draw" => Ok(Tool::Draw),
            "erase" => Ok(Tool::Erase),
            "fill" => Ok(Tool::Fill),
            "eyedropper" => Ok(Tool::Eyedropper),
            other => Err(format!("unknown tool: {}", other)),
        }
    }
}

/// Keyboard actions routed through the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Undo,
    Redo,
}

impl Shortcut {
    /// Map a key press to a shortcut.
    ///
    /// `command` is Ctrl or Cmd. Cmd+Z undoes, Cmd+Shift+Z and Cmd+Y redo.
    pub fn from_key(key: &str, command: bool, shift: bool) -> Option<Self> {
        if !command {
            return None;
        }
        match key.to_ascii_lowercase().as_str() {
            "z" if shift => Some(Shortcut::Redo),
            "z" => Some(Shortcut::Undo),
            "y" => Some(Shortcut::Redo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    /// Draw, erase or fill held down; committed on release
    Stroke,
    /// Panning a bitmap in transform mode; tracks the last pointer position
    Pan { x: f32, y: f32 },
}

/// Everything one editor window owns.
///
/// All pointer coordinates are in surface units (`0..320` on both axes).
/// Every grid change goes through [`History::commit`] exactly once per
/// discrete action; strokes commit on [`pointer_up`](Self::pointer_up).
#[derive(Debug, Clone)]
pub struct Session {
    grid: Grid,
    history: History,
    transform: TransformController,
    tool: Tool,
    color: Rgba,
    title: String,
    description: String,
    gesture: Option<Gesture>,
}

impl Session {
    pub fn new() -> Self {
        Self::with_threshold(BackgroundThreshold::DEFAULT)
    }

    pub fn with_threshold(threshold: BackgroundThreshold) -> Self {
        Self {
            grid: Grid::empty(),
            history: History::default(),
            transform: TransformController::new(threshold),
            tool: Tool::default(),
            color: DEFAULT_COLOR,
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            gesture: None,
        }
    }

    /// The grid to show: the live preview in transform mode, otherwise
    /// the working grid.
    pub fn grid(&self) -> &Grid {
        self.transform.preview().unwrap_or(&self.grid)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn mode(&self) -> Mode {
        self.transform.mode()
    }

    pub fn transform_state(&self) -> &TransformState {
        self.transform.state()
    }

    pub fn threshold(&self) -> BackgroundThreshold {
        self.transform.threshold()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_title_description(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) {
        self.title = title.into();
        self.description = description.into();
    }

    pub fn is_drawing(&self) -> bool {
        self.gesture.is_some()
    }

    // -- Pointer -----------------------------------------------------------

    /// Start a gesture at a surface point.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if self.transform.is_active() {
            self.gesture = Some(Gesture::Pan { x, y });
            return;
        }

        let Some(index) = Grid::cell_at(x, y, SURFACE_SIZE as f32) else {
            return;
        };
        match self.tool {
            Tool::Eyedropper => {
                if let Some(cell) = self.grid.get(index) {
                    self.color = pick(cell);
                }
                self.tool = Tool::Draw;
            }
            _ => {
                self.gesture = Some(Gesture::Stroke);
                self.apply_tool(index);
            }
        }
    }

    /// Continue the current gesture. Without one this does nothing.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        match self.gesture {
            Some(Gesture::Pan { x: last_x, y: last_y }) => {
                self.transform.drag(x - last_x, y - last_y);
                self.gesture = Some(Gesture::Pan { x, y });
            }
            Some(Gesture::Stroke) => {
                if let Some(index) = Grid::cell_at(x, y, SURFACE_SIZE as f32) {
                    self.apply_tool(index);
                }
            }
            None => {}
        }
    }

    /// End the current gesture wherever the pointer is.
    ///
    /// A stroke that changed the grid is committed as one history entry.
    pub fn pointer_up(&mut self) {
        if let Some(Gesture::Stroke) = self.gesture.take() {
            if self.grid != *self.history.current() {
                self.history.commit(self.grid.clone());
            }
        }
    }

    fn apply_tool(&mut self, index: usize) {
        let Some(cell) = self.grid.get(index) else {
            return;
        };
        match self.tool {
            Tool::Draw => {
                self.grid.set(index, Color::Rgba(self.color));
            }
            Tool::Erase => {
                self.grid.set(index, Color::Empty);
            }
            Tool::Fill => {
                self.grid = flood_fill(&self.grid, index, cell, Color::Rgba(self.color));
            }
            Tool::Eyedropper => {}
        }
    }

    // -- History -----------------------------------------------------------

    /// Step back one entry. Ignored in transform mode or mid-gesture.
    pub fn undo(&mut self) -> bool {
        if self.transform.is_active() || self.gesture.is_some() {
            return false;
        }
        match self.history.undo() {
            Some(grid) => {
                self.grid = grid.clone();
                true
            }
            None => false,
        }
    }

    /// Step forward one entry. Ignored in transform mode or mid-gesture.
    pub fn redo(&mut self) -> bool {
        if self.transform.is_active() || self.gesture.is_some() {
            return false;
        }
        match self.history.redo() {
            Some(grid) => {
                self.grid = grid.clone();
                true
            }
            None => false,
        }
    }

    pub fn handle_shortcut(&mut self, shortcut: Shortcut) -> bool {
        match shortcut {
            Shortcut::Undo => self.undo(),
            Shortcut::Redo => self.redo(),
        }
    }

    /// Empty every cell and commit.
    pub fn clear(&mut self) {
        self.abandon_transform();
        self.gesture = None;
        self.grid = Grid::empty();
        self.history.commit(self.grid.clone());
    }

    // -- Transform ---------------------------------------------------------

    /// Decode bytes and enter transform mode. On error nothing changes.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<&Grid, DecodeError> {
        let source = SourceBitmap::decode(bytes)?;
        Ok(self.load_bitmap(source))
    }

    /// Enter transform mode with `source`, fitted to the surface.
    pub fn load_bitmap(&mut self, source: SourceBitmap) -> &Grid {
        if let Some(Gesture::Stroke) = self.gesture {
            self.pointer_up();
        }
        self.gesture = None;
        self.transform.begin(source)
    }

    /// One wheel notch. Only meaningful in transform mode.
    pub fn wheel(&mut self, delta_y: f32) -> bool {
        self.transform.wheel(delta_y).is_some()
    }

    pub fn zoom_by(&mut self, delta: f32) -> bool {
        self.transform.zoom_by(delta).is_some()
    }

    pub fn set_zoom(&mut self, scale: f32) -> bool {
        self.transform.set_zoom(scale).is_some()
    }

    pub fn rotate(&mut self) -> bool {
        self.transform.rotate().is_some()
    }

    /// Set the background threshold. Re-samples in transform mode.
    pub fn set_threshold(&mut self, threshold: BackgroundThreshold) {
        self.transform.set_threshold(threshold);
    }

    pub fn threshold_darker(&mut self) {
        self.set_threshold(self.threshold().darker());
    }

    pub fn threshold_lighter(&mut self) {
        self.set_threshold(self.threshold().lighter());
    }

    pub fn threshold_none(&mut self) {
        self.set_threshold(BackgroundThreshold::NONE);
    }

    /// Bake the preview into the grid as one history entry.
    pub fn apply_transform(&mut self) -> bool {
        self.gesture = None;
        match self.transform.apply() {
            Some(grid) => {
                self.grid = grid;
                self.history.commit(self.grid.clone());
                self.tool = Tool::Draw;
                true
            }
            None => false,
        }
    }

    /// Drop the preview and restore the last committed grid.
    pub fn cancel_transform(&mut self) -> bool {
        self.gesture = None;
        self.abandon_transform()
    }

    fn abandon_transform(&mut self) -> bool {
        if !self.transform.cancel() {
            return false;
        }
        self.grid = self.history.current().clone();
        true
    }

    // -- Documents ---------------------------------------------------------

    /// Replace the grid from instruction text and commit it.
    ///
    /// A non-empty title and the description are taken from the text.
    /// Returns the decoder's diagnostics.
    pub fn import_instructions(&mut self, text: &str) -> Vec<ParseError> {
        self.abandon_transform();
        self.gesture = None;
        let decoded = instructions::decode(text);
        if !decoded.title.is_empty() {
            self.title = decoded.title;
            self.description = decoded.description;
        }
        self.grid = decoded.grid;
        self.history.commit(self.grid.clone());
        decoded.warnings
    }

    pub fn export_instructions(&self) -> String {
        instructions::encode(&self.title, &self.description, &self.grid)
    }

    /// Replace the whole document and reset history to it.
    pub fn load_artwork(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        grid: Grid,
    ) {
        self.abandon_transform();
        self.gesture = None;
        self.title = title.into();
        self.description = description.into();
        self.grid = grid;
        self.history.reset(self.grid.clone());
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
