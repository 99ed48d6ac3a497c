//! Eyedropper pick normalization.

use super::error::ParseColorError;
use super::rgba::{Color, Rgba};

/// Drawing color used when the eyedropper picks an empty cell.
pub const DEFAULT_PICK: Rgba = Rgba::opaque(255, 255, 255);

/// Normalize a picked cell into an opaque drawing color.
///
/// Alpha is dropped. Picking [`Color::Empty`] yields [`DEFAULT_PICK`] so
/// the drawing color is always usable.
pub fn pick(cell: Color) -> Rgba {
    match cell {
        Color::Empty => DEFAULT_PICK,
        Color::Rgba(c) => Rgba::opaque(c.r, c.g, c.b),
    }
}

/// String form of [`pick`]: accepts `transparent`, `#RRGGBB` or the
/// canonical `rgba(...)` form and returns `#RRGGBB`.
///
/// ```
/// assert_eq!(pixel_grid::pick_hex("rgba(255,0,128,0.5)").unwrap(), "#FF0080");
/// assert_eq!(pixel_grid::pick_hex("transparent").unwrap(), "#FFFFFF");
/// ```
pub fn pick_hex(input: &str) -> Result<String, ParseColorError> {
    let cell: Color = input.parse()?;
    Ok(pick(cell).to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_empty_falls_back_to_white() {
        assert_eq!(pick(Color::Empty), DEFAULT_PICK);
        assert_eq!(pick_hex("transparent").unwrap(), "#FFFFFF");
    }

    #[test]
    fn test_pick_drops_alpha() {
        let picked = pick(Color::Rgba(Rgba::new(10, 20, 30, 40)));
        assert_eq!(picked, Rgba::opaque(10, 20, 30));
    }

    #[test]
    fn test_pick_hex_accepts_all_forms() {
        assert_eq!(pick_hex("#00ff00").unwrap(), "#00FF00");
        assert_eq!(pick_hex("rgba(1,2,3,1)").unwrap(), "#010203");
        assert_eq!(pick_hex("rgba(1, 2, 3, 0.2)").unwrap(), "#010203");
    }

    #[test]
    fn test_pick_hex_rejects_garbage() {
        assert!(pick_hex("not a color").is_err());
    }
}
