//! Single-character palette tokens.

use crate::grid::CELL_COUNT;

const EXTENDED_START: u32 = 0x0100;

/// Token for the palette entry at `index`, or `None` past [`CELL_COUNT`].
///
/// `A`-`Z` first, so palettes of up to 26 colors use plain uppercase
/// letters. Then `a`-`z`, `0`-`9`, and Latin Extended letters from U+0100.
pub fn token(index: usize) -> Option<char> {
    if index >= CELL_COUNT {
        return None;
    }
    let index = index as u32;
    match index {
        0..=25 => char::from_u32('A' as u32 + index),
        26..=51 => char::from_u32('a' as u32 + index - 26),
        52..=61 => char::from_u32('0' as u32 + index - 52),
        _ => char::from_u32(EXTENDED_START + index - 62),
    }
}

/// Every token a grid can need, in assignment order.
pub fn tokens() -> impl Iterator<Item = char> {
    (0..CELL_COUNT).map_while(token)
}
