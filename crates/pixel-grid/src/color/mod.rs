//! Cell colors and their string forms.
//!
//! Grid cells hold a [`Color`]: either the [`Color::Empty`] sentinel or an
//! 8-bit [`Rgba`] value. Strings only appear at the edges (instruction
//! text, saved artwork, the HTTP API), where the canonical forms are
//! `transparent` and `rgba(r,g,b,a)` with a fractional alpha.

mod error;
mod eyedropper;
mod rgba;

pub use error::ParseColorError;
pub use eyedropper::{pick, pick_hex, DEFAULT_PICK};
pub use rgba::{Color, Rgba};
