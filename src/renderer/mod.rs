//! Canvas 2D rendering module
//!
//! Draws the tile grid (or the whole image in preview) and produces slot
//! thumbnails. Geometry comes from `board::layout`.

pub mod canvas;

pub use canvas::{CanvasRenderer, thumbnail};
