//! Grid model
//!
//! The board holds the tile permutation and per-session counters. It has no
//! I/O; geometry for drawing and hit-testing lives in `layout`.

pub mod layout;
pub mod state;

pub use layout::{BoardLayout, fit_canvas_px, map_client_point};
pub use state::{Board, BoardSnapshot, TapOutcome, is_permutation};
