//! Pebble - a swap-tile image puzzle with local save slots
//!
//! Core modules:
//! - `board`: Tile permutation, selection, move counter and timer (pure logic)
//! - `slots`: Three save slots per puzzle key, persisted as one JSON bank
//! - `session`: Event-driven controller tying the board and slots together
//! - `persistence`: Key-value backends (LocalStorage, file, memory)
//! - `platform`: Clock and human-readable time text
//! - `renderer`: Canvas 2D drawing (wasm only)

pub mod board;
pub mod config;
pub mod error;
pub mod persistence;
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod session;
pub mod slots;

pub use board::{Board, BoardLayout, BoardSnapshot};
pub use config::{BootOptions, PuzzleConfig};
pub use error::{PuzzleError, Result};
pub use session::{DialogMode, Host, Notice, SessionController, SessionEvent};
pub use slots::{SaveSlot, SlotBank, SlotDescriptor, SlotStore};

/// Game configuration constants
pub mod consts {
    /// Default grid dimensions
    pub const DEFAULT_ROWS: usize = 24;
    pub const DEFAULT_COLS: usize = 25;
    /// Puzzle key used when the page does not pass `?key=`
    pub const DEFAULT_KEY: &str = "puzzle";

    /// Save slots per puzzle key
    pub const SLOT_COUNT: usize = 3;
    /// Prefix of the storage key holding a slot bank
    pub const STORAGE_PREFIX: &str = "pebbleSlots::";

    /// Thumbnail edge in pixels (square)
    pub const THUMB_SIZE: u32 = 140;
    /// JPEG quality for thumbnails
    pub const THUMB_QUALITY: f64 = 0.7;

    /// Canvas CSS side is clamped to this range before DPR scaling
    pub const CANVAS_MIN_PX: f64 = 400.0;
    pub const CANVAS_MAX_PX: f64 = 1024.0;

    /// How long a notice stays on screen
    pub const TOAST_MS: i32 = 1500;
}
