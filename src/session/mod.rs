//! Session controller
//!
//! Owns the board, the slot store and the host collaborators, and turns user
//! intents (tap, reset, save, load, rename, delete, preview) into board and
//! slot changes. Everything runs on one thread, one event at a time; output
//! for the adapter is queued as `SessionEvent`s.

pub mod controller;
pub mod events;
pub mod host;

pub use controller::{SessionController, SlotOutcome};
pub use events::{DialogMode, Notice, SessionEvent};
pub use host::{Host, ScriptedHost};
