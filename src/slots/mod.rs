//! Save slots
//!
//! Each puzzle key owns a bank of three slots, stored as a single JSON value
//! and always rewritten whole.

pub mod record;
pub mod store;

pub use record::{SaveSlot, SlotBank, SlotDescriptor, default_slot_name};
pub use store::{Compatibility, SlotStore, check_compatibility};
