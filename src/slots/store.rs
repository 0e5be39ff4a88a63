//! Slot bank persistence and compatibility checks

use crate::board::is_permutation;
use crate::config::{PuzzleConfig, storage_key};
use crate::error::Result;
use crate::persistence::KeyValueStore;

use super::record::{SaveSlot, SlotBank};

/// Why a slot can or cannot be applied to the live board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compatibility {
    Compatible,
    Empty,
    /// Saved against a different source image
    ImageMismatch,
    /// Saved with different rows/columns
    SizeMismatch,
    /// Tile list is not a permutation of the board
    CorruptTiles,
}

impl Compatibility {
    pub fn is_compatible(self) -> bool {
        self == Compatibility::Compatible
    }
}

/// Check whether `slot` may be restored onto a board built from `config`
pub fn check_compatibility(slot: Option<&SaveSlot>, config: &PuzzleConfig) -> Compatibility {
    let Some(slot) = slot else {
        return Compatibility::Empty;
    };
    if slot.image != config.image() {
        Compatibility::ImageMismatch
    } else if slot.rows != config.rows() || slot.cols != config.cols() {
        Compatibility::SizeMismatch
    } else if !is_permutation(&slot.tiles, config.tile_count()) {
        Compatibility::CorruptTiles
    } else {
        Compatibility::Compatible
    }
}

/// Reads and writes slot banks, one per puzzle key
#[derive(Debug, Clone)]
pub struct SlotStore<S> {
    backend: S,
}

impl<S: KeyValueStore> SlotStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Bank for `key`. Missing, unreadable or corrupt data gives an empty bank.
    pub fn load(&self, key: &str) -> SlotBank {
        let storage_key = storage_key(key);
        let json = match self.backend.get_item(&storage_key) {
            Ok(Some(json)) => json,
            Ok(None) => return SlotBank::empty(),
            Err(e) => {
                log::warn!("Could not read {}: {}", storage_key, e);
                return SlotBank::empty();
            }
        };
        match serde_json::from_str::<Option<SlotBank>>(&json) {
            Ok(bank) => bank.unwrap_or_default(),
            Err(e) => {
                log::warn!("Ignoring corrupt slot data in {}: {}", storage_key, e);
                SlotBank::empty()
            }
        }
    }

    /// Replace the stored bank for `key` with `bank`
    pub fn persist(&mut self, key: &str, bank: &SlotBank) -> Result<()> {
        let json = serde_json::to_string(bank)?;
        self.backend.set_item(&storage_key(key), &json)?;
        log::info!("Slots saved for '{}'", key);
        Ok(())
    }
}
