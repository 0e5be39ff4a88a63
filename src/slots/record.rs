//! Save slot records and the three-slot bank
//!
//! Field names follow the JSON written by earlier browser builds, so existing
//! LocalStorage saves keep loading.

use serde::{Deserialize, Serialize};

use crate::board::BoardSnapshot;
use crate::consts::SLOT_COUNT;
use crate::platform::{format_date, format_duration};

/// One saved game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSlot {
    pub name: Option<String>,
    /// Source image identity the save was made against
    #[serde(rename = "imgUrl")]
    pub image: String,
    pub rows: usize,
    pub cols: usize,
    pub tiles: Vec<usize>,
    #[serde(rename = "moves")]
    pub move_count: u32,
    #[serde(rename = "elapsed")]
    pub elapsed_secs: u64,
    /// Epoch milliseconds
    pub created_at: u64,
    pub updated_at: u64,
    /// Encoded raster preview (data URL)
    #[serde(default)]
    pub thumb: Option<String>,
}

impl SaveSlot {
    /// Board state stored in this slot
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            tiles: self.tiles.clone(),
            move_count: self.move_count,
            elapsed_secs: self.elapsed_secs,
        }
    }

    /// Name shown in lists, `Slot N` when unnamed
    pub fn display_name(&self, index: usize) -> String {
        self.name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| default_slot_name(index))
    }
}

/// `Slot 1` .. `Slot 3`
pub fn default_slot_name(index: usize) -> String {
    format!("Slot {}", index + 1)
}

/// Exactly three slots, each saved or empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotBank {
    slots: [Option<SaveSlot>; SLOT_COUNT],
}

impl SlotBank {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&SaveSlot> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut SaveSlot> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Store `slot` at `index`; out-of-range indices are ignored
    pub fn set(&mut self, index: usize, slot: SaveSlot) {
        if let Some(entry) = self.slots.get_mut(index) {
            *entry = Some(slot);
        }
    }

    pub fn clear(&mut self, index: usize) {
        if let Some(entry) = self.slots.get_mut(index) {
            *entry = None;
        }
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&SaveSlot>> {
        self.slots.iter().map(Option::as_ref)
    }

    /// Occupied slot with the greatest `updated_at`; ties go to the lowest index
    pub fn most_recent(&self) -> Option<usize> {
        let mut best: Option<(usize, u64)> = None;
        for (i, slot) in self.slots.iter().enumerate() {
            if let Some(slot) = slot
                && best.is_none_or(|(_, ts)| slot.updated_at > ts)
            {
                best = Some((i, slot.updated_at));
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn describe(&self, now_ms: u64) -> Vec<SlotDescriptor> {
        self.iter()
            .enumerate()
            .map(|(i, slot)| SlotDescriptor::new(i, slot, now_ms))
            .collect()
    }
}

/// What the slot dialog shows for one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDescriptor {
    pub index: usize,
    pub occupied: bool,
    pub title: String,
    pub meta: String,
    pub thumbnail: Option<String>,
}

impl SlotDescriptor {
    pub fn new(index: usize, slot: Option<&SaveSlot>, now_ms: u64) -> Self {
        match slot {
            Some(slot) => Self {
                index,
                occupied: true,
                title: slot.display_name(index),
                meta: format!(
                    "Updated {} • {} moves • {}",
                    format_date(now_ms, slot.updated_at),
                    slot.move_count,
                    format_duration(slot.elapsed_secs)
                ),
                thumbnail: slot.thumb.clone(),
            },
            None => Self {
                index,
                occupied: false,
                title: format!("Empty Slot {}", index + 1),
                meta: "Empty".to_string(),
                thumbnail: None,
            },
        }
    }
}
