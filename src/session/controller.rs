//! Session state machine over player intents

use glam::DVec2;

use super::events::{DialogMode, Notice, SessionEvent};
use super::host::Host;
use crate::board::{Board, BoardLayout, TapOutcome};
use crate::consts::SLOT_COUNT;
use crate::error::Result;
use crate::persistence::KeyValueStore;
use crate::platform::{Clock, format_clock, format_duration};
use crate::slots::{
    Compatibility, SaveSlot, SlotBank, SlotDescriptor, SlotStore, check_compatibility,
    default_slot_name,
};

/// Result of a slot operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    Saved,
    Loaded,
    Renamed,
    Deleted,
    /// Player dismissed a confirmation or prompt
    Cancelled,
    Empty,
    Incompatible(Compatibility),
    /// Writing the bank failed; nothing changed
    Failed,
    OutOfRange,
}

/// Slot dialog currently on screen, with its working copy of the bank
#[derive(Debug, Clone)]
struct SlotDialog {
    mode: DialogMode,
    bank: SlotBank,
}

pub struct SessionController<S, H, C> {
    board: Board,
    store: SlotStore<S>,
    host: H,
    clock: C,
    key: String,
    preview: bool,
    dialog: Option<SlotDialog>,
    events: Vec<SessionEvent>,
}

impl<S: KeyValueStore, H: Host, C: Clock> SessionController<S, H, C> {
    /// Session for `key`. The board is left as given until `start`/`reset`.
    pub fn new(
        board: Board,
        key: impl Into<String>,
        store: SlotStore<S>,
        host: H,
        clock: C,
    ) -> Self {
        Self {
            board,
            store,
            host,
            clock,
            key: key.into(),
            preview: false,
            dialog: None,
            events: Vec::new(),
        }
    }

    /// Boot sequence: fresh shuffle, then optional autoload, then optionally
    /// open the load dialog.
    pub fn start(&mut self, autoload: bool, manage: bool) {
        self.shuffle();
        if autoload {
            self.autoload();
        }
        if manage {
            self.open_dialog(DialogMode::Load);
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn store(&self) -> &SlotStore<S> {
        &self.store
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.board.elapsed_secs(self.clock.now_ms())
    }

    /// `Moves: 12 · Time: 03:07`
    pub fn status_text(&self) -> String {
        format!(
            "Moves: {} · Time: {}",
            self.board.move_count(),
            format_clock(self.elapsed_secs())
        )
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    fn notice(&mut self, notice: Notice) {
        self.emit(SessionEvent::Notice(notice));
    }

    // === Board intents ===

    /// Tap on a cell. While previewing, the tap only leaves preview.
    pub fn tap(&mut self, cell: usize) -> Option<TapOutcome> {
        if self.preview {
            self.set_preview(false);
            return None;
        }
        let outcome = self.board.select_or_swap(cell)?;
        log::debug!("Tap {}: {:?}", cell, outcome);
        self.emit(SessionEvent::Redraw);
        Some(outcome)
    }

    /// Tap at a canvas-space point; points off the grid are ignored
    pub fn tap_point(&mut self, point: DVec2, layout: &BoardLayout) -> Option<TapOutcome> {
        let cell = layout.cell_at(point)?;
        self.tap(cell)
    }

    fn shuffle(&mut self) {
        self.board.shuffle(self.clock.now_ms());
        log::info!("New shuffle ({} tiles)", self.board.tile_count());
        self.emit(SessionEvent::Redraw);
    }

    /// Reshuffle after the player confirms. Returns whether it happened.
    pub fn request_reset(&mut self) -> bool {
        let message = format!(
            "Reset and clear ({} moves, {})?",
            self.board.move_count(),
            format_duration(self.elapsed_secs())
        );
        if !self.host.confirm(&message) {
            return false;
        }
        self.shuffle();
        self.notice(Notice::NewShuffle);
        true
    }

    pub fn toggle_preview(&mut self) {
        self.set_preview(!self.preview);
    }

    /// Show the unscrambled image instead of the tiles
    pub fn set_preview(&mut self, enabled: bool) {
        self.preview = enabled;
        self.emit(SessionEvent::PreviewChanged(enabled));
        self.emit(SessionEvent::Redraw);
    }

    // === Slot dialog ===

    /// Open the slot dialog, reading the bank fresh from storage
    pub fn open_dialog(&mut self, mode: DialogMode) -> Vec<SlotDescriptor> {
        let bank = self.store.load(&self.key);
        let slots = bank.describe(self.clock.now_ms());
        self.dialog = Some(SlotDialog { mode, bank });
        self.emit(SessionEvent::DialogOpened(mode));
        slots
    }

    pub fn dialog_mode(&self) -> Option<DialogMode> {
        self.dialog.as_ref().map(|d| d.mode)
    }

    /// Descriptors of the open dialog's slots
    pub fn dialog_slots(&self) -> Option<Vec<SlotDescriptor>> {
        let now = self.clock.now_ms();
        self.dialog.as_ref().map(|d| d.bank.describe(now))
    }

    pub fn close_dialog(&mut self) {
        if self.dialog.take().is_some() {
            self.emit(SessionEvent::DialogClosed);
        }
    }

    /// Primary action of the open dialog on slot `index`
    pub fn choose_slot(&mut self, index: usize) -> SlotOutcome {
        match self.dialog_mode() {
            Some(DialogMode::Save) => self.save_to_slot(index),
            _ => self.load_from_slot(index),
        }
    }

    /// The dialog's copy of the bank if one is open, else a fresh read
    fn working_bank(&self) -> SlotBank {
        match &self.dialog {
            Some(dialog) => dialog.bank.clone(),
            None => self.store.load(&self.key),
        }
    }

    /// Persist the whole bank. In-memory copies only change once the write
    /// has succeeded.
    fn commit(&mut self, bank: SlotBank) -> Result<()> {
        if let Err(e) = self.store.persist(&self.key, &bank) {
            log::error!("Could not save slots for '{}': {}", self.key, e);
            self.notice(Notice::SaveFailed);
            return Err(e);
        }
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.bank = bank;
            self.events.push(SessionEvent::SlotsChanged);
        }
        Ok(())
    }

    /// Fresh record of the current board
    fn make_slot(&mut self, now: u64) -> SaveSlot {
        let snapshot = self.board.snapshot(now);
        let config = self.board.config();
        SaveSlot {
            name: None,
            image: config.image().to_string(),
            rows: config.rows(),
            cols: config.cols(),
            tiles: snapshot.tiles,
            move_count: snapshot.move_count,
            elapsed_secs: snapshot.elapsed_secs,
            created_at: now,
            updated_at: now,
            thumb: self.host.thumbnail(),
        }
    }

    /// Save the board into slot `index`, asking before overwriting
    pub fn save_to_slot(&mut self, index: usize) -> SlotOutcome {
        if index >= SLOT_COUNT {
            return SlotOutcome::OutOfRange;
        }
        let mut bank = self.working_bank();
        let existing = bank.get(index).cloned();

        if let Some(old) = &existing {
            let message = format!(
                "Overwrite {} moves / {}?",
                old.move_count,
                format_duration(old.elapsed_secs)
            );
            if !self.host.confirm(&message) {
                return SlotOutcome::Cancelled;
            }
        }

        let default_name = existing
            .as_ref()
            .map(|s| s.display_name(index))
            .unwrap_or_else(|| default_slot_name(index));
        let name = self
            .host
            .prompt("Name this slot", &default_name)
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or(default_name);

        let now = self.clock.now_ms();
        let mut slot = self.make_slot(now);
        slot.name = Some(name);
        if let Some(old) = &existing {
            slot.created_at = old.created_at;
        }
        bank.set(index, slot);

        if self.commit(bank).is_err() {
            return SlotOutcome::Failed;
        }
        log::info!(
            "Saved slot {} ({} moves)",
            index + 1,
            self.board.move_count()
        );
        self.notice(Notice::Saved);
        self.close_dialog();
        SlotOutcome::Saved
    }

    /// Restore slot `index` if it exists and fits this puzzle
    pub fn load_from_slot(&mut self, index: usize) -> SlotOutcome {
        if index >= SLOT_COUNT {
            return SlotOutcome::OutOfRange;
        }
        let bank = self.working_bank();
        let Some(slot) = bank.get(index) else {
            self.notice(Notice::EmptySlot);
            return SlotOutcome::Empty;
        };
        let compat = self.apply_slot(slot);
        if !compat.is_compatible() {
            log::warn!("Slot {} not loaded: {:?}", index + 1, compat);
            self.notice(Notice::Incompatible);
            return SlotOutcome::Incompatible(compat);
        }
        log::info!("Loaded slot {}", index + 1);
        self.notice(Notice::Loaded);
        self.close_dialog();
        SlotOutcome::Loaded
    }

    /// Restore `slot` onto the board when compatible
    fn apply_slot(&mut self, slot: &SaveSlot) -> Compatibility {
        let compat = check_compatibility(Some(slot), self.board.config());
        if compat.is_compatible() {
            self.board.restore(slot.snapshot(), self.clock.now_ms());
            self.emit(SessionEvent::Redraw);
        }
        compat
    }

    /// Rename slot `index`. Renaming an empty slot saves the current board
    /// into it under the new name.
    pub fn rename_slot(&mut self, index: usize) -> SlotOutcome {
        if index >= SLOT_COUNT {
            return SlotOutcome::OutOfRange;
        }
        let mut bank = self.working_bank();
        let default_name = bank
            .get(index)
            .map(|s| s.display_name(index))
            .unwrap_or_else(|| default_slot_name(index));
        let Some(name) = self
            .host
            .prompt("New name", &default_name)
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
        else {
            return SlotOutcome::Cancelled;
        };

        let now = self.clock.now_ms();
        if !bank.is_occupied(index) {
            let slot = self.make_slot(now);
            bank.set(index, slot);
        }
        if let Some(slot) = bank.get_mut(index) {
            slot.name = Some(name);
            slot.updated_at = now;
        }

        if self.commit(bank).is_err() {
            return SlotOutcome::Failed;
        }
        SlotOutcome::Renamed
    }

    /// Empty slot `index` after the player confirms
    pub fn delete_slot(&mut self, index: usize) -> SlotOutcome {
        if index >= SLOT_COUNT {
            return SlotOutcome::OutOfRange;
        }
        if !self.host.confirm("Delete this slot?") {
            return SlotOutcome::Cancelled;
        }
        let mut bank = self.working_bank();
        bank.clear(index);
        if self.commit(bank).is_err() {
            return SlotOutcome::Failed;
        }
        log::info!("Deleted slot {}", index + 1);
        SlotOutcome::Deleted
    }

    /// Restore the most recently updated slot, if any fits this puzzle.
    /// Silent: no notices either way.
    pub fn autoload(&mut self) -> Option<usize> {
        let bank = self.store.load(&self.key);
        let index = bank.most_recent()?;
        let slot = bank.get(index)?;
        let compat = self.apply_slot(slot);
        if compat.is_compatible() {
            log::info!("Autoloaded slot {}", index + 1);
            Some(index)
        } else {
            log::warn!("Autoload skipped slot {}: {:?}", index + 1, compat);
            None
        }
    }
}
