//! Session behavior when the slot bank cannot be written

use pebble::board::Board;
use pebble::persistence::{FileStore, KeyValueStore, MemoryStore};
use pebble::platform::ManualClock;
use pebble::session::{
    DialogMode, Notice, ScriptedHost, SessionController, SessionEvent, SlotOutcome,
};
use pebble::slots::{SaveSlot, SlotBank, SlotStore};
use pebble::{PuzzleConfig, PuzzleError, Result};

/// Reads pass through; every write fails like a full quota
struct QuotaExceeded {
    inner: MemoryStore,
}

impl KeyValueStore for QuotaExceeded {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> Result<()> {
        Err(PuzzleError::storage("quota exceeded"))
    }

    fn remove_item(&mut self, _key: &str) -> Result<()> {
        Err(PuzzleError::storage("quota exceeded"))
    }
}

fn config() -> PuzzleConfig {
    PuzzleConfig::new(4, 4, "pebble.jpg").unwrap()
}

fn start<S: KeyValueStore>(
    store: S,
    clock: &ManualClock,
) -> SessionController<S, ScriptedHost, ManualClock> {
    let mut s = SessionController::new(
        Board::new(config(), 11),
        "puzzle",
        SlotStore::new(store),
        ScriptedHost::new(),
        clock.clone(),
    );
    s.start(false, false);
    s.tap(0);
    s.tap(1);
    s.drain_events();
    s
}

fn saved_slot() -> SaveSlot {
    SaveSlot {
        name: Some("Kept".to_string()),
        image: "pebble.jpg".to_string(),
        rows: 4,
        cols: 4,
        tiles: (0..16).rev().collect(),
        move_count: 9,
        elapsed_secs: 30,
        created_at: 100,
        updated_at: 200,
        thumb: None,
    }
}

/// Memory-backed store holding one saved game in slot 2
fn prefilled() -> QuotaExceeded {
    let inner = MemoryStore::new();
    let mut bank = SlotBank::empty();
    bank.set(1, saved_slot());
    SlotStore::new(inner.clone()).persist("puzzle", &bank).unwrap();
    QuotaExceeded { inner }
}

#[test]
fn failed_save_leaves_dialog_and_board_alone() {
    let clock = ManualClock::new(1_000);
    let mut s = start(prefilled(), &clock);
    s.open_dialog(DialogMode::Save);
    s.drain_events();
    let before = s.dialog_slots().unwrap();
    let tiles = s.board().tiles().to_vec();

    assert_eq!(s.save_to_slot(0), SlotOutcome::Failed);
    assert_eq!(s.drain_events(), vec![SessionEvent::Notice(Notice::SaveFailed)]);
    assert_eq!(s.dialog_mode(), Some(DialogMode::Save));
    assert_eq!(s.dialog_slots().unwrap(), before);
    assert_eq!(s.board().tiles(), tiles.as_slice());
    assert_eq!(s.board().move_count(), 1);
    assert!(!s.store().load("puzzle").is_occupied(0));
}

#[test]
fn failed_rename_keeps_old_name() {
    let clock = ManualClock::new(1_000);
    let mut s = start(prefilled(), &clock);
    s.open_dialog(DialogMode::Load);
    s.drain_events();

    s.host_mut().push_prompt(Some("Beach"));
    assert_eq!(s.rename_slot(1), SlotOutcome::Failed);
    assert_eq!(s.drain_events(), vec![SessionEvent::Notice(Notice::SaveFailed)]);
    assert_eq!(s.dialog_slots().unwrap()[1].title, "Kept");
    assert_eq!(
        s.store().load("puzzle").get(1).unwrap().name.as_deref(),
        Some("Kept")
    );
}

#[test]
fn failed_delete_keeps_slot() {
    let clock = ManualClock::new(1_000);
    let mut s = start(prefilled(), &clock);
    s.open_dialog(DialogMode::Load);
    s.drain_events();

    s.host_mut().push_confirm(true);
    assert_eq!(s.delete_slot(1), SlotOutcome::Failed);
    assert_eq!(s.drain_events(), vec![SessionEvent::Notice(Notice::SaveFailed)]);
    assert!(s.dialog_slots().unwrap()[1].occupied);
    assert!(s.store().load("puzzle").is_occupied(1));
    assert_eq!(s.load_from_slot(1), SlotOutcome::Loaded);
}

#[test]
fn unwritable_file_store_does_not_serve_unsaved_bank() {
    // A regular file where the store's directory should be
    let blocker = std::env::temp_dir().join(format!("pebble-blocker-{}", std::process::id()));
    std::fs::write(&blocker, "").unwrap();
    let store = FileStore::open(blocker.join("slots.json"));

    let clock = ManualClock::new(1_000);
    let mut s = start(store, &clock);
    assert_eq!(s.save_to_slot(0), SlotOutcome::Failed);
    assert!(!s.store().load("puzzle").is_occupied(0));
    assert_eq!(s.load_from_slot(0), SlotOutcome::Empty);

    let _ = std::fs::remove_file(&blocker);
}
