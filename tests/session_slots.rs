//! Save/load behavior of a session against an in-memory store

use pebble::board::Board;
use pebble::persistence::{KeyValueStore, MemoryStore};
use pebble::platform::ManualClock;
use pebble::session::{Notice, ScriptedHost, SessionController, SessionEvent, SlotOutcome};
use pebble::slots::{Compatibility, SaveSlot, SlotBank, SlotStore};
use pebble::PuzzleConfig;

type Session = SessionController<MemoryStore, ScriptedHost, ManualClock>;

fn session_with(config: PuzzleConfig, store: &MemoryStore, clock: &ManualClock) -> Session {
    let mut s = SessionController::new(
        Board::new(config, 42),
        "puzzle",
        SlotStore::new(store.clone()),
        ScriptedHost::new(),
        clock.clone(),
    );
    s.start(false, false);
    s.drain_events();
    s
}

fn session(store: &MemoryStore, clock: &ManualClock) -> Session {
    session_with(PuzzleConfig::new(4, 4, "pebble.jpg").unwrap(), store, clock)
}

fn stored_slot(image: &str, rows: usize, cols: usize, updated_at: u64) -> SaveSlot {
    let n = rows * cols;
    SaveSlot {
        name: Some(format!("at {updated_at}")),
        image: image.to_string(),
        rows,
        cols,
        tiles: (0..n).rev().collect(),
        move_count: updated_at as u32,
        elapsed_secs: 10,
        created_at: 0,
        updated_at,
        thumb: None,
    }
}

fn write_bank(store: &MemoryStore, bank: &SlotBank) {
    let mut slots = SlotStore::new(store.clone());
    slots.persist("puzzle", bank).unwrap();
}

#[test]
fn save_then_load_round_trip() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(1_000_000);
    let mut s = session(&store, &clock);

    s.tap(0);
    s.tap(5);
    clock.advance_secs(42);
    let tiles = s.board().tiles().to_vec();
    let moves = s.board().move_count();

    s.host_mut().push_prompt(Some("X"));
    assert_eq!(s.save_to_slot(0), SlotOutcome::Saved);
    assert!(s.drain_events().contains(&SessionEvent::Notice(Notice::Saved)));

    // Scramble further, then come back.
    s.tap(1);
    s.tap(2);
    clock.advance_secs(100);
    assert_eq!(s.load_from_slot(0), SlotOutcome::Loaded);

    assert_eq!(s.board().tiles(), tiles.as_slice());
    assert_eq!(s.board().move_count(), moves);
    assert_eq!(s.elapsed_secs(), 42);
    assert_eq!(
        s.store().load("puzzle").get(0).unwrap().name.as_deref(),
        Some("X")
    );
}

#[test]
fn load_empty_slot_changes_nothing() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(0);
    let mut s = session(&store, &clock);
    s.tap(0);
    s.tap(1);
    let tiles = s.board().tiles().to_vec();

    assert_eq!(s.load_from_slot(1), SlotOutcome::Empty);
    assert_eq!(s.board().tiles(), tiles.as_slice());
    assert_eq!(s.board().move_count(), 1);
    assert_eq!(
        s.drain_events(),
        vec![
            SessionEvent::Redraw,
            SessionEvent::Redraw,
            SessionEvent::Notice(Notice::EmptySlot)
        ]
    );
}

#[test]
fn load_mismatched_slot_changes_nothing() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(0);
    let mut bank = SlotBank::empty();
    bank.set(0, stored_slot("other.jpg", 4, 4, 5));
    bank.set(1, stored_slot("pebble.jpg", 3, 4, 5));
    let mut corrupt = stored_slot("pebble.jpg", 4, 4, 5);
    corrupt.tiles[0] = corrupt.tiles[1];
    bank.set(2, corrupt);
    write_bank(&store, &bank);

    let mut s = session(&store, &clock);
    let tiles = s.board().tiles().to_vec();

    let expected = [
        Compatibility::ImageMismatch,
        Compatibility::SizeMismatch,
        Compatibility::CorruptTiles,
    ];
    for (i, compat) in expected.into_iter().enumerate() {
        assert_eq!(s.load_from_slot(i), SlotOutcome::Incompatible(compat));
        assert_eq!(s.board().tiles(), tiles.as_slice());
        assert_eq!(s.board().move_count(), 0);
    }
    let notices = s
        .drain_events()
        .into_iter()
        .filter(|e| *e == SessionEvent::Notice(Notice::Incompatible))
        .count();
    assert_eq!(notices, 3);
}

#[test]
fn autoload_picks_latest_slot() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(0);
    let mut bank = SlotBank::empty();
    bank.set(0, stored_slot("pebble.jpg", 4, 4, 100));
    bank.set(1, stored_slot("pebble.jpg", 4, 4, 300));
    bank.set(2, stored_slot("pebble.jpg", 4, 4, 200));
    write_bank(&store, &bank);

    let mut s = session(&store, &clock);
    assert_eq!(s.autoload(), Some(1));
    assert_eq!(s.board().move_count(), 300);
}

#[test]
fn autoload_ties_go_to_lowest_index() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(0);
    let mut bank = SlotBank::empty();
    bank.set(1, stored_slot("pebble.jpg", 4, 4, 300));
    bank.set(2, stored_slot("pebble.jpg", 4, 4, 300));
    write_bank(&store, &bank);

    let mut s = session(&store, &clock);
    assert_eq!(s.autoload(), Some(1));
}

#[test]
fn autoload_enforces_compatibility_silently() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(0);
    let mut bank = SlotBank::empty();
    bank.set(0, stored_slot("pebble.jpg", 4, 4, 100));
    bank.set(1, stored_slot("other.jpg", 4, 4, 300));
    write_bank(&store, &bank);

    let mut s = session(&store, &clock);
    let tiles = s.board().tiles().to_vec();
    assert_eq!(s.autoload(), None);
    assert_eq!(s.board().tiles(), tiles.as_slice());
    assert!(s.drain_events().is_empty());
}

#[test]
fn start_with_flags_autoloads_and_opens_dialog() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(0);
    let mut bank = SlotBank::empty();
    bank.set(2, stored_slot("pebble.jpg", 4, 4, 100));
    write_bank(&store, &bank);

    let config = PuzzleConfig::new(4, 4, "pebble.jpg").unwrap();
    let mut s = SessionController::new(
        Board::new(config, 1),
        "puzzle",
        SlotStore::new(store.clone()),
        ScriptedHost::new(),
        clock.clone(),
    );
    s.start(true, true);
    assert_eq!(s.board().tiles(), (0..16).rev().collect::<Vec<_>>().as_slice());
    assert!(s.dialog_mode().is_some());
    let slots = s.dialog_slots().unwrap();
    assert_eq!(slots[2].title, "at 100");
}

#[test]
fn delete_then_load_reports_empty() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(0);
    let mut s = session(&store, &clock);
    assert_eq!(s.save_to_slot(2), SlotOutcome::Saved);
    assert_eq!(s.delete_slot(2), SlotOutcome::Deleted);
    assert_eq!(s.load_from_slot(2), SlotOutcome::Empty);
    assert_eq!(
        store.get_item("pebbleSlots::puzzle").unwrap().as_deref(),
        Some("[null,null,null]")
    );
}

#[test]
fn rename_empty_slot_saves_snapshot() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(5_000);
    let mut s = session(&store, &clock);
    s.tap(3);
    s.tap(7);
    clock.advance_secs(30);

    s.host_mut().thumb = Some("data:image/jpeg;base64,xyz".to_string());
    s.host_mut().push_prompt(Some("Morning"));
    assert_eq!(s.rename_slot(1), SlotOutcome::Renamed);

    let bank = s.store().load("puzzle");
    let slot = bank.get(1).unwrap();
    assert_eq!(slot.name.as_deref(), Some("Morning"));
    assert_eq!(slot.tiles, s.board().tiles());
    assert_eq!(slot.move_count, 1);
    assert_eq!(slot.elapsed_secs, 30);
    assert_eq!(slot.image, "pebble.jpg");
    assert_eq!((slot.rows, slot.cols), (4, 4));
    assert_eq!(slot.created_at, 35_000);
    assert_eq!(slot.updated_at, 35_000);
    assert!(slot.thumb.is_some());
}

#[test]
fn rename_existing_slot_keeps_board_data() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(0);
    let mut s = session(&store, &clock);
    s.save_to_slot(0);
    let saved = s.store().load("puzzle").get(0).cloned().unwrap();

    s.tap(0);
    s.tap(1);
    clock.advance_secs(10);
    s.host_mut().push_prompt(Some("Renamed"));
    assert_eq!(s.rename_slot(0), SlotOutcome::Renamed);

    let renamed = s.store().load("puzzle").get(0).cloned().unwrap();
    assert_eq!(renamed.name.as_deref(), Some("Renamed"));
    assert_eq!(renamed.tiles, saved.tiles);
    assert_eq!(renamed.move_count, saved.move_count);
    assert_eq!(renamed.updated_at, 10_000);
}

#[test]
fn rename_cancel_changes_nothing() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(0);
    let mut s = session(&store, &clock);
    s.host_mut().push_prompt(None);
    assert_eq!(s.rename_slot(0), SlotOutcome::Cancelled);
    s.host_mut().push_prompt(Some(""));
    assert_eq!(s.rename_slot(0), SlotOutcome::Cancelled);
    assert!(store.is_empty());
}

#[test]
fn corrupt_storage_reads_as_empty() {
    let mut store = MemoryStore::new();
    store
        .set_item("pebbleSlots::puzzle", "[{\"broken\":true},null")
        .unwrap();
    let clock = ManualClock::new(0);
    let mut s = session(&store, &clock);
    let slots = s.open_dialog(pebble::DialogMode::Load);
    assert!(slots.iter().all(|d| !d.occupied));
    assert_eq!(s.load_from_slot(0), SlotOutcome::Empty);
    assert_eq!(s.autoload(), None);
}

#[test]
fn banks_are_separate_per_key() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(0);
    let mut s = session(&store, &clock);
    s.save_to_slot(0);

    let config = PuzzleConfig::new(4, 4, "pebble.jpg").unwrap();
    let mut other = SessionController::new(
        Board::new(config, 3),
        "beach",
        SlotStore::new(store.clone()),
        ScriptedHost::new(),
        clock.clone(),
    );
    assert_eq!(other.load_from_slot(0), SlotOutcome::Empty);
}
