//! Board state: tile permutation, selection, moves and timer
//!
//! Pure logic. Time is passed in as epoch milliseconds so the board never
//! reads a clock itself.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use crate::config::PuzzleConfig;

/// What a tap did to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    Selected(usize),
    Deselected(usize),
    Swapped { from: usize, to: usize },
}

/// Copy of the mutable board state, taken for saving
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub tiles: Vec<usize>,
    pub move_count: u32,
    pub elapsed_secs: u64,
}

/// The playing grid
#[derive(Debug, Clone)]
pub struct Board {
    config: PuzzleConfig,
    /// `tiles[cell]` is the original index of the tile shown in `cell`
    tiles: Vec<usize>,
    selection: Option<usize>,
    move_count: u32,
    /// Wall-clock anchor of the running timer (None until the first shuffle)
    time_origin_ms: Option<u64>,
    /// Seconds carried over from a restored save
    accumulated_secs: u64,
    rng: Pcg32,
}

impl Board {
    /// Solved board (identity permutation), timer not started
    pub fn new(config: PuzzleConfig, seed: u64) -> Self {
        let tiles = (0..config.tile_count()).collect();
        Self {
            config,
            tiles,
            selection: None,
            move_count: 0,
            time_origin_ms: None,
            accumulated_secs: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn tiles(&self) -> &[usize] {
        &self.tiles
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Original tile index shown at `cell`
    pub fn tile_at(&self, cell: usize) -> Option<usize> {
        self.tiles.get(cell).copied()
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Start over: uniform random permutation, counters and timer reset
    pub fn shuffle(&mut self, now_ms: u64) {
        self.tiles = (0..self.config.tile_count()).collect();
        self.tiles.shuffle(&mut self.rng);
        self.move_count = 0;
        self.selection = None;
        self.time_origin_ms = Some(now_ms);
        self.accumulated_secs = 0;
    }

    /// First tap selects, tapping the selection again deselects, tapping
    /// another cell swaps the two tiles.
    ///
    /// `cell` must be on the board; out-of-range cells are filtered by the
    /// coordinate mapping and are ignored here.
    pub fn select_or_swap(&mut self, cell: usize) -> Option<TapOutcome> {
        if cell >= self.tiles.len() {
            return None;
        }
        let outcome = match self.selection {
            None => {
                self.selection = Some(cell);
                TapOutcome::Selected(cell)
            }
            Some(sel) if sel == cell => {
                self.selection = None;
                TapOutcome::Deselected(cell)
            }
            Some(sel) => {
                self.tiles.swap(sel, cell);
                self.move_count += 1;
                self.selection = None;
                TapOutcome::Swapped { from: sel, to: cell }
            }
        };
        Some(outcome)
    }

    /// Whole seconds played, including time carried over from a save
    pub fn elapsed_secs(&self, now_ms: u64) -> u64 {
        match self.time_origin_ms {
            Some(origin) => self.accumulated_secs + now_ms.saturating_sub(origin) / 1000,
            None => self.accumulated_secs,
        }
    }

    pub fn snapshot(&self, now_ms: u64) -> BoardSnapshot {
        BoardSnapshot {
            tiles: self.tiles.clone(),
            move_count: self.move_count,
            elapsed_secs: self.elapsed_secs(now_ms),
        }
    }

    /// Replace the state wholesale. The timer continues from the restored
    /// baseline. The snapshot is trusted; callers check compatibility first.
    pub fn restore(&mut self, snapshot: BoardSnapshot, now_ms: u64) {
        self.tiles = snapshot.tiles;
        self.move_count = snapshot.move_count;
        self.accumulated_secs = snapshot.elapsed_secs;
        self.time_origin_ms = Some(now_ms);
        self.selection = None;
    }

    /// Every tile back in its original cell
    pub fn is_solved(&self) -> bool {
        self.tiles.iter().enumerate().all(|(i, &t)| i == t)
    }
}

/// True when `tiles` is a permutation of `0..len`
pub fn is_permutation(tiles: &[usize], len: usize) -> bool {
    if tiles.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &t in tiles {
        match seen.get_mut(t) {
            Some(s) if !*s => *s = true,
            _ => return false,
        }
    }
    true
}
