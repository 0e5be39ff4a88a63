//! Puzzle configuration and boot options
//!
//! `PuzzleConfig` is fixed once the source image has loaded. `BootOptions`
//! comes from the page query string (`?key=...&autoload=1&manage=1`).

use percent_encoding::percent_decode_str;

use crate::consts::*;
use crate::error::{PuzzleError, Result};

/// Static description of the puzzle being played
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleConfig {
    rows: usize,
    cols: usize,
    /// Source image identity (URL or content hash)
    image: String,
}

impl PuzzleConfig {
    pub fn new(rows: usize, cols: usize, image: impl Into<String>) -> Result<Self> {
        let image = image.into();
        if rows == 0 || cols == 0 {
            return Err(PuzzleError::invalid_config(format!(
                "grid must have at least one row and column (got {rows}x{cols})"
            )));
        }
        let tiles = rows.checked_mul(cols).ok_or_else(|| {
            PuzzleError::invalid_config(format!("grid of {rows}x{cols} tiles is too large"))
        })?;
        if tiles < 2 {
            return Err(PuzzleError::invalid_config("grid needs at least two tiles"));
        }
        if image.trim().is_empty() {
            return Err(PuzzleError::invalid_config("image identity is empty"));
        }
        Ok(Self { rows, cols, image })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    /// Number of tiles on the board (checked against overflow in `new`)
    pub fn tile_count(&self) -> usize {
        self.rows * self.cols
    }
}

/// Entry flags read at boot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootOptions {
    /// Puzzle identity key; slot banks are stored per key
    pub key: String,
    /// Restore the most recently updated slot
    pub autoload: bool,
    /// Open the load dialog immediately
    pub manage: bool,
}

impl Default for BootOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_KEY.to_string(),
            autoload: false,
            manage: false,
        }
    }
}

impl BootOptions {
    /// Parse from a query string such as `?key=beach&autoload=1`.
    ///
    /// A missing or blank `key` falls back to `default_key`. Flags are only
    /// set by the literal value `1`.
    pub fn from_query(search: &str, default_key: &str) -> Self {
        let key = query_param(search, "key")
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| default_key.to_string());
        Self {
            key,
            autoload: query_param(search, "autoload").as_deref() == Some("1"),
            manage: query_param(search, "manage").as_deref() == Some("1"),
        }
    }

    /// Storage key of the slot bank for this puzzle
    pub fn storage_key(&self) -> String {
        storage_key(&self.key)
    }
}

/// Storage key of the slot bank for `key`
pub fn storage_key(key: &str) -> String {
    format!("{STORAGE_PREFIX}{key}")
}

/// First value of `name` in a query string, percent-decoded
pub fn query_param(search: &str, name: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    s.split('&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let mut it = pair.splitn(2, '=');
            let k = it.next()?;
            let v = it.next().unwrap_or("");
            (url_decode(k) == name).then(|| url_decode(v))
        })
}

fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    match percent_decode_str(&s).decode_utf8() {
        Ok(v) => v.into_owned(),
        Err(_) => s.clone(),
    }
}
