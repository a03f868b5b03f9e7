//! Save/restore of the PPU's minimal architectural state, per the field
//! list the external-interfaces section names: registers, internal
//! counters, VRAM/OAM contents, and scheduler position.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ppu::{Ppu, SCREEN_HEIGHT, SCREEN_WIDTH};

/// A serializable snapshot of everything needed to resume the PPU exactly
/// where it left off. Deliberately excludes the frame buffer: a restored
/// PPU simply renders a fresh frame rather than replaying a stale one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PpuSnapshot {
    pub ppuctrl: u8,
    pub ppumask: u8,
    pub ppustatus: u8,
    pub oam_addr: u8,
    pub v: u16,
    pub t: u16,
    pub fine_x: u8,
    pub write_latch: bool,
    pub read_buffer: u8,
    pub gen_latch: u8,
    pub nametables: Vec<u8>,
    pub palette_ram: Vec<u8>,
    pub oam: Vec<u8>,
    pub scanline: u16,
    pub dot: u16,
    pub odd_frame: bool,
}

/// Errors arising from (de)serializing or restoring a [`PpuSnapshot`].
#[derive(Debug)]
pub enum SaveStateError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// A snapshot whose VRAM/OAM buffers don't match this build's sizes.
    SizeMismatch { field: &'static str, expected: usize, found: usize },
}

impl fmt::Display for SaveStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveStateError::Io(e) => write!(f, "save state I/O error: {e}"),
            SaveStateError::Json(e) => write!(f, "save state encoding error: {e}"),
            SaveStateError::SizeMismatch { field, expected, found } => write!(
                f,
                "save state field `{field}` has {found} bytes, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for SaveStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveStateError::Io(e) => Some(e),
            SaveStateError::Json(e) => Some(e),
            SaveStateError::SizeMismatch { .. } => None,
        }
    }
}

impl From<std::io::Error> for SaveStateError {
    fn from(e: std::io::Error) -> Self {
        SaveStateError::Io(e)
    }
}

impl From<serde_json::Error> for SaveStateError {
    fn from(e: serde_json::Error) -> Self {
        SaveStateError::Json(e)
    }
}

impl PpuSnapshot {
    pub fn to_json(&self) -> Result<String, SaveStateError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SaveStateError> {
        Ok(serde_json::from_str(json)?)
    }
}

const _: () = assert!(SCREEN_WIDTH * SCREEN_HEIGHT > 0);
