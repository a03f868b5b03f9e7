//! A cycle-accurate NES/Famicom PPU (2C02-family) core.
//!
//! This crate models the picture processing unit in isolation: its
//! register file, internal scroll counters, background/sprite pipelines,
//! compositor, and dot-accurate scheduler. It does not parse ROMs, emulate
//! a CPU, or convert palette indices to RGB — those are the job of a
//! collaborating "bus master" and a downstream video layer, per
//! [`scheduler::BusMaster`].

pub mod cartridge;
pub mod diagnostics;
pub mod ppu;
pub mod save_state;
pub mod scheduler;

pub use cartridge::{CartridgeError, Mapper, Mirroring};
pub use diagnostics::{EventSink, NullSink, PpuEvent};
pub use ppu::{
    Ppu, TvSystem, FRAME_PIXEL_BG_FLAG, FRAME_PIXEL_VALID_FLAG, SCREEN_HEIGHT, SCREEN_WIDTH,
};
pub use save_state::{PpuSnapshot, SaveStateError};
pub use scheduler::{BusMaster, Scheduler};
