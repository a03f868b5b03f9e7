//! Bridges the PPU's private fields to the public [`PpuSnapshot`] shape.
//! Lives inside the `ppu` module tree so it can see the fields directly
//! rather than needing a getter for every one of them.

use super::Ppu;
use crate::save_state::{PpuSnapshot, SaveStateError};

impl Ppu {
    /// Capture every field listed as minimal save state.
    pub fn snapshot(&self) -> PpuSnapshot {
        PpuSnapshot {
            ppuctrl: self.ppuctrl,
            ppumask: self.ppumask,
            ppustatus: self.ppustatus,
            oam_addr: self.oam_addr,
            v: self.v,
            t: self.t,
            fine_x: self.fine_x,
            write_latch: self.write_latch,
            read_buffer: self.read_buffer,
            gen_latch: self.gen_latch,
            nametables: self.bus.nametables().to_vec(),
            palette_ram: self.bus.palette_ram().to_vec(),
            oam: self.oam.to_vec(),
            scanline: self.scanline,
            dot: self.dot,
            odd_frame: self.odd_frame,
        }
    }

    /// Restore state previously captured by [`Ppu::snapshot`]. The frame
    /// buffer is left untouched; the next frame simply overwrites it.
    pub fn restore(&mut self, snapshot: &PpuSnapshot) -> Result<(), SaveStateError> {
        let nt_expected = self.bus.nametables().len();
        if snapshot.nametables.len() != nt_expected {
            return Err(SaveStateError::SizeMismatch {
                field: "nametables",
                expected: nt_expected,
                found: snapshot.nametables.len(),
            });
        }
        let pal_expected = self.bus.palette_ram().len();
        if snapshot.palette_ram.len() != pal_expected {
            return Err(SaveStateError::SizeMismatch {
                field: "palette_ram",
                expected: pal_expected,
                found: snapshot.palette_ram.len(),
            });
        }
        if snapshot.oam.len() != 256 {
            return Err(SaveStateError::SizeMismatch {
                field: "oam",
                expected: 256,
                found: snapshot.oam.len(),
            });
        }

        self.ppuctrl = snapshot.ppuctrl;
        self.ppumask = snapshot.ppumask;
        self.ppustatus = snapshot.ppustatus;
        self.oam_addr = snapshot.oam_addr;
        self.v = snapshot.v;
        self.t = snapshot.t;
        self.fine_x = snapshot.fine_x;
        self.write_latch = snapshot.write_latch;
        self.read_buffer = snapshot.read_buffer;
        self.gen_latch = snapshot.gen_latch;
        self.bus.nametables_mut().copy_from_slice(&snapshot.nametables);
        self.bus.palette_ram_mut().copy_from_slice(&snapshot.palette_ram);
        self.oam.copy_from_slice(&snapshot.oam);
        self.scanline = snapshot.scanline;
        self.dot = snapshot.dot;
        self.odd_frame = snapshot.odd_frame;

        Ok(())
    }
}
