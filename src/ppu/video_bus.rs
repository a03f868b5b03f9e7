//! The video bus: resolves 14-bit PPU addresses to CHR, nametable, and
//! palette storage, polymorphic over the plugged-in mapper.

use super::constants::{NAMETABLE_SIZE, PALETTE_SIZE};
use crate::cartridge::{Mapper, Mirroring};

/// Owns nametable RAM and palette RAM, and forwards pattern-table traffic
/// to whatever [`Mapper`] is plugged in.
///
/// Every access below $2000 is forwarded to the mapper unconditionally,
/// including writes to CHR-ROM banks that the mapper will simply discard —
/// this is what lets mappers like MMC3 observe A12 transitions on every
/// physical access rather than only on logical reads.
pub struct VideoBus {
    nametables: [u8; NAMETABLE_SIZE * 2],
    palette_ram: [u8; PALETTE_SIZE],
    mapper: Option<Box<dyn Mapper>>,
}

impl VideoBus {
    pub fn new() -> Self {
        VideoBus {
            nametables: [0; NAMETABLE_SIZE * 2],
            palette_ram: [0; PALETTE_SIZE],
            mapper: None,
        }
    }

    /// Plug in a cartridge mapper. Replaces whatever mapper was present.
    pub fn insert_mapper(&mut self, mapper: Box<dyn Mapper>) {
        self.mapper = Some(mapper);
    }

    /// Remove the currently plugged-in mapper, if any.
    pub fn remove_mapper(&mut self) -> Option<Box<dyn Mapper>> {
        self.mapper.take()
    }

    fn mirroring(&self) -> Mirroring {
        self.mapper
            .as_ref()
            .map(|m| m.mirroring())
            .unwrap_or(Mirroring::Horizontal)
    }

    /// Map a $2000-$2FFF nametable address to a physical offset into
    /// `nametables`, honoring the mapper's current mirroring mode.
    fn mirror_nametable_addr(&self, addr: u16) -> usize {
        let addr = (addr & 0x0FFF) as usize;
        let table = addr / NAMETABLE_SIZE;
        let offset = addr % NAMETABLE_SIZE;

        let physical_table = match self.mirroring() {
            Mirroring::Horizontal => match table {
                0 | 1 => 0,
                _ => 1,
            },
            Mirroring::Vertical => match table {
                0 | 2 => 0,
                _ => 1,
            },
            Mirroring::SingleScreenLower => 0,
            Mirroring::SingleScreenUpper => 1,
            // Four-screen needs 4KB of nametable RAM; this core models only
            // the 2KB on-board, so fold it to horizontal mirroring.
            Mirroring::FourScreen => match table {
                0 | 1 => 0,
                _ => 1,
            },
        };

        physical_table * NAMETABLE_SIZE + offset
    }

    /// $3F00-$3F1F mirrored every 32 bytes, with $3F10/$14/$18/$1C aliasing
    /// $3F00/$04/$08/$0C.
    fn mirror_palette_addr(addr: u16) -> usize {
        let addr = (addr & 0x001F) as usize;
        if addr >= 16 && addr % 4 == 0 {
            addr - 16
        } else {
            addr
        }
    }

    pub fn read(&mut self, addr: u16) -> u8 {
        let addr = addr & 0x3FFF;
        match addr {
            0x0000..=0x1FFF => self
                .mapper
                .as_mut()
                .map(|m| m.ppu_read(addr))
                .unwrap_or(0),
            0x2000..=0x2FFF => self.nametables[self.mirror_nametable_addr(addr)],
            0x3000..=0x3EFF => self.nametables[self.mirror_nametable_addr(addr - 0x1000)],
            0x3F00..=0x3FFF => self.palette_ram[Self::mirror_palette_addr(addr)],
            _ => unreachable!("addr masked to 14 bits"),
        }
    }

    pub fn write(&mut self, addr: u16, data: u8) {
        let addr = addr & 0x3FFF;
        match addr {
            0x0000..=0x1FFF => {
                if let Some(mapper) = self.mapper.as_mut() {
                    mapper.ppu_write(addr, data);
                }
            }
            0x2000..=0x2FFF => {
                let idx = self.mirror_nametable_addr(addr);
                self.nametables[idx] = data;
            }
            0x3000..=0x3EFF => {
                let idx = self.mirror_nametable_addr(addr - 0x1000);
                self.nametables[idx] = data;
            }
            0x3F00..=0x3FFF => {
                let idx = Self::mirror_palette_addr(addr);
                self.palette_ram[idx] = data;
            }
            _ => unreachable!("addr masked to 14 bits"),
        }
    }

    /// Direct palette RAM read by canonical index (0..32), used by the
    /// compositor once it has already resolved which palette entry wins.
    pub(crate) fn palette_read(&self, addr: u8) -> u8 {
        self.palette_ram[(addr & 0x1F) as usize]
    }

    pub fn mapper_irq_pending(&self) -> bool {
        self.mapper.as_ref().map(|m| m.irq_pending()).unwrap_or(false)
    }

    pub fn clear_mapper_irq(&mut self) {
        if let Some(mapper) = self.mapper.as_mut() {
            mapper.clear_irq();
        }
    }

    pub(crate) fn nametables(&self) -> &[u8] {
        &self.nametables
    }

    pub(crate) fn nametables_mut(&mut self) -> &mut [u8] {
        &mut self.nametables
    }

    pub(crate) fn palette_ram(&self) -> &[u8] {
        &self.palette_ram
    }

    pub(crate) fn palette_ram_mut(&mut self) -> &mut [u8] {
        &mut self.palette_ram
    }
}

impl Default for VideoBus {
    fn default() -> Self {
        Self::new()
    }
}
