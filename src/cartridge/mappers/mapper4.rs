//! Mapper 4 (MMC3): switchable CHR banking plus a scanline IRQ counter
//! clocked off real PPU address-bus A12 transitions.
//!
//! The bank-select/IRQ register file is normally CPU-bus addressed
//! ($8000-$FFFF); since the CPU core is out of scope here, those registers
//! are exposed as a small inherent API ([`Mapper4::write_register`]) that an
//! external bus master calls after decoding the CPU address itself.

use crate::cartridge::{CartridgeError, Mapper, Mirroring};

const CHR_BANK_SIZE: usize = 1024;

/// MMC3-style mapper: CHR banking, switchable mirroring, scanline IRQ.
pub struct Mapper4 {
    chr_mem: Vec<u8>,
    chr_is_ram: bool,
    chr_banks: usize,

    bank_select: u8,
    bank_registers: [u8; 8],
    mirroring: Mirroring,

    irq_latch: u8,
    irq_counter: u8,
    irq_reload: bool,
    irq_enabled: bool,
    irq_pending: bool,

    /// Last observed state of PPU address bit 12, used to detect rising
    /// edges (the A12 line) across successive bus accesses.
    last_a12: bool,
}

impl Mapper4 {
    /// Build an MMC3 mapper backed by fixed CHR-ROM content.
    ///
    /// # Errors
    /// Returns [`CartridgeError::InvalidChrSize`] if `chr_rom`'s length is
    /// not a multiple of the 1 KiB bank size.
    pub fn new_chr_rom(chr_rom: Vec<u8>, mirroring: Mirroring) -> Result<Self, CartridgeError> {
        if chr_rom.len() % CHR_BANK_SIZE != 0 {
            return Err(CartridgeError::InvalidChrSize {
                len: chr_rom.len(),
                bank_size: CHR_BANK_SIZE,
            });
        }
        let chr_banks = chr_rom.len() / CHR_BANK_SIZE;
        Ok(Self::build(chr_rom, false, chr_banks, mirroring))
    }

    /// Build an MMC3 mapper backed by 8 KiB of writable CHR-RAM.
    pub fn new_chr_ram(mirroring: Mirroring) -> Self {
        Self::build(vec![0; 8 * 1024], true, 8, mirroring)
    }

    fn build(chr_mem: Vec<u8>, chr_is_ram: bool, chr_banks: usize, mirroring: Mirroring) -> Self {
        Mapper4 {
            chr_mem,
            chr_is_ram,
            chr_banks,
            bank_select: 0,
            bank_registers: [0; 8],
            mirroring,
            irq_latch: 0,
            irq_counter: 0,
            irq_reload: false,
            irq_enabled: false,
            irq_pending: false,
            last_a12: false,
        }
    }

    fn chr_a12_inversion(&self) -> bool {
        self.bank_select & 0x80 != 0
    }

    fn map_chr_address(&self, addr: u16) -> usize {
        let inversion = self.chr_a12_inversion();
        let bank = match addr & 0x1FFF {
            0x0000..=0x03FF => {
                if inversion {
                    self.bank_registers[2] as usize
                } else {
                    (self.bank_registers[0] & 0xFE) as usize
                }
            }
            0x0400..=0x07FF => {
                if inversion {
                    self.bank_registers[3] as usize
                } else {
                    (self.bank_registers[0] | 1) as usize
                }
            }
            0x0800..=0x0BFF => {
                if inversion {
                    self.bank_registers[4] as usize
                } else {
                    (self.bank_registers[1] & 0xFE) as usize
                }
            }
            0x0C00..=0x0FFF => {
                if inversion {
                    self.bank_registers[5] as usize
                } else {
                    (self.bank_registers[1] | 1) as usize
                }
            }
            0x1000..=0x13FF => {
                if inversion {
                    (self.bank_registers[0] & 0xFE) as usize
                } else {
                    self.bank_registers[2] as usize
                }
            }
            0x1400..=0x17FF => {
                if inversion {
                    (self.bank_registers[0] | 1) as usize
                } else {
                    self.bank_registers[3] as usize
                }
            }
            0x1800..=0x1BFF => {
                if inversion {
                    (self.bank_registers[1] & 0xFE) as usize
                } else {
                    self.bank_registers[4] as usize
                }
            }
            _ => {
                if inversion {
                    (self.bank_registers[1] | 1) as usize
                } else {
                    self.bank_registers[5] as usize
                }
            }
        };

        let offset = (addr & 0x03FF) as usize;
        (bank % self.chr_banks) * CHR_BANK_SIZE + offset
    }

    /// Decode and apply a CPU-bus write to the MMC3 register file
    /// ($8000-$FFFF, even/odd pairs per nesdev's MMC3 layout).
    pub fn write_register(&mut self, addr: u16, value: u8) {
        match addr & 0xE001 {
            0x8000 => self.bank_select = value,
            0x8001 => {
                let reg = (self.bank_select & 0x07) as usize;
                self.bank_registers[reg] = value;
            }
            0xA000 => {
                self.mirroring = if value & 0x01 != 0 {
                    Mirroring::Horizontal
                } else {
                    Mirroring::Vertical
                };
            }
            0xA001 => {} // PRG-RAM protect: no PRG-RAM modeled here
            0xC000 => self.irq_latch = value,
            0xC001 => self.irq_reload = true,
            0xE000 => {
                self.irq_enabled = false;
                self.irq_pending = false;
            }
            0xE001 => self.irq_enabled = true,
            _ => {}
        }
    }

    /// Clock the scanline IRQ counter, as if A12 just rose.
    fn clock_irq(&mut self) {
        if self.irq_counter == 0 || self.irq_reload {
            self.irq_counter = self.irq_latch;
            self.irq_reload = false;
        } else {
            self.irq_counter -= 1;
        }

        if self.irq_counter == 0 && self.irq_enabled {
            self.irq_pending = true;
        }
    }

    /// Observe a physical PPU bus access and clock the IRQ counter on an
    /// A12 (address bit 12) rising edge. Called for every read and write,
    /// matching how the real MMC3 taps the video bus rather than a
    /// synthetic per-scanline callback.
    fn observe_access(&mut self, addr: u16) {
        let a12 = addr & 0x1000 != 0;
        if a12 && !self.last_a12 {
            self.clock_irq();
        }
        self.last_a12 = a12;
    }
}

impl Mapper for Mapper4 {
    fn ppu_read(&mut self, addr: u16) -> u8 {
        self.observe_access(addr);
        let index = self.map_chr_address(addr);
        self.chr_mem[index]
    }

    fn ppu_write(&mut self, addr: u16, data: u8) {
        self.observe_access(addr);
        if self.chr_is_ram {
            let index = self.map_chr_address(addr);
            self.chr_mem[index] = data;
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    fn irq_pending(&self) -> bool {
        self.irq_pending
    }

    fn clear_irq(&mut self) {
        self.irq_pending = false;
    }
}
