//! Mapper 0 (NROM): no bank switching, fixed 8 KiB of CHR-ROM or CHR-RAM.

use crate::cartridge::{CartridgeError, Mapper, Mirroring};

/// NROM CHR storage.
pub struct Mapper0 {
    chr_mem: Vec<u8>,
    chr_is_ram: bool,
    mirroring: Mirroring,
}

impl Mapper0 {
    /// Build an NROM mapper backed by fixed CHR-ROM content.
    ///
    /// # Errors
    /// Returns [`CartridgeError::InvalidChrSize`] if `chr_rom` is not
    /// exactly 8 KiB.
    pub fn new_chr_rom(chr_rom: Vec<u8>, mirroring: Mirroring) -> Result<Self, CartridgeError> {
        if chr_rom.len() != 8 * 1024 {
            return Err(CartridgeError::InvalidChrSize {
                len: chr_rom.len(),
                bank_size: 8 * 1024,
            });
        }
        Ok(Mapper0 {
            chr_mem: chr_rom,
            chr_is_ram: false,
            mirroring,
        })
    }

    /// Build an NROM mapper backed by writable, zero-initialized CHR-RAM.
    pub fn new_chr_ram(mirroring: Mirroring) -> Self {
        Mapper0 {
            chr_mem: vec![0; 8 * 1024],
            chr_is_ram: true,
            mirroring,
        }
    }
}

impl Mapper for Mapper0 {
    fn ppu_read(&mut self, addr: u16) -> u8 {
        self.chr_mem[(addr & 0x1FFF) as usize]
    }

    fn ppu_write(&mut self, addr: u16, data: u8) {
        if self.chr_is_ram {
            self.chr_mem[(addr & 0x1FFF) as usize] = data;
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chr_rom_reads_back_fixed_content() {
        let mut chr = vec![0u8; 8 * 1024];
        chr[0] = 0xAA;
        chr[0x1FFF] = 0xBB;
        let mut mapper = Mapper0::new_chr_rom(chr, Mirroring::Horizontal).unwrap();

        assert_eq!(mapper.ppu_read(0x0000), 0xAA);
        assert_eq!(mapper.ppu_read(0x1FFF), 0xBB);
    }

    #[test]
    fn chr_rom_writes_are_ignored() {
        let mut mapper = Mapper0::new_chr_rom(vec![0x42; 8 * 1024], Mirroring::Vertical).unwrap();
        mapper.ppu_write(0x0000, 0xFF);
        assert_eq!(mapper.ppu_read(0x0000), 0x42);
    }

    #[test]
    fn chr_rom_rejects_wrong_size() {
        let err = Mapper0::new_chr_rom(vec![0u8; 100], Mirroring::Horizontal).unwrap_err();
        assert!(matches!(
            err,
            CartridgeError::InvalidChrSize { len: 100, bank_size: 8192 }
        ));
    }

    #[test]
    fn chr_ram_is_writable() {
        let mut mapper = Mapper0::new_chr_ram(Mirroring::Horizontal);
        mapper.ppu_write(0x0123, 0x77);
        assert_eq!(mapper.ppu_read(0x0123), 0x77);
    }

    #[test]
    fn mirroring_is_fixed() {
        let mapper = Mapper0::new_chr_ram(Mirroring::Vertical);
        assert_eq!(mapper.mirroring(), Mirroring::Vertical);
    }
}
