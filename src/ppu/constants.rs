//! PPU timing and memory-layout constants.

/// Size of one nametable in bytes (1KB).
pub(crate) const NAMETABLE_SIZE: usize = 1024;

/// Size of palette RAM in bytes.
pub(crate) const PALETTE_SIZE: usize = 32;

/// Screen width in pixels.
pub const SCREEN_WIDTH: usize = 256;

/// Screen height in pixels.
pub const SCREEN_HEIGHT: usize = 240;

/// Number of dots per scanline, NTSC and PAL alike.
pub(crate) const DOTS_PER_SCANLINE: u16 = 341;

/// Scanlines per frame on NTSC.
pub(crate) const SCANLINES_PER_FRAME_NTSC: u16 = 262;

/// Scanlines per frame on PAL.
pub(crate) const SCANLINES_PER_FRAME_PAL: u16 = 312;

/// The pre-render scanline is always the last one of the frame.
pub(crate) const PRERENDER_SCANLINE_NTSC: u16 = 261;
pub(crate) const PRERENDER_SCANLINE_PAL: u16 = 311;

/// Post-render scanline (idle).
pub(crate) const POSTRENDER_SCANLINE: u16 = 240;

/// First scanline of VBlank.
pub(crate) const FIRST_VBLANK_SCANLINE: u16 = 241;

/// Last visible scanline.
pub(crate) const LAST_VISIBLE_SCANLINE: u16 = 239;
