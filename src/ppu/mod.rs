//! The PPU core: a dot-accurate 2C02-family picture processing unit,
//! independent of any particular CPU/bus implementation.
//!
//! Callers drive the chip one PPU dot at a time via [`Ppu::tick`], reading
//! back [`Ppu::frame_buffer`] once [`Ppu::take_frame_ready`] reports a frame
//! is complete. Everything outside the chip itself — CPU timing, cartridge
//! ROM loading, RGB palette conversion — lives above this module.

mod background;
mod compositor;
mod constants;
mod loopy;
mod registers;
mod snapshot;
mod sprites;
mod video_bus;

pub use compositor::{FRAME_PIXEL_BG_FLAG, FRAME_PIXEL_VALID_FLAG};
pub use constants::{SCREEN_HEIGHT, SCREEN_WIDTH};
pub use video_bus::VideoBus;

use constants::{
    DOTS_PER_SCANLINE, FIRST_VBLANK_SCANLINE, LAST_VISIBLE_SCANLINE, POSTRENDER_SCANLINE,
    PRERENDER_SCANLINE_NTSC, PRERENDER_SCANLINE_PAL, SCANLINES_PER_FRAME_NTSC,
    SCANLINES_PER_FRAME_PAL,
};
use sprites::SpriteSlot;

use crate::diagnostics::{EventSink, NullSink, PpuEvent};

/// Which television standard's timing the chip should follow. PAL runs an
/// extra 50 scanlines per frame and never skips the pre-render dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TvSystem {
    Ntsc,
    Pal,
}

impl TvSystem {
    fn prerender_scanline(self) -> u16 {
        match self {
            TvSystem::Ntsc => PRERENDER_SCANLINE_NTSC,
            TvSystem::Pal => PRERENDER_SCANLINE_PAL,
        }
    }

    fn scanlines_per_frame(self) -> u16 {
        match self {
            TvSystem::Ntsc => SCANLINES_PER_FRAME_NTSC,
            TvSystem::Pal => SCANLINES_PER_FRAME_PAL,
        }
    }
}

/// The PPU core's complete architectural and microarchitectural state.
pub struct Ppu {
    // Register file (component B).
    ppuctrl: u8,
    ppumask: u8,
    ppustatus: u8,
    oam_addr: u8,
    gen_latch: u8,

    // Loopy scroll counters (component C).
    v: u16,
    t: u16,
    fine_x: u8,
    write_latch: bool,
    read_buffer: u8,

    oam: [u8; 256],
    bus: VideoBus,

    // Background pipeline latches/shifters (component D).
    bg_next_tile_id: u8,
    bg_next_tile_attr: u8,
    bg_next_tile_lo: u8,
    bg_next_tile_hi: u8,
    bg_shift_pattern_lo: u16,
    bg_shift_pattern_hi: u16,
    bg_shift_attr_lo: u16,
    bg_shift_attr_hi: u16,

    // Sprite pipeline (component E).
    secondary_oam: [SpriteSlot; 8],
    secondary_oam_count: usize,
    sprite_pattern_lo: [u8; 8],
    sprite_pattern_hi: [u8; 8],
    sprite_attr: [u8; 8],
    sprite_x: [u8; 8],

    // Scheduler state (component G).
    scanline: u16,
    dot: u16,
    frame: u64,
    odd_frame: bool,
    tv_system: TvSystem,
    frame_ready: bool,
    prev_nmi_line: bool,
    nmi_edge: bool,

    frame_buffer: Box<[u8; SCREEN_WIDTH * SCREEN_HEIGHT]>,

    event_sink: Box<dyn EventSink>,
}

impl Ppu {
    pub fn new() -> Self {
        Ppu::with_tv_system(TvSystem::Ntsc)
    }

    pub fn with_tv_system(tv_system: TvSystem) -> Self {
        Ppu {
            ppuctrl: 0,
            ppumask: 0,
            ppustatus: 0,
            oam_addr: 0,
            gen_latch: 0,

            v: 0,
            t: 0,
            fine_x: 0,
            write_latch: false,
            read_buffer: 0,

            oam: [0; 256],
            bus: VideoBus::new(),

            bg_next_tile_id: 0,
            bg_next_tile_attr: 0,
            bg_next_tile_lo: 0,
            bg_next_tile_hi: 0,
            bg_shift_pattern_lo: 0,
            bg_shift_pattern_hi: 0,
            bg_shift_attr_lo: 0,
            bg_shift_attr_hi: 0,

            secondary_oam: [SpriteSlot::default(); 8],
            secondary_oam_count: 0,
            sprite_pattern_lo: [0; 8],
            sprite_pattern_hi: [0; 8],
            sprite_attr: [0; 8],
            sprite_x: [0; 8],

            scanline: 0,
            dot: 0,
            frame: 0,
            odd_frame: false,
            tv_system,
            frame_ready: false,
            prev_nmi_line: false,
            nmi_edge: false,

            frame_buffer: Box::new([0; SCREEN_WIDTH * SCREEN_HEIGHT]),

            event_sink: Box::new(NullSink),
        }
    }

    /// Install a sink to receive [`PpuEvent`]s. Replaces whatever sink was
    /// previously installed; defaults to a no-op sink.
    pub fn set_event_sink(&mut self, sink: Box<dyn EventSink>) {
        self.event_sink = sink;
    }

    pub(crate) fn emit(&mut self, event: PpuEvent) {
        self.event_sink.on_event(event);
    }

    pub fn bus(&self) -> &VideoBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut VideoBus {
        &mut self.bus
    }

    pub fn frame_buffer(&self) -> &[u8] {
        self.frame_buffer.as_ref()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    pub fn dot(&self) -> u16 {
        self.dot
    }

    /// Whether rendering of either layer is enabled; gates every shift,
    /// increment, and fetch the pipeline performs.
    fn rendering_enabled(&self) -> bool {
        self.ppumask & 0x18 != 0
    }

    /// The NMI output line: asserted whenever VBlank is flagged and NMI
    /// generation is enabled. Computed fresh on every call rather than
    /// tracked as separate latched state, so there is exactly one place
    /// that can disagree with reality.
    fn nmi_line(&self) -> bool {
        self.ppustatus & 0x80 != 0 && self.ppuctrl & 0x80 != 0
    }

    /// Returns `true` exactly once per rising edge of the NMI line since
    /// the last call. The bus master should poll this once per CPU cycle
    /// and latch its own NMI request on a `true` result.
    pub fn take_nmi_edge(&mut self) -> bool {
        let fired = self.nmi_edge;
        self.nmi_edge = false;
        fired
    }

    /// Returns `true` exactly once per completed frame.
    pub fn take_frame_ready(&mut self) -> bool {
        let ready = self.frame_ready;
        self.frame_ready = false;
        ready
    }

    pub fn mapper_irq_pending(&self) -> bool {
        self.bus.mapper_irq_pending()
    }

    pub fn clear_mapper_irq(&mut self) {
        self.bus.clear_mapper_irq();
    }

    /// Advance the chip by exactly one dot.
    pub fn tick(&mut self) {
        let prerender = self.tv_system.prerender_scanline();

        match self.scanline {
            0..=LAST_VISIBLE_SCANLINE => self.visible_or_prerender_dot(false),
            s if s == prerender => self.visible_or_prerender_dot(true),
            POSTRENDER_SCANLINE => {}
            s if s == FIRST_VBLANK_SCANLINE && self.dot == 1 => {
                self.ppustatus |= 0x80;
                self.emit(PpuEvent::VblankStarted { frame: self.frame });
            }
            _ => {}
        }

        let nmi_now = self.nmi_line();
        if nmi_now && !self.prev_nmi_line {
            self.nmi_edge = true;
        }
        self.prev_nmi_line = nmi_now;

        self.advance_dot(prerender);
    }

    fn advance_dot(&mut self, prerender: u16) {
        self.dot += 1;

        // Odd-frame dot skip: NTSC skips the idle dot 0 of the first
        // visible scanline on odd frames while rendering is enabled.
        if self.scanline == prerender
            && self.dot == DOTS_PER_SCANLINE - 1
            && self.odd_frame
            && self.tv_system == TvSystem::Ntsc
            && self.rendering_enabled()
        {
            self.dot += 1;
            self.emit(PpuEvent::OddFrameSkip { frame: self.frame });
        }

        if self.dot >= DOTS_PER_SCANLINE {
            self.dot = 0;
            self.scanline += 1;
            if self.scanline >= self.tv_system.scanlines_per_frame() {
                self.scanline = 0;
                self.frame += 1;
                self.odd_frame = !self.odd_frame;
                self.frame_ready = true;
            }
        }
    }

    fn visible_or_prerender_dot(&mut self, is_prerender: bool) {
        let dot = self.dot;

        if is_prerender && dot == 1 {
            self.ppustatus &= !(0x80 | 0x40 | 0x20);
        }

        if !self.rendering_enabled() {
            return;
        }

        // The scanline that secondary-OAM evaluation/fetch at dots 257-320
        // is preparing for: the next visible scanline, or 0 again when
        // this is the pre-render line rolling into a fresh frame.
        let upcoming_scanline = if is_prerender { 0 } else { self.scanline as i32 + 1 };

        match dot {
            1..=256 => {
                self.background_fetch_dot(dot);
                self.shift_background_shifters();
                self.shift_sprite_shifters();

                if !is_prerender {
                    let x = (dot - 1) as usize;
                    let pixel = self.composite_dot(x);
                    let y = self.scanline as usize;
                    self.frame_buffer[y * SCREEN_WIDTH + x] = pixel;
                }

                if dot == 256 {
                    self.inc_y();
                }
            }
            257 => {
                self.copy_x();
                self.evaluate_sprites(upcoming_scanline);
            }
            258..=320 => {
                if dot == 320 {
                    self.fetch_sprites(upcoming_scanline);
                }
            }
            321..=336 => {
                self.background_fetch_dot(dot);
            }
            337 | 339 => {
                let _ = self.bus.read(self.nt_addr_for_prefetch());
            }
            _ => {}
        }

        if is_prerender && (280..=304).contains(&dot) {
            self.copy_y();
        }
    }

    fn nt_addr_for_prefetch(&self) -> u16 {
        0x2000 | (self.v & 0x0FFF)
    }
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}
