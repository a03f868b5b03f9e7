//! Lightweight, infallible event hooks for observing the PPU from outside
//! without forcing a logging crate on every caller.

/// Notable state transitions the scheduler surfaces as they happen.
/// Emission never affects PPU behavior; a sink that panics is a bug in
/// the sink, not something this crate guards against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PpuEvent {
    /// VBlank started (scanline 241, dot 1).
    VblankStarted { frame: u64 },
    /// Sprite overflow flag was newly set this frame.
    SpriteOverflow { scanline: u16 },
    /// Sprite-0 hit flag was newly set this frame.
    Sprite0Hit { scanline: u16, dot: u16 },
    /// The pre-render dot skip occurred on an odd frame.
    OddFrameSkip { frame: u64 },
}

/// Receives [`PpuEvent`]s as the PPU produces them. The host wires this to
/// a ring buffer, stdout, or drops it entirely by never installing one.
pub trait EventSink {
    fn on_event(&mut self, event: PpuEvent);
}

/// An [`EventSink`] that discards everything; the default when no sink is
/// installed.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_event(&mut self, _event: PpuEvent) {}
}
