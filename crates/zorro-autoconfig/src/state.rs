//! Board-side configuration state machine.
//!
//! Unconfigured → Configured (host wrote the base address register)
//! Unconfigured → ShutUp (host declined the board)
//!
//! Only a reset takes a board back to Unconfigured.

use log::{info, warn};

/// Zorro II base address register: the written byte is A23-A16.
pub const REG_BASE_ADDRESS: u32 = 0x48;

/// Any write here tells the board to stay out of the memory map.
pub const REG_SHUT_UP: u32 = 0x4C;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoconfigState {
    /// Answering the probe, no address assigned yet.
    #[default]
    Unconfigured,
    /// Mapped at a base address.
    Configured,
    /// Rejected by the host; allocated but inert.
    ShutUp,
}

/// What a board needs from the host's expansion prober.
pub trait ExpansionBus {
    /// Map `size` bytes of the board at `base` and move on to the next slot.
    fn map_window(&mut self, base: u32, size: u32);

    /// Release the probe slot without mapping the board.
    fn shut_up(&mut self);
}

/// Outcome of a write into the configuration registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigWrite {
    /// Not a configuration register, or the board is past the probe.
    Ignored,
    /// Board mapped at `base`.
    Mapped { base: u32 },
    /// Board declined.
    ShutUp,
}

#[derive(Debug, Clone)]
pub struct Autoconfig {
    state: AutoconfigState,
    /// Last address the host assigned. Survives reset.
    assigned: Option<u32>,
    mask: u32,
}

impl Autoconfig {
    /// State machine for a board decoding `window_size` bytes.
    ///
    /// `window_size` must be a power of two.
    #[must_use]
    pub fn new(window_size: u32) -> Self {
        debug_assert!(window_size.is_power_of_two());
        Self {
            state: AutoconfigState::Unconfigured,
            assigned: None,
            mask: window_size - 1,
        }
    }

    #[must_use]
    pub fn state(&self) -> AutoconfigState {
        self.state
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.state == AutoconfigState::Configured
    }

    #[must_use]
    pub fn mask(&self) -> u32 {
        self.mask
    }

    #[must_use]
    pub fn window_size(&self) -> u32 {
        self.mask + 1
    }

    /// Base address, valid only while Configured.
    #[must_use]
    pub fn base(&self) -> Option<u32> {
        if self.is_configured() {
            self.assigned
        } else {
            None
        }
    }

    /// True until the host has assigned an address at least once.
    #[must_use]
    pub fn never_configured(&self) -> bool {
        self.assigned.is_none()
    }

    /// Whether `addr` falls inside this board's mapped window.
    #[must_use]
    pub fn claims(&self, addr: u32) -> bool {
        self.base() == Some(addr & !self.mask)
    }

    /// Handle a byte write at `offset` within the window.
    pub fn write<B>(&mut self, offset: u32, value: u8, bus: &mut B) -> ConfigWrite
    where
        B: ExpansionBus + ?Sized,
    {
        if self.state != AutoconfigState::Unconfigured {
            return ConfigWrite::Ignored;
        }
        match offset & self.mask {
            REG_BASE_ADDRESS => {
                let requested = u32::from(value) << 16;
                let base = requested & !self.mask;
                if base != requested {
                    warn!(
                        target: "AUTOCONFIG",
                        "base ${requested:06X} not aligned to ${:X} window, using ${base:06X}",
                        self.window_size()
                    );
                }
                self.assigned = Some(base);
                self.state = AutoconfigState::Configured;
                bus.map_window(base, self.window_size());
                info!(target: "AUTOCONFIG", "configured at ${base:06X} ({} KB)", self.window_size() >> 10);
                ConfigWrite::Mapped { base }
            }
            REG_SHUT_UP => {
                self.state = AutoconfigState::ShutUp;
                bus.shut_up();
                info!(target: "AUTOCONFIG", "shut up");
                ConfigWrite::ShutUp
            }
            _ => ConfigWrite::Ignored,
        }
    }

    /// Back to Unconfigured. The previous assignment is remembered.
    pub fn reset(&mut self) {
        self.state = AutoconfigState::Unconfigured;
    }
}
