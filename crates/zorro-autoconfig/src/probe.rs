//! Autoconfig probe image.
//!
//! The host reads the 16 descriptor registers through a 64-byte window.
//! Register `n` is split across two cells: the high nibble at `n*4`, the
//! low nibble at `n*4 + 2`, both on D7-D4. `er_Type` (register 0) reads
//! true; every other register reads inverted. Unused cells float high.
//!
//! Register map (descriptor index):
//! - 0: `er_Type` (bus type, ROM vector flag, size code)
//! - 1: product number
//! - 4-5: manufacturer
//! - 10-11: diagnostic ROM vector offset

use std::fmt;

use thiserror::Error;

/// Size of the probe window in bytes.
pub const PROBE_SIZE: usize = 0x40;

/// Number of descriptor registers encoded into a probe image.
pub const DESCRIPTOR_SIZE: usize = 16;

/// Value returned by cells nothing drives.
pub const FILL: u8 = 0xFF;

/// `er_Type` bit: the board carries a diagnostic/boot ROM.
pub const ER_TYPE_ROM_VECTOR: u8 = 0x10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("probe source truncated: {len} bytes (need {PROBE_SIZE})")]
    Truncated { len: usize },
    #[error("descriptor advertises a {descriptor:#x} byte window, board decodes {window:#x}")]
    SizeMismatch { descriptor: u32, window: u32 },
}

/// Window size encoded in the low three bits of `er_Type`.
#[must_use]
pub const fn size_from_er_type(er_type: u8) -> u32 {
    match er_type & 0x07 {
        0 => 8 << 20,
        code => 0x8000 << code,
    }
}

/// The 64-byte identification block a board exposes before configuration.
///
/// Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct ProbeImage {
    bytes: [u8; PROBE_SIZE],
}

impl ProbeImage {
    /// An image with nothing driven: the host sees an empty slot.
    #[must_use]
    pub const fn blank() -> Self {
        Self {
            bytes: [FILL; PROBE_SIZE],
        }
    }

    /// Encode a 16-byte descriptor into its probe image.
    #[must_use]
    pub fn from_descriptor(descriptor: &[u8; DESCRIPTOR_SIZE]) -> Self {
        let mut image = Self::blank();
        for (n, &value) in descriptor.iter().enumerate() {
            image.put_register(n, value);
        }
        image
    }

    /// Take a pre-encoded image verbatim, e.g. from a board ROM that holds
    /// its own autoconfig block.
    pub fn from_bytes(source: &[u8]) -> Result<Self, ProbeError> {
        let Some(window) = source.get(..PROBE_SIZE) else {
            return Err(ProbeError::Truncated { len: source.len() });
        };
        let mut bytes = [0; PROBE_SIZE];
        bytes.copy_from_slice(window);
        Ok(Self { bytes })
    }

    fn put_register(&mut self, n: usize, value: u8) {
        let offset = n * 4;
        let high = value & 0xF0;
        let low = (value & 0x0F) << 4;
        if n == 0 {
            self.bytes[offset] = high;
            self.bytes[offset + 2] = low;
        } else {
            self.bytes[offset] = !high;
            self.bytes[offset + 2] = !low;
        }
    }

    /// Byte at `offset`; outside the window reads [`FILL`].
    #[must_use]
    pub fn read_byte(&self, offset: u32) -> u8 {
        self.bytes.get(offset as usize).copied().unwrap_or(FILL)
    }

    /// Big-endian pair of cells: even offset on the high byte.
    #[must_use]
    pub fn read_word(&self, offset: u32) -> u16 {
        u16::from(self.read_byte(offset)) << 8 | u16::from(self.read_byte(offset + 1))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; PROBE_SIZE] {
        &self.bytes
    }

    /// Reassemble descriptor register `n` from its two nibble cells.
    #[must_use]
    pub fn register(&self, n: usize) -> u8 {
        let offset = (n % DESCRIPTOR_SIZE) * 4;
        let raw = (self.bytes[offset] & 0xF0) | (self.bytes[offset + 2] >> 4);
        if n == 0 { raw } else { !raw }
    }

    #[must_use]
    pub fn er_type(&self) -> u8 {
        self.register(0)
    }

    #[must_use]
    pub fn product(&self) -> u8 {
        self.register(1)
    }

    #[must_use]
    pub fn manufacturer(&self) -> u16 {
        u16::from(self.register(4)) << 8 | u16::from(self.register(5))
    }

    #[must_use]
    pub fn rom_vector(&self) -> u16 {
        u16::from(self.register(10)) << 8 | u16::from(self.register(11))
    }

    #[must_use]
    pub fn has_rom_vector(&self) -> bool {
        self.er_type() & ER_TYPE_ROM_VECTOR != 0
    }

    /// Window size the image advertises.
    #[must_use]
    pub fn window_size(&self) -> u32 {
        size_from_er_type(self.er_type())
    }

    /// Confirm the advertised size matches what the board actually decodes.
    pub fn check_window(&self, window: u32) -> Result<(), ProbeError> {
        let descriptor = self.window_size();
        if descriptor == window {
            Ok(())
        } else {
            Err(ProbeError::SizeMismatch { descriptor, window })
        }
    }
}

impl Default for ProbeImage {
    fn default() -> Self {
        Self::blank()
    }
}

impl fmt::Debug for ProbeImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeImage")
            .field("er_type", &format_args!("{:#04X}", self.er_type()))
            .field("product", &format_args!("{:#04X}", self.product()))
            .field("manufacturer", &format_args!("{:#06X}", self.manufacturer()))
            .field("rom_vector", &format_args!("{:#06X}", self.rom_vector()))
            .finish()
    }
}
