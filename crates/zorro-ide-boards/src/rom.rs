//! Boot ROM buffers.
//!
//! Most of these boards put an 8-bit ROM on one byte lane of a 16-bit
//! bus, so the image file and the bytes the CPU sees are laid out
//! differently. [`Rom::place`] does that rearrangement once, at board
//! construction; reads afterwards are a masked index.

use zorro_autoconfig::FILL;

use crate::variant::RomWiring;

/// Start of the ALF's low ROM block.
const ALF_LOW_BASE: usize = 0x100;
/// Image bytes in the ALF's low ROM block.
const ALF_LOW_LEN: usize = 0x1000;
const ALF_HIGH_BASE: usize = 0x2000;
/// Image bytes in the ALF's high ROM block.
const ALF_HIGH_LEN: usize = 0xE000;

const APOLLO_HEADER: usize = 0x8000;

#[derive(Clone, PartialEq, Eq)]
pub struct Rom {
    bytes: Box<[u8]>,
    mask: usize,
}

impl Rom {
    /// Lay `image` out in a `size`-byte buffer according to `wiring`.
    ///
    /// `size` must be a power of two. Bytes the image does not cover read
    /// as [`FILL`]; image bytes that do not fit are dropped.
    #[must_use]
    pub fn place(wiring: RomWiring, size: usize, image: &[u8]) -> Self {
        debug_assert!(size.is_power_of_two());
        let mut bytes = vec![FILL; size].into_boxed_slice();
        match wiring {
            RomWiring::Linear => copy(&mut bytes, image),
            RomWiring::Apollo => {
                let image = if image.len() >= 2 * APOLLO_HEADER {
                    &image[APOLLO_HEADER..]
                } else {
                    image
                };
                copy(&mut bytes, image);
            }
            RomWiring::Alf => {
                let (low, high) = image.split_at(image.len().min(ALF_LOW_LEN));
                for (i, pair) in low.chunks(2).enumerate() {
                    for (lane, &b) in pair.iter().enumerate() {
                        put(&mut bytes, ALF_LOW_BASE + i * 4 + lane * 2, b);
                    }
                }
                let high = &high[..high.len().min(ALF_HIGH_LEN)];
                for (i, pair) in high.chunks(2).enumerate() {
                    for (lane, &b) in pair.iter().enumerate() {
                        put(&mut bytes, ALF_HIGH_BASE + i * 4 + 1 + lane * 2, b);
                    }
                }
            }
            RomWiring::EvenBytes { skip } => {
                let image = image.get(skip..).unwrap_or_default();
                for (i, &b) in image.iter().take(size / 2).enumerate() {
                    bytes[i * 2] = b;
                }
            }
            RomWiring::Disabled => {}
        }
        Self {
            bytes,
            mask: size - 1,
        }
    }

    /// Byte at `offset`, wrapped to the ROM size.
    #[must_use]
    pub fn read(&self, offset: usize) -> u8 {
        self.bytes[offset & self.mask]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Placed bytes from `offset` on.
    #[must_use]
    pub fn tail(&self, offset: usize) -> &[u8] {
        self.bytes.get(offset..).unwrap_or_default()
    }
}

fn copy(dst: &mut [u8], src: &[u8]) {
    let n = dst.len().min(src.len());
    dst[..n].copy_from_slice(&src[..n]);
}

fn put(dst: &mut [u8], index: usize, value: u8) {
    if let Some(slot) = dst.get_mut(index) {
        *slot = value;
    }
}

impl std::fmt::Debug for Rom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rom").field("size", &self.bytes.len()).finish()
    }
}
