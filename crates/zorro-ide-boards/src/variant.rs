//! Per-variant quirk table.
//!
//! Everything that differs between the boards but is not address decoding
//! lives here as data: window and ROM sizes, how the ROM image is wired
//! onto the bus, where the probe image comes from, data-port byte order,
//! and how a 16-bit access reaches an 8-bit task-file register.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{ApolloMount, BoardOptions, GvpModel};
use crate::error::{IdeError, Result};

/// How many copies of one board type may be fitted at once.
pub const MAX_DUPLICATE_BOARDS: usize = 4;

/// Disk-unit slots reserved across all variants.
///
/// GVP owns one slot (only one GVP controller fits a machine); every other
/// family owns [`MAX_DUPLICATE_BOARDS`] consecutive slots.
pub const UNIT_SLOTS: usize = 1 + 6 * MAX_DUPLICATE_BOARDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Variant {
    /// GVP Series II controller half (no ROM, carries the drives).
    GvpController,
    /// GVP boot-ROM board. On Series I this is the whole controller.
    GvpBootRom,
    /// ALF / ALF+ (Elaborate Bytes).
    Alf,
    /// Apollo (ACT), Zorro card or accelerator-mounted.
    Apollo,
    /// Masoboshi MasterCard, optionally with the SCSI chip.
    Masoboshi,
    /// AdIDE (ICD).
    AdIde,
    /// M-Tec AT500.
    Mtec,
    /// Protar A500HD.
    Protar,
}

impl Variant {
    pub const ALL: [Variant; 8] = [
        Variant::GvpController,
        Variant::GvpBootRom,
        Variant::Alf,
        Variant::Apollo,
        Variant::Masoboshi,
        Variant::AdIde,
        Variant::Mtec,
        Variant::Protar,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Variant::GvpController => "GVP Series II controller",
            Variant::GvpBootRom => "GVP boot ROM",
            Variant::Alf => "ALF",
            Variant::Apollo => "Apollo",
            Variant::Masoboshi => "Masoboshi",
            Variant::AdIde => "AdIDE",
            Variant::Mtec => "M-Tec",
            Variant::Protar => "Protar",
        }
    }

    /// Log target for this family.
    #[must_use]
    pub fn log_target(self) -> &'static str {
        match self {
            Variant::GvpController | Variant::GvpBootRom => "GVP",
            Variant::Alf => "ALF",
            Variant::Apollo => "APOLLO",
            Variant::Masoboshi => "MASOBOSHI",
            Variant::AdIde => "ADIDE",
            Variant::Mtec => "MTEC",
            Variant::Protar => "PROTAR",
        }
    }

    #[must_use]
    pub fn is_gvp(self) -> bool {
        matches!(self, Variant::GvpController | Variant::GvpBootRom)
    }

    /// Copies of this family that may be fitted.
    #[must_use]
    pub fn max_instances(self) -> usize {
        if self.is_gvp() { 1 } else { MAX_DUPLICATE_BOARDS }
    }

    /// Disk-unit slot used by `instance` of this family.
    #[must_use]
    pub fn unit_slot(self, instance: usize) -> usize {
        let family = match self {
            Variant::GvpController | Variant::GvpBootRom => return 0,
            Variant::Alf => 0,
            Variant::Apollo => 1,
            Variant::Masoboshi => 2,
            Variant::AdIde => 3,
            Variant::Mtec => 4,
            Variant::Protar => 5,
        };
        1 + family * MAX_DUPLICATE_BOARDS + instance
    }

    /// Build the quirk row for this variant.
    ///
    /// Fails for a GVP controller half on a Series I installation, where
    /// the boot-ROM board is the controller.
    pub fn layout(self, options: &BoardOptions, gvp_model: GvpModel) -> Result<Layout> {
        let layout = match self {
            Variant::GvpBootRom => match gvp_model {
                GvpModel::SeriesI => Layout {
                    rom_size: 8 * 1024,
                    irq_hardwired: true,
                    ..Layout::gvp(GVP_SERIES_I)
                },
                GvpModel::SeriesII => Layout {
                    rom_size: 16 * 1024,
                    has_units: false,
                    ..Layout::gvp(GVP_SERIES_II_ROM)
                },
            },
            Variant::GvpController => match gvp_model {
                GvpModel::SeriesI => {
                    return Err(IdeError::InvalidConfig(
                        "Series I GVP has no separate controller board",
                    ));
                }
                GvpModel::SeriesII => Layout::gvp(GVP_SERIES_II_CONTROLLER),
            },
            Variant::Alf => Layout {
                window_size: 0x1_0000,
                rom_size: if options.alf_plus { 128 * 1024 } else { 64 * 1024 },
                rom_wiring: if options.autoboot_disabled {
                    RomWiring::Disabled
                } else {
                    RomWiring::Alf
                },
                probe: ProbeSource::Descriptor(if options.alf_plus { ALF_PLUS } else { ALF }),
                byte_swap: false,
                bit_shuffle: false,
                keep_autoconfig: true,
                word_lane: WordLane::Ignored,
                irq_hardwired: options.alf_plus,
                has_units: true,
            },
            Variant::Apollo => Layout {
                window_size: 0x2_0000,
                rom_size: 32 * 1024,
                rom_wiring: RomWiring::Apollo,
                probe: ProbeSource::Descriptor(match options.apollo_mount {
                    ApolloMount::Accelerator060 => APOLLO_060,
                    ApolloMount::Zorro | ApolloMount::Accelerator => APOLLO,
                }),
                byte_swap: false,
                bit_shuffle: false,
                keep_autoconfig: true,
                word_lane: WordLane::Ignored,
                irq_hardwired: false,
                has_units: true,
            },
            Variant::Masoboshi => Layout {
                window_size: 0x1_0000,
                rom_size: 64 * 1024,
                rom_wiring: RomWiring::EvenBytes { skip: 0 },
                probe: ProbeSource::Rom {
                    offset: if options.autoboot_disabled { 0x100 } else { 0 },
                },
                byte_swap: true,
                bit_shuffle: false,
                keep_autoconfig: true,
                word_lane: WordLane::Split,
                irq_hardwired: false,
                has_units: true,
            },
            Variant::AdIde => Layout {
                window_size: 0x1_0000,
                rom_size: 32 * 1024,
                rom_wiring: RomWiring::EvenBytes { skip: 0 },
                probe: ProbeSource::Descriptor(ADIDE),
                byte_swap: true,
                bit_shuffle: true,
                keep_autoconfig: false,
                word_lane: WordLane::Shuffled,
                irq_hardwired: false,
                has_units: true,
            },
            Variant::Mtec => Layout {
                window_size: 0x1_0000,
                rom_size: 32 * 1024,
                rom_wiring: RomWiring::EvenBytes {
                    skip: if options.autoboot_disabled { 0 } else { 16 * 1024 },
                },
                probe: ProbeSource::Rom { offset: 0 },
                byte_swap: false,
                bit_shuffle: false,
                keep_autoconfig: true,
                word_lane: WordLane::HighByte,
                irq_hardwired: false,
                has_units: true,
            },
            Variant::Protar => Layout {
                window_size: 0x1_0000,
                rom_size: 32 * 1024,
                rom_wiring: RomWiring::EvenBytes { skip: 0 },
                probe: ProbeSource::Rom { offset: 0 },
                byte_swap: false,
                bit_shuffle: false,
                keep_autoconfig: true,
                word_lane: WordLane::Ignored,
                irq_hardwired: false,
                has_units: true,
            },
        };
        Ok(layout)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a 16-bit access reaches an 8-bit task-file register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordLane {
    /// Two byte accesses at `addr` and `addr + 1`.
    Split,
    /// Register on D15-D8; the low byte reads zero, writes take the high byte.
    HighByte,
    /// Register value passes through the bit-shuffle codec on D15-D8.
    Shuffled,
    /// Not wired: reads zero, writes are dropped.
    Ignored,
}

/// Where the 64-byte probe image comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeSource {
    /// Built from a fixed descriptor.
    Descriptor([u8; 16]),
    /// Copied from the placed ROM at `offset`.
    Rom { offset: usize },
}

/// How the ROM image lands in the board's ROM buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomWiring {
    /// Straight copy.
    Linear,
    /// Straight copy; images of 64 KB and up carry a 32 KB header to skip.
    Apollo,
    /// First 4 KB on the odd lanes from 0x100, the rest on the even lanes
    /// from 0x2000.
    Alf,
    /// Each image byte lands on the even byte of a word, after skipping
    /// `skip` bytes of the image.
    EvenBytes { skip: usize },
    /// ROM socket left empty.
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Bytes decoded once configured. Power of two.
    pub window_size: u32,
    /// ROM buffer size. Power of two, or zero for no ROM.
    pub rom_size: usize,
    pub rom_wiring: RomWiring,
    pub probe: ProbeSource,
    /// Swap the bytes of every data-port word.
    pub byte_swap: bool,
    /// Data lines are scrambled between the bus and the drive.
    pub bit_shuffle: bool,
    /// Probe image still answers at offsets below 0x40 after configuration.
    pub keep_autoconfig: bool,
    pub word_lane: WordLane,
    /// Interrupt enable armed whenever the board is brought up, for boards
    /// whose interrupt output is not gated by software.
    pub irq_hardwired: bool,
    /// Board carries a pair of disk units.
    pub has_units: bool,
}

impl Layout {
    fn gvp(descriptor: [u8; 16]) -> Self {
        Self {
            window_size: 0x1_0000,
            rom_size: 0,
            rom_wiring: RomWiring::Linear,
            probe: ProbeSource::Descriptor(descriptor),
            byte_swap: true,
            bit_shuffle: false,
            keep_autoconfig: false,
            word_lane: WordLane::Split,
            irq_hardwired: false,
            has_units: true,
        }
    }
}

const fn descriptor(head: [u8; 12]) -> [u8; 16] {
    let mut out = [0; 16];
    let mut i = 0;
    while i < head.len() {
        out[i] = head[i];
        i += 1;
    }
    out
}

pub const GVP_SERIES_II_ROM: [u8; 16] =
    descriptor([0xD1, 0x0D, 0x00, 0x00, 0x07, 0xE1, 0x00, 0x00, 0x00, 0x00, 0x80, 0x00]);
pub const GVP_SERIES_II_CONTROLLER: [u8; 16] =
    descriptor([0xC1, 0x0B, 0x00, 0x00, 0x07, 0xE1, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
pub const GVP_SERIES_I: [u8; 16] =
    descriptor([0xD1, 0x08, 0x00, 0x00, 0x07, 0xE1, 0x00, 0x00, 0x00, 0x00, 0x80, 0x00]);
pub const ALF: [u8; 16] =
    descriptor([0xD1, 0x06, 0x00, 0x00, 0x08, 0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00]);
pub const ALF_PLUS: [u8; 16] =
    descriptor([0xD1, 0x26, 0x00, 0x00, 0x08, 0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00]);
pub const APOLLO: [u8; 16] =
    descriptor([0xD2, 0x23, 0x00, 0x00, 0x22, 0x22, 0x00, 0x00, 0x00, 0x00, 0x80, 0x00]);
pub const APOLLO_060: [u8; 16] =
    descriptor([0xD2, 0x23, 0x00, 0x00, 0x22, 0x22, 0x00, 0x00, 0x00, 0x02, 0x80, 0x00]);
pub const ADIDE: [u8; 16] =
    descriptor([0xD1, 0x02, 0x00, 0x00, 0x08, 0x17, 0x00, 0x00, 0x00, 0x00, 0x80, 0x00]);
