//! Address → task-file register decoders.
//!
//! Each board routes a handful of address lines to the drive's register
//! select (CS0/CS1, DA2-DA0). Every decoder here is a pure function of the
//! offset within the board's window and returns `None` for anything that
//! is not a drive register: ROM, status latches, co-processor space and
//! unused holes.

use crate::variant::Variant;

/// Which of the drive's two register blocks is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Command block (CS0): data, error, sector count, LBA, device, status.
    Primary,
    /// Control block (CS1): alternate status and device control.
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterRef {
    /// Register within the block, 0-7.
    pub index: u8,
    pub channel: Channel,
}

impl RegisterRef {
    /// The 16-bit data port.
    pub const DATA: Self = Self::primary(0);

    #[must_use]
    pub const fn primary(index: u8) -> Self {
        Self {
            index,
            channel: Channel::Primary,
        }
    }

    #[must_use]
    pub const fn secondary(index: u8) -> Self {
        Self {
            index,
            channel: Channel::Secondary,
        }
    }

    #[must_use]
    pub fn is_data(self) -> bool {
        self == Self::DATA
    }
}

pub type Decoder = fn(u32) -> Option<RegisterRef>;

/// Decoder wired into `variant`.
#[must_use]
pub fn decoder(variant: Variant) -> Decoder {
    match variant {
        Variant::GvpController | Variant::GvpBootRom => gvp,
        Variant::Alf => alf,
        Variant::Apollo => apollo,
        Variant::Masoboshi => masoboshi,
        Variant::AdIde => adide,
        Variant::Mtec => mtec,
        Variant::Protar => protar,
    }
}

fn index(bits: u32) -> u8 {
    (bits & 7) as u8
}

/// GVP: A12 selects the control block, A11 the command block, A10-A8 the
/// register. With A10 low and A5 high, A4-A1 also drive the register
/// select, overriding A10-A8.
#[must_use]
pub fn gvp(offset: u32) -> Option<RegisterRef> {
    if offset >= 0x8000 {
        return None;
    }
    let mut reg = if offset & 0x1000 != 0 {
        Some(RegisterRef::secondary(index(offset >> 8)))
    } else if offset & 0x0800 != 0 {
        Some(RegisterRef::primary(index(offset >> 8)))
    } else {
        None
    };
    if offset & 0x400 == 0 && offset & 0x20 != 0 {
        let base = reg.unwrap_or(RegisterRef::DATA);
        let extra = (offset >> 1) & 15;
        let channel = if extra >= 8 {
            Channel::Secondary
        } else {
            base.channel
        };
        reg = Some(RegisterRef {
            index: index(u32::from(base.index) | extra),
            channel,
        });
    }
    reg
}

/// ALF: A12 command block, A13 control block, A11-A9 register.
#[must_use]
pub fn alf(offset: u32) -> Option<RegisterRef> {
    if offset & 0xC000 != 0 {
        return None;
    }
    let reg = index((offset & 0xFFF) >> 9);
    if offset & 0x1000 != 0 {
        Some(RegisterRef::primary(reg))
    } else if offset & 0x2000 != 0 {
        Some(RegisterRef::secondary(reg))
    } else {
        None
    }
}

/// Apollo: A12-A10 register, A13 control block. Only the data port answers
/// on even addresses.
#[must_use]
pub fn apollo(offset: u32) -> Option<RegisterRef> {
    if offset >= 0x4000 {
        return None;
    }
    let reg = index((offset & 0x1FFF) >> 10);
    if reg != 0 && offset & 1 == 0 {
        return None;
    }
    if offset & 0x2000 != 0 {
        Some(RegisterRef::secondary(reg))
    } else {
        Some(RegisterRef::primary(reg))
    }
}

/// Masoboshi: registers in the top 1 KB, A8-A6 inverted, control block
/// below 0xFE00.
#[must_use]
pub fn masoboshi(offset: u32) -> Option<RegisterRef> {
    if !(0xFC00..0x1_0000).contains(&offset) {
        return None;
    }
    let reg = 7 - index(offset >> 6);
    if offset < 0xFE00 {
        Some(RegisterRef::secondary(reg))
    } else {
        Some(RegisterRef::primary(reg))
    }
}

/// AdIDE: A3-A1 register, A4 control block. The top 32 KB is ROM.
#[must_use]
pub fn adide(offset: u32) -> Option<RegisterRef> {
    if offset & 0x8000 != 0 {
        return None;
    }
    let reg = index(offset >> 1);
    if offset & 0x10 != 0 {
        Some(RegisterRef::secondary(reg))
    } else {
        Some(RegisterRef::primary(reg))
    }
}

/// M-Tec: command block only, A10-A8 register, in the top 32 KB.
#[must_use]
pub fn mtec(offset: u32) -> Option<RegisterRef> {
    if offset & 0x8000 == 0 {
        return None;
    }
    Some(RegisterRef::primary(index(offset >> 8)))
}

/// Protar: nothing but ROM is reachable through the window.
#[must_use]
pub fn protar(_offset: u32) -> Option<RegisterRef> {
    None
}
