//! CPU accesses into a board's window.
//!
//! Byte accesses are the native width: every variant has its own map of
//! ROM, status latches, co-processor space and task-file registers. Word
//! accesses go through one adapter: probe image, then variant status
//! words, then the decoder. The data port moves 16 bits at once; other
//! registers follow the variant's [`WordLane`]. Long accesses are two word
//! accesses, high word first.

use log::{debug, trace};
use zorro_autoconfig::{ConfigWrite, FILL};

use crate::board::Board;
use crate::codec::{shuffle_decode, shuffle_encode, swap_if};
use crate::config::GvpModel;
use crate::decode::RegisterRef;
use crate::host::Host;
use crate::units::{self, DiskUnits};
use crate::variant::{Variant, WordLane};

/// ALF: ROM answers below here and on every odd address.
const ALF_ROM_END: u32 = 0x1100;
/// ALF interrupt status word.
const ALF_IRQ_STATUS: u32 = 0x4000;

const APOLLO_ROM_OFFSET: u32 = 0x8000;
const APOLLO_SCSI_MASK: u32 = 0xC000;
const APOLLO_SCSI: u32 = 0x4000;

const GVP_ROM_OFFSET: u32 = 0x8000;
/// What the GVP drives on odd ROM addresses, or on all of them with the
/// socket empty.
const GVP_ROM_FILLER: u8 = 0xE8;
/// Word accesses below here hit the GVP control latches.
const GVP_STATUS_END: u32 = 0x60;
const GVP_INTENA: u32 = 0x40;
const GVP_INTENA_BIT: u16 = 0x08;

const MASOBOSHI_ROM_START: u32 = 0x80;
const MASOBOSHI_ROM_END: u32 = 0xF000;
/// Interrupt status (read) / acknowledge (write).
const MASOBOSHI_IRQ_STATUS: u32 = 0xF040;
/// Status-control latch.
const MASOBOSHI_CONTROL: u32 = 0xF047;
const MASOBOSHI_INTENA: u8 = 0x08;

const ADIDE_ROM_OFFSET: u32 = 0x8000;
const MTEC_REGISTERS: u32 = 0x8000;

/// One access in flight: a board, the drives and the host side.
pub(crate) struct Access<'a, U: ?Sized, H: ?Sized> {
    board: &'a mut Board,
    units: &'a mut U,
    host: &'a mut H,
    rethink: bool,
}

impl<'a, U, H> Access<'a, U, H>
where
    U: DiskUnits + ?Sized,
    H: Host + ?Sized,
{
    pub(crate) fn new(
        board: &'a mut Board,
        units: &'a mut U,
        host: &'a mut H,
    ) -> Self {
        Self {
            board,
            units,
            host,
            rethink: false,
        }
    }

    /// The access may have changed a board's interrupt state.
    pub(crate) fn needs_rethink(&self) -> bool {
        self.rethink
    }

    fn target(&self) -> &'static str {
        self.board.variant().log_target()
    }

    fn offset(&self, addr: u32) -> u32 {
        addr & self.board.mask()
    }

    // -----------------------------------------------------------------
    // Drives

    fn data_in(&mut self) -> u16 {
        let Some(pair) = self.board.units() else {
            return 0xFFFF;
        };
        let value = units::read(&mut *self.units, pair, RegisterRef::DATA);
        swap_if(value, self.board.layout().byte_swap)
    }

    fn data_out(&mut self, value: u16) {
        let Some(pair) = self.board.units() else {
            return;
        };
        let value = swap_if(value, self.board.layout().byte_swap);
        units::write(&mut *self.units, pair, RegisterRef::DATA, value);
        self.rethink = true;
    }

    /// Register read as a byte. A byte read of the data port takes one
    /// word off the drive and keeps its low half.
    fn get(&mut self, reg: RegisterRef) -> u8 {
        if reg.is_data() {
            return self.data_in() as u8;
        }
        match self.board.units() {
            Some(pair) => units::read(&mut *self.units, pair, reg) as u8,
            None => FILL,
        }
    }

    fn put(&mut self, reg: RegisterRef, value: u8) {
        if reg.is_data() {
            self.data_out(u16::from(value));
            return;
        }
        if let Some(pair) = self.board.units() {
            units::write(&mut *self.units, pair, reg, u16::from(value));
            self.rethink = true;
        }
    }

    /// Refresh the board's latch from the drives.
    fn sample_irq(&mut self) {
        if let Some(pair) = self.board.units() {
            self.board.irq_pending = self.units.irq_pending(pair);
        }
        self.rethink = true;
    }

    // -----------------------------------------------------------------
    // Bytes

    pub(crate) fn read_byte(&mut self, addr: u32) -> u8 {
        let offset = self.offset(addr);
        if self.board.serves_probe(offset) {
            return self.board.probe().read_byte(offset);
        }
        if !self.board.is_configured() {
            return FILL;
        }
        let value = match self.board.variant() {
            Variant::GvpController | Variant::GvpBootRom => self.gvp_read_byte(offset),
            Variant::Alf => self.alf_read_byte(offset),
            Variant::Apollo => self.apollo_read_byte(addr, offset),
            Variant::Masoboshi => self.masoboshi_read_byte(addr, offset),
            Variant::AdIde => self.adide_read_byte(offset),
            Variant::Mtec => self.mtec_read_byte(offset),
            Variant::Protar => self.board.read_rom(offset),
        };
        trace!(target: self.target(), "byte read ${offset:05X} = ${value:02X}");
        value
    }

    pub(crate) fn write_byte(&mut self, addr: u32, value: u8) {
        let offset = self.offset(addr);
        match self
            .board
            .autoconfig_mut()
            .write(offset, value, &mut *self.host)
        {
            ConfigWrite::Ignored => {}
            ConfigWrite::Mapped { base } => {
                self.board.arm_hardwired_irq();
                debug!(
                    target: self.target(),
                    "{} #{} mapped at ${base:06X}",
                    self.board.variant(),
                    self.board.instance()
                );
                return;
            }
            ConfigWrite::ShutUp => return,
        }
        if !self.board.is_configured() {
            return;
        }
        trace!(target: self.target(), "byte write ${offset:05X} = ${value:02X}");
        match self.board.variant() {
            Variant::GvpController | Variant::GvpBootRom => {
                if !self.board.is_rom_only() {
                    self.put_decoded(offset, value);
                }
            }
            Variant::Alf | Variant::Mtec => self.put_decoded(offset, value),
            Variant::Apollo => self.apollo_write_byte(addr, offset, value),
            Variant::Masoboshi => self.masoboshi_write_byte(addr, offset, value),
            Variant::AdIde => self.adide_write_byte(offset, value),
            Variant::Protar => {}
        }
    }

    fn put_decoded(&mut self, offset: u32, value: u8) {
        if let Some(reg) = self.board.decode(offset) {
            self.put(reg, value);
        }
    }

    fn get_decoded(&mut self, offset: u32) -> u8 {
        match self.board.decode(offset) {
            Some(reg) => self.get(reg),
            None => FILL,
        }
    }

    fn gvp_read_byte(&mut self, offset: u32) -> u8 {
        if offset >= GVP_ROM_OFFSET {
            if offset & 1 != 0 || !self.board.has_rom() {
                return GVP_ROM_FILLER;
            }
            return self.board.read_rom((offset - GVP_ROM_OFFSET) / 2);
        }
        if self.board.is_rom_only() {
            return FILL;
        }
        if let Some(reg) = self.board.decode(offset) {
            return self.get(reg);
        }
        let (status, bit) = match self.board.gvp_model() {
            GvpModel::SeriesII => (offset & 0x440 == 0x440, 0x40),
            GvpModel::SeriesI => (offset & 0x440 == 0x040, 0x80),
        };
        if !status {
            return FILL;
        }
        let value = if self.board.irq_pending { bit } else { 0 };
        self.sample_irq();
        value
    }

    fn alf_read_byte(&mut self, offset: u32) -> u8 {
        if offset < ALF_ROM_END || offset & 1 != 0 {
            return self.board.read_rom(offset);
        }
        self.get_decoded(offset)
    }

    fn apollo_read_byte(&mut self, addr: u32, offset: u32) -> u8 {
        if offset >= APOLLO_ROM_OFFSET {
            return self.board.read_rom(offset - APOLLO_ROM_OFFSET);
        }
        if offset & APOLLO_SCSI_MASK == APOLLO_SCSI {
            return self.host.scsi_read(addr, self.board.instance());
        }
        self.get_decoded(offset)
    }

    fn apollo_write_byte(&mut self, addr: u32, offset: u32, value: u8) {
        if offset >= APOLLO_ROM_OFFSET {
            return;
        }
        if offset & APOLLO_SCSI_MASK == APOLLO_SCSI {
            self.host.scsi_write(addr, value, self.board.instance());
            return;
        }
        self.put_decoded(offset, value);
    }

    /// The SCSI subtype only takes effect with a ROM fitted.
    fn masoboshi_scsi_space(&self, offset: u32) -> bool {
        self.board.has_rom()
            && self.board.options().scsi_fitted()
            && matches!(offset, 0xF000..=0xF007 | 0xF800..=0xFBFF)
    }

    fn masoboshi_read_byte(&mut self, addr: u32, offset: u32) -> u8 {
        let instance = self.board.instance();
        if (MASOBOSHI_ROM_START..MASOBOSHI_ROM_END).contains(&offset) {
            return self.board.read_rom(offset);
        }
        if let Some(reg) = self.board.decode(offset) {
            return self.get(reg);
        }
        if self.masoboshi_scsi_space(offset) {
            return self.host.scsi_read(addr, instance);
        }
        match offset {
            MASOBOSHI_IRQ_STATUS => {
                // Bit 0 low: interrupt pending. Bit 1: drive INTRQ.
                let mut value = 0x01;
                if let Some(pair) = self.board.units() {
                    if self.units.irq_pending(pair) {
                        value |= 0x02;
                        self.board.irq_pending = true;
                    }
                }
                if self.board.irq_pending {
                    value &= !0x01;
                }
                value |= self.host.scsi_read(addr, instance);
                // Reading acknowledges.
                self.board.irq_pending = false;
                self.rethink = true;
                value
            }
            MASOBOSHI_CONTROL => self.board.control,
            _ => FILL,
        }
    }

    fn masoboshi_write_byte(&mut self, addr: u32, offset: u32, value: u8) {
        let instance = self.board.instance();
        if let Some(reg) = self.board.decode(offset) {
            self.put(reg, value);
            return;
        }
        if self.masoboshi_scsi_space(offset) {
            self.host.scsi_write(addr, value, instance);
            return;
        }
        match offset {
            MASOBOSHI_IRQ_STATUS..=MASOBOSHI_CONTROL => {
                self.host.scsi_write(addr, value, instance);
                if offset == MASOBOSHI_CONTROL {
                    self.board.control = value;
                    self.board.irq_enabled = value & MASOBOSHI_INTENA != 0;
                    debug!(
                        target: self.target(),
                        "#{instance} control ${value:02X}, interrupts {}",
                        if self.board.irq_enabled { "on" } else { "off" }
                    );
                } else if offset == MASOBOSHI_IRQ_STATUS {
                    self.board.irq_pending = false;
                }
                self.rethink = true;
            }
            // DMA controller.
            0xF04A..=0xF04F => self.host.scsi_write(addr, value, instance),
            _ => {}
        }
    }

    /// AdIDE byte access: the register sits on the low lane of the
    /// shuffled word.
    fn adide_read_byte(&mut self, offset: u32) -> u8 {
        if offset & ADIDE_ROM_OFFSET != 0 {
            return self.board.read_rom(offset);
        }
        let Some(reg) = self.board.decode(offset) else {
            return FILL;
        };
        let raw = if reg.is_data() {
            self.data_in()
        } else {
            u16::from(self.get(reg))
        };
        shuffle_decode(raw) as u8
    }

    fn adide_write_byte(&mut self, offset: u32, value: u8) {
        let Some(reg) = self.board.decode(offset) else {
            return;
        };
        let word = shuffle_encode(u16::from(value));
        if reg.is_data() {
            self.data_out(word);
        } else {
            self.put(reg, word as u8);
        }
    }

    fn mtec_read_byte(&mut self, offset: u32) -> u8 {
        if offset & MTEC_REGISTERS == 0 {
            return self.board.read_rom(offset);
        }
        self.get_decoded(offset)
    }

    // -----------------------------------------------------------------
    // Words

    pub(crate) fn read_word(&mut self, addr: u32) -> u16 {
        let offset = self.offset(addr);
        if self.board.serves_probe(offset) {
            return self.board.probe().read_word(offset);
        }
        if !self.board.is_configured() {
            return 0xFFFF;
        }
        if let Some(value) = self.status_word_read(offset) {
            trace!(target: self.target(), "status read ${offset:05X} = ${value:04X}");
            return value;
        }
        match self.board.decode(offset) {
            Some(reg) if reg.is_data() => self.data_in(),
            Some(reg) => match self.board.layout().word_lane {
                WordLane::Split => self.split_read(addr),
                WordLane::HighByte => u16::from(self.get(reg)) << 8,
                WordLane::Shuffled => shuffle_decode(u16::from(self.get(reg)) << 8),
                WordLane::Ignored => 0,
            },
            None => self.split_read(addr),
        }
    }

    pub(crate) fn write_word(&mut self, addr: u32, value: u16) {
        let offset = self.offset(addr);
        if !self.board.is_configured() {
            // Only D15-D8 reach the configuration latches.
            self.write_byte(addr, (value >> 8) as u8);
            return;
        }
        if self.status_word_write(offset, value) {
            return;
        }
        match self.board.decode(offset) {
            Some(reg) if reg.is_data() => self.data_out(value),
            Some(reg) => match self.board.layout().word_lane {
                WordLane::Split => self.split_write(addr, value),
                WordLane::HighByte => self.put(reg, (value >> 8) as u8),
                WordLane::Shuffled => self.put(reg, (shuffle_encode(value) >> 8) as u8),
                WordLane::Ignored => {}
            },
            None => self.split_write(addr, value),
        }
    }

    fn split_read(&mut self, addr: u32) -> u16 {
        let high = self.read_byte(addr);
        let low = self.read_byte(addr.wrapping_add(1));
        u16::from(high) << 8 | u16::from(low)
    }

    fn split_write(&mut self, addr: u32, value: u16) {
        self.write_byte(addr, (value >> 8) as u8);
        self.write_byte(addr.wrapping_add(1), value as u8);
    }

    /// Word-only status registers, checked ahead of the decoder.
    fn status_word_read(&mut self, offset: u32) -> Option<u16> {
        match self.board.variant() {
            Variant::Alf if offset == ALF_IRQ_STATUS => Some(
                if self.board.irq_enabled && self.board.irq_pending {
                    0x8000
                } else {
                    0
                },
            ),
            Variant::GvpController | Variant::GvpBootRom
                if !self.board.is_rom_only() && offset < GVP_STATUS_END =>
            {
                let value = match self.board.gvp_model() {
                    GvpModel::SeriesI if offset & 0x440 == 0x040 => {
                        let value = if self.board.irq_pending { 0x8000 } else { 0 };
                        self.sample_irq();
                        value
                    }
                    GvpModel::SeriesII if offset == GVP_INTENA => {
                        if self.board.irq_enabled { GVP_INTENA_BIT } else { 0 }
                    }
                    _ => 0xFFFF,
                };
                Some(value)
            }
            _ => None,
        }
    }

    fn status_word_write(&mut self, offset: u32, value: u16) -> bool {
        match self.board.variant() {
            Variant::GvpController | Variant::GvpBootRom
                if !self.board.is_rom_only() && offset < GVP_STATUS_END =>
            {
                if self.board.gvp_model() == GvpModel::SeriesII && offset == GVP_INTENA {
                    self.board.irq_enabled = value & GVP_INTENA_BIT != 0;
                    debug!(
                        target: self.target(),
                        "interrupts {}",
                        if self.board.irq_enabled { "on" } else { "off" }
                    );
                    self.rethink = true;
                }
                true
            }
            _ => false,
        }
    }

    // -----------------------------------------------------------------
    // Longs

    pub(crate) fn read_long(&mut self, addr: u32) -> u32 {
        let high = self.read_word(addr);
        let low = self.read_word(addr.wrapping_add(2));
        u32::from(high) << 16 | u32::from(low)
    }

    pub(crate) fn write_long(&mut self, addr: u32, value: u32) {
        self.write_word(addr, (value >> 16) as u16);
        self.write_word(addr.wrapping_add(2), value as u16);
    }
}
