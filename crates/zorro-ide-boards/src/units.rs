//! Disk units and the register bridge.
//!
//! The drive emulation itself (task-file state machine, data buffers,
//! command execution, the background worker) lives outside this crate
//! behind [`DiskUnits`]. Boards only translate bus accesses into
//! register reads and writes on a pair of units.

use crate::decode::RegisterRef;

/// One emulated drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub usize);

/// Master and slave on one cable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitPair {
    pub primary: UnitId,
    pub secondary: UnitId,
}

/// Register-level interface to the drive emulation.
pub trait DiskUnits {
    /// Allocate, or re-attach, the pair of units for unit-table `slot`.
    fn allocate_pair(&mut self, slot: usize) -> UnitPair;

    fn release_pair(&mut self, pair: UnitPair);

    /// Whether the device-select bit of `pair` currently points at the
    /// secondary unit.
    fn secondary_selected(&self, pair: UnitPair) -> bool;

    fn read_data(&mut self, unit: UnitId) -> u16;

    fn write_data(&mut self, unit: UnitId, value: u16);

    fn read_register(&mut self, unit: UnitId, reg: RegisterRef) -> u8;

    fn write_register(&mut self, unit: UnitId, reg: RegisterRef, value: u8);

    /// Either unit of `pair` is asserting INTRQ.
    fn irq_pending(&mut self, pair: UnitPair) -> bool;

    /// Advance per-scanline timers. Returns true if interrupt state may
    /// have changed.
    fn tick_line(&mut self, pair: UnitPair) -> bool;

    /// Start the shared command worker. Idempotent.
    fn start_worker(&mut self);

    /// Stop the shared command worker and wait for it.
    fn stop_worker(&mut self);
}

/// Unit the pair's device select currently addresses.
pub fn selected<U: DiskUnits + ?Sized>(units: &U, pair: UnitPair) -> UnitId {
    if units.secondary_selected(pair) {
        pair.secondary
    } else {
        pair.primary
    }
}

/// Read `reg` from the selected unit. The data port yields a full word,
/// everything else a zero-extended byte.
pub fn read<U: DiskUnits + ?Sized>(units: &mut U, pair: UnitPair, reg: RegisterRef) -> u16 {
    let unit = selected(units, pair);
    if reg.is_data() {
        units.read_data(unit)
    } else {
        u16::from(units.read_register(unit, reg))
    }
}

/// Write `reg` on the selected unit. Only the data port takes the high
/// byte.
pub fn write<U: DiskUnits + ?Sized>(units: &mut U, pair: UnitPair, reg: RegisterRef, value: u16) {
    let unit = selected(units, pair);
    if reg.is_data() {
        units.write_data(unit, value);
    } else {
        units.write_register(unit, reg, value as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        secondary: bool,
        log: Vec<(UnitId, RegisterRef, u16)>,
    }

    impl DiskUnits for Recorder {
        fn allocate_pair(&mut self, slot: usize) -> UnitPair {
            UnitPair {
                primary: UnitId(slot * 2),
                secondary: UnitId(slot * 2 + 1),
            }
        }
        fn release_pair(&mut self, _pair: UnitPair) {}
        fn secondary_selected(&self, _pair: UnitPair) -> bool {
            self.secondary
        }
        fn read_data(&mut self, unit: UnitId) -> u16 {
            0x1000 + unit.0 as u16
        }
        fn write_data(&mut self, unit: UnitId, value: u16) {
            self.log.push((unit, RegisterRef::DATA, value));
        }
        fn read_register(&mut self, unit: UnitId, reg: RegisterRef) -> u8 {
            (unit.0 as u8) << 4 | reg.index
        }
        fn write_register(&mut self, unit: UnitId, reg: RegisterRef, value: u8) {
            self.log.push((unit, reg, u16::from(value)));
        }
        fn irq_pending(&mut self, _pair: UnitPair) -> bool {
            false
        }
        fn tick_line(&mut self, _pair: UnitPair) -> bool {
            false
        }
        fn start_worker(&mut self) {}
        fn stop_worker(&mut self) {}
    }

    #[test]
    fn device_select_picks_the_unit() {
        let mut units = Recorder::default();
        let pair = units.allocate_pair(1);
        assert_eq!(read(&mut units, pair, RegisterRef::primary(7)), 0x27);
        units.secondary = true;
        assert_eq!(read(&mut units, pair, RegisterRef::primary(7)), 0x37);
        assert_eq!(read(&mut units, pair, RegisterRef::DATA), 0x1003);
    }

    #[test]
    fn register_writes_truncate_to_a_byte() {
        let mut units = Recorder::default();
        let pair = units.allocate_pair(0);
        write(&mut units, pair, RegisterRef::primary(2), 0x1234);
        write(&mut units, pair, RegisterRef::DATA, 0xBEEF);
        assert_eq!(
            units.log,
            vec![
                (UnitId(0), RegisterRef::primary(2), 0x34),
                (UnitId(0), RegisterRef::DATA, 0xBEEF),
            ]
        );
    }
}
