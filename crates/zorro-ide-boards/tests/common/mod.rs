//! Fake drives and host shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

use zorro_ide_boards::{
    BoardConfig, BoardId, ControllersConfig, DiskUnits, ExpansionBus, IdeControllers,
    InterruptLine, RegisterRef, ScsiPort, SlotHandle, UnitId, UnitPair,
};

/// Autoconfig space the prober reads unconfigured boards through.
pub const CONFIG_SPACE: u32 = 0xE8_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Allocate(usize),
    Release(UnitPair),
    StartWorker,
    StopWorker,
}

#[derive(Default)]
pub struct FakeUnits {
    pub registers: HashMap<(UnitId, RegisterRef), u8>,
    pub register_writes: Vec<(UnitId, RegisterRef, u8)>,
    pub data: VecDeque<u16>,
    pub data_reads: Vec<UnitId>,
    pub data_writes: Vec<(UnitId, u16)>,
    /// Pending INTRQ, keyed by the pair's primary unit.
    pub irq: HashMap<UnitId, bool>,
    pub secondary: HashMap<UnitId, bool>,
    pub tick_reports_change: bool,
    pub ticks: Vec<UnitPair>,
    pub events: Vec<Event>,
}

impl FakeUnits {
    pub fn set_irq(&mut self, pair: UnitPair, pending: bool) {
        self.irq.insert(pair.primary, pending);
    }

    pub fn set_register(&mut self, unit: UnitId, reg: RegisterRef, value: u8) {
        self.registers.insert((unit, reg), value);
    }

    pub fn select_secondary(&mut self, pair: UnitPair, on: bool) {
        self.secondary.insert(pair.primary, on);
    }
}

impl DiskUnits for FakeUnits {
    fn allocate_pair(&mut self, slot: usize) -> UnitPair {
        self.events.push(Event::Allocate(slot));
        UnitPair {
            primary: UnitId(slot * 2),
            secondary: UnitId(slot * 2 + 1),
        }
    }

    fn release_pair(&mut self, pair: UnitPair) {
        self.events.push(Event::Release(pair));
    }

    fn secondary_selected(&self, pair: UnitPair) -> bool {
        self.secondary.get(&pair.primary).copied().unwrap_or(false)
    }

    fn read_data(&mut self, unit: UnitId) -> u16 {
        self.data_reads.push(unit);
        self.data.pop_front().unwrap_or(0)
    }

    fn write_data(&mut self, unit: UnitId, value: u16) {
        self.data_writes.push((unit, value));
    }

    fn read_register(&mut self, unit: UnitId, reg: RegisterRef) -> u8 {
        self.registers.get(&(unit, reg)).copied().unwrap_or(0)
    }

    fn write_register(&mut self, unit: UnitId, reg: RegisterRef, value: u8) {
        self.register_writes.push((unit, reg, value));
    }

    fn irq_pending(&mut self, pair: UnitPair) -> bool {
        self.irq.get(&pair.primary).copied().unwrap_or(false)
    }

    fn tick_line(&mut self, pair: UnitPair) -> bool {
        self.ticks.push(pair);
        self.tick_reports_change
    }

    fn start_worker(&mut self) {
        self.events.push(Event::StartWorker);
    }

    fn stop_worker(&mut self) {
        self.events.push(Event::StopWorker);
    }
}

#[derive(Default)]
pub struct FakeHost {
    pub mapped: Vec<(u32, u32)>,
    pub shut_up: usize,
    pub scsi_value: u8,
    pub scsi_reads: Vec<(u32, usize)>,
    pub scsi_writes: Vec<(u32, u8, usize)>,
    pub line: bool,
    pub asserts: usize,
}

impl ExpansionBus for FakeHost {
    fn map_window(&mut self, base: u32, size: u32) {
        self.mapped.push((base, size));
    }

    fn shut_up(&mut self) {
        self.shut_up += 1;
    }
}

impl ScsiPort for FakeHost {
    fn scsi_read(&mut self, addr: u32, instance: usize) -> u8 {
        self.scsi_reads.push((addr, instance));
        self.scsi_value
    }

    fn scsi_write(&mut self, addr: u32, value: u8, instance: usize) {
        self.scsi_writes.push((addr, value, instance));
    }
}

impl InterruptLine for FakeHost {
    fn is_asserted(&self) -> bool {
        self.line
    }

    fn assert_line(&mut self) {
        self.line = true;
        self.asserts += 1;
    }
}

pub fn controllers() -> IdeControllers<FakeUnits> {
    IdeControllers::new(&ControllersConfig::default(), FakeUnits::default())
}

pub fn controllers_with(config: ControllersConfig) -> IdeControllers<FakeUnits> {
    IdeControllers::new(&config, FakeUnits::default())
}

/// Fit a board on the next free prober handle.
pub fn add(
    ctl: &mut IdeControllers<FakeUnits>,
    config: BoardConfig,
    rom: Option<&[u8]>,
) -> BoardId {
    let handle = SlotHandle(ctl.registry().len() as u32 + 100);
    ctl.add_board(handle, &config, rom).unwrap()
}

/// Configure board `id` at `base` (A23-A16 in the high byte).
pub fn configure(ctl: &mut IdeControllers<FakeUnits>, host: &mut FakeHost, id: BoardId, base: u32) {
    ctl.write_byte(id, host, CONFIG_SPACE + 0x48, (base >> 16) as u8);
    assert_eq!(ctl.board(id).unwrap().base(), Some(base));
}

/// A ROM image whose every byte is its own low address bits.
pub fn ramp(len: usize) -> Vec<u8> {
    (0..len).map(|i| i as u8).collect()
}
