//! The controller context: every fitted board plus the drive emulation.
//!
//! The emulator keeps one [`IdeControllers`] per session. The expansion
//! prober adds boards and resolves them to its slots; the memory map routes
//! CPU accesses either to a specific board ([`read_byte`] and friends) or
//! by address ([`bget`] and friends); the chipset calls [`rethink`] and
//! [`hsync`]; reset and teardown go through [`reset`] and [`shutdown`].
//!
//! [`read_byte`]: IdeControllers::read_byte
//! [`bget`]: IdeControllers::bget
//! [`rethink`]: IdeControllers::rethink
//! [`hsync`]: IdeControllers::hsync
//! [`reset`]: IdeControllers::reset
//! [`shutdown`]: IdeControllers::shutdown

use log::{debug, info, warn};
use zorro_autoconfig::FILL;

use crate::access::Access;
use crate::board::{Board, BoardId, SlotHandle};
use crate::config::{BoardConfig, ControllersConfig, GvpModel};
use crate::error::{IdeError, Result};
use crate::host::{Host, InterruptLine};
use crate::irq;
use crate::registry::{Registry, REGISTRY_CAPACITY};
use crate::units::DiskUnits;

pub struct IdeControllers<U: DiskUnits> {
    registry: Registry,
    units: U,
    gvp_model: GvpModel,
    worker_running: bool,
}

impl<U: DiskUnits> IdeControllers<U> {
    pub fn new(config: &ControllersConfig, units: U) -> Self {
        Self {
            registry: Registry::new(),
            units,
            gvp_model: config.gvp_model,
            worker_running: false,
        }
    }

    #[must_use]
    pub fn gvp_model(&self) -> GvpModel {
        self.gvp_model
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn board(&self, id: BoardId) -> Option<&Board> {
        self.registry.get(id)
    }

    #[must_use]
    pub fn units(&self) -> &U {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut U {
        &mut self.units
    }

    /// Fit a board for prober slot `handle`.
    ///
    /// Adding the same handle twice returns the existing board. A board
    /// already occupying the same `(variant, instance)` is replaced, but
    /// only once the new board has been built.
    pub fn add_board(
        &mut self,
        handle: SlotHandle,
        config: &BoardConfig,
        rom: Option<&[u8]>,
    ) -> Result<BoardId> {
        if let Some(id) = self.registry.find_owner(handle) {
            debug!(target: "IDE", "slot {handle:?} already has board {id:?}");
            return Ok(id);
        }
        let variant = config.variant;
        let max = variant.max_instances();
        if config.instance >= max {
            return Err(IdeError::InstanceOutOfRange {
                variant,
                instance: config.instance,
                max,
            });
        }
        let layout = variant.layout(&config.options, self.gvp_model)?;
        // Everything fallible about the new board happens before the old
        // one is touched.
        let mut board = Board::new(config, self.gvp_model, layout, None, rom)?;
        match self.registry.find_instance(variant, config.instance) {
            Some(old) => {
                warn!(
                    target: variant.log_target(),
                    "{variant} #{} replaced",
                    config.instance
                );
                self.remove_board(old)?;
            }
            None if self.registry.is_full() => {
                return Err(IdeError::RegistryFull {
                    capacity: REGISTRY_CAPACITY,
                });
            }
            None => {}
        }

        let units = layout
            .has_units
            .then(|| self.units.allocate_pair(variant.unit_slot(config.instance)));
        board.attach_units(units);
        let id = match self.registry.allocate(handle, board) {
            Ok(id) => id,
            Err(err) => {
                if let Some(pair) = units {
                    self.units.release_pair(pair);
                }
                return Err(err);
            }
        };
        if units.is_some() && !self.worker_running {
            self.units.start_worker();
            self.worker_running = true;
        }
        info!(
            target: variant.log_target(),
            "{variant} #{} fitted{}",
            config.instance,
            if rom.is_some() { "" } else { " without ROM" }
        );
        Ok(id)
    }

    /// The board waiting on prober slot `handle`, once.
    pub fn resolve(&mut self, handle: SlotHandle) -> Option<BoardId> {
        self.registry.resolve(handle)
    }

    /// Take a board out and release its drives.
    pub fn remove_board(&mut self, id: BoardId) -> Result<()> {
        let board = self.registry.remove(id).ok_or(IdeError::UnknownBoard(id))?;
        if let Some(pair) = board.units() {
            self.units.release_pair(pair);
        }
        debug!(
            target: board.variant().log_target(),
            "{} #{} removed",
            board.variant(),
            board.instance()
        );
        Ok(())
    }

    #[must_use]
    pub fn find_by_address(&self, addr: u32) -> Option<BoardId> {
        self.registry.find_by_address(addr)
    }

    fn with_board<H, R>(
        &mut self,
        id: BoardId,
        host: &mut H,
        f: impl FnOnce(&mut Access<'_, U, H>) -> R,
    ) -> Option<R>
    where
        H: Host + ?Sized,
    {
        let board = self.registry.get_mut(id)?;
        let mut access = Access::new(board, &mut self.units, &mut *host);
        let result = f(&mut access);
        let rethink = access.needs_rethink();
        if rethink {
            self.rethink(&mut *host);
        }
        Some(result)
    }

    // Board-bound accesses. An id with no board behind it reads open bus.

    pub fn read_byte<H: Host + ?Sized>(&mut self, id: BoardId, host: &mut H, addr: u32) -> u8 {
        self.with_board(id, host, |a| a.read_byte(addr))
            .unwrap_or(FILL)
    }

    pub fn read_word<H: Host + ?Sized>(&mut self, id: BoardId, host: &mut H, addr: u32) -> u16 {
        self.with_board(id, host, |a| a.read_word(addr))
            .unwrap_or(0xFFFF)
    }

    pub fn read_long<H: Host + ?Sized>(&mut self, id: BoardId, host: &mut H, addr: u32) -> u32 {
        self.with_board(id, host, |a| a.read_long(addr))
            .unwrap_or(0xFFFF_FFFF)
    }

    pub fn write_byte<H: Host + ?Sized>(&mut self, id: BoardId, host: &mut H, addr: u32, value: u8) {
        self.with_board(id, host, |a| a.write_byte(addr, value));
    }

    pub fn write_word<H: Host + ?Sized>(&mut self, id: BoardId, host: &mut H, addr: u32, value: u16) {
        self.with_board(id, host, |a| a.write_word(addr, value));
    }

    pub fn write_long<H: Host + ?Sized>(&mut self, id: BoardId, host: &mut H, addr: u32, value: u32) {
        self.with_board(id, host, |a| a.write_long(addr, value));
    }

    // Generic dispatch by address.

    pub fn bget<H: Host + ?Sized>(&mut self, host: &mut H, addr: u32) -> u8 {
        match self.find_by_address(addr) {
            Some(id) => self.read_byte(id, host, addr),
            None => FILL,
        }
    }

    pub fn wget<H: Host + ?Sized>(&mut self, host: &mut H, addr: u32) -> u16 {
        match self.find_by_address(addr) {
            Some(id) => self.read_word(id, host, addr),
            None => 0xFFFF,
        }
    }

    pub fn lget<H: Host + ?Sized>(&mut self, host: &mut H, addr: u32) -> u32 {
        match self.find_by_address(addr) {
            Some(id) => self.read_long(id, host, addr),
            None => 0xFFFF_FFFF,
        }
    }

    pub fn bput<H: Host + ?Sized>(&mut self, host: &mut H, addr: u32, value: u8) {
        if let Some(id) = self.find_by_address(addr) {
            self.write_byte(id, host, addr, value);
        }
    }

    pub fn wput<H: Host + ?Sized>(&mut self, host: &mut H, addr: u32, value: u16) {
        if let Some(id) = self.find_by_address(addr) {
            self.write_word(id, host, addr, value);
        }
    }

    pub fn lput<H: Host + ?Sized>(&mut self, host: &mut H, addr: u32, value: u32) {
        if let Some(id) = self.find_by_address(addr) {
            self.write_long(id, host, addr, value);
        }
    }

    /// Recompute the shared expansion interrupt.
    pub fn rethink<L: InterruptLine + ?Sized>(&mut self, line: &mut L) -> bool {
        irq::rethink(&mut self.registry, &mut self.units, line)
    }

    /// Once per scanline.
    pub fn hsync<L: InterruptLine + ?Sized>(&mut self, line: &mut L) {
        irq::hsync(&mut self.registry, &mut self.units, line);
    }

    /// Machine reset: every board back to the probe.
    pub fn reset(&mut self) {
        self.registry.for_each_mut(|_, board| board.reset());
        info!(target: "IDE", "reset, {} boards", self.registry.len());
    }

    /// Stop the worker, release every board's drives, empty the registry.
    /// Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.worker_running {
            self.units.stop_worker();
            self.worker_running = false;
        }
        for board in self.registry.drain() {
            if let Some(pair) = board.units() {
                self.units.release_pair(pair);
            }
        }
    }
}

impl<U: DiskUnits> Drop for IdeControllers<U> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
