//! What boards need from the rest of the machine.

use zorro_autoconfig::ExpansionBus;

/// Co-processor sharing a board's window (SCSI chip, DMA engine).
///
/// `instance` identifies which copy of the board is asking.
pub trait ScsiPort {
    fn scsi_read(&mut self, addr: u32, instance: usize) -> u8;

    fn scsi_write(&mut self, addr: u32, value: u8, instance: usize);
}

/// The expansion-bus interrupt line (INT2).
pub trait InterruptLine {
    fn is_asserted(&self) -> bool;

    fn assert_line(&mut self);
}

/// Everything a board access may touch on the host side.
pub trait Host: ExpansionBus + ScsiPort + InterruptLine {}

impl<T: ExpansionBus + ScsiPort + InterruptLine + ?Sized> Host for T {}
