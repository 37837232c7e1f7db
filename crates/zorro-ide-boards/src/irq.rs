//! Interrupt aggregation.
//!
//! Every board drives the same level-triggered expansion interrupt. The
//! line is recomputed by OR-ing all boards together and only ever asserted
//! from here; the host's interrupt acknowledge clears it.

use log::trace;

use crate::board::Board;
use crate::host::InterruptLine;
use crate::registry::Registry;
use crate::units::DiskUnits;

/// Refresh `board`'s pending latch from its drives.
pub fn sample<U: DiskUnits + ?Sized>(board: &mut Board, units: &mut U) -> bool {
    if !board.is_configured() {
        return false;
    }
    let Some(pair) = board.units() else {
        return false;
    };
    board.irq_pending = units.irq_pending(pair);
    board.irq_pending
}

/// Whether `board` is currently pulling the line.
pub fn board_asserts<U: DiskUnits + ?Sized>(board: &mut Board, units: &mut U) -> bool {
    board.is_configured() && board.irq_enabled && sample(board, units)
}

/// Recompute the shared line. Returns the aggregate level.
pub fn rethink<U, L>(registry: &mut Registry, units: &mut U, line: &mut L) -> bool
where
    U: DiskUnits + ?Sized,
    L: InterruptLine + ?Sized,
{
    let mut irq = false;
    registry.for_each_mut(|_, board| irq |= board_asserts(board, &mut *units));
    if irq && !line.is_asserted() {
        trace!(target: "IDE", "asserting INT2");
        line.assert_line();
    }
    irq
}

/// Per-scanline tick: advance drive timers and re-aggregate if anything
/// may have changed.
pub fn hsync<U, L>(registry: &mut Registry, units: &mut U, line: &mut L)
where
    U: DiskUnits + ?Sized,
    L: InterruptLine + ?Sized,
{
    let mut dirty = false;
    registry.for_each_mut(|_, board| {
        if !board.is_configured() {
            return;
        }
        let Some(pair) = board.units() else {
            return;
        };
        let ticked = units.tick_line(pair);
        let pending = sample(board, &mut *units);
        dirty |= ticked || pending;
    });
    if dirty {
        rethink(registry, units, line);
    }
}
