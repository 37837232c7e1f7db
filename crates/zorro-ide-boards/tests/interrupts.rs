//! Interrupt aggregation, per-board enables and the status registers that
//! report pending interrupts.

mod common;

use common::{add, configure, controllers, controllers_with, FakeHost};
use zorro_ide_boards::{
    BoardConfig, BoardId, BoardOptions, ControllersConfig, GvpModel, IdeControllers, Variant,
};

use common::FakeUnits;

fn alf_plus() -> BoardConfig {
    BoardConfig::new(Variant::Alf).options(BoardOptions {
        alf_plus: true,
        ..BoardOptions::default()
    })
}

fn set_irq(ctl: &mut IdeControllers<FakeUnits>, id: BoardId, pending: bool) {
    let pair = ctl.board(id).unwrap().units().unwrap();
    ctl.units_mut().set_irq(pair, pending);
}

/// Fit and map a Masoboshi with its interrupt enable bit set.
fn enabled_masoboshi(
    ctl: &mut IdeControllers<FakeUnits>,
    host: &mut FakeHost,
    instance: usize,
    base: u32,
) -> BoardId {
    let id = add(ctl, BoardConfig::new(Variant::Masoboshi).instance(instance), None);
    configure(ctl, host, id, base);
    ctl.write_byte(id, host, base + 0xF047, 0x08);
    id
}

#[test]
fn rethink_ors_all_boards() {
    let mut ctl = controllers();
    let mut host = FakeHost::default();
    let ids: Vec<_> = (0..3)
        .map(|i| enabled_masoboshi(&mut ctl, &mut host, i, 0xE9_0000 + ((i as u32) << 16)))
        .collect();
    assert!(!ctl.rethink(&mut host));
    assert!(!host.line);

    set_irq(&mut ctl, ids[1], true);
    assert!(ctl.rethink(&mut host));
    assert!(host.line);
    assert_eq!(host.asserts, 1);
    assert!(ctl.board(ids[1]).unwrap().irq_pending());
    assert!(!ctl.board(ids[0]).unwrap().irq_pending());
}

#[test]
fn rethink_does_not_reassert_a_held_line() {
    let mut ctl = controllers();
    let mut host = FakeHost::default();
    let id = add(&mut ctl, alf_plus(), None);
    configure(&mut ctl, &mut host, id, 0xE9_0000);
    set_irq(&mut ctl, id, true);

    ctl.rethink(&mut host);
    ctl.rethink(&mut host);
    assert_eq!(host.asserts, 1);

    // Host acknowledged; a still-pending board raises it again.
    host.line = false;
    ctl.rethink(&mut host);
    assert_eq!(host.asserts, 2);
}

#[test]
fn unconfigured_boards_never_interrupt() {
    let mut ctl = controllers();
    let mut host = FakeHost::default();
    let id = add(&mut ctl, alf_plus(), None);
    assert!(ctl.board(id).unwrap().irq_enabled());
    set_irq(&mut ctl, id, true);
    assert!(!ctl.rethink(&mut host));
    assert!(!host.line);
}

#[test]
fn boards_without_an_enable_never_interrupt() {
    let mut ctl = controllers();
    let mut host = FakeHost::default();
    let ids = [Variant::Apollo, Variant::AdIde, Variant::Mtec]
        .into_iter()
        .enumerate()
        .map(|(i, variant)| {
            let id = add(&mut ctl, BoardConfig::new(variant), None);
            configure(&mut ctl, &mut host, id, 0xEA_0000 + ((i as u32) << 17));
            id
        })
        .collect::<Vec<_>>();
    for &id in &ids {
        assert!(!ctl.board(id).unwrap().irq_enabled());
        set_irq(&mut ctl, id, true);
    }
    assert!(!ctl.rethink(&mut host));
    ctl.hsync(&mut host);
    assert!(!host.line);
    assert_eq!(host.asserts, 0);
}

#[test]
fn disabled_board_holds_its_interrupt() {
    let mut ctl = controllers();
    let mut host = FakeHost::default();
    let id = add(&mut ctl, BoardConfig::new(Variant::Masoboshi), None);
    configure(&mut ctl, &mut host, id, 0xE9_0000);
    set_irq(&mut ctl, id, true);
    assert!(!ctl.rethink(&mut host));

    // Setting the enable bit re-aggregates straight away.
    ctl.write_byte(id, &mut host, 0xE9_F047, 0x08);
    assert!(host.line);
    assert_eq!(ctl.read_byte(id, &mut host, 0xE9_F047), 0x08);
}

#[test]
fn hsync_ticks_configured_boards_and_raises_pending() {
    let mut ctl = controllers();
    let mut host = FakeHost::default();
    let live = enabled_masoboshi(&mut ctl, &mut host, 0, 0xE9_0000);
    let idle = add(&mut ctl, BoardConfig::new(Variant::Masoboshi).instance(1), None);

    ctl.hsync(&mut host);
    assert!(!host.line);
    let live_pair = ctl.board(live).unwrap().units().unwrap();
    assert_eq!(ctl.units().ticks, vec![live_pair]);
    assert!(ctl.board(idle).unwrap().units().is_some());

    set_irq(&mut ctl, live, true);
    ctl.hsync(&mut host);
    assert!(host.line);
    assert_eq!(host.asserts, 1);
}

#[test]
fn hsync_without_pending_work_leaves_the_line_alone() {
    let mut ctl = controllers();
    let mut host = FakeHost::default();
    enabled_masoboshi(&mut ctl, &mut host, 0, 0xE9_0000);
    ctl.units_mut().tick_reports_change = true;
    ctl.hsync(&mut host);
    assert!(!host.line);
    assert_eq!(host.asserts, 0);
}

#[test]
fn masoboshi_status_reports_and_acknowledges() {
    let mut ctl = controllers();
    let mut host = FakeHost {
        scsi_value: 0x40,
        ..FakeHost::default()
    };
    let id = add(&mut ctl, BoardConfig::new(Variant::Masoboshi), None);
    configure(&mut ctl, &mut host, id, 0xE9_0000);

    // Nothing pending: bit 0 high, SCSI status merged in.
    assert_eq!(ctl.read_byte(id, &mut host, 0xE9_F040), 0x41);

    set_irq(&mut ctl, id, true);
    // Drive INTRQ on bit 1, pending shown as bit 0 low.
    assert_eq!(ctl.read_byte(id, &mut host, 0xE9_F040), 0x42);
    assert!(!ctl.board(id).unwrap().irq_pending());
    assert_eq!(host.scsi_reads, vec![(0xE9_F040, 0), (0xE9_F040, 0)]);
}

#[test]
fn masoboshi_status_write_clears_the_latch() {
    let mut ctl = controllers();
    let mut host = FakeHost::default();
    let id = add(&mut ctl, BoardConfig::new(Variant::Masoboshi), None);
    configure(&mut ctl, &mut host, id, 0xE9_0000);
    ctl.write_byte(id, &mut host, 0xE9_F047, 0x08);
    set_irq(&mut ctl, id, true);
    ctl.rethink(&mut host);
    assert!(ctl.board(id).unwrap().irq_pending());

    set_irq(&mut ctl, id, false);
    ctl.write_byte(id, &mut host, 0xE9_F040, 0x00);
    assert!(!ctl.board(id).unwrap().irq_pending());
    assert!(host.scsi_writes.contains(&(0xE9_F040, 0x00, 0)));
}

#[test]
fn alf_plus_status_word() {
    let mut ctl = controllers();
    let mut host = FakeHost::default();
    let id = add(&mut ctl, alf_plus(), None);
    configure(&mut ctl, &mut host, id, 0xE9_0000);
    assert_eq!(ctl.read_word(id, &mut host, 0xE9_4000), 0);

    set_irq(&mut ctl, id, true);
    ctl.rethink(&mut host);
    assert_eq!(ctl.read_word(id, &mut host, 0xE9_4000), 0x8000);
}

#[test]
fn plain_alf_has_no_interrupt() {
    let mut ctl = controllers();
    let mut host = FakeHost::default();
    let id = add(&mut ctl, BoardConfig::new(Variant::Alf), None);
    configure(&mut ctl, &mut host, id, 0xE9_0000);
    set_irq(&mut ctl, id, true);
    assert!(!ctl.rethink(&mut host));
    assert_eq!(ctl.read_word(id, &mut host, 0xE9_4000), 0);
}

#[test]
fn gvp_series_ii_enable_register() {
    let mut ctl = controllers();
    let mut host = FakeHost::default();
    let rom = add(&mut ctl, BoardConfig::new(Variant::GvpBootRom), None);
    let id = add(&mut ctl, BoardConfig::new(Variant::GvpController), None);
    configure(&mut ctl, &mut host, rom, 0xE9_0000);
    configure(&mut ctl, &mut host, id, 0xEA_0000);
    set_irq(&mut ctl, id, true);

    assert_eq!(ctl.read_word(id, &mut host, 0xEA_0040), 0);
    assert!(!ctl.rethink(&mut host));

    ctl.write_word(id, &mut host, 0xEA_0040, 0x0008);
    assert!(ctl.board(id).unwrap().irq_enabled());
    assert_eq!(ctl.read_word(id, &mut host, 0xEA_0040), 0x0008);
    assert!(host.line);

    // Interrupt request latch on the byte bus.
    assert_eq!(ctl.read_byte(id, &mut host, 0xEA_0440), 0x40);
    // Other control-latch words read open.
    assert_eq!(ctl.read_word(id, &mut host, 0xEA_0050), 0xFFFF);
}

#[test]
fn gvp_series_i_status_bit() {
    let mut ctl = controllers_with(ControllersConfig {
        gvp_model: GvpModel::SeriesI,
    });
    let mut host = FakeHost::default();
    let id = add(&mut ctl, BoardConfig::new(Variant::GvpBootRom), None);
    configure(&mut ctl, &mut host, id, 0xE9_0000);
    assert!(ctl.board(id).unwrap().irq_enabled());

    set_irq(&mut ctl, id, true);
    // First read shows the stale latch, then samples the drive.
    assert_eq!(ctl.read_byte(id, &mut host, 0xE9_0040), 0x00);
    assert!(host.line);
    assert_eq!(ctl.read_byte(id, &mut host, 0xE9_0040), 0x80);
    assert_eq!(ctl.read_word(id, &mut host, 0xE9_0040), 0x8000);
}

#[test]
fn reset_clears_enables_until_the_board_is_mapped_again() {
    let mut ctl = controllers();
    let mut host = FakeHost::default();
    let rom = add(&mut ctl, BoardConfig::new(Variant::GvpBootRom), None);
    let id = add(&mut ctl, BoardConfig::new(Variant::GvpController), None);
    let alf = add(&mut ctl, alf_plus(), None);
    configure(&mut ctl, &mut host, rom, 0xE9_0000);
    configure(&mut ctl, &mut host, id, 0xEA_0000);
    configure(&mut ctl, &mut host, alf, 0xEB_0000);
    ctl.write_word(id, &mut host, 0xEA_0040, 0x0008);

    ctl.reset();
    assert!(!ctl.board(id).unwrap().irq_enabled());
    assert!(!ctl.board(alf).unwrap().irq_enabled());

    // ALF+ has no enable register; mapping the board arms it again.
    configure(&mut ctl, &mut host, alf, 0xEB_0000);
    configure(&mut ctl, &mut host, id, 0xEA_0000);
    assert!(ctl.board(alf).unwrap().irq_enabled());
    assert!(!ctl.board(id).unwrap().irq_enabled());
}
