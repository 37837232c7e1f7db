//! Third-party Zorro II IDE controllers.
//!
//! Seven boards, one shape: an autoconfig probe, a boot ROM somewhere in a
//! 64 or 128 KB window, and a pair of ATA drives reached through whatever
//! address lines the designer had spare. This crate is the memory-mapped
//! front end of those boards:
//!
//! - [`variant`]: per-board quirk table (window, ROM wiring, byte order)
//! - [`decode`]: address → task-file register decoders
//! - [`IdeControllers`]: registry, CPU access paths, interrupt aggregation
//!
//! The drives themselves sit behind [`DiskUnits`]; the rest of the machine
//! behind [`Host`].

mod access;
mod board;
pub mod codec;
mod config;
mod controllers;
pub mod decode;
mod error;
mod host;
pub mod irq;
mod registry;
mod rom;
mod units;
pub mod variant;

pub use board::{Board, BoardId, SlotHandle};
pub use config::{ApolloMount, BoardConfig, BoardOptions, ControllersConfig, GvpModel};
pub use controllers::IdeControllers;
pub use decode::{Channel, RegisterRef};
pub use error::{IdeError, Result};
pub use host::{Host, InterruptLine, ScsiPort};
pub use registry::{Registry, REGISTRY_CAPACITY};
pub use rom::Rom;
pub use units::{DiskUnits, UnitId, UnitPair};
pub use variant::{Variant, MAX_DUPLICATE_BOARDS, UNIT_SLOTS};

pub use zorro_autoconfig::{AutoconfigState, ExpansionBus, ProbeImage, FILL};
