//! Zorro II autoconfig, board side.
//!
//! Every expansion board starts life invisible to the CPU except for a
//! 64-byte probe window in the configuration space. The host reads the
//! probe image, decides where the board should live, then either writes
//! the base address (the board maps itself and the host moves on to the
//! next slot) or tells the board to shut up.
//!
//! This crate covers the parts of that handshake every board shares:
//! - [`ProbeImage`]: the nibble-split, mostly inverted identification block
//! - [`Autoconfig`]: the Unconfigured → Configured / ShutUp state machine
//! - [`ExpansionBus`]: what the board asks of the host when it configures

mod probe;
mod state;

pub use probe::{
    size_from_er_type, ProbeError, ProbeImage, DESCRIPTOR_SIZE, ER_TYPE_ROM_VECTOR, FILL,
    PROBE_SIZE,
};
pub use state::{
    Autoconfig, AutoconfigState, ConfigWrite, ExpansionBus, REG_BASE_ADDRESS, REG_SHUT_UP,
};
