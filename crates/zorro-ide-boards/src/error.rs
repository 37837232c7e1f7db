use thiserror::Error;
use zorro_autoconfig::ProbeError;

use crate::board::BoardId;
use crate::variant::Variant;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdeError {
    #[error("board registry full ({capacity} boards)")]
    RegistryFull { capacity: usize },

    #[error("{variant} instance {instance} out of range (at most {max} fitted)")]
    InstanceOutOfRange {
        variant: Variant,
        instance: usize,
        max: usize,
    },

    #[error("no board with handle {0:?}")]
    UnknownBoard(BoardId),

    #[error("invalid board configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("bad probe image: {0}")]
    Probe(#[from] ProbeError),
}

pub type Result<T> = std::result::Result<T, IdeError>;
