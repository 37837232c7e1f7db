//! Board configuration.
//!
//! What the emulator's settings layer hands over when it fits a board.
//! ROM images are passed separately to
//! [`IdeControllers::add_board`](crate::IdeControllers::add_board).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::variant::Variant;

/// Which generation of GVP controller is fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum GvpModel {
    /// One board: boot ROM, registers and interrupt status together.
    SeriesI,
    /// Boot-ROM board plus a separate controller board.
    #[default]
    SeriesII,
}

/// Where an Apollo controller is fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ApolloMount {
    /// Stand-alone Zorro card.
    #[default]
    Zorro,
    /// On an Apollo accelerator.
    Accelerator,
    /// On an Apollo 68060 accelerator, which reports a different serial.
    Accelerator060,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoardOptions {
    /// ALF+ rather than plain ALF.
    pub alf_plus: bool,
    pub apollo_mount: ApolloMount,
    /// Masoboshi co-processor subtype; zero means IDE only.
    pub scsi_subtype: u8,
    /// Boot ROM configured not to autoboot.
    pub autoboot_disabled: bool,
}

impl BoardOptions {
    /// The Masoboshi SCSI chip is fitted.
    #[must_use]
    pub fn scsi_fitted(&self) -> bool {
        self.scsi_subtype != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardConfig {
    pub variant: Variant,
    /// Which copy of this board type, from 0.
    #[cfg_attr(feature = "serde", serde(default))]
    pub instance: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub options: BoardOptions,
}

impl BoardConfig {
    #[must_use]
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            instance: 0,
            options: BoardOptions::default(),
        }
    }

    #[must_use]
    pub fn instance(mut self, instance: usize) -> Self {
        self.instance = instance;
        self
    }

    #[must_use]
    pub fn options(mut self, options: BoardOptions) -> Self {
        self.options = options;
        self
    }
}

/// Settings shared by every board in one emulator session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ControllersConfig {
    pub gvp_model: GvpModel,
}
