//! One fitted controller board.

use log::debug;
use zorro_autoconfig::{Autoconfig, AutoconfigState, ProbeImage, PROBE_SIZE};

use crate::config::{BoardConfig, BoardOptions, GvpModel};
use crate::decode::{self, Decoder, RegisterRef};
use crate::error::Result;
use crate::rom::Rom;
use crate::units::UnitPair;
use crate::variant::{Layout, ProbeSource, RomWiring, Variant};

/// Registry slot a board lives in. Stable for the board's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoardId(pub(crate) usize);

impl BoardId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Token the expansion prober uses to pair its slot with a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotHandle(pub u32);

#[derive(Debug)]
pub struct Board {
    variant: Variant,
    instance: usize,
    options: BoardOptions,
    gvp_model: GvpModel,
    layout: Layout,
    decode: Decoder,
    autoconfig: Autoconfig,
    probe: ProbeImage,
    rom: Option<Rom>,
    units: Option<UnitPair>,
    pub(crate) irq_enabled: bool,
    /// Last sampled interrupt state of the units.
    pub(crate) irq_pending: bool,
    /// Masoboshi status-control latch.
    pub(crate) control: u8,
}

impl Board {
    pub(crate) fn new(
        config: &BoardConfig,
        gvp_model: GvpModel,
        layout: Layout,
        units: Option<UnitPair>,
        rom_image: Option<&[u8]>,
    ) -> Result<Self> {
        let rom = match (rom_image, layout.rom_size, layout.rom_wiring) {
            (Some(image), size, wiring) if size > 0 && wiring != RomWiring::Disabled => {
                Some(Rom::place(wiring, size, image))
            }
            _ => None,
        };
        let probe = match layout.probe {
            ProbeSource::Descriptor(descriptor) => {
                let probe = ProbeImage::from_descriptor(&descriptor);
                probe.check_window(layout.window_size)?;
                probe
            }
            ProbeSource::Rom { offset } => match &rom {
                Some(rom) => ProbeImage::from_bytes(rom.tail(offset))?,
                None => ProbeImage::blank(),
            },
        };
        debug!(
            target: config.variant.log_target(),
            "{} #{}: {:?}, {} KB ROM{}",
            config.variant,
            config.instance,
            probe,
            layout.rom_size >> 10,
            if rom.is_some() { "" } else { " (empty)" }
        );
        Ok(Self {
            variant: config.variant,
            instance: config.instance,
            options: config.options,
            gvp_model,
            decode: decode::decoder(config.variant),
            autoconfig: Autoconfig::new(layout.window_size),
            probe,
            rom,
            units,
            irq_enabled: layout.irq_hardwired,
            irq_pending: false,
            control: 0,
            layout,
        })
    }

    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    #[must_use]
    pub fn instance(&self) -> usize {
        self.instance
    }

    #[must_use]
    pub fn options(&self) -> &BoardOptions {
        &self.options
    }

    #[must_use]
    pub fn gvp_model(&self) -> GvpModel {
        self.gvp_model
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub fn state(&self) -> AutoconfigState {
        self.autoconfig.state()
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.autoconfig.is_configured()
    }

    /// Assigned base address, while configured.
    #[must_use]
    pub fn base(&self) -> Option<u32> {
        self.autoconfig.base()
    }

    #[must_use]
    pub fn mask(&self) -> u32 {
        self.autoconfig.mask()
    }

    #[must_use]
    pub fn window_size(&self) -> u32 {
        self.autoconfig.window_size()
    }

    #[must_use]
    pub fn probe(&self) -> &ProbeImage {
        &self.probe
    }

    #[must_use]
    pub fn units(&self) -> Option<UnitPair> {
        self.units
    }

    #[must_use]
    pub fn has_rom(&self) -> bool {
        self.rom.is_some()
    }

    #[must_use]
    pub fn irq_enabled(&self) -> bool {
        self.irq_enabled
    }

    #[must_use]
    pub fn irq_pending(&self) -> bool {
        self.irq_pending
    }

    /// Whether this board should answer generic dispatch for `addr`.
    ///
    /// A board still waiting for its first configuration answers anything;
    /// a configured board answers its own window.
    #[must_use]
    pub fn claims(&self, addr: u32) -> bool {
        match self.state() {
            AutoconfigState::Unconfigured => self.autoconfig.never_configured(),
            AutoconfigState::Configured => self.autoconfig.claims(addr),
            AutoconfigState::ShutUp => false,
        }
    }

    /// The probe image is visible at `offset`.
    #[must_use]
    pub fn serves_probe(&self, offset: u32) -> bool {
        (offset as usize) < PROBE_SIZE
            && match self.state() {
                AutoconfigState::Unconfigured => true,
                AutoconfigState::Configured => self.layout.keep_autoconfig,
                AutoconfigState::ShutUp => false,
            }
    }

    #[must_use]
    pub fn decode(&self, offset: u32) -> Option<RegisterRef> {
        (self.decode)(offset)
    }

    /// ROM byte at `index`; an empty socket floats high.
    #[must_use]
    pub fn read_rom(&self, index: u32) -> u8 {
        self.rom
            .as_ref()
            .map_or(zorro_autoconfig::FILL, |rom| rom.read(index as usize))
    }

    /// GVP Series II boot-ROM half: nothing but ROM and autoconfig.
    #[must_use]
    pub fn is_rom_only(&self) -> bool {
        self.variant.is_gvp() && !self.layout.has_units
    }

    pub(crate) fn attach_units(&mut self, units: Option<UnitPair>) {
        self.units = units;
    }

    pub(crate) fn autoconfig_mut(&mut self) -> &mut Autoconfig {
        &mut self.autoconfig
    }

    /// Re-arm a hard-wired interrupt enable. Called when the board is
    /// mapped, since reset leaves every enable clear.
    pub(crate) fn arm_hardwired_irq(&mut self) {
        if self.layout.irq_hardwired {
            self.irq_enabled = true;
        }
    }

    /// Power-on state. ROM, probe image and unit pair survive.
    pub fn reset(&mut self) {
        self.autoconfig.reset();
        self.irq_enabled = false;
        self.irq_pending = false;
        self.control = 0;
    }
}
