//! Construction-time configuration: the panel geometry plus the register values sent during
//! `Ssd1306::init`. A `Config` is immutable once handed to the driver.

use embedded_hal as hal;

use crate::command::consts::*;
use crate::command::{AddrMode, VcomhLevel};
use crate::error::DriverError;
use crate::interface::i2c::I2cTransport;
use crate::retry::DEFAULT_RETRY_COUNT;

pub const DEFAULT_I2C_ADDRESS: u8 = 0x3C;
pub const DEFAULT_CONTRAST: u8 = 0xCF;

/// Visible size of the panel in pixels. Both dimensions are multiples of 8; one page is 8 pixel
/// rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    width: u8,
    height: u8,
}

impl Geometry {
    /// Width must be 8-128 and height 16-64 pixels, each a multiple of 8.
    pub fn new(width_px: u32, height_px: u32) -> Result<Self, DriverError> {
        if false
            || width_px == 0
            || width_px > NUM_PIXEL_COLS as u32
            || width_px % 8 != 0
            || height_px < MIN_MUX_RATIO as u32
            || height_px > NUM_PIXEL_ROWS as u32
            || height_px % 8 != 0
        {
            return Err(DriverError::InvalidGeometry);
        }
        Ok(Geometry {
            width: width_px as u8,
            height: height_px as u8,
        })
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn pages(&self) -> u8 {
        self.height / 8
    }

    /// Panels taller than 32 rows wire the COM lines in the alternative (interleaved) layout.
    pub(crate) fn alternative_com_pins(&self) -> bool {
        self.height > 32
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry {
            width: 128,
            height: 64,
        }
    }
}

/// A configuration for the display. Builder methods override the defaults, which suit the common
/// 0.96" 128x64 modules with an internal charge pump.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub(crate) geometry: Geometry,
    pub(crate) addr_mode: AddrMode,
    pub(crate) i2c_address: u8,
    pub(crate) retry_count: u32,
    pub(crate) contrast: u8,
    pub(crate) clock_div: (u8, u8),
    pub(crate) precharge: (u8, u8),
    pub(crate) vcomh: VcomhLevel,
}

impl Config {
    /// Create a new configuration for a panel of size `geometry`.
    pub fn new(geometry: Geometry) -> Self {
        Config {
            geometry,
            addr_mode: AddrMode::Page,
            i2c_address: DEFAULT_I2C_ADDRESS,
            retry_count: DEFAULT_RETRY_COUNT,
            contrast: DEFAULT_CONTRAST,
            clock_div: (1, 8),
            precharge: (1, 15),
            vcomh: VcomhLevel::Auto,
        }
    }

    /// Addressing mode selected at init time.
    pub fn addr_mode(self, mode: AddrMode) -> Self {
        Self {
            addr_mode: mode,
            ..self
        }
    }

    /// 7-bit I2C address, used by `i2c_transport`.
    pub fn i2c_address(self, address: u8) -> Self {
        Self {
            i2c_address: address,
            ..self
        }
    }

    /// Total attempts per transport call.
    pub fn retry_count(self, count: u32) -> Self {
        Self {
            retry_count: count,
            ..self
        }
    }

    /// Contrast sent at init. See `Command::Contrast`.
    pub fn contrast(self, contrast: u8) -> Self {
        Self { contrast, ..self }
    }

    /// Clock divide ratio and oscillator frequency. See `Command::DisplayClockDiv`.
    pub fn clock_div(self, ratio: u8, freq: u8) -> Self {
        Self {
            clock_div: (ratio, freq),
            ..self
        }
    }

    /// Pre-charge phase lengths. See `Command::PreChargePeriod`.
    pub fn precharge(self, phase1: u8, phase2: u8) -> Self {
        Self {
            precharge: (phase1, phase2),
            ..self
        }
    }

    /// COM deselect level. See `Command::VcomhDeselect`.
    pub fn vcomh(self, level: VcomhLevel) -> Self {
        Self {
            vcomh: level,
            ..self
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// The configured 7-bit I2C slave address.
    pub fn address(&self) -> u8 {
        self.i2c_address
    }

    /// Transport attempts made per call. A `retry_count` of zero still makes one.
    pub fn attempts(&self) -> u32 {
        self.retry_count.max(1)
    }

    /// Build an I2C transport addressed at the configured slave address.
    pub fn i2c_transport<I2C>(&self, i2c: I2C) -> I2cTransport<I2C>
    where
        I2C: hal::blocking::i2c::Write,
    {
        I2cTransport::new(i2c, self.i2c_address)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(Geometry::default())
    }
}
