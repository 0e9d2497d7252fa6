//! Driver library for the Solomon Systech SSD1306 monochrome OLED controller, presenting the
//! panel as a small text console.
//!
//! The controller is reached through a [`Transport`](interface::Transport): either the I2C
//! adapter, which frames every transfer with a control byte, or the 4-wire SPI adapter, which
//! drives the D/C and RESET lines. Every transport call goes through a bounded
//! [`RetryPolicy`](retry::RetryPolicy). Glyphs come from a caller-supplied [`Font`].
//!
//! ```ignore
//! let config = Config::default();
//! let mut disp = Ssd1306::new(config.i2c_transport(i2c), font, config);
//! disp.init()?;
//! disp.clear()?;
//! disp.put_string("Hello")?;
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod command;
pub mod config;
pub mod cursor;
pub mod display;
pub mod error;
pub mod font;
pub mod interface;
pub mod retry;

// Re-exports for primary API.
pub use crate::command::{consts, AddrMode, VcomhLevel};
pub use crate::config::{Config, Geometry};
pub use crate::display::{DeviceState, InitStep, Ssd1306};
pub use crate::error::{DriverError, PartialWrite};
pub use crate::font::Font;
pub use crate::interface::i2c::I2cTransport;
pub use crate::interface::spi::SpiTransport;
pub use crate::interface::{Frame, Transport, TransportError};
