//! Error types for the SSD1306 console driver.

use core::fmt;

use crate::display::InitStep;
use crate::interface::TransportError;

/// Errors that can occur during display operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// The operation needs a successfully initialised display, and `init` has not succeeded yet
    /// or the device faulted since.
    NotReady,
    /// A cursor target lies outside the display geometry.
    OutOfBounds,
    /// The font has no glyph for this character.
    UnsupportedChar(char),
    /// Every attempt at a transport call failed. Carries the cause of the last attempt.
    BusFailure(TransportError),
    /// A step of the initialisation sequence failed after retries.
    InitFailed(InitStep, TransportError),
    /// Width or height is not a multiple of 8 or exceeds what the SSD1306 can drive.
    InvalidGeometry,
    /// A command argument is outside the register's range.
    InvalidArgument,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DriverError::NotReady => f.write_str("display is not initialised"),
            DriverError::OutOfBounds => f.write_str("cursor position outside the display"),
            DriverError::UnsupportedChar(c) => write!(f, "no glyph for {:?}", c),
            DriverError::BusFailure(cause) => write!(f, "bus failure: {}", cause),
            DriverError::InitFailed(step, cause) => {
                write!(f, "init step {:?} failed: {}", step, cause)
            }
            DriverError::InvalidGeometry => f.write_str("display geometry not supported"),
            DriverError::InvalidArgument => f.write_str("command argument out of range"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DriverError {}

/// A string write that stopped part way. `written` characters went out before `error` occurred;
/// they are not rolled back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PartialWrite {
    pub written: usize,
    pub error: DriverError,
}

impl From<PartialWrite> for DriverError {
    fn from(e: PartialWrite) -> Self {
        e.error
    }
}

impl fmt::Display for PartialWrite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} after {} characters", self.error, self.written)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PartialWrite {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
