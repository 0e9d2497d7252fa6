//! The main API to the display driver. `Ssd1306` owns the transport, the device state and the
//! text cursor, and drives the controller through its command set.


pub mod text;

use log::{debug, error, info};

use crate::command::consts::*;
use crate::command::{AddrMode, Command};
use crate::config::{Config, Geometry};
use crate::cursor::{Cursor, Seek};
use crate::error::DriverError;
use crate::interface::{Transport, TransportError};
use crate::retry::RetryPolicy;

static ZEROS: [u8; NUM_PIXEL_COLS as usize] = [0; NUM_PIXEL_COLS as usize];

/// Lifecycle of the controller as seen by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// `init` has not succeeded yet.
    Uninitialized,
    Ready,
    /// A transport call exhausted its retries. Only `init` leaves this state.
    Faulted(TransportError),
}

/// The steps of the initialisation sequence, in the order they are sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitStep {
    Reset,
    DisplayOff,
    ClockDivider,
    MultiplexRatio,
    DisplayOffset,
    StartLine,
    ChargePump,
    SegmentRemap,
    ComScanDirection,
    ComPins,
    Contrast,
    PreCharge,
    VcomhDeselect,
    NormalMode,
    AddressingMode,
    ResumeFromRam,
    DisplayOn,
}

fn init_sequence(config: &Config, mode: AddrMode) -> [(InitStep, Command); 16] {
    let geometry = config.geometry;
    [
        (InitStep::DisplayOff, Command::DisplayOn(false)),
        (
            InitStep::ClockDivider,
            Command::DisplayClockDiv(config.clock_div.0, config.clock_div.1),
        ),
        (InitStep::MultiplexRatio, Command::Multiplex(geometry.height())),
        (InitStep::DisplayOffset, Command::DisplayOffset(0)),
        (InitStep::StartLine, Command::StartLine(0)),
        (InitStep::ChargePump, Command::ChargePump(true)),
        (InitStep::SegmentRemap, Command::SegmentRemap(true)),
        (InitStep::ComScanDirection, Command::ReverseComDir(true)),
        (
            InitStep::ComPins,
            Command::ComPinConfig(geometry.alternative_com_pins(), false),
        ),
        (InitStep::Contrast, Command::Contrast(config.contrast)),
        (
            InitStep::PreCharge,
            Command::PreChargePeriod(config.precharge.0, config.precharge.1),
        ),
        (InitStep::VcomhDeselect, Command::VcomhDeselect(config.vcomh)),
        (InitStep::NormalMode, Command::Invert(false)),
        (InitStep::AddressingMode, Command::AddressMode(mode)),
        (InitStep::ResumeFromRam, Command::AllOn(false)),
        (InitStep::DisplayOn, Command::DisplayOn(true)),
    ]
}

/// Record a fault if `result` is an exhausted transport call.
fn fault_on_bus(
    state: &mut DeviceState,
    result: Result<(), DriverError>,
) -> Result<(), DriverError> {
    if let Err(DriverError::BusFailure(cause)) = result {
        error!("display faulted: {}", cause);
        *state = DeviceState::Faulted(cause);
    }
    result
}

/// A driver for an SSD1306 display used as a text console.
///
/// The driver assumes exclusive use of the bus for the duration of every call. Sharing one
/// display between threads needs a lock around the whole `Ssd1306`, not around the transport.
pub struct Ssd1306<T, F> {
    link: RetryPolicy<T>,
    font: F,
    config: Config,
    addr_mode: AddrMode,
    cursor: Cursor,
    state: DeviceState,
}

impl<T, F> Ssd1306<T, F>
where
    T: Transport,
{
    /// Construct a driver for the panel described by `config`, talking through `transport` and
    /// rendering text with `font`. Nothing is sent until `init`.
    pub fn new(transport: T, font: F, config: Config) -> Self {
        Ssd1306 {
            link: RetryPolicy::new(transport, config.retry_count),
            font,
            addr_mode: config.addr_mode,
            cursor: Cursor::new(config.geometry),
            state: DeviceState::Uninitialized,
            config,
        }
    }

    /// Run the initialisation sequence using the configured addressing mode.
    pub fn init(&mut self) -> Result<(), DriverError> {
        self.init_with_addr_mode(self.config.addr_mode)
    }

    /// Reset the controller and run the initialisation sequence, selecting `mode`. Allowed from
    /// any state; this is the only way out of `DeviceState::Faulted`.
    ///
    /// The whole sequence is validated before anything is sent. A step that still fails after
    /// retries faults the device and is reported as `DriverError::InitFailed`. On success the
    /// device is `Ready` and the cursor is at (0, 0).
    pub fn init_with_addr_mode(&mut self, mode: AddrMode) -> Result<(), DriverError> {
        let sequence = init_sequence(&self.config, mode);
        let mut buf = [0u8; MAX_COMMAND_LEN];
        for (_, cmd) in sequence.iter() {
            cmd.encode(&mut buf)?;
        }

        debug!(
            "initialising {}x{} display, {:?} addressing",
            self.config.geometry.width(),
            self.config.geometry.height(),
            mode
        );
        self.state = DeviceState::Uninitialized;
        let result = self.link.reset();
        self.init_step(InitStep::Reset, result)?;
        for &(step, cmd) in sequence.iter() {
            let result = cmd.send(&mut self.link);
            self.init_step(step, result)?;
        }

        self.addr_mode = mode;
        self.cursor.home();
        self.state = DeviceState::Ready;
        info!("display ready");
        Ok(())
    }

    fn init_step(
        &mut self,
        step: InitStep,
        result: Result<(), DriverError>,
    ) -> Result<(), DriverError> {
        match result {
            Err(DriverError::BusFailure(cause)) => {
                error!("init step {:?} failed: {}", step, cause);
                self.state = DeviceState::Faulted(cause);
                Err(DriverError::InitFailed(step, cause))
            }
            other => other,
        }
    }

    /// Switch the addressing mode. The cursor stays where it is.
    pub fn set_addr_mode(&mut self, mode: AddrMode) -> Result<(), DriverError> {
        self.ensure_ready()?;
        self.command(Command::AddressMode(mode))?;
        self.addr_mode = mode;
        Ok(())
    }

    /// Move the cursor to `row` (a page) and pixel `column`, and point the controller there.
    pub fn set_cursor(&mut self, row: u8, column: u8) -> Result<(), DriverError> {
        self.ensure_ready()?;
        self.cursor.check(row, column)?;
        self.write_at(Seek::new(self.config.geometry, self.addr_mode, row, column), &[])?;
        self.cursor.set(row, column)
    }

    /// Zero all of display RAM inside the geometry, one full page per data frame, and move the
    /// cursor to (0, 0).
    pub fn clear(&mut self) -> Result<(), DriverError> {
        self.ensure_ready()?;
        let geometry = self.config.geometry;
        let width = geometry.width() as usize;
        for page in 0..geometry.pages() {
            self.write_at(Seek::new(geometry, self.addr_mode, page, 0), &ZEROS[..width])?;
        }
        self.cursor.home();
        Ok(())
    }

    /// Set the panel contrast.
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), DriverError> {
        self.ensure_ready()?;
        self.command(Command::Contrast(contrast))
    }

    /// Wake the panel or put it to sleep. Display RAM is kept either way.
    pub fn display_on(&mut self, on: bool) -> Result<(), DriverError> {
        self.ensure_ready()?;
        self.command(Command::DisplayOn(on))
    }

    /// Show display RAM inverted or normally.
    pub fn set_invert(&mut self, invert: bool) -> Result<(), DriverError> {
        self.ensure_ready()?;
        self.command(Command::Invert(invert))
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Current `(row, column)` of the text cursor.
    pub fn cursor(&self) -> (u8, u8) {
        self.cursor.position()
    }

    pub fn addr_mode(&self) -> AddrMode {
        self.addr_mode
    }

    pub fn geometry(&self) -> Geometry {
        self.config.geometry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Tear down the driver, giving back the transport and font.
    pub fn release(self) -> (T, F) {
        (self.link.release(), self.font)
    }

    fn ensure_ready(&self) -> Result<(), DriverError> {
        match self.state {
            DeviceState::Ready => Ok(()),
            _ => Err(DriverError::NotReady),
        }
    }

    fn command(&mut self, cmd: Command) -> Result<(), DriverError> {
        let result = cmd.send(&mut self.link);
        fault_on_bus(&mut self.state, result)
    }

    fn write_at(&mut self, seek: Seek, bytes: &[u8]) -> Result<(), DriverError> {
        let result = self.link.send_at(&seek, bytes);
        fault_on_bus(&mut self.state, result)
    }
}
