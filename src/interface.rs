//! The bus side of the driver. Everything the controller sends goes out as a `Frame` through a
//! `Transport`, which hides whether the panel sits on I2C or on 4-wire SPI.

use core::fmt;

/// An ordered run of bytes tagged as either command or display RAM data. Frames only live for
/// the duration of a single `Transport::send` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frame<'a> {
    /// Command bytes: an opcode followed by its argument bytes.
    Command(&'a [u8]),
    /// Pixel data written into display RAM at the controller's current address pointer.
    Data(&'a [u8]),
}

impl<'a> Frame<'a> {
    pub fn bytes(&self) -> &'a [u8] {
        match *self {
            Frame::Command(bytes) | Frame::Data(bytes) => bytes,
        }
    }

    pub fn is_command(&self) -> bool {
        match self {
            Frame::Command(_) => true,
            Frame::Data(_) => false,
        }
    }
}

/// Failure of a single transport attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// The I2C or SPI peripheral reported an error (NAK, arbitration loss, overrun, ...).
    Bus,
    /// Driving the D/C or RESET GPIO failed.
    Pin,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransportError::Bus => f.write_str("bus transaction failed"),
            TransportError::Pin => f.write_str("GPIO write failed"),
        }
    }
}

/// A physical connection to the SSD1306 which can move one frame at a time.
pub trait Transport {
    /// Write `bytes` to the controller, in command mode when `is_command` is set and in data mode
    /// otherwise.
    fn send(&mut self, bytes: &[u8], is_command: bool) -> Result<(), TransportError>;

    /// Pulse the controller's RESET line, if the transport has one. Called once at the start of
    /// `Ssd1306::init`.
    fn reset(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

pub mod i2c {
    //! The I2C interface prefixes every transfer with a control byte. Command bytes each get their
    //! own `0x80` control byte (Co = 1, D/C# = 0), so a multi-byte command is sent as
    //! `[0x80, op, 0x80, arg, ...]`. Data goes out as `[0x40, data...]`, split into bus
    //! transactions of at most `DATA_CHUNK` payload bytes. A data frame that fails part-way may
    //! already have moved the controller's RAM pointer.

    use embedded_hal as hal;

    use super::{Transport, TransportError};
    use crate::command::consts::MAX_COMMAND_LEN;

    /// Control byte announcing one command byte.
    pub const CONTROL_COMMAND: u8 = 0x80;
    /// Control byte announcing a stream of display RAM data.
    pub const CONTROL_DATA: u8 = 0x40;
    /// Largest number of data bytes carried by a single I2C write.
    pub const DATA_CHUNK: usize = 32;

    pub struct I2cTransport<I2C> {
        /// The I2C master connected to the SSD1306.
        i2c: I2C,
        /// 7-bit slave address of the panel, usually 0x3C or 0x3D.
        address: u8,
    }

    impl<I2C> I2cTransport<I2C>
    where
        I2C: hal::blocking::i2c::Write,
    {
        pub fn new(i2c: I2C, address: u8) -> Self {
            Self { i2c, address }
        }

        pub fn address(&self) -> u8 {
            self.address
        }

        /// Give back the I2C peripheral.
        pub fn release(self) -> I2C {
            self.i2c
        }
    }

    impl<I2C> Transport for I2cTransport<I2C>
    where
        I2C: hal::blocking::i2c::Write,
    {
        fn send(&mut self, bytes: &[u8], is_command: bool) -> Result<(), TransportError> {
            if is_command {
                let mut buf = [0u8; MAX_COMMAND_LEN * 2];
                for cmds in bytes.chunks(MAX_COMMAND_LEN) {
                    for (pair, &b) in buf.chunks_mut(2).zip(cmds) {
                        pair[0] = CONTROL_COMMAND;
                        pair[1] = b;
                    }
                    self.i2c
                        .write(self.address, &buf[..cmds.len() * 2])
                        .map_err(|_| TransportError::Bus)?;
                }
                return Ok(());
            }

            let mut buf = [0u8; DATA_CHUNK + 1];
            buf[0] = CONTROL_DATA;
            for chunk in bytes.chunks(DATA_CHUNK) {
                buf[1..=chunk.len()].copy_from_slice(chunk);
                self.i2c
                    .write(self.address, &buf[..=chunk.len()])
                    .map_err(|_| TransportError::Bus)?;
            }
            Ok(())
        }
    }
}

pub mod spi {
    //! The SPI interface supports the "4-wire" interface of the driver, such that each word on the
    //! SPI bus is 8 bits and the D/C GPIO selects between command and data. Chip select is left to
    //! the SPI peripheral (or the caller), as it is shared bus plumbing rather than display logic.

    use embedded_hal as hal;
    use hal::blocking::delay::DelayMs;
    use hal::digital::v2::OutputPin;

    use super::{Transport, TransportError};

    /// How long RESET is held low, and how long the controller is given to come back afterwards.
    pub const RESET_PULSE_MS: u8 = 10;

    pub struct SpiTransport<SPI, DC, RST, DELAY> {
        /// The SPI master device connected to the SSD1306.
        spi: SPI,
        /// A GPIO output pin connected to the D/C (data/command) pin of the SSD1306 (the fourth
        /// "wire" of "4-wire" mode). Low selects command mode.
        dc: DC,
        /// A GPIO output pin connected to the active-low RES# pin.
        rst: RST,
        delay: DELAY,
    }

    impl<SPI, DC, RST, DELAY> SpiTransport<SPI, DC, RST, DELAY>
    where
        SPI: hal::blocking::spi::Write<u8>,
        DC: OutputPin,
        RST: OutputPin,
        DELAY: DelayMs<u8>,
    {
        /// Create a new SPI transport. `spi` is the SPI master device, `dc` and `rst` are the GPIO
        /// outputs wired to D/C and RES#, and `delay` times the reset pulse.
        pub fn new(spi: SPI, dc: DC, rst: RST, delay: DELAY) -> Self {
            Self {
                spi,
                dc,
                rst,
                delay,
            }
        }

        /// Give back the SPI peripheral, pins and delay provider.
        pub fn release(self) -> (SPI, DC, RST, DELAY) {
            (self.spi, self.dc, self.rst, self.delay)
        }
    }

    impl<SPI, DC, RST, DELAY> Transport for SpiTransport<SPI, DC, RST, DELAY>
    where
        SPI: hal::blocking::spi::Write<u8>,
        DC: OutputPin,
        RST: OutputPin,
        DELAY: DelayMs<u8>,
    {
        fn send(&mut self, bytes: &[u8], is_command: bool) -> Result<(), TransportError> {
            if is_command {
                self.dc.set_low().map_err(|_| TransportError::Pin)?;
            } else {
                self.dc.set_high().map_err(|_| TransportError::Pin)?;
            }
            self.spi.write(bytes).map_err(|_| TransportError::Bus)
        }

        fn reset(&mut self) -> Result<(), TransportError> {
            self.rst.set_high().map_err(|_| TransportError::Pin)?;
            self.delay.delay_ms(1);
            self.rst.set_low().map_err(|_| TransportError::Pin)?;
            self.delay.delay_ms(RESET_PULSE_MS);
            self.rst.set_high().map_err(|_| TransportError::Pin)?;
            self.delay.delay_ms(RESET_PULSE_MS);
            Ok(())
        }
    }
}
