//! The command set for the SSD1306.
//!
//! Note 1: The display RAM of the SSD1306 is arranged in 8 pages of 128 columns. Each page is a
//! band of 8 pixel rows, and each byte written into a column of a page sets those 8 pixels, LSB
//! at the top. Anywhere there is a "page" address, it refers to one of these bands.
//!
//! Unlike controllers that take arguments in data mode, every argument byte of an SSD1306 command
//! is itself sent in command mode, so a command and its arguments form a single command `Frame`.

use crate::error::DriverError;
use crate::interface::{Frame, Transport};
use crate::retry::RetryPolicy;

pub mod consts {
    //! Register limits of the SSD1306.

    pub const NUM_PIXEL_COLS: u8 = 128;
    pub const NUM_PIXEL_ROWS: u8 = 64;
    pub const NUM_PAGES: u8 = NUM_PIXEL_ROWS / 8;
    pub const PIXEL_COL_MAX: u8 = NUM_PIXEL_COLS - 1;
    pub const PIXEL_ROW_MAX: u8 = NUM_PIXEL_ROWS - 1;
    pub const PAGE_MAX: u8 = NUM_PAGES - 1;
    /// Fewest COM lines the multiplex ratio can select.
    pub const MIN_MUX_RATIO: u8 = 16;
    /// Longest encoded command: opcode plus two argument bytes.
    pub const MAX_COMMAND_LEN: usize = 3;
}

use self::consts::*;

/// How the column and page address pointers advance after each byte of display RAM data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddrMode {
    /// The column pointer advances along the range set by `ColumnAddress`, then the page pointer
    /// advances along the range set by `PageAddress`, wrapping back to the start of both.
    Horizontal,
    /// The page pointer advances along the range set by `PageAddress`, then the column pointer
    /// advances along the range set by `ColumnAddress`.
    Vertical,
    /// Only the column pointer advances, wrapping to column 0 of the *same* page. Positioning
    /// uses `PageStart`, `ColumnAddressLow` and `ColumnAddressHigh`.
    Page,
}

impl Default for AddrMode {
    fn default() -> Self {
        AddrMode::Page
    }
}

/// Deselect level of the COM drivers (VCOMH), as a fraction of Vcc.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VcomhLevel {
    /// ~0.65 * Vcc
    V065,
    /// ~0.77 * Vcc, the power-on default.
    V077,
    /// ~0.83 * Vcc
    V083,
    /// Above 0.83 * Vcc; the level most module vendors ship their init code with.
    Auto,
}

impl Default for VcomhLevel {
    fn default() -> Self {
        VcomhLevel::Auto
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Turn the panel on (`true`) or put it to sleep (`false`). Display RAM is retained while
    /// asleep.
    DisplayOn(bool),
    /// Set the display clock divide ratio (1-16) and oscillator frequency setting (0-15). Higher
    /// frequency settings raise the oscillator frequency; the exact relationship is not
    /// documented.
    DisplayClockDiv(u8, u8),
    /// Set the multiplex ratio, i.e. the number of active COM lines and therefore pixel rows.
    /// Range is 16-64.
    Multiplex(u8),
    /// Vertical shift of the COM lines. Range is 0-63.
    DisplayOffset(u8),
    /// Display RAM row shown on the first COM line. Range is 0-63.
    StartLine(u8),
    /// Enable or disable the internal charge pump. Modules without an external VCC supply need
    /// it enabled before the panel is switched on.
    ChargePump(bool),
    /// Map column address 127 to SEG0 (`true`) instead of column 0 (`false`). Flips the image
    /// horizontally.
    SegmentRemap(bool),
    /// Scan COM lines from COM[N-1] to COM0 (`true`) instead of COM0 to COM[N-1] (`false`).
    /// Flips the image vertically.
    ReverseComDir(bool),
    /// COM pins hardware configuration: alternative (rather than sequential) pin layout, and
    /// left/right remap. This is dictated by how the module wires the panel; 128x64 modules use
    /// the alternative layout, 128x32 modules the sequential one.
    ComPinConfig(bool, bool),
    /// Contrast, 0-255.
    Contrast(u8),
    /// Pre-charge period: phase 1 and phase 2 lengths in DCLKs, each 1-15.
    PreChargePeriod(u8, u8),
    /// Set the COM deselect voltage level.
    VcomhDeselect(VcomhLevel),
    /// Show display RAM inverted (`true`) or normally (`false`).
    Invert(bool),
    /// Select the memory addressing mode. See `AddrMode`.
    AddressMode(AddrMode),
    /// Light every pixel regardless of RAM content (`true`), or resume showing RAM (`false`).
    AllOn(bool),
    /// Page mode only: page address the next data byte goes to. Range is 0-7.
    PageStart(u8),
    /// Page mode only: lower nibble of the column address pointer. Range is 0-15.
    ColumnAddressLow(u8),
    /// Page mode only: upper nibble of the column address pointer. Range is 0-7.
    ColumnAddressHigh(u8),
    /// Horizontal/vertical mode only: column start and end address. The column pointer is reset
    /// to the start address. Range is 0-127, where start must be <= end.
    ColumnAddress(u8, u8),
    /// Horizontal/vertical mode only: page start and end address. The page pointer is reset to
    /// the start address. Range is 0-7, where start must be <= end.
    PageAddress(u8, u8),
}

macro_rules! ok_command {
    ($buf:ident, $cmd:expr,[]) => {{
        $buf[0] = $cmd;
        Ok(&$buf[..1])
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr]) => {{
        $buf[0] = $cmd;
        $buf[1] = $arg0;
        Ok(&$buf[..2])
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr, $arg1:expr]) => {{
        $buf[0] = $cmd;
        $buf[1] = $arg0;
        $buf[2] = $arg1;
        Ok(&$buf[..3])
    }};
}

impl Command {
    /// Encode the command and its arguments into `buf`, returning the bytes to send. Arguments
    /// outside the controller's range give `DriverError::InvalidArgument`.
    pub fn encode(self, buf: &mut [u8; MAX_COMMAND_LEN]) -> Result<&[u8], DriverError> {
        match self {
            Command::DisplayOn(on) => ok_command!(buf, if on { 0xAF } else { 0xAE }, []),
            Command::DisplayClockDiv(ratio, freq) => match (ratio, freq) {
                (1..=16, 0..=15) => ok_command!(buf, 0xD5, [freq << 4 | (ratio - 1)]),
                _ => Err(DriverError::InvalidArgument),
            },
            Command::Multiplex(ratio) => match ratio {
                MIN_MUX_RATIO..=NUM_PIXEL_ROWS => ok_command!(buf, 0xA8, [ratio - 1]),
                _ => Err(DriverError::InvalidArgument),
            },
            Command::DisplayOffset(offset) => match offset {
                0..=PIXEL_ROW_MAX => ok_command!(buf, 0xD3, [offset]),
                _ => Err(DriverError::InvalidArgument),
            },
            Command::StartLine(line) => match line {
                0..=PIXEL_ROW_MAX => ok_command!(buf, 0x40 | line, []),
                _ => Err(DriverError::InvalidArgument),
            },
            Command::ChargePump(on) => ok_command!(buf, 0x8D, [if on { 0x14 } else { 0x10 }]),
            Command::SegmentRemap(remap) => ok_command!(buf, 0xA0 | remap as u8, []),
            Command::ReverseComDir(rev) => ok_command!(buf, if rev { 0xC8 } else { 0xC0 }, []),
            Command::ComPinConfig(alt, lr) => {
                ok_command!(buf, 0xDA, [0x02 | (alt as u8) << 4 | (lr as u8) << 5])
            }
            Command::Contrast(contrast) => ok_command!(buf, 0x81, [contrast]),
            Command::PreChargePeriod(phase1, phase2) => match (phase1, phase2) {
                (1..=15, 1..=15) => ok_command!(buf, 0xD9, [phase2 << 4 | phase1]),
                _ => Err(DriverError::InvalidArgument),
            },
            Command::VcomhDeselect(level) => {
                let l = match level {
                    VcomhLevel::V065 => 0x00,
                    VcomhLevel::V077 => 0x20,
                    VcomhLevel::V083 => 0x30,
                    VcomhLevel::Auto => 0x40,
                };
                ok_command!(buf, 0xDB, [l])
            }
            Command::Invert(inv) => ok_command!(buf, if inv { 0xA7 } else { 0xA6 }, []),
            Command::AddressMode(mode) => {
                let m = match mode {
                    AddrMode::Horizontal => 0x00,
                    AddrMode::Vertical => 0x01,
                    AddrMode::Page => 0x02,
                };
                ok_command!(buf, 0x20, [m])
            }
            Command::AllOn(on) => ok_command!(buf, if on { 0xA5 } else { 0xA4 }, []),
            Command::PageStart(page) => match page {
                0..=PAGE_MAX => ok_command!(buf, 0xB0 | page, []),
                _ => Err(DriverError::InvalidArgument),
            },
            Command::ColumnAddressLow(low) => match low {
                0..=0xF => ok_command!(buf, 0x00 | low, []),
                _ => Err(DriverError::InvalidArgument),
            },
            Command::ColumnAddressHigh(high) => match high {
                0..=0x7 => ok_command!(buf, 0x10 | high, []),
                _ => Err(DriverError::InvalidArgument),
            },
            Command::ColumnAddress(start, end) => match (start, end) {
                (0..=PIXEL_COL_MAX, 0..=PIXEL_COL_MAX) if start <= end => {
                    ok_command!(buf, 0x21, [start, end])
                }
                _ => Err(DriverError::InvalidArgument),
            },
            Command::PageAddress(start, end) => match (start, end) {
                (0..=PAGE_MAX, 0..=PAGE_MAX) if start <= end => {
                    ok_command!(buf, 0x22, [start, end])
                }
                _ => Err(DriverError::InvalidArgument),
            },
        }
    }

    /// Encode the command and send it as one command frame through `link`. Nothing is sent if
    /// the arguments are out of range.
    pub fn send<T>(self, link: &mut RetryPolicy<T>) -> Result<(), DriverError>
    where
        T: Transport,
    {
        let mut buf = [0u8; MAX_COMMAND_LEN];
        let bytes = self.encode(&mut buf)?;
        link.send(Frame::Command(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::test_spy::{Sent, TestSpyInterface};
    use std::vec::Vec;

    fn encoded(cmd: Command) -> Result<Vec<u8>, DriverError> {
        let mut buf = [0u8; MAX_COMMAND_LEN];
        cmd.encode(&mut buf).map(|b| b.to_vec())
    }

    #[test]
    fn display_on_off() {
        assert_eq!(encoded(Command::DisplayOn(false)), Ok(vec![0xAE]));
        assert_eq!(encoded(Command::DisplayOn(true)), Ok(vec![0xAF]));
    }

    #[test]
    fn display_clock_div() {
        assert_eq!(encoded(Command::DisplayClockDiv(1, 8)), Ok(vec![0xD5, 0x80]));
        assert_eq!(encoded(Command::DisplayClockDiv(16, 15)), Ok(vec![0xD5, 0xFF]));
        assert_eq!(
            encoded(Command::DisplayClockDiv(0, 8)),
            Err(DriverError::InvalidArgument)
        );
        assert_eq!(
            encoded(Command::DisplayClockDiv(17, 8)),
            Err(DriverError::InvalidArgument)
        );
        assert_eq!(
            encoded(Command::DisplayClockDiv(1, 16)),
            Err(DriverError::InvalidArgument)
        );
    }

    #[test]
    fn multiplex() {
        assert_eq!(encoded(Command::Multiplex(64)), Ok(vec![0xA8, 63]));
        assert_eq!(encoded(Command::Multiplex(16)), Ok(vec![0xA8, 15]));
        assert_eq!(encoded(Command::Multiplex(15)), Err(DriverError::InvalidArgument));
        assert_eq!(encoded(Command::Multiplex(65)), Err(DriverError::InvalidArgument));
    }

    #[test]
    fn offset_and_start_line() {
        assert_eq!(encoded(Command::DisplayOffset(0)), Ok(vec![0xD3, 0]));
        assert_eq!(encoded(Command::DisplayOffset(63)), Ok(vec![0xD3, 63]));
        assert_eq!(
            encoded(Command::DisplayOffset(64)),
            Err(DriverError::InvalidArgument)
        );
        assert_eq!(encoded(Command::StartLine(0)), Ok(vec![0x40]));
        assert_eq!(encoded(Command::StartLine(63)), Ok(vec![0x7F]));
        assert_eq!(encoded(Command::StartLine(64)), Err(DriverError::InvalidArgument));
    }

    #[test]
    fn panel_wiring() {
        assert_eq!(encoded(Command::ChargePump(true)), Ok(vec![0x8D, 0x14]));
        assert_eq!(encoded(Command::ChargePump(false)), Ok(vec![0x8D, 0x10]));
        assert_eq!(encoded(Command::SegmentRemap(true)), Ok(vec![0xA1]));
        assert_eq!(encoded(Command::SegmentRemap(false)), Ok(vec![0xA0]));
        assert_eq!(encoded(Command::ReverseComDir(true)), Ok(vec![0xC8]));
        assert_eq!(encoded(Command::ReverseComDir(false)), Ok(vec![0xC0]));
        assert_eq!(encoded(Command::ComPinConfig(true, false)), Ok(vec![0xDA, 0x12]));
        assert_eq!(encoded(Command::ComPinConfig(false, false)), Ok(vec![0xDA, 0x02]));
        assert_eq!(encoded(Command::ComPinConfig(true, true)), Ok(vec![0xDA, 0x32]));
    }

    #[test]
    fn drive_levels() {
        assert_eq!(encoded(Command::Contrast(0xCF)), Ok(vec![0x81, 0xCF]));
        assert_eq!(encoded(Command::PreChargePeriod(1, 15)), Ok(vec![0xD9, 0xF1]));
        assert_eq!(encoded(Command::PreChargePeriod(2, 2)), Ok(vec![0xD9, 0x22]));
        assert_eq!(
            encoded(Command::PreChargePeriod(0, 2)),
            Err(DriverError::InvalidArgument)
        );
        assert_eq!(
            encoded(Command::PreChargePeriod(2, 16)),
            Err(DriverError::InvalidArgument)
        );
        assert_eq!(
            encoded(Command::VcomhDeselect(VcomhLevel::V065)),
            Ok(vec![0xDB, 0x00])
        );
        assert_eq!(
            encoded(Command::VcomhDeselect(VcomhLevel::V077)),
            Ok(vec![0xDB, 0x20])
        );
        assert_eq!(
            encoded(Command::VcomhDeselect(VcomhLevel::V083)),
            Ok(vec![0xDB, 0x30])
        );
        assert_eq!(
            encoded(Command::VcomhDeselect(VcomhLevel::Auto)),
            Ok(vec![0xDB, 0x40])
        );
    }

    #[test]
    fn display_modes() {
        assert_eq!(encoded(Command::Invert(false)), Ok(vec![0xA6]));
        assert_eq!(encoded(Command::Invert(true)), Ok(vec![0xA7]));
        assert_eq!(encoded(Command::AllOn(false)), Ok(vec![0xA4]));
        assert_eq!(encoded(Command::AllOn(true)), Ok(vec![0xA5]));
    }

    #[test]
    fn address_mode() {
        assert_eq!(
            encoded(Command::AddressMode(AddrMode::Horizontal)),
            Ok(vec![0x20, 0x00])
        );
        assert_eq!(
            encoded(Command::AddressMode(AddrMode::Vertical)),
            Ok(vec![0x20, 0x01])
        );
        assert_eq!(
            encoded(Command::AddressMode(AddrMode::Page)),
            Ok(vec![0x20, 0x02])
        );
    }

    #[test]
    fn page_mode_addressing() {
        assert_eq!(encoded(Command::PageStart(0)), Ok(vec![0xB0]));
        assert_eq!(encoded(Command::PageStart(7)), Ok(vec![0xB7]));
        assert_eq!(encoded(Command::PageStart(8)), Err(DriverError::InvalidArgument));
        assert_eq!(encoded(Command::ColumnAddressLow(0xA)), Ok(vec![0x0A]));
        assert_eq!(
            encoded(Command::ColumnAddressLow(0x10)),
            Err(DriverError::InvalidArgument)
        );
        assert_eq!(encoded(Command::ColumnAddressHigh(0x7)), Ok(vec![0x17]));
        assert_eq!(
            encoded(Command::ColumnAddressHigh(0x8)),
            Err(DriverError::InvalidArgument)
        );
    }

    #[test]
    fn range_addressing() {
        assert_eq!(encoded(Command::ColumnAddress(23, 42)), Ok(vec![0x21, 23, 42]));
        assert_eq!(
            encoded(Command::ColumnAddress(0, 128)),
            Err(DriverError::InvalidArgument)
        );
        assert_eq!(
            encoded(Command::ColumnAddress(42, 23)),
            Err(DriverError::InvalidArgument)
        );
        assert_eq!(encoded(Command::PageAddress(2, 7)), Ok(vec![0x22, 2, 7]));
        assert_eq!(encoded(Command::PageAddress(3, 3)), Ok(vec![0x22, 3, 3]));
        assert_eq!(
            encoded(Command::PageAddress(0, 8)),
            Err(DriverError::InvalidArgument)
        );
        assert_eq!(
            encoded(Command::PageAddress(5, 4)),
            Err(DriverError::InvalidArgument)
        );
    }

    #[test]
    fn send_is_one_command_frame() {
        let di = TestSpyInterface::new();
        let mut link = RetryPolicy::new(di.split(), 5);
        Command::Multiplex(64).send(&mut link).unwrap();
        Command::PageStart(3).send(&mut link).unwrap();
        di.check_multi(&[Sent::Cmd(vec![0xA8, 63]), Sent::Cmd(vec![0xB3])]);
    }

    #[test]
    fn invalid_command_is_not_sent() {
        let di = TestSpyInterface::new();
        let mut link = RetryPolicy::new(di.split(), 5);
        assert_eq!(
            Command::PageAddress(0, 9).send(&mut link),
            Err(DriverError::InvalidArgument)
        );
        assert_eq!(di.attempts(), 0);
    }
}
