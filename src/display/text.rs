//! Character output at the text cursor.

use core::convert::TryFrom;

use super::{fault_on_bus, Ssd1306};
use crate::error::{DriverError, PartialWrite};
use crate::font::Font;
use crate::interface::Transport;

impl<T, F> Ssd1306<T, F>
where
    T: Transport,
    F: Font,
{
    /// Draw the glyph for `code` at the cursor and advance past it.
    ///
    /// The controller is pointed at the cursor, the glyph's pixel columns go out as one data
    /// frame, and the cursor moves by the glyph width under the current addressing mode. A glyph
    /// that runs past the right edge is cut off there. `\n` moves to the start of the next row and
    /// `\r` to the start of the current one; neither touches the bus.
    pub fn put_char(&mut self, code: u8) -> Result<(), DriverError> {
        self.ensure_ready()?;
        match code {
            b'\n' => {
                self.cursor.newline();
                return Ok(());
            }
            b'\r' => {
                self.cursor.carriage_return();
                return Ok(());
            }
            _ => {}
        }

        let glyph = self
            .font
            .glyph_for(code)
            .ok_or(DriverError::UnsupportedChar(code as char))?;

        let visible = glyph.len().min(self.cursor.remaining_columns());
        let result = self
            .link
            .send_at(&self.cursor.seek(self.addr_mode), &glyph[..visible]);
        fault_on_bus(&mut self.state, result)?;
        self.cursor.advance(self.addr_mode, glyph.len());
        Ok(())
    }

    /// Write `text` one character at a time, returning how many were written.
    ///
    /// Stops at the first failure and reports it together with the number of characters already
    /// on the display. Those are not rolled back, so a caller can resume with the remainder.
    /// Characters beyond U+00FF have no font code and fail with `UnsupportedChar`.
    pub fn put_string(&mut self, text: &str) -> Result<usize, PartialWrite> {
        for (written, c) in text.chars().enumerate() {
            u8::try_from(c)
                .map_err(|_| DriverError::UnsupportedChar(c))
                .and_then(|code| self.put_char(code))
                .map_err(|error| PartialWrite { written, error })?;
        }
        Ok(text.chars().count())
    }
}
