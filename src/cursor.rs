//! Text cursor tracking and the command sequences that put the controller's address pointers at
//! the cursor.
//!
//! The controller advances its own pointers as data arrives, but only within the ranges it was
//! last given. The driver keeps its own copy of the position and re-seeks before every write, so
//! the reported cursor never depends on what the chip did with the previous frame.

use crate::command::{AddrMode, Command};
use crate::config::Geometry;
use crate::error::DriverError;

/// Logical cursor: a page (text row) and a pixel column. Always inside the geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    geometry: Geometry,
    page: u8,
    column: u8,
}

impl Cursor {
    pub fn new(geometry: Geometry) -> Self {
        Cursor {
            geometry,
            page: 0,
            column: 0,
        }
    }

    /// Current `(row, column)`, where a row is one page.
    pub fn position(&self) -> (u8, u8) {
        (self.page, self.column)
    }

    pub fn check(&self, row: u8, column: u8) -> Result<(), DriverError> {
        if row >= self.geometry.pages() || column >= self.geometry.width() {
            return Err(DriverError::OutOfBounds);
        }
        Ok(())
    }

    /// Move to `(row, column)`. Out of bounds targets leave the cursor where it was.
    pub fn set(&mut self, row: u8, column: u8) -> Result<(), DriverError> {
        self.check(row, column)?;
        self.page = row;
        self.column = column;
        Ok(())
    }

    pub fn home(&mut self) {
        self.page = 0;
        self.column = 0;
    }

    /// Columns left between the cursor and the right edge.
    pub fn remaining_columns(&self) -> usize {
        (self.geometry.width() - self.column) as usize
    }

    /// Step past a glyph `width` columns wide.
    ///
    /// In page and horizontal mode the column moves first; once it reaches the right edge it
    /// wraps to 0 and the page moves down, wrapping from the last page to page 0. A glyph that
    /// only partially fits still advances by its full width, so the wrap happens after it, never
    /// inside it. Vertical mode swaps the order: the page moves first, and the column steps by
    /// `width` each time the pages wrap.
    pub fn advance(&mut self, mode: AddrMode, width: usize) {
        match mode {
            AddrMode::Page | AddrMode::Horizontal => {
                if self.step_column(width) {
                    self.step_page();
                }
            }
            AddrMode::Vertical => {
                if self.step_page() {
                    self.step_column(width);
                }
            }
        }
    }

    /// Column 0 of the next page.
    pub fn newline(&mut self) {
        self.column = 0;
        self.step_page();
    }

    pub fn carriage_return(&mut self) {
        self.column = 0;
    }

    /// Commands that place the controller's address pointers at the cursor.
    pub fn seek(&self, mode: AddrMode) -> Seek {
        Seek::new(self.geometry, mode, self.page, self.column)
    }

    /// Returns true if the column wrapped.
    fn step_column(&mut self, width: usize) -> bool {
        let next = self.column as usize + width;
        if next >= self.geometry.width() as usize {
            self.column = 0;
            true
        } else {
            self.column = next as u8;
            false
        }
    }

    /// Returns true if the page wrapped.
    fn step_page(&mut self) -> bool {
        if self.page + 1 >= self.geometry.pages() {
            self.page = 0;
            true
        } else {
            self.page += 1;
            false
        }
    }
}

/// The positioning commands for one target cell, in send order.
///
/// Page mode uses the single-pointer commands. Horizontal and vertical mode only offer range
/// addressing, so the pointers are placed by setting a range that starts at the target and runs
/// to the right edge. In vertical mode the page range is pinned to the target page, which keeps a
/// run of bytes on one page instead of walking down the column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Seek {
    cmds: [Command; 3],
    len: usize,
}

impl Seek {
    pub fn new(geometry: Geometry, mode: AddrMode, page: u8, column: u8) -> Self {
        let last_column = geometry.width() - 1;
        match mode {
            AddrMode::Page => Seek {
                cmds: [
                    Command::PageStart(page),
                    Command::ColumnAddressLow(column & 0xF),
                    Command::ColumnAddressHigh(column >> 4),
                ],
                len: 3,
            },
            AddrMode::Horizontal => Seek::range(
                Command::ColumnAddress(column, last_column),
                Command::PageAddress(page, geometry.pages() - 1),
            ),
            AddrMode::Vertical => Seek::range(
                Command::ColumnAddress(column, last_column),
                Command::PageAddress(page, page),
            ),
        }
    }

    fn range(columns: Command, pages: Command) -> Self {
        Seek {
            cmds: [columns, pages, pages],
            len: 2,
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.cmds[..self.len]
    }
}
