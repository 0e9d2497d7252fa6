//! Bounded re-attempts of transport calls.
//!
//! Re-sending a command frame is safe, as commands set registers to absolute values. A data frame
//! is not: a transport may deliver part of it before failing, leaving the controller's RAM pointer
//! somewhere inside the run. Data therefore only goes out through `send_at`, which retries the
//! seek together with the data so every attempt starts from the same display RAM cell.

use log::{debug, warn};

use crate::command::consts::MAX_COMMAND_LEN;
use crate::cursor::Seek;
use crate::error::DriverError;
use crate::interface::{Frame, Transport, TransportError};

pub const DEFAULT_RETRY_COUNT: u32 = 5;

/// Owns the transport and re-attempts each call immediately, up to `attempts` times in total.
/// There is no backoff; any timing belongs to the transport.
pub struct RetryPolicy<T> {
    transport: T,
    attempts: u32,
}

impl<T> RetryPolicy<T>
where
    T: Transport,
{
    /// Wrap `transport`. A `retry_count` of zero still makes one attempt.
    pub fn new(transport: T, retry_count: u32) -> Self {
        Self {
            transport,
            attempts: retry_count.max(1),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Send one frame. Failed attempts are absorbed until the budget runs out, at which point the
    /// last cause is reported as `DriverError::BusFailure`.
    pub fn send(&mut self, frame: Frame) -> Result<(), DriverError> {
        let (bytes, is_command) = (frame.bytes(), frame.is_command());
        self.attempt(|t| t.send(bytes, is_command))
    }

    /// Point the controller at a cell with `seek`, then write `data` from there. A failure anywhere
    /// restarts the whole unit from the first seek command. Empty `data` only seeks.
    pub fn send_at(&mut self, seek: &Seek, data: &[u8]) -> Result<(), DriverError> {
        let mut bufs = [[0u8; MAX_COMMAND_LEN]; 3];
        let mut cmds: [&[u8]; 3] = [&[]; 3];
        for ((slot, buf), cmd) in cmds.iter_mut().zip(bufs.iter_mut()).zip(seek.commands()) {
            *slot = cmd.encode(buf)?;
        }
        let cmds = &cmds[..seek.commands().len()];

        self.attempt(|t| {
            for cmd in cmds {
                t.send(cmd, true)?;
            }
            match data {
                [] => Ok(()),
                _ => t.send(data, false),
            }
        })
    }

    /// Pulse the transport's reset line. The pulse is made once; a failure is reported straight
    /// away rather than pulsing again.
    pub fn reset(&mut self) -> Result<(), DriverError> {
        self.transport.reset().map_err(|e| {
            warn!("reset pulse failed: {}", e);
            DriverError::BusFailure(e)
        })
    }

    pub fn release(self) -> T {
        self.transport
    }

    fn attempt<F>(&mut self, mut op: F) -> Result<(), DriverError>
    where
        F: FnMut(&mut T) -> Result<(), TransportError>,
    {
        let mut last = TransportError::Bus;
        for n in 1..=self.attempts {
            match op(&mut self.transport) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    debug!("transport attempt {}/{} failed: {}", n, self.attempts, e);
                    last = e;
                }
            }
        }
        warn!("transport gave up after {} attempts: {}", self.attempts, last);
        Err(DriverError::BusFailure(last))
    }
}
