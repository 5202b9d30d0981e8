//! Transport abstraction — the serial byte channel under the protocol.
//!
//! Concrete implementations:
//! - UART (ESP-IDF driver, [`adapters::uart`](crate::adapters))
//! - [`LoopbackTransport`] — two in-memory queues, for host tests and
//!   the simulator
//! - [`NullTransport`] — never has data, discards writes
//!
//! Every call is non-blocking or bounded: the control loop only reads
//! once [`available`](Transport::available) reports a full frame.

use heapless::Deque;

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Number of bytes that can be read without waiting.
    fn available(&mut self) -> Result<usize, Self::Error>;

    /// Fill `buf` completely. Callers check [`available`](Self::available)
    /// first; a transport may fail rather than wait when it cannot.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write all of `data`.
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn available(&mut self) -> Result<usize, Self::Error> {
        (**self).available()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read_exact(buf)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}

/// A null transport that discards all writes and never reads.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn available(&mut self) -> Result<usize, ()> {
        Ok(0)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ()> {
        if buf.is_empty() { Ok(()) } else { Err(()) }
    }

    fn write(&mut self, _data: &[u8]) -> Result<(), ()> {
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

/// Capacity of each loopback direction.
pub const LOOPBACK_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopbackError {
    /// Fewer bytes queued than requested.
    Underrun,
    /// The outbound queue is full.
    Overflow,
}

/// One end of an in-memory link.
///
/// `inbound` is what this end reads; `outbound` collects what it writes.
/// [`LoopbackTransport::feed`] and [`LoopbackTransport::drain`] play the
/// other end.
#[derive(Default)]
pub struct LoopbackTransport {
    inbound: Deque<u8, LOOPBACK_CAPACITY>,
    outbound: Deque<u8, LOOPBACK_CAPACITY>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes for this end to read.
    pub fn feed(&mut self, data: &[u8]) -> Result<(), LoopbackError> {
        push_all(&mut self.inbound, data)
    }

    /// Take up to `buf.len()` bytes this end has written.
    pub fn drain(&mut self, buf: &mut [u8]) -> usize {
        let mut n = 0;
        while n < buf.len() {
            match self.outbound.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        n
    }

    /// Bytes written and not yet drained.
    pub fn pending_output(&self) -> usize {
        self.outbound.len()
    }
}

fn push_all(queue: &mut Deque<u8, LOOPBACK_CAPACITY>, data: &[u8]) -> Result<(), LoopbackError> {
    if queue.capacity() - queue.len() < data.len() {
        return Err(LoopbackError::Overflow);
    }
    for &b in data {
        queue.push_back(b).map_err(|_| LoopbackError::Overflow)?;
    }
    Ok(())
}

impl Transport for LoopbackTransport {
    type Error = LoopbackError;

    fn available(&mut self) -> Result<usize, LoopbackError> {
        Ok(self.inbound.len())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), LoopbackError> {
        if self.inbound.len() < buf.len() {
            return Err(LoopbackError::Underrun);
        }
        for slot in buf.iter_mut() {
            *slot = self.inbound.pop_front().ok_or(LoopbackError::Underrun)?;
        }
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), LoopbackError> {
        push_all(&mut self.outbound, data)
    }

    fn flush(&mut self) -> Result<(), LoopbackError> {
        Ok(())
    }
}
