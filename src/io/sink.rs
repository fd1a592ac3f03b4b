use std::io::{self, Write};

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, PushError, RingBuffer};

use crate::synth::generator::Sample;

/// Returned by a sink that no longer accepts samples.
///
/// This is how a run ends: the generator stops cleanly the first time it
/// sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkClosed;

impl std::fmt::Display for SinkClosed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sink closed")
    }
}

impl std::error::Error for SinkClosed {}

/// Consumer of generated samples
///
/// `accept` may block to apply backpressure; the generator waits for it
/// before advancing time.
pub trait Sink {
    fn accept(&mut self, sample: Sample) -> Result<(), SinkClosed>;

    /// Push out anything buffered. Called once when a run ends.
    fn flush(&mut self) -> Result<(), SinkClosed> {
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn accept(&mut self, sample: Sample) -> Result<(), SinkClosed> {
        (**self).accept(sample)
    }

    fn flush(&mut self) -> Result<(), SinkClosed> {
        (**self).flush()
    }
}

/// Collects every sample; never closes.
impl Sink for Vec<Sample> {
    fn accept(&mut self, sample: Sample) -> Result<(), SinkClosed> {
        self.push(sample);
        Ok(())
    }
}

/// Writes one `time,value` line per sample (three decimals each).
///
/// Any write error closes the sink. A broken pipe is the reader going away
/// and counts as a normal close; anything else (a full disk, say) is kept and
/// can be picked up with [`take_failure`](Self::take_failure).
pub struct WriteSink<W: Write> {
    writer: W,
    failure: Option<io::Error>,
}

impl<W: Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            failure: None,
        }
    }

    /// The write error that closed the sink, unless it was a broken pipe.
    pub fn take_failure(&mut self) -> Option<io::Error> {
        self.failure.take()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn close(&mut self, err: io::Error) -> SinkClosed {
        if err.kind() == io::ErrorKind::BrokenPipe {
            log::debug!("output closed: {}", err);
        } else {
            log::warn!("output failed: {}", err);
            if self.failure.is_none() {
                self.failure = Some(err);
            }
        }
        SinkClosed
    }
}

impl<W: Write> Sink for WriteSink<W> {
    fn accept(&mut self, sample: Sample) -> Result<(), SinkClosed> {
        writeln!(self.writer, "{}", sample).map_err(|err| self.close(err))
    }

    fn flush(&mut self) -> Result<(), SinkClosed> {
        self.writer.flush().map_err(|err| self.close(err))
    }
}

/// Forwards at most `limit` samples to the inner sink, then closes.
pub struct LimitSink<S> {
    inner: S,
    remaining: u64,
}

impl<S: Sink> LimitSink<S> {
    pub fn new(inner: S, limit: u64) -> Self {
        Self {
            inner,
            remaining: limit,
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Sink> Sink for LimitSink<S> {
    fn accept(&mut self, sample: Sample) -> Result<(), SinkClosed> {
        if self.remaining == 0 {
            return Err(SinkClosed);
        }
        self.inner.accept(sample)?;
        self.remaining -= 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkClosed> {
        self.inner.flush()
    }
}

/// Hands samples to another thread through a lock-free ring buffer.
///
/// When the buffer is full `accept` spins (yielding the thread) until the
/// consumer makes room. Dropping the consumer closes the sink.
#[cfg(feature = "rtrb")]
pub struct RingSink {
    tx: Producer<Sample>,
}

#[cfg(feature = "rtrb")]
impl RingSink {
    /// Create a sink and the consumer half that reads from it.
    pub fn with_capacity(capacity: usize) -> (Self, Consumer<Sample>) {
        let (tx, rx) = RingBuffer::<Sample>::new(capacity);
        (Self { tx }, rx)
    }
}

#[cfg(feature = "rtrb")]
impl Sink for RingSink {
    fn accept(&mut self, sample: Sample) -> Result<(), SinkClosed> {
        let mut pending = sample;
        loop {
            if self.tx.is_abandoned() {
                return Err(SinkClosed);
            }
            match self.tx.push(pending) {
                Ok(()) => return Ok(()),
                Err(PushError::Full(rejected)) => {
                    pending = rejected;
                    std::thread::yield_now();
                }
            }
        }
    }
}
