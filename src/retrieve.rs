//! Retry loops for platform calls that write a variable-length value into a
//! caller-supplied buffer.
//!
//! The required length is not known up front and may change between calls, so
//! every strategy here keeps calling until one result is known to be complete.
//! Nothing returned from this module is ever shorter than the value it read.

use std::num::NonZeroUsize;

use tracing::trace;

use crate::{Error, Result};

/// A call shaped like `GetEnvironmentVariableW`.
///
/// `buf.len()` is the capacity on offer, including one slot for a terminator.
/// The query returns:
///
/// * `0` if the value is absent or empty,
/// * the required capacity (terminator included) if `buf` is too small,
/// * otherwise the number of units written, terminator excluded.
pub trait SizedQuery {
    type Unit: Copy + Default;

    fn query(&mut self, buf: &mut [Self::Unit]) -> Result<usize>;
}

/// A call shaped like `GetModuleFileNameW` or `readlink`.
///
/// The query writes as much as fits and returns the number of units written. A
/// return equal to `buf.len()` means the value may have been cut short; the
/// call gives no hint about the size it actually needs.
pub trait TruncatingQuery {
    type Unit: Copy + Default;

    fn query(&mut self, buf: &mut [Self::Unit]) -> Result<usize>;
}

/// The outcome of a single call within a retrieval loop.
#[derive(Clone, Copy, Debug)]
struct Probe {
    requested: usize,
    reported: usize,
}

impl Probe {
    fn truncated(&self) -> bool {
        self.reported != 0 && self.reported >= self.requested
    }

    /// Capacity for the next attempt after a sized query reported truncation.
    fn next_capacity(&self) -> Result<usize> {
        if self.reported > self.requested {
            Ok(self.reported)
        } else {
            self.requested.checked_add(1).ok_or_else(|| Error::overflow())
        }
    }
}

/// Ask for the size first, then fill a buffer of exactly that size.
///
/// An absent value costs a single call. If the value grows between the probe
/// and the fill, the size the fill reported is used for another fill.
pub fn probe_then_fill<Q: SizedQuery>(query: &mut Q) -> Result<Vec<Q::Unit>> {
    let mut capacity = query.query(&mut [])?;

    loop {
        if capacity == 0 {
            return Ok(Vec::new());
        }

        let mut buf: Vec<Q::Unit> = vec![Default::default(); capacity];
        let probe = Probe {
            requested: buf.len(),
            reported: query.query(&mut buf)?,
        };

        if !probe.truncated() {
            buf.truncate(probe.reported);
            return Ok(buf);
        }

        trace!(probe.requested, probe.reported, "value grew between probe and fill");
        capacity = probe.next_capacity()?;
    }
}

/// Guess a capacity, and grow to the reported size until the value fits.
///
/// `initial` counts units of the value; one more slot is offered for the
/// terminator. A value shorter than `initial` is returned after one call.
pub fn fill_with_retry<Q: SizedQuery>(query: &mut Q, initial: usize) -> Result<Vec<Q::Unit>> {
    let capacity = initial.checked_add(1).ok_or_else(|| Error::overflow())?;
    let mut buf: Vec<Q::Unit> = vec![Default::default(); capacity];

    loop {
        let probe = Probe {
            requested: buf.len(),
            reported: query.query(&mut buf)?,
        };

        if !probe.truncated() {
            buf.truncate(probe.reported);
            return Ok(buf);
        }

        let next = probe.next_capacity()?;
        trace!(probe.requested, probe.reported, next, "speculative buffer too small");
        buf.resize(next, Default::default());
    }
}

/// Grow the buffer by `step` until a truncating call leaves room to spare.
///
/// The first attempt offers `step` units plus a terminator slot. Success is a
/// returned length strictly below the capacity offered.
pub fn grow_by_step<Q: TruncatingQuery>(query: &mut Q, step: NonZeroUsize) -> Result<Vec<Q::Unit>> {
    let capacity = step.get().checked_add(1).ok_or_else(|| Error::overflow())?;
    let mut buf: Vec<Q::Unit> = vec![Default::default(); capacity];

    loop {
        let probe = Probe {
            requested: buf.len(),
            reported: query.query(&mut buf)?,
        };

        if probe.reported < probe.requested {
            buf.truncate(probe.reported);
            return Ok(buf);
        }

        let next = buf
            .len()
            .checked_add(step.get())
            .ok_or_else(|| Error::overflow())?;
        trace!(probe.requested, probe.reported, next, "truncated, growing by step");
        buf.resize(next, Default::default());
    }
}
