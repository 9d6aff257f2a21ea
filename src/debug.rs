use std::io::{self, Write};
use std::num::NonZeroUsize;

use crate::BufferSizes;

pub use crate::imp::SystemDebugger;

/// Somewhere finished chunks of debug text can be sent.
pub trait DebugOutput {
    fn output(&mut self, text: &str) -> io::Result<()>;
}

impl<T: DebugOutput + ?Sized> DebugOutput for &mut T {
    fn output(&mut self, text: &str) -> io::Result<()> {
        (**self).output(text)
    }
}

/// Records each chunk, mostly useful for tests.
impl DebugOutput for Vec<String> {
    fn output(&mut self, text: &str) -> io::Result<()> {
        self.push(text.to_owned());
        Ok(())
    }
}

/// A fixed-size staging buffer in front of a [`DebugOutput`].
///
/// Text is handed on when the buffer fills, on `flush`, and on drop, one
/// backend call per chunk. A sink is meant to be owned by one execution
/// context at a time; writes take `&mut self`, so two threads can only share
/// one by wrapping it in their own lock, and output from different sinks never
/// interleaves inside a chunk.
///
/// ```
/// use std::io::Write;
/// use std::num::NonZeroUsize;
/// use wmisc::{DebugSink, Here};
///
/// let mut chunks: Vec<String> = Vec::new();
/// {
///     let mut sink = DebugSink::new(&mut chunks, NonZeroUsize::new(64).unwrap());
///     writeln!(sink, "{} Hello World.", Here::new()).unwrap();
/// }
/// assert!(chunks[0].ends_with(" Hello World.\n"));
/// ```
#[derive(Debug)]
pub struct DebugSink<B: DebugOutput = SystemDebugger> {
    buf: Vec<u8>,
    capacity: usize,
    backend: B,
}

impl DebugSink<SystemDebugger> {
    /// A sink in front of the platform debugger, with the default capacity.
    pub fn system() -> Self {
        Self::new(SystemDebugger::default(), BufferSizes::default().debug_sink)
    }
}

impl<B: DebugOutput> DebugSink<B> {
    pub fn new(backend: B, capacity: NonZeroUsize) -> Self {
        // Must hold a whole UTF-8 sequence so a carried-over tail never fills it.
        let capacity = capacity.get().max(4);

        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
            backend,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Hand the staged text to the backend. With `carry`, a UTF-8 sequence cut
    /// off at the end of the buffer stays behind for the next chunk.
    fn sync(&mut self, carry: bool) -> io::Result<()> {
        let end = if carry {
            self.buf.len() - incomplete_tail(&self.buf)
        } else {
            self.buf.len()
        };

        if end == 0 {
            return Ok(());
        }

        let text = String::from_utf8_lossy(&self.buf[..end]);
        self.backend.output(&text)?;
        self.buf.drain(..end);
        Ok(())
    }
}

impl<B: DebugOutput> Write for DebugSink<B> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if data.is_empty() {
            return Ok(0);
        }

        if self.buf.len() >= self.capacity {
            self.sync(true)?;
        }

        let n = (self.capacity - self.buf.len()).min(data.len());
        self.buf.extend_from_slice(&data[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sync(false)
    }
}

impl<B: DebugOutput> Drop for DebugSink<B> {
    fn drop(&mut self) {
        let _ = self.sync(false);
    }
}

// Length of a UTF-8 sequence at the end of `bytes` that is missing its last
// continuation bytes.
fn incomplete_tail(bytes: &[u8]) -> usize {
    for back in 1..=bytes.len().min(3) {
        let b = bytes[bytes.len() - back];
        if b & 0xC0 == 0x80 {
            continue;
        }

        let needed = match b {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        return if needed > back { back } else { 0 };
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Here;

    fn sink(chunks: &mut Vec<String>, capacity: usize) -> DebugSink<&mut Vec<String>> {
        DebugSink::new(chunks, NonZeroUsize::new(capacity).unwrap())
    }

    #[test]
    fn nothing_is_sent_until_flushed() {
        let mut chunks = Vec::new();
        let mut s = sink(&mut chunks, 64);
        write!(s, "Hello World.").unwrap();
        assert!(s.backend().is_empty());
        s.flush().unwrap();
        assert_eq!(s.backend().as_slice(), ["Hello World."]);
    }

    #[test]
    fn location_prefix() {
        let mut chunks = Vec::new();
        {
            let mut s = sink(&mut chunks, 4096);
            let line = line!() + 1;
            writeln!(s, "{}Hello World.", Here::new()).unwrap();
            s.flush().unwrap();
            assert_eq!(
                s.backend()[0],
                format!("{}({}):Hello World.\n", file!(), line)
            );
        }
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn overflow_splits_into_full_chunks() {
        let text = "0123456789ABCDEF".repeat(2048 / 16);
        let mut chunks = Vec::new();
        {
            let mut s = sink(&mut chunks, 1000);
            s.write_all(text.as_bytes()).unwrap();
        }

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 1000);
        assert_eq!(chunks[1].len(), 1000);
        assert_eq!(chunks[2].len(), 48);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn split_characters_are_carried_over() {
        let mut chunks = Vec::new();
        {
            let mut s = sink(&mut chunks, 5);
            s.write_all("abcあ".as_bytes()).unwrap();
            s.write_all("い".as_bytes()).unwrap();
        }
        assert_eq!(chunks, ["abc", "あ", "い"]);
    }

    #[test]
    fn drop_flushes() {
        let mut chunks = Vec::new();
        {
            let mut s = sink(&mut chunks, 16);
            write!(s, "pending").unwrap();
        }
        assert_eq!(chunks, ["pending"]);
    }

    #[test]
    fn tiny_capacity_still_makes_progress() {
        let mut chunks = Vec::new();
        {
            let mut s = sink(&mut chunks, 1);
            assert_eq!(s.capacity(), 4);
            s.write_all("🦀🦀".as_bytes()).unwrap();
        }
        assert_eq!(chunks.concat(), "🦀🦀");
        assert!(chunks.iter().all(|c| !c.contains('\u{fffd}')));
    }

    #[test]
    fn incomplete_tail_lengths() {
        assert_eq!(incomplete_tail(b"abc"), 0);
        assert_eq!(incomplete_tail("aあ".as_bytes()), 0);
        assert_eq!(incomplete_tail(&"aあ".as_bytes()[..2]), 1);
        assert_eq!(incomplete_tail(&"aあ".as_bytes()[..3]), 2);
        assert_eq!(incomplete_tail(&"🦀".as_bytes()[..3]), 3);
        assert_eq!(incomplete_tail(b""), 0);
    }
}
