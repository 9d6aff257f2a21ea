use std::fmt;
use std::io;

// Bytes shown per line, and the width of the hex column for them: eight groups
// of a space and four bytes.
const LINE_BYTES: usize = 32;
const HEX_WIDTH: usize = 72;
const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// How the character column interprets bytes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DumpCharset {
    /// Shift-JIS: a lead byte followed by a trail byte is shown as one
    /// character.
    #[default]
    ShiftJis,
}

impl DumpCharset {
    /// Whether `a` and `b` form one double-byte character.
    fn is_pair(self, a: u8, b: u8) -> bool {
        match self {
            DumpCharset::ShiftJis => {
                matches!(a, 0x81..=0x9F | 0xE0..=0xFC) && matches!(b, 0x40..=0x7E | 0x80..=0xFC)
            }
        }
    }

    fn is_printable(self, b: u8) -> bool {
        match self {
            // half-width katakana
            DumpCharset::ShiftJis => matches!(b, 0x20..=0x7E | 0xA1..=0xDF),
        }
    }
}

/// A hex and character dump of a byte buffer, for diagnostic logs.
///
/// Each line covers 32 bytes:
///
/// ```text
///  30313233 34353637 ...                                                  | 01234567...
/// ```
///
/// The character column replaces control bytes with `.` and other unprintable
/// bytes with a space. A double-byte character that starts on the last byte
/// of a line is shown whole on that line, so its second byte also appears,
/// alone, at the start of the next.
#[derive(Clone, Copy, Debug)]
pub struct HexDump<'a> {
    data: &'a [u8],
    charset: DumpCharset,
}

impl<'a> HexDump<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_charset(data, DumpCharset::default())
    }

    pub fn with_charset(data: &'a [u8], charset: DumpCharset) -> Self {
        Self { data, charset }
    }

    /// Write the dump as raw bytes; double-byte characters are passed through
    /// in their own encoding.
    pub fn write_to<W: io::Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        let mut line = Vec::with_capacity(HEX_WIDTH + 3 + LINE_BYTES + 2);

        for offset in (0..self.data.len()).step_by(LINE_BYTES) {
            line.clear();
            self.render_line(offset, &mut line);
            out.write_all(&line)?;
        }

        Ok(())
    }

    fn render_line(&self, offset: usize, line: &mut Vec<u8>) {
        let end = (offset + LINE_BYTES).min(self.data.len());

        for (i, &b) in self.data[offset..end].iter().enumerate() {
            if i % 4 == 0 {
                line.push(b' ');
            }
            line.push(HEX_DIGITS[usize::from(b >> 4)]);
            line.push(HEX_DIGITS[usize::from(b & 0x0F)]);
        }
        line.resize(HEX_WIDTH, b' ');

        line.extend_from_slice(b" | ");

        let rest = &self.data[offset..];
        let mut i = 0;
        while i < LINE_BYTES && i < rest.len() {
            let b = rest[i];

            if i + 1 < rest.len() && self.charset.is_pair(b, rest[i + 1]) {
                line.extend_from_slice(&rest[i..i + 2]);
                i += 2;
                continue;
            }

            line.push(if b < 0x20 || b == 0x7F {
                b'.'
            } else if self.charset.is_printable(b) {
                b
            } else {
                b' '
            });
            i += 1;
        }

        line.push(b'\n');
    }
}

/// Renders the same lines as [`HexDump::write_to`], decoding the character
/// column as UTF-8; bytes that are not UTF-8 show as U+FFFD.
impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut line = Vec::with_capacity(HEX_WIDTH + 3 + LINE_BYTES + 2);

        for offset in (0..self.data.len()).step_by(LINE_BYTES) {
            line.clear();
            self.render_line(offset, &mut line);
            f.write_str(&String::from_utf8_lossy(&line))?;
        }

        Ok(())
    }
}
